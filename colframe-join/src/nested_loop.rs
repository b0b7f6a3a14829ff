//! Nested-loop join algorithms.
//!
//! Every left row is compared against every right row, so the cost is
//! O(left rows x right rows) key comparisons. The right operand is read once
//! into memory; the left operand is streamed.

use colframe_result::Result;
use colframe_types::Element;
use tracing::{debug, trace};

use crate::context::JoinContext;

struct Probe {
    right_rows: Vec<Vec<Element>>,
    matched: Vec<bool>,
}

/// Append every matching (left, right) pair in left-row then right-row
/// order. With `pad_unmatched`, a left row without matches is appended
/// once with nulls for the right columns.
fn probe(ctx: &mut JoinContext, pad_unmatched: bool) -> Result<Probe> {
    let right_rows = ctx.right_rows()?;
    let mut matched = vec![false; right_rows.len()];
    let mut left_rows = ctx.left_rows()?;
    let mut left_count = 0usize;
    let mut pairs = 0usize;

    while left_rows.next() {
        let left = &left_rows.values()?.values;
        left_count += 1;
        let mut any = false;
        for (right, hit) in right_rows.iter().zip(matched.iter_mut()) {
            if ctx.keys_match(left, right)? {
                ctx.append_match(left, right)?;
                *hit = true;
                any = true;
                pairs += 1;
            }
        }
        if !any {
            trace!(row = left_count - 1, "left row matched nothing");
            if pad_unmatched {
                ctx.append_left_only(left)?;
            }
        }
    }

    debug!(
        left_rows = left_count,
        right_rows = right_rows.len(),
        pairs,
        "nested loop probe finished"
    );
    Ok(Probe {
        right_rows,
        matched,
    })
}

pub(crate) fn inner_join(ctx: &mut JoinContext) -> Result<()> {
    probe(ctx, false).map(|_| ())
}

pub(crate) fn left_join(ctx: &mut JoinContext) -> Result<()> {
    probe(ctx, true).map(|_| ())
}

/// A left join followed by one row for every right row that matched no
/// left row, in right-row order.
pub(crate) fn outer_join(ctx: &mut JoinContext) -> Result<()> {
    let Probe {
        right_rows,
        matched,
    } = probe(ctx, true)?;
    let mut right_only = 0usize;
    for (right, _) in right_rows.iter().zip(&matched).filter(|(_, hit)| !**hit) {
        ctx.append_right_only(right)?;
        right_only += 1;
    }
    debug!(right_only, "appended unmatched right rows");
    Ok(())
}

/// Every left row paired with every right row.
pub(crate) fn cross_join(ctx: &mut JoinContext) -> Result<()> {
    let right_rows = ctx.right_rows()?;
    let mut left_rows = ctx.left_rows()?;
    while left_rows.next() {
        let left = &left_rows.values()?.values;
        for right in &right_rows {
            ctx.append_match(left, right)?;
        }
    }
    Ok(())
}
