//! Joins over colframe DataFrames.
//!
//! This crate exposes the join configuration types (`JoinType`, `JoinOptions`)
//! and a single entry point, [`join`], that routes to the nested-loop
//! implementation for every join type. [`DataFrameJoinExt`] adds the same
//! operations as methods on [`DataFrame`], and [`mutations`] packages them as
//! [`MutationFn`](colframe_frame::MutationFn)s for [`DataFrame::apply`].
//!
//! Key matching uses relational equality: a null key never matches anything,
//! including another null. Output rows are appended in a fixed order (left
//! rows in order, each followed by its matches in right-row order, then the
//! unmatched right rows of an outer join), so results are reproducible.
#![forbid(unsafe_code)]

mod context;
pub mod mutations;
mod nested_loop;

use std::fmt;

use colframe_frame::DataFrame;
use colframe_result::{Error, Result, Side};
use tracing::debug;

use crate::context::{JoinContext, Nullability};

/// Type of join to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum JoinType {
    /// Emit only matching row pairs.
    #[default]
    Inner,
    /// Emit all left rows; unmatched left rows have NULL right columns.
    Left,
    /// Emit all right rows; unmatched right rows have NULL left columns.
    Right,
    /// Emit all left rows, then every right row that matched nothing.
    Outer,
    /// Emit every pairing of a left row with a right row. Takes no keys.
    Cross,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
            JoinType::Right => write!(f, "RIGHT"),
            JoinType::Outer => write!(f, "OUTER"),
            JoinType::Cross => write!(f, "CROSS"),
        }
    }
}

pub const DEFAULT_LSUFFIX: &str = "_0";
pub const DEFAULT_RSUFFIX: &str = "_1";

/// Options controlling a join.
///
/// When a non-key column of the right operand has the same name as a column
/// of the left operand, both output columns are renamed by appending
/// `lsuffix` and `rsuffix` respectively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinOptions {
    /// Type of join to perform.
    pub join_type: JoinType,
    /// Appended to left column names that collide with a right column.
    pub lsuffix: String,
    /// Appended to right column names that collide with a left column.
    pub rsuffix: String,
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            join_type: JoinType::Inner,
            lsuffix: DEFAULT_LSUFFIX.to_string(),
            rsuffix: DEFAULT_RSUFFIX.to_string(),
        }
    }
}

impl JoinOptions {
    /// Create options for an inner join with default settings.
    pub fn inner() -> Self {
        Self {
            join_type: JoinType::Inner,
            ..Default::default()
        }
    }

    /// Create options for a left outer join with default settings.
    pub fn left() -> Self {
        Self {
            join_type: JoinType::Left,
            ..Default::default()
        }
    }

    /// Create options for a right outer join with default settings.
    pub fn right() -> Self {
        Self {
            join_type: JoinType::Right,
            ..Default::default()
        }
    }

    /// Create options for a full outer join with default settings.
    pub fn outer() -> Self {
        Self {
            join_type: JoinType::Outer,
            ..Default::default()
        }
    }

    /// Create options for a cross join with default settings.
    pub fn cross() -> Self {
        Self {
            join_type: JoinType::Cross,
            ..Default::default()
        }
    }

    /// Set the suffix for colliding left column names.
    pub fn with_lsuffix(mut self, lsuffix: impl Into<String>) -> Self {
        self.lsuffix = lsuffix.into();
        self
    }

    /// Set the suffix for colliding right column names.
    pub fn with_rsuffix(mut self, rsuffix: impl Into<String>) -> Self {
        self.rsuffix = rsuffix.into();
        self
    }

    /// The same options with the operands' roles exchanged: the suffixes
    /// trade places.
    pub fn swapped(&self) -> Self {
        Self {
            join_type: self.join_type,
            lsuffix: self.rsuffix.clone(),
            rsuffix: self.lsuffix.clone(),
        }
    }
}

/// Validate join options before execution.
pub fn validate_join_options(options: &JoinOptions) -> Result<()> {
    if options.lsuffix == options.rsuffix {
        return Err(Error::Configuration(format!(
            "lsuffix ({}) cannot be the same as rsuffix ({})",
            options.lsuffix, options.rsuffix
        )));
    }
    Ok(())
}

/// Validate join keys against the join type.
///
/// A cross join pairs every row with every row and takes no keys. Every
/// other join type accepts any number of keys; with none, every pair of rows
/// matches.
pub fn validate_join_keys<S: AsRef<str>>(keys: &[S], join_type: JoinType) -> Result<()> {
    if join_type == JoinType::Cross && !keys.is_empty() {
        return Err(Error::InvalidArgumentError(format!(
            "cross join takes no keys, got {:?}",
            keys.iter().map(AsRef::as_ref).collect::<Vec<_>>()
        )));
    }
    Ok(())
}

/// Join `left` with `right` on the columns named in `keys`.
///
/// The output holds the key columns (taken from `left`), then the remaining
/// left columns, then the remaining right columns, all in frame order. A
/// right join is computed as a left join with the operands and suffixes
/// exchanged, so its output leads with the right operand's columns.
///
/// Fails before any output is built when a key is missing from either
/// operand or the options are invalid. Comparing keys of incompatible types,
/// or writing a right key into a left key column of another type, aborts the
/// join.
pub fn join<S: AsRef<str>>(
    left: &DataFrame,
    right: &DataFrame,
    keys: &[S],
    options: &JoinOptions,
) -> Result<DataFrame> {
    validate_join_options(options)?;
    validate_join_keys(keys, options.join_type)?;

    debug!(
        join_type = %options.join_type,
        left_rows = left.num_rows(),
        right_rows = right.num_rows(),
        keys = ?keys.iter().map(AsRef::as_ref).collect::<Vec<_>>(),
        "starting join"
    );

    let joined = match options.join_type {
        JoinType::Inner => {
            let mut ctx = JoinContext::try_new(left, right, keys, options, Nullability::Source)?;
            nested_loop::inner_join(&mut ctx)?;
            ctx.finish()
        }
        JoinType::Left => {
            let mut ctx =
                JoinContext::try_new(left, right, keys, options, Nullability::RightAdditional)?;
            nested_loop::left_join(&mut ctx)?;
            ctx.finish()
        }
        JoinType::Right => {
            let swapped = options.swapped();
            let mut ctx =
                JoinContext::try_new(right, left, keys, &swapped, Nullability::RightAdditional)
                    .map_err(swap_sides)?;
            nested_loop::left_join(&mut ctx)?;
            ctx.finish()
        }
        JoinType::Outer => {
            let mut ctx = JoinContext::try_new(left, right, keys, options, Nullability::All)?;
            nested_loop::outer_join(&mut ctx)?;
            ctx.finish()
        }
        JoinType::Cross => {
            let mut ctx = JoinContext::try_new(left, right, keys, options, Nullability::Source)?;
            nested_loop::cross_join(&mut ctx)?;
            ctx.finish()
        }
    }?;

    debug!(
        join_type = %options.join_type,
        rows = joined.num_rows(),
        columns = joined.num_cols(),
        "join finished"
    );
    Ok(joined)
}

// Lookup errors from a right join name the operands as the caller passed them.
fn swap_sides(err: Error) -> Error {
    match err {
        Error::ColumnNotFound {
            name,
            side,
            available,
        } => Error::ColumnNotFound {
            name,
            side: match side {
                Side::Left => Side::Right,
                Side::Right => Side::Left,
            },
            available,
        },
        other => other,
    }
}

/// Join operations as methods on [`DataFrame`]. The receiver is the left
/// operand.
pub trait DataFrameJoinExt {
    /// Join with `right` using fully specified options.
    fn join_with<S: AsRef<str>>(
        &self,
        right: &DataFrame,
        keys: &[S],
        options: &JoinOptions,
    ) -> Result<DataFrame>;

    fn inner_join<S: AsRef<str>>(&self, right: &DataFrame, keys: &[S]) -> Result<DataFrame> {
        self.join_with(right, keys, &JoinOptions::inner())
    }

    fn left_join<S: AsRef<str>>(&self, right: &DataFrame, keys: &[S]) -> Result<DataFrame> {
        self.join_with(right, keys, &JoinOptions::left())
    }

    fn right_join<S: AsRef<str>>(&self, right: &DataFrame, keys: &[S]) -> Result<DataFrame> {
        self.join_with(right, keys, &JoinOptions::right())
    }

    fn outer_join<S: AsRef<str>>(&self, right: &DataFrame, keys: &[S]) -> Result<DataFrame> {
        self.join_with(right, keys, &JoinOptions::outer())
    }

    fn cross_join(&self, right: &DataFrame) -> Result<DataFrame> {
        self.join_with::<&str>(right, &[], &JoinOptions::cross())
    }
}

impl DataFrameJoinExt for DataFrame {
    fn join_with<S: AsRef<str>>(
        &self,
        right: &DataFrame,
        keys: &[S],
        options: &JoinOptions,
    ) -> Result<DataFrame> {
        join(self, right, keys, options)
    }
}
