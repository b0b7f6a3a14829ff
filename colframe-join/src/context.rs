//! Per-call join state.
//!
//! A [`JoinContext`] is built once per join. It resolves the key columns on
//! both operands, orders each operand's columns as keys followed by the
//! remaining columns, derives the output schema (renaming collisions with
//! the configured suffixes) and owns the builder the join appends rows to.
//! Everything it holds is dropped when the join returns, on success or
//! error.

use std::sync::Arc;

use arrow::datatypes::{Field, Schema, SchemaRef};
use colframe_column::{AllocatorRef, Column, ElementBuilder};
use colframe_frame::DataFrame;
use colframe_iter::StepIterator;
use colframe_result::{Error, Result, Side};
use colframe_types::{Element, eq};

use crate::JoinOptions;

/// Which output fields are forced to be nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nullability {
    /// Every field keeps its source nullability (inner and cross joins).
    Source,
    /// Non-key right fields may be padded with nulls (left and right joins).
    RightAdditional,
    /// Every field may be padded with nulls (outer joins).
    All,
}

pub(crate) struct JoinContext {
    allocator: AllocatorRef,
    key_count: usize,
    left_columns: Vec<Column>,
    right_columns: Vec<Column>,
    schema: SchemaRef,
    builder: ElementBuilder,
}

impl JoinContext {
    pub(crate) fn try_new<S: AsRef<str>>(
        left: &DataFrame,
        right: &DataFrame,
        keys: &[S],
        options: &JoinOptions,
        nullability: Nullability,
    ) -> Result<Self> {
        let mut left_columns = Vec::with_capacity(left.num_cols());
        let mut right_columns = Vec::with_capacity(right.num_cols());
        for key in keys {
            let key = key.as_ref();
            left_columns.push(key_column(left, key, Side::Left)?);
            right_columns.push(key_column(right, key, Side::Right)?);
        }
        left_columns.extend(left.reject_columns(keys));
        right_columns.extend(right.reject_columns(keys));

        let left_columns = limit_rows(left_columns, left.num_rows())?;
        let right_columns = limit_rows(right_columns, right.num_rows())?;

        let fields = output_fields(
            &left_columns,
            &right_columns,
            keys.len(),
            options,
            nullability,
        );
        let schema = Arc::new(Schema::new(fields));
        let builder = ElementBuilder::with_capacity(&schema, left.num_rows());

        Ok(Self {
            allocator: Arc::clone(left.allocator()),
            key_count: keys.len(),
            left_columns,
            right_columns,
            schema,
            builder,
        })
    }

    #[cfg(test)]
    pub(crate) fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Rows of the left operand, keys first.
    pub(crate) fn left_rows(&self) -> Result<StepIterator> {
        StepIterator::for_columns(&self.left_columns)
    }

    /// Every row of the right operand, keys first, materialized once so the
    /// nested loop can probe it for each left row.
    pub(crate) fn right_rows(&self) -> Result<Vec<Vec<Element>>> {
        let mut steps = StepIterator::for_columns(&self.right_columns)?;
        let mut rows = Vec::with_capacity(self.right_columns.first().map_or(0, Column::len));
        while steps.next() {
            rows.push(steps.values()?.values.clone());
        }
        Ok(rows)
    }

    /// Whether two rows match on every key under relational equality.
    /// With no keys every pair of rows matches.
    pub(crate) fn keys_match(&self, left: &[Element], right: &[Element]) -> Result<bool> {
        for (l, r) in left[..self.key_count].iter().zip(&right[..self.key_count]) {
            if !eq(l, r)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Append a left row followed by the non-key values of a right row.
    pub(crate) fn append_match(&mut self, left: &[Element], right: &[Element]) -> Result<()> {
        let additional = &right[self.key_count..];
        for (field, value) in left.iter().chain(additional).enumerate() {
            self.builder.append(field, value)?;
        }
        Ok(())
    }

    /// Append a left row with nulls in every right column.
    pub(crate) fn append_left_only(&mut self, left: &[Element]) -> Result<()> {
        for (field, value) in left.iter().enumerate() {
            self.builder.append(field, value)?;
        }
        for field in left.len()..left.len() + self.right_additional() {
            self.builder.append_value(field, Element::Null)?;
        }
        Ok(())
    }

    /// Append a right row: its keys go into the key columns, the non-key
    /// left columns are null, and its remaining values fill the right
    /// columns.
    pub(crate) fn append_right_only(&mut self, right: &[Element]) -> Result<()> {
        let (keys, additional) = right.split_at(self.key_count);
        for (field, value) in keys.iter().enumerate() {
            self.builder.append(field, value)?;
        }
        let left_width = self.left_columns.len();
        for field in self.key_count..left_width {
            self.builder.append_value(field, Element::Null)?;
        }
        for (offset, value) in additional.iter().enumerate() {
            self.builder.append(left_width + offset, value)?;
        }
        Ok(())
    }

    fn right_additional(&self) -> usize {
        self.right_columns.len() - self.key_count
    }

    /// Build the output DataFrame from every row appended so far.
    pub(crate) fn finish(self) -> Result<DataFrame> {
        let arrays = self.builder.finish()?;
        DataFrame::try_new(&self.allocator, self.schema, arrays)
    }
}

fn key_column(df: &DataFrame, key: &str, side: Side) -> Result<Column> {
    df.column(key).cloned().ok_or_else(|| Error::ColumnNotFound {
        name: key.to_string(),
        side,
        available: df.column_names().into_iter().map(String::from).collect(),
    })
}

// Columns may be longer than the frame's row count; only the first
// `num_rows` rows take part in the join.
fn limit_rows(columns: Vec<Column>, num_rows: usize) -> Result<Vec<Column>> {
    columns
        .into_iter()
        .map(|c| {
            if c.len() == num_rows {
                Ok(c)
            } else {
                c.slice(0, num_rows)
            }
        })
        .collect()
}

/// Left keys, remaining left columns, then remaining right columns.
///
/// A non-key right column named like a non-key left column renames both,
/// appending the left and right suffix respectively. Key names never
/// collide because the right keys are not part of the output.
fn output_fields(
    left: &[Column],
    right: &[Column],
    key_count: usize,
    options: &JoinOptions,
    nullability: Nullability,
) -> Vec<Field> {
    let mut fields: Vec<Field> = left
        .iter()
        .map(|c| {
            let field = c.field().as_ref().clone();
            if nullability == Nullability::All {
                field.with_nullable(true)
            } else {
                field
            }
        })
        .collect();

    for column in &right[key_count..] {
        let mut field = column.field().as_ref().clone();
        if nullability != Nullability::Source {
            field.set_nullable(true);
        }
        let name = field.name().clone();
        if let Some(collision) = fields[key_count..left.len()]
            .iter_mut()
            .find(|f| f.name() == &name)
        {
            collision.set_name(format!("{name}{}", options.lsuffix));
            field.set_name(format!("{name}{}", options.rsuffix));
        }
        fields.push(field);
    }
    fields
}
