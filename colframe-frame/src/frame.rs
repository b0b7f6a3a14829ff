//! The immutable DataFrame container.

use std::fmt;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{Fields, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow::util::pretty::pretty_format_batches;
use colframe_column::{AllocatorRef, Column, ElementBuilder, ValuesMap};
use colframe_iter::{StepIterator, StepMode, new_value_iterator};
use colframe_result::{Error, Result};
use colframe_types::{Element, eq_strict};
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::mutations::{self, MutationFn};

/// An immutable table of named columns sharing a row count.
///
/// Cloning a DataFrame is cheap: it hands out another handle to the same
/// columns. Every operation that changes shape (selection, slicing, joins)
/// returns a new DataFrame built on the same allocator, and the columns it
/// shares with its source stay alive until the last frame referencing them
/// is dropped.
#[derive(Clone)]
pub struct DataFrame {
    inner: Arc<FrameInner>,
}

struct FrameInner {
    allocator: AllocatorRef,
    schema: SchemaRef,
    columns: Vec<Column>,
    num_rows: usize,
}

impl DataFrame {
    /// Build a DataFrame from a schema and one array per field.
    ///
    /// The row count is the length of the first array, or zero when there
    /// are none. Fails when the number of arrays differs from the number of
    /// fields, when an array's type differs from its field, or when an array
    /// is shorter than the row count.
    pub fn try_new(
        allocator: &AllocatorRef,
        schema: SchemaRef,
        arrays: Vec<ArrayRef>,
    ) -> Result<Self> {
        if schema.fields().len() != arrays.len() {
            return Err(Error::Schema(format!(
                "schema has {} fields but {} arrays were provided",
                schema.fields().len(),
                arrays.len()
            )));
        }
        let num_rows = arrays.first().map_or(0, |a| a.len());
        let columns = schema
            .fields()
            .iter()
            .zip(arrays)
            .map(|(field, array)| {
                if array.data_type() != field.data_type() {
                    return Err(Error::Schema(format!(
                        "column {:?} is inconsistent with schema ({} != {})",
                        field.name(),
                        array.data_type(),
                        field.data_type()
                    )));
                }
                Column::try_new_in(allocator, Arc::clone(field), vec![array])
            })
            .collect::<Result<Vec<_>>>()?;
        Self::with_schema(allocator, schema, columns, num_rows)
    }

    /// Build a DataFrame over existing columns. The row count is the length
    /// of the first column, or zero when there are none.
    pub fn from_columns(allocator: &AllocatorRef, columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, Column::len);
        Self::from_shape(allocator, columns, num_rows)
    }

    /// Build a DataFrame over existing columns with an explicit row count.
    ///
    /// Every column must hold at least `num_rows` rows; rows past the count
    /// are ignored.
    pub fn from_shape(
        allocator: &AllocatorRef,
        columns: Vec<Column>,
        num_rows: usize,
    ) -> Result<Self> {
        let schema = Arc::new(Schema::new(
            columns
                .iter()
                .map(|c| Arc::clone(c.field()))
                .collect::<Fields>(),
        ));
        Self::with_schema(allocator, schema, columns, num_rows)
    }

    /// One DataFrame over every row of `batch`.
    pub fn from_record_batch(allocator: &AllocatorRef, batch: &RecordBatch) -> Result<Self> {
        Self::try_new(allocator, batch.schema(), batch.columns().to_vec())
    }

    /// One DataFrame over several batches of the same schema; each batch
    /// becomes one chunk of every column.
    pub fn from_record_batches(
        allocator: &AllocatorRef,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<Self> {
        for (i, batch) in batches.iter().enumerate() {
            if batch.schema().fields() != schema.fields() {
                return Err(Error::Schema(format!(
                    "record batch {i} does not match the DataFrame schema"
                )));
            }
        }
        let columns = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let chunks = batches.iter().map(|b| Arc::clone(b.column(i))).collect();
                Column::try_new_in(allocator, Arc::clone(field), chunks)
            })
            .collect::<Result<Vec<_>>>()?;
        let num_rows = batches.iter().map(RecordBatch::num_rows).sum();
        Self::with_schema(allocator, schema, columns, num_rows)
    }

    /// Build a DataFrame from in-memory values, one column per map entry,
    /// columns ordered by name.
    ///
    /// ```
    /// use colframe_column::{ColumnValues, ValuesMap, default_allocator};
    /// use colframe_frame::DataFrame;
    ///
    /// let mut values = ValuesMap::new();
    /// values.insert("b".into(), ColumnValues::dynamic(vec![1.5f64, 2.5]));
    /// values.insert("a".into(), ColumnValues::dynamic(vec![Some(1i64), None]));
    /// let df = DataFrame::from_values(&default_allocator(), values).unwrap();
    /// assert_eq!(df.column_names(), vec!["a", "b"]);
    /// assert_eq!(df.num_rows(), 2);
    /// ```
    pub fn from_values(allocator: &AllocatorRef, values: ValuesMap) -> Result<Self> {
        let columns = values
            .into_iter()
            .map(|(name, values)| Column::from_values(allocator, name, values))
            .collect::<Result<Vec<_>>>()?;
        Self::from_columns(allocator, columns)
    }

    fn with_schema(
        allocator: &AllocatorRef,
        schema: SchemaRef,
        columns: Vec<Column>,
        num_rows: usize,
    ) -> Result<Self> {
        let frame = Self {
            inner: Arc::new(FrameInner {
                allocator: Arc::clone(allocator),
                schema,
                columns,
                num_rows,
            }),
        };
        frame.validate()?;
        Ok(frame)
    }

    /// Check the frame's invariants: one column per schema field, each
    /// column's field equal to the schema's, and no column shorter than the
    /// row count.
    pub fn validate(&self) -> Result<()> {
        let fields = self.inner.schema.fields();
        if fields.len() != self.inner.columns.len() {
            return Err(Error::Schema(format!(
                "schema has {} fields but the DataFrame holds {} columns",
                fields.len(),
                self.inner.columns.len()
            )));
        }
        for (field, column) in fields.iter().zip(&self.inner.columns) {
            if column.field() != field {
                return Err(Error::Schema(format!(
                    "column field {:?} is inconsistent with schema",
                    column.name()
                )));
            }
            if column.len() < self.inner.num_rows {
                return Err(Error::Schema(format!(
                    "column {:?} expected length >= {} but got length {}",
                    column.name(),
                    self.inner.num_rows,
                    column.len()
                )));
            }
        }
        Ok(())
    }

    pub fn allocator(&self) -> &AllocatorRef {
        &self.inner.allocator
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.inner.schema
    }

    pub fn fields(&self) -> &Fields {
        self.inner.schema.fields()
    }

    pub fn columns(&self) -> &[Column] {
        &self.inner.columns
    }

    /// First column named `name`.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.inner.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_at(&self, index: usize) -> Option<&Column> {
        self.inner.columns.get(index)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.inner.columns.iter().map(Column::name).collect()
    }

    /// Name of the column at `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.inner.columns.get(index).map(Column::name)
    }

    pub fn num_cols(&self) -> usize {
        self.inner.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.inner.num_rows
    }

    /// `(columns, rows)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.num_cols(), self.num_rows())
    }

    /// Number of live handles to this frame.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// The columns whose names appear in `names`, in frame order.
    ///
    /// Names are matched exactly; names with no matching column are ignored.
    pub fn select_columns<S: AsRef<str>>(&self, names: &[S]) -> Vec<Column> {
        let wanted = name_set(names);
        self.log_unknown(&wanted, "select");
        self.inner
            .columns
            .iter()
            .filter(|c| wanted.contains(c.name()))
            .cloned()
            .collect()
    }

    /// The columns whose names do not appear in `names`, in frame order.
    pub fn reject_columns<S: AsRef<str>>(&self, names: &[S]) -> Vec<Column> {
        let rejected = name_set(names);
        self.log_unknown(&rejected, "reject");
        self.inner
            .columns
            .iter()
            .filter(|c| !rejected.contains(c.name()))
            .cloned()
            .collect()
    }

    fn log_unknown(&self, names: &FxHashSet<&str>, op: &str) {
        for name in names {
            if self.column(name).is_none() {
                debug!(column = name, op, "ignoring unknown column name");
            }
        }
    }

    /// New frame with only the named columns.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame> {
        mutations::select(names)(self)
    }

    /// New frame without the named columns.
    pub fn drop<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame> {
        mutations::drop(names)(self)
    }

    /// New frame over rows `[begin, end)`, sharing the source buffers.
    pub fn slice(&self, begin: usize, end: usize) -> Result<DataFrame> {
        mutations::slice(begin, end)(self)
    }

    /// Shallow copy: a new frame over the same columns.
    pub fn copy(&self) -> Result<DataFrame> {
        Self::with_schema(
            &self.inner.allocator,
            Arc::clone(&self.inner.schema),
            self.inner.columns.clone(),
            self.inner.num_rows,
        )
    }

    /// Apply mutations left to right, each to the previous result, starting
    /// from a copy of this frame. The first error aborts.
    pub fn apply<I>(&self, fns: I) -> Result<DataFrame>
    where
        I: IntoIterator<Item = MutationFn>,
    {
        fns.into_iter()
            .try_fold(self.copy()?, |frame, f| f(&frame))
    }

    /// New frame with `column` appended. The column must hold at least
    /// `num_rows` rows.
    pub fn append_column(&self, column: Column) -> Result<DataFrame> {
        let mut columns = self.inner.columns.clone();
        columns.push(column);
        Self::from_shape(&self.inner.allocator, columns, self.inner.num_rows)
    }

    /// New frame with a column named `new_name` appended, holding `f` applied
    /// to the first `num_rows` elements of `column_name`. Rows past the
    /// frame's row count are never visited.
    ///
    /// The new column keeps the source column's type; `f` returning an
    /// element of another type fails with
    /// [`Error::InconsistentDataTypes`].
    pub fn apply_to_column<F>(&self, column_name: &str, new_name: &str, mut f: F) -> Result<DataFrame>
    where
        F: FnMut(Element) -> Result<Element>,
    {
        let source = self.column(column_name).ok_or_else(|| {
            Error::InvalidArgumentError(format!(
                "column {column_name:?} not found (columns: {:?})",
                self.column_names()
            ))
        })?;
        let field = source.field().as_ref().clone().with_name(new_name);
        let schema = Schema::new(vec![field.clone()]);
        let visible = source.slice(0, self.num_rows())?;
        let mut builder = ElementBuilder::with_capacity(&schema, visible.len());
        let mut values = new_value_iterator(&visible)?;
        while values.next() {
            builder.append_value(0, f(values.value_as_element()?)?)?;
        }
        let arrays = builder.finish()?;
        let column = Column::try_new_in(&self.inner.allocator, Arc::new(field), arrays)?;
        self.append_column(column)
    }

    /// Whether both frames hold the same schema and the same values.
    ///
    /// Columns are compared row by row with strict equality, so nulls at the
    /// same positions are equal.
    pub fn equals(&self, other: &DataFrame) -> bool {
        if self.inner.schema.fields() != other.inner.schema.fields() {
            return false;
        }
        if self.num_rows() != other.num_rows() {
            return false;
        }
        self.inner
            .columns
            .iter()
            .zip(&other.inner.columns)
            .all(|(left, right)| match self.columns_equal(left, right) {
                Ok(equal) => equal,
                Err(err) => {
                    warn!(column = left.name(), error = %err, "comparing columns failed");
                    false
                }
            })
    }

    fn columns_equal(&self, left: &Column, right: &Column) -> Result<bool> {
        if left.data_type() != right.data_type() {
            warn!(
                left = %left.data_type(),
                right = %right.data_type(),
                "comparing different types of columns"
            );
            return Ok(false);
        }
        let rows = self.num_rows();
        let columns = [left.slice(0, rows)?, right.slice(0, rows)?];
        let mut steps = StepIterator::for_columns(&columns)?.with_mode(StepMode::Strict);
        while steps.next() {
            let step = steps.values()?;
            if !eq_strict(&step.values[0], &step.values[1])? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The first `num_rows` rows of every column as one record batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let arrays = self
            .inner
            .columns
            .iter()
            .map(|c| c.slice(0, self.num_rows())?.concat())
            .collect::<Result<Vec<_>>>()?;
        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows()));
        Ok(RecordBatch::try_new_with_options(
            Arc::clone(&self.inner.schema),
            arrays,
            &options,
        )?)
    }

    /// Tabular rendering for debugging.
    pub fn display(&self) -> Result<String> {
        let batch = self.to_record_batch()?;
        Ok(pretty_format_batches(&[batch])?.to_string())
    }
}

fn name_set<S: AsRef<str>>(names: &[S]) -> FxHashSet<&str> {
    names.iter().map(AsRef::as_ref).collect()
}

impl fmt::Debug for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataFrame")
            .field("num_rows", &self.num_rows())
            .field("columns", &self.inner.columns)
            .finish()
    }
}
