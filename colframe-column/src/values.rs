//! Column construction from in-memory values.

use std::collections::BTreeMap;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field};
use colframe_result::{Error, Result};
use colframe_types::Element;

use crate::builder::{build_array, conforms, infer_data_type};
use crate::column::Column;
use crate::memory::AllocatorRef;

/// Values for one column: either an already typed Arrow array or a sequence
/// of elements whose type is inferred.
#[derive(Debug, Clone)]
pub enum ColumnValues {
    Typed(ArrayRef),
    Dynamic(Vec<Element>),
}

/// Column name to values. Iteration order (sorted by name) is the column
/// order of a DataFrame built from it.
pub type ValuesMap = BTreeMap<String, ColumnValues>;

impl ColumnValues {
    pub fn typed(array: ArrayRef) -> Self {
        ColumnValues::Typed(array)
    }

    /// Dynamic values from anything convertible into elements.
    ///
    /// ```
    /// use colframe_column::ColumnValues;
    ///
    /// let values = ColumnValues::dynamic(vec![Some(1i64), None, Some(3)]);
    /// assert_eq!(values.len(), 3);
    /// ```
    pub fn dynamic<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Element>,
    {
        ColumnValues::Dynamic(values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Typed(array) => array.len(),
            ColumnValues::Dynamic(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Materialize into a single Arrow array.
    ///
    /// Dynamic values take the type of their first non-null element; a later
    /// element of another type is rejected. Values that are all null (or no
    /// values at all) produce a `Null` typed array.
    pub fn into_array(self) -> Result<ArrayRef> {
        match self {
            ColumnValues::Typed(array) => Ok(array),
            ColumnValues::Dynamic(values) => dynamic_array(&values),
        }
    }
}

impl From<ArrayRef> for ColumnValues {
    fn from(array: ArrayRef) -> Self {
        ColumnValues::Typed(array)
    }
}

impl From<Vec<Element>> for ColumnValues {
    fn from(values: Vec<Element>) -> Self {
        ColumnValues::Dynamic(values)
    }
}

fn dynamic_array(values: &[Element]) -> Result<ArrayRef> {
    let Some((dt, first)) = infer_data_type(values)? else {
        return build_array(&DataType::Null, values);
    };
    if let Some(bad) = values.iter().find(|v| !conforms(v, &dt)) {
        return Err(Error::inconsistent_types(bad, first.type_name()));
    }
    build_array(&dt, values)
}

impl Column {
    /// Build a column named `name` from `values`, reserving its buffers
    /// against `allocator`.
    pub fn from_values(
        allocator: &AllocatorRef,
        name: impl Into<String>,
        values: impl Into<ColumnValues>,
    ) -> Result<Column> {
        let array = values.into().into_array()?;
        let field = Field::new(name, array.data_type().clone(), true);
        Column::try_new_in(allocator, Arc::new(field), vec![array])
    }

    /// Build a column of `size` rows where `values[i]` is placed at row
    /// `indexes[i]` and every other row is null.
    pub fn from_sparse_values(
        allocator: &AllocatorRef,
        name: impl Into<String>,
        values: Vec<Element>,
        indexes: &[usize],
        size: usize,
    ) -> Result<Column> {
        let name = name.into();
        if values.len() != indexes.len() {
            return Err(Error::InvalidArgumentError(format!(
                "sparse column {name:?} has {} values but {} indexes",
                values.len(),
                indexes.len()
            )));
        }
        let mut dense = vec![Element::Null; size];
        for (value, &index) in values.into_iter().zip(indexes) {
            let slot = dense.get_mut(index).ok_or_else(|| {
                Error::InvalidArgumentError(format!(
                    "sparse index {index} out of bounds for column {name:?} of size {size}"
                ))
            })?;
            *slot = value;
        }
        Column::from_values(allocator, name, ColumnValues::Dynamic(dense))
    }
}
