//! Iterators over nested (list and struct) columns.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use arrow::array::{Array, AsArray, OffsetSizeTrait};
use arrow::datatypes::{DataType, FieldRef, Fields};
use colframe_column::Column;
use colframe_result::{Error, Result};
use colframe_types::Element;

use crate::value::{
    Advance, Cursor, ValueIterator, check_supported, new_array_value_iterator, new_value_iterator,
};

/// Rows of a `List` (`O = i32`) or `LargeList` (`O = i64`) column.
///
/// Each row is the sub-range of the child array between two consecutive
/// offsets, exposed as a nested value iterator over just that range.
pub struct ListValueIterator<O: OffsetSizeTrait> {
    cursor: Cursor,
    item: FieldRef,
    _offset: PhantomData<fn() -> O>,
}

impl<O: OffsetSizeTrait> ListValueIterator<O> {
    pub fn new(column: &Column) -> Result<Self> {
        let item = match (O::IS_LARGE, column.data_type()) {
            (false, DataType::List(item)) | (true, DataType::LargeList(item)) => Arc::clone(item),
            (_, other) => {
                return Err(Error::Schema(format!(
                    "column {:?} of type {other} is not a {}list",
                    column.name(),
                    if O::IS_LARGE { "large " } else { "" }
                )));
            }
        };
        check_supported(item.data_type())?;
        Ok(Self {
            cursor: Cursor::new(column),
            item,
            _offset: PhantomData,
        })
    }

    /// Iterator over the items of the current row, `None` when the row is
    /// null.
    #[track_caller]
    pub fn value(&self) -> Result<Option<Box<dyn ValueIterator>>> {
        let (chunk, index) = self.cursor.position();
        let list = chunk.as_list::<O>();
        if list.is_null(index) {
            return Ok(None);
        }
        new_array_value_iterator(Arc::clone(&self.item), list.value(index)).map(Some)
    }
}

impl<O: OffsetSizeTrait> fmt::Debug for ListValueIterator<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListValueIterator")
            .field("item", &self.item)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<O: OffsetSizeTrait> ValueIterator for ListValueIterator<O> {
    fn next(&mut self) -> bool {
        self.cursor.advance() != Advance::Done
    }

    fn data_type(&self) -> &DataType {
        self.cursor.data_type()
    }

    fn is_null(&self) -> bool {
        self.cursor.is_null()
    }

    fn value_as_element(&self) -> Result<Element> {
        let Some(mut items) = self.value()? else {
            return Ok(Element::Null);
        };
        let mut out = Vec::new();
        while items.next() {
            out.push(items.value_as_element()?);
        }
        Ok(Element::List(out))
    }
}

/// Rows of a struct column.
///
/// One child iterator per field is advanced in lock step with the parent, so
/// at every row the children are positioned on that row's field values.
#[derive(Debug)]
pub struct StructValueIterator {
    cursor: Cursor,
    fields: Fields,
    children: Vec<Box<dyn ValueIterator>>,
}

impl StructValueIterator {
    pub fn new(column: &Column) -> Result<Self> {
        let DataType::Struct(fields) = column.data_type() else {
            return Err(Error::Schema(format!(
                "column {:?} of type {} is not a struct",
                column.name(),
                column.data_type()
            )));
        };
        let children = fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let chunks = column
                    .chunks()
                    .iter()
                    .map(|chunk| Arc::clone(chunk.as_struct().column(i)))
                    .collect();
                new_value_iterator(&Column::try_new(Arc::clone(field), chunks)?)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            cursor: Cursor::new(column),
            fields: fields.clone(),
            children,
        })
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// The field iterators positioned on the current row, `None` when the
    /// row is null.
    #[track_caller]
    pub fn value(&self) -> Option<&[Box<dyn ValueIterator>]> {
        (!self.cursor.is_null()).then_some(self.children.as_slice())
    }
}

impl ValueIterator for StructValueIterator {
    fn next(&mut self) -> bool {
        let more = self.cursor.advance() != Advance::Done;
        for child in &mut self.children {
            child.next();
        }
        more
    }

    fn data_type(&self) -> &DataType {
        self.cursor.data_type()
    }

    fn is_null(&self) -> bool {
        self.cursor.is_null()
    }

    fn value_as_element(&self) -> Result<Element> {
        let Some(children) = self.value() else {
            return Ok(Element::Null);
        };
        let values = self
            .fields
            .iter()
            .zip(children)
            .map(|(field, child)| Ok((field.name().clone(), child.value_as_element()?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Element::Struct(values))
    }
}
