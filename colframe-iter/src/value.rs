//! Row-by-row iteration over a single column of any supported type.
//!
//! Every iterator starts positioned *before* the first row: call `next()`
//! first and read the current row only while the last `next()` returned
//! `true`. Reading a row before the first `next()` or after the iterator is
//! exhausted is a bug in the caller and panics. Chunk boundaries, including
//! empty chunks, are crossed transparently.

use std::fmt;
use std::marker::PhantomData;

use arrow::array::{Array, ArrayRef, AsArray, OffsetSizeTrait, PrimitiveArray};
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Date32Type, Date64Type, Decimal128Type,
    DurationMicrosecondType, DurationMillisecondType, DurationNanosecondType, DurationSecondType,
    FieldRef, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type,
    Time32MillisecondType, Time32SecondType, Time64MicrosecondType, Time64NanosecondType,
    TimeUnit, TimestampMicrosecondType, TimestampMillisecondType, TimestampNanosecondType,
    TimestampSecondType, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use colframe_column::Column;
use colframe_result::{Error, Result};
use colframe_types::Element;

use crate::chunk::ChunkIterator;
use crate::nested::{ListValueIterator, StructValueIterator};

/// Uniform row cursor over one column.
pub trait ValueIterator: Send + fmt::Debug {
    /// Move to the next row. Returns `false` once the column is exhausted.
    fn next(&mut self) -> bool;

    /// Logical type of the column being iterated.
    fn data_type(&self) -> &DataType;

    /// Whether the current row is null.
    fn is_null(&self) -> bool;

    /// The current row as an owned element.
    fn value_as_element(&self) -> Result<Element>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    /// Moved within the current chunk.
    Same,
    /// Moved to the first row of a new chunk.
    NewChunk,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Fresh,
    Active,
    Exhausted,
}

/// Row position shared by all value iterators: a chunk iterator plus the
/// index of the current row inside the current chunk.
#[derive(Debug)]
pub(crate) struct Cursor {
    chunks: ChunkIterator,
    index: usize,
    state: CursorState,
}

impl Cursor {
    pub(crate) fn new(column: &Column) -> Self {
        Self {
            chunks: ChunkIterator::new(column),
            index: 0,
            state: CursorState::Fresh,
        }
    }

    pub(crate) fn data_type(&self) -> &DataType {
        self.chunks.data_type()
    }

    pub(crate) fn advance(&mut self) -> Advance {
        match self.state {
            CursorState::Exhausted => return Advance::Done,
            CursorState::Active => {
                if let Some(chunk) = self.chunks.chunk()
                    && self.index + 1 < chunk.len()
                {
                    self.index += 1;
                    return Advance::Same;
                }
            }
            CursorState::Fresh => {}
        }
        while self.chunks.next() {
            if self.chunks.chunk().is_some_and(|c| !c.is_empty()) {
                self.index = 0;
                self.state = CursorState::Active;
                return Advance::NewChunk;
            }
        }
        self.state = CursorState::Exhausted;
        Advance::Done
    }

    #[track_caller]
    pub(crate) fn position(&self) -> (&ArrayRef, usize) {
        match (self.state, self.chunks.chunk()) {
            (CursorState::Active, Some(chunk)) => (chunk, self.index),
            (CursorState::Fresh, _) => panic!(
                "{} value iterator read before the first call to next()",
                self.data_type()
            ),
            _ => panic!(
                "{} value iterator read after it was exhausted",
                self.data_type()
            ),
        }
    }

    #[track_caller]
    pub(crate) fn is_null(&self) -> bool {
        let (chunk, index) = self.position();
        chunk.is_null(index)
    }

    #[track_caller]
    pub(crate) fn element(&self) -> Result<Element> {
        let (chunk, index) = self.position();
        Element::from_array(chunk.as_ref(), index)
    }
}

/// Values of a primitive column: integers, floats, dates, times,
/// timestamps, durations and decimals.
pub struct PrimitiveValueIterator<T: ArrowPrimitiveType> {
    cursor: Cursor,
    _type: PhantomData<fn() -> T>,
}

impl<T: ArrowPrimitiveType> PrimitiveValueIterator<T> {
    pub fn new(column: &Column) -> Result<Self> {
        if !PrimitiveArray::<T>::is_compatible(column.data_type()) {
            return Err(incompatible(column, &T::DATA_TYPE));
        }
        Ok(Self {
            cursor: Cursor::new(column),
            _type: PhantomData,
        })
    }

    /// The current row, `None` when null.
    #[track_caller]
    pub fn value(&self) -> Option<T::Native> {
        let (chunk, index) = self.cursor.position();
        let array = chunk.as_primitive::<T>();
        (!array.is_null(index)).then(|| array.value(index))
    }
}

impl<T: ArrowPrimitiveType> fmt::Debug for PrimitiveValueIterator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveValueIterator")
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<T: ArrowPrimitiveType> ValueIterator for PrimitiveValueIterator<T> {
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
        self.cursor.element()
    }
}

/// Values of a boolean column.
#[derive(Debug)]
pub struct BooleanValueIterator {
    cursor: Cursor,
}

impl BooleanValueIterator {
    pub fn new(column: &Column) -> Result<Self> {
        if column.data_type() != &DataType::Boolean {
            return Err(incompatible(column, &DataType::Boolean));
        }
        Ok(Self {
            cursor: Cursor::new(column),
        })
    }

    #[track_caller]
    pub fn value(&self) -> Option<bool> {
        let (chunk, index) = self.cursor.position();
        let array = chunk.as_boolean();
        (!array.is_null(index)).then(|| array.value(index))
    }
}

impl ValueIterator for BooleanValueIterator {
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
        self.cursor.element()
    }
}

/// Values of a `Utf8` (`O = i32`) or `LargeUtf8` (`O = i64`) column.
pub struct StringValueIterator<O: OffsetSizeTrait> {
    cursor: Cursor,
    _offset: PhantomData<fn() -> O>,
}

impl<O: OffsetSizeTrait> StringValueIterator<O> {
    pub fn new(column: &Column) -> Result<Self> {
        let expected = if O::IS_LARGE {
            DataType::LargeUtf8
        } else {
            DataType::Utf8
        };
        if column.data_type() != &expected {
            return Err(incompatible(column, &expected));
        }
        Ok(Self {
            cursor: Cursor::new(column),
            _offset: PhantomData,
        })
    }

    #[track_caller]
    pub fn value(&self) -> Option<&str> {
        let (chunk, index) = self.cursor.position();
        let array = chunk.as_string::<O>();
        (!array.is_null(index)).then(|| array.value(index))
    }
}

impl<O: OffsetSizeTrait> fmt::Debug for StringValueIterator<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringValueIterator")
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<O: OffsetSizeTrait> ValueIterator for StringValueIterator<O> {
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
        self.cursor.element()
    }
}

/// Values of a `Binary` or `LargeBinary` column.
pub struct BinaryValueIterator<O: OffsetSizeTrait> {
    cursor: Cursor,
    _offset: PhantomData<fn() -> O>,
}

impl<O: OffsetSizeTrait> BinaryValueIterator<O> {
    pub fn new(column: &Column) -> Result<Self> {
        let expected = if O::IS_LARGE {
            DataType::LargeBinary
        } else {
            DataType::Binary
        };
        if column.data_type() != &expected {
            return Err(incompatible(column, &expected));
        }
        Ok(Self {
            cursor: Cursor::new(column),
            _offset: PhantomData,
        })
    }

    #[track_caller]
    pub fn value(&self) -> Option<&[u8]> {
        let (chunk, index) = self.cursor.position();
        let array = chunk.as_binary::<O>();
        (!array.is_null(index)).then(|| array.value(index))
    }
}

impl<O: OffsetSizeTrait> fmt::Debug for BinaryValueIterator<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryValueIterator")
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<O: OffsetSizeTrait> ValueIterator for BinaryValueIterator<O> {
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
        self.cursor.element()
    }
}

/// Rows of a `Null` typed column; every row is null.
#[derive(Debug)]
pub struct NullValueIterator {
    cursor: Cursor,
}

impl NullValueIterator {
    pub fn new(column: &Column) -> Result<Self> {
        if column.data_type() != &DataType::Null {
            return Err(incompatible(column, &DataType::Null));
        }
        Ok(Self {
            cursor: Cursor::new(column),
        })
    }
}

impl ValueIterator for NullValueIterator {
    fn next(&mut self) -> bool {
        self.cursor.advance() != Advance::Done
    }

    fn data_type(&self) -> &DataType {
        self.cursor.data_type()
    }

    fn is_null(&self) -> bool {
        self.cursor.position();
        true
    }

    fn value_as_element(&self) -> Result<Element> {
        self.cursor.position();
        Ok(Element::Null)
    }
}

fn incompatible(column: &Column, expected: &DataType) -> Error {
    Error::Schema(format!(
        "column {:?} of type {} cannot be iterated as {expected}",
        column.name(),
        column.data_type()
    ))
}

/// Fails with [`Error::UnsupportedType`] unless every level of `dt` can be
/// iterated.
pub(crate) fn check_supported(dt: &DataType) -> Result<()> {
    match dt {
        DataType::Null
        | DataType::Boolean
        | DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Float32
        | DataType::Float64
        | DataType::Date32
        | DataType::Date64
        | DataType::Time32(TimeUnit::Second | TimeUnit::Millisecond)
        | DataType::Time64(TimeUnit::Microsecond | TimeUnit::Nanosecond)
        | DataType::Timestamp(_, _)
        | DataType::Duration(_)
        | DataType::Decimal128(_, _)
        | DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Binary
        | DataType::LargeBinary => Ok(()),
        DataType::List(child) | DataType::LargeList(child) => check_supported(child.data_type()),
        DataType::Struct(fields) => fields
            .iter()
            .try_for_each(|f| check_supported(f.data_type())),
        other => Err(Error::UnsupportedType(other.clone())),
    }
}

/// Build the value iterator matching the column's logical type.
pub fn new_value_iterator(column: &Column) -> Result<Box<dyn ValueIterator>> {
    macro_rules! primitive {
        ($t:ty) => {
            Box::new(PrimitiveValueIterator::<$t>::new(column)?)
        };
    }

    let iterator: Box<dyn ValueIterator> = match column.data_type() {
        DataType::Null => Box::new(NullValueIterator::new(column)?),
        DataType::Boolean => Box::new(BooleanValueIterator::new(column)?),
        DataType::Int8 => primitive!(Int8Type),
        DataType::Int16 => primitive!(Int16Type),
        DataType::Int32 => primitive!(Int32Type),
        DataType::Int64 => primitive!(Int64Type),
        DataType::UInt8 => primitive!(UInt8Type),
        DataType::UInt16 => primitive!(UInt16Type),
        DataType::UInt32 => primitive!(UInt32Type),
        DataType::UInt64 => primitive!(UInt64Type),
        DataType::Float32 => primitive!(Float32Type),
        DataType::Float64 => primitive!(Float64Type),
        DataType::Date32 => primitive!(Date32Type),
        DataType::Date64 => primitive!(Date64Type),
        DataType::Time32(TimeUnit::Second) => primitive!(Time32SecondType),
        DataType::Time32(TimeUnit::Millisecond) => primitive!(Time32MillisecondType),
        DataType::Time64(TimeUnit::Microsecond) => primitive!(Time64MicrosecondType),
        DataType::Time64(TimeUnit::Nanosecond) => primitive!(Time64NanosecondType),
        DataType::Timestamp(TimeUnit::Second, _) => primitive!(TimestampSecondType),
        DataType::Timestamp(TimeUnit::Millisecond, _) => primitive!(TimestampMillisecondType),
        DataType::Timestamp(TimeUnit::Microsecond, _) => primitive!(TimestampMicrosecondType),
        DataType::Timestamp(TimeUnit::Nanosecond, _) => primitive!(TimestampNanosecondType),
        DataType::Duration(TimeUnit::Second) => primitive!(DurationSecondType),
        DataType::Duration(TimeUnit::Millisecond) => primitive!(DurationMillisecondType),
        DataType::Duration(TimeUnit::Microsecond) => primitive!(DurationMicrosecondType),
        DataType::Duration(TimeUnit::Nanosecond) => primitive!(DurationNanosecondType),
        DataType::Decimal128(_, _) => primitive!(Decimal128Type),
        DataType::Utf8 => Box::new(StringValueIterator::<i32>::new(column)?),
        DataType::LargeUtf8 => Box::new(StringValueIterator::<i64>::new(column)?),
        DataType::Binary => Box::new(BinaryValueIterator::<i32>::new(column)?),
        DataType::LargeBinary => Box::new(BinaryValueIterator::<i64>::new(column)?),
        DataType::List(_) => Box::new(ListValueIterator::<i32>::new(column)?),
        DataType::LargeList(_) => Box::new(ListValueIterator::<i64>::new(column)?),
        DataType::Struct(_) => Box::new(StructValueIterator::new(column)?),
        other => return Err(Error::UnsupportedType(other.clone())),
    };
    Ok(iterator)
}

/// Build a value iterator over a bare array described by `field`.
pub fn new_array_value_iterator(
    field: FieldRef,
    array: ArrayRef,
) -> Result<Box<dyn ValueIterator>> {
    let column = Column::try_new(field, vec![array])?;
    new_value_iterator(&column)
}

/// Adapts a value iterator into a standard [`Iterator`] of elements.
#[derive(Debug)]
pub struct Elements {
    inner: Box<dyn ValueIterator>,
}

impl Elements {
    pub fn new(inner: Box<dyn ValueIterator>) -> Self {
        Self { inner }
    }
}

impl Iterator for Elements {
    type Item = Result<Element>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().then(|| self.inner.value_as_element())
    }
}

/// Every row of `column` as an element.
pub fn column_elements(column: &Column) -> Result<Vec<Element>> {
    Elements::new(new_value_iterator(column)?).collect()
}
