//! Named, typed, chunked columns.

use std::fmt;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, new_empty_array};
use arrow::compute::concat;
use arrow::datatypes::{DataType, Field, FieldRef};
use colframe_result::{Error, Result};
use colframe_types::Element;

use crate::memory::{AllocatorRef, Reservation};

/// A field paired with an ordered list of Arrow chunks of the field's type.
///
/// Cloning a column shares its chunks; the clone keeps the buffers (and any
/// memory reservation made when the column was built) alive until the last
/// clone drops. Length and null count are always derived from the chunks.
#[derive(Clone)]
pub struct Column {
    inner: Arc<ColumnInner>,
}

struct ColumnInner {
    field: FieldRef,
    chunks: Vec<ArrayRef>,
    reservations: Vec<Arc<Reservation>>,
}

impl Column {
    /// Build a column from chunks without memory accounting.
    ///
    /// Fails when a chunk's data type differs from the field's.
    pub fn try_new(field: impl Into<FieldRef>, chunks: Vec<ArrayRef>) -> Result<Self> {
        let field = field.into();
        check_chunks(&field, &chunks)?;
        Ok(Self::from_parts(field, chunks, Vec::new()))
    }

    /// Build a column whose buffer size is reserved against `allocator`.
    pub fn try_new_in(
        allocator: &AllocatorRef,
        field: impl Into<FieldRef>,
        chunks: Vec<ArrayRef>,
    ) -> Result<Self> {
        let field = field.into();
        check_chunks(&field, &chunks)?;
        let bytes = chunks.iter().map(|c| c.get_array_memory_size()).sum();
        let reservation = Reservation::new(allocator, bytes);
        Ok(Self::from_parts(field, chunks, vec![reservation]))
    }

    /// Single-chunk column named `name`, nullable, typed after `array`.
    pub fn from_array(name: impl Into<String>, array: ArrayRef) -> Self {
        let field = Arc::new(Field::new(name, array.data_type().clone(), true));
        Self::from_parts(field, vec![array], Vec::new())
    }

    fn from_parts(
        field: FieldRef,
        chunks: Vec<ArrayRef>,
        reservations: Vec<Arc<Reservation>>,
    ) -> Self {
        Self {
            inner: Arc::new(ColumnInner {
                field,
                chunks,
                reservations,
            }),
        }
    }

    pub fn name(&self) -> &str {
        self.inner.field.name()
    }

    pub fn field(&self) -> &FieldRef {
        &self.inner.field
    }

    pub fn data_type(&self) -> &DataType {
        self.inner.field.data_type()
    }

    pub fn chunks(&self) -> &[ArrayRef] {
        &self.inner.chunks
    }

    pub fn num_chunks(&self) -> usize {
        self.inner.chunks.len()
    }

    pub fn len(&self) -> usize {
        self.inner.chunks.iter().map(|c| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        self.inner.chunks.iter().map(|c| c.null_count()).sum()
    }

    /// Number of live handles sharing this column.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Bytes reserved against an allocator on behalf of this column.
    pub fn reserved_bytes(&self) -> usize {
        self.inner.reservations.iter().map(|r| r.bytes()).sum()
    }

    /// Zero-copy view of `length` rows starting at `offset`, spanning chunks
    /// as needed. The view keeps the parent's reservations alive.
    pub fn slice(&self, offset: usize, length: usize) -> Result<Column> {
        let len = self.len();
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= len)
            .ok_or_else(|| {
                Error::InvalidArgumentError(format!(
                    "slice of {length} rows at offset {offset} is out of bounds for column {:?} of length {len}",
                    self.name()
                ))
            })?;

        let mut chunks = Vec::new();
        let mut chunk_start = 0;
        for chunk in &self.inner.chunks {
            if chunk_start >= end {
                break;
            }
            let chunk_end = chunk_start + chunk.len();
            let lo = offset.max(chunk_start);
            let hi = end.min(chunk_end);
            if lo < hi {
                chunks.push(chunk.slice(lo - chunk_start, hi - lo));
            }
            chunk_start = chunk_end;
        }
        Ok(Self::from_parts(
            Arc::clone(&self.inner.field),
            chunks,
            self.inner.reservations.clone(),
        ))
    }

    /// Same data under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Column {
        let field = self.inner.field.as_ref().clone().with_name(name);
        Self::from_parts(
            Arc::new(field),
            self.inner.chunks.clone(),
            self.inner.reservations.clone(),
        )
    }

    /// The column's rows as one contiguous array.
    pub fn concat(&self) -> Result<ArrayRef> {
        match self.inner.chunks.as_slice() {
            [] => Ok(new_empty_array(self.data_type())),
            [only] => Ok(Arc::clone(only)),
            chunks => {
                let refs: Vec<&dyn Array> = chunks.iter().map(|c| c.as_ref()).collect();
                Ok(concat(&refs)?)
            }
        }
    }

    /// Element at global row `index`.
    pub fn element(&self, index: usize) -> Result<Element> {
        let mut remaining = index;
        for chunk in &self.inner.chunks {
            if remaining < chunk.len() {
                return Element::from_array(chunk.as_ref(), remaining);
            }
            remaining -= chunk.len();
        }
        Err(Error::InvalidArgumentError(format!(
            "row {index} out of bounds for column {:?} of length {}",
            self.name(),
            self.len()
        )))
    }
}

fn check_chunks(field: &FieldRef, chunks: &[ArrayRef]) -> Result<()> {
    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.data_type() != field.data_type() {
            return Err(Error::Schema(format!(
                "chunk {i} of column {:?} has type {} but the field declares {}",
                field.name(),
                chunk.data_type(),
                field.data_type()
            )));
        }
    }
    Ok(())
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name())
            .field("data_type", self.data_type())
            .field("len", &self.len())
            .field("null_count", &self.null_count())
            .field("chunks", &self.num_chunks())
            .finish()
    }
}
