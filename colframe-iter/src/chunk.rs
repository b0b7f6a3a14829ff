use arrow::array::ArrayRef;
use arrow::datatypes::DataType;
use colframe_column::Column;

/// Walks the chunks of a column in order.
///
/// The iterator holds its own handle on the column, so the chunks stay
/// alive for as long as the iterator does even if every other handle is
/// dropped.
#[derive(Debug, Clone)]
pub struct ChunkIterator {
    column: Column,
    position: usize,
    current: Option<ArrayRef>,
    len: usize,
    null_count: usize,
}

impl ChunkIterator {
    pub fn new(column: &Column) -> Self {
        Self {
            column: column.clone(),
            position: 0,
            current: None,
            len: column.len(),
            null_count: column.null_count(),
        }
    }

    /// Advance to the next chunk. Returns `false` once every chunk has been
    /// visited.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        match self.column.chunks().get(self.position) {
            Some(chunk) => {
                self.current = Some(ArrayRef::clone(chunk));
                self.position += 1;
                true
            }
            None => {
                self.current = None;
                false
            }
        }
    }

    /// The chunk reached by the last successful [`ChunkIterator::next`].
    pub fn chunk(&self) -> Option<&ArrayRef> {
        self.current.as_ref()
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn data_type(&self) -> &DataType {
        self.column.data_type()
    }

    /// Total rows across all chunks.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn null_count(&self) -> usize {
        self.null_count
    }
}
