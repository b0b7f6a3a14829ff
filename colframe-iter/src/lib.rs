//! Uniform iteration over chunked, nullable, arbitrarily typed columns.
//!
//! Three layers build on each other:
//!
//! - [`ChunkIterator`] walks the Arrow chunks of one column.
//! - [`ValueIterator`] walks the rows of one column, hiding chunk boundaries
//!   and exposing each row as an [`Element`](colframe_types::Element).
//!   [`new_value_iterator`] picks the concrete iterator for a column's type.
//! - [`StepIterator`] advances several value iterators together, one row of
//!   every column per step. DataFrame equality and join key matching are
//!   built on it.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod nested;
pub mod step;
pub mod value;

pub use chunk::ChunkIterator;
pub use nested::{ListValueIterator, StructValueIterator};
pub use step::{StepIterator, StepMode, StepValue};
pub use value::{
    BinaryValueIterator, BooleanValueIterator, Elements, NullValueIterator,
    PrimitiveValueIterator, StringValueIterator, ValueIterator, column_elements,
    new_array_value_iterator, new_value_iterator,
};
