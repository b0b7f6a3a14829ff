//! Columns for colframe.
//!
//! A [`Column`] is a named, typed sequence of Arrow chunks. Columns are the
//! unit of sharing between DataFrames: selecting, slicing and joining all
//! hand out clones of existing columns or build new ones through
//! [`ElementBuilder`]. Buffers built by the engine are accounted through an
//! [`Allocator`] so that leaks show up in tests.
#![forbid(unsafe_code)]

pub mod builder;
pub mod column;
pub mod memory;
pub mod values;

pub use builder::ElementBuilder;
pub use column::Column;
pub use memory::{
    Allocator, AllocatorRef, CheckedAllocator, Reservation, UnaccountedAllocator,
    default_allocator,
};
pub use values::{ColumnValues, ValuesMap};
