//! colframe: immutable in-memory columnar DataFrames on Arrow.
//!
//! This crate is the primary entrypoint for the colframe workspace. It
//! re-exports the DataFrame container, the join engine and the iteration
//! layer from the underlying `colframe-*` crates.
//!
//! # Quick Start
//!
//! ```rust
//! use colframe::{ColumnValues, DataFrame, DataFrameJoinExt, ValuesMap, default_allocator};
//!
//! let allocator = default_allocator();
//!
//! let mut people = ValuesMap::new();
//! people.insert("id".into(), ColumnValues::dynamic(vec![1i64, 2, 3]));
//! people.insert("name".into(), ColumnValues::dynamic(vec!["ann", "bob", "cy"]));
//! let people = DataFrame::from_values(&allocator, people).unwrap();
//!
//! let mut orders = ValuesMap::new();
//! orders.insert("id".into(), ColumnValues::dynamic(vec![1i64, 1, 3]));
//! orders.insert("total".into(), ColumnValues::dynamic(vec![9.5f64, 3.0, 1.25]));
//! let orders = DataFrame::from_values(&allocator, orders).unwrap();
//!
//! let joined = people.left_join(&orders, &["id"]).unwrap();
//! assert_eq!(joined.column_names(), vec!["id", "name", "total"]);
//! assert_eq!(joined.num_rows(), 4);
//! ```
//!
//! # Architecture
//!
//! colframe is organized as a layered workspace:
//!
//! - **Errors** (`colframe-result`): the shared [`Error`] type.
//! - **Values** (`colframe-types`): [`Element`] and its comparison functions.
//! - **Columns** (`colframe-column`): chunked [`Column`]s, memory accounting
//!   and [`ElementBuilder`].
//! - **Iteration** (`colframe-iter`): chunk, value and step iterators.
//! - **Container** (`colframe-frame`): the immutable [`DataFrame`].
//! - **Joins** (`colframe-join`): inner, left, right, outer and cross joins.
#![forbid(unsafe_code)]

pub use colframe_column::{
    Allocator, AllocatorRef, CheckedAllocator, Column, ColumnValues, ElementBuilder,
    UnaccountedAllocator, ValuesMap, default_allocator,
};
pub use colframe_frame::{DataFrame, MutationFn};
pub use colframe_join::{DataFrameJoinExt, JoinOptions, JoinType, join};
pub use colframe_result::{Error, Result, Side};
pub use colframe_types::{Element, eq, eq_strict};

pub mod iter {
    //! Iterators over columns and rows.

    pub use colframe_iter::*;
}

pub mod compare {
    //! Element comparison with explicit null semantics.

    pub use colframe_types::compare::*;
}

pub mod mutations {
    //! Transformations that compose through [`DataFrame::apply`](crate::DataFrame::apply).

    pub use colframe_frame::mutations::{MutationFn, drop, select, slice};
    pub use colframe_join::mutations::{
        cross_join, inner_join, join, left_join, outer_join, right_join,
    };
}

// Arrow is part of the public API: frames are built from and exported to
// Arrow arrays and record batches.
pub use arrow;
