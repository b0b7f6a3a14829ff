//! Joins packaged as [`MutationFn`]s.
//!
//! The frame a mutation is applied to is the left operand; the right operand
//! is captured when the mutation is created.
//!
//! ```
//! use colframe_column::{ColumnValues, ValuesMap, default_allocator};
//! use colframe_frame::{DataFrame, mutations::select};
//! use colframe_join::{JoinOptions, mutations::join};
//!
//! let allocator = default_allocator();
//! let mut left = ValuesMap::new();
//! left.insert("id".into(), ColumnValues::dynamic(vec![1i64, 2, 3]));
//! left.insert("x".into(), ColumnValues::dynamic(vec![10i64, 20, 30]));
//! let mut right = ValuesMap::new();
//! right.insert("id".into(), ColumnValues::dynamic(vec![2i64, 3]));
//! right.insert("y".into(), ColumnValues::dynamic(vec![200i64, 300]));
//! let left = DataFrame::from_values(&allocator, left).unwrap();
//! let right = DataFrame::from_values(&allocator, right).unwrap();
//!
//! let joined = left
//!     .apply([join(&right, &["id"], JoinOptions::inner()), select(&["id", "y"])])
//!     .unwrap();
//! assert_eq!(joined.column_names(), vec!["id", "y"]);
//! assert_eq!(joined.num_rows(), 2);
//! ```

use colframe_frame::{DataFrame, MutationFn};

use crate::JoinOptions;

fn owned_keys<S: AsRef<str>>(keys: &[S]) -> Vec<String> {
    keys.iter().map(|k| k.as_ref().to_string()).collect()
}

/// Join the input frame with `right` using `options`.
pub fn join<S: AsRef<str>>(right: &DataFrame, keys: &[S], options: JoinOptions) -> MutationFn {
    let right = right.clone();
    let keys = owned_keys(keys);
    Box::new(move |left| crate::join(left, &right, &keys, &options))
}

pub fn inner_join<S: AsRef<str>>(right: &DataFrame, keys: &[S]) -> MutationFn {
    join(right, keys, JoinOptions::inner())
}

pub fn left_join<S: AsRef<str>>(right: &DataFrame, keys: &[S]) -> MutationFn {
    join(right, keys, JoinOptions::left())
}

pub fn right_join<S: AsRef<str>>(right: &DataFrame, keys: &[S]) -> MutationFn {
    join(right, keys, JoinOptions::right())
}

pub fn outer_join<S: AsRef<str>>(right: &DataFrame, keys: &[S]) -> MutationFn {
    join(right, keys, JoinOptions::outer())
}

pub fn cross_join(right: &DataFrame) -> MutationFn {
    join::<&str>(right, &[], JoinOptions::cross())
}
