//! Error types and result definitions for colframe.
//!
//! This crate provides the unified error type ([`Error`]) and result alias
//! ([`Result<T>`]) used by every colframe crate, so failures propagate across
//! crate boundaries with `?` and callers can match on specific variants.
//!
//! # Error Categories
//!
//! - **Schema errors** ([`Error::Schema`]): field-count mismatch, column shorter than the row count
//! - **Lookup errors** ([`Error::ColumnNotFound`]): missing join key or column
//! - **Type errors** ([`Error::TypeMismatch`], [`Error::InconsistentDataTypes`]): incompatible elements
//! - **Configuration errors** ([`Error::Configuration`]): invalid join options
//! - **Data format errors** ([`Error::Arrow`]): failures reported by the array library
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states

pub mod error;
pub mod result;

pub use error::{Error, Side};
pub use result::Result;
