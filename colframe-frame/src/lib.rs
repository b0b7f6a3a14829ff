//! The colframe DataFrame.
//!
//! A [`DataFrame`] is an immutable, reference-counted set of named Arrow
//! columns with a shared row count. All operations return new frames that
//! share buffers with their sources wherever possible.
#![forbid(unsafe_code)]

pub mod frame;
pub mod mutations;

pub use frame::DataFrame;
pub use mutations::MutationFn;
