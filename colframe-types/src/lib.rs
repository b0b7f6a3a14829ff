//! Type-erased scalar values for colframe.
//!
//! Iteration over a column yields one [`Element`] per row. Elements carry
//! their concrete type, so the [`compare`] functions can reject comparisons
//! across incompatible types instead of silently returning `false`.
#![forbid(unsafe_code)]

pub mod compare;
pub mod element;
pub mod scalar;

pub use compare::{eq, eq_strict, greater, greater_eq, less, less_eq, neq};
pub use element::Element;
pub use scalar::elements_of;
