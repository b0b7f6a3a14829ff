use std::fmt;

use arrow::datatypes::DataType;
use thiserror::Error;

/// Which operand of a binary operation (join, comparison) an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Unified error type for all colframe operations.
///
/// Every recoverable failure in the workspace is reported through this enum:
/// schema validation at construction time, lookups of named columns, type
/// conflicts while comparing or building elements, and configuration checks.
/// Errors propagate upward with `?`; no operation returns a partial result
/// alongside an error.
///
/// Programming errors (iterating past the end of a column, freeing more bytes
/// than were reserved) are not represented here. Those fail fast with a panic
/// because they indicate a bug in the caller rather than a data condition.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrow library error during columnar data operations.
    ///
    /// Raised when slicing, concatenating, interleaving or building Arrow
    /// arrays fails, or when a `RecordBatch` cannot be assembled from the
    /// materialized columns.
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// The shape of a DataFrame is inconsistent.
    ///
    /// This covers a field-count mismatch between schema and columns, a column
    /// whose field differs from the schema entry at the same position, and a
    /// column that is shorter than the declared row count.
    #[error("schema error: {0}")]
    Schema(String),

    /// A named column was not found on one operand.
    ///
    /// Join keys are validated against both operands before any output is
    /// built, so this error never leaves partially materialized columns behind.
    #[error("column {name:?} is not in {side} DataFrame (columns: {available:?})")]
    ColumnNotFound {
        name: String,
        side: Side,
        available: Vec<String>,
    },

    /// Invalid user input or API parameter, such as an out-of-range slice.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Two elements of incompatible concrete types were compared.
    ///
    /// Comparing, say, an `Int32` element with a `Utf8` element is reported
    /// instead of silently evaluating to `false`.
    #[error("cannot compare {left} with {right}")]
    TypeMismatch { left: String, right: String },

    /// A value does not match the declared type of the column it is appended to.
    #[error("inconsistent data types for elements, expecting {value} to be of type ({expected})")]
    InconsistentDataTypes { value: String, expected: String },

    /// Ordering comparisons are undefined when either operand is null.
    #[error("{0} not defined on null")]
    NullComparison(&'static str),

    /// Invalid configuration, such as identical join suffixes.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The logical type is not supported by the iteration or builder layer.
    #[error("unsupported data type: {0}")]
    UnsupportedType(DataType),

    /// Internal error indicating a bug or unexpected state.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create an inconsistent-data-types error from a displayable value and
    /// the name of the expected type.
    ///
    /// # Examples
    ///
    /// ```
    /// use colframe_result::Error;
    ///
    /// let err = Error::inconsistent_types(1.2, "int64");
    /// assert_eq!(
    ///     err.to_string(),
    ///     "inconsistent data types for elements, expecting 1.2 to be of type (int64)"
    /// );
    /// ```
    #[inline]
    pub fn inconsistent_types<V: fmt::Display, T: fmt::Display>(value: V, expected: T) -> Self {
        Error::InconsistentDataTypes {
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Create a type-mismatch error from the two operand type names.
    #[inline]
    pub fn type_mismatch<L: fmt::Display, R: fmt::Display>(left: L, right: R) -> Self {
        Error::TypeMismatch {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// Returns `true` when the error was caused by a type conflict, either in
    /// a comparison or while appending to a builder.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Error::TypeMismatch { .. } | Error::InconsistentDataTypes { .. }
        )
    }
}
