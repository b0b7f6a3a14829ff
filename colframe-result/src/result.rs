use crate::error::Error;

/// Result type alias used throughout colframe.
///
/// This is a type alias for `std::result::Result<T, Error>`, providing a
/// convenient shorthand for every fallible operation in the workspace.
pub type Result<T> = std::result::Result<T, Error>;
