//! Reusable DataFrame transformations.
//!
//! A [`MutationFn`] maps one DataFrame to a new one. Mutations compose
//! through [`DataFrame::apply`], which feeds each result into the next.

use colframe_result::{Error, Result};

use crate::frame::DataFrame;

/// A transformation from one DataFrame to a new DataFrame.
pub type MutationFn = Box<dyn Fn(&DataFrame) -> Result<DataFrame> + Send + Sync>;

fn owned_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names.iter().map(|n| n.as_ref().to_string()).collect()
}

/// Keep only the named columns.
pub fn select<S: AsRef<str>>(names: &[S]) -> MutationFn {
    let names = owned_names(names);
    Box::new(move |df| {
        let columns = df.select_columns(names.as_slice());
        DataFrame::from_shape(df.allocator(), columns, df.num_rows())
    })
}

/// Remove the named columns.
pub fn drop<S: AsRef<str>>(names: &[S]) -> MutationFn {
    let names = owned_names(names);
    Box::new(move |df| {
        let columns = df.reject_columns(names.as_slice());
        DataFrame::from_shape(df.allocator(), columns, df.num_rows())
    })
}

/// Keep rows `[begin, end)`.
pub fn slice(begin: usize, end: usize) -> MutationFn {
    Box::new(move |df| {
        if end > df.num_rows() || begin > end {
            return Err(Error::InvalidArgumentError(format!(
                "slice [{begin}, {end}) out of range for DataFrame with {} rows",
                df.num_rows()
            )));
        }
        let columns = df
            .columns()
            .iter()
            .map(|c| c.slice(begin, end - begin))
            .collect::<Result<Vec<_>>>()?;
        DataFrame::from_shape(df.allocator(), columns, end - begin)
    })
}
