//! Integration tests for DataFrame joins.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use colframe_column::{AllocatorRef, ColumnValues, ValuesMap};
use colframe_frame::{DataFrame, mutations};
use colframe_iter::column_elements;
use colframe_join::{DataFrameJoinExt, JoinOptions, join};
use colframe_result::{Error, Side};
use colframe_test_utils::checked_allocator;
use colframe_types::Element;

fn frame(allocator: &AllocatorRef, columns: Vec<(&str, ColumnValues)>) -> DataFrame {
    let values: ValuesMap = columns
        .into_iter()
        .map(|(name, values)| (name.to_string(), values))
        .collect();
    DataFrame::from_values(allocator, values).unwrap()
}

fn col<T: Into<Element> + Clone>(values: &[T]) -> ColumnValues {
    ColumnValues::dynamic(values.to_vec())
}

fn elems<T: Into<Element> + Clone>(values: &[T]) -> Vec<Element> {
    values.iter().cloned().map(Into::into).collect()
}

fn values_of(df: &DataFrame, name: &str) -> Vec<Element> {
    let column = df.column(name).expect("column exists");
    column_elements(&column.slice(0, df.num_rows()).unwrap()).unwrap()
}

fn assert_columns(df: &DataFrame, expected: &[(&str, Vec<Element>)]) {
    let names: Vec<&str> = expected.iter().map(|(name, _)| *name).collect();
    assert_eq!(df.column_names(), names);
    for (name, values) in expected {
        assert_eq!(&values_of(df, name), values, "column {name}");
    }
}

/// Left `{A, B, C, D}` and right `{A, D, F}`, all `f64`.
fn abcd_and_adf(
    allocator: &AllocatorRef,
    right_a: &[f64],
    right_f: &[f64],
    right_d: &[f64],
) -> (DataFrame, DataFrame) {
    let left = frame(
        allocator,
        vec![
            ("A", col(&[5.0, 2.0, 3.0, 1.0])),
            ("B", col(&[6.0, 4.0, 3.0, 2.0])),
            ("C", col(&[1.7, 2.3, 2.3, 7.8])),
            ("D", col(&[5.0, 1.0, 0.0, 0.0])),
        ],
    );
    let right = frame(
        allocator,
        vec![("A", col(right_a)), ("F", col(right_f)), ("D", col(right_d))],
    );
    (left, right)
}

#[test]
fn test_left_join_on_two_keys() {
    let (checked, allocator) = checked_allocator();
    {
        let left = frame(
            &allocator,
            vec![
                ("A", col(&[5.0f32, 2.0, 3.0, 1.0])),
                ("B", col(&[6.0, 4.0, 3.0, 2.0])),
                ("C", col(&[1.7, 2.3, 2.3, 7.8])),
                ("D", col(&[5.0, 1.0, 0.0, 0.0])),
            ],
        );
        let right = frame(
            &allocator,
            vec![
                ("A", col(&[5.0f32, 4.0, 2.0, 5.0])),
                ("F", col(&[7.0, 3.0, 5.0, 8.0])),
                ("D", col(&[5.0, 0.0, 0.0, 0.0])),
            ],
        );

        let joined = left.left_join(&right, &["A", "D"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[5.0f32, 2.0, 3.0, 1.0])),
                ("D", elems(&[5.0, 1.0, 0.0, 0.0])),
                ("B", elems(&[6.0, 4.0, 3.0, 2.0])),
                ("C", elems(&[1.7, 2.3, 2.3, 7.8])),
                ("F", elems(&[Some(7.0), None, None, None])),
            ],
        );
        assert!(joined.schema().field_with_name("F").unwrap().is_nullable());
    }
    checked.assert_size(0);
}

#[test]
fn test_left_join_replicates_rows_with_several_matches() {
    let (checked, allocator) = checked_allocator();
    {
        let (left, right) = abcd_and_adf(
            &allocator,
            &[5.0, 4.0, 2.0, 5.0, 3.0, 3.0],
            &[7.0, 3.0, 5.0, 8.0, 99.0, 44.0],
            &[5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        );

        let joined = left.left_join(&right, &["A", "D"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[5.0, 2.0, 3.0, 3.0, 1.0])),
                ("D", elems(&[5.0, 1.0, 0.0, 0.0, 0.0])),
                ("B", elems(&[6.0, 4.0, 3.0, 3.0, 2.0])),
                ("C", elems(&[1.7, 2.3, 2.3, 2.3, 7.8])),
                ("F", elems(&[Some(7.0), None, Some(99.0), Some(44.0), None])),
            ],
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_left_join_on_one_key_suffixes_colliding_columns() {
    let (checked, allocator) = checked_allocator();
    {
        let (left, right) = abcd_and_adf(
            &allocator,
            &[5.0, 4.0, 2.0, 5.0, 3.0, 3.0],
            &[7.0, 3.0, 5.0, 8.0, 99.0, 44.0],
            &[5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        );

        let joined = left.left_join(&right, &["A"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[5.0, 5.0, 2.0, 3.0, 3.0, 1.0])),
                ("B", elems(&[6.0, 6.0, 4.0, 3.0, 3.0, 2.0])),
                ("C", elems(&[1.7, 1.7, 2.3, 2.3, 2.3, 7.8])),
                ("D_0", elems(&[5.0, 5.0, 1.0, 0.0, 0.0, 0.0])),
                (
                    "D_1",
                    elems(&[Some(5.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0), None]),
                ),
                (
                    "F",
                    elems(&[Some(7.0), Some(8.0), Some(5.0), Some(99.0), Some(44.0), None]),
                ),
            ],
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_right_join_leads_with_right_columns() {
    let (checked, allocator) = checked_allocator();
    {
        let (left, right) = abcd_and_adf(
            &allocator,
            &[5.0, 4.0, 2.0, 5.0],
            &[7.0, 3.0, 5.0, 8.0],
            &[5.0, 0.0, 0.0, 0.0],
        );

        let joined = left.right_join(&right, &["A", "D"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[5.0, 4.0, 2.0, 5.0])),
                ("D", elems(&[5.0, 0.0, 0.0, 0.0])),
                ("F", elems(&[7.0, 3.0, 5.0, 8.0])),
                ("B", elems(&[Some(6.0), None, None, None])),
                ("C", elems(&[Some(1.7), None, None, None])),
            ],
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_right_join_replicates_right_rows() {
    let (checked, allocator) = checked_allocator();
    {
        let left = frame(
            &allocator,
            vec![
                ("A", col(&[5.0, 2.0, 5.0, 1.0, 4.0])),
                ("B", col(&[6.0, 4.0, 3.0, 2.0, 9.0])),
                ("C", col(&[1.7, 2.3, 2.3, 7.8, 9.1])),
                ("D", col(&[5.0, 1.0, 5.0, 0.0, 0.0])),
            ],
        );
        let right = frame(
            &allocator,
            vec![
                ("A", col(&[5.0, 4.0, 8.0])),
                ("F", col(&[7.0, 3.0, 8.0])),
                ("D", col(&[5.0, 0.0, 8.0])),
            ],
        );

        let joined = left.right_join(&right, &["A", "D"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[5.0, 5.0, 4.0, 8.0])),
                ("D", elems(&[5.0, 5.0, 0.0, 8.0])),
                ("F", elems(&[7.0, 7.0, 3.0, 8.0])),
                ("B", elems(&[Some(6.0), Some(3.0), Some(9.0), None])),
                ("C", elems(&[Some(1.7), Some(2.3), Some(9.1), None])),
            ],
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_right_join_swaps_suffixes() {
    let (checked, allocator) = checked_allocator();
    {
        let (left, right) = abcd_and_adf(
            &allocator,
            &[5.0, 4.0, 2.0, 5.0, 3.0, 3.0],
            &[7.0, 3.0, 5.0, 8.0, 99.0, 44.0],
            &[5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        );

        let joined = left.right_join(&right, &["A"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[5.0, 4.0, 2.0, 5.0, 3.0, 3.0])),
                ("D_1", elems(&[5.0, 0.0, 0.0, 0.0, 0.0, 0.0])),
                ("F", elems(&[7.0, 3.0, 5.0, 8.0, 99.0, 44.0])),
                (
                    "B",
                    elems(&[Some(6.0), None, Some(4.0), Some(6.0), Some(3.0), Some(3.0)]),
                ),
                (
                    "C",
                    elems(&[Some(1.7), None, Some(2.3), Some(1.7), Some(2.3), Some(2.3)]),
                ),
                (
                    "D_0",
                    elems(&[Some(5.0), None, Some(1.0), Some(5.0), Some(0.0), Some(0.0)]),
                ),
            ],
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_custom_suffixes() {
    let (checked, allocator) = checked_allocator();
    {
        let (left, right) = abcd_and_adf(
            &allocator,
            &[5.0, 4.0, 2.0, 5.0, 3.0, 3.0],
            &[7.0, 3.0, 5.0, 8.0, 99.0, 44.0],
            &[5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        );

        let options = JoinOptions::right()
            .with_lsuffix("_left")
            .with_rsuffix("_right");
        let joined = left.join_with(&right, &["A"], &options).unwrap();
        assert_eq!(
            joined.column_names(),
            vec!["A", "D_right", "F", "B", "C", "D_left"]
        );
        assert_eq!(
            values_of(&joined, "D_left"),
            elems(&[Some(5.0), None, Some(1.0), Some(5.0), Some(0.0), Some(0.0)])
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_inner_join_drops_unmatched_rows() {
    let (checked, allocator) = checked_allocator();
    {
        let left = frame(
            &allocator,
            vec![
                ("A", col(&[1.0, 7.0, 6.0, 1.0])),
                ("B", col(&[2.1, 2.2, 2.3, 2.4])),
                ("C", col(&[3.3, 8.0, 8.0, 1.1])),
                ("D", col(&[5.0, 3.0, 2.0, 0.0])),
            ],
        );
        let right = frame(
            &allocator,
            vec![
                ("A", col(&[2.0, 0.0, 6.0, 1.0, 6.0])),
                ("F", col(&[2.0, 5.0, 2.0, 8.0, 9.0])),
                ("D", col(&[2.0, 7.0, 2.0, 2.0, 2.0])),
            ],
        );

        let joined = left.inner_join(&right, &["A", "D"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[6.0, 6.0])),
                ("D", elems(&[2.0, 2.0])),
                ("B", elems(&[2.3, 2.3])),
                ("C", elems(&[8.0, 8.0])),
                ("F", elems(&[2.0, 9.0])),
            ],
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_inner_join_without_matches_is_empty() {
    let (checked, allocator) = checked_allocator();
    {
        let left = frame(&allocator, vec![("k", col(&[1i64, 2])), ("x", col(&["a", "b"]))]);
        let right = frame(&allocator, vec![("k", col(&[3i64])), ("y", col(&[true]))]);

        let joined = left.inner_join(&right, &["k"]).unwrap();
        assert_eq!(joined.dims(), (3, 0));
        assert_eq!(
            joined.schema().field_with_name("y").unwrap().data_type(),
            &DataType::Boolean
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_outer_join_appends_unmatched_right_rows() {
    let (checked, allocator) = checked_allocator();
    {
        let left = frame(
            &allocator,
            vec![
                ("A", col(&[5i32, 2, 3, 1])),
                ("B", col(&[6.0, 4.0, 3.0, 2.0])),
                ("C", col(&[1.7, 2.3, 2.3, 7.8])),
                ("D", col(&[5i64, 1, 0, 0])),
            ],
        );
        let right = frame(
            &allocator,
            vec![
                ("A", col(&[5i32, 4, 2, 5])),
                ("F", col(&[7.0, 3.0, 5.0, 8.0])),
                ("D", col(&[5i64, 0, 0, 0])),
            ],
        );

        let joined = left.outer_join(&right, &["A", "D"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[5i32, 2, 3, 1, 4, 2, 5])),
                ("D", elems(&[5i64, 1, 0, 0, 0, 0, 0])),
                (
                    "B",
                    elems(&[Some(6.0), Some(4.0), Some(3.0), Some(2.0), None, None, None]),
                ),
                (
                    "C",
                    elems(&[Some(1.7), Some(2.3), Some(2.3), Some(7.8), None, None, None]),
                ),
                (
                    "F",
                    elems(&[Some(7.0), None, None, None, Some(3.0), Some(5.0), Some(8.0)]),
                ),
            ],
        );
        assert!(joined.fields().iter().all(|f| f.is_nullable()));
    }
    checked.assert_size(0);
}

#[test]
fn test_outer_join_on_one_key() {
    let (checked, allocator) = checked_allocator();
    {
        let left = frame(
            &allocator,
            vec![
                ("A", col(&[5u8, 2, 3, 1])),
                ("B", col(&[6.0, 4.0, 3.0, 2.0])),
                ("C", col(&[1.7, 2.3, 2.3, 7.8])),
                ("D", col(&[5i16, 1, 0, 0])),
            ],
        );
        let right = frame(
            &allocator,
            vec![
                ("A", col(&[5u8, 4, 2, 5])),
                ("F", col(&[7i8, 3, 5, 8])),
                ("D", col(&[5i16, 0, 0, 0])),
            ],
        );

        let joined = left.outer_join(&right, &["A"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[5u8, 5, 2, 3, 1, 4])),
                ("B", elems(&[Some(6.0), Some(6.0), Some(4.0), Some(3.0), Some(2.0), None])),
                ("C", elems(&[Some(1.7), Some(1.7), Some(2.3), Some(2.3), Some(7.8), None])),
                ("D_0", elems(&[Some(5i16), Some(5), Some(1), Some(0), Some(0), None])),
                ("D_1", elems(&[Some(5i16), Some(0), Some(0), None, None, Some(0)])),
                ("F", elems(&[Some(7i8), Some(8), Some(5), None, None, Some(3)])),
            ],
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_null_keys_never_match() {
    let (checked, allocator) = checked_allocator();
    {
        let left = frame(
            &allocator,
            vec![
                ("A", col(&[None, Some(2i64), Some(3), Some(1)])),
                ("B", col(&[6.0, 4.0, 3.0, 2.0])),
                ("C", col(&[1.7, 2.3, 2.3, 7.8])),
                ("D", col(&[5i64, 1, 0, 0])),
            ],
        );
        let right = frame(
            &allocator,
            vec![
                ("A", col(&[None, Some(4i64), Some(2), Some(5)])),
                ("F", col(&[7.0, 3.0, 5.0, 8.0])),
                ("D", col(&[5i64, 0, 0, 0])),
            ],
        );

        let joined = left.outer_join(&right, &["A", "D"]).unwrap();
        assert_columns(
            &joined,
            &[
                (
                    "A",
                    elems(&[None, Some(2i64), Some(3), Some(1), None, Some(4), Some(2), Some(5)]),
                ),
                ("D", elems(&[5i64, 1, 0, 0, 5, 0, 0, 0])),
                (
                    "B",
                    elems(&[
                        Some(6.0),
                        Some(4.0),
                        Some(3.0),
                        Some(2.0),
                        None,
                        None,
                        None,
                        None,
                    ]),
                ),
                (
                    "C",
                    elems(&[
                        Some(1.7),
                        Some(2.3),
                        Some(2.3),
                        Some(7.8),
                        None,
                        None,
                        None,
                        None,
                    ]),
                ),
                (
                    "F",
                    elems(&[
                        None,
                        None,
                        None,
                        None,
                        Some(7.0),
                        Some(3.0),
                        Some(5.0),
                        Some(8.0),
                    ]),
                ),
            ],
        );

        // The same null cells are equal under structural comparison.
        let copy = frame(
            &allocator,
            vec![("A", col(&[None, Some(2i64), Some(3), Some(1)]))],
        );
        assert!(left.select(&["A"]).unwrap().equals(&copy));
        assert_eq!(left.inner_join(&right, &["A"]).unwrap().num_rows(), 1);
    }
    checked.assert_size(0);
}

#[test]
fn test_cross_join_pairs_every_row() {
    let (checked, allocator) = checked_allocator();
    {
        let left = frame(
            &allocator,
            vec![
                ("A", col(&[5i64, 2, 3, 1])),
                ("B", col(&[6.0, 4.0, 3.0, 2.0])),
                ("C", col(&[1.7, 2.3, 2.3, 7.8])),
                ("D", col(&[5.0f32, 1.0, 0.0, 0.0])),
            ],
        );
        let right = frame(
            &allocator,
            vec![
                ("A", col(&[5i64, 4, 2, 5, 10])),
                ("F", col(&[7i32, 3, 5, 8, 11])),
                ("D", col(&[5.0f32, 0.0, 0.0, 0.0, 12.0])),
            ],
        );

        let joined = left.cross_join(&right).unwrap();
        assert_eq!(joined.dims(), (7, 20));

        let repeat_each = |values: &[f64]| -> Vec<Element> {
            values
                .iter()
                .flat_map(|v| std::iter::repeat_n(Element::from(*v), 5))
                .collect()
        };
        let repeat_all = |values: Vec<Element>| -> Vec<Element> {
            std::iter::repeat_n(values, 4).flatten().collect()
        };
        assert_columns(
            &joined,
            &[
                (
                    "A_0",
                    [5i64, 2, 3, 1]
                        .iter()
                        .flat_map(|v| std::iter::repeat_n(Element::from(*v), 5))
                        .collect(),
                ),
                ("B", repeat_each(&[6.0, 4.0, 3.0, 2.0])),
                ("C", repeat_each(&[1.7, 2.3, 2.3, 7.8])),
                (
                    "D_0",
                    [5.0f32, 1.0, 0.0, 0.0]
                        .iter()
                        .flat_map(|v| std::iter::repeat_n(Element::from(*v), 5))
                        .collect(),
                ),
                ("A_1", repeat_all(elems(&[5i64, 4, 2, 5, 10]))),
                ("D_1", repeat_all(elems(&[5.0f32, 0.0, 0.0, 0.0, 12.0]))),
                ("F", repeat_all(elems(&[7i32, 3, 5, 8, 11]))),
            ],
        );
    }
    checked.assert_size(0);
}

#[test]
fn test_missing_keys_are_reported_before_joining() {
    let (checked, allocator) = checked_allocator();
    {
        let (left, right) = abcd_and_adf(&allocator, &[1.0], &[2.0], &[3.0]);

        match left.left_join(&right, &["B"]) {
            Err(Error::ColumnNotFound {
                name,
                side,
                available,
            }) => {
                assert_eq!(name, "B");
                assert_eq!(side, Side::Right);
                assert_eq!(available, vec!["A", "D", "F"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        match left.outer_join(&right, &["F"]) {
            Err(Error::ColumnNotFound { side, .. }) => assert_eq!(side, Side::Left),
            other => panic!("unexpected result: {other:?}"),
        }
        match left.right_join(&right, &["B"]) {
            Err(Error::ColumnNotFound { name, side, .. }) => {
                assert_eq!(name, "B");
                assert_eq!(side, Side::Right);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
    checked.assert_size(0);
}

#[test]
fn test_identical_suffixes_are_rejected() {
    let (checked, allocator) = checked_allocator();
    {
        let (left, right) = abcd_and_adf(&allocator, &[1.0], &[2.0], &[3.0]);
        let options = JoinOptions::left().with_lsuffix("_x").with_rsuffix("_x");
        let err = left.join_with(&right, &["A"], &options).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let err = join(&left, &right, &["A"], &JoinOptions::cross()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgumentError(_)));
    }
    checked.assert_size(0);
}

#[test]
fn test_key_type_conflicts_abort_the_join() {
    let (checked, allocator) = checked_allocator();
    {
        let left = frame(&allocator, vec![("k", col(&[1i64, 2]))]);
        let right = frame(&allocator, vec![("k", col(&[1.0f64]))]);
        let err = left.left_join(&right, &["k"]).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }), "{err}");

        // Null keys are never compared, but an unmatched right key still has
        // to fit the left key column.
        let mut values = ValuesMap::new();
        values.insert(
            "k".into(),
            ColumnValues::typed(Arc::new(Int64Array::from(vec![None::<i64>]))),
        );
        let nulls = DataFrame::from_values(&allocator, values).unwrap();
        let mut values = ValuesMap::new();
        values.insert(
            "k".into(),
            ColumnValues::typed(Arc::new(StringArray::from(vec!["x"]))),
        );
        let strings = DataFrame::from_values(&allocator, values).unwrap();
        match nulls.outer_join(&strings, &["k"]) {
            Err(Error::InconsistentDataTypes { value, expected }) => {
                assert_eq!(value, "x");
                assert_eq!(expected, "Int64");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
    checked.assert_size(0);
}

#[test]
fn test_join_cardinalities() {
    let (checked, allocator) = checked_allocator();
    {
        let (left, right) = abcd_and_adf(
            &allocator,
            &[5.0, 4.0, 2.0, 5.0, 3.0, 3.0],
            &[7.0, 3.0, 5.0, 8.0, 99.0, 44.0],
            &[5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        );
        let keys = ["A", "D"];

        let left_joined = left.left_join(&right, &keys).unwrap();
        assert!(left_joined.num_rows() >= left.num_rows());

        // Right rows (4, 0), (2, 0) and (5, 0) match nothing on the left.
        let outer = left.outer_join(&right, &keys).unwrap();
        assert_eq!(outer.num_rows(), left_joined.num_rows() + 3);

        let right_joined = left.right_join(&right, &keys).unwrap();
        let swapped = right
            .join_with(
                &left,
                &keys,
                &JoinOptions::left().with_lsuffix("_1").with_rsuffix("_0"),
            )
            .unwrap();
        assert!(right_joined.equals(&swapped));

        let crossed = left.cross_join(&right).unwrap();
        assert_eq!(crossed.num_rows(), left.num_rows() * right.num_rows());
    }
    checked.assert_size(0);
}

#[test]
fn test_joins_compose_as_mutations() {
    let (checked, allocator) = checked_allocator();
    {
        let (left, right) = abcd_and_adf(
            &allocator,
            &[5.0, 4.0, 2.0, 5.0],
            &[7.0, 3.0, 5.0, 8.0],
            &[5.0, 0.0, 0.0, 0.0],
        );

        let joined = left
            .apply([
                colframe_join::mutations::left_join(&right, &["A", "D"]),
                mutations::select(&["A", "F"]),
                mutations::slice(0, 2),
            ])
            .unwrap();
        assert_columns(
            &joined,
            &[
                ("A", elems(&[5.0, 2.0])),
                ("F", elems(&[Some(7.0), None])),
            ],
        );

        let failed = left.apply([colframe_join::mutations::inner_join(&right, &["Z"])]);
        assert!(matches!(failed, Err(Error::ColumnNotFound { .. })));
    }
    checked.assert_size(0);
}

#[test]
fn test_chunked_and_sliced_operands() {
    let (checked, allocator) = checked_allocator();
    {
        let schema = Arc::new(Schema::new(vec![
            Field::new("k", DataType::Int64, false),
            Field::new("v", DataType::Float64, false),
        ]));
        let batch = |keys: Vec<i64>, values: Vec<f64>| {
            RecordBatch::try_new(
                Arc::clone(&schema),
                vec![
                    Arc::new(Int64Array::from(keys)) as ArrayRef,
                    Arc::new(Float64Array::from(values)) as ArrayRef,
                ],
            )
            .unwrap()
        };
        let left = DataFrame::from_record_batches(
            &allocator,
            Arc::clone(&schema),
            &[batch(vec![1, 2], vec![0.1, 0.2]), batch(vec![3], vec![0.3])],
        )
        .unwrap();
        let right = DataFrame::from_record_batches(
            &allocator,
            Arc::clone(&schema),
            &[batch(vec![3, 1], vec![3.0, 1.0]), batch(vec![2, 9], vec![2.0, 9.0])],
        )
        .unwrap()
        .slice(0, 3)
        .unwrap();

        let joined = left.left_join(&right, &["k"]).unwrap();
        assert_columns(
            &joined,
            &[
                ("k", elems(&[1i64, 2, 3])),
                ("v_0", elems(&[0.1, 0.2, 0.3])),
                ("v_1", elems(&[1.0, 2.0, 3.0])),
            ],
        );
        assert!(!joined.schema().field_with_name("v_0").unwrap().is_nullable());
        assert!(joined.schema().field_with_name("v_1").unwrap().is_nullable());
        assert!(joined.to_record_batch().is_ok());
    }
    checked.assert_size(0);
}
