//! Element comparison with explicit null semantics.
//!
//! Two equality flavours exist because callers need different answers for
//! nulls:
//!
//! - [`eq_strict`] treats two nulls as equal. DataFrame equality uses it to
//!   compare frames cell by cell.
//! - [`eq`] treats any null operand as unknown and returns `false`, mirroring
//!   SQL. Join key matching uses it, so null keys never match each other.
//!
//! Ordering ([`less`], [`less_eq`], [`greater`], [`greater_eq`]) is undefined
//! over nulls and returns [`Error::NullComparison`]. Comparing elements of
//! incompatible types returns [`Error::TypeMismatch`].

use std::cmp::Ordering;

use colframe_result::{Error, Result};

use crate::element::Element;

/// Relational equality: any null operand yields `false`. Floats follow
/// IEEE 754, so NaN is not equal to itself.
pub fn eq(left: &Element, right: &Element) -> Result<bool> {
    if left.is_null() || right.is_null() {
        return Ok(false);
    }
    values_equal(left, right, false)
}

/// Strict equality: two nulls are equal, a null and a value are not.
///
/// Two NaNs of the same float type are also equal, so every element is
/// strictly equal to itself.
pub fn eq_strict(left: &Element, right: &Element) -> Result<bool> {
    match (left.is_null(), right.is_null()) {
        (true, true) => Ok(true),
        (true, false) | (false, true) => Ok(false),
        (false, false) => values_equal(left, right, true),
    }
}

/// Negation of [`eq_strict`]: `(null) != (null)` is `false` and a null is
/// not equal to any value.
pub fn neq(left: &Element, right: &Element) -> Result<bool> {
    eq_strict(left, right).map(|equal| !equal)
}

pub fn less(left: &Element, right: &Element) -> Result<bool> {
    ordered(left, right, "less than").map(|ord| ord == Some(Ordering::Less))
}

pub fn less_eq(left: &Element, right: &Element) -> Result<bool> {
    ordered(left, right, "less than or equal to")
        .map(|ord| matches!(ord, Some(Ordering::Less | Ordering::Equal)))
}

pub fn greater(left: &Element, right: &Element) -> Result<bool> {
    ordered(left, right, "greater than").map(|ord| ord == Some(Ordering::Greater))
}

pub fn greater_eq(left: &Element, right: &Element) -> Result<bool> {
    ordered(left, right, "greater than or equal to")
        .map(|ord| matches!(ord, Some(Ordering::Greater | Ordering::Equal)))
}

fn ordered(left: &Element, right: &Element, op: &'static str) -> Result<Option<Ordering>> {
    if left.is_null() || right.is_null() {
        return Err(Error::NullComparison(op));
    }
    partial_cmp(left, right)
}

/// Equality of two non-null elements of the same concrete type.
///
/// With `nan_equal` set, two NaNs compare equal.
fn values_equal(left: &Element, right: &Element, nan_equal: bool) -> Result<bool> {
    use Element::*;
    let equal = match (left, right) {
        (Float32(a), Float32(b)) if nan_equal && a.is_nan() && b.is_nan() => true,
        (Float64(a), Float64(b)) if nan_equal && a.is_nan() && b.is_nan() => true,
        (List(a), List(b)) => {
            if a.len() != b.len() {
                return Ok(false);
            }
            for (x, y) in a.iter().zip(b) {
                if !eq_strict(x, y)? {
                    return Ok(false);
                }
            }
            true
        }
        (Struct(a), Struct(b)) => {
            if a.len() != b.len() {
                return Err(Error::type_mismatch(left.type_name(), right.type_name()));
            }
            for ((name_a, x), (name_b, y)) in a.iter().zip(b) {
                if name_a != name_b {
                    return Err(Error::type_mismatch(
                        format!("struct field {name_a}"),
                        format!("struct field {name_b}"),
                    ));
                }
                if !eq_strict(x, y)? {
                    return Ok(false);
                }
            }
            true
        }
        _ => partial_cmp(left, right)? == Some(Ordering::Equal),
    };
    Ok(equal)
}

/// Ordering of two non-null scalar elements of the same concrete type.
///
/// `Ok(None)` means the values are unordered (a NaN is involved).
fn partial_cmp(left: &Element, right: &Element) -> Result<Option<Ordering>> {
    use Element::*;
    let ord = match (left, right) {
        (Boolean(a), Boolean(b)) => a.partial_cmp(b),
        (Int8(a), Int8(b)) => a.partial_cmp(b),
        (Int16(a), Int16(b)) => a.partial_cmp(b),
        (Int32(a), Int32(b)) => a.partial_cmp(b),
        (Int64(a), Int64(b)) => a.partial_cmp(b),
        (UInt8(a), UInt8(b)) => a.partial_cmp(b),
        (UInt16(a), UInt16(b)) => a.partial_cmp(b),
        (UInt32(a), UInt32(b)) => a.partial_cmp(b),
        (UInt64(a), UInt64(b)) => a.partial_cmp(b),
        (Float32(a), Float32(b)) => a.partial_cmp(b),
        (Float64(a), Float64(b)) => a.partial_cmp(b),
        (Utf8(a), Utf8(b)) => a.partial_cmp(b),
        (Binary(a), Binary(b)) => a.partial_cmp(b),
        (Date32(a), Date32(b)) => a.partial_cmp(b),
        (Date64(a), Date64(b)) => a.partial_cmp(b),
        (Time32(a, ua), Time32(b, ub)) if ua == ub => a.partial_cmp(b),
        (Time64(a, ua), Time64(b, ub)) if ua == ub => a.partial_cmp(b),
        (Timestamp(a, ua), Timestamp(b, ub)) if ua == ub => a.partial_cmp(b),
        (Duration(a, ua), Duration(b, ub)) if ua == ub => a.partial_cmp(b),
        (Decimal128(a, _, sa), Decimal128(b, _, sb)) if sa == sb => a.partial_cmp(b),
        (List(a), List(b)) => {
            // Lexicographic over items; nulls inside a list cannot be ordered.
            for (x, y) in a.iter().zip(b) {
                match ordered(x, y, "list ordering")? {
                    Some(Ordering::Equal) => continue,
                    other => return Ok(other),
                }
            }
            a.len().partial_cmp(&b.len())
        }
        (Struct(_), Struct(_)) => {
            return Err(Error::InvalidArgumentError(
                "ordering is not defined on struct elements".into(),
            ));
        }
        _ => return Err(Error::type_mismatch(describe(left), describe(right))),
    };
    Ok(ord)
}

fn describe(element: &Element) -> String {
    match element.data_type() {
        Some(dt) => dt.to_string(),
        None => element.type_name().to_string(),
    }
}
