//! Type-erased scalar values produced while iterating columns.
//!
//! An [`Element`] captures one (column, row) position together with enough
//! type information to compare it against another element. Unlike the Arrow
//! arrays it is extracted from, an element owns its value, so it can outlive
//! the chunk it was read from.

use std::fmt;

use arrow::datatypes::{DataType, Field, Fields, TimeUnit};
use std::sync::Arc;

/// A single type-erased value with explicit null.
///
/// The derived `PartialEq` is structural: `Null == Null` holds and floats
/// compare with `==`. Relational (SQL) equality lives in
/// [`crate::compare::eq`], which treats any null operand as unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Null,
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
    Utf8(String),
    Binary(Vec<u8>),
    /// Days since the Unix epoch.
    Date32(i32),
    /// Milliseconds since the Unix epoch.
    Date64(i64),
    Time32(i32, TimeUnit),
    Time64(i64, TimeUnit),
    Timestamp(i64, TimeUnit),
    Duration(i64, TimeUnit),
    /// Scaled integer with precision and scale.
    Decimal128(i128, u8, i8),
    /// The sub-range of a list row, one element per child value.
    List(Vec<Element>),
    /// A struct row as ordered `(field name, value)` pairs.
    Struct(Vec<(String, Element)>),
}

macro_rules! impl_from_for_element {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$t> for Element {
                fn from(v: $t) -> Self {
                    Element::$variant(v)
                }
            }
        )*
    };
}

impl_from_for_element!(
    bool => Boolean,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    f32 => Float32,
    f64 => Float64,
    String => Utf8,
    Vec<u8> => Binary,
);

impl From<&str> for Element {
    fn from(v: &str) -> Self {
        Element::Utf8(v.to_string())
    }
}

impl<T: Into<Element>> From<Option<T>> for Element {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Element::Null,
        }
    }
}

impl Element {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Element::Null)
    }

    /// Short lowercase name of the element's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Null => "null",
            Element::Boolean(_) => "bool",
            Element::Int8(_) => "int8",
            Element::Int16(_) => "int16",
            Element::Int32(_) => "int32",
            Element::Int64(_) => "int64",
            Element::UInt8(_) => "uint8",
            Element::UInt16(_) => "uint16",
            Element::UInt32(_) => "uint32",
            Element::UInt64(_) => "uint64",
            Element::Float32(_) => "float32",
            Element::Float64(_) => "float64",
            Element::Utf8(_) => "utf8",
            Element::Binary(_) => "binary",
            Element::Date32(_) => "date32",
            Element::Date64(_) => "date64",
            Element::Time32(..) => "time32",
            Element::Time64(..) => "time64",
            Element::Timestamp(..) => "timestamp",
            Element::Duration(..) => "duration",
            Element::Decimal128(..) => "decimal128",
            Element::List(_) => "list",
            Element::Struct(_) => "struct",
        }
    }

    /// The Arrow type this element naturally maps to.
    ///
    /// Returns `None` for `Null` and for nested values whose child type cannot
    /// be inferred (an empty list, or a list made only of nulls).
    pub fn data_type(&self) -> Option<DataType> {
        let dt = match self {
            Element::Null => return None,
            Element::Boolean(_) => DataType::Boolean,
            Element::Int8(_) => DataType::Int8,
            Element::Int16(_) => DataType::Int16,
            Element::Int32(_) => DataType::Int32,
            Element::Int64(_) => DataType::Int64,
            Element::UInt8(_) => DataType::UInt8,
            Element::UInt16(_) => DataType::UInt16,
            Element::UInt32(_) => DataType::UInt32,
            Element::UInt64(_) => DataType::UInt64,
            Element::Float32(_) => DataType::Float32,
            Element::Float64(_) => DataType::Float64,
            Element::Utf8(_) => DataType::Utf8,
            Element::Binary(_) => DataType::Binary,
            Element::Date32(_) => DataType::Date32,
            Element::Date64(_) => DataType::Date64,
            Element::Time32(_, unit) => DataType::Time32(*unit),
            Element::Time64(_, unit) => DataType::Time64(*unit),
            Element::Timestamp(_, unit) => DataType::Timestamp(*unit, None),
            Element::Duration(_, unit) => DataType::Duration(*unit),
            Element::Decimal128(_, precision, scale) => DataType::Decimal128(*precision, *scale),
            Element::List(items) => {
                let child = items.iter().find_map(Element::data_type)?;
                DataType::List(Arc::new(Field::new_list_field(child, true)))
            }
            Element::Struct(fields) => {
                let mut out = Vec::with_capacity(fields.len());
                for (name, value) in fields {
                    out.push(Field::new(name, value.data_type()?, true));
                }
                DataType::Struct(Fields::from(out))
            }
        };
        Some(dt)
    }

    /// Canonical truthiness of the element.
    ///
    /// Numbers are true when non-zero, strings and binaries when non-empty,
    /// lists when they have at least one item. Structs are always true and
    /// `Null` is always false.
    pub fn to_boolean(&self) -> bool {
        match self {
            Element::Null => false,
            Element::Boolean(v) => *v,
            Element::Int8(v) => *v != 0,
            Element::Int16(v) => *v != 0,
            Element::Int32(v) => *v != 0,
            Element::Int64(v) => *v != 0,
            Element::UInt8(v) => *v != 0,
            Element::UInt16(v) => *v != 0,
            Element::UInt32(v) => *v != 0,
            Element::UInt64(v) => *v != 0,
            Element::Float32(v) => *v != 0.0,
            Element::Float64(v) => *v != 0.0,
            Element::Utf8(v) => !v.is_empty(),
            Element::Binary(v) => !v.is_empty(),
            Element::Date32(v) | Element::Time32(v, _) => *v != 0,
            Element::Date64(v)
            | Element::Time64(v, _)
            | Element::Timestamp(v, _)
            | Element::Duration(v, _) => *v != 0,
            Element::Decimal128(v, ..) => *v != 0,
            Element::List(items) => !items.is_empty(),
            Element::Struct(_) => true,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Null => write!(f, "(null)"),
            Element::Boolean(v) => write!(f, "{v}"),
            Element::Int8(v) => write!(f, "{v}"),
            Element::Int16(v) => write!(f, "{v}"),
            Element::Int32(v) => write!(f, "{v}"),
            Element::Int64(v) => write!(f, "{v}"),
            Element::UInt8(v) => write!(f, "{v}"),
            Element::UInt16(v) => write!(f, "{v}"),
            Element::UInt32(v) => write!(f, "{v}"),
            Element::UInt64(v) => write!(f, "{v}"),
            Element::Float32(v) => write!(f, "{v}"),
            Element::Float64(v) => write!(f, "{v}"),
            Element::Utf8(v) => write!(f, "{v}"),
            Element::Binary(v) => {
                for byte in v {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Element::Date32(v) | Element::Time32(v, _) => write!(f, "{v}"),
            Element::Date64(v)
            | Element::Time64(v, _)
            | Element::Timestamp(v, _)
            | Element::Duration(v, _) => write!(f, "{v}"),
            Element::Decimal128(v, _, scale) => write!(f, "{}", format_decimal(*v, *scale)),
            Element::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Element::Struct(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn format_decimal(value: i128, scale: i8) -> String {
    if scale <= 0 {
        let zeros = "0".repeat(scale.unsigned_abs() as usize);
        return format!("{value}{zeros}");
    }
    let scale = scale as usize;
    let digits = value.unsigned_abs().to_string();
    let sign = if value < 0 { "-" } else { "" };
    if digits.len() <= scale {
        format!("{sign}0.{digits:0>scale$}")
    } else {
        let (int_part, frac_part) = digits.split_at(digits.len() - scale);
        format!("{sign}{int_part}.{frac_part}")
    }
}
