//! Extraction of [`Element`]s from arbitrary Arrow array positions.

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Decimal128Type, DurationMicrosecondType,
    DurationMillisecondType, DurationNanosecondType, DurationSecondType, Float32Type, Float64Type,
    Int8Type, Int16Type, Int32Type, Int64Type, Time32MillisecondType, Time32SecondType,
    Time64MicrosecondType, Time64NanosecondType, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt8Type, UInt16Type,
    UInt32Type, UInt64Type,
};
use colframe_result::{Error, Result};

use crate::element::Element;

impl Element {
    /// Read the value at `index` of `array` as an element.
    ///
    /// Nested arrays (lists and structs) are converted recursively. Returns
    /// [`Error::UnsupportedType`] for logical types without an element form
    /// and [`Error::InvalidArgumentError`] when `index` is out of bounds.
    pub fn from_array(array: &dyn Array, index: usize) -> Result<Element> {
        if index >= array.len() {
            return Err(Error::InvalidArgumentError(format!(
                "index {index} out of bounds for array of length {}",
                array.len()
            )));
        }
        if array.is_null(index) {
            return Ok(Element::Null);
        }

        macro_rules! prim {
            ($t:ty, $variant:ident) => {
                Element::$variant(array.as_primitive::<$t>().value(index))
            };
            ($t:ty, $variant:ident, $unit:expr) => {
                Element::$variant(array.as_primitive::<$t>().value(index), $unit)
            };
        }

        let element = match array.data_type() {
            DataType::Null => Element::Null,
            DataType::Boolean => Element::Boolean(array.as_boolean().value(index)),
            DataType::Int8 => prim!(Int8Type, Int8),
            DataType::Int16 => prim!(Int16Type, Int16),
            DataType::Int32 => prim!(Int32Type, Int32),
            DataType::Int64 => prim!(Int64Type, Int64),
            DataType::UInt8 => prim!(UInt8Type, UInt8),
            DataType::UInt16 => prim!(UInt16Type, UInt16),
            DataType::UInt32 => prim!(UInt32Type, UInt32),
            DataType::UInt64 => prim!(UInt64Type, UInt64),
            DataType::Float32 => prim!(Float32Type, Float32),
            DataType::Float64 => prim!(Float64Type, Float64),
            DataType::Date32 => prim!(Date32Type, Date32),
            DataType::Date64 => prim!(Date64Type, Date64),
            DataType::Time32(TimeUnit::Second) => prim!(Time32SecondType, Time32, TimeUnit::Second),
            DataType::Time32(TimeUnit::Millisecond) => {
                prim!(Time32MillisecondType, Time32, TimeUnit::Millisecond)
            }
            DataType::Time64(TimeUnit::Microsecond) => {
                prim!(Time64MicrosecondType, Time64, TimeUnit::Microsecond)
            }
            DataType::Time64(TimeUnit::Nanosecond) => {
                prim!(Time64NanosecondType, Time64, TimeUnit::Nanosecond)
            }
            DataType::Timestamp(TimeUnit::Second, _) => {
                prim!(TimestampSecondType, Timestamp, TimeUnit::Second)
            }
            DataType::Timestamp(TimeUnit::Millisecond, _) => {
                prim!(TimestampMillisecondType, Timestamp, TimeUnit::Millisecond)
            }
            DataType::Timestamp(TimeUnit::Microsecond, _) => {
                prim!(TimestampMicrosecondType, Timestamp, TimeUnit::Microsecond)
            }
            DataType::Timestamp(TimeUnit::Nanosecond, _) => {
                prim!(TimestampNanosecondType, Timestamp, TimeUnit::Nanosecond)
            }
            DataType::Duration(TimeUnit::Second) => {
                prim!(DurationSecondType, Duration, TimeUnit::Second)
            }
            DataType::Duration(TimeUnit::Millisecond) => {
                prim!(DurationMillisecondType, Duration, TimeUnit::Millisecond)
            }
            DataType::Duration(TimeUnit::Microsecond) => {
                prim!(DurationMicrosecondType, Duration, TimeUnit::Microsecond)
            }
            DataType::Duration(TimeUnit::Nanosecond) => {
                prim!(DurationNanosecondType, Duration, TimeUnit::Nanosecond)
            }
            DataType::Decimal128(precision, scale) => Element::Decimal128(
                array.as_primitive::<Decimal128Type>().value(index),
                *precision,
                *scale,
            ),
            DataType::Utf8 => Element::Utf8(array.as_string::<i32>().value(index).to_string()),
            DataType::LargeUtf8 => Element::Utf8(array.as_string::<i64>().value(index).to_string()),
            DataType::Binary => Element::Binary(array.as_binary::<i32>().value(index).to_vec()),
            DataType::LargeBinary => {
                Element::Binary(array.as_binary::<i64>().value(index).to_vec())
            }
            DataType::List(_) => {
                let items = array.as_list::<i32>().value(index);
                Element::List(elements_of(items.as_ref())?)
            }
            DataType::LargeList(_) => {
                let items = array.as_list::<i64>().value(index);
                Element::List(elements_of(items.as_ref())?)
            }
            DataType::Struct(fields) => {
                let strukt = array.as_struct();
                let mut out = Vec::with_capacity(fields.len());
                for (field, child) in fields.iter().zip(strukt.columns()) {
                    out.push((
                        field.name().clone(),
                        Element::from_array(child.as_ref(), index)?,
                    ));
                }
                Element::Struct(out)
            }
            other => return Err(Error::UnsupportedType(other.clone())),
        };
        Ok(element)
    }
}

/// Convert every position of `array` into an element.
pub fn elements_of(array: &dyn Array) -> Result<Vec<Element>> {
    (0..array.len())
        .map(|i| Element::from_array(array, i))
        .collect()
}
