//! Building Arrow arrays from [`Element`]s.
//!
//! [`ElementBuilder`] accepts elements field by field, checking each one
//! against the declared type as it is appended, and produces one array per
//! field on [`ElementBuilder::finish`]. It backs dynamically typed column
//! construction and every operation that maps elements into a new column.

use std::sync::Arc;

use arrow::array::{
    ArrayRef, BinaryArray, BooleanArray, Date32Array, Date64Array, Decimal128Array,
    DurationMicrosecondArray, DurationMillisecondArray, DurationNanosecondArray,
    DurationSecondArray, Float32Array, Float64Array, GenericListArray, Int8Array, Int16Array,
    Int32Array, Int64Array, LargeBinaryArray, LargeStringArray, NullArray, OffsetSizeTrait,
    StringArray, StructArray, Time32MillisecondArray, Time32SecondArray, Time64MicrosecondArray,
    Time64NanosecondArray, TimestampMicrosecondArray, TimestampMillisecondArray,
    TimestampNanosecondArray, TimestampSecondArray, UInt8Array, UInt16Array, UInt32Array,
    UInt64Array,
};
use arrow::buffer::{NullBuffer, OffsetBuffer};
use arrow::datatypes::{DataType, FieldRef, Fields, Schema, TimeUnit};
use colframe_result::{Error, Result};
use colframe_types::Element;

/// Accumulates elements for every field of a schema.
#[derive(Debug)]
pub struct ElementBuilder {
    fields: Fields,
    values: Vec<Vec<Element>>,
}

impl ElementBuilder {
    pub fn new(schema: &Schema) -> Self {
        Self::with_capacity(schema, 0)
    }

    pub fn with_capacity(schema: &Schema, capacity: usize) -> Self {
        let fields = schema.fields().clone();
        let values = (0..fields.len())
            .map(|_| Vec::with_capacity(capacity))
            .collect();
        Self { fields, values }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Number of elements appended so far to field `field_index`.
    pub fn len(&self, field_index: usize) -> usize {
        self.values.get(field_index).map_or(0, Vec::len)
    }

    /// Append a copy of `element` to field `field_index`.
    pub fn append(&mut self, field_index: usize, element: &Element) -> Result<()> {
        self.append_value(field_index, element.clone())
    }

    /// Append `element` to field `field_index`.
    ///
    /// `Element::Null` appends a null. An element whose type does not match
    /// the field returns [`Error::InconsistentDataTypes`] and leaves the
    /// builder unchanged.
    pub fn append_value(&mut self, field_index: usize, element: Element) -> Result<()> {
        let field = self.fields.get(field_index).ok_or_else(|| {
            Error::InvalidArgumentError(format!(
                "field index {field_index} out of range for builder with {} fields",
                self.fields.len()
            ))
        })?;
        if !conforms(&element, field.data_type()) {
            return Err(Error::inconsistent_types(&element, field.data_type()));
        }
        self.values[field_index].push(element);
        Ok(())
    }

    /// Build one array per field, in schema order.
    pub fn finish(self) -> Result<Vec<ArrayRef>> {
        self.fields
            .iter()
            .zip(self.values)
            .map(|(field, values)| build_array(field.data_type(), &values))
            .collect()
    }
}

/// The type a dynamic sequence of elements takes: that of the first element
/// with a known type. `Ok(None)` when every element is null.
pub(crate) fn infer_data_type(values: &[Element]) -> Result<Option<(DataType, &Element)>> {
    let mut first = None;
    for value in values.iter().filter(|v| !v.is_null()) {
        if let Some(dt) = value.data_type() {
            first = Some((dt, value));
            break;
        }
        first.get_or_insert((DataType::Null, value));
    }
    match first {
        None => Ok(None),
        Some((DataType::Null, value)) => Err(Error::InvalidArgumentError(format!(
            "cannot infer a data type from element {value}"
        ))),
        Some(found) => Ok(Some(found)),
    }
}

/// Whether `element` can be stored in an array of type `dt`.
pub(crate) fn conforms(element: &Element, dt: &DataType) -> bool {
    match (element, dt) {
        (Element::Null, _) => true,
        (Element::Boolean(_), DataType::Boolean)
        | (Element::Int8(_), DataType::Int8)
        | (Element::Int16(_), DataType::Int16)
        | (Element::Int32(_), DataType::Int32)
        | (Element::Int64(_), DataType::Int64)
        | (Element::UInt8(_), DataType::UInt8)
        | (Element::UInt16(_), DataType::UInt16)
        | (Element::UInt32(_), DataType::UInt32)
        | (Element::UInt64(_), DataType::UInt64)
        | (Element::Float32(_), DataType::Float32)
        | (Element::Float64(_), DataType::Float64)
        | (Element::Utf8(_), DataType::Utf8 | DataType::LargeUtf8)
        | (Element::Binary(_), DataType::Binary | DataType::LargeBinary)
        | (Element::Date32(_), DataType::Date32)
        | (Element::Date64(_), DataType::Date64) => true,
        (Element::Time32(_, unit), DataType::Time32(expected))
        | (Element::Time64(_, unit), DataType::Time64(expected))
        | (Element::Timestamp(_, unit), DataType::Timestamp(expected, _))
        | (Element::Duration(_, unit), DataType::Duration(expected)) => unit == expected,
        // A narrower decimal fits a wider column; scales must agree exactly.
        (Element::Decimal128(_, precision, scale), DataType::Decimal128(max, expected)) => {
            scale == expected && precision <= max
        }
        (Element::List(items), DataType::List(child) | DataType::LargeList(child)) => {
            items.iter().all(|item| conforms(item, child.data_type()))
        }
        (Element::Struct(values), DataType::Struct(fields)) => {
            values.len() == fields.len()
                && values
                    .iter()
                    .zip(fields.iter())
                    .all(|((name, v), f)| name == f.name() && conforms(v, f.data_type()))
        }
        _ => false,
    }
}

/// Build an array of type `dt` from elements that conform to it.
pub(crate) fn build_array(dt: &DataType, values: &[Element]) -> Result<ArrayRef> {
    macro_rules! primitive {
        ($array:ty, $variant:ident) => {{
            let natives = values
                .iter()
                .map(|v| match v {
                    Element::Null => Ok(None),
                    Element::$variant(x) => Ok(Some(*x)),
                    other => Err(Error::inconsistent_types(other, dt)),
                })
                .collect::<Result<Vec<_>>>()?;
            Arc::new(<$array>::from(natives)) as ArrayRef
        }};
    }
    macro_rules! temporal {
        ($array:ty, $variant:ident) => {{
            let natives = values
                .iter()
                .map(|v| match v {
                    Element::Null => Ok(None),
                    Element::$variant(x, _) => Ok(Some(*x)),
                    other => Err(Error::inconsistent_types(other, dt)),
                })
                .collect::<Result<Vec<_>>>()?;
            <$array>::from(natives)
        }};
    }

    let array: ArrayRef = match dt {
        DataType::Null => Arc::new(NullArray::new(values.len())),
        DataType::Boolean => primitive!(BooleanArray, Boolean),
        DataType::Int8 => primitive!(Int8Array, Int8),
        DataType::Int16 => primitive!(Int16Array, Int16),
        DataType::Int32 => primitive!(Int32Array, Int32),
        DataType::Int64 => primitive!(Int64Array, Int64),
        DataType::UInt8 => primitive!(UInt8Array, UInt8),
        DataType::UInt16 => primitive!(UInt16Array, UInt16),
        DataType::UInt32 => primitive!(UInt32Array, UInt32),
        DataType::UInt64 => primitive!(UInt64Array, UInt64),
        DataType::Float32 => primitive!(Float32Array, Float32),
        DataType::Float64 => primitive!(Float64Array, Float64),
        DataType::Date32 => primitive!(Date32Array, Date32),
        DataType::Date64 => primitive!(Date64Array, Date64),
        DataType::Time32(TimeUnit::Second) => Arc::new(temporal!(Time32SecondArray, Time32)),
        DataType::Time32(TimeUnit::Millisecond) => {
            Arc::new(temporal!(Time32MillisecondArray, Time32))
        }
        DataType::Time64(TimeUnit::Microsecond) => {
            Arc::new(temporal!(Time64MicrosecondArray, Time64))
        }
        DataType::Time64(TimeUnit::Nanosecond) => {
            Arc::new(temporal!(Time64NanosecondArray, Time64))
        }
        DataType::Timestamp(TimeUnit::Second, tz) => {
            Arc::new(temporal!(TimestampSecondArray, Timestamp).with_timezone_opt(tz.clone()))
        }
        DataType::Timestamp(TimeUnit::Millisecond, tz) => Arc::new(
            temporal!(TimestampMillisecondArray, Timestamp).with_timezone_opt(tz.clone()),
        ),
        DataType::Timestamp(TimeUnit::Microsecond, tz) => Arc::new(
            temporal!(TimestampMicrosecondArray, Timestamp).with_timezone_opt(tz.clone()),
        ),
        DataType::Timestamp(TimeUnit::Nanosecond, tz) => Arc::new(
            temporal!(TimestampNanosecondArray, Timestamp).with_timezone_opt(tz.clone()),
        ),
        DataType::Duration(TimeUnit::Second) => Arc::new(temporal!(DurationSecondArray, Duration)),
        DataType::Duration(TimeUnit::Millisecond) => {
            Arc::new(temporal!(DurationMillisecondArray, Duration))
        }
        DataType::Duration(TimeUnit::Microsecond) => {
            Arc::new(temporal!(DurationMicrosecondArray, Duration))
        }
        DataType::Duration(TimeUnit::Nanosecond) => {
            Arc::new(temporal!(DurationNanosecondArray, Duration))
        }
        DataType::Decimal128(precision, scale) => {
            let raw = values
                .iter()
                .map(|v| match v {
                    Element::Null => Ok(None),
                    Element::Decimal128(x, _, _) => Ok(Some(*x)),
                    other => Err(Error::inconsistent_types(other, dt)),
                })
                .collect::<Result<Vec<_>>>()?;
            Arc::new(Decimal128Array::from(raw).with_precision_and_scale(*precision, *scale)?)
        }
        DataType::Utf8 => Arc::new(StringArray::from(string_values(values, dt)?)),
        DataType::LargeUtf8 => Arc::new(LargeStringArray::from(string_values(values, dt)?)),
        DataType::Binary => Arc::new(BinaryArray::from(binary_values(values, dt)?)),
        DataType::LargeBinary => Arc::new(LargeBinaryArray::from(binary_values(values, dt)?)),
        DataType::List(child) => Arc::new(build_list::<i32>(child, values, dt)?),
        DataType::LargeList(child) => Arc::new(build_list::<i64>(child, values, dt)?),
        DataType::Struct(fields) => Arc::new(build_struct(fields, values, dt)?),
        other => return Err(Error::UnsupportedType(other.clone())),
    };
    Ok(array)
}

fn string_values<'a>(values: &'a [Element], dt: &DataType) -> Result<Vec<Option<&'a str>>> {
    values
        .iter()
        .map(|v| match v {
            Element::Null => Ok(None),
            Element::Utf8(s) => Ok(Some(s.as_str())),
            other => Err(Error::inconsistent_types(other, dt)),
        })
        .collect()
}

fn binary_values<'a>(values: &'a [Element], dt: &DataType) -> Result<Vec<Option<&'a [u8]>>> {
    values
        .iter()
        .map(|v| match v {
            Element::Null => Ok(None),
            Element::Binary(b) => Ok(Some(b.as_slice())),
            other => Err(Error::inconsistent_types(other, dt)),
        })
        .collect()
}

fn build_list<O: OffsetSizeTrait>(
    child: &FieldRef,
    values: &[Element],
    dt: &DataType,
) -> Result<GenericListArray<O>> {
    let mut lengths = Vec::with_capacity(values.len());
    let mut validity = Vec::with_capacity(values.len());
    let mut flat = Vec::new();
    for value in values {
        match value {
            Element::Null => {
                lengths.push(0);
                validity.push(false);
            }
            Element::List(items) => {
                lengths.push(items.len());
                validity.push(true);
                flat.extend(items.iter().cloned());
            }
            other => return Err(Error::inconsistent_types(other, dt)),
        }
    }
    let child_array = build_array(child.data_type(), &flat)?;
    Ok(GenericListArray::<O>::try_new(
        Arc::clone(child),
        OffsetBuffer::<O>::from_lengths(lengths),
        child_array,
        Some(NullBuffer::from(validity)),
    )?)
}

fn build_struct(fields: &Fields, values: &[Element], dt: &DataType) -> Result<StructArray> {
    let mut validity = Vec::with_capacity(values.len());
    let mut columns: Vec<Vec<Element>> = (0..fields.len())
        .map(|_| Vec::with_capacity(values.len()))
        .collect();
    for value in values {
        match value {
            Element::Null => {
                validity.push(false);
                columns.iter_mut().for_each(|c| c.push(Element::Null));
            }
            Element::Struct(pairs) if pairs.len() == fields.len() => {
                validity.push(true);
                for (column, (_, v)) in columns.iter_mut().zip(pairs) {
                    column.push(v.clone());
                }
            }
            other => return Err(Error::inconsistent_types(other, dt)),
        }
    }
    let arrays = fields
        .iter()
        .zip(&columns)
        .map(|(f, c)| build_array(f.data_type(), c))
        .collect::<Result<Vec<_>>>()?;
    if fields.is_empty() {
        return Ok(StructArray::new_empty_fields(
            values.len(),
            Some(NullBuffer::from(validity)),
        ));
    }
    Ok(StructArray::try_new(
        fields.clone(),
        arrays,
        Some(NullBuffer::from(validity)),
    )?)
}
