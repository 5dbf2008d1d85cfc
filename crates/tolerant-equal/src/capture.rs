//! Capture of arbitrary `Serialize` data as a [`Value`] tree.
//!
//! [`to_value`] drives a type's `Serialize` impl with a private serializer
//! whose output is a [`Value`]. Structs become [`Value::Record`] carrying the
//! nominal type name, enum variants become records named `Type::Variant`, so
//! type identity survives capture and feeds override dispatch. Field
//! participation follows the `Serialize` impl: what it exposes is compared,
//! what it skips is not.
//!
//! Capture is the only fallible stage of a comparison. A [`CaptureError`]
//! means "could not compare", which callers must keep distinct from a `false`
//! verdict.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::{self, Serialize};
use thiserror::Error;

use crate::value::Value;

const TIMESTAMP_TOKEN: &str = "$tolerant_equal::private::Timestamp";

/// Failure to capture a value, distinct from an unequal comparison.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("map key must be a string, got {0}")]
    NonStringKey(&'static str),
    #[error("{0} values exceed the representable numeric range")]
    UnrepresentableNumber(&'static str),
    /// Error raised by a `Serialize` implementation.
    #[error("{0}")]
    Message(String),
}

impl ser::Error for CaptureError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        CaptureError::Message(msg.to_string())
    }
}

/// Marks a timestamp for capture as [`Value::Time`].
///
/// serde has no timestamp type of its own, so the wrapper serializes its
/// instant through a private marker token that [`to_value`] recognizes.
/// Under any other serializer it degrades to the RFC 3339 string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp(pub DateTime<Utc>);

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_newtype_struct(TIMESTAMP_TOKEN, &self.0.to_rfc3339())
    }
}

/// Captures any `Serialize` value as a [`Value`] tree.
pub fn to_value<T>(value: &T) -> Result<Value, CaptureError>
where
    T: Serialize + ?Sized,
{
    value.serialize(ValueSerializer)
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = CaptureError;

    type SerializeSeq = SeqCapture;
    type SerializeTuple = SeqCapture;
    type SerializeTupleStruct = SeqCapture;
    type SerializeTupleVariant = VariantCapture;
    type SerializeMap = MapCapture;
    type SerializeStruct = RecordCapture;
    type SerializeStructVariant = VariantCapture;

    fn serialize_bool(self, v: bool) -> Result<Value, CaptureError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, CaptureError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, CaptureError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, CaptureError> {
        Ok(Value::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, CaptureError> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, _v: i128) -> Result<Value, CaptureError> {
        Err(CaptureError::UnrepresentableNumber("i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, CaptureError> {
        Ok(Value::UInt(u64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, CaptureError> {
        Ok(Value::UInt(u64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, CaptureError> {
        Ok(Value::UInt(u64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, CaptureError> {
        Ok(Value::UInt(v))
    }

    fn serialize_u128(self, _v: u128) -> Result<Value, CaptureError> {
        Err(CaptureError::UnrepresentableNumber("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, CaptureError> {
        Ok(Value::F32(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, CaptureError> {
        Ok(Value::F64(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, CaptureError> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, CaptureError> {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, CaptureError> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, CaptureError> {
        Ok(Value::Absent)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value, CaptureError>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(ValueSerializer)
    }

    fn serialize_unit(self) -> Result<Value, CaptureError> {
        Ok(Value::Absent)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, CaptureError> {
        Ok(Value::Absent)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, CaptureError> {
        Ok(Value::Record {
            name: variant_name(name, variant),
            fields: Vec::new(),
        })
    }

    fn serialize_newtype_struct<T>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Value, CaptureError>
    where
        T: ?Sized + Serialize,
    {
        if name == TIMESTAMP_TOKEN {
            return match value.serialize(ValueSerializer)? {
                Value::Str(raw) => DateTime::parse_from_rfc3339(&raw)
                    .map(|instant| Value::Time(instant.with_timezone(&Utc)))
                    .map_err(|err| {
                        CaptureError::Message(format!("malformed timestamp token: {err}"))
                    }),
                other => Err(CaptureError::Message(format!(
                    "timestamp token must carry a string, got {}",
                    other.kind()
                ))),
            };
        }
        value.serialize(ValueSerializer)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, CaptureError>
    where
        T: ?Sized + Serialize,
    {
        Ok(Value::Record {
            name: variant_name(name, variant),
            fields: vec![("0".to_string(), value.serialize(ValueSerializer)?)],
        })
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqCapture, CaptureError> {
        Ok(SeqCapture {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqCapture, CaptureError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqCapture, CaptureError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantCapture, CaptureError> {
        Ok(VariantCapture {
            name: variant_name(name, variant),
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapCapture, CaptureError> {
        Ok(MapCapture {
            entries: BTreeMap::new(),
            pending_key: None,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<RecordCapture, CaptureError> {
        Ok(RecordCapture {
            name,
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantCapture, CaptureError> {
        Ok(VariantCapture {
            name: variant_name(name, variant),
            fields: Vec::with_capacity(len),
        })
    }
}

fn variant_name(name: &str, variant: &str) -> String {
    format!("{name}::{variant}")
}

struct SeqCapture {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqCapture {
    type Ok = Value;
    type Error = CaptureError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, CaptureError> {
        Ok(Value::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqCapture {
    type Ok = Value;
    type Error = CaptureError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, CaptureError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqCapture {
    type Ok = Value;
    type Error = CaptureError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, CaptureError> {
        ser::SerializeSeq::end(self)
    }
}

struct VariantCapture {
    name: String,
    fields: Vec<(String, Value)>,
}

impl ser::SerializeTupleVariant for VariantCapture {
    type Ok = Value;
    type Error = CaptureError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: ?Sized + Serialize,
    {
        let index = self.fields.len().to_string();
        self.fields.push((index, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value, CaptureError> {
        Ok(Value::Record {
            name: self.name,
            fields: self.fields,
        })
    }
}

impl ser::SerializeStructVariant for VariantCapture {
    type Ok = Value;
    type Error = CaptureError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), CaptureError>
    where
        T: ?Sized + Serialize,
    {
        self.fields
            .push((key.to_string(), value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value, CaptureError> {
        Ok(Value::Record {
            name: self.name,
            fields: self.fields,
        })
    }
}

struct MapCapture {
    entries: BTreeMap<String, Value>,
    pending_key: Option<String>,
}

impl ser::SerializeMap for MapCapture {
    type Ok = Value;
    type Error = CaptureError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), CaptureError>
    where
        T: ?Sized + Serialize,
    {
        match key.serialize(ValueSerializer)? {
            Value::Str(key) => {
                self.pending_key = Some(key);
                Ok(())
            }
            other => Err(CaptureError::NonStringKey(other.kind())),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), CaptureError>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| CaptureError::Message("map value captured before its key".to_string()))?;
        self.entries.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, CaptureError> {
        Ok(Value::Map(self.entries))
    }
}

struct RecordCapture {
    name: &'static str,
    fields: Vec<(String, Value)>,
}

impl ser::SerializeStruct for RecordCapture {
    type Ok = Value;
    type Error = CaptureError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), CaptureError>
    where
        T: ?Sized + Serialize,
    {
        self.fields
            .push((key.to_string(), value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Result<Value, CaptureError> {
        Ok(Value::Record {
            name: self.name.to_string(),
            fields: self.fields,
        })
    }
}
