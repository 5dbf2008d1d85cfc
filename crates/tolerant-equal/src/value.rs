//! Dynamic value tree and runtime type identity.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// A type-tagged dynamic value.
///
/// Every comparable datum is expressed as one of these variants. The tree is
/// fully owned, so cycles cannot be expressed and recursion over it always
/// terminates.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absent state of an optional value. Two absent values are equal;
    /// absent never equals any present value.
    Absent,
    Bool(bool),
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// A timestamp leaf, compared as an exact instant unless a time override
    /// is registered.
    Time(DateTime<Utc>),
    /// Ordered sequence. Order matters.
    Seq(Vec<Value>),
    /// Key-value mapping. Keys are exact strings; registered overrides apply
    /// to values only, never to keys.
    Map(BTreeMap<String, Value>),
    /// Aggregate with a nominal type name and named fields. Records with
    /// different names have different runtime types.
    Record {
        name: String,
        fields: Vec<(String, Value)>,
    },
}

/// Stable runtime type identity of a [`Value`], used as the override
/// registry key.
///
/// `Value::Absent` carries no tag: absence is resolved by the engine before
/// override dispatch, so equivalence functions never see it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    Int,
    UInt,
    F32,
    F64,
    Str,
    Bytes,
    Time,
    Seq,
    Map,
    Record(String),
}

impl Value {
    /// Runtime type identity, `None` for [`Value::Absent`].
    pub fn type_tag(&self) -> Option<TypeTag> {
        match self {
            Value::Absent => None,
            Value::Bool(_) => Some(TypeTag::Bool),
            Value::Int(_) => Some(TypeTag::Int),
            Value::UInt(_) => Some(TypeTag::UInt),
            Value::F32(_) => Some(TypeTag::F32),
            Value::F64(_) => Some(TypeTag::F64),
            Value::Str(_) => Some(TypeTag::Str),
            Value::Bytes(_) => Some(TypeTag::Bytes),
            Value::Time(_) => Some(TypeTag::Time),
            Value::Seq(_) => Some(TypeTag::Seq),
            Value::Map(_) => Some(TypeTag::Map),
            Value::Record { name, .. } => Some(TypeTag::Record(name.clone())),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Human-readable kind name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Absent => "absent",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Time(_) => "time",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "map",
            Value::Record { .. } => "record",
        }
    }

    /// Builds a record value from a type name and named fields.
    pub fn record<N, K, F>(name: N, fields: F) -> Value
    where
        N: Into<String>,
        K: Into<String>,
        F: IntoIterator<Item = (K, Value)>,
    {
        Value::Record {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(field, value)| (field.into(), value))
                .collect(),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Value {
        Value::UInt(u64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Value {
        Value::UInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Value {
        Value::F32(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::F64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::Str(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Value {
        Value::Time(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Value {
        Value::Seq(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Value {
        Value::Map(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Value {
        match v {
            Some(inner) => inner.into(),
            None => Value::Absent,
        }
    }
}
