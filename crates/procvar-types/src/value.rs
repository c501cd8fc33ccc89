use std::fmt;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::period::Period;

/// Type tag of a process variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Null,
    Boolean,
    Integer,
    Double,
    String,
    Bytes,
    Date,
    Period,
    Duration,
    File,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Date => "date",
            Self::Period => "period",
            Self::Duration => "duration",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A variable payload tagged with its type.
///
/// File payloads are built by `procvar-file` and carry [`ValueType::File`]
/// there; they have no variant here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Date(chrono::DateTime<chrono::Utc>),
    Period(Period),
    Duration(Duration),
}

impl TypedValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null => ValueType::Null,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Integer(_) => ValueType::Integer,
            Self::Double(_) => ValueType::Double,
            Self::String(_) => ValueType::String,
            Self::Bytes(_) => ValueType::Bytes,
            Self::Date(_) => ValueType::Date,
            Self::Period(_) => ValueType::Period,
            Self::Duration(_) => ValueType::Duration,
        }
    }
}

impl From<Period> for TypedValue {
    fn from(period: Period) -> Self {
        Self::Period(period)
    }
}

impl From<Duration> for TypedValue {
    fn from(duration: Duration) -> Self {
        Self::Duration(duration)
    }
}

/// A named variable: a name plus a typed payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: TypedValue,
}

impl NamedValue {
    pub fn new(name: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }
}
