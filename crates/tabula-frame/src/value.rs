use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::TableError;

/// Output format for [`Value::Date`] cells.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Output format for [`Value::DateTime`] cells. Fractional seconds are only
/// printed when non-zero.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// The closed set of kinds a cell (or a column) can have.
///
/// A column whose cells are all null is tagged [`ScalarKind::Null`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    /// UTF-8 text.
    Text,
    /// A 64-bit signed integer.
    Integer,
    /// A 64-bit floating-point number.
    Float,
    /// A calendar date without time zone.
    Date,
    /// A calendar date and wall-clock time without time zone.
    DateTime,
    /// The kind of null cells, and of columns holding only nulls.
    Null,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Text => "text",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "datetime",
            ScalarKind::Null => "null",
        };
        f.write_str(name)
    }
}

impl FromStr for ScalarKind {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" | "str" => Ok(ScalarKind::Text),
            "integer" | "int" => Ok(ScalarKind::Integer),
            "float" | "double" => Ok(ScalarKind::Float),
            "date" => Ok(ScalarKind::Date),
            "datetime" | "date_time" | "timestamp" => Ok(ScalarKind::DateTime),
            "null" | "nil" | "none" => Ok(ScalarKind::Null),
            other => Err(TableError::InvalidInputShape(format!(
                "unknown scalar kind '{other}'"
            ))),
        }
    }
}

/// A single cell, or a column name.
///
/// Floats compare and hash by bit pattern (with `-0.0` folded into `0.0`), so
/// values can be used as hash-set members when detecting duplicate rows or
/// matching join keys.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Value::Null => ScalarKind::Null,
            Value::Text(_) => ScalarKind::Text,
            Value::Integer(_) => ScalarKind::Integer,
            Value::Float(_) => ScalarKind::Float,
            Value::Date(_) => ScalarKind::Date,
            Value::DateTime(_) => ScalarKind::DateTime,
        }
    }

    /// True only for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null or empty text. Such values never take part in a key match.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric view of integer and float cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Converts an untyped JSON scalar into a cell.
    ///
    /// Booleans, arrays and objects are not scalar kinds and are rejected, as
    /// are integers above `i64::MAX`. Integer literals too large for `u64`
    /// are already floats when parsed and are kept as [`Value::Float`].
    pub fn from_json(json: &serde_json::Value) -> Result<Self, TableError> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::String(s) => Ok(Value::Text(s.clone())),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Value::Integer(i)),
                None if n.is_u64() => Err(TableError::InvalidInputShape(format!(
                    "integer {n} is out of range"
                ))),
                None => n.as_f64().map(Value::Float).ok_or_else(|| {
                    TableError::InvalidInputShape(format!("unrepresentable number {n}"))
                }),
            },
            other => Err(TableError::InvalidInputShape(format!(
                "unsupported cell value {other}"
            ))),
        }
    }

    /// Converts this cell into JSON. Dates become ISO-8601 strings and
    /// non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Date(_) | Value::DateTime(_) => serde_json::Value::String(self.to_string()),
        }
    }

    fn float_bits(f: f64) -> u64 {
        if f == 0.0 {
            0.0_f64.to_bits()
        } else {
            f.to_bits()
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => Self::float_bits(*a) == Self::float_bits(*b),
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => Self::float_bits(*f).hash(state),
            Value::Date(d) => d.hash(state),
            Value::DateTime(dt) => dt.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Date(_) | Value::DateTime(_) => serializer.collect_str(self),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.clone())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
