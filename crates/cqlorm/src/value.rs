//! Bind values and driver-native scalars.

use crate::error::{OrmError, OrmResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// A single bind value or column value.
///
/// `BigInt`, `Counter`, `Uuid` and `TimeUuid` are the wrapper types a driver hands
/// back for 64-bit and UUID columns; [`Row::post_process`](crate::Row::post_process)
/// flattens them into `Int` / `Text`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Boolean(bool),
    /// Plain integer.
    Int(i64),
    Double(f64),
    Text(String),
    /// Driver-native `bigint`.
    BigInt(i64),
    /// Driver-native `counter`.
    Counter(i64),
    Uuid(Uuid),
    TimeUuid(Uuid),
    Timestamp(DateTime<Utc>),
    Blob(Vec<u8>),
    List(Vec<Value>),
}

impl Value {
    /// Convert a dynamic JSON value into a bind value.
    ///
    /// Objects are rejected; arrays become [`Value::List`].
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        Ok(match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Double(n.as_f64().ok_or_else(|| {
                    OrmError::InvalidValue(format!("number {n} is out of range"))
                })?),
            },
            serde_json::Value::String(s) => Value::Text(s.clone()),
            serde_json::Value::Array(items) => Value::List(
                items
                    .iter()
                    .map(Value::from_json)
                    .collect::<OrmResult<Vec<_>>>()?,
            ),
            serde_json::Value::Object(_) => {
                return Err(OrmError::InvalidValue(
                    "objects cannot be bound as a single value".to_string(),
                ));
            }
        })
    }

    /// Check for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Flatten driver-native wrappers into plain values.
    pub fn flatten(self) -> Self {
        match self {
            Value::BigInt(v) | Value::Counter(v) => Value::Int(v),
            Value::Uuid(u) | Value::TimeUuid(u) => Value::Text(u.to_string()),
            other => other,
        }
    }

    /// Name of the variant, used in decode errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::BigInt(_) => "bigint",
            Value::Counter(_) => "counter",
            Value::Uuid(_) => "uuid",
            Value::TimeUuid(_) => "timeuuid",
            Value::Timestamp(_) => "timestamp",
            Value::Blob(_) => "blob",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Int(v) | Value::BigInt(v) | Value::Counter(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
            Value::Uuid(u) | Value::TimeUuid(u) => write!(f, "{u}"),
            Value::Timestamp(ts) => write!(f, "{}", ts.timestamp_millis()),
            Value::Blob(bytes) => {
                f.write_str("0x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                Ok(())
            }
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Double(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Timestamp(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// An ordered column → value map, used for INSERT values, SET assignments and USING options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(String, Value)>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object, keeping key order.
    pub fn from_json(value: &serde_json::Value) -> OrmResult<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(OrmError::InvalidValue(
                "expected an object of column values".to_string(),
            ));
        };
        let mut out = ValueMap::new();
        for (k, v) in map {
            out.entries.push((k.clone(), Value::from_json(v)?));
        }
        Ok(out)
    }

    /// Set a column (builder form). An existing column keeps its position.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Set a column. An existing column keeps its position.
    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k == column) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == column).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = ValueMap::new();
        for (k, v) in iter {
            out.insert(&k.into(), v);
        }
        out
    }
}

/// Conversion from a column [`Value`] into a Rust type.
pub trait FromValue: Sized {
    /// Convert, naming `column` in the error on mismatch.
    fn from_value(column: &str, value: &Value) -> OrmResult<Self>;
}

fn mismatch(column: &str, expected: &str, got: &Value) -> OrmError {
    OrmError::decode(column, format!("expected {expected}, got {}", got.kind()))
}

impl FromValue for Value {
    fn from_value(_column: &str, value: &Value) -> OrmResult<Self> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Int(v) | Value::BigInt(v) | Value::Counter(v) => Ok(*v),
            other => Err(mismatch(column, "an integer", other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        let v = i64::from_value(column, value)?;
        i32::try_from(v).map_err(|_| OrmError::decode(column, format!("{v} overflows i32")))
    }
}

impl FromValue for f64 {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Double(v) => Ok(*v),
            Value::Int(v) => Ok(*v as f64),
            other => Err(mismatch(column, "a number", other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Boolean(b) => Ok(*b),
            other => Err(mismatch(column, "a boolean", other)),
        }
    }
}

impl FromValue for String {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Uuid(u) | Value::TimeUuid(u) => Ok(u.to_string()),
            other => Err(mismatch(column, "text", other)),
        }
    }
}

impl FromValue for Uuid {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Uuid(u) | Value::TimeUuid(u) => Ok(*u),
            Value::Text(s) => {
                Uuid::parse_str(s).map_err(|e| OrmError::decode(column, e.to_string()))
            }
            other => Err(mismatch(column, "a uuid", other)),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Timestamp(ts) => Ok(*ts),
            other => Err(mismatch(column, "a timestamp", other)),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Blob(b) => Ok(b.clone()),
            other => Err(mismatch(column, "a blob", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(column: &str, value: &Value) -> OrmResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(column, other).map(Some),
        }
    }
}
