use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("payload must be a JSON object")]
    InvalidPayloadType,
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("unknown {field} code: {code}")]
    UnknownCode { field: &'static str, code: Value },
    #[error("{field} is not a number: {value}")]
    InvalidNumber { field: &'static str, value: Value },
    #[error("{field} is not a valid timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("unknown access level: {0}")]
    UnknownAccessLevel(String),
}

/// Immutable, insertion-ordered view over a JSON object.
///
/// Records are never edited in place; decoded variants are produced with
/// [`Record::merge`], which rewrites selected keys and keeps every other
/// field of the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn from_value(payload: Value) -> Result<Self, DecodeError> {
        match payload {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(DecodeError::InvalidPayloadType),
        }
    }

    /// Overrides keep the position of the key they replace.
    pub fn merge<I>(base: Map<String, Value>, overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Value)>,
    {
        let mut map = base;
        for (key, value) in overrides {
            map.insert(key.to_string(), value);
        }
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub(crate) fn into_object(payload: Value) -> Result<Map<String, Value>, DecodeError> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::InvalidPayloadType),
    }
}

pub(crate) fn require<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, DecodeError> {
    object.get(field).ok_or(DecodeError::MissingField(field))
}

pub(crate) fn require_code(value: &Value, field: &'static str) -> Result<i64, DecodeError> {
    value.as_i64().ok_or_else(|| DecodeError::UnknownCode {
        field,
        code: value.clone(),
    })
}

pub(crate) fn coerce_f64(value: &Value, field: &'static str) -> Result<f64, DecodeError> {
    let parsed = match value {
        Value::Null => return Err(DecodeError::MissingField(field)),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|number| number.is_finite())
        .ok_or_else(|| DecodeError::InvalidNumber {
            field,
            value: value.clone(),
        })
}

/// Accepts RFC 3339 and the offset-less form the sessions endpoint uses,
/// which is taken as UTC.
pub(crate) fn parse_timestamp(
    text: &str,
    field: &'static str,
) -> Result<DateTime<Utc>, DecodeError> {
    let trimmed = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| DecodeError::InvalidTimestamp {
            field,
            value: text.to_string(),
        })
}
