//! Core types for the TPMS validator library
//!
//! This module defines the decoded record the validator consumes and the error
//! type returned by fallible loaders. Records are immutable once parsed: every
//! optional field is an explicit `Option`, and fields the validator does not
//! inspect are preserved in `extra`.

use crate::protocols::formula::{Quantity, Unit};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// Result type for validator operations
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Discriminator used to group records that carry no `model`
pub const UNKNOWN_MODEL: &str = "unknown";

/// Category tag a record must carry to be validated
pub const TPMS_TYPE: &str = "TPMS";

/// Volatile field left out of reference-record signatures
pub const TIME_FIELD: &str = "time";

/// Errors that can occur while loading records
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    #[error("{source_name} line {line}: invalid JSON: {message}")]
    MalformedLine {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error("Source not found: {0:?}")]
    SourceNotFound(PathBuf),

    #[error("Cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to discover files: {0}")]
    DiscoveryError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Sensor identity as the decoder reports it
///
/// Each protocol picks its own JSON type for `id`. Integers and strings keep
/// their value; anything else (wide unsigned, float, bool, array, object) is
/// held as its canonical JSON text so it can still be hashed and compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric ID
    Number(i64),
    /// Numeric ID above `i64::MAX`
    Unsigned(u64),
    /// Hex or otherwise formatted ID
    Text(String),
    /// Any other JSON value, as canonical JSON text
    #[serde(
        deserialize_with = "deserialize_canonical",
        serialize_with = "serialize_canonical"
    )]
    Other(String),
}

fn deserialize_canonical<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| value.to_string())
}

fn serialize_canonical<S>(text: &str, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    canonical_value(text).serialize(serializer)
}

fn canonical_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::from(text))
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Unsigned(n) => write!(f, "{}", n),
            RecordId::Text(s) | RecordId::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<&RecordId> for Value {
    fn from(id: &RecordId) -> Self {
        match id {
            RecordId::Number(n) => Value::from(*n),
            RecordId::Unsigned(n) => Value::from(*n),
            RecordId::Text(s) => Value::from(s.as_str()),
            RecordId::Other(s) => canonical_value(s),
        }
    }
}

/// One decoded sensor transmission, parsed from a JSON line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedRecord {
    /// Protocol discriminator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Sensor identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,

    /// Category tag, expected to be "TPMS"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(rename = "pressure_kPa", default, skip_serializing_if = "Option::is_none")]
    pub pressure_kpa: Option<f64>,

    #[serde(rename = "pressure_PSI", default, skip_serializing_if = "Option::is_none")]
    pub pressure_psi: Option<f64>,

    #[serde(rename = "temperature_C", default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,

    #[serde(rename = "temperature_F", default, skip_serializing_if = "Option::is_none")]
    pub temperature_f: Option<f64>,

    /// Capture time (string or number), never inspected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Value>,

    /// Every other field, preserved but not inspected
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DecodedRecord {
    /// Parse a record from one JSON line
    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    /// Discriminator used for grouping and dispatch
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(UNKNOWN_MODEL)
    }

    /// True when the record is tagged as a TPMS transmission
    pub fn is_tpms(&self) -> bool {
        self.kind.as_deref() == Some(TPMS_TYPE)
    }

    /// Reading in the given unit, if present
    pub fn reading(&self, unit: Unit) -> Option<f64> {
        match unit {
            Unit::Kilopascal => self.pressure_kpa,
            Unit::Psi => self.pressure_psi,
            Unit::Celsius => self.temperature_c,
            Unit::Fahrenheit => self.temperature_f,
        }
    }

    /// All readings of a quantity present on the record, in unit order
    pub fn readings(&self, quantity: Quantity) -> Vec<(Unit, f64)> {
        quantity
            .units()
            .iter()
            .filter_map(|&unit| self.reading(unit).map(|v| (unit, v)))
            .collect()
    }

    /// Deduplication key for user captures
    pub fn identity(&self) -> (String, Option<RecordId>) {
        (self.model().to_string(), self.id.clone())
    }

    /// Canonical text of every field except `time`
    ///
    /// Keys come out sorted: the workspace builds serde_json without
    /// `preserve_order`, so `Map` is ordered.
    pub fn signature(&self) -> String {
        let mut fields = self.extra.clone();
        fields.remove(TIME_FIELD);

        if let Some(model) = &self.model {
            fields.insert("model".to_string(), Value::from(model.as_str()));
        }
        if let Some(id) = &self.id {
            fields.insert("id".to_string(), Value::from(id));
        }
        if let Some(kind) = &self.kind {
            fields.insert("type".to_string(), Value::from(kind.as_str()));
        }
        for unit in [Unit::Kilopascal, Unit::Psi, Unit::Celsius, Unit::Fahrenheit] {
            if let Some(value) = self.reading(unit) {
                fields.insert(unit.field_name().to_string(), Value::from(value));
            }
        }

        Value::Object(fields).to_string()
    }
}
