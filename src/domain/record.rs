// ============================================================
// Layer 3 — Patient Record
// ============================================================
// One observation to classify: a map from feature name to value.
//
// The map is deliberately kept as raw JSON values. A record can
// arrive from the HTTP endpoint or from the `predict` CLI, and
// in both cases validation (is every feature present? is a
// numeric field actually a number?) happens downstream, where
// the fitted pipeline knows what each column should be.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single input observation, keyed by feature name.
/// `#[serde(transparent)]` makes it (de)serialise as a bare
/// JSON object, which is exactly what the endpoint receives.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientRecord {
    pub fields: Map<String, Value>,
}

impl PatientRecord {
    /// Wrap an already-parsed JSON object map
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a record from any JSON value.
    /// Returns None if the value is not an object — a bare array
    /// or scalar cannot name its features.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Look up one feature value by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Does the record supply this feature at all?
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}
