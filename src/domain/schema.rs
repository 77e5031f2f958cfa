// ============================================================
// Layer 3 — Feature Schema
// ============================================================
// Describes the shape of the data the model was trained on:
//
//   feature_names — every input column, in dataset order
//   categorical   — the subset encoded with one-hot vectors
//   numerical     — the subset encoded with standard scaling
//   target        — the column the model predicts
//   classes       — the distinct target labels, sorted ascending
//
// The schema is derived once during training and then travels
// with the model: it is embedded in the binary artifact AND
// written to metadata.json as a human-readable sidecar.
// At inference time it is the single source of truth for
// which fields a request must contain.

use serde::{Deserialize, Serialize};

use crate::domain::record::PatientRecord;

/// The expected input columns and their classification.
/// Serialised verbatim as `metadata.json` next to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    /// All input feature names, in the order they appear in the
    /// training CSV. This order also fixes the wording of the
    /// "missing features" error message.
    pub feature_names: Vec<String>,

    /// Names of columns holding string categories (e.g. "Sex",
    /// "ChestPainType"). One-hot encoded.
    pub categorical: Vec<String>,

    /// Names of columns holding numbers (e.g. "Age", "RestingBP").
    /// Standard scaled.
    pub numerical: Vec<String>,

    /// The column the classifier predicts (e.g. "HeartDisease")
    pub target: String,

    /// Distinct class labels found in the target column,
    /// sorted ascending. Probability vectors align with this order.
    pub classes: Vec<i64>,
}

impl FeatureSchema {
    /// Return every expected feature that the record does NOT supply.
    /// An empty result means the record is complete.
    pub fn missing_features(&self, record: &PatientRecord) -> Vec<String> {
        self.feature_names
            .iter()
            .filter(|name| !record.contains(name))
            .cloned()
            .collect()
    }

    /// Number of input features (excludes the target)
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Number of distinct target classes
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_schema() -> FeatureSchema {
        FeatureSchema {
            feature_names: vec!["Age".into(), "Sex".into(), "MaxHR".into()],
            categorical:   vec!["Sex".into()],
            numerical:     vec!["Age".into(), "MaxHR".into()],
            target:        "HeartDisease".into(),
            classes:       vec![0, 1],
        }
    }

    #[test]
    fn test_complete_record_has_no_missing_features() {
        let schema = sample_schema();
        let record = PatientRecord::from_value(json!({
            "Age": 54, "Sex": "M", "MaxHR": 150
        }))
        .unwrap();
        assert!(schema.missing_features(&record).is_empty());
    }

    #[test]
    fn test_missing_features_are_reported_by_name() {
        let schema = sample_schema();
        let record = PatientRecord::from_value(json!({ "Age": 54 })).unwrap();
        let missing = schema.missing_features(&record);
        assert_eq!(missing, vec!["Sex".to_string(), "MaxHR".to_string()]);
    }

    #[test]
    fn test_extra_fields_are_not_an_error() {
        let schema = sample_schema();
        let record = PatientRecord::from_value(json!({
            "Age": 54, "Sex": "M", "MaxHR": 150, "Unrelated": true
        }))
        .unwrap();
        assert!(schema.missing_features(&record).is_empty());
    }

    #[test]
    fn test_schema_round_trips_through_json() {
        let schema = sample_schema();
        let json   = serde_json::to_string(&schema).unwrap();
        let back: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, back);
    }
}
