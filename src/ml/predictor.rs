// ============================================================
// Layer 5 — Model Bundle (Inference Engine)
// ============================================================
// Everything needed to answer a prediction request, as one
// serialisable unit:
//
//   schema    — which fields a request must contain
//   pipeline  — the fitted one-hot + scaling transforms
//   forest    — the fitted classifier
//
// These three are bundled because they are only valid TOGETHER:
// a forest fed rows encoded by a different pipeline, or a
// pipeline fitted against a different schema, silently produces
// nonsense. Persisting one unit makes that mistake impossible.
//
// predict_record is the single inference path. The HTTP route
// and the `predict` CLI both call it, so validation behaviour
// cannot drift between the two.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::encoder::FeaturePipeline;
use crate::domain::prediction::Prediction;
use crate::domain::record::PatientRecord;
use crate::domain::schema::FeatureSchema;
use crate::domain::traits::Classifier;
use crate::ml::forest::RandomForest;

/// The persisted unit: schema + fitted pipeline + fitted forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub schema: FeatureSchema,
    pub pipeline: FeaturePipeline,
    pub forest: RandomForest,
}

impl ModelBundle {
    /// Classify one record.
    ///
    /// Validation order: first check that every expected field is
    /// present (the error lists the full expected set), then check
    /// types while encoding, then run the forest. All errors here
    /// are client errors.
    pub fn predict_record(&self, record: &PatientRecord) -> Result<Prediction> {
        let missing = self.schema.missing_features(record);
        if !missing.is_empty() {
            bail!(
                "Missing features. Expected: {:?}",
                self.schema.feature_names
            );
        }

        let row = self.pipeline.transform_record(record)?;
        let probabilities = self.forest.predict_proba(&row);
        let class_idx = self.forest.predict(&row);
        let label = self.schema.classes[class_idx];

        Ok(Prediction::new(label, probabilities))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::DataTable;
    use crate::ml::forest::{ForestParams, RandomForest};
    use serde_json::json;

    /// Train a tiny real bundle: Age + Sex → label, where the
    /// label simply follows Sex.
    fn tiny_bundle() -> ModelBundle {
        let mut rows = Vec::new();
        for i in 0..20 {
            let (sex, label) = if i % 2 == 0 { ("M", "1") } else { ("F", "0") };
            rows.push(vec![
                format!("{}", 40 + i),
                sex.to_string(),
                label.to_string(),
            ]);
        }
        let table = DataTable::from_rows(
            vec!["Age".into(), "Sex".into(), "HeartDisease".into()],
            rows,
        )
        .unwrap();

        let schema = FeatureSchema {
            feature_names: vec!["Age".into(), "Sex".into()],
            categorical:   vec!["Sex".into()],
            numerical:     vec!["Age".into()],
            target:        "HeartDisease".into(),
            classes:       vec![0, 1],
        };

        let all_rows: Vec<usize> = (0..20).collect();
        let pipeline = FeaturePipeline::fit(&table, &schema, &all_rows).unwrap();
        let x = pipeline.transform_table(&table, &all_rows).unwrap();
        let y: Vec<usize> = (0..20).map(|i| if i % 2 == 0 { 1 } else { 0 }).collect();

        let params = ForestParams { n_estimators: 15, ..ForestParams::default() };
        let forest = RandomForest::fit(&x, &y, 2, &params).unwrap();

        ModelBundle { schema, pipeline, forest }
    }

    #[test]
    fn test_complete_record_predicts() {
        let bundle = tiny_bundle();
        let record = PatientRecord::from_value(json!({
            "Age": 50, "Sex": "M"
        }))
        .unwrap();

        let prediction = bundle.predict_record(&record).unwrap();
        assert_eq!(prediction.label, 1);
        assert_eq!(prediction.probabilities.len(), 2);
        assert!(
            (prediction.probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9
        );
    }

    #[test]
    fn test_missing_field_lists_the_expected_set() {
        let bundle = tiny_bundle();
        let record = PatientRecord::from_value(json!({ "Age": 50 })).unwrap();

        let err = bundle.predict_record(&record).unwrap_err().to_string();
        assert!(err.contains("Missing features"));
        assert!(err.contains("Age"));
        assert!(err.contains("Sex"));
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let bundle = tiny_bundle();
        let record = PatientRecord::from_value(json!({
            "Age": 61, "Sex": "F"
        }))
        .unwrap();
        let a = bundle.predict_record(&record).unwrap();
        let b = bundle.predict_record(&record).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bundle_round_trips_through_bincode() {
        let bundle = tiny_bundle();
        let bytes = bincode::serialize(&bundle).unwrap();
        let back: ModelBundle = bincode::deserialize(&bytes).unwrap();
        assert_eq!(bundle, back);
    }
}
