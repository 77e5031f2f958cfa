// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// One-shot inference from the command line: load the saved
// artifacts, parse a JSON record, classify it, return the
// result. The exact same inference path the HTTP route uses,
// which makes it a handy smoke test that the saved model works
// before putting a server in front of it.

use anyhow::{anyhow, Context, Result};

use crate::domain::prediction::Prediction;
use crate::domain::record::PatientRecord;
use crate::infra::artifact::ArtifactStore;
use crate::ml::predictor::ModelBundle;

pub struct PredictUseCase {
    bundle: ModelBundle,
}

impl PredictUseCase {
    /// Load the model bundle from the given directory.
    pub fn new(model_dir: &str) -> Result<Self> {
        let bundle = ArtifactStore::new(model_dir).load_bundle()?;
        Ok(Self { bundle })
    }

    /// Classify one record given as a JSON object string.
    pub fn predict_json(&self, json: &str) -> Result<Prediction> {
        let value: serde_json::Value =
            serde_json::from_str(json).context("Input is not valid JSON")?;
        let record = PatientRecord::from_value(value)
            .ok_or_else(|| anyhow!("Input must be a JSON object of feature values"))?;

        self.bundle.predict_record(&record)
    }

    /// The feature names the model expects, for help output
    pub fn feature_names(&self) -> &[String] {
        &self.bundle.schema.feature_names
    }
}
