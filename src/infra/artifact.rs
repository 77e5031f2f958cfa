// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Owns the model directory and its three files:
//
//   model/
//     model.bin     ← bincode(ModelBundle) — everything the
//                     server needs to answer requests
//     metadata.json ← the FeatureSchema, pretty-printed, for
//                     humans and external tooling
//     metrics.json  ← the evaluation report of the training run
//
// Why both model.bin and metadata.json?
//   The binary artifact already embeds the schema, but ops
//   tooling (and curious humans) shouldn't need a Rust
//   deserialiser to find out which fields the model expects.
//   The JSON sidecar is documentation; the binary is the load
//   path. They are written together, from the same schema value,
//   so they cannot disagree.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::schema::FeatureSchema;
use crate::ml::metrics::ClassificationReport;
use crate::ml::predictor::ModelBundle;

const MODEL_FILE: &str = "model.bin";
const METADATA_FILE: &str = "metadata.json";
const METRICS_FILE: &str = "metrics.json";

/// Saves and loads everything under the model directory.
pub struct ArtifactStore {
    /// The model directory (created on first save)
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write the binary model artifact.
    pub fn save_bundle(&self, bundle: &ModelBundle) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Cannot create model directory '{}'", self.dir.display())
        })?;

        let path = self.dir.join(MODEL_FILE);
        let bytes = bincode::serialize(bundle)
            .context("Cannot serialise the model bundle")?;
        fs::write(&path, bytes)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        tracing::info!("Saved model artifact to '{}'", path.display());
        Ok(())
    }

    /// Load the binary model artifact.
    pub fn load_bundle(&self) -> Result<ModelBundle> {
        let path = self.dir.join(MODEL_FILE);
        let bytes = fs::read(&path).with_context(|| {
            format!(
                "Cannot read model artifact '{}'. Have you run 'train' first?",
                path.display()
            )
        })?;
        let bundle = bincode::deserialize(&bytes).with_context(|| {
            format!(
                "Model artifact '{}' is corrupt or from an incompatible version",
                path.display()
            )
        })?;

        tracing::info!("Loaded model artifact from '{}'", path.display());
        Ok(bundle)
    }

    /// Write the human-readable schema sidecar.
    pub fn save_metadata(&self, schema: &FeatureSchema) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Cannot create model directory '{}'", self.dir.display())
        })?;

        let path = self.dir.join(METADATA_FILE);
        let json = serde_json::to_string_pretty(schema)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        tracing::debug!("Saved metadata to '{}'", path.display());
        Ok(())
    }

    /// Write the evaluation report of the training run.
    pub fn save_metrics(&self, report: &ClassificationReport) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Cannot create model directory '{}'", self.dir.display())
        })?;

        let path = self.dir.join(METRICS_FILE);
        let json = serde_json::to_string_pretty(report)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;

        tracing::debug!("Saved metrics to '{}'", path.display());
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::encoder::FeaturePipeline;
    use crate::data::table::DataTable;
    use crate::ml::forest::{ForestParams, RandomForest};

    fn tiny_bundle() -> ModelBundle {
        let table = DataTable::from_rows(
            vec!["Age".into(), "HeartDisease".into()],
            (0..10)
                .map(|i| {
                    vec![
                        format!("{}", 40 + 3 * i),
                        format!("{}", if i < 5 { 0 } else { 1 }),
                    ]
                })
                .collect(),
        )
        .unwrap();
        let schema = FeatureSchema {
            feature_names: vec!["Age".into()],
            categorical:   vec![],
            numerical:     vec!["Age".into()],
            target:        "HeartDisease".into(),
            classes:       vec![0, 1],
        };
        let rows: Vec<usize> = (0..10).collect();
        let pipeline = FeaturePipeline::fit(&table, &schema, &rows).unwrap();
        let x = pipeline.transform_table(&table, &rows).unwrap();
        let y: Vec<usize> = (0..10).map(|i| usize::from(i >= 5)).collect();
        let params = ForestParams { n_estimators: 5, ..ForestParams::default() };
        let forest = RandomForest::fit(&x, &y, 2, &params).unwrap();
        ModelBundle { schema, pipeline, forest }
    }

    #[test]
    fn test_bundle_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());

        let bundle = tiny_bundle();
        store.save_bundle(&bundle).unwrap();
        let loaded = store.load_bundle().unwrap();
        assert_eq!(bundle, loaded);
    }

    #[test]
    fn test_load_without_training_explains_itself() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("empty"));
        let err = store.load_bundle().unwrap_err().to_string();
        assert!(err.contains("Have you run 'train' first?"));
    }

    #[test]
    fn test_corrupt_artifact_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MODEL_FILE), b"not a model").unwrap();
        let store = ArtifactStore::new(dir.path());
        let err = store.load_bundle().unwrap_err().to_string();
        assert!(err.contains("corrupt"));
    }

    #[test]
    fn test_metadata_sidecar_matches_schema() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let bundle = tiny_bundle();

        store.save_metadata(&bundle.schema).unwrap();
        let raw = fs::read_to_string(dir.path().join(METADATA_FILE)).unwrap();
        let parsed: FeatureSchema = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, bundle.schema);
    }
}
