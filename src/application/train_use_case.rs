// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the CSV dataset        (Layer 4 - data)
//   Step 2: Derive the feature schema   (Layer 3 - domain)
//   Step 3: Stratified train/test split (Layer 4 - data)
//   Step 4: Fit the feature pipeline    (Layer 4 - data)
//   Step 5: Fit the random forest       (Layer 5 - ml)
//   Step 6: Evaluate on the test split  (Layer 5 - ml)
//   Step 7: Save the artifacts          (Layer 6 - infra)
//
// The pipeline and the forest are fitted on the TRAINING split
// only; the test split is touched exactly once, for the report.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    encoder::FeaturePipeline,
    loader::CsvLoader,
    splitter::split_train_test,
    table::{Column, DataTable},
};
use crate::domain::schema::FeatureSchema;
use crate::infra::artifact::ArtifactStore;
use crate::ml::forest::{ForestParams, RandomForest};
use crate::ml::metrics::ClassificationReport;
use crate::ml::predictor::ModelBundle;

// ─── Training Configuration ──────────────────────────────────────────────────
// Everything a training run needs. Serialisable so a run can be
// reproduced from a recorded config. The defaults mirror the
// CLI defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_path:         String,
    pub model_dir:         String,
    pub target:            String,
    pub test_size:         f64,
    pub n_estimators:      usize,
    pub max_depth:         Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf:  usize,
    pub seed:              u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_path:         "datasets/heart.csv".to_string(),
            model_dir:         "model".to_string(),
            target:            "HeartDisease".to_string(),
            test_size:         0.2,
            n_estimators:      100,
            max_depth:         None,
            min_samples_split: 2,
            min_samples_leaf:  1,
            seed:              42,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    /// Returns the evaluation report of the run.
    pub fn execute(&self) -> Result<ClassificationReport> {
        let cfg = &self.config;

        if !(cfg.test_size > 0.0 && cfg.test_size < 1.0) {
            bail!(
                "test size must be strictly between 0 and 1, got {}",
                cfg.test_size
            );
        }

        // ── Step 1: Load the dataset ─────────────────────────────────────────
        tracing::info!("Loading dataset from '{}'", cfg.data_path);
        let table = CsvLoader::new(&cfg.data_path).load()?;

        // ── Step 2: Derive the schema ────────────────────────────────────────
        // Target labels first, then classify the remaining columns
        // by their inferred type.
        let labels = extract_class_labels(&table, &cfg.target)?;
        let mut classes: Vec<i64> = labels.clone();
        classes.sort_unstable();
        classes.dedup();
        if classes.len() < 2 {
            bail!(
                "Target column '{}' has a single class; nothing to learn",
                cfg.target
            );
        }

        let schema = build_schema(&table, &cfg.target, classes)?;
        tracing::info!(
            "Schema: {} features ({} categorical, {} numerical), {} classes",
            schema.n_features(),
            schema.categorical.len(),
            schema.numerical.len(),
            schema.n_classes()
        );

        // Class indices (positions in schema.classes) for every row
        let y: Vec<usize> = labels
            .iter()
            .map(|label| {
                schema
                    .classes
                    .iter()
                    .position(|c| c == label)
                    .unwrap_or_default()
            })
            .collect();

        // ── Step 3: Stratified train/test split ──────────────────────────────
        let (train_rows, test_rows) =
            split_train_test(&y, cfg.test_size, cfg.seed);
        tracing::info!(
            "Split: {} train rows, {} test rows",
            train_rows.len(),
            test_rows.len()
        );
        if test_rows.is_empty() {
            bail!("Test split is empty; the dataset is too small for --test-size {}", cfg.test_size);
        }

        // ── Step 4: Fit the feature pipeline on the training rows ────────────
        let pipeline = FeaturePipeline::fit(&table, &schema, &train_rows)?;
        let x_train = pipeline.transform_table(&table, &train_rows)?;
        let y_train: Vec<usize> = train_rows.iter().map(|&r| y[r]).collect();
        tracing::info!(
            "Encoded {} training rows into {} features",
            x_train.nrows(),
            pipeline.n_output_features()
        );

        // ── Step 5: Fit the forest ───────────────────────────────────────────
        let params = ForestParams {
            n_estimators:      cfg.n_estimators,
            max_depth:         cfg.max_depth,
            min_samples_split: cfg.min_samples_split,
            min_samples_leaf:  cfg.min_samples_leaf,
            seed:              cfg.seed,
        };
        tracing::info!("Fitting {} trees", params.n_estimators);
        let forest = RandomForest::fit(&x_train, &y_train, schema.n_classes(), &params)?;

        // ── Step 6: Evaluate on the held-out rows ────────────────────────────
        let x_test = pipeline.transform_table(&table, &test_rows)?;
        let y_test: Vec<usize> = test_rows.iter().map(|&r| y[r]).collect();
        let y_pred = forest.predict_batch(&x_test);
        let report = ClassificationReport::compute(&y_test, &y_pred, &schema.classes);
        report.log_summary();

        // ── Step 7: Save the artifacts ───────────────────────────────────────
        let store = ArtifactStore::new(&cfg.model_dir);
        let bundle = ModelBundle { schema, pipeline, forest };
        store.save_bundle(&bundle)?;
        store.save_metadata(&bundle.schema)?;
        store.save_metrics(&report)?;

        Ok(report)
    }
}

/// Read the target column as integer class labels.
/// The target must be numeric with whole-number values (0/1 for
/// the heart-disease dataset); anything else is a data error.
fn extract_class_labels(table: &DataTable, target: &str) -> Result<Vec<i64>> {
    let column = table
        .column(target)
        .with_context(|| format!("Target column '{}' not found in the dataset", target))?;

    let values = match column {
        Column::Numeric(values) => values,
        Column::Categorical(_) => {
            bail!("Target column '{}' must contain integer class labels", target)
        }
    };

    values
        .iter()
        .map(|&v| {
            if (v - v.round()).abs() < 1e-9 {
                Ok(v.round() as i64)
            } else {
                bail!(
                    "Target column '{}' contains non-integer value {}",
                    target,
                    v
                )
            }
        })
        .collect()
}

/// Build the schema from every non-target column, preserving the
/// CSV column order.
fn build_schema(
    table: &DataTable,
    target: &str,
    classes: Vec<i64>,
) -> Result<FeatureSchema> {
    let mut feature_names = Vec::new();
    let mut categorical = Vec::new();
    let mut numerical = Vec::new();

    for name in table.headers() {
        if name == target {
            continue;
        }
        feature_names.push(name.clone());
        match table.column(name) {
            Some(Column::Numeric(_)) => numerical.push(name.clone()),
            Some(Column::Categorical(_)) => categorical.push(name.clone()),
            None => unreachable!("header without a column"),
        }
    }

    if feature_names.is_empty() {
        bail!("Dataset has no feature columns besides the target");
    }

    Ok(FeatureSchema {
        feature_names,
        categorical,
        numerical,
        target: target.to_string(),
        classes,
    })
}
