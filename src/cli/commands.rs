// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `train`, `serve` and `predict`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::serve_use_case::ServeConfig;
use crate::application::train_use_case::TrainConfig;

/// The three top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the heart-disease classifier on a CSV dataset
    Train(TrainArgs),

    /// Serve predictions over HTTP from saved artifacts
    Serve(ServeArgs),

    /// Classify a single JSON record from the command line
    Predict(PredictArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Path to the training CSV
    #[arg(long, default_value = "datasets/heart.csv")]
    pub data: String,

    /// Directory to write model.bin, metadata.json and metrics.json
    #[arg(long, default_value = "model")]
    pub model_dir: String,

    /// Name of the target column to predict
    #[arg(long, default_value = "HeartDisease")]
    pub target: String,

    /// Fraction of each class held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,

    /// Number of trees in the forest
    #[arg(long, default_value_t = 100)]
    pub n_estimators: usize,

    /// Maximum tree depth; unbounded when omitted
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Minimum node size eligible for splitting
    #[arg(long, default_value_t = 2)]
    pub min_samples_split: usize,

    /// Minimum samples each side of a split must keep
    #[arg(long, default_value_t = 1)]
    pub min_samples_leaf: usize,

    /// RNG seed for the split and the forest (reproducible runs)
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:         a.data,
            model_dir:         a.model_dir,
            target:            a.target,
            test_size:         a.test_size,
            n_estimators:      a.n_estimators,
            max_depth:         a.max_depth,
            min_samples_split: a.min_samples_split,
            min_samples_leaf:  a.min_samples_leaf,
            seed:              a.seed,
        }
    }
}

/// All arguments for the `serve` command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Directory holding the trained artifacts
    #[arg(long, default_value = "model")]
    pub model_dir: String,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5000)]
    pub port: u16,
}

impl From<ServeArgs> for ServeConfig {
    fn from(a: ServeArgs) -> Self {
        ServeConfig {
            model_dir: a.model_dir,
            host:      a.host,
            port:      a.port,
        }
    }
}

/// All arguments for the `predict` command
#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Directory holding the trained artifacts
    #[arg(long, default_value = "model")]
    pub model_dir: String,

    /// The record to classify, as an inline JSON object
    #[arg(long, conflicts_with = "input_file")]
    pub input: Option<String>,

    /// Path to a file containing the JSON record
    #[arg(long)]
    pub input_file: Option<String>,
}
