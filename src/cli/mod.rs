// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `train`   — fits the classifier and writes artifacts
//   2. `serve`   — runs the HTTP prediction API
//   3. `predict` — classifies one JSON record and prints it
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use commands::{Commands, PredictArgs, ServeArgs, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "heart-disease-api",
    version,
    about = "Train a heart-disease classifier on CSV data, then serve predictions over HTTP."
)]
pub struct Cli {
    /// The subcommand to run (train, serve or predict)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Serve(args) => Self::run_serve(args),
            Commands::Predict(args) => Self::run_predict(args),
        }
    }

    /// Handles the `train` subcommand.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on '{}'", args.data);
        let model_dir = args.model_dir.clone();

        // Convert CLI args → application config (separates presentation from domain)
        let report = TrainUseCase::new(args.into()).execute()?;

        println!(
            "Training complete. Accuracy {:.4} on {} held-out rows.",
            report.accuracy, report.support
        );
        println!("Artifacts saved to '{}'.", model_dir);
        Ok(())
    }

    /// Handles the `serve` subcommand. Blocks until killed.
    fn run_serve(args: ServeArgs) -> Result<()> {
        use crate::application::serve_use_case::ServeUseCase;

        ServeUseCase::new(args.into()).execute()
    }

    /// Handles the `predict` subcommand.
    /// Reads the record from --input or --input-file and prints
    /// the label and per-class probabilities.
    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let use_case = PredictUseCase::new(&args.model_dir)?;

        let json = match (&args.input, &args.input_file) {
            (Some(inline), _) => inline.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Cannot read input file '{}'", path))?,
            (None, None) => {
                return Err(anyhow!(
                    "Provide the record via --input or --input-file \
                     (expected features: {:?})",
                    use_case.feature_names()
                ))
            }
        };

        let prediction = use_case.predict_json(&json)?;

        println!("Prediction: {}", prediction.label);
        println!("Probabilities: {:?}", prediction.probabilities);
        Ok(())
    }
}
