// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw CSV file all the
// way to the dense feature matrix the forest trains on.
//
// The pipeline flows in this order:
//
//   heart.csv
//       │
//       ▼
//   CsvLoader        → reads the file, keeps column order
//       │
//       ▼
//   DataTable        → column-major storage, infers which
//       │              columns are numeric vs categorical
//       ▼
//   split_train_test → stratified, seeded train/test split
//       │
//       ▼
//   FeaturePipeline  → one-hot encodes categoricals and
//       │              standard-scales numericals
//       ▼
//   Array2<f64>      → ready for RandomForest::fit
//
// Each module is responsible for exactly one step, so each
// step is independently testable and replaceable.

/// Reads the training CSV into a DataTable
pub mod loader;

/// Column-major table with numeric/categorical type inference
pub mod table;

/// Stratified, seeded train/test splitting
pub mod splitter;

/// One-hot encoding + standard scaling (the fitted preprocessor)
pub mod encoder;
