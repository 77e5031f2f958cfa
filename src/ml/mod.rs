// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// This layer contains the classifier itself. No other layer
// implements learning logic — the data layer only encodes, and
// the application layer only orchestrates.
//
// What's in this layer:
//
//   tree.rs      — A single CART decision tree: Gini impurity,
//                  midpoint thresholds, per-node random feature
//                  subsets, leaves holding class distributions
//
//   forest.rs    — The bagged ensemble: bootstrap sampling,
//                  per-tree derived seeds, probability
//                  averaging across trees
//
//   metrics.rs   — Held-out evaluation: accuracy plus a full
//                  per-class precision/recall/f1 report
//
//   predictor.rs — The ModelBundle (schema + pipeline + forest),
//                  the single inference path shared by the HTTP
//                  route and the predict CLI
//
// Reference: Breiman (2001) Random Forests

/// CART decision tree with Gini impurity
pub mod tree;

/// Bootstrap-aggregated tree ensemble
pub mod forest;

/// Accuracy and classification report
pub mod metrics;

/// The persisted schema + pipeline + forest bundle
pub mod predictor;
