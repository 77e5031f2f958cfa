// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// upper layers can swap implementations without changing the
// code that uses them:
//   - RandomForest implements Classifier
//   - A future gradient-boosted model could implement it too,
//     and the bundle / server code would not change
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

// ─── Classifier ───────────────────────────────────────────────────────────────
/// Any model that can score an already-encoded feature row.
///
/// Rows are plain `&[f64]` slices so the domain layer stays free
/// of array-library types. Class identity is positional: index i
/// corresponds to `FeatureSchema::classes[i]`.
pub trait Classifier {
    /// Number of classes this model distinguishes
    fn n_classes(&self) -> usize;

    /// Probability of each class for one encoded row.
    /// The returned vector has length `n_classes()` and sums to 1.
    fn predict_proba(&self, features: &[f64]) -> Vec<f64>;

    /// Index of the most probable class. Ties go to the lower
    /// class index (first maximum wins).
    fn predict(&self, features: &[f64]) -> usize {
        let proba = self.predict_proba(features);
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        best
    }
}
