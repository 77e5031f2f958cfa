// ============================================================
// Layer 3 — Prediction
// ============================================================
// The classifier's answer for one record: the winning class
// label plus the full probability vector, aligned with the
// schema's class order.

use serde::{Deserialize, Serialize};

/// The result of classifying one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// The predicted class label (e.g. 0 = no disease, 1 = disease)
    pub label: i64,

    /// One probability per class, in the schema's class order.
    /// Sums to 1 within float tolerance.
    pub probabilities: Vec<f64>,
}

impl Prediction {
    pub fn new(label: i64, probabilities: Vec<f64>) -> Self {
        Self { label, probabilities }
    }
}
