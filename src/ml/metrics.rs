// ============================================================
// Layer 5 — Evaluation Metrics
// ============================================================
// Computes the held-out evaluation after training:
//
//   accuracy   — fraction of test rows predicted correctly
//   per class  — precision, recall, f1 and support
//   macro avg  — unweighted mean over classes
//   weighted   — support-weighted mean over classes
//
// The whole report is serialisable; the train use case logs a
// summary and writes the full report to metrics.json so a run
// leaves a permanent record of how good the saved model was.
//
// Conventions for empty denominators: a class that was never
// predicted has precision 0, a class with no test rows has
// recall 0.

use serde::{Deserialize, Serialize};

/// Fraction of predictions that match the truth
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(t, p)| t == p)
        .count();
    correct as f64 / y_true.len() as f64
}

/// Precision/recall/f1 for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    /// The class label these numbers describe
    pub label: i64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of test rows truly in this class
    pub support: usize,
}

/// Averaged metrics across classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragedMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// The full evaluation of a fitted model on the held-out split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    pub macro_avg: AveragedMetrics,
    pub weighted_avg: AveragedMetrics,
    /// Total number of evaluated rows
    pub support: usize,
}

impl ClassificationReport {
    /// Build the report from class-index vectors.
    /// `classes` maps an index back to its label for display.
    pub fn compute(y_true: &[usize], y_pred: &[usize], classes: &[i64]) -> Self {
        let n_classes = classes.len();
        let total = y_true.len();

        // Confusion counts per class
        let mut tp = vec![0usize; n_classes];
        let mut fp = vec![0usize; n_classes];
        let mut fn_ = vec![0usize; n_classes];
        for (&t, &p) in y_true.iter().zip(y_pred) {
            if t == p {
                tp[t] += 1;
            } else {
                fp[p] += 1;
                fn_[t] += 1;
            }
        }

        let mut per_class = Vec::with_capacity(n_classes);
        for (idx, &label) in classes.iter().enumerate() {
            let support = tp[idx] + fn_[idx];
            let precision = ratio(tp[idx], tp[idx] + fp[idx]);
            let recall = ratio(tp[idx], support);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            per_class.push(ClassMetrics { label, precision, recall, f1, support });
        }

        let macro_avg = AveragedMetrics {
            precision: mean(per_class.iter().map(|c| c.precision)),
            recall:    mean(per_class.iter().map(|c| c.recall)),
            f1:        mean(per_class.iter().map(|c| c.f1)),
        };

        let weight = |f: fn(&ClassMetrics) -> f64| {
            if total == 0 {
                0.0
            } else {
                per_class
                    .iter()
                    .map(|c| f(c) * c.support as f64)
                    .sum::<f64>()
                    / total as f64
            }
        };
        let weighted_avg = AveragedMetrics {
            precision: weight(|c| c.precision),
            recall:    weight(|c| c.recall),
            f1:        weight(|c| c.f1),
        };

        Self {
            accuracy: accuracy(y_true, y_pred),
            per_class,
            macro_avg,
            weighted_avg,
            support: total,
        }
    }

    /// Log the report at info level, one line per class
    pub fn log_summary(&self) {
        tracing::info!(
            "Accuracy: {:.4} ({} test rows)",
            self.accuracy,
            self.support
        );
        for c in &self.per_class {
            tracing::info!(
                "Class {}: precision={:.4} recall={:.4} f1={:.4} support={}",
                c.label,
                c.precision,
                c.recall,
                c.f1,
                c.support
            );
        }
        tracing::info!(
            "Macro avg: precision={:.4} recall={:.4} f1={:.4}",
            self.macro_avg.precision,
            self.macro_avg.recall,
            self.macro_avg.f1
        );
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        0.0
    } else {
        collected.iter().sum::<f64>() / collected.len() as f64
    }
}
