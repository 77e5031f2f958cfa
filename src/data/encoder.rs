// ============================================================
// Layer 4 — Feature Pipeline (One-Hot + Standard Scaling)
// ============================================================
// The fitted preprocessor that turns raw records into dense
// feature rows. Two transforms, fitted on the TRAINING split
// only and then frozen:
//
//   OneHotEncoder  — per categorical column. Categories are the
//                    sorted distinct training values; a value
//                    never seen in training encodes as the
//                    all-zeros block (unknown categories must
//                    not fail at inference time).
//
//   StandardScaler — per numerical column. (x - mean) / scale,
//                    with population variance; a zero-variance
//                    column gets scale 1 so it maps to 0 instead
//                    of dividing by zero.
//
// Output layout, fixed at fit time:
//
//   [ cat col 1 one-hot | cat col 2 one-hot | ... | scaled numericals ]
//
// Categorical blocks come first, in schema order, then the
// scaled numerical columns, also in schema order. The same
// layout is produced for a whole table (training) and for a
// single PatientRecord (inference), so a model trained on one
// is always fed compatible rows by the other.
//
// The whole pipeline is serde-serialisable: it is part of the
// model artifact, because a forest without the exact encoding
// it was trained with is useless.

use anyhow::{anyhow, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::table::DataTable;
use crate::domain::record::PatientRecord;
use crate::domain::schema::FeatureSchema;

// ─── One-Hot Encoder ─────────────────────────────────────────────────────────

/// Fitted one-hot encoding for a single categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// The column this encoder applies to
    pub column: String,
    /// Distinct training values, sorted lexicographically.
    /// One output slot per category.
    categories: Vec<String>,
}

impl OneHotEncoder {
    /// Learn the category set from training values.
    pub fn fit(column: &str, values: &[&str]) -> Self {
        let mut categories: Vec<String> =
            values.iter().map(|v| v.to_string()).collect();
        categories.sort();
        categories.dedup();
        Self { column: column.to_string(), categories }
    }

    /// Width of this encoder's output block
    pub fn width(&self) -> usize {
        self.categories.len()
    }

    /// Append the one-hot block for `value` to `out`.
    /// Unknown values append all zeros.
    pub fn encode_into(&self, value: &str, out: &mut Vec<f64>) {
        for category in &self.categories {
            out.push(if category == value { 1.0 } else { 0.0 });
        }
    }
}

// ─── Standard Scaler ─────────────────────────────────────────────────────────

/// Fitted standardisation for a single numerical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// The column this scaler applies to
    pub column: String,
    mean:  f64,
    scale: f64,
}

impl StandardScaler {
    /// Learn mean and scale from training values.
    /// Uses population variance (divide by n, not n-1).
    pub fn fit(column: &str, values: &[f64]) -> Self {
        let n = values.len().max(1) as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let std = var.sqrt();

        // A constant column standardises to 0; dividing by its
        // zero std would produce NaN rows instead.
        let scale = if std > 0.0 { std } else { 1.0 };

        Self { column: column.to_string(), mean, scale }
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.mean) / self.scale
    }
}

// ─── Feature Pipeline ────────────────────────────────────────────────────────

/// The full fitted preprocessor: one encoder per categorical
/// column, one scaler per numerical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturePipeline {
    encoders: Vec<OneHotEncoder>,
    scalers:  Vec<StandardScaler>,
}

impl FeaturePipeline {
    /// Fit the pipeline on the given training rows of the table.
    ///
    /// Only the rows in `train_rows` contribute to category sets
    /// and scaling statistics; the test split must stay unseen.
    pub fn fit(
        table: &DataTable,
        schema: &FeatureSchema,
        train_rows: &[usize],
    ) -> Result<Self> {
        let mut encoders = Vec::with_capacity(schema.categorical.len());
        for name in &schema.categorical {
            let column = table.categorical_column(name).ok_or_else(|| {
                anyhow!("Categorical column '{}' missing from the dataset", name)
            })?;
            let values: Vec<&str> =
                train_rows.iter().map(|&r| column[r].as_str()).collect();
            encoders.push(OneHotEncoder::fit(name, &values));
        }

        let mut scalers = Vec::with_capacity(schema.numerical.len());
        for name in &schema.numerical {
            let column = table.numeric_column(name).ok_or_else(|| {
                anyhow!("Numerical column '{}' missing from the dataset", name)
            })?;
            let values: Vec<f64> = train_rows.iter().map(|&r| column[r]).collect();
            scalers.push(StandardScaler::fit(name, &values));
        }

        Ok(Self { encoders, scalers })
    }

    /// Total width of an encoded feature row
    pub fn n_output_features(&self) -> usize {
        self.encoders.iter().map(|e| e.width()).sum::<usize>() + self.scalers.len()
    }

    /// Encode a set of table rows into a dense (rows x features) matrix.
    pub fn transform_table(
        &self,
        table: &DataTable,
        rows: &[usize],
    ) -> Result<Array2<f64>> {
        let width = self.n_output_features();
        let mut data = Vec::with_capacity(rows.len() * width);

        for &row in rows {
            for encoder in &self.encoders {
                let column = table
                    .categorical_column(&encoder.column)
                    .ok_or_else(|| {
                        anyhow!(
                            "Categorical column '{}' missing from the dataset",
                            encoder.column
                        )
                    })?;
                encoder.encode_into(&column[row], &mut data);
            }
            for scaler in &self.scalers {
                let column = table.numeric_column(&scaler.column).ok_or_else(|| {
                    anyhow!(
                        "Numerical column '{}' missing from the dataset",
                        scaler.column
                    )
                })?;
                data.push(scaler.transform(column[row]));
            }
        }

        Ok(Array2::from_shape_vec((rows.len(), width), data)?)
    }

    /// Encode a single inference-time record into a feature row.
    ///
    /// Field presence is checked before this is called; here we
    /// validate TYPES and produce client-grade error messages:
    ///   - a numerical feature must be a JSON number
    ///   - a categorical feature may be a string, number or bool
    ///     (numbers arrive from clients that send codes as ints;
    ///     they are matched against the category set as strings)
    pub fn transform_record(&self, record: &PatientRecord) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.n_output_features());

        for encoder in &self.encoders {
            let value = record
                .get(&encoder.column)
                .ok_or_else(|| anyhow!("Missing feature '{}'", encoder.column))?;
            let as_text = categorical_text(value).ok_or_else(|| {
                anyhow!(
                    "Feature '{}' must be a string or number",
                    encoder.column
                )
            })?;
            encoder.encode_into(&as_text, &mut out);
        }

        for scaler in &self.scalers {
            let value = record
                .get(&scaler.column)
                .ok_or_else(|| anyhow!("Missing feature '{}'", scaler.column))?;
            let number = value.as_f64().ok_or_else(|| {
                anyhow!("Feature '{}' must be numeric", scaler.column)
            })?;
            out.push(scaler.transform(number));
        }

        Ok(out)
    }
}

/// Render a JSON value as the text form used for category matching.
/// Integers render without a trailing ".0" so a client sending
/// `"FastingBS": 1` matches a CSV category "1".
fn categorical_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else {
                n.as_f64().map(|f| f.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
