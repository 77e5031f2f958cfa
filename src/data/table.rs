// ============================================================
// Layer 4 — Data Table
// ============================================================
// Column-major storage for a loaded dataset, with type
// inference per column:
//
//   - a column is Numeric iff EVERY cell parses as f64
//   - otherwise it is Categorical and cells stay as strings
//
// This mirrors how the training data is actually shaped: the
// heart-disease CSV mixes clinical measurements (Age, MaxHR,
// Oldpeak, ...) with coded categories (Sex, ChestPainType, ...),
// and nothing in the pipeline hard-codes which is which.
// Column order of the source file is preserved because it
// defines the feature order everywhere downstream.

use anyhow::{bail, Result};

/// One column of data, after type inference
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Every cell parsed as a float
    Numeric(Vec<f64>),
    /// At least one cell did not parse as a float
    Categorical(Vec<String>),
}

impl Column {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }
}

/// A loaded dataset: headers plus one typed column per header,
/// all of equal length.
#[derive(Debug, Clone)]
pub struct DataTable {
    headers: Vec<String>,
    columns: Vec<Column>,
    n_rows:  usize,
}

impl DataTable {
    /// Build a table from raw string rows, inferring column types.
    ///
    /// Fails on an empty dataset or on ragged rows — a CSV where
    /// some row has the wrong number of cells is a broken export,
    /// not something to silently repair.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if headers.is_empty() {
            bail!("Dataset has no columns");
        }
        if rows.is_empty() {
            bail!("Dataset has no rows");
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                bail!(
                    "Row {} has {} cells but the header has {} columns",
                    i + 1,
                    row.len(),
                    headers.len()
                );
            }
        }

        let n_rows = rows.len();
        let mut columns = Vec::with_capacity(headers.len());

        for col_idx in 0..headers.len() {
            // Collect the raw strings for this column
            let cells: Vec<&str> = rows.iter().map(|r| r[col_idx].trim()).collect();

            // Numeric iff every cell parses as f64
            let parsed: Option<Vec<f64>> =
                cells.iter().map(|c| c.parse::<f64>().ok()).collect();

            match parsed {
                Some(values) => columns.push(Column::Numeric(values)),
                None => columns.push(Column::Categorical(
                    cells.into_iter().map(|c| c.to_string()).collect(),
                )),
            }
        }

        Ok(Self { headers, columns, n_rows })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Find a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|i| &self.columns[i])
    }

    /// The numeric values of a column, if it is numeric
    pub fn numeric_column(&self, name: &str) -> Option<&[f64]> {
        match self.column(name)? {
            Column::Numeric(v) => Some(v),
            Column::Categorical(_) => None,
        }
    }

    /// The string values of a column, if it is categorical
    pub fn categorical_column(&self, name: &str) -> Option<&[String]> {
        match self.column(name)? {
            Column::Categorical(v) => Some(v),
            Column::Numeric(_) => None,
        }
    }
}
