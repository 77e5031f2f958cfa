// ============================================================
// Layer 4 — CSV Loader
// ============================================================
// Loads the training dataset from a CSV file using the csv
// crate, which handles quoting, escaping and BOM stripping so
// we don't have to.
//
// The loader is deliberately dumb: it reads headers and raw
// string cells and hands them to DataTable, which owns the
// numeric/categorical type inference. Keeping parsing and
// typing apart means the loader never needs to know what a
// column "means".
//
// Reference: Rust Book §9 (Error Handling)
//            csv crate documentation

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::data::table::DataTable;

/// Loads a CSV dataset from disk into a DataTable.
pub struct CsvLoader {
    /// Path to the CSV file
    path: PathBuf,
}

impl CsvLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Read the whole file into a typed DataTable.
    pub fn load(&self) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .with_context(|| {
                format!("Cannot open dataset '{}'", self.path.display())
            })?;

        let headers: Vec<String> = reader
            .headers()
            .with_context(|| {
                format!("Cannot read CSV header from '{}'", self.path.display())
            })?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            let record = result.with_context(|| {
                format!(
                    "Malformed CSV record at line {} of '{}'",
                    i + 2, // +1 for header, +1 for 1-based lines
                    self.path.display()
                )
            })?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }

        tracing::info!(
            "Loaded {} rows x {} columns from '{}'",
            rows.len(),
            headers.len(),
            self.path.display()
        );

        DataTable::from_rows(headers, rows)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_csv(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_loads_headers_and_rows() {
        let f = write_temp_csv("Age,Sex,HeartDisease\n40,M,0\n55,F,1\n");
        let table = CsvLoader::new(f.path()).load().unwrap();

        assert_eq!(table.headers(), &["Age", "Sex", "HeartDisease"]);
        assert_eq!(table.n_rows(), 2);
        assert!(table.column("Age").unwrap().is_numeric());
        assert!(!table.column("Sex").unwrap().is_numeric());
    }

    #[test]
    fn test_missing_file_gives_context() {
        let err = CsvLoader::new("definitely/not/here.csv").load().unwrap_err();
        assert!(err.to_string().contains("Cannot open dataset"));
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let f = write_temp_csv("Age,Sex\n");
        assert!(CsvLoader::new(f.path()).load().is_err());
    }
}
