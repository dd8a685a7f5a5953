//! Data source abstraction and metadata.

use std::fmt;
use std::num::ParseFloatError;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum DataSource {
    /// A file on the local filesystem.
    Path(PathBuf),
    /// An HTTP(S) URL.
    Url(String),
}

impl DataSource {
    /// Classify a user-supplied location. Anything starting with
    /// `http://` or `https://` is fetched remotely.
    pub fn parse(location: &str) -> Self {
        let lower = location.trim_start().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(location.trim().to_string())
        } else {
            DataSource::Path(PathBuf::from(location))
        }
    }

    /// Short display name: file name for paths, last URL segment for URLs.
    pub fn name(&self) -> String {
        match self {
            DataSource::Path(path) => path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            DataSource::Url(url) => {
                let without_query = url.split(['?', '#']).next().unwrap_or(url.as_str());
                without_query
                    .trim_end_matches('/')
                    .rsplit('/')
                    .next()
                    .filter(|s| !s.is_empty() && !s.contains(':'))
                    .map(str::to_string)
                    .unwrap_or_else(|| url.clone())
            }
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Path(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{}", url),
        }
    }
}

impl From<&str> for DataSource {
    fn from(location: &str) -> Self {
        DataSource::parse(location)
    }
}

impl From<PathBuf> for DataSource {
    fn from(path: PathBuf) -> Self {
        DataSource::Path(path)
    }
}

/// Metadata about a loaded source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Display name (file name or last URL segment).
    pub name: String,
    /// Where the data was read from.
    pub source: DataSource,
    /// SHA-256 hash of the raw contents.
    pub hash: String,
    /// Size of the raw contents in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the source was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        source: DataSource,
        hash: String,
        size_bytes: u64,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        Self {
            name: source.name(),
            source,
            hash,
            size_bytes,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Represents parsed tabular data.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check whether a column with this exact name exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Replace every missing cell with `fill`, returning how many were replaced.
    pub fn fill_nulls(&mut self, fill: &str) -> usize {
        let mut filled = 0;
        for cell in self.rows.iter_mut().flat_map(|row| row.iter_mut()) {
            if Self::is_null_value(cell) {
                *cell = fill.to_string();
                filled += 1;
            }
        }
        filled
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || CASELESS_NULLS.iter().any(|m| trimmed.eq_ignore_ascii_case(m))
            || EXACT_NULLS.contains(&trimmed)
    }

    /// Parse a cell as a number. Missing cells, including anything that
    /// parses to NaN, yield `Ok(None)`.
    pub fn parse_number(value: &str) -> std::result::Result<Option<f64>, ParseFloatError> {
        if Self::is_null_value(value) {
            return Ok(None);
        }
        let number = value.trim().parse::<f64>()?;
        Ok((!number.is_nan()).then_some(number))
    }
}

/// Missing-value markers matched without regard to case.
const CASELESS_NULLS: [&str; 7] = ["na", "n/a", "nan", "-nan", "null", "none", "<na>"];

/// Spreadsheet and C runtime markers matched exactly.
const EXACT_NULLS: [&str; 7] = ["#N/A", "#NA", "#N/A N/A", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN"];
