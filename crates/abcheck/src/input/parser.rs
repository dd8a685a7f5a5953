//! CSV parser with optional delimiter detection.

use std::time::Duration;

use sha2::{Digest, Sha256};

use super::fetch::{self, DEFAULT_TIMEOUT};
use super::source::{DataSource, DataTable, SourceMetadata};
use crate::error::{AbError, Result};

/// Delimiters to try when auto-detecting, in tie-break order.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines sampled for delimiter detection.
const SAMPLE_LINES: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
    /// Timeout for remote sources.
    pub timeout: Duration,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: Some(b','),
            quote: b'"',
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Loads and parses CSV sources.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Load a source and return the data table and metadata.
    pub fn parse_source(&self, source: &DataSource) -> Result<(DataTable, SourceMetadata)> {
        let contents = fetch::read_source(source, self.config.timeout)?;

        if contents.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(AbError::EmptyData(format!("{} is empty", source)));
        }

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents, self.config.quote)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;
        log::debug!(
            "loaded {}: {} rows x {} columns ({})",
            source,
            table.row_count(),
            table.column_count(),
            hash
        );

        let metadata = SourceMetadata::new(
            source.clone(),
            hash,
            contents.len() as u64,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse bytes directly. A header row is required; zero data rows is allowed.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AbError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            if record.len() > expected_cols {
                return Err(AbError::Parse {
                    // header is line 1
                    row: row_idx + 2,
                    column: expected_cols + 1,
                    message: format!(
                        "expected {} fields, saw {}",
                        expected_cols,
                        record.len()
                    ),
                });
            }

            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            // Short rows are padded with missing cells
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        Ok(DataTable::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a user-supplied delimiter option. `auto` means detect.
pub fn parse_delimiter(value: &str) -> Result<Option<u8>> {
    match value {
        "auto" => Ok(None),
        "tab" | "\\t" | "\t" => Ok(Some(b'\t')),
        "comma" => Ok(Some(b',')),
        "semicolon" => Ok(Some(b';')),
        "pipe" => Ok(Some(b'|')),
        s if s.len() == 1 && s.is_ascii() => Ok(Some(s.as_bytes()[0])),
        other => Err(AbError::InvalidDelimiter(other.to_string())),
    }
}

/// Pick the delimiter whose unquoted count is steadiest across the first
/// non-blank lines, preferring more fields on a tie. The header line must
/// contain the delimiter for it to be considered.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let lines: Vec<&[u8]> = bytes
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .take(SAMPLE_LINES)
        .collect();

    if lines.is_empty() {
        return Err(AbError::EmptyData("No lines to analyze".to_string()));
    }

    // (delimiter, max - min count, header count)
    let best = DELIMITERS
        .iter()
        .filter_map(|&delim| {
            let counts: Vec<usize> = lines
                .iter()
                .map(|line| count_unquoted(line, delim, quote))
                .collect();
            let header = counts[0];
            if header == 0 {
                return None;
            }
            let spread = counts.iter().max()? - counts.iter().min()?;
            Some((delim, spread, header))
        })
        .min_by(|a, b| a.1.cmp(&b.1).then(b.2.cmp(&a.2)));

    let delimiter = best.map_or(b',', |(delim, _, _)| delim);
    log::debug!("detected delimiter {:?}", delimiter as char);
    Ok(delimiter)
}

/// Count delimiter bytes outside quoted sections.
fn count_unquoted(line: &[u8], delimiter: u8, quote: u8) -> usize {
    let mut in_quotes = false;
    line.iter()
        .filter(|&&b| {
            if b == quote {
                in_quotes = !in_quotes;
            }
            b == delimiter && !in_quotes
        })
        .count()
}
