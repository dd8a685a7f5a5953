//! Gate-by-gate data quality checks for a single A/B export.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::{DataSource, DataTable, Parser, ParserConfig, SourceMetadata};
use crate::stats;

use super::finding::{Evidence, Finding, FindingKind, Severity};

/// Column holding the order value.
pub const VALUE_COLUMN: &str = "order_value";

/// Column holding the experiment arm.
pub const GROUP_COLUMN: &str = "group";

/// Allowed group labels.
pub const VALID_GROUPS: [&str; 2] = ["A", "B"];

/// Columns required when no list is configured.
pub const DEFAULT_REQUIRED_COLUMNS: [&str; 5] =
    ["user_id", "order_id", "order_date", "group", "order_value"];

/// Shown in place of an empty cell when listing invalid group values.
const MISSING_LABEL: &str = "<missing>";

/// How many offending rows to keep as evidence.
const SAMPLE_ROWS: usize = 5;

/// Validator configuration.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Columns that must be present.
    pub required_columns: Vec<String>,
    /// How sources are loaded.
    pub parser: ParserConfig,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            required_columns: DEFAULT_REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            parser: ParserConfig::default(),
        }
    }
}

impl ValidatorConfig {
    /// Replace the required column list.
    pub fn with_required_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

/// Outcome of validating one source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// The source as given.
    pub source: String,
    /// Load metadata, absent if loading failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SourceMetadata>,
    /// Findings in the order the gates produced them.
    pub findings: Vec<Finding>,
    /// Group A average order value, when computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aov_a: Option<f64>,
    /// Group B average order value, when computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aov_b: Option<f64>,
    passed: bool,
}

impl ValidationReport {
    fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            metadata: None,
            findings: Vec::new(),
            aov_a: None,
            aov_b: None,
            passed: false,
        }
    }

    /// True when no gate failed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.with_severity(Severity::Warning)
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    fn push(&mut self, finding: Finding) {
        log::debug!("[{}] {}", finding.severity.label(), finding.message);
        self.findings.push(finding);
    }

    /// Record a failing finding and return the finished report.
    fn fail(mut self, finding: Finding) -> Self {
        self.push(finding);
        self.passed = false;
        self
    }
}

/// Validates a single A/B export.
pub struct DatasetValidator {
    config: ValidatorConfig,
    parser: Parser,
}

impl DatasetValidator {
    /// Create a validator with the default required columns.
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        Self { config, parser }
    }

    /// Load and validate a source. Load failures become a failed report.
    pub fn validate_source(&self, source: &DataSource) -> ValidationReport {
        match self.parser.parse_source(source) {
            Ok((table, metadata)) => {
                let mut report = self.validate_table(&table, &source.to_string());
                report.metadata = Some(metadata);
                report
            }
            Err(e) => ValidationReport::new(source.to_string()).fail(
                Finding::error(FindingKind::Source, format!("Could not read {}: {}", source, e)),
            ),
        }
    }

    /// Validate an already-loaded table. The table itself is never modified.
    pub fn validate_table(&self, table: &DataTable, source_name: &str) -> ValidationReport {
        let mut report = ValidationReport::new(source_name);

        report.push(Finding::info(
            FindingKind::Source,
            format!("Successfully read CSV file: {}", source_name),
        ));
        report.push(Finding::info(
            FindingKind::Source,
            format!("Columns in CSV: {:?}", table.headers),
        ));

        // Required columns
        let missing: Vec<String> = self
            .config
            .required_columns
            .iter()
            .filter(|c| !table.has_column(c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return report.fail(
                Finding::error(
                    FindingKind::RequiredColumns,
                    format!("Missing required columns: {:?}", missing),
                )
                .with_evidence(Evidence::new().with_values(missing)),
            );
        }
        report.push(Finding::info(FindingKind::RequiredColumns, "Required columns present."));

        // Numeric order values
        let value_index = table.column_index(VALUE_COLUMN);
        match value_index {
            Some(index) => {
                if let Some(finding) = check_numeric(table, index) {
                    return report.fail(finding);
                }
                report.push(
                    Finding::info(FindingKind::TypeMismatch, "'order_value' column is numeric.")
                        .with_column(VALUE_COLUMN),
                );
            }
            None => report.push(Finding::warning(
                FindingKind::SkippedCheck,
                "'order_value' column not found, skipping numeric check.",
            )),
        }

        // Group labels
        let group_index = table.column_index(GROUP_COLUMN);
        match group_index {
            Some(index) => {
                if let Some(finding) = check_groups(table, index) {
                    return report.fail(finding);
                }
                report.push(
                    Finding::info(
                        FindingKind::InvalidCategory,
                        "'group' column has valid values (A or B).",
                    )
                    .with_column(GROUP_COLUMN),
                );
            }
            None => report.push(Finding::warning(
                FindingKind::SkippedCheck,
                "'group' column not found, skipping group check.",
            )),
        }

        // Missing cells are filled in a working copy only
        let mut working = table.clone();
        let filled = working.fill_nulls("0");
        if filled > 0 {
            report.push(
                Finding::warning(
                    FindingKind::MissingValues,
                    format!(
                        "Missing values found in the data ({} cells); filled with 0.",
                        filled
                    ),
                )
                .with_evidence(Evidence::new().with_occurrences(filled)),
            );
        }

        // A/B group checks
        match (group_index, value_index) {
            (Some(group_idx), Some(value_idx)) => {
                let values_a = group_values(&working, group_idx, value_idx, "A");
                let values_b = group_values(&working, group_idx, value_idx, "B");

                if values_a.is_empty() {
                    return report.fail(Finding::error(FindingKind::EmptyGroup, "Group A has no data."));
                }
                if values_b.is_empty() {
                    return report.fail(Finding::error(FindingKind::EmptyGroup, "Group B has no data."));
                }
                report.push(Finding::info(FindingKind::EmptyGroup, "Both groups have data."));

                let aov_a = stats::mean(&values_a).unwrap_or_default();
                let aov_b = stats::mean(&values_b).unwrap_or_default();
                if !(aov_a.is_finite() && aov_b.is_finite()) {
                    return report.fail(Finding::error(
                        FindingKind::GroupSummary,
                        "Group AOV overflowed; order values are too large to average.",
                    ));
                }
                report.aov_a = Some(aov_a);
                report.aov_b = Some(aov_b);
                report.push(Finding::info(FindingKind::GroupSummary, format!("Group A AOV: {:.2}", aov_a)));
                report.push(Finding::info(FindingKind::GroupSummary, format!("Group B AOV: {:.2}", aov_b)));

                if aov_b <= aov_a {
                    report.push(Finding::warning(
                        FindingKind::UnexpectedDirection,
                        "Group B AOV is not greater than Group A AOV. Expected B > A given promotion; \
                         consider if data generation went as intended.",
                    ));
                }
            }
            (None, _) => report.push(Finding::warning(
                FindingKind::SkippedCheck,
                "Skipping A/B group-specific checks due to missing 'group' column.",
            )),
            (Some(_), None) => report.push(Finding::warning(
                FindingKind::SkippedCheck,
                "Skipping A/B group-specific checks as 'order_value' column is missing.",
            )),
        }

        report.push(Finding::info(FindingKind::Source, "All data tests passed!"));
        report.passed = true;
        report
    }
}

impl Default for DatasetValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Error finding for the first non-numeric, non-missing value, if any.
/// Infinities count as non-numeric.
fn check_numeric(table: &DataTable, index: usize) -> Option<Finding> {
    let bad_rows: Vec<(usize, &str)> = table
        .column_values(index)
        .enumerate()
        .filter(|(_, v)| match DataTable::parse_number(v) {
            Ok(Some(x)) => !x.is_finite(),
            Ok(None) => false,
            Err(_) => true,
        })
        .map(|(i, v)| (i + 1, v))
        .collect();

    let (first_row, first_value) = *bad_rows.first()?;
    Some(
        Finding::error(
            FindingKind::TypeMismatch,
            format!(
                "'order_value' column is not numeric (row {} holds '{}').",
                first_row, first_value
            ),
        )
        .with_column(VALUE_COLUMN)
        .with_evidence(
            Evidence::new()
                .with_values(vec![first_value.to_string()])
                .with_occurrences(bad_rows.len())
                .with_sample_rows(bad_rows.iter().take(SAMPLE_ROWS).map(|(r, _)| *r).collect()),
        ),
    )
}

/// Error finding listing distinct labels outside the allowed set, if any.
fn check_groups(table: &DataTable, index: usize) -> Option<Finding> {
    let mut invalid: IndexSet<String> = IndexSet::new();
    let mut rows = Vec::new();

    for (row_idx, value) in table.column_values(index).enumerate() {
        if VALID_GROUPS.contains(&value) {
            continue;
        }
        let label = if DataTable::is_null_value(value) {
            MISSING_LABEL.to_string()
        } else {
            value.to_string()
        };
        invalid.insert(label);
        rows.push(row_idx + 1);
    }

    if invalid.is_empty() {
        return None;
    }

    let values: Vec<String> = invalid.into_iter().collect();
    Some(
        Finding::error(
            FindingKind::InvalidCategory,
            format!("Invalid 'group' values: {:?}", values),
        )
        .with_column(GROUP_COLUMN)
        .with_evidence(
            Evidence::new()
                .with_values(values)
                .with_occurrences(rows.len())
                .with_sample_rows(rows.into_iter().take(SAMPLE_ROWS).collect()),
        ),
    )
}

/// Order values for rows whose group equals `label`.
fn group_values(table: &DataTable, group_idx: usize, value_idx: usize, label: &str) -> Vec<f64> {
    table
        .rows
        .iter()
        .filter(|row| row.get(group_idx).map(String::as_str) == Some(label))
        .filter_map(|row| row.get(value_idx))
        .filter_map(|v| DataTable::parse_number(v).ok().flatten())
        .collect()
}
