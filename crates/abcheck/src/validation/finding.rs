//! Findings reported by the dataset validator.

use serde::{Deserialize, Serialize};

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Source could be read, or could not.
    Source,
    /// Required column presence.
    RequiredColumns,
    /// Value column numeric check.
    TypeMismatch,
    /// Group column membership check.
    InvalidCategory,
    /// Missing cells detected and filled.
    MissingValues,
    /// A group has no rows.
    EmptyGroup,
    /// Per-group average order values.
    GroupSummary,
    /// B did not beat A.
    UnexpectedDirection,
    /// A check was skipped because its column is absent.
    SkippedCheck,
}

impl FindingKind {
    /// Get a human-readable label for the finding kind.
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::Source => "Source",
            FindingKind::RequiredColumns => "Required Columns",
            FindingKind::TypeMismatch => "Type Mismatch",
            FindingKind::InvalidCategory => "Invalid Category",
            FindingKind::MissingValues => "Missing Values",
            FindingKind::EmptyGroup => "Empty Group",
            FindingKind::GroupSummary => "Group Summary",
            FindingKind::UnexpectedDirection => "Unexpected Direction",
            FindingKind::SkippedCheck => "Skipped Check",
        }
    }
}

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Progress or summary information.
    Info,
    /// Worth a look, does not fail validation.
    Warning,
    /// Fails validation.
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// Supporting detail for a finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Offending or relevant values.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub values: Vec<String>,
    /// Number of affected cells or rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurrences: Option<usize>,
    /// Sample data row numbers (1-based).
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub sample_rows: Vec<usize>,
}

impl Evidence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values(mut self, values: Vec<String>) -> Self {
        self.values = values;
        self
    }

    pub fn with_occurrences(mut self, count: usize) -> Self {
        self.occurrences = Some(count);
        self
    }

    pub fn with_sample_rows(mut self, rows: Vec<usize>) -> Self {
        self.sample_rows = rows;
        self
    }
}

/// A single validation result line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    pub severity: Severity,
    /// Affected column, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Human-readable description.
    pub message: String,
    #[serde(skip_serializing_if = "is_empty_evidence", default)]
    pub evidence: Evidence,
}

fn is_empty_evidence(evidence: &Evidence) -> bool {
    *evidence == Evidence::default()
}

impl Finding {
    pub fn new(kind: FindingKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            column: None,
            message: message.into(),
            evidence: Evidence::new(),
        }
    }

    pub fn info(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Info, message)
    }

    pub fn warning(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    pub fn error(kind: FindingKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }
}
