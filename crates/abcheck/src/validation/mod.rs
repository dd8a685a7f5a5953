//! Data quality validation for a single A/B export.

mod finding;
mod validator;

pub use finding::{Evidence, Finding, FindingKind, Severity};
pub use validator::{
    DatasetValidator, ValidationReport, ValidatorConfig, DEFAULT_REQUIRED_COLUMNS, GROUP_COLUMN,
    VALID_GROUPS, VALUE_COLUMN,
};
