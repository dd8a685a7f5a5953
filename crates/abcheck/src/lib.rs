//! abcheck: order value A/B test analysis for CSV exports.
//!
//! Two independent tools share the loading layer:
//!
//! - [`Comparator`] loads a Variant A and a Variant B dataset, finds each
//!   one's order value column among known aliases, and runs a two-sided
//!   Welch's t-test on the values.
//! - [`DatasetValidator`] checks a single export for required columns,
//!   numeric order values, valid group labels, missing cells and group
//!   balance.
//!
//! Sources may be local paths or HTTP(S) URLs.
//!
//! # Example
//!
//! ```no_run
//! use abcheck::{Comparator, DataSource, DatasetValidator};
//!
//! let report = Comparator::new()
//!     .compare(
//!         &DataSource::parse("variant_a.csv"),
//!         &DataSource::parse("variant_b.csv"),
//!     )
//!     .unwrap();
//! println!("{}", report);
//!
//! let validation = DatasetValidator::new().validate_source(&DataSource::parse("orders.csv"));
//! assert!(validation.passed());
//! ```

pub mod compare;
pub mod error;
pub mod input;
pub mod resolve;
pub mod stats;
pub mod validation;

pub use compare::{
    compare_tables, Comparator, ComparisonReport, GroupSummary, Variant, Verdict,
    SIGNIFICANCE_LEVEL,
};
pub use error::{AbError, Result};
pub use input::{DataSource, DataTable, Parser, ParserConfig, SourceMetadata};
pub use resolve::{resolve_column, AliasSet, VARIANT_A_ALIASES, VARIANT_B_ALIASES};
pub use stats::{welch_t_test, TTestResult};
pub use validation::{
    DatasetValidator, Finding, FindingKind, Severity, ValidationReport, ValidatorConfig,
};
