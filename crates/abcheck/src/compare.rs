//! A/B comparison of order values from two separate sources.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AbError, Result};
use crate::input::{DataSource, DataTable, Parser, ParserConfig, SourceMetadata};
use crate::resolve::{AliasSet, VARIANT_A_ALIASES, VARIANT_B_ALIASES};
use crate::stats::{self, TTestResult};

/// Significance level for the comparison.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// One of the two experiment arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    /// Display name used in report text.
    pub fn label(&self) -> &'static str {
        match self {
            Variant::A => "Variant A",
            Variant::B => "Variant B",
        }
    }

    fn aliases(&self) -> AliasSet {
        match self {
            Variant::A => VARIANT_A_ALIASES,
            Variant::B => VARIANT_B_ALIASES,
        }
    }
}

/// Outcome of the significance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Significant, B higher: the promotion worked.
    SignificantBHigher,
    /// Significant, A higher: unexpected, needs investigation.
    SignificantAHigher,
    /// No significant difference.
    NotSignificant,
}

impl Verdict {
    /// True for either significant outcome.
    pub fn is_significant(&self) -> bool {
        !matches!(self, Verdict::NotSignificant)
    }
}

/// Per-variant summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Where the values came from.
    pub source: SourceMetadata,
    /// The resolved value column.
    pub column: String,
    /// Number of values used.
    pub count: usize,
    /// Missing cells skipped.
    pub skipped_missing: usize,
    /// Average order value.
    pub aov: f64,
}

/// Full result of an A/B comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub variant_a: GroupSummary,
    pub variant_b: GroupSummary,
    pub test: TTestResult,
    pub alpha: f64,
    pub verdict: Verdict,
}

impl ComparisonReport {
    /// The variant whose AOV is nominally higher, `None` on a tie.
    pub fn nominal_leader(&self) -> Option<Variant> {
        if self.variant_b.aov > self.variant_a.aov {
            Some(Variant::B)
        } else if self.variant_a.aov > self.variant_b.aov {
            Some(Variant::A)
        } else {
            None
        }
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// AOVs and test results at full precision, one line each.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("{} AOV: {}", Variant::A.label(), self.variant_a.aov),
            format!("{} AOV: {}", Variant::B.label(), self.variant_b.aov),
            format!("T-Statistic: {}", self.test.statistic),
            format!("P-Value: {}", self.test.p_value),
        ]
    }

    /// Interpretation lines, rounded for reading.
    pub fn interpretation(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let p = self.test.p_value;

        if self.verdict.is_significant() {
            lines.push(format!(
                "The difference in AOV is statistically significant (p = {:.3} <= {}).",
                p, self.alpha
            ));
        } else {
            lines.push(format!(
                "The difference in AOV is not statistically significant (p = {:.3} > {}).",
                p, self.alpha
            ));
        }

        let (a, b) = (self.variant_a.aov, self.variant_b.aov);
        match self.verdict {
            Verdict::SignificantBHigher => {
                lines.push(format!(
                    "Variant B (the promotional campaign) had a significantly higher AOV ({:.2} vs {:.2}).",
                    b, a
                ));
            }
            Verdict::SignificantAHigher => {
                lines.push(format!(
                    "Variant A had a significantly higher AOV (unexpected): {:.2} vs {:.2}.",
                    a, b
                ));
                lines.push("Investigate the experiment setup before acting on this result.".to_string());
            }
            Verdict::NotSignificant => {
                lines.push(
                    "We cannot conclude that the promotional campaign had a significant impact on AOV."
                        .to_string(),
                );
                lines.push(match self.nominal_leader() {
                    Some(leader) => {
                        let (high, low) = if leader == Variant::B { (b, a) } else { (a, b) };
                        format!(
                            "{}'s AOV was nominally higher ({:.2} vs {:.2}), but the result is inconclusive.",
                            leader.label(),
                            high,
                            low
                        )
                    }
                    None => format!("Both variants had the same AOV ({:.2}).", a),
                });
            }
        }

        lines
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.summary_lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)?;
        for line in self.interpretation() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Runs the A/B order value comparison.
pub struct Comparator {
    parser: Parser,
}

impl Comparator {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            parser: Parser::with_config(config),
        }
    }

    /// Load both sources and compare their order values.
    pub fn compare(&self, source_a: &DataSource, source_b: &DataSource) -> Result<ComparisonReport> {
        let (table_a, meta_a) = self.parser.parse_source(source_a)?;
        let (table_b, meta_b) = self.parser.parse_source(source_b)?;
        compare_tables(&table_a, meta_a, &table_b, meta_b)
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two already-loaded tables.
pub fn compare_tables(
    table_a: &DataTable,
    meta_a: SourceMetadata,
    table_b: &DataTable,
    meta_b: SourceMetadata,
) -> Result<ComparisonReport> {
    let column_a = resolve_value_column(table_a, &meta_a, Variant::A)?;
    let column_b = resolve_value_column(table_b, &meta_b, Variant::B)?;

    let (values_a, skipped_a) = numeric_values(table_a, &column_a)?;
    let (values_b, skipped_b) = numeric_values(table_b, &column_b)?;

    let test = stats::welch_t_test(&values_a, &values_b)?;

    let variant_a = summarize(meta_a, column_a, &values_a, skipped_a)?;
    let variant_b = summarize(meta_b, column_b, &values_b, skipped_b)?;

    let verdict = if test.p_value <= SIGNIFICANCE_LEVEL {
        if variant_b.aov > variant_a.aov {
            Verdict::SignificantBHigher
        } else {
            Verdict::SignificantAHigher
        }
    } else {
        Verdict::NotSignificant
    };

    log::debug!(
        "t = {}, p = {}, df = {:?}, verdict {:?}",
        test.statistic,
        test.p_value,
        test.degrees_of_freedom,
        verdict
    );

    Ok(ComparisonReport {
        variant_a,
        variant_b,
        test,
        alpha: SIGNIFICANCE_LEVEL,
        verdict,
    })
}

fn resolve_value_column(table: &DataTable, meta: &SourceMetadata, variant: Variant) -> Result<String> {
    let aliases = variant.aliases();
    aliases
        .resolve(table)
        .map(str::to_string)
        .ok_or_else(|| AbError::ColumnNotFound {
            source_name: meta.source.to_string(),
            candidates: aliases.describe(),
        })
}

/// Numeric values of a column plus the number of missing cells skipped.
fn numeric_values(table: &DataTable, column: &str) -> Result<(Vec<f64>, usize)> {
    let index = table
        .column_index(column)
        .ok_or_else(|| AbError::Config(format!("column '{}' vanished from table", column)))?;

    let mut values = Vec::with_capacity(table.row_count());
    let mut skipped = 0;

    for (row_idx, cell) in table.column_values(index).enumerate() {
        match DataTable::parse_number(cell) {
            Ok(Some(v)) if v.is_finite() => values.push(v),
            Ok(None) => skipped += 1,
            Ok(Some(_)) | Err(_) => {
                return Err(AbError::NotNumeric {
                    column: column.to_string(),
                    row: row_idx + 1,
                    value: cell.to_string(),
                })
            }
        }
    }

    if skipped > 0 {
        log::warn!("skipped {} missing values in column '{}'", skipped, column);
    }

    Ok((values, skipped))
}

fn summarize(source: SourceMetadata, column: String, values: &[f64], skipped_missing: usize) -> Result<GroupSummary> {
    let aov = stats::mean(values).ok_or_else(|| {
        AbError::InsufficientData(format!("no order values in {}", source.source))
    })?;
    Ok(GroupSummary {
        source,
        column,
        count: values.len(),
        skipped_missing,
        aov,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    fn single_column(header: &str, values: &[&str]) -> DataTable {
        let rows: Vec<&[&str]> = values.iter().map(std::slice::from_ref).collect();
        table(&[header], &rows)
    }

    fn meta(name: &str, t: &DataTable) -> SourceMetadata {
        SourceMetadata::new(
            DataSource::parse(name),
            String::new(),
            0,
            t.row_count(),
            t.column_count(),
        )
    }

    fn run(a: &DataTable, b: &DataTable) -> Result<ComparisonReport> {
        compare_tables(a, meta("a.csv", a), b, meta("b.csv", b))
    }

    #[test]
    fn test_separated_groups_favor_b() {
        let a = single_column("order_value", &["10", "10", "10", "10", "10"]);
        let b = single_column("order_value", &["20", "20", "20", "20", "20"]);
        let report = run(&a, &b).unwrap();

        assert_eq!(report.verdict, Verdict::SignificantBHigher);
        assert_eq!(report.variant_a.aov, 10.0);
        assert_eq!(report.variant_b.aov, 20.0);
        assert_eq!(report.nominal_leader(), Some(Variant::B));
    }

    #[test]
    fn test_a_higher_is_flagged_unexpected() {
        let a = single_column("value", &["30", "31", "29", "30", "32"]);
        let b = single_column("value", &["10", "11", "9", "10", "12"]);
        let report = run(&a, &b).unwrap();

        assert_eq!(report.verdict, Verdict::SignificantAHigher);
        let text = report.interpretation().join("\n");
        assert!(text.contains("(unexpected)"));
    }

    #[test]
    fn test_not_significant_names_nominal_leader() {
        let a = single_column("order_value", &["10", "30", "20", "25", "15"]);
        let b = single_column("order_value", &["12", "29", "21", "26", "14"]);
        let report = run(&a, &b).unwrap();

        assert_eq!(report.verdict, Verdict::NotSignificant);
        let text = report.interpretation().join("\n");
        assert!(text.contains("not statistically significant"));
        assert!(text.contains("Variant B's AOV was nominally higher (20.40 vs 20.00)"));
    }

    #[test]
    fn test_variant_specific_columns() {
        let a = single_column("order_value_a", &["1", "2", "3"]);
        let b = single_column("order_value_b", &["1", "2", "3"]);
        let report = run(&a, &b).unwrap();
        assert_eq!(report.variant_a.column, "order_value_a");
        assert_eq!(report.variant_b.column, "order_value_b");
    }

    #[test]
    fn test_variant_a_alias_not_accepted_for_b() {
        let a = single_column("order_value_a", &["1", "2", "3"]);
        let b = single_column("order_value_a", &["1", "2", "3"]);
        let err = run(&a, &b).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Could not find a valid order value column in b.csv. \
             Checked for order_value, order_value_b, value, and OrderTotal"
        );
    }

    #[test]
    fn test_missing_cells_are_skipped() {
        let a = single_column("OrderTotal", &["10", "", "12", "NA", "11"]);
        let b = single_column("OrderTotal", &["10", "12", "11"]);
        let report = run(&a, &b).unwrap();
        assert_eq!(report.variant_a.count, 3);
        assert_eq!(report.variant_a.skipped_missing, 2);
        assert_eq!(report.variant_a.aov, 11.0);
    }

    #[test]
    fn test_non_numeric_cell_is_rejected() {
        let a = single_column("order_value", &["10", "ten", "12"]);
        let b = single_column("order_value", &["10", "12", "11"]);
        match run(&a, &b).unwrap_err() {
            AbError::NotNumeric { column, row, value } => {
                assert_eq!(column, "order_value");
                assert_eq!(row, 2);
                assert_eq!(value, "ten");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_markers_are_skipped_as_missing() {
        let a = single_column("order_value", &["10", "-nan", "12", "1.#QNAN", "11"]);
        let b = single_column("order_value", &["20", "-NaN", "22", "21"]);
        let report = run(&a, &b).unwrap();

        assert_eq!(report.variant_a.skipped_missing, 2);
        assert_eq!(report.variant_b.skipped_missing, 1);
        assert_eq!(report.variant_a.aov, 11.0);
        assert_eq!(report.variant_b.aov, 21.0);
        assert_eq!(report.verdict, Verdict::SignificantBHigher);
    }

    #[test]
    fn test_infinite_cell_is_rejected() {
        let a = single_column("order_value", &["10", "inf", "12"]);
        let b = single_column("order_value", &["10", "12", "11"]);
        match run(&a, &b).unwrap_err() {
            AbError::NotNumeric { row, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(value, "inf");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overflowing_order_values_are_reported() {
        let a = single_column("order_value", &["1e308", "1.7e308", "1.5e308"]);
        let b = single_column("order_value", &["1", "2", "3"]);
        let err = run(&a, &b).unwrap_err();
        assert!(matches!(err, AbError::NumericOverflow(_)));
    }

    #[test]
    fn test_nominal_leader_a_is_named() {
        let a = single_column("order_value", &["12", "29", "21", "26", "14"]);
        let b = single_column("order_value", &["10", "30", "20", "25", "15"]);
        let report = run(&a, &b).unwrap();

        assert!(!report.verdict.is_significant());
        let text = report.interpretation().join("\n");
        assert!(text.contains("Variant A's AOV was nominally higher (20.40 vs 20.00)"));
    }

    #[test]
    fn test_summary_lines_match_display() {
        let a = single_column("order_value", &["10", "10.5", "11"]);
        let b = single_column("order_value", &["1", "2", "4"]);
        let report = run(&a, &b).unwrap();
        let summary = report.summary_lines().join("\n");
        assert!(report.to_string().starts_with(&summary));
        assert_eq!(report.summary_lines().len(), 4);
    }

    #[test]
    fn test_report_to_json() {
        let a = single_column("order_value", &["10", "10", "10"]);
        let b = single_column("order_value", &["20", "20", "20"]);
        let json: serde_json::Value = serde_json::from_str(&run(&a, &b).unwrap().to_json().unwrap()).unwrap();
        assert_eq!(json["verdict"], "significant_b_higher");
        assert_eq!(json["variant_b"]["aov"], 20.0);
        assert_eq!(json["alpha"], 0.05);
    }

    #[test]
    fn test_display_prints_full_precision() {
        let a = single_column("order_value", &["10", "10.5", "11"]);
        let b = single_column("order_value", &["1", "2", "4"]);
        let report = run(&a, &b).unwrap();
        let text = report.to_string();
        assert!(text.starts_with("Variant A AOV: 10.5\nVariant B AOV: 2.3333333333333335\n"));
        assert!(text.contains(&format!("T-Statistic: {}\n", report.test.statistic)));
        assert!(text.contains(&format!("P-Value: {}\n", report.test.p_value)));
    }
}
