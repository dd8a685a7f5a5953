//! Validate command - data quality checks for a single export.

use abcheck::{DataSource, DatasetValidator, Finding, ParserConfig, Severity, ValidatorConfig};
use colored::Colorize;

/// Returns whether the source passed; findings are already printed.
pub fn run(
    source: &str,
    required: Option<Vec<String>>,
    json_output: bool,
    parser: ParserConfig,
    verbose: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    let source = DataSource::parse(source);

    let mut config = ValidatorConfig {
        parser,
        ..ValidatorConfig::default()
    };
    if let Some(columns) = required {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        config = config.with_required_columns(columns);
    }

    if !json_output {
        println!(
            "{} {}",
            "Validating".cyan().bold(),
            source.to_string().white()
        );
        println!();
    }

    let report = DatasetValidator::with_config(config).validate_source(&source);

    if json_output {
        println!("{}", report.to_json()?);
    } else {
        for finding in &report.findings {
            print_finding(finding, verbose);
        }
        println!();

        let errors = report.errors().count();
        let warnings = report.warnings().count();
        println!(
            "{} errors, {} warnings",
            errors.to_string().red(),
            warnings.to_string().yellow()
        );

        if report.passed() {
            println!(
                "{}",
                format!("Data in '{}' is valid.", source).green().bold()
            );
        } else {
            println!(
                "{}",
                format!("Data in '{}' contains errors.", source).red().bold()
            );
        }
    }

    Ok(report.passed())
}

fn print_finding(finding: &Finding, verbose: bool) {
    let label = match finding.severity {
        Severity::Error => finding.severity.label().red().bold(),
        Severity::Warning => finding.severity.label().yellow().bold(),
        Severity::Info => finding.severity.label().blue(),
    };
    println!("  {:8} {}", label, finding.message);

    if !verbose {
        return;
    }
    println!("           check: {}", finding.kind.label());
    if !finding.evidence.sample_rows.is_empty() {
        let rows: Vec<String> = finding
            .evidence
            .sample_rows
            .iter()
            .map(|r| r.to_string())
            .collect();
        println!("           sample rows: {}", rows.join(", "));
    }
}
