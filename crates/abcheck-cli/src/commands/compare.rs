//! Compare command - Welch's t-test on Variant A vs Variant B order values.

use abcheck::{Comparator, ComparisonReport, DataSource, GroupSummary, ParserConfig, Variant, Verdict};
use colored::Colorize;

pub fn run(
    source_a: &str,
    source_b: &str,
    json_output: bool,
    parser: ParserConfig,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source_a = DataSource::parse(source_a);
    let source_b = DataSource::parse(source_b);

    if !json_output {
        println!(
            "{} {} {} {}",
            "Comparing".cyan().bold(),
            source_a.to_string().white(),
            "vs".cyan(),
            source_b.to_string().white()
        );
        println!();
    }

    let report = Comparator::with_config(parser).compare(&source_a, &source_b)?;

    if json_output {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    if verbose {
        print_group(Variant::A, &report.variant_a);
        print_group(Variant::B, &report.variant_b);
        match report.test.degrees_of_freedom {
            Some(df) => println!("Welch degrees of freedom: {}", df),
            None => println!("Welch degrees of freedom: undefined (zero variance in both groups)"),
        }
        println!();
    }

    print_report(&report);
    Ok(())
}

fn print_group(variant: Variant, group: &GroupSummary) {
    println!("{}", format!("{}:", variant.label()).yellow().bold());
    println!("  Source:  {}", group.source.source);
    println!("  Column:  {}", group.column);
    println!("  Values:  {}", group.count);
    if group.skipped_missing > 0 {
        println!("  Skipped: {} missing", group.skipped_missing.to_string().yellow());
    }
    println!("  Hash:    {}", group.source.hash);
}

fn print_report(report: &ComparisonReport) {
    for line in report.summary_lines() {
        println!("{}", line);
    }
    println!();

    let lines = report.interpretation();
    for (i, line) in lines.iter().enumerate() {
        let styled = match (report.verdict, i) {
            (_, 0) => line.bold(),
            (Verdict::SignificantBHigher, _) => line.green(),
            (Verdict::SignificantAHigher, _) => line.red(),
            (Verdict::NotSignificant, _) => line.normal(),
        };
        println!("{}", styled);
    }
}
