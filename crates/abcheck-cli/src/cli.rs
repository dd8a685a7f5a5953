//! CLI argument definitions using clap.

use std::time::Duration;

use abcheck::input::parse_delimiter;
use abcheck::ParserConfig;
use clap::{Parser, Subcommand};

/// abcheck: A/B test order value analysis
#[derive(Parser)]
#[command(name = "abcheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Field delimiter (",", "tab", ";", "|", or "auto" to detect)
    #[arg(long, global = true, default_value = ",")]
    pub delimiter: String,

    /// Timeout in seconds for remote (http/https) sources
    #[arg(long, global = true, default_value = "30")]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare Variant A and Variant B order values with Welch's t-test
    Compare {
        /// Variant A data (CSV path or http/https URL)
        #[arg(value_name = "SOURCE_A")]
        source_a: String,

        /// Variant B data (CSV path or http/https URL)
        #[arg(value_name = "SOURCE_B")]
        source_b: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a single export for schema, type and group problems
    Validate {
        /// Data to validate (CSV path or http/https URL)
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Required columns, comma separated
        /// (default: user_id,order_id,order_date,group,order_value)
        #[arg(short, long, value_delimiter = ',')]
        required: Option<Vec<String>>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Loader settings shared by every command.
    pub fn parser_config(&self) -> abcheck::Result<ParserConfig> {
        Ok(ParserConfig {
            delimiter: parse_delimiter(&self.delimiter)?,
            timeout: Duration::from_secs(self.timeout),
            ..ParserConfig::default()
        })
    }
}
