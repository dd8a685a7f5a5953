//! abcheck CLI - A/B test order value analysis.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    // Ok(false) is a failed validation whose findings are already printed
    let result: Result<bool, Box<dyn std::error::Error>> = match cli.parser_config() {
        Err(e) => Err(e.into()),
        Ok(parser) => match cli.command {
            Commands::Compare {
                source_a,
                source_b,
                json,
            } => commands::compare::run(&source_a, &source_b, json, parser, cli.verbose).map(|()| true),

            Commands::Validate {
                source,
                required,
                json,
            } => commands::validate::run(&source, required, json, parser, cli.verbose),
        },
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
