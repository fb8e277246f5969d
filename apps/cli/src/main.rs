//! # fieldcheck CLI entry point
//!
//! Parses command-line arguments, merges layered settings, installs the
//! `tracing` subscriber and dispatches to subcommand handlers.

mod commands;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, EXIT_CONFIG, ParseArgs, run_check, run_parse, run_rules};
use settings::{Overrides, Settings};

/// Validate JSON payloads against declarative field rules.
#[derive(Parser, Debug)]
#[command(name = "fieldcheck", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (defaults to `fieldcheck.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Message locale.
    #[arg(long, global = true)]
    locale: Option<String>,

    /// JSON message catalog merged into the active locale.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Log filter used when `RUST_LOG` is unset (e.g. `debug`).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a payload against a rule manifest.
    Check(CheckArgs),

    /// Show how a single rule string is parsed.
    Parse(ParseArgs),

    /// List every known rule name.
    Rules,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            locale: self.locale.clone(),
            catalog: self.catalog.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref(), &cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: invalid settings: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(?settings, "fieldcheck starting");

    let result = match &cli.command {
        Commands::Check(args) => run_check(args, &settings),
        Commands::Parse(args) => run_parse(args),
        Commands::Rules => Ok(run_rules()),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_check() {
        let cli = Cli::try_parse_from([
            "fieldcheck",
            "check",
            "--rules",
            "rules.json",
            "--data",
            "payload.json",
            "--locale",
            "fr",
        ])
        .unwrap();

        assert_eq!(cli.locale.as_deref(), Some("fr"));
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.rules, PathBuf::from("rules.json"));
        assert_eq!(args.data, Some(PathBuf::from("payload.json")));
    }

    #[test]
    fn cli_parse_check_reads_stdin_by_default() {
        let cli = Cli::try_parse_from(["fieldcheck", "check", "-r", "rules.json"]).unwrap();
        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert!(args.data.is_none());
    }

    #[test]
    fn cli_parse_requires_rules_for_check() {
        assert!(Cli::try_parse_from(["fieldcheck", "check"]).is_err());
    }

    #[test]
    fn cli_overrides_only_set_flags() {
        let cli = Cli::try_parse_from(["fieldcheck", "--log-level", "debug", "rules"]).unwrap();
        let overrides = cli.overrides();
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
        assert!(overrides.locale.is_none());
    }
}
