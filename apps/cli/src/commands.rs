//! Subcommand handlers.
//!
//! Each handler returns the process exit code; `Err` is reserved for I/O
//! and input decoding failures.

use std::fs;
use std::io::{self, Read as _};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use clap::Args;
use fieldcheck_validator::manifest::RuleManifest;
use fieldcheck_validator::message::MessageCatalog;
use fieldcheck_validator::registry::RuleRegistry;
use fieldcheck_validator::requirement::{NULLABLE, REQUIRED, REQUIRED_WITHOUT};
use fieldcheck_validator::rule::parse;
use fieldcheck_validator::{ValidationError, Validator};
use serde_json::{Value, json};

use crate::settings::Settings;

/// Validation passed.
pub const EXIT_OK: u8 = 0;
/// The payload broke a rule.
pub const EXIT_INVALID: u8 = 1;
/// Declarations, messages or inputs are unusable.
pub const EXIT_CONFIG: u8 = 2;

// ============================================================================
// CHECK
// ============================================================================

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Rule manifest (JSON, or TOML with a `.toml` extension).
    #[arg(long, short)]
    pub rules: PathBuf,

    /// JSON payload to validate. Reads stdin when omitted.
    #[arg(long, short)]
    pub data: Option<PathBuf>,
}

pub fn run_check(args: &CheckArgs, settings: &Settings) -> Result<u8> {
    let manifest = read_manifest(&args.rules)?;
    let catalog = load_catalog(settings)?;

    let validator = match manifest
        .apply(Validator::builder())
        .resolver(Arc::new(catalog))
        .build()
    {
        Ok(validator) => validator,
        Err(error) => return Ok(report(&error)),
    };

    let payload = read_payload(args.data.as_deref())?;
    tracing::debug!(fields = validator.rule_set().len(), "Validating payload");

    match validator.validate(payload) {
        Ok(data) => {
            let value = data.into_inner();
            let text = if settings.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            }?;
            println!("{text}");
            Ok(EXIT_OK)
        }
        Err(error) => Ok(report(&error)),
    }
}

fn report(error: &ValidationError) -> u8 {
    eprintln!("{}: {}", error.status(), error.message());
    if error.is_configuration() {
        tracing::warn!(%error, "Configuration error");
        EXIT_CONFIG
    } else {
        tracing::info!(
            field = error.field().unwrap_or_default(),
            rule = error.code(),
            "Validation failed"
        );
        EXIT_INVALID
    }
}

fn read_manifest(path: &Path) -> Result<RuleManifest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read rules from {}", path.display()))?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        toml::from_str(&text).with_context(|| format!("invalid TOML manifest {}", path.display()))
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON manifest {}", path.display()))
    }
}

fn read_payload(path: Option<&Path>) -> Result<Value> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read payload from {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read payload from stdin")?;
            text
        }
    };
    serde_json::from_str(&text).context("payload is not valid JSON")
}

fn load_catalog(settings: &Settings) -> Result<MessageCatalog> {
    let mut catalog = MessageCatalog::english();

    if let Some(path) = &settings.catalog {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        catalog = catalog
            .merge_json(settings.locale.as_str(), &text)
            .with_context(|| format!("invalid message catalog {}", path.display()))?;
    }

    Ok(catalog
        .with_locale(settings.locale.as_str())
        .with_fallback(settings.fallback_locale.as_str()))
}

// ============================================================================
// PARSE
// ============================================================================

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Rule text, e.g. `min:10`.
    pub rule: String,
}

pub fn run_parse(args: &ParseArgs) -> Result<u8> {
    match parse(&args.rule) {
        Ok(parsed) => {
            let out = json!({ "name": parsed.name, "param": parsed.param });
            println!("{out}");
            Ok(EXIT_OK)
        }
        Err(error) => {
            eprintln!("error: {error}");
            Ok(EXIT_CONFIG)
        }
    }
}

// ============================================================================
// RULES
// ============================================================================

pub fn run_rules() -> u8 {
    let mut names = RuleRegistry::shared().names();
    names.extend([REQUIRED, REQUIRED_WITHOUT, NULLABLE].map(str::to_string));
    names.sort();

    for name in names {
        println!("{name}");
    }
    EXIT_OK
}
