//! Layered CLI settings
//!
//! Sources are merged in increasing priority:
//!
//! 1. built-in defaults,
//! 2. `fieldcheck.toml` in the working directory (or `--config <FILE>`),
//! 3. `FIELDCHECK_*` environment variables,
//! 4. command-line flags.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "fieldcheck.toml";

/// Prefix for environment overrides (`FIELDCHECK_LOCALE=fr`).
pub const ENV_PREFIX: &str = "FIELDCHECK_";

/// Effective settings after all layers are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Active message locale.
    pub locale: String,
    /// Locale consulted when the active one lacks a message.
    pub fallback_locale: String,
    /// JSON message catalog merged into `locale`.
    pub catalog: Option<PathBuf>,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Pretty-print the validated payload.
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            fallback_locale: "en".to_string(),
            catalog: None,
            log_level: "warn".to_string(),
            pretty: true,
        }
    }
}

/// Values given on the command line. `None` leaves lower layers in charge.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl Settings {
    /// Merges every layer. A missing config file is not an error.
    pub fn load(config: Option<&Path>, overrides: &Overrides) -> Result<Self, figment::Error> {
        let file = config.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(overrides))
            .extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_defaults_without_sources() {
        let settings = Settings::load(
            Some(Path::new("/nonexistent/fieldcheck.toml")),
            &Overrides::default(),
        )
        .unwrap();
        assert_eq!(settings.log_level, "warn");
        assert!(settings.catalog.is_none());
    }

    #[test]
    fn test_file_then_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "locale = \"fr\"\npretty = false\nlog_level = \"info\"").unwrap();

        let overrides = Overrides {
            log_level: Some("debug".to_string()),
            ..Overrides::default()
        };
        let settings = Settings::load(Some(file.path()), &overrides).unwrap();

        assert_eq!(settings.locale, "fr");
        assert!(!settings.pretty);
        assert_eq!(settings.log_level, "debug");
    }
}
