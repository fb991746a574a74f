//! Configuration management for compatibility checks
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-compat.toml)
//! - Environment variables (SCHEMA_COMPAT__*)
//!
//! ## Example config file (schema-compat.toml):
//! ```toml
//! [compatibility]
//! mode = "data"
//! check_names = true
//! allow_promotions = true
//!
//! [report]
//! fail_on_warnings = false
//! output_format = "pretty"
//! ```

use config_crate::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::compatibility::{CompatibilityOptions, CompatibilityResult};
use crate::error::Result;

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatConfig {
    /// Comparison rules
    #[serde(default)]
    pub compatibility: CompatibilityOptions,

    /// How results are judged and reported
    #[serde(default)]
    pub report: ReportConfig,
}

/// Report configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Treat warning-level findings as failures
    #[serde(default)]
    pub fail_on_warnings: bool,

    /// JSON report layout
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

impl CompatConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, with `config_path` (if any) overriding the default locations
    pub fn load_from(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-compat.toml",
            ".schema-compat.toml",
            "config/schema-compat.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schema-compat") {
            let xdg_config = config_dir.config_dir().join("schema-compat.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Load from environment variables (SCHEMA_COMPAT__*)
        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_COMPAT")
                .separator("__")
                .try_parsing(true),
        );

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Parse configuration from TOML text, ignoring files and environment
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Whether a result passes this configuration's gate
    pub fn gate(&self, result: &CompatibilityResult) -> bool {
        if result.is_error() {
            return false;
        }
        !(self.report.fail_on_warnings && result.warning_count() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compatibility::{CompatibilityMessage, CompatibilityMode, Impact};

    #[test]
    fn test_default_config() {
        let config = CompatConfig::default();
        assert_eq!(config.compatibility.mode, CompatibilityMode::Schema);
        assert!(config.compatibility.check_names);
        assert!(!config.report.fail_on_warnings);
    }

    #[test]
    fn test_serialize_config() {
        let config = CompatConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[compatibility]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("mode = \"schema\""));
    }

    #[test]
    fn test_from_toml_str() {
        let config = CompatConfig::from_toml_str(
            r#"
            [compatibility]
            mode = "data"
            allow_promotions = true

            [report]
            output_format = "compact"
            "#,
        )
        .unwrap();
        assert_eq!(config.compatibility.mode, CompatibilityMode::Data);
        assert!(config.compatibility.allow_promotions);
        assert!(config.compatibility.check_names);
        assert_eq!(config.report.output_format, OutputFormat::Compact);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compat.toml");

        let mut config = CompatConfig::default();
        config.compatibility.check_names = false;
        config.report.fail_on_warnings = true;
        config.save(&path).unwrap();

        // Parsed directly so local config files and env vars cannot interfere
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded = CompatConfig::from_toml_str(&content).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(CompatConfig::load_from(Some(path.as_path())).is_err());
    }

    #[test]
    fn test_gate() {
        let warning = CompatibilityResult::new(vec![CompatibilityMessage::new(
            vec!["User".into()],
            Impact::OldReaderIgnoresData,
            "new record added optional fields nickname",
        )]);

        let lenient = CompatConfig::default();
        assert!(lenient.gate(&warning));
        assert!(lenient.gate(&CompatibilityResult::default()));

        let mut strict = CompatConfig::default();
        strict.report.fail_on_warnings = true;
        assert!(!strict.gate(&warning));
    }
}
