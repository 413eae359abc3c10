//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.convoscrub.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input batch settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Artifact settings.
    #[serde(default)]
    pub export: ExportConfig,

    /// Leak audit settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// General application settings.
///
/// Verbosity is CLI-only (`--verbose`/`--quiet`); logging is initialized
/// from the flags before any config file is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory the artifacts are written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

/// Input batch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Path of the raw batch file.
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Upper bound on records per run; larger batches are truncated
    /// with a warning.
    #[serde(default = "default_max_records")]
    pub max_records: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            max_records: default_max_records(),
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("conversations-raw.json")
}

fn default_max_records() -> usize {
    10_000
}

/// Artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// File name of the sanitized export inside the output directory.
    #[serde(default = "default_conversations_file")]
    pub conversations_file: String,

    /// File name of the stats document inside the output directory.
    #[serde(default = "default_stats_file")]
    pub stats_file: String,

    /// Pretty-print the artifacts.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            conversations_file: default_conversations_file(),
            stats_file: default_stats_file(),
            pretty: true,
        }
    }
}

fn default_conversations_file() -> String {
    "conversations.json".to_string()
}

fn default_stats_file() -> String {
    "live-stats.json".to_string()
}

/// Leak audit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Run the post-scrub leak audit.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Treat audit findings as fatal (exit code 2, artifacts withheld).
    #[serde(default)]
    pub fail_on_leak: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fail_on_leak: false,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".convoscrub.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.source.input = input.clone();
        }
        if let Some(ref output_dir) = args.output_dir {
            self.general.output_dir = output_dir.clone();
        }
        if let Some(ref name) = args.conversations_file {
            self.export.conversations_file = name.clone();
        }
        if let Some(ref name) = args.stats_file {
            self.export.stats_file = name.clone();
        }

        // The pretty/compact pair is mutually exclusive at the CLI level
        if args.pretty {
            self.export.pretty = true;
        } else if args.compact {
            self.export.pretty = false;
        }

        if args.no_audit {
            self.audit.enabled = false;
        }
        if args.fail_on_leak {
            self.audit.fail_on_leak = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output_dir, PathBuf::from("data"));
        assert_eq!(config.source.input, PathBuf::from("conversations-raw.json"));
        assert_eq!(config.source.max_records, 10_000);
        assert_eq!(config.export.conversations_file, "conversations.json");
        assert_eq!(config.export.stats_file, "live-stats.json");
        assert!(config.export.pretty);
        assert!(config.audit.enabled);
        assert!(!config.audit.fail_on_leak);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output_dir = "public"

[source]
input = "exports/raw.json"
max_records = 500

[audit]
fail_on_leak = true
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output_dir, PathBuf::from("public"));
        assert_eq!(config.source.input, PathBuf::from("exports/raw.json"));
        assert_eq!(config.source.max_records, 500);
        // Untouched tables keep their defaults
        assert_eq!(config.export.stats_file, "live-stats.json");
        assert!(config.audit.fail_on_leak);
        assert!(config.audit.enabled);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        // Older config files carried a [general] verbose key; they must
        // still parse now that verbosity is CLI-only.
        let config: Config = toml::from_str(
            r#"
[general]
output_dir = "public"
verbose = true
"#,
        )
        .unwrap();
        assert_eq!(config.general.output_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[export]"));
        assert!(toml_str.contains("[audit]"));
    }

    #[test]
    fn test_merge_with_args_overrides() {
        let mut config = Config::default();
        let mut args = make_args();
        args.input = Some(PathBuf::from("other.json"));
        args.output_dir = Some(PathBuf::from("out"));
        args.compact = true;
        args.no_audit = true;

        config.merge_with_args(&args);

        assert_eq!(config.source.input, PathBuf::from("other.json"));
        assert_eq!(config.general.output_dir, PathBuf::from("out"));
        assert!(!config.export.pretty);
        assert!(!config.audit.enabled);
    }

    #[test]
    fn test_merge_with_args_keeps_config_when_cli_silent() {
        let mut config: Config = toml::from_str(
            r#"
[export]
pretty = false
stats_file = "stats.json"
"#,
        )
        .unwrap();

        config.merge_with_args(&make_args());

        assert!(!config.export.pretty);
        assert_eq!(config.export.stats_file, "stats.json");
    }
}
