//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;

/// convoscrub - PII scrubber and public-stats generator
///
/// Scrub personally identifiable information out of a raw conversation
/// batch and derive the aggregate stats document a public dashboard polls.
/// One run reads one batch and writes two JSON artifacts.
///
/// Examples:
///   convoscrub
///   convoscrub --input exports/raw.json --output-dir public
///   convoscrub --dry-run
///   convoscrub --fail-on-leak --now 2024-01-15T10:00:00Z
///   convoscrub --emit-sample 25
///   convoscrub --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Input JSON file holding the raw batch
    ///
    /// Either a bare array of records or an object with a "conversations"
    /// array. Defaults to conversations-raw.json or the config file value.
    #[arg(short, long, value_name = "FILE", env = "CONVOSCRUB_INPUT")]
    pub input: Option<PathBuf>,

    /// Directory the artifacts are written into
    #[arg(short, long, value_name = "DIR", env = "CONVOSCRUB_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name of the sanitized export inside the output directory
    #[arg(long, value_name = "NAME")]
    pub conversations_file: Option<String>,

    /// File name of the stats document inside the output directory
    #[arg(long, value_name = "NAME")]
    pub stats_file: Option<String>,

    /// Pretty-print the artifacts
    ///
    /// Overrides the config file setting.
    #[arg(long, conflicts_with = "compact")]
    pub pretty: bool,

    /// Write each artifact on a single line
    ///
    /// Overrides the config file setting.
    #[arg(long, conflicts_with = "pretty")]
    pub compact: bool,

    /// Skip the post-scrub leak audit
    #[arg(long)]
    pub no_audit: bool,

    /// Treat leak audit findings as fatal
    ///
    /// Useful for CI pipelines. Exit code 2 and no artifacts are written
    /// when the audit finds anything.
    #[arg(long)]
    pub fail_on_leak: bool,

    /// Pin the clock for a reproducible run (RFC 3339)
    ///
    /// Sets both the stats timestamp and the reference point for the
    /// active-conversation window. Example: 2024-01-15T10:00:00Z
    #[arg(long, value_name = "TIMESTAMP", value_parser = parse_rfc3339)]
    pub now: Option<DateTime<Utc>>,

    /// Dry run: load and summarize the batch without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Write a deterministic sample batch to the input path and exit
    ///
    /// Refuses to overwrite an existing file.
    #[arg(long, value_name = "COUNT")]
    pub emit_sample: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .convoscrub.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .convoscrub.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("not an RFC 3339 timestamp: {e}"))
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.no_audit && self.fail_on_leak {
            return Err("Cannot use --fail-on-leak with --no-audit".to_string());
        }

        if let Some(count) = self.emit_sample {
            if count == 0 {
                return Err("Sample count must be at least 1".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
