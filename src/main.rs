//! convoscrub - PII scrubber and public-stats generator
//!
//! A CLI tool that scrubs personally identifiable information out of raw
//! conversation exports and derives the aggregate stats document a
//! public dashboard polls.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (input, config, write failure, etc.)
//!   2 - Leak audit findings with --fail-on-leak set

mod anonymize;
mod cli;
mod config;
mod export;
mod models;
mod source;
mod stats;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cli::Args;
use config::Config;
use source::loader::BatchSummary;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("convoscrub v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the pipeline
    match run_pipeline(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .convoscrub.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".convoscrub.toml");

    if path.exists() {
        eprintln!("⚠️  .convoscrub.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .convoscrub.toml")?;

    println!("✅ Created .convoscrub.toml with default settings.");
    println!("   Edit it to customize input, output directory, and audit behavior.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete scrub workflow. Returns exit code (0 or 2).
fn run_pipeline(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input = config.source.input.clone();
    let now = args.now.unwrap_or_else(Utc::now);

    // Handle --emit-sample: write a test batch and exit
    if let Some(count) = args.emit_sample {
        return handle_emit_sample(&input, count, now);
    }

    // Step 1: Load the raw batch
    println!("📥 Loading batch: {}", input.display());
    let mut records = source::load_batch(&input)
        .with_context(|| format!("Failed to load batch from {}", input.display()))?;

    if records.len() > config.source.max_records {
        warn!(
            "Batch has {} records; truncating to the configured maximum of {}",
            records.len(),
            config.source.max_records
        );
        records.truncate(config.source.max_records);
    }

    let summary = source::summarize(&records);
    info!("Loaded {}", summary);

    // Handle --dry-run: summarize the batch and exit
    if args.dry_run {
        return handle_dry_run(&summary);
    }

    // Step 2: Scrub every record
    println!("🔒 Scrubbing {} records...", records.len());
    let sanitized = anonymize::scrub_batch(&records);

    // Step 3: Derive the public stats from the raw batch
    let stats = stats::generate_public_stats(&records, now);

    // Step 4: Audit the scrubbed output before anything is written
    if config.audit.enabled {
        let findings = anonymize::audit::audit_batch(&records, &sanitized);

        if findings.is_empty() {
            debug!("Leak audit clean");
        } else {
            for finding in &findings {
                warn!("Leak audit: {}", finding);
            }
            if config.audit.fail_on_leak {
                eprintln!(
                    "\n⛔ Leak audit found {} problem(s). Failing (exit code 2); no artifacts written.",
                    findings.len()
                );
                return Ok(2);
            }
        }
    } else {
        warn!("Leak audit disabled");
    }

    // Step 5: Write the artifacts
    let layout = export::ArtifactLayout {
        output_dir: config.general.output_dir.clone(),
        conversations_file: config.export.conversations_file.clone(),
        stats_file: config.export.stats_file.clone(),
        pretty: config.export.pretty,
    };
    let paths = export::write_artifacts(&sanitized, &stats, &layout)?;

    // Print summary
    println!("\n📊 Run Summary:");
    println!("   Records scrubbed: {}", sanitized.len());
    println!("   Active now: {}", stats.conversations.active_now);
    println!(
        "   Avg confidence: {} | Resolution rate: {}%",
        stats.performance.avg_confidence_score, stats.performance.auto_resolution_rate
    );
    println!("\n✅ Scrub complete! Artifacts:");
    println!("   📄 {}", paths.conversations.display());
    println!("   📄 {}", paths.stats.display());

    Ok(0)
}

/// Handle --emit-sample: write a deterministic batch to the input path.
fn handle_emit_sample(path: &Path, count: usize, now: DateTime<Utc>) -> Result<i32> {
    source::sample::write_sample(path, count, now)?;

    println!("✅ Wrote {} sample records to {}", count, path.display());
    println!("   Run again without --emit-sample to scrub it.");
    Ok(0)
}

/// Handle --dry-run: print the batch summary, write nothing.
fn handle_dry_run(summary: &BatchSummary) -> Result<i32> {
    println!("\n🔍 Dry run: nothing will be written.\n");
    println!("   Records:             {}", summary.total);
    println!("   With email:          {}", summary.with_email);
    println!("   With phone:          {}", summary.with_phone);
    println!("   With transaction id: {}", summary.with_transaction_id);
    println!("   Resolved:            {}", summary.resolved);
    println!("\n✅ Dry run complete. No artifacts were written.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .convoscrub.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
