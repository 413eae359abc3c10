//! Artifact rendering and writing.
//!
//! A run publishes two JSON files into the output directory: the
//! sanitized conversation export (a bare array, in input order) and the
//! public stats document. Rendering is separated from writing so the
//! dry-run and tests can inspect output without touching the filesystem.

use crate::models::{PublicStats, SanitizedRecord};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Where and how the artifacts land.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    pub output_dir: PathBuf,
    pub conversations_file: String,
    pub stats_file: String,
    pub pretty: bool,
}

/// Full paths of the artifacts a run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub conversations: PathBuf,
    pub stats: PathBuf,
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).map_err(Into::into)
    } else {
        serde_json::to_string(value).map_err(Into::into)
    }
}

/// Render the sanitized export as a JSON array.
pub fn render_conversations(records: &[SanitizedRecord], pretty: bool) -> Result<String> {
    render(&records, pretty)
}

/// Render the public stats document.
pub fn render_stats(stats: &PublicStats, pretty: bool) -> Result<String> {
    render(stats, pretty)
}

/// Write both artifacts, creating the output directory if needed.
pub fn write_artifacts(
    records: &[SanitizedRecord],
    stats: &PublicStats,
    layout: &ArtifactLayout,
) -> Result<ArtifactPaths> {
    fs::create_dir_all(&layout.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            layout.output_dir.display()
        )
    })?;

    let paths = ArtifactPaths {
        conversations: layout.output_dir.join(&layout.conversations_file),
        stats: layout.output_dir.join(&layout.stats_file),
    };

    let export = render_conversations(records, layout.pretty)
        .context("Failed to serialize sanitized conversations")?;
    fs::write(&paths.conversations, export).with_context(|| {
        format!(
            "Failed to write sanitized export to {}",
            paths.conversations.display()
        )
    })?;

    let stats_doc = render_stats(stats, layout.pretty).context("Failed to serialize stats")?;
    fs::write(&paths.stats, stats_doc)
        .with_context(|| format!("Failed to write stats to {}", paths.stats.display()))?;

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymize::scrub_batch;
    use crate::models::ConversationRecord;
    use crate::stats::generate_public_stats;
    use chrono::{TimeZone, Utc};

    fn sanitized_pair() -> (Vec<SanitizedRecord>, PublicStats) {
        let raw = vec![
            ConversationRecord {
                timestamp: Some("2024-01-15T09:58:00Z".to_string()),
                user_email: Some("customer@example.com".to_string()),
                confidence_score: Some(85),
                resolution_status: Some("resolved".to_string()),
                ..Default::default()
            },
            ConversationRecord::default(),
        ];
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
        (scrub_batch(&raw), generate_public_stats(&raw, now))
    }

    #[test]
    fn test_export_is_a_bare_array() {
        let (records, _) = sanitized_pair();
        let compact = render_conversations(&records, false).unwrap();

        assert!(compact.starts_with('['));
        assert!(compact.ends_with(']'));
        assert!(compact.contains("\"user_24217fde@example.com\""));
        assert!(!compact.contains("customer@example.com"));
    }

    #[test]
    fn test_absent_fields_stay_absent_in_export() {
        let (records, _) = sanitized_pair();
        let rendered = render_conversations(&records, true).unwrap();

        // The second record carried no query; the export must not invent
        // a null for it.
        let reparsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(reparsed[1].get("query").is_none());
        assert_eq!(reparsed[1]["phone"], "[phone_removed]");
    }

    #[test]
    fn test_stats_document_shape() {
        let (_, stats) = sanitized_pair();
        let rendered = render_stats(&stats, false).unwrap();
        let reparsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(reparsed["system"]["status"], "operational");
        assert_eq!(reparsed["system"]["last_updated"], "2024-01-15T10:00:00.000Z");
        assert_eq!(reparsed["conversations"]["total_today"], 2);
        assert_eq!(reparsed["conversations"]["active_now"], 1);
        assert_eq!(reparsed["performance"]["avg_confidence_score"], 43);
        assert_eq!(reparsed["performance"]["auto_resolution_rate"], 50);
    }

    #[test]
    fn test_write_artifacts_creates_directory_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout {
            output_dir: dir.path().join("data"),
            conversations_file: "conversations.json".to_string(),
            stats_file: "live-stats.json".to_string(),
            pretty: true,
        };

        let (records, stats) = sanitized_pair();
        let paths = write_artifacts(&records, &stats, &layout).unwrap();

        assert_eq!(paths.conversations, dir.path().join("data/conversations.json"));
        assert_eq!(paths.stats, dir.path().join("data/live-stats.json"));

        let export = fs::read_to_string(&paths.conversations).unwrap();
        let reparsed: Vec<SanitizedRecord> = serde_json::from_str(&export).unwrap();
        assert_eq!(reparsed, records);

        let stats_doc = fs::read_to_string(&paths.stats).unwrap();
        let reparsed: PublicStats = serde_json::from_str(&stats_doc).unwrap();
        assert_eq!(reparsed, stats);
    }

    #[test]
    fn test_compact_rendering_has_no_newlines() {
        let (records, stats) = sanitized_pair();
        assert!(!render_conversations(&records, false).unwrap().contains('\n'));
        assert!(!render_stats(&stats, false).unwrap().contains('\n'));
    }
}
