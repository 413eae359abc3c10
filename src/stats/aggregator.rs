//! Aggregate metrics over a conversation batch.
//!
//! Everything here is computed from the batch as a whole and carries no
//! per-record data, so the output is safe to publish alongside the
//! sanitized export.

use crate::models::{
    ConversationCounts, ConversationRecord, PerformanceMetrics, PublicStats, SystemStatus,
};
use chrono::{DateTime, Duration, Utc};

/// Width of the trailing window that counts a record as active.
pub const ACTIVE_WINDOW_MINUTES: i64 = 5;

/// Mean of a per-record value, rounded half away from zero.
///
/// Records where the accessor returns `None` still count toward the
/// denominator and contribute zero to the sum. An empty batch averages
/// to 0. The sum accumulates in f64, so extreme values clamp at the
/// i64 bounds instead of overflowing.
pub fn rounded_average<F>(records: &[ConversationRecord], value: F) -> i64
where
    F: Fn(&ConversationRecord) -> Option<i64>,
{
    if records.is_empty() {
        return 0;
    }

    let sum: f64 = records.iter().map(|r| value(r).unwrap_or(0) as f64).sum();
    (sum / records.len() as f64).round() as i64
}

/// Percentage of the batch marked resolved, rounded to a whole number.
///
/// Only the exact status `"resolved"` counts; pending, escalated, and
/// absent statuses are all unresolved. An empty batch rates 0.
pub fn resolution_rate(records: &[ConversationRecord]) -> i64 {
    if records.is_empty() {
        return 0;
    }

    let resolved = records.iter().filter(|r| r.is_resolved()).count();
    ((resolved as f64 / records.len() as f64) * 100.0).round() as i64
}

/// Records whose timestamp is strictly after `now` minus the active
/// window. Records with an absent or unparseable timestamp are never
/// active.
pub fn active_count(records: &[ConversationRecord], now: DateTime<Utc>) -> usize {
    let cutoff = now - Duration::minutes(ACTIVE_WINDOW_MINUTES);

    records
        .iter()
        .filter_map(ConversationRecord::parsed_timestamp)
        .filter(|ts| *ts > cutoff)
        .count()
}

/// Build the publishable stats document for a batch.
///
/// `now` is both the `last_updated` stamp and the reference point for
/// the active window, so a run is reproducible when the caller pins it.
pub fn generate_public_stats(records: &[ConversationRecord], now: DateTime<Utc>) -> PublicStats {
    PublicStats {
        system: SystemStatus {
            status: "operational".to_string(),
            last_updated: now,
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        conversations: ConversationCounts {
            total_today: records.len(),
            active_now: active_count(records, now),
        },
        performance: PerformanceMetrics {
            avg_confidence_score: rounded_average(records, |r| r.confidence_score),
            auto_resolution_rate: resolution_rate(records),
        },
    }
}
