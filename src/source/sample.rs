//! Deterministic sample batch generator.
//!
//! Produces a raw batch in the upstream input shape so the pipeline can
//! be exercised end to end without real customer data. The rotation is
//! fixed; the same count and clock always produce the same batch.

use crate::models::ConversationRecord;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::fs;
use std::path::Path;

/// Seconds between consecutive sample timestamps, walking backwards from
/// the reference clock. With the 5-minute active window this puts the
/// first four records inside the window and the rest outside it.
const TIMESTAMP_STEP_SECONDS: i64 = 90;

const QUERIES: &[(&str, &str)] = &[
    (
        "How do I reset my password?",
        "You can reset your password by...",
    ),
    (
        "Where is my order?",
        "Your order is on its way and should arrive...",
    ),
    (
        "I want a refund for my last purchase",
        "I can help with that refund. First...",
    ),
    (
        "How do I upgrade my plan?",
        "Upgrading is available from the billing page...",
    ),
    (
        "The app keeps crashing on startup",
        "Sorry about that. Let's try reinstalling...",
    ),
];

const EMOTIONS: &[&str] = &["neutral", "frustrated", "happy", "confused"];

const STATUSES: &[&str] = &["resolved", "pending", "resolved", "escalated"];

const EMAILS: &[&str] = &["customer@example.com", "jane.doe@gmail.com"];

/// Build `count` sample records, newest first.
///
/// Every third record carries the full set of PII fields, the next
/// carries only an email, and the third carries none, so a scrub of the
/// batch exercises every placeholder form including the absent-field
/// fallbacks.
pub fn sample_batch(count: usize, now: DateTime<Utc>) -> Vec<ConversationRecord> {
    (0..count)
        .map(|i| {
            let stamp = now - Duration::seconds(TIMESTAMP_STEP_SECONDS * i as i64);
            let (query, response) = QUERIES[i % QUERIES.len()];

            let mut record = ConversationRecord {
                timestamp: Some(stamp.to_rfc3339_opts(SecondsFormat::Millis, true)),
                user_id: Some(format!("user_{}", 12345 + i)),
                query: Some(query.to_string()),
                bot_response: Some(response.to_string()),
                confidence_score: Some(70 + (i as i64 * 7) % 30),
                emotion_detected: Some(EMOTIONS[i % EMOTIONS.len()].to_string()),
                resolution_status: Some(STATUSES[i % STATUSES.len()].to_string()),
                feedback_score: Some(1 + (i as i64) % 5),
                ..Default::default()
            };

            match i % 3 {
                0 => {
                    record.user_email = Some(EMAILS[i % EMAILS.len()].to_string());
                    record.phone = Some(format!("+1555{:07}", 100 + i));
                    record.transaction_id = Some(format!("txn_{:06}", 789012 + i));
                    record.ip_address = Some(format!("203.0.113.{}", i % 256));
                    record.device_id = Some(format!("device-{:04x}", 0x77af + i));
                }
                1 => {
                    record.user_email = Some(EMAILS[i % EMAILS.len()].to_string());
                }
                _ => {}
            }

            record
        })
        .collect()
}

/// Write a sample batch to `path` in the object-wrapped input shape.
///
/// Refuses to clobber an existing file; a sample must never silently
/// replace a real batch waiting to be scrubbed.
pub fn write_sample(path: &Path, count: usize, now: DateTime<Utc>) -> Result<()> {
    if path.exists() {
        bail!(
            "{} already exists; move it aside before emitting a sample",
            path.display()
        );
    }

    let document = serde_json::json!({ "conversations": sample_batch(count, now) });
    let rendered = serde_json::to_string_pretty(&document)
        .context("Failed to serialize sample batch")?;
    fs::write(path, rendered)
        .with_context(|| format!("Failed to write sample batch to {}", path.display()))?;

    Ok(())
}
