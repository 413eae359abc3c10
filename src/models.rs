//! Data models for the scrub pipeline.
//!
//! This module contains the core data structures: the raw conversation
//! record delivered by the automation platform, its sanitized counterpart,
//! and the public stats document consumed by the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw conversation record as delivered by the upstream collector.
///
/// Every field is optional on the wire: upstream rows are hand-curated
/// spreadsheet exports and routinely omit columns. Absent fields stay
/// absent on re-serialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    /// Capture time, RFC 3339. Kept as a raw string so one malformed
    /// value degrades to "not active" instead of failing the batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Opaque upstream identifier. Not treated as PII.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Customer email address. PII; never exported as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,

    /// The customer's question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// The bot's answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_response: Option<String>,

    /// Bot confidence, 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<i64>,

    /// Detected customer emotion (free-form label).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_detected: Option<String>,

    /// Resolution status; only the exact value `"resolved"` counts as
    /// resolved in the aggregates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_status: Option<String>,

    /// Customer feedback score (small integer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_score: Option<i64>,

    /// Customer phone number. PII; never exported, not even hashed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Transaction identifier. PII; exported only as a cohort hash.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Client IP address. PII; always removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    /// Client device identifier. PII; always removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl ConversationRecord {
    /// Parse the timestamp leniently. Absent or unparseable values are
    /// `None`, which downstream treats as "not active".
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Whether this record counts as resolved. Anything other than the
    /// exact string `"resolved"` (including absent) does not.
    pub fn is_resolved(&self) -> bool {
        self.resolution_status.as_deref() == Some("resolved")
    }
}

/// A conversation record with all PII fields replaced.
///
/// Same shape as [`ConversationRecord`]; the five PII fields are always
/// present and hold a documented placeholder or hashed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizedRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// `user@example.com` or `user_<hash>@example.com`.
    pub user_email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_response: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_detected: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_score: Option<i64>,

    /// Always `[phone_removed]`.
    pub phone: String,

    /// Always `txn_<hash>`.
    pub transaction_id: String,

    /// Always `[ip_removed]`.
    pub ip_address: String,

    /// Always `[device_removed]`.
    pub device_id: String,
}

/// Millisecond-precision ISO 8601 serialization for timestamps.
///
/// Previously published stats documents carry `Date.toISOString()`-style
/// values (`2024-01-15T09:30:00.000Z`); chrono's default serializer emits
/// nanoseconds, so the format is pinned here.
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// The public stats document published for the dashboard.
///
/// Aggregate-only: counts and rounded averages, never per-record data.
/// The dashboard's `knowledge` and `team` sections are produced by other
/// pipeline stages and are not emitted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicStats {
    /// System health block.
    pub system: SystemStatus,
    /// Conversation volume counters.
    pub conversations: ConversationCounts,
    /// Bot performance metrics.
    pub performance: PerformanceMetrics,
}

/// The `system` section of the stats document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    /// Always `"operational"`; the pipeline does not run when the system
    /// is down, so no other value is ever produced here.
    pub status: String,
    /// Aggregation time.
    #[serde(with = "iso_millis")]
    pub last_updated: DateTime<Utc>,
    /// Build identifier of the generating pipeline.
    pub version: String,
}

/// The `conversations` section of the stats document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationCounts {
    /// Size of the aggregated batch.
    pub total_today: usize,
    /// Records whose timestamp falls within the trailing activity window.
    pub active_now: usize,
}

/// The `performance` section of the stats document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Rounded mean confidence score over the batch.
    pub avg_confidence_score: i64,
    /// Rounded percentage of records resolved without escalation.
    pub auto_resolution_rate: i64,
}
