//! Field-level PII scrubbers and the record-level scrub.
//!
//! Every function here is total: missing or malformed input degrades to a
//! documented placeholder, never an error. The placeholders and hashed
//! forms are a compatibility contract with the published exports; the
//! dashboard and downstream cohort analysis both match on them verbatim.

use crate::anonymize::cohort::hash8;
use crate::models::{ConversationRecord, SanitizedRecord};

/// Placeholder for absent or malformed emails.
pub const EMAIL_PLACEHOLDER: &str = "user@example.com";
/// Fixed replacement for phone numbers.
pub const PHONE_REMOVED: &str = "[phone_removed]";
/// Fixed replacement for IP addresses.
pub const IP_REMOVED: &str = "[ip_removed]";
/// Fixed replacement for device identifiers.
pub const DEVICE_REMOVED: &str = "[device_removed]";
/// Prefix on hashed transaction ids.
pub const TXN_PREFIX: &str = "txn_";

/// Replace an email with a cohort-hashed placeholder.
///
/// The local part is kept only as its [`hash8`] digest so records from
/// the same sender still group together; the domain
/// is always replaced, even when well-formed. Anything without exactly one
/// `@` falls back to the fixed placeholder.
pub fn scrub_email(email: Option<&str>) -> String {
    let Some(email) = email.filter(|e| !e.is_empty()) else {
        return EMAIL_PLACEHOLDER.to_string();
    };

    match email.split_once('@') {
        Some((local, domain)) if !domain.contains('@') => {
            format!("user_{}@example.com", hash8(local))
        }
        _ => EMAIL_PLACEHOLDER.to_string(),
    }
}

/// Remove a phone number entirely. Phones are never partially retained,
/// so the input is not inspected at all.
pub fn scrub_phone(_phone: Option<&str>) -> String {
    PHONE_REMOVED.to_string()
}

/// Replace a transaction id with its cohort hash.
///
/// Callers substitute `""` for an absent id, which yields the
/// deterministic `"txn_0"`.
pub fn scrub_transaction_id(id: &str) -> String {
    format!("{}{}", TXN_PREFIX, hash8(id))
}

/// Reduce a name to its first initial plus a fixed suffix.
///
/// Absent, empty, or whitespace-only names degrade to `"User"`.
#[allow(dead_code)] // Standalone capability; no name field flows through the record scrub
pub fn scrub_name(name: Option<&str>) -> String {
    let Some(name) = name.filter(|n| !n.is_empty()) else {
        return "User".to_string();
    };

    match name.split_whitespace().next().and_then(|t| t.chars().next()) {
        Some(initial) => format!("{initial}[lastname]"),
        None => "User".to_string(),
    }
}

/// Scrub one conversation record.
///
/// Copies every non-PII field unchanged (including absence), replaces the
/// email, phone, and transaction id through the field scrubbers, and
/// unconditionally removes the IP address and device id. Pure; safe to
/// re-run on already-sanitized data.
pub fn scrub_conversation(record: &ConversationRecord) -> SanitizedRecord {
    SanitizedRecord {
        timestamp: record.timestamp.clone(),
        user_id: record.user_id.clone(),
        user_email: scrub_email(record.user_email.as_deref()),
        query: record.query.clone(),
        bot_response: record.bot_response.clone(),
        confidence_score: record.confidence_score,
        emotion_detected: record.emotion_detected.clone(),
        resolution_status: record.resolution_status.clone(),
        feedback_score: record.feedback_score,
        phone: scrub_phone(record.phone.as_deref()),
        transaction_id: scrub_transaction_id(record.transaction_id.as_deref().unwrap_or("")),
        ip_address: IP_REMOVED.to_string(),
        device_id: DEVICE_REMOVED.to_string(),
    }
}

/// Scrub a whole batch, preserving order one-to-one.
pub fn scrub_batch(records: &[ConversationRecord]) -> Vec<SanitizedRecord> {
    records.iter().map(scrub_conversation).collect()
}
