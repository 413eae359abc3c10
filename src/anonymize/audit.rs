//! Post-scrub leak audit.
//!
//! Checks a sanitized batch against the documented output forms before it
//! is published: every PII field must hold its exact fixed literal or a
//! well-formed hashed placeholder, and must differ from the raw value it
//! replaced. The audit is a safety net for pipeline regressions, not part
//! of the scrub itself; scrubbing is total, and the audit of its own
//! output is expected to come back clean.

use crate::anonymize::scrubber::{DEVICE_REMOVED, EMAIL_PLACEHOLDER, IP_REMOVED, PHONE_REMOVED, TXN_PREFIX};
use crate::models::{ConversationRecord, SanitizedRecord};
use std::fmt;

/// A single audit violation on one field of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakFinding {
    /// Index of the offending record in the batch.
    pub index: usize,
    /// Field that failed the check.
    pub field: &'static str,
    /// What was wrong with it.
    pub reason: String,
}

impl fmt::Display for LeakFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}: {}", self.index, self.field, self.reason)
    }
}

/// Audit a sanitized batch against its raw source.
///
/// Both slices must be the same one-to-one scrub output; a length mismatch
/// is itself reported as a finding. An empty result means the batch is
/// safe to publish.
pub fn audit_batch(
    raw: &[ConversationRecord],
    sanitized: &[SanitizedRecord],
) -> Vec<LeakFinding> {
    let mut findings = Vec::new();

    if raw.len() != sanitized.len() {
        findings.push(LeakFinding {
            index: raw.len().min(sanitized.len()),
            field: "batch",
            reason: format!(
                "sanitized batch has {} records but raw batch has {}",
                sanitized.len(),
                raw.len()
            ),
        });
    }

    for (index, (raw, clean)) in raw.iter().zip(sanitized.iter()).enumerate() {
        check_email(index, raw, clean, &mut findings);
        check_fixed(index, "phone", &clean.phone, PHONE_REMOVED, &mut findings);
        check_transaction_id(index, raw, clean, &mut findings);
        check_fixed(index, "ip_address", &clean.ip_address, IP_REMOVED, &mut findings);
        check_fixed(index, "device_id", &clean.device_id, DEVICE_REMOVED, &mut findings);
    }

    findings
}

fn check_email(
    index: usize,
    raw: &ConversationRecord,
    clean: &SanitizedRecord,
    findings: &mut Vec<LeakFinding>,
) {
    if !is_scrubbed_email(&clean.user_email) {
        findings.push(LeakFinding {
            index,
            field: "user_email",
            reason: format!("{:?} is not a documented placeholder form", clean.user_email),
        });
        return;
    }

    if let Some(raw_email) = raw.user_email.as_deref().filter(|e| !e.is_empty()) {
        if clean.user_email == raw_email {
            findings.push(LeakFinding {
                index,
                field: "user_email",
                reason: "sanitized value equals the raw email".to_string(),
            });
        }
    }
}

fn check_transaction_id(
    index: usize,
    raw: &ConversationRecord,
    clean: &SanitizedRecord,
    findings: &mut Vec<LeakFinding>,
) {
    let digest = clean.transaction_id.strip_prefix(TXN_PREFIX);
    if !digest.is_some_and(is_cohort_hex) {
        findings.push(LeakFinding {
            index,
            field: "transaction_id",
            reason: format!("{:?} is not a hashed transaction id", clean.transaction_id),
        });
        return;
    }

    if let Some(raw_id) = raw.transaction_id.as_deref().filter(|t| !t.is_empty()) {
        if clean.transaction_id == raw_id {
            findings.push(LeakFinding {
                index,
                field: "transaction_id",
                reason: "sanitized value equals the raw transaction id".to_string(),
            });
        }
    }
}

fn check_fixed(
    index: usize,
    field: &'static str,
    value: &str,
    expected: &str,
    findings: &mut Vec<LeakFinding>,
) {
    if value != expected {
        findings.push(LeakFinding {
            index,
            field,
            reason: format!("{value:?} is not the fixed literal {expected:?}"),
        });
    }
}

/// A cohort digest: 1 to 8 characters of lowercase hex.
fn is_cohort_hex(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= 8
        && s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// The documented scrubbed-email forms: the fixed placeholder, or
/// `user_<digest>@example.com`.
fn is_scrubbed_email(value: &str) -> bool {
    if value == EMAIL_PLACEHOLDER {
        return true;
    }

    value
        .strip_prefix("user_")
        .and_then(|rest| rest.strip_suffix("@example.com"))
        .is_some_and(is_cohort_hex)
}
