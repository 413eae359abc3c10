//! Raw batch loading.
//!
//! Upstream delivers batches as a JSON file, either a bare array of
//! records or wrapped in an object under a `conversations` key. Both
//! shapes load the same way; anything else is a delivery failure.

use crate::models::ConversationRecord;
use serde_json::Value;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Failure to turn an input file into a batch of records.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unexpected input shape: {0}")]
    Shape(String),
}

/// Load a raw batch from `path`.
///
/// Record-level problems (absent fields, odd values) are not errors; the
/// model defaults absorb them. Only file-level problems fail here.
pub fn load_batch(path: &Path) -> Result<Vec<ConversationRecord>, BatchError> {
    let raw = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&raw)?;
    records_from_document(document)
}

fn records_from_document(document: Value) -> Result<Vec<ConversationRecord>, BatchError> {
    let array = match document {
        array @ Value::Array(_) => array,
        Value::Object(mut map) => match map.remove("conversations") {
            Some(inner @ Value::Array(_)) => inner,
            Some(other) => {
                return Err(BatchError::Shape(format!(
                    "\"conversations\" must be an array, found {}",
                    json_kind(&other)
                )));
            }
            None => {
                return Err(BatchError::Shape(
                    "object has no \"conversations\" key".to_string(),
                ));
            }
        },
        other => {
            return Err(BatchError::Shape(format!(
                "expected an array of records or an object with a \"conversations\" array, found {}",
                json_kind(&other)
            )));
        }
    };

    Ok(serde_json::from_value(array)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Headline counts for a loaded batch, printed by dry runs and logged
/// before a real one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub with_email: usize,
    pub with_phone: usize,
    pub with_transaction_id: usize,
    pub resolved: usize,
}

/// Count the records that carry each PII field and the resolved ones.
///
/// A present-but-empty value does not count; it scrubs the same as an
/// absent one.
pub fn summarize(records: &[ConversationRecord]) -> BatchSummary {
    let non_empty = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());

    BatchSummary {
        total: records.len(),
        with_email: records.iter().filter(|r| non_empty(&r.user_email)).count(),
        with_phone: records.iter().filter(|r| non_empty(&r.phone)).count(),
        with_transaction_id: records
            .iter()
            .filter(|r| non_empty(&r.transaction_id))
            .count(),
        resolved: records.iter().filter(|r| r.is_resolved()).count(),
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} records ({} with email, {} with phone, {} with transaction id, {} resolved)",
            self.total, self.with_email, self.with_phone, self.with_transaction_id, self.resolved
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_input(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_bare_array() {
        let file = write_input(r#"[{"user_id": "user_12345"}, {}]"#);

        let records = load_batch(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].user_id.as_deref(), Some("user_12345"));
    }

    #[test]
    fn test_load_wrapped_object() {
        let file = write_input(
            r#"{"conversations": [{"user_email": "customer@example.com"}], "source": "sheet"}"#,
        );

        let records = load_batch(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].user_email.as_deref(),
            Some("customer@example.com")
        );
    }

    #[test]
    fn test_load_empty_array() {
        let file = write_input("[]");
        assert!(load_batch(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_batch(Path::new("/nonexistent/conversations-raw.json")).unwrap_err();
        assert!(matches!(err, BatchError::Io(_)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let file = write_input("{not json");
        let err = load_batch(file.path()).unwrap_err();
        assert!(matches!(err, BatchError::Parse(_)));
    }

    #[test]
    fn test_wrong_shapes_are_shape_errors() {
        let scalar = write_input("42");
        let err = load_batch(scalar.path()).unwrap_err();
        assert!(matches!(err, BatchError::Shape(_)));

        let missing_key = write_input(r#"{"records": []}"#);
        let err = load_batch(missing_key.path()).unwrap_err();
        assert!(err.to_string().contains("conversations"));

        let wrong_value = write_input(r#"{"conversations": "lots"}"#);
        let err = load_batch(wrong_value.path()).unwrap_err();
        assert!(err.to_string().contains("must be an array"));
    }

    #[test]
    fn test_summarize_counts() {
        let records = vec![
            ConversationRecord {
                user_email: Some("customer@example.com".to_string()),
                phone: Some("+1234567890".to_string()),
                transaction_id: Some("txn_789012".to_string()),
                resolution_status: Some("resolved".to_string()),
                ..Default::default()
            },
            ConversationRecord {
                user_email: Some(String::new()),
                resolution_status: Some("pending".to_string()),
                ..Default::default()
            },
            ConversationRecord::default(),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.with_email, 1);
        assert_eq!(summary.with_phone, 1);
        assert_eq!(summary.with_transaction_id, 1);
        assert_eq!(summary.resolved, 1);
    }

    #[test]
    fn test_summary_display() {
        let summary = summarize(&[]);
        assert_eq!(
            summary.to_string(),
            "0 records (0 with email, 0 with phone, 0 with transaction id, 0 resolved)"
        );
    }
}
