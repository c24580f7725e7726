//! Record identifiers and payload construction for stored embeddings.

use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

/// Derive the store record identifier for a document.
///
/// UUIDv5 over the document identifier, so every process computes the same
/// record id and the idempotent-skip rule holds without coordination.
pub fn record_id_for(document_id: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, document_id.as_bytes()).to_string()
}

/// Build the payload object stored alongside each embedding record.
pub(crate) fn build_record_payload(document_id: &str, text: &str) -> Value {
    let mut payload = Map::new();
    payload.insert(
        "document_id".into(),
        Value::String(document_id.to_string()),
    );
    payload.insert("text".into(), Value::String(text.to_string()));
    payload.insert(
        "stored_at".into(),
        Value::String(current_timestamp_rfc3339()),
    );
    Value::Object(payload)
}

/// Current timestamp formatted for payload storage.
pub(crate) fn current_timestamp_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_is_deterministic() {
        let a = record_id_for("contract-2024.pdf");
        let b = record_id_for("contract-2024.pdf");
        assert_eq!(a, b);
        assert_ne!(a, record_id_for("contract-2025.pdf"));
    }

    #[test]
    fn record_id_is_a_uuid() {
        let id = record_id_for("doc");
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn payload_carries_document_fields() {
        let payload = build_record_payload("doc-1", "full text");
        assert_eq!(payload["document_id"], "doc-1");
        assert_eq!(payload["text"], "full text");
        assert!(payload["stored_at"].as_str().is_some());
    }

    #[test]
    fn timestamp_is_rfc3339_like() {
        let ts = current_timestamp_rfc3339();
        assert!(ts.contains('T') && ts.ends_with('Z'));
    }
}
