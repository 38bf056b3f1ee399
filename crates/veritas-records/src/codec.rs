//! Entity codec
//!
//! Records are stored as JSON inside a small envelope:
//!
//! ```json
//! { "docType": "digitalAsset", "schemaVersion": 1, "record": { ... } }
//! ```
//!
//! `docType` lets structured queries select by kind; `schemaVersion` and the
//! strict record decoders turn bytes written by an incompatible schema into
//! [`VeritasError::SchemaMismatch`] instead of silently coercing them.
//! Maps are ordered and timestamps are RFC-3339 text, so encoding is stable:
//! `encode(decode(encode(x))) == encode(x)`.

use crate::kind::RecordKind;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use veritas_core::{VeritasError, VeritasResult};

/// Current on-ledger schema version
pub const SCHEMA_VERSION: u16 = 1;

/// Envelope field holding the record kind
pub const DOC_TYPE_FIELD: &str = "docType";

/// Envelope field holding the record body
pub const RECORD_FIELD: &str = "record";

/// A value that is persisted under its own unique ID
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Unique ID; the record's storage key is derived from it
    fn record_id(&self) -> &str;
}

/// A record whose kind is fixed by its type
pub trait FixedKind: Record {
    /// Kind of every value of this type
    const KIND: RecordKind;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeOut<'a, R> {
    doc_type: &'static str,
    schema_version: u16,
    record: &'a R,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct EnvelopeIn {
    doc_type: String,
    schema_version: u16,
    record: serde_json::Value,
}

/// Dotted selector path to a field of the record body
pub fn record_path(field: &str) -> String {
    format!("{RECORD_FIELD}.{field}")
}

/// Encode a record of `kind`
pub fn encode<R: Record>(kind: RecordKind, record: &R) -> VeritasResult<Vec<u8>> {
    serde_json::to_vec(&EnvelopeOut {
        doc_type: kind.doc_type(),
        schema_version: SCHEMA_VERSION,
        record,
    })
    .map_err(|e| {
        VeritasError::schema_mismatch(format!("cannot encode {kind} {}: {e}", record.record_id()))
    })
}

/// Decode bytes expected to hold a record of `kind`
pub fn decode<R: Record>(kind: RecordKind, bytes: &[u8]) -> VeritasResult<R> {
    let envelope: EnvelopeIn = serde_json::from_slice(bytes)
        .map_err(|e| VeritasError::schema_mismatch(format!("malformed {kind} envelope: {e}")))?;

    if envelope.doc_type != kind.doc_type() {
        return Err(VeritasError::schema_mismatch(format!(
            "expected docType {}, found {}",
            kind.doc_type(),
            envelope.doc_type
        )));
    }
    if envelope.schema_version != SCHEMA_VERSION {
        return Err(VeritasError::schema_mismatch(format!(
            "{kind} written with schema version {}, this build reads {SCHEMA_VERSION}",
            envelope.schema_version
        )));
    }

    serde_json::from_value(envelope.record)
        .map_err(|e| VeritasError::schema_mismatch(format!("malformed {kind} record: {e}")))
}

/// Encode a record whose kind is fixed by its type
pub fn encode_fixed<R: FixedKind>(record: &R) -> VeritasResult<Vec<u8>> {
    encode(R::KIND, record)
}

/// Decode a record whose kind is fixed by its type
pub fn decode_fixed<R: FixedKind>(bytes: &[u8]) -> VeritasResult<R> {
    decode(R::KIND, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verifier::Verifier;
    use assert_matches::assert_matches;

    fn verifier() -> Verifier {
        Verifier::new("v1", "Registry Office", "A")
    }

    #[test]
    fn envelope_shape() {
        let bytes = encode_fixed(&verifier()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["docType"], "verifier");
        assert_eq!(value["schemaVersion"], SCHEMA_VERSION);
        assert_eq!(value["record"]["name"], "Registry Office");
    }

    #[test]
    fn wrong_kind_is_schema_mismatch() {
        let bytes = encode_fixed(&verifier()).unwrap();
        assert_matches!(
            decode::<Verifier>(RecordKind::User, &bytes),
            Err(VeritasError::SchemaMismatch { .. })
        );
    }

    #[test]
    fn other_schema_version_is_schema_mismatch() {
        let bytes = concat!(
            r#"{"docType":"verifier","schemaVersion":2,"#,
            r#""record":{"id":"v1","name":"n","grade":"g"}}"#
        )
        .as_bytes();
        assert_matches!(
            decode_fixed::<Verifier>(bytes),
            Err(VeritasError::SchemaMismatch { reason }) if reason.contains("schema version 2")
        );
    }

    #[test]
    fn unknown_and_missing_fields_are_schema_mismatch() {
        let extra = concat!(
            r#"{"docType":"verifier","schemaVersion":1,"#,
            r#""record":{"id":"v1","name":"n","grade":"g","level":3}}"#
        )
        .as_bytes();
        let missing =
            br#"{"docType":"verifier","schemaVersion":1,"record":{"id":"v1","name":"n"}}"#;
        assert!(decode_fixed::<Verifier>(extra).is_err());
        assert!(decode_fixed::<Verifier>(missing).is_err());
        assert!(decode_fixed::<Verifier>(b"not json").is_err());
    }
}
