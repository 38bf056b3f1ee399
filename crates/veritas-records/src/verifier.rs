//! Verifier registry records

use crate::codec::{FixedKind, Record};
use crate::kind::RecordKind;
use serde::{Deserialize, Serialize};
use veritas_core::IdentityId;

/// An identity allowed to attach time-bounded endorsements to records
///
/// Immutable after self-registration. Verifications embed a copy of this
/// record taken at verification time, so later edits would not propagate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Verifier {
    /// Verifier identity
    pub id: IdentityId,
    /// Display name
    pub name: String,
    /// Grade of assurance the verifier provides
    pub grade: String,
}

impl Verifier {
    /// Build a verifier record
    pub fn new(
        id: impl Into<IdentityId>,
        name: impl Into<String>,
        grade: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade: grade.into(),
        }
    }
}

impl Record for Verifier {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl FixedKind for Verifier {
    const KIND: RecordKind = RecordKind::Verifier;
}
