//! User records and per-field profile verification

use crate::codec::{FixedKind, Record};
use crate::kind::RecordKind;
use crate::verification::{
    remove_verification, upsert_verification, SnapshotPolicy, UpsertOutcome, Verification,
};
use crate::verifier::Verifier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use veritas_core::{IdentityId, Timestamp, VeritasError, VeritasResult};

/// One record per identity
///
/// Profile fields are created on first verification and never implicitly
/// deleted; clearing a field empties its list but keeps the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct User {
    /// User identity
    pub id: IdentityId,
    /// Verification list per profile field
    pub profile_verifications: BTreeMap<String, Vec<Verification>>,
}

impl User {
    /// Fresh user with no verified fields
    pub fn new(id: impl Into<IdentityId>) -> Self {
        Self {
            id: id.into(),
            profile_verifications: BTreeMap::new(),
        }
    }

    /// Verifications on `field`; empty when the field was never verified
    pub fn field_verifications(&self, field: &str) -> &[Verification] {
        self.profile_verifications
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Upsert `snapshot`'s endorsement on one field
    pub fn upsert_field_verification(
        &mut self,
        field: &str,
        snapshot: &Verifier,
        expiry: Timestamp,
        policy: SnapshotPolicy,
    ) -> UpsertOutcome {
        let list = self
            .profile_verifications
            .entry(field.to_string())
            .or_default();
        upsert_verification(list, snapshot, expiry, policy)
    }

    /// Remove the verifier's endorsement from one field
    pub fn remove_field_verification(
        &mut self,
        field: &str,
        verifier_id: &IdentityId,
    ) -> VeritasResult<Verification> {
        let list = self
            .profile_verifications
            .get_mut(field)
            .ok_or_else(|| VeritasError::not_found("profile field", field))?;
        remove_verification(list, verifier_id)
    }

    /// Empty a field's list, keeping the field
    pub fn clear_field(&mut self, field: &str) -> usize {
        let list = self
            .profile_verifications
            .entry(field.to_string())
            .or_default();
        let cleared = list.len();
        list.clear();
        cleared
    }
}

impl Record for User {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl FixedKind for User {
    const KIND: RecordKind = RecordKind::User;
}
