//! Verification ledger
//!
//! Maintains "at most one verification per verifier" on every
//! verification-bearing list: documents, e-forms, digital assets and each
//! field of a user profile. The algorithm is written once against plain
//! lists and exposed to records through [`Verifiable`].
//!
//! # Ordering
//!
//! Upsert preserves the position of an existing entry. Removal swaps the
//! last entry into the removed slot, so **list order is not stable across
//! removals**; callers must not depend on it.

use crate::verifier::Verifier;
use serde::{Deserialize, Serialize};
use veritas_core::{IdentityId, Timestamp, VeritasError, VeritasResult};

/// Endorsement of a record by a verifier, valid until `expiry`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Verification {
    /// Copy of the verifier's public fields at verification time
    pub verifier: Verifier,
    /// Instant after which the endorsement lapses
    pub expiry: Timestamp,
}

impl Verification {
    /// Identity of the endorsing verifier
    pub fn verifier_id(&self) -> &IdentityId {
        &self.verifier.id
    }

    /// Whether the endorsement still holds at `now`
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.expiry > now
    }
}

/// What a repeat verification does to the stored verifier snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotPolicy {
    /// Refresh only the expiry; keep the snapshot from the first verification
    #[default]
    KeepOriginal,
    /// Replace the snapshot with the verifier's current record too
    Refresh,
}

impl SnapshotPolicy {
    /// Map the `refresh_snapshot_on_reverify` configuration flag
    pub fn from_refresh_flag(refresh: bool) -> Self {
        if refresh {
            SnapshotPolicy::Refresh
        } else {
            SnapshotPolicy::KeepOriginal
        }
    }
}

/// Result of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No entry for the verifier existed; one was appended
    Appended,
    /// The existing entry was updated in place
    Refreshed,
}

impl UpsertOutcome {
    /// `true` when an existing entry was updated
    pub fn was_update(self) -> bool {
        matches!(self, UpsertOutcome::Refreshed)
    }
}

/// Verification entry paired with its state at a given instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    /// Stored entry
    #[serde(flatten)]
    pub verification: Verification,
    /// Whether it was unexpired at evaluation time
    pub active: bool,
}

/// Position of the verifier's entry, if any
pub fn find_verification(list: &[Verification], verifier_id: &IdentityId) -> Option<usize> {
    list.iter().position(|v| v.verifier_id() == verifier_id)
}

/// Add or refresh `snapshot`'s endorsement in `list`
///
/// The expiry must already be a parsed instant: callers parse and reject
/// malformed dates before touching any record.
pub fn upsert_verification(
    list: &mut Vec<Verification>,
    snapshot: &Verifier,
    expiry: Timestamp,
    policy: SnapshotPolicy,
) -> UpsertOutcome {
    match find_verification(list, &snapshot.id) {
        Some(index) => {
            let entry = &mut list[index];
            entry.expiry = expiry;
            if policy == SnapshotPolicy::Refresh {
                entry.verifier = snapshot.clone();
            }
            UpsertOutcome::Refreshed
        }
        None => {
            list.push(Verification {
                verifier: snapshot.clone(),
                expiry,
            });
            UpsertOutcome::Appended
        }
    }
}

/// Remove the verifier's endorsement from `list`
///
/// Fails with `NotFound` when the verifier has no entry. O(1); reorders the
/// remaining entries.
pub fn remove_verification(
    list: &mut Vec<Verification>,
    verifier_id: &IdentityId,
) -> VeritasResult<Verification> {
    let index = find_verification(list, verifier_id)
        .ok_or_else(|| VeritasError::not_found("verification", verifier_id.as_str()))?;
    Ok(list.swap_remove(index))
}

/// Records carrying a verification list
pub trait Verifiable {
    /// Current verification list
    fn verifications(&self) -> &[Verification];

    /// Mutable access for the ledger algorithm
    fn verifications_mut(&mut self) -> &mut Vec<Verification>;

    /// Upsert `snapshot`'s endorsement
    fn upsert_verification(
        &mut self,
        snapshot: &Verifier,
        expiry: Timestamp,
        policy: SnapshotPolicy,
    ) -> UpsertOutcome {
        upsert_verification(self.verifications_mut(), snapshot, expiry, policy)
    }

    /// Remove the verifier's endorsement
    fn remove_verification(&mut self, verifier_id: &IdentityId) -> VeritasResult<Verification> {
        remove_verification(self.verifications_mut(), verifier_id)
    }

    /// Entries with their state at `now`
    fn verification_status(&self, now: Timestamp) -> Vec<VerificationStatus> {
        self.verifications()
            .iter()
            .map(|v| VerificationStatus {
                verification: v.clone(),
                active: v.is_active_at(now),
            })
            .collect()
    }
}
