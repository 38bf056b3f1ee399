//! User and verifier registry operations

use crate::context::ContractContext;
use crate::gate::require_verifier;
use tracing::info;
use veritas_core::{parse_instants, IdentityId, Selector, VeritasError, VeritasResult};
use veritas_records::{RecordKind, User, VerificationStatus, Verifier};

/// Users, their per-field profile verifications, and the verifier registry
pub struct UserContract<'a> {
    ctx: &'a ContractContext,
}

impl<'a> UserContract<'a> {
    pub fn new(ctx: &'a ContractContext) -> Self {
        Self { ctx }
    }

    /// Register the invoker as a user
    pub async fn create_user(&self) -> VeritasResult<User> {
        let invoker = self.ctx.invoker()?;
        let store = self.ctx.store();
        store.ensure_absent(RecordKind::User, invoker.as_str()).await?;

        let user = User::new(invoker.clone());
        store.put(&user).await?;
        info!(user = %invoker, "user created");
        Ok(user)
    }

    /// Delete a user record; only the user themself may do this
    pub async fn delete_user(&self, user_id: &IdentityId) -> VeritasResult<()> {
        let invoker = self.ctx.invoker()?;
        let store = self.ctx.store();
        if !store.exists(RecordKind::User, user_id.as_str()).await? {
            return Err(VeritasError::not_found(RecordKind::User.label(), user_id.as_str()));
        }
        if &invoker != user_id {
            return Err(VeritasError::not_authorized(format!(
                "{invoker} may not delete user {user_id}"
            )));
        }

        store.delete(RecordKind::User, user_id.as_str()).await?;
        info!(user = %user_id, "user deleted");
        Ok(())
    }

    /// Register the invoker as a verifier
    pub async fn create_verifier(&self, name: &str, grade: &str) -> VeritasResult<Verifier> {
        let invoker = self.ctx.invoker()?;
        let store = self.ctx.store();
        store
            .ensure_absent(RecordKind::Verifier, invoker.as_str())
            .await?;

        let verifier = Verifier::new(invoker.clone(), name, grade);
        store.put(&verifier).await?;
        info!(verifier = %invoker, grade, "verifier registered");
        Ok(verifier)
    }

    /// Read one verifier record from the local registry
    pub async fn get_verifier(&self, verifier_id: &IdentityId) -> VeritasResult<Verifier> {
        self.ctx.store().fetch(verifier_id.as_str()).await
    }

    /// Every verifier in the local registry, in key order
    pub async fn get_all_verifiers(&self) -> VeritasResult<Vec<Verifier>> {
        self.ctx.store().find(Selector::new()).await
    }

    /// Record the invoker's endorsement of several profile fields
    ///
    /// `fields[i]` expires at `expiries[i]`. Every date is parsed before the
    /// user is touched, so one bad date rejects the whole batch.
    pub async fn add_profile_verification(
        &self,
        user_id: &IdentityId,
        fields: &[String],
        expiries: &[String],
    ) -> VeritasResult<User> {
        let invoker = self.ctx.invoker()?;
        if fields.is_empty() {
            return Err(VeritasError::invalid_argument("no profile fields given"));
        }
        if fields.len() != expiries.len() {
            return Err(VeritasError::invalid_argument(format!(
                "{} profile fields but {} expiry dates",
                fields.len(),
                expiries.len()
            )));
        }
        let expiries = parse_instants(expiries)?;

        let snapshot = require_verifier(self.ctx, &invoker).await?;
        let store = self.ctx.store();
        let mut user: User = store.fetch(user_id.as_str()).await?;

        let policy = self.ctx.snapshot_policy();
        for (field, expiry) in fields.iter().zip(expiries) {
            user.upsert_field_verification(field, &snapshot, expiry, policy);
        }
        store.put(&user).await?;
        info!(user = %user_id, verifier = %invoker, fields = ?fields, "profile fields verified");
        Ok(user)
    }

    /// Withdraw the invoker's endorsement of one profile field
    pub async fn remove_profile_verification(
        &self,
        user_id: &IdentityId,
        field: &str,
    ) -> VeritasResult<User> {
        let invoker = self.ctx.invoker()?;
        require_verifier(self.ctx, &invoker).await?;
        let store = self.ctx.store();
        let mut user: User = store.fetch(user_id.as_str()).await?;

        user.remove_field_verification(field, &invoker)?;
        store.put(&user).await?;
        info!(user = %user_id, verifier = %invoker, field, "profile verification removed");
        Ok(user)
    }

    /// Empty one of the invoker's own profile fields, keeping the field
    pub async fn clear_profile_field(&self, field: &str) -> VeritasResult<User> {
        let invoker = self.ctx.invoker()?;
        let store = self.ctx.store();
        let mut user: User = store.fetch(invoker.as_str()).await?;

        let cleared = user.clear_field(field);
        store.put(&user).await?;
        info!(user = %invoker, field, cleared, "profile field cleared");
        Ok(user)
    }

    /// Verifications on one profile field with their current state
    pub async fn get_profile_verifications(
        &self,
        user_id: &IdentityId,
        field: &str,
    ) -> VeritasResult<Vec<VerificationStatus>> {
        let user: User = self.ctx.store().fetch(user_id.as_str()).await?;
        let now = self.ctx.now();
        Ok(user
            .field_verifications(field)
            .iter()
            .map(|v| VerificationStatus {
                verification: v.clone(),
                active: v.is_active_at(now),
            })
            .collect())
    }
}
