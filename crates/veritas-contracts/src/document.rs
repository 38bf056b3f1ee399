//! Document and e-form operations
//!
//! One contract serves both kinds; [`DocumentKind`] only selects the key
//! namespace and the names used in messages.

use crate::context::ContractContext;
use crate::gate::require_verifier;
use tracing::info;
use veritas_core::{parse_instant, IdentityId, VeritasError, VeritasResult};
use veritas_records::{
    queries, Document, DocumentKind, DocumentShare, RecordKind, Signable, Signature, Verifiable,
    VerificationStatus,
};

/// Create, sign, share and verify documents or e-forms
pub struct DocumentContract<'a> {
    ctx: &'a ContractContext,
    kind: DocumentKind,
}

impl<'a> DocumentContract<'a> {
    pub fn new(ctx: &'a ContractContext, kind: DocumentKind) -> Self {
        Self { ctx, kind }
    }

    fn record_kind(&self) -> RecordKind {
        self.kind.record_kind()
    }

    /// Load the record this contract serves; `NotFound` when absent
    pub async fn get(&self, id: &str) -> VeritasResult<Document> {
        self.ctx.store().require(self.record_kind(), id).await
    }

    /// Create a record owned by the invoker
    pub async fn create(&self, id: &str, content_hashes: Vec<String>) -> VeritasResult<Document> {
        let invoker = self.ctx.invoker()?;
        if id.trim().is_empty() {
            return Err(VeritasError::invalid_argument(format!("{} id is empty", self.kind)));
        }
        let store = self.ctx.store();
        store.ensure_absent(self.record_kind(), id).await?;

        let document = Document::new(id, content_hashes, invoker.clone());
        store.save(self.record_kind(), &document).await?;
        info!(kind = %self.kind, id, owner = %invoker, "record created");
        Ok(document)
    }

    /// Append a signature by the invoker
    ///
    /// The invoker must be a registered user. Re-signing appends again.
    pub async fn sign(
        &self,
        id: &str,
        hash: &str,
        timestamp: &str,
        otp: &str,
    ) -> VeritasResult<Document> {
        let invoker = self.ctx.invoker()?;
        let timestamp = parse_instant(timestamp)?;
        let store = self.ctx.store();

        let mut document = self.get(id).await?;
        if !store.exists(RecordKind::User, invoker.as_str()).await? {
            return Err(VeritasError::not_found(RecordKind::User.label(), invoker.as_str()));
        }

        document.append_signature(Signature {
            hash: hash.to_string(),
            otp: otp.to_string(),
            signer: invoker.clone(),
            timestamp,
        });
        store.save(self.record_kind(), &document).await?;
        info!(
            kind = %self.kind,
            id,
            signer = %invoker,
            signatures = document.signatures.len(),
            "record signed"
        );
        Ok(document)
    }

    /// Record that the invoker shared the record with `recipients`
    pub async fn share(
        &self,
        share_id: &str,
        recipients: Vec<IdentityId>,
        document_id: &str,
    ) -> VeritasResult<DocumentShare> {
        let invoker = self.ctx.invoker()?;
        if recipients.is_empty() {
            return Err(VeritasError::invalid_argument("share needs at least one recipient"));
        }
        let store = self.ctx.store();
        if !store.exists(self.record_kind(), document_id).await? {
            return Err(VeritasError::not_found(self.kind.record_kind().label(), document_id));
        }
        store.ensure_absent(RecordKind::Share, share_id).await?;

        let share = DocumentShare {
            id: share_id.to_string(),
            sender: invoker.clone(),
            recipients,
            document_id: document_id.to_string(),
            document_kind: self.kind,
        };
        store.put(&share).await?;
        info!(
            kind = %self.kind,
            document = document_id,
            share = share_id,
            sender = %invoker,
            recipients = share.recipients.len(),
            "record shared"
        );
        Ok(share)
    }

    /// Add or refresh the invoker's verification
    pub async fn verify(&self, id: &str, expiry: &str) -> VeritasResult<Document> {
        let invoker = self.ctx.invoker()?;
        let expiry = parse_instant(expiry)?;
        let snapshot = require_verifier(self.ctx, &invoker).await?;

        let mut document = self.get(id).await?;
        let outcome = document.upsert_verification(&snapshot, expiry, self.ctx.snapshot_policy());
        self.ctx.store().save(self.record_kind(), &document).await?;
        info!(
            kind = %self.kind,
            id,
            verifier = %invoker,
            refreshed = outcome.was_update(),
            "record verified"
        );
        Ok(document)
    }

    /// Withdraw the invoker's verification
    pub async fn remove_verification(&self, id: &str) -> VeritasResult<Document> {
        let invoker = self.ctx.invoker()?;
        require_verifier(self.ctx, &invoker).await?;

        let mut document = self.get(id).await?;
        document.remove_verification(&invoker)?;
        self.ctx.store().save(self.record_kind(), &document).await?;
        info!(kind = %self.kind, id, verifier = %invoker, "verification removed");
        Ok(document)
    }

    /// Verifications with their current state
    pub async fn get_verifiers(&self, id: &str) -> VeritasResult<Vec<VerificationStatus>> {
        Ok(self.get(id).await?.verification_status(self.ctx.now()))
    }

    /// Records carrying a signature with `hash`
    pub async fn find_by_signature(&self, hash: &str) -> VeritasResult<Vec<Document>> {
        self.ctx
            .store()
            .query(self.record_kind(), queries::by_signature_hash(hash))
            .await
    }
}
