//! Digital asset operations
//!
//! Assets are keyed by the transaction that registered them. Verifying an
//! asset consults the configured verifier registry, which may live in
//! another domain; see [`crate::lookup`] for what that implies.

use crate::context::ContractContext;
use crate::gate::require_verifier;
use std::collections::BTreeMap;
use tracing::info;
use veritas_core::{parse_instant, IdentityId, VeritasResult};
use veritas_records::{queries, DigitalAsset, RecordKind, Verifiable, VerificationStatus};

/// Register, transfer, link and verify digital assets
pub struct AssetContract<'a> {
    ctx: &'a ContractContext,
}

impl<'a> AssetContract<'a> {
    pub fn new(ctx: &'a ContractContext) -> Self {
        Self { ctx }
    }

    /// Load an asset; `NotFound` when absent
    pub async fn get(&self, asset_id: &str) -> VeritasResult<DigitalAsset> {
        self.ctx.store().fetch(asset_id).await
    }

    /// Register a new asset owned by the invoker
    pub async fn register(
        &self,
        asset_type: &str,
        metadata: BTreeMap<String, String>,
        description: &str,
    ) -> VeritasResult<DigitalAsset> {
        let invoker = self.ctx.invoker()?;
        let tx_id = self.ctx.tx_id();
        let store = self.ctx.store();
        store.ensure_absent(RecordKind::Asset, tx_id.as_str()).await?;

        let asset =
            DigitalAsset::register(&tx_id, invoker.clone(), asset_type, metadata, description);
        store.put(&asset).await?;
        info!(asset = %asset.id, owner = %invoker, asset_type, "asset registered");
        Ok(asset)
    }

    /// Hand the asset to `new_owner`; current owner only
    pub async fn transfer(
        &self,
        asset_id: &str,
        new_owner: IdentityId,
    ) -> VeritasResult<DigitalAsset> {
        let invoker = self.ctx.invoker()?;
        let mut asset = self.get(asset_id).await?;
        let previous = asset.transfer(&invoker, new_owner)?;

        self.ctx.store().put(&asset).await?;
        info!(asset = asset_id, from = %previous, to = %asset.owner, "asset transferred");
        Ok(asset)
    }

    /// Link a document ID to the asset; current owner only
    pub async fn link_document(
        &self,
        asset_id: &str,
        document_id: &str,
    ) -> VeritasResult<DigitalAsset> {
        let invoker = self.ctx.invoker()?;
        let mut asset = self.get(asset_id).await?;
        asset.link_document(&invoker, document_id)?;

        self.ctx.store().put(&asset).await?;
        info!(asset = asset_id, document = document_id, "document linked");
        Ok(asset)
    }

    /// Add or refresh the invoker's verification of the asset
    pub async fn verify(&self, asset_id: &str, expiry: &str) -> VeritasResult<DigitalAsset> {
        let invoker = self.ctx.invoker()?;
        let expiry = parse_instant(expiry)?;
        let snapshot = require_verifier(self.ctx, &invoker).await?;

        let mut asset = self.get(asset_id).await?;
        let outcome = asset.upsert_verification(&snapshot, expiry, self.ctx.snapshot_policy());
        self.ctx.store().put(&asset).await?;
        info!(
            asset = asset_id,
            verifier = %invoker,
            refreshed = outcome.was_update(),
            "asset verified"
        );
        Ok(asset)
    }

    /// Withdraw the invoker's verification of the asset
    pub async fn remove_verification(&self, asset_id: &str) -> VeritasResult<DigitalAsset> {
        let invoker = self.ctx.invoker()?;
        require_verifier(self.ctx, &invoker).await?;

        let mut asset = self.get(asset_id).await?;
        asset.remove_verification(&invoker)?;
        self.ctx.store().put(&asset).await?;
        info!(asset = asset_id, verifier = %invoker, "asset verification removed");
        Ok(asset)
    }

    /// Verifications with their current state
    pub async fn get_verifiers(&self, asset_id: &str) -> VeritasResult<Vec<VerificationStatus>> {
        Ok(self.get(asset_id).await?.verification_status(self.ctx.now()))
    }

    /// Assets currently owned by `owner`
    pub async fn find_by_owner(&self, owner: &IdentityId) -> VeritasResult<Vec<DigitalAsset>> {
        self.ctx.store().find(queries::by_owner(owner)).await
    }
}
