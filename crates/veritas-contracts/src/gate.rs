//! Verifier privilege gate
//!
//! The registry check is canonical: the invoker is a verifier when a
//! verifier record exists for their ID, either on the local ledger or in the
//! configured registry domain. The credential's role attribute is a second,
//! independent signal that should always agree. Disagreement is logged; with
//! `enforce_role_attribute` set it also rejects.

use crate::context::ContractContext;
use crate::lookup::fetch_verifier;
use tracing::warn;
use veritas_core::{is_verifier_role, IdentityId, RegistryLocation, VeritasError, VeritasResult};
use veritas_records::Verifier;

/// Verifier record for `invoker` from the configured registry, if any
pub async fn lookup_verifier(
    ctx: &ContractContext,
    invoker: &IdentityId,
) -> VeritasResult<Option<Verifier>> {
    match &ctx.config().verifier_registry {
        RegistryLocation::Local => ctx.store().get::<Verifier>(invoker.as_str()).await,
        RegistryLocation::Domain { domain } => {
            fetch_verifier(ctx.require_cross_domain()?, domain, invoker).await
        }
    }
}

/// Require `invoker` to be a registered verifier and return its snapshot
///
/// Runs before any mutation.
pub async fn require_verifier(
    ctx: &ContractContext,
    invoker: &IdentityId,
) -> VeritasResult<Verifier> {
    let registered = lookup_verifier(ctx, invoker).await?;
    let role_attribute = &ctx.config().role_attribute;
    let has_role = is_verifier_role(ctx.credential(), role_attribute);

    if registered.is_some() != has_role {
        warn!(
            invoker = %invoker,
            registered = registered.is_some(),
            attribute = %role_attribute,
            has_role,
            "verifier registry and credential attribute disagree"
        );
        if ctx.config().enforce_role_attribute {
            return Err(VeritasError::not_a_verifier(invoker.as_str()));
        }
    }

    registered.ok_or_else(|| VeritasError::not_a_verifier(invoker.as_str()))
}
