//! Cross-domain verifier lookup
//!
//! Reads a verifier record from another ledger domain through
//! [`CrossDomainEffects`]. The remote read is not part of the local
//! transaction: if the local write fails afterwards nothing is undone
//! remotely, and nothing needs to be, since the remote side is read-only.
//! A caller that retries simply repeats the lookup.

use tracing::debug;
use veritas_core::{
    CrossDomainEffects, CrossDomainError, DomainRef, IdentityId, VeritasError, VeritasResult,
};
use veritas_records::{decode_fixed, Record, Verifier};

/// Remote operation serving verifier records
pub const GET_VERIFIER_OPERATION: &str = "GetVerifier";

/// Fetch a verifier record from `domain`
///
/// `Ok(None)` means the remote domain answered and has no such verifier.
/// An unreachable domain or failed call is a [`VeritasError::CrossDomain`]
/// error, never a silent "not found".
pub async fn fetch_verifier(
    router: &dyn CrossDomainEffects,
    domain: &DomainRef,
    verifier_id: &IdentityId,
) -> VeritasResult<Option<Verifier>> {
    let payload = router
        .invoke_domain(
            domain,
            GET_VERIFIER_OPERATION,
            &[verifier_id.as_str().to_string()],
        )
        .await
        .map_err(|e| cross_domain_error(domain, e))?;

    let Some(bytes) = payload else {
        debug!(domain = %domain, verifier = %verifier_id, "remote verifier absent");
        return Ok(None);
    };

    let verifier: Verifier = decode_fixed(&bytes)?;
    if verifier.record_id() != verifier_id.as_str() {
        return Err(VeritasError::cross_domain(
            domain.as_str(),
            format!(
                "asked for verifier {verifier_id}, received {}",
                verifier.record_id()
            ),
        ));
    }
    Ok(Some(verifier))
}

fn cross_domain_error(domain: &DomainRef, err: CrossDomainError) -> VeritasError {
    VeritasError::cross_domain(domain.as_str(), err.to_string())
}
