//! Structured selectors used by the read operations

use crate::codec::record_path;
use veritas_core::{IdentityId, Selector};

/// Records whose signature log holds a signature with `hash`
pub fn by_signature_hash(hash: &str) -> Selector {
    Selector::new().elem_match(record_path("signatures"), "hash", hash)
}

/// Records owned by `owner`
pub fn by_owner(owner: &IdentityId) -> Selector {
    Selector::new().eq(record_path("owner"), owner.as_str())
}
