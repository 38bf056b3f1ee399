//! Identifier types shared across the contracts
//!
//! Ledger identities, transaction IDs and domain references are all opaque
//! strings handed to us by the platform. The newtypes keep them from being
//! mixed up at call sites; none of them imply that the referenced entity
//! exists.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume into the raw identifier
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id! {
    /// Stable identity of an invoker, user or verifier
    ///
    /// Users and verifiers share this value domain; their records live in
    /// disjoint key namespaces.
    IdentityId
}

string_id! {
    /// Unique identifier of the enclosing ledger transaction
    TransactionId
}

string_id! {
    /// Name of a ledger domain (channel) reachable through cross-domain calls
    DomainRef
}
