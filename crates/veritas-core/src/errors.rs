//! Unified error system for veritas
//!
//! Every contract operation reports failures through [`VeritasError`]. The
//! variants map one-to-one onto the failure taxonomy exposed to callers, and
//! [`ErrorCode`] gives each a stable machine-readable name for envelopes and
//! logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error type for all veritas operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum VeritasError {
    /// Record absent from the ledger
    #[error("{kind} with id {id} not found")]
    NotFound {
        /// Record kind (or "verification" for a missing list entry)
        kind: String,
        /// Identifier that was looked up
        id: String,
    },

    /// Record already present where a fresh one was expected
    #[error("{kind} with id {id} already exists")]
    AlreadyExists {
        /// Record kind
        kind: String,
        /// Conflicting identifier
        id: String,
    },

    /// Document already linked to the asset
    #[error("document {document_id} already linked with asset {asset_id}")]
    AlreadyLinked {
        /// Asset carrying the link
        asset_id: String,
        /// Document that was linked twice
        document_id: String,
    },

    /// Invoker is not the current owner of the asset
    #[error("asset {asset_id} is not owned by {invoker}")]
    NotOwner {
        /// Asset being mutated
        asset_id: String,
        /// Identity that attempted the mutation
        invoker: String,
    },

    /// Invoker may not perform the operation for another reason
    #[error("not authorized: {reason}")]
    NotAuthorized {
        /// Why the request was rejected
        reason: String,
    },

    /// Invoker does not resolve to a registered verifier
    #[error("{identity} is not a registered verifier")]
    NotAVerifier {
        /// Identity that attempted to verify
        identity: String,
    },

    /// Timestamp input is not a valid RFC-3339 instant
    #[error("invalid date {input:?}, expected RFC-3339: {reason}")]
    InvalidDate {
        /// Raw input
        input: String,
        /// Parser message
        reason: String,
    },

    /// Stored bytes do not decode under the current schema
    #[error("schema mismatch: {reason}")]
    SchemaMismatch {
        /// Decoder message
        reason: String,
    },

    /// Ledger adapter failure, wrapped with operation context
    #[error("storage failure while {context}: {message}")]
    Storage {
        /// What the core was doing when the adapter failed
        context: String,
        /// Adapter message, verbatim
        message: String,
    },

    /// Operation name not recognised by the dispatcher
    #[error("unknown operation {name}")]
    UnknownOperation {
        /// Name the caller supplied
        name: String,
    },

    /// Credential material could not be parsed into an identity
    #[error("identity error: {reason}")]
    Identity {
        /// Parser message
        reason: String,
    },

    /// Malformed operation argument
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument
        reason: String,
    },

    /// Remote ledger domain could not be reached
    #[error("cross-domain call to {domain} failed: {reason}")]
    CrossDomain {
        /// Domain that was called
        domain: String,
        /// Failure reported by the router
        reason: String,
    },

    /// Configuration could not be loaded or is inconsistent
    #[error("configuration error: {reason}")]
    Config {
        /// What was wrong with the configuration
        reason: String,
    },
}

/// Stable identifier for each error variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    NotFound,
    AlreadyExists,
    AlreadyLinked,
    NotOwner,
    NotAuthorized,
    NotAVerifier,
    InvalidDate,
    SchemaMismatch,
    StorageFailure,
    UnknownOperation,
    IdentityError,
    InvalidArgument,
    CrossDomain,
    Config,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl VeritasError {
    /// Create a not found error
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create an already exists error
    pub fn already_exists(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create an already linked error
    pub fn already_linked(asset_id: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self::AlreadyLinked {
            asset_id: asset_id.into(),
            document_id: document_id.into(),
        }
    }

    /// Create a not owner error
    pub fn not_owner(asset_id: impl Into<String>, invoker: impl Into<String>) -> Self {
        Self::NotOwner {
            asset_id: asset_id.into(),
            invoker: invoker.into(),
        }
    }

    /// Create a not authorized error
    pub fn not_authorized(reason: impl Into<String>) -> Self {
        Self::NotAuthorized {
            reason: reason.into(),
        }
    }

    /// Create a not a verifier error
    pub fn not_a_verifier(identity: impl Into<String>) -> Self {
        Self::NotAVerifier {
            identity: identity.into(),
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema mismatch error
    pub fn schema_mismatch(reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            reason: reason.into(),
        }
    }

    /// Create a storage error with operation context
    pub fn storage(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Create an unknown operation error
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation { name: name.into() }
    }

    /// Create an identity error
    pub fn identity(reason: impl Into<String>) -> Self {
        Self::Identity {
            reason: reason.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a cross-domain error
    pub fn cross_domain(domain: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CrossDomain {
            domain: domain.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Stable code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::AlreadyExists { .. } => ErrorCode::AlreadyExists,
            Self::AlreadyLinked { .. } => ErrorCode::AlreadyLinked,
            Self::NotOwner { .. } => ErrorCode::NotOwner,
            Self::NotAuthorized { .. } => ErrorCode::NotAuthorized,
            Self::NotAVerifier { .. } => ErrorCode::NotAVerifier,
            Self::InvalidDate { .. } => ErrorCode::InvalidDate,
            Self::SchemaMismatch { .. } => ErrorCode::SchemaMismatch,
            Self::Storage { .. } => ErrorCode::StorageFailure,
            Self::UnknownOperation { .. } => ErrorCode::UnknownOperation,
            Self::Identity { .. } => ErrorCode::IdentityError,
            Self::InvalidArgument { .. } => ErrorCode::InvalidArgument,
            Self::CrossDomain { .. } => ErrorCode::CrossDomain,
            Self::Config { .. } => ErrorCode::Config,
        }
    }

    /// Business rejections are expected outcomes; everything else is a fault
    /// of the input, the platform or the stored data.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::AlreadyExists { .. }
                | Self::AlreadyLinked { .. }
                | Self::NotOwner { .. }
                | Self::NotAuthorized { .. }
                | Self::NotAVerifier { .. }
        )
    }
}

/// Standard Result type for veritas operations
pub type Result<T> = std::result::Result<T, VeritasError>;

impl From<serde_json::Error> for VeritasError {
    fn from(err: serde_json::Error) -> Self {
        Self::schema_mismatch(err.to_string())
    }
}
