//! Uniform result envelope returned by every operation

use serde::{Deserialize, Serialize};
use veritas_core::{ErrorCode, TransactionId, VeritasError};

/// Outcome of one operation
///
/// A failed operation wrote nothing; `error` carries the stable code and
/// `message` the rendered error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    /// Enclosing transaction
    pub tx_id: TransactionId,
    pub success: bool,
    pub message: String,
    /// Result record, when the operation produces one
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
}

impl<T> Response<T> {
    pub fn ok(tx_id: TransactionId, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            tx_id,
            success: true,
            message: message.into(),
            data,
            error: None,
        }
    }

    pub fn failure(tx_id: TransactionId, error: &VeritasError) -> Self {
        Self {
            tx_id,
            success: false,
            message: error.to_string(),
            data: None,
            error: Some(error.code()),
        }
    }
}
