//! Filesystem ledger handler
//!
//! Stores each key as one file under a base directory:
//! - file name is the BLAKE3 hash of the key, so every key maps to a safe
//!   fixed-length path
//! - the file starts with a length-prefixed copy of the key, which queries
//!   read back and lookups compare against the requested key
//! - writes go to a temporary file that is renamed into place
//! - queries scan the directory and return matches in key order
//!
//! There is no history and no commit protocol; one process at a time is
//! assumed.

use super::{random_transaction_id, TransactionSlot};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use veritas_core::{LedgerEffects, LedgerEntry, LedgerError, Selector, TransactionId};

const DATA_EXTENSION: &str = "dat";
const TEMP_EXTENSION: &str = "tmp";
const MAX_KEY_LEN: usize = 255;
const KEY_LEN_PREFIX: usize = 4;

/// Directory-backed ledger handler
#[derive(Debug)]
pub struct FilesystemLedgerHandler {
    base_path: PathBuf,
    tx: TransactionSlot,
}

impl FilesystemLedgerHandler {
    /// Open (creating if needed) a ledger rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path).map_err(|e| {
            LedgerError::WriteFailed(format!(
                "failed to create ledger directory {}: {e}",
                base_path.display()
            ))
        })?;
        info!("Opened filesystem ledger at {:?}", base_path);
        Ok(Self {
            base_path,
            tx: TransactionSlot::random(),
        })
    }

    /// Ledger directory
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Start the next operation under `id`
    pub fn begin_transaction(&self, id: impl Into<TransactionId>) {
        self.tx.set(id.into());
    }

    /// Start the next operation under a fresh random ID and return it
    pub fn begin_random_transaction(&self) -> TransactionId {
        let id = random_transaction_id();
        self.tx.set(id.clone());
        id
    }

    fn validate_key(key: &str) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::InvalidKey {
                reason: "key cannot be empty".to_string(),
            });
        }
        if key.len() > MAX_KEY_LEN {
            return Err(LedgerError::InvalidKey {
                reason: format!("key too long (max {MAX_KEY_LEN} bytes)"),
            });
        }
        Ok(())
    }

    fn key_to_path(&self, key: &str) -> PathBuf {
        let hash = blake3::hash(key.as_bytes());
        self.base_path.join(format!("{}.{DATA_EXTENSION}", hash.to_hex()))
    }

    fn is_data_file(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(DATA_EXTENSION)
    }

    fn frame(key: &str, value: &[u8]) -> Vec<u8> {
        let mut framed = Vec::with_capacity(KEY_LEN_PREFIX + key.len() + value.len());
        // Keys are validated to at most MAX_KEY_LEN bytes
        framed.extend_from_slice(&(key.len() as u32).to_be_bytes());
        framed.extend_from_slice(key.as_bytes());
        framed.extend_from_slice(value);
        framed
    }

    fn unframe(mut bytes: Vec<u8>) -> Result<(String, Vec<u8>), LedgerError> {
        let corrupt = || LedgerError::ReadFailed("corrupt ledger file header".to_string());
        let prefix: [u8; KEY_LEN_PREFIX] = bytes
            .get(..KEY_LEN_PREFIX)
            .and_then(|p| p.try_into().ok())
            .ok_or_else(corrupt)?;
        let key_end = KEY_LEN_PREFIX + u32::from_be_bytes(prefix) as usize;
        if key_end > bytes.len() {
            return Err(corrupt());
        }
        let value = bytes.split_off(key_end);
        let key = String::from_utf8(bytes.split_off(KEY_LEN_PREFIX)).map_err(|_| corrupt())?;
        Ok((key, value))
    }

    async fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), LedgerError> {
        let temp_path = path.with_extension(TEMP_EXTENSION);
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| LedgerError::WriteFailed(format!("failed to create temp file: {e}")))?;
        file.write_all(data)
            .await
            .map_err(|e| LedgerError::WriteFailed(format!("failed to write temp file: {e}")))?;
        file.sync_all()
            .await
            .map_err(|e| LedgerError::WriteFailed(format!("failed to sync temp file: {e}")))?;
        drop(file);
        fs::rename(&temp_path, path)
            .await
            .map_err(|e| LedgerError::WriteFailed(format!("failed to rename temp file: {e}")))
    }
}

#[async_trait]
impl LedgerEffects for FilesystemLedgerHandler {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Self::validate_key(key)?;
        match fs::read(self.key_to_path(key)).await {
            Ok(bytes) => {
                let (stored_key, value) = Self::unframe(bytes)?;
                if stored_key != key {
                    let reason = format!("file for {key} holds {stored_key}");
                    return Err(LedgerError::ReadFailed(reason));
                }
                Ok(Some(value))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LedgerError::ReadFailed(format!("failed to read {key}: {e}"))),
        }
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        Self::validate_key(key)?;
        self.write_atomic(&self.key_to_path(key), &Self::frame(key, &value)).await?;
        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    async fn delete_state(&self, key: &str) -> Result<(), LedgerError> {
        Self::validate_key(key)?;
        match fs::remove_file(self.key_to_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LedgerError::DeleteFailed(format!("failed to delete {key}: {e}"))),
        }
    }

    async fn query_state(&self, selector: &Selector) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut read_dir = fs::read_dir(&self.base_path)
            .await
            .map_err(|e| LedgerError::QueryFailed(format!("failed to read directory: {e}")))?;

        let mut entries = Vec::new();
        while let Some(dir_entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| LedgerError::QueryFailed(format!("failed to read entry: {e}")))?
        {
            let path = dir_entry.path();
            if !Self::is_data_file(&path) {
                continue;
            }
            let (key, value) = match fs::read(&path).await {
                Ok(bytes) => Self::unframe(bytes)
                    .map_err(|e| LedgerError::QueryFailed(format!("{}: {e}", path.display())))?,
                // Deleted between listing and reading
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    warn!("Failed to read {:?} during query: {}", path, e);
                    return Err(LedgerError::QueryFailed(format!(
                        "failed to read {}: {e}",
                        path.display()
                    )));
                }
            };
            if selector.matches_bytes(&value) {
                entries.push(LedgerEntry { key, value });
            }
        }

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(entries)
    }

    fn transaction_id(&self) -> TransactionId {
        self.tx.get()
    }
}
