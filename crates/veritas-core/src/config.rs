//! Contract configuration
//!
//! Loaded from TOML, then overridden by `VERITAS_*` environment variables,
//! then validated. Every key has a default so an empty file is a valid
//! configuration.
//!
//! ```toml
//! refresh_snapshot_on_reverify = false
//! enforce_role_attribute = false
//! role_attribute = "isVerifier"
//! log_filter = "info"
//!
//! [verifier_registry]
//! mode = "domain"
//! domain = "global"
//! ```

use crate::errors::{Result, VeritasError};
use crate::identifiers::DomainRef;
use crate::identity::DEFAULT_ROLE_ATTRIBUTE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "VERITAS_";

/// Where verifier records are looked up
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RegistryLocation {
    /// The ledger the operation is writing to
    #[default]
    Local,
    /// Another ledger domain, reached through the cross-domain router
    Domain {
        /// Domain holding the verifier registry
        domain: DomainRef,
    },
}

/// Runtime configuration for the contracts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VeritasConfig {
    /// Re-verification replaces the stored verifier snapshot as well as the
    /// expiry. Off by default: only the expiry is refreshed.
    pub refresh_snapshot_on_reverify: bool,
    /// Require the credential role attribute to agree with the registry
    /// check. Off by default: the registry decides and disagreement is logged.
    pub enforce_role_attribute: bool,
    /// Credential attribute carrying verifier privilege
    pub role_attribute: String,
    /// Verifier registry location
    pub verifier_registry: RegistryLocation,
    /// `tracing` filter directive used by binaries
    pub log_filter: String,
}

impl Default for VeritasConfig {
    fn default() -> Self {
        Self {
            refresh_snapshot_on_reverify: false,
            enforce_role_attribute: false,
            role_attribute: DEFAULT_ROLE_ATTRIBUTE.to_string(),
            verifier_registry: RegistryLocation::Local,
            log_filter: "info".to_string(),
        }
    }
}

impl VeritasConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| VeritasError::config(format!("invalid TOML: {e}")))
    }

    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VeritasError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults; then
    /// apply environment overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                debug!(path = %path.display(), "loading configuration file");
                Self::load_from_file(path)?
            }
            _ => Self::default(),
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Merge `VERITAS_*` variables from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Merge `VERITAS_*` entries from an arbitrary variable source
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(name) = key.strip_prefix(ENV_PREFIX) {
                let name = name.to_lowercase();
                self.set_from_string(&name, &value)?;
                debug!(key = %name, "applied environment override");
            }
        }
        Ok(())
    }

    /// Set one key from its string form (CLI and environment overrides)
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "refresh_snapshot_on_reverify" => {
                self.refresh_snapshot_on_reverify = parse_bool(key, value)?;
            }
            "enforce_role_attribute" => {
                self.enforce_role_attribute = parse_bool(key, value)?;
            }
            "role_attribute" => self.role_attribute = value.to_string(),
            "verifier_domain" => {
                self.verifier_registry = if value.trim().is_empty() {
                    RegistryLocation::Local
                } else {
                    RegistryLocation::Domain {
                        domain: DomainRef::new(value.trim()),
                    }
                };
            }
            "log_filter" => self.log_filter = value.to_string(),
            other => {
                return Err(VeritasError::config(format!("unknown key {other}")));
            }
        }
        Ok(())
    }

    /// Check cross-field consistency
    pub fn validate(&self) -> Result<()> {
        if self.role_attribute.trim().is_empty() {
            return Err(VeritasError::config("role_attribute must not be empty"));
        }
        if let RegistryLocation::Domain { domain } = &self.verifier_registry {
            if domain.as_str().trim().is_empty() {
                return Err(VeritasError::config("verifier_registry.domain must not be empty"));
            }
        }
        if self.log_filter.trim().is_empty() {
            return Err(VeritasError::config("log_filter must not be empty"));
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(VeritasError::config(format!(
            "{key} expects a boolean, got {other:?}"
        ))),
    }
}
