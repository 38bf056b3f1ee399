// Single-operation invocation against a filesystem ledger

use anyhow::{anyhow, Context, Result};
use clap::Args;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use veritas_contracts::ContractRuntime;
use veritas_core::{Credential, VeritasConfig};
use veritas_effects::FilesystemLedgerHandler;

#[derive(Args, Debug)]
pub struct InvokeArgs {
    /// Operation name, e.g. RegisterAsset
    pub operation: String,

    /// Positional arguments; values starting with `[` or `{` are read as JSON
    pub args: Vec<String>,

    /// Caller subject DN, e.g. "CN=alice,O=Org1"
    #[arg(long)]
    pub subject: String,

    /// Credential attribute (repeatable), e.g. isVerifier=true
    #[arg(long = "attr", value_parser = parse_attribute)]
    pub attributes: Vec<(String, String)>,

    /// Transaction ID; random when omitted
    #[arg(long)]
    pub tx_id: Option<String>,
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))
}

fn parse_argument(raw: &str) -> Result<Value> {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        serde_json::from_str(trimmed).with_context(|| format!("argument {raw:?} is not valid JSON"))
    } else {
        Ok(Value::String(raw.to_string()))
    }
}

/// Run one operation; returns whether it succeeded
pub async fn run(config: VeritasConfig, ledger_dir: &Path, args: InvokeArgs) -> Result<bool> {
    let ledger = FilesystemLedgerHandler::new(ledger_dir)
        .map_err(|e| anyhow!("cannot open ledger at {}: {e}", ledger_dir.display()))?;
    let tx_id = match args.tx_id {
        Some(id) => {
            ledger.begin_transaction(id.as_str());
            id.into()
        }
        None => ledger.begin_random_transaction(),
    };

    let credential = args
        .attributes
        .into_iter()
        .fold(Credential::new(args.subject), |cred, (name, value)| {
            cred.with_attribute(name, value)
        });
    let values = args
        .args
        .iter()
        .map(|raw| parse_argument(raw))
        .collect::<Result<Vec<_>>>()?;

    info!(operation = %args.operation, tx_id = %tx_id, "invoking");
    let runtime = ContractRuntime::new(Arc::new(ledger), config);
    let response = runtime.invoke(credential, &args.operation, values).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(response.success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_need_a_name() {
        assert_eq!(
            parse_attribute("isVerifier=true").unwrap(),
            ("isVerifier".to_string(), "true".to_string())
        );
        assert!(parse_attribute("=true").is_err());
        assert!(parse_attribute("isVerifier").is_err());
    }

    #[test]
    fn json_only_for_arrays_and_objects() {
        assert_eq!(parse_argument("deed").unwrap(), Value::from("deed"));
        assert_eq!(parse_argument("42").unwrap(), Value::from("42"));
        assert_eq!(parse_argument(r#"["a","b"]"#).unwrap(), serde_json::json!(["a", "b"]));
        assert!(parse_argument("[unclosed").is_err());
    }

    #[tokio::test]
    async fn runs_against_a_directory_ledger() {
        let dir = tempfile::TempDir::new().unwrap();
        let invoke = |operation: &str, args: Vec<&str>| InvokeArgs {
            operation: operation.to_string(),
            args: args.into_iter().map(str::to_string).collect(),
            subject: "CN=alice,O=Org1".to_string(),
            attributes: vec![],
            tx_id: Some("tx-1".to_string()),
        };

        let register = || invoke("RegisterAsset", vec!["deed", "{}", "lot 7"]);
        assert!(run(VeritasConfig::default(), dir.path(), register()).await.unwrap());
        // Same transaction ID again: the asset key is taken
        assert!(!run(VeritasConfig::default(), dir.path(), register()).await.unwrap());
        let fetch = invoke("GetAsset", vec!["tx-1"]);
        assert!(run(VeritasConfig::default(), dir.path(), fetch).await.unwrap());
    }
}
