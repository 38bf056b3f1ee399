//! Operation dispatcher
//!
//! Turns an operation name plus JSON arguments into a contract call and
//! wraps the outcome in a [`Response`]. Failures are logged here, once, with
//! the operation, target, invoker and transaction ID.

use crate::asset::AssetContract;
use crate::context::ContractContext;
use crate::document::DocumentContract;
use crate::envelope::Response;
use crate::user::UserContract;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, warn};
use veritas_core::{
    CrossDomainEffects, Credential, IdentityId, LedgerEffects, VeritasConfig, VeritasError,
    VeritasResult,
};
use veritas_records::DocumentKind;

/// Every operation exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateUser,
    DeleteUser,
    CreateVerifier,
    GetVerifier,
    GetAllVerifiers,
    AddUserProfileVerification,
    RemoveUserProfileVerification,
    ClearProfileField,
    GetProfileVerifications,
    Create(DocumentKind),
    Sign(DocumentKind),
    Share(DocumentKind),
    Verify(DocumentKind),
    RemoveVerification(DocumentKind),
    GetVerifiers(DocumentKind),
    FindBySignature(DocumentKind),
    Get(DocumentKind),
    RegisterAsset,
    TransferAsset,
    LinkDocument,
    VerifyAsset,
    RemoveAssetVerification,
    GetAsset,
    GetAssetVerifiers,
    FindAssetsByOwner,
}

impl Operation {
    /// All operations, grouped by record kind
    pub const ALL: [Operation; 33] = {
        use DocumentKind::{Document as D, Eform as E};
        use Operation::*;
        [
            CreateUser,
            DeleteUser,
            CreateVerifier,
            GetVerifier,
            GetAllVerifiers,
            AddUserProfileVerification,
            RemoveUserProfileVerification,
            ClearProfileField,
            GetProfileVerifications,
            Create(D),
            Sign(D),
            Share(D),
            Verify(D),
            RemoveVerification(D),
            GetVerifiers(D),
            FindBySignature(D),
            Get(D),
            Create(E),
            Sign(E),
            Share(E),
            Verify(E),
            RemoveVerification(E),
            GetVerifiers(E),
            FindBySignature(E),
            Get(E),
            RegisterAsset,
            TransferAsset,
            LinkDocument,
            VerifyAsset,
            RemoveAssetVerification,
            GetAsset,
            GetAssetVerifiers,
            FindAssetsByOwner,
        ]
    };

    /// Name callers use to invoke the operation
    pub fn name(self) -> &'static str {
        use DocumentKind::{Document as D, Eform as E};
        match self {
            Operation::CreateUser => "CreateUser",
            Operation::DeleteUser => "DeleteUser",
            Operation::CreateVerifier => "CreateVerifier",
            Operation::GetVerifier => "GetVerifier",
            Operation::GetAllVerifiers => "GetAllVerifiers",
            Operation::AddUserProfileVerification => "AddUserProfileVerification",
            Operation::RemoveUserProfileVerification => "RemoveUserProfileVerification",
            Operation::ClearProfileField => "ClearProfileField",
            Operation::GetProfileVerifications => "GetProfileVerifications",
            Operation::Create(D) => "CreateDocument",
            Operation::Create(E) => "CreateEform",
            Operation::Sign(D) => "SignDocument",
            Operation::Sign(E) => "SignEform",
            Operation::Share(D) => "ShareDocument",
            Operation::Share(E) => "ShareEform",
            Operation::Verify(D) => "VerifyDocument",
            Operation::Verify(E) => "VerifyEform",
            Operation::RemoveVerification(D) => "RemoveDocumentVerification",
            Operation::RemoveVerification(E) => "RemoveEformVerification",
            Operation::GetVerifiers(D) => "GetDocumentVerifiers",
            Operation::GetVerifiers(E) => "GetEformVerifiers",
            Operation::FindBySignature(D) => "FindDocumentsBySignature",
            Operation::FindBySignature(E) => "FindEformsBySignature",
            Operation::Get(D) => "GetDocument",
            Operation::Get(E) => "GetEform",
            Operation::RegisterAsset => "RegisterAsset",
            Operation::TransferAsset => "TransferAsset",
            Operation::LinkDocument => "LinkDocument",
            Operation::VerifyAsset => "VerifyAsset",
            Operation::RemoveAssetVerification => "RemoveAssetVerification",
            Operation::GetAsset => "GetAsset",
            Operation::GetAssetVerifiers => "GetAssetVerifiers",
            Operation::FindAssetsByOwner => "FindAssetsByOwner",
        }
    }

    /// Argument names, in call order
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Operation::CreateUser | Operation::GetAllVerifiers => &[],
            Operation::DeleteUser => &["userId"],
            Operation::CreateVerifier => &["name", "grade"],
            Operation::GetVerifier => &["verifierId"],
            Operation::AddUserProfileVerification => &["userId", "fields", "expiryDates"],
            Operation::RemoveUserProfileVerification => &["userId", "field"],
            Operation::ClearProfileField => &["field"],
            Operation::GetProfileVerifications => &["userId", "field"],
            Operation::Create(_) => &["id", "contentHashes"],
            Operation::Sign(_) => &["id", "hash", "timestamp", "otp"],
            Operation::Share(_) => &["shareId", "recipients", "documentId"],
            Operation::Verify(_) => &["id", "expiryDate"],
            Operation::RemoveVerification(_)
            | Operation::GetVerifiers(_)
            | Operation::Get(_) => &["id"],
            Operation::FindBySignature(_) => &["hash"],
            Operation::RegisterAsset => &["assetType", "metadata", "description"],
            Operation::TransferAsset => &["assetId", "newOwner"],
            Operation::LinkDocument => &["assetId", "documentId"],
            Operation::VerifyAsset => &["assetId", "expiryDate"],
            Operation::RemoveAssetVerification
            | Operation::GetAsset
            | Operation::GetAssetVerifiers => &["assetId"],
            Operation::FindAssetsByOwner => &["ownerId"],
        }
    }

    /// Whether the operation writes to the ledger
    pub fn is_mutating(self) -> bool {
        !matches!(
            self,
            Operation::GetVerifier
                | Operation::GetAllVerifiers
                | Operation::GetProfileVerifications
                | Operation::GetVerifiers(_)
                | Operation::FindBySignature(_)
                | Operation::Get(_)
                | Operation::GetAsset
                | Operation::GetAssetVerifiers
                | Operation::FindAssetsByOwner
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = VeritasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| VeritasError::unknown_operation(s))
    }
}

/// Positional JSON arguments of one call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<Value>,
}

impl Args {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// First string argument, used to name the target in logs
    pub fn target(&self) -> Option<&str> {
        self.values.first().and_then(Value::as_str)
    }

    fn check_arity(&self, op: Operation) -> VeritasResult<()> {
        let expected = op.parameters().len();
        if self.values.len() != expected {
            return Err(VeritasError::invalid_argument(format!(
                "{op} takes {expected} argument(s) ({}), got {}",
                op.parameters().join(", "),
                self.values.len()
            )));
        }
        Ok(())
    }

    fn value(&self, index: usize, name: &str) -> VeritasResult<&Value> {
        self.values
            .get(index)
            .ok_or_else(|| VeritasError::invalid_argument(format!("missing argument {name}")))
    }

    fn string(&self, index: usize, name: &str) -> VeritasResult<&str> {
        self.value(index, name)?
            .as_str()
            .ok_or_else(|| VeritasError::invalid_argument(format!("{name} must be a string")))
    }

    fn identity(&self, index: usize, name: &str) -> VeritasResult<IdentityId> {
        self.string(index, name).map(IdentityId::new)
    }

    fn strings(&self, index: usize, name: &str) -> VeritasResult<Vec<String>> {
        let items = self.value(index, name)?.as_array().ok_or_else(|| {
            VeritasError::invalid_argument(format!("{name} must be an array of strings"))
        })?;
        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    VeritasError::invalid_argument(format!("{name} must contain only strings"))
                })
            })
            .collect()
    }

    fn string_map(&self, index: usize, name: &str) -> VeritasResult<BTreeMap<String, String>> {
        let object = self.value(index, name)?.as_object().ok_or_else(|| {
            VeritasError::invalid_argument(format!("{name} must be an object of strings"))
        })?;
        object
            .iter()
            .map(|(key, value)| {
                value
                    .as_str()
                    .map(|v| (key.clone(), v.to_string()))
                    .ok_or_else(|| {
                        VeritasError::invalid_argument(format!("{name}.{key} must be a string"))
                    })
            })
            .collect()
    }
}

fn to_data<T: Serialize>(value: T) -> VeritasResult<Option<Value>> {
    Ok(Some(serde_json::to_value(value)?))
}

/// Executes operations against one ledger
///
/// Holds the long-lived collaborators; a [`ContractContext`] is built per
/// call from them and the caller's credential.
#[derive(Clone)]
pub struct ContractRuntime {
    ledger: Arc<dyn LedgerEffects>,
    cross_domain: Option<Arc<dyn CrossDomainEffects>>,
    config: Arc<VeritasConfig>,
}

impl ContractRuntime {
    pub fn new(ledger: Arc<dyn LedgerEffects>, config: VeritasConfig) -> Self {
        Self {
            ledger,
            cross_domain: None,
            config: Arc::new(config),
        }
    }

    /// Route cross-domain calls through `router`
    pub fn with_cross_domain(mut self, router: Arc<dyn CrossDomainEffects>) -> Self {
        self.cross_domain = Some(router);
        self
    }

    pub fn config(&self) -> &VeritasConfig {
        &self.config
    }

    /// Context for one call by `credential`
    pub fn context(&self, credential: Credential) -> ContractContext {
        let ctx = ContractContext::new(self.ledger.clone(), credential)
            .with_config(self.config.clone());
        match &self.cross_domain {
            Some(router) => ctx.with_cross_domain(router.clone()),
            None => ctx,
        }
    }

    /// Run `operation` by name and wrap the outcome
    pub async fn invoke(
        &self,
        credential: Credential,
        operation: &str,
        args: Vec<Value>,
    ) -> Response<Value> {
        let ctx = self.context(credential);
        self.invoke_with(&ctx, operation, Args::new(args)).await
    }

    /// Run `operation` in an existing context
    pub async fn invoke_with(
        &self,
        ctx: &ContractContext,
        operation: &str,
        args: Args,
    ) -> Response<Value> {
        let result = match operation.parse::<Operation>() {
            Ok(op) => Self::execute(ctx, op, &args).await,
            Err(e) => Err(e),
        };

        match result {
            Ok((message, data)) => Response::ok(ctx.tx_id(), message, data),
            Err(err) => {
                log_failure(ctx, operation, &args, &err);
                Response::failure(ctx.tx_id(), &err)
            }
        }
    }

    /// Dispatch a parsed operation; returns the success message and data
    pub async fn execute(
        ctx: &ContractContext,
        op: Operation,
        args: &Args,
    ) -> VeritasResult<(String, Option<Value>)> {
        args.check_arity(op)?;
        let users = UserContract::new(ctx);
        let assets = AssetContract::new(ctx);

        match op {
            Operation::CreateUser => {
                let user = users.create_user().await?;
                Ok((format!("user {} created", user.id), to_data(user)?))
            }
            Operation::DeleteUser => {
                let user_id = args.identity(0, "userId")?;
                users.delete_user(&user_id).await?;
                Ok((format!("user {user_id} deleted"), None))
            }
            Operation::CreateVerifier => {
                let verifier = users
                    .create_verifier(args.string(0, "name")?, args.string(1, "grade")?)
                    .await?;
                Ok((format!("verifier {} registered", verifier.id), to_data(verifier)?))
            }
            Operation::GetVerifier => {
                let verifier = users.get_verifier(&args.identity(0, "verifierId")?).await?;
                Ok((format!("verifier {} fetched", verifier.id), to_data(verifier)?))
            }
            Operation::GetAllVerifiers => {
                let verifiers = users.get_all_verifiers().await?;
                Ok((format!("{} verifier(s)", verifiers.len()), to_data(verifiers)?))
            }
            Operation::AddUserProfileVerification => {
                let user_id = args.identity(0, "userId")?;
                let fields = args.strings(1, "fields")?;
                let expiries = args.strings(2, "expiryDates")?;
                let user = users
                    .add_profile_verification(&user_id, &fields, &expiries)
                    .await?;
                Ok((
                    format!("profile field(s) {} of user {user_id} verified", fields.join(", ")),
                    to_data(user)?,
                ))
            }
            Operation::RemoveUserProfileVerification => {
                let user_id = args.identity(0, "userId")?;
                let field = args.string(1, "field")?;
                let user = users.remove_profile_verification(&user_id, field).await?;
                Ok((
                    format!("verification of {field} on user {user_id} removed"),
                    to_data(user)?,
                ))
            }
            Operation::ClearProfileField => {
                let field = args.string(0, "field")?;
                let user = users.clear_profile_field(field).await?;
                Ok((format!("profile field {field} cleared"), to_data(user)?))
            }
            Operation::GetProfileVerifications => {
                let user_id = args.identity(0, "userId")?;
                let field = args.string(1, "field")?;
                let list = users.get_profile_verifications(&user_id, field).await?;
                Ok((
                    format!("{} verification(s) on {field} of user {user_id}", list.len()),
                    to_data(list)?,
                ))
            }
            Operation::Create(kind) => {
                let document = DocumentContract::new(ctx, kind)
                    .create(args.string(0, "id")?, args.strings(1, "contentHashes")?)
                    .await?;
                Ok((format!("{kind} {} created", document.id), to_data(document)?))
            }
            Operation::Sign(kind) => {
                let document = DocumentContract::new(ctx, kind)
                    .sign(
                        args.string(0, "id")?,
                        args.string(1, "hash")?,
                        args.string(2, "timestamp")?,
                        args.string(3, "otp")?,
                    )
                    .await?;
                Ok((format!("{kind} {} signed", document.id), to_data(document)?))
            }
            Operation::Share(kind) => {
                let recipients = args
                    .strings(1, "recipients")?
                    .into_iter()
                    .map(IdentityId::new)
                    .collect();
                let share = DocumentContract::new(ctx, kind)
                    .share(args.string(0, "shareId")?, recipients, args.string(2, "documentId")?)
                    .await?;
                Ok((
                    format!("{kind} {} shared as {}", share.document_id, share.id),
                    to_data(share)?,
                ))
            }
            Operation::Verify(kind) => {
                let document = DocumentContract::new(ctx, kind)
                    .verify(args.string(0, "id")?, args.string(1, "expiryDate")?)
                    .await?;
                Ok((format!("{kind} {} verified", document.id), to_data(document)?))
            }
            Operation::RemoveVerification(kind) => {
                let document = DocumentContract::new(ctx, kind)
                    .remove_verification(args.string(0, "id")?)
                    .await?;
                Ok((
                    format!("verification of {kind} {} removed", document.id),
                    to_data(document)?,
                ))
            }
            Operation::GetVerifiers(kind) => {
                let id = args.string(0, "id")?;
                let list = DocumentContract::new(ctx, kind).get_verifiers(id).await?;
                Ok((format!("{} verification(s) on {kind} {id}", list.len()), to_data(list)?))
            }
            Operation::FindBySignature(kind) => {
                let hash = args.string(0, "hash")?;
                let found = DocumentContract::new(ctx, kind).find_by_signature(hash).await?;
                Ok((format!("{} {kind}(s) signed with {hash}", found.len()), to_data(found)?))
            }
            Operation::Get(kind) => {
                let document = DocumentContract::new(ctx, kind)
                    .get(args.string(0, "id")?)
                    .await?;
                Ok((format!("{kind} {} fetched", document.id), to_data(document)?))
            }
            Operation::RegisterAsset => {
                let asset = assets
                    .register(
                        args.string(0, "assetType")?,
                        args.string_map(1, "metadata")?,
                        args.string(2, "description")?,
                    )
                    .await?;
                Ok((format!("asset {} registered", asset.id), to_data(asset)?))
            }
            Operation::TransferAsset => {
                let asset = assets
                    .transfer(args.string(0, "assetId")?, args.identity(1, "newOwner")?)
                    .await?;
                Ok((
                    format!("asset {} transferred to {}", asset.id, asset.owner),
                    to_data(asset)?,
                ))
            }
            Operation::LinkDocument => {
                let document_id = args.string(1, "documentId")?;
                let asset = assets
                    .link_document(args.string(0, "assetId")?, document_id)
                    .await?;
                Ok((
                    format!("document {document_id} linked to asset {}", asset.id),
                    to_data(asset)?,
                ))
            }
            Operation::VerifyAsset => {
                let asset = assets
                    .verify(args.string(0, "assetId")?, args.string(1, "expiryDate")?)
                    .await?;
                Ok((format!("asset {} verified", asset.id), to_data(asset)?))
            }
            Operation::RemoveAssetVerification => {
                let asset = assets
                    .remove_verification(args.string(0, "assetId")?)
                    .await?;
                Ok((
                    format!("verification of asset {} removed", asset.id),
                    to_data(asset)?,
                ))
            }
            Operation::GetAsset => {
                let asset = assets.get(args.string(0, "assetId")?).await?;
                Ok((format!("asset {} fetched", asset.id), to_data(asset)?))
            }
            Operation::GetAssetVerifiers => {
                let asset_id = args.string(0, "assetId")?;
                let list = assets.get_verifiers(asset_id).await?;
                Ok((
                    format!("{} verification(s) on asset {asset_id}", list.len()),
                    to_data(list)?,
                ))
            }
            Operation::FindAssetsByOwner => {
                let owner = args.identity(0, "ownerId")?;
                let found = assets.find_by_owner(&owner).await?;
                Ok((format!("{} asset(s) owned by {owner}", found.len()), to_data(found)?))
            }
        }
    }
}

fn log_failure(ctx: &ContractContext, operation: &str, args: &Args, err: &VeritasError) {
    let invoker = ctx
        .invoker()
        .map(|id| id.into_inner())
        .unwrap_or_else(|_| "<unresolved>".to_string());
    let target = args.target().unwrap_or("-");
    let tx_id = ctx.tx_id();
    let code = err.code();

    if err.is_rejection() {
        warn!(
            operation,
            target_id = target,
            invoker = %invoker,
            tx_id = %tx_id,
            %code,
            error = %err,
            "operation rejected"
        );
    } else {
        error!(
            operation,
            target_id = target,
            invoker = %invoker,
            tx_id = %tx_id,
            %code,
            error = %err,
            "operation failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_round_trip_and_are_unique() {
        let mut names = std::collections::HashSet::new();
        for op in Operation::ALL {
            assert!(names.insert(op.name()), "duplicate name {op}");
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn unknown_name_is_unknown_operation() {
        assert_eq!(
            "MintToken".parse::<Operation>(),
            Err(VeritasError::unknown_operation("MintToken"))
        );
    }

    #[test]
    fn reads_are_not_mutating() {
        assert!(!Operation::Get(DocumentKind::Eform).is_mutating());
        assert!(!Operation::FindAssetsByOwner.is_mutating());
        assert!(Operation::Sign(DocumentKind::Document).is_mutating());
        assert!(Operation::ClearProfileField.is_mutating());
    }

    #[test]
    fn argument_shapes_are_checked() {
        let args = Args::new(vec![json!("deed"), json!({"lot": 7}), json!("x")]);
        assert!(args.string_map(1, "metadata").is_err());
        assert!(args.strings(0, "fields").is_err());
        assert!(args.check_arity(Operation::RegisterAsset).is_ok());
        assert!(args.check_arity(Operation::GetAsset).is_err());

        let args = Args::new(vec![json!(["a", "b"]), json!({"k": "v"})]);
        assert_eq!(args.strings(0, "fields").unwrap(), vec!["a", "b"]);
        assert_eq!(args.string_map(1, "metadata").unwrap().get("k").unwrap(), "v");
        assert_eq!(args.target(), None);
    }
}
