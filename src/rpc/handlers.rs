//! Typed parameter structs and the method router.

use crate::error::{Result, TrackletError};
use crate::files::{ObjectStore, PresignedStore};
use crate::model::NewFile;
use crate::storage::SqliteStorage;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};

/// Input for `issues.updateAssignee`. The target user is deliberately not
/// looked up first; a null `userId` clears the assignee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssigneeParams {
    pub issue_id: i64,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Input for `issues.updateStatus`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusParams {
    pub issue_id: i64,
    pub status_id: String,
}

/// Input for `issues.updatePriority`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriorityParams {
    pub issue_id: i64,
    pub priority_id: String,
}

/// Input for `users.createProfile`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileParams {
    pub user_id: String,
}

/// Input for `users.updateProfileAvatar`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileAvatarParams {
    pub user_id: String,
    pub avatar_file_id: i64,
}

/// Input for `files.generateUserAvatarUploadUrl` (the avatar file's
/// client-side metadata).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAvatarUploadUrlParams {
    pub filename: String,
    pub mime_type: String,
    #[serde(default)]
    pub size: Option<i64>,
}

/// Input for `files.add`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct AddFilesParams {
    pub files: Vec<NewFile>,
}

/// Every procedure the router serves.
pub const METHODS: &[&str] = &[
    "statuses.getAll",
    "priorities.getAll",
    "labels.getAll",
    "users.getAll",
    "users.createProfile",
    "users.updateProfileAvatar",
    "issues.getAll",
    "issues.updateAssignee",
    "issues.updateStatus",
    "issues.updatePriority",
    "files.generateUserAvatarUploadUrl",
    "files.add",
];

/// Dispatches `namespace.procedure` methods to storage and the object store.
///
/// The storage handle is injected, not a module-level global, so callers
/// (and tests) choose the database.
pub struct Router<S: ObjectStore = PresignedStore> {
    storage: SqliteStorage,
    store: S,
}

impl<S: ObjectStore> Router<S> {
    #[must_use]
    pub const fn new(storage: SqliteStorage, store: S) -> Self {
        Self { storage, store }
    }

    /// Read access to the underlying storage (used by command code).
    #[must_use]
    pub const fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut SqliteStorage {
        &mut self.storage
    }

    /// Execute one call. Errors are logged here, once, and returned.
    ///
    /// # Errors
    ///
    /// Returns [`TrackletError::MethodNotFound`] for unknown methods,
    /// [`TrackletError::InvalidParams`] for malformed params, and whatever
    /// the handler itself fails with.
    pub fn dispatch(&mut self, method: &str, params: Option<Value>) -> Result<Value> {
        debug!(method, "rpc dispatch");
        let result = self.dispatch_inner(method, params);
        if let Err(e) = &result {
            error!(method, code = %e.code(), "rpc handler failed: {e}");
        }
        result
    }

    fn dispatch_inner(&mut self, method: &str, params: Option<Value>) -> Result<Value> {
        match method {
            "statuses.getAll" => to_json(&self.storage.all_statuses()?),
            "priorities.getAll" => to_json(&self.storage.all_priorities()?),
            "labels.getAll" => to_json(&self.storage.all_labels()?),
            "users.getAll" => to_json(&self.storage.all_users()?),
            "issues.getAll" => to_json(&self.storage.all_issues()?),
            "issues.updateAssignee" => {
                let p: UpdateAssigneeParams = parse_params(params)?;
                self.storage
                    .update_assignee(p.issue_id, p.user_id.as_deref())?;
                Ok(Value::Null)
            }
            "issues.updateStatus" => {
                let p: UpdateStatusParams = parse_params(params)?;
                self.storage.update_status(p.issue_id, &p.status_id)?;
                Ok(Value::Null)
            }
            "issues.updatePriority" => {
                let p: UpdatePriorityParams = parse_params(params)?;
                self.storage.update_priority(p.issue_id, &p.priority_id)?;
                Ok(Value::Null)
            }
            "users.createProfile" => {
                let p: CreateProfileParams = parse_params(params)?;
                self.storage.create_profile(&p.user_id)?;
                Ok(Value::Null)
            }
            "users.updateProfileAvatar" => {
                let p: UpdateProfileAvatarParams = parse_params(params)?;
                self.storage
                    .update_profile_avatar(&p.user_id, p.avatar_file_id)?;
                Ok(Value::Null)
            }
            "files.generateUserAvatarUploadUrl" => {
                let p: GenerateAvatarUploadUrlParams = parse_params(params)?;
                let target = self.store.presign_avatar_upload(&p.filename, &p.mime_type)?;
                to_json(&target)
            }
            "files.add" => {
                let p: AddFilesParams = parse_params(params)?;
                to_json(&self.storage.add_files(&p.files)?)
            }
            other => Err(TrackletError::MethodNotFound {
                method: other.to_string(),
            }),
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(params: Option<Value>) -> Result<T> {
    let value = params.unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| TrackletError::InvalidParams {
        reason: e.to_string(),
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// JSON Schemas for every method's params (null for parameter-less queries).
/// Exposed through `tl schema` so UI bindings can be generated.
#[must_use]
pub fn method_schemas() -> Value {
    json!({
        "statuses.getAll": Value::Null,
        "priorities.getAll": Value::Null,
        "labels.getAll": Value::Null,
        "users.getAll": Value::Null,
        "issues.getAll": Value::Null,
        "issues.updateAssignee": schema_for!(UpdateAssigneeParams),
        "issues.updateStatus": schema_for!(UpdateStatusParams),
        "issues.updatePriority": schema_for!(UpdatePriorityParams),
        "users.createProfile": schema_for!(CreateProfileParams),
        "users.updateProfileAvatar": schema_for!(UpdateProfileAvatarParams),
        "files.generateUserAvatarUploadUrl": schema_for!(GenerateAvatarUploadUrlParams),
        "files.add": schema_for!(AddFilesParams),
    })
}
