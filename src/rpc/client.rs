//! Typed client binding over a pluggable transport.
//!
//! Each query method carries a stable [`QueryKey`]; mutation methods return
//! the keys whose cached results they invalidate, so the consumer knows what
//! to refetch after a successful write.

use crate::error::{Result, TrackletError};
use crate::files::UploadTarget;
use crate::model::{FileRecord, Issue, Label, NewFile, Priority, Status, UserSummary};
use crate::rpc::handlers::{
    AddFilesParams, CreateProfileParams, GenerateAvatarUploadUrlParams, UpdateAssigneeParams,
    UpdatePriorityParams, UpdateProfileAvatarParams, UpdateStatusParams,
};
use serde::Serialize;
use serde_json::Value;

/// Cache identity of a query procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Statuses,
    Priorities,
    Labels,
    Users,
    Issues,
}

impl QueryKey {
    #[must_use]
    pub const fn method(self) -> &'static str {
        match self {
            Self::Statuses => "statuses.getAll",
            Self::Priorities => "priorities.getAll",
            Self::Labels => "labels.getAll",
            Self::Users => "users.getAll",
            Self::Issues => "issues.getAll",
        }
    }
}

/// How calls reach the handlers: in-process, or a real wire.
pub trait Transport {
    /// Send one call and return its raw result.
    ///
    /// # Errors
    ///
    /// Returns the handler's error, or a transport-level failure.
    fn call(&mut self, method: &str, params: Option<Value>) -> Result<Value>;
}

/// In-process transport wrapping a [`crate::rpc::Router`] directly.
pub struct LocalTransport<S: crate::files::ObjectStore> {
    router: crate::rpc::Router<S>,
}

impl<S: crate::files::ObjectStore> LocalTransport<S> {
    #[must_use]
    pub const fn new(router: crate::rpc::Router<S>) -> Self {
        Self { router }
    }
}

impl<S: crate::files::ObjectStore> Transport for LocalTransport<S> {
    fn call(&mut self, method: &str, params: Option<Value>) -> Result<Value> {
        self.router.dispatch(method, params)
    }
}

/// Typed RPC client: one method per procedure.
pub struct RpcClient<T: Transport> {
    transport: T,
}

impl<T: Transport> RpcClient<T> {
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    fn query<R: serde::de::DeserializeOwned>(&mut self, key: QueryKey) -> Result<R> {
        let value = self.transport.call(key.method(), None)?;
        decode(value)
    }

    fn mutate<P: Serialize>(
        &mut self,
        method: &str,
        params: &P,
        invalidates: &'static [QueryKey],
    ) -> Result<&'static [QueryKey]> {
        self.transport.call(method, Some(serde_json::to_value(params)?))?;
        Ok(invalidates)
    }

    /// `statuses.getAll`
    ///
    /// # Errors
    ///
    /// Propagates handler or transport errors.
    pub fn get_all_statuses(&mut self) -> Result<Vec<Status>> {
        self.query(QueryKey::Statuses)
    }

    /// `priorities.getAll`
    ///
    /// # Errors
    ///
    /// Propagates handler or transport errors.
    pub fn get_all_priorities(&mut self) -> Result<Vec<Priority>> {
        self.query(QueryKey::Priorities)
    }

    /// `labels.getAll`
    ///
    /// # Errors
    ///
    /// Propagates handler or transport errors.
    pub fn get_all_labels(&mut self) -> Result<Vec<Label>> {
        self.query(QueryKey::Labels)
    }

    /// `users.getAll`
    ///
    /// # Errors
    ///
    /// Propagates handler or transport errors.
    pub fn get_all_users(&mut self) -> Result<Vec<UserSummary>> {
        self.query(QueryKey::Users)
    }

    /// `issues.getAll`
    ///
    /// # Errors
    ///
    /// Propagates handler or transport errors.
    pub fn get_all_issues(&mut self) -> Result<Vec<Issue>> {
        self.query(QueryKey::Issues)
    }

    /// `issues.updateAssignee`; returns the query keys to refetch.
    ///
    /// # Errors
    ///
    /// Propagates handler or transport errors.
    pub fn update_assignee(
        &mut self,
        issue_id: i64,
        user_id: Option<String>,
    ) -> Result<&'static [QueryKey]> {
        self.mutate(
            "issues.updateAssignee",
            &UpdateAssigneeParams { issue_id, user_id },
            &[QueryKey::Issues],
        )
    }

    /// `issues.updateStatus`; returns the query keys to refetch.
    ///
    /// # Errors
    ///
    /// Fails with `NOT_FOUND` if the issue or status is missing.
    pub fn update_status(
        &mut self,
        issue_id: i64,
        status_id: impl Into<String>,
    ) -> Result<&'static [QueryKey]> {
        self.mutate(
            "issues.updateStatus",
            &UpdateStatusParams {
                issue_id,
                status_id: status_id.into(),
            },
            &[QueryKey::Issues],
        )
    }

    /// `issues.updatePriority`; returns the query keys to refetch.
    ///
    /// # Errors
    ///
    /// Fails with `NOT_FOUND` if the issue or priority is missing.
    pub fn update_priority(
        &mut self,
        issue_id: i64,
        priority_id: impl Into<String>,
    ) -> Result<&'static [QueryKey]> {
        self.mutate(
            "issues.updatePriority",
            &UpdatePriorityParams {
                issue_id,
                priority_id: priority_id.into(),
            },
            &[QueryKey::Issues],
        )
    }

    /// `users.createProfile`; returns the query keys to refetch.
    ///
    /// # Errors
    ///
    /// Propagates handler or transport errors.
    pub fn create_profile(&mut self, user_id: impl Into<String>) -> Result<&'static [QueryKey]> {
        self.mutate(
            "users.createProfile",
            &CreateProfileParams {
                user_id: user_id.into(),
            },
            &[QueryKey::Users],
        )
    }

    /// `users.updateProfileAvatar`; returns the query keys to refetch.
    ///
    /// # Errors
    ///
    /// Fails with `NOT_FOUND` if the user has no profile row.
    pub fn update_profile_avatar(
        &mut self,
        user_id: impl Into<String>,
        avatar_file_id: i64,
    ) -> Result<&'static [QueryKey]> {
        self.mutate(
            "users.updateProfileAvatar",
            &UpdateProfileAvatarParams {
                user_id: user_id.into(),
                avatar_file_id,
            },
            &[QueryKey::Users],
        )
    }

    /// `files.generateUserAvatarUploadUrl`
    ///
    /// # Errors
    ///
    /// Propagates handler or transport errors.
    pub fn generate_user_avatar_upload_url(
        &mut self,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        size: Option<i64>,
    ) -> Result<UploadTarget> {
        let value = self.transport.call(
            "files.generateUserAvatarUploadUrl",
            Some(serde_json::to_value(GenerateAvatarUploadUrlParams {
                filename: filename.into(),
                mime_type: mime_type.into(),
                size,
            })?),
        )?;
        decode(value)
    }

    /// `files.add`
    ///
    /// # Errors
    ///
    /// Propagates handler or transport errors.
    pub fn add_files(&mut self, files: Vec<NewFile>) -> Result<Vec<FileRecord>> {
        let value = self
            .transport
            .call("files.add", Some(serde_json::to_value(AddFilesParams { files })?))?;
        decode(value)
    }
}

fn decode<R: serde::de::DeserializeOwned>(value: Value) -> Result<R> {
    serde_json::from_value(value).map_err(TrackletError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_keys_map_to_methods() {
        assert_eq!(QueryKey::Issues.method(), "issues.getAll");
        assert_eq!(QueryKey::Statuses.method(), "statuses.getAll");
    }
}
