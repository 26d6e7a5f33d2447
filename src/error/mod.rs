//! Error types for `tracklet`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Structured variants for the domain cases (missing issue/status/priority),
//!   `Other` for wrapped anyhow errors
//! - Maps onto stable RPC error codes via [`ErrorCode`]

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `tracklet` operations.
#[derive(Error, Debug)]
pub enum TrackletError {
    // === Domain errors ===
    /// Issue with the specified id was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: i64 },

    /// Status with the specified id was not found.
    #[error("Status not found: {id}")]
    StatusNotFound { id: String },

    /// Priority with the specified id was not found.
    #[error("Priority not found: {id}")]
    PriorityNotFound { id: String },

    /// User with the specified id was not found.
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    /// No profile row exists for the given user.
    #[error("Profile not found for user: {user_id}")]
    ProfileNotFound { user_id: String },

    /// Presence value outside online/away/offline.
    #[error("Invalid presence status: {value}")]
    InvalidPresence { value: String },

    // === Validation errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    // === RPC boundary errors ===
    /// No handler registered for the requested method.
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    /// Request params did not match the handler's input shape.
    #[error("Invalid params: {reason}")]
    InvalidParams { reason: String },

    // === Configuration errors ===
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workspace not initialized.
    #[error("Tracklet not initialized: run 'tl init' first")]
    NotInitialized,

    /// Already initialized.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === Infrastructure errors ===
    /// `SQLite` database error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Wrapped anyhow error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Stable error codes surfaced at the RPC boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    InvalidParams,
    MethodNotFound,
    Constraint,
    Internal,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidParams => "INVALID_PARAMS",
            Self::MethodNotFound => "METHOD_NOT_FOUND",
            Self::Constraint => "CONSTRAINT",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TrackletError {
    /// RPC error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::IssueNotFound { .. }
            | Self::StatusNotFound { .. }
            | Self::PriorityNotFound { .. }
            | Self::UserNotFound { .. }
            | Self::ProfileNotFound { .. } => ErrorCode::NotFound,
            Self::Validation { .. } | Self::InvalidParams { .. } | Self::InvalidPresence { .. } => {
                ErrorCode::InvalidParams
            }
            Self::MethodNotFound { .. } => ErrorCode::MethodNotFound,
            Self::Database(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                ErrorCode::Constraint
            }
            _ => ErrorCode::Internal,
        }
    }

    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::IssueNotFound { .. }
                | Self::StatusNotFound { .. }
                | Self::PriorityNotFound { .. }
                | Self::UserNotFound { .. }
                | Self::ProfileNotFound { .. }
                | Self::InvalidPresence { .. }
                | Self::Validation { .. }
                | Self::InvalidParams { .. }
                | Self::NotInitialized
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: tl init"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::StatusNotFound { .. } => Some(
                "Valid statuses: backlog, to-do, in-progress, technical-review, completed, paused",
            ),
            Self::PriorityNotFound { .. } => {
                Some("Valid priorities: no-priority, low, medium, high, urgent")
            }
            Self::InvalidPresence { .. } => Some("Valid presence: online, away, offline"),
            _ => None,
        }
    }

    /// Exit code for CLI error reporting.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type using `TrackletError`.
pub type Result<T> = std::result::Result<T, TrackletError>;
