//! Core data types for `tracklet`.
//!
//! This module defines the entities of the tracker schema:
//! - `Issue` - the trackable unit of work
//! - `Status` / `Priority` - fixed reference sets, with [`StatusKey`] and
//!   [`PriorityKey`] as the closed enums over the known ids
//! - `Label` - tags, many-to-many with issues
//! - `User` / `UserSummary` / `PresenceStatus` / `Role`
//! - `FileRecord` - uploaded object metadata

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The known workflow stages, as a closed enum.
///
/// Rows in the `statuses` table are keyed by the string form; this enum is
/// the authoritative list plus the presentation metadata (display name,
/// color) that selectors map from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKey {
    Backlog,
    #[serde(rename = "to-do")]
    Todo,
    InProgress,
    TechnicalReview,
    Completed,
    Paused,
}

impl StatusKey {
    pub const ALL: [Self; 6] = [
        Self::Backlog,
        Self::Todo,
        Self::InProgress,
        Self::TechnicalReview,
        Self::Completed,
        Self::Paused,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "to-do",
            Self::InProgress => "in-progress",
            Self::TechnicalReview => "technical-review",
            Self::Completed => "completed",
            Self::Paused => "paused",
        }
    }

    /// Display name shown in the UI.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::TechnicalReview => "Technical Review",
            Self::Completed => "Completed",
            Self::Paused => "Paused",
        }
    }

    /// Presentation color (hex).
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Backlog => "#ec4899",
            Self::Todo => "#f97316",
            Self::InProgress => "#facc15",
            Self::TechnicalReview => "#22c55e",
            Self::Completed => "#8b5cf6",
            Self::Paused => "#0ea5e9",
        }
    }

    /// Reference row for this status.
    #[must_use]
    pub fn row(self) -> Status {
        Status {
            id: self.as_str().to_string(),
            name: self.name().to_string(),
            color: self.color().to_string(),
        }
    }
}

impl fmt::Display for StatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusKey {
    type Err = crate::error::TrackletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "backlog" => Ok(Self::Backlog),
            "to-do" | "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "technical-review" => Ok(Self::TechnicalReview),
            "completed" => Ok(Self::Completed),
            "paused" => Ok(Self::Paused),
            other => Err(crate::error::TrackletError::StatusNotFound {
                id: other.to_string(),
            }),
        }
    }
}

/// The known urgency rankings, as a closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriorityKey {
    NoPriority,
    Low,
    Medium,
    High,
    Urgent,
}

impl PriorityKey {
    pub const ALL: [Self; 5] = [
        Self::NoPriority,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Urgent,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoPriority => "no-priority",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    /// Display name shown in the UI.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NoPriority => "No priority",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    /// Rank for urgency ordering (0 = none, 4 = urgent).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::NoPriority => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Urgent => 4,
        }
    }

    /// Reference row for this priority.
    #[must_use]
    pub fn row(self) -> Priority {
        Priority {
            id: self.as_str().to_string(),
            name: self.name().to_string(),
        }
    }
}

impl fmt::Display for PriorityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PriorityKey {
    type Err = crate::error::TrackletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no-priority" => Ok(Self::NoPriority),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(crate::error::TrackletError::PriorityNotFound {
                id: other.to_string(),
            }),
        }
    }
}

/// User presence as reported by the presence table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PresenceStatus {
    Online,
    Away,
    #[default]
    Offline,
}

impl PresenceStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Offline => "offline",
        }
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PresenceStatus {
    type Err = crate::error::TrackletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "away" => Ok(Self::Away),
            "offline" => Ok(Self::Offline),
            other => Err(crate::error::TrackletError::InvalidPresence {
                value: other.to_string(),
            }),
        }
    }
}

/// A status reference row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Status {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// A priority reference row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Priority {
    pub id: String,
    pub name: String,
}

/// A label row (many-to-many with issues).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// A user row as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Avatar reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user as returned by `users.getAll`: presence flattened to a single
/// optional field, role memberships flattened to role ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PresenceStatus>,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A role reference row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Role {
    pub id: String,
    pub name: String,
}

/// The primary issue entity, with label ids flattened from the join table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Sequential numeric id.
    pub id: i64,

    /// Human-readable identifier.
    pub identifier: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Always references an existing status row.
    pub status_id: String,

    /// Always references an existing priority row.
    pub priority_id: String,

    /// Optional assignee; null means unassigned.
    #[serde(default)]
    pub assignee_id: Option<String>,

    pub created_at: DateTime<Utc>,

    /// Bumped on every mutation.
    pub updated_at: DateTime<Utc>,

    /// Associated label ids.
    #[serde(default)]
    pub labels: Vec<String>,
}

/// Fields needed to insert an issue (seed/import path; there is no
/// create-issue RPC procedure).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub identifier: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status_id: String,
    pub priority_id: String,
    #[serde(default)]
    pub assignee_id: Option<String>,
}

/// Uploaded object metadata; immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: i64,
    pub key: String,
    pub bucket: String,
    pub filename: String,
    pub mime_type: String,
    pub size: i64,
    #[serde(default)]
    pub uploaded_by_user_id: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// File metadata persisted after an upload completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    pub key: String,
    pub bucket: String,
    pub filename: String,
    pub mime_type: String,
    pub size: i64,
    pub uploaded_by_user_id: String,
}

/// A user profile row linking a user to an avatar file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub avatar_file_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_key_roundtrip() {
        for key in StatusKey::ALL {
            assert_eq!(key.as_str().parse::<StatusKey>().unwrap(), key);
        }
        let key: StatusKey = serde_json::from_str("\"to-do\"").unwrap();
        assert_eq!(key, StatusKey::Todo);
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"to-do\"");
    }

    #[test]
    fn unknown_status_key_rejected() {
        let err = "does-not-exist".parse::<StatusKey>().unwrap_err();
        assert_eq!(err.to_string(), "Status not found: does-not-exist");
    }

    #[test]
    fn priority_ranks_are_ordered() {
        let ranks: Vec<u8> = PriorityKey::ALL.iter().map(|p| p.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn presence_parse() {
        assert_eq!("online".parse::<PresenceStatus>().unwrap(), PresenceStatus::Online);
        assert!("busy".parse::<PresenceStatus>().is_err());
        assert_eq!(PresenceStatus::default(), PresenceStatus::Offline);
    }

    #[test]
    fn status_metadata_mapping() {
        let row = StatusKey::InProgress.row();
        assert_eq!(row.id, "in-progress");
        assert_eq!(row.name, "In Progress");
        assert_eq!(row.color, "#facc15");
    }

    #[test]
    fn issue_serializes_camel_case() {
        let issue = Issue {
            id: 7,
            identifier: "TRK-7".to_string(),
            title: "Fix login".to_string(),
            description: None,
            status_id: "backlog".to_string(),
            priority_id: "medium".to_string(),
            assignee_id: None,
            created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            updated_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            labels: vec!["bug".to_string()],
        };
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"statusId\":\"backlog\""));
        assert!(json.contains("\"priorityId\":\"medium\""));
        assert!(json.contains("\"assigneeId\":null"));
        assert!(json.contains("\"labels\":[\"bug\"]"));
        assert!(!json.contains("description"));
    }

    #[test]
    fn user_summary_flattens_presence() {
        let user = UserSummary {
            id: "u1".to_string(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            image: None,
            status: Some(PresenceStatus::Away),
            roles: vec!["admin".to_string()],
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"status\":\"away\""));
        assert!(json.contains("\"roles\":[\"admin\"]"));
    }
}
