//! Builders for test rows.

use chrono::Utc;
use tracklet::model::{Label, NewFile, NewIssue, User};
use tracklet::storage::SqliteStorage;

pub fn user(id: &str) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        name: format!("User {id}"),
        email: format!("{id}@example.com"),
        image: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn label(id: &str) -> Label {
    Label {
        id: id.to_string(),
        name: format!("Label {id}"),
        color: "gray".to_string(),
    }
}

pub fn new_issue(identifier: &str) -> NewIssue {
    NewIssue {
        identifier: identifier.to_string(),
        title: format!("Issue {identifier}"),
        description: None,
        status_id: "backlog".to_string(),
        priority_id: "medium".to_string(),
        assignee_id: None,
    }
}

/// Insert a minimal issue and return its id.
pub fn create_issue(storage: &mut SqliteStorage, identifier: &str) -> i64 {
    storage
        .create_issue(&new_issue(identifier))
        .expect("create issue")
}

pub fn new_file(key: &str, uploader: &str) -> NewFile {
    NewFile {
        key: key.to_string(),
        bucket: "avatars-test".to_string(),
        filename: "avatar.png".to_string(),
        mime_type: "image/png".to_string(),
        size: 1024,
        uploaded_by_user_id: uploader.to_string(),
    }
}
