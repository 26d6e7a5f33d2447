//! Demo dataset for local development.
//!
//! Statuses and priorities are seeded by the schema; this adds labels,
//! users, and a spread of issues with label associations.

use crate::error::Result;
use crate::model::{Label, NewIssue, PresenceStatus, PriorityKey, Role, StatusKey, User};
use crate::storage::SqliteStorage;
use chrono::Utc;

/// What `seed_demo` inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub labels: usize,
    pub issues: usize,
}

const LABELS: &[(&str, &str, &str)] = &[
    ("ui", "UI Enhancement", "purple"),
    ("bug", "Bug", "red"),
    ("feature", "Feature", "green"),
    ("documentation", "Documentation", "blue"),
    ("refactor", "Refactor", "yellow"),
    ("performance", "Performance", "orange"),
    ("design", "Design", "pink"),
    ("security", "Security", "gray"),
    ("accessibility", "Accessibility", "indigo"),
    ("testing", "Testing", "teal"),
    ("internationalization", "Internationalization", "cyan"),
];

const USERS: &[(&str, &str, &str)] = &[
    ("u-amara", "Amara Diallo", "amara@example.com"),
    ("u-jonas", "Jonas Weber", "jonas@example.com"),
    ("u-priya", "Priya Nair", "priya@example.com"),
    ("u-tomas", "Tomas Lindqvist", "tomas@example.com"),
];

const TITLES: &[&str] = &[
    "Group issues by workflow status",
    "Persist column order per user",
    "Avatar upload fails on slow networks",
    "Keyboard navigation for the board",
    "Label colors fail contrast checks",
    "Debounce presence updates",
    "Empty state for filtered views",
    "Sort assignee menu by recent activity",
    "Migrate date handling to UTC",
    "Cache issue list between route changes",
    "Add German translations",
    "Profile page loads avatar twice",
    "Split issue row into memoized parts",
    "Audit dependency licenses",
    "Document the RPC error contract",
    "Harden upload URL expiry handling",
    "Reduce board re-renders on drag",
    "Align priority icons with design spec",
    "Screen reader labels for selectors",
    "Flaky test in status grouping",
];

/// Populate a database with demo users, labels, and issues.
///
/// Idempotent enough for development use: rerunning against a seeded
/// database fails on unique constraints rather than duplicating data.
///
/// # Errors
///
/// Returns an error if any insert fails.
pub fn seed_demo(storage: &mut SqliteStorage) -> Result<SeedSummary> {
    let now = Utc::now();

    for (id, name, email) in USERS {
        storage.insert_user(&User {
            id: (*id).to_string(),
            name: (*name).to_string(),
            email: (*email).to_string(),
            image: None,
            created_at: now,
            updated_at: now,
        })?;
    }

    storage.insert_role(&Role {
        id: "admin".to_string(),
        name: "Administrator".to_string(),
    })?;
    storage.insert_role(&Role {
        id: "member".to_string(),
        name: "Member".to_string(),
    })?;
    storage.grant_role("u-amara", "admin")?;
    for (id, _, _) in USERS {
        storage.grant_role(id, "member")?;
    }

    storage.set_presence("u-amara", PresenceStatus::Online)?;
    storage.set_presence("u-jonas", PresenceStatus::Away)?;

    for (id, name, color) in LABELS {
        storage.insert_label(&Label {
            id: (*id).to_string(),
            name: (*name).to_string(),
            color: (*color).to_string(),
        })?;
    }

    let statuses = StatusKey::ALL;
    let priorities = PriorityKey::ALL;

    let mut issues = 0;
    for (n, title) in TITLES.iter().enumerate() {
        let status = statuses[n % statuses.len()];
        let priority = priorities[n % priorities.len()];
        let assignee = if n % 3 == 0 {
            None
        } else {
            Some(USERS[n % USERS.len()].0.to_string())
        };

        let issue_id = storage.create_issue(&NewIssue {
            identifier: format!("TRK-{}", n + 1),
            title: (*title).to_string(),
            description: Some(format!("Tracked as TRK-{}.", n + 1)),
            status_id: status.as_str().to_string(),
            priority_id: priority.as_str().to_string(),
            assignee_id: assignee,
        })?;

        // One to three labels per issue, cycling through the label set.
        for k in 0..=(n % 3) {
            let (label_id, _, _) = LABELS[(n + k) % LABELS.len()];
            storage.add_issue_label(issue_id, label_id)?;
        }
        issues += 1;
    }

    Ok(SeedSummary {
        users: USERS.len(),
        labels: LABELS.len(),
        issues,
    })
}
