//! Database schema definitions and reference-data seeding.

use crate::model::{PriorityKey, StatusKey};
use rusqlite::{Connection, Result};

pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The complete SQL schema for the tracker database.
pub const SCHEMA_SQL: &str = r"
    -- Fixed reference sets
    CREATE TABLE IF NOT EXISTS statuses (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        color TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS priorities (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS labels (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        color TEXT NOT NULL
    );

    -- Users
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        image TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS user_presence (
        user_id TEXT PRIMARY KEY,
        status TEXT NOT NULL DEFAULT 'offline'
            CHECK (status IN ('online', 'away', 'offline')),
        last_updated_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    );

    CREATE TABLE IF NOT EXISTS user_roles (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS user_to_role (
        user_id TEXT NOT NULL,
        role_id TEXT NOT NULL,
        PRIMARY KEY (user_id, role_id),
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (role_id) REFERENCES user_roles(id) ON DELETE CASCADE
    );

    -- Issues
    CREATE TABLE IF NOT EXISTS issues (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        identifier TEXT NOT NULL UNIQUE,
        title TEXT NOT NULL,
        description TEXT,
        status_id TEXT NOT NULL,
        priority_id TEXT NOT NULL,
        assignee_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (status_id) REFERENCES statuses(id),
        FOREIGN KEY (priority_id) REFERENCES priorities(id),
        FOREIGN KEY (assignee_id) REFERENCES users(id),
        CHECK (length(title) >= 1)
    );

    CREATE INDEX IF NOT EXISTS idx_issues_status_id ON issues(status_id);
    CREATE INDEX IF NOT EXISTS idx_issues_priority_id ON issues(priority_id);
    CREATE INDEX IF NOT EXISTS idx_issues_assignee_id ON issues(assignee_id);
    CREATE INDEX IF NOT EXISTS idx_issues_updated_at ON issues(updated_at);

    -- Issue/label join: a given (issue, label) pair is unique
    CREATE TABLE IF NOT EXISTS issue_labels (
        issue_id INTEGER NOT NULL,
        label_id TEXT NOT NULL,
        PRIMARY KEY (issue_id, label_id),
        FOREIGN KEY (issue_id) REFERENCES issues(id) ON DELETE CASCADE,
        FOREIGN KEY (label_id) REFERENCES labels(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_issue_labels_label_id ON issue_labels(label_id);

    -- Uploaded object metadata; immutable after creation
    CREATE TABLE IF NOT EXISTS files (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        key TEXT NOT NULL UNIQUE,
        bucket TEXT NOT NULL,
        filename TEXT NOT NULL,
        mime_type TEXT NOT NULL,
        size INTEGER NOT NULL,
        uploaded_by_user_id TEXT,
        uploaded_at TEXT NOT NULL,
        FOREIGN KEY (uploaded_by_user_id) REFERENCES users(id) ON DELETE SET NULL
    );

    CREATE TABLE IF NOT EXISTS user_profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id TEXT,
        avatar_file_id INTEGER,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (avatar_file_id) REFERENCES files(id)
    );
    CREATE INDEX IF NOT EXISTS idx_user_profiles_user_id ON user_profiles(user_id);

    -- Metadata
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
";

/// Apply the schema to the database.
///
/// This uses `execute_batch` to run the entire DDL script.
/// It is idempotent because all statements use `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set journal mode to WAL for concurrency
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Enable foreign keys
    conn.pragma_update(None, "foreign_keys", "ON")?;

    seed_reference_data(conn)?;

    Ok(())
}

/// Insert the fixed status and priority sets.
///
/// Idempotent: existing rows are left untouched, so a renamed status keeps
/// its name across reopens.
///
/// # Errors
///
/// Returns an error if an insert fails.
pub fn seed_reference_data(conn: &Connection) -> Result<()> {
    for key in StatusKey::ALL {
        conn.execute(
            "INSERT OR IGNORE INTO statuses (id, name, color) VALUES (?, ?, ?)",
            rusqlite::params![key.as_str(), key.name(), key.color()],
        )?;
    }
    for key in PriorityKey::ALL {
        conn.execute(
            "INSERT OR IGNORE INTO priorities (id, name) VALUES (?, ?)",
            rusqlite::params![key.as_str(), key.name()],
        )?;
    }
    Ok(())
}
