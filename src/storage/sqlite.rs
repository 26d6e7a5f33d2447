//! `SQLite` storage implementation.
//!
//! One connection per handle; callers inject the handle instead of reaching
//! for a process-wide singleton, so tests can run against in-memory
//! databases.

use crate::error::{Result, TrackletError};
use crate::model::{
    FileRecord, Issue, Label, NewFile, NewIssue, PresenceStatus, Priority, Role, Status, User,
    UserProfile, UserSummary,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, types::Type};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

fn parse_ts(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl SqliteStorage {
    /// Open a new connection to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_timeout(path, None)
    }

    /// Open a new connection with an optional busy timeout (ms).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema
    /// application fails.
    pub fn open_with_timeout(path: &Path, lock_timeout_ms: Option<u64>) -> Result<Self> {
        let conn = Connection::open(path)?;
        if let Some(timeout) = lock_timeout_ms {
            conn.busy_timeout(Duration::from_millis(timeout))?;
        }
        super::schema::apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::schema::apply_schema(&conn)?;
        Ok(Self { conn })
    }

    // =========================================================================
    // Queries (side-effect free, deterministic order)
    // =========================================================================

    /// All statuses, ordered by id ascending.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub fn all_statuses(&self) -> Result<Vec<Status>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM statuses ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Status {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// All priorities, ordered by id ascending.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub fn all_priorities(&self) -> Result<Vec<Priority>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM priorities ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Priority {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// All labels, ordered by name ascending (id breaks ties).
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub fn all_labels(&self) -> Result<Vec<Label>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, color FROM labels ORDER BY name ASC, id ASC")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Label {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    color: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// All users ordered by id descending, with presence flattened to a
    /// single optional `status` field and role memberships to a list of
    /// role ids.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure or a malformed presence value.
    pub fn all_users(&self) -> Result<Vec<UserSummary>> {
        let mut role_map: HashMap<String, Vec<String>> = HashMap::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT user_id, role_id FROM user_to_role ORDER BY role_id ASC")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (user_id, role_id) = row?;
                role_map.entry(user_id).or_default().push(role_id);
            }
        }

        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.name, u.email, u.image, p.status
             FROM users u
             LEFT JOIN user_presence p ON p.user_id = u.id
             ORDER BY u.id DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut users = Vec::with_capacity(rows.len());
        for (id, name, email, image, presence) in rows {
            let status = presence.map(|s| PresenceStatus::from_str(&s)).transpose()?;
            let roles = role_map.remove(&id).unwrap_or_default();
            users.push(UserSummary {
                id,
                name,
                email,
                image,
                status,
                roles,
            });
        }
        Ok(users)
    }

    /// All issues ordered most-recently-updated first (id descending breaks
    /// ties), with the label join rows flattened to a list of label ids.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub fn all_issues(&self) -> Result<Vec<Issue>> {
        let mut label_map: HashMap<i64, Vec<String>> = HashMap::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT issue_id, label_id FROM issue_labels ORDER BY label_id ASC")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })?;
            for row in rows {
                let (issue_id, label_id) = row?;
                label_map.entry(issue_id).or_default().push(label_id);
            }
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, identifier, title, description, status_id, priority_id,
                    assignee_id, created_at, updated_at
             FROM issues
             ORDER BY updated_at DESC, id DESC",
        )?;
        let rows = stmt
            .query_map([], Self::issue_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let issues = rows
            .into_iter()
            .map(|mut issue| {
                issue.labels = label_map.remove(&issue.id).unwrap_or_default();
                issue
            })
            .collect();
        Ok(issues)
    }

    /// Fetch a single issue with its label ids, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub fn get_issue(&self, id: i64) -> Result<Option<Issue>> {
        let issue = self
            .conn
            .query_row(
                "SELECT id, identifier, title, description, status_id, priority_id,
                        assignee_id, created_at, updated_at
                 FROM issues WHERE id = ?",
                [id],
                Self::issue_from_row,
            )
            .optional()?;

        let Some(mut issue) = issue else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare("SELECT label_id FROM issue_labels WHERE issue_id = ? ORDER BY label_id ASC")?;
        issue.labels = stmt
            .query_map([id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(Some(issue))
    }

    fn issue_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Issue> {
        Ok(Issue {
            id: row.get(0)?,
            identifier: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            status_id: row.get(4)?,
            priority_id: row.get(5)?,
            assignee_id: row.get(6)?,
            created_at: parse_ts(7, &row.get::<_, String>(7)?)?,
            updated_at: parse_ts(8, &row.get::<_, String>(8)?)?,
            labels: Vec::new(),
        })
    }

    fn issue_exists(&self, id: i64) -> Result<bool> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM issues WHERE id = ?")?
            .exists([id])?;
        Ok(exists)
    }

    fn status_exists(&self, id: &str) -> Result<bool> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM statuses WHERE id = ?")?
            .exists([id])?;
        Ok(exists)
    }

    fn priority_exists(&self, id: &str) -> Result<bool> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM priorities WHERE id = ?")?
            .exists([id])?;
        Ok(exists)
    }

    // =========================================================================
    // Issue mutations (validate-then-write, one logical write each)
    // =========================================================================

    /// Set or clear the assignee of an issue.
    ///
    /// Writes unconditionally: a missing issue id affects zero rows and is
    /// not an error, and the target user is not looked up first (the UI only
    /// offers known users). The foreign key still rejects a dangling user id.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure, including an assignee id that
    /// does not reference an existing user.
    pub fn update_assignee(&mut self, issue_id: i64, user_id: Option<&str>) -> Result<()> {
        self.conn.execute(
            "UPDATE issues SET assignee_id = ?, updated_at = ? WHERE id = ?",
            rusqlite::params![user_id, Utc::now().to_rfc3339(), issue_id],
        )?;
        Ok(())
    }

    /// Move an issue to a different status.
    ///
    /// Validates that both the issue and the target status exist before
    /// writing, so the caller sees a domain-level not-found instead of a raw
    /// constraint violation.
    ///
    /// # Errors
    ///
    /// Returns [`TrackletError::IssueNotFound`] or
    /// [`TrackletError::StatusNotFound`] if either side is missing.
    pub fn update_status(&mut self, issue_id: i64, status_id: &str) -> Result<()> {
        if !self.issue_exists(issue_id)? {
            return Err(TrackletError::IssueNotFound { id: issue_id });
        }
        if !self.status_exists(status_id)? {
            return Err(TrackletError::StatusNotFound {
                id: status_id.to_string(),
            });
        }
        self.conn.execute(
            "UPDATE issues SET status_id = ?, updated_at = ? WHERE id = ?",
            rusqlite::params![status_id, Utc::now().to_rfc3339(), issue_id],
        )?;
        Ok(())
    }

    /// Change the priority of an issue. Same validation pattern as
    /// [`Self::update_status`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackletError::IssueNotFound`] or
    /// [`TrackletError::PriorityNotFound`] if either side is missing.
    pub fn update_priority(&mut self, issue_id: i64, priority_id: &str) -> Result<()> {
        if !self.issue_exists(issue_id)? {
            return Err(TrackletError::IssueNotFound { id: issue_id });
        }
        if !self.priority_exists(priority_id)? {
            return Err(TrackletError::PriorityNotFound {
                id: priority_id.to_string(),
            });
        }
        self.conn.execute(
            "UPDATE issues SET priority_id = ?, updated_at = ? WHERE id = ?",
            rusqlite::params![priority_id, Utc::now().to_rfc3339(), issue_id],
        )?;
        Ok(())
    }

    // =========================================================================
    // Insertion paths (seed/import; not exposed over RPC)
    // =========================================================================

    /// Insert an issue and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. a dangling status,
    /// priority, or assignee reference).
    pub fn create_issue(&mut self, issue: &NewIssue) -> Result<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO issues (identifier, title, description, status_id, priority_id,
                                 assignee_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                issue.identifier,
                issue.title,
                issue.description,
                issue.status_id,
                issue.priority_id,
                issue.assignee_id,
                now,
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Associate a label with an issue. Duplicate pairs are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (unknown issue or label).
    pub fn add_issue_label(&mut self, issue_id: i64, label_id: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO issue_labels (issue_id, label_id) VALUES (?, ?)",
            rusqlite::params![issue_id, label_id],
        )?;
        Ok(())
    }

    /// Insert a label row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_label(&mut self, label: &Label) -> Result<()> {
        self.conn.execute(
            "INSERT INTO labels (id, name, color) VALUES (?, ?, ?)",
            rusqlite::params![label.id, label.name, label.color],
        )?;
        Ok(())
    }

    /// Insert a user row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (e.g. duplicate email).
    pub fn insert_user(&mut self, user: &User) -> Result<()> {
        self.conn.execute(
            "INSERT INTO users (id, name, email, image, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                user.id,
                user.name,
                user.email,
                user.image,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Upsert a user's presence status.
    ///
    /// # Errors
    ///
    /// Returns [`TrackletError::UserNotFound`] if the user does not exist.
    pub fn set_presence(&mut self, user_id: &str, status: PresenceStatus) -> Result<()> {
        let exists = self
            .conn
            .prepare("SELECT 1 FROM users WHERE id = ?")?
            .exists([user_id])?;
        if !exists {
            return Err(TrackletError::UserNotFound {
                id: user_id.to_string(),
            });
        }
        self.conn.execute(
            "INSERT INTO user_presence (user_id, status, last_updated_at) VALUES (?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET status = excluded.status,
                                                last_updated_at = excluded.last_updated_at",
            rusqlite::params![user_id, status.as_str(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Insert a role row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_role(&mut self, role: &Role) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO user_roles (id, name) VALUES (?, ?)",
            rusqlite::params![role.id, role.name],
        )?;
        Ok(())
    }

    /// Grant a role to a user. Duplicate grants are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (unknown user or role).
    pub fn grant_role(&mut self, user_id: &str, role_id: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO user_to_role (user_id, role_id) VALUES (?, ?)",
            rusqlite::params![user_id, role_id],
        )?;
        Ok(())
    }

    // =========================================================================
    // Profiles and files
    // =========================================================================

    /// Create an (empty) profile row for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (unknown user).
    pub fn create_profile(&mut self, user_id: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO user_profiles (user_id) VALUES (?)",
            [user_id],
        )?;
        Ok(())
    }

    /// Link a persisted file to a user's profile as their avatar.
    ///
    /// The file must already exist (`files.add` runs first); the foreign key
    /// enforces that ordering.
    ///
    /// # Errors
    ///
    /// Returns [`TrackletError::ProfileNotFound`] if the user has no profile
    /// row, or a constraint error for an unknown file id.
    pub fn update_profile_avatar(&mut self, user_id: &str, avatar_file_id: i64) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE user_profiles SET avatar_file_id = ? WHERE user_id = ?",
            rusqlite::params![avatar_file_id, user_id],
        )?;
        if changed == 0 {
            return Err(TrackletError::ProfileNotFound {
                user_id: user_id.to_string(),
            });
        }
        Ok(())
    }

    /// Fetch the profile row for a user, or `None`.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let profile = self
            .conn
            .query_row(
                "SELECT id, user_id, avatar_file_id FROM user_profiles WHERE user_id = ?",
                [user_id],
                |row| {
                    Ok(UserProfile {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        avatar_file_id: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(profile)
    }

    /// Persist file metadata after uploads complete. Returns the records
    /// with their assigned ids. All rows are inserted in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails (the transaction is rolled back).
    pub fn add_files(&mut self, files: &[NewFile]) -> Result<Vec<FileRecord>> {
        let tx = self.conn.transaction()?;
        let mut records = Vec::with_capacity(files.len());
        for file in files {
            let uploaded_at = Utc::now();
            tx.execute(
                "INSERT INTO files (key, bucket, filename, mime_type, size,
                                    uploaded_by_user_id, uploaded_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    file.key,
                    file.bucket,
                    file.filename,
                    file.mime_type,
                    file.size,
                    file.uploaded_by_user_id,
                    uploaded_at.to_rfc3339(),
                ],
            )?;
            records.push(FileRecord {
                id: tx.last_insert_rowid(),
                key: file.key.clone(),
                bucket: file.bucket.clone(),
                filename: file.filename.clone(),
                mime_type: file.mime_type.clone(),
                size: file.size,
                uploaded_by_user_id: Some(file.uploaded_by_user_id.clone()),
                uploaded_at,
            });
        }
        tx.commit()?;
        Ok(records)
    }

    /// Number of issues in the database.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure.
    pub fn count_issues(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM issues", [], |row| row.get(0))?;
        Ok(count)
    }
}
