//! `tl seed` - load the demo dataset.

use crate::config::CliOverrides;
use crate::error::Result;
use crate::storage::{SqliteStorage, seed_demo};
use serde_json::json;

pub fn execute(json_mode: bool, overrides: &CliOverrides) -> Result<()> {
    let paths = crate::config::resolve(overrides)?;
    let mut storage = SqliteStorage::open_with_timeout(&paths.db_path, overrides.lock_timeout)?;
    let summary = seed_demo(&mut storage)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "users": summary.users,
                "labels": summary.labels,
                "issues": summary.issues,
            }))?
        );
    } else {
        println!(
            "Seeded {} users, {} labels, {} issues",
            summary.users, summary.labels, summary.issues
        );
    }
    Ok(())
}
