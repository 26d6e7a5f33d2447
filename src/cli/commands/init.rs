//! `tl init` - create a workspace and its database.

use crate::error::Result;
use crate::storage::SqliteStorage;
use serde_json::json;
use tracing::info;

pub fn execute(force: bool, json_mode: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let paths = crate::config::init_workspace(&cwd, force)?;

    // Opening applies the schema and seeds the fixed reference sets.
    let storage = SqliteStorage::open(&paths.db_path)?;
    drop(storage);

    info!(path = %paths.tracklet_dir.display(), "workspace initialized");
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "workspace": paths.tracklet_dir,
                "database": paths.db_path,
            }))?
        );
    } else {
        println!("Initialized tracklet workspace at {}", paths.tracklet_dir.display());
    }
    Ok(())
}
