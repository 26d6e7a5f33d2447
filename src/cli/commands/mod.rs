//! Command implementations.

pub mod call;
pub mod init;
pub mod schema;
pub mod seed;
pub mod serve;

use crate::config::{CliOverrides, ConfigPaths};
use crate::error::Result;
use crate::files::PresignedStore;
use crate::rpc::Router;
use crate::storage::SqliteStorage;

/// Resolve the workspace and build a router over its database.
pub(crate) fn open_router(overrides: &CliOverrides) -> Result<(Router, ConfigPaths)> {
    let paths = crate::config::resolve(overrides)?;
    let storage = SqliteStorage::open_with_timeout(&paths.db_path, overrides.lock_timeout)?;
    let os = &paths.config.object_store;
    let store = PresignedStore::new(
        os.endpoint.clone(),
        os.bucket.clone(),
        os.signing_secret.clone(),
        os.url_ttl_secs,
    );
    Ok((Router::new(storage, store), paths))
}
