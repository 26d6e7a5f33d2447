//! Configuration management for `tracklet`.
//!
//! Sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Environment variables (`TRACKLET_*`)
//! 3. Project config (.tracklet/config.yaml)
//! 4. Defaults

use crate::error::{Result, TrackletError};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory marking an initialized workspace.
pub const TRACKLET_DIR: &str = ".tracklet";
/// Database filename inside the workspace directory.
const DEFAULT_DB_FILENAME: &str = "tracklet.db";
/// Config filename inside the workspace directory.
const CONFIG_FILENAME: &str = "config.yaml";

/// Object storage settings for avatar uploads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectStoreConfig {
    pub endpoint: String,
    pub bucket: String,
    pub signing_secret: String,
    pub url_ttl_secs: u64,
}

impl Default for ObjectStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9000".to_string(),
            bucket: "tracklet-avatars".to_string(),
            signing_secret: "dev-secret".to_string(),
            url_ttl_secs: 60,
        }
    }
}

/// Workspace configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub database: String,
    pub actor: Option<String>,
    pub object_store: ObjectStoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DEFAULT_DB_FILENAME.to_string(),
            actor: None,
            object_store: ObjectStoreConfig::default(),
        }
    }
}

impl Config {
    /// Load from a workspace directory, falling back to defaults when the
    /// file is absent, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(tracklet_dir: &Path) -> Result<Self> {
        let path = tracklet_dir.join(CONFIG_FILENAME);
        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_yaml::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(actor) = env::var("TRACKLET_ACTOR") {
            self.actor = Some(actor);
        }
        if let Ok(endpoint) = env::var("TRACKLET_S3_ENDPOINT") {
            self.object_store.endpoint = endpoint;
        }
        if let Ok(bucket) = env::var("TRACKLET_S3_BUCKET") {
            self.object_store.bucket = bucket;
        }
        if let Ok(secret) = env::var("TRACKLET_SIGNING_SECRET") {
            self.object_store.signing_secret = secret;
        }
    }

    /// Write this config to the workspace directory.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, tracklet_dir: &Path) -> Result<()> {
        let contents = serde_yaml::to_string(self)?;
        fs::write(tracklet_dir.join(CONFIG_FILENAME), contents)?;
        Ok(())
    }
}

/// Values taken from global CLI flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub actor: Option<String>,
    pub lock_timeout: Option<u64>,
}

/// Resolved paths and config for this workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub tracklet_dir: PathBuf,
    pub db_path: PathBuf,
    pub config: Config,
}

/// Walk up from `start` looking for a `.tracklet` directory.
#[must_use]
pub fn discover_dir(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(TRACKLET_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

/// Resolve the workspace from CLI overrides and the current directory.
///
/// An explicit `--db` bypasses discovery; otherwise the nearest `.tracklet`
/// ancestor wins.
///
/// # Errors
///
/// Returns [`TrackletError::NotInitialized`] when no workspace is found, or
/// a config parse error.
pub fn resolve(overrides: &CliOverrides) -> Result<ConfigPaths> {
    if let Some(db) = &overrides.db {
        let tracklet_dir = db
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        let mut config = Config::load(&tracklet_dir).unwrap_or_default();
        if let Some(actor) = &overrides.actor {
            config.actor = Some(actor.clone());
        }
        return Ok(ConfigPaths {
            tracklet_dir,
            db_path: db.clone(),
            config,
        });
    }

    let cwd = env::current_dir()?;
    let tracklet_dir = discover_dir(&cwd).ok_or(TrackletError::NotInitialized)?;
    let mut config = Config::load(&tracklet_dir)?;
    if let Some(actor) = &overrides.actor {
        config.actor = Some(actor.clone());
    }
    let db_path = tracklet_dir.join(&config.database);
    Ok(ConfigPaths {
        tracklet_dir,
        db_path,
        config,
    })
}

/// Create a `.tracklet` workspace under `root`.
///
/// # Errors
///
/// Returns [`TrackletError::AlreadyInitialized`] unless `force` is set, or
/// an I/O error.
pub fn init_workspace(root: &Path, force: bool) -> Result<ConfigPaths> {
    let tracklet_dir = root.join(TRACKLET_DIR);
    if tracklet_dir.join(CONFIG_FILENAME).exists() && !force {
        return Err(TrackletError::AlreadyInitialized {
            path: tracklet_dir,
        });
    }
    fs::create_dir_all(&tracklet_dir)?;
    let config = Config::default();
    config.save(&tracklet_dir)?;
    let db_path = tracklet_dir.join(&config.database);
    Ok(ConfigPaths {
        tracklet_dir,
        db_path,
        config,
    })
}
