//! Logging setup built on `tracing`.

use crate::error::{Result, TrackletError};
use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr.
///
/// `TRACKLET_LOG` overrides the level chosen from the verbosity flags.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_env("TRACKLET_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| TrackletError::Config(format!("failed to initialize logging: {e}")))
}

/// Test variant: captured output, debug level, never panics on double init.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
