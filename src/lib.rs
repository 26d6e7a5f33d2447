//! Tracklet: an issue tracker backend.
//!
//! A relational schema over `SQLite` (issues, statuses, priorities, labels,
//! users, presence, roles, files, profiles), validated query/mutation
//! handlers, and a typed JSON RPC boundary with cache-invalidation hints.

pub mod cli;
pub mod config;
pub mod error;
pub mod files;
pub mod logging;
pub mod model;
pub mod rpc;
pub mod storage;

pub use error::{ErrorCode, Result, TrackletError};
