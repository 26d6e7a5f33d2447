//! The RPC boundary: request/response envelope, router, typed client, and
//! the stdio server loop.
//!
//! Procedures are named `namespace.procedure` (e.g. `issues.updateStatus`).
//! Params are validated into typed structs before any handler body runs;
//! handler errors are logged once at the dispatch boundary and surfaced as
//! `{code, message}` pairs, never swallowed.

pub mod client;
pub mod handlers;
pub mod server;

pub use client::{LocalTransport, QueryKey, RpcClient, Transport};
pub use handlers::Router;

use crate::error::TrackletError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single RPC call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcRequest {
    /// Caller-chosen correlation id, echoed back in the response.
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// Error payload surfaced to the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcError {
    pub code: String,
    pub message: String,
}

/// The reply to one [`RpcRequest`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    #[must_use]
    pub const fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            id,
            result: Some(result),
            error: None,
        }
    }

    #[must_use]
    pub fn err(id: Option<Value>, error: &TrackletError) -> Self {
        Self {
            id,
            result: None,
            error: Some(RpcError {
                code: error.code().as_str().to_string(),
                message: error.to_string(),
            }),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
