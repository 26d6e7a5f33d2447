//! Line-delimited JSON request/response loop.
//!
//! One request per line on stdin, one response per line on stdout. Parse
//! failures produce an `INVALID_PARAMS` response with a null id instead of
//! killing the loop.

use crate::error::{Result, TrackletError};
use crate::files::ObjectStore;
use crate::rpc::{Router, RpcRequest, RpcResponse};
use std::io::{BufRead, Write};
use tracing::info;

/// Handle one raw request line.
pub fn handle_line<S: ObjectStore>(router: &mut Router<S>, line: &str) -> RpcResponse {
    let request: RpcRequest = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => {
            return RpcResponse::err(
                None,
                &TrackletError::InvalidParams {
                    reason: format!("malformed request: {e}"),
                },
            );
        }
    };

    match router.dispatch(&request.method, request.params) {
        Ok(result) => RpcResponse::ok(request.id, result),
        Err(e) => RpcResponse::err(request.id, &e),
    }
}

/// Serve requests from `input` until EOF, writing responses to `output`.
///
/// # Errors
///
/// Returns an error if reading or writing the transport itself fails;
/// handler errors become error responses and do not stop the loop.
pub fn serve<S: ObjectStore>(
    router: &mut Router<S>,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(router, &line);
        serde_json::to_writer(&mut output, &response)?;
        output.write_all(b"\n")?;
        output.flush()?;
    }
    Ok(())
}

/// Serve on stdin/stdout until the peer closes the pipe.
///
/// # Errors
///
/// Returns an error if stdio reads or writes fail.
pub fn serve_stdio<S: ObjectStore>(router: &mut Router<S>) -> Result<()> {
    info!("serving rpc on stdio");
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    serve(router, stdin.lock(), stdout.lock())
}
