//! `tl call` - invoke a single RPC method and print the result.

use crate::config::CliOverrides;
use crate::error::{Result, TrackletError};
use serde_json::Value;

pub fn execute(method: &str, params: Option<&str>, overrides: &CliOverrides) -> Result<()> {
    let params = params
        .map(|raw| {
            serde_json::from_str::<Value>(raw).map_err(|e| TrackletError::InvalidParams {
                reason: format!("params must be valid JSON: {e}"),
            })
        })
        .transpose()?;

    let (mut router, _paths) = super::open_router(overrides)?;
    let result = router.dispatch(method, params)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
