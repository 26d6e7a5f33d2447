//! `tl schema` - print param schemas for the RPC surface.

use crate::error::Result;
use crate::rpc::handlers::method_schemas;

pub fn execute() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&method_schemas())?);
    Ok(())
}
