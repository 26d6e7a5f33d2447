//! `tl serve` - run the RPC loop on stdio.

use crate::config::CliOverrides;
use crate::error::Result;
use crate::rpc::server::serve_stdio;

pub fn execute(overrides: &CliOverrides) -> Result<()> {
    let (mut router, _paths) = super::open_router(overrides)?;
    serve_stdio(&mut router)
}
