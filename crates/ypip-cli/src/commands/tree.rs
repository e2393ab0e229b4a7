//! Handler for `ypip tree`.

use miette::Result;

use ypip_ops::ops_resolve::ResolveOptions;
use ypip_ops::ops_tree::{self, TreeOptions};
use ypip_util::errors::YpipError;

use super::EXIT_CONFLICTS;

pub fn exec(
    resolve: ResolveOptions,
    depth: Option<u32>,
    why: Option<String>,
    inverted: Option<String>,
) -> Result<i32> {
    let cwd = std::env::current_dir().map_err(YpipError::Io)?;

    let opts = TreeOptions {
        resolve,
        depth: depth.map(|d| d as usize),
        why,
        inverted,
    };

    let conflicts = ops_tree::tree(&cwd, &opts)?;
    Ok(if conflicts == 0 { 0 } else { EXIT_CONFLICTS })
}
