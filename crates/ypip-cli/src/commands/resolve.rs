//! Handler for `ypip resolve`.

use miette::Result;

use ypip_ops::ops_resolve::{self, ResolveOptions};
use ypip_util::errors::YpipError;

use super::EXIT_CONFLICTS;

pub fn exec(opts: ResolveOptions, json: bool) -> Result<i32> {
    let cwd = std::env::current_dir().map_err(YpipError::Io)?;
    let result = ops_resolve::resolve(&cwd, &opts)?;
    print!("{}", ops_resolve::render(&result, json)?);
    Ok(if result.conflicts.is_empty() {
        0
    } else {
        EXIT_CONFLICTS
    })
}
