//! Command dispatch and handler modules.

mod check;
mod resolve;
mod tree;

use miette::Result;
use ypip_ops::ops_resolve::ResolveOptions;

use crate::cli::{Cli, Command, Inputs};

/// Exit code when conflicts were collected rather than raised.
pub const EXIT_CONFLICTS: i32 = 2;

/// Route a parsed CLI invocation to the appropriate command handler and
/// return the process exit code.
pub fn dispatch(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Resolve { inputs, json } => resolve::exec(inputs.into(), json),
        Command::Tree {
            inputs,
            depth,
            why,
            inverted,
        } => tree::exec(inputs.into(), depth, why, inverted),
        Command::Check {
            specifier,
            versions,
        } => check::exec(&specifier, &versions),
    }
}

impl From<Inputs> for ResolveOptions {
    fn from(inputs: Inputs) -> Self {
        ResolveOptions {
            requirements: inputs.requirements,
            files: inputs.files,
            collect_conflicts: inputs.collect_conflicts,
            timeout_secs: inputs.timeout,
            requirements_file: inputs.requirements_file,
        }
    }
}
