//! CLI argument definitions for ypip.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ypip",
    version,
    about = "Recursive requirement resolution for pip packages hosted in VCS repositories",
    long_about = "ypip walks requirements files and the requirements.txt of every GitHub, \
                  GitLab or Bitbucket repository they reference, and reports the flattened \
                  requirement list or the first conflicting pair of references."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Where requirements come from and how they are fetched.
#[derive(Args, Debug)]
pub struct Inputs {
    /// Requirement strings (defaults to ./requirements.txt when none are given)
    pub requirements: Vec<String>,
    /// Read requirements from a file (repeatable)
    #[arg(short = 'r', long = "requirement", value_name = "FILE")]
    pub files: Vec<PathBuf>,
    /// Name of the requirements file fetched from repositories
    #[arg(long, value_name = "NAME")]
    pub requirements_file: Option<String>,
    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
    /// Report every conflict instead of stopping at the first
    #[arg(long)]
    pub collect_conflicts: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve requirements and print the flattened list
    Resolve {
        #[command(flatten)]
        inputs: Inputs,
        /// Print JSON instead of one requirement per line
        #[arg(long)]
        json: bool,
    },

    /// Display the dependency tree
    Tree {
        #[command(flatten)]
        inputs: Inputs,
        /// Maximum depth
        #[arg(long)]
        depth: Option<u32>,
        /// Explain why a package is included
        #[arg(long, value_name = "PACKAGE")]
        why: Option<String>,
        /// Show what depends on a package
        #[arg(long, value_name = "PACKAGE")]
        inverted: Option<String>,
    },

    /// Test versions against a PEP 440 specifier
    Check {
        /// Specifier, e.g. ">= 1.0, < 2"
        specifier: String,
        /// Versions to test
        #[arg(required = true)]
        versions: Vec<String>,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
