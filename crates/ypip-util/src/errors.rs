use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all ypip operations.
#[derive(Debug, Error, Diagnostic)]
pub enum YpipError {
    /// A version, specifier or requirement string did not match its grammar.
    #[error("Could not parse \"{input}\": {reason}")]
    #[diagnostic(help("Version strings follow PEP 440, e.g. 1!2.0rc1.post3.dev4+local.7"))]
    Parse { input: String, reason: String },

    /// A node with this identity is already in the dependency graph.
    #[error("<{identity}> already exists")]
    NodeExists { identity: String },

    /// No node with this identity is in the dependency graph.
    #[error("No such node <{identity}>")]
    NodeDoesNotExist { identity: String },

    /// Two requirements share an identity but disagree on their version.
    #[error("Version conflict for {identity}: \"{existing}\" vs \"{incoming}\"")]
    #[diagnostic(help("Pin both requirements to the same reference"))]
    Conflict {
        identity: String,
        existing: String,
        incoming: String,
    },

    /// Fatal failure retrieving a requirements list (network or local file).
    #[error("Fetch failed: {message}")]
    Fetch { message: String },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.ypip/config.toml for syntax errors"))]
    Config { message: String },
}

impl YpipError {
    /// Shorthand for a [`YpipError::Parse`] naming the offending input.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`YpipError::Fetch`].
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
        }
    }
}

/// Result alias for operations whose error kind callers match on.
pub type YpipResult<T> = Result<T, YpipError>;
