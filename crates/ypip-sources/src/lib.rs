//! Package sources: how a requirement string is recognised, identified,
//! compared, and expanded into the requirements it pulls in.
//!
//! Every source implements [`source::Source`]. The [`registry::SourceRegistry`]
//! holds them in priority order: hosted VCS providers, then local
//! requirements files, then the registry fallback.

pub mod fallback;
pub mod fetch;
pub mod registry;
pub mod requirements_file;
pub mod source;
pub mod vcs;
