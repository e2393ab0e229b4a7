//! Interpretation of individual requirement lines.
//!
//! Sources hand back the lines of a requirements file verbatim. The resolver
//! runs each line through [`RequirementLine::parse`] to drop blanks and
//! comments, follow `-r` includes, and skip pip options it cannot act on.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use ypip_util::errors::{YpipError, YpipResult};

use crate::specifier::Specifier;

static PACKAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?P<spec>(?:===|~=|!=|==|<=|>=|<|>).*)?$",
    )
    .expect("valid package regex")
});

static NAME_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_.]+").expect("valid separator regex"));

/// What a single raw line of a requirements file means to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementLine {
    /// Blank, or a comment.
    Empty,
    /// `-r path` / `--requirement path`: another requirements file.
    Include(String),
    /// Any other pip option (`--index-url ...`, `-c constraints.txt`, ...).
    Option(String),
    /// A requirement string for the sources to interpret.
    Requirement(String),
}

impl RequirementLine {
    pub fn parse(raw: &str) -> Self {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            return Self::Empty;
        }

        for flag in ["--requirement", "-r"] {
            if let Some(rest) = line.strip_prefix(flag) {
                let path = rest.trim_start_matches('=').trim();
                if !path.is_empty() && (rest.starts_with([' ', '\t', '=']) || flag == "-r") {
                    return Self::Include(path.to_string());
                }
            }
        }

        if line.starts_with('-') && !is_editable(line) {
            return Self::Option(line.to_string());
        }

        Self::Requirement(line.to_string())
    }
}

fn is_editable(line: &str) -> bool {
    line.strip_prefix("-e")
        .or_else(|| line.strip_prefix("--editable"))
        .is_some_and(|rest| rest.starts_with([' ', '\t', '=']))
}

/// Remove a `#` comment. A `#` only starts a comment at the beginning of the
/// line or after whitespace, so URL fragments like `#egg=` survive.
fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    let bytes = line.as_bytes();
    for i in 1..bytes.len() {
        if bytes[i] == b'#' && bytes[i - 1].is_ascii_whitespace() {
            return &line[..i];
        }
    }
    line
}

/// A registry requirement: a package name optionally followed by a specifier.
#[derive(Debug, Clone)]
pub struct PackageRequirement {
    pub name: String,
    pub specifier: Option<Specifier>,
}

impl PackageRequirement {
    /// Parse `name[<op><version>[, <op><version>...]]`.
    pub fn parse(raw: &str) -> YpipResult<Self> {
        let caps = PACKAGE_RE
            .captures(raw.trim())
            .ok_or_else(|| YpipError::parse(raw, "not a package requirement"))?;
        let specifier = caps
            .name("spec")
            .map(|m| Specifier::parse(m.as_str()))
            .transpose()?;
        Ok(Self {
            name: caps["name"].to_string(),
            specifier,
        })
    }

    /// Split `raw` into its name and specifier text without compiling the
    /// specifier. `None` when `raw` does not have the shape `name[<op>...]`.
    pub fn split(raw: &str) -> Option<(&str, Option<&str>)> {
        let caps = PACKAGE_RE.captures(raw.trim())?;
        let name = caps.name("name")?.as_str();
        Some((name, caps.name("spec").map(|m| m.as_str())))
    }

    /// The PEP 503 normalised project name.
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

impl fmt::Display for PackageRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(ref spec) = self.specifier {
            write!(f, "{spec}")?;
        }
        Ok(())
    }
}

/// Lowercase a project name and collapse runs of `-`, `_` and `.` to `-`.
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATORS
        .replace_all(&name.to_ascii_lowercase(), "-")
        .into_owned()
}
