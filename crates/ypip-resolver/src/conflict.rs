//! Version conflict detection results and reporting.

use std::fmt;

use serde::Serialize;
use ypip_util::errors::YpipError;

/// A report of all version conflicts encountered during resolution.
#[derive(Debug, Default, Serialize)]
pub struct ConflictReport {
    pub conflicts: Vec<VersionConflict>,
}

/// Two requirements that share an identity but disagree on their version.
/// The node keeps `existing`; `incoming` was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionConflict {
    pub identity: String,
    pub existing: String,
    pub incoming: String,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: VersionConflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No version conflicts.");
        }
        writeln!(f, "Version conflicts ({}):", self.conflicts.len())?;
        for c in &self.conflicts {
            writeln!(f, "  {c}")?;
        }
        Ok(())
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: kept \"{}\", rejected \"{}\"",
            self.identity, self.existing, self.incoming
        )
    }
}

impl From<VersionConflict> for YpipError {
    fn from(c: VersionConflict) -> Self {
        YpipError::Conflict {
            identity: c.identity,
            existing: c.existing,
            incoming: c.incoming,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict() -> VersionConflict {
        VersionConflict {
            identity: "lib:github org/repo".to_string(),
            existing: "git+https://github.com/org/repo.git@v1#egg=lib".to_string(),
            incoming: "git+https://github.com/org/repo.git@v2#egg=lib".to_string(),
        }
    }

    #[test]
    fn empty_report() {
        let report = ConflictReport::new();
        assert!(report.is_empty());
        assert_eq!(report.len(), 0);
        assert_eq!(report.to_string(), "No version conflicts.");
    }

    #[test]
    fn report_with_conflicts() {
        let mut report = ConflictReport::new();
        report.add(conflict());
        assert!(!report.is_empty());
        assert_eq!(report.len(), 1);
        let s = report.to_string();
        assert!(s.starts_with("Version conflicts (1):"));
        assert!(s.contains("lib:github org/repo: kept"));
        assert!(s.contains("@v2#egg=lib"));
    }

    #[test]
    fn converts_to_error() {
        let err: YpipError = conflict().into();
        assert_eq!(
            err.to_string(),
            "Version conflict for lib:github org/repo: \
             \"git+https://github.com/org/repo.git@v1#egg=lib\" vs \
             \"git+https://github.com/org/repo.git@v2#egg=lib\""
        );
    }
}
