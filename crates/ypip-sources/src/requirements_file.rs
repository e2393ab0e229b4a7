//! Requirements files on the local filesystem.

use std::path::{Path, PathBuf};

use ypip_util::errors::{YpipError, YpipResult};

use crate::source::Source;

/// A source for paths to existing requirements files.
///
/// Relative paths resolve against `root`. The file's lines are returned
/// unmodified; the file itself has no identity and never conflicts.
#[derive(Debug, Clone)]
pub struct RequirementsFile {
    root: PathBuf,
}

impl RequirementsFile {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, pkg: &str) -> PathBuf {
        let path = Path::new(pkg.trim());
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Source for RequirementsFile {
    fn name(&self) -> &str {
        "file"
    }

    fn is_package_from_source(&self, pkg: &str) -> bool {
        !pkg.trim().is_empty() && self.resolve(pkg).is_file()
    }

    fn get_requirements(&self, pkg: &str) -> YpipResult<Vec<String>> {
        let path = self.resolve(pkg);
        tracing::debug!("Reading {}", path.display());
        ypip_util::fs::read_lines(&path)
            .map_err(|e| YpipError::fetch(format!("Failed to read {}: {e}", path.display())))
    }

    fn identify(&self, _pkg: &str) -> Option<String> {
        None
    }

    fn version_conflict(&self, _pkg1: &str, _pkg2: &str) -> Option<bool> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_existing_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "numpy\n").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let src = RequirementsFile::new(dir.path());
        assert!(src.is_package_from_source("requirements.txt"));
        assert!(src.is_package_from_source(
            dir.path().join("requirements.txt").to_str().unwrap()
        ));
        assert!(!src.is_package_from_source("missing.txt"));
        assert!(!src.is_package_from_source("sub"));
        assert!(!src.is_package_from_source(""));
        assert!(!src.is_package_from_source("numpy==1.2.3"));
    }

    #[test]
    fn returns_lines_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("requirements.txt"),
            "numpy==1.2.3\n\n# tools\n  scipy  \r\n",
        )
        .unwrap();

        let src = RequirementsFile::new(dir.path());
        assert_eq!(
            src.get_requirements("requirements.txt").unwrap(),
            vec!["numpy==1.2.3", "", "# tools", "  scipy  "]
        );
    }

    #[test]
    fn unreadable_file_is_a_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RequirementsFile::new(dir.path())
            .get_requirements("gone.txt")
            .unwrap_err();
        assert!(matches!(err, YpipError::Fetch { .. }));
    }

    #[test]
    fn files_have_no_identity() {
        let src = RequirementsFile::new(".");
        assert_eq!(src.identify("requirements.txt"), None);
        assert_eq!(src.version_conflict("a.txt", "b.txt"), None);
    }
}
