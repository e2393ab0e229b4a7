//! Plain registry requirements such as `numpy==1.2.3` or `scipy>=1.0, <2`.

use ypip_core::requirement::{normalize_name, PackageRequirement};
use ypip_util::errors::YpipResult;

use crate::source::Source;

/// Catch-all source for anything shaped like `name[<specifier>]`.
///
/// Registry metadata is never consulted, so these packages are leaves of
/// the dependency graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fallback;

impl Fallback {
    pub fn new() -> Self {
        Self
    }
}

impl Source for Fallback {
    fn name(&self) -> &str {
        "pypi"
    }

    fn is_package_from_source(&self, pkg: &str) -> bool {
        PackageRequirement::split(pkg).is_some()
    }

    fn get_requirements(&self, pkg: &str) -> YpipResult<Vec<String>> {
        self.validate(pkg)?;
        Ok(vec![pkg.to_string()])
    }

    fn validate(&self, pkg: &str) -> YpipResult<()> {
        PackageRequirement::parse(pkg).map(|_| ())
    }

    fn identify(&self, pkg: &str) -> Option<String> {
        let (name, _) = PackageRequirement::split(pkg)?;
        Some(normalize_name(name))
    }

    /// Decidable cases only: an unconstrained side, identical constraints,
    /// or a pin checked against the other side's specifier. Two open
    /// ranges are left undecided.
    fn version_conflict(&self, pkg1: &str, pkg2: &str) -> Option<bool> {
        let a = PackageRequirement::parse(pkg1).ok()?;
        let b = PackageRequirement::parse(pkg2).ok()?;
        if a.normalized_name() != b.normalized_name() {
            return None;
        }

        let (a, b) = match (a.specifier, b.specifier) {
            (Some(a), Some(b)) => (a, b),
            _ => return Some(false),
        };
        if a.to_string() == b.to_string() {
            return Some(false);
        }

        if let Some(pin) = a.pinned() {
            return Some(!b.contains(pin));
        }
        if let Some(pin) = b.pinned() {
            return Some(!a.contains(pin));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ypip_util::errors::YpipError;

    #[test]
    fn claims_anything_shaped_like_a_package() {
        let src = Fallback::new();
        assert!(src.is_package_from_source("numpy"));
        assert!(src.is_package_from_source("numpy==1.2.3"));
        assert!(src.is_package_from_source("Django >= 4.0, < 5"));
        assert!(!src.is_package_from_source("git+https://github.com/org/repo.git@v1#egg=lib"));
        assert!(!src.is_package_from_source("foo bar"));
    }

    #[test]
    fn packages_are_leaves() {
        let src = Fallback::new();
        assert_eq!(src.get_requirements("numpy==1.2.3").unwrap(), vec!["numpy==1.2.3"]);
    }

    #[test]
    fn invalid_specifier_is_a_parse_error() {
        let err = Fallback::new().get_requirements("numpy==").unwrap_err();
        assert!(matches!(err, YpipError::Parse { .. }));
        let err = Fallback::new().validate("numpy==not.a.version").unwrap_err();
        assert!(matches!(err, YpipError::Parse { .. }));
        assert!(Fallback::new().validate("numpy>=1.0, <2").is_ok());
    }

    #[test]
    fn identity_is_normalised_name() {
        let src = Fallback::new();
        assert_eq!(src.identify("Foo_Bar>=1").as_deref(), Some("foo-bar"));
        assert_eq!(src.identify("foo.bar"), src.identify("FOO-BAR==2"));
    }

    #[test]
    fn conflicts() {
        let src = Fallback::new();
        assert_eq!(src.version_conflict("numpy==1.2", "numpy==1.3"), Some(true));
        assert_eq!(src.version_conflict("numpy==1.2", "numpy==1.2.0"), Some(false));
        assert_eq!(src.version_conflict("numpy==1.2", "numpy"), Some(false));
        assert_eq!(src.version_conflict("numpy==1.2", "numpy>=1.0, <2"), Some(false));
        assert_eq!(src.version_conflict("numpy>=2", "numpy==1.5"), Some(true));
        assert_eq!(src.version_conflict("numpy>=1.0", "numpy >= 1.0"), Some(false));
        assert_eq!(src.version_conflict("numpy>=1.0", "numpy<3"), None);
        assert_eq!(src.version_conflict("numpy==1.2", "scipy==1.3"), None);
    }
}
