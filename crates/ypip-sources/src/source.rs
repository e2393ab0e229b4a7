use ypip_util::errors::YpipResult;

/// Capabilities every package source provides.
pub trait Source {
    /// Short label used in logs, e.g. `github` or `pypi`.
    fn name(&self) -> &str;

    /// Cheap, side-effect-free check that `pkg` belongs to this source.
    fn is_package_from_source(&self, pkg: &str) -> bool;

    /// The raw requirement strings `pkg` brings in.
    ///
    /// Lines are passed through as found; blank lines and comments are the
    /// caller's to filter.
    fn get_requirements(&self, pkg: &str) -> YpipResult<Vec<String>>;

    /// Reject a requirement this source claims but cannot interpret,
    /// without fetching anything.
    fn validate(&self, _pkg: &str) -> YpipResult<()> {
        Ok(())
    }

    /// A version-independent key for the logical package, or `None` when
    /// this source cannot derive one.
    fn identify(&self, pkg: &str) -> Option<String>;

    /// Whether two requirements with the same identity disagree on their
    /// version. `None` when this source cannot tell.
    fn version_conflict(&self, pkg1: &str, pkg2: &str) -> Option<bool>;
}
