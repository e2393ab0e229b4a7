//! Priority-ordered dispatch of requirement strings to sources.

use std::path::PathBuf;
use std::sync::Arc;

use ypip_core::config::GlobalConfig;
use ypip_util::errors::YpipResult;

use crate::fallback::Fallback;
use crate::fetch::Fetch;
use crate::requirements_file::RequirementsFile;
use crate::source::Source;
use crate::vcs::{HostedVcs, VcsProvider};

/// The closed set of source variants.
pub enum AnySource {
    Vcs(HostedVcs),
    RequirementsFile(RequirementsFile),
    Fallback(Fallback),
}

impl AnySource {
    fn inner(&self) -> &dyn Source {
        match self {
            Self::Vcs(s) => s,
            Self::RequirementsFile(s) => s,
            Self::Fallback(s) => s,
        }
    }
}

impl Source for AnySource {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn is_package_from_source(&self, pkg: &str) -> bool {
        self.inner().is_package_from_source(pkg)
    }

    fn get_requirements(&self, pkg: &str) -> YpipResult<Vec<String>> {
        self.inner().get_requirements(pkg)
    }

    fn validate(&self, pkg: &str) -> YpipResult<()> {
        self.inner().validate(pkg)
    }

    fn identify(&self, pkg: &str) -> Option<String> {
        self.inner().identify(pkg)
    }

    fn version_conflict(&self, pkg1: &str, pkg2: &str) -> Option<bool> {
        self.inner().version_conflict(pkg1, pkg2)
    }
}

impl From<HostedVcs> for AnySource {
    fn from(s: HostedVcs) -> Self {
        Self::Vcs(s)
    }
}

impl From<RequirementsFile> for AnySource {
    fn from(s: RequirementsFile) -> Self {
        Self::RequirementsFile(s)
    }
}

impl From<Fallback> for AnySource {
    fn from(s: Fallback) -> Self {
        Self::Fallback(s)
    }
}

/// Sources in the order they are offered a requirement string.
pub struct SourceRegistry {
    sources: Vec<AnySource>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<AnySource>) -> Self {
        Self { sources }
    }

    /// Enabled VCS providers, then local requirements files under `root`,
    /// then the registry fallback.
    pub fn from_config(
        config: &GlobalConfig,
        root: impl Into<PathBuf>,
        fetcher: Arc<dyn Fetch>,
    ) -> Self {
        let mut sources: Vec<AnySource> = Vec::new();
        for provider in VcsProvider::ALL {
            let settings = config.provider(provider.name());
            if !settings.enabled {
                tracing::debug!("Provider {} disabled", provider.name());
                continue;
            }
            let mut vcs = HostedVcs::new(provider, fetcher.clone())
                .with_requirements_file(config.fetch.requirements_file.clone());
            if let Some(raw_base) = settings.raw_base {
                vcs = vcs.with_raw_base(raw_base);
            }
            sources.push(vcs.into());
        }
        sources.push(RequirementsFile::new(root).into());
        sources.push(Fallback::new().into());
        Self { sources }
    }

    /// The first source that recognises `pkg`.
    pub fn select(&self, pkg: &str) -> Option<&AnySource> {
        let found = self.sources.iter().find(|s| s.is_package_from_source(pkg));
        if let Some(source) = found {
            tracing::debug!("{pkg} -> {}", source.name());
        }
        found
    }

    pub fn sources(&self) -> &[AnySource] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;
    use ypip_core::config::ProviderConfig;

    fn names(registry: &SourceRegistry) -> Vec<&str> {
        registry.sources().iter().map(|s| s.name()).collect()
    }

    #[test]
    fn default_priority_order() {
        let registry = SourceRegistry::from_config(
            &GlobalConfig::default(),
            ".",
            Arc::new(MemoryFetcher::new()),
        );
        assert_eq!(
            names(&registry),
            vec!["github", "gitlab", "bitbucket", "file", "pypi"]
        );
    }

    #[test]
    fn disabled_provider_is_skipped() {
        let mut config = GlobalConfig::default();
        config.providers.insert(
            "gitlab".to_string(),
            ProviderConfig {
                enabled: false,
                raw_base: None,
            },
        );
        let registry =
            SourceRegistry::from_config(&config, ".", Arc::new(MemoryFetcher::new()));
        assert_eq!(names(&registry), vec!["github", "bitbucket", "file", "pypi"]);
        assert_eq!(
            registry
                .select("git+https://gitlab.com/org/repo.git@v1#egg=lib")
                .map(|s| s.name()),
            None
        );
    }

    #[test]
    fn select_prefers_earlier_sources() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("numpy"), "").unwrap();
        let registry = SourceRegistry::from_config(
            &GlobalConfig::default(),
            dir.path(),
            Arc::new(MemoryFetcher::new()),
        );

        let pick = |pkg: &str| registry.select(pkg).map(|s| s.name());
        assert_eq!(
            pick("git+https://github.com/org/repo.git@v1#egg=lib"),
            Some("github")
        );
        assert_eq!(
            pick("git+ssh://git@bitbucket.org/org/repo.git@v1#egg=lib"),
            Some("bitbucket")
        );
        assert_eq!(pick("numpy"), Some("file"));
        assert_eq!(pick("scipy>=1.0"), Some("pypi"));
        assert_eq!(pick("not a requirement"), None);
    }
}
