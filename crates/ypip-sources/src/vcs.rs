//! Packages hosted in a VCS repository, e.g.
//! `git+https://github.com/org/repo.git@v1.0#egg=lib`.
//!
//! The repository's own requirements file is fetched from the provider's
//! raw-content endpoint at the referenced commit, tag or branch.

use std::sync::Arc;

use regex::Regex;
use ypip_core::config::DEFAULT_REQUIREMENTS_FILE;
use ypip_util::errors::{YpipError, YpipResult};

use crate::fetch::Fetch;
use crate::source::Source;

/// A hosting service with a raw-content endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VcsProvider {
    GitHub,
    GitLab,
    Bitbucket,
}

impl VcsProvider {
    /// All providers, in dispatch order.
    pub const ALL: [Self; 3] = [Self::GitHub, Self::GitLab, Self::Bitbucket];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Bitbucket => "bitbucket",
        }
    }

    pub fn host(&self) -> &'static str {
        match self {
            Self::GitHub => "github.com",
            Self::GitLab => "gitlab.com",
            Self::Bitbucket => "bitbucket.org",
        }
    }

    pub fn default_raw_base(&self) -> &'static str {
        match self {
            Self::GitHub => "https://raw.githubusercontent.com",
            Self::GitLab => "https://gitlab.com",
            Self::Bitbucket => "https://bitbucket.org",
        }
    }

    /// Path of `file` at `reference` below the raw-content base.
    fn raw_path(&self, target: &VcsTarget, file: &str) -> String {
        let VcsTarget {
            org,
            repo,
            reference,
            ..
        } = target;
        match self {
            Self::GitHub => format!("{org}/{repo}/{reference}/{file}"),
            Self::GitLab => format!("{org}/{repo}/-/raw/{reference}/{file}"),
            Self::Bitbucket => format!("{org}/{repo}/raw/{reference}/{file}"),
        }
    }

    fn url_pattern(&self) -> Regex {
        Regex::new(&format!(
            r"^(?:(?:-e|--editable)[=\s]\s*)?git\+(?:git|https|ssh)://(?:[^@/]+@)?{host}/(?P<org>[^/]+)/(?P<repo>[^/@]+)\.git@(?P<ref>[^#]+)#egg=(?P<name>[^&\s]+)(?:&\S*)?$",
            host = regex::escape(self.host()),
        ))
        .expect("valid VCS url regex")
    }
}

/// The version-determining parts of a VCS requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsTarget {
    pub name: String,
    pub org: String,
    pub repo: String,
    pub reference: String,
}

/// A source for packages hosted with one [`VcsProvider`].
pub struct HostedVcs {
    provider: VcsProvider,
    pattern: Regex,
    raw_base: String,
    requirements_file: String,
    fetcher: Arc<dyn Fetch>,
}

impl HostedVcs {
    pub fn new(provider: VcsProvider, fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            provider,
            pattern: provider.url_pattern(),
            raw_base: provider.default_raw_base().to_string(),
            requirements_file: DEFAULT_REQUIREMENTS_FILE.to_string(),
            fetcher,
        }
    }

    /// Fetch from a mirror instead of the provider's raw-content endpoint.
    pub fn with_raw_base(mut self, raw_base: impl Into<String>) -> Self {
        self.raw_base = raw_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch a file other than `requirements.txt`.
    pub fn with_requirements_file(mut self, file: impl Into<String>) -> Self {
        self.requirements_file = file.into();
        self
    }

    pub fn provider(&self) -> VcsProvider {
        self.provider
    }

    /// Repository path of the requirements file fetched for each package.
    pub fn requirements_file(&self) -> &str {
        &self.requirements_file
    }

    /// Extract name, organisation, repository and reference from `pkg`.
    pub fn parse(&self, pkg: &str) -> Option<VcsTarget> {
        let caps = self.pattern.captures(pkg.trim())?;
        Some(VcsTarget {
            name: caps["name"].to_string(),
            org: caps["org"].to_string(),
            repo: caps["repo"].to_string(),
            reference: caps["ref"].to_string(),
        })
    }

    /// URL of the requirements file for `target`.
    pub fn requirements_url(&self, target: &VcsTarget) -> String {
        self.file_url(target, &self.requirements_file)
    }

    /// URL of `file`, a path from the repository root, at `target`'s reference.
    pub fn file_url(&self, target: &VcsTarget, file: &str) -> String {
        format!("{}/{}", self.raw_base, self.provider.raw_path(target, file))
    }

    /// Lines of `file` in the repository at `target`'s reference. A missing
    /// file yields no lines.
    pub fn get_file(&self, target: &VcsTarget, file: &str) -> YpipResult<Vec<String>> {
        let url = self.file_url(target, file);
        tracing::info!("Fetching {url}");
        match self.fetcher.fetch_text(&url)? {
            Some(body) => Ok(body.lines().map(str::to_string).collect()),
            None => {
                tracing::warn!(
                    "{file} not found in {}/{}@{}",
                    target.org,
                    target.repo,
                    target.reference
                );
                Ok(Vec::new())
            }
        }
    }
}

impl Source for HostedVcs {
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn is_package_from_source(&self, pkg: &str) -> bool {
        self.pattern.is_match(pkg.trim())
    }

    fn get_requirements(&self, pkg: &str) -> YpipResult<Vec<String>> {
        let target = self.parse(pkg).ok_or_else(|| {
            YpipError::parse(pkg, format!("not a {} requirement", self.provider.name()))
        })?;
        let mut output = vec![pkg.to_string()];
        output.extend(self.get_file(&target, &self.requirements_file)?);
        Ok(output)
    }

    fn identify(&self, pkg: &str) -> Option<String> {
        let target = self.parse(pkg)?;
        Some(format!(
            "{}:{} {}/{}",
            target.name,
            self.provider.name(),
            target.org,
            target.repo
        ))
    }

    fn version_conflict(&self, pkg1: &str, pkg2: &str) -> Option<bool> {
        let a = self.parse(pkg1)?;
        let b = self.parse(pkg2)?;
        Some(a != b)
    }
}
