//! Operation: resolve requirements into a flat, conflict-checked list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use ypip_core::config::{ConflictMode, GlobalConfig, DEFAULT_REQUIREMENTS_FILE};
use ypip_resolver::conflict::VersionConflict;
use ypip_resolver::resolver::{ResolutionResult, Resolver};
use ypip_sources::fetch::{Fetch, HttpFetcher};
use ypip_sources::registry::SourceRegistry;
use ypip_util::errors::{YpipError, YpipResult};
use ypip_util::progress;

/// Inputs shared by `ypip resolve` and `ypip tree`.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Requirement strings given on the command line.
    pub requirements: Vec<String>,
    /// Requirements files given with `-r`.
    pub files: Vec<PathBuf>,
    /// Record conflicts instead of stopping at the first one.
    pub collect_conflicts: bool,
    /// Override `[fetch] timeout-secs`.
    pub timeout_secs: Option<u64>,
    /// Override `[fetch] requirements-file`.
    pub requirements_file: Option<String>,
}

impl ResolveOptions {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut GlobalConfig) {
        if let Some(secs) = self.timeout_secs {
            config.fetch.timeout_secs = secs;
        }
        if let Some(ref file) = self.requirements_file {
            config.fetch.requirements_file = file.clone();
        }
        if self.collect_conflicts {
            config.resolve.conflicts = ConflictMode::Collect;
        }
    }

    /// The initial work-list. Without explicit input, the project's
    /// `requirements.txt` is used.
    pub fn seed(&self, project_root: &Path) -> YpipResult<Vec<String>> {
        let mut seed = self.requirements.clone();
        seed.extend(self.files.iter().map(|f| format!("-r {}", f.display())));
        if seed.is_empty() {
            if !project_root.join(DEFAULT_REQUIREMENTS_FILE).is_file() {
                return Err(YpipError::fetch(format!(
                    "No requirements given and no {DEFAULT_REQUIREMENTS_FILE} in {}",
                    project_root.display()
                )));
            }
            seed.push(format!("-r {DEFAULT_REQUIREMENTS_FILE}"));
        }
        Ok(seed)
    }
}

/// Resolve with the user's configuration over HTTP.
pub fn resolve(project_root: &Path, opts: &ResolveOptions) -> miette::Result<ResolutionResult> {
    let mut config = GlobalConfig::load()?;
    opts.apply(&mut config);
    let fetcher = HttpFetcher::new(&config.fetch)?;
    Ok(resolve_with(project_root, opts, &config, Arc::new(fetcher))?)
}

/// Resolve with an explicit configuration and fetcher.
pub fn resolve_with(
    project_root: &Path,
    opts: &ResolveOptions,
    config: &GlobalConfig,
    fetcher: Arc<dyn Fetch>,
) -> YpipResult<ResolutionResult> {
    let seed = opts.seed(project_root)?;
    let label = seed.join(" ");
    progress::status("Resolving", &label);

    let registry = SourceRegistry::from_config(config, project_root, fetcher);
    let mut resolver = Resolver::new(registry)
        .with_conflict_mode(config.resolve.conflicts)
        .with_root_label(label);

    let pb = progress::spinner("Walking requirements...");
    let outcome = resolver.run(&seed);
    pb.finish_and_clear();
    if let Err(e) = outcome {
        tracing::debug!(
            "Resolution stopped after {} node(s)",
            resolver.graph().len()
        );
        return Err(e);
    }

    let result = resolver.into_result();
    progress::status(
        "Resolved",
        &format!("{} package(s)", result.requirements.len()),
    );
    for conflict in &result.conflicts.conflicts {
        progress::status_warn("Conflict", &conflict.to_string());
    }
    Ok(result)
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    requirements: &'a [String],
    conflicts: &'a [VersionConflict],
}

/// Render the flattened list, one requirement per line, or as JSON.
pub fn render(result: &ResolutionResult, json: bool) -> YpipResult<String> {
    if json {
        let output = JsonOutput {
            requirements: &result.requirements,
            conflicts: &result.conflicts.conflicts,
        };
        let mut text =
            serde_json::to_string_pretty(&output).map_err(|e| YpipError::Io(e.into()))?;
        text.push('\n');
        return Ok(text);
    }
    Ok(result
        .requirements
        .iter()
        .map(|r| format!("{r}\n"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_apply_to_config() {
        let opts = ResolveOptions {
            collect_conflicts: true,
            timeout_secs: Some(5),
            requirements_file: Some("deps.txt".to_string()),
            ..Default::default()
        };
        let mut config = GlobalConfig::default();
        opts.apply(&mut config);
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.requirements_file, "deps.txt");
        assert_eq!(config.resolve.conflicts, ConflictMode::Collect);
    }

    #[test]
    fn no_overrides_keep_config() {
        let mut config = GlobalConfig::default();
        ResolveOptions::default().apply(&mut config);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.resolve.conflicts, ConflictMode::FailFast);
    }

    #[test]
    fn seed_prefers_explicit_input() {
        let dir = tempfile::tempdir().unwrap();
        let opts = ResolveOptions {
            requirements: vec!["numpy".to_string()],
            files: vec![PathBuf::from("dev.txt")],
            ..Default::default()
        };
        assert_eq!(opts.seed(dir.path()).unwrap(), vec!["numpy", "-r dev.txt"]);
    }

    #[test]
    fn seed_defaults_to_requirements_txt() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResolveOptions::default().seed(dir.path()).unwrap_err();
        assert!(matches!(err, YpipError::Fetch { .. }));

        std::fs::write(dir.path().join("requirements.txt"), "numpy\n").unwrap();
        assert_eq!(
            ResolveOptions::default().seed(dir.path()).unwrap(),
            vec!["-r requirements.txt"]
        );
    }
}
