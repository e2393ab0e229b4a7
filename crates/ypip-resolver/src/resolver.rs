//! Breadth-first work-list resolution over heterogeneous sources.
//!
//! Each requirement string is dispatched to the first source that
//! recognises it. A new identity becomes a graph node and its own
//! requirements are queued; a known identity is only linked, after the
//! source has checked the two raw strings for a version conflict.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use ypip_core::config::ConflictMode;
use ypip_core::requirement::RequirementLine;
use ypip_sources::registry::{AnySource, SourceRegistry};
use ypip_sources::source::Source;
use ypip_util::errors::{YpipError, YpipResult};

use crate::conflict::{ConflictReport, VersionConflict};
use crate::graph::{DependencyGraph, NodeKind};

const DEFAULT_ROOT_LABEL: &str = "<root>";

/// The output of a completed resolution.
pub struct ResolutionResult {
    pub graph: DependencyGraph,
    /// Raw package requirements, one per identity, in discovery order.
    pub requirements: Vec<String>,
    /// Empty unless conflicts were collected rather than raised.
    pub conflicts: ConflictReport,
}

/// Where a queued line was read from. Relative includes resolve against it.
#[derive(Clone)]
enum Origin {
    /// The command line, or a local requirements file in `dir`.
    Local(Option<PathBuf>),
    /// A file in the repository `pkg` points at; `dir` is relative to the
    /// repository root.
    Remote { pkg: String, dir: String },
}

/// Entry in the BFS queue.
struct Pending {
    /// Identity of the requiring node; `None` for the root.
    parent: Option<String>,
    line: String,
    origin: Origin,
}

/// Single-pass resolver. Owns the graph so it stays inspectable when a
/// run aborts.
pub struct Resolver {
    registry: SourceRegistry,
    mode: ConflictMode,
    graph: DependencyGraph,
    conflicts: ConflictReport,
}

impl Resolver {
    pub fn new(registry: SourceRegistry) -> Self {
        let mut graph = DependencyGraph::new();
        graph.set_root(DEFAULT_ROOT_LABEL);
        Self {
            registry,
            mode: ConflictMode::default(),
            graph,
            conflicts: ConflictReport::new(),
        }
    }

    pub fn with_conflict_mode(mut self, mode: ConflictMode) -> Self {
        self.mode = mode;
        self
    }

    /// Label shown for the root in printed trees.
    pub fn with_root_label(mut self, label: impl Into<String>) -> Self {
        self.graph.set_root(label);
        self
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn conflicts(&self) -> &ConflictReport {
        &self.conflicts
    }

    /// Resolve `requirements` and everything they pull in, linking each
    /// from the root.
    ///
    /// In fail-fast mode the first conflict aborts with
    /// [`YpipError::Conflict`]; nodes added before that point remain in
    /// [`Resolver::graph`].
    pub fn run<S: AsRef<str>>(&mut self, requirements: &[S]) -> YpipResult<()> {
        let mut queue: VecDeque<Pending> = requirements
            .iter()
            .map(|r| Pending {
                parent: None,
                line: r.as_ref().to_string(),
                origin: Origin::Local(None),
            })
            .collect();

        while let Some(entry) = queue.pop_front() {
            let (raw, include) = match RequirementLine::parse(&entry.line) {
                RequirementLine::Empty => continue,
                RequirementLine::Option(option) => {
                    tracing::warn!("Ignoring unsupported option `{option}`");
                    continue;
                }
                RequirementLine::Include(path) => match &entry.origin {
                    Origin::Local(dir) => (local_path(dir.as_deref(), path), true),
                    Origin::Remote { pkg, dir } => {
                        let file = repo_path(dir, &path);
                        self.include_remote(&mut queue, entry.parent.as_deref(), pkg, &file)?;
                        continue;
                    }
                },
                RequirementLine::Requirement(req) => (req, false),
            };

            let source = select(&self.registry, &raw, include)?;
            let (key, kind) = match source.identify(&raw) {
                Some(identity) => (identity, NodeKind::Package),
                None => (raw.clone(), NodeKind::File),
            };

            if let Some(existing) = self.graph.node(&key) {
                let existing = existing.requirement.clone();
                source.validate(&raw)?;
                if existing != raw && source.version_conflict(&existing, &raw) == Some(true) {
                    let conflict = VersionConflict {
                        identity: key.clone(),
                        existing,
                        incoming: raw.clone(),
                    };
                    match self.mode {
                        ConflictMode::FailFast => return Err(conflict.into()),
                        ConflictMode::Collect => {
                            tracing::warn!("Version conflict: {conflict}");
                            self.conflicts.add(conflict);
                        }
                    }
                } else {
                    tracing::debug!("{raw} already resolved as <{key}>");
                }
                link(&mut self.graph, entry.parent.as_deref(), &key)?;
                continue;
            }

            self.graph.add_node(key.clone(), raw.clone(), kind)?;
            link(&mut self.graph, entry.parent.as_deref(), &key)?;

            let origin = match source {
                AnySource::Vcs(vcs) => Origin::Remote {
                    pkg: raw.clone(),
                    dir: repo_dir(vcs.requirements_file()),
                },
                _ => Origin::Local(
                    Path::new(&raw)
                        .parent()
                        .filter(|dir| !dir.as_os_str().is_empty())
                        .map(Path::to_path_buf),
                ),
            };
            for line in source.get_requirements(&raw)? {
                if line.trim() == raw {
                    continue;
                }
                queue.push_back(Pending {
                    parent: Some(key.clone()),
                    line,
                    origin: origin.clone(),
                });
            }
        }
        Ok(())
    }

    /// Follow an include found inside a repository's requirements. The
    /// file is fetched from the same repository and reference; the local
    /// filesystem is never consulted.
    fn include_remote(
        &mut self,
        queue: &mut VecDeque<Pending>,
        parent: Option<&str>,
        pkg: &str,
        file: &str,
    ) -> YpipResult<()> {
        let (vcs, target) = match self.registry.select(pkg) {
            Some(AnySource::Vcs(vcs)) => match vcs.parse(pkg) {
                Some(target) => (vcs, target),
                None => return Err(YpipError::parse(pkg, "not a VCS requirement")),
            },
            _ => return Err(YpipError::parse(pkg, "not a VCS requirement")),
        };
        let key = vcs.file_url(&target, file);
        if !self.graph.contains(&key) {
            self.graph.add_node(key.clone(), key.clone(), NodeKind::File)?;
            let origin = Origin::Remote {
                pkg: pkg.to_string(),
                dir: repo_dir(file),
            };
            for line in vcs.get_file(&target, file)? {
                queue.push_back(Pending {
                    parent: Some(key.clone()),
                    line,
                    origin: origin.clone(),
                });
            }
        }
        link(&mut self.graph, parent, &key)
    }

/// Package requirements in discovery order. Requirements files are
    /// not packages and are left out.
    pub fn requirements(&self) -> Vec<String> {
        self.graph
            .nodes()
            .filter(|n| n.kind == NodeKind::Package)
            .map(|n| n.requirement.clone())
            .collect()
    }

    pub fn into_result(self) -> ResolutionResult {
        let requirements = self.requirements();
        ResolutionResult {
            graph: self.graph,
            requirements,
            conflicts: self.conflicts,
        }
    }
}

/// The source for `raw`. An include must name an existing file.
fn select<'r>(registry: &'r SourceRegistry, raw: &str, include: bool) -> YpipResult<&'r AnySource> {
    match registry.select(raw) {
        Some(source) if !include || matches!(source, AnySource::RequirementsFile(_)) => Ok(source),
        Some(_) => Err(YpipError::fetch(format!(
            "Included requirements file {raw} does not exist"
        ))),
        None => Err(YpipError::parse(raw, "no source recognises this requirement")),
    }
}

/// An include in a local file is relative to that file.
fn local_path(dir: Option<&Path>, path: String) -> String {
    match dir {
        Some(dir) if !Path::new(&path).is_absolute() => dir.join(path).to_string_lossy().into_owned(),
        _ => path,
    }
}

/// Join an include onto a directory inside a repository. A leading `/`
/// means the repository root.
fn repo_path(dir: &str, path: &str) -> String {
    let path = path.trim_start_matches("./");
    if let Some(from_root) = path.strip_prefix('/') {
        return from_root.to_string();
    }
    if dir.is_empty() {
        path.to_string()
    } else {
        format!("{dir}/{path}")
    }
}

fn repo_dir(file: &str) -> String {
    file.rsplit_once('/')
        .map(|(dir, _)| dir.to_string())
        .unwrap_or_default()
}

fn link(graph: &mut DependencyGraph, parent: Option<&str>, target: &str) -> YpipResult<()> {
    match parent {
        Some(parent) => graph.get_node_mut(parent)?.link_to(target),
        None => match graph.root_mut() {
            Some(mut root) => root.link_to(target),
            None => Ok(()),
        },
    }
}

/// Resolve `requirements` in one call.
pub fn resolve<S: AsRef<str>>(
    registry: SourceRegistry,
    requirements: &[S],
    mode: ConflictMode,
) -> YpipResult<ResolutionResult> {
    let mut resolver = Resolver::new(registry).with_conflict_mode(mode);
    resolver.run(requirements)?;
    Ok(resolver.into_result())
}
