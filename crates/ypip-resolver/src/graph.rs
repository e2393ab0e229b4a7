//! Dependency graph construction and traversal.

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use ypip_util::errors::{YpipError, YpipResult};

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// The requirement list the run was seeded with.
    Root,
    /// A package whose source derived an identity.
    Package,
    /// A requirements file, keyed by its raw string.
    File,
}

/// A node in the dependency graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub identity: String,
    /// The raw requirement string that first introduced this node.
    pub requirement: String,
    pub kind: NodeKind,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.requirement)
    }
}

/// Dependency graph keyed by package identity, backed by petgraph.
///
/// Nodes are never removed. The root is not part of the identity index,
/// so no requirement can collide with it.
pub struct DependencyGraph {
    graph: DiGraph<GraphNode, ()>,
    index: HashMap<String, NodeIndex>,
    root: Option<NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            root: None,
        }
    }

    /// Create the root node labelled `label`, or relabel the existing one.
    pub fn set_root(&mut self, label: impl Into<String>) {
        let label = label.into();
        let node = GraphNode {
            identity: label.clone(),
            requirement: label,
            kind: NodeKind::Root,
        };
        match self.root {
            Some(idx) => self.graph[idx] = node,
            None => self.root = Some(self.graph.add_node(node)),
        }
    }

    pub fn root(&self) -> Option<&GraphNode> {
        self.root.map(|idx| &self.graph[idx])
    }

    /// Insert a node. Fails with [`YpipError::NodeExists`] if `identity` is taken.
    pub fn add_node(
        &mut self,
        identity: impl Into<String>,
        requirement: impl Into<String>,
        kind: NodeKind,
    ) -> YpipResult<()> {
        let identity = identity.into();
        if self.index.contains_key(&identity) {
            return Err(YpipError::NodeExists { identity });
        }
        let idx = self.graph.add_node(GraphNode {
            identity: identity.clone(),
            requirement: requirement.into(),
            kind,
        });
        self.index.insert(identity, idx);
        Ok(())
    }

    /// Mutable handle on an existing node.
    pub fn get_node_mut(&mut self, identity: &str) -> YpipResult<NodeMut<'_>> {
        let idx = self.lookup(identity)?;
        Ok(NodeMut { graph: self, idx })
    }

    /// Mutable handle on the root node.
    pub fn root_mut(&mut self) -> Option<NodeMut<'_>> {
        let idx = self.root?;
        Some(NodeMut { graph: self, idx })
    }

    fn lookup(&self, identity: &str) -> YpipResult<NodeIndex> {
        self.index
            .get(identity)
            .copied()
            .ok_or_else(|| YpipError::NodeDoesNotExist {
                identity: identity.to_string(),
            })
    }

    fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, ());
        }
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.index.contains_key(identity)
    }

    /// Look up a node by identity.
    pub fn node(&self, identity: &str) -> Option<&GraphNode> {
        self.index.get(identity).map(|&idx| &self.graph[idx])
    }

    /// All nodes except the root, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph
            .node_indices()
            .filter(move |&idx| Some(idx) != self.root)
            .map(move |idx| &self.graph[idx])
    }

    /// Direct dependencies of a node.
    pub fn dependencies_of(&self, identity: &str) -> Vec<&GraphNode> {
        self.index
            .get(identity)
            .map(|&idx| self.neighbors(idx, Direction::Outgoing))
            .unwrap_or_default()
    }

    /// Reverse dependencies (who depends on this node), root included.
    pub fn dependents_of(&self, identity: &str) -> Vec<&GraphNode> {
        self.index
            .get(identity)
            .map(|&idx| self.neighbors(idx, Direction::Incoming))
            .unwrap_or_default()
    }

    fn neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<&GraphNode> {
        self.neighbor_indices(idx, direction)
            .into_iter()
            .map(|i| &self.graph[i])
            .collect()
    }

    /// Neighbours in edge insertion order.
    fn neighbor_indices(&self, idx: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (e.id(), other)
            })
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, other)| other).collect()
    }

    /// Number of edges, including those leaving the root.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Print the dependency tree to a string.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let Some(root) = self.root else {
            return output;
        };
        output.push_str(&format!("{}\n", self.graph[root]));

        let mut visited = HashSet::new();
        visited.insert(root);
        let deps = self.neighbor_indices(root, Direction::Outgoing);
        let count = deps.len();
        for (i, idx) in deps.into_iter().enumerate() {
            self.print_subtree(&mut output, idx, "", i == count - 1, 1, max_depth, &mut visited);
        }
        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        if visited.contains(&idx) {
            output.push_str(&format!("{prefix}{connector}{node} (*)\n"));
            return;
        }
        output.push_str(&format!("{prefix}{connector}{node}\n"));

        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }

        visited.insert(idx);
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let deps = self.neighbor_indices(idx, Direction::Outgoing);
        let count = deps.len();
        for (i, child) in deps.into_iter().enumerate() {
            self.print_subtree(
                output,
                child,
                &child_prefix,
                i == count - 1,
                depth + 1,
                max_depth,
                visited,
            );
        }
        visited.remove(&idx);
    }

    /// Find the path from root to a node.
    ///
    /// Accepts a full identity or, for VCS packages, the bare egg name.
    pub fn find_path(&self, key: &str) -> Option<Vec<&GraphNode>> {
        let root = self.root?;
        let target = self.resolve_key(key)?;
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        if self.dfs_path(root, target, &mut path, &mut visited) {
            Some(path.iter().map(|&idx| &self.graph[idx]).collect())
        } else {
            None
        }
    }

    /// Exact identity first, then the part of a `name:provider org/repo`
    /// identity before the colon.
    fn resolve_key(&self, key: &str) -> Option<NodeIndex> {
        if let Some(&idx) = self.index.get(key) {
            return Some(idx);
        }
        self.graph
            .node_indices()
            .filter(|&idx| Some(idx) != self.root)
            .find(|&idx| {
                let node = &self.graph[idx];
                node.kind == NodeKind::Package
                    && node.identity.split_once(':').is_some_and(|(name, _)| name == key)
            })
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for next in self.neighbor_indices(current, Direction::Outgoing) {
            if self.dfs_path(next, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Tree of reverse edges from a single node up to the root.
    pub fn print_inverted_tree(&self, key: &str) -> String {
        let mut output = String::new();
        let Some(idx) = self.resolve_key(key) else {
            return output;
        };
        output.push_str(&format!("{}\n", self.graph[idx]));

        let mut visited = HashSet::new();
        visited.insert(idx);
        let dependents = self.neighbor_indices(idx, Direction::Incoming);
        let count = dependents.len();
        for (i, dep) in dependents.into_iter().enumerate() {
            self.print_inverted_subtree(&mut output, dep, "", i == count - 1, &mut visited);
        }
        output
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        output.push_str(&format!("{prefix}{connector}{node}\n"));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let dependents = self.neighbor_indices(idx, Direction::Incoming);
        let count = dependents.len();
        for (i, dep) in dependents.into_iter().enumerate() {
            self.print_inverted_subtree(output, dep, &child_prefix, i == count - 1, visited);
        }
        visited.remove(&idx);
    }

    /// Number of nodes (excluding root).
    pub fn len(&self) -> usize {
        let total = self.graph.node_count();
        if self.root.is_some() {
            total.saturating_sub(1)
        } else {
            total
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable access to one node of a [`DependencyGraph`].
pub struct NodeMut<'g> {
    graph: &'g mut DependencyGraph,
    idx: NodeIndex,
}

impl NodeMut<'_> {
    pub fn node(&self) -> &GraphNode {
        &self.graph.graph[self.idx]
    }

    /// Add an edge to the node `target`, which must already exist.
    /// Linking twice to the same target is a no-op.
    pub fn link_to(&mut self, target: &str) -> YpipResult<()> {
        let to = self.graph.lookup(target)?;
        self.graph.add_edge(self.idx, to);
        Ok(())
    }
}
