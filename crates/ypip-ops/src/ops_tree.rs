//! Operation: display the dependency tree.

use std::path::Path;

use ypip_resolver::resolver::ResolutionResult;

use crate::ops_resolve::{self, ResolveOptions};

/// Options for `ypip tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    pub resolve: ResolveOptions,
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Explain why a package is included.
    pub why: Option<String>,
    /// Show what depends on a package instead of its dependencies.
    pub inverted: Option<String>,
}

/// Resolve and display the dependency tree. Returns the number of
/// collected conflicts.
pub fn tree(project_root: &Path, opts: &TreeOptions) -> miette::Result<usize> {
    let result = ops_resolve::resolve(project_root, &opts.resolve)?;
    print!("{}", render(&result, opts));
    Ok(result.conflicts.len())
}

/// Render the view selected by `opts`.
pub fn render(result: &ResolutionResult, opts: &TreeOptions) -> String {
    let graph = &result.graph;

    if let Some(ref target) = opts.why {
        let Some(path) = graph.find_path(target) else {
            return format!("Package '{target}' not found in the graph.\n");
        };
        let mut output = format!("Path to {target}:\n");
        for (i, node) in path.iter().enumerate() {
            let indent = "  ".repeat(i);
            output.push_str(&format!("{indent}{node}\n"));
        }
        return output;
    }

    if let Some(ref target) = opts.inverted {
        let inverted = graph.print_inverted_tree(target);
        if inverted.is_empty() {
            return format!("Package '{target}' not found in the graph.\n");
        }
        return inverted;
    }

    let mut output = graph.print_tree(opts.depth);
    if !result.conflicts.is_empty() {
        output.push_str(&format!("\n{}", result.conflicts));
    }
    output
}
