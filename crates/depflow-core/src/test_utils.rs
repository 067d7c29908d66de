//! Test utilities for Depflow core

use crate::model::{FileEntry, GraphMode, GraphNode, GraphStats, FlowchartResult, ResolvedEdge};
use crate::presentation::{classify_file, color_for};

/// Blob entries with a fixed size for every path.
pub fn blobs(paths: &[&str]) -> Vec<FileEntry> {
    paths.iter().map(|p| FileEntry::blob(*p, Some(120))).collect()
}

/// A node with presentation fields derived from its path.
pub fn node(path: &str, in_degree: usize, out_degree: usize) -> GraphNode {
    let file_type = classify_file(path);
    GraphNode {
        id: path.to_string(),
        file_type,
        color: color_for(file_type).to_string(),
        lines: 4,
        in_degree,
        out_degree,
        purpose: String::new(),
    }
}

/// Two-file import result: `src/a.ts -> src/b.ts`.
pub fn two_file_result() -> FlowchartResult {
    FlowchartResult {
        nodes: vec![node("src/a.ts", 0, 1), node("src/b.ts", 1, 0)],
        edges: vec![ResolvedEdge::new("src/a.ts", "src/b.ts")],
        mode: GraphMode::Imports,
        stats: GraphStats {
            total_files: 2,
            analyzed_files: 2,
            resolved_edges: 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_file_result_is_consistent() {
        let result = two_file_result();
        assert_eq!(result.stats.resolved_edges, result.edges.len());
        assert_eq!(blobs(&["a", "b"]).len(), 2);
    }
}
