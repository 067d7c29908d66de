//! Directory-structure graph for repositories without resolvable imports

use depflow_core::presentation::{
    classify_file, color_for, describe_folder, describe_purpose, estimate_lines,
};
use depflow_core::{
    parent_dir, path_depth, AnalysisLimits, FileEntry, FileType, FlowchartResult, GraphMode,
    GraphNode, GraphStats, ResolvedEdge,
};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Directory containment derived from a flat listing. Directories appear
/// either as tree entries or as ancestors of any entry.
#[derive(Default)]
struct DirTree<'a> {
    known: HashSet<&'a str>,
    /// Parent directory to child directories, first seen first. The root is `""`.
    children: HashMap<&'a str, Vec<&'a str>>,
    files: HashMap<&'a str, Vec<&'a FileEntry>>,
}

impl<'a> DirTree<'a> {
    fn from_entries(entries: &'a [FileEntry]) -> Self {
        let mut tree = DirTree::default();
        for entry in entries {
            if entry.is_blob() {
                let dir = parent_dir(&entry.path);
                tree.register(dir);
                tree.files.entry(dir).or_default().push(entry);
            } else {
                tree.register(&entry.path);
            }
        }
        tree
    }

    /// Add `dir` and its missing ancestors, outermost first.
    fn register(&mut self, dir: &'a str) {
        let mut pending = Vec::new();
        let mut current = dir;
        while !current.is_empty() && !self.known.contains(current) {
            pending.push(current);
            current = parent_dir(current);
        }
        for d in pending.into_iter().rev() {
            self.known.insert(d);
            self.children.entry(parent_dir(d)).or_default().push(d);
        }
    }

    /// Breadth-first from the root, so depth never decreases.
    fn breadth_first(&self, cap: usize) -> Vec<&'a str> {
        let mut queue: VecDeque<&'a str> = self
            .children
            .get("")
            .map(|top| top.iter().copied().collect())
            .unwrap_or_default();
        let mut order = Vec::new();
        while let Some(dir) = queue.pop_front() {
            if order.len() >= cap {
                break;
            }
            order.push(dir);
            if let Some(kids) = self.children.get(dir) {
                queue.extend(kids.iter().copied());
            }
        }
        order
    }

    fn direct_files(&self, dir: &str) -> &[&'a FileEntry] {
        self.files.get(dir).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Build the structure-mode graph: one node per directory (breadth-first,
/// capped), edges from each directory to its parent, and loose shallow
/// files when the directory graph is small.
pub fn build_structure(
    entries: &[FileEntry],
    limits: &AnalysisLimits,
    analyzed_files: usize,
) -> FlowchartResult {
    let tree = DirTree::from_entries(entries);
    let dirs = tree.breadth_first(limits.max_structure_nodes);
    let retained: HashSet<&str> = dirs.iter().copied().collect();

    let mut edges: Vec<ResolvedEdge> = dirs
        .iter()
        .filter(|dir| retained.contains(parent_dir(dir)))
        .map(|dir| ResolvedEdge::new(*dir, parent_dir(dir)))
        .collect();

    let mut loose: Vec<&FileEntry> = Vec::new();
    if dirs.len() < limits.min_structure_dirs {
        let budget = limits.max_structure_nodes.saturating_sub(dirs.len());
        loose = entries
            .iter()
            .filter(|e| e.is_blob() && path_depth(&e.path) < limits.loose_file_max_depth)
            .take(budget)
            .collect();
        edges.extend(
            loose
                .iter()
                .filter(|f| retained.contains(parent_dir(&f.path)))
                .map(|f| ResolvedEdge::new(f.path.as_str(), parent_dir(&f.path))),
        );
    }

    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut out_degree: HashMap<&str, usize> = HashMap::new();
    for edge in &edges {
        *out_degree.entry(edge.source.as_str()).or_default() += 1;
        *in_degree.entry(edge.target.as_str()).or_default() += 1;
    }
    let degrees = |id: &str| {
        (
            in_degree.get(id).copied().unwrap_or(0),
            out_degree.get(id).copied().unwrap_or(0),
        )
    };

    let mut nodes: Vec<GraphNode> = Vec::with_capacity(dirs.len() + loose.len());
    for dir in &dirs {
        let files = tree.direct_files(dir);
        let (in_deg, out_deg) = degrees(*dir);
        nodes.push(GraphNode {
            id: dir.to_string(),
            file_type: FileType::Folder,
            color: color_for(FileType::Folder).to_string(),
            lines: files.iter().map(|f| estimate_lines(None, f.size)).sum(),
            in_degree: in_deg,
            out_degree: out_deg,
            purpose: describe_folder(files.len()),
        });
    }
    for file in &loose {
        let file_type = classify_file(&file.path);
        let (in_deg, out_deg) = degrees(file.path.as_str());
        nodes.push(GraphNode {
            id: file.path.clone(),
            file_type,
            color: color_for(file_type).to_string(),
            lines: estimate_lines(None, file.size),
            in_degree: in_deg,
            out_degree: out_deg,
            purpose: describe_purpose(file_type, in_deg, out_deg),
        });
    }

    debug!(
        "Structure graph: {} directories, {} loose files, {} edges",
        dirs.len(),
        loose.len(),
        edges.len()
    );

    FlowchartResult {
        nodes,
        edges,
        mode: GraphMode::Structure,
        stats: GraphStats {
            total_files: entries.iter().filter(|e| e.is_blob()).count(),
            analyzed_files,
            resolved_edges: 0,
        },
    }
}
