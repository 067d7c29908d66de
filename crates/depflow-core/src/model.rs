//! Core data structures for the dependency graph

use serde::{Deserialize, Serialize};

/// Whether a tree entry is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
}

/// One entry of a repository listing. Paths are repo-relative and `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub kind: EntryKind,
    pub size: Option<u64>,
}

impl FileEntry {
    pub fn blob(path: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
            size,
        }
    }

    pub fn tree(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
            size: None,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }

    /// Number of `/` separators, so root-level files have depth 0.
    pub fn depth(&self) -> usize {
        path_depth(&self.path)
    }
}

/// Flat listing of a repository at one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSnapshot {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub entries: Vec<FileEntry>,
}

impl RepoSnapshot {
    pub fn blobs(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(|e| e.is_blob())
    }
}

pub fn path_depth(path: &str) -> usize {
    path.matches('/').count()
}

/// Final path segment.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Everything before the final `/`, or `""` for root-level paths.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Source languages recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    EcmaScript,
    Java,
    Kotlin,
    Scala,
    Python,
    Go,
    Ruby,
    Rust,
    Swift,
    CFamily,
    Php,
    Dart,
    CSharp,
    Unknown,
}

impl Language {
    /// Every language with a deep-analysis strategy.
    pub const ANALYZABLE: [Language; 13] = [
        Language::EcmaScript,
        Language::Java,
        Language::Kotlin,
        Language::Scala,
        Language::Python,
        Language::Go,
        Language::Ruby,
        Language::Rust,
        Language::Swift,
        Language::CFamily,
        Language::Php,
        Language::Dart,
        Language::CSharp,
    ];

    /// Detect language from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "ts" | "tsx" | "mjs" | "cjs" | "mts" | "cts" | "vue" | "svelte" => {
                Language::EcmaScript
            }
            "java" => Language::Java,
            "kt" | "kts" => Language::Kotlin,
            "scala" | "sc" => Language::Scala,
            "py" | "pyi" => Language::Python,
            "go" => Language::Go,
            "rb" => Language::Ruby,
            "rs" => Language::Rust,
            "swift" => Language::Swift,
            "c" | "h" | "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" | "m" | "mm" => {
                Language::CFamily
            }
            "php" => Language::Php,
            "dart" => Language::Dart,
            "cs" => Language::CSharp,
            _ => Language::Unknown,
        }
    }

    /// Detect language from a repo-relative path.
    pub fn from_path(path: &str) -> Self {
        let name = file_name(path);
        match name.rfind('.') {
            Some(idx) if idx > 0 => Language::from_extension(&name[idx + 1..]),
            _ => Language::Unknown,
        }
    }

    pub fn is_analyzable(self) -> bool {
        self != Language::Unknown
    }
}

/// A directed import relationship between two repository files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedEdge {
    pub source: String,
    pub target: String,
}

impl ResolvedEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn id(&self) -> String {
        format!("{}->{}", self.source, self.target)
    }
}

/// Path-convention category used for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Entry,
    Test,
    Api,
    Component,
    Util,
    Model,
    Service,
    Config,
    Docs,
    Source,
    Folder,
}

/// A node of the presented graph: a file in import mode, a directory or
/// loose file in structure mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub file_type: FileType,
    pub color: String,
    pub lines: u64,
    pub in_degree: usize,
    pub out_degree: usize,
    pub purpose: String,
}

/// How the graph was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphMode {
    Imports,
    Structure,
    Empty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total_files: usize,
    pub analyzed_files: usize,
    pub resolved_edges: usize,
}

/// Complete result of one dependency-graph computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowchartResult {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<ResolvedEdge>,
    pub mode: GraphMode,
    pub stats: GraphStats,
}

impl FlowchartResult {
    /// Terminal result when the repository listing could not be obtained.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            mode: GraphMode::Empty,
            stats: GraphStats::default(),
        }
    }
}
