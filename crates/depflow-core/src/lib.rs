//! Depflow core: data model, import graph, presentation metadata and result cache

pub mod model;
pub mod graph;
pub mod presentation;
pub mod cache;
pub mod config;


#[cfg(test)]
pub mod test_utils;

pub use model::{
    EntryKind, FileEntry, RepoSnapshot, Language, ResolvedEdge, FileType, GraphNode, GraphMode,
    GraphStats, FlowchartResult, file_name, parent_dir, path_depth,
};
pub use graph::ImportGraph;
pub use cache::{CacheKey, CacheError, ResultCache, MemoryCache, CacheStats, DEFAULT_TTL};
pub use config::{Settings, AnalysisLimits, GitHubSettings, CacheSettings, ServerSettings, ConfigError};
