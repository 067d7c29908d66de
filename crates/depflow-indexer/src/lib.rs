//! Dependency-graph pipeline: per-language import analysis, ranking,
//! content fetching, graph assembly and the directory-structure fallback

pub mod assembler;
pub mod coordinator;
pub mod error;
pub mod fallback;
pub mod fetcher;
pub mod languages;
pub mod paths;
pub mod ranker;

#[cfg(test)]
pub mod tests;

pub use assembler::Assembler;
pub use coordinator::Coordinator;
pub use error::PipelineError;
pub use fallback::build_structure;
pub use fetcher::{fetch_all, FetchTarget};
pub use languages::{LanguageStrategy, StrategyRegistry};
pub use paths::FileIndex;
pub use ranker::{is_analyzable, Ranker, ScoredFile};
