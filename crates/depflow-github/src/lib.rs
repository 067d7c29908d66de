//! Repository access for Depflow
//!
//! This crate defines the two collaborators the dependency-graph pipeline
//! consumes, a tree listing and a per-file content fetch, along with the
//! code-hosting (GitHub) implementation, a local-checkout implementation,
//! and an in-memory implementation for tests.

pub mod provider;
pub mod providers;


pub use provider::{ContentProvider, ProviderError, TreeProvider, alternate_branch};
pub use providers::github::GitHubProvider;
pub use providers::local::LocalProvider;
pub use providers::memory::MemoryProvider;
