//! Tree and content provider contracts

use async_trait::async_trait;
use depflow_core::FileEntry;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: u16 },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Yields the flat file listing of a repository at a branch.
#[async_trait]
pub trait TreeProvider: Send + Sync {
    async fn fetch_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<FileEntry>, ProviderError>;

    /// Get provider name
    fn name(&self) -> &str;
}

/// Yields the raw text of one file.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    async fn fetch_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<String, ProviderError>;
}

/// The branch tried once when the requested branch cannot be listed.
pub fn alternate_branch(branch: &str) -> &'static str {
    match branch {
        "main" => "master",
        _ => "main",
    }
}
