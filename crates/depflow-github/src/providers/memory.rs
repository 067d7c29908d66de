//! In-memory provider with injectable failures

use crate::provider::{ContentProvider, ProviderError, TreeProvider};
use async_trait::async_trait;
use depflow_core::FileEntry;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A fake repository. Directories are listed only when added explicitly;
/// content fetches can be made to fail per path and tree fetches per branch.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    entries: Vec<FileEntry>,
    contents: HashMap<String, String>,
    failing_paths: HashSet<String>,
    failing_branches: HashSet<String>,
    tree_calls: AtomicUsize,
    content_calls: AtomicUsize,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content; its size is the content length.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.entries.push(FileEntry::blob(path, Some(content.len() as u64)));
        self.contents.insert(path.to_string(), content.to_string());
        self
    }

    /// Add a listed file whose content is not available.
    pub fn with_listed_file(mut self, path: &str, size: Option<u64>) -> Self {
        self.entries.push(FileEntry::blob(path, size));
        self
    }

    pub fn with_dir(mut self, path: &str) -> Self {
        self.entries.push(FileEntry::tree(path));
        self
    }

    pub fn failing_path(mut self, path: &str) -> Self {
        self.failing_paths.insert(path.to_string());
        self
    }

    pub fn failing_branch(mut self, branch: &str) -> Self {
        self.failing_branches.insert(branch.to_string());
        self
    }

    pub fn tree_calls(&self) -> usize {
        self.tree_calls.load(Ordering::SeqCst)
    }

    pub fn content_calls(&self) -> usize {
        self.content_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TreeProvider for MemoryProvider {
    async fn fetch_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<FileEntry>, ProviderError> {
        self.tree_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_branches.contains(branch) {
            return Err(ProviderError::NotFound(format!("{owner}/{repo}@{branch}")));
        }
        Ok(self.entries.clone())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl ContentProvider for MemoryProvider {
    async fn fetch_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _branch: &str,
    ) -> Result<String, ProviderError> {
        self.content_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_paths.contains(path) {
            return Err(ProviderError::Status {
                url: path.to_string(),
                status: 500,
            });
        }
        self.contents
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(path.to_string()))
    }
}
