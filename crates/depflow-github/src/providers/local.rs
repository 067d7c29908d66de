//! Local checkout provider for offline analysis

use crate::provider::{ContentProvider, ProviderError, TreeProvider};
use async_trait::async_trait;
use depflow_core::FileEntry;
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// Serves a repository checked out on disk. Owner, repo and branch are
/// ignored; the listing honors `.gitignore`.
pub struct LocalProvider {
    root: PathBuf,
}

impl LocalProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn walk(root: &Path) -> Result<Vec<FileEntry>, ProviderError> {
        if !root.is_dir() {
            return Err(ProviderError::NotFound(root.display().to_string()));
        }

        let mut entries = Vec::new();
        for result in WalkBuilder::new(root).hidden(true).sort_by_file_name(|a, b| a.cmp(b)).build() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Cannot read entry: {}", e);
                    continue;
                }
            };
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let path = relative
                .components()
                .filter_map(|c| match c {
                    Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("/");
            if path.is_empty() {
                continue;
            }

            match entry.file_type() {
                Some(ft) if ft.is_dir() => entries.push(FileEntry::tree(path)),
                Some(ft) if ft.is_file() => {
                    let size = entry.metadata().ok().map(|m| m.len());
                    entries.push(FileEntry::blob(path, size));
                }
                _ => {}
            }
        }
        Ok(entries)
    }
}

#[async_trait]
impl TreeProvider for LocalProvider {
    async fn fetch_tree(
        &self,
        _owner: &str,
        _repo: &str,
        _branch: &str,
    ) -> Result<Vec<FileEntry>, ProviderError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || Self::walk(&root))
            .await
            .map_err(|e| ProviderError::Io(std::io::Error::other(e)))?
    }

    fn name(&self) -> &str {
        "local checkout"
    }
}

#[async_trait]
impl ContentProvider for LocalProvider {
    async fn fetch_content(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _branch: &str,
    ) -> Result<String, ProviderError> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(ProviderError::NotFound(path.to_string()));
        }
        let bytes = tokio::fs::read(self.root.join(relative)).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
