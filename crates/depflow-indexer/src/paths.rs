//! Repository path arithmetic and the file index resolvers look up against

use depflow_core::{parent_dir, FileEntry};
use std::collections::{HashMap, HashSet};

/// Collapse `.`, `..` and empty segments. Returns `None` when the path would
/// climb above the repository root.
pub fn normalize(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            s => parts.push(s),
        }
    }
    Some(parts.join("/"))
}

/// Join a relative reference onto a directory and normalize.
pub fn join(dir: &str, relative: &str) -> Option<String> {
    if dir.is_empty() {
        normalize(relative)
    } else {
        normalize(&format!("{dir}/{relative}"))
    }
}

/// `dir/name`, or `name` at the root.
pub fn child(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

/// Every blob path of a snapshot, in listing order, with set and directory
/// lookups. Anything a resolver returns comes out of this index.
#[derive(Debug, Default)]
pub struct FileIndex {
    files: Vec<String>,
    set: HashSet<String>,
    sizes: HashMap<String, Option<u64>>,
    by_dir: HashMap<String, Vec<usize>>,
}

impl FileIndex {
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a FileEntry>) -> Self {
        let mut index = FileIndex::default();
        for entry in entries.into_iter().filter(|e| e.is_blob()) {
            if !index.set.insert(entry.path.clone()) {
                continue;
            }
            let position = index.files.len();
            index.files.push(entry.path.clone());
            index.sizes.insert(entry.path.clone(), entry.size);
            index
                .by_dir
                .entry(parent_dir(&entry.path).to_string())
                .or_default()
                .push(position);
        }
        index
    }

    pub fn from_paths(paths: &[&str]) -> Self {
        let entries: Vec<FileEntry> = paths.iter().map(|p| FileEntry::blob(*p, None)).collect();
        Self::from_entries(&entries)
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.set.contains(path)
    }

    pub fn size(&self, path: &str) -> Option<u64> {
        self.sizes.get(path).copied().flatten()
    }

    /// Exact membership check returning the stored path.
    pub fn get(&self, candidate: &str) -> Option<String> {
        self.set.get(candidate).cloned()
    }

    /// `base` itself, then `base.{ext}` for each extension in order.
    pub fn with_extensions(&self, base: &str, extensions: &[&str]) -> Option<String> {
        if base.is_empty() {
            return None;
        }
        self.get(base).or_else(|| {
            extensions
                .iter()
                .find_map(|ext| self.get(&format!("{base}.{ext}")))
        })
    }

    /// `base.{ext}` for each extension, without the bare `base`.
    pub fn first_extension(&self, base: &str, extensions: &[&str]) -> Option<String> {
        if base.is_empty() {
            return None;
        }
        extensions
            .iter()
            .find_map(|ext| self.get(&format!("{base}.{ext}")))
    }

    /// First path in listing order equal to `suffix` or ending in `/suffix`.
    pub fn find_suffix(&self, suffix: &str) -> Option<String> {
        if suffix.is_empty() {
            return None;
        }
        let slashed = format!("/{suffix}");
        self.files
            .iter()
            .find(|f| f.as_str() == suffix || f.ends_with(&slashed))
            .cloned()
    }

    /// First file directly inside `dir` accepted by `predicate`, in listing order.
    pub fn first_in_dir(&self, dir: &str, predicate: impl Fn(&str) -> bool) -> Option<String> {
        self.by_dir
            .get(dir)?
            .iter()
            .map(|&i| &self.files[i])
            .find(|f| predicate(f))
            .cloned()
    }
}
