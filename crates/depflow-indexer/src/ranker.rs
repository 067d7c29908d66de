//! Importance ranking of candidate files for deep analysis

use depflow_core::{file_name, path_depth, FileEntry, Language};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::warn;

const ENTRY_STEMS: &[&str] = &[
    "index", "main", "app", "server", "lib", "mod", "__init__", "__main__", "page", "layout",
    "_app", "_document", "+page", "+layout", "+server", "program", "application", "root",
];

const IMPORTANT_DIRS: &[&str] = &["src", "lib", "app", "components", "core"];

/// Vendored and build output directories never analyzed.
const IGNORED_DIRS: &[&str] = &[
    "node_modules", "vendor", "dist", "build", "target", ".git", "__pycache__", ".next", "Pods",
];

const TEST_GLOBS: &[&str] = &[
    "**/test/**",
    "**/tests/**",
    "**/__tests__/**",
    "**/__mocks__/**",
    "**/spec/**",
    "**/*.test.*",
    "**/*.spec.*",
    "**/*_test.*",
    "**/*_spec.rb",
    "**/test_*.py",
    "**/*Test.java",
    "**/*Test.kt",
    "**/*Tests.cs",
    "**/*Tests.swift",
];

const GENERATED_GLOBS: &[&str] = &[
    "**/*.d.ts",
    "**/*.config.*",
    "**/*.min.js",
    "**/*.generated.*",
    "**/*.g.dart",
    "**/*.freezed.dart",
    "**/*.pb.go",
    "**/*_pb2.py",
    "**/*.Designer.cs",
    "**/AssemblyInfo.cs",
    "**/generated/**",
    "**/migrations/**",
    "**/setup.py",
    "**/conftest.py",
    "**/webpack.*",
    "**/gulpfile.*",
    "**/Gruntfile.*",
    "**/*.gradle.kts",
    "**/build.rs",
];

pub const BASE_SCORE: i64 = 100;
pub const DEPTH_PENALTY: i64 = 5;
pub const ENTRY_BONUS: i64 = 30;
pub const IMPORTANT_DIR_BONUS: i64 = 15;
pub const TEST_PENALTY: i64 = 20;
pub const GENERATED_PENALTY: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredFile {
    pub path: String,
    pub score: i64,
}

fn build_set(patterns: &[&str]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        match GlobBuilder::new(pattern).literal_separator(true).build() {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => warn!("Skipping glob {pattern}: {e}"),
        }
    }
    builder.build().unwrap_or_else(|e| {
        warn!("Failed to build glob set: {e}");
        GlobSet::empty()
    })
}

/// Vendored or build output location.
pub fn is_ignored(path: &str) -> bool {
    path.split('/')
        .rev()
        .skip(1)
        .any(|segment| IGNORED_DIRS.contains(&segment))
}

/// Supported language, outside vendored directories.
pub fn is_analyzable(path: &str) -> bool {
    Language::from_path(path).is_analyzable() && !is_ignored(path)
}

pub struct Ranker {
    test_globs: GlobSet,
    generated_globs: GlobSet,
}

impl Ranker {
    pub fn new() -> Self {
        Self {
            test_globs: build_set(TEST_GLOBS),
            generated_globs: build_set(GENERATED_GLOBS),
        }
    }

    pub fn is_test(&self, path: &str) -> bool {
        self.test_globs.is_match(path)
    }

    pub fn is_generated(&self, path: &str) -> bool {
        self.generated_globs.is_match(path)
    }

    pub fn score(&self, path: &str) -> i64 {
        let mut score = BASE_SCORE - DEPTH_PENALTY * path_depth(path) as i64;

        let name = file_name(path).to_ascii_lowercase();
        let stem = name.split('.').next().unwrap_or(name.as_str());
        if ENTRY_STEMS.contains(&stem) {
            score += ENTRY_BONUS;
        }

        let has_important_dir = path
            .split('/')
            .rev()
            .skip(1)
            .any(|segment| IMPORTANT_DIRS.contains(&segment));
        if has_important_dir {
            score += IMPORTANT_DIR_BONUS;
        }

        if self.is_test(path) {
            score -= TEST_PENALTY;
        }
        if self.is_generated(path) {
            score -= GENERATED_PENALTY;
        }
        score
    }

    /// Top `limit` analyzable blobs by descending score. Equal scores keep
    /// listing order.
    pub fn rank<'a>(
        &self,
        entries: impl IntoIterator<Item = &'a FileEntry>,
        limit: usize,
    ) -> Vec<ScoredFile> {
        let mut scored: Vec<ScoredFile> = entries
            .into_iter()
            .filter(|e| e.is_blob() && is_analyzable(&e.path))
            .map(|e| ScoredFile {
                path: e.path.clone(),
                score: self.score(&e.path),
            })
            .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored.truncate(limit);
        scored
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new()
    }
}
