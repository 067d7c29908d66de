//! Pipeline tests against the in-memory provider

use crate::languages::StrategyRegistry;
use crate::paths::FileIndex;
use crate::*;
use depflow_core::{
    AnalysisLimits, CacheError, CacheKey, FlowchartResult, GraphMode, Language, MemoryCache,
    ResultCache,
};
use depflow_github::MemoryProvider;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn pipeline(provider: MemoryProvider) -> (Coordinator, Arc<MemoryProvider>) {
    let provider = Arc::new(provider);
    let coordinator = Coordinator::from_provider(Arc::clone(&provider), AnalysisLimits::default());
    (coordinator, provider)
}

fn assert_well_formed(result: &FlowchartResult) {
    let ids: HashSet<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    let mut pairs = HashSet::new();
    for edge in &result.edges {
        assert_ne!(edge.source, edge.target, "self-loop {}", edge.id());
        assert!(ids.contains(edge.source.as_str()), "dangling source {}", edge.id());
        assert!(ids.contains(edge.target.as_str()), "dangling target {}", edge.id());
        assert!(pairs.insert((edge.source.clone(), edge.target.clone())), "duplicate {}", edge.id());
    }
    for node in &result.nodes {
        let out = result.edges.iter().filter(|e| e.source == node.id).count();
        let inc = result.edges.iter().filter(|e| e.target == node.id).count();
        assert_eq!((node.in_degree, node.out_degree), (inc, out), "degrees of {}", node.id);
    }
}

#[tokio::test]
async fn test_typescript_pair() {
    let (coordinator, _) = pipeline(
        MemoryProvider::new()
            .with_file("src/a.ts", "import { x } from './b'")
            .with_file("src/b.ts", "export const x = 1;"),
    );

    let result = coordinator.compute("acme", "app", None).await.unwrap();

    assert_eq!(result.mode, GraphMode::Imports);
    assert_eq!(result.edges.len(), 1);
    assert_eq!(result.edges[0].id(), "src/a.ts->src/b.ts");
    assert_eq!(result.stats.resolved_edges, 1);
    assert_eq!(result.stats.total_files, 2);
    assert_well_formed(&result);
}

#[tokio::test]
async fn test_readme_only_falls_back_to_structure() {
    let (coordinator, provider) = pipeline(MemoryProvider::new().with_file("README.md", "# hi\n"));

    let result = coordinator.compute("acme", "docs", None).await.unwrap();

    assert_eq!(result.mode, GraphMode::Structure);
    assert!(!result.nodes.is_empty());
    assert!(result.edges.is_empty());
    assert_eq!(result.stats.resolved_edges, 0);
    // nothing analyzable, nothing fetched
    assert_eq!(provider.content_calls(), 0);
}

#[tokio::test]
async fn test_unlistable_repository_is_empty_success() {
    let cache = Arc::new(MemoryCache::new());
    let provider = Arc::new(
        MemoryProvider::new()
            .with_file("src/a.ts", "")
            .failing_branch("main")
            .failing_branch("master"),
    );
    let coordinator = Coordinator::from_provider(Arc::clone(&provider), AnalysisLimits::default())
        .with_cache(cache.clone(), Duration::from_secs(3600));

    let result = coordinator.compute("acme", "gone", None).await.unwrap();

    assert_eq!(*result, FlowchartResult::empty());
    assert_eq!(provider.tree_calls(), 2);
    assert_eq!(cache.stats().total_entries, 0);
}

#[tokio::test]
async fn test_alternate_branch_retry() {
    let (coordinator, provider) = pipeline(
        MemoryProvider::new()
            .with_file("main.go", "package main\n\nimport \"github.com/acme/tool/util\"\n")
            .with_file("util/util.go", "package util\n")
            .failing_branch("main"),
    );

    let result = coordinator.compute("acme", "tool", None).await.unwrap();
    assert_eq!(result.mode, GraphMode::Imports);
    assert_eq!(result.edges[0].id(), "main.go->util/util.go");
    assert_eq!(provider.tree_calls(), 2);

    // any other branch falls back to main, which fails here
    let (coordinator, provider) = coordinator_with_failing(&["develop", "main"]);
    let result = coordinator.compute("acme", "tool", Some("develop")).await.unwrap();
    assert_eq!(result.mode, GraphMode::Empty);
    assert_eq!(provider.tree_calls(), 2);
}

fn coordinator_with_failing(branches: &[&str]) -> (Coordinator, Arc<MemoryProvider>) {
    let mut provider = MemoryProvider::new().with_file("a.py", "import b\n");
    for branch in branches {
        provider = provider.failing_branch(branch);
    }
    pipeline(provider)
}

#[tokio::test]
async fn test_python_relative_import() {
    let (coordinator, _) = pipeline(
        MemoryProvider::new()
            .with_file("pkg/mod_a.py", "from . import mod_b\n")
            .with_file("pkg/mod_b.py", "VALUE = 1\n"),
    );

    let result = coordinator.compute("acme", "py", None).await.unwrap();

    assert_eq!(result.mode, GraphMode::Imports);
    let edges: Vec<String> = result.edges.iter().map(|e| e.id()).collect();
    assert_eq!(edges, vec!["pkg/mod_a.py->pkg/mod_b.py"]);
}

#[tokio::test]
async fn test_cache_hit_returns_same_result() {
    let cache = Arc::new(MemoryCache::new());
    let provider = Arc::new(
        MemoryProvider::new()
            .with_file("src/a.ts", "import { x } from './b'")
            .with_file("src/b.ts", "export const x = 1;"),
    );
    let coordinator = Coordinator::from_provider(Arc::clone(&provider), AnalysisLimits::default())
        .with_cache(cache.clone(), Duration::from_secs(3600));

    let first = coordinator.compute("acme", "app", None).await.unwrap();
    let calls = provider.content_calls();
    // branch is not part of the key
    let second = coordinator.compute("acme", "app", Some("other")).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.content_calls(), calls);
    assert_eq!(provider.tree_calls(), 1);
    assert!(cache.cached_at(&CacheKey::new("acme", "app")).is_some());
}

#[tokio::test]
async fn test_expired_entry_is_recomputed() {
    let cache = Arc::new(MemoryCache::new());
    let provider = Arc::new(
        MemoryProvider::new()
            .with_file("src/a.ts", "import { x } from './b'")
            .with_file("src/b.ts", "export const x = 1;"),
    );
    let coordinator = Coordinator::from_provider(Arc::clone(&provider), AnalysisLimits::default())
        .with_cache(cache, Duration::from_millis(1));

    let first = coordinator.compute("acme", "app", None).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = coordinator.compute("acme", "app", None).await.unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(*first, *second);
    assert_eq!(provider.tree_calls(), 2);
}

#[tokio::test]
async fn test_expired_entries_do_not_accumulate() {
    let cache = Arc::new(MemoryCache::new());
    let provider = Arc::new(
        MemoryProvider::new()
            .with_file("src/a.ts", "import { x } from './b'")
            .with_file("src/b.ts", "export const x = 1;"),
    );
    let short = Coordinator::from_provider(Arc::clone(&provider), AnalysisLimits::default())
        .with_cache(cache.clone(), Duration::from_millis(1));
    for i in 0..50 {
        short.compute("acme", &format!("app-{i}"), None).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(20)).await;

    let long = Coordinator::from_provider(Arc::clone(&provider), AnalysisLimits::default())
        .with_cache(cache.clone(), Duration::from_secs(3600));
    long.compute("acme", "fresh", None).await.unwrap();

    let stats = cache.stats();
    assert_eq!(stats.expired_entries, 0);
    assert_eq!(stats.total_entries, 1);
}

#[tokio::test]
async fn test_unfetched_target_uses_listed_size() {
    let (coordinator, _) = pipeline(
        MemoryProvider::new()
            .with_file("src/a.ts", "import { big } from './big'")
            .with_listed_file("src/big.ts", Some(3000)),
    );

    let result = coordinator.compute("acme", "app", None).await.unwrap();

    assert_eq!(result.mode, GraphMode::Imports);
    assert_eq!(result.edges[0].id(), "src/a.ts->src/big.ts");
    assert_eq!(result.stats.analyzed_files, 1);
    let big = result.nodes.iter().find(|n| n.id == "src/big.ts").unwrap();
    assert_eq!(big.lines, 100);
    assert_eq!(big.in_degree, 1);
    assert_well_formed(&result);
}

#[tokio::test]
async fn test_listed_directories_become_folder_nodes() {
    let (coordinator, _) = pipeline(
        MemoryProvider::new()
            .with_dir("assets")
            .with_dir("docs")
            .with_file("docs/guide.md", "# guide\n")
            .with_file("README.md", "# hi\n"),
    );

    let result = coordinator.compute("acme", "docs", None).await.unwrap();

    assert_eq!(result.mode, GraphMode::Structure);
    let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["assets", "docs", "README.md"]);
    let assets = &result.nodes[0];
    assert_eq!(assets.file_type, depflow_core::FileType::Folder);
    assert_eq!(assets.purpose, depflow_core::presentation::describe_folder(0));
    assert!(result.edges.is_empty());
}

struct BrokenCache;

impl ResultCache for BrokenCache {
    fn get(&self, _key: &CacheKey) -> Result<Option<Arc<FlowchartResult>>, CacheError> {
        Err(CacheError::Unavailable("down".into()))
    }

    fn set(&self, _key: CacheKey, _value: Arc<FlowchartResult>, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("down".into()))
    }

    fn invalidate(&self, _key: &CacheKey) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("down".into()))
    }
}

#[tokio::test]
async fn test_unavailable_cache_is_bypassed() {
    let provider = Arc::new(MemoryProvider::new().with_file("README.md", "hi"));
    let coordinator = Coordinator::from_provider(provider, AnalysisLimits::default())
        .with_cache(Arc::new(BrokenCache), Duration::from_secs(60));

    let result = coordinator.compute("acme", "app", None).await.unwrap();
    assert_eq!(result.mode, GraphMode::Structure);
}

#[tokio::test]
async fn test_failed_fetches_degrade_to_structure() {
    let (coordinator, _) = pipeline(
        MemoryProvider::new()
            .with_file("src/a.ts", "import { x } from './b'")
            .with_file("src/b.ts", "export const x = 1;")
            .failing_path("src/a.ts"),
    );

    let result = coordinator.compute("acme", "app", None).await.unwrap();

    assert_eq!(result.mode, GraphMode::Structure);
    assert_eq!(result.stats.analyzed_files, 1);
    assert_eq!(result.nodes[0].id, "src");
}

#[tokio::test]
async fn test_empty_listing_is_empty_mode() {
    let (coordinator, _) = pipeline(MemoryProvider::new());
    let result = coordinator.compute("acme", "void", None).await.unwrap();
    assert_eq!(result.mode, GraphMode::Empty);
}

#[tokio::test]
async fn test_invalid_target() {
    let (coordinator, _) = pipeline(MemoryProvider::new());
    let err = coordinator.compute("", "app", None).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidTarget { .. }));
}

#[tokio::test]
async fn test_node_cap_keeps_highest_degree() {
    let mut provider = MemoryProvider::new().with_file("hub.ts", "export const hub = 1;");
    for i in 0..200 {
        provider = provider.with_file(&format!("leaves/leaf{i:03}.ts"), "import { hub } from '../hub';");
    }
    // a second, smaller hub shared by the last leaves
    provider = provider.with_file("shared.ts", "import { hub } from './hub';");
    for i in 0..3 {
        provider = provider.with_file(&format!("extra/e{i}.ts"), "import '../shared';\nimport '../hub';");
    }
    let limits = AnalysisLimits {
        max_analyzed_files: 500,
        ..AnalysisLimits::default()
    };
    let coordinator = Coordinator::from_provider(Arc::new(provider), limits);

    let result = coordinator.compute("acme", "big", None).await.unwrap();

    assert_eq!(result.mode, GraphMode::Imports);
    assert_eq!(result.nodes.len(), 150);
    let ids: HashSet<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    assert!(ids.contains("hub.ts"));
    assert!(ids.contains("shared.ts"));
    assert_well_formed(&result);
}

#[tokio::test]
async fn test_mixed_repository_is_well_formed() {
    let (coordinator, _) = pipeline(
        MemoryProvider::new()
            .with_file("src/lib.rs", "mod graph;\nmod model;\nuse crate::model::Node;\n")
            .with_file("src/graph.rs", "use crate::model::Node;\nuse super::model;\n")
            .with_file("src/model.rs", "pub struct Node;\n")
            .with_file("web/index.ts", "import './app';\nimport './app';\nimport 'react';\n")
            .with_file("web/app.tsx", "export default function App() {}\n")
            .with_file("native/main.c", "#include \"util.h\"\n#include <stdio.h>\n")
            .with_file("native/util.h", "int util(void);\n"),
    );

    let result = coordinator.compute("acme", "mixed", None).await.unwrap();

    assert_eq!(result.mode, GraphMode::Imports);
    assert_well_formed(&result);
    let edges: HashSet<String> = result.edges.iter().map(|e| e.id()).collect();
    assert!(edges.contains("src/lib.rs->src/graph.rs"));
    assert!(edges.contains("src/graph.rs->src/model.rs"));
    assert!(edges.contains("web/index.ts->web/app.tsx"));
    assert!(edges.contains("native/main.c->native/util.h"));
    assert_eq!(result.stats.resolved_edges, result.edges.len());
}

#[test]
fn test_resolve_never_fabricates_paths() {
    let files = FileIndex::from_paths(&[
        "src/index.ts",
        "src/utils/index.js",
        "pkg/__init__.py",
        "pkg/core.py",
        "src/main/java/com/acme/App.java",
        "cmd/app/main.go",
        "src/lib.rs",
        "src/graph/mod.rs",
        "lib/acme.rb",
        "include/acme.h",
        "app/Models/User.php",
        "lib/main.dart",
        "Sources/Kit/Kit.swift",
        "src/Acme/Service.cs",
    ]);
    let registry = StrategyRegistry::default();
    let specifiers = [
        "./utils", "../../x", "@/index", "..", ".", ".core", "...deep", "com.acme.App",
        "com.acme", "github.com/acme/cmd/app", "crate::graph::x", "super::super::y", "mod:graph",
        "relative:../lib/acme", "acme", "acme.h", "../include/acme.h", "App\\Models\\User",
        "package:x/main.dart", "Kit", "Acme.Service", "", "/", "//", "a//b",
    ];

    for language in Language::ANALYZABLE {
        for importer in files.files() {
            for spec in specifiers {
                let first = registry.is_external(spec, language);
                assert_eq!(first, registry.is_external(spec, language));
                if let Some(found) = registry.resolve(spec, importer, language, &files) {
                    assert!(files.contains(&found), "{language:?} resolved {spec} to {found}");
                }
            }
        }
    }
}
