//! Integration tests for Depflow
//!
//! These drive the built binary and the library crates together against
//! repositories laid out in temporary directories.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;

use depflow_core::{AnalysisLimits, GraphMode};
use depflow_github::{LocalProvider, MemoryProvider};
use depflow_indexer::Coordinator;
use depflow_server::DepflowServer;
use depflow_server::ServerConfig;
use serde_json::Value;

fn depflow(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_depflow"))
        .args(args)
        .current_dir(cwd)
        .env_remove("DEPFLOW_CONFIG")
        .output()
        .expect("Failed to execute depflow")
}

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

#[test]
fn test_cli_invocation() {
    let dir = tempfile::tempdir().unwrap();
    let output = depflow(&["--help"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("depflow"));
    assert!(stdout.contains("Cross-language dependency graphs"));
}

#[test]
fn test_version_command() {
    let dir = tempfile::tempdir().unwrap();
    let output = depflow(&["version"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_graph_local_checkout() {
    let repo = tempfile::tempdir().unwrap();
    write(repo.path(), "src/a.ts", "import { b } from './b';\n");
    write(repo.path(), "src/b.ts", "export const b = 1;\n");

    let cwd = tempfile::tempdir().unwrap();
    let root = repo.path().to_string_lossy().into_owned();
    let output = depflow(&["graph", "--path", &root], cwd.path());

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let body: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["mode"], "imports");
    assert_eq!(body["edges"][0]["id"], "src/a.ts->src/b.ts");
    assert_eq!(body["stats"]["resolvedEdges"], 1);
}

#[test]
fn test_graph_rejects_malformed_target() {
    let cwd = tempfile::tempdir().unwrap();
    let output = depflow(&["graph", "not-a-target"], cwd.path());

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("owner/repo"));
}

#[tokio::test]
async fn test_docs_checkout_falls_back_to_structure() {
    let repo = tempfile::tempdir().unwrap();
    write(repo.path(), "README.md", "# docs\n");
    write(repo.path(), "guide/intro.md", "hello\n");
    write(repo.path(), "guide/setup.md", "world\n");

    let coordinator = Coordinator::from_provider(
        Arc::new(LocalProvider::new(repo.path())),
        AnalysisLimits::default(),
    );
    let result = coordinator.compute("local", "docs", None).await.unwrap();

    assert_eq!(result.mode, GraphMode::Structure);
    assert!(result.nodes.iter().any(|n| n.id == "guide"));
    assert!(result.nodes.iter().any(|n| n.id == "README.md"));
    assert_eq!(result.stats.resolved_edges, 0);
}

#[tokio::test]
async fn test_server_state_shares_coordinator() {
    let coordinator = Arc::new(Coordinator::from_provider(
        Arc::new(MemoryProvider::new().with_file("main.py", "import os\n")),
        AnalysisLimits::default(),
    ));
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };

    let server = DepflowServer::new(Arc::clone(&coordinator), config);
    let state = server.state();
    assert!(Arc::ptr_eq(&state.coordinator, &coordinator));

    let result = state.coordinator.compute("acme", "tool", None).await.unwrap();
    assert_eq!(result.stats.total_files, 1);
}
