//! CLI command implementations

use anyhow::{Context, bail};
use depflow_core::{MemoryCache, Settings};
use depflow_github::{GitHubProvider, LocalProvider};
use depflow_indexer::Coordinator;
use depflow_server::handlers::FlowchartResponse;
use depflow_server::{DefaultSanitizer, DepflowServer, ServerConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(path)?;
    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}

fn github_coordinator(settings: &Settings) -> anyhow::Result<Coordinator> {
    let provider = Arc::new(GitHubProvider::new(&settings.github)?);
    let coordinator = Coordinator::from_provider(provider, settings.analysis.clone());
    if settings.cache.enabled {
        Ok(coordinator.with_cache(Arc::new(MemoryCache::new()), settings.cache.ttl()))
    } else {
        Ok(coordinator)
    }
}

pub async fn serve(settings: Settings, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let config = ServerConfig {
        host: host.unwrap_or_else(|| settings.server.host.clone()),
        port: port.unwrap_or(settings.server.port),
    };
    tracing::info!("Starting Depflow server on {}:{}", config.host, config.port);

    let coordinator = Arc::new(github_coordinator(&settings)?);
    DepflowServer::new(coordinator, config).start().await
}

fn split_target(target: &str) -> anyhow::Result<(&str, &str)> {
    match target.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => bail!("expected owner/repo, got {:?}", target),
    }
}

pub async fn graph(
    settings: Settings,
    target: Option<String>,
    branch: Option<String>,
    path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let result = match (path, target) {
        (Some(root), _) => {
            let repo = root
                .canonicalize()
                .with_context(|| format!("cannot open {}", root.display()))?
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "root".to_string());
            tracing::info!("Analyzing local checkout {}", root.display());
            let coordinator =
                Coordinator::from_provider(Arc::new(LocalProvider::new(root)), settings.analysis.clone());
            coordinator.compute("local", &repo, branch.as_deref()).await?
        }
        (None, Some(target)) => {
            let (owner, repo) = split_target(&target)?;
            github_coordinator(&settings)?
                .compute(owner, repo, branch.as_deref())
                .await?
        }
        (None, None) => bail!("either owner/repo or --path is required"),
    };

    tracing::info!(
        "{} nodes, {} edges ({:?})",
        result.nodes.len(),
        result.edges.len(),
        result.mode
    );
    let response = FlowchartResponse::from_result(&result, &DefaultSanitizer);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
