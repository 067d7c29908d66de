//! Orchestrates one dependency-graph computation per request

use crate::assembler::Assembler;
use crate::error::PipelineError;
use crate::fallback::build_structure;
use crate::fetcher::{fetch_all, FetchTarget};
use crate::languages::StrategyRegistry;
use crate::paths::FileIndex;
use crate::ranker::Ranker;
use depflow_core::{
    AnalysisLimits, CacheKey, FlowchartResult, GraphMode, RepoSnapshot, ResultCache, DEFAULT_TTL,
};
use depflow_github::{alternate_branch, ContentProvider, TreeProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runs fetch-tree, rank, fetch-content, assemble and fallback, with the
/// result cache in front.
pub struct Coordinator {
    tree: Arc<dyn TreeProvider>,
    content: Arc<dyn ContentProvider>,
    cache: Option<Arc<dyn ResultCache>>,
    ttl: Duration,
    registry: StrategyRegistry,
    ranker: Ranker,
    limits: AnalysisLimits,
}

impl Coordinator {
    pub fn new(
        tree: Arc<dyn TreeProvider>,
        content: Arc<dyn ContentProvider>,
        limits: AnalysisLimits,
    ) -> Self {
        Self {
            tree,
            content,
            cache: None,
            ttl: DEFAULT_TTL,
            registry: StrategyRegistry::default(),
            ranker: Ranker::new(),
            limits,
        }
    }

    /// One provider serving both listings and contents.
    pub fn from_provider<P>(provider: Arc<P>, limits: AnalysisLimits) -> Self
    where
        P: TreeProvider + ContentProvider + 'static,
    {
        Self::new(provider.clone(), provider, limits)
    }

    pub fn with_cache(mut self, cache: Arc<dyn ResultCache>, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.ttl = ttl;
        self
    }

    /// Compute the graph for `owner/repo`, from the cache when fresh.
    ///
    /// A repository or branch that cannot be listed is not an error: the
    /// result is the empty graph. Empty results are never cached.
    pub async fn compute(
        &self,
        owner: &str,
        repo: &str,
        branch: Option<&str>,
    ) -> Result<Arc<FlowchartResult>, PipelineError> {
        if owner.trim().is_empty() || repo.trim().is_empty() {
            return Err(PipelineError::InvalidTarget {
                owner: owner.to_string(),
                repo: repo.to_string(),
            });
        }

        let key = CacheKey::new(owner, repo);
        if let Some(cache) = &self.cache {
            match cache.get(&key) {
                Ok(Some(hit)) => {
                    debug!("Cache hit for {key}");
                    return Ok(hit);
                }
                Ok(None) => debug!("Cache miss for {key}"),
                Err(e) => warn!("Cache unavailable, computing {key} uncached: {e}"),
            }
        }

        let branch = branch
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(self.limits.default_branch.as_str());
        let Some(snapshot) = self.fetch_snapshot(owner, repo, branch).await else {
            return Ok(Arc::new(FlowchartResult::empty()));
        };

        let result = Arc::new(self.analyze(&snapshot).await?);

        if result.mode != GraphMode::Empty {
            if let Some(cache) = &self.cache {
                if let Err(e) = cache.set(key.clone(), Arc::clone(&result), self.ttl) {
                    warn!("Failed to cache result for {key}: {e}");
                }
            }
        }
        Ok(result)
    }

    /// List the tree at `branch`, retrying once on the alternate branch.
    async fn fetch_snapshot(&self, owner: &str, repo: &str, branch: &str) -> Option<RepoSnapshot> {
        let (branch, entries) = match self.tree.fetch_tree(owner, repo, branch).await {
            Ok(entries) => (branch.to_string(), entries),
            Err(first) => {
                let alternate = alternate_branch(branch);
                warn!(
                    "Tree fetch for {owner}/{repo}@{branch} via {} failed ({first}), trying {alternate}",
                    self.tree.name()
                );
                match self.tree.fetch_tree(owner, repo, alternate).await {
                    Ok(entries) => (alternate.to_string(), entries),
                    Err(second) => {
                        warn!("Tree fetch for {owner}/{repo}@{alternate} failed ({second}), returning empty graph");
                        return None;
                    }
                }
            }
        };
        info!("Listed {} entries of {owner}/{repo}@{branch}", entries.len());
        Some(RepoSnapshot {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch,
            entries,
        })
    }

    /// Everything after the listing: filter, rank, fetch, assemble, fallback.
    pub async fn analyze(&self, snapshot: &RepoSnapshot) -> Result<FlowchartResult, PipelineError> {
        let files = FileIndex::from_entries(&snapshot.entries);
        if files.is_empty() {
            info!("{}/{} has no files", snapshot.owner, snapshot.repo);
            return Ok(FlowchartResult::empty());
        }

        let ranked = self
            .ranker
            .rank(snapshot.blobs(), self.limits.max_analyzed_files);
        if ranked.is_empty() {
            info!("No analyzable files, building structure graph");
            return Ok(build_structure(&snapshot.entries, &self.limits, 0));
        }
        let order: Vec<String> = ranked.into_iter().map(|s| s.path).collect();

        let target = FetchTarget {
            owner: &snapshot.owner,
            repo: &snapshot.repo,
            branch: &snapshot.branch,
        };
        let contents = fetch_all(
            self.content.as_ref(),
            target,
            &order,
            self.limits.fetch_batch_size,
        )
        .await;
        info!("Fetched {} of {} ranked files", contents.len(), order.len());

        let assembler = Assembler::new(&self.registry, &files, self.limits.max_graph_nodes);
        let result = assembler.assemble(&order, &contents)?;
        if result.edges.is_empty() {
            info!("No imports resolved, building structure graph");
            return Ok(build_structure(&snapshot.entries, &self.limits, contents.len()));
        }

        info!(
            "Import graph: {} nodes, {} edges",
            result.nodes.len(),
            result.edges.len()
        );
        Ok(result)
    }
}
