//! Bounded-concurrency content retrieval

use depflow_github::ContentProvider;
use futures_util::future::join_all;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Which repository and branch the fetched paths belong to.
#[derive(Debug, Clone, Copy)]
pub struct FetchTarget<'a> {
    pub owner: &'a str,
    pub repo: &'a str,
    pub branch: &'a str,
}

/// Fetch `paths` in sequential groups of `batch_size` concurrent requests.
///
/// A failed fetch, or one returning empty text, leaves its path out of the
/// map; nothing else is affected.
pub async fn fetch_all(
    provider: &dyn ContentProvider,
    target: FetchTarget<'_>,
    paths: &[String],
    batch_size: usize,
) -> HashMap<String, String> {
    let mut contents = HashMap::with_capacity(paths.len());

    for batch in paths.chunks(batch_size.max(1)) {
        let fetches = batch.iter().map(|path| async move {
            let result = provider
                .fetch_content(target.owner, target.repo, path, target.branch)
                .await;
            (path, result)
        });

        for (path, result) in join_all(fetches).await {
            match result {
                Ok(text) if text.is_empty() => debug!("Skipping empty file {path}"),
                Ok(text) => {
                    contents.insert(path.clone(), text);
                }
                Err(e) => warn!("Failed to fetch {path}: {e}"),
            }
        }
    }

    debug!("Fetched {}/{} files", contents.len(), paths.len());
    contents
}
