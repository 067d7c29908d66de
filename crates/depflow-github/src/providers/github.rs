//! GitHub provider: git trees API for listings, raw host for content

use crate::provider::{ContentProvider, ProviderError, TreeProvider};
use async_trait::async_trait;
use depflow_core::{FileEntry, GitHubSettings};
use reqwest::{StatusCode, Url};
use serde::Deserialize;

pub struct GitHubProvider {
    client: reqwest::Client,
    api_base: String,
    raw_base: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
    size: Option<u64>,
}

impl GitHubProvider {
    pub fn new(settings: &GitHubSettings) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            raw_base: settings.raw_base.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    fn url(base: &str, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = Url::parse(base).map_err(|e| ProviderError::Decode(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Decode(format!("cannot append path to {base}")))?
            .extend(segments.iter().flat_map(|s| s.split('/')));
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, ProviderError> {
        let response = self
            .authorized(self.client.get(url.clone()))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(ProviderError::NotFound(url.to_string())),
            status => Err(ProviderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl TreeProvider for GitHubProvider {
    async fn fetch_tree(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<FileEntry>, ProviderError> {
        let mut url = Self::url(&self.api_base, &["repos", owner, repo, "git", "trees", branch])?;
        url.query_pairs_mut().append_pair("recursive", "1");

        let body: TreeResponse = self
            .get(url)
            .await?
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if body.truncated {
            tracing::warn!("Tree listing for {}/{}@{} was truncated by the API", owner, repo, branch);
        }

        let entries = body
            .tree
            .into_iter()
            .filter_map(|item| match item.kind.as_str() {
                "blob" => Some(FileEntry::blob(item.path, item.size)),
                "tree" => Some(FileEntry::tree(item.path)),
                // submodule commits and anything else are not files of this repo
                _ => None,
            })
            .collect();
        Ok(entries)
    }

    fn name(&self) -> &str {
        "GitHub"
    }
}

#[async_trait]
impl ContentProvider for GitHubProvider {
    async fn fetch_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<String, ProviderError> {
        let url = Self::url(&self.raw_base, &[owner, repo, branch, path])?;
        let text = self.get(url).await?.text().await?;
        Ok(text)
    }
}
