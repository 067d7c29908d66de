/// Faults with no degraded result to fall back on.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("owner and repository must be non-empty, got {owner:?}/{repo:?}")]
    InvalidTarget { owner: String, repo: String },
    #[error("assembled graph is inconsistent: {0}")]
    InconsistentGraph(String),
}
