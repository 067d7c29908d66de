//! REST API handlers for the Depflow server

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use depflow_core::{file_name, FileType, FlowchartResult, GraphMode, GraphStats};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

use crate::{PathSanitizer, ServerState};

#[derive(Debug, Default, Deserialize)]
pub struct FlowchartQuery {
    pub branch: Option<String>,
}

/// Response structure for the flowchart API
#[derive(Debug, Serialize)]
pub struct FlowchartResponse {
    pub success: bool,
    pub nodes: Vec<NodeResponse>,
    pub edges: Vec<EdgeResponse>,
    pub mode: GraphMode,
    pub stats: GraphStats,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeResponse {
    pub id: String,
    pub label: String,
    pub full_path: String,
    pub file_type: FileType,
    pub color: String,
    pub imports: usize,
    pub imported_by: usize,
    pub lines: u64,
    pub purpose: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeResponse {
    pub id: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl FlowchartResponse {
    pub fn from_result(result: &FlowchartResult, sanitizer: &dyn PathSanitizer) -> Self {
        let nodes = result
            .nodes
            .iter()
            .map(|node| NodeResponse {
                id: node.id.clone(),
                label: file_name(&node.id).to_string(),
                full_path: sanitizer.normalize(&node.id),
                file_type: node.file_type,
                color: node.color.clone(),
                imports: node.out_degree,
                imported_by: node.in_degree,
                lines: node.lines,
                purpose: node.purpose.clone(),
            })
            .collect();
        let edges = result
            .edges
            .iter()
            .map(|edge| EdgeResponse {
                id: edge.id(),
                source: edge.source.clone(),
                target: edge.target.clone(),
            })
            .collect();
        Self {
            success: true,
            nodes,
            edges,
            mode: result.mode,
            stats: result.stats,
        }
    }
}

fn internal_error(message: String) -> Response {
    tracing::error!("Flowchart request failed: {}", message);
    let body = ErrorResponse {
        success: false,
        error: "INTERNAL_SERVER_ERROR".to_string(),
        message,
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected panic".to_string()
    }
}

/// Compute (or read from cache) the dependency graph of `owner/repo`.
///
/// Unlistable repositories come back as a successful empty graph; only
/// pipeline faults and panics produce a 500.
pub async fn get_flowchart(
    State(state): State<Arc<ServerState>>,
    Path((owner, repo)): Path<(String, String)>,
    Query(query): Query<FlowchartQuery>,
) -> Response {
    tracing::info!("Flowchart request for {}/{}", owner, repo);

    let computation = state
        .coordinator
        .compute(&owner, &repo, query.branch.as_deref());
    match AssertUnwindSafe(computation).catch_unwind().await {
        Ok(Ok(result)) => {
            Json(FlowchartResponse::from_result(&result, state.sanitizer.as_ref())).into_response()
        }
        Ok(Err(e)) => internal_error(e.to_string()),
        Err(payload) => internal_error(panic_message(payload)),
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(health)
}
