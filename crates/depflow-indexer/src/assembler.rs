//! Import-mode graph assembly: edges, degree truncation, node metadata

use crate::error::PipelineError;
use crate::languages::StrategyRegistry;
use crate::paths::FileIndex;
use depflow_core::presentation::{classify_file, color_for, describe_purpose, estimate_lines};
use depflow_core::{FlowchartResult, GraphMode, GraphNode, GraphStats, ImportGraph, ResolvedEdge};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

pub struct Assembler<'a> {
    registry: &'a StrategyRegistry,
    files: &'a FileIndex,
    max_nodes: usize,
}

impl<'a> Assembler<'a> {
    pub fn new(registry: &'a StrategyRegistry, files: &'a FileIndex, max_nodes: usize) -> Self {
        Self {
            registry,
            files,
            max_nodes,
        }
    }

    /// Extract, classify and resolve every fetched file, in `order`.
    pub fn build_graph(&self, order: &[String], contents: &HashMap<String, String>) -> ImportGraph {
        let mut graph = ImportGraph::new();

        for source in order {
            let Some(text) = contents.get(source) else {
                continue;
            };
            let Some(strategy) = self.registry.for_path(source) else {
                continue;
            };

            let specifiers = strategy.extract(text);
            let mut resolved = 0usize;
            for specifier in &specifiers {
                if strategy.is_external(specifier) {
                    continue;
                }
                let Some(target) = strategy.resolve(specifier, source, self.files) else {
                    continue;
                };
                if graph.add_edge(source, &target) {
                    resolved += 1;
                }
            }
            debug!(
                "{source}: {} specifiers, {resolved} new edges",
                specifiers.len()
            );
        }

        graph
    }

    /// Full import-mode result. The result may carry zero edges; choosing the
    /// structure fallback is the caller's decision.
    pub fn assemble(
        &self,
        order: &[String],
        contents: &HashMap<String, String>,
    ) -> Result<FlowchartResult, PipelineError> {
        let mut graph = self.build_graph(order, contents);

        let removed = graph.retain_top_by_degree(self.max_nodes);
        if removed > 0 {
            info!(
                "Truncated import graph to {} files ({removed} dropped by degree)",
                graph.node_count()
            );
        }

        let edges = graph.edges();
        let nodes: Vec<GraphNode> = graph
            .paths()
            .map(|path| self.present(path, &graph, contents))
            .collect();

        check_consistency(&nodes, &edges)?;

        Ok(FlowchartResult {
            stats: GraphStats {
                total_files: self.files.len(),
                analyzed_files: contents.len(),
                resolved_edges: edges.len(),
            },
            nodes,
            edges,
            mode: GraphMode::Imports,
        })
    }

    fn present(&self, path: &str, graph: &ImportGraph, contents: &HashMap<String, String>) -> GraphNode {
        let file_type = classify_file(path);
        let in_degree = graph.in_degree(path);
        let out_degree = graph.out_degree(path);
        GraphNode {
            id: path.to_string(),
            file_type,
            color: color_for(file_type).to_string(),
            lines: estimate_lines(contents.get(path).map(String::as_str), self.files.size(path)),
            in_degree,
            out_degree,
            purpose: describe_purpose(file_type, in_degree, out_degree),
        }
    }
}

/// Every edge joins two distinct retained nodes and appears once.
pub(crate) fn check_consistency(nodes: &[GraphNode], edges: &[ResolvedEdge]) -> Result<(), PipelineError> {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut seen = HashSet::with_capacity(edges.len());
    for edge in edges {
        if edge.source == edge.target {
            return Err(PipelineError::InconsistentGraph(format!("self-loop {}", edge.id())));
        }
        if !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str()) {
            return Err(PipelineError::InconsistentGraph(format!("dangling edge {}", edge.id())));
        }
        if !seen.insert((edge.source.as_str(), edge.target.as_str())) {
            return Err(PipelineError::InconsistentGraph(format!("duplicate edge {}", edge.id())));
        }
    }
    Ok(())
}
