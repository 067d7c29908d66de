//! Import graph wrapper using petgraph::StableDiGraph keyed by file path

use crate::model::ResolvedEdge;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::Direction;
use std::collections::HashMap;

/// Directed file-to-file import graph. Holds no self-loops and no parallel edges.
pub struct ImportGraph {
    inner: StableDiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl std::fmt::Debug for ImportGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportGraph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl ImportGraph {
    pub fn new() -> Self {
        ImportGraph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    fn node_for(&mut self, path: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(path) {
            return idx;
        }
        let idx = self.inner.add_node(path.to_string());
        self.index.insert(path.to_string(), idx);
        idx
    }

    /// Register `source -> target`. Returns false for self-loops and duplicates.
    pub fn add_edge(&mut self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        if let (Some(&s), Some(&t)) = (self.index.get(source), self.index.get(target)) {
            if self.inner.find_edge(s, t).is_some() {
                return false;
            }
        }
        let s = self.node_for(source);
        let t = self.node_for(target);
        self.inner.add_edge(s, t, ());
        true
    }

    /// Number of connected files.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    pub fn in_degree(&self, path: &str) -> usize {
        self.degree(path, Direction::Incoming)
    }

    pub fn out_degree(&self, path: &str) -> usize {
        self.degree(path, Direction::Outgoing)
    }

    /// Edges touching `path`, in plus out.
    pub fn total_degree(&self, path: &str) -> usize {
        self.in_degree(path) + self.out_degree(path)
    }

    fn degree(&self, path: &str, dir: Direction) -> usize {
        self.index
            .get(path)
            .map_or(0, |&idx| self.inner.edges_directed(idx, dir).count())
    }

    /// Connected files in first-connected order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx).map(String::as_str))
    }

    /// Edges in registration order.
    pub fn edges(&self) -> Vec<ResolvedEdge> {
        self.inner
            .edge_indices()
            .filter_map(|idx| {
                let (s, t) = self.inner.edge_endpoints(idx)?;
                Some(ResolvedEdge::new(
                    self.inner.node_weight(s)?.clone(),
                    self.inner.node_weight(t)?.clone(),
                ))
            })
            .collect()
    }

    /// Keep only the `cap` files with the highest total degree, dropping every
    /// edge with an endpoint outside the kept set. Equal degrees keep
    /// first-connected order. Returns the number of removed files.
    pub fn retain_top_by_degree(&mut self, cap: usize) -> usize {
        if self.node_count() <= cap {
            return 0;
        }

        let mut ranked: Vec<(NodeIndex, usize)> = self
            .inner
            .node_indices()
            .map(|idx| {
                let degree = self.inner.edges_directed(idx, Direction::Incoming).count()
                    + self.inner.edges_directed(idx, Direction::Outgoing).count();
                (idx, degree)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let mut removed = 0;
        for (idx, _) in ranked.into_iter().skip(cap) {
            if let Some(path) = self.inner.remove_node(idx) {
                self.index.remove(&path);
                removed += 1;
            }
        }
        removed
    }
}

impl Default for ImportGraph {
    fn default() -> Self {
        Self::new()
    }
}
