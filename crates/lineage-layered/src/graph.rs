//! A small directed multigraph keyed by string ids.
//!
//! Nodes keep insertion order (they live in an `IndexMap`), and edges are stored by node index.
//! Layout phases work on indices; ids only matter at the API boundary.

use crate::{EdgeLabel, GraphLabel, LayoutError, NodeLabel};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEntry {
    pub v: usize,
    pub w: usize,
    pub label: EdgeLabel,
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    label: GraphLabel,
    nodes: IndexMap<String, NodeLabel>,
    edges: Vec<EdgeEntry>,
}

impl Graph {
    pub fn new(label: GraphLabel) -> Self {
        Self {
            label,
            nodes: IndexMap::new(),
            edges: Vec::new(),
        }
    }

    pub fn graph(&self) -> &GraphLabel {
        &self.label
    }

    pub fn graph_mut(&mut self) -> &mut GraphLabel {
        &mut self.label
    }

    /// Inserts a node, or replaces the label of an existing one. Returns its index.
    pub fn set_node(&mut self, id: impl Into<String>, label: NodeLabel) -> usize {
        let (idx, _) = self.nodes.insert_full(id.into(), label);
        idx
    }

    pub fn node(&self, id: &str) -> Option<&NodeLabel> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeLabel> {
        self.nodes.get_mut(id)
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn node_id(&self, idx: usize) -> Option<&str> {
        self.nodes.get_index(idx).map(|(id, _)| id.as_str())
    }

    pub fn node_at(&self, idx: usize) -> Option<&NodeLabel> {
        self.nodes.get_index(idx).map(|(_, n)| n)
    }

    pub fn node_at_mut(&mut self, idx: usize) -> Option<&mut NodeLabel> {
        self.nodes.get_index_mut(idx).map(|(_, n)| n)
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &NodeLabel)> + '_ {
        self.nodes.iter().map(|(id, n)| (id.as_str(), n))
    }

    /// Adds an edge between two existing nodes. Parallel edges are allowed.
    pub fn set_edge(&mut self, v: &str, w: &str, label: EdgeLabel) -> Result<usize, LayoutError> {
        let Some(vi) = self.node_index(v) else {
            return Err(LayoutError::UnknownNode { id: v.to_string() });
        };
        let Some(wi) = self.node_index(w) else {
            return Err(LayoutError::UnknownNode { id: w.to_string() });
        };
        self.edges.push(EdgeEntry {
            v: vi,
            w: wi,
            label,
        });
        Ok(self.edges.len() - 1)
    }

    /// Adds `a -> b -> c ...`, creating missing nodes with an empty label.
    pub fn set_path(&mut self, path: &[&str]) {
        for id in path {
            if !self.has_node(id) {
                self.set_node(*id, NodeLabel::default());
            }
        }
        for pair in path.windows(2) {
            let _ = self.set_edge(pair[0], pair[1], EdgeLabel::default());
        }
    }

    pub fn edges(&self) -> &[EdgeEntry] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Indices of edges leaving `v`, in insertion order.
    pub fn out_edges(&self, v: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.v == v)
            .map(|(idx, _)| idx)
    }

    pub fn for_each_node_mut(&mut self, mut f: impl FnMut(&str, &mut NodeLabel)) {
        for (id, n) in self.nodes.iter_mut() {
            f(id, n);
        }
    }

    pub fn for_each_edge_mut(&mut self, mut f: impl FnMut(&mut EdgeEntry)) {
        for e in &mut self.edges {
            f(e);
        }
    }
}
