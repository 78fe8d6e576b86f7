//! Break cycles by reversing a DFS feedback arc set.
//!
//! Ranking needs a DAG. Edges that close a cycle during a depth-first walk (in node insertion
//! order) are flipped for the duration of the layout; their routes are flipped back when they
//! are written out, so callers never observe the reversal.

use crate::graph::Graph;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedEdge {
    pub v: usize,
    pub w: usize,
    pub reversed: bool,
    pub minlen: usize,
    pub weight: f64,
}

impl OrientedEdge {
    pub fn is_self_loop(&self) -> bool {
        self.v == self.w
    }
}

/// Indices of the edges that close a cycle. Self-loops are never part of the set.
pub fn feedback_arc_set(g: &Graph) -> Vec<usize> {
    let n = g.node_count();
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (idx, e) in g.edges().iter().enumerate() {
        if e.v != e.w {
            out[e.v].push(idx);
        }
    }

    let mut visited = vec![false; n];
    let mut on_stack = vec![false; n];
    let mut fas: Vec<usize> = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        on_stack[start] = true;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some(&(v, pos)) = stack.last() {
            let Some(&edge_idx) = out[v].get(pos) else {
                on_stack[v] = false;
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            let w = g.edges()[edge_idx].w;
            if on_stack[w] {
                fas.push(edge_idx);
            } else if !visited[w] {
                visited[w] = true;
                on_stack[w] = true;
                stack.push((w, 0));
            }
        }
    }
    fas
}

/// Returns every edge of `g` in an orientation that makes the graph acyclic.
pub fn orient(g: &Graph) -> Vec<OrientedEdge> {
    let mut reversed = vec![false; g.edge_count()];
    for idx in feedback_arc_set(g) {
        reversed[idx] = true;
    }

    g.edges()
        .iter()
        .zip(reversed)
        .map(|(e, rev)| {
            let (v, w) = if rev { (e.w, e.v) } else { (e.v, e.w) };
            OrientedEdge {
                v,
                w,
                reversed: rev,
                minlen: e.label.minlen.max(1),
                weight: if e.label.weight.is_finite() {
                    e.label.weight.max(0.0)
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Kahn check, ignoring self-loops.
pub fn is_acyclic(node_count: usize, edges: &[OrientedEdge]) -> bool {
    topological_order(node_count, edges).len() == node_count
}

/// Nodes in topological order (ties in index order). Nodes on a cycle are left out.
pub fn topological_order(node_count: usize, edges: &[OrientedEdge]) -> Vec<usize> {
    let mut indegree = vec![0usize; node_count];
    let mut out: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for e in edges.iter().filter(|e| !e.is_self_loop()) {
        indegree[e.w] += 1;
        out[e.v].push(e.w);
    }

    let mut queue: VecDeque<usize> = (0..node_count).filter(|&v| indegree[v] == 0).collect();
    let mut topo: Vec<usize> = Vec::with_capacity(node_count);
    while let Some(v) = queue.pop_front() {
        topo.push(v);
        for &w in &out[v] {
            indegree[w] -= 1;
            if indegree[w] == 0 {
                queue.push_back(w);
            }
        }
    }
    topo
}
