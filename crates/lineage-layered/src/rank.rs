//! Rank assignment (longest path).
//!
//! Sinks start at rank 0 and every other node is placed as close to its successors as `minlen`
//! allows; ranks are then shifted so the smallest one is 0.

use crate::acyclic::{OrientedEdge, topological_order};

pub fn longest_path(node_count: usize, edges: &[OrientedEdge]) -> Vec<i32> {
    let mut out: Vec<Vec<&OrientedEdge>> = vec![Vec::new(); node_count];
    for e in edges.iter().filter(|e| !e.is_self_loop()) {
        out[e.v].push(e);
    }

    let mut ranks = vec![0i32; node_count];
    for &v in topological_order(node_count, edges).iter().rev() {
        let mut rank: Option<i32> = None;
        for e in &out[v] {
            let minlen = i32::try_from(e.minlen).unwrap_or(i32::MAX / 4);
            let candidate = ranks[e.w].saturating_sub(minlen);
            rank = Some(rank.map_or(candidate, |current| current.min(candidate)));
        }
        ranks[v] = rank.unwrap_or(0);
    }

    normalize_ranks(&mut ranks);
    ranks
}

pub fn normalize_ranks(ranks: &mut [i32]) {
    let Some(min) = ranks.iter().copied().min() else {
        return;
    };
    for r in ranks.iter_mut() {
        *r -= min;
    }
}

/// How much longer than its `minlen` an edge is.
pub fn slack(ranks: &[i32], e: &OrientedEdge) -> i32 {
    let minlen = i32::try_from(e.minlen).unwrap_or(i32::MAX / 4);
    ranks[e.w] - ranks[e.v] - minlen
}
