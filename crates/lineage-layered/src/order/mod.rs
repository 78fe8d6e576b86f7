//! Crossing reduction.
//!
//! Starts from a DFS-based initial order and alternates downward and upward barycenter sweeps,
//! keeping the best layering seen (by weighted crossing count).

pub mod barycenter;
pub mod cross_count;
pub mod init_order;

pub use barycenter::{barycenter, sort_layer};
pub use cross_count::cross_count;
pub use init_order::init_order;

use crate::normalize::LayerGraph;

fn positions(node_count: usize, layers: &[Vec<usize>]) -> Vec<usize> {
    let mut pos = vec![0usize; node_count];
    for layer in layers {
        for (i, &v) in layer.iter().enumerate() {
            pos[v] = i;
        }
    }
    pos
}

fn sweep(lg: &LayerGraph, layers: &mut [Vec<usize>], downward: bool) {
    let mut pos = positions(lg.nodes.len(), layers);
    let ranks: Vec<usize> = if downward {
        (1..layers.len()).collect()
    } else {
        (0..layers.len().saturating_sub(1)).rev().collect()
    };

    for r in ranks {
        let neighbors = if downward { &lg.pred } else { &lg.succ };
        let bcs: Vec<Option<f64>> = layers[r]
            .iter()
            .map(|&v| barycenter(&neighbors[v], &pos))
            .collect();
        layers[r] = sort_layer(&layers[r], &bcs);
        for (i, &v) in layers[r].iter().enumerate() {
            pos[v] = i;
        }
    }
}

pub fn order(lg: &mut LayerGraph, sweeps: usize) {
    let mut layers = init_order(lg);
    let mut best = layers.clone();
    let mut best_cc = cross_count(lg, &layers);

    for i in 0..sweeps {
        if best_cc == 0.0 {
            break;
        }
        sweep(lg, &mut layers, i % 2 == 0);
        let cc = cross_count(lg, &layers);
        if cc < best_cc {
            best_cc = cc;
            best = layers.clone();
        }
    }

    for layer in &best {
        for (i, &v) in layer.iter().enumerate() {
            lg.nodes[v].order = i;
        }
    }
    lg.layers = best;
}
