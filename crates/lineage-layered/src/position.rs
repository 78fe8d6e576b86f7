//! Coordinate assignment.
//!
//! Works in the top-to-bottom frame: ranks are stacked along y, and within a rank nodes are
//! placed along x in their final order. x positions are refined by alternating passes that pull
//! each node toward the weighted mean of its neighbors in the previous rank, solved per layer as
//! an isotonic regression so the order and minimum separations always hold.

use crate::GraphLabel;
use crate::normalize::LayerGraph;

const ALIGN_PASSES: usize = 4;

pub fn position(lg: &mut LayerGraph, label: &GraphLabel) {
    assign_rank_coordinates(lg, label.ranksep);
    assign_order_coordinates(lg, label);
}

fn assign_rank_coordinates(lg: &mut LayerGraph, ranksep: f64) {
    let mut cursor = 0.0;
    for layer in &lg.layers {
        let max_h = layer
            .iter()
            .map(|&v| lg.nodes[v].height)
            .fold(0.0, f64::max);
        for &v in layer {
            lg.nodes[v].y = cursor + max_h / 2.0;
        }
        cursor += max_h + ranksep;
    }
}

/// Minimum center distance between two neighbors in the same layer.
pub fn separation(lg: &LayerGraph, a: usize, b: usize, label: &GraphLabel) -> f64 {
    let half = |v: usize| {
        let n = &lg.nodes[v];
        let sep = if n.dummy { label.edgesep } else { label.nodesep };
        (n.width + sep) / 2.0
    };
    half(a) + half(b)
}

fn assign_order_coordinates(lg: &mut LayerGraph, label: &GraphLabel) {
    let layers = lg.layers.clone();

    for layer in &layers {
        let mut x = 0.0;
        for (i, &v) in layer.iter().enumerate() {
            if i > 0 {
                x += separation(lg, layer[i - 1], v, label);
            }
            lg.nodes[v].x = x;
        }
    }

    for pass in 0..ALIGN_PASSES {
        let downward = pass % 2 == 0;
        let ranks: Vec<usize> = if downward {
            (1..layers.len()).collect()
        } else {
            (0..layers.len().saturating_sub(1)).rev().collect()
        };
        for r in ranks {
            let layer = &layers[r];
            let desired: Vec<f64> = layer
                .iter()
                .map(|&v| {
                    let neighbors = if downward { &lg.pred[v] } else { &lg.succ[v] };
                    weighted_mean_x(lg, neighbors).unwrap_or(lg.nodes[v].x)
                })
                .collect();
            place_layer(lg, layer, &desired, label);
        }
    }
}

fn weighted_mean_x(lg: &LayerGraph, neighbors: &[(usize, f64)]) -> Option<f64> {
    let (sum, weight) = neighbors
        .iter()
        .fold((0.0, 0.0), |(sum, weight), &(u, w)| {
            (sum + w * lg.nodes[u].x, weight + w)
        });
    (weight > 0.0).then(|| sum / weight)
}

/// Places `layer` as close as possible (least squares) to `desired` while keeping order and
/// separation.
fn place_layer(lg: &mut LayerGraph, layer: &[usize], desired: &[f64], label: &GraphLabel) {
    if layer.is_empty() {
        return;
    }
    let mut offsets = vec![0.0; layer.len()];
    for i in 1..layer.len() {
        offsets[i] = offsets[i - 1] + separation(lg, layer[i - 1], layer[i], label);
    }
    let targets: Vec<f64> = desired
        .iter()
        .zip(&offsets)
        .map(|(d, o)| d - o)
        .collect();
    let fitted = isotonic_fit(&targets);
    for ((&v, z), o) in layer.iter().zip(fitted).zip(&offsets) {
        lg.nodes[v].x = z + o;
    }
}

/// Pool-adjacent-violators: the non-decreasing sequence closest to `values` in least squares.
pub fn isotonic_fit(values: &[f64]) -> Vec<f64> {
    // (sum, count) per block
    let mut blocks: Vec<(f64, usize)> = Vec::with_capacity(values.len());
    for &v in values {
        blocks.push((v, 1));
        while blocks.len() >= 2 {
            let (s2, c2) = blocks[blocks.len() - 1];
            let (s1, c1) = blocks[blocks.len() - 2];
            if s1 / c1 as f64 <= s2 / c2 as f64 {
                break;
            }
            blocks.pop();
            if let Some(last) = blocks.last_mut() {
                *last = (s1 + s2, c1 + c2);
            }
        }
    }

    let mut out = Vec::with_capacity(values.len());
    for (sum, count) in blocks {
        let mean = sum / count as f64;
        out.extend(std::iter::repeat_n(mean, count));
    }
    out
}
