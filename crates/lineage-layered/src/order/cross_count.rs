use crate::normalize::LayerGraph;

/// Weighted number of edge crossings between consecutive layers.
pub fn cross_count(lg: &LayerGraph, layers: &[Vec<usize>]) -> f64 {
    layers
        .windows(2)
        .map(|pair| two_layer_cross_count(lg, &pair[0], &pair[1]))
        .sum()
}

// Accumulator-tree count (Barth, Jünger & Mutzel): each edge, taken in north order, adds the
// weight of the already-seen edges that end strictly to its right.
fn two_layer_cross_count(lg: &LayerGraph, north: &[usize], south: &[usize]) -> f64 {
    if south.is_empty() {
        return 0.0;
    }

    let mut south_pos: Vec<Option<usize>> = vec![None; lg.nodes.len()];
    for (i, &v) in south.iter().enumerate() {
        south_pos[v] = Some(i);
    }

    let mut entries: Vec<(usize, f64)> = Vec::new();
    for &v in north {
        let mut out: Vec<(usize, f64)> = lg.succ[v]
            .iter()
            .filter_map(|&(w, weight)| south_pos[w].map(|pos| (pos, weight)))
            .collect();
        out.sort_by_key(|&(pos, _)| pos);
        entries.extend(out);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let mut tree = vec![0.0f64; 2 * first_index - 1];
    first_index -= 1;

    let mut crossings = 0.0;
    for (pos, weight) in entries {
        let mut index = pos + first_index;
        tree[index] += weight;
        let mut right_weight = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                right_weight += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += weight;
        }
        crossings += weight * right_weight;
    }
    crossings
}
