/// Weighted mean position of `neighbors` in the adjacent layer, or `None` when there are none.
pub fn barycenter(neighbors: &[(usize, f64)], pos: &[usize]) -> Option<f64> {
    let (sum, weight) = neighbors
        .iter()
        .fold((0.0, 0.0), |(sum, weight), &(u, w)| {
            (sum + w * pos[u] as f64, weight + w)
        });
    (weight > 0.0).then(|| sum / weight)
}

/// Reorders a layer by barycenter.
///
/// Nodes without a barycenter keep their slot; the others fill the remaining slots in
/// barycenter order, ties broken by their previous position.
pub fn sort_layer(layer: &[usize], bcs: &[Option<f64>]) -> Vec<usize> {
    let mut sortable: Vec<(f64, usize, usize)> = layer
        .iter()
        .zip(bcs)
        .enumerate()
        .filter_map(|(i, (&v, bc))| bc.map(|bc| (bc, i, v)))
        .collect();
    sortable.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut slots: Vec<Option<usize>> = layer
        .iter()
        .zip(bcs)
        .map(|(&v, bc)| bc.is_none().then_some(v))
        .collect();
    let mut it = sortable.into_iter().map(|(_, _, v)| v);
    for slot in slots.iter_mut().filter(|s| s.is_none()) {
        *slot = it.next();
    }
    slots.into_iter().flatten().collect()
}
