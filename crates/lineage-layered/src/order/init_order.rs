use crate::normalize::LayerGraph;

/// Initial layering: a depth-first walk from every node in (rank, index) order, appending each
/// node to its rank the first time it is seen. Connected nodes end up close together.
pub fn init_order(lg: &LayerGraph) -> Vec<Vec<usize>> {
    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); lg.layers.len().max(1)];
    let mut visited = vec![false; lg.nodes.len()];

    let mut starts: Vec<usize> = (0..lg.nodes.len()).collect();
    starts.sort_by_key(|&v| (lg.nodes[v].rank, v));

    for start in starts {
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            if visited[v] {
                continue;
            }
            visited[v] = true;
            if let Some(layer) = layers.get_mut(lg.nodes[v].rank) {
                layer.push(v);
            }
            for &(w, _) in lg.succ[v].iter().rev() {
                if !visited[w] {
                    stack.push(w);
                }
            }
        }
    }
    layers
}
