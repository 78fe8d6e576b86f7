//! Long-edge normalization and route extraction.
//!
//! After ranking, an edge may span several ranks. Ordering and positioning assume every edge
//! connects adjacent ranks, so long edges are replaced by a chain of zero-height dummy nodes,
//! one per intermediate rank. The dummies' final positions become the bend points of the route.

use crate::acyclic::OrientedEdge;
use crate::graph::Graph;
use crate::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct LayerNode {
    pub width: f64,
    pub height: f64,
    pub rank: usize,
    pub dummy: bool,
    pub order: usize,
    pub x: f64,
    pub y: f64,
}

/// How an original edge is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Nodes visited from the upper rank to the lower one. `reversed` is set when the original
    /// edge points the other way.
    Chain { path: Vec<usize>, reversed: bool },
    SelfLoop { node: usize },
}

/// Working graph for ordering and positioning: the real nodes (same indices as in [`Graph`])
/// followed by dummy nodes, with edges only between adjacent ranks.
#[derive(Debug, Clone)]
pub struct LayerGraph {
    pub nodes: Vec<LayerNode>,
    pub succ: Vec<Vec<(usize, f64)>>,
    pub pred: Vec<Vec<(usize, f64)>>,
    pub layers: Vec<Vec<usize>>,
    /// One entry per edge of the source graph, in the same order.
    pub routes: Vec<Route>,
    pub real_count: usize,
}

impl LayerGraph {
    pub fn build(g: &Graph, ranks: &[i32], edges: &[OrientedEdge]) -> Self {
        let edgesep = g.graph().edgesep;
        let mut nodes: Vec<LayerNode> = g
            .nodes()
            .zip(ranks)
            .map(|((_, n), &rank)| LayerNode {
                width: n.width,
                height: n.height,
                rank: usize::try_from(rank).unwrap_or(0),
                dummy: false,
                order: 0,
                x: 0.0,
                y: 0.0,
            })
            .collect();
        let real_count = nodes.len();
        let mut succ: Vec<Vec<(usize, f64)>> = vec![Vec::new(); real_count];
        let mut pred: Vec<Vec<(usize, f64)>> = vec![Vec::new(); real_count];
        let mut routes: Vec<Route> = Vec::with_capacity(edges.len());

        for e in edges {
            if e.is_self_loop() {
                routes.push(Route::SelfLoop { node: e.v });
                continue;
            }

            let from_rank = nodes[e.v].rank;
            let to_rank = nodes[e.w].rank;
            let mut path = vec![e.v];
            let mut prev = e.v;
            for rank in (from_rank + 1)..to_rank {
                let dummy = nodes.len();
                nodes.push(LayerNode {
                    width: edgesep,
                    height: 0.0,
                    rank,
                    dummy: true,
                    order: 0,
                    x: 0.0,
                    y: 0.0,
                });
                succ.push(Vec::new());
                pred.push(Vec::new());
                succ[prev].push((dummy, e.weight));
                pred[dummy].push((prev, e.weight));
                path.push(dummy);
                prev = dummy;
            }
            succ[prev].push((e.w, e.weight));
            pred[e.w].push((prev, e.weight));
            path.push(e.w);

            routes.push(Route::Chain {
                path,
                reversed: e.reversed,
            });
        }

        let max_rank = nodes.iter().map(|n| n.rank).max().unwrap_or(0);
        Self {
            nodes,
            succ,
            pred,
            layers: vec![Vec::new(); max_rank + 1],
            routes,
            real_count,
        }
    }

    pub fn dummy_count(&self) -> usize {
        self.nodes.len() - self.real_count
    }
}

fn chain_points(lg: &LayerGraph, path: &[usize], reversed: bool) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::with_capacity(path.len());
    let last = path.len().saturating_sub(1);
    for (i, &v) in path.iter().enumerate() {
        let n = &lg.nodes[v];
        let y = if i == 0 {
            n.y + n.height / 2.0
        } else if i == last {
            n.y - n.height / 2.0
        } else {
            n.y
        };
        points.push(Point { x: n.x, y });
    }
    if reversed {
        points.reverse();
    }
    points
}

fn self_loop_points(lg: &LayerGraph, v: usize, reach: f64) -> Vec<Point> {
    let n = &lg.nodes[v];
    let right = n.x + n.width / 2.0;
    vec![
        Point {
            x: right,
            y: n.y - n.height / 4.0,
        },
        Point {
            x: right + reach,
            y: n.y,
        },
        Point {
            x: right,
            y: n.y + n.height / 4.0,
        },
    ]
}

/// Copies positions of real nodes and edge routes back onto `g`.
pub fn write_back(lg: &LayerGraph, g: &mut Graph, edges: &[OrientedEdge]) {
    for (idx, n) in lg.nodes.iter().take(lg.real_count).enumerate() {
        if let Some(label) = g.node_at_mut(idx) {
            label.x = Some(n.x);
            label.y = Some(n.y);
            label.rank = i32::try_from(n.rank).ok();
            label.order = Some(n.order);
        }
    }

    let reach = g.graph().edgesep.max(10.0);
    let routes: Vec<Vec<Point>> = lg
        .routes
        .iter()
        .map(|route| match route {
            Route::Chain { path, reversed } => chain_points(lg, path, *reversed),
            Route::SelfLoop { node } => self_loop_points(lg, *node, reach),
        })
        .collect();
    debug_assert_eq!(routes.len(), edges.len());

    let mut routes = routes.into_iter();
    g.for_each_edge_mut(|e| {
        e.label.points = routes.next().unwrap_or_default();
    });
}
