//! Layout Engine: sizes nodes by role, hands the graph to a [`LayoutAlgorithm`], and maps the
//! placement back onto the lineage model.

use crate::model::{Bounds, LayoutPoint, PositionedEdge, PositionedGraph, PositionedNode};
use crate::{Error, Result};
use indexmap::IndexMap;
use lineage_core::{Confidence, GraphNode, LineageConfig, NodeKey, NormalizedGraph};
use lineage_layered::{EdgeLabel, Graph, GraphLabel, LayoutError, NodeLabel, RankDir};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::task::Poll;

#[derive(Debug, Clone, PartialEq)]
pub struct SizedNode {
    pub id: NodeKey,
    pub width: f64,
    pub height: f64,
}

/// An edge in data-flow order.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdgeInput {
    pub source: NodeKey,
    pub target: NodeKey,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// Node centers.
    pub nodes: IndexMap<NodeKey, LayoutPoint>,
    /// One route per input edge, in input order.
    pub routes: Vec<Vec<LayoutPoint>>,
}

/// A directed-graph placement strategy.
pub trait LayoutAlgorithm {
    fn place(
        &self,
        nodes: &[SizedNode],
        edges: &[LayoutEdgeInput],
    ) -> std::result::Result<Placement, LayoutError>;
}

/// [`lineage_layered`] behind [`LayoutAlgorithm`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredLayout {
    pub label: GraphLabel,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self::from_config(&LineageConfig::default())
    }
}

impl LayeredLayout {
    pub fn from_config(config: &LineageConfig) -> Self {
        let defaults = GraphLabel::default();
        let rankdir = config
            .get_str("layout.rankDir")
            .and_then(|s| s.parse::<RankDir>().ok())
            .unwrap_or(RankDir::LR);
        Self {
            label: GraphLabel {
                rankdir,
                nodesep: config.get_f64("layout.nodeSpacing").unwrap_or(40.0),
                ranksep: config.get_f64("layout.rankSpacing").unwrap_or(120.0),
                order_sweeps: config
                    .get_u64("layout.orderSweeps")
                    .map(|n| n as usize)
                    .unwrap_or(defaults.order_sweeps),
                ..defaults
            },
        }
    }
}

impl LayoutAlgorithm for LayeredLayout {
    fn place(
        &self,
        nodes: &[SizedNode],
        edges: &[LayoutEdgeInput],
    ) -> std::result::Result<Placement, LayoutError> {
        let mut g = Graph::new(self.label.clone());
        for n in nodes {
            g.set_node(n.id.clone(), NodeLabel::sized(n.width, n.height));
        }
        for e in edges {
            g.set_edge(
                &e.source,
                &e.target,
                EdgeLabel {
                    weight: e.weight,
                    ..Default::default()
                },
            )?;
        }

        lineage_layered::layout(&mut g)?;

        let mut placed = IndexMap::with_capacity(g.node_count());
        for (id, n) in g.nodes() {
            if let (Some(x), Some(y)) = (n.x, n.y) {
                placed.insert(id.to_string(), LayoutPoint { x, y });
            }
        }
        let routes = g
            .edges()
            .iter()
            .map(|e| {
                e.label
                    .points
                    .iter()
                    .map(|p| LayoutPoint { x: p.x, y: p.y })
                    .collect()
            })
            .collect();
        Ok(Placement {
            nodes: placed,
            routes,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Clone)]
pub struct LayoutOptions {
    pub root_size: NodeSize,
    pub node_size: NodeSize,
    pub algorithm: Arc<dyn LayoutAlgorithm + Send + Sync>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::from_config(&LineageConfig::default())
    }
}

impl LayoutOptions {
    pub fn from_config(config: &LineageConfig) -> Self {
        let size = |w: &str, h: &str, dw: f64, dh: f64| NodeSize {
            width: config.get_f64(w).unwrap_or(dw),
            height: config.get_f64(h).unwrap_or(dh),
        };
        Self {
            root_size: size("layout.rootWidth", "layout.rootHeight", 220.0, 72.0),
            node_size: size("layout.nodeWidth", "layout.nodeHeight", 180.0, 56.0),
            algorithm: Arc::new(LayeredLayout::from_config(config)),
        }
    }

    pub fn with_algorithm(mut self, algorithm: Arc<dyn LayoutAlgorithm + Send + Sync>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn size_for(&self, node: &GraphNode) -> NodeSize {
        if node.is_root() {
            self.root_size
        } else {
            self.node_size
        }
    }
}

/// Heavier edges are kept straighter by the ordering and alignment phases.
fn confidence_weight(confidence: Confidence) -> f64 {
    match confidence {
        Confidence::High => 3.0,
        Confidence::Medium => 2.0,
        Confidence::Low => 1.0,
    }
}

#[derive(Clone, Default)]
pub struct LayoutEngine {
    options: LayoutOptions,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &LineageConfig) -> Self {
        Self::new(LayoutOptions::from_config(config))
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lays out a snapshot of `graph`.
    ///
    /// Yields once before doing the work so callers driving several futures stay responsive.
    /// Never fails: see [`LayoutEngine::layout_sync`].
    pub async fn layout(&self, graph: NormalizedGraph) -> PositionedGraph {
        yield_now().await;
        self.layout_sync(&graph)
    }

    /// Like [`LayoutEngine::try_layout`], but a failure yields an empty graph that keeps the
    /// request metadata, and a warning.
    pub fn layout_sync(&self, graph: &NormalizedGraph) -> PositionedGraph {
        match self.try_layout(graph) {
            Ok(positioned) => positioned,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    "lineage layout failed; showing an empty graph"
                );
                PositionedGraph::empty_for(graph)
            }
        }
    }

    pub fn try_layout(&self, graph: &NormalizedGraph) -> Result<PositionedGraph> {
        let sized: Vec<SizedNode> = graph
            .nodes
            .values()
            .map(|n| {
                let size = self.options.size_for(n);
                SizedNode {
                    id: n.id.clone(),
                    width: size.width,
                    height: size.height,
                }
            })
            .collect();
        let inputs: Vec<LayoutEdgeInput> = graph
            .visual_edges()
            .map(|(source, target, e)| LayoutEdgeInput {
                source: source.to_string(),
                target: target.to_string(),
                weight: confidence_weight(e.confidence),
            })
            .collect();

        let placement = self.options.algorithm.place(&sized, &inputs)?;
        if placement.routes.len() != inputs.len() {
            return Err(Error::IncompleteRouting {
                routed: placement.routes.len(),
                expected: inputs.len(),
            });
        }

        let mut nodes = Vec::with_capacity(sized.len());
        for (s, node) in sized.iter().zip(graph.nodes.values()) {
            let Some(center) = placement.nodes.get(&s.id) else {
                return Err(Error::IncompletePlacement {
                    placed: placement.nodes.len(),
                    expected: sized.len(),
                });
            };
            if !center.x.is_finite() || !center.y.is_finite() {
                return Err(Error::NonFinitePosition { id: s.id.clone() });
            }
            nodes.push(PositionedNode {
                node: node.clone(),
                x: center.x,
                y: center.y,
                width: s.width,
                height: s.height,
            });
        }

        let mut seen: FxHashMap<String, usize> = FxHashMap::default();
        let edges: Vec<PositionedEdge> = graph
            .edges
            .iter()
            .zip(placement.routes)
            .map(|(e, points)| {
                let base = e.id();
                let count = seen.entry(base.clone()).or_insert(0);
                *count += 1;
                let id = if *count == 1 {
                    base
                } else {
                    format!("{base}#{count}")
                };
                PositionedEdge {
                    id,
                    source: e.source().to_string(),
                    target: e.target().to_string(),
                    edge: e.clone(),
                    points,
                }
            })
            .collect();

        let corners = nodes.iter().flat_map(|n| {
            let b = n.bounds();
            [(b.min_x, b.min_y), (b.max_x, b.max_y)]
        });
        let route_points = edges.iter().flat_map(|e| e.points.iter().map(|p| (p.x, p.y)));
        let bounds = Bounds::from_points(corners.chain(route_points));

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            "laid out lineage graph"
        );

        Ok(PositionedGraph {
            root_id: graph.root_id.clone(),
            nodes,
            edges,
            bounds,
            direction: graph.direction,
            depth: graph.depth,
            truncated: graph.truncated,
        })
    }
}

async fn yield_now() {
    let mut yielded = false;
    futures::future::poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}
