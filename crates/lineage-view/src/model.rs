use lineage_core::{GraphEdge, GraphNode, NodeKey, NormalizedGraph, ViewDirection};
use serde::{Deserialize, Serialize};

pub fn truncation_notice(depth: u32) -> String {
    format!("Lineage truncated at depth {depth}: some dependencies are not shown.")
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// True when the two boxes share interior area. Touching edges do not count.
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: GraphNode,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PositionedNode {
    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.x - self.width / 2.0,
            min_y: self.y - self.height / 2.0,
            max_x: self.x + self.width / 2.0,
            max_y: self.y + self.height / 2.0,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.bounds().contains(x, y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedEdge {
    /// Unique within the graph; `source->target`, suffixed when the pair repeats.
    pub id: String,
    /// Visual source (producer).
    pub source: NodeKey,
    /// Visual target (consumer).
    pub target: NodeKey,
    #[serde(flatten)]
    pub edge: GraphEdge,
    pub points: Vec<LayoutPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedGraph {
    pub root_id: NodeKey,
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<PositionedEdge>,
    /// `None` when there is nothing to draw.
    pub bounds: Option<Bounds>,
    pub direction: ViewDirection,
    pub depth: u32,
    pub truncated: bool,
}

impl PositionedGraph {
    /// A graph with nothing to draw that still carries the request metadata of `graph`.
    pub fn empty_for(graph: &NormalizedGraph) -> Self {
        Self {
            root_id: graph.root_id.clone(),
            nodes: Vec::new(),
            edges: Vec::new(),
            bounds: None,
            direction: graph.direction,
            depth: graph.depth,
            truncated: graph.truncated,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn truncation_notice(&self) -> Option<String> {
        self.truncated.then(|| truncation_notice(self.depth))
    }

    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|n| n.node.id == id)
    }

    /// Topmost node whose box contains the graph-space point. Later nodes are drawn on top.
    pub fn node_at(&self, x: f64, y: f64) -> Option<&PositionedNode> {
        self.nodes.iter().rev().find(|n| n.contains(x, y))
    }

    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }
}
