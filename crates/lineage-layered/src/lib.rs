#![forbid(unsafe_code)]

//! Layered (Sugiyama-style) layout for directed graphs.
//!
//! The pipeline follows the classic dagre phases:
//! 1. break cycles by reversing a DFS feedback arc set ([`acyclic`])
//! 2. assign ranks by longest path ([`rank`])
//! 3. split edges spanning several ranks into chains of dummy nodes ([`normalize`])
//! 4. order each rank to reduce crossings ([`order`])
//! 5. assign coordinates ([`position`]) and map them to the requested [`RankDir`]
//!    ([`coordinate_system`])
//!
//! Every phase breaks ties by insertion order, so the same graph always yields the same layout.

pub mod acyclic;
pub mod coordinate_system;
pub mod graph;
pub mod normalize;
pub mod order;
pub mod position;
pub mod rank;

pub use graph::{EdgeEntry, Graph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl std::str::FromStr for RankDir {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TB" | "TD" => Ok(Self::TB),
            "BT" => Ok(Self::BT),
            "LR" => Ok(Self::LR),
            "RL" => Ok(Self::RL),
            other => Err(LayoutError::InvalidGraphLabel {
                message: format!("unknown rank direction `{other}`"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphLabel {
    pub rankdir: RankDir,
    /// Space between adjacent nodes of the same rank.
    pub nodesep: f64,
    /// Space between ranks.
    pub ranksep: f64,
    /// Space reserved around dummy nodes of long edges.
    pub edgesep: f64,
    /// Number of barycenter sweeps used to reduce crossings.
    pub order_sweeps: usize,
    /// Filled by [`layout`].
    pub width: f64,
    /// Filled by [`layout`].
    pub height: f64,
}

impl Default for GraphLabel {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            nodesep: 50.0,
            ranksep: 50.0,
            edgesep: 10.0,
            order_sweeps: 8,
            width: 0.0,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeLabel {
    pub width: f64,
    pub height: f64,
    /// Center x, filled by [`layout`].
    pub x: Option<f64>,
    /// Center y, filled by [`layout`].
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,
}

impl NodeLabel {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub minlen: usize,
    pub weight: f64,
    /// Route from the edge's source to its target, filled by [`layout`].
    pub points: Vec<Point>,
}

impl Default for EdgeLabel {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            points: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("edge references unknown node `{id}`")]
    UnknownNode { id: String },
    #[error("node `{id}` has an invalid size ({width} x {height})")]
    InvalidNodeSize { id: String, width: f64, height: f64 },
    #[error("invalid graph settings: {message}")]
    InvalidGraphLabel { message: String },
}

fn validate(g: &Graph) -> Result<(), LayoutError> {
    let label = g.graph();
    for (name, value) in [
        ("nodesep", label.nodesep),
        ("ranksep", label.ranksep),
        ("edgesep", label.edgesep),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(LayoutError::InvalidGraphLabel {
                message: format!("{name} must be a finite, non-negative number (got {value})"),
            });
        }
    }
    for (id, n) in g.nodes() {
        let ok = n.width.is_finite() && n.height.is_finite() && n.width >= 0.0 && n.height >= 0.0;
        if !ok {
            return Err(LayoutError::InvalidNodeSize {
                id: id.to_string(),
                width: n.width,
                height: n.height,
            });
        }
    }
    Ok(())
}

/// Lays out `g` in place: node centers, ranks and orders, edge routes, and the graph size.
pub fn layout(g: &mut Graph) -> Result<(), LayoutError> {
    validate(g)?;
    if g.node_count() == 0 {
        let label = g.graph_mut();
        label.width = 0.0;
        label.height = 0.0;
        return Ok(());
    }

    coordinate_system::adjust(g);

    let oriented = acyclic::orient(g);
    let ranks = rank::longest_path(g.node_count(), &oriented);
    let mut lg = normalize::LayerGraph::build(g, &ranks, &oriented);

    let sweeps = g.graph().order_sweeps;
    order::order(&mut lg, sweeps);

    let label = g.graph().clone();
    position::position(&mut lg, &label);

    normalize::write_back(&lg, g, &oriented);
    coordinate_system::undo(g);
    translate(g);
    Ok(())
}

/// Shifts everything so the top-left corner of the drawing sits at the origin.
fn translate(g: &mut Graph) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for (_, n) in g.nodes() {
        let (Some(x), Some(y)) = (n.x, n.y) else {
            continue;
        };
        min_x = min_x.min(x - n.width / 2.0);
        min_y = min_y.min(y - n.height / 2.0);
        max_x = max_x.max(x + n.width / 2.0);
        max_y = max_y.max(y + n.height / 2.0);
    }
    for e in g.edges() {
        for p in &e.label.points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
    }
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }

    g.for_each_node_mut(|_, n| {
        n.x = n.x.map(|x| x - min_x);
        n.y = n.y.map(|y| y - min_y);
    });
    g.for_each_edge_mut(|e| {
        for p in &mut e.label.points {
            p.x -= min_x;
            p.y -= min_y;
        }
    });

    let label = g.graph_mut();
    label.width = max_x - min_x;
    label.height = max_y - min_y;
}
