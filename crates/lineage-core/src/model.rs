use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key of a node in a [`NormalizedGraph`].
///
/// Catalog objects use the decimal form of their API id; external references use an
/// [`ExternalNodeKey`]. The two spaces never overlap because external keys carry a prefix.
pub type NodeKey = String;

pub const UNKNOWN_OBJECT_TYPE: &str = "unknown";

/// Direction of a single Lineage API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upstream,
    Downstream,
}

/// Direction selected in the UI. `Both` is not a request direction; it is served by one or two
/// requests depending on the configured strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewDirection {
    #[default]
    Upstream,
    Downstream,
    Both,
}

impl From<Direction> for ViewDirection {
    fn from(value: Direction) -> Self {
        match value {
            Direction::Upstream => ViewDirection::Upstream,
            Direction::Downstream => ViewDirection::Downstream,
        }
    }
}

impl fmt::Display for ViewDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViewDirection::Upstream => "upstream",
            ViewDirection::Downstream => "downstream",
            ViewDirection::Both => "both",
        })
    }
}

impl std::str::FromStr for ViewDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upstream" | "up" => Ok(Self::Upstream),
            "downstream" | "down" => Ok(Self::Downstream),
            "both" => Ok(Self::Both),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "UPPERCASE")]
pub enum DependencyType {
    #[default]
    Direct,
    Indirect,
}

impl From<String> for DependencyType {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("indirect") {
            Self::Indirect
        } else {
            Self::Direct
        }
    }
}

/// Backend-assigned certainty of an inferred dependency. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "UPPERCASE")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl From<String> for Confidence {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Self::High,
            "MEDIUM" => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Root,
    Internal,
    External,
}

/// Catalog address of a root/internal node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRef {
    pub source_name: String,
    pub schema_name: String,
    pub object_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: NodeKey,
    pub kind: NodeKind,
    pub qualified_name: String,
    pub object_type: String,
    pub distance: u32,
    /// Present for root and internal nodes only; externals have no catalog identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogRef>,
}

impl GraphNode {
    pub fn is_external(&self) -> bool {
        self.kind == NodeKind::External
    }

    pub fn is_root(&self) -> bool {
        self.kind == NodeKind::Root
    }

    /// Short label for display: the object name without its qualifiers.
    pub fn label(&self) -> &str {
        match &self.catalog {
            Some(c) if !c.object_name.is_empty() => &c.object_name,
            _ => &self.qualified_name,
        }
    }
}

/// Deterministic identity of an external reference.
///
/// Built from `(schema or "", object_name)`; the schema length is encoded so that a `:` inside
/// either part can never make two distinct pairs collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExternalNodeKey(String);

impl ExternalNodeKey {
    pub const PREFIX: &'static str = "ext:";

    pub fn new(schema_name: Option<&str>, object_name: &str) -> Self {
        let schema = schema_name.map(str::trim).unwrap_or("");
        let object = object_name.trim();
        Self(format!("{}{}:{schema}:{object}", Self::PREFIX, schema.len()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_external_key(key: &str) -> bool {
        key.starts_with(Self::PREFIX)
    }
}

impl fmt::Display for ExternalNodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dependency between two nodes, stored in dependency order.
///
/// `dependency_from` is the consumer and `dependency_to` the producer. Rendering wants data-flow
/// order instead; use [`GraphEdge::source`] / [`GraphEdge::target`] for that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub dependency_from: NodeKey,
    pub dependency_to: NodeKey,
    pub dependency_type: DependencyType,
    pub confidence: Confidence,
}

impl GraphEdge {
    /// Visual source: the producer.
    pub fn source(&self) -> &str {
        &self.dependency_to
    }

    /// Visual target: the consumer.
    pub fn target(&self) -> &str {
        &self.dependency_from
    }

    pub fn is_indirect(&self) -> bool {
        self.dependency_type == DependencyType::Indirect
    }

    pub fn id(&self) -> String {
        format!("{}->{}", self.source(), self.target())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedGraph {
    pub root_id: NodeKey,
    pub nodes: IndexMap<NodeKey, GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub direction: ViewDirection,
    pub depth: u32,
    pub truncated: bool,
}

impl NormalizedGraph {
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.get(&self.root_id)
    }

    pub fn node(&self, key: &str) -> Option<&GraphNode> {
        self.nodes.get(key)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edges as `(source, target)` pairs in data-flow order.
    pub fn visual_edges(&self) -> impl Iterator<Item = (&str, &str, &GraphEdge)> + '_ {
        self.edges.iter().map(|e| (e.source(), e.target(), e))
    }

    /// Checks the structural invariants: the root is present and is the only root, every edge
    /// endpoint resolves, and `depth >= 1`.
    pub fn is_consistent(&self) -> bool {
        let roots = self.nodes.values().filter(|n| n.is_root()).count();
        roots == 1
            && self.root().is_some_and(GraphNode::is_root)
            && self.depth >= 1
            && self.edges.iter().all(|e| {
                self.nodes.contains_key(&e.dependency_from)
                    && self.nodes.contains_key(&e.dependency_to)
            })
    }
}
