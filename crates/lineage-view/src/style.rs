//! Visual encoding of nodes and edges.

use lineage_core::{Confidence, GraphEdge, GraphNode, LineageConfig};

pub const EXTERNAL_DASH: &str = "6 4";
pub const INDIRECT_DASH: &str = "5 5";

const FALLBACK_BORDER_COLOR: &str = "#94a3b8";

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub border_color: String,
    pub border_width: f64,
    /// `stroke-dasharray` value, if the border is dashed.
    pub dash: Option<&'static str>,
}

impl NodeStyle {
    pub fn is_dashed(&self) -> bool {
        self.dash.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyle {
    pub stroke_width: f64,
    pub opacity: f64,
    pub dash: Option<&'static str>,
}

impl EdgeStyle {
    pub fn is_dashed(&self) -> bool {
        self.dash.is_some()
    }
}

/// Border color by object type; externals are always dashed and the root is drawn heavier.
pub fn node_style(node: &GraphNode, config: &LineageConfig) -> NodeStyle {
    let border_color = config
        .border_color(&node.object_type)
        .unwrap_or(FALLBACK_BORDER_COLOR)
        .to_string();
    NodeStyle {
        border_color,
        border_width: if node.is_root() { 3.0 } else { 1.5 },
        dash: node.is_external().then_some(EXTERNAL_DASH),
    }
}

/// Stroke weight and opacity follow confidence; indirect dependencies are dashed.
pub fn edge_style(edge: &GraphEdge) -> EdgeStyle {
    let (stroke_width, opacity) = match edge.confidence {
        Confidence::High => (2.5, 1.0),
        Confidence::Medium => (1.75, 0.7),
        Confidence::Low => (1.0, 0.4),
    };
    EdgeStyle {
        stroke_width,
        opacity,
        dash: edge.is_indirect().then_some(INDIRECT_DASH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::{DependencyType, NodeKind};

    fn node(kind: NodeKind, object_type: &str) -> GraphNode {
        GraphNode {
            id: "1".to_string(),
            kind,
            qualified_name: "a.b.c".to_string(),
            object_type: object_type.to_string(),
            distance: 1,
            catalog: None,
        }
    }

    #[test]
    fn external_nodes_are_dashed_whatever_their_type() {
        let cfg = LineageConfig::default();
        for object_type in ["TABLE", "VIEW", "unknown"] {
            assert!(node_style(&node(NodeKind::External, object_type), &cfg).is_dashed());
            assert!(!node_style(&node(NodeKind::Internal, object_type), &cfg).is_dashed());
        }
    }

    #[test]
    fn border_color_is_keyed_by_object_type() {
        let cfg = LineageConfig::default();
        let table = node_style(&node(NodeKind::Internal, "table"), &cfg);
        let view = node_style(&node(NodeKind::Internal, "VIEW"), &cfg);
        let other = node_style(&node(NodeKind::Internal, "unknown"), &cfg);
        assert_eq!(table.border_color, "#2563eb");
        assert_eq!(view.border_color, "#16a34a");
        assert_eq!(other.border_color, "#94a3b8");
    }

    #[test]
    fn root_border_is_heavier() {
        let cfg = LineageConfig::default();
        let root = node_style(&node(NodeKind::Root, "TABLE"), &cfg);
        let internal = node_style(&node(NodeKind::Internal, "TABLE"), &cfg);
        assert!(root.border_width > internal.border_width);
    }

    #[test]
    fn edge_weight_follows_confidence() {
        let mut e = GraphEdge {
            dependency_from: "2".to_string(),
            dependency_to: "1".to_string(),
            dependency_type: DependencyType::Direct,
            confidence: Confidence::High,
        };
        let high = edge_style(&e);
        e.confidence = Confidence::Medium;
        let medium = edge_style(&e);
        e.confidence = Confidence::Low;
        let low = edge_style(&e);

        assert_eq!((high.stroke_width, high.opacity), (2.5, 1.0));
        assert_eq!((medium.stroke_width, medium.opacity), (1.75, 0.7));
        assert_eq!((low.stroke_width, low.opacity), (1.0, 0.4));
        assert!(!low.is_dashed());

        e.dependency_type = DependencyType::Indirect;
        assert_eq!(edge_style(&e).dash, Some(INDIRECT_DASH));
    }
}
