use lineage_core::{LineageConfig, NormalizedGraph, normalize, parse_payload};
use lineage_view::{LayoutEngine, PositionedGraph, SvgRenderOptions, render_svg};
use serde_json::json;

fn graph(truncated: bool) -> NormalizedGraph {
    normalize(
        &parse_payload(
            &json!({
                "root": {"id": 1, "source_name": "warehouse", "schema_name": "public",
                         "object_name": "users", "object_type": "TABLE", "distance": 0},
                "nodes": [
                    {"id": 2, "source_name": "warehouse", "schema_name": "public",
                     "object_name": "orders<view>", "object_type": "VIEW", "distance": 1}
                ],
                "external_nodes": [
                    {"schema_name": "raw", "object_name": "events", "distance": 1}
                ],
                "edges": [
                    {"from_id": 2, "to_id": 1, "dependency_type": "DIRECT", "confidence": "HIGH"},
                    {"from_id": 2, "to_external": {"schema_name": "raw", "object_name": "events"},
                     "dependency_type": "INDIRECT", "confidence": "LOW"}
                ],
                "direction": "upstream",
                "depth": 2,
                "truncated": truncated
            })
            .to_string(),
        )
        .unwrap(),
    )
}

fn render(g: &PositionedGraph) -> String {
    render_svg(g, &LineageConfig::default(), &SvgRenderOptions::default())
}

#[test]
fn renders_nodes_edges_and_encoding() {
    let svg = render(&LayoutEngine::default().layout_sync(&graph(false)));
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>"));
    assert_eq!(svg.matches(r#"<g class="node "#).count(), 3);
    assert_eq!(svg.matches(r#"<path class="edge""#).count(), 2);
    assert!(svg.contains(r#"class="node root""#));
    assert!(svg.contains(r#"class="node external""#));
    assert!(svg.contains("stroke=\"#2563eb\""));
    assert!(svg.contains(r#"stroke-dasharray="5 5""#));
    assert!(svg.contains(r#"stroke-dasharray="6 4""#));
    assert!(svg.contains(r#"stroke-width="2.5" stroke-opacity="1""#));
    assert!(svg.contains(r#"stroke-width="1" stroke-opacity="0.4""#));
    assert!(!svg.contains("truncation-notice"));
}

#[test]
fn labels_are_escaped() {
    let svg = render(&LayoutEngine::default().layout_sync(&graph(false)));
    assert!(svg.contains("orders&lt;view&gt;"));
    assert!(!svg.contains("orders<view>"));
}

#[test]
fn truncated_graphs_carry_a_notice() {
    let svg = render(&LayoutEngine::default().layout_sync(&graph(true)));
    assert!(svg.contains(r#"class="truncation-notice""#));
    assert!(svg.contains("depth 2"));
}

#[test]
fn empty_graph_renders_a_placeholder() {
    let svg = render(&PositionedGraph::empty_for(&graph(true)));
    assert!(svg.contains("No lineage to display"));
    assert!(svg.contains("truncation-notice"));
    assert!(!svg.contains("<path class=\"edge\""));
}
