use lineage_core::{
    Confidence, DependencyType, ExternalNodeKey, NodeKind, RawEdge, RawExternalNode, RawLineage,
    RawNode, ViewDirection, merge, normalize, normalize_json, parse_payload,
};
use serde_json::json;

fn scenario_a() -> RawLineage {
    parse_payload(
        &json!({
            "root": {"id": 1, "source_name": "warehouse", "schema_name": "public",
                     "object_name": "users", "object_type": "TABLE", "distance": 0},
            "nodes": [
                {"id": 2, "source_name": "warehouse", "schema_name": "public",
                 "object_name": "orders_view", "object_type": "VIEW", "distance": 1}
            ],
            "external_nodes": [
                {"schema_name": null, "object_name": "s3://bucket/file", "object_type": null, "distance": 1}
            ],
            "edges": [
                {"from_id": 2, "to_id": 1, "to_external": null,
                 "dependency_type": "DIRECT", "confidence": "HIGH"},
                {"from_id": 2, "to_id": null, "to_external": {"object_name": "s3://bucket/file"},
                 "dependency_type": "INDIRECT", "confidence": "MEDIUM"}
            ],
            "direction": "upstream",
            "depth": 1,
            "truncated": false
        })
        .to_string(),
    )
    .unwrap()
}

#[test]
fn scenario_a_produces_three_nodes_and_two_swapped_edges() {
    let g = normalize(&scenario_a());
    assert!(g.is_consistent());
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 2);

    let ext_key = ExternalNodeKey::new(None, "s3://bucket/file");
    let ext = g.node(ext_key.as_str()).unwrap();
    assert_eq!(ext.kind, NodeKind::External);
    assert_eq!(ext.qualified_name, "s3://bucket/file");
    assert_eq!(ext.object_type, "unknown");

    let visual: Vec<(String, String)> = g
        .visual_edges()
        .map(|(s, t, _)| (s.to_string(), t.to_string()))
        .collect();
    assert_eq!(
        visual,
        vec![
            ("1".to_string(), "2".to_string()),
            (ext_key.as_str().to_string(), "2".to_string()),
        ]
    );
}

#[test]
fn scenario_b_unresolvable_edge_is_dropped_without_other_changes() {
    let base = normalize(&scenario_a());

    let mut raw = scenario_a();
    raw.edges.push(RawEdge {
        from_id: Some(2),
        to_id: None,
        to_external: None,
        dependency_type: DependencyType::Direct,
        confidence: Confidence::High,
    });
    let g = normalize(&raw);

    assert_eq!(raw.edges.len(), 3);
    assert_eq!(g.edge_count(), 2);
    assert_eq!(g.nodes, base.nodes);
    assert_eq!(g.edges, base.edges);
}

#[test]
fn root_is_unique_and_at_distance_zero() {
    let mut raw = scenario_a();
    // A catalog node that repeats the root id must not produce a second root.
    raw.nodes.push(RawNode::new(1, "warehouse", "public", "users", "TABLE", 3));
    raw.root.distance = 5;
    let g = normalize(&raw);

    let roots: Vec<_> = g.nodes.values().filter(|n| n.kind == NodeKind::Root).collect();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].id, "1");
    assert_eq!(roots[0].distance, 0);
    assert_eq!(roots[0].qualified_name, "warehouse.public.users");
}

#[test]
fn duplicate_external_references_collapse_to_one_target() {
    let mut raw = scenario_a();
    raw.external_nodes
        .push(RawExternalNode::new(Some("raw"), "events", 2));
    raw.external_nodes
        .push(RawExternalNode::new(Some("raw"), "events", 1));
    raw.edges.push(RawEdge::to_external(2, Some("raw"), "events"));
    raw.edges.push(RawEdge::to_external(1, Some("raw"), "events"));

    let g = normalize(&raw);
    let key = ExternalNodeKey::new(Some("raw"), "events");
    let externals: Vec<_> = g.nodes.values().filter(|n| n.is_external()).collect();
    assert_eq!(externals.len(), 2);
    assert_eq!(g.node(key.as_str()).unwrap().distance, 1);
    assert_eq!(g.node(key.as_str()).unwrap().qualified_name, "raw.events");

    let targets: Vec<_> = g
        .edges
        .iter()
        .filter(|e| e.dependency_to == key.as_str())
        .map(|e| e.dependency_from.as_str())
        .collect();
    assert_eq!(targets, vec!["2", "1"]);
}

#[test]
fn direction_inversion_holds_for_every_type_and_confidence() {
    for dependency_type in [DependencyType::Direct, DependencyType::Indirect] {
        for confidence in [Confidence::High, Confidence::Medium, Confidence::Low] {
            let mut raw = scenario_a();
            raw.edges = vec![RawEdge::to_node(2, 1).with_kind(dependency_type, confidence)];
            let g = normalize(&raw);
            assert_eq!(g.edge_count(), 1);
            let e = &g.edges[0];
            assert_eq!((e.dependency_from.as_str(), e.dependency_to.as_str()), ("2", "1"));
            assert_eq!((e.source(), e.target()), ("1", "2"));
            assert_eq!(e.dependency_type, dependency_type);
            assert_eq!(e.confidence, confidence);
        }
    }
}

#[test]
fn edges_referencing_nodes_outside_the_window_are_dropped() {
    let mut raw = scenario_a();
    raw.edges.push(RawEdge::to_node(2, 99));
    raw.edges.push(RawEdge::to_node(42, 1));
    raw.edges.push(RawEdge::to_external(2, None, "   "));
    let g = normalize(&raw);
    assert_eq!(g.edge_count(), 2);
    assert!(g.is_consistent());
}

#[test]
fn unknown_internal_target_falls_back_to_external_reference() {
    let mut raw = scenario_a();
    let mut edge = RawEdge::to_external(1, Some("lake"), "clicks");
    edge.to_id = Some(404);
    raw.edges = vec![edge];

    let g = normalize(&raw);
    let key = ExternalNodeKey::new(Some("lake"), "clicks");
    assert_eq!(g.edges[0].dependency_to, key.as_str());
    // Not listed in `external_nodes`: materialized one hop past its consumer.
    assert_eq!(g.node(key.as_str()).unwrap().distance, 1);
}

#[test]
fn duplicate_edges_are_collapsed() {
    let mut raw = scenario_a();
    raw.edges.push(raw.edges[0].clone());
    let g = normalize(&raw);
    assert_eq!(g.edge_count(), 2);
}

#[test]
fn truncated_and_depth_pass_through() {
    let mut raw = scenario_a();
    raw.truncated = true;
    raw.depth = 2;
    let g = normalize(&raw);
    assert!(g.truncated);
    assert_eq!(g.depth, 2);
    assert_eq!(g.direction, ViewDirection::Upstream);
}

#[test]
fn non_positive_depth_is_clamped_to_one() {
    let mut raw = scenario_a();
    raw.depth = 0;
    assert_eq!(normalize(&raw).depth, 1);
}

#[test]
fn sparse_payload_defaults_missing_fields() {
    let g = normalize_json(
        r#"{"root": {"id": 5, "object_name": "lonely"}, "direction": "downstream"}"#,
    )
    .unwrap();
    assert_eq!(g.node_count(), 1);
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.depth, 1);
    assert!(!g.truncated);
    assert_eq!(g.root().unwrap().object_type, "unknown");
    assert_eq!(g.direction, ViewDirection::Downstream);
}

#[test]
fn unknown_enum_spellings_degrade() {
    let raw = parse_payload(
        &json!({
            "root": {"id": 1, "object_name": "a"},
            "nodes": [{"id": 2, "object_name": "b", "distance": 1}],
            "edges": [{"from_id": 2, "to_id": 1, "dependency_type": "weird", "confidence": "certain"}],
            "direction": "upstream",
            "depth": 1
        })
        .to_string(),
    )
    .unwrap();
    let g = normalize(&raw);
    assert_eq!(g.edges[0].dependency_type, DependencyType::Direct);
    assert_eq!(g.edges[0].confidence, Confidence::Low);
}

#[test]
fn invalid_json_is_a_payload_error() {
    let err = normalize_json("{ not json").unwrap_err();
    assert!(err.to_string().starts_with("invalid lineage payload"));
}

#[test]
fn merge_unions_upstream_and_downstream() {
    let up = normalize(&scenario_a());

    let mut down_raw = scenario_a();
    down_raw.direction = lineage_core::Direction::Downstream;
    down_raw.nodes = vec![RawNode::new(3, "warehouse", "mart", "daily_users", "VIEW", 1)];
    down_raw.external_nodes.clear();
    down_raw.edges = vec![RawEdge::to_node(3, 1)];
    down_raw.truncated = true;
    down_raw.depth = 2;
    let down = normalize(&down_raw);

    let merged = merge(up, down);
    assert!(merged.is_consistent());
    assert_eq!(merged.direction, ViewDirection::Both);
    assert_eq!(merged.node_count(), 4);
    assert_eq!(merged.edge_count(), 3);
    assert!(merged.truncated);
    assert_eq!(merged.depth, 2);
}

#[test]
fn merge_with_different_roots_keeps_upstream() {
    let up = normalize(&scenario_a());
    let mut other = scenario_a();
    other.root.id = 100;
    let merged = merge(up.clone(), normalize(&other));
    assert_eq!(merged, up);
}

fn scenario_a_with_extra_edge(extra: serde_json::Value) -> RawLineage {
    parse_payload(
        &json!({
            "root": {"id": 1, "source_name": "warehouse", "schema_name": "public",
                     "object_name": "users", "object_type": "TABLE", "distance": 0},
            "nodes": [
                {"id": 2, "source_name": "warehouse", "schema_name": "public",
                 "object_name": "orders_view", "object_type": "VIEW", "distance": 1}
            ],
            "external_nodes": [
                {"schema_name": null, "object_name": null, "object_type": null, "distance": null}
            ],
            "edges": [
                {"from_id": 2, "to_id": 1, "dependency_type": "DIRECT", "confidence": "HIGH"},
                extra
            ],
            "direction": "upstream",
            "depth": 1,
            "truncated": null
        })
        .to_string(),
    )
    .unwrap()
}

#[test]
fn null_fields_drop_only_the_offending_entry() {
    let cases = [
        json!({"from_id": null, "to_id": 1}),
        json!({"from_id": 2, "to_id": null, "to_external": {"object_name": null}}),
        json!({"to_external": {"schema_name": "raw", "object_name": "events"}}),
    ];
    for extra in cases {
        let g = normalize(&scenario_a_with_extra_edge(extra.clone()));
        assert!(g.is_consistent());
        assert_eq!(g.node_count(), 2, "{extra}");
        assert_eq!(g.edge_count(), 1, "{extra}");
        let e = &g.edges[0];
        assert_eq!((e.dependency_from.as_str(), e.dependency_to.as_str()), ("2", "1"));
        assert!(!g.truncated);
    }
}

#[test]
fn null_kind_and_confidence_degrade_to_defaults() {
    let g = normalize(&scenario_a_with_extra_edge(json!({
        "from_id": 2,
        "to_external": {"schema_name": "raw", "object_name": "events"},
        "dependency_type": null,
        "confidence": null
    })));
    assert_eq!(g.edge_count(), 2);
    let key = ExternalNodeKey::new(Some("raw"), "events");
    let e = g
        .edges
        .iter()
        .find(|e| e.dependency_to == key.as_str())
        .unwrap();
    assert_eq!(e.dependency_type, DependencyType::Direct);
    assert_eq!(e.confidence, Confidence::Low);
}

#[test]
fn null_catalog_fields_read_as_empty() {
    let g = normalize_json(
        r#"{"root": {"id": 7, "source_name": null, "schema_name": null, "object_name": "t",
                     "object_type": null, "distance": null},
            "direction": "downstream", "depth": null}"#,
    )
    .unwrap();
    let root = g.root().unwrap();
    assert_eq!(root.qualified_name, "t");
    assert_eq!(root.object_type, "unknown");
    assert_eq!(root.catalog.as_ref().unwrap().source_name, "");
    assert_eq!(g.depth, 1);
}
