use lineage_core::{
    Confidence, DependencyType, Direction, NodeKind, RawEdge, RawExternalNode, RawExternalRef,
    RawLineage, RawNode, normalize,
};
use proptest::prelude::*;

fn arb_dependency_type() -> impl Strategy<Value = DependencyType> {
    prop_oneof![Just(DependencyType::Direct), Just(DependencyType::Indirect)]
}

fn arb_confidence() -> impl Strategy<Value = Confidence> {
    prop_oneof![
        Just(Confidence::High),
        Just(Confidence::Medium),
        Just(Confidence::Low)
    ]
}

fn arb_external_ref() -> impl Strategy<Value = RawExternalRef> {
    (
        prop::option::of(prop_oneof![Just("raw".to_string()), Just(String::new())]),
        prop_oneof![
            Just("s3://bucket/file".to_string()),
            Just("events".to_string()),
            Just(String::new()),
        ],
    )
        .prop_map(|(schema_name, object_name)| RawExternalRef {
            schema_name,
            object_name,
        })
}

// Ids are drawn from a range wider than the node set so that some edges dangle.
fn arb_edge() -> impl Strategy<Value = RawEdge> {
    (
        prop::option::of(0i64..12),
        prop::option::of(0i64..12),
        prop::option::of(arb_external_ref()),
        arb_dependency_type(),
        arb_confidence(),
    )
        .prop_map(
            |(from_id, to_id, to_external, dependency_type, confidence)| RawEdge {
                from_id,
                to_id,
                to_external,
                dependency_type,
                confidence,
            },
        )
}

fn arb_payload() -> impl Strategy<Value = RawLineage> {
    (
        prop::collection::vec((0i64..8, 0i64..4), 0..8),
        prop::collection::vec(
            (prop::option::of(Just("raw")), prop_oneof![Just("events"), Just("clicks")]),
            0..4,
        ),
        prop::collection::vec(arb_edge(), 0..16),
        -1i64..6,
        any::<bool>(),
    )
        .prop_map(|(nodes, externals, edges, depth, truncated)| RawLineage {
            root: RawNode::new(0, "src", "public", "root", "TABLE", 0),
            nodes: nodes
                .into_iter()
                .map(|(id, distance)| {
                    RawNode::new(id, "src", "public", format!("obj_{id}"), "VIEW", distance)
                })
                .collect(),
            external_nodes: externals
                .into_iter()
                .map(|(schema, name)| RawExternalNode::new(schema, name, 1))
                .collect(),
            edges,
            direction: Direction::Upstream,
            depth,
            truncated,
        })
}

proptest! {
    #[test]
    fn normalized_graph_has_exactly_one_root(raw in arb_payload()) {
        let g = normalize(&raw);
        let roots = g.nodes.values().filter(|n| n.kind == NodeKind::Root).count();
        prop_assert_eq!(roots, 1);
        prop_assert_eq!(g.root().map(|n| n.distance), Some(0));
    }

    #[test]
    fn no_dangling_edge_survives(raw in arb_payload()) {
        let g = normalize(&raw);
        prop_assert!(g.is_consistent());
        prop_assert!(g.edge_count() <= raw.edges.len());
    }

    #[test]
    fn node_keys_are_unique_and_match_ids(raw in arb_payload()) {
        let g = normalize(&raw);
        for (key, node) in &g.nodes {
            prop_assert_eq!(key, &node.id);
        }
    }

    #[test]
    fn truncated_flag_passes_through(raw in arb_payload()) {
        let g = normalize(&raw);
        prop_assert_eq!(g.truncated, raw.truncated);
        prop_assert!(g.depth >= 1);
    }

    #[test]
    fn normalization_is_deterministic(raw in arb_payload()) {
        prop_assert_eq!(normalize(&raw), normalize(&raw));
    }
}
