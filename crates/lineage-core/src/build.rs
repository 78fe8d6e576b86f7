//! Graph Model Builder: raw payload -> [`NormalizedGraph`].
//!
//! The builder never fails. Anything it cannot place (an edge whose endpoints do not resolve,
//! a duplicate node) is dropped or merged and processing continues, so the worst a malformed
//! payload can produce is a graph with no edges.

use crate::model::{
    CatalogRef, ExternalNodeKey, GraphEdge, GraphNode, NodeKey, NodeKind, NormalizedGraph,
    UNKNOWN_OBJECT_TYPE, ViewDirection,
};
use crate::payload::{RawEdge, RawLineage, RawNode};
use indexmap::IndexMap;
use indexmap::map::Entry;
use rustc_hash::FxHashSet;

pub fn internal_key(id: i64) -> NodeKey {
    id.to_string()
}

fn clamp_distance(distance: i64) -> u32 {
    u32::try_from(distance.max(0)).unwrap_or(u32::MAX)
}

fn clamp_depth(depth: i64) -> u32 {
    u32::try_from(depth.max(1)).unwrap_or(u32::MAX)
}

fn object_type_or_unknown(object_type: Option<&str>) -> String {
    match object_type.map(str::trim) {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => UNKNOWN_OBJECT_TYPE.to_string(),
    }
}

fn catalog_node(raw: &RawNode, kind: NodeKind, distance: u32) -> GraphNode {
    let qualified_name = [
        raw.source_name.as_str(),
        raw.schema_name.as_str(),
        raw.object_name.as_str(),
    ]
    .iter()
    .filter(|part| !part.is_empty())
    .copied()
    .collect::<Vec<_>>()
    .join(".");

    GraphNode {
        id: internal_key(raw.id),
        kind,
        qualified_name,
        object_type: object_type_or_unknown(raw.object_type.as_deref()),
        distance,
        catalog: Some(CatalogRef {
            source_name: raw.source_name.clone(),
            schema_name: raw.schema_name.clone(),
            object_name: raw.object_name.clone(),
        }),
    }
}

fn external_qualified_name(schema_name: Option<&str>, object_name: &str) -> String {
    match schema_name.map(str::trim) {
        Some(schema) if !schema.is_empty() => format!("{schema}.{}", object_name.trim()),
        _ => object_name.trim().to_string(),
    }
}

/// Inserts (or merges into) the external node for `(schema_name, object_name)` and returns its
/// key. Returns `None` when the reference has no object name and therefore no identity.
fn upsert_external(
    nodes: &mut IndexMap<NodeKey, GraphNode>,
    schema_name: Option<&str>,
    object_name: &str,
    object_type: Option<&str>,
    distance: u32,
) -> Option<NodeKey> {
    if object_name.trim().is_empty() {
        return None;
    }
    let key = ExternalNodeKey::new(schema_name, object_name).into_string();
    match nodes.entry(key.clone()) {
        Entry::Occupied(mut slot) => {
            let existing = slot.get_mut();
            existing.distance = existing.distance.min(distance);
            if existing.object_type == UNKNOWN_OBJECT_TYPE {
                existing.object_type = object_type_or_unknown(object_type);
            }
            tracing::debug!(key = %key, "merged duplicate external reference");
        }
        Entry::Vacant(slot) => {
            slot.insert(GraphNode {
                id: key.clone(),
                kind: NodeKind::External,
                qualified_name: external_qualified_name(schema_name, object_name),
                object_type: object_type_or_unknown(object_type),
                distance,
                catalog: None,
            });
        }
    }
    Some(key)
}

fn resolve_target(
    nodes: &mut IndexMap<NodeKey, GraphNode>,
    edge: &RawEdge,
    implied_distance: u32,
) -> Option<NodeKey> {
    if let Some(id) = edge.to_id {
        let key = internal_key(id);
        if nodes.get(&key).is_some_and(|n| !n.is_external()) {
            return Some(key);
        }
    }
    let ext = edge.to_external.as_ref()?;
    upsert_external(
        nodes,
        ext.schema_name.as_deref(),
        &ext.object_name,
        None,
        implied_distance,
    )
}

/// Normalizes a raw Lineage API payload.
pub fn normalize(raw: &RawLineage) -> NormalizedGraph {
    let mut nodes: IndexMap<NodeKey, GraphNode> = IndexMap::new();

    let root_id = internal_key(raw.root.id);
    nodes.insert(root_id.clone(), catalog_node(&raw.root, NodeKind::Root, 0));

    for node in &raw.nodes {
        match nodes.entry(internal_key(node.id)) {
            Entry::Occupied(_) => {
                tracing::debug!(id = node.id, "ignoring duplicate catalog node");
            }
            Entry::Vacant(slot) => {
                slot.insert(catalog_node(
                    node,
                    NodeKind::Internal,
                    clamp_distance(node.distance).max(1),
                ));
            }
        }
    }

    for ext in &raw.external_nodes {
        let inserted = upsert_external(
            &mut nodes,
            ext.schema_name.as_deref(),
            &ext.object_name,
            ext.object_type.as_deref(),
            clamp_distance(ext.distance),
        );
        if inserted.is_none() {
            tracing::debug!("dropping external reference without an object name");
        }
    }

    let mut seen: FxHashSet<GraphEdge> = FxHashSet::default();
    let mut edges: Vec<GraphEdge> = Vec::with_capacity(raw.edges.len());
    for (idx, raw_edge) in raw.edges.iter().enumerate() {
        let Some(from_id) = raw_edge.from_id else {
            tracing::debug!(edge = idx, "dropping lineage edge: missing consumer id");
            continue;
        };
        let from = internal_key(from_id);
        let Some(from_distance) = nodes
            .get(&from)
            .filter(|n| !n.is_external())
            .map(|n| n.distance)
        else {
            tracing::debug!(edge = idx, from = %from, "dropping lineage edge: unknown consumer");
            continue;
        };

        let Some(to) = resolve_target(&mut nodes, raw_edge, from_distance.saturating_add(1))
        else {
            tracing::debug!(edge = idx, from = %from, "dropping lineage edge: unresolved producer");
            continue;
        };

        let edge = GraphEdge {
            dependency_from: from,
            dependency_to: to,
            dependency_type: raw_edge.dependency_type,
            confidence: raw_edge.confidence,
        };
        if seen.insert(edge.clone()) {
            edges.push(edge);
        }
    }

    NormalizedGraph {
        root_id,
        nodes,
        edges,
        direction: raw.direction.into(),
        depth: clamp_depth(raw.depth),
        truncated: raw.truncated,
    }
}

/// Combines an upstream and a downstream traversal of the same root into one graph.
///
/// Nodes present in both keep the smaller distance; edges are deduplicated. When the two graphs
/// do not share a root there is nothing sensible to merge and `upstream` is returned as is.
pub fn merge(upstream: NormalizedGraph, downstream: NormalizedGraph) -> NormalizedGraph {
    if upstream.root_id != downstream.root_id {
        tracing::warn!(
            upstream_root = %upstream.root_id,
            downstream_root = %downstream.root_id,
            "refusing to merge lineage graphs with different roots"
        );
        return upstream;
    }

    let NormalizedGraph {
        root_id,
        mut nodes,
        mut edges,
        depth,
        truncated,
        ..
    } = upstream;

    for (key, node) in downstream.nodes {
        match nodes.entry(key) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.distance = existing.distance.min(node.distance);
                if existing.object_type == UNKNOWN_OBJECT_TYPE {
                    existing.object_type = node.object_type;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
        }
    }

    let mut seen: FxHashSet<GraphEdge> = edges.iter().cloned().collect();
    for edge in downstream.edges {
        if seen.insert(edge.clone()) {
            edges.push(edge);
        }
    }

    NormalizedGraph {
        root_id,
        nodes,
        edges,
        direction: ViewDirection::Both,
        depth: depth.max(downstream.depth),
        truncated: truncated || downstream.truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_key_is_prefixed_and_unambiguous() {
        let a = ExternalNodeKey::new(Some("a:b"), "c");
        let b = ExternalNodeKey::new(Some("a"), "b:c");
        assert_ne!(a, b);
        assert!(ExternalNodeKey::is_external_key(a.as_str()));
        assert_eq!(
            ExternalNodeKey::new(None, "file"),
            ExternalNodeKey::new(Some(""), "file")
        );
    }

    #[test]
    fn clamp_helpers_saturate() {
        assert_eq!(clamp_depth(0), 1);
        assert_eq!(clamp_depth(-4), 1);
        assert_eq!(clamp_depth(3), 3);
        assert_eq!(clamp_distance(-1), 0);
        assert_eq!(clamp_distance(i64::MAX), u32::MAX);
    }

    #[test]
    fn catalog_qualified_name_skips_empty_parts() {
        let raw = RawNode::new(7, "", "public", "orders", "TABLE", 1);
        let node = catalog_node(&raw, NodeKind::Internal, 1);
        assert_eq!(node.qualified_name, "public.orders");
        assert_eq!(node.label(), "orders");
    }
}
