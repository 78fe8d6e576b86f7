#![forbid(unsafe_code)]

//! Lineage graph model (headless).
//!
//! Turns the raw payload served by the Lineage API into a [`NormalizedGraph`]: one addressable
//! node set (root, catalog objects and deduplicated external references) and an edge set whose
//! endpoints are guaranteed to resolve.
//!
//! Edges are stored in dependency order (consumer -> producer) and read back in data-flow order
//! through [`GraphEdge::source`] / [`GraphEdge::target`].

pub mod build;
pub mod config;
pub mod error;
pub mod model;
pub mod payload;

pub use build::{merge, normalize};
pub use config::LineageConfig;
pub use error::{Error, Result};
pub use model::{
    CatalogRef, Confidence, DependencyType, Direction, ExternalNodeKey, GraphEdge, GraphNode,
    NodeKey, NodeKind, NormalizedGraph, ViewDirection,
};
pub use payload::{RawEdge, RawExternalNode, RawExternalRef, RawLineage, RawNode};

/// Parses a Lineage API response body.
pub fn parse_payload(text: &str) -> Result<RawLineage> {
    Ok(serde_json::from_str(text)?)
}

/// Parses and normalizes a Lineage API response body in one step.
pub fn normalize_json(text: &str) -> Result<NormalizedGraph> {
    Ok(normalize(&parse_payload(text)?))
}
