#![forbid(unsafe_code)]

//! Headless view layer for lineage graphs.
//!
//! [`layout::LayoutEngine`] positions a [`lineage_core::NormalizedGraph`];
//! [`controller::LineageController`] tracks the user's controls, the request sequence and the
//! viewport; [`session::Session`] wires both to a [`session::LineageSource`].

pub mod controller;
pub mod error;
pub mod layout;
pub mod model;
pub mod navigation;
pub mod session;
pub mod style;
pub mod svg;
pub mod viewport;

pub use controller::{
    BothStrategy, Controls, FetchError, LayoutJob, LineageController, LineageRequest,
    RequestSeq, ViewState, ViewStatus,
};
pub use error::{Error, Result};
pub use layout::{
    LayeredLayout, LayoutAlgorithm, LayoutEdgeInput, LayoutEngine, LayoutOptions, NodeSize,
    Placement, SizedNode,
};
pub use model::{Bounds, LayoutPoint, PositionedEdge, PositionedGraph, PositionedNode};
pub use navigation::{CatalogNavigator, NavigationTarget, PathNavigator};
pub use session::{LineageSource, Session, StaticSource};
pub use svg::{SvgRenderOptions, render_svg};
pub use viewport::Viewport;

/// Normalizes and lays out a Lineage API response body.
pub fn layout_json(text: &str, engine: &LayoutEngine) -> Result<PositionedGraph> {
    let graph = lineage_core::normalize_json(text)?;
    Ok(engine.layout_sync(&graph))
}
