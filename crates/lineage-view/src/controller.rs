//! Interaction controller: turns control changes into sequenced requests, decides which
//! completions are still current, and owns the view state and viewport.
//!
//! The controller does no I/O. A driver (see [`crate::session::Session`]) performs the requests
//! it issues and feeds the results back through [`LineageController::on_fetched`] and
//! [`LineageController::on_layout`].

use crate::model::{PositionedGraph, truncation_notice};
use crate::navigation::{CatalogNavigator, NavigationTarget, PathNavigator, target_for};
use crate::viewport::Viewport;
use lineage_core::{LineageConfig, NormalizedGraph, RawLineage, ViewDirection, merge, normalize};
use std::time::{Duration, Instant};

pub type RequestSeq = u64;

/// How the `both` view direction is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BothStrategy {
    /// One upstream and one downstream request, merged once both arrive.
    #[default]
    Split,
    /// A single request with direction `both`.
    Single,
}

impl std::str::FromStr for BothStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "split" => Ok(Self::Split),
            "single" => Ok(Self::Single),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub direction: ViewDirection,
    pub depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageRequest {
    pub seq: RequestSeq,
    /// Catalog id of the root object.
    pub root: String,
    pub direction: ViewDirection,
    pub depth: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A normalized snapshot waiting to be laid out.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutJob {
    pub seq: RequestSeq,
    pub graph: NormalizedGraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Ready, but there is nothing to draw.
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub status: ViewStatus,
    pub graph: Option<PositionedGraph>,
    pub direction: ViewDirection,
    pub depth: u32,
    pub truncated: bool,
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        self.status == ViewStatus::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            ViewStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Shown when the backend stopped expanding the graph before reaching the requested depth.
    pub fn truncation_notice(&self) -> Option<String> {
        self.truncated.then(|| truncation_notice(self.depth))
    }
}

#[derive(Debug)]
struct PendingFetch {
    seq: RequestSeq,
    expected: usize,
    parts: Vec<(ViewDirection, NormalizedGraph)>,
}

pub struct LineageController {
    root: String,
    controls: Controls,
    issued: Option<Controls>,
    max_depth: u32,
    both_strategy: BothStrategy,
    latest_seq: RequestSeq,
    pending: Option<PendingFetch>,
    state: ViewState,
    viewport: Viewport,
    fit_padding: f64,
    fit_delay: Duration,
    fit_due: Option<Instant>,
    navigator: Box<dyn CatalogNavigator>,
}

impl std::fmt::Debug for LineageController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineageController")
            .field("root", &self.root)
            .field("controls", &self.controls)
            .field("latest_seq", &self.latest_seq)
            .field("status", &self.state.status)
            .finish_non_exhaustive()
    }
}

impl LineageController {
    pub fn new(root: impl Into<String>, config: &LineageConfig) -> Self {
        let max_depth = config
            .get_u64("controls.maxDepth")
            .map(|n| n.clamp(1, u32::MAX as u64) as u32)
            .unwrap_or(10);
        let direction = config
            .get_str("controls.defaultDirection")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let depth = config
            .get_u64("controls.defaultDepth")
            .map(|n| n.min(u32::MAX as u64) as u32)
            .unwrap_or(3)
            .clamp(1, max_depth);
        let both_strategy = config
            .get_str("controls.bothStrategy")
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        let controls = Controls { direction, depth };

        Self {
            root: root.into(),
            controls,
            issued: None,
            max_depth,
            both_strategy,
            latest_seq: 0,
            pending: None,
            state: ViewState {
                direction,
                depth,
                ..Default::default()
            },
            viewport: Viewport::from_config(config),
            fit_padding: config.get_f64("viewport.fitPadding").unwrap_or(0.2),
            fit_delay: Duration::from_millis(config.get_u64("viewport.fitDelayMs").unwrap_or(50)),
            fit_due: None,
            navigator: Box::new(PathNavigator::default()),
        }
    }

    pub fn with_navigator(mut self, navigator: impl CatalogNavigator + 'static) -> Self {
        self.navigator = Box::new(navigator);
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn both_strategy(&self) -> BothStrategy {
        self.both_strategy
    }

    pub fn latest_seq(&self) -> RequestSeq {
        self.latest_seq
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn fit_due(&self) -> Option<Instant> {
        self.fit_due
    }

    /// Issues the initial request(s).
    pub fn mount(&mut self) -> Vec<LineageRequest> {
        self.issue()
    }

    /// Re-issues the current controls even if nothing changed.
    pub fn refresh(&mut self) -> Vec<LineageRequest> {
        self.issue()
    }

    pub fn set_direction(&mut self, direction: ViewDirection) -> Vec<LineageRequest> {
        self.controls.direction = direction;
        self.issue_if_changed()
    }

    /// Depth is clamped to `1..=max_depth`.
    pub fn set_depth(&mut self, depth: u32) -> Vec<LineageRequest> {
        self.controls.depth = depth.clamp(1, self.max_depth);
        self.issue_if_changed()
    }

    fn issue_if_changed(&mut self) -> Vec<LineageRequest> {
        if self.issued == Some(self.controls) {
            return Vec::new();
        }
        self.issue()
    }

    fn issue(&mut self) -> Vec<LineageRequest> {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        let Controls { direction, depth } = self.controls;
        self.issued = Some(self.controls);

        let directions: Vec<ViewDirection> = match (direction, self.both_strategy) {
            (ViewDirection::Both, BothStrategy::Split) => {
                vec![ViewDirection::Upstream, ViewDirection::Downstream]
            }
            (d, _) => vec![d],
        };
        self.pending = Some(PendingFetch {
            seq,
            expected: directions.len(),
            parts: Vec::with_capacity(directions.len()),
        });
        self.fit_due = None;
        self.state.status = ViewStatus::Loading;
        self.state.direction = direction;
        self.state.depth = depth;

        tracing::debug!(seq, %direction, depth, root = %self.root, "issuing lineage request");
        directions
            .into_iter()
            .map(|direction| LineageRequest {
                seq,
                root: self.root.clone(),
                direction,
                depth,
            })
            .collect()
    }

    /// Handles a fetch completion. Returns the layout job to run once every part of the current
    /// request has arrived.
    pub fn on_fetched(
        &mut self,
        request: &LineageRequest,
        result: Result<RawLineage, FetchError>,
    ) -> Option<LayoutJob> {
        let Some(pending) = self.pending.as_mut().filter(|p| p.seq == request.seq) else {
            tracing::trace!(
                seq = request.seq,
                latest = self.latest_seq,
                "discarding stale lineage response"
            );
            return None;
        };

        let raw = match result {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(seq = request.seq, error = %err, "lineage request failed");
                self.pending = None;
                self.state.graph = None;
                self.state.truncated = false;
                self.state.status = ViewStatus::Failed(err.message);
                return None;
            }
        };

        let mut graph = normalize(&raw);
        graph.direction = request.direction;
        pending.parts.push((request.direction, graph));
        if pending.parts.len() < pending.expected {
            return None;
        }

        let PendingFetch { seq, mut parts, .. } = self.pending.take()?;
        let graph = if parts.len() == 2 {
            let downstream_at = parts
                .iter()
                .position(|(d, _)| *d == ViewDirection::Downstream)
                .unwrap_or(1);
            let (_, downstream) = parts.remove(downstream_at);
            let (_, upstream) = parts.remove(0);
            merge(upstream, downstream)
        } else {
            parts.pop()?.1
        };
        Some(LayoutJob { seq, graph })
    }

    /// Applies a finished layout if it belongs to the latest request, and schedules a fit.
    pub fn on_layout(&mut self, seq: RequestSeq, graph: PositionedGraph, now: Instant) -> bool {
        if seq != self.latest_seq {
            tracing::trace!(seq, latest = self.latest_seq, "discarding stale layout");
            return false;
        }

        self.state.status = if graph.is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Ready
        };
        self.state.direction = graph.direction;
        self.state.depth = graph.depth;
        self.state.truncated = graph.truncated;
        self.state.graph = Some(graph);
        self.fit_due = Some(now + self.fit_delay);
        true
    }

    /// Runs a scheduled fit once it is due. Returns whether the viewport changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(due) = self.fit_due else {
            return false;
        };
        if now < due {
            return false;
        }
        self.fit_due = None;
        let Some(bounds) = self.state.graph.as_ref().and_then(|g| g.bounds) else {
            return false;
        };
        self.viewport.fit(&bounds, self.fit_padding);
        true
    }

    /// Fits immediately, cancelling any scheduled fit.
    pub fn fit_now(&mut self) -> bool {
        self.fit_due = None;
        let Some(bounds) = self.state.graph.as_ref().and_then(|g| g.bounds) else {
            return false;
        };
        self.viewport.fit(&bounds, self.fit_padding);
        true
    }

    pub fn activate(&self, node_id: &str) -> Option<NavigationTarget> {
        let node = self.state.graph.as_ref()?.node(node_id)?;
        target_for(&node.node, self.navigator.as_ref())
    }

    /// Activates the node under a screen point.
    pub fn activate_at(&self, screen_x: f64, screen_y: f64) -> Option<NavigationTarget> {
        let (x, y) = self.viewport.to_graph(screen_x, screen_y);
        let node = self.state.graph.as_ref()?.node_at(x, y)?;
        target_for(&node.node, self.navigator.as_ref())
    }
}
