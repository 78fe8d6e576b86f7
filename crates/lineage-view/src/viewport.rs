//! Pan/zoom state of the drawing surface.
//!
//! A graph point `(x, y)` is shown at screen `(x * zoom + pan_x, y * zoom + pan_y)`.

use crate::model::Bounds;
use lineage_core::LineageConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::from_config(&LineageConfig::default())
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 2.0,
        }
    }

    pub fn from_config(config: &LineageConfig) -> Self {
        let mut vp = Self::new(
            config.get_f64("viewport.width").unwrap_or(1200.0),
            config.get_f64("viewport.height").unwrap_or(800.0),
        );
        vp.min_zoom = config.get_f64("viewport.minZoom").unwrap_or(vp.min_zoom);
        vp.max_zoom = config
            .get_f64("viewport.maxZoom")
            .unwrap_or(vp.max_zoom)
            .max(vp.min_zoom);
        vp.zoom = vp.clamp_zoom(vp.zoom);
        vp
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.zoom;
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Centers `bounds` and zooms so that it fills the viewport minus `padding` (a ratio of the
    /// content size added around it). Zoom stays within `[min_zoom, max_zoom]`.
    pub fn fit(&mut self, bounds: &Bounds, padding: f64) {
        let padding = if padding.is_finite() { padding.max(0.0) } else { 0.0 };
        let content_w = bounds.width().max(1.0) * (1.0 + padding);
        let content_h = bounds.height().max(1.0) * (1.0 + padding);
        let zoom = (self.width / content_w).min(self.height / content_h);
        self.zoom = self.clamp_zoom(zoom);

        let (cx, cy) = bounds.center();
        self.pan_x = self.width / 2.0 - cx * self.zoom;
        self.pan_y = self.height / 2.0 - cy * self.zoom;
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.pan_x += dx;
            self.pan_y += dy;
        }
    }

    /// Multiplies the zoom by `factor`, keeping the graph point under the screen anchor fixed.
    pub fn zoom_at(&mut self, factor: f64, anchor_x: f64, anchor_y: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let (gx, gy) = self.to_graph(anchor_x, anchor_y);
        self.zoom = self.clamp_zoom(self.zoom * factor);
        self.pan_x = anchor_x - gx * self.zoom;
        self.pan_y = anchor_y - gy * self.zoom;
    }

    pub fn to_screen(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.zoom + self.pan_x, y * self.zoom + self.pan_y)
    }

    pub fn to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
        ((sx - self.pan_x) / self.zoom, (sy - self.pan_y) / self.zoom)
    }

    /// Region of the graph currently on screen.
    pub fn visible_bounds(&self) -> Bounds {
        let (min_x, min_y) = self.to_graph(0.0, 0.0);
        let (max_x, max_y) = self.to_graph(self.width, self.height);
        Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}
