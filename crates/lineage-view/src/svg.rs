//! Standalone SVG rendering of a [`PositionedGraph`].

use crate::model::{Bounds, PositionedGraph, PositionedNode};
use crate::style::{edge_style, node_style};
use lineage_core::{LineageConfig, NodeKind};
use std::fmt::Write as _;

const EDGE_COLOR: &str = "#64748b";
const NOTICE_HEIGHT: f64 = 28.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SvgRenderOptions {
    /// Space around the drawing.
    pub margin: f64,
    pub font_family: String,
    pub font_size: f64,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            margin: 16.0,
            font_family: "Inter, Helvetica, Arial, sans-serif".to_string(),
            font_size: 13.0,
        }
    }
}

pub fn render_svg(
    graph: &PositionedGraph,
    config: &LineageConfig,
    options: &SvgRenderOptions,
) -> String {
    let margin = options.margin.max(0.0);
    let notice = graph.truncation_notice();
    let notice_h = if notice.is_some() { NOTICE_HEIGHT } else { 0.0 };
    let bounds = graph.bounds.unwrap_or(Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 240.0,
        max_y: 48.0,
    });

    let vb_x = bounds.min_x - margin;
    let vb_y = bounds.min_y - margin - notice_h;
    let vb_w = bounds.width() + 2.0 * margin;
    let vb_h = bounds.height() + 2.0 * margin + notice_h;

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="lineage-graph" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}" font-family="{font}" font-size="{size}">"#,
        x = fmt(vb_x),
        y = fmt(vb_y),
        w = fmt(vb_w),
        h = fmt(vb_h),
        font = escape_attr(&options.font_family),
        size = fmt(options.font_size),
    );
    let _ = write!(
        &mut out,
        r#"<defs><marker id="lineage-arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="8" markerHeight="8" orient="auto-start-reverse"><path d="M0,0 L10,5 L0,10 z" fill="{EDGE_COLOR}"/></marker></defs>"#
    );

    if let Some(text) = &notice {
        let _ = write!(
            &mut out,
            r##"<text class="truncation-notice" x="{}" y="{}" fill="#b45309">{}</text>"##,
            fmt(bounds.min_x),
            fmt(bounds.min_y - margin - notice_h / 2.0 + options.font_size / 2.0),
            escape_xml(text)
        );
    }

    if graph.is_empty() {
        let _ = write!(
            &mut out,
            r##"<text class="empty" x="{}" y="{}" fill="#64748b">No lineage to display</text>"##,
            fmt(bounds.min_x),
            fmt(bounds.min_y + bounds.height() / 2.0)
        );
        out.push_str("</svg>");
        return out;
    }

    out.push_str(r#"<g class="edges">"#);
    for e in &graph.edges {
        let Some((first, rest)) = e.points.split_first() else {
            continue;
        };
        let mut d = format!("M{},{}", fmt(first.x), fmt(first.y));
        for p in rest {
            let _ = write!(&mut d, " L{},{}", fmt(p.x), fmt(p.y));
        }
        let style = edge_style(&e.edge);
        let _ = write!(
            &mut out,
            r#"<path class="edge" data-id="{}" d="{d}" fill="none" stroke="{EDGE_COLOR}" stroke-width="{}" stroke-opacity="{}""#,
            escape_attr(&e.id),
            fmt(style.stroke_width),
            fmt(style.opacity),
        );
        if let Some(dash) = style.dash {
            let _ = write!(&mut out, r#" stroke-dasharray="{dash}""#);
        }
        out.push_str(r#" marker-end="url(#lineage-arrow)"/>"#);
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for n in &graph.nodes {
        render_node(&mut out, n, config, options);
    }
    out.push_str("</g></svg>");
    out
}

fn render_node(
    out: &mut String,
    n: &PositionedNode,
    config: &LineageConfig,
    options: &SvgRenderOptions,
) {
    let style = node_style(&n.node, config);
    let kind = match n.node.kind {
        NodeKind::Root => "root",
        NodeKind::Internal => "internal",
        NodeKind::External => "external",
    };
    let b = n.bounds();
    let _ = write!(
        out,
        r##"<g class="node {kind}" data-id="{}" transform="translate({},{})"><title>{}</title><rect width="{}" height="{}" rx="6" fill="#ffffff" stroke="{}" stroke-width="{}""##,
        escape_attr(n.id()),
        fmt(b.min_x),
        fmt(b.min_y),
        escape_xml(&n.node.qualified_name),
        fmt(n.width),
        fmt(n.height),
        escape_attr(&style.border_color),
        fmt(style.border_width),
    );
    if let Some(dash) = style.dash {
        let _ = write!(out, r#" stroke-dasharray="{dash}""#);
    }
    out.push_str("/>");

    let cx = n.width / 2.0;
    let _ = write!(
        out,
        r##"<text class="label" x="{}" y="{}" text-anchor="middle" fill="#0f172a">{}</text>"##,
        fmt(cx),
        fmt(n.height / 2.0 - 2.0),
        escape_xml(n.node.label())
    );
    let _ = write!(
        out,
        r##"<text class="object-type" x="{}" y="{}" text-anchor="middle" fill="#64748b" font-size="{}">{}</text></g>"##,
        fmt(cx),
        fmt(n.height / 2.0 + options.font_size),
        fmt(options.font_size * 0.8),
        escape_xml(&n.node.object_type)
    );
}

/// Shortest decimal form with at most two fractional digits.
fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
