//! Geometry of one area's edges, ready to be drawn as a single batch.

use crate::camera::Scales;
use crate::graph::{Network, Vec2, VertexIndex};
use netpixi_core::{EdgeStyle, compare, merge};
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq)]
pub enum Path {
    Line,
    /// Cubic bezier with two control points.
    Curve { control1: Vec2, control2: Vec2 },
}

/// One edge as drawn, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub source: VertexIndex,
    pub target: VertexIndex,
    pub from: Vec2,
    pub to: Vec2,
    pub path: Path,
    pub width: f64,
    pub color: u32,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AreaBatch {
    pub leader: VertexIndex,
    pub strokes: Vec<Stroke>,
}

impl AreaBatch {
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// Control points for a curved edge, bent along the normal of `from -> to`.
pub fn curve(from: Vec2, to: Vec2, curve1: f64, curve2: f64) -> Path {
    if compare(curve1, 0.0).is_eq() && compare(curve2, 0.0).is_eq() {
        return Path::Line;
    }
    let d = (to - from).scaled(0.2);
    let normal = Vec2::new(-d.y, d.x);
    Path::Curve {
        control1: from + d + normal.scaled(curve1),
        control2: to - d + normal.scaled(curve2),
    }
}

/// Builds the strokes of the area led by `leader`.
///
/// An edge is drawn when at least one endpoint is visible. Edges whose
/// endpoints coincide are skipped. With exactly one endpoint visible the
/// alpha is multiplied by the graph's `edgeFade`.
pub fn build_area_batch(network: &Network, leader: VertexIndex, scales: &Scales) -> AreaBatch {
    let mut strokes = Vec::new();
    let Some(area) = network.area(leader) else {
        return AreaBatch { leader, strokes };
    };
    let settings = &network.settings;

    for (source, target, props) in area.edges() {
        let s = &network[source];
        let t = &network[target];
        let (s_visible, t_visible) = (s.is_visible(), t.is_visible());
        if !s_visible && !t_visible {
            continue;
        }
        if compare(s.position.x, t.position.x).is_eq() && compare(s.position.y, t.position.y).is_eq()
        {
            continue;
        }

        let style: Cow<'_, EdgeStyle> = merge(&settings.edge, &props.style);
        let mut alpha = style.alpha * s.alpha * t.alpha;
        if !(s_visible && t_visible) {
            alpha *= settings.graph.edge_fade;
        }

        let from = s.position.scaled(scales.position);
        let to = t.position.scaled(scales.position);
        strokes.push(Stroke {
            source,
            target,
            from,
            to,
            path: curve(from, to, style.curve1, style.curve2),
            width: scales.edge * style.width,
            color: style.color,
            alpha: alpha.min(1.0),
        });
    }

    AreaBatch { leader, strokes }
}
