use crate::graph::Vec2;
use crate::viewport::Bounds;
use netpixi_core::{GraphSettings, compare};
use std::cmp::Ordering;

/// Percentages never step below this value.
pub const MIN_PERCENT: u32 = 10;

/// One wheel notch: a tenth of the current percentage, rounded, added when
/// `delta` is negative and removed when positive. Stepping down stops at
/// [`MIN_PERCENT`]. Returns `None` when nothing changes.
pub fn step_percent(percent: u32, delta: f64) -> Option<u32> {
    let shift = (percent + 5) / 10;
    match compare(delta, 0.0) {
        Ordering::Less => Some(percent + shift.max(1)),
        Ordering::Greater if percent > MIN_PERCENT => Some(percent - shift),
        _ => None,
    }
}

/// Zoom-dependent multipliers for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    /// Drawing-space to screen factor.
    pub position: f64,
    pub vertex: f64,
    pub edge: f64,
}

impl Default for Scales {
    fn default() -> Self {
        Self {
            position: 1.0,
            vertex: 1.0,
            edge: 1.0,
        }
    }
}

/// Pan and zoom state. The pivot is the screen position of the canvas origin,
/// negated: a drawing-space point `p` is shown at `p * scale - pivot`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub pivot: Vec2,
    zoom: u32,
    width: f64,
    aspect: f64,
}

impl Camera {
    pub fn new(width: f64, aspect: f64) -> Self {
        Self {
            pivot: Vec2::default(),
            zoom: 100,
            width,
            aspect,
        }
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.width / self.aspect
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height())
    }

    pub fn scale(&self) -> f64 {
        self.zoom as f64 / 100.0
    }

    /// The visible region in drawing space.
    pub fn bounds(&self) -> Bounds {
        let scale = self.scale();
        Bounds {
            left: self.pivot.x / scale,
            right: (self.pivot.x + self.width) / scale,
            top: self.pivot.y / scale,
            bottom: (self.pivot.y + self.height()) / scale,
        }
    }

    /// Drawing-space point under a canvas offset.
    pub fn to_world(&self, offset: Vec2) -> Vec2 {
        (self.pivot + offset).scaled(1.0 / self.scale())
    }

    pub fn to_screen(&self, point: Vec2) -> Vec2 {
        point.scaled(self.scale()) - self.pivot
    }

    /// Returns whether the width actually changed.
    pub fn resize(&mut self, width: f64) -> bool {
        if compare(width, self.width).is_eq() || width <= 0.0 {
            return false;
        }
        self.width = width;
        true
    }

    /// Zooms one notch around the canvas offset under the pointer, keeping the
    /// drawing-space point there fixed. Returns whether the zoom changed.
    pub fn zoom_at(&mut self, delta: f64, offset: Vec2) -> bool {
        let Some(zoom) = step_percent(self.zoom, delta) else {
            return false;
        };
        let error = zoom as f64 / self.zoom as f64 - 1.0;
        self.pivot = self.pivot + (self.pivot + offset).scaled(error);
        self.zoom = zoom;
        true
    }

    /// Back to the origin at zoom 100. Returns `(moved, zoomed)`.
    pub fn reset(&mut self) -> (bool, bool) {
        let moved = self.pivot != Vec2::default();
        let zoomed = self.zoom != 100;
        self.pivot = Vec2::default();
        self.zoom = 100;
        (moved, zoomed)
    }

    pub fn scales(&self, graph: &GraphSettings) -> Scales {
        let steps = (self.zoom as f64 - 100.0) / 100.0;
        Scales {
            position: self.scale(),
            vertex: 1.0 + steps * graph.vertex_scale,
            edge: 1.0 + steps * graph.edge_scale,
        }
    }
}
