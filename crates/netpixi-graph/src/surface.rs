use crate::batch::AreaBatch;
use crate::graph::{Vec2, VertexIndex};
use std::collections::BTreeMap;

/// How a vertex is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexSprite {
    pub position: Vec2,
    pub radius: f64,
    pub color: u32,
    pub alpha: f64,
    /// True when the vertex uses the graph-wide default look, so renderers
    /// can share one texture among all such vertices.
    pub shared: bool,
}

/// The drawing backend. Implementations own whatever GPU or canvas state
/// they need; the view only tells them what changed.
pub trait RenderSurface {
    fn set_background(&mut self, color: u32, alpha: f64);

    fn place_vertex(&mut self, vertex: VertexIndex, sprite: &VertexSprite);

    /// Replaces everything previously drawn for `batch.leader`.
    fn draw_area(&mut self, batch: &AreaBatch);
}

/// Keeps the latest state of every sprite and batch in memory. Used for
/// headless runs and by tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub background: Option<(u32, f64)>,
    pub sprites: BTreeMap<VertexIndex, VertexSprite>,
    pub batches: BTreeMap<VertexIndex, AreaBatch>,
    /// Leaders in the order their areas were drawn since the last `take_log`.
    pub log: Vec<VertexIndex>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_log(&mut self) -> Vec<VertexIndex> {
        std::mem::take(&mut self.log)
    }

    pub fn stroke_count(&self) -> usize {
        self.batches.values().map(|batch| batch.strokes.len()).sum()
    }
}

impl RenderSurface for RecordingSurface {
    fn set_background(&mut self, color: u32, alpha: f64) {
        self.background = Some((color, alpha));
    }

    fn place_vertex(&mut self, vertex: VertexIndex, sprite: &VertexSprite) {
        self.sprites.insert(vertex, sprite.clone());
    }

    fn draw_area(&mut self, batch: &AreaBatch) {
        self.log.push(batch.leader);
        self.batches.insert(batch.leader, batch.clone());
    }
}
