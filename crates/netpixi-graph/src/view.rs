use crate::camera::{Camera, step_percent};
use crate::graph::{Network, Vec2, VertexIndex};
use crate::options::ViewOptions;
use crate::scheduler::{self, RedrawPlan, RedrawScheduler};
use crate::surface::RenderSurface;
use crate::viewport::ViewportIndex;
use netpixi_core::VertexId;
use netpixi_events::{Event, EventListener};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Idle,
    Panning { start: Vec2, pivot: Vec2 },
    Vertex(VertexIndex),
}

/// A network on screen: camera, visibility index, pointer state and the
/// surface everything is drawn to.
pub struct NetworkView<S: RenderSurface> {
    pub(crate) network: Network,
    pub(crate) index: ViewportIndex,
    pub(crate) camera: Camera,
    pub(crate) scheduler: RedrawScheduler,
    pub(crate) surface: S,
    hovered: Option<VertexIndex>,
    drag: Drag,
}

impl<S: RenderSurface> NetworkView<S> {
    /// Indexes the network for the initial viewport and draws everything.
    pub fn new(mut network: Network, options: &ViewOptions, surface: S) -> Self {
        let camera = Camera::new(options.width, options.aspect);
        let (index, _) = ViewportIndex::build(network.vertices_mut(), camera.bounds());
        let mut view = Self {
            network,
            index,
            camera,
            scheduler: RedrawScheduler::new(),
            surface,
            hovered: None,
            drag: Drag::Idle,
        };
        view.apply(RedrawPlan::Full);
        view
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn index(&self) -> &ViewportIndex {
        &self.index
    }

    pub fn scheduler(&self) -> &RedrawScheduler {
        &self.scheduler
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_parts(self) -> (Network, S) {
        (self.network, self.surface)
    }

    pub fn hovered(&self) -> Option<VertexIndex> {
        self.hovered
    }

    pub fn apply(&mut self, plan: RedrawPlan) {
        self.scheduler
            .execute(plan, &self.network, &self.camera, &mut self.surface);
    }

    /// Moves a vertex to a drawing-space position and redraws what it touches.
    pub fn move_vertex(&mut self, vertex: VertexIndex, to: Vec2) {
        if !to.x.is_finite() || !to.y.is_finite() || self.network.vertex(vertex).is_none() {
            tracing::warn!("Ignoring move of {} to {:?}", vertex, to);
            return;
        }
        self.network[vertex].position = to;
        self.on_vertex_move(vertex);
    }

    pub(crate) fn on_vertex_move(&mut self, vertex: VertexIndex) {
        let plan = scheduler::on_vertex_move(
            &mut self.network,
            &mut self.index,
            self.camera.bounds(),
            vertex,
        );
        self.scheduler
            .place_vertex(&self.network, vertex, &self.camera, &mut self.surface);
        self.apply(plan);
    }

    pub fn on_viewport_change(&mut self) {
        let plan =
            scheduler::on_viewport_change(&mut self.network, &mut self.index, self.camera.bounds());
        self.apply(plan);
    }

    /// Zoom changed: every position and scale moved, so the window is
    /// maintained and everything is redrawn.
    fn on_zoom_change(&mut self) {
        self.index
            .refresh(self.network.vertices_mut(), self.camera.bounds(), None);
        self.apply(scheduler::on_settings_or_property_change());
    }

    pub fn on_settings_or_property_change(&mut self) {
        self.apply(scheduler::on_settings_or_property_change());
    }

    pub fn resize(&mut self, width: f64) {
        if !width.is_finite() || !self.camera.resize(width) {
            return;
        }
        self.on_viewport_change();
    }

    pub fn pan_to(&mut self, pivot: Vec2) {
        if !pivot.x.is_finite() || !pivot.y.is_finite() || pivot == self.camera.pivot {
            return;
        }
        self.camera.pivot = pivot;
        self.on_viewport_change();
    }

    pub fn zoom_at(&mut self, delta: f64, offset: Vec2) {
        if self.camera.zoom_at(delta, offset) {
            self.on_zoom_change();
        }
    }

    fn redraw_leaders(&mut self, vertex: VertexIndex) {
        let leaders = self.network[vertex].leaders.clone();
        self.apply(RedrawPlan::areas(leaders));
    }

    /// One wheel notch over a vertex changes how strongly its edges show.
    pub fn emphasize(&mut self, vertex: VertexIndex, delta: f64) {
        let percent = (100.0 * self.network[vertex].alpha).round() as u32;
        if let Some(percent) = step_percent(percent, delta) {
            self.network[vertex].alpha = percent as f64 / 100.0;
            self.redraw_leaders(vertex);
        }
    }

    pub fn reset_emphasis(&mut self, vertex: VertexIndex) {
        if self.network[vertex].alpha != 1.0 {
            self.network[vertex].alpha = 1.0;
            self.redraw_leaders(vertex);
        }
    }

    pub fn reset_camera(&mut self) {
        match self.camera.reset() {
            (_, true) => self.on_zoom_change(),
            (true, false) => self.on_viewport_change(),
            (false, false) => {}
        }
    }

    fn resolve(&self, id: &VertexId) -> Option<VertexIndex> {
        let index = self.network.vertex_index(id);
        if index.is_none() {
            tracing::warn!("Ignoring event for unknown vertex {}", id);
        }
        index
    }
}

fn finite(x: f64, y: f64) -> Option<Vec2> {
    (x.is_finite() && y.is_finite()).then(|| Vec2::new(x, y))
}

impl<S: RenderSurface> EventListener for NetworkView<S> {
    fn handle_event(&mut self, event: &Event) {
        match event {
            Event::PointerDown { x, y } => {
                if let Some(start) = finite(*x, *y) {
                    self.drag = Drag::Panning {
                        start,
                        pivot: self.camera.pivot,
                    };
                }
            }
            Event::VertexPointerDown { id } => {
                if let Some(vertex) = self.resolve(id) {
                    self.drag = Drag::Vertex(vertex);
                }
            }
            Event::PointerMove { x, y } => {
                let Some(offset) = finite(*x, *y) else {
                    return;
                };
                let drag = self.drag;
                match drag {
                    Drag::Idle => {}
                    Drag::Panning { start, pivot } => self.pan_to(pivot - (offset - start)),
                    Drag::Vertex(vertex) => {
                        let to = self.camera.to_world(offset);
                        self.move_vertex(vertex, to);
                    }
                }
            }
            Event::PointerUp => self.drag = Drag::Idle,
            Event::VertexHover { id } => {
                if let Some(vertex) = self.resolve(id) {
                    self.hovered = Some(vertex);
                }
            }
            Event::VertexUnhover { id } => {
                if self.hovered.is_some() && self.hovered == self.network.vertex_index(id) {
                    self.hovered = None;
                }
            }
            Event::Wheel { delta_y, x, y } => {
                if !delta_y.is_finite() {
                    return;
                }
                match self.hovered {
                    Some(vertex) => self.emphasize(vertex, *delta_y),
                    None => {
                        if let Some(offset) = finite(*x, *y) {
                            self.zoom_at(*delta_y, offset);
                        }
                    }
                }
            }
            Event::DoubleClick => match self.hovered {
                Some(vertex) => self.reset_emphasis(vertex),
                None => self.reset_camera(),
            },
            Event::Resize { width } => self.resize(*width),
        }
    }
}
