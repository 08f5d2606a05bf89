//! Decides which areas must be redrawn after a change and drives the surface.

use crate::batch::build_area_batch;
use crate::camera::{Camera, Scales};
use crate::graph::{Network, VertexIndex};
use crate::surface::{RenderSurface, VertexSprite};
use crate::viewport::{Bounds, ViewportIndex};
use netpixi_core::merge;
use std::borrow::Cow;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RedrawPlan {
    #[default]
    Nothing,
    /// Redraw exactly these leaders' areas.
    Areas(BTreeSet<VertexIndex>),
    /// Background, every vertex and every area.
    Full,
}

impl RedrawPlan {
    pub fn areas(leaders: BTreeSet<VertexIndex>) -> Self {
        if leaders.is_empty() {
            RedrawPlan::Nothing
        } else {
            RedrawPlan::Areas(leaders)
        }
    }

    pub fn union(self, other: RedrawPlan) -> Self {
        match (self, other) {
            (RedrawPlan::Full, _) | (_, RedrawPlan::Full) => RedrawPlan::Full,
            (RedrawPlan::Nothing, plan) | (plan, RedrawPlan::Nothing) => plan,
            (RedrawPlan::Areas(mut a), RedrawPlan::Areas(b)) => {
                a.extend(b);
                RedrawPlan::Areas(a)
            }
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, RedrawPlan::Nothing)
    }
}

/// A vertex moved in drawing space: fix the orderings, maintain the window,
/// and redraw its own areas plus those whose visibility changed.
pub fn on_vertex_move(
    network: &mut Network,
    index: &mut ViewportIndex,
    bounds: Bounds,
    moved: VertexIndex,
) -> RedrawPlan {
    index.relocate(network.vertices_mut(), moved);
    let mut leaders = index.refresh(network.vertices_mut(), bounds, Some(moved));
    leaders.extend(network[moved].leaders.iter().copied());
    RedrawPlan::areas(leaders)
}

/// The visible region moved or changed size at a constant zoom.
pub fn on_viewport_change(
    network: &mut Network,
    index: &mut ViewportIndex,
    bounds: Bounds,
) -> RedrawPlan {
    RedrawPlan::areas(index.refresh(network.vertices_mut(), bounds, None))
}

/// Anything that changes how every area looks.
pub fn on_settings_or_property_change() -> RedrawPlan {
    RedrawPlan::Full
}

pub fn vertex_sprite(network: &Network, vertex: VertexIndex, scales: &Scales) -> VertexSprite {
    let v = &network[vertex];
    let style = merge(&network.settings.vertex, &v.props.style);
    VertexSprite {
        position: v.position.scaled(scales.position),
        radius: scales.vertex * style.size,
        color: style.color,
        alpha: style.alpha,
        shared: matches!(style, Cow::Borrowed(_)),
    }
}

/// Executes redraw plans and keeps counts for reporting.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    pub full_redraws: usize,
    pub area_redraws: usize,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute<S: RenderSurface>(
        &mut self,
        plan: RedrawPlan,
        network: &Network,
        camera: &Camera,
        surface: &mut S,
    ) {
        let scales = camera.scales(&network.settings.graph);
        match plan {
            RedrawPlan::Nothing => {}
            RedrawPlan::Areas(leaders) => {
                tracing::debug!("Redrawing {} areas", leaders.len());
                for leader in leaders {
                    self.draw_area(network, leader, &scales, surface);
                }
            }
            RedrawPlan::Full => {
                tracing::debug!("Full redraw of {} areas", network.area_count());
                self.full_redraws += 1;
                let graph = &network.settings.graph;
                surface.set_background(graph.color, graph.alpha);
                for vertex in network.indices() {
                    surface.place_vertex(vertex, &vertex_sprite(network, vertex, &scales));
                }
                for leader in network.leaders() {
                    self.draw_area(network, leader, &scales, surface);
                }
            }
        }
    }

    /// Redraws one vertex sprite, for moves and per-vertex edits.
    pub fn place_vertex<S: RenderSurface>(
        &mut self,
        network: &Network,
        vertex: VertexIndex,
        camera: &Camera,
        surface: &mut S,
    ) {
        let scales = camera.scales(&network.settings.graph);
        surface.place_vertex(vertex, &vertex_sprite(network, vertex, &scales));
    }

    fn draw_area<S: RenderSurface>(
        &mut self,
        network: &Network,
        leader: VertexIndex,
        scales: &Scales,
        surface: &mut S,
    ) {
        if network.area(leader).is_none() {
            return;
        }
        self.area_redraws += 1;
        surface.draw_area(&build_area_batch(network, leader, scales));
    }
}
