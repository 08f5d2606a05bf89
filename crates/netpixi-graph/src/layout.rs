use crate::graph::Vec2;
use crate::ingest::{Extent, PendingVertex};
use netpixi_core::GraphSettings;
use rand::Rng;

/// Places pending vertices in drawing space.
pub trait Layouter {
    fn execute<R: Rng + ?Sized>(
        &self,
        vertices: &[PendingVertex],
        extents: (Extent, Extent),
        canvas: Vec2,
        graph: &GraphSettings,
        rng: &mut R,
    ) -> Vec<Vec2>;
}

/// Maps input coordinates onto the canvas inside its borders.
///
/// With `normalize` on, every axis is rescaled so the observed extent fills
/// `[0, 1]`; a degenerate extent puts everything in the middle. With it off,
/// coordinates are taken to be in `[0, 1]` already. A missing coordinate is
/// drawn uniformly from `[0, 1)`. A lone vertex always sits in the middle.
#[derive(Debug, Clone, Copy)]
pub struct LayoutNormalizer {
    pub normalize: bool,
}

impl Default for LayoutNormalizer {
    fn default() -> Self {
        Self { normalize: true }
    }
}

impl LayoutNormalizer {
    pub fn new(normalize: bool) -> Self {
        Self { normalize }
    }

    pub fn unit<R: Rng + ?Sized>(&self, value: Option<f64>, extent: &Extent, rng: &mut R) -> f64 {
        let Some(value) = value else {
            return rng.gen_range(0.0..1.0);
        };
        if !self.normalize {
            return value;
        }
        match extent.span() {
            Some(span) => (value - extent.min) / span,
            None => 0.5,
        }
    }
}

/// Converts a unit coordinate into canvas pixels.
pub fn to_screen(unit: f64, border: f64, length: f64) -> f64 {
    border + unit * (length - 2.0 * border)
}

impl Layouter for LayoutNormalizer {
    fn execute<R: Rng + ?Sized>(
        &self,
        vertices: &[PendingVertex],
        (extent_x, extent_y): (Extent, Extent),
        canvas: Vec2,
        graph: &GraphSettings,
        rng: &mut R,
    ) -> Vec<Vec2> {
        if vertices.len() == 1 {
            return vec![Vec2::new(
                to_screen(0.5, graph.border_x, canvas.x),
                to_screen(0.5, graph.border_y, canvas.y),
            )];
        }
        let mut random = 0;
        let positions: Vec<Vec2> = vertices
            .iter()
            .map(|vertex| {
                random += usize::from(vertex.x.is_none()) + usize::from(vertex.y.is_none());
                let x = self.unit(vertex.x, &extent_x, rng);
                let y = self.unit(vertex.y, &extent_y, rng);
                Vec2::new(
                    to_screen(x, graph.border_x, canvas.x),
                    to_screen(y, graph.border_y, canvas.y),
                )
            })
            .collect();
        if random > 0 {
            tracing::debug!("Drew {} missing coordinates at random", random);
        }
        positions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netpixi_core::{VertexId, VertexProps};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn vertex(x: Option<f64>, y: Option<f64>) -> PendingVertex {
        PendingVertex {
            id: VertexId::from("v"),
            x,
            y,
            degree: 0,
            props: VertexProps::default(),
        }
    }

    fn extent(min: f64, max: f64) -> Extent {
        Extent { min, max }
    }

    #[test]
    fn test_normalized_extent_fills_canvas() {
        let vertices = vec![vertex(Some(-5.0), Some(2.0)), vertex(Some(5.0), Some(4.0))];
        let graph = GraphSettings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let positions = LayoutNormalizer::new(true).execute(
            &vertices,
            (extent(-5.0, 5.0), extent(2.0, 4.0)),
            Vec2::new(200.0, 100.0),
            &graph,
            &mut rng,
        );
        assert_eq!(positions[0], Vec2::new(10.0, 10.0));
        assert_eq!(positions[1], Vec2::new(190.0, 90.0));
    }

    #[test]
    fn test_degenerate_extent_centers() {
        let normalizer = LayoutNormalizer::new(true);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(normalizer.unit(Some(3.0), &extent(3.0, 3.0), &mut rng), 0.5);
        assert_eq!(normalizer.unit(Some(3.0), &extent(3.0, 3.0 + 1e-9), &mut rng), 0.5);
    }

    #[test]
    fn test_raw_coordinates_pass_through() {
        let normalizer = LayoutNormalizer::new(false);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(normalizer.unit(Some(0.25), &extent(0.0, 100.0), &mut rng), 0.25);
        assert_eq!(to_screen(0.25, 0.0, 400.0), 100.0);
    }

    #[test]
    fn test_single_vertex_is_centered() {
        let graph = GraphSettings::default();
        let mut rng = StdRng::seed_from_u64(3);
        for normalize in [true, false] {
            let positions = LayoutNormalizer::new(normalize).execute(
                &[vertex(None, Some(0.9))],
                (Extent::default(), extent(0.9, 0.9)),
                Vec2::new(200.0, 100.0),
                &graph,
                &mut rng,
            );
            assert_eq!(positions, vec![Vec2::new(100.0, 50.0)]);
        }
    }

    #[test]
    fn test_missing_coordinates_are_seeded() {
        let vertices = vec![vertex(None, Some(1.0)), vertex(Some(1.0), None)];
        let graph = GraphSettings::default();
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            LayoutNormalizer::default().execute(
                &vertices,
                (extent(1.0, 1.0), extent(1.0, 1.0)),
                Vec2::new(100.0, 100.0),
                &graph,
                &mut rng,
            )
        };
        let first = run(7);
        assert_eq!(first, run(7));
        assert_eq!(first[0].y, 50.0);
        assert!(first[0].x >= 10.0 && first[0].x < 90.0);
    }
}
