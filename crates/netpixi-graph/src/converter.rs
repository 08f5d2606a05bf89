use crate::bundling::{Bundles, EdgeBundler};
use crate::graph::{Network, Vec2, Vertex};
use crate::ingest::RawGraph;
use crate::layout::{LayoutNormalizer, Layouter};
use crate::options::ViewOptions;
use crate::stream::ingest_reader;
use netpixi_core::LoadError;
use rand::Rng;
use std::io::BufRead;
use std::time::Instant;

/// Turns a validated raw graph into a drawable network: bundles edges into
/// areas and places every vertex on a canvas of the configured size.
pub struct NetworkConverter {
    bundler: EdgeBundler,
    layouter: LayoutNormalizer,
    canvas: Vec2,
}

impl NetworkConverter {
    pub fn new(options: &ViewOptions) -> Self {
        Self {
            bundler: EdgeBundler::new(options.broker),
            layouter: LayoutNormalizer::new(options.normalize),
            canvas: Vec2::new(options.width, options.height()),
        }
    }

    pub fn convert<R: Rng + ?Sized>(&self, raw: RawGraph, rng: &mut R) -> Network {
        let started = Instant::now();
        let RawGraph {
            settings,
            vertices: pending,
            vertex_map,
            edges,
            extent_x,
            extent_y,
            ..
        } = raw;

        let positions = self.layouter.execute(
            &pending,
            (extent_x, extent_y),
            self.canvas,
            &settings.graph,
            rng,
        );
        let Bundles { areas, leaders } = self.bundler.bundle_edges(&pending, edges);

        let vertices: Vec<Vertex> = pending
            .into_iter()
            .zip(positions)
            .zip(leaders)
            .map(|((vertex, position), leaders)| {
                let mut v = Vertex::new(vertex.id, position, vertex.props);
                v.leaders = leaders;
                v
            })
            .collect();

        let network = Network::new(settings, vertices, vertex_map, areas);
        tracing::info!(
            "Built network with {} vertices, {} edges and {} areas in {:?}",
            network.vertex_count(),
            network.edge_count(),
            network.area_count(),
            started.elapsed()
        );
        network
    }
}

/// Reads, validates, bundles and lays out a whole NDJSON stream.
pub fn load_network<R: BufRead>(reader: R, options: &ViewOptions) -> Result<Network, LoadError> {
    let raw = ingest_reader(reader)?;
    let mut rng = options.rng();
    Ok(NetworkConverter::new(options).convert(raw, &mut rng))
}
