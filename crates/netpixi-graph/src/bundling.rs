use crate::graph::{Area, Neighbor, VertexIndex};
use crate::ingest::{EdgeTable, PendingVertex};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// Groups every edge under one of its endpoints, the leader, so that moving a
/// vertex only redraws the areas it belongs to.
///
/// By default the endpoint with the higher degree leads, which keeps hubs as
/// leaders and the number of areas low, and ties go to the lexically larger
/// id. Broker mode inverts every choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeBundler {
    pub broker: bool,
}

/// Output of bundling: the areas and, per vertex, the leaders it belongs to.
#[derive(Debug, Clone, Default)]
pub struct Bundles {
    pub areas: BTreeMap<VertexIndex, Area>,
    pub leaders: Vec<BTreeSet<VertexIndex>>,
}

impl EdgeBundler {
    pub fn new(broker: bool) -> Self {
        Self { broker }
    }

    /// Whether the edge `source -> target` is led by its target.
    pub fn is_reversed(&self, source: &PendingVertex, target: &PendingVertex) -> bool {
        let reversed = if source.degree == target.degree {
            source.id < target.id
        } else {
            source.degree < target.degree
        };
        reversed != self.broker
    }

    pub fn bundle_edges(&self, vertices: &[PendingVertex], edges: EdgeTable) -> Bundles {
        let mut areas: BTreeMap<VertexIndex, Area> = BTreeMap::new();
        let mut leaders = vec![BTreeSet::new(); vertices.len()];

        for (source, targets) in edges {
            for (target, props) in targets {
                let reversed = self.is_reversed(&vertices[source.0], &vertices[target.0]);
                let (leader, neighbor) = if reversed {
                    (target, source)
                } else {
                    (source, target)
                };

                let area = areas.entry(leader).or_insert_with(|| {
                    leaders[leader.0].insert(leader);
                    Area::new(leader)
                });
                match area.neighbors.entry(neighbor) {
                    Entry::Vacant(slot) => {
                        slot.insert(Neighbor::new(reversed, props));
                    }
                    Entry::Occupied(mut slot) => {
                        slot.get_mut().opposite = Some(props);
                    }
                }
                leaders[neighbor.0].insert(leader);
            }
        }

        tracing::debug!(
            "Bundled edges into {} areas (broker: {})",
            areas.len(),
            self.broker
        );
        Bundles { areas, leaders }
    }
}
