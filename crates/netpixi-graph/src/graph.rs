use netpixi_core::{EdgeProps, Settings, VertexId, VertexProps};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexIndex(pub usize);

impl fmt::Display for VertexIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Which coordinate an ordering or a visibility flag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    /// Drawing-space position at zoom 100.
    pub position: Vec2,
    /// Leaders of every area this vertex takes part in.
    pub leaders: BTreeSet<VertexIndex>,
    pub props: VertexProps,
    pub visible_x: bool,
    pub visible_y: bool,
    /// Emphasis factor applied to incident edges.
    pub alpha: f64,
    pub index_x: usize,
    pub index_y: usize,
}

impl Vertex {
    pub fn new(id: VertexId, position: Vec2, props: VertexProps) -> Self {
        Self {
            id,
            position,
            leaders: BTreeSet::new(),
            props,
            visible_x: true,
            visible_y: true,
            alpha: 1.0,
            index_x: 0,
            index_y: 0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible_x && self.visible_y
    }

    pub fn coordinate(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.position.x,
            Axis::Y => self.position.y,
        }
    }

    pub fn visible_on(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.visible_x,
            Axis::Y => self.visible_y,
        }
    }

    pub fn set_visible_on(&mut self, axis: Axis, visible: bool) {
        match axis {
            Axis::X => self.visible_x = visible,
            Axis::Y => self.visible_y = visible,
        }
    }

    pub fn index_on(&self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.index_x,
            Axis::Y => self.index_y,
        }
    }

    pub fn set_index_on(&mut self, axis: Axis, index: usize) {
        match axis {
            Axis::X => self.index_x = index,
            Axis::Y => self.index_y = index,
        }
    }
}

/// An edge as stored in its leader's area.
///
/// `reversed` is true when the logical edge runs from the neighbor to the
/// leader. On directed graphs the edge in the other direction, if any, lands
/// on the same pair and is kept in `opposite`.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub reversed: bool,
    pub props: EdgeProps,
    pub opposite: Option<EdgeProps>,
}

impl Neighbor {
    pub fn new(reversed: bool, props: EdgeProps) -> Self {
        Self {
            reversed,
            props,
            opposite: None,
        }
    }

    pub fn edge_count(&self) -> usize {
        1 + usize::from(self.opposite.is_some())
    }
}

/// The edges drawn together as one batch, owned by their leader.
#[derive(Debug, Clone, PartialEq)]
pub struct Area {
    pub leader: VertexIndex,
    pub neighbors: BTreeMap<VertexIndex, Neighbor>,
}

impl Area {
    pub fn new(leader: VertexIndex) -> Self {
        Self {
            leader,
            neighbors: BTreeMap::new(),
        }
    }

    pub fn edge_count(&self) -> usize {
        self.neighbors.values().map(Neighbor::edge_count).sum()
    }

    /// Every edge of this area as `(source, target, props)` in logical direction.
    pub fn edges(&self) -> impl Iterator<Item = (VertexIndex, VertexIndex, &EdgeProps)> + '_ {
        self.neighbors.iter().flat_map(move |(&neighbor, entry)| {
            let (source, target) = if entry.reversed {
                (neighbor, self.leader)
            } else {
                (self.leader, neighbor)
            };
            std::iter::once((source, target, &entry.props)).chain(
                entry
                    .opposite
                    .as_ref()
                    .map(|props| (target, source, props)),
            )
        })
    }
}

/// Where an edge lives: the owning area, the neighbor key, and whether it is
/// the pair's opposite entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSlot {
    pub leader: VertexIndex,
    pub neighbor: VertexIndex,
    pub opposite: bool,
}

/// A loaded, bundled and laid out graph.
#[derive(Debug, Clone)]
pub struct Network {
    pub settings: Settings,
    vertices: Vec<Vertex>,
    vertex_map: HashMap<VertexId, VertexIndex>,
    areas: BTreeMap<VertexIndex, Area>,
}

impl Network {
    pub fn new(
        settings: Settings,
        vertices: Vec<Vertex>,
        vertex_map: HashMap<VertexId, VertexIndex>,
        areas: BTreeMap<VertexIndex, Area>,
    ) -> Self {
        Self {
            settings,
            vertices,
            vertex_map,
            areas,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.areas.values().map(Area::edge_count).sum()
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn vertex_index(&self, id: &VertexId) -> Option<VertexIndex> {
        self.vertex_map.get(id).copied()
    }

    pub fn vertex(&self, index: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(index.0)
    }

    pub fn vertex_mut(&mut self, index: VertexIndex) -> Option<&mut Vertex> {
        self.vertices.get_mut(index.0)
    }

    pub fn get_vertex(&self, id: &VertexId) -> Option<&Vertex> {
        self.vertex_map.get(id).map(|&idx| &self.vertices[idx.0])
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertices_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices
    }

    pub fn indices(&self) -> impl Iterator<Item = VertexIndex> + use<> {
        (0..self.vertices.len()).map(VertexIndex)
    }

    pub fn area(&self, leader: VertexIndex) -> Option<&Area> {
        self.areas.get(&leader)
    }

    pub fn area_mut(&mut self, leader: VertexIndex) -> Option<&mut Area> {
        self.areas.get_mut(&leader)
    }

    pub fn areas(&self) -> impl Iterator<Item = &Area> {
        self.areas.values()
    }

    pub fn areas_mut(&mut self) -> impl Iterator<Item = &mut Area> {
        self.areas.values_mut()
    }

    pub fn leaders(&self) -> BTreeSet<VertexIndex> {
        self.areas.keys().copied().collect()
    }

    /// Every edge in logical direction, grouped by area.
    pub fn edges(&self) -> impl Iterator<Item = (VertexIndex, VertexIndex, &EdgeProps)> {
        self.areas.values().flat_map(Area::edges)
    }

    /// Locates the edge running from `source` to `target`.
    pub fn find_edge(&self, source: VertexIndex, target: VertexIndex) -> Option<EdgeSlot> {
        self.slot_in(source, target, source)
            .or_else(|| self.slot_in(target, source, source))
    }

    fn slot_in(
        &self,
        leader: VertexIndex,
        neighbor: VertexIndex,
        source: VertexIndex,
    ) -> Option<EdgeSlot> {
        let entry = self.areas.get(&leader)?.neighbors.get(&neighbor)?;
        let primary_source = if entry.reversed { neighbor } else { leader };
        let opposite = if primary_source == source {
            false
        } else if entry.opposite.is_some() {
            true
        } else {
            return None;
        };
        Some(EdgeSlot {
            leader,
            neighbor,
            opposite,
        })
    }

    pub fn edge_props(&self, slot: EdgeSlot) -> Option<&EdgeProps> {
        let entry = self.areas.get(&slot.leader)?.neighbors.get(&slot.neighbor)?;
        if slot.opposite {
            entry.opposite.as_ref()
        } else {
            Some(&entry.props)
        }
    }

    pub fn edge_props_mut(&mut self, slot: EdgeSlot) -> Option<&mut EdgeProps> {
        let entry = self
            .areas
            .get_mut(&slot.leader)?
            .neighbors
            .get_mut(&slot.neighbor)?;
        if slot.opposite {
            entry.opposite.as_mut()
        } else {
            Some(&mut entry.props)
        }
    }
}

impl Index<VertexIndex> for Network {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Vertex {
        &self.vertices[index.0]
    }
}

impl IndexMut<VertexIndex> for Network {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Vertex {
        &mut self.vertices[index.0]
    }
}
