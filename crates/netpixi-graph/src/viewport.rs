//! Sorted per-axis orderings of all vertices with a sliding visible window.
//!
//! Each axis keeps every vertex sorted by coordinate plus two cursors:
//! `left` is the first vertex not before the low bound, `right` is one past
//! the last vertex not after the high bound; both bounds are inclusive. When
//! the viewport moves the cursors slide and only the vertices they pass change
//! visibility, so a small pan costs time proportional to what actually
//! entered or left.
//!
//! A dragged vertex is moved to its new place in both orderings by shifting
//! its neighbors one step at a time, in the manner of insertion sort.

use crate::graph::{Axis, Vertex, VertexIndex};
use netpixi_core::compare;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Range;

/// The visible region in drawing space at zoom 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn range(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => (self.left, self.right),
            Axis::Y => (self.top, self.bottom),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct AxisOrder {
    ids: Vec<VertexIndex>,
    left: usize,
    right: usize,
}

impl AxisOrder {
    fn build(vertices: &mut [Vertex], axis: Axis) -> Self {
        let mut ids: Vec<VertexIndex> = (0..vertices.len()).map(VertexIndex).collect();
        // Exact order: the epsilon comparator is not transitive
        ids.sort_by(|a, b| {
            vertices[a.0]
                .coordinate(axis)
                .total_cmp(&vertices[b.0].coordinate(axis))
        });
        for (position, id) in ids.iter().enumerate() {
            let vertex = &mut vertices[id.0];
            vertex.set_index_on(axis, position);
            vertex.set_visible_on(axis, true);
        }
        let right = ids.len();
        Self {
            ids,
            left: 0,
            right,
        }
    }

    fn coordinate(&self, vertices: &[Vertex], axis: Axis, position: usize) -> f64 {
        vertices[self.ids[position].0].coordinate(axis)
    }

    /// Slides both cursors to `low..=high`, recording every vertex passed.
    fn slide(
        &mut self,
        vertices: &[Vertex],
        axis: Axis,
        (low, high): (f64, f64),
        passed: &mut Vec<VertexIndex>,
    ) {
        let n = self.ids.len();
        while self.left > 0
            && compare(self.coordinate(vertices, axis, self.left - 1), low) != Ordering::Less
        {
            self.left -= 1;
            passed.push(self.ids[self.left]);
        }
        while self.left < n
            && compare(self.coordinate(vertices, axis, self.left), low) == Ordering::Less
        {
            passed.push(self.ids[self.left]);
            self.left += 1;
        }
        while self.right > 0
            && compare(self.coordinate(vertices, axis, self.right - 1), high) == Ordering::Greater
        {
            self.right -= 1;
            passed.push(self.ids[self.right]);
        }
        while self.right < n
            && compare(self.coordinate(vertices, axis, self.right), high) != Ordering::Greater
        {
            passed.push(self.ids[self.right]);
            self.right += 1;
        }
    }

    fn contains(&self, position: usize) -> bool {
        self.left <= position && position < self.right
    }

    fn relocate(&mut self, vertices: &mut [Vertex], axis: Axis, moved: VertexIndex) {
        let value = vertices[moved.0].coordinate(axis);
        let mut i = vertices[moved.0].index_on(axis);
        while i > 0 && compare(value, self.coordinate(vertices, axis, i - 1)) == Ordering::Less {
            self.ids[i] = self.ids[i - 1];
            vertices[self.ids[i].0].set_index_on(axis, i);
            i -= 1;
        }
        while i + 1 < self.ids.len()
            && compare(value, self.coordinate(vertices, axis, i + 1)) == Ordering::Greater
        {
            self.ids[i] = self.ids[i + 1];
            vertices[self.ids[i].0].set_index_on(axis, i);
            i += 1;
        }
        self.ids[i] = moved;
        vertices[moved.0].set_index_on(axis, i);
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewportIndex {
    x: AxisOrder,
    y: AxisOrder,
}

impl ViewportIndex {
    /// Sorts every vertex on both axes and restricts visibility to `bounds`.
    ///
    /// Returns the leaders whose areas gained or lost a visible vertex.
    pub fn build(vertices: &mut [Vertex], bounds: Bounds) -> (Self, BTreeSet<VertexIndex>) {
        let mut index = Self {
            x: AxisOrder::build(vertices, Axis::X),
            y: AxisOrder::build(vertices, Axis::Y),
        };
        let leaders = index.refresh(vertices, bounds, None);
        (index, leaders)
    }

    fn order(&self, axis: Axis) -> &AxisOrder {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    pub fn ids(&self, axis: Axis) -> &[VertexIndex] {
        &self.order(axis).ids
    }

    /// Positions in `ids(axis)` currently inside the window.
    pub fn window(&self, axis: Axis) -> Range<usize> {
        let order = self.order(axis);
        order.left..order.right.max(order.left)
    }

    pub fn len(&self) -> usize {
        self.x.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.ids.is_empty()
    }

    /// Restores sortedness after `moved` changed position. Cursors stay put.
    pub fn relocate(&mut self, vertices: &mut [Vertex], moved: VertexIndex) {
        self.x.relocate(vertices, Axis::X, moved);
        self.y.relocate(vertices, Axis::Y, moved);
    }

    /// Slides the windows to `bounds` and updates the flags of every vertex
    /// whose membership may have changed, plus `also` if given.
    ///
    /// Returns the leaders of vertices whose overall visibility changed.
    pub fn refresh(
        &mut self,
        vertices: &mut [Vertex],
        bounds: Bounds,
        also: Option<VertexIndex>,
    ) -> BTreeSet<VertexIndex> {
        let mut passed = Vec::new();
        self.x.slide(vertices, Axis::X, bounds.range(Axis::X), &mut passed);
        self.y.slide(vertices, Axis::Y, bounds.range(Axis::Y), &mut passed);
        passed.extend(also);

        let mut leaders = BTreeSet::new();
        for id in passed {
            let vertex = &mut vertices[id.0];
            let was_visible = vertex.is_visible();
            vertex.visible_x = self.x.contains(vertex.index_x);
            vertex.visible_y = self.y.contains(vertex.index_y);
            if vertex.is_visible() != was_visible {
                leaders.extend(vertex.leaders.iter().copied());
            }
        }
        leaders
    }

    /// Vertices visible on both axes, in x order.
    pub fn visible<'a>(&'a self, vertices: &'a [Vertex]) -> impl Iterator<Item = VertexIndex> + 'a {
        self.x.ids[self.window(Axis::X)]
            .iter()
            .copied()
            .filter(move |id| vertices[id.0].visible_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Vec2;
    use netpixi_core::{VertexId, VertexProps};
    use proptest::prelude::*;

    fn vertices(points: &[(f64, f64)]) -> Vec<Vertex> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let mut vertex = Vertex::new(
                    VertexId::from(i as i64),
                    Vec2::new(x, y),
                    VertexProps::default(),
                );
                vertex.leaders.insert(VertexIndex(i));
                vertex
            })
            .collect()
    }

    fn bounds(left: f64, right: f64, top: f64, bottom: f64) -> Bounds {
        Bounds {
            left,
            right,
            top,
            bottom,
        }
    }

    fn expected_visible(vertex: &Vertex, b: &Bounds) -> bool {
        let p = vertex.position;
        compare(p.x, b.left).is_ge()
            && compare(p.x, b.right).is_le()
            && compare(p.y, b.top).is_ge()
            && compare(p.y, b.bottom).is_le()
    }

    fn assert_sorted(index: &ViewportIndex, vertices: &[Vertex]) {
        for axis in [Axis::X, Axis::Y] {
            let ids = index.ids(axis);
            for (position, id) in ids.iter().enumerate() {
                assert_eq!(vertices[id.0].index_on(axis), position);
            }
            for pair in ids.windows(2) {
                let a = vertices[pair[0].0].coordinate(axis);
                let b = vertices[pair[1].0].coordinate(axis);
                assert_ne!(compare(a, b), Ordering::Greater, "{axis:?} order broken");
            }
        }
    }

    #[test]
    fn test_build_marks_window() {
        let mut vs = vertices(&[(0.0, 0.0), (5.0, 5.0), (10.0, 10.0), (5.0, 20.0)]);
        let (index, leaders) = ViewportIndex::build(&mut vs, bounds(2.0, 10.0, 0.0, 10.0));
        assert_sorted(&index, &vs);
        let visible: Vec<bool> = vs.iter().map(Vertex::is_visible).collect();
        assert_eq!(visible, vec![false, true, true, false]);
        assert_eq!(leaders, BTreeSet::from([VertexIndex(0), VertexIndex(3)]));
        let shown: Vec<usize> = index.visible(&vs).map(|id| id.0).collect();
        assert_eq!(shown, vec![1, 2]);
    }

    #[test]
    fn test_pan_far_right_and_back() {
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64 * 10.0, 0.0)).collect();
        let mut vs = vertices(&points);
        let (mut index, _) = ViewportIndex::build(&mut vs, bounds(0.0, 25.0, -1.0, 1.0));
        let on: Vec<usize> = index.visible(&vs).map(|id| id.0).collect();
        assert_eq!(on, vec![0, 1, 2]);

        let far = bounds(65.0, 85.0, -1.0, 1.0);
        let changed = index.refresh(&mut vs, far, None);
        let on: Vec<usize> = index.visible(&vs).map(|id| id.0).collect();
        assert_eq!(on, vec![7, 8]);
        assert_eq!(changed.len(), 5);
        for v in &vs {
            assert_eq!(v.is_visible(), expected_visible(v, &far));
        }

        let back = bounds(-5.0, 12.0, -1.0, 1.0);
        index.refresh(&mut vs, back, None);
        let on: Vec<usize> = index.visible(&vs).map(|id| id.0).collect();
        assert_eq!(on, vec![0, 1]);
    }

    #[test]
    fn test_relocate_keeps_order_and_indices() {
        let mut vs = vertices(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let (mut index, _) = ViewportIndex::build(&mut vs, bounds(0.0, 3.0, 0.0, 3.0));
        vs[0].position = Vec2::new(2.5, -1.0);
        index.relocate(&mut vs, VertexIndex(0));
        assert_sorted(&index, &vs);
        assert_eq!(vs[0].index_x, 2);
        assert_eq!(vs[0].index_y, 0);

        let changed = index.refresh(&mut vs, bounds(0.0, 3.0, 0.0, 3.0), Some(VertexIndex(0)));
        assert!(!vs[0].visible_y);
        assert!(vs[0].visible_x);
        assert_eq!(changed, BTreeSet::from([VertexIndex(0)]));
        assert!(vs[1..].iter().all(Vertex::is_visible));
    }

    #[test]
    fn test_build_over_points_closer_than_epsilon() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(1);
        let mut points: Vec<(f64, f64)> = (0..2000)
            .map(|_| (rng.gen_range(0.0..1e-4), rng.gen_range(0.0..1e-4)))
            .collect();
        points.push((1e6, 1e6));
        let mut vs = vertices(&points);

        let view = bounds(0.0, 1.0, 0.0, 1.0);
        let (mut index, _) = ViewportIndex::build(&mut vs, view);
        assert_sorted(&index, &vs);
        assert_eq!(index.visible(&vs).count(), 2000);
        assert!(!vs[2000].is_visible());

        vs[0].position = Vec2::new(5e-5, 5e-5);
        index.relocate(&mut vs, VertexIndex(0));
        index.refresh(&mut vs, view, Some(VertexIndex(0)));
        assert_sorted(&index, &vs);
        assert!(vs[0].is_visible());
    }

    proptest! {
        /// Any sequence of drags followed by window maintenance leaves both
        /// orderings sorted and the visibility flags equal to a from-scratch check.
        #[test]
        fn prop_drags_match_full_rebuild(
            points in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 1..40),
            drags in prop::collection::vec((any::<prop::sample::Index>(), -120.0f64..120.0, -120.0f64..120.0), 0..30),
            window in (-80.0f64..0.0, 10.0f64..80.0, -80.0f64..0.0, 10.0f64..80.0),
        ) {
            let mut vs = vertices(&points);
            let view = bounds(window.0, window.0 + window.1, window.2, window.2 + window.3);
            let (mut index, _) = ViewportIndex::build(&mut vs, view);

            for (which, x, y) in drags {
                let moved = VertexIndex(which.index(vs.len()));
                vs[moved.0].position = Vec2::new(x, y);
                index.relocate(&mut vs, moved);
                index.refresh(&mut vs, view, Some(moved));
            }

            assert_sorted(&index, &vs);
            for v in &vs {
                prop_assert_eq!(v.is_visible(), expected_visible(v, &view));
            }
        }

        #[test]
        fn prop_pans_match_full_rebuild(
            points in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 1..40),
            pans in prop::collection::vec((-150.0f64..150.0, -150.0f64..150.0, 1.0f64..100.0), 1..20),
        ) {
            let mut vs = vertices(&points);
            let (mut index, _) = ViewportIndex::build(&mut vs, bounds(-10.0, 10.0, -10.0, 10.0));
            for (x, y, size) in pans {
                let view = bounds(x, x + size, y, y + size);
                let before: Vec<bool> = vs.iter().map(Vertex::is_visible).collect();
                let leaders = index.refresh(&mut vs, view, None);
                for (i, v) in vs.iter().enumerate() {
                    prop_assert_eq!(v.is_visible(), expected_visible(v, &view));
                    if v.is_visible() != before[i] {
                        prop_assert!(leaders.contains(&VertexIndex(i)));
                    }
                }
            }
        }
    }
}
