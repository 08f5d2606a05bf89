//! Changes applied to a loaded network.
//!
//! Every operation validates its whole input before touching the network, so
//! a returned error leaves it exactly as it was.

use crate::graph::{Network, Vec2, VertexIndex};
use crate::record::Record;
use crate::scheduler::RedrawPlan;
use crate::surface::RenderSurface;
use crate::view::NetworkView;
use netpixi_core::validate::optional_coordinate;
use netpixi_core::{
    Category, EdgeOverride, EdgeProps, EditError, Override, Props, SettingsOverride, Style,
    VertexId, VertexOverride, VertexProps, compare,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Which entities a bulk property operation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Vertices,
    Edges,
}

/// What an edit requires from the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub plan: RedrawPlan,
    /// Vertices whose sprite must be placed again.
    pub sprites: BTreeSet<VertexIndex>,
    /// A vertex whose position changed.
    pub moved: Option<VertexIndex>,
}

impl From<RedrawPlan> for EditOutcome {
    fn from(plan: RedrawPlan) -> Self {
        Self {
            plan,
            ..Default::default()
        }
    }
}

fn check_value<O: Override + Serialize>(name: &str, value: &Value) -> Result<(), EditError> {
    Props::<O>::default().set(name, value.clone())?;
    Ok(())
}

fn numeric(
    value: Option<Value>,
    entity: impl FnOnce() -> String,
    property: &str,
) -> Result<f64, EditError> {
    let Some(value) = value else {
        return Err(EditError::MissingValue {
            entity: entity(),
            property: property.to_string(),
        });
    };
    match value.as_f64() {
        Some(number) if number.is_finite() => Ok(number),
        _ => Err(EditError::NonNumeric {
            entity: entity(),
            property: property.to_string(),
        }),
    }
}

/// Linear map of `values` onto `[min, max]`; all equal values go to the middle.
fn rescale(values: &[f64], min: f64, max: f64) -> Vec<f64> {
    let (mut low, mut high) = (f64::INFINITY, f64::NEG_INFINITY);
    for &value in values {
        if compare(low, value).is_gt() {
            low = value;
        }
        if compare(high, value).is_lt() {
            high = value;
        }
    }
    if compare(low, high).is_eq() {
        return vec![(min + max) / 2.0; values.len()];
    }
    values
        .iter()
        .map(|value| min + (max - min) * (value - low) / (high - low))
        .collect()
}

impl Network {
    fn each_edge_mut(&mut self) -> impl Iterator<Item = (VertexIndex, &mut EdgeProps)> {
        self.areas_mut().flat_map(|area| {
            let leader = area.leader;
            area.neighbors.values_mut().flat_map(move |entry| {
                std::iter::once(&mut entry.props)
                    .chain(entry.opposite.as_mut())
                    .map(move |props| (leader, props))
            })
        })
    }

    fn describe_edge(&self, source: VertexIndex, target: VertexIndex) -> String {
        format!(
            "edge with source {} and target {}",
            self[source].id, self[target].id
        )
    }

    pub fn change_settings(&mut self, props: &Map<String, Value>) -> Result<EditOutcome, EditError> {
        let change = SettingsOverride::from_props(props)?;
        self.settings.apply(&change)?;
        Ok(RedrawPlan::Full.into())
    }

    /// Merges `props` into a vertex. `x` and `y`, when present, move it in
    /// drawing space.
    pub fn change_vertex(
        &mut self,
        id: &VertexId,
        mut props: Map<String, Value>,
    ) -> Result<EditOutcome, EditError> {
        let vertex = self
            .vertex_index(id)
            .ok_or_else(|| EditError::MissingVertex(id.clone()))?;
        let x = optional_coordinate(Category::Vertex, "x", props.remove("x"))?;
        let y = optional_coordinate(Category::Vertex, "y", props.remove("y"))?;
        let update = VertexProps::from_map(props)?;

        let v = &mut self[vertex];
        let before = v.position;
        v.position = Vec2::new(x.unwrap_or(before.x), y.unwrap_or(before.y));
        v.props.absorb(&update);
        let moved = v.position != before;

        Ok(EditOutcome {
            plan: RedrawPlan::areas(v.leaders.clone()),
            sprites: BTreeSet::from([vertex]),
            moved: moved.then_some(vertex),
        })
    }

    /// Merges `props` into an edge. Undirected graphs accept either orientation.
    pub fn change_edge(
        &mut self,
        source: &VertexId,
        target: &VertexId,
        props: Map<String, Value>,
    ) -> Result<EditOutcome, EditError> {
        let missing = || EditError::MissingEdge(source.clone(), target.clone());
        let s = self.vertex_index(source).ok_or_else(missing)?;
        let t = self.vertex_index(target).ok_or_else(missing)?;
        let slot = match self.find_edge(s, t) {
            Some(slot) => slot,
            None if !self.settings.graph.directed => self.find_edge(t, s).ok_or_else(missing)?,
            None => return Err(missing()),
        };
        let update = EdgeProps::from_map(props)?;
        self.edge_props_mut(slot).ok_or_else(missing)?.absorb(&update);
        Ok(RedrawPlan::areas(BTreeSet::from([slot.leader])).into())
    }

    pub fn delete_property(&mut self, scope: Scope, name: &str) -> EditOutcome {
        let mut outcome = EditOutcome::default();
        let mut leaders = BTreeSet::new();
        match scope {
            Scope::Vertices => {
                for (i, vertex) in self.vertices_mut().iter_mut().enumerate() {
                    if vertex.props.remove(name) {
                        outcome.sprites.insert(VertexIndex(i));
                        leaders.extend(vertex.leaders.iter().copied());
                    }
                }
            }
            Scope::Edges => {
                for (leader, props) in self.each_edge_mut() {
                    if props.remove(name) {
                        leaders.insert(leader);
                    }
                }
            }
        }
        outcome.plan = RedrawPlan::areas(leaders);
        outcome
    }

    /// Copies `src` into `dst` on every entity that has it and removes `dst`
    /// from every entity that does not.
    pub fn copy_property(
        &mut self,
        scope: Scope,
        src: &str,
        dst: &str,
    ) -> Result<EditOutcome, EditError> {
        if src == dst {
            return Err(EditError::SameProperty);
        }
        let mut outcome = EditOutcome::default();
        let mut leaders = BTreeSet::new();
        match scope {
            Scope::Vertices => {
                let values: Vec<Option<Value>> =
                    self.vertices().iter().map(|v| v.props.get(src)).collect();
                for value in values.iter().flatten() {
                    check_value::<VertexOverride>(dst, value)?;
                }
                for (i, (vertex, value)) in self.vertices_mut().iter_mut().zip(values).enumerate() {
                    let changed = match value {
                        Some(value) => vertex.props.set(dst, value).is_ok(),
                        None => vertex.props.remove(dst),
                    };
                    if changed {
                        outcome.sprites.insert(VertexIndex(i));
                        leaders.extend(vertex.leaders.iter().copied());
                    }
                }
            }
            Scope::Edges => {
                let values: Vec<Option<Value>> =
                    self.edges().map(|(_, _, props)| props.get(src)).collect();
                for value in values.iter().flatten() {
                    check_value::<EdgeOverride>(dst, value)?;
                }
                for ((leader, props), value) in self.each_edge_mut().zip(values) {
                    let changed = match value {
                        Some(value) => props.set(dst, value).is_ok(),
                        None => props.remove(dst),
                    };
                    if changed {
                        leaders.insert(leader);
                    }
                }
            }
        }
        outcome.plan = RedrawPlan::areas(leaders);
        Ok(outcome)
    }

    /// Rescales `src` linearly into `[min, max]` over every entity. Entities
    /// without their own value use the settings default.
    pub fn normalize_property(
        &mut self,
        scope: Scope,
        src: &str,
        min: f64,
        max: f64,
    ) -> Result<EditOutcome, EditError> {
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min < max) {
            return Err(EditError::InvalidRange);
        }
        match scope {
            Scope::Vertices => {
                let default = self.settings.vertex.number(src).map(Value::from);
                let mut values = Vec::with_capacity(self.vertex_count());
                for vertex in self.vertices() {
                    let value = vertex.props.get(src).or_else(|| default.clone());
                    values.push(numeric(value, || format!("vertex with id {}", vertex.id), src)?);
                }
                let scaled = rescale(&values, min, max);
                for value in &scaled {
                    check_value::<VertexOverride>(src, &Value::from(*value))?;
                }
                for (vertex, value) in self.vertices_mut().iter_mut().zip(scaled) {
                    vertex.props.set(src, Value::from(value))?;
                }
            }
            Scope::Edges => {
                let default = self.settings.edge.number(src).map(Value::from);
                let mut values = Vec::with_capacity(self.edge_count());
                for (source, target, props) in self.edges() {
                    let value = props.get(src).or_else(|| default.clone());
                    values.push(numeric(value, || self.describe_edge(source, target), src)?);
                }
                let scaled = rescale(&values, min, max);
                for value in &scaled {
                    check_value::<EdgeOverride>(src, &Value::from(*value))?;
                }
                for ((_, props), value) in self.each_edge_mut().zip(scaled) {
                    props.set(src, Value::from(value))?;
                }
            }
        }
        Ok(RedrawPlan::Full.into())
    }
}

impl<S: RenderSurface> NetworkView<S> {
    /// Applies one `settings`, `vertex` or `edge` record as a change.
    pub fn change(&mut self, line: &str) -> Result<(), EditError> {
        let outcome = match Record::parse(line)? {
            Record::Settings { props } => self.network.change_settings(&props)?,
            Record::Vertex { id, props } => self.network.change_vertex(&id, props)?,
            Record::Edge {
                source,
                target,
                props,
            } => self.network.change_edge(&source, &target, props)?,
        };
        self.apply_edit(outcome);
        Ok(())
    }

    pub fn delete_property(&mut self, scope: Scope, name: &str) {
        let outcome = self.network.delete_property(scope, name);
        self.apply_edit(outcome);
    }

    pub fn copy_property(&mut self, scope: Scope, src: &str, dst: &str) -> Result<(), EditError> {
        let outcome = self.network.copy_property(scope, src, dst)?;
        self.apply_edit(outcome);
        Ok(())
    }

    pub fn normalize_property(
        &mut self,
        scope: Scope,
        src: &str,
        min: f64,
        max: f64,
    ) -> Result<(), EditError> {
        let outcome = self.network.normalize_property(scope, src, min, max)?;
        self.apply_edit(outcome);
        Ok(())
    }

    fn apply_edit(&mut self, outcome: EditOutcome) {
        let EditOutcome {
            plan,
            sprites,
            moved,
        } = outcome;
        if let Some(vertex) = moved {
            self.on_vertex_move(vertex);
        }
        if !matches!(plan, RedrawPlan::Full) {
            for vertex in sprites {
                self.scheduler
                    .place_vertex(&self.network, vertex, &self.camera, &mut self.surface);
            }
        }
        self.apply(plan);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::NetworkConverter;
    use crate::options::ViewOptions;
    use crate::stream::ingest_str;
    use serde_json::json;

    fn network(directed: bool) -> Network {
        let settings = if directed {
            "{\"type\": \"settings\", \"props\": {\"graph\": {\"directed\": true}}}\n"
        } else {
            "{\"type\": \"settings\"}\n"
        };
        let text = format!(
            "{settings}{}",
            concat!(
                "{\"type\": \"vertex\", \"id\": \"a\", \"props\": {\"x\": 0, \"y\": 0, \"weight\": 2}}\n",
                "{\"type\": \"vertex\", \"id\": \"b\", \"props\": {\"x\": 1, \"y\": 1, \"weight\": 6}}\n",
                "{\"type\": \"vertex\", \"id\": \"c\", \"props\": {\"x\": 2, \"y\": 0}}\n",
                "{\"type\": \"edge\", \"source\": \"a\", \"target\": \"b\", \"props\": {\"w\": 1}}\n",
                "{\"type\": \"edge\", \"source\": \"b\", \"target\": \"c\", \"props\": {\"w\": 3}}\n",
            )
        );
        let raw = ingest_str(&text).unwrap();
        let options = ViewOptions {
            seed: Some(0),
            ..Default::default()
        };
        NetworkConverter::new(&options).convert(raw, &mut options.rng())
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn id(s: &str) -> VertexId {
        VertexId::from(s)
    }

    #[test]
    fn test_change_vertex_moves_and_merges() {
        let mut net = network(false);
        let outcome = net
            .change_vertex(&id("a"), object(json!({"x": 5.0, "size": 9, "tag": "x"})))
            .unwrap();
        let a = net.vertex_index(&id("a")).unwrap();
        assert_eq!(outcome.moved, Some(a));
        assert_eq!(net[a].position.x, 5.0);
        assert_eq!(net[a].props.style.size, Some(9.0));
        assert_eq!(net[a].props.get("weight"), Some(json!(2)));

        let err = net.change_vertex(&id("zz"), Map::new()).unwrap_err();
        assert_eq!(err, EditError::MissingVertex(id("zz")));

        let err = net
            .change_vertex(&id("a"), object(json!({"y": 3.0, "alpha": 7})))
            .unwrap_err();
        assert!(matches!(err, EditError::Property(_)));
        assert_ne!(net[a].position.y, 3.0);
    }

    #[test]
    fn test_change_edge_orientation() {
        let mut net = network(false);
        net.change_edge(&id("b"), &id("a"), object(json!({"width": 4})))
            .unwrap();
        let a = net.vertex_index(&id("a")).unwrap();
        let b = net.vertex_index(&id("b")).unwrap();
        let slot = net.find_edge(a, b).unwrap();
        assert_eq!(net.edge_props(slot).unwrap().style.width, Some(4.0));

        let mut directed = network(true);
        assert_eq!(
            directed.change_edge(&id("b"), &id("a"), Map::new()),
            Err(EditError::MissingEdge(id("b"), id("a")))
        );
        assert!(directed.change_edge(&id("a"), &id("b"), Map::new()).is_ok());
    }

    #[test]
    fn test_change_settings_keeps_direction() {
        let mut net = network(false);
        let props = object(json!({"graph": {"directed": true}}));
        assert_eq!(net.change_settings(&props), Err(EditError::DirectionChange));
        let props = object(json!({"edge": {"alpha": 0.9}}));
        assert_eq!(net.change_settings(&props).unwrap().plan, RedrawPlan::Full);
        assert_eq!(net.settings.edge.alpha, 0.9);
    }

    #[test]
    fn test_delete_and_copy() {
        let mut net = network(false);
        let outcome = net.delete_property(Scope::Vertices, "weight");
        assert_eq!(outcome.sprites.len(), 2);
        assert!(net.vertices().iter().all(|v| !v.props.contains("weight")));

        let outcome = net.copy_property(Scope::Edges, "w", "alpha");
        assert!(matches!(outcome, Err(EditError::Property(_))));
        assert!(net.edges().all(|(_, _, p)| p.style.alpha.is_none()));

        net.copy_property(Scope::Edges, "w", "width").unwrap();
        let widths: Vec<_> = net.edges().map(|(_, _, p)| p.style.width).collect();
        assert!(widths.contains(&Some(1.0)) && widths.contains(&Some(3.0)));

        assert_eq!(
            net.copy_property(Scope::Vertices, "w", "w"),
            Err(EditError::SameProperty)
        );
    }

    #[test]
    fn test_normalize() {
        let mut net = network(false);
        assert_eq!(
            net.normalize_property(Scope::Vertices, "weight", 0.0, 1.0),
            Err(EditError::InvalidRange)
        );
        assert!(matches!(
            net.normalize_property(Scope::Vertices, "weight", 1.0, 2.0),
            Err(EditError::MissingValue { .. })
        ));

        net.normalize_property(Scope::Vertices, "size", 2.0, 4.0).unwrap();
        assert!(net.vertices().iter().all(|v| v.props.style.size == Some(3.0)));

        net.normalize_property(Scope::Edges, "w", 1.0, 2.0).unwrap();
        let mut ws: Vec<f64> = net
            .edges()
            .map(|(_, _, p)| p.get("w").and_then(|v| v.as_f64()).unwrap())
            .collect();
        ws.sort_by(f64::total_cmp);
        assert_eq!(ws, vec![1.0, 2.0]);
    }

    #[test]
    fn test_non_numeric_values_abort() {
        let mut net = network(false);
        net.change_vertex(&id("c"), object(json!({"weight": "heavy"})))
            .unwrap();
        let err = net
            .normalize_property(Scope::Vertices, "weight", 1.0, 2.0)
            .unwrap_err();
        assert_eq!(err.to_string(), "vertex with id c has non-numeric weight");
    }
}
