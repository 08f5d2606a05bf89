//! Incremental validation of a record stream into a raw graph.

use crate::graph::VertexIndex;
use crate::record::Record;
use netpixi_core::validate::optional_coordinate;
use netpixi_core::{
    Category, EdgeProps, LoadError, Settings, SettingsOverride, ValidationError, VertexId,
    VertexProps,
};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A vertex as received, before layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingVertex {
    pub id: VertexId,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub degree: usize,
    pub props: VertexProps,
}

/// Running minimum and maximum of the coordinates seen on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Default for Extent {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl Extent {
    pub fn observe(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Width of the range, or `None` when it is empty or degenerate.
    pub fn span(&self) -> Option<f64> {
        let finite = self.min.is_finite() && self.max.is_finite();
        if finite && netpixi_core::compare(self.min, self.max).is_ne() {
            Some(self.max - self.min)
        } else {
            None
        }
    }
}

/// Edges keyed by source, then target.
pub type EdgeTable = BTreeMap<VertexIndex, BTreeMap<VertexIndex, EdgeProps>>;

/// Everything a successful ingest produced.
#[derive(Debug, Clone)]
pub struct RawGraph {
    pub settings: Settings,
    pub vertices: Vec<PendingVertex>,
    pub vertex_map: HashMap<VertexId, VertexIndex>,
    pub edges: EdgeTable,
    pub edge_count: usize,
    pub extent_x: Extent,
    pub extent_y: Extent,
}

/// Validation state carried across lines.
///
/// Once a line fails the context must be discarded; nothing after the failing
/// record is applied.
#[derive(Debug, Default)]
pub struct IngestContext {
    line: usize,
    settings: Option<Settings>,
    vertices: Vec<PendingVertex>,
    vertex_map: HashMap<VertexId, VertexIndex>,
    edges: EdgeTable,
    edge_count: usize,
    extent_x: Extent,
    extent_y: Extent,
}

impl IngestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines consumed so far, blank ones included.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn process_line(&mut self, line: &str) -> Result<(), LoadError> {
        self.line += 1;
        if line.trim().is_empty() {
            return Ok(());
        }
        let record = Record::parse(line).map_err(|e| e.at_line(self.line))?;
        self.process_record(record)
            .map_err(|kind| LoadError::Validation {
                line: self.line,
                kind,
            })
    }

    pub fn process_record(&mut self, record: Record) -> Result<(), ValidationError> {
        match record {
            Record::Settings { props } => self.receive_settings(props),
            Record::Vertex { id, props } => self.receive_vertex(id, props),
            Record::Edge {
                source,
                target,
                props,
            } => self.receive_edge(source, target, props),
        }
    }

    fn receive_settings(&mut self, props: Map<String, Value>) -> Result<(), ValidationError> {
        if self.settings.is_some() {
            return Err(ValidationError::DuplicateSettings);
        }
        let overrides = SettingsOverride::from_props(&props)?;
        self.settings = Some(Settings::resolve(overrides));
        Ok(())
    }

    fn receive_vertex(
        &mut self,
        id: VertexId,
        mut props: Map<String, Value>,
    ) -> Result<(), ValidationError> {
        if self.vertex_map.contains_key(&id) {
            return Err(ValidationError::DuplicateVertex(id));
        }
        let x = optional_coordinate(Category::Vertex, "x", props.remove("x"))?;
        let y = optional_coordinate(Category::Vertex, "y", props.remove("y"))?;
        let props = VertexProps::from_map(props)?;

        if let Some(x) = x {
            self.extent_x.observe(x);
        }
        if let Some(y) = y {
            self.extent_y.observe(y);
        }

        let index = VertexIndex(self.vertices.len());
        self.vertex_map.insert(id.clone(), index);
        self.vertices.push(PendingVertex {
            id,
            x,
            y,
            degree: 0,
            props,
        });
        Ok(())
    }

    fn receive_edge(
        &mut self,
        source: VertexId,
        target: VertexId,
        props: Map<String, Value>,
    ) -> Result<(), ValidationError> {
        let s = *self
            .vertex_map
            .get(&source)
            .ok_or_else(|| ValidationError::UnknownVertex(source.clone()))?;
        let t = *self
            .vertex_map
            .get(&target)
            .ok_or_else(|| ValidationError::UnknownVertex(target.clone()))?;
        if s == t {
            return Err(ValidationError::SelfLoop(source));
        }
        if self.edges.get(&s).is_some_and(|targets| targets.contains_key(&t)) {
            return Err(ValidationError::DuplicateEdge(source, target));
        }
        let settings = self.settings.as_ref().ok_or(ValidationError::MissingSettings)?;
        if !settings.graph.directed
            && self.edges.get(&t).is_some_and(|targets| targets.contains_key(&s))
        {
            return Err(ValidationError::ReversedDuplicateEdge(source, target));
        }
        let props = EdgeProps::from_map(props)?;

        self.edges.entry(s).or_default().insert(t, props);
        self.edge_count += 1;
        self.vertices[s.0].degree += 1;
        self.vertices[t.0].degree += 1;
        Ok(())
    }

    pub fn finish(self) -> RawGraph {
        tracing::info!(
            "Ingested {} vertices and {} edges from {} lines",
            self.vertices.len(),
            self.edge_count,
            self.line
        );
        RawGraph {
            settings: self.settings.unwrap_or_default(),
            vertices: self.vertices,
            vertex_map: self.vertex_map,
            edges: self.edges,
            edge_count: self.edge_count,
            extent_x: self.extent_x,
            extent_y: self.extent_y,
        }
    }
}
