//! Typed visual configuration per category and the field-by-field resolver.
//!
//! Overrides are validated once, when they enter through a record or an edit;
//! the resolver and everything downstream trust them.

use crate::validate::{require_boolean, require_color, require_number};
use crate::{Category, EditError, PropertyError, Rule};
use serde::Serialize;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// A partial set of validated field values for one category.
pub trait Override: Default + Clone + PartialEq {
    const CATEGORY: Category;

    /// Validates and stores `value`; returns `Ok(false)` when `name` is not a
    /// field of this category.
    fn assign(&mut self, name: &str, value: &Value) -> Result<bool, PropertyError>;

    fn value(&self, name: &str) -> Option<Value>;

    /// Removes the field; returns whether it was set.
    fn clear(&mut self, name: &str) -> bool;

    /// Copies every field set in `other` over `self`.
    fn absorb(&mut self, other: &Self);

    fn is_empty(&self) -> bool;

    /// Parses an override that may only contain this category's fields.
    fn parse_strict(map: &Map<String, Value>) -> Result<Self, PropertyError> {
        let mut over = Self::default();
        for (name, value) in map {
            if !over.assign(name, value)? {
                return Err(PropertyError::UnknownField {
                    category: Self::CATEGORY,
                    field: name.clone(),
                });
            }
        }
        Ok(over)
    }
}

/// A complete set of values for one category.
pub trait Style: Clone + PartialEq {
    type Override: Override;

    fn overridden(&self, over: &Self::Override) -> Self;

    /// Numeric field lookup, used when rescaling properties.
    fn number(&self, name: &str) -> Option<f64>;
}

/// Resolves `over` on top of `base`.
///
/// Returns `base` itself when no field differs, so callers can detect the
/// "no effective override" case without comparing values again.
pub fn merge<'a, S: Style>(base: &'a S, over: &S::Override) -> Cow<'a, S> {
    if over.is_empty() {
        return Cow::Borrowed(base);
    }
    let merged = base.overridden(over);
    if merged == *base {
        Cow::Borrowed(base)
    } else {
        Cow::Owned(merged)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSettings {
    pub directed: bool,
    pub border_x: f64,
    pub border_y: f64,
    pub color: u32,
    pub alpha: f64,
    /// Alpha factor for edges with exactly one visible endpoint.
    pub edge_fade: f64,
    /// How strongly vertex sizes follow the zoom level.
    pub vertex_scale: f64,
    /// How strongly edge widths follow the zoom level.
    pub edge_scale: f64,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            directed: false,
            border_x: 10.0,
            border_y: 10.0,
            color: 0x000000,
            alpha: 1.0,
            edge_fade: 0.5,
            vertex_scale: 1.0,
            edge_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_fade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_scale: Option<f64>,
}

impl Override for GraphOverride {
    const CATEGORY: Category = Category::Graph;

    fn assign(&mut self, name: &str, value: &Value) -> Result<bool, PropertyError> {
        let c = Self::CATEGORY;
        match name {
            "directed" => self.directed = Some(require_boolean(c, name, value)?),
            "borderX" => self.border_x = Some(require_number(c, name, value, Rule::NonNegative)?),
            "borderY" => self.border_y = Some(require_number(c, name, value, Rule::NonNegative)?),
            "color" => self.color = Some(require_color(c, name, value)?),
            "alpha" => self.alpha = Some(require_number(c, name, value, Rule::Unit)?),
            "edgeFade" => self.edge_fade = Some(require_number(c, name, value, Rule::Unit)?),
            "vertexScale" => {
                self.vertex_scale = Some(require_number(c, name, value, Rule::Positive)?)
            }
            "edgeScale" => self.edge_scale = Some(require_number(c, name, value, Rule::Positive)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn value(&self, name: &str) -> Option<Value> {
        match name {
            "directed" => self.directed.map(Value::from),
            "borderX" => self.border_x.map(Value::from),
            "borderY" => self.border_y.map(Value::from),
            "color" => self.color.map(Value::from),
            "alpha" => self.alpha.map(Value::from),
            "edgeFade" => self.edge_fade.map(Value::from),
            "vertexScale" => self.vertex_scale.map(Value::from),
            "edgeScale" => self.edge_scale.map(Value::from),
            _ => None,
        }
    }

    fn clear(&mut self, name: &str) -> bool {
        match name {
            "directed" => self.directed.take().is_some(),
            "borderX" => self.border_x.take().is_some(),
            "borderY" => self.border_y.take().is_some(),
            "color" => self.color.take().is_some(),
            "alpha" => self.alpha.take().is_some(),
            "edgeFade" => self.edge_fade.take().is_some(),
            "vertexScale" => self.vertex_scale.take().is_some(),
            "edgeScale" => self.edge_scale.take().is_some(),
            _ => false,
        }
    }

    fn absorb(&mut self, other: &Self) {
        self.directed = other.directed.or(self.directed);
        self.border_x = other.border_x.or(self.border_x);
        self.border_y = other.border_y.or(self.border_y);
        self.color = other.color.or(self.color);
        self.alpha = other.alpha.or(self.alpha);
        self.edge_fade = other.edge_fade.or(self.edge_fade);
        self.vertex_scale = other.vertex_scale.or(self.vertex_scale);
        self.edge_scale = other.edge_scale.or(self.edge_scale);
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Style for GraphSettings {
    type Override = GraphOverride;

    fn overridden(&self, over: &GraphOverride) -> Self {
        Self {
            directed: over.directed.unwrap_or(self.directed),
            border_x: over.border_x.unwrap_or(self.border_x),
            border_y: over.border_y.unwrap_or(self.border_y),
            color: over.color.unwrap_or(self.color),
            alpha: over.alpha.unwrap_or(self.alpha),
            edge_fade: over.edge_fade.unwrap_or(self.edge_fade),
            vertex_scale: over.vertex_scale.unwrap_or(self.vertex_scale),
            edge_scale: over.edge_scale.unwrap_or(self.edge_scale),
        }
    }

    fn number(&self, name: &str) -> Option<f64> {
        match name {
            "borderX" => Some(self.border_x),
            "borderY" => Some(self.border_y),
            "color" => Some(self.color as f64),
            "alpha" => Some(self.alpha),
            "edgeFade" => Some(self.edge_fade),
            "vertexScale" => Some(self.vertex_scale),
            "edgeScale" => Some(self.edge_scale),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VertexStyle {
    pub size: f64,
    pub color: u32,
    pub alpha: f64,
}

impl Default for VertexStyle {
    fn default() -> Self {
        Self {
            size: 5.0,
            color: 0xffffff,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VertexOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

impl Override for VertexOverride {
    const CATEGORY: Category = Category::Vertex;

    fn assign(&mut self, name: &str, value: &Value) -> Result<bool, PropertyError> {
        let c = Self::CATEGORY;
        match name {
            "size" => self.size = Some(require_number(c, name, value, Rule::Positive)?),
            "color" => self.color = Some(require_color(c, name, value)?),
            "alpha" => self.alpha = Some(require_number(c, name, value, Rule::Unit)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn value(&self, name: &str) -> Option<Value> {
        match name {
            "size" => self.size.map(Value::from),
            "color" => self.color.map(Value::from),
            "alpha" => self.alpha.map(Value::from),
            _ => None,
        }
    }

    fn clear(&mut self, name: &str) -> bool {
        match name {
            "size" => self.size.take().is_some(),
            "color" => self.color.take().is_some(),
            "alpha" => self.alpha.take().is_some(),
            _ => false,
        }
    }

    fn absorb(&mut self, other: &Self) {
        self.size = other.size.or(self.size);
        self.color = other.color.or(self.color);
        self.alpha = other.alpha.or(self.alpha);
    }

    fn is_empty(&self) -> bool {
        self.size.is_none() && self.color.is_none() && self.alpha.is_none()
    }
}

impl Style for VertexStyle {
    type Override = VertexOverride;

    fn overridden(&self, over: &VertexOverride) -> Self {
        Self {
            size: over.size.unwrap_or(self.size),
            color: over.color.unwrap_or(self.color),
            alpha: over.alpha.unwrap_or(self.alpha),
        }
    }

    fn number(&self, name: &str) -> Option<f64> {
        match name {
            "size" => Some(self.size),
            "color" => Some(self.color as f64),
            "alpha" => Some(self.alpha),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeStyle {
    pub width: f64,
    pub color: u32,
    pub alpha: f64,
    pub curve1: f64,
    pub curve2: f64,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: 0xffffff,
            alpha: 0.5,
            curve1: 1.0,
            curve2: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve2: Option<f64>,
}

impl Override for EdgeOverride {
    const CATEGORY: Category = Category::Edge;

    fn assign(&mut self, name: &str, value: &Value) -> Result<bool, PropertyError> {
        let c = Self::CATEGORY;
        match name {
            "width" => self.width = Some(require_number(c, name, value, Rule::Positive)?),
            "color" => self.color = Some(require_color(c, name, value)?),
            "alpha" => self.alpha = Some(require_number(c, name, value, Rule::Unit)?),
            "curve1" => self.curve1 = Some(require_number(c, name, value, Rule::Number)?),
            "curve2" => self.curve2 = Some(require_number(c, name, value, Rule::Number)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn value(&self, name: &str) -> Option<Value> {
        match name {
            "width" => self.width.map(Value::from),
            "color" => self.color.map(Value::from),
            "alpha" => self.alpha.map(Value::from),
            "curve1" => self.curve1.map(Value::from),
            "curve2" => self.curve2.map(Value::from),
            _ => None,
        }
    }

    fn clear(&mut self, name: &str) -> bool {
        match name {
            "width" => self.width.take().is_some(),
            "color" => self.color.take().is_some(),
            "alpha" => self.alpha.take().is_some(),
            "curve1" => self.curve1.take().is_some(),
            "curve2" => self.curve2.take().is_some(),
            _ => false,
        }
    }

    fn absorb(&mut self, other: &Self) {
        self.width = other.width.or(self.width);
        self.color = other.color.or(self.color);
        self.alpha = other.alpha.or(self.alpha);
        self.curve1 = other.curve1.or(self.curve1);
        self.curve2 = other.curve2.or(self.curve2);
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Style for EdgeStyle {
    type Override = EdgeOverride;

    fn overridden(&self, over: &EdgeOverride) -> Self {
        Self {
            width: over.width.unwrap_or(self.width),
            color: over.color.unwrap_or(self.color),
            alpha: over.alpha.unwrap_or(self.alpha),
            curve1: over.curve1.unwrap_or(self.curve1),
            curve2: over.curve2.unwrap_or(self.curve2),
        }
    }

    fn number(&self, name: &str) -> Option<f64> {
        match name {
            "width" => Some(self.width),
            "color" => Some(self.color as f64),
            "alpha" => Some(self.alpha),
            "curve1" => Some(self.curve1),
            "curve2" => Some(self.curve2),
            _ => None,
        }
    }
}

/// The `props` of a `settings` record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettingsOverride {
    #[serde(skip_serializing_if = "Override::is_empty")]
    pub graph: GraphOverride,
    #[serde(skip_serializing_if = "Override::is_empty")]
    pub vertex: VertexOverride,
    #[serde(skip_serializing_if = "Override::is_empty")]
    pub edge: EdgeOverride,
}

impl SettingsOverride {
    pub fn from_props(props: &Map<String, Value>) -> Result<Self, PropertyError> {
        let mut over = Self::default();
        for (name, value) in props {
            let section = value.as_object().ok_or_else(|| PropertyError::Invalid {
                category: Category::Settings,
                field: name.clone(),
                rule: Rule::Object,
            })?;
            match name.as_str() {
                "graph" => over.graph = GraphOverride::parse_strict(section)?,
                "vertex" => over.vertex = VertexOverride::parse_strict(section)?,
                "edge" => over.edge = EdgeOverride::parse_strict(section)?,
                _ => {
                    return Err(PropertyError::UnknownField {
                        category: Category::Settings,
                        field: name.clone(),
                    });
                }
            }
        }
        Ok(over)
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty() && self.vertex.is_empty() && self.edge.is_empty()
    }

    pub fn absorb(&mut self, other: &Self) {
        self.graph.absorb(&other.graph);
        self.vertex.absorb(&other.vertex);
        self.edge.absorb(&other.edge);
    }

    pub fn to_props(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Effective settings of one loaded graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub graph: GraphSettings,
    pub vertex: VertexStyle,
    pub edge: EdgeStyle,
    overrides: SettingsOverride,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(SettingsOverride::default())
    }
}

impl Settings {
    pub fn resolve(overrides: SettingsOverride) -> Self {
        Self {
            graph: merge(&GraphSettings::default(), &overrides.graph).into_owned(),
            vertex: merge(&VertexStyle::default(), &overrides.vertex).into_owned(),
            edge: merge(&EdgeStyle::default(), &overrides.edge).into_owned(),
            overrides,
        }
    }

    /// The override as received, kept for saving.
    pub fn overrides(&self) -> &SettingsOverride {
        &self.overrides
    }

    /// Overwrites individual fields after load. The graph direction is fixed.
    pub fn apply(&mut self, change: &SettingsOverride) -> Result<(), EditError> {
        if change
            .graph
            .directed
            .is_some_and(|directed| directed != self.graph.directed)
        {
            return Err(EditError::DirectionChange);
        }
        self.graph = self.graph.overridden(&change.graph);
        self.vertex = self.vertex.overridden(&change.vertex);
        self.edge = self.edge.overridden(&change.edge);
        self.overrides.absorb(change);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_merge_returns_base_when_nothing_differs() {
        let base = VertexStyle::default();
        let same = VertexOverride {
            size: Some(5.0),
            ..Default::default()
        };
        assert!(matches!(merge(&base, &same), Cow::Borrowed(_)));
        assert!(matches!(merge(&base, &VertexOverride::default()), Cow::Borrowed(_)));

        let bigger = VertexOverride {
            size: Some(8.0),
            ..Default::default()
        };
        let merged = merge(&base, &bigger);
        assert!(matches!(merged, Cow::Owned(_)));
        assert_eq!(merged.size, 8.0);
        assert_eq!(merged.color, base.color);
        assert_eq!(base.size, 5.0);
    }

    #[test]
    fn test_settings_from_props() {
        let props = object(json!({
            "graph": {"directed": true, "borderX": 0},
            "edge": {"curve1": -2.5, "alpha": 1},
        }));
        let over = SettingsOverride::from_props(&props).unwrap();
        assert_eq!(over.graph.directed, Some(true));
        assert_eq!(over.edge.curve1, Some(-2.5));

        let settings = Settings::resolve(over);
        assert!(settings.graph.directed);
        assert_eq!(settings.graph.border_x, 0.0);
        assert_eq!(settings.graph.border_y, 10.0);
        assert_eq!(settings.edge.alpha, 1.0);
        assert_eq!(settings.vertex, VertexStyle::default());
    }

    #[test]
    fn test_settings_rejects_unknown_and_invalid_fields() {
        let unknown = object(json!({"vertex": {"shape": "square"}}));
        assert_eq!(
            SettingsOverride::from_props(&unknown),
            Err(PropertyError::UnknownField {
                category: Category::Vertex,
                field: "shape".to_string()
            })
        );

        let invalid = object(json!({"vertex": {"color": 0x1000000}}));
        assert!(matches!(
            SettingsOverride::from_props(&invalid),
            Err(PropertyError::Invalid { rule: Rule::Color, .. })
        ));

        let section = object(json!({"layout": {}}));
        assert!(SettingsOverride::from_props(&section).is_err());

        let not_object = object(json!({"graph": 3}));
        assert!(matches!(
            SettingsOverride::from_props(&not_object),
            Err(PropertyError::Invalid { rule: Rule::Object, .. })
        ));
    }

    #[test]
    fn test_settings_overrides_round_trip_to_props() {
        let props = object(json!({"graph": {"borderY": 4.0}, "vertex": {"size": 2.0}}));
        let over = SettingsOverride::from_props(&props).unwrap();
        assert_eq!(over.to_props(), props);
        assert!(SettingsOverride::default().to_props().is_empty());
    }

    #[test]
    fn test_apply_keeps_direction() {
        let mut settings = Settings::default();
        let change = SettingsOverride {
            graph: GraphOverride {
                directed: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(settings.apply(&change), Err(EditError::DirectionChange));

        let change = SettingsOverride {
            edge: EdgeOverride {
                width: Some(3.0),
                ..Default::default()
            },
            ..Default::default()
        };
        settings.apply(&change).unwrap();
        assert_eq!(settings.edge.width, 3.0);
        assert_eq!(settings.overrides().edge.width, Some(3.0));
    }
}
