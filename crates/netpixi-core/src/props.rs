use crate::settings::{EdgeOverride, Override, VertexOverride};
use crate::PropertyError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Per-entity properties: typed visual overrides plus opaque data attributes.
///
/// Keys that name a visual field of the category are validated and stored in
/// `style`; any other key rides along in `attributes` and is never drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Props<O> {
    #[serde(flatten)]
    pub style: O,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

pub type VertexProps = Props<VertexOverride>;
pub type EdgeProps = Props<EdgeOverride>;

impl<O: Override + Serialize> Props<O> {
    pub fn from_map(map: Map<String, Value>) -> Result<Self, PropertyError> {
        let mut props = Self::default();
        for (name, value) in map {
            props.set(&name, value)?;
        }
        Ok(props)
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.style
            .value(name)
            .or_else(|| self.attributes.get(name).cloned())
    }

    pub fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        if !self.style.assign(name, &value)? {
            self.attributes.insert(name.to_string(), value);
        }
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let cleared = self.style.clear(name);
        self.attributes.remove(name).is_some() || cleared
    }

    pub fn contains(&self, name: &str) -> bool {
        self.style.value(name).is_some() || self.attributes.contains_key(name)
    }

    /// Union with `other`, whose entries win.
    pub fn absorb(&mut self, other: &Self) {
        self.style.absorb(&other.style);
        for (name, value) in &other.attributes {
            self.attributes.insert(name.clone(), value.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.style.is_empty() && self.attributes.is_empty()
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
