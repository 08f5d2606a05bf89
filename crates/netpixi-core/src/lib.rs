use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub mod error;
pub mod props;
pub mod settings;
pub mod validate;

pub use error::{EditError, LoadError, PropertyError, SchemaError, ValidationError};
pub use props::{EdgeProps, Props, VertexProps};
pub use settings::{
    EdgeOverride, EdgeStyle, GraphOverride, GraphSettings, Override, Settings, SettingsOverride,
    Style, VertexOverride, VertexStyle, merge,
};
pub use validate::{Category, EPSILON, Rule, compare};

/// Identity of a vertex within one loaded graph.
///
/// Records may name vertices with strings or integers; integers are kept in
/// their decimal form so `5` and `"5"` refer to the same vertex.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub String);

impl VertexId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Accepts a JSON string or an integral JSON number.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self(i.to_string()))
                } else if let Some(u) = n.as_u64() {
                    Some(Self(u.to_string()))
                } else {
                    let f = n.as_f64()?;
                    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.007_199_254_740_992e15 {
                        Some(Self((f as i64).to_string()))
                    } else {
                        None
                    }
                }
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VertexId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for VertexId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for VertexId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vertex_id_from_string_and_integer() {
        assert_eq!(VertexId::from_json(&json!("a")), Some(VertexId::from("a")));
        assert_eq!(VertexId::from_json(&json!(5)), Some(VertexId::from("5")));
        assert_eq!(VertexId::from_json(&json!(-3)), Some(VertexId::from(-3)));
        assert_eq!(VertexId::from_json(&json!(7.0)), Some(VertexId::from("7")));
    }

    #[test]
    fn test_vertex_id_rejects_other_types() {
        assert_eq!(VertexId::from_json(&json!(1.5)), None);
        assert_eq!(VertexId::from_json(&json!(true)), None);
        assert_eq!(VertexId::from_json(&json!(null)), None);
        assert_eq!(VertexId::from_json(&json!({"id": 1})), None);
    }

    #[test]
    fn test_vertex_id_orders_lexically() {
        assert!(VertexId::from("b") > VertexId::from("a"));
        assert!(VertexId::from("10") < VertexId::from("9"));
    }
}
