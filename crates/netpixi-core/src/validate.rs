//! Property predicates shared by ingestion, settings and editing.

use crate::PropertyError;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// Tolerance for coordinate comparisons.
pub const EPSILON: f64 = 1e-6;

pub const COLOR_MAX: u32 = 0xffffff;

/// Epsilon-tolerant ordering of two coordinates.
pub fn compare(a: f64, b: f64) -> Ordering {
    if (a - b).abs() < EPSILON {
        Ordering::Equal
    } else if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

pub fn is_number(value: f64) -> bool {
    value.is_finite()
}

pub fn is_non_negative(value: f64) -> bool {
    is_number(value) && value >= 0.0
}

pub fn is_positive(value: f64) -> bool {
    is_number(value) && value > 0.0
}

pub fn is_unit(value: f64) -> bool {
    is_non_negative(value) && value <= 1.0
}

pub fn is_color(value: f64) -> bool {
    is_non_negative(value) && value.fract() == 0.0 && value <= COLOR_MAX as f64
}

/// Which record section a property belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Settings,
    Graph,
    Vertex,
    Edge,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Settings => "settings",
            Category::Graph => "graph",
            Category::Vertex => "vertex",
            Category::Edge => "edge",
        };
        write!(f, "{name}")
    }
}

/// Acceptance rule attached to each typed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Boolean,
    Number,
    NonNegative,
    Positive,
    Unit,
    Color,
    Object,
}

impl Rule {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Rule::Boolean => value.is_boolean(),
            Rule::Object => value.is_object(),
            Rule::Number => value.as_f64().is_some_and(is_number),
            Rule::NonNegative => value.as_f64().is_some_and(is_non_negative),
            Rule::Positive => value.as_f64().is_some_and(is_positive),
            Rule::Unit => value.as_f64().is_some_and(is_unit),
            Rule::Color => value.as_f64().is_some_and(is_color),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rule::Boolean => "must be a boolean",
            Rule::Number => "must be a finite number",
            Rule::NonNegative => "must be a non-negative number",
            Rule::Positive => "must be a positive number",
            Rule::Unit => "must be a number in [0, 1]",
            Rule::Color => "must be an integer in [0x000000, 0xffffff]",
            Rule::Object => "must be an object",
        };
        write!(f, "{text}")
    }
}

fn invalid(category: Category, field: &str, rule: Rule) -> PropertyError {
    PropertyError::Invalid {
        category,
        field: field.to_string(),
        rule,
    }
}

pub fn require_number(
    category: Category,
    field: &str,
    value: &Value,
    rule: Rule,
) -> Result<f64, PropertyError> {
    match value.as_f64() {
        Some(number) if rule.accepts(value) => Ok(number),
        _ => Err(invalid(category, field, rule)),
    }
}

pub fn require_boolean(category: Category, field: &str, value: &Value) -> Result<bool, PropertyError> {
    value
        .as_bool()
        .ok_or_else(|| invalid(category, field, Rule::Boolean))
}

pub fn require_color(category: Category, field: &str, value: &Value) -> Result<u32, PropertyError> {
    let number = require_number(category, field, value, Rule::Color)?;
    Ok(number as u32)
}

/// Coordinates may be absent or `null`; anything else must be finite.
pub fn optional_coordinate(
    category: Category,
    field: &str,
    value: Option<Value>,
) -> Result<Option<f64>, PropertyError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(value) => require_number(category, field, &value, Rule::Number).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_compare_uses_epsilon() {
        assert_eq!(compare(1.0, 1.0 + 1e-7), Ordering::Equal);
        assert_eq!(compare(1.0, 1.0 + 1e-5), Ordering::Less);
        assert_eq!(compare(2.0, 1.0), Ordering::Greater);
    }

    #[test]
    fn test_predicates() {
        assert!(is_non_negative(0.0));
        assert!(!is_non_negative(-0.1));
        assert!(!is_positive(0.0));
        assert!(is_unit(1.0));
        assert!(!is_unit(1.01));
        assert!(!is_number(f64::INFINITY));
        assert!(is_color(0.0));
        assert!(is_color(16777215.0));
        assert!(!is_color(16777216.0));
        assert!(!is_color(12.5));
    }

    #[test]
    fn test_rules_on_json_values() {
        assert!(Rule::Boolean.accepts(&json!(false)));
        assert!(!Rule::Boolean.accepts(&json!(0)));
        assert!(Rule::Color.accepts(&json!(0xff00ff)));
        assert!(!Rule::Color.accepts(&json!("0xff00ff")));
        assert!(Rule::Number.accepts(&json!(-4.5)));
        assert!(!Rule::Positive.accepts(&json!(null)));
    }

    #[test]
    fn test_optional_coordinate() {
        assert_eq!(optional_coordinate(Category::Vertex, "x", None), Ok(None));
        assert_eq!(
            optional_coordinate(Category::Vertex, "x", Some(Value::Null)),
            Ok(None)
        );
        assert_eq!(
            optional_coordinate(Category::Vertex, "x", Some(json!(3))),
            Ok(Some(3.0))
        );
        assert!(optional_coordinate(Category::Vertex, "y", Some(json!("3"))).is_err());
    }

    proptest! {
        #[test]
        fn prop_compare_is_antisymmetric(a in -1e6f64..1e6, b in -1e6f64..1e6) {
            prop_assert_eq!(compare(a, b), compare(b, a).reverse());
        }

        #[test]
        fn prop_color_rule_matches_predicate(value in 0u32..0x2000000) {
            prop_assert_eq!(
                Rule::Color.accepts(&json!(value)),
                is_color(value as f64)
            );
        }
    }
}
