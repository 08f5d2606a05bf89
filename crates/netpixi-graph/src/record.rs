//! One NDJSON line, shaped into a typed record.

use netpixi_core::{EditError, LoadError, SchemaError, VertexId};
use serde_json::{Map, Value};

/// A parsed `settings`, `vertex` or `edge` line. Props are still unvalidated.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Settings {
        props: Map<String, Value>,
    },
    Vertex {
        id: VertexId,
        props: Map<String, Value>,
    },
    Edge {
        source: VertexId,
        target: VertexId,
        props: Map<String, Value>,
    },
}

/// Why a line did not yield a record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    Parse(String),
    Schema(SchemaError),
}

impl RecordError {
    pub fn at_line(self, line: usize) -> LoadError {
        match self {
            RecordError::Parse(message) => LoadError::Parse { line, message },
            RecordError::Schema(kind) => LoadError::Schema { line, kind },
        }
    }
}

impl From<RecordError> for EditError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::Parse(message) => EditError::Parse(message),
            RecordError::Schema(kind) => EditError::Schema(kind),
        }
    }
}

impl From<SchemaError> for RecordError {
    fn from(kind: SchemaError) -> Self {
        RecordError::Schema(kind)
    }
}

impl Record {
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let value: Value =
            serde_json::from_str(line).map_err(|e| RecordError::Parse(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, RecordError> {
        let Value::Object(mut object) = value else {
            return Err(SchemaError::NotAnObject.into());
        };

        let props = match object.remove("props") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(props)) => props,
            Some(_) => return Err(SchemaError::InvalidProps.into()),
        };

        let kind = match object.get("type") {
            None => return Err(SchemaError::MissingField("type").into()),
            Some(Value::String(kind)) => kind.as_str(),
            Some(_) => return Err(SchemaError::InvalidType.into()),
        };

        match kind {
            "settings" => Ok(Record::Settings { props }),
            "vertex" => Ok(Record::Vertex {
                id: id_field(&object, "id")?,
                props,
            }),
            "edge" => Ok(Record::Edge {
                source: id_field(&object, "source")?,
                target: id_field(&object, "target")?,
                props,
            }),
            other => Err(SchemaError::UnknownRecordType(other.to_string()).into()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Record::Settings { .. } => "settings",
            Record::Vertex { .. } => "vertex",
            Record::Edge { .. } => "edge",
        }
    }
}

fn id_field(object: &Map<String, Value>, name: &'static str) -> Result<VertexId, SchemaError> {
    let value = object.get(name).ok_or(SchemaError::MissingField(name))?;
    VertexId::from_json(value).ok_or(SchemaError::InvalidId(name))
}
