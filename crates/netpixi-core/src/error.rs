use crate::{Category, Rule, VertexId};
use thiserror::Error;

/// A rejected property value or key.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("{category} has unknown field {field}")]
    UnknownField { category: Category, field: String },
    #[error("{category} field {field} {rule}")]
    Invalid {
        category: Category,
        field: String,
        rule: Rule,
    },
}

/// Record shape problems: the line parsed as JSON but is not a usable record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("record must be an object")]
    NotAnObject,
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("type must be a string")]
    InvalidType,
    #[error("{0} must be an integer or a string")]
    InvalidId(&'static str),
    #[error("props must be an object")]
    InvalidProps,
    #[error("unknown record type {0}")]
    UnknownRecordType(String),
}

/// Graph invariant violations detected while ingesting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("duplicate settings")]
    DuplicateSettings,
    #[error("duplicate vertex with id {0}")]
    DuplicateVertex(VertexId),
    #[error("missing vertex with id {0}")]
    UnknownVertex(VertexId),
    #[error("source and target with same id {0}")]
    SelfLoop(VertexId),
    #[error("duplicate edge with source {0} and target {1}")]
    DuplicateEdge(VertexId, VertexId),
    #[error("existing edge with source {1} and target {0} but graph is not directed")]
    ReversedDuplicateEdge(VertexId, VertexId),
    #[error("missing settings")]
    MissingSettings,
    #[error(transparent)]
    InvalidProperty(#[from] PropertyError),
}

/// Fatal failure of a load. Everything except `Stream` names the offending line.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("line {line}: malformed record: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: {kind}")]
    Schema { line: usize, kind: SchemaError },
    #[error("line {line}: {kind}")]
    Validation { line: usize, kind: ValidationError },
    #[error("stream failure: {0}")]
    Stream(#[from] std::io::Error),
}

impl LoadError {
    pub fn line(&self) -> Option<usize> {
        match self {
            LoadError::Parse { line, .. }
            | LoadError::Schema { line, .. }
            | LoadError::Validation { line, .. } => Some(*line),
            LoadError::Stream(_) => None,
        }
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            LoadError::Validation { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

/// Failures of post-load edits. The graph is left untouched when one is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("malformed record: {0}")]
    Parse(String),
    #[error("missing vertex with id {0}")]
    MissingVertex(VertexId),
    #[error("missing edge with source {0} and target {1}")]
    MissingEdge(VertexId, VertexId),
    #[error("cannot change graph direction")]
    DirectionChange,
    #[error("src and dst must be different")]
    SameProperty,
    #[error("min must be a positive number less than max")]
    InvalidRange,
    #[error("{entity} does not have {property}")]
    MissingValue { entity: String, property: String },
    #[error("{entity} has non-numeric {property}")]
    NonNumeric { entity: String, property: String },
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
