//! Domain types for "materiales" records.
//!
//! A material is a flat, schemaless record with one identifying field (`id`).
//! The store keeps the record under a document key equal to the string form of
//! that id; everything else is an open map of attributes.

use thiserror::Error;

pub mod id;
pub mod record;

pub use id::MaterialId;
pub use record::{MaterialDraft, MaterialPatch, MaterialRecord};

/// Name of the identifying field inside a stored document.
pub const ID_FIELD: &str = "id";

/// Validation failures for material input, raised before any store call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MaterialError {
    #[error("record is missing the `id` field")]
    MissingId,

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("patch must contain at least one field besides `id`")]
    EmptyPatch,

    #[error("patch cannot change the id (document key is {key}, patch has {got})")]
    IdMismatch { key: String, got: String },

    #[error("field `{0}` holds an integer outside the 64-bit signed range")]
    IntegerOutOfRange(String),
}

pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
