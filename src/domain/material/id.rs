use super::{json_kind, MaterialError};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Upper bound the document store puts on a document key, in bytes.
const MAX_KEY_BYTES: usize = 1500;

/// Identifier of a material, already in its document-key (string) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MaterialId(String);

impl MaterialId {
    /// Converts the `id` value a caller supplied into a document key.
    ///
    /// Integers become their decimal form; strings are used verbatim and
    /// checked against the store's key rules. Everything else is rejected.
    pub fn from_json(value: &JsonValue) -> Result<Self, MaterialError> {
        match value {
            JsonValue::String(s) => Self::parse(s),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Self(i.to_string()));
                }
                if n.is_u64() {
                    return Err(MaterialError::InvalidId(format!(
                        "{} is outside the 64-bit signed integer range",
                        n
                    )));
                }
                Err(MaterialError::InvalidId(format!(
                    "{} is not an integer",
                    n
                )))
            }
            JsonValue::Null => Err(MaterialError::MissingId),
            other => Err(MaterialError::InvalidId(format!(
                "expected string or integer, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Parses a raw key, e.g. a URL path segment.
    pub fn parse(raw: &str) -> Result<Self, MaterialError> {
        let key = raw;
        if key.is_empty() {
            return Err(MaterialError::InvalidId("id cannot be empty".to_string()));
        }
        // the key is exactly string(id); padded ids would alias a distinct key
        if key.trim() != key {
            return Err(MaterialError::InvalidId(format!(
                "`{}` has leading or trailing whitespace",
                key
            )));
        }
        if key == "." || key == ".." {
            return Err(MaterialError::InvalidId(format!("`{}` is reserved", key)));
        }
        if key.contains('/') {
            return Err(MaterialError::InvalidId(format!(
                "`{}` contains a `/`",
                key
            )));
        }
        if key.len() > MAX_KEY_BYTES {
            return Err(MaterialError::InvalidId(format!(
                "id is longer than {} bytes",
                MAX_KEY_BYTES
            )));
        }
        Ok(Self(key.to_string()))
    }

    /// Wraps a key that came back from the store.
    pub(crate) fn from_key(key: String) -> Self {
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MaterialId {
    type Err = MaterialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for MaterialId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}
