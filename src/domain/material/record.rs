use super::{json_kind, MaterialError, MaterialId, ID_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

/// A material as read back from the store.
///
/// `id` is always the document key; the remaining stored fields are kept
/// verbatim in `attributes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub id: MaterialId,
    #[serde(flatten)]
    pub attributes: JsonMap<String, JsonValue>,
}

impl MaterialRecord {
    /// Builds a record from a stored document (key + fields).
    pub fn from_document(key: String, mut fields: JsonMap<String, JsonValue>) -> Self {
        fields.remove(ID_FIELD);
        Self {
            id: MaterialId::from_key(key),
            attributes: fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.attributes.get(field)
    }

    pub fn to_json(&self) -> JsonValue {
        let mut out = JsonMap::with_capacity(self.attributes.len() + 1);
        out.insert(ID_FIELD.to_string(), JsonValue::String(self.id.to_string()));
        for (k, v) in &self.attributes {
            out.insert(k.clone(), v.clone());
        }
        JsonValue::Object(out)
    }
}

/// A validated record about to be written with full-replace semantics.
///
/// `body` is the object exactly as the caller supplied it, including the
/// original `id` value, so numeric ids keep sorting numerically.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDraft {
    pub id: MaterialId,
    pub body: JsonMap<String, JsonValue>,
}

impl MaterialDraft {
    pub fn from_json(value: &JsonValue) -> Result<Self, MaterialError> {
        let obj = value
            .as_object()
            .ok_or_else(|| MaterialError::NotAnObject(json_kind(value)))?;
        let raw_id = obj.get(ID_FIELD).ok_or(MaterialError::MissingId)?;
        let id = MaterialId::from_json(raw_id)?;
        check_integer_range(obj)?;
        Ok(Self {
            id,
            body: obj.clone(),
        })
    }

    /// The record a subsequent read of this draft returns.
    pub fn to_record(&self) -> MaterialRecord {
        MaterialRecord::from_document(self.id.to_string(), self.body.clone())
    }
}

/// Top-level fields to merge into an existing material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialPatch {
    pub fields: JsonMap<String, JsonValue>,
}

impl MaterialPatch {
    /// Validates a partial record against the key it will be merged into.
    ///
    /// An `id` in the patch is accepted only if it names the same key, and is
    /// dropped so the stored id keeps its original type.
    pub fn from_json(key: &MaterialId, value: &JsonValue) -> Result<Self, MaterialError> {
        let obj = value
            .as_object()
            .ok_or_else(|| MaterialError::NotAnObject(json_kind(value)))?;
        let mut fields = obj.clone();
        if let Some(raw_id) = fields.remove(ID_FIELD) {
            let patched = MaterialId::from_json(&raw_id)?;
            if &patched != key {
                return Err(MaterialError::IdMismatch {
                    key: key.to_string(),
                    got: patched.to_string(),
                });
            }
        }
        if fields.is_empty() {
            return Err(MaterialError::EmptyPatch);
        }
        check_integer_range(&fields)?;
        Ok(Self { fields })
    }
}

/// Rejects unsigned integers above `i64::MAX` anywhere in `fields`; stores
/// with a signed 64-bit integer type would read them back as floats.
fn check_integer_range(fields: &JsonMap<String, JsonValue>) -> Result<(), MaterialError> {
    fn out_of_range(value: &JsonValue) -> bool {
        match value {
            JsonValue::Number(n) => n.is_u64() && n.as_i64().is_none(),
            JsonValue::Array(items) => items.iter().any(out_of_range),
            JsonValue::Object(map) => map.values().any(out_of_range),
            _ => false,
        }
    }
    match fields.iter().find(|(_, v)| out_of_range(v)) {
        Some((field, _)) => Err(MaterialError::IntegerOutOfRange(field.clone())),
        None => Ok(()),
    }
}
