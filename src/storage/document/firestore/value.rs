//! Conversion between plain JSON and Firestore's typed value encoding.

use crate::storage::document::{Fields, StoreError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map as JsonMap, Value as JsonValue};

pub fn encode_fields(fields: &Fields) -> JsonValue {
    let encoded: JsonMap<String, JsonValue> = fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect();
    JsonValue::Object(encoded)
}

pub fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => {
            // integerValue is an int64 carried as a decimal string; larger
            // unsigned values only fit a double (the material facade rejects them)
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64().unwrap_or_default() })
            }
        }
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            let values: Vec<JsonValue> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        JsonValue::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn decode_fields(fields: &JsonMap<String, JsonValue>) -> Result<Fields, StoreError> {
    fields
        .iter()
        .map(|(k, v)| {
            decode_value(v)
                .map(|decoded| (k.clone(), decoded))
                .map_err(|e| StoreError::Decode(format!("field `{}`: {}", k, e)))
        })
        .collect()
}

pub fn decode_value(value: &JsonValue) -> Result<JsonValue, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("expected a typed value object, got {}", value))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| "empty typed value".to_string())?;

    match kind.as_str() {
        "nullValue" => Ok(JsonValue::Null),
        "booleanValue" => inner
            .as_bool()
            .map(JsonValue::Bool)
            .ok_or_else(|| format!("bad booleanValue: {}", inner)),
        "integerValue" => {
            let parsed = match inner {
                JsonValue::String(s) => s.parse::<i64>().ok(),
                JsonValue::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed
                .map(JsonValue::from)
                .ok_or_else(|| format!("bad integerValue: {}", inner))
        }
        "doubleValue" => match inner {
            JsonValue::Number(_) => Ok(inner.clone()),
            // NaN and the infinities arrive as strings and have no JSON form
            _ => Err(format!("unsupported doubleValue: {}", inner)),
        },
        "timestampValue" => {
            let raw = inner
                .as_str()
                .ok_or_else(|| format!("bad timestampValue: {}", inner))?;
            let ts = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| format!("bad timestampValue {}: {}", raw, e))?;
            Ok(JsonValue::String(
                ts.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::AutoSi, true),
            ))
        }
        "stringValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| JsonValue::String(s.to_string()))
            .ok_or_else(|| format!("bad {}: {}", kind, inner)),
        "geoPointValue" => Ok(json!({
            "latitude": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
            "longitude": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
        })),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(JsonValue::Array(values)) => values,
                Some(other) => return Err(format!("bad arrayValue: {}", other)),
                None => return Ok(JsonValue::Array(Vec::new())),
            };
            values
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array)
        }
        "mapValue" => match inner.get("fields") {
            Some(JsonValue::Object(fields)) => {
                let mut out = JsonMap::with_capacity(fields.len());
                for (k, v) in fields {
                    out.insert(k.clone(), decode_value(v)?);
                }
                Ok(JsonValue::Object(out))
            }
            Some(other) => Err(format!("bad mapValue: {}", other)),
            None => Ok(JsonValue::Object(JsonMap::new())),
        },
        other => Err(format!("unknown value type `{}`", other)),
    }
}

/// Quotes a top-level field name for use in an update mask.
///
/// Simple identifiers pass through; anything else is wrapped in backticks
/// with backticks and backslashes escaped.
pub fn quote_field_path(field: &str) -> String {
    let mut chars = field.chars();
    let simple = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if simple {
        field.to_string()
    } else {
        format!("`{}`", field.replace('\\', "\\\\").replace('`', "\\`"))
    }
}
