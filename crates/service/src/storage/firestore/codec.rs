//! Typed value wire format of the document database REST API.
//!
//! Every value is wrapped in a single-key object naming its type:
//! `{"stringValue": "x"}`, `{"integerValue": "3"}`, `{"mapValue": {"fields": {..}}}`.

use serde_json::{json, Map, Number, Value};

use crate::storage::{Document, StoreError};

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(0.0) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect()
}

pub fn decode_value(raw: &Value) -> Result<Value, StoreError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| StoreError::Codec(format!("expected typed value, got {raw}")))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| StoreError::Codec("empty typed value".into()))?;
    let value = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or(false)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                Value::Number(n) => n.as_i64(),
                _ => None,
            };
            let i = parsed.ok_or_else(|| StoreError::Codec(format!("bad integerValue {inner}")))?;
            Value::Number(i.into())
        }
        "doubleValue" => {
            let f = match inner {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            f.and_then(Number::from_f64).map(Value::Number).unwrap_or(Value::Null)
        }
        // timestamps arrive as RFC 3339 strings; references as resource names
        "timestampValue" | "stringValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        "arrayValue" => {
            let values = inner.get("values").and_then(Value::as_array);
            let decoded = values
                .map(|vs| vs.iter().map(decode_value).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Value::Array(decoded)
        }
        "mapValue" => {
            let fields = inner.get("fields").and_then(Value::as_object);
            Value::Object(match fields {
                Some(f) => decode_fields(f)?,
                None => Map::new(),
            })
        }
        other => return Err(StoreError::Codec(format!("unknown value type {other}"))),
    };
    Ok(value)
}

pub fn decode_fields(fields: &Map<String, Value>) -> Result<Map<String, Value>, StoreError> {
    fields
        .iter()
        .map(|(k, v)| decode_value(v).map(|d| (k.clone(), d)))
        .collect()
}

/// Decode a REST document resource; the id is the last segment of `name`.
pub fn decode_document(raw: &Value) -> Result<Document, StoreError> {
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Codec("document without name".into()))?;
    let id = name.rsplit('/').next().unwrap_or(name);
    let fields = match raw.get("fields").and_then(Value::as_object) {
        Some(f) => decode_fields(f)?,
        None => Map::new(),
    };
    Ok(Document::new(id, fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rest_document() {
        let raw = json!({
            "name": "projects/p/databases/(default)/documents/services/abc",
            "fields": {
                "name": { "stringValue": "Massage" },
                "displayOrder": { "integerValue": "2" },
                "isActive": { "booleanValue": true },
                "sessionDurations": { "arrayValue": { "values": [
                    { "mapValue": { "fields": {
                        "duration": { "integerValue": "60" },
                        "price": { "doubleValue": 99.5 }
                    } } }
                ] } },
                "galleryImages": { "arrayValue": {} },
                "heroImage": { "nullValue": null }
            }
        });
        let doc = decode_document(&raw).unwrap();
        assert_eq!(doc.id, "abc");
        assert_eq!(doc.field("displayOrder"), Some(&json!(2)));
        assert_eq!(doc.field("sessionDurations"), Some(&json!([{ "duration": 60, "price": 99.5 }])));
        assert_eq!(doc.field("galleryImages"), Some(&json!([])));
        assert_eq!(doc.field("heroImage"), Some(&Value::Null));

        let svc: models::Service = doc.decode().unwrap();
        assert_eq!(svc.session_durations[0].duration, 60);
        assert!(svc.hero_image.is_none());
    }

    #[test]
    fn encodes_integers_as_strings() {
        assert_eq!(encode_value(&json!(7)), json!({ "integerValue": "7" }));
        assert_eq!(encode_value(&json!(1.5)), json!({ "doubleValue": 1.5 }));
        assert_eq!(
            encode_value(&json!({ "a": [true] })),
            json!({ "mapValue": { "fields": { "a": { "arrayValue": { "values": [{ "booleanValue": true }] } } } } })
        );
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(decode_value(&json!({ "weirdValue": 1 })).is_err());
    }
}
