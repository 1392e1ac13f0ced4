use std::cmp::Ordering;

use models::Record;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::StoreError;

/// A stored document: its id plus the top-level fields.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self { id: id.into(), fields }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Serialize `value` into a document. A serialized `id` field is dropped,
    /// the id lives beside the fields.
    pub fn from_value<T: Serialize>(id: impl Into<String>, value: &T) -> Result<Self, StoreError> {
        let fields = match serde_json::to_value(value).map_err(|e| StoreError::Codec(e.to_string()))? {
            Value::Object(mut map) => {
                map.remove("id");
                map
            }
            other => return Err(StoreError::Codec(format!("expected an object, got {other}"))),
        };
        Ok(Self::new(id, fields))
    }

    pub fn from_record<T: Record>(record: &T) -> Result<Self, StoreError> {
        Self::from_value(record.id(), record)
    }

    /// Decode the fields into `T`. Nulls are stripped so absent and null
    /// fields both fall back to the type's defaults.
    pub fn decode_as<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut fields = self.fields.clone();
        strip_nulls(&mut fields);
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| StoreError::Codec(format!("document {}: {e}", self.id)))
    }

    /// Decode a record and inject the document id.
    pub fn decode<T: Record>(&self) -> Result<T, StoreError> {
        let mut record: T = self.decode_as()?;
        record.set_id(self.id.clone());
        Ok(record)
    }
}

fn strip_nulls(map: &mut Map<String, Value>) {
    map.retain(|_, v| !v.is_null());
    for value in map.values_mut() {
        match value {
            Value::Object(inner) => strip_nulls(inner),
            Value::Array(items) => {
                items.retain(|v| !v.is_null());
                for item in items.iter_mut() {
                    if let Value::Object(inner) = item {
                        strip_nulls(inner);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Document ids must be usable as a single path segment.
pub fn check_id(id: &str) -> Result<(), StoreError> {
    let valid = !id.is_empty()
        && id.len() <= 128
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Equality filters combined with AND, then ordering.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Query {
    pub filters: Vec<FieldFilter>,
    pub order_by: Vec<OrderBy>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(FieldFilter { field: field.to_string(), value: value.into() });
        self
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        self.order_by.push(OrderBy { field: field.to_string(), direction });
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.filters
            .iter()
            .all(|f| doc.field(&f.field).is_some_and(|v| values_equal(v, &f.value)))
    }

    /// Fields of the composite index this query needs, if any: an equality
    /// filter combined with ordering on some other field.
    pub fn required_index(&self) -> Option<Vec<String>> {
        if self.filters.is_empty() {
            return None;
        }
        let extra_order = self
            .order_by
            .iter()
            .any(|o| !self.filters.iter().any(|f| f.field == o.field));
        if !extra_order {
            return None;
        }
        let mut fields: Vec<String> = Vec::new();
        for name in self
            .filters
            .iter()
            .map(|f| &f.field)
            .chain(self.order_by.iter().map(|o| &o.field))
        {
            if !fields.contains(name) {
                fields.push(name.clone());
            }
        }
        Some(fields)
    }

    /// Evaluate in memory. Documents missing an order field are excluded,
    /// ties fall back to the document id.
    pub fn apply(&self, docs: Vec<Document>) -> Vec<Document> {
        let mut out: Vec<Document> = docs
            .into_iter()
            .filter(|d| self.matches(d))
            .filter(|d| self.order_by.iter().all(|o| d.field(&o.field).is_some_and(|v| !v.is_null())))
            .collect();
        out.sort_by(|a, b| {
            for o in &self.order_by {
                let (Some(x), Some(y)) = (a.field(&o.field), b.field(&o.field)) else { continue };
                let ord = compare_values(x, y);
                let ord = match o.direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.id.cmp(&b.id)
        });
        out
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Cross-type ordering: null < bool < number < string < array < object.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                let ord = compare_values(l, r);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
