use std::fmt;

use serde::de::{self, DeserializeOwned, Deserializer, Unexpected, Visitor};
use serde::Serialize;

use crate::slug::generate_slug;

/// A document-backed entity shown on the public site and edited in the
/// dashboard.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection the records live in.
    const COLLECTION: &'static str;
    /// Field public listings are ordered by (ascending).
    const ORDER_FIELD: &'static str;
    /// Boolean field marking a record as publicly visible.
    const ACTIVE_FIELD: &'static str = "isActive";

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn name(&self) -> &str;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    fn sort_order(&self) -> i64;
    fn stored_slug(&self) -> Option<&str>;
    fn set_slug(&mut self, slug: Option<String>);

    /// Stored slug, or one derived from the name when none is stored.
    fn public_slug(&self) -> String {
        match self.stored_slug() {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => generate_slug(self.name()),
        }
    }
}

/// Sort by the declared order field, ties broken by id.
pub fn sort_records<T: Record>(records: &mut [T]) {
    records.sort_by(|a, b| {
        a.sort_order()
            .cmp(&b.sort_order())
            .then_with(|| a.id().cmp(b.id()))
    });
}

/// Order fields accept any JSON number; stored documents may hold doubles
/// (`2.0`). Fractions round to the nearest integer, `null` reads as 0.
pub fn deserialize_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    struct OrderVisitor;

    impl<'de> Visitor<'de> for OrderVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            let rounded = v.round();
            if rounded.is_finite() && rounded.abs() < i64::MAX as f64 {
                Ok(rounded as i64)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }
    }

    deserializer.deserialize_any(OrderVisitor)
}

/// Normalization and validation applied to dashboard writes.
pub trait Validate {
    /// Trim text, normalize the slug, drop empty list entries.
    fn normalize(&mut self);
    fn validate(&self) -> Result<(), crate::errors::ModelError>;

    /// `(collection, id)` pairs this record points at; each must exist.
    fn references(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}
