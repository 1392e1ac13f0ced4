use std::sync::Arc;

use models::{sort_records, Category, Record, Service, StaffMember, Validate};
use serde_json::{Map, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::observability::ADMIN_WRITES_TOTAL;
use crate::storage::document::check_id;
use crate::storage::{Document, DocumentStore};

/// Create/read/update/delete for categories, services and staff.
///
/// Unlike the public reads every error is returned: the dashboard must know
/// when a write did not happen.
#[derive(Clone)]
pub struct CatalogAdmin {
    store: Arc<dyn DocumentStore>,
}

fn not_found<T: Record>(id: &str) -> ServiceError {
    ServiceError::not_found(&format!("{}/{}", T::COLLECTION, id))
}

impl CatalogAdmin {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Every record, inactive included, in display order.
    pub async fn list<T: Record>(&self) -> Result<Vec<T>, ServiceError> {
        let docs = self.store.list(T::COLLECTION).await?;
        let mut records = docs.iter().map(Document::decode::<T>).collect::<Result<Vec<_>, _>>()?;
        sort_records(&mut records);
        Ok(records)
    }

    pub async fn get<T: Record>(&self, id: &str) -> Result<T, ServiceError> {
        check_id(id).map_err(|_| not_found::<T>(id))?;
        let doc = self.store.get(T::COLLECTION, id).await?.ok_or_else(|| not_found::<T>(id))?;
        Ok(doc.decode()?)
    }

    /// Store a new record under a generated id. Any id in `input` is ignored.
    #[instrument(skip(self, input), fields(collection = T::COLLECTION))]
    pub async fn create<T: Record + Validate>(&self, mut input: T) -> Result<T, ServiceError> {
        input.set_id(Uuid::new_v4().simple().to_string());
        self.write(input).await
    }

    /// Replace an existing record.
    #[instrument(skip(self, input), fields(collection = T::COLLECTION))]
    pub async fn update<T: Record + Validate>(&self, id: &str, mut input: T) -> Result<T, ServiceError> {
        self.get::<T>(id).await?;
        input.set_id(id.to_string());
        self.write(input).await
    }

    /// Flip the public visibility flag without touching other fields.
    pub async fn set_active<T: Record>(&self, id: &str, active: bool) -> Result<T, ServiceError> {
        let mut record = self.get::<T>(id).await?;
        record.set_active(active);
        let mut fields = Map::new();
        fields.insert(T::ACTIVE_FIELD.to_string(), Value::Bool(active));
        self.store.set(T::COLLECTION, Document::new(id, fields), true).await?;
        ADMIN_WRITES_TOTAL.inc();
        info!(event = "catalog_visibility", collection = T::COLLECTION, id, active, "visibility changed");
        Ok(record)
    }

    /// Delete a record. Categories and staff still referenced by services are kept.
    pub async fn delete<T: Record>(&self, id: &str) -> Result<(), ServiceError> {
        check_id(id).map_err(|_| not_found::<T>(id))?;
        let used_by: Option<fn(&Service, &str) -> bool> = if T::COLLECTION == Category::COLLECTION {
            Some(|s: &Service, id: &str| s.category_id == id)
        } else if T::COLLECTION == StaffMember::COLLECTION {
            Some(|s: &Service, id: &str| s.practitioners.iter().any(|p| p == id))
        } else {
            None
        };
        if let Some(uses) = used_by {
            let services: Vec<Service> = self.list().await?;
            let used: Vec<&str> = services
                .iter()
                .filter(|s| uses(s, id))
                .map(|s| s.name.as_str())
                .collect();
            if !used.is_empty() {
                return Err(ServiceError::Validation(format!(
                    "{} `{id}` is still used by: {}",
                    T::COLLECTION,
                    used.join(", ")
                )));
            }
        }
        if !self.store.delete(T::COLLECTION, id).await? {
            return Err(not_found::<T>(id));
        }
        ADMIN_WRITES_TOTAL.inc();
        info!(event = "catalog_delete", collection = T::COLLECTION, id, "record deleted");
        Ok(())
    }

    async fn write<T: Record + Validate>(&self, mut record: T) -> Result<T, ServiceError> {
        record.normalize();
        record.validate().map_err(|e| ServiceError::Validation(e.to_string()))?;
        self.check_references(&record).await?;
        self.check_unique_slug(&record).await?;

        self.store.set(T::COLLECTION, Document::from_record(&record)?, false).await?;
        ADMIN_WRITES_TOTAL.inc();
        info!(event = "catalog_write", collection = T::COLLECTION, id = record.id(), "record saved");
        Ok(record)
    }

    async fn check_references<T: Validate>(&self, record: &T) -> Result<(), ServiceError> {
        for (collection, id) in record.references() {
            let exists = check_id(&id).is_ok() && self.store.get(collection, &id).await?.is_some();
            if !exists {
                return Err(ServiceError::Validation(format!("unknown {collection} reference `{id}`")));
            }
        }
        Ok(())
    }

    /// Public slugs address detail pages, so two records may not share one.
    async fn check_unique_slug<T: Record>(&self, record: &T) -> Result<(), ServiceError> {
        let slug = record.public_slug();
        if slug.is_empty() {
            return Ok(());
        }
        let others: Vec<T> = self.list().await?;
        if let Some(other) = others.iter().find(|o| o.id() != record.id() && o.public_slug() == slug) {
            return Err(ServiceError::Validation(format!(
                "slug `{slug}` is already used by `{}`",
                other.name()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::seeded_store;
    use models::{SessionDuration, StaffMember};

    async fn admin() -> CatalogAdmin {
        CatalogAdmin::new(seeded_store().await)
    }

    fn reflexology() -> Service {
        Service {
            id: "ignored".into(),
            name: "  Reflexology ".into(),
            category_id: "cat-body".into(),
            display_order: 3,
            is_active: true,
            practitioners: vec!["staff-ann".into(), " ".into()],
            session_durations: vec![SessionDuration { duration: 30, price: 60.0 }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn list_includes_inactive_in_order() -> Result<(), anyhow::Error> {
        let staff: Vec<StaffMember> = admin().await.list().await?;
        let ids: Vec<&str> = staff.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["staff-bob", "staff-jane", "staff-ann"]);
        Ok(())
    }

    #[tokio::test]
    async fn create_normalizes_and_assigns_id() -> Result<(), anyhow::Error> {
        let admin = admin().await;
        let created = admin.create(reflexology()).await?;
        assert_ne!(created.id, "ignored");
        assert_eq!(created.name, "Reflexology");
        assert_eq!(created.slug.as_deref(), Some("reflexology"));
        assert_eq!(created.practitioners, vec!["staff-ann".to_string()]);

        let fetched: Service = admin.get(&created.id).await?;
        assert_eq!(fetched, created);
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_unknown_references_and_bad_input() {
        let admin = admin().await;
        let mut svc = reflexology();
        svc.category_id = "nope".into();
        assert!(matches!(admin.create(svc).await, Err(ServiceError::Validation(_))));

        let mut svc = reflexology();
        svc.practitioners = vec!["ghost".into()];
        assert!(matches!(admin.create(svc).await, Err(ServiceError::Validation(_))));

        let mut svc = reflexology();
        svc.name = " ".into();
        assert!(matches!(admin.create(svc).await, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let admin = admin().await;
        let mut svc = reflexology();
        svc.name = "Massage Therapy".into();
        let err = admin.create(svc).await.unwrap_err();
        assert!(err.to_string().contains("massage-therapy"));
    }

    #[tokio::test]
    async fn update_replaces_existing_only() -> Result<(), anyhow::Error> {
        let admin = admin().await;
        let mut jane: StaffMember = admin.get("staff-jane").await?;
        jane.title = "RMT".into();
        jane.areas_of_specialization.clear();
        let saved = admin.update("staff-jane", jane).await?;
        assert_eq!(saved.title, "RMT");
        let reread: StaffMember = admin.get("staff-jane").await?;
        assert!(reread.areas_of_specialization.is_empty());

        let ghost = StaffMember { name: "Ghost".into(), ..Default::default() };
        assert!(matches!(admin.update("missing", ghost).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn toggle_visibility_keeps_other_fields() -> Result<(), anyhow::Error> {
        let admin = admin().await;
        let hidden: Service = admin.set_active("svc-massage", false).await?;
        assert!(!hidden.is_active);
        let reread: Service = admin.get("svc-massage").await?;
        assert!(!reread.is_active);
        assert_eq!(reread.session_durations.len(), 2);
        assert!(admin.set_active::<Service>("missing", true).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn delete_guards_used_categories() -> Result<(), anyhow::Error> {
        let admin = admin().await;
        let err = admin.delete::<Category>("cat-body").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        admin.delete::<Category>("cat-old").await?;
        assert!(matches!(admin.delete::<Category>("cat-old").await, Err(ServiceError::NotFound(_))));
        assert!(matches!(admin.get::<Category>("../x").await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn delete_guards_listed_practitioners() -> Result<(), anyhow::Error> {
        let admin = admin().await;
        let err = admin.delete::<StaffMember>("staff-jane").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("Massage Therapy")));

        // the referencing service stays editable
        let mut massage: Service = admin.get("svc-massage").await?;
        massage.short_description = "Updated".into();
        admin.update("svc-massage", massage).await?;

        admin.delete::<StaffMember>("staff-bob").await?;
        Ok(())
    }

    #[tokio::test]
    async fn list_reads_double_order_fields() -> Result<(), anyhow::Error> {
        let store = seeded_store().await;
        let Value::Object(fields) = serde_json::json!({"name": "Kim Wu", "order": 2.0}) else { unreachable!() };
        store.set("staff", Document::new("staff-kim", fields), false).await?;

        let staff: Vec<StaffMember> = CatalogAdmin::new(store).list().await?;
        let kim = staff.iter().find(|m| m.id == "staff-kim").map(|m| m.order);
        assert_eq!(kim, Some(2));
        Ok(())
    }
}
