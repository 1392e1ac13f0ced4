//! Public content reads.
//!
//! Listings never fail: a filtered, ordered query is tried first; when the
//! backend refuses it (typically a missing composite index) the whole
//! collection is read and filtered/sorted in memory; when that fails too the
//! listing is empty. Visitors get a degraded page instead of an error.

use std::sync::Arc;

use models::{sort_records, Category, Record, Service, StaffMember};
use serde::Serialize;
use tracing::{error, instrument, warn};

use crate::observability::{CONTENT_FAILURES_TOTAL, CONTENT_FALLBACKS_TOTAL, CONTENT_READS_TOTAL};
use crate::storage::{Direction, Document, DocumentStore, Query};

/// Everything the public pages render from, fetched in one go.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SiteData {
    pub categories: Vec<Category>,
    pub services: Vec<Service>,
    pub staff: Vec<StaffMember>,
}

impl SiteData {
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

#[derive(Clone)]
pub struct ContentService {
    store: Arc<dyn DocumentStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn public_categories(&self) -> Vec<Category> {
        self.active_listing().await
    }

    pub async fn public_services(&self) -> Vec<Service> {
        self.active_listing().await
    }

    pub async fn public_staff(&self) -> Vec<StaffMember> {
        self.active_listing().await
    }

    /// Active service whose public slug matches; the document id is accepted
    /// too for services whose name yields no slug.
    pub async fn service_by_slug(&self, slug: &str) -> Option<Service> {
        let services = self.public_services().await;
        let by_slug = services.iter().position(|s| s.public_slug() == slug);
        let idx = by_slug.or_else(|| services.iter().position(|s| s.id == slug))?;
        services.into_iter().nth(idx)
    }

    /// Active staff member whose public slug matches. Ids are not accepted.
    pub async fn staff_by_slug(&self, slug: &str) -> Option<StaffMember> {
        if slug.is_empty() {
            return None;
        }
        self.public_staff().await.into_iter().find(|m| m.public_slug() == slug)
    }

    /// Active services listing `staff_id` among their practitioners.
    pub async fn services_by_staff(&self, staff_id: &str) -> Vec<Service> {
        self.public_services()
            .await
            .into_iter()
            .filter(|s| s.offered_by(staff_id))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn site_data(&self) -> SiteData {
        let (categories, services, staff) =
            tokio::join!(self.public_categories(), self.public_services(), self.public_staff());
        SiteData { categories, services, staff }
    }

    async fn active_listing<T: Record>(&self) -> Vec<T> {
        let collection = T::COLLECTION;
        CONTENT_READS_TOTAL.with_label_values(&[collection]).inc();
        let query = Query::new()
            .where_eq(T::ACTIVE_FIELD, true)
            .order_by(T::ORDER_FIELD, Direction::Ascending);

        let docs = match self.store.query(collection, &query).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(collection, error = %e, "filtered query failed; reading whole collection");
                CONTENT_FALLBACKS_TOTAL.with_label_values(&[collection]).inc();
                match self.store.list(collection).await {
                    Ok(docs) => docs,
                    Err(e) => {
                        error!(collection, error = %e, "collection read failed; serving empty listing");
                        CONTENT_FAILURES_TOTAL.with_label_values(&[collection]).inc();
                        return Vec::new();
                    }
                }
            }
        };
        finish(decode_all(collection, docs))
    }
}

fn decode_all<T: Record>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    docs.iter()
        .filter_map(|d| match d.decode::<T>() {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(collection, id = %d.id, error = %e, "skipping undecodable document");
                None
            }
        })
        .collect()
}

/// Keep active records, order them and fill in derived slugs.
fn finish<T: Record>(mut records: Vec<T>) -> Vec<T> {
    records.retain(|r| r.is_active());
    sort_records(&mut records);
    for r in records.iter_mut() {
        let slug = r.public_slug();
        r.set_slug(Some(slug));
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seeded_store, FlakyStore};

    #[tokio::test]
    async fn filtered_failure_falls_back_to_full_read() {
        let inner = seeded_store().await;
        let store = Arc::new(FlakyStore::new(inner).fail_queries());
        let content = ContentService::new(store);

        let staff = content.public_staff().await;
        let names: Vec<&str> = staff.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Jane Doe", "Ann Lee"]);
        assert_eq!(staff[0].slug.as_deref(), Some("jane-doe"));
    }

    #[tokio::test]
    async fn both_reads_failing_yields_empty() {
        let inner = seeded_store().await;
        let store = Arc::new(FlakyStore::new(inner).fail_queries().fail_lists());
        let content = ContentService::new(store);
        assert!(content.public_services().await.is_empty());
        let data = content.site_data().await;
        assert!(data.categories.is_empty() && data.services.is_empty() && data.staff.is_empty());
    }

    #[tokio::test]
    async fn lookups_by_slug() {
        let content = ContentService::new(seeded_store().await);
        let svc = content.service_by_slug("massage-therapy").await.expect("found");
        assert_eq!(svc.id, "svc-massage");
        // inactive services are not reachable
        assert!(content.service_by_slug("old-service").await.is_none());
        // staff only by slug
        assert!(content.staff_by_slug("jane-doe").await.is_some());
        assert!(content.staff_by_slug("staff-jane").await.is_none());
        assert!(content.staff_by_slug("").await.is_none());
    }

    #[tokio::test]
    async fn services_offered_by_practitioner() {
        let content = ContentService::new(seeded_store().await);
        let ids: Vec<String> = content.services_by_staff("staff-jane").await.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["svc-massage"]);
        assert!(content.services_by_staff("nobody").await.is_empty());
    }

    #[tokio::test]
    async fn site_data_is_ordered_and_active_only() {
        let data = ContentService::new(seeded_store().await).site_data().await;
        assert_eq!(data.categories.len(), 1);
        let services: Vec<&str> = data.services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(services, vec!["svc-massage", "svc-acu"]);
        assert_eq!(data.category("cat-body").map(|c| c.name.as_str()), Some("Body Work"));
    }

    #[tokio::test]
    async fn double_order_fields_stay_listed() -> Result<(), anyhow::Error> {
        let store = seeded_store().await;
        let serde_json::Value::Object(fields) = serde_json::json!({"name": "Kim Wu", "isActive": true, "order": 1.0}) else {
            unreachable!()
        };
        store.set("staff", Document::new("staff-kim", fields), false).await?;

        let staff = ContentService::new(store).site_data().await.staff;
        let ids: Vec<&str> = staff.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["staff-jane", "staff-kim", "staff-ann"]);
        Ok(())
    }
}
