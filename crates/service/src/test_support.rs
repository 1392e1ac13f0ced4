#![cfg(test)]
use std::sync::Arc;

use async_trait::async_trait;
use configs::IndexSpec;
use serde_json::{json, Value};

use crate::storage::{Document, DocumentStore, FileDocumentStore, Query, StoreError};

/// Wraps a store and fails chosen operations, for exercising fallbacks.
pub struct FlakyStore {
    inner: Arc<dyn DocumentStore>,
    fail_queries: bool,
    fail_lists: bool,
}

impl FlakyStore {
    pub fn new(inner: Arc<dyn DocumentStore>) -> Self {
        Self { inner, fail_queries: false, fail_lists: false }
    }

    pub fn fail_queries(mut self) -> Self {
        self.fail_queries = true;
        self
    }

    pub fn fail_lists(mut self) -> Self {
        self.fail_lists = true;
        self
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        if self.fail_lists {
            return Err(StoreError::Transport("connection reset".into()));
        }
        self.inner.get(collection, id).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        if self.fail_lists {
            return Err(StoreError::Transport("connection reset".into()));
        }
        self.inner.list(collection).await
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        if self.fail_queries {
            return Err(StoreError::IndexMissing(format!("{collection} needs an index")));
        }
        self.inner.query(collection, query).await
    }

    async fn set(&self, collection: &str, doc: Document, merge: bool) -> Result<(), StoreError> {
        self.inner.set(collection, doc, merge).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        self.inner.delete(collection, id).await
    }
}

fn index(collection: &str, order: &str) -> IndexSpec {
    IndexSpec { collection: collection.into(), fields: vec!["isActive".into(), order.into()] }
}

async fn put(store: &FileDocumentStore, collection: &str, id: &str, fields: Value) {
    let Value::Object(map) = fields else { panic!("seed fields must be an object") };
    store.set(collection, Document::new(id, map), false).await.expect("seed");
}

/// A file store in a fresh temp dir, with listing indexes declared and a small
/// clinic catalog: one active and one inactive entry per collection at least.
pub async fn seeded_store() -> Arc<dyn DocumentStore> {
    let dir = std::env::temp_dir().join(format!("clinic_seed_{}", uuid::Uuid::new_v4()));
    let store = FileDocumentStore::new(
        dir,
        vec![index("categories", "displayOrder"), index("services", "displayOrder"), index("staff", "order")],
    );

    put(&store, "categories", "cat-body", json!({
        "name": "Body Work", "shortDescription": "Hands-on care", "displayOrder": 1, "isActive": true
    })).await;
    put(&store, "categories", "cat-old", json!({
        "name": "Retired", "displayOrder": 2, "isActive": false
    })).await;

    put(&store, "services", "svc-acu", json!({
        "name": "Acupuncture", "shortDescription": "Needles", "categoryId": "cat-body",
        "displayOrder": 2, "isActive": true, "practitioners": ["staff-ann"],
        "sessionDurations": [{"duration": 45, "price": 95}]
    })).await;
    put(&store, "services", "svc-massage", json!({
        "name": "Massage Therapy", "shortDescription": "Relaxing massage",
        "fullDescription": "Registered massage therapy for pain relief.",
        "categoryId": "cat-body", "displayOrder": 1, "isActive": true,
        "practitioners": ["staff-jane"], "heroImage": "/images/massage.jpg",
        "sessionDurations": [{"duration": 60, "price": 110}, {"duration": 90, "price": 150.5}],
        "keywords": ["RMT Milton"]
    })).await;
    put(&store, "services", "svc-old", json!({
        "name": "Old Service", "categoryId": "cat-body", "displayOrder": 0, "isActive": false
    })).await;

    put(&store, "staff", "staff-jane", json!({
        "name": "Jane Doe", "title": "Registered Massage Therapist", "order": 1, "isActive": true,
        "shortDescription": "Massage therapist", "areasOfSpecialization": ["Sports injuries", "Prenatal care"],
        "picture": "/images/jane.jpg"
    })).await;
    put(&store, "staff", "staff-ann", json!({
        "name": "Ann Lee", "title": "Acupuncturist", "order": 2, "isActive": true
    })).await;
    put(&store, "staff", "staff-bob", json!({
        "name": "Bob Ray", "title": "Chiropractor", "order": 0, "isActive": false
    })).await;

    Arc::new(store)
}
