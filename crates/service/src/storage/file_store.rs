use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use configs::IndexSpec;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;

use super::document::{check_id, Document, Query};
use super::json_map_store::JsonMapStore;
use super::{DocumentStore, StoreError};

type Collection = JsonMapStore<String, Map<String, Value>>;

/// One JSON file per collection under `data_dir`, keyed by document id.
///
/// Queries are evaluated in memory but follow the hosted database's rules:
/// an equality filter combined with ordering on another field is refused
/// with `IndexMissing` unless a matching composite index is declared.
pub struct FileDocumentStore {
    data_dir: PathBuf,
    indexes: Vec<IndexSpec>,
    collections: RwLock<HashMap<String, Arc<Collection>>>,
}

impl FileDocumentStore {
    pub fn new<P: Into<PathBuf>>(data_dir: P, indexes: Vec<IndexSpec>) -> Self {
        Self { data_dir: data_dir.into(), indexes, collections: RwLock::new(HashMap::new()) }
    }

    async fn collection(&self, name: &str) -> Result<Arc<Collection>, StoreError> {
        check_id(name)?;
        if let Some(c) = self.collections.read().await.get(name) {
            return Ok(c.clone());
        }
        let mut guard = self.collections.write().await;
        if let Some(c) = guard.get(name) {
            return Ok(c.clone());
        }
        let store = JsonMapStore::new(self.data_dir.join(format!("{name}.json"))).await?;
        debug!(collection = name, "opened collection file");
        guard.insert(name.to_string(), store.clone());
        Ok(store)
    }

    fn has_index(&self, collection: &str, fields: &[String]) -> bool {
        self.indexes
            .iter()
            .any(|ix| ix.collection == collection && ix.fields.as_slice() == fields)
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        check_id(id)?;
        let c = self.collection(collection).await?;
        Ok(c.get(&id.to_string()).await.map(|fields| Document::new(id, fields)))
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let c = self.collection(collection).await?;
        Ok(c.list().await.into_iter().map(|(id, fields)| Document::new(id, fields)).collect())
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        if let Some(fields) = query.required_index() {
            if !self.has_index(collection, &fields) {
                return Err(StoreError::IndexMissing(format!(
                    "collection `{collection}` needs a composite index on ({})",
                    fields.join(", ")
                )));
            }
        }
        let docs = self.list(collection).await?;
        Ok(query.apply(docs))
    }

    async fn set(&self, collection: &str, doc: Document, merge: bool) -> Result<(), StoreError> {
        check_id(&doc.id)?;
        let c = self.collection(collection).await?;
        c.update_map(|m| {
            let entry = m.entry(doc.id).or_default();
            if merge {
                entry.extend(doc.fields);
            } else {
                *entry = doc.fields;
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        check_id(id)?;
        let c = self.collection(collection).await?;
        c.remove(&id.to_string()).await
    }
}
