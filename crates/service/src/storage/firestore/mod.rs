//! REST client for the hosted document database.

pub mod codec;

use std::time::Duration;

use async_trait::async_trait;
use configs::FirestoreConfig;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::document::{check_id, Direction, Document, Query};
use super::{DocumentStore, StoreError};

const PAGE_SIZE: usize = 300;

pub struct FirestoreStore {
    client: Client,
    documents_url: String,
    api_key: Option<String>,
    access_token: Option<String>,
}

impl FirestoreStore {
    pub fn new(cfg: &FirestoreConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let documents_url = format!(
            "{}/projects/{}/databases/{}/documents",
            cfg.endpoint.trim_end_matches('/'),
            cfg.project_id,
            cfg.database
        );
        Ok(Self {
            client,
            documents_url,
            api_key: cfg.api_key.clone().filter(|k| !k.is_empty()),
            access_token: cfg.access_token.clone().filter(|t| !t.is_empty()),
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut rb = self.client.request(method, url);
        if let Some(token) = &self.access_token {
            rb = rb.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            rb = rb.query(&[("key", key)]);
        }
        rb
    }

    /// Send and map non-success statuses to `StoreError`.
    async fn send(&self, rb: RequestBuilder) -> Result<Response, StoreError> {
        let resp = rb.send().await.map_err(|e| StoreError::Transport(e.to_string()))?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        let message = body
            .pointer("/error/message")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string();
        let code = body.pointer("/error/status").and_then(Value::as_str).unwrap_or("");
        if code == "FAILED_PRECONDITION" && message.contains("index") {
            return Err(StoreError::IndexMissing(message));
        }
        Err(StoreError::Backend { status: status.as_u16(), message })
    }

    fn doc_url(&self, collection: &str, id: &str) -> Result<String, StoreError> {
        check_id(collection)?;
        check_id(id)?;
        Ok(format!("{}/{}/{}", self.documents_url, collection, id))
    }
}

/// `structuredQuery` body for `documents:runQuery`.
pub fn structured_query(collection: &str, query: &Query) -> Value {
    let mut sq = json!({ "from": [{ "collectionId": collection }] });
    let filters: Vec<Value> = query
        .filters
        .iter()
        .map(|f| {
            json!({ "fieldFilter": {
                "field": { "fieldPath": f.field },
                "op": "EQUAL",
                "value": codec::encode_value(&f.value),
            } })
        })
        .collect();
    match filters.len() {
        0 => {}
        1 => sq["where"] = filters.into_iter().next().unwrap_or(Value::Null),
        _ => sq["where"] = json!({ "compositeFilter": { "op": "AND", "filters": filters } }),
    }
    if !query.order_by.is_empty() {
        let orders: Vec<Value> = query
            .order_by
            .iter()
            .map(|o| {
                let dir = match o.direction {
                    Direction::Ascending => "ASCENDING",
                    Direction::Descending => "DESCENDING",
                };
                json!({ "field": { "fieldPath": o.field }, "direction": dir })
            })
            .collect();
        sq["orderBy"] = Value::Array(orders);
    }
    json!({ "structuredQuery": sq })
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let url = self.doc_url(collection, id)?;
        match self.send(self.request(Method::GET, &url)).await {
            Ok(resp) => {
                let raw: Value = resp.json().await.map_err(|e| StoreError::Codec(e.to_string()))?;
                codec::decode_document(&raw).map(Some)
            }
            Err(StoreError::Backend { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        check_id(collection)?;
        let url = format!("{}/{}", self.documents_url, collection);
        let mut docs = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut rb = self.request(Method::GET, &url).query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                rb = rb.query(&[("pageToken", token)]);
            }
            let page: Value = self
                .send(rb)
                .await?
                .json()
                .await
                .map_err(|e| StoreError::Codec(e.to_string()))?;
            if let Some(items) = page.get("documents").and_then(Value::as_array) {
                for raw in items {
                    docs.push(codec::decode_document(raw)?);
                }
            }
            page_token = page
                .get("nextPageToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                break;
            }
        }
        debug!(collection, count = docs.len(), "listed collection");
        Ok(docs)
    }

    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<Document>, StoreError> {
        check_id(collection)?;
        let url = format!("{}:runQuery", self.documents_url);
        let body = structured_query(collection, query);
        let rows: Value = self
            .send(self.request(Method::POST, &url).json(&body))
            .await
            .inspect_err(|e| warn!(collection, error = %e, "runQuery failed"))?
            .json()
            .await
            .map_err(|e| StoreError::Codec(e.to_string()))?;
        let mut docs = Vec::new();
        for row in rows.as_array().into_iter().flatten() {
            if let Some(raw) = row.get("document") {
                docs.push(codec::decode_document(raw)?);
            }
        }
        Ok(docs)
    }

    async fn set(&self, collection: &str, doc: Document, merge: bool) -> Result<(), StoreError> {
        let url = self.doc_url(collection, &doc.id)?;
        let mut rb = self.request(Method::PATCH, &url);
        if merge {
            let mask: Vec<(&str, &str)> =
                doc.fields.keys().map(|k| ("updateMask.fieldPaths", k.as_str())).collect();
            rb = rb.query(&mask);
        }
        let body = json!({ "fields": codec::encode_fields(&doc.fields) });
        self.send(rb.json(&body)).await?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let url = self.doc_url(collection, id)?;
        let rb = self
            .request(Method::DELETE, &url)
            .query(&[("currentDocument.exists", "true")]);
        match self.send(rb).await {
            Ok(_) => Ok(true),
            Err(StoreError::Backend { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_structured_query() {
        let q = Query::new()
            .where_eq("isActive", true)
            .order_by("displayOrder", Direction::Ascending);
        let body = structured_query("services", &q);
        let sq = &body["structuredQuery"];
        assert_eq!(sq["from"][0]["collectionId"], "services");
        assert_eq!(sq["where"]["fieldFilter"]["field"]["fieldPath"], "isActive");
        assert_eq!(sq["where"]["fieldFilter"]["value"], json!({ "booleanValue": true }));
        assert_eq!(sq["orderBy"][0]["direction"], "ASCENDING");
        assert!(sq.get("limit").is_none());
    }

    #[test]
    fn combines_multiple_filters() {
        let q = Query::new().where_eq("isActive", true).where_eq("categoryId", "c1");
        let body = structured_query("services", &q);
        assert_eq!(body["structuredQuery"]["where"]["compositeFilter"]["op"], "AND");
        assert!(body["structuredQuery"].get("orderBy").is_none());
    }

    #[test]
    fn document_urls_follow_project_layout() {
        let cfg = FirestoreConfig {
            project_id: "clinic".into(),
            endpoint: "http://localhost:8081/v1/".into(),
            ..Default::default()
        };
        let store = FirestoreStore::new(&cfg).unwrap();
        assert_eq!(
            store.doc_url("staff", "abc").unwrap(),
            "http://localhost:8081/v1/projects/clinic/databases/(default)/documents/staff/abc"
        );
        assert!(store.doc_url("staff", "a/b").is_err());
    }
}
