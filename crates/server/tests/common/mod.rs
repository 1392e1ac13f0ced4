#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use configs::{AdminAccount, AppConfig};
use serde_json::{json, Value};
use service::storage::{Document, DocumentStore, FileDocumentStore};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes;
use server::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@clinic.test";
pub const ADMIN_PASSWORD: &str = "Passw0rd!";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn DocumentStore>,
    pub dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.admin.jwt_secret = "test-secret".into();
    cfg.admin.accounts = vec![AdminAccount {
        email: ADMIN_EMAIL.into(),
        password_hash: service::auth::hash_password(ADMIN_PASSWORD).expect("hash"),
    }];
    cfg
}

async fn put(store: &dyn DocumentStore, collection: &str, id: &str, fields: Value) {
    let Value::Object(map) = fields else { panic!("seed fields must be an object") };
    store.set(collection, Document::new(id, map), false).await.expect("seed");
}

/// No indexes are declared, so every public listing goes through the
/// unfiltered fallback path of the file store.
pub async fn spawn_app() -> TestApp {
    let dir = std::env::temp_dir().join(format!("clinic_server_{}", uuid::Uuid::new_v4()));
    let store: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(dir.clone(), Vec::new()));

    put(&*store, "categories", "cat-body", json!({"name": "Body Work", "shortDescription": "Hands-on therapies", "isActive": true, "displayOrder": 1})).await;
    put(&*store, "categories", "cat-old", json!({"name": "Retired", "isActive": false, "displayOrder": 2})).await;
    put(
        &*store,
        "services",
        "svc-massage",
        json!({
            "name": "Massage Therapy",
            "shortDescription": "Relaxing registered massage",
            "categoryId": "cat-body",
            "isActive": true,
            "displayOrder": 1,
            "practitioners": ["staff-jane"],
            "sessionDurations": [{"duration": 60, "price": 110}],
            "heroImage": "/images/massage.jpg"
        }),
    )
    .await;
    put(&*store, "services", "svc-old", json!({"name": "Old Service", "categoryId": "cat-body", "isActive": false})).await;
    put(
        &*store,
        "staff",
        "staff-jane",
        json!({
            "name": "Jane Doe",
            "title": "Registered Massage Therapist",
            "shortBio": "Sports & prenatal massage",
            "areasOfSpecialization": ["Sports injuries"],
            "isActive": true,
            "order": 1
        }),
    )
    .await;
    put(&*store, "staff", "staff-bob", json!({"name": "Bob Ray", "title": "RMT", "isActive": false, "order": 2})).await;

    let cfg = test_config();
    let state = AppState::new(store.clone(), &cfg);
    let router = routes::build_router(state, CorsLayer::very_permissive(), dir.join("static").to_string_lossy().as_ref());
    TestApp { router, store, dir }
}

pub async fn send(app: &TestApp, req: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(req).await.expect("infallible router")
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    send(app, Request::builder().uri(uri).body(Body::empty()).expect("request")).await
}

pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub async fn login(app: &TestApp) -> String {
    let resp = send(
        app,
        json_request("POST", "/admin/login", None, &json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["token"].as_str().expect("token").to_string()
}
