mod common;

use axum::http::{header, StatusCode};
use common::{body_json, body_text, get, spawn_app};

#[tokio::test]
async fn home_lists_active_content_with_metadata() {
    let app = spawn_app().await;
    let resp = get(&app, "/").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("<title>Home - Professional Healthcare Services in Milton, ON | Gardenias Healthcare</title>"));
    assert!(html.contains("Massage Therapy"));
    assert!(html.contains("Jane Doe"));
    assert!(!html.contains("Old Service"));
    assert!(!html.contains("Bob Ray"));
    assert!(!html.contains("Retired"));
    assert!(html.contains(r#"<script type="application/ld+json">{"@context":"https://schema.org","#));
    assert!(html.contains(r#"<meta name="robots" content="index, follow">"#));
}

#[tokio::test]
async fn service_detail_resolves_slug_then_id() {
    let app = spawn_app().await;
    let resp = get(&app, "/services/massage-therapy").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("<title>Massage Therapy | Body Work | Gardenias Healthcare</title>"));
    assert!(html.contains(r#""@type":"Service""#));
    assert!(html.contains(r#""price":"110""#));
    assert!(html.contains(r#""@type":"BreadcrumbList""#));
    assert!(html.contains("60 min - $110"));
    // practitioner card
    assert!(html.contains("Jane Doe"));

    assert_eq!(get(&app, "/services/svc-massage").await.status(), StatusCode::OK);
}

#[tokio::test]
async fn inactive_or_unknown_detail_pages_are_404() {
    let app = spawn_app().await;
    for uri in ["/services/old-service", "/services/nope", "/staff/bob-ray", "/staff/staff-jane"] {
        let resp = get(&app, uri).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let html = body_text(resp).await;
        assert!(html.contains("Page not found"));
        assert!(html.contains(r#"<meta name="robots" content="noindex, follow">"#));
        assert!(html.contains("<title>Gardenias Healthcare - Professional Medical Services</title>"));
    }
}

#[tokio::test]
async fn staff_detail_has_person_schema() {
    let app = spawn_app().await;
    let resp = get(&app, "/staff/jane-doe").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("<title>Jane Doe - Registered Massage Therapist | Gardenias Healthcare</title>"));
    assert!(html.contains(r#""@type":"Person""#));
    assert!(html.contains(r#"<meta name="author" content="Jane Doe">"#));
    assert!(html.contains("Sports injuries"));
    // services offered by this practitioner
    assert!(html.contains("Massage Therapy"));
}

#[tokio::test]
async fn services_page_filters_by_category_slug() {
    let app = spawn_app().await;
    let html = body_text(get(&app, "/services?category=body-work").await).await;
    assert!(html.contains("<title>Body Work Services | Gardenias Healthcare</title>"));
    assert!(html.contains(r#"aria-current="page""#));
    assert!(html.contains("Massage Therapy"));

    let html = body_text(get(&app, "/services?category=unknown").await).await;
    assert!(html.contains("<title>Our Services | Gardenias Healthcare</title>"));
    assert!(!html.contains(r#"aria-current="page""#));
}

#[tokio::test]
async fn sitemap_and_robots() {
    let app = spawn_app().await;
    let resp = get(&app, "/sitemap.xml").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/xml; charset=utf-8");
    let xml = body_text(resp).await;
    assert!(xml.contains("<loc>https://www.gardenias-healthcare.net</loc>"));
    assert!(xml.contains("<loc>https://www.gardenias-healthcare.net/services/massage-therapy</loc>"));
    assert!(xml.contains("<loc>https://www.gardenias-healthcare.net/staff/jane-doe</loc>"));
    assert!(!xml.contains("old-service"));
    assert!(!xml.contains("bob-ray"));

    let robots = body_text(get(&app, "/robots.txt").await).await;
    assert!(robots.starts_with("User-Agent: *\nAllow: /\nDisallow: /admin/\n"));
    assert!(robots.contains("User-Agent: Googlebot"));
    assert!(robots.ends_with("Sitemap: https://www.gardenias-healthcare.net/sitemap.xml\n"));
}

#[tokio::test]
async fn json_endpoints() {
    let app = spawn_app().await;
    let health = body_json(get(&app, "/health").await).await;
    assert_eq!(health["status"], "ok");

    let data = body_json(get(&app, "/api/site-data").await).await;
    assert_eq!(data["categories"].as_array().map(Vec::len), Some(1));
    assert_eq!(data["services"][0]["id"], "svc-massage");
    assert_eq!(data["staff"][0]["slug"], "jane-doe");
    assert_eq!(data["staff"].as_array().map(Vec::len), Some(1));

    let doc = body_json(get(&app, "/api-docs/openapi.json").await).await;
    assert!(doc["paths"]["/admin/login"].is_object());

    let metrics = body_text(get(&app, "/metrics").await).await;
    assert!(metrics.contains("clinic_content_fallbacks_total"));
}

#[tokio::test]
async fn unknown_path_renders_404_page() {
    let app = spawn_app().await;
    let resp = get(&app, "/no/such/page").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("Back to home"));
}
