use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use service::content::SiteData;
use service::seo::robots::default_rules;
use service::seo::sitemap::{build_sitemap, render_sitemap};

use crate::state::AppState;

pub async fn sitemap(State(state): State<AppState>) -> impl IntoResponse {
    let (services, staff) = tokio::join!(state.content.public_services(), state.content.public_staff());
    let entries = build_sitemap(&state.base_url, &services, &staff, Utc::now());
    ([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], render_sitemap(&entries))
}

pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], default_rules(&state.base_url).render())
}

/// Public listings as JSON, the same data the pages render from.
#[utoipa::path(get, path = "/api/site-data", tag = "public", responses((status = 200, description = "Active categories, services and staff")))]
pub async fn site_data(State(state): State<AppState>) -> Json<SiteData> {
    Json(state.content.site_data().await)
}
