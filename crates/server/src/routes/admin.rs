//! Dashboard JSON API. Every route here sits behind `auth::require_admin`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use axum_extra::extract::WithRejection;
use models::{Category, Record, SeoSettings, SeoSettingsPatch, Service, StaffMember, Validate};
use serde::Deserialize;
use service::auth::domain::Claims;
use service::seo::keywords::{keyword_overview, KeywordOverview};
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInput {
    pub is_active: bool,
}

/// CRUD routes for one collection, nested under `/admin/{collection}`.
pub fn catalog_routes<T: Record + Validate>() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records::<T>).post(create_record::<T>))
        .route("/:id", get(get_record::<T>).put(update_record::<T>).delete(delete_record::<T>))
        .route("/:id/active", post(set_active::<T>))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/seo-settings", get(get_seo_settings).put(update_seo_settings))
        .route("/admin/seo/keywords", get(seo_keywords))
        .nest("/admin/categories", catalog_routes::<Category>())
        .nest("/admin/services", catalog_routes::<Service>())
        .nest("/admin/staff", catalog_routes::<StaffMember>())
}

#[utoipa::path(
    get, path = "/admin/{collection}", tag = "admin",
    params(("collection" = String, Path, description = "categories, services or staff")),
    responses(
        (status = 200, description = "All records, inactive included, in display order"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_records<T: Record>(State(state): State<AppState>) -> Result<Json<Vec<T>>, ApiError> {
    Ok(Json(state.catalog.list::<T>().await?))
}

#[utoipa::path(
    get, path = "/admin/{collection}/{id}", tag = "admin",
    params(
        ("collection" = String, Path, description = "categories, services or staff"),
        ("id" = String, Path, description = "Document id")
    ),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_record<T: Record>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<T>, ApiError> {
    Ok(Json(state.catalog.get::<T>(&id).await?))
}

#[utoipa::path(
    post, path = "/admin/{collection}", tag = "admin",
    params(("collection" = String, Path, description = "categories, services or staff")),
    request_body = Object,
    responses(
        (status = 201, description = "Created; the body's id is ignored"),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create_record<T: Record + Validate>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(input), _): WithRejection<Json<T>, ApiError>,
) -> Result<(StatusCode, Json<T>), ApiError> {
    let created = state.catalog.create(input).await?;
    info!(actor = %claims.sub, collection = T::COLLECTION, id = %created.id(), "record created");
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/admin/{collection}/{id}", tag = "admin",
    params(
        ("collection" = String, Path, description = "categories, services or staff"),
        ("id" = String, Path, description = "Document id")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_record<T: Record + Validate>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<T>, ApiError>,
) -> Result<Json<T>, ApiError> {
    let updated = state.catalog.update(&id, input).await?;
    info!(actor = %claims.sub, collection = T::COLLECTION, %id, "record updated");
    Ok(Json(updated))
}

#[utoipa::path(
    post, path = "/admin/{collection}/{id}/active", tag = "admin",
    params(
        ("collection" = String, Path, description = "categories, services or staff"),
        ("id" = String, Path, description = "Document id")
    ),
    request_body = ActiveInput,
    responses(
        (status = 200, description = "Visibility changed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_active<T: Record>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<ActiveInput>, ApiError>,
) -> Result<Json<T>, ApiError> {
    let record = state.catalog.set_active::<T>(&id, input.is_active).await?;
    info!(actor = %claims.sub, collection = T::COLLECTION, %id, active = input.is_active, "visibility changed");
    Ok(Json(record))
}

#[utoipa::path(
    delete, path = "/admin/{collection}/{id}", tag = "admin",
    params(
        ("collection" = String, Path, description = "categories, services or staff"),
        ("id" = String, Path, description = "Document id")
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Still referenced"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_record<T: Record>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.catalog.delete::<T>(&id).await?;
    info!(actor = %claims.sub, collection = T::COLLECTION, %id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/admin/seo-settings", tag = "admin", responses((status = 200, description = "Effective settings (stored over site defaults)")))]
pub async fn get_seo_settings(State(state): State<AppState>) -> Json<SeoSettings> {
    Json(state.settings.get().await)
}

#[utoipa::path(
    put, path = "/admin/seo-settings", tag = "admin",
    request_body = Object,
    responses(
        (status = 200, description = "Saved"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Store Error")
    )
)]
pub async fn update_seo_settings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    WithRejection(Json(patch), _): WithRejection<Json<SeoSettingsPatch>, ApiError>,
) -> Result<Json<SeoSettings>, ApiError> {
    let saved = state.settings.update(patch).await?;
    info!(actor = %claims.sub, "seo settings updated");
    Ok(Json(saved))
}

#[utoipa::path(get, path = "/admin/seo/keywords", tag = "admin", responses((status = 200, description = "Keywords per public page")))]
pub async fn seo_keywords(State(state): State<AppState>) -> Result<Json<KeywordOverview>, ApiError> {
    let (categories, services, staff, profile) = tokio::join!(
        state.catalog.list::<Category>(),
        state.catalog.list::<Service>(),
        state.catalog.list::<StaffMember>(),
        state.settings.profile(),
    );
    Ok(Json(keyword_overview(&profile.site, &categories?, &services?, &staff?)))
}
