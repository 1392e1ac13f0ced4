use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionDoc { pub email: String, pub token: String, pub expires_at: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::seo::site_data,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::admin::list_records,
        crate::routes::admin::get_record,
        crate::routes::admin::create_record,
        crate::routes::admin::update_record,
        crate::routes::admin::set_active,
        crate::routes::admin::delete_record,
        crate::routes::admin::get_seo_settings,
        crate::routes::admin::update_seo_settings,
        crate::routes::admin::seo_keywords,
    ),
    components(schemas(HealthResponse, LoginRequest, SessionDoc, crate::routes::admin::ActiveInput)),
    tags(
        (name = "system", description = "Health"),
        (name = "public", description = "Public site data"),
        (name = "admin", description = "Dashboard API (bearer token or admin_token cookie)")
    )
)]
pub struct ApiDoc;
