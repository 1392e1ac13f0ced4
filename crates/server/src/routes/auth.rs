use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::extract::WithRejection;
use service::auth::domain::{AdminSession, LoginInput};
use tracing::warn;

use crate::errors::ApiError;
use crate::state::AppState;

/// Cookie carrying the dashboard session token.
pub const ADMIN_COOKIE: &str = "admin_token";

#[utoipa::path(post, path = "/admin/login", tag = "admin", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in; session cookie set", body = crate::openapi::SessionDoc), (status = 401, description = "Unauthorized")))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(input), _): WithRejection<Json<LoginInput>, ApiError>,
) -> Result<(CookieJar, Json<AdminSession>), ApiError> {
    // argon2 校验耗 CPU，放到阻塞线程池
    let auth = state.auth.clone();
    let session = tokio::task::spawn_blocking(move || auth.login(input))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let mut cookie = Cookie::new(ADMIN_COOKIE, session.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    Ok((jar.add(cookie), Json(session)))
}

#[utoipa::path(post, path = "/admin/logout", tag = "admin", responses((status = 204, description = "Session cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(ADMIN_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

/// 管理端中间件：校验 Authorization: Bearer <token>，缺失时回退读取 admin_token Cookie
/// 缺失或非法 token 一律返回 401；校验通过后将 claims 注入请求扩展
pub async fn require_admin(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();

    let token = match req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(t) => t.trim().to_string(),
            None => {
                warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(ApiError::Unauthorized("expected a Bearer token".into()));
            }
        },
        // Cookie 回退
        None => match jar.get(ADMIN_COOKIE).map(|c| c.value().to_string()) {
            Some(t) if !t.is_empty() => t,
            _ => {
                warn!(path = %path, "missing Authorization header and admin_token cookie");
                return Err(ApiError::Unauthorized("authentication required".into()));
            }
        },
    };

    let claims = state.auth.verify(&token).map_err(|e| {
        warn!(path = %path, error = %e, "admin token rejected");
        ApiError::from(e)
    })?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
