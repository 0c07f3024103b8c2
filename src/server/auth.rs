//! Admin API key check for staff-only routes.
//!
//! The key is accepted as `Authorization: Bearer <key>` or `X-API-Key: <key>`.

use crate::security::{bearer_token, is_authorized};
use crate::server::{ApiError, AppState};
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let from_bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);

    from_bearer.or_else(|| {
        headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    })
}

pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = presented_key(request.headers());

    if !is_authorized(state.admin_api_key.as_deref(), presented) {
        warn!(
            path = %request.uri().path(),
            "Rejected admin request ({})",
            if presented.is_some() { "wrong key" } else { "no key" }
        );
        return ApiError::Unauthorized.into_response();
    }

    next.run(request).await
}
