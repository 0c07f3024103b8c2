//! FixNet intake API.
//!
//! Public routes accept repair requests and contact messages; staff routes
//! sit behind the admin API key. Records live in memory for the life of the
//! process.

mod auth;
mod contact;
mod error;
mod repairs;
pub mod store;

pub use error::{ApiError, ApiResult};
pub use store::RequestStore;

use crate::config::Config;
use crate::telegram::TelegramNotifier;
use auth::admin_auth_middleware;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RequestStore>,
    /// Staff notifications; `None` when Telegram is not configured
    pub notifier: Option<TelegramNotifier>,
    /// Admin routes reject every request while this is `None`
    pub admin_api_key: Option<String>,
}

impl AppState {
    pub fn new(notifier: Option<TelegramNotifier>, admin_api_key: Option<String>) -> Self {
        Self {
            store: Arc::new(RequestStore::new()),
            notifier,
            admin_api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            TelegramNotifier::from_config(config),
            config.admin_api_key.clone(),
        )
    }
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Welcome to FixNet API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "fixnet",
    }))
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Customer-facing, no auth
    let public = Router::new()
        .route("/api/", get(root))
        .route("/api/health", get(health_check))
        .route("/api/repair-requests/", post(repairs::create_request))
        .route("/api/contact/", post(contact::create_message));

    // Staff dashboard (admin API key)
    let admin = Router::new()
        .route("/api/repair-requests/", get(repairs::list_requests))
        .route(
            "/api/repair-requests/stats/dashboard",
            get(repairs::dashboard_stats),
        )
        .route(
            "/api/repair-requests/:ticket_id",
            get(repairs::get_request)
                .put(repairs::update_request)
                .delete(repairs::delete_request),
        )
        .route(
            "/api/repair-requests/:ticket_id/status",
            put(repairs::update_status),
        )
        .route("/api/contact/", get(contact::list_messages))
        .route("/api/contact/:id/read", put(contact::mark_read))
        .route("/api/contact/:id", axum::routing::delete(contact::delete_message))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(admin)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
