use crate::models::{Ack, ContactAck, ContactMessage, ContactMessageCreate};
use crate::server::store::page_window;
use crate::server::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MessageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub unread_only: bool,
}

pub async fn create_message(
    State(state): State<AppState>,
    Json(create): Json<ContactMessageCreate>,
) -> Json<ContactAck> {
    let message = state.store.add_message(create, Utc::now()).await;
    info!(id = %message.id, "Contact message received");

    if let Some(notifier) = &state.notifier {
        if let Err(e) = notifier.notify_contact_message(&message).await {
            warn!("Failed to send Telegram notification: {:#}", e);
        }
    }

    Json(ContactAck {
        success: true,
        message: "Message sent successfully! We'll get back to you within 24 hours.".to_string(),
        id: message.id,
    })
}

pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Json<Vec<ContactMessage>> {
    let (skip, limit) = page_window(query.page, query.limit);
    Json(state.store.messages(query.unread_only, skip, limit).await)
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ack>> {
    if !state.store.mark_read(&id).await {
        return Err(ApiError::NotFound("Message not found"));
    }
    Ok(Json(Ack::ok("Message marked as read")))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Ack>> {
    if !state.store.delete_message(&id).await {
        return Err(ApiError::NotFound("Message not found"));
    }
    Ok(Json(Ack::ok("Message deleted successfully")))
}
