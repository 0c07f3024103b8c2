use crate::models::{
    Ack, DashboardStats, RepairRequest, RepairRequestUpdate, RequestList, RequestQuery,
    StatusUpdateRequest, SubmitResponse, TicketStatus,
};
use crate::server::store::{new_request, page_window, RequestFilter};
use crate::server::{ApiError, ApiResult, AppState};
use crate::wizard::WizardDraft;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use tracing::{info, warn};

pub async fn create_request(
    State(state): State<AppState>,
    Json(draft): Json<WizardDraft>,
) -> ApiResult<Json<SubmitResponse>> {
    if !draft.gdpr_consent {
        return Err(ApiError::Unprocessable("GDPR consent is required".to_string()));
    }

    let request = new_request(draft, Utc::now());
    info!(
        ticket_id = %request.ticket_id,
        priority = %request.priority,
        "Repair request received"
    );
    state.store.insert(request.clone()).await;

    if let Some(notifier) = &state.notifier {
        if let Err(e) = notifier.notify_new_ticket(&request).await {
            warn!("Failed to send Telegram notification: {:#}", e);
        }
    }

    Ok(Json(SubmitResponse {
        success: true,
        message: "Repair request submitted successfully!".to_string(),
        ticket_id: Some(request.ticket_id.clone()),
        data: Some(request),
    }))
}

/// `None` for no filter; `all` and blank mean the same.
fn parse_status(raw: Option<&str>) -> ApiResult<Option<TicketStatus>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s
            .parse::<TicketStatus>()
            .map(Some)
            .map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestQuery>,
) -> ApiResult<Json<RequestList>> {
    let (skip, limit) = page_window(query.page, query.limit);
    let filter = RequestFilter {
        status: parse_status(query.status.as_deref())?,
        search: query.search.filter(|s| !s.trim().is_empty()),
        skip,
        limit,
    };

    let (total, requests) = state.store.list(&filter).await;
    Ok(Json(RequestList {
        success: true,
        total,
        requests,
    }))
}

pub async fn get_request(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<RepairRequest>> {
    state
        .store
        .get(&ticket_id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Repair request not found"))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
    Json(body): Json<StatusUpdateRequest>,
) -> ApiResult<Json<Ack>> {
    let (old, updated) = state
        .store
        .update_status(&ticket_id, body.status, body.notes, Utc::now())
        .await
        .ok_or(ApiError::NotFound("Repair request not found"))?;

    info!(ticket_id = %ticket_id, "Status changed from {} to {}", old, updated.status);

    if let Some(notifier) = &state.notifier {
        if let Err(e) = notifier
            .notify_status_change(&ticket_id, old, updated.status, &updated.draft.customer_name)
            .await
        {
            warn!("Failed to send Telegram notification: {:#}", e);
        }
    }

    Ok(Json(Ack::ok("Status updated successfully")))
}

pub async fn update_request(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
    Json(update): Json<RepairRequestUpdate>,
) -> ApiResult<Json<Ack>> {
    state
        .store
        .update(&ticket_id, update, Utc::now())
        .await
        .ok_or(ApiError::NotFound("Repair request not found"))?;

    Ok(Json(Ack::ok("Repair request updated successfully")))
}

pub async fn delete_request(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> ApiResult<Json<Ack>> {
    if !state.store.delete(&ticket_id).await {
        return Err(ApiError::NotFound("Repair request not found"));
    }
    info!(ticket_id = %ticket_id, "Repair request deleted");
    Ok(Json(Ack::ok("Repair request deleted successfully")))
}

pub async fn dashboard_stats(State(state): State<AppState>) -> Json<DashboardStats> {
    Json(state.store.stats(Utc::now()).await)
}
