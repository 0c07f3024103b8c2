//! Client for the FixNet intake API.

use crate::config::Config;
use crate::models::{
    Ack, ContactAck, ContactMessage, ContactMessageCreate, DashboardStats, RepairRequest,
    RepairRequestUpdate, RequestList, RequestQuery, StatusUpdateRequest, SubmitResponse,
    TicketStatus,
};
use crate::wizard::{SubmissionRejected, SubmitReceipt, Submitter, WizardDraft};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request to FixNet API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("FixNet API error ({status}): {body}")]
    Status {
        status: u16,
        detail: Option<String>,
        body: String,
    },

    #[error("FixNet API declined the request: {message}")]
    Declined { message: String },
}

impl ClientError {
    /// Reason worth showing to a customer, if the server gave one.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ClientError::Transport(_) => None,
            ClientError::Status { detail, .. } => detail.as_deref(),
            ClientError::Declined { message } => Some(message.as_str()),
        }
    }
}

impl From<ClientError> for SubmissionRejected {
    fn from(err: ClientError) -> Self {
        match err.reason() {
            Some(reason) => SubmissionRejected::new(reason),
            None => SubmissionRejected::without_reason(),
        }
    }
}

/// Pull a readable reason out of an error body.
///
/// Handles `{"detail": "text"}` as well as validation errors shaped
/// `{"detail": [{"msg": "..."}, ...]}`.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct RepairApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RepairApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Client for `FIXNET_API_URL`, authenticated with the admin key if one is set.
    pub fn from_config(config: &Config) -> Result<Self, ClientError> {
        let client = Self::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(match &config.admin_api_key {
            Some(key) => client.with_token(key),
            None => client,
        })
    }

    /// Send `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ==================== Repair requests ====================

    pub async fn create_request(&self, draft: &WizardDraft) -> Result<SubmitResponse, ClientError> {
        let response: SubmitResponse = self.send_json(Method::POST, "/repair-requests/", draft).await?;
        if !response.success {
            return Err(ClientError::Declined {
                message: response.message,
            });
        }
        Ok(response)
    }

    pub async fn list_requests(&self, query: &RequestQuery) -> Result<RequestList, ClientError> {
        let builder = self.request(Method::GET, "/repair-requests/").query(query);
        self.execute(builder).await
    }

    pub async fn get_request(&self, ticket_id: &str) -> Result<RepairRequest, ClientError> {
        let path = format!("/repair-requests/{}", ticket_id);
        self.execute(self.request(Method::GET, &path)).await
    }

    pub async fn update_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
        notes: Option<&str>,
    ) -> Result<Ack, ClientError> {
        let body = StatusUpdateRequest {
            ticket_id: Some(ticket_id.to_string()),
            status,
            notes: notes.map(str::to_string),
        };
        let path = format!("/repair-requests/{}/status", ticket_id);
        self.send_json(Method::PUT, &path, &body).await
    }

    pub async fn update_request(
        &self,
        ticket_id: &str,
        update: &RepairRequestUpdate,
    ) -> Result<Ack, ClientError> {
        let path = format!("/repair-requests/{}", ticket_id);
        self.send_json(Method::PUT, &path, update).await
    }

    pub async fn delete_request(&self, ticket_id: &str) -> Result<Ack, ClientError> {
        let path = format!("/repair-requests/{}", ticket_id);
        self.execute(self.request(Method::DELETE, &path)).await
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ClientError> {
        self.execute(self.request(Method::GET, "/repair-requests/stats/dashboard"))
            .await
    }

    // ==================== Contact messages ====================

    pub async fn send_contact_message(
        &self,
        message: &ContactMessageCreate,
    ) -> Result<ContactAck, ClientError> {
        self.send_json(Method::POST, "/contact/", message).await
    }

    pub async fn list_contact_messages(&self, unread_only: bool) -> Result<Vec<ContactMessage>, ClientError> {
        let builder = self
            .request(Method::GET, "/contact/")
            .query(&[("unread_only", unread_only)]);
        self.execute(builder).await
    }

    pub async fn mark_message_read(&self, id: &str) -> Result<Ack, ClientError> {
        let path = format!("/contact/{}/read", id);
        self.execute(self.request(Method::PUT, &path)).await
    }

    pub async fn delete_contact_message(&self, id: &str) -> Result<Ack, ClientError> {
        let path = format!("/contact/{}", id);
        self.execute(self.request(Method::DELETE, &path)).await
    }

    // ==================== Plumbing ====================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api{}", self.base_url, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(method, path).json(body)).await
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!("FixNet API responded {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

impl Submitter for RepairApiClient {
    async fn submit(&self, draft: &WizardDraft) -> Result<SubmitReceipt, SubmissionRejected> {
        let response = self.create_request(draft).await.map_err(|err| {
            warn!("Repair request submission failed: {}", err);
            SubmissionRejected::from(err)
        })?;

        match response.ticket_id {
            Some(ticket_id) => Ok(SubmitReceipt { ticket_id }),
            None => {
                warn!("FixNet API accepted the request without a ticket ID");
                Err(SubmissionRejected::without_reason())
            }
        }
    }
}
