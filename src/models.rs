//! Wire shapes shared by the intake API, its client and the ticket board.

use crate::wizard::WizardDraft;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TicketStatus {
    Submitted,
    #[serde(rename = "In Progress")]
    InProgress,
    Diagnosed,
    #[serde(rename = "Pending Pickup")]
    PendingPickup,
    Completed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 5] = [
        TicketStatus::Submitted,
        TicketStatus::InProgress,
        TicketStatus::Diagnosed,
        TicketStatus::PendingPickup,
        TicketStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Submitted => "Submitted",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Diagnosed => "Diagnosed",
            TicketStatus::PendingPickup => "Pending Pickup",
            TicketStatus::Completed => "Completed",
        }
    }

    /// Still being worked on, as opposed to waiting for the customer or done.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TicketStatus::Submitted | TicketStatus::InProgress | TicketStatus::Diagnosed
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = anyhow::Error;

    /// Accepts display names in any case, with spaces, dashes or underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|status| normalize(status.as_str()) == wanted)
            .ok_or_else(|| anyhow::anyhow!("Unknown ticket status: '{}'", s))
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };
        f.write_str(name)
    }
}

/// A submitted repair request as stored by the intake service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequest {
    pub id: String,
    #[serde(rename = "ticket_id")]
    pub ticket_id: String,
    #[serde(flatten)]
    pub draft: WizardDraft,
    pub status: TicketStatus,
    pub priority: Priority,
    pub assigned_tech: Option<String>,
    pub estimated_cost: Option<f64>,
    pub actual_cost: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub estimated_completion: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Partial update of a stored request; absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepairRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_tech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<String>,
    pub status: TicketStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub ticket_id: Option<String>,
    #[serde(default)]
    pub data: Option<RepairRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestList {
    pub success: bool,
    pub total: usize,
    pub requests: Vec<RepairRequest>,
}

/// Filters for listing requests. `status` also accepts `all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// Generic `{success, message}` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

impl Ack {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessageCreate {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactAck {
    pub success: bool,
    pub message: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_requests: usize,
    pub status_breakdown: BTreeMap<String, usize>,
    pub today_requests: usize,
    pub week_requests: usize,
    pub total_revenue: f64,
    pub active_requests: usize,
}

/// Board row shown to staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub device: String,
    pub issue: String,
    pub description: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub status: TicketStatus,
    pub priority: Priority,
    #[serde(default)]
    pub assigned_tech: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub estimated_completion: Option<DateTime<Utc>>,
    #[serde(default)]
    pub cost: Option<f64>,
}

impl From<&RepairRequest> for Ticket {
    fn from(request: &RepairRequest) -> Self {
        let draft = &request.draft;
        let device = if draft.device_model.starts_with(&draft.device_brand) {
            draft.device_model.clone()
        } else {
            format!("{} {}", draft.device_brand, draft.device_model)
        };

        Self {
            id: request.ticket_id.clone(),
            device,
            issue: draft.specific_issue.clone(),
            description: draft.description.clone(),
            customer_name: draft.customer_name.clone(),
            customer_email: draft.customer_email.clone(),
            customer_phone: draft.customer_phone.clone(),
            status: request.status,
            priority: request.priority,
            assigned_tech: request.assigned_tech.clone(),
            created_at: request.created_at,
            estimated_completion: request.estimated_completion,
            cost: request.actual_cost.or(request.estimated_cost),
        }
    }
}
