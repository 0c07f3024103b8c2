//! In-memory records behind the intake API.

use crate::models::{
    ContactMessage, ContactMessageCreate, DashboardStats, Priority, RepairRequest,
    RepairRequestUpdate, TicketStatus,
};
use crate::wizard::WizardDraft;
use crate::catalog::Urgency;
use chrono::{DateTime, Datelike, Duration, Utc};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: usize = 50;
pub const MAX_PAGE_SIZE: usize = 100;

/// `FN-<year>-<8 uppercase hex digits>`.
pub fn generate_ticket_id(now: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("FN-{}-{}", now.year(), random[..8].to_uppercase())
}

/// Build a stored request from an accepted draft.
pub fn new_request(draft: WizardDraft, now: DateTime<Utc>) -> RepairRequest {
    let (priority, days) = match draft.urgency {
        Urgency::Urgent => (Priority::High, 1),
        Urgency::Normal => (Priority::Medium, 3),
    };

    RepairRequest {
        id: Uuid::new_v4().to_string(),
        ticket_id: generate_ticket_id(now),
        draft,
        status: TicketStatus::Submitted,
        priority,
        assigned_tech: None,
        estimated_cost: None,
        actual_cost: None,
        created_at: now,
        updated_at: now,
        estimated_completion: Some(now + Duration::days(days)),
        completed_at: None,
        notes: None,
    }
}

/// Listing filter after query parsing.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<TicketStatus>,
    pub search: Option<String>,
    /// Matches skipped before the page starts
    pub skip: usize,
    pub limit: usize,
}

impl RequestFilter {
    fn matches(&self, request: &RepairRequest) -> bool {
        if let Some(status) = self.status {
            if request.status != status {
                return false;
            }
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                let draft = &request.draft;
                [
                    draft.customer_name.as_str(),
                    draft.customer_email.as_str(),
                    draft.customer_phone.as_str(),
                    request.ticket_id.as_str(),
                    draft.device_brand.as_str(),
                    draft.device_model.as_str(),
                    draft.specific_issue.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

/// Clamp a 1-based page and a page size to sane bounds, returning the skip count.
pub fn page_window(page: Option<usize>, limit: Option<usize>) -> (usize, usize) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    ((page - 1).saturating_mul(limit), limit)
}

#[derive(Debug, Default)]
pub struct RequestStore {
    requests: RwLock<Vec<RepairRequest>>,
    messages: RwLock<Vec<ContactMessage>>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Repair requests ====================

    pub async fn insert(&self, request: RepairRequest) {
        self.requests.write().await.push(request);
    }

    /// Matching requests, newest first, with the total before paging.
    pub async fn list(&self, filter: &RequestFilter) -> (usize, Vec<RepairRequest>) {
        let requests = self.requests.read().await;
        // Reversed first so equal timestamps still list the later insert first
        let mut matching: Vec<&RepairRequest> =
            requests.iter().rev().filter(|r| filter.matches(r)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len();
        let page = matching
            .into_iter()
            .skip(filter.skip)
            .take(filter.limit)
            .cloned()
            .collect();
        (total, page)
    }

    pub async fn get(&self, ticket_id: &str) -> Option<RepairRequest> {
        self.requests
            .read()
            .await
            .iter()
            .find(|r| r.ticket_id == ticket_id)
            .cloned()
    }

    /// Set the status, returning the previous status and the updated record.
    pub async fn update_status(
        &self,
        ticket_id: &str,
        status: TicketStatus,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Option<(TicketStatus, RepairRequest)> {
        let mut requests = self.requests.write().await;
        let request = requests.iter_mut().find(|r| r.ticket_id == ticket_id)?;

        let old = request.status;
        request.status = status;
        request.updated_at = now;
        if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
            request.notes = Some(notes);
        }
        if status == TicketStatus::Completed {
            request.completed_at = Some(now);
        }
        Some((old, request.clone()))
    }

    pub async fn update(
        &self,
        ticket_id: &str,
        update: RepairRequestUpdate,
        now: DateTime<Utc>,
    ) -> Option<RepairRequest> {
        let mut requests = self.requests.write().await;
        let request = requests.iter_mut().find(|r| r.ticket_id == ticket_id)?;

        if let Some(status) = update.status {
            request.status = status;
            if status == TicketStatus::Completed {
                request.completed_at = Some(now);
            }
        }
        if let Some(priority) = update.priority {
            request.priority = priority;
        }
        if update.assigned_tech.is_some() {
            request.assigned_tech = update.assigned_tech;
        }
        if update.estimated_cost.is_some() {
            request.estimated_cost = update.estimated_cost;
        }
        if update.actual_cost.is_some() {
            request.actual_cost = update.actual_cost;
        }
        if update.estimated_completion.is_some() {
            request.estimated_completion = update.estimated_completion;
        }
        if update.notes.is_some() {
            request.notes = update.notes;
        }
        request.updated_at = now;
        Some(request.clone())
    }

    pub async fn delete(&self, ticket_id: &str) -> bool {
        let mut requests = self.requests.write().await;
        let before = requests.len();
        requests.retain(|r| r.ticket_id != ticket_id);
        requests.len() != before
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> DashboardStats {
        let requests = self.requests.read().await;

        let today_start = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or(now);
        let week_start = today_start - Duration::days(7);

        let mut status_breakdown = BTreeMap::new();
        for request in requests.iter() {
            *status_breakdown
                .entry(request.status.as_str().to_string())
                .or_insert(0) += 1;
        }

        DashboardStats {
            total_requests: requests.len(),
            status_breakdown,
            today_requests: requests.iter().filter(|r| r.created_at >= today_start).count(),
            week_requests: requests.iter().filter(|r| r.created_at >= week_start).count(),
            total_revenue: requests
                .iter()
                .filter(|r| r.status == TicketStatus::Completed)
                .filter_map(|r| r.actual_cost)
                .sum(),
            active_requests: requests.iter().filter(|r| r.status.is_active()).count(),
        }
    }

    // ==================== Contact messages ====================

    pub async fn add_message(&self, create: ContactMessageCreate, now: DateTime<Utc>) -> ContactMessage {
        let message = ContactMessage {
            id: Uuid::new_v4().to_string(),
            name: create.name,
            email: create.email,
            subject: create.subject,
            message: create.message,
            created_at: now,
            is_read: false,
        };
        self.messages.write().await.push(message.clone());
        message
    }

    pub async fn messages(&self, unread_only: bool, skip: usize, limit: usize) -> Vec<ContactMessage> {
        let messages = self.messages.read().await;
        let mut matching: Vec<&ContactMessage> = messages
            .iter()
            .rev()
            .filter(|m| !unread_only || !m.is_read)
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.into_iter().skip(skip).take(limit).cloned().collect()
    }

    pub async fn mark_read(&self, id: &str) -> bool {
        let mut messages = self.messages.write().await;
        match messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.is_read = true;
                true
            }
            None => false,
        }
    }

    pub async fn delete_message(&self, id: &str) -> bool {
        let mut messages = self.messages.write().await;
        let before = messages.len();
        messages.retain(|m| m.id != id);
        messages.len() != before
    }
}
