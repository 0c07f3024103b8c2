//! Staff ticket board.
//!
//! Shows the sample tickets every installation ships with alongside tickets
//! recorded locally, which persist under [`TICKETS_KEY`].

use crate::models::{Priority, Ticket, TicketStatus};
use crate::storage::{KeyValueStore, TICKETS_KEY};
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, warn};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    device: &str,
    issue: &str,
    description: &str,
    customer: (&str, &str, &str),
    status: TicketStatus,
    priority: Priority,
    tech: &str,
    created_at: DateTime<Utc>,
    estimated_completion: DateTime<Utc>,
    cost: f64,
) -> Ticket {
    Ticket {
        id: id.to_string(),
        device: device.to_string(),
        issue: issue.to_string(),
        description: description.to_string(),
        customer_name: customer.0.to_string(),
        customer_email: customer.1.to_string(),
        customer_phone: customer.2.to_string(),
        status,
        priority,
        assigned_tech: Some(tech.to_string()),
        created_at,
        estimated_completion: Some(estimated_completion),
        cost: Some(cost),
    }
}

/// Sample tickets shown on every board.
pub fn seed_tickets() -> Vec<Ticket> {
    vec![
        seed(
            "FN-2025-001",
            "iPhone 15 Pro",
            "Screen Cracked",
            "Screen cracked after dropping from table height",
            ("Sarah Johnson", "sarah.j@email.com", "+1-555-0123"),
            TicketStatus::InProgress,
            Priority::High,
            "Mike Chen",
            at(2025, 1, 15, 10, 30),
            at(2025, 1, 16, 14, 0),
            299.0,
        ),
        seed(
            "FN-2025-002",
            "Samsung Galaxy S24",
            "Battery Issues",
            "Battery drains very quickly, phone gets hot during charging",
            ("Alex Rodriguez", "alex.r@email.com", "+1-555-0124"),
            TicketStatus::Diagnosed,
            Priority::Medium,
            "Lisa Wang",
            at(2025, 1, 15, 14, 20),
            at(2025, 1, 17, 10, 0),
            149.0,
        ),
        seed(
            "FN-2025-003",
            "Google Pixel 8",
            "Water Damage",
            "Phone fell in water, screen flickering and speakers not working",
            ("Jordan Kim", "jordan.k@email.com", "+1-555-0125"),
            TicketStatus::PendingPickup,
            Priority::High,
            "David Park",
            at(2025, 1, 16, 9, 15),
            at(2025, 1, 18, 16, 0),
            399.0,
        ),
    ]
}

/// Headline counts for the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub total: usize,
    /// Tickets still in `Submitted`
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
}

pub struct TicketBoard<S: KeyValueStore> {
    store: S,
    seeds: Vec<Ticket>,
    recorded: Vec<Ticket>,
}

impl<S: KeyValueStore> TicketBoard<S> {
    /// Seed tickets plus whatever `store` holds. An unreadable list is
    /// logged and treated as empty.
    pub fn load(store: S) -> Self {
        let recorded = match store.get(TICKETS_KEY) {
            Some(raw) => serde_json::from_str::<Vec<Ticket>>(&raw).unwrap_or_else(|e| {
                warn!("Ignoring unreadable ticket list: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        debug!("Loaded {} recorded tickets", recorded.len());

        Self {
            store,
            seeds: seed_tickets(),
            recorded,
        }
    }

    /// Every ticket, seeds first, in insertion order.
    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.seeds.iter().chain(self.recorded.iter())
    }

    pub fn get(&self, id: &str) -> Option<&Ticket> {
        self.tickets().find(|t| t.id == id)
    }

    /// Tickets whose customer name, ID or device contains `search`
    /// (case-insensitive), limited to `status` when given.
    pub fn filtered(&self, search: &str, status: Option<TicketStatus>) -> Vec<&Ticket> {
        let needle = search.trim().to_lowercase();
        self.tickets()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .filter(|t| {
                needle.is_empty()
                    || t.customer_name.to_lowercase().contains(&needle)
                    || t.id.to_lowercase().contains(&needle)
                    || t.device.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Change a ticket's status. Returns `false` for an unknown ID.
    pub fn update_status(&mut self, id: &str, status: TicketStatus) -> bool {
        if let Some(ticket) = self.seeds.iter_mut().find(|t| t.id == id) {
            ticket.status = status;
            return true;
        }

        match self.recorded.iter_mut().find(|t| t.id == id) {
            Some(ticket) => {
                ticket.status = status;
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Add a ticket, replacing any recorded ticket with the same ID.
    pub fn record(&mut self, ticket: Ticket) {
        self.recorded.retain(|t| t.id != ticket.id);
        self.recorded.push(ticket);
        self.persist();
    }

    pub fn stats(&self) -> BoardStats {
        let count = |status: TicketStatus| self.tickets().filter(|t| t.status == status).count();
        BoardStats {
            total: self.tickets().count(),
            pending: count(TicketStatus::Submitted),
            in_progress: count(TicketStatus::InProgress),
            completed: count(TicketStatus::Completed),
        }
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.recorded)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.set(TICKETS_KEY, &json));
        if let Err(e) = result {
            warn!("Failed to persist ticket list: {:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn local_ticket(id: &str, name: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            device: "OnePlus 12".to_string(),
            issue: "Won't Charge".to_string(),
            description: String::new(),
            customer_name: name.to_string(),
            customer_email: "casey@email.com".to_string(),
            customer_phone: "+1-555-0199".to_string(),
            status: TicketStatus::Submitted,
            priority: Priority::Medium,
            assigned_tech: None,
            created_at: Utc::now(),
            estimated_completion: None,
            cost: None,
        }
    }

    // ==================== load Tests ====================

    #[test]
    fn test_empty_store_shows_seeds() {
        let board = TicketBoard::load(MemoryStore::new());
        let ids: Vec<_> = board.tickets().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["FN-2025-001", "FN-2025-002", "FN-2025-003"]);
    }

    #[test]
    fn test_corrupt_ticket_list_ignored() {
        let store = MemoryStore::new();
        store.set(TICKETS_KEY, "{not json").unwrap();
        let board = TicketBoard::load(store);
        assert_eq!(board.tickets().count(), 3);
    }

    #[test]
    fn test_recorded_tickets_survive_reload() {
        let store = MemoryStore::new();
        let mut board = TicketBoard::load(store.clone());
        board.record(local_ticket("FN-2025-ABCD1234", "Casey Lee"));

        let reloaded = TicketBoard::load(store);
        assert!(reloaded.get("FN-2025-ABCD1234").is_some());
        assert_eq!(reloaded.tickets().count(), 4);
    }

    // ==================== filtered Tests ====================

    #[test]
    fn test_filter_by_search() {
        let board = TicketBoard::load(MemoryStore::new());
        let found = board.filtered("PIXEL", None);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "FN-2025-003");

        assert_eq!(board.filtered("sarah", None).len(), 1);
        assert_eq!(board.filtered("fn-2025", None).len(), 3);
    }

    #[test]
    fn test_filter_by_status() {
        let board = TicketBoard::load(MemoryStore::new());
        let found = board.filtered("", Some(TicketStatus::Diagnosed));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].customer_name, "Alex Rodriguez");
        assert!(board.filtered("", Some(TicketStatus::Completed)).is_empty());
    }

    #[test]
    fn test_filter_search_and_status_combined() {
        let board = TicketBoard::load(MemoryStore::new());
        assert!(board.filtered("sarah", Some(TicketStatus::Diagnosed)).is_empty());
    }

    // ==================== update_status Tests ====================

    #[test]
    fn test_seed_status_change_not_persisted() {
        let store = MemoryStore::new();
        let mut board = TicketBoard::load(store.clone());
        assert!(board.update_status("FN-2025-001", TicketStatus::Completed));
        assert_eq!(board.get("FN-2025-001").unwrap().status, TicketStatus::Completed);

        assert!(store.get(TICKETS_KEY).is_none());
        let reloaded = TicketBoard::load(store);
        assert_eq!(reloaded.get("FN-2025-001").unwrap().status, TicketStatus::InProgress);
    }

    #[test]
    fn test_recorded_status_change_persisted() {
        let store = MemoryStore::new();
        let mut board = TicketBoard::load(store.clone());
        board.record(local_ticket("FN-2025-ABCD1234", "Casey Lee"));
        assert!(board.update_status("FN-2025-ABCD1234", TicketStatus::InProgress));

        let reloaded = TicketBoard::load(store);
        assert_eq!(
            reloaded.get("FN-2025-ABCD1234").unwrap().status,
            TicketStatus::InProgress
        );
    }

    #[test]
    fn test_update_unknown_ticket() {
        let mut board = TicketBoard::load(MemoryStore::new());
        assert!(!board.update_status("FN-1999-000", TicketStatus::Completed));
    }

    // ==================== stats Tests ====================

    #[test]
    fn test_stats() {
        let mut board = TicketBoard::load(MemoryStore::new());
        board.record(local_ticket("FN-2025-ABCD1234", "Casey Lee"));

        assert_eq!(
            board.stats(),
            BoardStats {
                total: 4,
                pending: 1,
                in_progress: 1,
                completed: 0,
            }
        );
    }
}
