//! Repair tickets.
//!
//! A ticket moves `open → in_progress → completed`; `cancelled` exists as a
//! terminal display state with no transition into it. Only the single
//! next-state transition is ever offered, and a completed ticket is
//! immutable: items, service charge and status controls are all gated by the
//! same predicate.

use serde::{Deserialize, Serialize};

use super::user::User;
use crate::api::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Completed,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Completed => "completed",
            TicketStatus::Cancelled => "cancelled",
        }
    }

    /// The single transition offered from this state, if any.
    pub fn next(&self) -> Option<TicketStatus> {
        match self {
            TicketStatus::Open => Some(TicketStatus::InProgress),
            TicketStatus::InProgress => Some(TicketStatus::Completed),
            TicketStatus::Completed | TicketStatus::Cancelled => None,
        }
    }

    /// Items, service charge and status may only change before completion.
    pub fn is_modifiable(&self) -> bool {
        !matches!(self, TicketStatus::Completed | TicketStatus::Cancelled)
    }
}

impl std::str::FromStr for TicketStatus {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TicketStatus::Open),
            "in_progress" => Ok(TicketStatus::InProgress),
            "completed" => Ok(TicketStatus::Completed),
            "cancelled" => Ok(TicketStatus::Cancelled),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Cash,
    Credit,
    Account,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
    pub device_category: String,
    pub device_model: String,
    pub imei: Option<String>,
    pub issue: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub payment_type: Option<PaymentType>,
    pub service_charge: Option<f64>,
    #[serde(default)]
    pub repaired_by: Option<User>,
    #[serde(default)]
    pub user: Option<User>,
    pub created_at: Option<String>,
}

/// Grade of a spare part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartGrade {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub id: i64,
    pub part_name: String,
    pub part_image: Option<String>,
    pub quantity: i64,
    pub unit_price: f64,
    pub selling_price: f64,
    pub device_category: String,
    pub grade: PartGrade,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repair {
    pub id: i64,
    pub repair_name: String,
    pub device_category: String,
    pub cost: f64,
    pub description: Option<String>,
}

/// Kind of item billed against a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketItemKind {
    Part,
    Repair,
}

/// A part or repair attached to a ticket. Quantity applies to parts only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketItem {
    pub id: i64,
    pub ticket_id: i64,
    #[serde(rename = "type")]
    pub kind: TicketItemKind,
    pub quantity: Option<i64>,
    #[serde(default)]
    pub part: Option<Part>,
    #[serde(default)]
    pub repair: Option<Repair>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTicketPayload {
    pub first_name: String,
    pub last_name: String,
    pub contact_number: String,
    pub device_category: String,
    pub device_model: String,
    pub imei: Option<String>,
    pub issue: String,
    pub priority: TicketPriority,
}

/// Auxiliary input gathered by the completion modal before the
/// `in_progress → completed` transition commits.
#[derive(Debug, Clone, Deserialize)]
pub struct CompleteRepairPayload {
    pub imei: String,
    pub payment_type: PaymentType,
}

/// Limited view served by the public (unauthenticated) ticket tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedTicket {
    pub id: i64,
    pub status: TicketStatus,
    pub device_model: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePartPayload {
    pub part_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub selling_price: f64,
    pub device_category: String,
    pub grade: PartGrade,
    pub description: Option<String>,
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRepairPayload {
    pub repair_name: String,
    pub device_category: String,
    pub cost: f64,
    pub description: Option<String>,
}

/// Infinite-scroll listing state: page-based pagination combined with a
/// status filter and a search that replaces the list wholesale and disables
/// pagination. Search responses are sequence-guarded so a stale response is
/// never applied over a newer one.
#[derive(Debug, Default)]
pub struct TicketFeed {
    pub tickets: Vec<Ticket>,
    pub page: u32,
    pub has_more: bool,
    pub status_filter: Option<TicketStatus>,
    pub search: Option<String>,
    latest_request: u64,
}

impl TicketFeed {
    /// Reset the feed for a fresh (re)load, keeping the status filter. Also
    /// invalidates any in-flight search so its response cannot land on the
    /// reloaded list.
    pub fn reset(&mut self) {
        self.tickets.clear();
        self.page = 0;
        self.has_more = true;
        self.search = None;
        self.latest_request += 1;
    }

    /// Page number the next scroll-triggered load should request.
    pub fn next_page(&self) -> u32 {
        self.page + 1
    }

    /// Append one fetched page and update pagination state.
    pub fn apply_page(&mut self, page: Page<Ticket>) {
        self.page = page.meta.current_page;
        self.has_more = page.has_more();
        self.tickets.extend(page.items);
    }

    /// Register a new search request and return its sequence number.
    pub fn begin_search(&mut self, term: &str) -> u64 {
        self.latest_request += 1;
        self.search = Some(term.to_string());
        self.latest_request
    }

    /// Apply search results only if they belong to the latest issued
    /// request. An active search replaces the list wholesale and disables
    /// pagination.
    pub fn apply_search(&mut self, seq: u64, results: Vec<Ticket>) -> bool {
        if seq != self.latest_request {
            return false;
        }
        self.tickets = results;
        self.has_more = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PageMeta;

    fn ticket(id: i64, status: TicketStatus) -> Ticket {
        Ticket {
            id,
            first_name: "Nimal".into(),
            last_name: "Silva".into(),
            contact_number: "0771234567".into(),
            device_category: "phone".into(),
            device_model: "iPhone 12".into(),
            imei: None,
            issue: "Cracked screen".into(),
            priority: TicketPriority::Medium,
            status,
            payment_type: None,
            service_charge: None,
            repaired_by: None,
            user: None,
            created_at: None,
        }
    }

    #[test]
    fn only_single_next_state_is_offered() {
        assert_eq!(TicketStatus::Open.next(), Some(TicketStatus::InProgress));
        assert_eq!(TicketStatus::InProgress.next(), Some(TicketStatus::Completed));
        assert_eq!(TicketStatus::Completed.next(), None);
        assert_eq!(TicketStatus::Cancelled.next(), None);
    }

    #[test]
    fn completed_ticket_is_not_modifiable() {
        assert!(TicketStatus::Open.is_modifiable());
        assert!(TicketStatus::InProgress.is_modifiable());
        assert!(!TicketStatus::Completed.is_modifiable());
        assert!(!TicketStatus::Cancelled.is_modifiable());
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TicketStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: TicketStatus = serde_json::from_str("\"open\"").unwrap();
        assert_eq!(parsed, TicketStatus::Open);
    }

    #[test]
    fn feed_pages_accumulate_until_last_page() {
        let mut feed = TicketFeed::default();
        feed.reset();

        feed.apply_page(Page {
            items: vec![ticket(1, TicketStatus::Open), ticket(2, TicketStatus::Open)],
            meta: PageMeta { current_page: 1, last_page: 2 },
        });
        assert_eq!(feed.tickets.len(), 2);
        assert!(feed.has_more);
        assert_eq!(feed.next_page(), 2);

        feed.apply_page(Page {
            items: vec![ticket(3, TicketStatus::Completed)],
            meta: PageMeta { current_page: 2, last_page: 2 },
        });
        assert_eq!(feed.tickets.len(), 3);
        assert!(!feed.has_more);
    }

    #[test]
    fn search_replaces_wholesale_and_disables_pagination() {
        let mut feed = TicketFeed::default();
        feed.reset();
        feed.apply_page(Page {
            items: vec![ticket(1, TicketStatus::Open), ticket(2, TicketStatus::Open)],
            meta: PageMeta { current_page: 1, last_page: 5 },
        });

        let seq = feed.begin_search("nimal");
        assert!(feed.apply_search(seq, vec![ticket(9, TicketStatus::InProgress)]));
        assert_eq!(feed.tickets.len(), 1);
        assert_eq!(feed.tickets[0].id, 9);
        assert!(!feed.has_more);
    }

    #[test]
    fn reset_invalidates_inflight_search() {
        let mut feed = TicketFeed::default();
        feed.reset();

        let seq = feed.begin_search("nimal");
        // the term is cleared before the response arrives
        feed.reset();

        assert!(!feed.apply_search(seq, vec![ticket(9, TicketStatus::Open)]));
        assert!(feed.tickets.is_empty());
        assert!(feed.has_more);
    }

    #[test]
    fn stale_search_response_is_dropped() {
        let mut feed = TicketFeed::default();
        feed.reset();

        let first = feed.begin_search("nim");
        let second = feed.begin_search("nimal");

        // slow early keystroke arrives after the later one
        assert!(feed.apply_search(second, vec![ticket(2, TicketStatus::Open)]));
        assert!(!feed.apply_search(first, vec![ticket(1, TicketStatus::Open)]));
        assert_eq!(feed.tickets[0].id, 2);
    }
}
