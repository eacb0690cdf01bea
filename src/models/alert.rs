use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-status overdue thresholds, in minutes, plus the ticket-alert switch.
/// Fetched once at startup; immutable for the session.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertThresholdConfig {
    pub pending: u32,
    pub accepted: u32,
    pub in_progress: u32,
    #[serde(default)]
    pub new_support_ticket: bool,
}

/// Alert identity doubles as the dedup key: an order can hold at most one
/// live alert, while every ticket alert gets a fresh synthetic id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum AlertId {
    Order(i64),
    Ticket(Uuid),
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertId::Order(id) => write!(f, "order-{id}"),
            AlertId::Ticket(id) => write!(f, "ticket-{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertCategory {
    PendingOverdue,
    AcceptedOverdue,
    InProgressOverdue,
    NewTicket,
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: AlertId,
    pub category: AlertCategory,
    pub message: String,
    pub created_at: DateTime<Utc>,
}
