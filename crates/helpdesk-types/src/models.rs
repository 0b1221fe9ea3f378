use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Client,
    Support,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "Client",
            Role::Support => "Support",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Client" => Some(Role::Client),
            "Support" => Some(Role::Support),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Tickets move one way: Open to Closed. There is no reopen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    Closed,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::Closed => "Closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Open" => Some(TicketStatus::Open),
            "Closed" => Some(TicketStatus::Closed),
            _ => None,
        }
    }
}

/// The client_* fields are a snapshot taken at submission time.
/// They are not kept in sync with later account edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub heading: String,
    pub description: String,
    pub status: TicketStatus,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}
