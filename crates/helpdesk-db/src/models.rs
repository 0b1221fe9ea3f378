//! Database row types, mapping directly to SQLite rows. Distinct from the
//! helpdesk-types API models to keep the DB layer independent; timestamps
//! stay as the TEXT SQLite produced until converted here.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use helpdesk_types::models::{Account, Role, Ticket, TicketStatus};

#[derive(Debug)]
pub struct AccountRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug)]
pub struct TicketRow {
    pub id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub heading: String,
    pub description: String,
    pub status: String,
    pub created_at: String,
    pub closed_at: Option<String>,
}

impl AccountRow {
    pub fn role(&self) -> Role {
        Role::parse(&self.role).unwrap_or_else(|| {
            warn!("Corrupt role '{}' on account {}", self.role, self.id);
            Role::Client
        })
    }

    /// The password hash never leaves the store; the domain model carries
    /// everything else.
    pub fn into_account(self) -> Account {
        let role = self.role();
        Account {
            id: self.id,
            name: self.name,
            email: self.email,
            role,
            created_at: parse_datetime(&self.created_at),
        }
    }
}

impl TicketRow {
    pub fn into_ticket(self) -> Ticket {
        let status = TicketStatus::parse(&self.status).unwrap_or_else(|| {
            warn!("Corrupt status '{}' on ticket {}", self.status, self.id);
            TicketStatus::Open
        });
        Ticket {
            id: self.id,
            client_id: self.client_id,
            client_name: self.client_name,
            client_email: self.client_email,
            client_phone: self.client_phone,
            heading: self.heading,
            description: self.description,
            status,
            created_at: parse_datetime(&self.created_at),
            closed_at: self.closed_at.as_deref().map(parse_datetime),
        }
    }
}

/// SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
/// Try RFC 3339 first, then parse as naive UTC and convert.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    s.parse::<DateTime<Utc>>()
        .or_else(|_| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", s, e);
            DateTime::default()
        })
}
