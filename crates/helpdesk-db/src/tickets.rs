use rusqlite::{Connection, OptionalExtension};

use helpdesk_types::models::Role;

use crate::Database;
use crate::StoreError;
use crate::models::{AccountRow, TicketRow};

impl Database {
    /// Open a ticket for a client. Display fields are snapshotted from the
    /// submitting account; they stay as they were even if the account is
    /// edited later.
    pub fn submit_ticket(
        &self,
        client: &AccountRow,
        heading: &str,
        description: &str,
        phone: &str,
    ) -> Result<TicketRow, StoreError> {
        let heading = heading.trim();
        let description = description.trim();
        if heading.is_empty() {
            return Err(StoreError::Validation("heading is required".into()));
        }
        if description.is_empty() {
            return Err(StoreError::Validation("description is required".into()));
        }
        if client.role() != Role::Client {
            return Err(StoreError::Validation(
                "only client accounts can submit tickets".into(),
            ));
        }

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tickets (client_id, client_name, client_email, client_phone, heading, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    client.id,
                    client.name,
                    client.email,
                    phone.trim(),
                    heading,
                    description
                ],
            )?;

            let id = conn.last_insert_rowid();
            query_ticket_by_id(conn, id)?
                .ok_or_else(|| StoreError::Storage("inserted ticket not found".into()))
        })
    }

    /// Full ticket sequence, newest first. Equal timestamps (SQLite keeps
    /// second resolution) fall back to id order so the listing is stable.
    pub fn list_tickets(&self) -> Result<Vec<TicketRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, client_id, client_name, client_email, client_phone,
                        heading, description, status, created_at, closed_at
                 FROM tickets
                 ORDER BY created_at DESC, id DESC",
            )?;

            let rows = stmt
                .query_map([], ticket_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Transition a ticket to Closed, stamping closed_at once. Closing an
    /// already-closed ticket is a no-op returning the current row, so
    /// concurrent closers and double-clicks converge on the same state.
    pub fn close_ticket(&self, id: i64) -> Result<TicketRow, StoreError> {
        self.with_conn(|conn| {
            let row = query_ticket_by_id(conn, id)?.ok_or(StoreError::NotFound)?;
            if row.status == "Closed" {
                return Ok(row);
            }

            conn.execute(
                "UPDATE tickets SET status = 'Closed', closed_at = datetime('now') WHERE id = ?1",
                [id],
            )?;

            query_ticket_by_id(conn, id)?.ok_or(StoreError::NotFound)
        })
    }
}

fn query_ticket_by_id(conn: &Connection, id: i64) -> Result<Option<TicketRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, client_name, client_email, client_phone,
                heading, description, status, created_at, closed_at
         FROM tickets WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], ticket_from_row).optional()?;
    Ok(row)
}

fn ticket_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<TicketRow> {
    Ok(TicketRow {
        id: row.get(0)?,
        client_id: row.get(1)?,
        client_name: row.get(2)?,
        client_email: row.get(3)?,
        client_phone: row.get(4)?,
        heading: row.get(5)?,
        description: row.get(6)?,
        status: row.get(7)?,
        created_at: row.get(8)?,
        closed_at: row.get(9)?,
    })
}
