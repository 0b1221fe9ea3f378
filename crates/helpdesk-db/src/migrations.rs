use rusqlite::Connection;
use tracing::info;

use crate::StoreError;

pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS accounts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            role        TEXT NOT NULL CHECK (role IN ('Client', 'Support')),
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS tickets (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            client_id     INTEGER NOT NULL REFERENCES accounts(id),
            client_name   TEXT NOT NULL,
            client_email  TEXT NOT NULL,
            client_phone  TEXT NOT NULL,
            heading       TEXT NOT NULL,
            description   TEXT NOT NULL,
            status        TEXT NOT NULL DEFAULT 'Open'
                          CHECK (status IN ('Open', 'Closed')),
            created_at    TEXT NOT NULL DEFAULT (datetime('now')),
            closed_at     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_tickets_created
            ON tickets(created_at, id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
