use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use rusqlite::{Connection, OptionalExtension};

use helpdesk_types::models::Role;

use crate::Database;
use crate::StoreError;
use crate::models::AccountRow;

impl Database {
    /// Create an account. The identity key is the email; hitting its unique
    /// constraint maps to `DuplicateIdentity`.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<AccountRow, StoreError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("name is required".into()));
        }
        if email.is_empty() {
            return Err(StoreError::Validation("email is required".into()));
        }
        if password.is_empty() {
            return Err(StoreError::Validation("password is required".into()));
        }

        // Hash password with Argon2id
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| StoreError::Storage(format!("password hashing failed: {e}")))?
            .to_string();

        self.with_conn(|conn| {
            match conn.execute(
                "INSERT INTO accounts (name, email, password, role) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![name, email, password_hash, role.as_str()],
            ) {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    return Err(StoreError::DuplicateIdentity);
                }
                Err(e) => return Err(e.into()),
            }

            let id = conn.last_insert_rowid();
            query_account_by_id(conn, id)?
                .ok_or_else(|| StoreError::Storage("inserted account not found".into()))
        })
    }

    /// Verify a credential pair, optionally requiring a role. Every failure
    /// mode returns the same `InvalidCredentials` so the response does not
    /// reveal whether the email exists.
    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<AccountRow, StoreError> {
        let row = self
            .with_conn(|conn| query_account_by_email(conn, email.trim()))?
            .ok_or(StoreError::InvalidCredentials)?;

        let parsed_hash = PasswordHash::new(&row.password)
            .map_err(|e| StoreError::Storage(format!("stored password hash unreadable: {e}")))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| StoreError::InvalidCredentials)?;

        if let Some(required) = role {
            if row.role() != required {
                return Err(StoreError::InvalidCredentials);
            }
        }

        Ok(row)
    }

    pub fn get_account(&self, id: i64) -> Result<Option<AccountRow>, StoreError> {
        self.with_conn(|conn| query_account_by_id(conn, id))
    }
}

fn query_account_by_email(conn: &Connection, email: &str) -> Result<Option<AccountRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, password, role, created_at FROM accounts WHERE email = ?1",
    )?;

    let row = stmt.query_row([email], account_from_row).optional()?;
    Ok(row)
}

fn query_account_by_id(conn: &Connection, id: i64) -> Result<Option<AccountRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, email, password, role, created_at FROM accounts WHERE id = ?1",
    )?;

    let row = stmt.query_row([id], account_from_row).optional()?;
    Ok(row)
}

fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        role: row.get(4)?,
        created_at: row.get(5)?,
    })
}
