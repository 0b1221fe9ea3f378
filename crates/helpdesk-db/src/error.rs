use thiserror::Error;

/// Store-level failures. All of these are recovered at the API boundary
/// and surfaced as a user-visible message; none are fatal.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field is missing or empty, or the operation violates the
    /// ticket lifecycle (e.g. a non-client submitter).
    #[error("{0}")]
    Validation(String),

    /// Registration hit the unique constraint on the identity column.
    #[error("an account with that email already exists")]
    DuplicateIdentity,

    /// Authentication failed. Deliberately uniform: unknown email, wrong
    /// password and role-filter mismatch all produce this same message.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The referenced ticket does not exist.
    #[error("ticket not found")]
    NotFound,

    /// The persistence layer is unreachable or returned an unexpected error.
    #[error("storage unavailable: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Storage(e.to_string())
    }
}
