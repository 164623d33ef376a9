//! Error types for the credential, ledger, and reporting layers.
//!
//! Everything below the `run` layer returns [`Result`]; the binary
//! boundary converts into `anyhow::Error` with added context.

use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum FinanceError {
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    #[error("Username must not be empty")]
    EmptyUsername,

    #[error("Username not found: {0}")]
    UserNotFound(String),

    #[error("Incorrect password")]
    InvalidCredential,

    /// Non-numeric or negative amount input.
    #[error("Invalid amount '{0}': expected a non-negative number")]
    MalformedAmount(String),

    /// Date, month, or year input that does not parse.
    #[error("Invalid date '{0}': expected {1}")]
    MalformedDate(String, &'static str),

    /// A total that no longer fits in a `Decimal`.
    #[error("Amount too large: the running total would overflow")]
    AmountOverflow,

    #[error("Transaction {0} not found")]
    RecordNotFoundOrNotOwned(i64),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

pub(crate) type Result<T> = std::result::Result<T, FinanceError>;
