use thiserror::Error;

/// Failures of the storage medium itself.
///
/// These are distinct from business-rule failures ([`LedgerError`]): a
/// `StoreError` means the key-value medium could not be read or written, or
/// held a value that no longer deserializes.  Ledgers never swallow these —
/// they propagate to the caller untouched.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage medium unavailable: {0}")]
    Unavailable(#[from] redb::Error),

    #[error("stored value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<redb::DatabaseError> for StoreError {
    fn from(err: redb::DatabaseError) -> Self {
        Self::Unavailable(err.into())
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(err: redb::TransactionError) -> Self {
        Self::Unavailable(err.into())
    }
}

impl From<redb::TableError> for StoreError {
    fn from(err: redb::TableError) -> Self {
        Self::Unavailable(err.into())
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(err: redb::StorageError) -> Self {
        Self::Unavailable(err.into())
    }
}

impl From<redb::CommitError> for StoreError {
    fn from(err: redb::CommitError) -> Self {
        Self::Unavailable(err.into())
    }
}

/// Business-rule failures surfaced by the ledgers.
///
/// | Variant              | Meaning                                            |
/// |----------------------|----------------------------------------------------|
/// | `Validation`         | Caller-supplied data violates a field constraint   |
/// | `DuplicateEmail`     | Signup conflicts with an existing account          |
/// | `InvalidCredentials` | Login mismatch (deliberately unspecific)           |
/// | `NotFound`           | Operation targets a nonexistent record id          |
/// | `Store`              | Medium-level failure, see [`StoreError`]           |
///
/// A failed operation never leaves a collection half-written: every ledger
/// serializes and commits the whole collection in one transaction, so the
/// previous stored state remains intact on any error.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0}")]
    Validation(String),

    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("no record found with the given id")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}
