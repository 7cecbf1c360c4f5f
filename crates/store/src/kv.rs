//! Key-value store adapter — a single redb table holding JSON-encoded
//! collections under well-known string keys.
//!
//! Every `set` writes the whole value inside one write transaction, so a
//! collection is always stored fully-updated or not at all.  Callers never
//! see a partially written row.

use std::path::{Path, PathBuf};

use redb::{Database, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StoreError;

/// Single table: logical key (str) → JSON-encoded value (str).
const DATA_TABLE: TableDefinition<&str, &str> = TableDefinition::new("upchaarak");

// ── Logical keys ──────────────────────────────────────────────────────────────

/// All registered accounts, insertion order.
pub const ACCOUNTS_KEY: &str = "accounts";
/// The current session, if any.
pub const SESSION_KEY: &str = "session";
/// Chat history, newest-first.
pub const CHAT_HISTORY_KEY: &str = "chat_history";
/// Appointments, newest-first.
pub const APPOINTMENTS_KEY: &str = "appointments";

// ── KvStore ───────────────────────────────────────────────────────────────────

/// Synchronous, string-keyed store over a redb database file.
///
/// Each ledger is the sole writer of its key; the adapter itself imposes no
/// structure beyond "JSON value per key".
pub struct KvStore {
    db: Database,
    path: PathBuf,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").field("path", &self.path).finish()
    }
}

impl KvStore {
    /// Open or create the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| StoreError::Unavailable(redb::Error::from(err)))?;
            }
        }
        let db = Database::create(&path)?;

        // Ensure the table exists so the first read doesn't fail.
        {
            let tx = db.begin_write()?;
            tx.open_table(DATA_TABLE)?;
            tx.commit()?;
        }

        Ok(Self { db, path })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and deserialize the value stored under `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let tx = self.db.begin_read()?;
        let tbl = tx.open_table(DATA_TABLE)?;
        match tbl.get(key)? {
            None => Ok(None),
            Some(raw) => {
                let value = serde_json::from_str(raw.value())?;
                Ok(Some(value))
            }
        }
    }

    /// Serialize `value` and overwrite whatever is stored under `key`.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        let tx = self.db.begin_write()?;
        {
            let mut tbl = tx.open_table(DATA_TABLE)?;
            tbl.insert(key, json.as_str())?;
        }
        tx.commit()?;
        tracing::debug!(key, bytes = json.len(), "kv set");
        Ok(())
    }

    /// Remove `key` entirely.  Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let tx = self.db.begin_write()?;
        {
            let mut tbl = tx.open_table(DATA_TABLE)?;
            tbl.remove(key)?;
        }
        tx.commit()?;
        tracing::debug!(key, "kv remove");
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
