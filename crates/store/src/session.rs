//! Session manager — the single "who is logged in" record.
//!
//! Sole writer of the `session` key.  A session is a password-stripped copy
//! of an account, created by login/signup and destroyed by logout.

use crate::error::LedgerError;
use crate::kv::{KvStore, SESSION_KEY};
use crate::schema::{Account, Session};

pub struct SessionManager<'a> {
    store: &'a KvStore,
}

impl<'a> SessionManager<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }

    /// The current session, if one exists.
    pub fn current(&self) -> Result<Option<Session>, LedgerError> {
        Ok(self.store.get(SESSION_KEY)?)
    }

    /// Persist `account` (minus password) as the sole current session,
    /// overwriting any prior one.
    pub fn start(&self, account: &Account) -> Result<Session, LedgerError> {
        let session = Session::from(account);
        self.store.set(SESSION_KEY, &session)?;
        tracing::info!(email = %session.email, "session started");
        Ok(session)
    }

    /// Remove the current session.  Ending with no session is a no-op.
    pub fn end(&self) -> Result<(), LedgerError> {
        self.store.remove(SESSION_KEY)?;
        tracing::info!("session ended");
        Ok(())
    }

    pub fn is_authenticated(&self) -> Result<bool, LedgerError> {
        Ok(self.current()?.is_some())
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
