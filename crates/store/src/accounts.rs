//! Account ledger — signup records, credential lookup, profile updates.
//!
//! Sole writer of the `accounts` key.  Credentials are stored and compared
//! in plaintext to match the product's local-demo storage model; see the
//! warning on [`Account`].

use chrono::Utc;
use uuid::Uuid;

use crate::error::LedgerError;
use crate::kv::{ACCOUNTS_KEY, KvStore};
use crate::schema::Account;

/// Minimum password length accepted at signup.
const MIN_PASSWORD_LEN: usize = 6;

/// Optional fields for [`AccountLedger::update`]; `None` leaves the stored
/// value untouched (shallow merge).
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct AccountLedger<'a> {
    store: &'a KvStore,
}

impl<'a> AccountLedger<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }

    /// All registered accounts in insertion order.
    pub fn list(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.store.get(ACCOUNTS_KEY)?.unwrap_or_default())
    }

    /// Register a new account.
    ///
    /// Fails with `Validation` on empty fields or a short password, and with
    /// `DuplicateEmail` when the email exactly matches an existing account.
    /// Nothing is persisted on failure.
    pub fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Account, LedgerError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(LedgerError::Validation(
                "all fields are required".to_string(),
            ));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(LedgerError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters long"
            )));
        }

        let mut accounts = self.list()?;
        if accounts.iter().any(|account| account.email == email) {
            return Err(LedgerError::DuplicateEmail);
        }

        let account = Account {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: Utc::now(),
        };
        accounts.push(account.clone());
        self.store.set(ACCOUNTS_KEY, &accounts)?;
        tracing::info!(email, "account created");
        Ok(account)
    }

    /// Exact match on both email and password.
    ///
    /// Returns the same `InvalidCredentials` error whether the email is
    /// unknown or the password is wrong, so the caller cannot tell which
    /// part failed.
    pub fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Account, LedgerError> {
        if email.is_empty() || password.is_empty() {
            return Err(LedgerError::Validation(
                "email and password are required".to_string(),
            ));
        }
        self.list()?
            .into_iter()
            .find(|account| account.email == email && account.password == password)
            .ok_or(LedgerError::InvalidCredentials)
    }

    /// Shallow-merge `patch` onto the account with `id` and persist.
    pub fn update(&self, id: &str, patch: AccountPatch) -> Result<Account, LedgerError> {
        let mut accounts = self.list()?;
        let account = accounts
            .iter_mut()
            .find(|account| account.id == id)
            .ok_or(LedgerError::NotFound)?;

        if let Some(name) = patch.name {
            account.name = name;
        }
        if let Some(email) = patch.email {
            account.email = email;
        }
        if let Some(password) = patch.password {
            account.password = password;
        }
        let updated = account.clone();
        self.store.set(ACCOUNTS_KEY, &accounts)?;
        tracing::info!(id, "account updated");
        Ok(updated)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, KvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::open(dir.path().join("data.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn create_then_find_by_credentials() {
        let (_dir, store) = temp_store();
        let ledger = AccountLedger::new(&store);
        let created = ledger.create("Asha", "asha@example.com", "secret1").unwrap();
        let found = ledger
            .find_by_credentials("asha@example.com", "secret1")
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Asha");
        assert_eq!(found.email, "asha@example.com");
    }

    #[test]
    fn duplicate_email_rejected_and_list_unchanged() {
        let (_dir, store) = temp_store();
        let ledger = AccountLedger::new(&store);
        ledger.create("Asha", "asha@example.com", "secret1").unwrap();
        let err = ledger
            .create("Other", "asha@example.com", "different1")
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateEmail));
        assert_eq!(ledger.list().unwrap().len(), 1);
    }

    #[test]
    fn email_match_is_case_sensitive() {
        let (_dir, store) = temp_store();
        let ledger = AccountLedger::new(&store);
        ledger.create("Asha", "asha@example.com", "secret1").unwrap();
        // A differently-cased email is a different account, as stored.
        ledger.create("Asha", "Asha@example.com", "secret1").unwrap();
        assert_eq!(ledger.list().unwrap().len(), 2);
    }

    #[test]
    fn short_password_rejected() {
        let (_dir, store) = temp_store();
        let ledger = AccountLedger::new(&store);
        let err = ledger.create("Asha", "asha@example.com", "five5").unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(ledger.list().unwrap().is_empty());
    }

    #[test]
    fn empty_fields_rejected() {
        let (_dir, store) = temp_store();
        let ledger = AccountLedger::new(&store);
        for (name, email, password) in
            [("", "a@b.c", "secret1"), ("A", "", "secret1"), ("A", "a@b.c", "")]
        {
            let err = ledger.create(name, email, password).unwrap_err();
            assert!(matches!(err, LedgerError::Validation(_)));
        }
    }

    #[test]
    fn wrong_password_and_unknown_email_look_the_same() {
        let (_dir, store) = temp_store();
        let ledger = AccountLedger::new(&store);
        ledger.create("Asha", "asha@example.com", "secret1").unwrap();

        let wrong_password = ledger
            .find_by_credentials("asha@example.com", "nope123")
            .unwrap_err();
        let unknown_email = ledger
            .find_by_credentials("ghost@example.com", "secret1")
            .unwrap_err();
        assert!(matches!(wrong_password, LedgerError::InvalidCredentials));
        assert!(matches!(unknown_email, LedgerError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[test]
    fn update_merges_only_given_fields() {
        let (_dir, store) = temp_store();
        let ledger = AccountLedger::new(&store);
        let created = ledger.create("Asha", "asha@example.com", "secret1").unwrap();

        let patch = AccountPatch {
            name: Some("Asha R".to_string()),
            ..Default::default()
        };
        let updated = ledger.update(&created.id, patch).unwrap();
        assert_eq!(updated.name, "Asha R");
        assert_eq!(updated.email, "asha@example.com");
        assert_eq!(updated.password, "secret1");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (_dir, store) = temp_store();
        let ledger = AccountLedger::new(&store);
        let err = ledger.update("missing", AccountPatch::default()).unwrap_err();
        assert!(matches!(err, LedgerError::NotFound));
    }

    #[test]
    fn ids_are_unique_across_rapid_creation() {
        let (_dir, store) = temp_store();
        let ledger = AccountLedger::new(&store);
        let a = ledger.create("A", "a@example.com", "secret1").unwrap();
        let b = ledger.create("B", "b@example.com", "secret1").unwrap();
        assert_ne!(a.id, b.id);
    }
}
