//! Local persistence core for the Upchaarak healthcare assistant.
//!
//! Everything the client keeps between runs — accounts, the current
//! session, the chat transcript, and appointments — lives as JSON-encoded
//! collections in a single [`kv::KvStore`] file.  Each ledger owns exactly
//! one key and exposes the only operations allowed to touch it; callers
//! never reach into the raw store.
//!
//! **Security note**: account passwords are stored and compared in
//! plaintext.  That matches the product this core was built for (a local
//! single-user demo) and is flagged on [`schema::Account`]; do not reuse
//! this crate anywhere the store file crosses a trust boundary without
//! substituting hashed credentials.

pub mod accounts;
pub mod appointments;
pub mod chat;
pub mod error;
pub mod kv;
pub mod schema;
pub mod session;

use chrono::Utc;

pub use accounts::{AccountLedger, AccountPatch};
pub use appointments::AppointmentLedger;
pub use chat::ChatHistoryLedger;
pub use error::{LedgerError, StoreError};
pub use kv::KvStore;
pub use schema::{Account, Appointment, AppointmentStatus, ChatEntry, Session, UserDataExport};
pub use session::SessionManager;

/// Remove all user-owned data (chat history and appointments).  Accounts
/// and the session are left in place.
pub fn clear_all_user_data(store: &KvStore) -> Result<(), LedgerError> {
    ChatHistoryLedger::new(store).clear()?;
    store.remove(kv::APPOINTMENTS_KEY)?;
    Ok(())
}

/// Snapshot chat history and appointments into a single export record.
pub fn export_user_data(store: &KvStore) -> Result<UserDataExport, LedgerError> {
    Ok(UserDataExport {
        chat_history: ChatHistoryLedger::new(store).list()?,
        appointments: AppointmentLedger::new(store).list()?,
        export_date: Utc::now(),
    })
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_reproduces_identical_ledger_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.redb");

        let (account_id, entry_id, appointment_id);
        {
            let store = KvStore::open(&path).unwrap();
            account_id = AccountLedger::new(&store)
                .create("Asha", "asha@example.com", "secret1")
                .unwrap()
                .id;
            entry_id = ChatHistoryLedger::new(&store)
                .append("What causes a fever?", "Usually an infection.")
                .unwrap()
                .id;
            appointment_id = AppointmentLedger::new(&store)
                .book("Asha", 30, "cough", "2030-01-01", "10:00")
                .unwrap()
                .id;
        }

        // Simulated process restart: reopen the same file.
        let store = KvStore::open(&path).unwrap();
        let accounts = AccountLedger::new(&store).list().unwrap();
        let entries = ChatHistoryLedger::new(&store).list().unwrap();
        let appointments = AppointmentLedger::new(&store).list().unwrap();

        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].id, account_id);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry_id);
        assert_eq!(entries[0].user_message, "What causes a fever?");
        assert_eq!(appointments.len(), 1);
        assert_eq!(appointments[0].id, appointment_id);
    }

    #[test]
    fn clear_all_user_data_keeps_accounts_and_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::open(dir.path().join("data.redb")).unwrap();

        let account = AccountLedger::new(&store)
            .create("Asha", "asha@example.com", "secret1")
            .unwrap();
        SessionManager::new(&store).start(&account).unwrap();
        ChatHistoryLedger::new(&store).append("q", "a").unwrap();
        AppointmentLedger::new(&store)
            .book("Asha", 30, "cough", "2030-01-01", "10:00")
            .unwrap();

        clear_all_user_data(&store).unwrap();

        assert!(ChatHistoryLedger::new(&store).list().unwrap().is_empty());
        assert!(AppointmentLedger::new(&store).list().unwrap().is_empty());
        assert_eq!(AccountLedger::new(&store).list().unwrap().len(), 1);
        assert!(SessionManager::new(&store).is_authenticated().unwrap());
    }

    #[test]
    fn export_captures_both_collections() {
        let dir = tempfile::tempdir().unwrap();
        let store = KvStore::open(dir.path().join("data.redb")).unwrap();

        ChatHistoryLedger::new(&store).append("q", "a").unwrap();
        AppointmentLedger::new(&store)
            .book("Asha", 30, "cough", "2030-01-01", "10:00")
            .unwrap();

        let export = export_user_data(&store).unwrap();
        assert_eq!(export.chat_history.len(), 1);
        assert_eq!(export.appointments.len(), 1);
        // The export must round-trip through JSON for backup files.
        let json = serde_json::to_string(&export).unwrap();
        let back: UserDataExport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.appointments[0].id, export.appointments[0].id);
    }
}
