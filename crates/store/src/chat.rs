//! Chat history ledger — an append-newest-first transcript of
//! question/answer pairs.
//!
//! Sole writer of the `chat_history` key.  Entries are never mutated after
//! creation; the only mutations are targeted delete and full clear.

use chrono::Utc;
use uuid::Uuid;

use crate::error::LedgerError;
use crate::kv::{CHAT_HISTORY_KEY, KvStore};
use crate::schema::{self, ChatEntry};

pub struct ChatHistoryLedger<'a> {
    store: &'a KvStore,
}

impl<'a> ChatHistoryLedger<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self { store }
    }

    /// All entries, newest-first.
    pub fn list(&self) -> Result<Vec<ChatEntry>, LedgerError> {
        Ok(self.store.get(CHAT_HISTORY_KEY)?.unwrap_or_default())
    }

    /// The newest `n` entries.  Derived read for "latest N" views; the
    /// chronological-pairs chat view is left to the caller as a pure
    /// projection.
    pub fn recent(&self, n: usize) -> Result<Vec<ChatEntry>, LedgerError> {
        let mut entries = self.list()?;
        entries.truncate(n);
        Ok(entries)
    }

    /// Record one completed chat round-trip, newest-first.
    ///
    /// No validation here: empty strings are allowed, input checking happens
    /// upstream of the ledger.
    pub fn append(
        &self,
        user_message: &str,
        bot_response: &str,
    ) -> Result<ChatEntry, LedgerError> {
        let now = Utc::now();
        let entry = ChatEntry {
            id: Uuid::new_v4().to_string(),
            user_message: user_message.to_string(),
            bot_response: bot_response.to_string(),
            timestamp: now,
            date: schema::display_date(now),
            time: schema::display_time(now),
        };

        let mut entries = self.list()?;
        entries.insert(0, entry.clone());
        self.store.set(CHAT_HISTORY_KEY, &entries)?;
        Ok(entry)
    }

    /// Remove the entry with `id`.  Absent id is a no-op, not an error.
    pub fn delete(&self, id: &str) -> Result<(), LedgerError> {
        let mut entries = self.list()?;
        entries.retain(|entry| entry.id != id);
        self.store.set(CHAT_HISTORY_KEY, &entries)?;
        Ok(())
    }

    /// Drop the entire history key.
    pub fn clear(&self) -> Result<(), LedgerError> {
        self.store.remove(CHAT_HISTORY_KEY)?;
        Ok(())
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
    fn append_prepends_newest_first() {
        let (_dir, store) = temp_store();
        let chat = ChatHistoryLedger::new(&store);
        chat.append("first question", "first answer").unwrap();
        let newest = chat.append("second question", "second answer").unwrap();

        let entries = chat.list().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, newest.id);
        assert_eq!(entries[0].user_message, "second question");
        assert_eq!(entries[1].user_message, "first question");
    }

    #[test]
    fn empty_strings_are_allowed() {
        let (_dir, store) = temp_store();
        let chat = ChatHistoryLedger::new(&store);
        let entry = chat.append("", "").unwrap();
        assert!(entry.user_message.is_empty());
        assert!(entry.bot_response.is_empty());
        assert_eq!(chat.list().unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let (_dir, store) = temp_store();
        let chat = ChatHistoryLedger::new(&store);
        let a = chat.append("a?", "a.").unwrap();
        let b = chat.append("b?", "b.").unwrap();
        let c = chat.append("c?", "c.").unwrap();

        chat.delete(&b.id).unwrap();

        let entries = chat.list().unwrap();
        let ids: Vec<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, [c.id.as_str(), a.id.as_str()]);
    }

    #[test]
    fn delete_absent_id_is_noop() {
        let (_dir, store) = temp_store();
        let chat = ChatHistoryLedger::new(&store);
        chat.append("q", "a").unwrap();
        chat.delete("no-such-id").unwrap();
        assert_eq!(chat.list().unwrap().len(), 1);
    }

    #[test]
    fn clear_empties_the_history() {
        let (_dir, store) = temp_store();
        let chat = ChatHistoryLedger::new(&store);
        chat.append("q", "a").unwrap();
        chat.clear().unwrap();
        assert!(chat.list().unwrap().is_empty());
    }

    #[test]
    fn recent_truncates_to_n_newest() {
        let (_dir, store) = temp_store();
        let chat = ChatHistoryLedger::new(&store);
        for i in 0..5 {
            chat.append(&format!("q{i}"), "a").unwrap();
        }
        let recent = chat.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].user_message, "q4");
        assert_eq!(recent[1].user_message, "q3");
    }
}
