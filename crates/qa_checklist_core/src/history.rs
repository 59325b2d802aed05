//! crates/qa_checklist_core/src/history.rs
//!
//! The history manager owns the completed-session archive document. Entries
//! are created only by session completion and removed only by explicit
//! deletion; everything in between is an ordered, append-only sequence.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{CompletedEntry, Session};
use crate::error::{ChecklistError, ChecklistResult, MutationOutcome};
use crate::ports::StorageService;

/// Owns the archive document. Every operation is a full load-mutate-save
/// cycle serialized behind the manager's lock.
pub struct HistoryManager {
    store: Arc<dyn StorageService>,
    /// Serializes load-mutate-save cycles against the archive document.
    /// When completion touches both documents the session lock is always
    /// taken first, then this one.
    lock: Mutex<()>,
}

impl HistoryManager {
    pub fn new(store: Arc<dyn StorageService>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Returns all archived entries in completion order.
    pub async fn list(&self) -> ChecklistResult<Vec<CompletedEntry>> {
        let _guard = self.lock.lock().await;
        self.load_or_init().await
    }

    /// Archives a finished session.
    ///
    /// Entry ids are count-based (`entries.len() + 1`), not max-based like
    /// every other id in the system: deleting an entry and archiving another
    /// can reuse an id. Kept for compatibility with existing archive files.
    pub async fn append(
        &self,
        session: Session,
        end_date: String,
        completed_at: String,
    ) -> ChecklistResult<CompletedEntry> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_or_init().await?;
        let entry = CompletedEntry {
            id: entries.len() as u64 + 1,
            target_website: session.target_website,
            start_date: session.start_date,
            end_date,
            completed_at,
            checklist: session.checklist,
            notes: session.notes,
        };
        entries.push(entry.clone());
        self.store.save_history(&entries).await?;
        Ok(entry)
    }

    /// Removes the entry with the given id. Missing ids are a no-op; the
    /// outcome reports which case occurred.
    pub async fn delete(&self, id: u64) -> ChecklistResult<MutationOutcome> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_or_init().await?;
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        let outcome = if entries.len() < before {
            MutationOutcome::Applied
        } else {
            MutationOutcome::TargetMissing
        };
        self.store.save_history(&entries).await?;
        Ok(outcome)
    }

    /// Loads the archive, attempting one re-initialization when the document
    /// is absent or unreadable. If the document still cannot be produced the
    /// operation fails hard rather than pretending the archive is empty.
    async fn load_or_init(&self) -> ChecklistResult<Vec<CompletedEntry>> {
        if let Some(entries) = self.store.load_history().await {
            return Ok(entries);
        }
        warn!("history document absent, re-initializing as an empty archive");
        self.store
            .save_history(&[])
            .await
            .map_err(|_| ChecklistError::HistoryUnavailable)?;
        match self.store.load_history().await {
            Some(entries) => Ok(entries),
            None => Err(ChecklistError::HistoryUnavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{heading, item, MemoryStore};

    fn manager() -> (Arc<MemoryStore>, HistoryManager) {
        let store = Arc::new(MemoryStore::default());
        let manager = HistoryManager::new(store.clone());
        (store, manager)
    }

    fn finished_session(target: &str) -> Session {
        Session {
            target_website: target.to_string(),
            start_date: "2026-08-01".to_string(),
            checklist: vec![heading(1, "Forms", vec![item(1, "Submit with empty fields")])],
            notes: Vec::new(),
        }
    }

    #[tokio::test]
    async fn absent_history_reinitializes_as_empty() {
        let (store, manager) = manager();
        assert!(store.history.lock().unwrap().is_none());

        let entries = manager.list().await.unwrap();
        assert!(entries.is_empty());
        // The re-initialized document was persisted, not just returned.
        assert_eq!(store.history.lock().unwrap().as_deref(), Some(&[][..]));
    }

    #[tokio::test]
    async fn unavailable_history_is_a_hard_error() {
        let (store, manager) = manager();
        store.fail_history_saves();

        let err = manager.list().await.unwrap_err();
        assert!(matches!(err, ChecklistError::HistoryUnavailable));

        let err = manager
            .append(finished_session("https://example.com"), "2026-08-07".into(), "now".into())
            .await
            .unwrap_err();
        assert!(matches!(err, ChecklistError::HistoryUnavailable));
    }

    #[tokio::test]
    async fn append_preserves_the_session_snapshot() {
        let (_, manager) = manager();
        let entry = manager
            .append(
                finished_session("https://example.com"),
                "2026-08-07".into(),
                "2026-08-07 10:00:00".into(),
            )
            .await
            .unwrap();

        assert_eq!(entry.id, 1);
        assert_eq!(entry.target_website, "https://example.com");
        assert_eq!(entry.start_date, "2026-08-01");
        assert_eq!(entry.end_date, "2026-08-07");
        assert_eq!(entry.completed_at, "2026-08-07 10:00:00");
        assert_eq!(entry.checklist[0].items[0].text, "Submit with empty fields");

        assert_eq!(manager.list().await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn entry_ids_are_count_based_not_max_based() {
        let (_, manager) = manager();
        for expected in 1..=3 {
            let entry = manager
                .append(finished_session("https://example.com"), "d".into(), "t".into())
                .await
                .unwrap();
            assert_eq!(entry.id, expected);
        }

        assert!(manager.delete(2).await.unwrap().applied());

        // Two entries remain, so the next id is 3 -- colliding with the
        // surviving entry's id. This is the long-standing id scheme of the
        // archive format, preserved deliberately; see DESIGN.md.
        let entry = manager
            .append(finished_session("https://example.com"), "d".into(), "t".into())
            .await
            .unwrap();
        assert_eq!(entry.id, 3);
        let ids: Vec<u64> = manager.list().await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3, 3]);
    }

    #[tokio::test]
    async fn delete_of_missing_id_is_a_noop() {
        let (_, manager) = manager();
        manager
            .append(finished_session("https://example.com"), "d".into(), "t".into())
            .await
            .unwrap();

        let before = manager.list().await.unwrap();
        let outcome = manager.delete(99).await.unwrap();
        assert_eq!(outcome, MutationOutcome::TargetMissing);
        assert_eq!(manager.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_removes_only_the_matching_entry() {
        let (_, manager) = manager();
        for _ in 0..3 {
            manager
                .append(finished_session("https://example.com"), "d".into(), "t".into())
                .await
                .unwrap();
        }

        assert!(manager.delete(2).await.unwrap().applied());
        let ids: Vec<u64> = manager.list().await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
