//! crates/qa_checklist_core/src/session.rs
//!
//! The session manager owns the current-session document and exposes every
//! mutation over it: target/start-date updates, heading and item CRUD, note
//! CRUD, completion, and reset. Each operation is one lock -> load -> mutate
//! -> save cycle against the injected store, with the session self-healed
//! from defaults whenever the stored document is absent or unreadable.

use std::sync::Arc;

use chrono::Local;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{CompletedEntry, Heading, Item, Note, Session};
use crate::error::{ChecklistError, ChecklistResult, MutationOutcome};
use crate::history::HistoryManager;
use crate::ports::{StorageService, TemplateService};

//=========================================================================================
// Payloads
//=========================================================================================

/// A partial update to the session's info fields. Only the provided fields
/// are changed; the others are left untouched.
#[derive(Debug, Clone, Default)]
pub struct SessionInfoUpdate {
    pub target_website: Option<String>,
    pub start_date: Option<String>,
}

/// The outcome of a successful completion: the archived entry and the fresh
/// session that replaced the finished one.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub entry: CompletedEntry,
    pub session: Session,
}

//=========================================================================================
// SessionManager
//=========================================================================================

pub struct SessionManager {
    store: Arc<dyn StorageService>,
    templates: Arc<dyn TemplateService>,
    history: Arc<HistoryManager>,
    /// Serializes load-mutate-save cycles against the session document.
    /// Completion also touches the archive; the lock order is always this
    /// one first, then the history manager's.
    lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn StorageService>,
        templates: Arc<dyn TemplateService>,
        history: Arc<HistoryManager>,
    ) -> Self {
        Self {
            store,
            templates,
            history,
            lock: Mutex::new(()),
        }
    }

    /// Returns the current session, rebuilding and persisting it from
    /// defaults when the stored document is absent or corrupt. Callers never
    /// observe a "no session" state.
    pub async fn current(&self) -> ChecklistResult<Session> {
        let _guard = self.lock.lock().await;
        self.load_or_heal().await
    }

    /// Applies a partial update to the target website and start date.
    pub async fn update_info(&self, update: SessionInfoUpdate) -> ChecklistResult<Session> {
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        if let Some(target_website) = update.target_website {
            session.target_website = target_website;
        }
        if let Some(start_date) = update.start_date {
            session.start_date = start_date;
        }
        self.store.save_session(&session).await?;
        Ok(session)
    }

    /// Sets the checked state of one item.
    pub async fn toggle_item(
        &self,
        heading_id: u64,
        item_id: u64,
        checked: bool,
    ) -> ChecklistResult<MutationOutcome> {
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let outcome = match session
            .checklist
            .iter_mut()
            .find(|heading| heading.id == heading_id)
            .and_then(|heading| heading.items.iter_mut().find(|item| item.id == item_id))
        {
            Some(item) => {
                item.checked = checked;
                MutationOutcome::Applied
            }
            None => MutationOutcome::TargetMissing,
        };
        self.store.save_session(&session).await?;
        Ok(outcome)
    }

    /// Appends a new heading. The title is trimmed and must be non-empty;
    /// the id is one past the highest existing heading id.
    pub async fn add_heading(&self, title: &str) -> ChecklistResult<Heading> {
        let title = required(title, "Title")?;
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let heading = Heading {
            id: next_id(session.checklist.iter().map(|h| h.id)),
            title,
            items: Vec::new(),
        };
        session.checklist.push(heading.clone());
        self.store.save_session(&session).await?;
        Ok(heading)
    }

    /// Replaces a heading's title.
    pub async fn edit_heading(&self, id: u64, title: &str) -> ChecklistResult<MutationOutcome> {
        let title = required(title, "Title")?;
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let outcome = match session.checklist.iter_mut().find(|h| h.id == id) {
            Some(heading) => {
                heading.title = title;
                MutationOutcome::Applied
            }
            None => MutationOutcome::TargetMissing,
        };
        self.store.save_session(&session).await?;
        Ok(outcome)
    }

    /// Removes a heading and everything under it.
    pub async fn delete_heading(&self, id: u64) -> ChecklistResult<MutationOutcome> {
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let before = session.checklist.len();
        session.checklist.retain(|heading| heading.id != id);
        let outcome = if session.checklist.len() < before {
            MutationOutcome::Applied
        } else {
            MutationOutcome::TargetMissing
        };
        self.store.save_session(&session).await?;
        Ok(outcome)
    }

    /// Appends a new item to a heading. Returns `None` when the heading does
    /// not exist: the operation is a no-op but not an error.
    ///
    /// Item ids are assigned max + 1 scoped to the parent heading, so ids
    /// restart at 1 inside each heading.
    pub async fn add_item(&self, heading_id: u64, text: &str) -> ChecklistResult<Option<Item>> {
        let text = required(text, "Text")?;
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let item = session
            .checklist
            .iter_mut()
            .find(|heading| heading.id == heading_id)
            .map(|heading| {
                let item = Item {
                    id: next_id(heading.items.iter().map(|i| i.id)),
                    text,
                    checked: false,
                };
                heading.items.push(item.clone());
                item
            });
        self.store.save_session(&session).await?;
        Ok(item)
    }

    /// Replaces an item's text.
    pub async fn edit_item(
        &self,
        heading_id: u64,
        item_id: u64,
        text: &str,
    ) -> ChecklistResult<MutationOutcome> {
        let text = required(text, "Text")?;
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let outcome = match session
            .checklist
            .iter_mut()
            .find(|heading| heading.id == heading_id)
            .and_then(|heading| heading.items.iter_mut().find(|item| item.id == item_id))
        {
            Some(item) => {
                item.text = text;
                MutationOutcome::Applied
            }
            None => MutationOutcome::TargetMissing,
        };
        self.store.save_session(&session).await?;
        Ok(outcome)
    }

    /// Removes an item from a heading.
    pub async fn delete_item(
        &self,
        heading_id: u64,
        item_id: u64,
    ) -> ChecklistResult<MutationOutcome> {
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let outcome = match session
            .checklist
            .iter_mut()
            .find(|heading| heading.id == heading_id)
        {
            Some(heading) => {
                let before = heading.items.len();
                heading.items.retain(|item| item.id != item_id);
                if heading.items.len() < before {
                    MutationOutcome::Applied
                } else {
                    MutationOutcome::TargetMissing
                }
            }
            None => MutationOutcome::TargetMissing,
        };
        self.store.save_session(&session).await?;
        Ok(outcome)
    }

    /// Appends a new note, stamped with the creation time.
    pub async fn add_note(&self, text: &str) -> ChecklistResult<Note> {
        let text = required(text, "Text")?;
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let note = Note {
            id: next_id(session.notes.iter().map(|n| n.id)),
            text,
            created_at: timestamp(),
        };
        session.notes.push(note.clone());
        self.store.save_session(&session).await?;
        Ok(note)
    }

    /// Replaces a note's text. `created_at` is never touched.
    pub async fn edit_note(&self, id: u64, text: &str) -> ChecklistResult<MutationOutcome> {
        let text = required(text, "Text")?;
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let outcome = match session.notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                note.text = text;
                MutationOutcome::Applied
            }
            None => MutationOutcome::TargetMissing,
        };
        self.store.save_session(&session).await?;
        Ok(outcome)
    }

    /// Removes a note by id.
    pub async fn delete_note(&self, id: u64) -> ChecklistResult<MutationOutcome> {
        let _guard = self.lock.lock().await;
        let mut session = self.load_or_heal().await?;
        let before = session.notes.len();
        session.notes.retain(|note| note.id != id);
        let outcome = if session.notes.len() < before {
            MutationOutcome::Applied
        } else {
            MutationOutcome::TargetMissing
        };
        self.store.save_session(&session).await?;
        Ok(outcome)
    }

    /// Archives the current session and replaces it with a fresh one.
    ///
    /// Requires a non-empty target website; the end date defaults to today.
    /// The archive entry is persisted first, then the reset session. If the
    /// session save fails after the archive save succeeded there is no
    /// rollback: the entry stays archived, the session keeps its old
    /// content, and the error is reported so the caller can re-attempt the
    /// reset.
    pub async fn complete(&self, end_date: Option<String>) -> ChecklistResult<CompletionOutcome> {
        let _guard = self.lock.lock().await;
        let session = self.load_or_heal().await?;
        if session.target_website.is_empty() {
            return Err(ChecklistError::Validation(
                "Target website is required".to_string(),
            ));
        }

        let entry = self
            .history
            .append(session, end_date.unwrap_or_else(today), timestamp())
            .await?;

        let fresh = self.fresh_session().await;
        self.store.save_session(&fresh).await?;
        Ok(CompletionOutcome {
            entry,
            session: fresh,
        })
    }

    /// Discards the current session unconditionally. Nothing is archived.
    pub async fn reset(&self) -> ChecklistResult<Session> {
        let _guard = self.lock.lock().await;
        let fresh = self.fresh_session().await;
        self.store.save_session(&fresh).await?;
        Ok(fresh)
    }

    /// Loads the stored session, healing it when absent. The healed document
    /// is persisted before it is returned so that a subsequent read observes
    /// the same state.
    async fn load_or_heal(&self) -> ChecklistResult<Session> {
        if let Some(session) = self.store.load_session().await {
            return Ok(session);
        }
        warn!("session document absent, rebuilding from defaults");
        let healed = self.fresh_session().await;
        self.store.save_session(&healed).await?;
        Ok(healed)
    }

    /// A blank session seeded with a fresh template load.
    async fn fresh_session(&self) -> Session {
        Session::with_checklist(self.templates.load_default_checklist().await)
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

/// Trims the value and rejects it when nothing remains.
fn required(value: &str, field: &str) -> ChecklistResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ChecklistError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Next id for a sequence: one past the highest existing id, starting at 1.
/// Gaps left by deletions are never refilled.
fn next_id(ids: impl Iterator<Item = u64>) -> u64 {
    ids.max().unwrap_or(0) + 1
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

//=========================================================================================
// Tests
//=========================================================================================
