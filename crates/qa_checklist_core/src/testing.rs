//! crates/qa_checklist_core/src/testing.rs
//!
//! In-memory port implementations and fixtures shared by the manager tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{CompletedEntry, Heading, Item, Session};
use crate::history::HistoryManager;
use crate::ports::{PortError, PortResult, StorageService, TemplateService};
use crate::session::SessionManager;

/// A `StorageService` over plain mutexed state. `None` models an absent or
/// corrupt document; the failure flags make the next saves return errors.
#[derive(Default)]
pub struct MemoryStore {
    pub session: Mutex<Option<Session>>,
    pub history: Mutex<Option<Vec<CompletedEntry>>>,
    session_saves_fail: AtomicBool,
    history_saves_fail: AtomicBool,
}

impl MemoryStore {
    pub fn fail_session_saves(&self) {
        self.session_saves_fail.store(true, Ordering::SeqCst);
    }

    pub fn fail_history_saves(&self) {
        self.history_saves_fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageService for MemoryStore {
    async fn load_session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    async fn save_session(&self, session: &Session) -> PortResult<()> {
        if self.session_saves_fail.load(Ordering::SeqCst) {
            return Err(PortError::Write("injected session write failure".into()));
        }
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn load_history(&self) -> Option<Vec<CompletedEntry>> {
        self.history.lock().unwrap().clone()
    }

    async fn save_history(&self, entries: &[CompletedEntry]) -> PortResult<()> {
        if self.history_saves_fail.load(Ordering::SeqCst) {
            return Err(PortError::Write("injected history write failure".into()));
        }
        *self.history.lock().unwrap() = Some(entries.to_vec());
        Ok(())
    }
}

/// A `TemplateService` that clones whatever checklist the test last set,
/// so tests can observe that resets re-read the template.
#[derive(Default)]
pub struct FixedTemplates {
    checklist: Mutex<Vec<Heading>>,
}

impl FixedTemplates {
    pub fn set(&self, checklist: Vec<Heading>) {
        *self.checklist.lock().unwrap() = checklist;
    }
}

#[async_trait]
impl TemplateService for FixedTemplates {
    async fn load_default_checklist(&self) -> Vec<Heading> {
        self.checklist.lock().unwrap().clone()
    }
}

/// Both managers wired over one in-memory store.
pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub templates: Arc<FixedTemplates>,
    pub history: Arc<HistoryManager>,
    pub sessions: SessionManager,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let templates = Arc::new(FixedTemplates::default());
        let history = Arc::new(HistoryManager::new(store.clone()));
        let sessions = SessionManager::new(store.clone(), templates.clone(), history.clone());
        Self {
            store,
            templates,
            history,
            sessions,
        }
    }

    pub fn set_template(&self, checklist: Vec<Heading>) {
        self.templates.set(checklist);
    }

    pub fn store_session(&self, session: Session) {
        *self.store.session.lock().unwrap() = Some(session);
    }

    pub fn stored_session(&self) -> Option<Session> {
        self.store.session.lock().unwrap().clone()
    }
}

pub fn heading(id: u64, title: &str, items: Vec<Item>) -> Heading {
    Heading {
        id,
        title: title.to_string(),
        items,
    }
}

pub fn item(id: u64, text: &str) -> Item {
    Item {
        id,
        text: text.to_string(),
        checked: false,
    }
}
