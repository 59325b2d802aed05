//! crates/qa_checklist_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of where the documents actually live (JSON files in
//! the shipped service, plain memory in the tests).

use async_trait::async_trait;

use crate::domain::{CompletedEntry, Heading, Session};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// Reads never produce one of these: a document that is missing, empty, or
/// unreadable is reported as absent (`None`), with no distinction between the
/// three. Only writes can fail.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("storage write failed: {0}")]
    Write(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Storage for the two persistent documents: the current session and the
/// completed-session archive.
///
/// Callers must treat a load-mutate-save sequence as one logical transaction;
/// the managers serialize those cycles behind per-document locks. The store
/// itself does no locking.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Loads the current session, or `None` when the document is absent.
    async fn load_session(&self) -> Option<Session>;

    /// Replaces the current session document. A successful save must leave
    /// no observable partial-write state.
    async fn save_session(&self, session: &Session) -> PortResult<()>;

    /// Loads the archive, or `None` when the document is absent.
    async fn load_history(&self) -> Option<Vec<CompletedEntry>>;

    /// Replaces the archive document.
    async fn save_history(&self, entries: &[CompletedEntry]) -> PortResult<()>;
}

/// Source of the default checklist used to seed and reset sessions.
#[async_trait]
pub trait TemplateService: Send + Sync {
    /// Loads the default checklist template.
    ///
    /// The backing resource is read on every call, never cached, so edits to
    /// the template take effect on the next reset or completion. A missing or
    /// unparsable template degrades to an empty checklist rather than failing
    /// the caller.
    async fn load_default_checklist(&self) -> Vec<Heading>;
}
