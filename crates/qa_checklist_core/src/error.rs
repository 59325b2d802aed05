//! crates/qa_checklist_core/src/error.rs
//!
//! The error taxonomy for checklist operations, plus the non-error outcome
//! reported by mutations that locate their target by id.

use crate::ports::PortError;

/// The primary error type for session and history operations.
#[derive(Debug, thiserror::Error)]
pub enum ChecklistError {
    /// A required field was empty or whitespace-only. Maps to 400 at the
    /// API boundary.
    #[error("{0}")]
    Validation(String),

    /// The archive document was absent and could not be re-initialized.
    /// Unlike the session, history has no template to regenerate from.
    #[error("History storage is unavailable")]
    HistoryUnavailable,

    /// A storage write failed. The in-memory change is lost; the caller
    /// sees the document as it was before the operation.
    #[error(transparent)]
    Store(#[from] PortError),
}

/// A convenience type alias for `Result<T, ChecklistError>`.
pub type ChecklistResult<T> = Result<T, ChecklistError>;

/// The result of a mutation that locates its target by id.
///
/// A missing id is not an error: the document is saved unchanged and the
/// operation still succeeds. The managers report which of the two happened
/// and leave the response policy to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The target was found and the change applied.
    Applied,
    /// No element with the given id exists; the document was not altered.
    TargetMissing,
}

impl MutationOutcome {
    pub fn applied(self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}
