//! crates/qa_checklist_core/src/domain.rs
//!
//! Defines the core data structures for the application: the in-progress
//! session document and the completed-session archive entries. These structs
//! are exactly the on-disk JSON schema, so they carry serde derives but no
//! storage- or web-specific code.

use serde::{Deserialize, Serialize};

/// The single in-progress checklist document being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// The website under test. May be empty until the tester fills it in;
    /// completion requires it to be non-empty.
    pub target_website: String,
    /// Date the test run started, as entered by the tester. May be empty.
    pub start_date: String,
    pub checklist: Vec<Heading>,
    pub notes: Vec<Note>,
}

impl Session {
    /// A blank session around the given checklist.
    pub fn with_checklist(checklist: Vec<Heading>) -> Self {
        Self {
            target_website: String::new(),
            start_date: String::new(),
            checklist,
            notes: Vec::new(),
        }
    }
}

/// A named group of checklist items.
///
/// Heading ids are unique within the checklist and assigned as
/// max-existing-id + 1; an id is never reused after its heading is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub id: u64,
    pub title: String,
    pub items: Vec<Item>,
}

/// A checkable line within a heading. Item ids are scoped to their parent
/// heading, so two headings may each contain an item with id 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub checked: bool,
}

/// A freeform note attached to the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub text: String,
    /// Set once when the note is created, immutable thereafter.
    pub created_at: String,
}

/// An archived snapshot of a finished session.
///
/// The checklist and notes are full value copies taken at completion time,
/// so later edits to the (reset) session cannot alter an archived entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedEntry {
    pub id: u64,
    pub target_website: String,
    pub start_date: String,
    pub end_date: String,
    pub completed_at: String,
    pub checklist: Vec<Heading>,
    pub notes: Vec<Note>,
}
