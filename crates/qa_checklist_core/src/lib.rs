pub mod domain;
pub mod error;
pub mod history;
pub mod ports;
pub mod session;

#[cfg(test)]
mod testing;

pub use domain::{CompletedEntry, Heading, Item, Note, Session};
pub use error::{ChecklistError, ChecklistResult, MutationOutcome};
pub use history::HistoryManager;
pub use ports::{PortError, PortResult, StorageService, TemplateService};
pub use session::{CompletionOutcome, SessionInfoUpdate, SessionManager};
