//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use qa_checklist_core::ChecklistError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from the checklist core,
    /// e.g. while seeding the data files at startup.
    #[error("Checklist error: {0}")]
    Checklist(#[from] ChecklistError),

    /// Represents a standard Input/Output error (e.g., binding to a network
    /// socket or creating the data directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
