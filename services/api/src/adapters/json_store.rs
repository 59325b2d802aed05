//! services/api/src/adapters/json_store.rs
//!
//! File-backed implementation of the `StorageService` port. Each document is
//! one pretty-printed JSON file under the data directory:
//! `current_session.json` for the in-progress session and `completed.json`
//! for the archive.
//!
//! A file that is missing, empty, whitespace-only, or not valid JSON loads
//! as absent; the managers heal from there. Saves go through a sibling
//! temporary file and a rename, so a successful save never leaves a
//! partially written document behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use qa_checklist_core::domain::{CompletedEntry, Session};
use qa_checklist_core::ports::{PortError, PortResult, StorageService};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

pub const SESSION_FILE: &str = "current_session.json";
pub const HISTORY_FILE: &str = "completed.json";

/// A `StorageService` over two JSON files in one data directory.
#[derive(Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    /// Reads one document. Absence, emptiness, and parse failures all map to
    /// `None`; the distinction is logged but not surfaced.
    async fn read_document<T: DeserializeOwned>(path: &Path) -> Option<T> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    warn!("failed to read {}: {}", path.display(), err);
                }
                return None;
            }
        };
        if raw.trim().is_empty() {
            warn!("{} is empty, treating as absent", path.display());
            return None;
        }
        match serde_json::from_str(&raw) {
            Ok(document) => Some(document),
            Err(err) => {
                warn!("{} is not valid JSON ({}), treating as absent", path.display(), err);
                None
            }
        }
    }

    /// Serializes the document next to its destination and renames it into
    /// place, so readers observe either the old document or the new one.
    async fn write_document<T: Serialize>(path: &Path, document: &T) -> PortResult<()> {
        let json =
            serde_json::to_string_pretty(document).map_err(|err| PortError::Write(err.to_string()))?;
        let staging = path.with_extension("json.tmp");
        if let Err(err) = tokio::fs::write(&staging, json.as_bytes()).await {
            error!("failed to write {}: {}", staging.display(), err);
            return Err(PortError::Write(err.to_string()));
        }
        if let Err(err) = tokio::fs::rename(&staging, path).await {
            error!("failed to replace {}: {}", path.display(), err);
            return Err(PortError::Write(err.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageService for JsonFileStore {
    async fn load_session(&self) -> Option<Session> {
        Self::read_document(&self.session_path()).await
    }

    async fn save_session(&self, session: &Session) -> PortResult<()> {
        Self::write_document(&self.session_path(), session).await
    }

    async fn load_history(&self) -> Option<Vec<CompletedEntry>> {
        Self::read_document(&self.history_path()).await
    }

    async fn save_history(&self, entries: &[CompletedEntry]) -> PortResult<()> {
        Self::write_document(&self.history_path(), &entries).await
    }
}
