//! services/api/src/adapters/template.rs
//!
//! File-backed implementation of the `TemplateService` port. The default
//! checklist lives in a standalone JSON file (an array of headings) that the
//! operator can edit while the service runs; every load re-reads it so the
//! next reset or completion picks the edits up.

use std::path::PathBuf;

use async_trait::async_trait;
use qa_checklist_core::domain::Heading;
use qa_checklist_core::ports::TemplateService;
use tracing::warn;

/// Loads the default checklist from a JSON file, degrading to an empty
/// checklist when the file is missing or unparsable. The service stays
/// usable without a template; sessions just start empty.
pub struct JsonTemplateSource {
    path: PathBuf,
}

impl JsonTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TemplateService for JsonTemplateSource {
    async fn load_default_checklist(&self) -> Vec<Heading> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(
                    "default checklist template not readable at {}: {}",
                    self.path.display(),
                    err
                );
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(checklist) => checklist,
            Err(err) => {
                warn!(
                    "default checklist template at {} is not valid ({}), using an empty checklist",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_template_degrades_to_an_empty_checklist() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonTemplateSource::new(dir.path().join("default_checklist.json"));
        assert!(source.load_default_checklist().await.is_empty());
    }

    #[tokio::test]
    async fn unparsable_template_degrades_to_an_empty_checklist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default_checklist.json");
        std::fs::write(&path, "not json at all").unwrap();
        assert!(JsonTemplateSource::new(&path).load_default_checklist().await.is_empty());
    }

    #[tokio::test]
    async fn valid_template_parses_headings_and_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default_checklist.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "title": "Functional", "items": [
                    {"id": 1, "text": "All links work", "checked": false},
                    {"id": 2, "text": "Forms submit"}
                ]}
            ]"#,
        )
        .unwrap();

        let checklist = JsonTemplateSource::new(&path).load_default_checklist().await;
        assert_eq!(checklist.len(), 1);
        assert_eq!(checklist[0].title, "Functional");
        assert_eq!(checklist[0].items.len(), 2);
        // "checked" may be omitted in the template; it defaults to false.
        assert!(!checklist[0].items[1].checked);
    }

    #[tokio::test]
    async fn every_load_rereads_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default_checklist.json");
        let source = JsonTemplateSource::new(&path);

        std::fs::write(&path, r#"[{"id": 1, "title": "First", "items": []}]"#).unwrap();
        assert_eq!(source.load_default_checklist().await[0].title, "First");

        std::fs::write(&path, r#"[{"id": 1, "title": "Second", "items": []}]"#).unwrap();
        assert_eq!(source.load_default_checklist().await[0].title, "Second");
    }
}
