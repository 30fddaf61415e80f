//! JSON file document backend.

use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tracing::{debug, warn};

use gatehouse_core::error::{AppError, ErrorKind};
use gatehouse_core::result::AppResult;
use gatehouse_core::traits::document::{Document, DocumentStore};

/// Stores a table as a single JSON object on disk.
///
/// Every save writes a sibling temporary file and renames it over the
/// target, so readers never observe a half-written document. A document
/// that does not parse is moved aside to `<name>.corrupt` before the store
/// starts empty, so the next save cannot destroy it.
pub struct JsonFileStore<V> {
    path: PathBuf,
    _marker: PhantomData<fn() -> V>,
}

impl<V> JsonFileStore<V> {
    /// Create a backend for the document at `path`. Nothing is touched on
    /// disk until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    fn sibling_path(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling_path(".tmp")
    }

    fn corrupt_path(&self) -> PathBuf {
        self.sibling_path(".corrupt")
    }

    async fn ensure_parent(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

impl<V> std::fmt::Debug for JsonFileStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish()
    }
}

#[async_trait]
impl<V> DocumentStore<V> for JsonFileStore<V>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self) -> AppResult<Document<V>> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Document does not exist yet, starting empty");
                return Ok(Document::new());
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read {}", self.path.display()),
                    e,
                ));
            }
        };

        match serde_json::from_slice(&raw) {
            Ok(document) => Ok(document),
            Err(e) => {
                let preserved = self.corrupt_path();
                fs::rename(&self.path, &preserved).await.map_err(|io| {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!(
                            "{} is unreadable ({e}) and could not be moved aside",
                            self.path.display()
                        ),
                        io,
                    )
                })?;
                warn!(
                    path = %self.path.display(),
                    preserved = %preserved.display(),
                    error = %e,
                    "Document is not valid JSON, moved aside and starting empty"
                );
                Ok(Document::new())
            }
        }
    }

    async fn save(&self, document: &Document<V>) -> AppResult<()> {
        self.ensure_parent().await?;

        let body = serde_json::to_vec_pretty(document)?;
        let temp = self.temp_path();

        fs::write(&temp, &body).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write {}", temp.display()),
                e,
            )
        })?;

        fs::rename(&temp, &self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to replace {}", self.path.display()),
                e,
            )
        })?;

        debug!(path = %self.path.display(), entries = document.len(), "Document saved");
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<String>::new(dir.path().join("users.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/sessions.json");
        let store = JsonFileStore::<u32>::new(&path);

        let mut doc = Document::new();
        doc.insert("a".to_string(), 1);
        doc.insert("b".to_string(), 2);
        store.save(&doc).await.unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<u32>::new(dir.path().join("doc.json"));

        let mut doc = Document::new();
        doc.insert("a".to_string(), 1);
        store.save(&doc).await.unwrap();

        doc.remove("a");
        doc.insert("b".to_string(), 2);
        store.save(&doc).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get("b"), Some(&2));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::<String>::new(&path);
        assert!(store.load().await.unwrap().is_empty());

        let preserved = dir.path().join("users.json.corrupt");
        assert_eq!(std::fs::read_to_string(&preserved).unwrap(), "{ not json");
        assert!(!path.exists());

        let mut doc = Document::new();
        doc.insert("admin".to_string(), "seeded".to_string());
        store.save(&doc).await.unwrap();
        assert_eq!(std::fs::read_to_string(&preserved).unwrap(), "{ not json");
        assert_eq!(store.load().await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_wrong_shape_is_moved_aside() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        std::fs::write(&path, r#"{"a": "not a number"}"#).unwrap();

        let store = JsonFileStore::<u32>::new(&path);
        assert!(store.load().await.unwrap().is_empty());
        assert!(dir.path().join("doc.json.corrupt").exists());
    }

    #[tokio::test]
    async fn test_unwritable_location_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();

        let store = JsonFileStore::<u32>::new(blocker.join("doc.json"));
        let err = store.save(&Document::new()).await.unwrap_err();
        assert!(err.is_storage());
    }
}
