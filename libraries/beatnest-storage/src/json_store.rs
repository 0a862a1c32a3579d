//! File-backed document store
//!
//! One pretty-printed JSON file per document under a root directory. Writes
//! go to a sibling temp file that is renamed into place, so a crash mid-write
//! leaves the previous document intact.

use async_trait::async_trait;
use beatnest_core::{DocumentName, DocumentStore, PersistenceError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Document store writing JSON files under `root`
#[derive(Debug, Clone)]
pub struct JsonDocumentStore {
    root: PathBuf,
}

impl JsonDocumentStore {
    /// Create a store rooted at `root`
    ///
    /// The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a document's file
    pub fn path_of(&self, name: DocumentName) -> PathBuf {
        self.root.join(name.file_name())
    }
}

#[async_trait]
impl DocumentStore for JsonDocumentStore {
    async fn load(&self, name: DocumentName) -> Result<Option<serde_json::Value>, PersistenceError> {
        let path = self.path_of(name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No {} document at {}", name, path.display());
                return Ok(None);
            }
            Err(e) => return Err(PersistenceError::io(name, e)),
        };

        // Truncated by an external editor; same as never saved
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| PersistenceError::serialization(name, e))
    }

    async fn save(&self, name: DocumentName, value: serde_json::Value) -> Result<(), PersistenceError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PersistenceError::io(name, e))?;

        let json =
            serde_json::to_vec_pretty(&value).map_err(|e| PersistenceError::serialization(name, e))?;

        let path = self.path_of(name);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| PersistenceError::io(name, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| PersistenceError::io(name, e))?;

        tracing::debug!("Saved {} ({} bytes)", name, json.len());
        Ok(())
    }
}
