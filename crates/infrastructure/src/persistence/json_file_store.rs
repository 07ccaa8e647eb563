//! JSON file key-value store
//!
//! All keys live in one JSON object on disk, each value kept as the raw
//! string the caller stored. Every write replaces the file through a
//! temporary sibling, flushed to disk and renamed over the original, so a
//! crash never leaves a torn document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use application::error::ApplicationError;
use application::ports::KeyValueStorePort;
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Key-value store persisted as a single JSON document
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`
    ///
    /// A missing file starts empty. A file that is not a JSON object of
    /// strings is logged and treated as empty; it is overwritten on the next
    /// write.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the file exists but cannot be read.
    #[instrument(skip_all)]
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ApplicationError> {
        let path = path.into();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(content) => parse_document(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No data file yet");
                BTreeMap::new()
            },
            Err(e) => {
                return Err(ApplicationError::Storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            },
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the data file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, entries: &BTreeMap<String, String>) -> Result<(), ApplicationError> {
        let document = serde_json::to_string_pretty(entries)
            .map_err(|e| ApplicationError::Internal(format!("Serialization error: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error("create directory for", &self.path, &e))?;
        }

        let temp = self.temp_path();
        let mut file = tokio::fs::File::create(&temp)
            .await
            .map_err(|e| storage_error("create", &temp, &e))?;
        file.write_all(document.as_bytes())
            .await
            .map_err(|e| storage_error("write", &temp, &e))?;
        file.sync_all()
            .await
            .map_err(|e| storage_error("flush", &temp, &e))?;
        drop(file);

        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| storage_error("replace", &self.path, &e))?;

        debug!(path = %self.path.display(), keys = entries.len(), "Data file written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn parse_document(content: &str, path: &Path) -> BTreeMap<String, String> {
    if content.trim().is_empty() {
        return BTreeMap::new();
    }
    serde_json::from_str(content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Ignoring malformed data file");
        BTreeMap::new()
    })
}

fn storage_error(action: &str, path: &Path, e: &std::io::Error) -> ApplicationError {
    ApplicationError::Storage(format!("Failed to {action} {}: {e}", path.display()))
}

#[async_trait]
impl KeyValueStorePort for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ApplicationError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ApplicationError> {
        let mut entries = self.entries.lock().await;
        let mut next = entries.clone();
        next.insert(key.to_string(), value);
        self.write(&next).await?;
        *entries = next;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), ApplicationError> {
        let mut entries = self.entries.lock().await;
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.write(&next).await?;
        *entries = next;
        Ok(())
    }
}
