//! JSON file session store.
//!
//! Persists the session as a flat JSON object so it survives process
//! restarts. Each write replaces the file through a uniquely named temporary
//! sibling and a rename, so a crash never leaves a half-written session
//! behind and concurrent processes never clobber each other's temp file.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use super::SessionStore;
use crate::AuthResult;
use crate::error::AuthError;

type Entries = BTreeMap<String, String>;

/// Session store persisted to a single JSON file.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> AuthResult<Entries> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Entries::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                AuthError::storage(format!(
                    "corrupt session file {}: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(AuthError::storage(format!(
                "failed to read {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn write_entries(&self, entries: &Entries) -> AuthResult<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => parent.to_path_buf(),
            None => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AuthError::storage(format!("failed to create {}: {e}", dir.display())))?;

        let content = serde_json::to_string_pretty(entries)?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&dir, &path, content.as_bytes()))
            .await
            .map_err(|e| AuthError::unexpected(format!("session writer panicked: {e}")))?
    }
}

/// Writes `content` to a uniquely named sibling and renames it over `path`.
/// Concurrent writers never share a temporary file, so the last rename wins.
fn replace_file(dir: &Path, path: &Path, content: &[u8]) -> AuthResult<()> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        AuthError::storage(format!("failed to create temp file in {}: {e}", dir.display()))
    })?;
    tmp.write_all(content)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| AuthError::storage(format!("failed to write {}: {e}", tmp.path().display())))?;
    tmp.persist(path)
        .map_err(|e| AuthError::storage(format!("failed to replace {}: {}", path.display(), e.error)))?;
    Ok(())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> AuthResult<Option<String>> {
        let entries = self.read_entries().await?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AuthResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> AuthResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_entries().await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries).await
    }
}
