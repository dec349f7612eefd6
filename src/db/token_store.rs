// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable key-value slot for the persisted access token.
//!
//! Values live in a small JSON object on disk (`auth.json`), written with
//! owner-only permissions on unix. The in-memory backend is used by tests
//! and by the shell when no data directory can be created.

use crate::db::keys;
use crate::error::AuthError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

type Entries = BTreeMap<String, String>;

#[derive(Clone)]
enum Backend {
    File(PathBuf),
    Memory(Arc<Mutex<Entries>>),
}

/// Key-value token storage.
#[derive(Clone)]
pub struct TokenStore {
    backend: Backend,
}

impl TokenStore {
    /// File-backed store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::File(path.into()),
        }
    }

    /// In-memory store (offline / tests).
    pub fn new_mock() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(Mutex::new(Entries::new()))),
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, AuthError> {
        match &self.backend {
            Backend::Memory(entries) => Ok(entries.lock().await.get(key).cloned()),
            Backend::File(path) => Ok(read_entries(path).await?.remove(key)),
        }
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        match &self.backend {
            Backend::Memory(entries) => {
                entries.lock().await.insert(key.to_string(), value.to_string());
                Ok(())
            }
            Backend::File(path) => {
                let mut entries = read_entries(path).await?;
                entries.insert(key.to_string(), value.to_string());
                write_entries(path, &entries).await
            }
        }
    }

    /// Remove a key. Removing an absent key is not an error.
    pub async fn remove(&self, key: &str) -> Result<(), AuthError> {
        match &self.backend {
            Backend::Memory(entries) => {
                entries.lock().await.remove(key);
                Ok(())
            }
            Backend::File(path) => {
                let mut entries = read_entries(path).await?;
                if entries.remove(key).is_none() {
                    return Ok(());
                }
                write_entries(path, &entries).await
            }
        }
    }

    // --- Auth token slot ---

    pub async fn load_token(&self) -> Result<Option<String>, AuthError> {
        Ok(self
            .get(keys::AUTH_TOKEN)
            .await?
            .filter(|token| !token.is_empty()))
    }

    pub async fn save_token(&self, token: &str) -> Result<(), AuthError> {
        self.set(keys::AUTH_TOKEN, token).await
    }

    pub async fn delete_token(&self) -> Result<(), AuthError> {
        self.remove(keys::AUTH_TOKEN).await
    }
}

async fn read_entries(path: &Path) -> Result<Entries, AuthError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
        Err(e) => {
            return Err(AuthError::Persistence(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    if contents.trim().is_empty() {
        return Ok(Entries::new());
    }

    serde_json::from_str(&contents).map_err(|e| {
        AuthError::Persistence(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Replace the file at `path` with `entries`.
///
/// Writes a sibling temp file and renames it over the target so a crash
/// never leaves a truncated store. The result is owner-only on unix even
/// when an older file had wider permissions.
async fn write_entries(path: &Path, entries: &Entries) -> Result<(), AuthError> {
    use tokio::io::AsyncWriteExt;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            AuthError::Persistence(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let contents = serde_json::to_string_pretty(entries)
        .map_err(|e| AuthError::Persistence(format!("Failed to serialize tokens: {}", e)))?;

    let tmp_path = path.with_extension("json.tmp");
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let written = async {
        let mut file = options.open(&tmp_path).await?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600)).await?;
        }
        file.write_all(contents.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp_path, path).await
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(AuthError::Persistence(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }

    tracing::debug!(path = %path.display(), "Token store written");
    Ok(())
}
