//! Durable per-origin credential storage backed by a TOML file.
//!
//! Each origin gets its own key/value file, like browser local storage. The
//! session lives under two fixed keys; other keys in the file are preserved.

use crate::paths::LingoPaths;
use crate::storage::{AtomicTomlError, AtomicTomlFile};
use lingo_core::error::{LingoError, Result};
use lingo_core::session::{SessionStore, StoredCredentials};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

pub const STORAGE_KEY_TOKEN: &str = "translator_token";
pub const STORAGE_KEY_EXPIRE: &str = "translator_expire";

type OriginStorage = BTreeMap<String, toml::Value>;

/// [`SessionStore`] writing to `storage/<origin>.toml`.
#[derive(Clone)]
pub struct TomlSessionStore {
    file: Arc<AtomicTomlFile<OriginStorage>>,
}

impl TomlSessionStore {
    /// Creates a store for `origin` under the configured paths.
    pub fn new(paths: &LingoPaths, origin: &str) -> Result<Self> {
        Ok(Self::with_path(paths.origin_storage_file(origin)?))
    }

    /// Creates a store over an explicit file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    async fn blocking<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&AtomicTomlFile<OriginStorage>) -> std::result::Result<T, AtomicTomlError>
            + Send
            + 'static,
        T: Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || op(file.as_ref()))
            .await
            .map_err(|e| LingoError::internal(format!("Failed to join storage task: {}", e)))?
            .map_err(LingoError::from)
    }
}

fn read_credentials(storage: &OriginStorage) -> StoredCredentials {
    let token = storage
        .get(STORAGE_KEY_TOKEN)
        .and_then(|v| v.as_str())
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    // Older writers stored the expiry as a decimal string.
    let expires_at_ms = storage.get(STORAGE_KEY_EXPIRE).and_then(|v| match v {
        toml::Value::Integer(ms) => Some(*ms),
        toml::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    });

    StoredCredentials {
        token,
        expires_at_ms,
    }
}

#[async_trait::async_trait]
impl SessionStore for TomlSessionStore {
    async fn load(&self) -> Result<StoredCredentials> {
        let loaded = self.blocking(|file| Ok(file.load())).await?;
        match loaded {
            Ok(Some(storage)) => Ok(read_credentials(&storage)),
            Ok(None) => Ok(StoredCredentials::default()),
            Err(AtomicTomlError::TomlError(e)) => {
                tracing::warn!(error = %e, "[Storage] Unreadable origin storage, treating as empty");
                Ok(StoredCredentials::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, token: &str, expires_at_ms: i64) -> Result<()> {
        let token = token.to_string();
        self.blocking(move |file| {
            file.update(OriginStorage::new(), |storage| {
                storage.insert(STORAGE_KEY_TOKEN.to_string(), toml::Value::String(token));
                storage.insert(
                    STORAGE_KEY_EXPIRE.to_string(),
                    toml::Value::Integer(expires_at_ms),
                );
            })
        })
        .await?;
        tracing::debug!(expires_at_ms, "[Storage] Saved credentials");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.blocking(|file| {
            let mut storage = match file.load() {
                Ok(Some(storage)) => storage,
                Ok(None) => return Ok(()),
                // Corrupt content holds nothing worth keeping.
                Err(AtomicTomlError::TomlError(_)) => return file.remove(),
                Err(e) => return Err(e),
            };
            storage.remove(STORAGE_KEY_TOKEN);
            storage.remove(STORAGE_KEY_EXPIRE);
            if storage.is_empty() {
                file.remove()
            } else {
                file.save(&storage)
            }
        })
        .await?;
        tracing::debug!("[Storage] Cleared credentials");
        Ok(())
    }
}
