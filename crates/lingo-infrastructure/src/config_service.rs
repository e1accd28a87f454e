//! Configuration service.
//!
//! Loads `TranslatorConfig` from `~/.config/lingo/config.toml`, caches it, and
//! applies environment overrides on top.

use crate::paths::LingoPaths;
use lingo_core::config::TranslatorConfig;
use lingo_core::error::{LingoError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

pub const ENV_API_BASE_URL: &str = "LINGO_API_BASE_URL";
pub const ENV_ORIGIN: &str = "LINGO_ORIGIN";

/// Configuration service that loads and caches the translator configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    config: Arc<RwLock<Option<TranslatorConfig>>>,
}

impl ConfigService {
    pub fn new(paths: &LingoPaths) -> Result<Self> {
        Ok(Self::with_path(paths.config_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the configuration, loading from file on first access.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn get_config(&self) -> Result<TranslatorConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let mut loaded = Self::load_file(&self.path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut cached = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cached = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cached = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cached = None;
    }

    /// Writes a default `config.toml` unless one exists.
    pub fn ensure_config_file(&self) -> Result<PathBuf> {
        if self.path.exists() {
            return Ok(self.path.clone());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let template = toml::to_string_pretty(&TranslatorConfig::default())?;
        std::fs::write(&self.path, template)?;
        tracing::info!(path = %self.path.display(), "[Config] Wrote default configuration");
        Ok(self.path.clone())
    }

    fn load_file(path: &Path) -> Result<TranslatorConfig> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "[Config] No config file, using defaults");
                return Ok(TranslatorConfig::default());
            }
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&content).map_err(|e| {
            LingoError::config(format!("Invalid config at {}: {}", path.display(), e))
        })
    }
}

/// Applies `LINGO_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut TranslatorConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url.trim().trim_end_matches('/').to_string();
    }
    if let Some(origin) = lookup(ENV_ORIGIN).filter(|v| !v.trim().is_empty()) {
        config.origin = origin.trim().to_string();
    }
}
