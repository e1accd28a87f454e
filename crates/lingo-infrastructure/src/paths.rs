//! Unified path management for lingo files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/lingo/                  # Config directory
//! ├── config.toml                   # TranslatorConfig
//! ├── device_id                     # Generated device identifier
//! ├── storage/                      # Durable per-origin storage
//! │   └── https_web.telegram.org.toml
//! └── logs/                         # Application logs
//!     └── lingo.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "lingo";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for lingo_core::LingoError {
    fn from(err: PathError) -> Self {
        lingo_core::LingoError::config(err.to_string())
    }
}

/// Resolves every path lingo reads or writes.
///
/// `base` overrides the platform config directory (tests, portable installs).
#[derive(Debug, Clone, Default)]
pub struct LingoPaths {
    base: Option<PathBuf>,
}

impl LingoPaths {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }

    /// Returns the lingo configuration directory (e.g. `~/.config/lingo/`).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::ConfigDirNotFound)
    }

    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    pub fn storage_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("storage"))
    }

    /// Durable storage file for one origin.
    pub fn origin_storage_file(&self, origin: &str) -> Result<PathBuf, PathError> {
        Ok(self.storage_dir()?.join(format!("{}.toml", origin_slug(origin))))
    }

    pub fn device_id_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("device_id"))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

/// File-name-safe form of an origin such as `https://web.telegram.org`.
pub fn origin_slug(origin: &str) -> String {
    let trimmed = origin.trim().trim_end_matches('/');
    let without_scheme_sep = trimmed.replacen("://", "_", 1);
    let slug: String = without_scheme_sep
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if slug.is_empty() {
        "default".to_string()
    } else {
        slug
    }
}
