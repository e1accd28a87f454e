//! File-backed device identifier.

use crate::paths::LingoPaths;
use lingo_core::error::{LingoError, Result};
use lingo_core::host::DeviceIdProvider;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Generates a UUID v4 on first use and keeps it in `device_id`.
///
/// Stands in for a hardware-derived identifier; hosts with access to one
/// implement [`DeviceIdProvider`] directly.
#[derive(Debug)]
pub struct FileDeviceIdProvider {
    path: PathBuf,
    cached: OnceLock<String>,
}

impl FileDeviceIdProvider {
    pub fn new(paths: &LingoPaths) -> Result<Self> {
        Ok(Self::with_path(paths.device_id_file()?))
    }

    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path,
            cached: OnceLock::new(),
        }
    }

    fn load_or_create(&self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if !content.trim().is_empty() => return Ok(content.trim().to_string()),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let id = uuid::Uuid::new_v4().to_string();
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, &id)
            .map_err(|e| LingoError::storage(format!("Failed to write device id: {}", e)))?;
        tracing::info!(path = %self.path.display(), "[Device] Generated new device id");
        Ok(id)
    }
}

impl DeviceIdProvider for FileDeviceIdProvider {
    fn device_id(&self) -> Result<String> {
        if let Some(id) = self.cached.get() {
            return Ok(id.clone());
        }
        let id = self.load_or_create()?;
        Ok(self.cached.get_or_init(|| id).clone())
    }
}
