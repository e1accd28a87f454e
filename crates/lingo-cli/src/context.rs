//! Wiring of the file-system and HTTP adapters for one CLI invocation.

use anyhow::{Context, Result};
use lingo_core::clock::{Clock, SystemClock};
use lingo_core::host::DeviceIdProvider;
use lingo_core::session::SessionManager;
use lingo_core::TranslatorConfig;
use lingo_infrastructure::{ConfigService, FileDeviceIdProvider, LingoPaths, TomlSessionStore};
use lingo_interaction::BackendClient;
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppContext {
    pub paths: LingoPaths,
    pub config_service: ConfigService,
    pub config: TranslatorConfig,
    pub backend: Arc<BackendClient>,
    pub session: Arc<SessionManager>,
}

impl AppContext {
    /// Loads configuration and builds the backend client and session manager.
    pub fn load(data_dir: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self> {
        let paths = LingoPaths::new(data_dir);
        let config_service = match config_path {
            Some(path) => ConfigService::with_path(path),
            None => ConfigService::new(&paths).context("Failed to resolve config path")?,
        };
        let config = config_service
            .get_config()
            .context("Failed to load configuration")?;

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let backend = Arc::new(BackendClient::from_config(&config, clock.clone()));

        let store = TomlSessionStore::new(&paths, &config.origin)
            .context("Failed to resolve session storage")?;
        let device_id = FileDeviceIdProvider::new(&paths)
            .and_then(|provider| provider.device_id())
            .context("Failed to resolve device id")?;

        let session = Arc::new(SessionManager::new(
            Arc::new(store),
            backend.clone(),
            clock,
            device_id,
        ));

        tracing::debug!(
            api = %config.api_base_url,
            origin = %config.origin,
            "[Cli] Context loaded"
        );

        Ok(Self {
            paths,
            config_service,
            config,
            backend,
            session,
        })
    }
}
