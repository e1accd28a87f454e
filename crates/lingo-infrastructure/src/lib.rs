//! File-system adapters for lingo: paths, configuration, durable session
//! storage and the device identifier.

pub mod config_service;
pub mod device_id;
pub mod paths;
pub mod storage;
pub mod toml_session_store;

pub use crate::config_service::ConfigService;
pub use crate::device_id::FileDeviceIdProvider;
pub use crate::paths::LingoPaths;
pub use crate::toml_session_store::TomlSessionStore;
