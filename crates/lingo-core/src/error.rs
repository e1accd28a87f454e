//! Error types for the Lingo translator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for storage, configuration and host plumbing.
///
/// Translation and activation failures have their own enums below because
/// callers branch on them; everything else funnels through `LingoError`.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum LingoError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Durable storage error (session store, device id file)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON"
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host page rejected or could not perform an operation
    #[error("Host error: {0}")]
    Host(String),

    /// An auxiliary backend call (health, status, languages) failed
    #[error("Backend error: {0}")]
    Backend(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LingoError {
    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Host error
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }

    /// Creates a Backend error
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a storage error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Io { .. })
    }
}

impl From<std::io::Error> for LingoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for LingoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for LingoError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for LingoError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Failure of an activation-code exchange.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationError {
    /// The backend refused the code; carries the server-supplied message.
    #[error("activation rejected: {0}")]
    Rejected(String),

    /// The request never produced a readable answer.
    #[error("activation request failed: {0}")]
    Network(String),
}

/// Failure of a single translation request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Called without an authorized session; nothing was sent.
    #[error("no authorized session")]
    Unauthenticated,

    /// The backend answered 401. The session must be invalidated.
    #[error("backend rejected the session token")]
    Unauthorized,

    /// Non-2xx status, timeout or transport failure.
    #[error("translation request failed: {0}")]
    Network(String),

    /// 2xx, but the backend flagged failure or returned no text.
    #[error("backend returned no translation")]
    Empty,
}

impl TranslateError {
    /// Only `Unauthorized` forces a global state change.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

/// A type alias for `Result<T, LingoError>`.
pub type Result<T> = std::result::Result<T, LingoError>;
