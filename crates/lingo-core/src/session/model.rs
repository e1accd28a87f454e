use serde::{Deserialize, Serialize};

/// The authorization state shared by every component.
///
/// Only `SessionManager` creates or mutates sessions; everyone else works on
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub expires_at_ms: Option<i64>,
    pub device_id: String,
}

impl Session {
    /// A session with no credentials.
    pub fn unauthorized(device_id: impl Into<String>) -> Self {
        Self {
            token: None,
            expires_at_ms: None,
            device_id: device_id.into(),
        }
    }

    pub fn authorized(
        token: impl Into<String>,
        expires_at_ms: i64,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            token: Some(token.into()),
            expires_at_ms: Some(expires_at_ms),
            device_id: device_id.into(),
        }
    }

    /// True iff a token is held and its expiry lies after `now_ms`.
    pub fn is_authorized_at(&self, now_ms: i64) -> bool {
        match (&self.token, self.expires_at_ms) {
            (Some(token), Some(expires)) => !token.is_empty() && expires > now_ms,
            _ => false,
        }
    }

    /// Holds credentials that are no longer valid at `now_ms`.
    pub fn is_stale_at(&self, now_ms: i64) -> bool {
        self.token.is_some() && !self.is_authorized_at(now_ms)
    }

    /// Remaining validity in whole minutes, `None` when not authorized.
    pub fn remaining_minutes_at(&self, now_ms: i64) -> Option<i64> {
        if !self.is_authorized_at(now_ms) {
            return None;
        }
        self.expires_at_ms.map(|expires| (expires - now_ms) / 60_000)
    }
}

/// The two scalars kept in durable per-origin storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredCredentials {
    pub token: Option<String>,
    pub expires_at_ms: Option<i64>,
}

impl StoredCredentials {
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.expires_at_ms.is_none()
    }
}

/// Shortens a token for log output.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}***")
}
