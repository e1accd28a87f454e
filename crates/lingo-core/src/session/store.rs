//! Durable per-origin credential storage port.

use super::model::StoredCredentials;
use crate::error::Result;
use async_trait::async_trait;

/// Persists the token/expiry pair across restarts.
///
/// Absence of either value means "unauthorized". Implementations should
/// treat unreadable content as absent rather than failing.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<StoredCredentials>;

    async fn save(&self, token: &str, expires_at_ms: i64) -> Result<()>;

    /// Removes both values. Clearing an empty store is a no-op.
    async fn clear(&self) -> Result<()>;
}
