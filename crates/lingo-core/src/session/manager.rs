use super::model::{Session, redact_token};
use super::store::SessionStore;
use crate::clock::Clock;
use crate::error::{ActivationError, Result};
use crate::translation::{ActivationGrant, ActivationRequest, ActivationService};
use std::sync::{Arc, RwLock};

/// Owns the authorization token, its expiry and the device identifier.
///
/// `SessionManager` is responsible for:
/// - Restoring credentials from durable storage on startup
/// - Exchanging activation codes for tokens
/// - Clearing credentials on expiry or when the backend rejects them
///
/// Other components read snapshots via [`SessionManager::current`] and
/// signal invalidation through [`SessionManager::invalidate`]; they never
/// write the session themselves. There is no background refresh: expiry is
/// checked lazily and the client never extends its own expiry.
pub struct SessionManager {
    current: RwLock<Session>,
    store: Arc<dyn SessionStore>,
    activation: Arc<dyn ActivationService>,
    clock: Arc<dyn Clock>,
}

impl SessionManager {
    /// Creates a manager holding an unauthorized session for `device_id`.
    ///
    /// Call [`SessionManager::restore`] to pick up stored credentials.
    pub fn new(
        store: Arc<dyn SessionStore>,
        activation: Arc<dyn ActivationService>,
        clock: Arc<dyn Clock>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            current: RwLock::new(Session::unauthorized(device_id)),
            store,
            activation,
            clock,
        }
    }

    /// Reads token and expiry from durable storage.
    ///
    /// If either is missing or the expiry is not in the future, storage is
    /// cleared and an unauthorized session is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or cleared.
    pub async fn restore(&self) -> Result<Session> {
        let stored = self.store.load().await?;
        let now = self.clock.now_ms();
        let device_id = self.device_id();

        let session = match (stored.token, stored.expires_at_ms) {
            (Some(token), Some(expires)) if expires > now && !token.is_empty() => {
                tracing::info!(
                    remaining_minutes = (expires - now) / 60_000,
                    "[Session] Restored stored authorization"
                );
                Session::authorized(token, expires, device_id)
            }
            (None, None) => {
                tracing::info!("[Session] No stored authorization found");
                Session::unauthorized(device_id)
            }
            _ => {
                tracing::info!("[Session] Stored authorization expired or incomplete, clearing");
                self.store.clear().await?;
                Session::unauthorized(device_id)
            }
        };

        self.replace(session.clone());
        Ok(session)
    }

    /// Exchanges an activation code for a token and persists it.
    ///
    /// On rejection or transport failure the current session and durable
    /// storage are left untouched.
    pub async fn activate(
        &self,
        code: &str,
        user_id: i64,
        device_id: &str,
    ) -> std::result::Result<Session, ActivationError> {
        let request = ActivationRequest {
            code: code.trim().to_string(),
            user_id,
            device_id: device_id.to_string(),
        };

        let grant = self.activation.activate(&request).await.inspect_err(|e| {
            tracing::warn!(user_id, error = %e, "[Session] Activation failed");
        })?;

        tracing::info!(
            user_id,
            token = %redact_token(&grant.token),
            expires_at_ms = grant.expires_at_ms,
            "[Session] Activation succeeded"
        );

        Ok(self.install_grant(grant, device_id).await)
    }

    /// Installs a grant obtained outside of `activate` (e.g. a status check).
    pub async fn adopt_grant(&self, grant: ActivationGrant) -> Session {
        let device_id = self.device_id();
        self.install_grant(grant, &device_id).await
    }

    async fn install_grant(&self, grant: ActivationGrant, device_id: &str) -> Session {
        if let Err(e) = self.store.save(&grant.token, grant.expires_at_ms).await {
            // The in-memory session still works for this page lifetime.
            tracing::error!(error = %e, "[Session] Failed to persist authorization");
        }
        let session = Session::authorized(grant.token, grant.expires_at_ms, device_id);
        self.replace(session.clone());
        session
    }

    /// Clears in-memory and durable credentials.
    ///
    /// The in-memory session is cleared even if the store fails.
    pub async fn invalidate(&self) -> Result<()> {
        let device_id = self.device_id();
        self.replace(Session::unauthorized(device_id));
        tracing::warn!("[Session] Authorization invalidated");
        self.store.clear().await
    }

    /// Checks expiry lazily before an authorized operation.
    ///
    /// Returns `true` if the session is usable. A held-but-expired token is
    /// cleared from memory and storage, and `false` is returned.
    pub async fn ensure_fresh(&self) -> bool {
        let now = self.clock.now_ms();
        let session = self.current();
        if session.is_authorized_at(now) {
            return true;
        }
        if session.is_stale_at(now) {
            tracing::info!("[Session] Authorization expired");
            if let Err(e) = self.invalidate().await {
                tracing::error!(error = %e, "[Session] Failed to clear expired authorization");
            }
        }
        false
    }

    /// Pure check against the in-memory session and the wall clock.
    pub fn is_authorized(&self) -> bool {
        self.read().is_authorized_at(self.clock.now_ms())
    }

    /// A snapshot of the current session.
    pub fn current(&self) -> Session {
        self.read().clone()
    }

    pub fn device_id(&self) -> String {
        self.read().device_id.clone()
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn replace(&self, session: Session) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = session;
    }
}
