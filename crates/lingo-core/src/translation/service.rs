//! Backend ports.
//!
//! The HTTP implementation lives in `lingo-interaction`; tests substitute
//! scripted fakes.

use super::model::TranslationRequest;
use crate::error::{ActivationError, TranslateError};
use crate::session::Session;
use async_trait::async_trait;

/// Identifiers sent along with an activation code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationRequest {
    pub code: String,
    pub user_id: i64,
    pub device_id: String,
}

/// What the backend hands back for an accepted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationGrant {
    pub token: String,
    /// Server-supplied expiry, already padded for clock skew.
    pub expires_at_ms: i64,
}

#[async_trait]
pub trait ActivationService: Send + Sync {
    /// Exchanges an activation code for a session token.
    async fn activate(&self, request: &ActivationRequest)
    -> Result<ActivationGrant, ActivationError>;
}

#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translates one request using the session's credentials.
    ///
    /// Must return `TranslateError::Unauthenticated` without any network
    /// traffic when `session` is not authorized. Performs no retries.
    async fn translate(
        &self,
        request: &TranslationRequest,
        session: &Session,
    ) -> Result<String, TranslateError>;
}
