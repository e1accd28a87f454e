//! BackendClient - REST client for the translation backend.
//!
//! Implements the activation and translation ports from `lingo-core` and
//! exposes the auxiliary status, health and language endpoints used by the
//! CLI. Every call carries an explicit timeout; no call is retried.

use crate::dto::{ActivateBody, ActivateResponse, TranslateBody, TranslateResponse};
use async_trait::async_trait;
use lingo_core::clock::Clock;
use lingo_core::error::{ActivationError, LingoError, Result, TranslateError};
use lingo_core::session::Session;
use lingo_core::translation::{
    ActivationGrant, ActivationRequest, ActivationService, TranslationRequest, TranslationService,
};
use lingo_core::TranslatorConfig;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const DEVICE_ID_HEADER: &str = "X-Device-Id";

/// HTTP implementation of [`ActivationService`] and [`TranslationService`].
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl BackendClient {
    /// Creates a client for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: impl Into<String>, timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            timeout,
            clock,
        }
    }

    pub fn from_config(config: &TranslatorConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(&config.api_base_url, config.request_timeout(), clock)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Asks whether `user_id` already holds an active authorization.
    ///
    /// The backend answers with the same body as `/api/activate`.
    pub async fn check_status(
        &self,
        user_id: i64,
    ) -> std::result::Result<ActivationGrant, ActivationError> {
        let response = self
            .client
            .get(self.url("/api/check"))
            .query(&[("userId", user_id)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ActivationError::Network(format!("Status check failed: {}", e)))?;

        let body = read_activate_response(response).await?;
        grant_from(body, "not activated")
    }

    /// Probes `/api/health` and returns the body text.
    pub async fn health(&self) -> Result<String> {
        let response = self
            .client
            .get(self.url("/api/health"))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LingoError::backend(format!("Health probe failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LingoError::backend(format!("Failed to read health response: {}", e)))?;
        if !status.is_success() {
            return Err(LingoError::backend(format!(
                "Backend unhealthy ({}): {}",
                status,
                text.trim()
            )));
        }
        Ok(text.trim().to_string())
    }

    /// Fetches the supported language list as raw JSON.
    pub async fn languages(&self) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(self.url("/api/languages"))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LingoError::backend(format!("Language lookup failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LingoError::backend(format!(
                "Language lookup error ({}): {}",
                status, error_text
            )));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| LingoError::backend(format!("Failed to parse languages: {}", e)))
    }
}

/// Parses an activate/check body regardless of status code.
async fn read_activate_response(
    response: reqwest::Response,
) -> std::result::Result<ActivateResponse, ActivationError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ActivationError::Network(format!("Failed to read response: {}", e)))?;

    serde_json::from_str::<ActivateResponse>(&text).map_err(|e| {
        ActivationError::Network(format!("Unreadable response ({}): {}", status, e))
    })
}

fn grant_from(
    body: ActivateResponse,
    fallback: &str,
) -> std::result::Result<ActivationGrant, ActivationError> {
    match body {
        ActivateResponse {
            success: true,
            token: Some(token),
            expire_timestamp: Some(expires_at_ms),
            ..
        } if !token.is_empty() => Ok(ActivationGrant {
            token,
            expires_at_ms,
        }),
        ActivateResponse { message, .. } => Err(ActivationError::Rejected(
            message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()),
        )),
    }
}

#[async_trait]
impl ActivationService for BackendClient {
    async fn activate(
        &self,
        request: &ActivationRequest,
    ) -> std::result::Result<ActivationGrant, ActivationError> {
        let body = ActivateBody {
            code: &request.code,
            user_id: request.user_id,
            device_id: &request.device_id,
        };

        let response = self
            .client
            .post(self.url("/api/activate"))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ActivationError::Network(format!("Activation request failed: {}", e)))?;

        let body = read_activate_response(response).await?;
        grant_from(body, "activation failed")
    }
}

#[async_trait]
impl TranslationService for BackendClient {
    async fn translate(
        &self,
        request: &TranslationRequest,
        session: &Session,
    ) -> std::result::Result<String, TranslateError> {
        let token = match &session.token {
            Some(token) if session.is_authorized_at(self.clock.now_ms()) => token,
            _ => return Err(TranslateError::Unauthenticated),
        };

        let body = TranslateBody {
            text: request.text(),
            source_lang: request.source().code(),
            target_lang: request.target().code(),
        };

        let response = self
            .client
            .post(self.url("/api/translate"))
            .header(AUTH_TOKEN_HEADER, token)
            .header(DEVICE_ID_HEADER, &session.device_id)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| TranslateError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("[Backend] Translation rejected with 401");
            return Err(TranslateError::Unauthorized);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslateError::Network(format!(
                "HTTP {}: {}",
                status,
                error_text.trim()
            )));
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::Network(format!("Failed to parse response: {}", e)))?;

        match parsed {
            TranslateResponse {
                success: true,
                translated_text: Some(text),
                ..
            } if !text.trim().is_empty() => Ok(text),
            TranslateResponse { error, .. } => {
                if let Some(error) = error {
                    tracing::debug!(error = %error, "[Backend] Translation flagged as failed");
                }
                Err(TranslateError::Empty)
            }
        }
    }
}
