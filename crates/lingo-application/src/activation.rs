//! Activation dialog controller.
//!
//! Drives the host's activation modal and feeds codes to the
//! [`SessionManager`]. This is also where every component lands when the
//! backend reports an unauthorized token.

use lingo_core::error::ActivationError;
use lingo_core::host::{ActivationDialog, ActivationStatus, HostPage};
use lingo_core::session::SessionManager;
use std::sync::Arc;
use std::time::Duration;

/// User id sent when the host page does not expose one.
const UNKNOWN_USER_ID: i64 = 0;

pub struct ActivationController {
    session: Arc<SessionManager>,
    dialog: Arc<dyn ActivationDialog>,
    page: Arc<dyn HostPage>,
    close_delay: Duration,
}

impl ActivationController {
    pub fn new(
        session: Arc<SessionManager>,
        dialog: Arc<dyn ActivationDialog>,
        page: Arc<dyn HostPage>,
        close_delay: Duration,
    ) -> Self {
        Self {
            session,
            dialog,
            page,
            close_delay,
        }
    }

    /// Shows the activation modal.
    pub fn prompt(&self) {
        tracing::info!("[Activation] Prompting for activation code");
        self.dialog.show();
    }

    pub fn cancel(&self) {
        self.dialog.close();
    }

    /// Handles one press of the activate button.
    ///
    /// Returns the status left on the dialog. On `Activated` the dialog has
    /// already been closed; on any other status it stays open for a retry.
    pub async fn submit(&self, code: &str) -> ActivationStatus {
        let code = code.trim();
        if code.is_empty() {
            let status = ActivationStatus::MissingCode;
            self.dialog.set_status(&status);
            return status;
        }

        self.dialog.set_status(&ActivationStatus::Verifying);

        let user_id = self.page.user_id().unwrap_or(UNKNOWN_USER_ID);
        let device_id = self.session.device_id();

        let status = match self.session.activate(code, user_id, &device_id).await {
            Ok(_) => ActivationStatus::Activated,
            Err(ActivationError::Rejected(reason)) => ActivationStatus::Rejected(reason),
            Err(ActivationError::Network(_)) => ActivationStatus::NetworkError,
        };
        self.dialog.set_status(&status);

        if status == ActivationStatus::Activated {
            if !self.close_delay.is_zero() {
                tokio::time::sleep(self.close_delay).await;
            }
            self.dialog.close();
        }
        status
    }

    /// Clears the session after the backend rejected its token, then asks
    /// for a new code.
    pub async fn revoke_and_prompt(&self) {
        if let Err(e) = self.session.invalidate().await {
            tracing::error!(error = %e, "[Activation] Failed to clear stored authorization");
        }
        self.prompt();
    }

    /// Returns `true` when an authorized operation may proceed.
    ///
    /// A held token that expired since the last check is cleared and the
    /// modal is shown again.
    pub async fn ensure_authorized(&self) -> bool {
        let held = self.session.current().token.is_some();
        if self.session.ensure_fresh().await {
            return true;
        }
        if held {
            self.prompt();
        }
        false
    }
}
