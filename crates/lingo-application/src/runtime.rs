//! Translator runtime.
//!
//! Wires the session, the activation dialog, the message pipeline and the
//! send interceptor together and owns the startup order:
//!
//! 1. wait for the host to report a logged-in page (bounded)
//! 2. restore stored credentials
//! 3. start the pipeline and interceptor, or show the activation dialog

use crate::activation::ActivationController;
use crate::interceptor::{KeyDisposition, SendInterceptor};
use crate::pipeline::MessagePipeline;
use anyhow::{Context, Result};
use lingo_core::host::{
    ActivationDialog, ActivationStatus, ComposeSurface, HostPage, KeyEvent, MessageSurface,
    WindowSignal,
};
use lingo_core::session::SessionManager;
use lingo_core::translation::TranslationService;
use lingo_core::TranslatorConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The host-side collaborators the runtime drives.
#[derive(Clone)]
pub struct HostPorts {
    pub messages: Arc<dyn MessageSurface>,
    pub compose: Arc<dyn ComposeSurface>,
    pub dialog: Arc<dyn ActivationDialog>,
    pub page: Arc<dyn HostPage>,
    pub window: Arc<dyn WindowSignal>,
}

/// Result of [`Translator::boot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootOutcome {
    /// Authorized; pipeline and interceptor are running.
    Running,
    /// No usable session; the activation dialog is shown.
    AwaitingActivation,
    /// The host never reported a logged-in page.
    LoginTimedOut,
}

pub struct Translator {
    config: TranslatorConfig,
    session: Arc<SessionManager>,
    activation: Arc<ActivationController>,
    pipeline: Arc<MessagePipeline>,
    interceptor: Arc<SendInterceptor>,
    page: Arc<dyn HostPage>,
    window: Arc<dyn WindowSignal>,
    running: AtomicBool,
}

impl Translator {
    pub fn new(
        config: TranslatorConfig,
        session: Arc<SessionManager>,
        translator: Arc<dyn TranslationService>,
        host: HostPorts,
    ) -> Self {
        let activation = Arc::new(ActivationController::new(
            session.clone(),
            host.dialog,
            host.page.clone(),
            config.activation_close_delay(),
        ));
        let pipeline = Arc::new(MessagePipeline::new(
            host.messages,
            translator.clone(),
            session.clone(),
            activation.clone(),
            &config,
        ));
        let interceptor = Arc::new(SendInterceptor::new(
            host.compose,
            translator,
            session.clone(),
            activation.clone(),
            &config,
        ));

        Self {
            config,
            session,
            activation,
            pipeline,
            interceptor,
            page: host.page,
            window: host.window,
            running: AtomicBool::new(false),
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn pipeline(&self) -> &Arc<MessagePipeline> {
        &self.pipeline
    }

    pub fn interceptor(&self) -> &Arc<SendInterceptor> {
        &self.interceptor
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Runs the startup sequence once the page has loaded.
    pub async fn boot(&self) -> Result<BootOutcome> {
        let login_wait = self.config.login_wait();
        if tokio::time::timeout(login_wait, self.page.wait_for_login())
            .await
            .is_err()
        {
            tracing::warn!(
                wait_ms = self.config.login_wait_ms,
                "[Translator] Host did not report a login, not starting"
            );
            return Ok(BootOutcome::LoginTimedOut);
        }

        if let Err(e) = self.session.restore().await {
            tracing::error!(error = %e, "[Translator] Failed to restore authorization");
        }

        if self.session.is_authorized() {
            self.start_services().await?;
            Ok(BootOutcome::Running)
        } else {
            self.activation.prompt();
            Ok(BootOutcome::AwaitingActivation)
        }
    }

    /// Starts the pipeline and enables the interceptor. No-op when running.
    pub async fn start_services(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        match self.pipeline.start().await {
            Ok(_) => {
                tracing::info!("[Translator] Services started");
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(e).context("Failed to start message pipeline")
            }
        }
    }

    /// Handles the activate button of the dialog.
    ///
    /// On success the services are started, or, if they already run, a
    /// catch-up pass picks up messages that arrived while unauthorized.
    pub async fn submit_activation_code(&self, code: &str) -> Result<ActivationStatus> {
        let status = self.activation.submit(code).await;
        if status != ActivationStatus::Activated {
            return Ok(status);
        }

        if self.is_running() {
            let processed = self.pipeline.catch_up().await;
            tracing::info!(processed, "[Translator] Re-activation catch-up done");
        } else {
            self.start_services().await?;
        }
        Ok(status)
    }

    pub fn cancel_activation(&self) {
        self.activation.cancel();
    }

    /// Key-down hook; only intercepts while the services run.
    pub fn on_key_down(&self, event: &KeyEvent) -> KeyDisposition {
        if !self.is_running() {
            return KeyDisposition::PassThrough;
        }
        self.interceptor.on_key_down(event)
    }

    pub fn request_new_window(&self) {
        tracing::info!("[Translator] Requesting new window");
        self.window.request_new_window();
    }

    pub fn shutdown(&self) {
        self.pipeline.stop();
        self.running.store(false, Ordering::SeqCst);
        tracing::info!("[Translator] Stopped");
    }
}
