//! Fake host surfaces and backend for application tests.

#![allow(dead_code)]

use async_trait::async_trait;
use lingo_application::{HostPorts, KeyDisposition, SendInterceptor, Translator};
use lingo_core::clock::Clock;
use lingo_core::error::{ActivationError, LingoError, Result, TranslateError};
use lingo_core::host::{
    ActivationDialog, ActivationStatus, ComposeSurface, ElementId, ElementSnapshot, HostPage,
    KeyEvent, MessageSurface, MutationEvent, NodeId, WindowSignal,
};
use lingo_core::session::{Session, SessionManager, SessionStore, StoredCredentials};
use lingo_core::translation::{
    ActivationGrant, ActivationRequest, ActivationService, TranslationRequest, TranslationService,
};
use lingo_core::TranslatorConfig;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};

pub const NOW: i64 = 1_700_000_000_000;
pub const HOUR_MS: i64 = 3_600_000;

pub struct FixedClock(pub AtomicI64);

impl FixedClock {
    pub fn at(now_ms: i64) -> Self {
        Self(AtomicI64::new(now_ms))
    }

    pub fn set(&self, now_ms: i64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Session store and activation backend
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryStore {
    pub credentials: Mutex<StoredCredentials>,
    pub saves: AtomicUsize,
    pub clears: AtomicUsize,
}

impl MemoryStore {
    pub fn with(token: &str, expires_at_ms: i64) -> Self {
        let store = Self::default();
        *store.credentials.lock().unwrap() = StoredCredentials {
            token: Some(token.to_string()),
            expires_at_ms: Some(expires_at_ms),
        };
        store
    }

    pub fn stored(&self) -> StoredCredentials {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn load(&self) -> Result<StoredCredentials> {
        Ok(self.stored())
    }

    async fn save(&self, token: &str, expires_at_ms: i64) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.credentials.lock().unwrap() = StoredCredentials {
            token: Some(token.to_string()),
            expires_at_ms: Some(expires_at_ms),
        };
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        *self.credentials.lock().unwrap() = StoredCredentials::default();
        Ok(())
    }
}

/// Accepts `valid_code`, rejects everything else with "invalid code".
pub struct ScriptedActivation {
    pub valid_code: String,
    pub requests: Mutex<Vec<ActivationRequest>>,
    pub network_down: Mutex<bool>,
}

impl ScriptedActivation {
    pub fn accepting(code: &str) -> Self {
        Self {
            valid_code: code.to_string(),
            requests: Mutex::new(Vec::new()),
            network_down: Mutex::new(false),
        }
    }

    pub fn requests(&self) -> Vec<ActivationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivationService for ScriptedActivation {
    async fn activate(
        &self,
        request: &ActivationRequest,
    ) -> std::result::Result<ActivationGrant, ActivationError> {
        self.requests.lock().unwrap().push(request.clone());
        if *self.network_down.lock().unwrap() {
            return Err(ActivationError::Network("connection refused".to_string()));
        }
        if request.code == self.valid_code {
            Ok(ActivationGrant {
                token: format!("token-for-{}", request.code),
                expires_at_ms: NOW + HOUR_MS,
            })
        } else {
            Err(ActivationError::Rejected("invalid code".to_string()))
        }
    }
}

// ---------------------------------------------------------------------------
// Translation backend
// ---------------------------------------------------------------------------

pub type Scripted = std::result::Result<String, TranslateError>;

/// Answers from a text -> result table; unknown texts fail with `Empty`.
pub struct ScriptedTranslation {
    answers: Mutex<HashMap<String, Scripted>>,
    pub calls: Mutex<Vec<TranslationRequest>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedTranslation {
    pub fn new() -> Self {
        Self {
            answers: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Every request waits for a permit on `gate` before answering.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn answer(self, text: &str, result: Scripted) -> Self {
        self.answers
            .lock()
            .unwrap()
            .insert(text.to_string(), result);
        self
    }

    pub fn set_answer(&self, text: &str, result: Scripted) {
        self.answers
            .lock()
            .unwrap()
            .insert(text.to_string(), result);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.text().to_string())
            .collect()
    }
}

#[async_trait]
impl TranslationService for ScriptedTranslation {
    async fn translate(
        &self,
        request: &TranslationRequest,
        session: &Session,
    ) -> std::result::Result<String, TranslateError> {
        if session.token.is_none() {
            return Err(TranslateError::Unauthenticated);
        }
        self.calls.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }
        self.answers
            .lock()
            .unwrap()
            .get(request.text())
            .cloned()
            .unwrap_or(Err(TranslateError::Empty))
    }
}

// ---------------------------------------------------------------------------
// Host page
// ---------------------------------------------------------------------------

/// Builds a chat bubble the way the host renders one.
pub fn bubble(text: &str, time: &str) -> ElementSnapshot {
    ElementSnapshot::new(&["bubble"]).with_child(
        ElementSnapshot::new(&["bubble-content"]).with_child(
            ElementSnapshot::new(&["message", "spoilers-container"])
                .with_text(text)
                .with_child(ElementSnapshot::new(&["time"]).with_text(time)),
        ),
    )
}

#[derive(Default)]
pub struct FakeMessages {
    nodes: Mutex<Vec<(NodeId, ElementSnapshot)>>,
    annotations: Mutex<HashMap<NodeId, Vec<String>>>,
    observer: Mutex<Option<mpsc::UnboundedSender<MutationEvent>>>,
}

impl FakeMessages {
    /// Renders a message without notifying the observer.
    pub fn render(&self, id: u64, text: &str) -> NodeId {
        let node = NodeId(id);
        self.nodes
            .lock()
            .unwrap()
            .push((node, bubble(text, "12:00")));
        node
    }

    /// Renders a message and reports the insertion.
    pub fn insert(&self, id: u64, text: &str) -> NodeId {
        let node = self.render(id, text);
        self.emit(MutationEvent::Inserted(vec![node]));
        node
    }

    pub fn remove(&self, node: NodeId) {
        self.nodes.lock().unwrap().retain(|(id, _)| *id != node);
        self.emit(MutationEvent::Removed(vec![node]));
    }

    /// Detaches the node and reports its identity as retired.
    pub fn destroy(&self, node: NodeId) {
        self.nodes.lock().unwrap().retain(|(id, _)| *id != node);
        self.emit(MutationEvent::Destroyed(vec![node]));
    }

    pub fn emit(&self, event: MutationEvent) {
        if let Some(sender) = self.observer.lock().unwrap().as_ref() {
            let _ = sender.send(event);
        }
    }

    pub fn is_observed(&self) -> bool {
        self.observer.lock().unwrap().is_some()
    }

    pub fn annotations(&self, node: NodeId) -> Vec<String> {
        self.annotations
            .lock()
            .unwrap()
            .get(&node)
            .cloned()
            .unwrap_or_default()
    }

    pub fn annotate(&self, node: NodeId, text: &str) {
        self.annotations
            .lock()
            .unwrap()
            .entry(node)
            .or_default()
            .push(text.to_string());
    }
}

#[async_trait]
impl MessageSurface for FakeMessages {
    async fn wait_for_container(&self) -> Result<()> {
        Ok(())
    }

    fn observe(&self) -> mpsc::UnboundedReceiver<MutationEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *self.observer.lock().unwrap() = Some(sender);
        receiver
    }

    fn current_messages(&self) -> Vec<NodeId> {
        self.nodes.lock().unwrap().iter().map(|(id, _)| *id).collect()
    }

    fn snapshot(&self, node: NodeId) -> Option<ElementSnapshot> {
        self.nodes
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, snapshot)| snapshot.clone())
    }

    fn is_attached(&self, node: NodeId) -> bool {
        self.nodes.lock().unwrap().iter().any(|(id, _)| *id == node)
    }

    fn has_annotation(&self, node: NodeId) -> bool {
        !self.annotations(node).is_empty()
    }

    fn append_annotation(&self, node: NodeId, text: &str) -> Result<()> {
        if !self.is_attached(node) {
            return Err(LingoError::host("node detached"));
        }
        self.annotate(node, text);
        Ok(())
    }
}

/// What the compose box saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposeEvent {
    TextChanged(String),
    SyntheticSubmit,
    /// The host's own handler sent this text.
    Sent(String),
}

type SubmitHook = Arc<dyn Fn(&KeyEvent) -> KeyDisposition + Send + Sync>;

/// A compose box that behaves like the host's: a submit that is not
/// suppressed sends the current text and clears the box.
#[derive(Default)]
pub struct FakeCompose {
    texts: Mutex<HashMap<ElementId, String>>,
    pub events: Mutex<Vec<ComposeEvent>>,
    key_hook: Mutex<Option<SubmitHook>>,
    pub fail_writes: Mutex<bool>,
}

impl FakeCompose {
    pub fn type_text(&self, element: ElementId, text: &str) {
        self.texts
            .lock()
            .unwrap()
            .insert(element, text.to_string());
    }

    pub fn text(&self, element: ElementId) -> String {
        self.texts
            .lock()
            .unwrap()
            .get(&element)
            .cloned()
            .unwrap_or_default()
    }

    /// Routes synthetic key events through the page's key-down listeners.
    pub fn set_key_hook(&self, hook: SubmitHook) {
        *self.key_hook.lock().unwrap() = Some(hook);
    }

    pub fn events(&self) -> Vec<ComposeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ComposeEvent::Sent(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn synthetic_submits(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == ComposeEvent::SyntheticSubmit)
            .count()
    }

    /// The host's native send handler.
    pub fn host_send(&self, element: ElementId) {
        let text = self.text(element);
        if text.trim().is_empty() {
            return;
        }
        self.events.lock().unwrap().push(ComposeEvent::Sent(text));
        self.type_text(element, "");
    }
}

impl ComposeSurface for FakeCompose {
    fn is_focused_editable(&self, element: ElementId) -> bool {
        self.texts.lock().unwrap().contains_key(&element)
    }

    fn read_text(&self, element: ElementId) -> String {
        self.text(element)
    }

    fn write_text(&self, element: ElementId, text: &str) -> Result<()> {
        if *self.fail_writes.lock().unwrap() {
            return Err(LingoError::host("compose element is read-only"));
        }
        self.type_text(element, text);
        Ok(())
    }

    fn dispatch_text_changed(&self, element: ElementId) -> Result<()> {
        let text = self.text(element);
        self.events
            .lock()
            .unwrap()
            .push(ComposeEvent::TextChanged(text));
        Ok(())
    }

    fn dispatch_submit(&self, element: ElementId) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push(ComposeEvent::SyntheticSubmit);
        let event = KeyEvent {
            synthetic: true,
            ..KeyEvent::enter(element)
        };
        let hook = self.key_hook.lock().unwrap().clone();
        let disposition = hook.map_or(KeyDisposition::PassThrough, |hook| hook(&event));
        if disposition == KeyDisposition::PassThrough {
            self.host_send(element);
        }
        Ok(())
    }
}

/// Simulates a user pressing Enter: the host sends unless suppressed.
pub fn press_enter(
    interceptor: &Arc<SendInterceptor>,
    compose: &FakeCompose,
    element: ElementId,
) -> KeyDisposition {
    let disposition = interceptor.on_key_down(&KeyEvent::enter(element));
    if disposition == KeyDisposition::PassThrough {
        compose.host_send(element);
    }
    disposition
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Shown,
    Status(ActivationStatus),
    Closed,
}

#[derive(Default)]
pub struct FakeDialog {
    pub events: Mutex<Vec<DialogEvent>>,
}

impl FakeDialog {
    pub fn events(&self) -> Vec<DialogEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn shown_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == DialogEvent::Shown)
            .count()
    }

    pub fn statuses(&self) -> Vec<ActivationStatus> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                DialogEvent::Status(status) => Some(status),
                _ => None,
            })
            .collect()
    }
}

impl ActivationDialog for FakeDialog {
    fn show(&self) {
        self.events.lock().unwrap().push(DialogEvent::Shown);
    }

    fn set_status(&self, status: &ActivationStatus) {
        self.events
            .lock()
            .unwrap()
            .push(DialogEvent::Status(status.clone()));
    }

    fn close(&self) {
        self.events.lock().unwrap().push(DialogEvent::Closed);
    }
}

pub struct FakePage {
    pub logged_in: bool,
    pub user_id: Option<i64>,
}

#[async_trait]
impl HostPage for FakePage {
    async fn wait_for_login(&self) {
        if !self.logged_in {
            std::future::pending::<()>().await;
        }
    }

    fn user_id(&self) -> Option<i64> {
        self.user_id
    }
}

#[derive(Default)]
pub struct FakeWindow {
    pub requests: AtomicUsize,
}

impl WindowSignal for FakeWindow {
    fn request_new_window(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub clock: Arc<FixedClock>,
    pub store: Arc<MemoryStore>,
    pub activation: Arc<ScriptedActivation>,
    pub translation: Arc<ScriptedTranslation>,
    pub session: Arc<SessionManager>,
    pub messages: Arc<FakeMessages>,
    pub compose: Arc<FakeCompose>,
    pub dialog: Arc<FakeDialog>,
    pub window: Arc<FakeWindow>,
    pub translator: Arc<Translator>,
}

impl Harness {
    /// A harness whose store already holds a valid token.
    pub fn authorized(translation: ScriptedTranslation) -> Self {
        Self::build(MemoryStore::with("tok-valid", NOW + HOUR_MS), translation, true)
    }

    /// A harness with empty storage.
    pub fn unauthorized(translation: ScriptedTranslation) -> Self {
        Self::build(MemoryStore::default(), translation, true)
    }

    pub fn build(store: MemoryStore, translation: ScriptedTranslation, logged_in: bool) -> Self {
        Self::build_with(store, translation, logged_in, TranslatorConfig::immediate())
    }

    pub fn build_with(
        store: MemoryStore,
        translation: ScriptedTranslation,
        logged_in: bool,
        config: TranslatorConfig,
    ) -> Self {
        let clock = Arc::new(FixedClock::at(NOW));
        let store = Arc::new(store);
        let activation = Arc::new(ScriptedActivation::accepting("GOOD-CODE"));
        let translation = Arc::new(translation);
        let session = Arc::new(SessionManager::new(
            store.clone(),
            activation.clone(),
            clock.clone(),
            "device-test",
        ));
        let messages = Arc::new(FakeMessages::default());
        let compose = Arc::new(FakeCompose::default());
        let dialog = Arc::new(FakeDialog::default());
        let window = Arc::new(FakeWindow::default());
        let page = Arc::new(FakePage {
            logged_in,
            user_id: Some(777),
        });

        let translator = Arc::new(Translator::new(
            config,
            session.clone(),
            translation.clone(),
            HostPorts {
                messages: messages.clone(),
                compose: compose.clone(),
                dialog: dialog.clone(),
                page,
                window: window.clone(),
            },
        ));

        let interceptor = translator.interceptor().clone();
        compose.set_key_hook(Arc::new(move |event| interceptor.on_key_down(event)));

        Self {
            clock,
            store,
            activation,
            translation,
            session,
            messages,
            compose,
            dialog,
            window,
            translator,
        }
    }

    /// Restores the stored session without starting any services.
    pub async fn restore(&self) {
        self.session.restore().await.unwrap();
    }
}

/// Polls `condition` until it holds or two seconds pass.
pub async fn eventually(condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within 2s");
}
