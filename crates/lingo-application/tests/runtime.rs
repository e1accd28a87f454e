mod common;

use common::*;
use lingo_application::{BootOutcome, KeyDisposition};
use lingo_core::host::{ActivationStatus, ElementId, KeyEvent};
use lingo_core::message::TranslationState;
use lingo_core::TranslatorConfig;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_boot_with_stored_session_starts_services() {
    let h = Harness::authorized(ScriptedTranslation::new().answer("你好", Ok("Hello".into())));
    let node = h.messages.render(1, "你好");

    let outcome = h.translator.boot().await.unwrap();

    assert_eq!(outcome, BootOutcome::Running);
    assert!(h.translator.is_running());
    assert!(h.messages.is_observed());
    assert_eq!(h.dialog.shown_count(), 0);
    eventually(|| h.translator.pipeline().state(node) == TranslationState::Done).await;
}

#[tokio::test]
async fn test_boot_without_session_prompts() {
    let h = Harness::unauthorized(ScriptedTranslation::new());

    let outcome = h.translator.boot().await.unwrap();

    assert_eq!(outcome, BootOutcome::AwaitingActivation);
    assert!(!h.translator.is_running());
    assert!(!h.messages.is_observed());
    assert_eq!(h.dialog.events(), vec![DialogEvent::Shown]);
}

#[tokio::test]
async fn test_boot_with_expired_session_clears_storage() {
    let h = Harness::build(
        MemoryStore::with("tok-old", NOW - 1),
        ScriptedTranslation::new(),
        true,
    );

    let outcome = h.translator.boot().await.unwrap();

    assert_eq!(outcome, BootOutcome::AwaitingActivation);
    assert!(h.store.stored().is_empty());
    assert_eq!(h.store.clears.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_boot_gives_up_without_login() {
    let mut config = TranslatorConfig::immediate();
    config.login_wait_ms = 20;
    let h = Harness::build_with(
        MemoryStore::with("tok-valid", NOW + HOUR_MS),
        ScriptedTranslation::new(),
        false,
        config,
    );

    let outcome = h.translator.boot().await.unwrap();

    assert_eq!(outcome, BootOutcome::LoginTimedOut);
    assert!(!h.translator.is_running());
    assert!(!h.session.is_authorized());
}

#[tokio::test]
async fn test_activation_starts_services() {
    let h = Harness::unauthorized(ScriptedTranslation::new().answer("你好", Ok("Hello".into())));
    h.translator.boot().await.unwrap();
    let node = h.messages.render(1, "你好");

    let status = h.translator.submit_activation_code(" GOOD-CODE ").await.unwrap();

    assert_eq!(status, ActivationStatus::Activated);
    assert!(h.translator.is_running());
    assert_eq!(
        h.dialog.events(),
        vec![
            DialogEvent::Shown,
            DialogEvent::Status(ActivationStatus::Verifying),
            DialogEvent::Status(ActivationStatus::Activated),
            DialogEvent::Closed,
        ]
    );
    let stored = h.store.stored();
    assert_eq!(stored.token.as_deref(), Some("token-for-GOOD-CODE"));
    assert_eq!(stored.expires_at_ms, Some(NOW + HOUR_MS));

    let request = h.activation.requests()[0].clone();
    assert_eq!(request.code, "GOOD-CODE");
    assert_eq!(request.user_id, 777);
    assert_eq!(request.device_id, "device-test");

    eventually(|| h.translator.pipeline().state(node) == TranslationState::Done).await;
}

#[tokio::test]
async fn test_invalid_code_keeps_dialog_open() {
    let h = Harness::unauthorized(ScriptedTranslation::new());
    h.translator.boot().await.unwrap();

    let status = h.translator.submit_activation_code("WRONG").await.unwrap();

    assert_eq!(status, ActivationStatus::Rejected("invalid code".to_string()));
    assert!(!h.session.is_authorized());
    assert!(!h.translator.is_running());
    assert_eq!(h.store.saves.load(Ordering::SeqCst), 0);
    assert_eq!(h.store.clears.load(Ordering::SeqCst), 0);
    assert!(!h.dialog.events().contains(&DialogEvent::Closed));
}

#[tokio::test]
async fn test_empty_code_makes_no_request() {
    let h = Harness::unauthorized(ScriptedTranslation::new());

    let status = h.translator.submit_activation_code("   ").await.unwrap();

    assert_eq!(status, ActivationStatus::MissingCode);
    assert!(h.activation.requests().is_empty());
    assert_eq!(h.dialog.statuses(), vec![ActivationStatus::MissingCode]);
}

#[tokio::test]
async fn test_network_failure_during_activation() {
    let h = Harness::unauthorized(ScriptedTranslation::new());
    *h.activation.network_down.lock().unwrap() = true;

    let status = h.translator.submit_activation_code("GOOD-CODE").await.unwrap();

    assert_eq!(status, ActivationStatus::NetworkError);
    assert!(!h.session.is_authorized());
}

#[tokio::test]
async fn test_key_events_pass_through_until_running() {
    let h = Harness::unauthorized(ScriptedTranslation::new());
    let input = ElementId(5);
    h.compose.type_text(input, "你好");

    assert_eq!(
        h.translator.on_key_down(&KeyEvent::enter(input)),
        KeyDisposition::PassThrough
    );
}

#[tokio::test]
async fn test_cancel_closes_dialog() {
    let h = Harness::unauthorized(ScriptedTranslation::new());
    h.translator.boot().await.unwrap();

    h.translator.cancel_activation();

    assert_eq!(h.dialog.events(), vec![DialogEvent::Shown, DialogEvent::Closed]);
}

#[tokio::test]
async fn test_new_window_request_is_forwarded() {
    let h = Harness::unauthorized(ScriptedTranslation::new());

    h.translator.request_new_window();

    assert_eq!(h.window.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_shutdown_allows_restart() {
    let h = Harness::authorized(ScriptedTranslation::new());
    h.translator.boot().await.unwrap();

    h.translator.shutdown();
    assert!(!h.translator.is_running());
    assert!(!h.translator.pipeline().is_started());

    h.translator.start_services().await.unwrap();
    assert!(h.translator.is_running());
    assert!(h.translator.pipeline().is_started());
}
