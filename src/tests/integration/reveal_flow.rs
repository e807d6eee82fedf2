//! End-to-end flows through the token card: key presses in, mocked backend
//! behind the real effect runner, backend answers pumped off the event
//! channel exactly as the app loop does.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::client::MockTokenBackend;
use crate::core::reveal::CopyNotice;
use crate::tests::common::*;
use crate::tests::mocks::{
    broken_listing_backend, issuing_backend, listing_backend, rejecting_backend,
};
use crate::tui::clipboard::MemoryClipboard;
use crate::tui::events::{AppEvent, Notification, NotificationLevel};
use crate::tui::services::Services;
use crate::tui::views::api_tokens::ApiTokensViewState;

fn press(view: &mut ApiTokensViewState, services: &Services, code: KeyCode) {
    view.handle_input(&Event::Key(KeyEvent::new(code, KeyModifiers::NONE)), services);
}

fn type_str(view: &mut ApiTokensViewState, services: &Services, text: &str) {
    for c in text.chars() {
        press(view, services, KeyCode::Char(c));
    }
}

/// Deliver `count` backend answers to the view; returns any notifications
/// raised on the way.
async fn pump(
    view: &mut ApiTokensViewState,
    services: &Services,
    rx: &mut mpsc::UnboundedReceiver<AppEvent>,
    count: usize,
) -> Vec<Notification> {
    let mut notifications = Vec::new();
    let mut delivered = 0;
    while delivered < count {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("backend answer timed out")
            .expect("event channel closed");
        match event {
            AppEvent::Tokens(msg) => {
                view.on_backend_msg(msg, services);
                delivered += 1;
            }
            AppEvent::Notification(n) => notifications.push(n),
            other => panic!("unexpected event: {other:?}"),
        }
    }
    while let Ok(AppEvent::Notification(n)) = rx.try_recv() {
        notifications.push(n);
    }
    notifications
}

#[tokio::test]
async fn test_create_copy_dismiss() {
    let mut backend = listing_backend(create_test_page(&["ci-bot"], 0, 1));
    backend
        .expect_create_token()
        .withf(|req| req.name == "ci-bot" && req.scopes == ["read", "write"])
        .times(1)
        .returning(|_| Ok(create_test_issued("ci-bot", "tok_abc123")));
    let clipboard = Arc::new(MemoryClipboard::new());
    let (services, mut rx) = create_test_services(backend, clipboard.clone());

    let mut view = ApiTokensViewState::new(&services);
    view.mount(&services);
    pump(&mut view, &services, &mut rx, 1).await;
    assert_eq!(view.model().listing().data.as_ref().unwrap().items.len(), 1);

    // Fill in the create form: name, skip description, scopes
    press(&mut view, &services, KeyCode::Char('c'));
    assert!(view.model().is_create_open());
    type_str(&mut view, &services, "ci-bot");
    press(&mut view, &services, KeyCode::Tab);
    press(&mut view, &services, KeyCode::Tab);
    type_str(&mut view, &services, "read, write");
    press(&mut view, &services, KeyCode::Enter);
    assert!(view.model().is_submitting());

    // Create answer, then the refresh it triggers
    let notifications = pump(&mut view, &services, &mut rx, 2).await;
    assert!(notifications
        .iter()
        .any(|n| n.level == NotificationLevel::Success && n.message == "API Token created"));
    assert!(!view.model().is_create_open());
    assert_eq!(
        view.model().revealed_secret().map(|s| s.expose()),
        Some("tok_abc123")
    );

    press(&mut view, &services, KeyCode::Char('c'));
    assert_eq!(clipboard.contents().as_deref(), Some("tok_abc123"));
    assert_eq!(
        view.model().copy_notice(),
        Some(&CopyNotice::Copied("copied to clipboard".into()))
    );

    press(&mut view, &services, KeyCode::Esc);
    assert!(view.model().held_secret().is_none());
    assert!(view.model().copy_notice().is_none());
}

#[tokio::test]
async fn test_rejected_create_keeps_form_open_with_message() {
    let backend = rejecting_backend(422, "name already taken", create_test_page(&[], 0, 0));
    let (services, mut rx) = create_test_services(backend, Arc::new(MemoryClipboard::new()));

    let mut view = ApiTokensViewState::new(&services);
    press(&mut view, &services, KeyCode::Char('c'));
    type_str(&mut view, &services, "dup");
    press(&mut view, &services, KeyCode::Enter);

    pump(&mut view, &services, &mut rx, 1).await;

    assert!(view.model().is_create_open());
    assert!(!view.model().is_submitting());
    assert!(view.model().held_secret().is_none());
    assert_eq!(view.form().error(), Some("name already taken"));
}

#[tokio::test]
async fn test_success_after_cancel_is_still_revealed() {
    let backend = issuing_backend(
        create_test_issued("nightly", "tok_late"),
        create_test_page(&["nightly"], 0, 1),
    );
    let (services, mut rx) = create_test_services(backend, Arc::new(MemoryClipboard::new()));

    let mut view = ApiTokensViewState::new(&services);
    press(&mut view, &services, KeyCode::Char('c'));
    type_str(&mut view, &services, "nightly");
    press(&mut view, &services, KeyCode::Enter);
    press(&mut view, &services, KeyCode::Esc);
    assert!(!view.model().is_create_open());
    assert!(view.model().is_submitting());

    // Create answer, then the refresh it triggers
    pump(&mut view, &services, &mut rx, 2).await;

    assert_eq!(
        view.model().revealed_secret().map(|s| s.expose()),
        Some("tok_late")
    );
    assert!(view.form().build_request().is_err());
}

#[tokio::test]
async fn test_refresh_failure_keeps_rows_and_warns() {
    let backend = broken_listing_backend("database offline");
    let (services, mut rx) = create_test_services(backend, Arc::new(MemoryClipboard::new()));

    let mut view = ApiTokensViewState::new(&services);
    view.mount(&services);
    let notifications = pump(&mut view, &services, &mut rx, 1).await;

    assert_eq!(
        view.model().listing().error.as_deref(),
        Some("database offline")
    );
    assert!(notifications
        .iter()
        .any(|n| n.level == NotificationLevel::Warning && n.message.contains("database offline")));
}

#[tokio::test]
async fn test_paging_walks_forward_and_back() {
    let mut backend = MockTokenBackend::new();
    backend
        .expect_list_tokens()
        .returning(|query| {
            let names: Vec<String> = (0..query.count.min(45 - query.start))
                .map(|i| format!("t{}", query.start + i))
                .collect();
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            Ok(create_test_page(&refs, query.start, 45))
        });
    let (services, mut rx) = create_test_services(backend, Arc::new(MemoryClipboard::new()));

    let mut view = ApiTokensViewState::new(&services);
    view.mount(&services);
    pump(&mut view, &services, &mut rx, 1).await;

    press(&mut view, &services, KeyCode::Char(']'));
    press(&mut view, &services, KeyCode::Char(']'));
    pump(&mut view, &services, &mut rx, 2).await;
    assert_eq!(view.model().listing().page, 3);
    assert_eq!(
        view.model().listing().data.as_ref().unwrap().range_label(),
        "41-45 of 45"
    );
    assert_eq!(view.selected().map(|t| t.name.as_str()), Some("t40"));

    press(&mut view, &services, KeyCode::Char('['));
    pump(&mut view, &services, &mut rx, 1).await;
    assert_eq!(view.model().listing().page, 2);
}

#[tokio::test]
async fn test_unmount_cancels_and_drops_secret() {
    let backend = listing_backend(create_test_page(&[], 0, 0));
    let (services, mut rx) = create_test_services(backend, Arc::new(MemoryClipboard::new()));

    let mut view = ApiTokensViewState::new(&services);
    view.mount(&services);
    press(&mut view, &services, KeyCode::Char('c'));
    view.unmount(&services);

    assert!(view.model().is_disposed());
    assert!(view.model().held_secret().is_none());
    assert!(!view.model().listing().is_loading());

    // The in-flight listing was aborted before it could answer
    let waited = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(waited.is_err());

    // A disposed card ignores further input
    press(&mut view, &services, KeyCode::Esc);
    press(&mut view, &services, KeyCode::Char('c'));
    assert!(!view.model().is_create_open());
}
