//! Effect runner tests: every effect kind executed against mocked
//! collaborators, outcomes observed on the app event channel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::api::client::{MockTokenBackend, TokenBackend};
use crate::api::error::Result as ApiResult;
use crate::api::models::{
    CreateTokenRequest, IssuedToken, PageQuery, TokenPage, TokenSecret, UserSummary,
};
use crate::core::reveal::{Effect, Msg, TokenListModel};
use crate::tests::common::*;
use crate::tests::mocks::{listing_backend, rejecting_backend};
use crate::tui::clipboard::MemoryClipboard;
use crate::tui::effects::EffectRunner;
use crate::tui::events::AppEvent;

/// Backend that never answers within a test's lifetime.
struct StalledBackend;

#[async_trait]
impl TokenBackend for StalledBackend {
    async fn create_token(&self, _request: CreateTokenRequest) -> ApiResult<IssuedToken> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!("stalled backend never answers")
    }

    async fn list_tokens(&self, _query: PageQuery) -> ApiResult<TokenPage> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!("stalled backend never answers")
    }

    async fn current_user(&self) -> ApiResult<UserSummary> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        unreachable!("stalled backend never answers")
    }
}

/// Pull the request id out of the single effect produced by a message.
fn only_effect(model: TokenListModel, msg: Msg) -> (TokenListModel, Effect) {
    let (model, mut effects) = model.update(msg);
    assert_eq!(effects.len(), 1, "expected exactly one effect");
    (model, effects.remove(0))
}

#[tokio::test]
async fn test_fetch_reports_page_with_request_id() {
    let backend = listing_backend(create_test_page(&["ci-bot", "deploy"], 0, 2));
    let (services, mut rx) = create_test_services(backend, Arc::new(MemoryClipboard::new()));
    let mut runner = EffectRunner::new();

    let (_, effect) = only_effect(TokenListModel::default(), Msg::Mount);
    let Effect::FetchTokens { request, .. } = effect.clone() else {
        panic!("mount should fetch");
    };
    assert!(runner.run(effect, &services).is_none());

    match rx.recv().await {
        Some(AppEvent::Tokens(Msg::PageLoaded { request: got, page })) => {
            assert_eq!(got, request);
            assert_eq!(page.items.len(), 2);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_passes_page_query() {
    let mut backend = MockTokenBackend::new();
    backend
        .expect_list_tokens()
        .withf(|query| query.start == 0)
        .times(1)
        .returning(|_| Ok(create_test_page(&["first"], 0, 41)));
    backend
        .expect_list_tokens()
        .withf(|query| *query == PageQuery { start: 40, count: 20 })
        .times(1)
        .returning(|_| Ok(create_test_page(&[], 40, 41)));
    let (services, mut rx) = create_test_services(backend, Arc::new(MemoryClipboard::new()));
    let mut runner = EffectRunner::new();

    let (model, effect) = only_effect(TokenListModel::default(), Msg::Mount);
    runner.run(effect, &services);
    let Some(AppEvent::Tokens(loaded)) = rx.recv().await else {
        panic!("expected a listing result");
    };
    let (model, _) = model.update(loaded);

    let (_, effect) = only_effect(model, Msg::ChangePage(3));
    runner.run(effect, &services);
    assert!(matches!(
        rx.recv().await,
        Some(AppEvent::Tokens(Msg::PageLoaded { .. }))
    ));
}

#[tokio::test]
async fn test_create_failure_carries_backend_message() {
    let backend = rejecting_backend(400, "invalid scope: writ", create_test_page(&[], 0, 0));
    let (services, mut rx) = create_test_services(backend, Arc::new(MemoryClipboard::new()));
    let mut runner = EffectRunner::new();

    let (model, _) = TokenListModel::default().update(Msg::OpenCreate);
    let (_, effect) = only_effect(
        model,
        Msg::SubmitCreate(CreateTokenRequest::new("ci-bot", vec!["writ".into()])),
    );
    runner.run(effect, &services);

    match rx.recv().await {
        Some(AppEvent::Tokens(Msg::CreateFailed { error, .. })) => {
            assert_eq!(error, "invalid scope: writ");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_copy_is_synchronous_and_exact() {
    let clipboard = Arc::new(MemoryClipboard::new());
    let (services, mut rx) =
        create_test_services(MockTokenBackend::new(), clipboard.clone());
    let mut runner = EffectRunner::new();

    let outcome = runner.run(
        Effect::CopyToClipboard(TokenSecret::new("tok_abc123")),
        &services,
    );

    assert!(matches!(outcome, Some(Msg::CopyFinished(Ok(())))));
    assert_eq!(clipboard.contents().as_deref(), Some("tok_abc123"));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_copy_failure_is_reported_not_raised() {
    let (services, _rx) = create_test_services(
        MockTokenBackend::new(),
        Arc::new(MemoryClipboard::failing("no display")),
    );
    let mut runner = EffectRunner::new();

    match runner.run(Effect::CopyToClipboard(TokenSecret::new("s")), &services) {
        Some(Msg::CopyFinished(Err(reason))) => assert!(reason.contains("no display")),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn test_cancel_outstanding_aborts_requests() {
    let (services, mut rx) =
        create_test_services(StalledBackend, Arc::new(MemoryClipboard::new()));
    let mut runner = EffectRunner::new();

    let (_, effect) = only_effect(TokenListModel::default(), Msg::Mount);
    runner.run(effect, &services);
    assert_eq!(runner.outstanding(), 1);

    runner.run(Effect::CancelOutstanding, &services);
    assert_eq!(runner.outstanding(), 0);

    let waited = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
    assert!(waited.is_err(), "a cancelled request must not report back");
}

#[tokio::test]
async fn test_current_user_is_delivered() {
    let mut backend = MockTokenBackend::new();
    backend
        .expect_current_user()
        .returning(|| Ok(create_test_user()));
    let (services, mut rx) = create_test_services(backend, Arc::new(MemoryClipboard::new()));

    services.load_current_user();

    match rx.recv().await {
        Some(AppEvent::CurrentUser(Ok(user))) => assert_eq!(user.display_name(), "Jane Doe"),
        other => panic!("unexpected event: {other:?}"),
    }
}
