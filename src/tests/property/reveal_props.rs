//! Property-based tests for the reveal-once protocol

use proptest::prelude::*;

use crate::api::models::{CreateTokenRequest, TokenSecret};
use crate::core::reveal::{Effect, Msg, RequestId, TokenListModel};
use crate::tests::common::{create_test_issued, create_test_page};

// ============================================================================
// Strategies
// ============================================================================

/// Secrets as backends issue them: printable, no whitespace.
fn arb_secret() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_\\-\\.=+/]{1,96}"
}

/// User-level operations; request ids are filled in by the driver.
#[derive(Debug, Clone)]
enum Op {
    OpenCreate,
    CloseCreate,
    Submit,
    Succeed(String),
    Fail,
    StaleSucceed(String),
    Copy,
    CopyFailed,
    DismissNotice,
    DismissReveal,
    Refresh,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::OpenCreate),
        1 => Just(Op::CloseCreate),
        3 => Just(Op::Submit),
        3 => arb_secret().prop_map(Op::Succeed),
        2 => Just(Op::Fail),
        1 => arb_secret().prop_map(Op::StaleSucceed),
        2 => Just(Op::Copy),
        1 => Just(Op::CopyFailed),
        1 => Just(Op::DismissNotice),
        2 => Just(Op::DismissReveal),
        1 => Just(Op::Refresh),
    ]
}

// ============================================================================
// Driver
// ============================================================================

/// Feeds ops to a model, remembering which create requests are pending and
/// which have already been answered.
struct Driver {
    model: TokenListModel,
    pending: Option<RequestId>,
    resolved: Vec<RequestId>,
}

impl Driver {
    fn new() -> Self {
        Self {
            model: TokenListModel::default(),
            pending: None,
            resolved: Vec::new(),
        }
    }

    fn send(&mut self, msg: Msg) -> Vec<Effect> {
        let (model, effects) = std::mem::take(&mut self.model).update(msg);
        self.model = model;
        for effect in &effects {
            if let Effect::CreateToken { request, .. } = effect {
                self.pending = Some(*request);
            }
        }
        effects
    }

    /// Translate an op into a message. `None` when the op makes no sense in
    /// the current state (no request to answer).
    fn message_for(&mut self, op: &Op) -> Option<Msg> {
        Some(match op {
            Op::OpenCreate => Msg::OpenCreate,
            Op::CloseCreate => Msg::CloseCreate,
            Op::Submit => Msg::SubmitCreate(CreateTokenRequest::new("t", vec![])),
            Op::Succeed(secret) => {
                let request = self.pending.take()?;
                self.resolved.push(request);
                Msg::CreateSucceeded {
                    request,
                    issued: create_test_issued("t", secret),
                }
            }
            Op::Fail => {
                let request = self.pending.take()?;
                self.resolved.push(request);
                Msg::CreateFailed {
                    request,
                    error: "rejected".into(),
                }
            }
            Op::StaleSucceed(secret) => Msg::CreateSucceeded {
                request: *self.resolved.last()?,
                issued: create_test_issued("stale", secret),
            },
            Op::Copy => Msg::CopySecret,
            Op::CopyFailed => Msg::CopyFinished(Err("no clipboard".into())),
            Op::DismissNotice => Msg::DismissCopyNotice,
            Op::DismissReveal => Msg::DismissReveal,
            Op::Refresh => Msg::Refresh,
        })
    }
}

fn held(model: &TokenListModel) -> Option<TokenSecret> {
    model.held_secret().cloned()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The secret on display is byte-for-byte what the backend issued, and
    /// copying hands exactly that value to the clipboard.
    #[test]
    fn revealed_secret_is_verbatim(secret in arb_secret()) {
        let mut driver = Driver::new();
        driver.send(Msg::OpenCreate);
        driver.send(Msg::SubmitCreate(CreateTokenRequest::new("t", vec![])));
        let msg = driver.message_for(&Op::Succeed(secret.clone())).unwrap();
        driver.send(msg);

        prop_assert_eq!(driver.model.revealed_secret().map(|s| s.expose()), Some(secret.as_str()));

        let effects = driver.send(Msg::CopySecret);
        prop_assert_eq!(effects, vec![Effect::CopyToClipboard(TokenSecret::new(secret))]);
    }

    /// Whatever happened before, the reveal protocol's safety rules hold
    /// after every single step.
    #[test]
    fn protocol_invariants_hold(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut driver = Driver::new();
        let mut last_issued: Option<String> = None;

        for op in &ops {
            let Some(msg) = driver.message_for(op) else { continue };

            let secret_before = held(&driver.model);
            let open_before = driver.model.is_create_open();

            driver.send(msg);

            match op {
                Op::Fail => {
                    prop_assert_eq!(held(&driver.model), secret_before);
                    prop_assert_eq!(driver.model.is_create_open(), open_before);
                    prop_assert!(!driver.model.is_submitting());
                }
                Op::StaleSucceed(_) => {
                    prop_assert_eq!(held(&driver.model), secret_before);
                }
                Op::Succeed(secret) => {
                    last_issued = Some(secret.clone());
                    prop_assert_eq!(
                        driver.model.revealed_secret().map(|s| s.expose().to_string()),
                        Some(secret.clone())
                    );
                }
                Op::DismissReveal if !open_before => {
                    prop_assert!(driver.model.held_secret().is_none());
                    prop_assert!(driver.model.copy_notice().is_none());
                }
                _ => {}
            }

            // Only the most recently issued secret can ever be held.
            if let Some(secret) = driver.model.held_secret() {
                prop_assert_eq!(Some(secret.expose()), last_issued.as_deref());
            }
        }
    }

    /// Requested pages are clamped to what the backend says exists.
    #[test]
    fn page_cursor_stays_in_range(
        page_size in 1u32..50,
        total in 0u32..500,
        requested in 0u32..1000,
    ) {
        let model = TokenListModel::new(page_size, "ok");
        let (model, effects) = model.update(Msg::Mount);
        let Some(Effect::FetchTokens { request, .. }) = effects.into_iter().next() else {
            return Err(TestCaseError::fail("mount must fetch"));
        };
        let shown = total.min(page_size) as usize;
        let names: Vec<String> = (0..shown).map(|i| format!("t{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (model, _) = model.update(Msg::PageLoaded {
            request,
            page: create_test_page(&refs, 0, total),
        });

        let (model, _) = model.update(Msg::ChangePage(requested));
        let last = total.div_ceil(page_size).max(1);
        prop_assert!(model.listing().page >= 1);
        prop_assert!(model.listing().page <= last);
    }
}
