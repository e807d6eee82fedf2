//! Reveal-once protocol for freshly issued API tokens.
//!
//! [`TokenListModel`] owns everything the token list card needs between
//! renders: which dialog is open, the secret currently on display, the copy
//! confirmation, and the listing cursor. It is advanced by
//! [`TokenListModel::update`], a pure function from `(model, Msg)` to
//! `(model, effects)`. Network calls and clipboard writes are described as
//! [`Effect`] values and executed elsewhere; their outcomes come back as
//! further [`Msg`]s tagged with the [`RequestId`] they answer.
//!
//! ```text
//!   Idle ──OpenCreate──▶ Creating ──CreateSucceeded──▶ Revealing(secret)
//!    ▲                      │  ▲                              │
//!    └──────CloseCreate─────┘  └────────OpenCreate────────────┤
//!    ▲                                                        │
//!    └──────────────────────DismissReveal─────────────────────┘
//! ```

use crate::api::models::{CreateTokenRequest, IssuedToken, PageQuery, TokenPage, TokenSecret};

/// Default rows per page when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Correlates an effect with the message that reports its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

// ── State ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// No dialog open, nothing revealed.
    Idle,
    /// Create dialog open. `retained` holds a secret that was on display when
    /// the dialog was opened; it is shown again if the dialog is cancelled and
    /// replaced if the creation succeeds.
    Creating { retained: Option<TokenSecret> },
    /// A freshly issued secret is on display.
    Revealing { secret: TokenSecret },
}

/// Transient feedback shown under the revealed secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyNotice {
    Copied(String),
    Failed(String),
}

impl CopyNotice {
    pub fn message(&self) -> &str {
        match self {
            CopyNotice::Copied(msg) | CopyNotice::Failed(msg) => msg,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CopyNotice::Failed(_))
    }
}

/// Listing cursor and the last page received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    /// Last successfully loaded page; kept while a refresh is in flight or
    /// after a refresh fails.
    pub data: Option<TokenPage>,
    /// Error from the most recent listing request, if it failed.
    pub error: Option<String>,
    in_flight: Option<RequestId>,
}

impl Listing {
    fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            data: None,
            error: None,
            in_flight: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn query(&self) -> PageQuery {
        PageQuery::for_page(self.page, self.page_size)
    }

    /// Highest page number reachable given the last known total.
    pub fn last_page(&self) -> Option<u32> {
        self.data
            .as_ref()
            .map(|d| d.total.div_ceil(self.page_size).max(1))
    }
}

// ── Messages & effects ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Msg {
    /// View became visible; issue the first listing request.
    Mount,
    OpenCreate,
    CloseCreate,
    SubmitCreate(CreateTokenRequest),
    CreateSucceeded {
        request: RequestId,
        issued: IssuedToken,
    },
    CreateFailed {
        request: RequestId,
        error: String,
    },
    CopySecret,
    /// Clipboard outcome for the most recent [`Effect::CopyToClipboard`].
    CopyFinished(Result<(), String>),
    DismissCopyNotice,
    DismissReveal,
    ChangePage(u32),
    Refresh,
    PageLoaded {
        request: RequestId,
        page: TokenPage,
    },
    PageFailed {
        request: RequestId,
        error: String,
    },
    /// View is going away; drop held secrets and cancel outstanding work.
    Unmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CreateToken {
        request: RequestId,
        payload: CreateTokenRequest,
    },
    FetchTokens {
        request: RequestId,
        query: PageQuery,
    },
    CopyToClipboard(TokenSecret),
    CancelOutstanding,
}

// ── Model ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TokenListModel {
    phase: Phase,
    copy_notice: Option<CopyNotice>,
    listing: Listing,
    pending_create: Option<RequestId>,
    next_request: u64,
    copied_text: String,
    disposed: bool,
}

impl Default for TokenListModel {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, "copied to clipboard")
    }
}

impl TokenListModel {
    pub fn new(page_size: u32, copied_text: impl Into<String>) -> Self {
        Self {
            phase: Phase::Idle,
            copy_notice: None,
            listing: Listing::new(page_size),
            pending_create: None,
            next_request: 0,
            copied_text: copied_text.into(),
            disposed: false,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn copy_notice(&self) -> Option<&CopyNotice> {
        self.copy_notice.as_ref()
    }

    pub fn is_create_open(&self) -> bool {
        matches!(self.phase, Phase::Creating { .. })
    }

    /// Whether a create request is awaiting its response.
    pub fn is_submitting(&self) -> bool {
        self.pending_create.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// The secret shown in the reveal dialog, if that dialog is open.
    pub fn revealed_secret(&self) -> Option<&TokenSecret> {
        match &self.phase {
            Phase::Revealing { secret } => Some(secret),
            _ => None,
        }
    }

    /// Any secret still held in memory, including one parked behind an open
    /// create dialog.
    pub fn held_secret(&self) -> Option<&TokenSecret> {
        match &self.phase {
            Phase::Revealing { secret } => Some(secret),
            Phase::Creating { retained } => retained.as_ref(),
            Phase::Idle => None,
        }
    }

    /// Advance the protocol by one message.
    pub fn update(mut self, msg: Msg) -> (Self, Vec<Effect>) {
        if self.disposed {
            return (self, Vec::new());
        }

        let mut effects = Vec::new();

        match msg {
            Msg::Mount | Msg::Refresh => {
                effects.push(self.fetch_current_page());
            }
            Msg::OpenCreate => {
                self.phase = match std::mem::replace(&mut self.phase, Phase::Idle) {
                    Phase::Idle => Phase::Creating { retained: None },
                    Phase::Revealing { secret } => Phase::Creating {
                        retained: Some(secret),
                    },
                    creating @ Phase::Creating { .. } => creating,
                };
            }
            Msg::CloseCreate => {
                self.phase = match std::mem::replace(&mut self.phase, Phase::Idle) {
                    Phase::Creating {
                        retained: Some(secret),
                    } => Phase::Revealing { secret },
                    Phase::Creating { retained: None } => Phase::Idle,
                    other => other,
                };
            }
            Msg::SubmitCreate(payload) => {
                if self.is_create_open() && self.pending_create.is_none() {
                    let request = self.next_id();
                    self.pending_create = Some(request);
                    effects.push(Effect::CreateToken { request, payload });
                }
            }
            Msg::CreateSucceeded { request, issued } => {
                if self.pending_create == Some(request) {
                    self.pending_create = None;
                    self.copy_notice = None;
                    self.phase = Phase::Revealing {
                        secret: issued.token,
                    };
                    effects.push(self.fetch_current_page());
                }
            }
            Msg::CreateFailed { request, .. } => {
                if self.pending_create == Some(request) {
                    self.pending_create = None;
                }
            }
            Msg::CopySecret => {
                if let Phase::Revealing { secret } = &self.phase {
                    effects.push(Effect::CopyToClipboard(secret.clone()));
                }
            }
            Msg::CopyFinished(outcome) => {
                if matches!(self.phase, Phase::Revealing { .. }) {
                    self.copy_notice = Some(match outcome {
                        Ok(()) => CopyNotice::Copied(self.copied_text.clone()),
                        Err(reason) => CopyNotice::Failed(reason),
                    });
                }
            }
            Msg::DismissCopyNotice => {
                self.copy_notice = None;
            }
            Msg::DismissReveal => {
                if matches!(self.phase, Phase::Revealing { .. }) {
                    self.phase = Phase::Idle;
                    self.copy_notice = None;
                }
            }
            Msg::ChangePage(page) => {
                let mut page = page.max(1);
                if let Some(last) = self.listing.last_page() {
                    page = page.min(last);
                }
                self.listing.page = page;
                effects.push(self.fetch_current_page());
            }
            Msg::PageLoaded { request, page } => {
                if self.listing.in_flight == Some(request) {
                    self.listing.in_flight = None;
                    self.listing.error = None;
                    self.listing.data = Some(page);
                }
            }
            Msg::PageFailed { request, error } => {
                if self.listing.in_flight == Some(request) {
                    self.listing.in_flight = None;
                    self.listing.error = Some(error);
                }
            }
            Msg::Unmount => {
                self.disposed = true;
                self.phase = Phase::Idle;
                self.copy_notice = None;
                self.pending_create = None;
                self.listing.in_flight = None;
                effects.push(Effect::CancelOutstanding);
            }
        }

        (self, effects)
    }

    fn next_id(&mut self) -> RequestId {
        self.next_request += 1;
        RequestId(self.next_request)
    }

    fn fetch_current_page(&mut self) -> Effect {
        let request = self.next_id();
        self.listing.in_flight = Some(request);
        Effect::FetchTokens {
            request,
            query: self.listing.query(),
        }
    }
}
