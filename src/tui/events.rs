use crate::api::models::UserSummary;
use crate::core::reveal::Msg;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// Outcome of a backend request issued by the token list.
    Tokens(Msg),
    /// Signed-in user resolved (or failed to resolve) for the header.
    CurrentUser(Result<UserSummary, String>),
    /// Notification to display to the user.
    Notification(Notification),
}

/// High-level actions dispatched by the global key map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowHelp,
    CloseHelp,
    RefreshTokens,
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

impl Notification {
    /// A notification whose lifetime is set when it reaches `AppState`.
    pub fn pending(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            ttl_ticks: 0,
        }
    }
}
