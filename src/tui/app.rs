use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::api::models::UserSummary;
use crate::core::reveal::Msg;

use super::events::{Action, AppEvent, Notification, NotificationLevel};
use super::layout::{centered_rect, AppLayout};
use super::services::Services;
use super::theme;
use super::views::api_tokens::ApiTokensViewState;
use super::widgets::avatar::UserAvatar;

/// Most notifications on screen at once.
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// The API token card.
    pub tokens: ApiTokensViewState,
    /// Signed-in user for the header; `None` until resolved.
    pub current_user: Option<UserSummary>,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    notification_ttl: u32,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        services: Services,
        notification_ttl: u32,
    ) -> Self {
        Self {
            running: true,
            tokens: ApiTokensViewState::new(&services),
            current_user: None,
            notifications: Vec::new(),
            notification_ttl: notification_ttl.max(1),
            show_help: false,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        self.tokens.mount(&self.services);
        self.services.load_current_user();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.handle_event(AppEvent::Tick);
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Token card (its dialogs capture everything but Ctrl chords)
                if self.tokens.handle_input(&crossterm_event, &self.services) {
                    return;
                }

                // Priority 3: Global keybindings
                if let Some(action) = self.map_input_to_action(crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Tick => self.on_tick(),
            AppEvent::Tokens(msg) => {
                self.tokens.on_backend_msg(msg, &self.services);
            }
            AppEvent::CurrentUser(Ok(user)) => {
                log::debug!("Signed in as {}", user.name);
                self.current_user = Some(user);
            }
            AppEvent::CurrentUser(Err(error)) => {
                self.push_notification(
                    format!("Could not load current user: {error}"),
                    NotificationLevel::Warning,
                );
            }
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
        }
    }

    /// Map help modal input to action.
    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match (*modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (_, KeyCode::Esc | KeyCode::Char('?')) => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(Action::RefreshTokens),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::F(5) => Some(Action::RefreshTokens),
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.quit(),
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::RefreshTokens => self.tokens.dispatch(Msg::Refresh, &self.services),
        }
    }

    /// Tear the token card down before leaving so no secret outlives the view.
    fn quit(&mut self) {
        self.tokens.unmount(&self.services);
        self.running = false;
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notifications.push(Notification {
            message,
            level,
            ttl_ticks: self.notification_ttl,
        });

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired.
    fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::compute(area);

        if let Some(header) = layout.header {
            self.render_header(frame, header);
        }
        self.tokens.render(frame, layout.main);
        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::horizontal([Constraint::Min(10), Constraint::Length(40)]).split(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" TOKENDECK ", theme::brand_badge()),
                Span::styled(format!(" v{}", crate::VERSION), theme::key_hint()),
            ])),
            cols[0],
        );

        let user = match &self.current_user {
            Some(user) => UserAvatar::new(user).to_line(),
            None => Line::styled("…", theme::muted()),
        };
        frame.render_widget(Paragraph::new(user).alignment(Alignment::Right), cols[1]);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let t = &self.services.translator;
        let listing = self.tokens.model().listing();

        let status = if listing.is_loading() {
            Span::styled(t.t("loading"), Style::default().fg(theme::PRIMARY_LIGHT))
        } else if listing.error.is_some() {
            Span::styled(t.t("refresh failed"), Style::default().fg(theme::NEGATIVE))
        } else {
            Span::styled("ready", Style::default().fg(theme::TEXT_MUTED))
        };

        let line = Line::from(vec![
            Span::styled(" TOKENDECK ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(
                t.t_with("sth list", &[t.t("api token")]),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            status,
            Span::raw(" │ "),
            Span::styled("c", theme::key_hint()),
            Span::raw(format!(":{} ", t.t("create"))),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = (self.notifications.len() as u16).min(area.height);
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1.min(area.height.saturating_sub(height));

        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Success => ("✓", theme::POSITIVE),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::NEGATIVE),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Global:", ""),
            ("q / Ctrl+C", "Quit"),
            ("?", "Toggle this help"),
            ("F5 / Ctrl+R", "Refresh token list"),
            ("", ""),
            ("Token list:", ""),
            ("c / n", "Create a token"),
            ("j/k", "Select row"),
            ("g / G", "First / last row"),
            ("[ / ]", "Previous / next page"),
            ("Enter", "Toggle detail panel"),
            ("r", "Refresh"),
            ("", ""),
            ("Create dialog:", ""),
            ("Tab / Shift+Tab", "Next / previous field"),
            ("Enter", "Submit"),
            ("Esc", "Cancel"),
            ("", ""),
            ("New token dialog:", ""),
            ("c / y", "Copy token to clipboard"),
            ("x", "Dismiss copy notice"),
            ("n", "Create another token"),
            ("Esc", "Close (the token cannot be shown again)"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", theme::title())),
            Line::raw(""),
        ];

        for (key, desc) in keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), theme::title())));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{key:<18}"),
                        Style::default()
                            .fg(theme::PRIMARY_LIGHT)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(desc),
                ]));
            }
        }

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}
