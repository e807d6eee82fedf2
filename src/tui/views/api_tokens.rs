//! API token list card: paged table, create dialog and the one-time reveal dialog.
//!
//! All state transitions go through [`TokenListModel`]; this view owns the
//! model, feeds it key presses and backend responses, runs the effects it
//! emits, and draws whatever it currently says.

use std::collections::VecDeque;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::api::models::TokenSummary;
use crate::core::datetime::{format_datetime, format_optional};
use crate::core::i18n::Translator;
use crate::core::reveal::{CopyNotice, Msg, Phase, TokenListModel};
use crate::tui::effects::EffectRunner;
use crate::tui::events::{AppEvent, Notification, NotificationLevel};
use crate::tui::layout::centered_fixed;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::avatar::{AvatarSize, UserAvatar};

use super::token_form::{FormOutcome, TokenFormState};

/// Rows taken by the reveal dialog, borders included.
const REVEAL_HEIGHT: u16 = 11;

// ── State ──────────────────────────────────────────────────────────────────

pub struct ApiTokensViewState {
    model: TokenListModel,
    runner: EffectRunner,
    form: TokenFormState,
    table_state: TableState,
    detail_open: bool,
    t: Translator,
}

impl ApiTokensViewState {
    pub fn new(services: &Services) -> Self {
        Self {
            model: TokenListModel::new(services.page_size, services.copied_text.clone()),
            runner: EffectRunner::new(),
            form: TokenFormState::new(&services.translator),
            table_state: TableState::default(),
            detail_open: false,
            t: services.translator,
        }
    }

    pub fn model(&self) -> &TokenListModel {
        &self.model
    }

    pub fn form(&self) -> &TokenFormState {
        &self.form
    }

    pub fn selected(&self) -> Option<&TokenSummary> {
        let items = &self.model.listing().data.as_ref()?.items;
        items.get(self.table_state.selected()?)
    }

    pub fn is_detail_open(&self) -> bool {
        self.detail_open
    }

    /// Whether a modal dialog currently owns the keyboard.
    pub fn has_modal(&self) -> bool {
        !matches!(self.model.phase(), Phase::Idle)
    }

    pub fn mount(&mut self, services: &Services) {
        self.dispatch(Msg::Mount, services);
    }

    pub fn unmount(&mut self, services: &Services) {
        self.dispatch(Msg::Unmount, services);
    }

    /// Feed one message through the model and run the resulting effects.
    /// Effects with an immediate outcome (clipboard) are fed straight back.
    pub fn dispatch(&mut self, msg: Msg, services: &Services) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            let (model, effects) = std::mem::take(&mut self.model).update(msg);
            self.model = model;
            for effect in effects {
                if let Some(follow_up) = self.runner.run(effect, services) {
                    queue.push_back(follow_up);
                }
            }
        }
        self.sync_selection();
    }

    /// Handle a backend response delivered through the app event channel.
    pub fn on_backend_msg(&mut self, msg: Msg, services: &Services) {
        let was_submitting = self.model.is_submitting();
        let was_loading = self.model.listing().is_loading();

        let (is_success, create_error, page_error) = match &msg {
            Msg::CreateSucceeded { .. } => (true, None, None),
            Msg::CreateFailed { error, .. } => (false, Some(error.clone()), None),
            Msg::PageFailed { error, .. } => (false, None, Some(error.clone())),
            _ => (false, None, None),
        };

        self.dispatch(msg, services);

        // Only answers the model accepted reach the form or the overlay.
        if let Some(error) = create_error {
            if was_submitting && !self.model.is_submitting() {
                if self.model.is_create_open() {
                    self.form.set_error(error);
                } else {
                    // Dialog was closed while the request was out.
                    self.form.reset();
                    notify(
                        services,
                        format!(
                            "{}: {error}",
                            self.t.t_with("create sth failed", &[self.t.t("api token")])
                        ),
                        NotificationLevel::Error,
                    );
                }
            }
        }
        if let Some(error) = page_error {
            if was_loading && !self.model.listing().is_loading() {
                notify(
                    services,
                    format!("{}: {error}", self.t.t("refresh failed")),
                    NotificationLevel::Warning,
                );
            }
        }
        if is_success && was_submitting && !self.model.is_submitting() {
            self.form.reset();
            self.detail_open = false;
            notify(
                services,
                self.t.t_with("sth created", &[self.t.t("api token")]),
                NotificationLevel::Success,
            );
        }
    }

    fn sync_selection(&mut self) {
        let len = self
            .model
            .listing()
            .data
            .as_ref()
            .map(|d| d.items.len())
            .unwrap_or(0);
        match (len, self.table_state.selected()) {
            (0, _) => {
                self.table_state.select(None);
                self.detail_open = false;
            }
            (_, None) => self.table_state.select(Some(0)),
            (len, Some(i)) if i >= len => self.table_state.select(Some(len - 1)),
            _ => {}
        }
    }

    // ── Input ───────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        // Ctrl chords stay global (Ctrl+C quits from anywhere).
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        match self.model.phase() {
            Phase::Creating { .. } => self.handle_form_key(key, services),
            Phase::Revealing { .. } => self.handle_reveal_key(key, services),
            Phase::Idle => self.handle_list_key(key, services),
        }
    }

    fn handle_form_key(&mut self, key: &KeyEvent, services: &Services) -> bool {
        if self.model.is_submitting() && key.code != KeyCode::Esc {
            return true;
        }
        match self.form.handle_key(key) {
            FormOutcome::Consumed => {}
            FormOutcome::Submit(request) => self.dispatch(Msg::SubmitCreate(request), services),
            FormOutcome::Cancel => {
                self.dispatch(Msg::CloseCreate, services);
                // An outstanding submit resets the form when it answers.
                if !self.model.is_submitting() {
                    self.form.reset();
                }
            }
        }
        true
    }

    fn handle_reveal_key(&mut self, key: &KeyEvent, services: &Services) -> bool {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('y') => self.dispatch(Msg::CopySecret, services),
            KeyCode::Char('x') => self.dispatch(Msg::DismissCopyNotice, services),
            KeyCode::Char('n') => self.dispatch(Msg::OpenCreate, services),
            KeyCode::Esc | KeyCode::Enter => self.dispatch(Msg::DismissReveal, services),
            _ => {}
        }
        true
    }

    fn handle_list_key(&mut self, key: &KeyEvent, services: &Services) -> bool {
        let page = self.model.listing().page;
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('n') => {
                self.dispatch(Msg::OpenCreate, services);
            }
            KeyCode::Char('r') => self.dispatch(Msg::Refresh, services),
            KeyCode::Char(']') | KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
                if self.model.listing().data.as_ref().is_some_and(|d| d.has_next()) {
                    self.table_state.select(None);
                    self.dispatch(Msg::ChangePage(page.saturating_add(1)), services);
                }
            }
            KeyCode::Char('[') | KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
                if page > 1 {
                    self.table_state.select(None);
                    self.dispatch(Msg::ChangePage(page - 1), services);
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
            KeyCode::Char('g') => self.table_state.select_first(),
            KeyCode::Char('G') => self.table_state.select_last(),
            KeyCode::Enter => {
                self.detail_open = !self.detail_open && self.selected().is_some();
            }
            KeyCode::Esc if self.detail_open => self.detail_open = false,
            _ => return false,
        }
        self.sync_selection();
        true
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = self.t.t_with("sth list", &[self.t.t("api token")]);
        let block = theme::card(&title).title_top(
            Line::from(vec![
                Span::styled("[c] ", theme::key_hint()),
                Span::styled(self.t.t("create"), theme::highlight()),
                Span::raw(" "),
            ])
            .alignment(Alignment::Right),
        );
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(u16::from(self.model.listing().error.is_some())),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        if let Some(error) = &self.model.listing().error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {}: {error}  [r] retry", self.t.t("refresh failed")),
                    Style::default().fg(theme::NEGATIVE),
                )),
                rows[0],
            );
        }

        let (table_area, detail_area) = if self.detail_open {
            let cols =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(rows[1]);
            (cols[0], Some(cols[1]))
        } else {
            (rows[1], None)
        };

        self.render_table(frame, table_area);
        if let Some(detail_area) = detail_area {
            self.render_detail(frame, detail_area);
        }
        self.render_footer(frame, rows[2]);

        match self.model.phase() {
            Phase::Creating { .. } => {
                self.form
                    .render(frame, area, self.model.is_submitting(), &self.t);
            }
            Phase::Revealing { .. } => self.render_reveal(frame, area),
            Phase::Idle => {}
        }
    }

    fn render_table(&mut self, frame: &mut Frame, area: Rect) {
        let listing = self.model.listing();
        let Some(data) = listing.data.as_ref() else {
            let text = if listing.is_loading() {
                self.t.t("loading")
            } else {
                self.t.t("no data")
            };
            frame.render_widget(
                Paragraph::new(vec![Line::raw(""), Line::styled(format!("  {text}"), theme::muted())]),
                area,
            );
            return;
        };

        if data.items.is_empty() {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(format!("  {}", self.t.t("no data")), theme::muted()),
                ]),
                area,
            );
            return;
        }

        let header = Row::new(
            [
                "name",
                "scopes",
                "description",
                "last_used_at",
                "expired_at",
                "created_at",
            ]
            .into_iter()
            .map(|key| Cell::from(self.t.t(key)).style(theme::heading())),
        )
        .height(1)
        .bottom_margin(1);

        let rows = data.items.iter().map(|token| {
            Row::new(vec![
                Cell::from(token.name.clone()),
                Cell::from(token.scopes_label()),
                Cell::from(token.description.clone()),
                Cell::from(format_optional(token.last_used_at.as_ref())),
                Cell::from(format_optional(token.expired_at.as_ref()))
                    .style(theme::expiry(token.is_expired)),
                Cell::from(format_datetime(&token.created_at)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Fill(2),
                Constraint::Fill(3),
                Constraint::Length(19),
                Constraint::Length(19),
                Constraint::Length(19),
            ],
        )
        .header(header)
        .column_spacing(1)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let listing = self.model.listing();
        let mut spans = Vec::new();

        if let Some(data) = &listing.data {
            spans.push(Span::styled(format!(" {} ", data.range_label()), theme::muted()));
            if let Some(last) = listing.last_page() {
                spans.push(Span::styled(
                    format!("page {}/{last} ", listing.page),
                    theme::key_hint(),
                ));
            }
        }
        if listing.is_loading() && listing.data.is_some() {
            spans.push(Span::styled(
                format!("{} ", self.t.t("loading")),
                Style::default().fg(theme::PRIMARY_LIGHT),
            ));
        }
        spans.extend([
            Span::styled("│ j/k", theme::key_hint()),
            Span::raw(":select "),
            Span::styled("[/]", theme::key_hint()),
            Span::raw(":page "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":details "),
            Span::styled("r", theme::key_hint()),
            Span::raw(":refresh"),
        ]);

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(token) = self.selected() else {
            return;
        };

        let block = Block::default()
            .title(format!(" {} ", token.name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_DIM));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let label = |key: &str| Span::styled(format!("{:<14}", self.t.t(key)), theme::muted());
        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("{:<14}", "uid"), theme::muted()),
                Span::raw(token.uid.clone()),
            ]),
            Line::from(vec![label("description"), Span::raw(token.description.clone())]),
            Line::from(vec![
                label("created_at"),
                Span::raw(format_datetime(&token.created_at)),
            ]),
            Line::from(vec![
                label("last_used_at"),
                Span::raw(format_optional(token.last_used_at.as_ref())),
            ]),
            Line::from(vec![
                label("expired_at"),
                Span::styled(
                    format_optional(token.expired_at.as_ref()),
                    theme::expiry(token.is_expired),
                ),
            ]),
            Line::raw(""),
            Line::from(label("scopes")),
        ];
        lines.extend(
            token
                .scopes
                .iter()
                .map(|scope| Line::from(format!("  • {scope}"))),
        );
        if let Some(user) = &token.user {
            lines.push(Line::raw(""));
            lines.push(Line::from(label("creator")));
            let mut avatar = UserAvatar::new(user).size(AvatarSize::Scale1000).to_line();
            avatar.spans.insert(0, Span::raw("  "));
            lines.push(avatar);
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }

    fn render_reveal(&self, frame: &mut Frame, area: Rect) {
        let Some(secret) = self.model.revealed_secret() else {
            return;
        };

        let modal = centered_fixed(70, REVEAL_HEIGHT, area);
        frame.render_widget(Clear, modal);
        let block = theme::modal(self.t.t("api token only show once time tips"));
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

        let cols = Layout::horizontal([Constraint::Min(10), Constraint::Length(12)]).split(rows[1]);

        let field = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_DIM));
        frame.render_widget(
            Paragraph::new(Span::styled(secret.expose().to_string(), theme::secret_field()))
                .wrap(Wrap { trim: false })
                .block(field),
            cols[0],
        );

        let button = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(self.t.t("copy"), theme::highlight()),
                Span::styled(" (c)", theme::key_hint()),
            ]))
            .alignment(Alignment::Center)
            .block(button),
            cols[1],
        );

        if let Some(notice) = self.model.copy_notice() {
            frame.render_widget(Paragraph::new(notice_line(notice, &self.t)), rows[2]);
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" c", theme::key_hint()),
                Span::raw(":copy "),
                Span::styled("x", theme::key_hint()),
                Span::raw(":dismiss notice "),
                Span::styled("n", theme::key_hint()),
                Span::raw(":new token "),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(":close"),
            ])),
            rows[4],
        );
    }
}

fn notice_line(notice: &CopyNotice, t: &Translator) -> Line<'static> {
    match notice {
        CopyNotice::Copied(message) => Line::from(vec![
            Span::styled(" ✓ ", Style::default().fg(theme::POSITIVE).add_modifier(Modifier::BOLD)),
            Span::styled(message.clone(), Style::default().fg(theme::POSITIVE)),
            Span::styled("  [x]", theme::key_hint()),
        ]),
        CopyNotice::Failed(reason) => Line::from(vec![
            Span::styled(" ✗ ", Style::default().fg(theme::NEGATIVE).add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("{}: {reason}", t.t("copy failed")),
                Style::default().fg(theme::NEGATIVE),
            ),
            Span::styled("  [x]", theme::key_hint()),
        ]),
    }
}

fn notify(services: &Services, message: String, level: NotificationLevel) {
    let _ = services
        .event_tx
        .send(AppEvent::Notification(Notification::pending(message, level)));
}

// ── Tests ──────────────────────────────────────────────────────────────────
