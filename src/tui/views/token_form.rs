//! Create-token form shown inside the create dialog.
//!
//! Only the checks needed to build a request happen here; scope names,
//! uniqueness and expiry policy are the backend's call and come back as
//! an error line under the fields.

use chrono::{DateTime, NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};
use thiserror::Error;

use crate::api::models::CreateTokenRequest;
use crate::core::i18n::Translator;
use crate::tui::layout::centered_fixed;
use crate::tui::theme;
use crate::tui::widgets::text_field::TextField;

const NAME: usize = 0;
const DESCRIPTION: usize = 1;
const SCOPES: usize = 2;
const EXPIRY: usize = 3;
const FIELD_COUNT: usize = 4;

/// Rows needed by the dialog: 4 fields x 3 + error + hint + borders.
const DIALOG_HEIGHT: u16 = 17;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("name is required")]
    NameRequired,
    #[error("expiry must be a date like 2030-12-31, got '{0}'")]
    InvalidExpiry(String),
}

/// Result of feeding a key to the form.
#[derive(Debug, PartialEq, Eq)]
pub enum FormOutcome {
    Consumed,
    Submit(CreateTokenRequest),
    Cancel,
}

pub struct TokenFormState {
    fields: [TextField; FIELD_COUNT],
    focus: usize,
    error: Option<String>,
}

impl TokenFormState {
    pub fn new(t: &Translator) -> Self {
        Self {
            fields: [
                TextField::new(t.t("name"))
                    .with_placeholder("ci-bot")
                    .with_max_chars(128),
                TextField::new(t.t("description")).with_placeholder("optional"),
                TextField::new(t.t("scopes")).with_placeholder("api, read_organization"),
                TextField::new(t.t("expired_at")).with_placeholder("YYYY-MM-DD (optional)"),
            ],
            focus: NAME,
            error: None,
        }
    }

    /// Clear all input, ready for the next creation.
    pub fn reset(&mut self) {
        for field in &mut self.fields {
            field.clear();
        }
        self.focus = NAME;
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show a backend rejection under the fields.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn focused(&self) -> usize {
        self.focus
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> FormOutcome {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => FormOutcome::Cancel,
            (_, KeyCode::Tab) | (KeyModifiers::NONE, KeyCode::Down) => {
                self.focus = (self.focus + 1) % FIELD_COUNT;
                FormOutcome::Consumed
            }
            (_, KeyCode::BackTab) | (KeyModifiers::NONE, KeyCode::Up) => {
                self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
                FormOutcome::Consumed
            }
            (_, KeyCode::Enter) => match self.build_request() {
                Ok(request) => {
                    self.error = None;
                    FormOutcome::Submit(request)
                }
                Err(e) => {
                    if e == FormError::NameRequired {
                        self.focus = NAME;
                    }
                    self.error = Some(e.to_string());
                    FormOutcome::Consumed
                }
            },
            _ => {
                if self.fields[self.focus].handle_key(key) {
                    self.error = None;
                }
                FormOutcome::Consumed
            }
        }
    }

    pub fn build_request(&self) -> Result<CreateTokenRequest, FormError> {
        let name = self.fields[NAME].text().trim();
        if name.is_empty() {
            return Err(FormError::NameRequired);
        }

        let scopes = self.fields[SCOPES]
            .text()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Ok(CreateTokenRequest {
            name: name.to_string(),
            description: self.fields[DESCRIPTION].text().trim().to_string(),
            scopes,
            expired_at: parse_expiry(self.fields[EXPIRY].text())?,
        })
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, submitting: bool, t: &Translator) {
        let modal = centered_fixed(60, DIALOG_HEIGHT, area);
        frame.render_widget(Clear, modal);

        let title = t.t_with("create sth", &[t.t("api token")]);
        let block = theme::modal(&title);
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        for (i, field) in self.fields.iter().enumerate() {
            field.render(frame, rows[i], i == self.focus && !submitting);
        }

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {error}"),
                    Style::default().fg(theme::NEGATIVE),
                ))
                .wrap(Wrap { trim: true }),
                rows[4],
            );
        }

        let hint = if submitting {
            Line::from(Span::styled(format!(" {}", t.t("submitting")), theme::muted()))
        } else {
            Line::from(vec![
                Span::styled(" Tab", theme::key_hint()),
                Span::raw(":next field "),
                Span::styled("Enter", theme::key_hint()),
                Span::raw(format!(":{} ", t.t("submit"))),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(":cancel"),
            ])
        };
        frame.render_widget(Paragraph::new(hint), rows[5]);
    }
}

/// Blank means "never expires"; otherwise midnight UTC of the given date.
fn parse_expiry(raw: &str) -> Result<Option<DateTime<Utc>>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| Some(dt.and_utc()))
        .ok_or_else(|| FormError::InvalidExpiry(raw.to_string()))
}
