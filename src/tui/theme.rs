//! Teal & coral colour theme for the tokendeck TUI.
//!
//! All colours are RGB truecolor. Views import from here instead of using
//! inline `Color::*` literals.

use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Teal: active items, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x00, 0x80, 0x80);
/// Light teal: hints, secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x00, 0x96, 0x88);

/// Coral: calls to action, modal borders.
pub const ACCENT: Color = Color::Rgb(0xFF, 0x7F, 0x50);

// ── Surfaces & text ─────────────────────────────────────────────────────────

pub const BG_BASE: Color = Color::Rgb(0x0A, 0x19, 0x19);
/// Read-only input background (the disabled secret field).
pub const BG_DISABLED: Color = Color::Rgb(0x1C, 0x2B, 0x2B);

pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

// ── Semantic ────────────────────────────────────────────────────────────────

/// Expired tokens, failures.
pub const NEGATIVE: Color = Color::Rgb(0xEF, 0x53, 0x50);
/// Live tokens, confirmations.
pub const POSITIVE: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);

/// Avatar badge backgrounds, picked by name hash.
pub const AVATAR_PALETTE: [Color; 6] = [
    Color::Rgb(0x00, 0x80, 0x80),
    Color::Rgb(0xFF, 0x7F, 0x50),
    Color::Rgb(0x7E, 0x57, 0xC2),
    Color::Rgb(0x42, 0xA5, 0xF5),
    Color::Rgb(0x66, 0xBB, 0x6A),
    Color::Rgb(0xEC, 0x40, 0x7A),
];

// ── Style helpers ───────────────────────────────────────────────────────────

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Table header cells.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Selected table row.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Key hint style (e.g., "[c] create").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// The revealed secret: readable but visibly not editable.
pub fn secret_field() -> Style {
    Style::default()
        .fg(TEXT)
        .bg(BG_DISABLED)
        .add_modifier(Modifier::BOLD)
}

/// Expiry cell colour by token status.
pub fn expiry(is_expired: bool) -> Style {
    Style::default().fg(if is_expired { NEGATIVE } else { POSITIVE })
}

// ── Block builders ──────────────────────────────────────────────────────────

/// The bordered card that hosts a view.
pub fn card(label: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {label} "))
        .title_style(title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(PRIMARY))
}

/// A centred-title modal frame.
pub fn modal(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT))
        .style(Style::default().bg(BG_BASE))
}

/// Frame around a single form field.
pub fn field(label: &str, focused: bool) -> Block<'_> {
    let border = if focused { PRIMARY_LIGHT } else { TEXT_DIM };
    Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}
