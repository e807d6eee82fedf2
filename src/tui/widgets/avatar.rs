//! User avatar: an initials badge followed by the user's full name.
//!
//! Terminals cannot show `avatar_url`, so the badge always falls back to
//! initials on a colour picked deterministically from the login name.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::api::models::UserSummary;
use crate::tui::theme;

/// Badge sizes, named after the web dashboard's size tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AvatarSize {
    #[default]
    Scale800,
    Scale1000,
    Scale1200,
    Scale1400,
    Px64,
}

impl AvatarSize {
    /// Blank columns on each side of the initials.
    fn padding(self) -> usize {
        match self {
            AvatarSize::Scale800 => 0,
            AvatarSize::Scale1000 => 1,
            AvatarSize::Scale1200 => 1,
            AvatarSize::Scale1400 => 2,
            AvatarSize::Px64 => 3,
        }
    }
}

pub struct UserAvatar<'a> {
    user: &'a UserSummary,
    size: AvatarSize,
}

impl<'a> UserAvatar<'a> {
    pub fn new(user: &'a UserSummary) -> Self {
        Self {
            user,
            size: AvatarSize::default(),
        }
    }

    pub fn size(mut self, size: AvatarSize) -> Self {
        self.size = size;
        self
    }

    pub fn badge_color(&self) -> ratatui::style::Color {
        let hash = self
            .user
            .name
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(u32::from(b)));
        theme::AVATAR_PALETTE[hash as usize % theme::AVATAR_PALETTE.len()]
    }

    pub fn to_line(&self) -> Line<'static> {
        let pad = " ".repeat(self.size.padding() + 1);
        let badge = format!("{pad}{}{pad}", self.user.initials());
        Line::from(vec![
            Span::styled(
                badge,
                Style::default()
                    .fg(theme::BG_BASE)
                    .bg(self.badge_color())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(self.user.display_name(), Style::default().fg(theme::TEXT)),
        ])
    }
}

impl Widget for UserAvatar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.to_line().render(area, buf);
    }
}
