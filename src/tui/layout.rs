//! Root layout: header + main content + status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Height of the header strip (brand + signed-in user).
pub const HEADER_HEIGHT: u16 = 1;
/// Drop the header below this terminal height.
pub const HIDE_HEADER_THRESHOLD: u16 = 12;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Header row (None on short terminals).
    pub header: Option<Rect>,
    /// Main content area.
    pub main: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect) -> Self {
        if area.height < HIDE_HEADER_THRESHOLD {
            let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
            return AppLayout {
                header: None,
                main: rows[0],
                status: rows[1],
            };
        }

        let rows = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        AppLayout {
            header: Some(rows[0]),
            main: rows[1],
            status: rows[2],
        }
    }
}

/// A rect of `width` x `height` percent centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// A rect `percent_x` wide and exactly `height` rows tall, centred in `area`.
pub fn centered_fixed(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let rows = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(rows[1])[1]
}
