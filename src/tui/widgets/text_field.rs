//! Single-line labelled text field with cursor editing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::theme;

pub struct TextField {
    label: String,
    placeholder: String,
    content: String,
    /// Byte offset into `content`, always on a char boundary.
    cursor: usize,
    max_chars: usize,
}

impl TextField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            placeholder: String::new(),
            content: String::new(),
            cursor: 0,
            max_chars: 256,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn set_text(&mut self, text: &str) {
        self.content = text.chars().take(self.max_chars).collect();
        self.cursor = self.content.len();
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Apply an editing key. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.content.len(),
            _ => return false,
        }
        true
    }

    fn insert_char(&mut self, c: char) {
        if c.is_control() || self.content.chars().count() >= self.max_chars {
            return;
        }
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    fn delete(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.content.drain(self.cursor..next);
        }
    }

    fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }

    /// Draw the field in a bordered box; places the terminal cursor when focused.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = theme::field(&self.label, focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = if self.content.is_empty() {
            Line::from(Span::styled(self.placeholder.clone(), theme::key_hint()))
        } else {
            Line::from(Span::styled(
                self.content.clone(),
                Style::default().fg(theme::TEXT),
            ))
        };
        frame.render_widget(Paragraph::new(line), inner);

        if focused && inner.width > 0 && inner.height > 0 {
            let column = self.content[..self.cursor].chars().count() as u16;
            frame.set_cursor_position((
                inner.x + column.min(inner.width.saturating_sub(1)),
                inner.y,
            ));
        }
    }
}
