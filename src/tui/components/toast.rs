//! Toast notification component
//!
//! Non-blocking alerts that auto-dismiss. Every outcome the user should
//! hear about (saved, deleted, request failed, validation failed) ends up
//! here. Toasts stack upward from the bottom-right corner.

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use std::time::{Duration, Instant};

/// Most toasts shown at once; older ones are dropped first
pub const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Error => "✗",
            ToastKind::Warning => "!",
            ToastKind::Info => "i",
        }
    }

    fn color(self, theme: &Theme) -> Color {
        match self {
            ToastKind::Success => theme.success,
            ToastKind::Error => theme.error,
            ToastKind::Warning => theme.warning,
            ToastKind::Info => theme.info,
        }
    }
}

/// A toast notification that auto-dismisses
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created_at: Instant,
    duration: Duration,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            created_at: Instant::now(),
            duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.duration
    }

    /// Render the toast `slot` rows above the bottom-right corner
    ///
    /// Uses `Clear` so the toast sits on top of modals too.
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, slot: u16) {
        let text = format!("{} {}", self.kind.icon(), self.message);
        let width = (text.chars().count() as u16 + 4).min(area.width.saturating_sub(4));
        let height = 3;

        let x = area.right().saturating_sub(width + 2);
        let y = area
            .bottom()
            .saturating_sub((height + 2) + slot * height);
        let toast_area = Rect::new(x, y, width, height).intersection(area);

        let color = self.kind.color(theme);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(theme.background));

        let paragraph = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(color))
            .block(block);

        f.render_widget(Clear, toast_area);
        f.render_widget(paragraph, toast_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_expires_after_duration() {
        let toast = Toast::new(ToastKind::Info, "hello", Duration::from_secs(5));
        let start = toast.created_at;
        assert!(!toast.is_expired_at(start + Duration::from_secs(4)));
        assert!(toast.is_expired_at(start + Duration::from_secs(5)));
    }
}
