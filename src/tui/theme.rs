// Theme support for the TUI
//
// One palette built on the terminal's ANSI colors so the admin panel
// follows whatever scheme the user's terminal already has.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

/// Color palette for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base
    pub foreground: Color,
    pub background: Color,
    pub muted: Color,

    // Chrome
    pub title: Color,
    pub border: Color,
    pub border_type: BorderType,
    pub highlight: Color,
    pub selection: Color,
    pub selection_fg: Color,
    pub status_bar: Color,
    pub key: Color,

    // Alert kinds
    pub success: Color,
    pub error: Color,
    pub warning: Color,
    pub info: Color,
}

impl Theme {
    /// Auto theme - uses terminal's ANSI palette
    pub fn auto() -> Self {
        Self {
            name: "auto".to_string(),
            foreground: Color::Reset,
            background: Color::Reset,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            border_type: BorderType::Rounded,
            highlight: Color::Yellow,
            selection: Color::Blue,
            selection_fg: Color::White,
            status_bar: Color::Green,
            key: Color::Cyan,
            success: Color::Green,
            error: Color::Red,
            warning: Color::Yellow,
            info: Color::LightBlue,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style(&self) -> Style {
        Style::default()
            .fg(self.selection_fg)
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::auto()
    }
}
