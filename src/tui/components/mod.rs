// Components module - reusable UI building blocks
//
// Shell components are rendered around every tab:
// - Title bar: app name, active journal, tab strip
// - Status bar: uptime, pending requests, key hints
// - Logs panel: captured log entries (toggle with L)
// - Toasts: auto-expiring alerts on top of everything

pub mod logs_panel;
pub mod status_bar;
pub mod title_bar;
pub mod toast;

pub use toast::{Toast, ToastKind};

use crate::tui::app::App;
use ratatui::{layout::Rect, Frame};

/// Render the title bar (convenience wrapper)
pub fn render_title(f: &mut Frame, area: Rect, app: &App) {
    title_bar::render(f, area, app);
}

/// Render the status bar (convenience wrapper)
pub fn render_status(f: &mut Frame, area: Rect, app: &App) {
    status_bar::render(f, area, app);
}

/// Render the logs panel (convenience wrapper)
pub fn render_logs_panel(f: &mut Frame, area: Rect, app: &App) {
    logs_panel::render(f, area, app);
}
