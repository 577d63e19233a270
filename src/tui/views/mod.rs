// Views module - screen-level rendering logic
//
// The screen is a fixed shell around the active tab:
// - Title bar with the tab strip
// - Content: an entity section (table + pagination) or the SEO tab
// - Optional logs panel
// - Status bar
//
// Modals and toasts are drawn last, on top of everything.

mod form;
mod modal;
mod section;
mod seo;

use super::app::{App, Tab};
use crate::tui::components;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

/// Height of the logs panel when shown
const LOGS_HEIGHT: u16 = 10;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &App) {
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(8)];
    if app.show_logs {
        constraints.push(Constraint::Length(LOGS_HEIGHT));
    }
    constraints.push(Constraint::Length(2));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    components::render_title(f, chunks[0], app);

    match app.tab {
        Tab::Section(kind) => section::render(f, chunks[1], app, app.section(kind)),
        Tab::Seo => seo::render(f, chunks[1], app),
    }

    if app.show_logs {
        components::render_logs_panel(f, chunks[2], app);
    }
    components::render_status(f, chunks[chunks.len() - 1], app);

    if let Some(modal_state) = &app.modal {
        modal::render(f, modal_state, app);
    }

    // Newest toast at the bottom
    let area = f.area();
    for (slot, toast) in app.toasts.iter().rev().enumerate() {
        toast.render(f, area, &app.theme, slot as u16);
    }
}

/// Calculate centered rect for modal dialogs
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Centered rect sized as a percentage of `area`
pub(crate) fn centered_percent(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    centered_rect(width, height, area)
}
