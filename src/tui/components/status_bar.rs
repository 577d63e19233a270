// Status bar component
//
// Renders the bottom line: uptime, backend, in-flight requests and the
// key hints for the active tab.

use crate::tui::app::{App, Tab};
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar
///
/// Adapts to terminal width:
/// - Wide: backend URL and full key hints
/// - Narrow: uptime, activity and `?` only
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let bp = Breakpoint::from_width(area.width);

    let activity = if app.in_flight > 0 {
        format!("{} {} pending", app.spinner(), app.in_flight)
    } else {
        "idle".to_string()
    };

    let searching = app.active_section().is_some_and(|s| s.is_searching());
    let hints = match app.tab {
        _ if searching => "type to search │ Enter: search now │ Esc: done",
        Tab::Section(_) => "a:add e:edit v:view d:delete /:search [ ]:page r:reload ?:help",
        Tab::Seo => "e:edit settings u:sitemap o:robots r:reload ?:help",
    };

    let status_text = if bp.at_least(Breakpoint::Wide) {
        format!(
            " {} │ {} │ {} │ {}",
            app.uptime(),
            app.config.base_url,
            activity,
            hints
        )
    } else {
        format!(" {} │ {} │ ?:help", app.uptime(), activity)
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(app.theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
