// Title bar component
//
// Renders the app name, the active journal and the tab strip.

use crate::tui::app::{App, Tab};
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame,
};

/// Render the title bar with the tab strip
///
/// Narrow terminals get numbered short titles instead of full names.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let bp = Breakpoint::from_width(area.width);

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let key = if i == Tab::ALL.len() - 1 { 0 } else { i + 1 };
            if bp.at_least(Breakpoint::Wide) {
                Line::from(format!("{key} {}", tab.title()))
            } else {
                let short: String = tab.title().chars().take(4).collect();
                Line::from(format!("{key}{short}"))
            }
        })
        .collect();

    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);

    let journal = match app.journal_label() {
        Some(label) => format!(" 📚 {label} "),
        None => " no journal selected ".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.title))
        .title(Span::styled(
            " Journal Admin ",
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ))
        .title_top(Line::from(journal).right_aligned());

    let tabs = Tabs::new(titles)
        .block(block)
        .select(selected)
        .style(Style::default().fg(app.theme.foreground))
        .highlight_style(app.theme.selected_style())
        .divider(Span::styled("│", app.theme.muted_style()));

    f.render_widget(tabs, area);
}
