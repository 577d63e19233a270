// SEO tab
//
// Left: stored settings. Right: status report (counts and public URLs).
// Bottom: the last robots.txt returned by the server, if regenerated.

use crate::domain::models::{SeoSettings, SeoStatus};
use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let rows = if app.seo.robots_preview.is_some() {
        vec![Constraint::Min(10), Constraint::Length(10)]
    } else {
        vec![Constraint::Min(10)]
    };
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(rows)
        .split(area);

    let bp = Breakpoint::from_width(area.width);
    let direction = if bp.at_least(Breakpoint::Normal) {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let panes = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(vertical[0]);

    render_settings(f, panes[0], app);
    render_status(f, panes[1], app);

    if let Some(robots) = &app.seo.robots_preview {
        let preview = Paragraph::new(robots.as_str())
            .style(Style::default().fg(app.theme.foreground))
            .block(panel(&app.theme, " robots.txt "));
        f.render_widget(preview, vertical[1]);
    }
}

fn panel<'a>(theme: &Theme, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
        .title(title)
}

fn row<'a>(theme: &Theme, label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {label:<22}"), Style::default().fg(theme.title)),
        Span::styled(value, Style::default().fg(theme.foreground)),
    ])
}

fn yes_no(on: bool) -> String {
    if on { "yes" } else { "no" }.to_string()
}

fn settings_lines<'a>(theme: &Theme, settings: &SeoSettings) -> Vec<Line<'a>> {
    vec![
        Line::raw(""),
        row(theme, "Meta title", settings.meta_title.clone()),
        row(theme, "Meta description", settings.meta_description.clone()),
        row(theme, "Meta keywords", settings.meta_keywords.clone()),
        row(theme, "Publisher", settings.publisher_name.clone()),
        row(theme, "Google Scholar tags", yes_no(settings.enable_google_scholar)),
        row(theme, "Automatic sitemap", yes_no(settings.auto_sitemap)),
        Line::raw(""),
        Line::styled("  e edit settings", Style::default().fg(theme.muted)),
    ]
}

fn render_settings(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let lines = match &app.seo.settings {
        Some(settings) => settings_lines(theme, settings),
        None => vec![Line::styled(
            format!("  {} Loading settings…", app.spinner()),
            theme.muted_style(),
        )],
    };
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(theme, " Settings "));
    f.render_widget(paragraph, area);
}

fn status_lines<'a>(theme: &Theme, status: &SeoStatus) -> Vec<Line<'a>> {
    let stats = &status.stats;
    vec![
        Line::raw(""),
        row(theme, "SEO enabled", yes_no(status.seo_enabled)),
        row(theme, "Automatic sitemap", yes_no(status.auto_sitemap)),
        Line::raw(""),
        row(theme, "Published articles", stats.articles.to_string()),
        row(theme, "Journals", stats.journals.to_string()),
        row(theme, "Authors", stats.authors.to_string()),
        row(theme, "Issues", stats.issues.to_string()),
        Line::raw(""),
        row(theme, "Sitemap", status.urls.sitemap.clone()),
        row(theme, "robots.txt", status.urls.robots.clone()),
        Line::raw(""),
        Line::styled(
            "  u sitemap · o robots.txt · r refresh",
            Style::default().fg(theme.muted),
        ),
    ]
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let lines = match &app.seo.status {
        Some(status) => status_lines(theme, status),
        None => vec![Line::styled(
            format!("  {} Loading status…", app.spinner()),
            theme.muted_style(),
        )],
    };
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel(theme, " Status "));
    f.render_widget(paragraph, area);
}
