// Entity section view
//
// Toolbar (search box, article filters), the record table and the
// page-link line. Everything is drawn from the SectionState view-model;
// no state changes happen while rendering.

use crate::crud::list::{ListStatus, StatusFilter, TableBody, LOAD_FAILED};
use crate::crud::pagination::PageLink;
use crate::crud::SectionState;
use crate::domain::EntityKind;
use crate::tui::app::App;
use crate::tui::layout::Breakpoint;
use crate::util::fit_width;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App, section: &SectionState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_toolbar(f, chunks[0], app, section);
    render_table(f, chunks[1], app, section);
    render_pagination(f, chunks[2], app, section);
}

fn render_toolbar(f: &mut Frame, area: Rect, app: &App, section: &SectionState) {
    let theme = &app.theme;
    let mut spans = Vec::new();

    if section.kind().searchable() {
        let search = &section.query.search;
        if section.is_searching() {
            spans.push(Span::styled(" 🔎 ", theme.header_style()));
            spans.push(Span::styled(
                format!("{search}▏"),
                Style::default().fg(theme.foreground),
            ));
        } else if search.is_empty() {
            spans.push(Span::styled(" / to search", theme.muted_style()));
        } else {
            spans.push(Span::styled(
                format!(" search: \"{search}\" (Esc clears)"),
                Style::default().fg(theme.info),
            ));
        }
    }

    if section.kind() == EntityKind::Article {
        let status = section
            .query
            .status
            .map(StatusFilter::label)
            .unwrap_or("All");
        let issue = section.issue_label().unwrap_or("All issues");
        spans.push(Span::styled("   s:", theme.muted_style()));
        spans.push(Span::styled(status, Style::default().fg(theme.key)));
        spans.push(Span::styled("  i:", theme.muted_style()));
        spans.push(Span::styled(issue.to_string(), Style::default().fg(theme.key)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(f: &mut Frame, area: Rect, app: &App, section: &SectionState) {
    let theme = &app.theme;
    let kind = section.kind();

    let mut title = format!(" {} ", kind.plural_label());
    if section.list.is_loading() {
        title = format!(" {} {} ", kind.plural_label(), app.spinner());
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.border))
        .title(title);

    let rows = match section.list.body() {
        TableBody::Rows(rows) => rows,
        TableBody::Placeholder(text) => {
            let (text, style) = match section.list.status() {
                ListStatus::Failed(message) => {
                    (format!("{LOAD_FAILED}: {message}"), theme.error_style())
                }
                _ => (text.to_string(), theme.muted_style()),
            };
            let placeholder = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(style)
                .block(block);
            f.render_widget(placeholder, area);
            return;
        }
    };

    let bp = Breakpoint::from_width(area.width);
    let columns = kind.columns();
    let shown = columns.len().min(bp.max_table_columns());

    let header = Row::new(
        columns[..shown]
            .iter()
            .map(|(name, _)| Cell::from(*name)),
    )
    .style(theme.header_style());

    let body: Vec<Row> = rows
        .iter()
        .map(|entity| {
            let cells = entity.record().cells();
            Row::new(
                cells
                    .into_iter()
                    .zip(&columns[..shown])
                    .map(|(cell, (_, width))| Cell::from(fit_width(&cell, *width as usize))),
            )
        })
        .collect();

    let widths: Vec<Constraint> = columns[..shown]
        .iter()
        .enumerate()
        .map(|(i, (_, width))| {
            if i + 1 == shown {
                Constraint::Min(*width)
            } else {
                Constraint::Length(*width)
            }
        })
        .collect();

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .row_highlight_style(theme.selected_style())
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(section.list.selected_index());
    f.render_stateful_widget(table, area, &mut state);
}

fn render_pagination(f: &mut Frame, area: Rect, app: &App, section: &SectionState) {
    let theme = &app.theme;
    let list = &section.list;

    if !list.pagination_visible() {
        let count = list.rows().len();
        let text = match list.status() {
            ListStatus::Loaded if count > 0 => format!(" {count} records"),
            _ => String::new(),
        };
        f.render_widget(Paragraph::new(text).style(theme.muted_style()), area);
        return;
    }

    let pagination = list.pagination();
    let mut spans = vec![Span::raw(" ")];
    for link in pagination.links() {
        let span = match link {
            PageLink::Prev(_) => Span::styled("‹ [ ", Style::default().fg(theme.key)),
            PageLink::Next(_) => Span::styled("] ›", Style::default().fg(theme.key)),
            PageLink::Page(n) => Span::styled(format!("{n} "), Style::default().fg(theme.foreground)),
            PageLink::Current(n) => Span::styled(
                format!("[{n}] "),
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
            PageLink::Ellipsis => Span::styled("… ", theme.muted_style()),
        };
        spans.push(span);
    }

    if let Some(info) = pagination.results_info(app.config.page_size, list.rows().len()) {
        spans.push(Span::styled(format!("   {info}"), theme.muted_style()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
