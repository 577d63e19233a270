// Modal overlay rendering
//
// Modals are rendered on top of the main content:
// - Help modal: keyboard shortcuts and current config
// - Detail modal: read-only record (or SEO report), scrollable
// - Confirm modal: the pending delete of a section
// - Form modal: add/edit form (see form.rs)

use super::{centered_percent, centered_rect, form};
use crate::domain::EntityKind;
use crate::tui::app::App;
use crate::tui::modal::{DetailView, Modal};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, app: &App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::Detail(detail) => render_detail(f, app, detail),
        Modal::ConfirmDelete(kind) => render_confirm(f, app, *kind),
        Modal::Form(state) => {
            let area = centered_percent(80, 85, f.area());
            let area = Rect {
                width: area.width.max(50).min(f.area().width),
                height: area.height.max(16).min(f.area().height),
                ..area
            };
            form::render(f, area, state, app);
        }
    }
}

/// Render the help modal overlay
fn render_help(f: &mut Frame, app: &App) {
    // Styles
    let key_style = Style::default().fg(app.theme.key);
    let desc_style = Style::default().fg(app.theme.foreground);
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .add_modifier(Modifier::BOLD);
    let divider_style = Style::default().fg(app.theme.border);

    // Helper to create a keybind line: "    key         description"
    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::styled(desc.to_string(), desc_style),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Sections", header_style)),
        kb("1-9, 0", "Jump to section (0 = SEO)"),
        kb("Tab/S-Tab", "Next / previous section"),
        kb("↑/↓, j/k", "Select record"),
        kb("Enter, v", "View record"),
        kb("a / e / d", "Add / edit / delete"),
        kb("[ ]  < >", "Page back/forward, first/last"),
        kb("/", "Search (Esc clears)"),
        kb("r", "Reload"),
        kb("x", "Export CSV"),
        Line::raw(""),
        Line::from(Span::styled("  Articles", header_style)),
        kb("f", "Toggle featured"),
        kb("s / i", "Cycle status / issue filter"),
        Line::raw(""),
        Line::from(Span::styled("  Journals", header_style)),
        kb("m", "Make selected journal active"),
        kb("J", "Cycle active journal"),
        Line::raw(""),
        Line::from(Span::styled("  SEO", header_style)),
        kb("e", "Edit settings"),
        kb("u / o", "Regenerate sitemap / robots.txt"),
        Line::raw(""),
        Line::from(Span::styled("  Forms", header_style)),
        kb("Tab/↓ ↑", "Next / previous field"),
        kb("←/→", "Change selection"),
        kb("Ctrl+S", "Save"),
        kb("Ctrl+N/D", "Add / remove author row"),
        Line::raw(""),
        Line::from(Span::styled("  General", header_style)),
        kb("y", "Copy to clipboard"),
        kb("L", "Toggle logs panel"),
        kb("?", "Toggle this help"),
        kb("q", "Quit"),
        Line::raw(""),
        Line::from(Span::styled(
            "  ──────────────────────────────────",
            divider_style,
        )),
        Line::from(vec![
            Span::styled("  Server: ", desc_style),
            Span::styled(app.config.base_url.as_str(), key_style),
        ]),
    ]);

    let width = 48;
    let height = 46;
    let area = centered_rect(width, height, f.area());

    // Clear the area behind the modal
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(content)
        .style(Style::default().bg(app.theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.highlight))
                .border_type(app.theme.border_type)
                .title(" Help ")
                .title_bottom(Line::from(" Press ? or Esc to close ").centered()),
        );

    f.render_widget(paragraph, area);
}

fn render_detail(f: &mut Frame, app: &App, detail: &DetailView) {
    let theme = &app.theme;

    let frame_area = f.area();
    let width = (frame_area.width * 80 / 100).max(60);
    let height = (frame_area.height * 80 / 100).max(16);
    let area = centered_rect(width, height, frame_area);
    f.render_widget(Clear, area);

    let label_width = detail
        .lines
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::new();
    for (label, value) in &detail.lines {
        if label.is_empty() {
            lines.push(Line::styled(value.as_str(), Style::default().fg(theme.foreground)));
            continue;
        }
        // Multi-line values continue under the value column
        let mut parts = value.split('\n');
        let first = parts.next().unwrap_or("");
        lines.push(Line::from(vec![
            Span::styled(
                format!("{label:<label_width$}  "),
                Style::default().fg(theme.title),
            ),
            Span::styled(first.to_string(), Style::default().fg(theme.foreground)),
        ]));
        for rest in parts {
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(label_width + 2)),
                Span::styled(rest.to_string(), Style::default().fg(theme.foreground)),
            ]));
        }
    }

    let viewport = area.height.saturating_sub(2) as usize;
    let scroll_info = if lines.len() > viewport {
        format!(" ({}/{}) ", detail.scroll + 1, lines.len())
    } else {
        String::new()
    };

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(theme.background))
        .wrap(Wrap { trim: false })
        .scroll((detail.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.highlight))
                .title(format!(" {}{scroll_info}", detail.title))
                .title_bottom(
                    Line::from(" ↑/↓ scroll · y copy · Esc close ").style(theme.muted_style()),
                ),
        );
    f.render_widget(paragraph, area);
}

fn render_confirm(f: &mut Frame, app: &App, kind: EntityKind) {
    let theme = &app.theme;
    let prompt = app
        .section(kind)
        .confirm
        .pending()
        .map(|target| target.prompt())
        .unwrap_or_default();

    let area = centered_rect(56, 7, f.area());
    f.render_widget(Clear, area);

    let content = Text::from(vec![
        Line::raw(""),
        Line::styled(prompt, Style::default().fg(theme.foreground)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
            Span::styled(" delete   ", theme.muted_style()),
            Span::styled("n", Style::default().fg(theme.key).add_modifier(Modifier::BOLD)),
            Span::styled(" cancel", theme.muted_style()),
        ]),
    ]);

    let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(theme.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.error))
                .title(format!(" Delete {} ", kind.label())),
        );
    f.render_widget(paragraph, area);
}
