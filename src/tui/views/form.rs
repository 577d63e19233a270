// Form modal rendering
//
// One block per field: a label line (required marker, error colouring),
// the value lines, then the validation message if any. The body scrolls
// so the focused field always stays in view.

use crate::crud::form::{Field, FieldKey, FieldValue, FormPhase, FormState};
use crate::domain::forms::FieldKind;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, form: &FormState, app: &App) {
    let theme = &app.theme;
    f.render_widget(Clear, area);

    let mut title = format!(" {} ", form.title());
    if form.phase() == FormPhase::Submitting {
        title = format!(" {} {} saving… ", form.title(), app.spinner());
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight))
        .title(title)
        .title_bottom(
            Line::from(" Tab next · Ctrl+S save · Esc cancel ").style(theme.muted_style()),
        );

    let focused = form.focused();
    let mut lines: Vec<Line> = Vec::new();
    let mut focus_line = 0usize;

    for field in form.fields() {
        let has_focus = focused.is_some_and(|key| key.field() == field.spec.name);
        if has_focus {
            focus_line = lines.len();
        }
        push_field(&mut lines, field, form, focused, app);
        lines.push(Line::raw(""));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = focus_line.saturating_sub(inner_height / 3) as u16;

    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

fn push_field<'a>(
    lines: &mut Vec<Line<'a>>,
    field: &'a Field,
    form: &'a FormState,
    focused: Option<FieldKey>,
    app: &App,
) {
    let theme = &app.theme;
    let name = field.spec.name;
    let key = FieldKey::Field(name);
    let has_error = form.errors().field_has_error(name);
    let is_focused = focused == Some(key);

    let label_style = if has_error {
        theme.error_style().add_modifier(Modifier::BOLD)
    } else if focused.is_some_and(|k| k.field() == name) {
        Style::default()
            .fg(theme.highlight)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.title)
    };
    let marker = if field.spec.required { " *" } else { "" };
    lines.push(Line::from(vec![
        Span::styled(field.spec.label, label_style),
        Span::styled(marker, theme.error_style()),
    ]));

    let value_style = if is_focused {
        theme.selected_style()
    } else {
        Style::default().fg(theme.foreground)
    };
    let cursor = if is_focused { "▏" } else { "" };

    match &field.value {
        FieldValue::Text(text) => {
            lines.push(Line::styled(format!("  {text}{cursor}"), value_style));
        }
        FieldValue::Flag(on) => {
            let mark = if *on { "[x]" } else { "[ ]" };
            lines.push(Line::styled(format!("  {mark} (Space)"), value_style));
        }
        FieldValue::Select { options, value } => {
            let label = options
                .iter()
                .find(|choice| choice.value == *value)
                .map(|choice| choice.label.as_str())
                .unwrap_or(if options.is_empty() { "loading…" } else { "---------" });
            lines.push(Line::styled(format!("  ‹ {label} ›"), value_style));
        }
        FieldValue::File(path) => {
            let shown = if path.is_empty() && !is_focused {
                "(no file selected)".to_string()
            } else {
                format!("{path}{cursor}")
            };
            lines.push(Line::styled(format!("  📎 {shown}"), value_style));
        }
        FieldValue::RichText(_) => {
            let editor = form.richtext().editor(form.rich_id(name));
            let text: Vec<&str> = editor.map(|e| e.lines().collect()).unwrap_or_default();
            let last = text.len().saturating_sub(1);
            for (i, line) in text.iter().enumerate() {
                let suffix = if i == last { cursor } else { "" };
                lines.push(Line::styled(format!("  │ {line}{suffix}"), value_style));
            }
            if is_focused {
                lines.push(Line::styled(
                    "  Markdown or HTML · Enter for new line",
                    theme.muted_style(),
                ));
            }
        }
        FieldValue::Rows(rows) => push_rows(lines, field, rows, form, focused, app),
    }

    if let Some(message) = form.errors().message_for(&key) {
        lines.push(Line::styled(format!("  ⚠ {message}"), theme.error_style()));
    }
}

fn push_rows<'a>(
    lines: &mut Vec<Line<'a>>,
    field: &'a Field,
    rows: &'a [Vec<String>],
    form: &FormState,
    focused: Option<FieldKey>,
    app: &App,
) {
    let theme = &app.theme;
    let FieldKind::Rows(columns) = field.spec.kind else {
        return;
    };

    for (row, cells) in rows.iter().enumerate() {
        let mut spans = vec![Span::styled(format!("  {}. ", row + 1), theme.muted_style())];
        let mut messages = Vec::new();

        for (column, cell) in cells.iter().enumerate() {
            let key = FieldKey::Cell {
                field: field.spec.name,
                row,
                column,
            };
            let label = columns.get(column).map(|c| c.label).unwrap_or("");
            let style = if focused == Some(key) {
                theme.selected_style()
            } else if form.errors().contains(&key) {
                theme.error_style()
            } else {
                Style::default().fg(theme.foreground)
            };
            let shown = if cell.is_empty() && focused != Some(key) {
                label.to_string()
            } else {
                cell.clone()
            };
            spans.push(Span::styled(format!("[{shown}]"), style));
            spans.push(Span::raw(" "));

            if let Some(message) = form.errors().message_for(&key) {
                messages.push(format!("{label}: {message}"));
            }
        }
        lines.push(Line::from(spans));
        for message in messages {
            lines.push(Line::styled(format!("     ⚠ {message}"), theme.error_style()));
        }
    }

    if focused.is_some_and(|k| k.field() == field.spec.name) {
        let mut hint = String::from("  Ctrl+N add row · Ctrl+D remove row");
        if !form.authors().is_empty() {
            hint.push_str(" · Ctrl+E fill from existing author");
        }
        lines.push(Line::styled(hint, theme.muted_style()));
    }
}
