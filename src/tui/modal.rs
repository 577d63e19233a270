// Modal dialog state and input handling
//
// A modal is an overlay that captures all input while open. The add/edit
// form lives here too; it edits its own FormState and only reports the
// actions the App has to carry out (submit, close, confirm).

use crate::crud::form::{FieldValue, FormPhase, FormState};
use crate::domain::forms::FieldKind;
use crate::domain::EntityKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Read-only record or report shown as label/value lines
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub title: String,
    pub lines: Vec<(String, String)>,
    pub scroll: u16,
}

impl DetailView {
    pub fn new(title: impl Into<String>, lines: Vec<(String, String)>) -> Self {
        Self {
            title: title.into(),
            lines,
            scroll: 0,
        }
    }

    /// Plain text for the clipboard
    pub fn copy_text(&self) -> String {
        let mut out = format!("{}\n", self.title);
        for (label, value) in &self.lines {
            if label.is_empty() {
                out.push_str(value);
            } else {
                out.push_str(&format!("{label}: {value}"));
            }
            out.push('\n');
        }
        out
    }

    fn scroll_by(&mut self, delta: i32) {
        let max = self.lines.len().saturating_sub(1) as i32;
        self.scroll = (i32::from(self.scroll) + delta).clamp(0, max.max(0)) as u16;
    }
}

/// Active modal dialog
#[derive(Debug)]
pub enum Modal {
    /// Keybinding reference
    Help,
    Detail(DetailView),
    Form(Box<FormState>),
    /// Confirmation for the pending delete of this section
    ConfirmDelete(EntityKind),
}

/// What the App must do after a modal handled a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    None,
    Close,
    CopyReadable,
    /// Delete confirmed
    Confirm,
    /// Form submit requested
    Submit,
    /// Author row prefilled from an existing author (display name)
    Prefilled(Option<String>),
}

impl Modal {
    pub fn help() -> Self {
        Modal::Help
    }

    pub fn detail(title: impl Into<String>, lines: Vec<(String, String)>) -> Self {
        Modal::Detail(DetailView::new(title, lines))
    }

    pub fn form(form: FormState) -> Self {
        Modal::Form(Box::new(form))
    }

    pub fn as_form(&self) -> Option<&FormState> {
        match self {
            Modal::Form(form) => Some(form),
            _ => None,
        }
    }

    pub fn as_form_mut(&mut self) -> Option<&mut FormState> {
        match self {
            Modal::Form(form) => Some(form),
            _ => None,
        }
    }

    /// Handle input when this modal is active
    pub fn handle_input(&mut self, key: KeyEvent) -> ModalAction {
        match self {
            Modal::Help => match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Enter => {
                    ModalAction::Close
                }
                _ => ModalAction::None,
            },
            Modal::Detail(detail) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => ModalAction::Close,
                KeyCode::Up | KeyCode::Char('k') => {
                    detail.scroll_by(-1);
                    ModalAction::None
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    detail.scroll_by(1);
                    ModalAction::None
                }
                KeyCode::PageUp => {
                    detail.scroll_by(-10);
                    ModalAction::None
                }
                KeyCode::PageDown => {
                    detail.scroll_by(10);
                    ModalAction::None
                }
                KeyCode::Home | KeyCode::Char('g') => {
                    detail.scroll = 0;
                    ModalAction::None
                }
                KeyCode::Char('y') => ModalAction::CopyReadable,
                _ => ModalAction::None,
            },
            Modal::ConfirmDelete(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => ModalAction::Confirm,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::Form(form) => handle_form_key(form, key),
        }
    }
}

/// Key handling inside an add/edit form
fn handle_form_key(form: &mut FormState, key: KeyEvent) -> ModalAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => return ModalAction::Close,
        KeyCode::Char('s') if ctrl => return ModalAction::Submit,
        _ => {}
    }

    // No edits while the request is in flight
    if form.phase() == FormPhase::Submitting {
        return ModalAction::None;
    }

    let focused_kind = form
        .focused()
        .and_then(|key| form.field(key.field()))
        .map(|field| (field.spec.kind, matches!(field.value, FieldValue::Flag(_))));

    match key.code {
        KeyCode::Char('n') if ctrl => form.add_row(),
        KeyCode::Char('d') if ctrl => form.remove_row(),
        KeyCode::Char('e') if ctrl => return ModalAction::Prefilled(form.prefill_author_row()),
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Enter => {
            if !form.newline() {
                form.focus_next();
            }
        }
        KeyCode::Left => form.cycle_option(false),
        KeyCode::Right => form.cycle_option(true),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(' ') if matches!(focused_kind, Some((_, true))) => form.toggle(),
        KeyCode::Char(c) if !ctrl => {
            if !matches!(focused_kind, Some((FieldKind::Select(_), _))) {
                form.input_char(c);
            }
        }
        _ => {}
    }
    ModalAction::None
}
