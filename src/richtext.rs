//! Rich-text editors bound to form fields
//!
//! A rich-text field has two halves: the editor buffer the user types
//! into and the backing value that gets serialized. The binding is
//! explicit in both directions:
//!
//! - value in: [`RichTextRegistry::set_value`] loads stored HTML into the
//!   editor when a form is prefilled
//! - change out: every edit returns a [`RichTextChange`] carrying the
//!   rendered HTML, and [`RichTextRegistry::sync`] produces the current
//!   HTML of every editor so the form can refresh its backing values
//!   before it is serialized
//!
//! Buffers accept Markdown or raw HTML. Markdown is rendered with
//! pulldown-cmark; input that already starts with a tag is passed through.

use pulldown_cmark::{html, Options, Parser};
use std::collections::BTreeMap;

/// Identity of a rich-text field: the form it belongs to and its name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId {
    pub form: &'static str,
    pub field: &'static str,
}

impl FieldId {
    pub const fn new(form: &'static str, field: &'static str) -> Self {
        Self { form, field }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Insert(char),
    Newline,
    Backspace,
    Clear,
}

/// Rendered value of an editor after a change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichTextChange {
    pub id: FieldId,
    pub html: String,
}

/// Render an editor buffer to HTML
pub fn render(source: &str) -> String {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('<') {
        return trimmed.to_string();
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let mut out = String::with_capacity(trimmed.len() * 2);
    html::push_html(&mut out, Parser::new_ext(trimmed, options));
    out.trim_end().to_string()
}

#[derive(Debug, Clone, Default)]
pub struct RichTextEditor {
    buffer: String,
}

impl RichTextEditor {
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.buffer.split('\n')
    }

    pub fn html(&self) -> String {
        render(&self.buffer)
    }

    fn apply(&mut self, op: EditOp) {
        match op {
            EditOp::Insert(c) => self.buffer.push(c),
            EditOp::Newline => self.buffer.push('\n'),
            EditOp::Backspace => {
                self.buffer.pop();
            }
            EditOp::Clear => self.buffer.clear(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RichTextRegistry {
    editors: BTreeMap<FieldId, RichTextEditor>,
}

impl RichTextRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty editor for `id`; a no-op if one exists
    pub fn register(&mut self, id: FieldId) {
        self.editors.entry(id).or_default();
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.editors.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    pub fn editor(&self, id: FieldId) -> Option<&RichTextEditor> {
        self.editors.get(&id)
    }

    /// Load stored HTML into an editor
    pub fn set_value(&mut self, id: FieldId, html: &str) {
        self.editors.entry(id).or_default().buffer = html.to_string();
    }

    /// Apply an edit and report the new value; `None` for unknown fields
    pub fn edit(&mut self, id: FieldId, op: EditOp) -> Option<RichTextChange> {
        let editor = self.editors.get_mut(&id)?;
        editor.apply(op);
        Some(RichTextChange {
            id,
            html: editor.html(),
        })
    }

    /// Current HTML of every editor
    pub fn sync(&self) -> Vec<RichTextChange> {
        self.editors
            .iter()
            .map(|(id, editor)| RichTextChange {
                id: *id,
                html: editor.html(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ABSTRACT: FieldId = FieldId::new("article", "abstract");

    #[test]
    fn test_markdown_rendered_to_html() {
        assert_eq!(render("Some **bold** text"), "<p>Some <strong>bold</strong> text</p>");
    }

    #[test]
    fn test_html_passes_through() {
        assert_eq!(render("  <p>Kept <em>as is</em></p>\n"), "<p>Kept <em>as is</em></p>");
    }

    #[test]
    fn test_blank_buffer_renders_empty() {
        assert_eq!(render(" \n "), "");
    }

    #[test]
    fn test_edit_reports_change() {
        let mut registry = RichTextRegistry::new();
        registry.register(ABSTRACT);

        registry.edit(ABSTRACT, EditOp::Insert('H'));
        let change = registry.edit(ABSTRACT, EditOp::Insert('i')).unwrap();
        assert_eq!(change.id, ABSTRACT);
        assert_eq!(change.html, "<p>Hi</p>");

        let other = FieldId::new("article", "references");
        assert!(registry.edit(other, EditOp::Insert('x')).is_none());
    }

    #[test]
    fn test_set_value_then_sync() {
        let mut registry = RichTextRegistry::new();
        registry.set_value(ABSTRACT, "<p>Stored</p>");
        assert_eq!(registry.sync()[0].html, "<p>Stored</p>");

        registry.edit(ABSTRACT, EditOp::Clear);
        for c in "New".chars() {
            registry.edit(ABSTRACT, EditOp::Insert(c));
        }
        let synced = registry.sync();
        assert_eq!(synced.len(), 1);
        assert_eq!(synced[0].html, "<p>New</p>");
    }
}
