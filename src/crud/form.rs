//! Add/edit form state
//!
//! A `FormState` is built from an entity's static field table, optionally
//! prefilled from a fetched record, edited key by key, and finally turned
//! into a [`FormPayload`]. Rich-text fields keep a backing value that is
//! refreshed from the editors before every serialization.

use super::validation::ValidationErrors;
use crate::api::{Attachment, FormPayload};
use crate::domain::forms::{
    form_spec, FieldDefault, FieldKind, FieldSpec, FormValue, Lookup, OptionSource, RowColumn,
    AUTHOR_ROW, SEO_FORM,
};
use crate::domain::models::{Author, SeoSettings};
use crate::domain::{Choice, Entity, EntityKind};
use crate::richtext::{EditOp, FieldId, RichTextRegistry};
use chrono::{Datelike, Local};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u64),
}

impl FormMode {
    pub fn id(self) -> Option<u64> {
        match self {
            FormMode::Create => None,
            FormMode::Edit(id) => Some(id),
        }
    }
}

/// What a form saves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Entity(EntityKind),
    Seo,
}

impl FormTarget {
    /// Scope used for rich-text field identities
    fn scope(self) -> &'static str {
        match self {
            FormTarget::Entity(kind) => kind.record_key(),
            FormTarget::Seo => "seo",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Editing,
    /// Request in flight; further submits are ignored
    Submitting,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Select { options: Vec<Choice>, value: String },
    /// Local path of the file to upload, empty for none
    File(String),
    /// Backing HTML of a rich-text editor
    RichText(String),
    Rows(Vec<Vec<String>>),
}

/// A focusable position in the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Field(&'static str),
    Cell {
        field: &'static str,
        row: usize,
        column: usize,
    },
}

impl FieldKey {
    pub fn field(&self) -> &'static str {
        match *self {
            FieldKey::Field(name) | FieldKey::Cell { field: name, .. } => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub spec: &'static FieldSpec,
    pub value: FieldValue,
}

impl Field {
    fn new(spec: &'static FieldSpec) -> Self {
        let text = || default_text(spec.default);
        let value = match spec.kind {
            FieldKind::Checkbox => FieldValue::Flag(spec.default == FieldDefault::Checked),
            FieldKind::Select(source) => FieldValue::Select {
                options: match source {
                    OptionSource::Static(pairs) => {
                        pairs.iter().map(|(v, l)| Choice::new(*v, *l)).collect()
                    }
                    OptionSource::Lookup(_) => Vec::new(),
                },
                value: text(),
            },
            FieldKind::RichText => FieldValue::RichText(String::new()),
            FieldKind::File(_) => FieldValue::File(String::new()),
            FieldKind::Rows(columns) => FieldValue::Rows(vec![blank_row(columns)]),
            _ => FieldValue::Text(text()),
        };
        Self { spec, value }
    }

    fn columns(&self) -> &'static [RowColumn] {
        match self.spec.kind {
            FieldKind::Rows(columns) => columns,
            _ => &[],
        }
    }

    /// Text content as the user sees it
    pub fn text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) | FieldValue::File(s) | FieldValue::RichText(s) => s,
            FieldValue::Select { value, .. } => value,
            FieldValue::Flag(_) | FieldValue::Rows(_) => "",
        }
    }
}

fn default_text(default: FieldDefault) -> String {
    match default {
        FieldDefault::Value(v) => v.to_string(),
        FieldDefault::Today => Local::now().format("%Y-%m-%d").to_string(),
        FieldDefault::CurrentYear => Local::now().year().to_string(),
        FieldDefault::Empty | FieldDefault::Checked => String::new(),
    }
}

fn blank_row(columns: &[RowColumn]) -> Vec<String> {
    vec![String::new(); columns.len()]
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Characters a typed field accepts
fn accepts(kind: FieldKind, c: char) -> bool {
    match kind {
        FieldKind::Number => c.is_ascii_digit() || c == '-',
        FieldKind::Date => c.is_ascii_digit() || c == '-',
        FieldKind::Checkbox | FieldKind::Select(_) => false,
        _ => !c.is_control(),
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    target: FormTarget,
    mode: FormMode,
    phase: FormPhase,
    /// Serial of the save in flight, if any
    submission: Option<u64>,
    fields: Vec<Field>,
    focus: usize,
    errors: ValidationErrors,
    richtext: RichTextRegistry,
    /// Existing authors offered for prefilling author rows
    authors: Vec<Author>,
    author_pick: usize,
}

impl FormState {
    fn new(target: FormTarget, mode: FormMode, specs: &'static [FieldSpec]) -> Self {
        let mut richtext = RichTextRegistry::new();
        let fields = specs
            .iter()
            .map(|spec| {
                if spec.kind == FieldKind::RichText {
                    richtext.register(FieldId::new(target.scope(), spec.name));
                }
                Field::new(spec)
            })
            .collect();

        Self {
            target,
            mode,
            phase: FormPhase::Editing,
            submission: None,
            fields,
            focus: 0,
            errors: ValidationErrors::default(),
            richtext,
            authors: Vec::new(),
            author_pick: 0,
        }
    }

    /// Empty form with create defaults
    pub fn create(kind: EntityKind) -> Self {
        Self::new(FormTarget::Entity(kind), FormMode::Create, form_spec(kind))
    }

    /// Form prefilled from a fetched record
    pub fn edit(entity: &Entity) -> Self {
        let kind = entity.kind();
        let record = entity.record();
        let mut form = Self::new(
            FormTarget::Entity(kind),
            FormMode::Edit(record.id()),
            form_spec(kind),
        );
        form.apply_values(record.form_values());
        form
    }

    /// Site-wide SEO settings form
    pub fn seo(settings: &SeoSettings) -> Self {
        let mut form = Self::new(FormTarget::Seo, FormMode::Create, SEO_FORM);
        form.apply_values(vec![
            ("site_title", settings.meta_title.as_str().into()),
            ("site_description", settings.meta_description.as_str().into()),
            ("site_keywords", settings.meta_keywords.as_str().into()),
            ("publisher_name", settings.publisher_name.as_str().into()),
            ("enable_google_scholar", settings.enable_google_scholar.into()),
            ("auto_sitemap", settings.auto_sitemap.into()),
        ]);
        form
    }

    /// Prefill fields by name; unknown names are ignored
    pub fn apply_values(&mut self, values: Vec<(&'static str, FormValue)>) {
        let scope = self.target.scope();
        for (name, incoming) in values {
            let Some(field) = self.fields.iter_mut().find(|f| f.spec.name == name) else {
                tracing::debug!(field = name, "prefill value for unknown field");
                continue;
            };
            let columns = field.columns();
            match (&mut field.value, incoming) {
                (FieldValue::Text(v) | FieldValue::File(v), FormValue::Text(s)) => *v = s,
                (FieldValue::Select { value, .. }, FormValue::Text(s)) => *value = s,
                (FieldValue::RichText(v), FormValue::Text(s)) => {
                    self.richtext.set_value(FieldId::new(scope, field.spec.name), &s);
                    *v = s;
                }
                (FieldValue::Flag(v), FormValue::Flag(b)) => *v = b,
                (FieldValue::Rows(rows), FormValue::Rows(incoming)) => {
                    *rows = incoming
                        .into_iter()
                        .map(|mut row| {
                            row.resize(columns.len(), String::new());
                            row
                        })
                        .collect();
                    if rows.is_empty() {
                        rows.push(blank_row(columns));
                    }
                }
                (_, other) => {
                    tracing::warn!(field = name, value = ?other, "prefill value has the wrong shape")
                }
            }
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn target(&self) -> FormTarget {
        self.target
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: FormPhase) {
        self.phase = phase;
        if phase == FormPhase::Editing {
            self.submission = None;
        }
    }

    /// Enter `Submitting` for the save tagged `serial`
    pub fn begin_submission(&mut self, serial: u64) {
        self.phase = FormPhase::Submitting;
        self.submission = Some(serial);
    }

    /// Whether the save tagged `serial` was sent from this form
    pub fn owns_submission(&self, serial: u64) -> bool {
        self.submission == Some(serial)
    }

    pub fn title(&self) -> String {
        match (self.target, self.mode) {
            (FormTarget::Seo, _) => "SEO settings".to_string(),
            (FormTarget::Entity(kind), FormMode::Create) => {
                format!("Add {}", kind.label().to_lowercase())
            }
            (FormTarget::Entity(kind), FormMode::Edit(id)) => {
                format!("Edit {} #{}", kind.label().to_lowercase(), id)
            }
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.spec.name == name)
    }

    /// Text of a field, empty when absent
    pub fn text(&self, name: &str) -> &str {
        self.field(name).map(Field::text).unwrap_or_default()
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.field(name).map(|f| &f.value), Some(FieldValue::Flag(true)))
    }

    pub fn rows(&self, name: &str) -> &[Vec<String>] {
        match self.field(name).map(|f| &f.value) {
            Some(FieldValue::Rows(rows)) => rows,
            _ => &[],
        }
    }

    /// Lookups this form needs before its selects are usable
    pub fn lookups(&self) -> Vec<Lookup> {
        let mut lookups: Vec<Lookup> = self
            .fields
            .iter()
            .filter_map(|f| match f.spec.kind {
                FieldKind::Select(OptionSource::Lookup(lookup)) => Some(lookup),
                _ => None,
            })
            .collect();
        if self.fields.iter().any(|f| f.spec.kind == FieldKind::Rows(AUTHOR_ROW)) {
            lookups.push(Lookup::Authors);
        }
        lookups
    }

    pub fn richtext(&self) -> &RichTextRegistry {
        &self.richtext
    }

    pub fn rich_id(&self, name: &'static str) -> FieldId {
        FieldId::new(self.target.scope(), name)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Store validation errors and move focus to the first invalid field
    pub fn set_errors(&mut self, errors: ValidationErrors) {
        if let Some(key) = errors.first_key() {
            self.focus_key(key);
        }
        self.errors = errors;
    }

    pub fn clear_errors(&mut self) {
        self.errors = ValidationErrors::default();
    }

    // ─── Programmatic edits ──────────────────────────────────────────────

    pub fn set_text(&mut self, name: &str, text: &str) {
        let scope = self.target.scope();
        let Some(field) = self.fields.iter_mut().find(|f| f.spec.name == name) else {
            return;
        };
        let spec_name = field.spec.name;
        match &mut field.value {
            FieldValue::Text(v) | FieldValue::File(v) => *v = text.to_string(),
            FieldValue::Select { value, .. } => *value = text.to_string(),
            FieldValue::RichText(_) => {
                self.richtext.set_value(FieldId::new(scope, spec_name), text);
            }
            FieldValue::Flag(_) | FieldValue::Rows(_) => {}
        }
    }

    pub fn set_flag(&mut self, name: &str, on: bool) {
        if let Some(Field {
            value: FieldValue::Flag(v),
            ..
        }) = self.field_mut(name)
        {
            *v = on;
        }
    }

    pub fn set_cell(&mut self, name: &str, row: usize, column: usize, text: &str) {
        if let Some(Field {
            value: FieldValue::Rows(rows),
            ..
        }) = self.field_mut(name)
        {
            if let Some(cell) = rows.get_mut(row).and_then(|r| r.get_mut(column)) {
                *cell = text.to_string();
            }
        }
    }

    /// Apply options from a lookup to every select that uses it
    pub fn set_options(&mut self, lookup: Lookup, choices: &[Choice]) {
        for field in &mut self.fields {
            if field.spec.kind != FieldKind::Select(OptionSource::Lookup(lookup)) {
                continue;
            }
            if let FieldValue::Select { options, value } = &mut field.value {
                *options = choices.to_vec();
                let known = options.iter().any(|o| &o.value == value);
                if field.spec.required && !known {
                    if let Some(first) = options.first() {
                        *value = first.value.clone();
                    }
                }
            }
        }
    }

    pub fn set_authors(&mut self, authors: Vec<Author>) {
        self.authors = authors;
        self.author_pick = 0;
    }

    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    // ─── Focus ───────────────────────────────────────────────────────────

    /// Every focusable position, in display order
    pub fn focus_targets(&self) -> Vec<FieldKey> {
        let mut keys = Vec::new();
        for field in &self.fields {
            match &field.value {
                FieldValue::Rows(rows) => {
                    for row in 0..rows.len() {
                        for column in 0..field.columns().len() {
                            keys.push(FieldKey::Cell {
                                field: field.spec.name,
                                row,
                                column,
                            });
                        }
                    }
                }
                _ => keys.push(FieldKey::Field(field.spec.name)),
            }
        }
        keys
    }

    pub fn focused(&self) -> Option<FieldKey> {
        self.focus_targets().get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        let len = self.focus_targets().len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_prev(&mut self) {
        let len = self.focus_targets().len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    pub fn focus_key(&mut self, key: FieldKey) {
        if let Some(pos) = self.focus_targets().iter().position(|k| *k == key) {
            self.focus = pos;
        }
    }

    fn clamp_focus(&mut self) {
        let len = self.focus_targets().len();
        self.focus = self.focus.min(len.saturating_sub(1));
    }

    fn focused_field(&self) -> Option<(FieldKey, &Field)> {
        let key = self.focused()?;
        let field = self.field(key.field())?;
        Some((key, field))
    }

    // ─── Key edits on the focused position ───────────────────────────────

    pub fn input_char(&mut self, c: char) {
        let Some((key, field)) = self.focused_field() else {
            return;
        };
        if !accepts(field.spec.kind, c) {
            return;
        }
        self.edit_focused(key, |text| text.push(c), EditOp::Insert(c));
    }

    pub fn backspace(&mut self) {
        if let Some(key) = self.focused() {
            self.edit_focused(
                key,
                |text| {
                    text.pop();
                },
                EditOp::Backspace,
            );
        }
    }

    /// Line break; only rich-text fields are multi-line
    pub fn newline(&mut self) -> bool {
        let Some((key, field)) = self.focused_field() else {
            return false;
        };
        if field.spec.kind != FieldKind::RichText {
            return false;
        }
        self.edit_focused(key, |_| {}, EditOp::Newline);
        true
    }

    fn edit_focused(&mut self, key: FieldKey, edit: impl FnOnce(&mut String), rich: EditOp) {
        self.errors.remove(&key);
        let scope = self.target.scope();
        let Some(field) = self.fields.iter_mut().find(|f| f.spec.name == key.field()) else {
            return;
        };
        match (&mut field.value, key) {
            (FieldValue::Text(v) | FieldValue::File(v), FieldKey::Field(_)) => edit(v),
            (FieldValue::RichText(backing), FieldKey::Field(name)) => {
                if let Some(change) = self.richtext.edit(FieldId::new(scope, name), rich) {
                    *backing = change.html;
                }
            }
            (FieldValue::Rows(rows), FieldKey::Cell { row, column, .. }) => {
                if let Some(cell) = rows.get_mut(row).and_then(|r| r.get_mut(column)) {
                    edit(cell);
                }
            }
            _ => {}
        }
    }

    /// Flip the focused checkbox
    pub fn toggle(&mut self) {
        if let Some(FieldKey::Field(name)) = self.focused() {
            if let Some(Field {
                value: FieldValue::Flag(v),
                ..
            }) = self.field_mut(name)
            {
                *v = !*v;
            }
        }
    }

    /// Step the focused select through its options. Optional selects
    /// include an empty choice.
    pub fn cycle_option(&mut self, forward: bool) {
        let Some(FieldKey::Field(name)) = self.focused() else {
            return;
        };
        self.errors.remove(&FieldKey::Field(name));
        let Some(field) = self.field_mut(name) else {
            return;
        };
        let required = field.spec.required;
        let FieldValue::Select { options, value } = &mut field.value else {
            return;
        };

        let mut values: Vec<&str> = Vec::with_capacity(options.len() + 1);
        if !required {
            values.push("");
        }
        values.extend(options.iter().map(|o| o.value.as_str()));
        if values.is_empty() {
            return;
        }

        let len = values.len();
        let next = match values.iter().position(|v| *v == value.as_str()) {
            Some(pos) if forward => (pos + 1) % len,
            Some(pos) => (pos + len - 1) % len,
            None => 0,
        };
        *value = values[next].to_string();
    }

    /// Insert a blank row below the focused one
    pub fn add_row(&mut self) {
        let Some(FieldKey::Cell { field, row, .. }) = self.focused() else {
            return;
        };
        if let Some(f) = self.field_mut(field) {
            let columns = f.columns();
            if let FieldValue::Rows(rows) = &mut f.value {
                rows.insert(row + 1, blank_row(columns));
            }
        }
        self.focus_key(FieldKey::Cell {
            field,
            row: row + 1,
            column: 0,
        });
    }

    /// Remove the focused row. The last remaining row is cleared instead.
    pub fn remove_row(&mut self) {
        let Some(FieldKey::Cell { field, row, .. }) = self.focused() else {
            return;
        };
        if let Some(f) = self.field_mut(field) {
            let columns = f.columns();
            if let FieldValue::Rows(rows) = &mut f.value {
                if rows.len() > 1 {
                    rows.remove(row);
                } else if let Some(only) = rows.first_mut() {
                    *only = blank_row(columns);
                }
            }
        }
        self.errors.clear_field(field);
        self.clamp_focus();
    }

    /// Fill the focused author row from the next existing author
    pub fn prefill_author_row(&mut self) -> Option<String> {
        let Some(FieldKey::Cell { field, row, .. }) = self.focused() else {
            return None;
        };
        if self.authors.is_empty() {
            return None;
        }
        let author = self.authors[self.author_pick % self.authors.len()].clone();
        self.author_pick += 1;

        let f = self.field_mut(field)?;
        let FieldKind::Rows(columns) = f.spec.kind else {
            return None;
        };
        let FieldValue::Rows(rows) = &mut f.value else {
            return None;
        };
        let cells = rows.get_mut(row)?;
        for (cell, column) in cells.iter_mut().zip(columns) {
            *cell = match column.key {
                "first_name" => author.first_name.clone(),
                "middle_name" => author.middle_name.clone(),
                "last_name" => author.last_name.clone(),
                "affiliation" => author.affiliation.clone(),
                "email" => author.email.clone(),
                "orcid" => author.orcid.clone(),
                _ => continue,
            };
        }
        self.errors.clear_field(field);
        Some(author.display_name())
    }

    // ─── Submission ──────────────────────────────────────────────────────

    /// Copy every editor's HTML into its backing value
    pub fn sync_richtext(&mut self) {
        for change in self.richtext.sync() {
            if let Some(Field {
                value: FieldValue::RichText(backing),
                ..
            }) = self.field_mut(change.id.field)
            {
                *backing = change.html;
            }
        }
    }

    /// Drop rows with no content; a group never ends up with zero rows
    pub fn prune_empty_rows(&mut self) {
        for field in &mut self.fields {
            let columns = field.columns();
            if let FieldValue::Rows(rows) = &mut field.value {
                rows.retain(|row| !is_blank_row(row));
                if rows.is_empty() {
                    rows.push(blank_row(columns));
                }
            }
        }
        self.clamp_focus();
    }

    /// Serialize in field order. Rich text is synced first; unreadable
    /// attachments come back as field errors.
    pub fn to_payload(&mut self) -> Result<FormPayload, ValidationErrors> {
        self.sync_richtext();

        let mut payload = FormPayload::new();
        let mut errors = ValidationErrors::default();

        for field in &self.fields {
            let name = field.spec.name;
            match &field.value {
                FieldValue::Text(v) | FieldValue::RichText(v) => {
                    payload.text(name, v.trim());
                }
                FieldValue::Select { value, .. } => {
                    payload.text(name, value.as_str());
                }
                FieldValue::Flag(true) => {
                    payload.text(name, "on");
                }
                FieldValue::Flag(false) => {}
                FieldValue::File(path) if path.trim().is_empty() => {}
                FieldValue::File(path) => match Attachment::from_path(Path::new(path.trim())) {
                    Ok(attachment) => {
                        payload.file(name, attachment);
                    }
                    Err(e) => errors.push(FieldKey::Field(name), format!("Cannot read file: {e}")),
                },
                FieldValue::Rows(rows) => {
                    for row in rows.iter().filter(|r| !is_blank_row(r)) {
                        for (cell, column) in row.iter().zip(field.columns()) {
                            payload.text(column.wire, cell.trim());
                        }
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Article, ArticleAuthor, Navigation, NavigationItem};
    use pretty_assertions::assert_eq;

    fn focus_field(form: &mut FormState, name: &'static str) {
        form.focus_key(FieldKey::Field(name));
    }

    fn type_text(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.input_char(c);
        }
    }

    #[test]
    fn test_create_defaults() {
        let form = FormState::create(EntityKind::Article);
        assert_eq!(form.text("language"), "uz");
        assert_eq!(form.text("date_published"), Local::now().format("%Y-%m-%d").to_string());
        assert!(form.flag("is_published"));
        assert!(!form.flag("featured"));
        assert_eq!(form.rows("authors").len(), 1);

        let issue = FormState::create(EntityKind::Issue);
        assert_eq!(issue.text("year"), Local::now().year().to_string());

        let editor = FormState::create(EntityKind::Editor);
        assert_eq!(editor.text("editor_type"), "associate");
    }

    #[test]
    fn test_typed_rich_text_is_mirrored_before_serialization() {
        let mut form = FormState::create(EntityKind::Author);
        focus_field(&mut form, "bio");
        type_text(&mut form, "Works on *rivers*");

        let payload = form.to_payload().unwrap();
        assert_eq!(payload.get("bio"), Some("<p>Works on <em>rivers</em></p>"));
    }

    #[test]
    fn test_programmatic_rich_text_reaches_payload_through_sync() {
        let mut form = FormState::create(EntityKind::Policy);
        form.set_text("content", "Plain **policy**");

        let payload = form.to_payload().unwrap();
        assert_eq!(payload.get("content"), Some("<p>Plain <strong>policy</strong></p>"));
    }

    #[test]
    fn test_checkbox_serialization() {
        let mut form = FormState::create(EntityKind::Author);
        form.set_text("first_name", "Ali");
        form.set_flag("is_active", false);
        let payload = form.to_payload().unwrap();
        assert!(!payload.contains("is_active"));

        form.set_flag("is_active", true);
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.get("is_active"), Some("on"));
    }

    #[test]
    fn test_edit_prefills_from_record() {
        let article = Article {
            id: 12,
            title: "On rivers".into(),
            abstract_text: "<p>Flow</p>".into(),
            featured: true,
            issue_id: Some(4),
            authors: vec![ArticleAuthor::Name("Ali Valiyev".into())],
            ..Default::default()
        };
        let form = FormState::edit(&Entity::Article(article));

        assert_eq!(form.mode(), FormMode::Edit(12));
        assert_eq!(form.title(), "Edit article #12");
        assert_eq!(form.text("title"), "On rivers");
        assert_eq!(form.text("issue_id"), "4");
        assert!(form.flag("featured"));
        assert_eq!(form.rows("authors")[0][0], "Ali");
        assert_eq!(form.rows("authors")[0][2], "Valiyev");

        let editor = form.richtext().editor(form.rich_id("abstract")).unwrap();
        assert_eq!(editor.text(), "<p>Flow</p>");
    }

    #[test]
    fn test_author_rows_serialize_as_repeated_keys() {
        let mut form = FormState::create(EntityKind::Article);
        form.set_cell("authors", 0, 0, "Ali");
        form.set_cell("authors", 0, 2, "Valiyev");
        form.focus_key(FieldKey::Cell {
            field: "authors",
            row: 0,
            column: 0,
        });
        form.add_row();
        form.set_cell("authors", 1, 0, "Vali");
        form.set_cell("authors", 1, 2, "Aliyev");
        form.add_row();

        let payload = form.to_payload().unwrap();
        assert_eq!(payload.get_all("author_first_name[]"), vec!["Ali", "Vali"]);
        assert_eq!(payload.get_all("author_last_name[]"), vec!["Valiyev", "Aliyev"]);
        assert_eq!(payload.get_all("author_orcid[]"), vec!["", ""]);
    }

    #[test]
    fn test_prune_keeps_one_row() {
        let mut form = FormState::create(EntityKind::Article);
        form.focus_key(FieldKey::Cell {
            field: "authors",
            row: 0,
            column: 0,
        });
        form.add_row();
        form.add_row();
        assert_eq!(form.rows("authors").len(), 3);

        form.prune_empty_rows();
        assert_eq!(form.rows("authors").len(), 1);
    }

    #[test]
    fn test_remove_last_row_clears_it() {
        let mut form = FormState::create(EntityKind::Navigation);
        form.set_cell("items", 0, 0, "About");
        form.focus_key(FieldKey::Cell {
            field: "items",
            row: 0,
            column: 0,
        });
        form.remove_row();
        assert_eq!(form.rows("items"), &[vec![String::new()]]);
    }

    #[test]
    fn test_navigation_items_prefill_and_serialize() {
        let nav = Navigation {
            id: 3,
            name: "Main".into(),
            item_count: 2,
            items: vec![
                NavigationItem { id: 1, text: "About".into() },
                NavigationItem { id: 2, text: "Contact".into() },
            ],
        };
        let mut form = FormState::edit(&Entity::Navigation(nav));
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.get_all("items[]"), vec!["About", "Contact"]);
    }

    #[test]
    fn test_number_field_rejects_letters() {
        let mut form = FormState::create(EntityKind::Issue);
        focus_field(&mut form, "volume");
        type_text(&mut form, "1a2");
        assert_eq!(form.text("volume"), "12");
    }

    #[test]
    fn test_optional_select_cycles_through_empty() {
        let mut form = FormState::create(EntityKind::Article);
        form.set_options(
            Lookup::Issues,
            &[Choice::new("1", "Vol.1 No.1 (2024)"), Choice::new("2", "Vol.1 No.2 (2024)")],
        );
        focus_field(&mut form, "issue_id");
        assert_eq!(form.text("issue_id"), "");

        form.cycle_option(true);
        assert_eq!(form.text("issue_id"), "1");
        form.cycle_option(true);
        form.cycle_option(true);
        assert_eq!(form.text("issue_id"), "");
        form.cycle_option(false);
        assert_eq!(form.text("issue_id"), "2");
    }

    #[test]
    fn test_required_select_takes_first_option() {
        let mut form = FormState::create(EntityKind::Policy);
        form.set_options(
            Lookup::PolicyTypes,
            &[Choice::new("ethics", "Ethics"), Choice::new("review", "Peer review")],
        );
        assert_eq!(form.text("policy_type"), "ethics");
    }

    #[test]
    fn test_prefill_author_row_from_existing() {
        let mut form = FormState::create(EntityKind::Article);
        form.set_authors(vec![Author {
            id: 1,
            first_name: "Ali".into(),
            last_name: "Valiyev".into(),
            orcid: "0000-0002".into(),
            ..Default::default()
        }]);
        form.focus_key(FieldKey::Cell {
            field: "authors",
            row: 0,
            column: 3,
        });

        assert_eq!(form.prefill_author_row(), Some("Valiyev Ali".to_string()));
        assert_eq!(form.rows("authors")[0][0], "Ali");
        assert_eq!(form.rows("authors")[0][5], "0000-0002");
    }

    #[test]
    fn test_seo_form_maps_settings_names() {
        let settings = SeoSettings {
            meta_title: "Journals".into(),
            enable_google_scholar: true,
            ..Default::default()
        };
        let mut form = FormState::seo(&settings);
        let payload = form.to_payload().unwrap();
        assert_eq!(payload.get("site_title"), Some("Journals"));
        assert_eq!(payload.get("enable_google_scholar"), Some("on"));
        assert!(!payload.contains("auto_sitemap"));
    }

    #[test]
    fn test_lookups_include_authors_for_article() {
        let form = FormState::create(EntityKind::Article);
        assert_eq!(form.lookups(), vec![Lookup::Issues, Lookup::Authors]);
        assert!(FormState::create(EntityKind::Author).lookups().is_empty());
    }

    #[test]
    fn test_missing_attachment_is_field_error() {
        let mut form = FormState::create(EntityKind::Article);
        form.set_text("pdf_file", "/definitely/not/here.pdf");
        let errors = form.to_payload().unwrap_err();
        assert!(errors.contains(&FieldKey::Field("pdf_file")));
    }
}
