//! Client-side form validation
//!
//! Runs before any request is built. Errors are keyed by field (or by
//! row cell for repeated groups) and kept in form order, so the first
//! entry is where focus goes.

use super::form::{FieldKey, FieldValue, FormMode, FormState, FormTarget};
use crate::api::form::guess_mime;
use crate::domain::forms::{FieldKind, FileAccept, RowColumn};
use crate::domain::EntityKind;
use crate::util::html_to_text;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Largest accepted article PDF
pub const MAX_PDF_BYTES: u64 = 10 * 1024 * 1024;

pub(crate) const AUTHOR_REQUIRED: &str = "Enter at least one author with first and last name";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(FieldKey, String)>,
}

impl ValidationErrors {
    pub fn push(&mut self, key: FieldKey, message: impl Into<String>) {
        if !self.contains(&key) {
            self.entries.push((key, message.into()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, key: &FieldKey) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn message_for(&self, key: &FieldKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, m)| m.as_str())
    }

    /// Any error on the field or one of its cells
    pub fn field_has_error(&self, field: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.field() == field)
    }

    pub fn first_key(&self) -> Option<FieldKey> {
        self.entries.first().map(|(k, _)| *k)
    }

    pub fn first_message(&self) -> Option<&str> {
        self.entries.first().map(|(_, m)| m.as_str())
    }

    pub fn remove(&mut self, key: &FieldKey) {
        self.entries.retain(|(k, _)| k != key);
    }

    pub fn clear_field(&mut self, field: &str) {
        self.entries.retain(|(k, _)| k.field() != field);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &str)> {
        self.entries.iter().map(|(k, m)| (k, m.as_str()))
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        for (key, message) in other.entries {
            self.push(key, message);
        }
    }
}

fn slug_pattern() -> &'static Regex {
    static SLUG: OnceLock<Regex> = OnceLock::new();
    SLUG.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("static regex"))
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static regex"))
}

/// Check an attachment on disk against what the field accepts
pub fn check_file(path: &Path, accept: FileAccept) -> Result<(), String> {
    let meta = std::fs::metadata(path).map_err(|_| format!("File not found: {}", path.display()))?;
    if !meta.is_file() {
        return Err(format!("Not a file: {}", path.display()));
    }

    let mime = guess_mime(path);
    match accept {
        FileAccept::Pdf => {
            if mime != "application/pdf" {
                return Err("Only PDF files are accepted".to_string());
            }
            if meta.len() > MAX_PDF_BYTES {
                return Err("PDF must be 10 MB or smaller".to_string());
            }
        }
        FileAccept::Image => {
            if !mime.starts_with("image/") {
                return Err("Only image files are accepted".to_string());
            }
        }
    }
    Ok(())
}

/// Validate a form. Call after `prune_empty_rows` and `sync_richtext`.
pub fn validate(form: &FormState) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    for field in form.fields() {
        let spec = field.spec;
        let key = FieldKey::Field(spec.name);

        match (spec.kind, &field.value) {
            (FieldKind::Checkbox, _) => {}
            (FieldKind::Rows(columns), FieldValue::Rows(rows)) => {
                check_rows(spec.name, spec.required, columns, rows, &mut errors);
            }
            (FieldKind::File(accept), FieldValue::File(path)) => {
                let path = path.trim();
                if path.is_empty() {
                    // Edits keep the stored file when none is chosen
                    if spec.required && form.mode() == FormMode::Create {
                        errors.push(key, format!("{} is required", spec.label));
                    }
                } else if let Err(message) = check_file(Path::new(path), accept) {
                    errors.push(key, message);
                }
            }
            (kind, value) => {
                let text = match value {
                    FieldValue::RichText(html) => html_to_text(html),
                    _ => field.text().to_string(),
                };
                let text = text.trim();
                if text.is_empty() {
                    if spec.required {
                        errors.push(key, format!("{} is required", spec.label));
                    }
                } else if let Err(message) = check_format(kind, text) {
                    errors.push(key, message);
                }
            }
        }

        if form.target() == FormTarget::Entity(EntityKind::Journal) {
            check_journal_field(spec.name, field.text(), &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_format(kind: FieldKind, text: &str) -> Result<(), String> {
    match kind {
        FieldKind::Email if !email_pattern().is_match(text) => {
            Err("Enter a valid email address".to_string())
        }
        FieldKind::Url => match url::Url::parse(text) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => Ok(()),
            _ => Err("Enter a full URL starting with http:// or https://".to_string()),
        },
        FieldKind::Number if text.parse::<i64>().is_err() => Err("Enter a whole number".to_string()),
        FieldKind::Date if chrono::NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() => {
            Err("Enter a date as YYYY-MM-DD".to_string())
        }
        _ => Ok(()),
    }
}

fn check_journal_field(name: &'static str, value: &str, errors: &mut ValidationErrors) {
    let key = FieldKey::Field(name);
    match name {
        "title" => {
            let title = value.trim();
            if !title.is_empty() && title.chars().count() < 3 {
                errors.push(key, "Title must be at least 3 characters");
            }
        }
        "url_slug" => {
            if !value.is_empty() && !slug_pattern().is_match(value) {
                errors.push(
                    key,
                    "URL slug may only contain lowercase letters, digits and hyphens",
                );
            }
        }
        _ => {}
    }
}

/// Repeated rows: a started row must carry every name column, and a
/// required group needs at least one complete row.
fn check_rows(
    field: &'static str,
    required: bool,
    columns: &[RowColumn],
    rows: &[Vec<String>],
    errors: &mut ValidationErrors,
) {
    let name_columns: Vec<(usize, &RowColumn)> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| c.key.ends_with("_name") && c.key != "middle_name")
        .collect();
    let email_column = columns.iter().position(|c| c.key == "email");

    let cell = |row, column| FieldKey::Cell { field, row, column };
    let filled = |row: &Vec<String>, column: usize| {
        row.get(column).is_some_and(|s| !s.trim().is_empty())
    };

    let mut complete = 0;
    let mut partial = false;
    for (i, row) in rows.iter().enumerate() {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let missing: Vec<_> = name_columns
            .iter()
            .filter(|(idx, _)| !filled(row, *idx))
            .collect();
        if missing.is_empty() {
            complete += 1;
        } else {
            partial = true;
            for (idx, column) in missing {
                errors.push(cell(i, *idx), format!("{} is required", column.label));
            }
        }
        if let Some(idx) = email_column {
            let email = row[idx].trim();
            if !email.is_empty() && !email_pattern().is_match(email) {
                errors.push(cell(i, idx), "Enter a valid email address");
            }
        }
    }

    if required && complete == 0 && !partial {
        for (idx, _) in &name_columns {
            errors.push(cell(0, *idx), AUTHOR_REQUIRED);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Article, ArticleAuthor};
    use crate::domain::Entity;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn first_name(row: usize) -> FieldKey {
        FieldKey::Cell {
            field: "authors",
            row,
            column: 0,
        }
    }

    fn last_name(row: usize) -> FieldKey {
        FieldKey::Cell {
            field: "authors",
            row,
            column: 2,
        }
    }

    fn pdf_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4").unwrap();
        file
    }

    fn valid_article(pdf: &Path) -> FormState {
        let mut form = FormState::create(EntityKind::Article);
        form.set_text("title", "On rivers");
        form.set_text("abstract", "Flow of water");
        form.set_text("pdf_file", &pdf.display().to_string());
        form.set_cell("authors", 0, 0, "Ali");
        form.set_cell("authors", 0, 2, "Valiyev");
        form.sync_richtext();
        form
    }

    #[test]
    fn test_valid_article_passes() {
        let pdf = pdf_file();
        assert_eq!(validate(&valid_article(pdf.path())), Ok(()));
    }

    #[test]
    fn test_article_without_authors_marks_both_name_cells() {
        let pdf = pdf_file();
        let mut form = valid_article(pdf.path());
        form.set_cell("authors", 0, 0, "");
        form.set_cell("authors", 0, 2, "");
        form.prune_empty_rows();

        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.message_for(&first_name(0)), Some(AUTHOR_REQUIRED));
        assert_eq!(errors.message_for(&last_name(0)), Some(AUTHOR_REQUIRED));
    }

    #[test]
    fn test_half_filled_row_marks_missing_cell() {
        let pdf = pdf_file();
        let mut form = valid_article(pdf.path());
        form.set_cell("authors", 0, 2, "");

        let errors = validate(&form).unwrap_err();
        assert!(!errors.contains(&first_name(0)));
        assert_eq!(errors.message_for(&last_name(0)), Some("Last name is required"));
    }

    #[test]
    fn test_blank_title_and_abstract() {
        let pdf = pdf_file();
        let mut form = valid_article(pdf.path());
        form.set_text("title", "   ");
        form.set_text("abstract", "<p><br></p>");
        form.sync_richtext();

        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.first_key(), Some(FieldKey::Field("title")));
        assert!(errors.contains(&FieldKey::Field("abstract")));
    }

    #[test]
    fn test_pdf_required_only_on_create() {
        let pdf = pdf_file();
        let mut form = valid_article(pdf.path());
        form.set_text("pdf_file", "");
        let errors = validate(&form).unwrap_err();
        assert_eq!(errors.message_for(&FieldKey::Field("pdf_file")), Some("PDF file is required"));

        let stored = Article {
            id: 3,
            title: "On rivers".into(),
            abstract_text: "<p>Flow</p>".into(),
            authors: vec![ArticleAuthor::Name("Ali Valiyev".into())],
            ..Default::default()
        };
        let mut form = FormState::edit(&Entity::Article(stored));
        form.sync_richtext();
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_wrong_file_type_rejected() {
        let mut txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        txt.write_all(b"hello").unwrap();
        assert_eq!(
            check_file(txt.path(), FileAccept::Pdf),
            Err("Only PDF files are accepted".to_string())
        );
        assert!(check_file(txt.path(), FileAccept::Image).is_err());
        assert!(check_file(Path::new("/no/such/file.pdf"), FileAccept::Pdf).is_err());
    }

    #[test]
    fn test_oversized_pdf_rejected() {
        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.as_file().set_len(MAX_PDF_BYTES + 1).unwrap();
        assert_eq!(
            check_file(file.path(), FileAccept::Pdf),
            Err("PDF must be 10 MB or smaller".to_string())
        );
    }

    #[test]
    fn test_journal_title_and_slug() {
        let mut form = FormState::create(EntityKind::Journal);
        form.set_text("title", " ab ");
        form.set_text("url_slug", "Bad Slug");

        let errors = validate(&form).unwrap_err();
        assert_eq!(
            errors.message_for(&FieldKey::Field("title")),
            Some("Title must be at least 3 characters")
        );
        assert!(errors.contains(&FieldKey::Field("url_slug")));

        form.set_text("title", "Geography");
        form.set_text("url_slug", "geo-2024");
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_format_checks() {
        let mut form = FormState::create(EntityKind::Author);
        form.set_text("first_name", "Ali");
        form.set_text("last_name", "Valiyev");
        form.set_text("email", "not-an-email");
        form.set_text("website", "example.com");

        let errors = validate(&form).unwrap_err();
        assert!(errors.contains(&FieldKey::Field("email")));
        assert!(errors.contains(&FieldKey::Field("website")));

        form.set_text("email", "ali@example.uz");
        form.set_text("website", "https://example.uz");
        assert_eq!(validate(&form), Ok(()));
    }

    #[test]
    fn test_navigation_rows_are_optional() {
        let mut form = FormState::create(EntityKind::Navigation);
        form.set_text("name", "Footer");
        form.prune_empty_rows();
        assert_eq!(validate(&form), Ok(()));
    }
}
