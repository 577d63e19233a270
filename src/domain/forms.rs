//! Declarative form descriptions
//!
//! Each entity's add/edit form is a static list of [`FieldSpec`]s. The form
//! state in `crud::form` is built from these, and serialization walks them
//! in order, so the wire names here are exactly what the backend reads.

use super::EntityKind;

/// Where a select's options come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    /// Fixed `(value, label)` pairs
    Static(&'static [(&'static str, &'static str)]),
    /// Fetched from the backend when the form opens
    Lookup(Lookup),
}

/// Backend lookups that feed select fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    EditorTypes,
    PolicyTypes,
    /// Issues of the active journal
    Issues,
    /// Existing authors, used to prefill article author rows
    Authors,
    /// Journals, used to pick the active journal
    Journals,
}

/// Accepted attachment type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAccept {
    Pdf,
    Image,
}

/// One column of a repeated row group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowColumn {
    pub key: &'static str,
    pub label: &'static str,
    /// Repeated multipart key, e.g. `author_first_name[]`
    pub wire: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Email,
    Url,
    Checkbox,
    Select(OptionSource),
    /// HTML produced by the rich-text editor
    RichText,
    File(FileAccept),
    /// Repeated rows serialized column by column
    Rows(&'static [RowColumn]),
}

/// Initial value for a create form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDefault {
    Empty,
    Value(&'static str),
    Checked,
    Today,
    CurrentYear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Multipart field name
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: FieldDefault,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            default: FieldDefault::Empty,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn default_to(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }
}

/// A value read from a record to prefill its edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValue {
    Text(String),
    Flag(bool),
    /// Row cells in [`RowColumn`] order
    Rows(Vec<Vec<String>>),
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::Text(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::Text(s)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Flag(b)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field tables
// ─────────────────────────────────────────────────────────────────────────────

use FieldKind::*;

const LANGUAGES: &[(&str, &str)] = &[("uz", "O'zbek"), ("ru", "Русский"), ("en", "English")];

pub const AUTHOR_ROW: &[RowColumn] = &[
    RowColumn {
        key: "first_name",
        label: "First name",
        wire: "author_first_name[]",
    },
    RowColumn {
        key: "middle_name",
        label: "Middle name",
        wire: "author_middle_name[]",
    },
    RowColumn {
        key: "last_name",
        label: "Last name",
        wire: "author_last_name[]",
    },
    RowColumn {
        key: "affiliation",
        label: "Affiliation",
        wire: "author_affiliation[]",
    },
    RowColumn {
        key: "email",
        label: "Email",
        wire: "author_email[]",
    },
    RowColumn {
        key: "orcid",
        label: "ORCID",
        wire: "author_orcid[]",
    },
];

pub const NAVIGATION_ROW: &[RowColumn] = &[RowColumn {
    key: "text",
    label: "Item",
    wire: "items[]",
}];

const JOURNAL_FORM: &[FieldSpec] = &[
    FieldSpec::new("title", "Title", Text).required(),
    FieldSpec::new("initials", "Initials", Text),
    FieldSpec::new("abbreviation", "Abbreviation", Text),
    FieldSpec::new("url_slug", "URL slug", Text),
    FieldSpec::new("description", "Description", RichText),
    FieldSpec::new("meta_description", "Meta description", Text),
    FieldSpec::new("contact_email", "Contact email", Email),
    FieldSpec::new("website", "Website", Url),
    FieldSpec::new("publisher", "Publisher", Text),
    FieldSpec::new("issn_print", "ISSN (print)", Text),
    FieldSpec::new("issn_online", "ISSN (online)", Text),
    FieldSpec::new("is_active", "Active", Checkbox).default_to(FieldDefault::Checked),
    FieldSpec::new("is_open_access", "Open access", Checkbox).default_to(FieldDefault::Checked),
    FieldSpec::new("cover_image", "Cover image", File(FileAccept::Image)),
];

const AUTHOR_FORM: &[FieldSpec] = &[
    FieldSpec::new("first_name", "First name", Text).required(),
    FieldSpec::new("middle_name", "Middle name", Text),
    FieldSpec::new("last_name", "Last name", Text).required(),
    FieldSpec::new("email", "Email", Email),
    FieldSpec::new("affiliation", "Affiliation", Text),
    FieldSpec::new("department", "Department", Text),
    FieldSpec::new("position", "Position", Text),
    FieldSpec::new("academic_title", "Academic title", Text),
    FieldSpec::new("academic_degree", "Academic degree", Text),
    FieldSpec::new("orcid", "ORCID", Text),
    FieldSpec::new("google_scholar_id", "Google Scholar ID", Text),
    FieldSpec::new("website", "Website", Url),
    FieldSpec::new("bio", "Biography", RichText),
    FieldSpec::new("is_active", "Active", Checkbox).default_to(FieldDefault::Checked),
];

const ISSUE_FORM: &[FieldSpec] = &[
    FieldSpec::new("volume", "Volume", Number).required(),
    FieldSpec::new("number", "Number", Number).required(),
    FieldSpec::new("year", "Year", Number)
        .required()
        .default_to(FieldDefault::CurrentYear),
    FieldSpec::new("title", "Title", Text),
    FieldSpec::new("description", "Description", RichText),
    FieldSpec::new("date_published", "Published on", Date),
    FieldSpec::new("is_published", "Published", Checkbox),
    FieldSpec::new("cover_image", "Cover image", File(FileAccept::Image)),
];

const ARTICLE_FORM: &[FieldSpec] = &[
    FieldSpec::new("title", "Title", Text).required(),
    FieldSpec::new("subtitle", "Subtitle", Text),
    FieldSpec::new("abstract", "Abstract", RichText).required(),
    FieldSpec::new("keywords", "Keywords", Text),
    FieldSpec::new("date_published", "Published on", Date).default_to(FieldDefault::Today),
    FieldSpec::new("first_page", "First page", Number),
    FieldSpec::new("last_page", "Last page", Number),
    FieldSpec::new("meta_description", "Meta description", Text),
    FieldSpec::new("doi", "DOI", Text),
    FieldSpec::new("references", "References", RichText),
    FieldSpec::new("featured", "Featured", Checkbox),
    FieldSpec::new("open_access", "Open access", Checkbox).default_to(FieldDefault::Checked),
    FieldSpec::new("is_published", "Published", Checkbox).default_to(FieldDefault::Checked),
    FieldSpec::new("language", "Language", Select(OptionSource::Static(LANGUAGES)))
        .default_to(FieldDefault::Value("uz")),
    FieldSpec::new("issue_id", "Issue", Select(OptionSource::Lookup(Lookup::Issues))),
    FieldSpec::new("pdf_file", "PDF file", File(FileAccept::Pdf)).required(),
    FieldSpec::new("authors", "Authors", Rows(AUTHOR_ROW)).required(),
];

const EDITOR_FORM: &[FieldSpec] = &[
    FieldSpec::new("first_name", "First name", Text).required(),
    FieldSpec::new("middle_name", "Middle name", Text),
    FieldSpec::new("last_name", "Last name", Text).required(),
    FieldSpec::new("title", "Title", Text),
    FieldSpec::new("affiliation", "Affiliation", Text),
    FieldSpec::new("position", "Position", Text),
    FieldSpec::new(
        "editor_type",
        "Role",
        Select(OptionSource::Lookup(Lookup::EditorTypes)),
    )
    .default_to(FieldDefault::Value("associate")),
    FieldSpec::new("order", "Order", Number).default_to(FieldDefault::Value("0")),
    FieldSpec::new("is_active", "Active", Checkbox).default_to(FieldDefault::Checked),
];

const POLICY_FORM: &[FieldSpec] = &[
    FieldSpec::new(
        "policy_type",
        "Type",
        Select(OptionSource::Lookup(Lookup::PolicyTypes)),
    )
    .required(),
    FieldSpec::new("title", "Title", Text).required(),
    FieldSpec::new("content", "Content", RichText).required(),
    FieldSpec::new("short_description", "Short description", RichText),
    FieldSpec::new("requirements", "Requirements", RichText),
    FieldSpec::new("examples", "Examples", RichText),
    FieldSpec::new("is_active", "Active", Checkbox).default_to(FieldDefault::Checked),
    FieldSpec::new("is_public", "Public", Checkbox).default_to(FieldDefault::Checked),
    FieldSpec::new("order", "Order", Number).default_to(FieldDefault::Value("0")),
    FieldSpec::new("language", "Language", Select(OptionSource::Static(LANGUAGES)))
        .default_to(FieldDefault::Value("uz")),
    FieldSpec::new("meta_description", "Meta description", Text),
    FieldSpec::new("keywords", "Keywords", Text),
    FieldSpec::new("version", "Version", Text).default_to(FieldDefault::Value("1.0")),
    FieldSpec::new("effective_date", "Effective date", Date).default_to(FieldDefault::Today),
];

const NAVIGATION_FORM: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", Text).required(),
    FieldSpec::new("items", "Items", Rows(NAVIGATION_ROW)),
];

const CATEGORY_FORM: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", Text).required(),
    FieldSpec::new("description", "Description", Text),
    FieldSpec::new("is_active", "Active", Checkbox).default_to(FieldDefault::Checked),
];

/// SEO settings form. Field names are the ones the save endpoint reads.
pub const SEO_FORM: &[FieldSpec] = &[
    FieldSpec::new("site_title", "Site title", Text),
    FieldSpec::new("site_description", "Site description", Text),
    FieldSpec::new("site_keywords", "Keywords", Text),
    FieldSpec::new("publisher_name", "Publisher name", Text),
    FieldSpec::new("enable_google_scholar", "Google Scholar tags", Checkbox),
    FieldSpec::new("auto_sitemap", "Automatic sitemap", Checkbox),
];

/// The add/edit form of an entity
pub fn form_spec(kind: EntityKind) -> &'static [FieldSpec] {
    match kind {
        EntityKind::Journal => JOURNAL_FORM,
        EntityKind::Author => AUTHOR_FORM,
        EntityKind::Issue => ISSUE_FORM,
        EntityKind::Article => ARTICLE_FORM,
        EntityKind::Editor => EDITOR_FORM,
        EntityKind::Policy => POLICY_FORM,
        EntityKind::Navigation => NAVIGATION_FORM,
        EntityKind::FieldOfScience | EntityKind::PublicationType => CATEGORY_FORM,
    }
}
