//! Backend entity types and their admin endpoints
//!
//! Every record the admin panel manages is owned by the remote backend.
//! `EntityKind` knows where each one lives (list, detail, add, update,
//! delete paths) and which JSON keys carry it; `models` holds the typed
//! shapes; `forms` describes the editable fields.

pub mod forms;
pub mod models;
pub mod record;

pub use models::{Choice, Entity};
pub use record::Record;

use crate::api::ApiError;

/// The entity types managed through the list + modal pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Journal,
    Author,
    Issue,
    Article,
    Editor,
    Policy,
    Navigation,
    /// "Fan tarmoq" on the backend
    FieldOfScience,
    /// "Ilmiy nashr" on the backend
    PublicationType,
}

/// An endpoint of an entity, relative to the site root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    List,
    /// Read-only detail (authors have a richer details endpoint)
    View(u64),
    /// Detail fetched to prefill the edit form
    Edit(u64),
    Create,
    Update(u64),
    Delete(u64),
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Journal,
        EntityKind::Author,
        EntityKind::Issue,
        EntityKind::Article,
        EntityKind::Editor,
        EntityKind::Policy,
        EntityKind::Navigation,
        EntityKind::FieldOfScience,
        EntityKind::PublicationType,
    ];

    /// Singular display name, used in toasts and confirmations
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Journal => "Journal",
            EntityKind::Author => "Author",
            EntityKind::Issue => "Issue",
            EntityKind::Article => "Article",
            EntityKind::Editor => "Editor",
            EntityKind::Policy => "Policy",
            EntityKind::Navigation => "Navigation",
            EntityKind::FieldOfScience => "Field of science",
            EntityKind::PublicationType => "Publication type",
        }
    }

    pub fn plural_label(self) -> &'static str {
        match self {
            EntityKind::Journal => "Journals",
            EntityKind::Author => "Authors",
            EntityKind::Issue => "Issues",
            EntityKind::Article => "Articles",
            EntityKind::Editor => "Editors",
            EntityKind::Policy => "Policies",
            EntityKind::Navigation => "Navigation",
            EntityKind::FieldOfScience => "Fields of science",
            EntityKind::PublicationType => "Publication types",
        }
    }

    /// Name used on the command line (`journal-admin list authors`)
    pub fn cli_name(self) -> &'static str {
        match self {
            EntityKind::Journal => "journals",
            EntityKind::Author => "authors",
            EntityKind::Issue => "issues",
            EntityKind::Article => "articles",
            EntityKind::Editor => "editors",
            EntityKind::Policy => "policies",
            EntityKind::Navigation => "navigation",
            EntityKind::FieldOfScience => "fan-tarmoq",
            EntityKind::PublicationType => "ilmiy-nashr",
        }
    }

    pub fn from_cli_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::ALL.into_iter().find(|kind| {
            kind.cli_name() == name || kind.cli_name().trim_end_matches('s') == name
        })
    }

    /// JSON key holding the records in a list response
    pub fn list_key(self) -> &'static str {
        match self {
            EntityKind::Journal => "journals",
            EntityKind::Author => "authors",
            EntityKind::Issue => "issues",
            EntityKind::Article => "articles",
            EntityKind::Editor => "editors",
            EntityKind::Policy => "policies",
            EntityKind::Navigation => "navigations",
            EntityKind::FieldOfScience => "fan_tarmoqs",
            EntityKind::PublicationType => "ilmiy_nashrs",
        }
    }

    /// JSON key holding the record in a detail response
    pub fn record_key(self) -> &'static str {
        match self {
            EntityKind::Journal => "journal",
            EntityKind::Author => "author",
            EntityKind::Issue => "issue",
            EntityKind::Article => "article",
            EntityKind::Editor => "editor",
            EntityKind::Policy => "policy",
            EntityKind::Navigation => "navigation",
            EntityKind::FieldOfScience => "fan_tarmoq",
            EntityKind::PublicationType => "ilmiy_nashr",
        }
    }

    /// Entities that live under a journal and need an active journal id
    pub fn journal_scoped(self) -> bool {
        matches!(
            self,
            EntityKind::Issue | EntityKind::Article | EntityKind::Editor | EntityKind::Policy
        )
    }

    /// Entities whose list endpoint takes `page=` and returns pagination
    pub fn paginated(self) -> bool {
        matches!(
            self,
            EntityKind::Author | EntityKind::Issue | EntityKind::Article
        )
    }

    pub fn searchable(self) -> bool {
        matches!(self, EntityKind::Author | EntityKind::Article)
    }

    /// Build the relative path for an endpoint of this entity.
    ///
    /// Fails with [`ApiError::MissingJournal`] when a journal-scoped entity
    /// is addressed without an active journal.
    pub fn route(self, route: Route, journal: Option<u64>) -> Result<String, ApiError> {
        use EntityKind::*;
        use Route::*;

        let j = || journal.ok_or(ApiError::MissingJournal);

        let path = match (self, route) {
            (Journal, List) => "admin/journals/list/".to_string(),
            (Journal, View(id) | Edit(id) | Update(id)) => format!("admin/journals/update/{id}/"),
            (Journal, Create) => "admin/journals/add/".to_string(),
            (Journal, Delete(id)) => format!("admin/journals/delete/{id}/"),

            (Author, List) => "admin/authors/list/".to_string(),
            (Author, View(id)) => format!("admin/authors/details/{id}/"),
            (Author, Edit(id) | Update(id)) => format!("admin/authors/update/{id}/"),
            (Author, Create) => "admin/authors/add/".to_string(),
            (Author, Delete(id)) => format!("admin/authors/delete/{id}/"),

            (Issue, List) => format!("admin/journals/{}/issues/", j()?),
            (Issue, View(id) | Edit(id) | Update(id)) => format!("admin/issues/update/{id}/"),
            (Issue, Create) => format!("admin/journals/{}/issues/add/", j()?),
            (Issue, Delete(id)) => format!("admin/issues/delete/{id}/"),

            (Article, List) => format!("admin/journals/{}/articles/", j()?),
            (Article, View(id) | Edit(id) | Update(id)) => {
                format!("admin/articles/update/{id}/")
            }
            (Article, Create) => format!("admin/journals/{}/articles/add/", j()?),
            (Article, Delete(id)) => format!("admin/articles/delete/{id}/"),

            (Editor, List) => format!("admin/journals/{}/editors/", j()?),
            (Editor, View(id) | Edit(id) | Update(id)) => {
                format!("admin/journals/{}/editors/{id}/update/", j()?)
            }
            (Editor, Create) => format!("admin/journals/{}/editors/add/", j()?),
            (Editor, Delete(id)) => format!("admin/journals/{}/editors/{id}/delete/", j()?),

            (Policy, List) => format!("admin/journals/{}/policies/", j()?),
            (Policy, View(id) | Edit(id) | Update(id)) => {
                format!("admin/journals/{}/policies/{id}/update/", j()?)
            }
            (Policy, Create) => format!("admin/journals/{}/policies/add/", j()?),
            (Policy, Delete(id)) => format!("admin/journals/{}/policies/{id}/delete/", j()?),

            (Navigation, List) => "admin/navigation/list/".to_string(),
            (Navigation, View(id) | Edit(id) | Update(id)) => {
                format!("admin/navigation/update/{id}/")
            }
            (Navigation, Create) => "admin/navigation/add/".to_string(),
            (Navigation, Delete(id)) => format!("admin/navigation/delete/{id}/"),

            (FieldOfScience, List) => "admin/fan-tarmoq/list/".to_string(),
            (FieldOfScience, View(id) | Edit(id) | Update(id)) => {
                format!("admin/fan-tarmoq/{id}/edit/")
            }
            (FieldOfScience, Create) => "admin/fan-tarmoq/add/".to_string(),
            (FieldOfScience, Delete(id)) => format!("admin/fan-tarmoq/{id}/delete/"),

            (PublicationType, List) => "admin/ilmiy-nashr/list/".to_string(),
            (PublicationType, View(id) | Edit(id) | Update(id)) => {
                format!("admin/ilmiy-nashr/{id}/edit/")
            }
            (PublicationType, Create) => "admin/ilmiy-nashr/add/".to_string(),
            (PublicationType, Delete(id)) => format!("admin/ilmiy-nashr/{id}/delete/"),
        };

        Ok(path)
    }

    /// Table columns: header and preferred width in terminal cells
    pub fn columns(self) -> &'static [(&'static str, u16)] {
        match self {
            EntityKind::Journal => &[
                ("ID", 5),
                ("Title", 36),
                ("Slug", 16),
                ("ISSN", 20),
                ("Issues", 7),
                ("Articles", 9),
                ("Active", 7),
            ],
            EntityKind::Author => &[
                ("ID", 5),
                ("Name", 28),
                ("Email", 26),
                ("Affiliation", 28),
                ("ORCID", 20),
                ("Articles", 9),
                ("Active", 7),
            ],
            EntityKind::Issue => &[
                ("ID", 5),
                ("Vol/No", 10),
                ("Year", 6),
                ("Title", 30),
                ("Published on", 13),
                ("Articles", 9),
                ("Status", 10),
            ],
            EntityKind::Article => &[
                ("ID", 5),
                ("Title", 40),
                ("Authors", 26),
                ("Issue", 14),
                ("Date", 11),
                ("Views", 6),
                ("Status", 10),
                ("★", 2),
            ],
            EntityKind::Editor => &[
                ("ID", 5),
                ("Name", 30),
                ("Role", 22),
                ("Affiliation", 30),
                ("Active", 7),
            ],
            EntityKind::Policy => &[
                ("ID", 5),
                ("Type", 22),
                ("Title", 34),
                ("Version", 8),
                ("Effective", 11),
                ("Public", 7),
                ("Active", 7),
            ],
            EntityKind::Navigation => &[("ID", 5), ("Name", 30), ("Items", 6), ("Preview", 40)],
            EntityKind::FieldOfScience | EntityKind::PublicationType => {
                &[("ID", 5), ("Name", 34), ("Description", 44), ("Active", 7)]
            }
        }
    }
}

/// CSV export targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Authors,
    Articles,
    Journals,
    /// Editors of the active journal
    Editors,
    /// Policies of the active journal
    Policies,
}

impl ExportKind {
    pub fn name(self) -> &'static str {
        match self {
            ExportKind::Authors => "authors",
            ExportKind::Articles => "articles",
            ExportKind::Journals => "journals",
            ExportKind::Editors => "editors",
            ExportKind::Policies => "policies",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "authors" => Some(ExportKind::Authors),
            "articles" => Some(ExportKind::Articles),
            "journals" => Some(ExportKind::Journals),
            "editors" => Some(ExportKind::Editors),
            "policies" => Some(ExportKind::Policies),
            _ => None,
        }
    }

    /// Export that belongs to a section, if any
    pub fn for_entity(kind: EntityKind) -> Option<Self> {
        match kind {
            EntityKind::Author => Some(ExportKind::Authors),
            EntityKind::Article => Some(ExportKind::Articles),
            EntityKind::Journal => Some(ExportKind::Journals),
            EntityKind::Editor => Some(ExportKind::Editors),
            EntityKind::Policy => Some(ExportKind::Policies),
            _ => None,
        }
    }

    pub fn path(self, journal: Option<u64>) -> Result<String, ApiError> {
        Ok(match self {
            ExportKind::Authors => "admin/export/authors/".to_string(),
            ExportKind::Articles => "admin/export/articles/".to_string(),
            ExportKind::Journals => "admin/export/journals/".to_string(),
            ExportKind::Editors => format!(
                "admin/journals/{}/export/editors/",
                journal.ok_or(ApiError::MissingJournal)?
            ),
            ExportKind::Policies => format!(
                "admin/journals/{}/export/policies/",
                journal.ok_or(ApiError::MissingJournal)?
            ),
        })
    }
}
