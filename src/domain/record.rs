//! Display and form-prefill contract for records
//!
//! The list table, the detail modal, the delete confirmation and the edit
//! form all read records through this trait, so rendering never matches
//! on concrete entity types.

use super::forms::FormValue;
use super::models::{
    Article, ArticleAuthor, Author, Category, Editor, Issue, Journal, Navigation, Policy,
};
use crate::util::html_to_text;

pub trait Record {
    fn id(&self) -> u64;

    /// Short human name used in confirmations ("Delete article \"...\"?")
    fn label(&self) -> String;

    /// Table cells, one per `EntityKind::columns` entry
    fn cells(&self) -> Vec<String>;

    /// Labelled values for the read-only detail view
    fn details(&self) -> Vec<(&'static str, String)>;

    /// Values keyed by form field name, used to prefill the edit form
    fn form_values(&self) -> Vec<(&'static str, FormValue)>;
}

fn yes_no(b: bool) -> String {
    (if b { "yes" } else { "no" }).to_string()
}

fn status(published: bool) -> String {
    (if published { "published" } else { "draft" }).to_string()
}

impl Record for Journal {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn cells(&self) -> Vec<String> {
        let issn = match (self.issn_print.is_empty(), self.issn_online.is_empty()) {
            (false, false) => format!("{} / {}", self.issn_print, self.issn_online),
            (false, true) => self.issn_print.clone(),
            (true, false) => self.issn_online.clone(),
            (true, true) => "-".to_string(),
        };
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.url_slug.clone(),
            issn,
            self.issue_count.to_string(),
            self.article_count.to_string(),
            yes_no(self.is_active),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Title", self.title.clone()),
            ("Initials", self.initials.clone()),
            ("Abbreviation", self.abbreviation.clone()),
            ("URL slug", self.url_slug.clone()),
            ("Publisher", self.publisher.clone()),
            ("ISSN (print)", self.issn_print.clone()),
            ("ISSN (online)", self.issn_online.clone()),
            ("Contact email", self.contact_email.clone()),
            ("Website", self.website.clone()),
            ("Active", yes_no(self.is_active)),
            ("Open access", yes_no(self.is_open_access)),
            ("Meta description", self.meta_description.clone()),
            ("Description", html_to_text(&self.description)),
        ]
    }

    fn form_values(&self) -> Vec<(&'static str, FormValue)> {
        vec![
            ("title", self.title.as_str().into()),
            ("initials", self.initials.as_str().into()),
            ("abbreviation", self.abbreviation.as_str().into()),
            ("url_slug", self.url_slug.as_str().into()),
            ("description", self.description.as_str().into()),
            ("meta_description", self.meta_description.as_str().into()),
            ("contact_email", self.contact_email.as_str().into()),
            ("website", self.website.as_str().into()),
            ("publisher", self.publisher.as_str().into()),
            ("issn_print", self.issn_print.as_str().into()),
            ("issn_online", self.issn_online.as_str().into()),
            ("is_active", self.is_active.into()),
            ("is_open_access", self.is_open_access.into()),
        ]
    }
}

impl Record for Author {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.display_name()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.display_name(),
            self.email.clone(),
            self.affiliation.clone(),
            self.orcid.clone(),
            self.article_count.to_string(),
            yes_no(self.is_active),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let mut details = vec![
            ("Name", self.display_name()),
            ("Email", self.email.clone()),
            ("Affiliation", self.affiliation.clone()),
            ("Department", self.department.clone()),
            ("Position", self.position.clone()),
            ("Academic title", self.academic_title.clone()),
            ("Academic degree", self.academic_degree.clone()),
            ("ORCID", self.orcid.clone()),
            ("Google Scholar", self.google_scholar_id.clone()),
            ("Website", self.website.clone()),
            ("Active", yes_no(self.is_active)),
            ("Articles", self.article_count.to_string()),
            ("Biography", html_to_text(&self.bio)),
        ];
        if !self.recent_articles.is_empty() {
            let recent = self
                .recent_articles
                .iter()
                .map(|a| format!("{} ({}, {})", a.title, a.journal, a.date))
                .collect::<Vec<_>>()
                .join("\n");
            details.push(("Recent articles", recent));
        }
        details
    }

    fn form_values(&self) -> Vec<(&'static str, FormValue)> {
        vec![
            ("first_name", self.first_name.as_str().into()),
            ("middle_name", self.middle_name.as_str().into()),
            ("last_name", self.last_name.as_str().into()),
            ("email", self.email.as_str().into()),
            ("affiliation", self.affiliation.as_str().into()),
            ("department", self.department.as_str().into()),
            ("position", self.position.as_str().into()),
            ("academic_title", self.academic_title.as_str().into()),
            ("academic_degree", self.academic_degree.as_str().into()),
            ("orcid", self.orcid.as_str().into()),
            ("google_scholar_id", self.google_scholar_id.as_str().into()),
            ("website", self.website.as_str().into()),
            ("bio", self.bio.as_str().into()),
            ("is_active", self.is_active.into()),
        ]
    }
}

impl Record for Issue {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.citation()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            format!("{}/{}", self.volume, self.number),
            self.year.to_string(),
            self.title.clone(),
            self.date_published.clone(),
            self.article_count.to_string(),
            status(self.is_published),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Issue", self.citation()),
            ("Title", self.title.clone()),
            ("Published on", self.date_published.clone()),
            ("Status", status(self.is_published)),
            ("Cover image", yes_no(self.has_cover)),
            ("Description", html_to_text(&self.description)),
        ]
    }

    fn form_values(&self) -> Vec<(&'static str, FormValue)> {
        vec![
            ("volume", self.volume.to_string().into()),
            ("number", self.number.to_string().into()),
            ("year", self.year.to_string().into()),
            ("title", self.title.as_str().into()),
            ("description", self.description.as_str().into()),
            ("date_published", self.date_published.as_str().into()),
            ("is_published", self.is_published.into()),
        ]
    }
}

impl Record for Article {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.author_names(),
            self.issue_info.clone(),
            self.date_published.clone(),
            self.views.to_string(),
            status(self.is_published),
            if self.featured { "★" } else { "" }.to_string(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let pages = match (self.first_page, self.last_page) {
            (Some(a), Some(b)) => format!("{a}-{b}"),
            (Some(a), None) => a.to_string(),
            _ => String::new(),
        };
        vec![
            ("Title", self.title.clone()),
            ("Subtitle", self.subtitle.clone()),
            ("Authors", self.author_names()),
            ("Issue", self.issue_info.clone()),
            ("Published on", self.date_published.clone()),
            ("Pages", pages),
            ("DOI", self.doi.clone()),
            ("Language", self.language.clone()),
            ("Keywords", self.keywords.clone()),
            ("Status", status(self.is_published)),
            ("Featured", yes_no(self.featured)),
            ("Open access", yes_no(self.open_access)),
            ("PDF", yes_no(self.has_pdf)),
            ("Abstract", html_to_text(&self.abstract_text)),
            ("References", html_to_text(&self.references)),
        ]
    }

    fn form_values(&self) -> Vec<(&'static str, FormValue)> {
        let rows = self
            .authors
            .iter()
            .map(|author| match author {
                ArticleAuthor::Detailed(a) => vec![
                    a.first_name.clone(),
                    a.middle_name.clone(),
                    a.last_name.clone(),
                    a.affiliation.clone(),
                    a.email.clone(),
                    a.orcid.clone(),
                ],
                // List rows only carry "First Last"
                ArticleAuthor::Name(name) => {
                    let mut parts = name.splitn(2, ' ');
                    let first = parts.next().unwrap_or_default().to_string();
                    let last = parts.next().unwrap_or_default().to_string();
                    vec![first, String::new(), last, String::new(), String::new(), String::new()]
                }
            })
            .collect();

        let page = |p: Option<u32>| p.map(|n| n.to_string()).unwrap_or_default();

        vec![
            ("title", self.title.as_str().into()),
            ("subtitle", self.subtitle.as_str().into()),
            ("abstract", self.abstract_text.as_str().into()),
            ("keywords", self.keywords.as_str().into()),
            ("date_published", self.date_published.as_str().into()),
            ("first_page", page(self.first_page).into()),
            ("last_page", page(self.last_page).into()),
            ("meta_description", self.meta_description.as_str().into()),
            ("doi", self.doi.as_str().into()),
            ("references", self.references.as_str().into()),
            ("featured", self.featured.into()),
            ("open_access", self.open_access.into()),
            ("is_published", self.is_published.into()),
            ("language", self.language.as_str().into()),
            (
                "issue_id",
                self.issue_id.map(|id| id.to_string()).unwrap_or_default().into(),
            ),
            ("authors", FormValue::Rows(rows)),
        ]
    }
}

impl Record for Editor {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        if self.full_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
        } else {
            self.full_name.clone()
        }
    }

    fn cells(&self) -> Vec<String> {
        let role = if self.editor_type_display.is_empty() {
            self.editor_type.clone()
        } else {
            self.editor_type_display.clone()
        };
        vec![
            self.id.to_string(),
            self.label(),
            role,
            self.affiliation.clone(),
            yes_no(self.is_active),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.label()),
            ("Title", self.title.clone()),
            ("Role", self.editor_type_display.clone()),
            ("Affiliation", self.affiliation.clone()),
            ("Position", self.position.clone()),
            ("Order", self.order.to_string()),
            ("Active", yes_no(self.is_active)),
        ]
    }

    fn form_values(&self) -> Vec<(&'static str, FormValue)> {
        vec![
            ("first_name", self.first_name.as_str().into()),
            ("middle_name", self.middle_name.as_str().into()),
            ("last_name", self.last_name.as_str().into()),
            ("title", self.title.as_str().into()),
            ("affiliation", self.affiliation.as_str().into()),
            ("position", self.position.as_str().into()),
            ("editor_type", self.editor_type.as_str().into()),
            ("order", self.order.to_string().into()),
            ("is_active", self.is_active.into()),
        ]
    }
}

impl Record for Policy {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.policy_type_display.clone(),
            self.title.clone(),
            self.version.clone(),
            self.effective_date.clone(),
            yes_no(self.is_public),
            yes_no(self.is_active),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Title", self.title.clone()),
            ("Type", self.policy_type_display.clone()),
            ("Version", self.version.clone()),
            ("Effective date", self.effective_date.clone()),
            ("Last updated", self.last_updated.clone()),
            ("Language", self.language.clone()),
            ("Public", yes_no(self.is_public)),
            ("Active", yes_no(self.is_active)),
            ("Words", self.word_count.to_string()),
            ("Short description", html_to_text(&self.short_description)),
            ("Content", html_to_text(&self.content)),
            ("Requirements", html_to_text(&self.requirements)),
            ("Examples", html_to_text(&self.examples)),
        ]
    }

    fn form_values(&self) -> Vec<(&'static str, FormValue)> {
        vec![
            ("policy_type", self.policy_type.as_str().into()),
            ("title", self.title.as_str().into()),
            ("content", self.content.as_str().into()),
            ("short_description", self.short_description.as_str().into()),
            ("requirements", self.requirements.as_str().into()),
            ("examples", self.examples.as_str().into()),
            ("is_active", self.is_active.into()),
            ("is_public", self.is_public.into()),
            ("order", self.order.to_string().into()),
            ("language", self.language.as_str().into()),
            ("meta_description", self.meta_description.as_str().into()),
            ("keywords", self.keywords.as_str().into()),
            ("version", self.version.as_str().into()),
            ("effective_date", self.effective_date.as_str().into()),
        ]
    }
}

impl Record for Navigation {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn cells(&self) -> Vec<String> {
        let preview = self
            .items
            .iter()
            .map(|i| i.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.item_count.to_string(),
            preview,
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {}", i + 1, item.text))
            .collect::<Vec<_>>()
            .join("\n");
        vec![("Name", self.name.clone()), ("Items", items)]
    }

    fn form_values(&self) -> Vec<(&'static str, FormValue)> {
        vec![
            ("name", self.name.as_str().into()),
            (
                "items",
                FormValue::Rows(self.items.iter().map(|i| vec![i.text.clone()]).collect()),
            ),
        ]
    }
}

impl Record for Category {
    fn id(&self) -> u64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.description.clone(),
            yes_no(self.is_active),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Description", self.description.clone()),
            ("Active", yes_no(self.is_active)),
        ]
    }

    fn form_values(&self) -> Vec<(&'static str, FormValue)> {
        vec![
            ("name", self.name.as_str().into()),
            ("description", self.description.as_str().into()),
            ("is_active", self.is_active.into()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::form_spec;
    use crate::domain::models::{ArticleAuthorDetail, NavigationItem};
    use crate::domain::{Entity, EntityKind};

    fn samples() -> Vec<Entity> {
        vec![
            Entity::Journal(Journal::default()),
            Entity::Author(Author::default()),
            Entity::Issue(Issue::default()),
            Entity::Article(Article::default()),
            Entity::Editor(Editor::default()),
            Entity::Policy(Policy::default()),
            Entity::Navigation(Navigation::default()),
            Entity::FieldOfScience(Category::default()),
            Entity::PublicationType(Category::default()),
        ]
    }

    #[test]
    fn test_cells_match_columns() {
        for entity in samples() {
            let kind = entity.kind();
            assert_eq!(
                entity.record().cells().len(),
                kind.columns().len(),
                "{kind:?} cells/columns mismatch"
            );
        }
    }

    #[test]
    fn test_form_values_name_real_fields() {
        for entity in samples() {
            let spec = form_spec(entity.kind());
            for (name, _) in entity.record().form_values() {
                assert!(
                    spec.iter().any(|f| f.name == name),
                    "{:?} prefill names unknown field {name}",
                    entity.kind()
                );
            }
        }
    }

    #[test]
    fn test_article_prefill_author_rows() {
        let article = Article {
            authors: vec![ArticleAuthor::Detailed(ArticleAuthorDetail {
                first_name: "Ali".into(),
                last_name: "Valiyev".into(),
                orcid: "0000-0001".into(),
                ..Default::default()
            })],
            ..Default::default()
        };
        let rows = article
            .form_values()
            .into_iter()
            .find(|(name, _)| *name == "authors")
            .map(|(_, v)| v);
        assert_eq!(
            rows,
            Some(FormValue::Rows(vec![vec![
                "Ali".into(),
                "".into(),
                "Valiyev".into(),
                "".into(),
                "".into(),
                "0000-0001".into()
            ]]))
        );
    }

    #[test]
    fn test_navigation_cells_preview_items() {
        let nav = Navigation {
            id: 2,
            name: "Main".into(),
            item_count: 2,
            items: vec![
                NavigationItem { id: 1, text: "About".into() },
                NavigationItem { id: 2, text: "Contact".into() },
            ],
        };
        assert_eq!(nav.cells()[3], "About, Contact");
        assert_eq!(EntityKind::Navigation.columns().len(), 4);
    }
}
