//! Typed shapes of the records the backend returns
//!
//! The backend is loose about optional values: the same field may be
//! missing, `null` or `""`. Every field therefore defaults, and the string
//! fields that are known to come back as `null` go through [`nullable`].

use super::EntityKind;
use crate::api::ApiError;
use serde::{Deserialize, Deserializer};

/// Deserialize `null` as the type's default
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Journal {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub url_slug: String,
    #[serde(deserialize_with = "nullable")]
    pub initials: String,
    #[serde(deserialize_with = "nullable")]
    pub abbreviation: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub meta_description: String,
    #[serde(deserialize_with = "nullable")]
    pub contact_email: String,
    #[serde(deserialize_with = "nullable")]
    pub website: String,
    #[serde(deserialize_with = "nullable")]
    pub publisher: String,
    #[serde(deserialize_with = "nullable")]
    pub issn_print: String,
    #[serde(deserialize_with = "nullable")]
    pub issn_online: String,
    pub is_active: bool,
    pub is_open_access: bool,
    pub article_count: u64,
    pub issue_count: u64,
    #[serde(deserialize_with = "nullable")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RecentArticle {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub journal: String,
    #[serde(deserialize_with = "nullable")]
    pub date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Author {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub full_name: String,
    #[serde(deserialize_with = "nullable")]
    pub first_name: String,
    #[serde(deserialize_with = "nullable")]
    pub middle_name: String,
    #[serde(deserialize_with = "nullable")]
    pub last_name: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(deserialize_with = "nullable")]
    pub affiliation: String,
    #[serde(deserialize_with = "nullable")]
    pub department: String,
    #[serde(deserialize_with = "nullable")]
    pub position: String,
    #[serde(deserialize_with = "nullable")]
    pub academic_title: String,
    #[serde(deserialize_with = "nullable")]
    pub academic_degree: String,
    #[serde(deserialize_with = "nullable")]
    pub orcid: String,
    #[serde(deserialize_with = "nullable")]
    pub google_scholar_id: String,
    #[serde(deserialize_with = "nullable")]
    pub website: String,
    #[serde(deserialize_with = "nullable")]
    pub bio: String,
    pub is_active: bool,
    pub article_count: u64,
    pub recent_articles: Vec<RecentArticle>,
}

impl Author {
    /// Backend-provided full name, or one assembled from the parts
    pub fn display_name(&self) -> String {
        if !self.full_name.is_empty() {
            return self.full_name.clone();
        }
        [&self.last_name, &self.first_name, &self.middle_name]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Issue {
    pub id: u64,
    pub journal_id: Option<u64>,
    pub volume: u32,
    pub number: u32,
    pub year: u32,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub date_published: String,
    pub is_published: bool,
    pub article_count: u64,
    pub has_cover: bool,
}

impl Issue {
    /// "Vol.3 No.2 (2024)"
    pub fn citation(&self) -> String {
        format!("Vol.{} No.{} ({})", self.volume, self.number, self.year)
    }
}

/// An author attached to an article.
///
/// List responses carry plain display names, detail responses carry the
/// full author record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArticleAuthor {
    Name(String),
    Detailed(ArticleAuthorDetail),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArticleAuthorDetail {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub first_name: String,
    #[serde(deserialize_with = "nullable")]
    pub middle_name: String,
    #[serde(deserialize_with = "nullable")]
    pub last_name: String,
    #[serde(deserialize_with = "nullable")]
    pub email: String,
    #[serde(deserialize_with = "nullable")]
    pub affiliation: String,
    #[serde(deserialize_with = "nullable")]
    pub orcid: String,
    pub order: u32,
    pub is_corresponding: bool,
}

impl ArticleAuthor {
    pub fn display_name(&self) -> String {
        match self {
            ArticleAuthor::Name(name) => name.clone(),
            ArticleAuthor::Detailed(a) => format!("{} {}", a.first_name, a.last_name)
                .trim()
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Article {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub subtitle: String,
    #[serde(rename = "abstract", deserialize_with = "nullable")]
    pub abstract_text: String,
    #[serde(deserialize_with = "nullable")]
    pub keywords: String,
    #[serde(deserialize_with = "nullable")]
    pub language: String,
    #[serde(deserialize_with = "nullable")]
    pub doi: String,
    #[serde(deserialize_with = "nullable")]
    pub date_published: String,
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
    pub featured: bool,
    pub open_access: bool,
    pub is_published: bool,
    #[serde(deserialize_with = "nullable")]
    pub meta_description: String,
    #[serde(deserialize_with = "nullable")]
    pub references: String,
    pub journal_id: Option<u64>,
    pub issue_id: Option<u64>,
    #[serde(deserialize_with = "nullable")]
    pub issue_info: String,
    pub views: u64,
    pub authors: Vec<ArticleAuthor>,
    pub has_pdf: bool,
}

impl Article {
    pub fn author_names(&self) -> String {
        self.authors
            .iter()
            .map(ArticleAuthor::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Editor {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub full_name: String,
    #[serde(deserialize_with = "nullable")]
    pub first_name: String,
    #[serde(deserialize_with = "nullable")]
    pub middle_name: String,
    #[serde(deserialize_with = "nullable")]
    pub last_name: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub affiliation: String,
    #[serde(deserialize_with = "nullable")]
    pub position: String,
    #[serde(deserialize_with = "nullable")]
    pub editor_type: String,
    #[serde(deserialize_with = "nullable")]
    pub editor_type_display: String,
    pub order: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub policy_type: String,
    #[serde(deserialize_with = "nullable")]
    pub policy_type_display: String,
    #[serde(deserialize_with = "nullable")]
    pub title: String,
    #[serde(deserialize_with = "nullable")]
    pub content: String,
    #[serde(deserialize_with = "nullable")]
    pub short_description: String,
    #[serde(deserialize_with = "nullable")]
    pub requirements: String,
    #[serde(deserialize_with = "nullable")]
    pub examples: String,
    pub is_active: bool,
    pub is_public: bool,
    pub order: i64,
    #[serde(deserialize_with = "nullable")]
    pub language: String,
    #[serde(deserialize_with = "nullable")]
    pub meta_description: String,
    #[serde(deserialize_with = "nullable")]
    pub keywords: String,
    #[serde(deserialize_with = "nullable")]
    pub version: String,
    #[serde(deserialize_with = "nullable")]
    pub effective_date: String,
    #[serde(deserialize_with = "nullable")]
    pub last_updated: String,
    pub word_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NavigationItem {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Navigation {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub item_count: u64,
    pub items: Vec<NavigationItem>,
}

/// Shape shared by fields of science and publication types
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: u64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    pub is_active: bool,
}

/// A `{value, label}` option from a lookup endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SEO
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeoSettings {
    #[serde(deserialize_with = "nullable")]
    pub meta_title: String,
    #[serde(deserialize_with = "nullable")]
    pub meta_description: String,
    #[serde(deserialize_with = "nullable")]
    pub meta_keywords: String,
    #[serde(deserialize_with = "nullable")]
    pub publisher_name: String,
    pub enable_google_scholar: bool,
    pub auto_sitemap: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeoStats {
    pub articles: u64,
    pub journals: u64,
    pub authors: u64,
    pub issues: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeoUrls {
    #[serde(deserialize_with = "nullable")]
    pub sitemap: String,
    #[serde(deserialize_with = "nullable")]
    pub robots: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SeoStatus {
    pub seo_enabled: bool,
    pub auto_sitemap: bool,
    pub stats: SeoStats,
    pub urls: SeoUrls,
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity (typed row of any section)
// ─────────────────────────────────────────────────────────────────────────────

/// One record of any managed entity type
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Journal(Journal),
    Author(Author),
    Issue(Issue),
    Article(Article),
    Editor(Editor),
    Policy(Policy),
    Navigation(Navigation),
    FieldOfScience(Category),
    PublicationType(Category),
}

impl Entity {
    /// Decode one record of `kind` from its JSON object
    pub fn decode(kind: EntityKind, value: serde_json::Value) -> Result<Self, ApiError> {
        fn de<T: serde::de::DeserializeOwned>(
            kind: EntityKind,
            value: serde_json::Value,
        ) -> Result<T, ApiError> {
            serde_json::from_value(value)
                .map_err(|e| ApiError::Decode(format!("{}: {}", kind.record_key(), e)))
        }

        Ok(match kind {
            EntityKind::Journal => Entity::Journal(de(kind, value)?),
            EntityKind::Author => Entity::Author(de(kind, value)?),
            EntityKind::Issue => Entity::Issue(de(kind, value)?),
            EntityKind::Article => Entity::Article(de(kind, value)?),
            EntityKind::Editor => Entity::Editor(de(kind, value)?),
            EntityKind::Policy => Entity::Policy(de(kind, value)?),
            EntityKind::Navigation => Entity::Navigation(de(kind, value)?),
            EntityKind::FieldOfScience => Entity::FieldOfScience(de(kind, value)?),
            EntityKind::PublicationType => Entity::PublicationType(de(kind, value)?),
        })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Journal(_) => EntityKind::Journal,
            Entity::Author(_) => EntityKind::Author,
            Entity::Issue(_) => EntityKind::Issue,
            Entity::Article(_) => EntityKind::Article,
            Entity::Editor(_) => EntityKind::Editor,
            Entity::Policy(_) => EntityKind::Policy,
            Entity::Navigation(_) => EntityKind::Navigation,
            Entity::FieldOfScience(_) => EntityKind::FieldOfScience,
            Entity::PublicationType(_) => EntityKind::PublicationType,
        }
    }

    /// Borrow as the record trait for display and form prefill
    pub fn record(&self) -> &dyn super::Record {
        match self {
            Entity::Journal(r) => r,
            Entity::Author(r) => r,
            Entity::Issue(r) => r,
            Entity::Article(r) => r,
            Entity::Editor(r) => r,
            Entity::Policy(r) => r,
            Entity::Navigation(r) => r,
            Entity::FieldOfScience(r) | Entity::PublicationType(r) => r,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_null_strings_become_empty() {
        let issue: Issue = serde_json::from_value(json!({
            "id": 3, "volume": 1, "number": 2, "year": 2024,
            "title": null, "description": null
        }))
        .unwrap();
        assert_eq!(issue.title, "");
        assert_eq!(issue.citation(), "Vol.1 No.2 (2024)");
    }

    #[test]
    fn test_article_authors_from_list_and_detail() {
        let listed: Article = serde_json::from_value(json!({
            "id": 1, "title": "T", "authors": ["Ali Valiyev", "Olga Petrova"]
        }))
        .unwrap();
        assert_eq!(listed.author_names(), "Ali Valiyev, Olga Petrova");

        let detailed: Article = serde_json::from_value(json!({
            "id": 1, "title": "T", "abstract": "<p>A</p>",
            "authors": [{"id": 5, "first_name": "Ali", "last_name": "Valiyev", "orcid": null}]
        }))
        .unwrap();
        assert_eq!(detailed.abstract_text, "<p>A</p>");
        assert_eq!(detailed.author_names(), "Ali Valiyev");
    }

    #[test]
    fn test_entity_decode_reports_key() {
        let err = Entity::decode(EntityKind::Journal, json!({"id": "not a number"})).unwrap_err();
        match err {
            ApiError::Decode(msg) => assert!(msg.starts_with("journal:")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_author_display_name_fallback() {
        let author = Author {
            first_name: "Ali".into(),
            last_name: "Valiyev".into(),
            ..Default::default()
        };
        assert_eq!(author.display_name(), "Valiyev Ali");
    }
}
