//! Requests the controller asks for and the replies that come back
//!
//! The controller never awaits. It returns `Command`s, a worker runs each
//! one against the [`AdminClient`], and the outcome comes back as a
//! `Reply` carrying enough context to be applied on its own.

use super::confirm::DeleteTarget;
use super::form::FormMode;
use super::list::{ListPage, ListQuery};
use crate::api::{AdminClient, ApiError, FormPayload};
use crate::domain::forms::Lookup;
use crate::domain::models::{Author, SeoSettings, SeoStats, SeoStatus};
use crate::domain::{Choice, Entity, EntityKind, ExportKind, Route};
use std::path::PathBuf;

/// Why a single record is being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    View,
    Edit,
}

#[derive(Debug, Clone)]
pub enum Command {
    LoadList {
        kind: EntityKind,
        ticket: u64,
        query: ListQuery,
        journal: Option<u64>,
    },
    Fetch {
        kind: EntityKind,
        id: u64,
        purpose: Purpose,
        journal: Option<u64>,
    },
    Save {
        kind: EntityKind,
        mode: FormMode,
        /// Serial of the form submission this save belongs to
        submission: u64,
        payload: FormPayload,
        journal: Option<u64>,
    },
    Delete {
        target: DeleteTarget,
        journal: Option<u64>,
    },
    ToggleFeatured {
        id: u64,
    },
    Lookup {
        lookup: Lookup,
        journal: Option<u64>,
    },
    LoadSeo,
    SaveSeo {
        submission: u64,
        payload: FormPayload,
    },
    SeoStatus,
    UpdateSitemap,
    UpdateRobots,
    Export {
        kind: ExportKind,
        journal: Option<u64>,
        dir: PathBuf,
    },
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadList { .. } => "load_list",
            Command::Fetch { .. } => "fetch",
            Command::Save { .. } => "save",
            Command::Delete { .. } => "delete",
            Command::ToggleFeatured { .. } => "toggle_featured",
            Command::Lookup { .. } => "lookup",
            Command::LoadSeo => "load_seo",
            Command::SaveSeo { .. } => "save_seo",
            Command::SeoStatus => "seo_status",
            Command::UpdateSitemap => "update_sitemap",
            Command::UpdateRobots => "update_robots",
            Command::Export { .. } => "export",
        }
    }
}

/// Lookup results feed selects or author-row prefill
#[derive(Debug, Clone, PartialEq)]
pub enum LookupData {
    Choices(Vec<Choice>),
    Authors(Vec<Author>),
}

#[derive(Debug)]
pub enum Reply {
    List {
        kind: EntityKind,
        ticket: u64,
        result: Result<ListPage, ApiError>,
    },
    Fetched {
        kind: EntityKind,
        id: u64,
        purpose: Purpose,
        result: Result<Entity, ApiError>,
    },
    Saved {
        kind: EntityKind,
        mode: FormMode,
        submission: u64,
        result: Result<String, ApiError>,
    },
    Deleted {
        target: DeleteTarget,
        result: Result<(), ApiError>,
    },
    FeaturedToggled {
        id: u64,
        result: Result<bool, ApiError>,
    },
    Lookup {
        lookup: Lookup,
        /// Journal the lookup was scoped to when it was sent
        journal: Option<u64>,
        result: Result<LookupData, ApiError>,
    },
    Seo(Result<SeoSettings, ApiError>),
    SeoSaved {
        submission: u64,
        result: Result<String, ApiError>,
    },
    SeoStatus(Result<SeoStatus, ApiError>),
    Sitemap(Result<(String, SeoStats), ApiError>),
    Robots(Result<(String, String), ApiError>),
    Exported {
        kind: ExportKind,
        result: Result<PathBuf, ApiError>,
    },
}

/// Run one command to completion
pub async fn execute(client: &AdminClient, command: Command) -> Reply {
    tracing::debug!(command = command.name(), "executing");
    match command {
        Command::LoadList {
            kind,
            ticket,
            query,
            journal,
        } => Reply::List {
            kind,
            ticket,
            result: client.list(kind, &query, journal).await,
        },
        Command::Fetch {
            kind,
            id,
            purpose,
            journal,
        } => {
            let route = match purpose {
                Purpose::View => Route::View(id),
                Purpose::Edit => Route::Edit(id),
            };
            Reply::Fetched {
                kind,
                id,
                purpose,
                result: client.fetch(kind, route, journal).await,
            }
        }
        Command::Save {
            kind,
            mode,
            submission,
            payload,
            journal,
        } => Reply::Saved {
            kind,
            mode,
            submission,
            result: client.save(kind, mode.id(), payload, journal).await,
        },
        Command::Delete { target, journal } => {
            let result = client.delete(target.kind, target.id, journal).await;
            Reply::Deleted { target, result }
        }
        Command::ToggleFeatured { id } => Reply::FeaturedToggled {
            id,
            result: client.toggle_featured(id).await,
        },
        Command::Lookup { lookup, journal } => {
            let result = match lookup {
                Lookup::EditorTypes => client.editor_types().await.map(LookupData::Choices),
                Lookup::PolicyTypes => client.policy_types().await.map(LookupData::Choices),
                Lookup::Issues => client.issue_choices(journal).await.map(LookupData::Choices),
                Lookup::Journals => client.journal_choices().await.map(LookupData::Choices),
                Lookup::Authors => client.authors_for_select().await.map(LookupData::Authors),
            };
            Reply::Lookup {
                lookup,
                journal,
                result,
            }
        }
        Command::LoadSeo => Reply::Seo(client.seo_settings().await),
        Command::SaveSeo {
            submission,
            payload,
        } => Reply::SeoSaved {
            submission,
            result: client.save_seo(payload).await,
        },
        Command::SeoStatus => Reply::SeoStatus(client.seo_status().await),
        Command::UpdateSitemap => Reply::Sitemap(client.update_sitemap().await),
        Command::UpdateRobots => Reply::Robots(client.update_robots().await),
        Command::Export { kind, journal, dir } => Reply::Exported {
            kind,
            result: client.export(kind, journal, &dir).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> AdminClient {
        let config = Config {
            base_url: format!("{}/", server.uri()),
            session_cookie: Some("csrftoken=t".into()),
            ..Config::default()
        };
        AdminClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_list_reply_carries_ticket() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/fan-tarmoq/list/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "fan_tarmoqs": [{"id": 1, "name": "Physics", "is_active": true}]
            })))
            .mount(&server)
            .await;

        let reply = execute(
            &client(&server).await,
            Command::LoadList {
                kind: EntityKind::FieldOfScience,
                ticket: 7,
                query: ListQuery::default(),
                journal: None,
            },
        )
        .await;

        match reply {
            Reply::List {
                kind,
                ticket,
                result: Ok(page),
            } => {
                assert_eq!(kind, EntityKind::FieldOfScience);
                assert_eq!(ticket, 7);
                assert_eq!(page.records.len(), 1);
            }
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_editor_type_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/admin/editor-types/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "editor_types": [{"value": "chief", "label": "Editor-in-chief"}]
            })))
            .mount(&server)
            .await;

        let reply = execute(
            &client(&server).await,
            Command::Lookup {
                lookup: Lookup::EditorTypes,
                journal: None,
            },
        )
        .await;

        match reply {
            Reply::Lookup {
                lookup: Lookup::EditorTypes,
                journal: None,
                result: Ok(LookupData::Choices(choices)),
            } => assert_eq!(choices, vec![Choice::new("chief", "Editor-in-chief")]),
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_reply_keeps_target() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/navigation/delete/4/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "message": "ok"})),
            )
            .mount(&server)
            .await;

        let target = DeleteTarget {
            kind: EntityKind::Navigation,
            id: 4,
            label: "Footer".into(),
        };
        let reply = execute(
            &client(&server).await,
            Command::Delete {
                target: target.clone(),
                journal: None,
            },
        )
        .await;

        assert!(matches!(reply, Reply::Deleted { target: t, result: Ok(()) } if t == target));
    }
}
