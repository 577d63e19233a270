//! HTTP client for the admin backend
//!
//! Every endpoint answers with a JSON envelope:
//!
//! ```text
//! { "success": true,  "<key>": ..., "pagination": {...} }
//! { "success": false, "error": "message" }
//! ```
//!
//! `AdminClient` unwraps the envelope into typed values or an [`ApiError`].
//! State-changing requests are multipart POSTs carrying the CSRF token
//! from the session's `csrftoken` cookie.

pub mod csrf;
pub mod form;

#[cfg(test)]
mod tests;

pub use form::{Attachment, FormPayload};

use crate::config::Config;
use crate::crud::list::{ListPage, ListQuery};
use crate::crud::pagination::Pagination;
use crate::domain::models::{Author, Journal, SeoSettings, SeoStats, SeoStatus};
use crate::domain::{Choice, Entity, EntityKind, ExportKind, Route};
use chrono::Local;
use futures::StreamExt;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Fallback when a failure envelope carries no message
const UNKNOWN_ERROR: &str = "Unknown error";

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network failure or a request that could not be built
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response without a usable error envelope
    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// `success: false` from the backend
    #[error("{0}")]
    Application(String),

    /// Response was JSON but not the expected shape
    #[error("unexpected response: {0}")]
    Decode(String),

    /// Journal-scoped endpoint addressed without an active journal
    #[error("no journal selected")]
    MissingJournal,

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid base URL: {0}")]
    BaseUrl(#[from] url::ParseError),
}

impl ApiError {
    /// Text for a toast or a CLI error line
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(e) if e.is_timeout() => "Request timed out".to_string(),
            ApiError::Transport(e) if e.is_connect() => {
                "Could not reach the server".to_string()
            }
            ApiError::Transport(e) => format!("Network error: {e}"),
            ApiError::Status(code) => format!("Server error (HTTP {code})"),
            ApiError::Application(msg) => msg.clone(),
            ApiError::Decode(msg) => format!("Unexpected server response ({msg})"),
            ApiError::MissingJournal => "Select a journal first".to_string(),
            ApiError::Io(e) => format!("File error: {e}"),
            ApiError::BaseUrl(e) => format!("Invalid base URL: {e}"),
        }
    }
}

/// Unwrap a response envelope: the body on success, the backend's message
/// otherwise.
pub fn unwrap_envelope(value: Value) -> Result<Map<String, Value>, ApiError> {
    let Value::Object(mut map) = value else {
        return Err(ApiError::Decode("expected a JSON object".to_string()));
    };

    if map.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(map);
    }

    let message = ["error", "message"]
        .iter()
        .find_map(|key| match map.remove(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
    Err(ApiError::Application(message))
}

/// Take `key` out of an envelope and decode it
fn take<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Result<T, ApiError> {
    let value = map
        .remove(key)
        .ok_or_else(|| ApiError::Decode(format!("missing `{key}`")))?;
    serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("{key}: {e}")))
}

fn message_of(map: &Map<String, Value>) -> String {
    map.get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Client
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    base: Url,
    jar: Arc<Jar>,
    /// Token from the configured cookie, used when the jar has none
    configured_token: Option<String>,
}

impl AdminClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base = Url::parse(&config.base_url)?;

        let jar = Arc::new(Jar::default());
        if let Some(cookie) = &config.session_cookie {
            for pair in csrf::cookie_pairs(cookie) {
                jar.add_cookie_str(pair, &base);
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
        // The backend's CSRF check compares the referer on HTTPS
        if let Ok(referer) = HeaderValue::from_str(base.as_str()) {
            headers.insert(REFERER, referer);
        }

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_provider(jar.clone())
            .user_agent(concat!("journal-admin/", env!("CARGO_PKG_VERSION")));
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }

        Ok(Self {
            http: builder.build()?,
            base,
            jar,
            configured_token: config
                .session_cookie
                .as_deref()
                .and_then(csrf::token_from_cookie_header),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }

    /// Current CSRF token: the live cookie if the server rotated it,
    /// otherwise the configured one
    pub fn csrf_token(&self) -> Option<String> {
        self.jar
            .cookies(&self.base)
            .and_then(|h| h.to_str().ok().and_then(csrf::token_from_cookie_header))
            .or_else(|| self.configured_token.clone())
    }

    async fn read_envelope(
        &self,
        response: reqwest::Response,
        path: &str,
    ) -> Result<Map<String, Value>, ApiError> {
        let status = response.status();
        let body = response.bytes().await?;

        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => {
                let result = unwrap_envelope(value);
                if let Err(ApiError::Application(msg)) = &result {
                    tracing::warn!(endpoint = path, status = status.as_u16(), "{}", msg);
                }
                result
            }
            Err(_) if !status.is_success() => {
                tracing::error!(endpoint = path, status = status.as_u16(), "request failed");
                Err(ApiError::Status(status.as_u16()))
            }
            Err(e) => {
                tracing::error!(endpoint = path, "response is not JSON: {}", e);
                Err(ApiError::Decode("response is not JSON".to_string()))
            }
        }
    }

    /// GET an endpoint and unwrap its envelope
    pub async fn get_json(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<Map<String, Value>, ApiError> {
        let url = self.url(path)?;
        tracing::debug!(endpoint = path, "GET");
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .inspect_err(|e| tracing::error!(endpoint = path, "GET failed: {}", e))?;
        self.read_envelope(response, path).await
    }

    /// POST a multipart form with the CSRF header and unwrap the envelope
    pub async fn post_form(
        &self,
        path: &str,
        payload: FormPayload,
    ) -> Result<Map<String, Value>, ApiError> {
        let url = self.url(path)?;
        let mut request = self.http.post(url);
        match self.csrf_token() {
            Some(token) => request = request.header(csrf::CSRF_HEADER, token),
            None => tracing::warn!(endpoint = path, "no csrftoken cookie; POST will be rejected"),
        }
        if !payload.is_empty() {
            request = request.multipart(payload.into_multipart()?);
        }

        tracing::debug!(endpoint = path, "POST");
        let response = request
            .send()
            .await
            .inspect_err(|e| tracing::error!(endpoint = path, "POST failed: {}", e))?;
        self.read_envelope(response, path).await
    }

    // ─── Entity operations ───────────────────────────────────────────────

    /// Fetch one page of an entity list
    pub async fn list(
        &self,
        kind: EntityKind,
        query: &ListQuery,
        journal: Option<u64>,
    ) -> Result<ListPage, ApiError> {
        let path = kind.route(Route::List, journal)?;
        let mut body = self.get_json(&path, &query.params(kind)).await?;

        let raw: Vec<Value> = take(&mut body, kind.list_key())?;
        let records = raw
            .into_iter()
            .map(|value| Entity::decode(kind, value))
            .collect::<Result<Vec<_>, _>>()?;
        let pagination = match body.remove("pagination") {
            Some(value) => Some(
                serde_json::from_value::<Pagination>(value)
                    .map_err(|e| ApiError::Decode(format!("pagination: {e}")))?,
            ),
            None => None,
        };

        Ok(ListPage {
            records,
            pagination,
        })
    }

    /// Fetch one record for viewing or to prefill the edit form
    pub async fn fetch(
        &self,
        kind: EntityKind,
        route: Route,
        journal: Option<u64>,
    ) -> Result<Entity, ApiError> {
        let path = kind.route(route, journal)?;
        let mut body = self.get_json(&path, &[]).await?;
        let value: Value = take(&mut body, kind.record_key())?;
        Entity::decode(kind, value)
    }

    /// Create (`id = None`) or update a record; returns the server message
    pub async fn save(
        &self,
        kind: EntityKind,
        id: Option<u64>,
        payload: FormPayload,
        journal: Option<u64>,
    ) -> Result<String, ApiError> {
        let route = match id {
            Some(id) => Route::Update(id),
            None => Route::Create,
        };
        let path = kind.route(route, journal)?;
        let body = self.post_form(&path, payload).await?;
        Ok(message_of(&body))
    }

    pub async fn delete(
        &self,
        kind: EntityKind,
        id: u64,
        journal: Option<u64>,
    ) -> Result<(), ApiError> {
        let path = kind.route(Route::Delete(id), journal)?;
        self.post_form(&path, FormPayload::new()).await?;
        Ok(())
    }

    /// Flip an article's featured flag; returns the new state
    pub async fn toggle_featured(&self, article_id: u64) -> Result<bool, ApiError> {
        let path = format!("admin/articles/toggle-featured/{article_id}/");
        let mut body = self.post_form(&path, FormPayload::new()).await?;
        take(&mut body, "featured")
    }

    // ─── Lookups ─────────────────────────────────────────────────────────

    pub async fn editor_types(&self) -> Result<Vec<Choice>, ApiError> {
        let mut body = self.get_json("admin/editor-types/", &[]).await?;
        take(&mut body, "editor_types")
    }

    pub async fn policy_types(&self) -> Result<Vec<Choice>, ApiError> {
        let mut body = self.get_json("admin/policy-types/", &[]).await?;
        take(&mut body, "policy_types")
    }

    /// Issues of a journal as select options ("Vol.1 No.2 (2024)")
    pub async fn issue_choices(&self, journal: Option<u64>) -> Result<Vec<Choice>, ApiError> {
        let mut choices = Vec::new();
        let mut query = ListQuery::default();
        loop {
            let page = self.list(EntityKind::Issue, &query, journal).await?;
            choices.extend(page.records.iter().filter_map(|e| match e {
                Entity::Issue(issue) => Some(Choice::new(issue.id.to_string(), issue.citation())),
                _ => None,
            }));
            match page.pagination {
                Some(p) if p.has_next => query.page = p.current + 1,
                _ => break,
            }
        }
        Ok(choices)
    }

    pub async fn journal_choices(&self) -> Result<Vec<Choice>, ApiError> {
        let mut body = self.get_json("admin/journals/list/", &[]).await?;
        let journals: Vec<Journal> = take(&mut body, "journals")?;
        Ok(journals
            .into_iter()
            .map(|j| Choice::new(j.id.to_string(), j.title))
            .collect())
    }

    /// First page of authors, used to prefill article author rows
    pub async fn authors_for_select(&self) -> Result<Vec<Author>, ApiError> {
        let mut body = self
            .get_json("admin/authors/list/", &[("page", "1".to_string())])
            .await?;
        take(&mut body, "authors")
    }

    // ─── SEO ─────────────────────────────────────────────────────────────

    pub async fn seo_settings(&self) -> Result<SeoSettings, ApiError> {
        let mut body = self.get_json("admin/seo/", &[]).await?;
        take(&mut body, "seo")
    }

    pub async fn save_seo(&self, payload: FormPayload) -> Result<String, ApiError> {
        let body = self.post_form("admin/seo/save/", payload).await?;
        Ok(message_of(&body))
    }

    pub async fn seo_status(&self) -> Result<SeoStatus, ApiError> {
        let body = self.get_json("admin/seo/status/", &[]).await?;
        serde_json::from_value(Value::Object(body))
            .map_err(|e| ApiError::Decode(format!("seo status: {e}")))
    }

    pub async fn update_sitemap(&self) -> Result<(String, SeoStats), ApiError> {
        let mut body = self
            .post_form("admin/seo/update-sitemap/", FormPayload::new())
            .await?;
        let stats = take(&mut body, "stats").unwrap_or_default();
        Ok((message_of(&body), stats))
    }

    pub async fn update_robots(&self) -> Result<(String, String), ApiError> {
        let mut body = self
            .post_form("admin/seo/update-robots/", FormPayload::new())
            .await?;
        let preview = take(&mut body, "content_preview").unwrap_or_default();
        Ok((message_of(&body), preview))
    }

    // ─── Export ──────────────────────────────────────────────────────────

    /// Stream a CSV export into `dir`; returns the written path
    pub async fn export(
        &self,
        kind: ExportKind,
        journal: Option<u64>,
        dir: &Path,
    ) -> Result<PathBuf, ApiError> {
        let path = kind.path(journal)?;
        let response = self.http.get(self.url(&path)?).send().await?;
        if !response.status().is_success() {
            tracing::error!(endpoint = %path, status = response.status().as_u16(), "export failed");
            return Err(ApiError::Status(response.status().as_u16()));
        }

        tokio::fs::create_dir_all(dir).await?;
        let file_name = format!(
            "{}_{}.csv",
            kind.name(),
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let target = dir.join(file_name);
        let written = write_export(response.bytes_stream(), &target).await?;

        tracing::info!(path = %target.display(), bytes = written, "export written");
        Ok(target)
    }
}

/// Stream an export body into `target`. The bytes go to a `.part` file that
/// is renamed into place once the stream ends and removed if it fails.
async fn write_export<S, E>(stream: S, target: &Path) -> Result<usize, ApiError>
where
    S: futures::Stream<Item = Result<bytes::Bytes, E>>,
    ApiError: From<E>,
{
    let partial = target.with_extension("csv.part");
    match write_chunks(stream, &partial).await {
        Ok(written) => {
            tokio::fs::rename(&partial, target).await?;
            Ok(written)
        }
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                tracing::warn!(path = %partial.display(), error = %cleanup, "could not remove partial export");
            }
            Err(e)
        }
    }
}

async fn write_chunks<S, E>(stream: S, path: &Path) -> Result<usize, ApiError>
where
    S: futures::Stream<Item = Result<bytes::Bytes, E>>,
    ApiError: From<E>,
{
    let mut stream = std::pin::pin!(stream);
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0usize;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        written += chunk.len();
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(written)
}
