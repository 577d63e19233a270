use super::*;
use crate::crud::list::StatusFilter;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, cookie: Option<&str>) -> AdminClient {
    let config = Config {
        base_url: format!("{}/", server.uri()),
        session_cookie: cookie.map(str::to_string),
        ..Config::default()
    };
    AdminClient::new(&config).unwrap()
}

fn ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

#[test]
fn test_envelope_failure_uses_error_then_message() {
    let err = unwrap_envelope(json!({"success": false, "error": "Slug taken"})).unwrap_err();
    assert_eq!(err.user_message(), "Slug taken");

    let err = unwrap_envelope(json!({"success": false, "message": "Nope"})).unwrap_err();
    assert_eq!(err.user_message(), "Nope");

    let err = unwrap_envelope(json!({"success": false})).unwrap_err();
    assert_eq!(err.user_message(), "Unknown error");
}

#[test]
fn test_envelope_without_success_flag_is_failure() {
    assert!(unwrap_envelope(json!({"authors": []})).is_err());
    assert!(matches!(
        unwrap_envelope(json!([1, 2])),
        Err(ApiError::Decode(_))
    ));
}

#[test]
fn test_csrf_token_from_configured_cookie() {
    let config = Config {
        session_cookie: Some("sessionid=s1; csrftoken=tok123".into()),
        ..Config::default()
    };
    let client = AdminClient::new(&config).unwrap();
    assert_eq!(client.csrf_token(), Some("tok123".to_string()));
}

#[tokio::test]
async fn test_post_sends_csrf_and_ajax_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/authors/add/"))
        .and(header("X-CSRFToken", "tok123"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ok(json!({"success": true, "message": "Author created"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("sessionid=s1; csrftoken=tok123"));
    let mut payload = FormPayload::new();
    payload.text("first_name", "Ali").text("last_name", "Valiyev");

    let message = client
        .save(EntityKind::Author, None, payload, None)
        .await
        .unwrap();
    assert_eq!(message, "Author created");
}

#[tokio::test]
async fn test_list_sends_query_and_decodes_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/journals/4/articles/"))
        .and(query_param("page", "2"))
        .and(query_param("search", "climate"))
        .and(query_param("status", "published"))
        .respond_with(ok(json!({
            "success": true,
            "articles": [
                {"id": 11, "title": "On rivers", "authors": ["A. B"], "featured": true}
            ],
            "pagination": {
                "current": 2, "total_pages": 3,
                "has_previous": true, "has_next": true, "total_count": 45
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let query = ListQuery {
        page: 2,
        search: "climate".into(),
        status: Some(StatusFilter::Published),
        ..ListQuery::default()
    };
    let page = client
        .list(EntityKind::Article, &query, Some(4))
        .await
        .unwrap();

    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].record().id(), 11);
    let pagination = page.pagination.unwrap();
    assert_eq!(pagination.current, 2);
    assert_eq!(pagination.total_count, Some(45));
}

#[tokio::test]
async fn test_unpaginated_list_has_no_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/navigation/list/"))
        .respond_with(ok(json!({
            "success": true,
            "navigations": [{"id": 1, "name": "Main", "item_count": 0, "items": []}]
        })))
        .mount(&server)
        .await;

    let page = client_for(&server, None)
        .list(EntityKind::Navigation, &ListQuery::default(), None)
        .await
        .unwrap();
    assert_eq!(page.records.len(), 1);
    assert!(page.pagination.is_none());
}

#[tokio::test]
async fn test_application_error_surfaces_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/journals/delete/3/"))
        .respond_with(ok(json!({"success": false, "error": "Journal has issues"})))
        .mount(&server)
        .await;

    let err = client_for(&server, Some("csrftoken=t"))
        .delete(EntityKind::Journal, 3, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Application(ref m) if m == "Journal has issues"));
}

#[tokio::test]
async fn test_error_envelope_on_4xx_is_still_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/articles/update/9/"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({"success": false, "error": "Article not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .fetch(EntityKind::Article, Route::Edit(9), Some(1))
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Article not found");
}

#[tokio::test]
async fn test_non_json_failure_is_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/authors/list/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Server Error</h1>"))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .list(EntityKind::Author, &ListQuery::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Status(500)));
}

#[tokio::test]
async fn test_missing_record_key_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/authors/details/5/"))
        .respond_with(ok(json!({"success": true})))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .fetch(EntityKind::Author, Route::View(5), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Decode(ref m) if m.contains("author")));
}

#[tokio::test]
async fn test_journal_scoped_without_journal_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ok(json!({"success": true})))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .list(EntityKind::Issue, &ListQuery::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MissingJournal));
}

#[tokio::test]
async fn test_multipart_carries_repeated_author_keys() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/journals/2/articles/add/"))
        .and(body_string_contains("author_first_name[]"))
        .and(body_string_contains("Valiyev"))
        .respond_with(ok(json!({"success": true, "message": "Article created"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut payload = FormPayload::new();
    payload
        .text("title", "On rivers")
        .text("author_first_name[]", "Ali")
        .text("author_last_name[]", "Valiyev");

    client_for(&server, Some("csrftoken=t"))
        .save(EntityKind::Article, None, payload, Some(2))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_toggle_featured_returns_new_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/articles/toggle-featured/8/"))
        .respond_with(ok(json!({"success": true, "featured": true})))
        .mount(&server)
        .await;

    let featured = client_for(&server, Some("csrftoken=t"))
        .toggle_featured(8)
        .await
        .unwrap();
    assert!(featured);
}

#[tokio::test]
async fn test_issue_choices_follow_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/journals/1/issues/"))
        .and(query_param("page", "1"))
        .respond_with(ok(json!({
            "success": true,
            "issues": [{"id": 1, "volume": 1, "number": 1, "year": 2023}],
            "pagination": {"current": 1, "total_pages": 2, "has_previous": false, "has_next": true}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/admin/journals/1/issues/"))
        .and(query_param("page", "2"))
        .respond_with(ok(json!({
            "success": true,
            "issues": [{"id": 2, "volume": 1, "number": 2, "year": 2024}],
            "pagination": {"current": 2, "total_pages": 2, "has_previous": true, "has_next": false}
        })))
        .mount(&server)
        .await;

    let choices = client_for(&server, None).issue_choices(Some(1)).await.unwrap();
    assert_eq!(
        choices,
        vec![
            Choice::new("1", "Vol.1 No.1 (2023)"),
            Choice::new("2", "Vol.1 No.2 (2024)"),
        ]
    );
}

#[tokio::test]
async fn test_export_writes_csv_to_dir() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/export/authors/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/csv")
                .set_body_string("id,name\n1,Ali Valiyev\n"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let written = client_for(&server, None)
        .export(ExportKind::Authors, None, dir.path())
        .await
        .unwrap();

    let name = written.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("authors_") && name.ends_with(".csv"));
    assert_eq!(
        std::fs::read_to_string(&written).unwrap(),
        "id,name\n1,Ali Valiyev\n"
    );
}

#[tokio::test]
async fn test_interrupted_export_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("authors_20260101_000000.csv");
    let chunks: Vec<Result<bytes::Bytes, std::io::Error>> = vec![
        Ok(bytes::Bytes::from_static(b"id,name\n")),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
    ];

    let result = write_export(futures::stream::iter(chunks), &target).await;

    assert!(matches!(result, Err(ApiError::Io(_))));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_seo_status_reads_top_level_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/seo/status/"))
        .respond_with(ok(json!({
            "success": true,
            "seo_enabled": true,
            "auto_sitemap": false,
            "stats": {"articles": 10, "journals": 2, "authors": 7, "issues": 3},
            "urls": {"sitemap": "/sitemap.xml", "robots": "/robots.txt"}
        })))
        .mount(&server)
        .await;

    let status = client_for(&server, None).seo_status().await.unwrap();
    assert!(status.seo_enabled);
    assert_eq!(status.stats.articles, 10);
    assert_eq!(status.urls.robots, "/robots.txt");
}
