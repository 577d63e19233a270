//! Configuration tests
//!
//! Round-trip and precedence checks. When a field is added to `Config`,
//! the round-trip tests fail until `to_toml` writes it.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

#[test]
fn test_config_roundtrip_preserves_values() {
    let mut config = Config::default();
    config.base_url = "https://journals.example.uz/".to_string();
    config.session_cookie = Some("sessionid=abc; csrftoken=tok".to_string());
    config.journal_id = Some(7);
    config.page_size = 50;
    config.search_debounce_ms = 150;
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let file: FileConfig = toml::from_str(&config.to_toml()).expect("valid toml");
    let reloaded = Config::from_sources(file, no_env);

    assert_eq!(reloaded.base_url, config.base_url);
    assert_eq!(reloaded.session_cookie, config.session_cookie);
    assert_eq!(reloaded.journal_id, Some(7));
    assert_eq!(reloaded.page_size, 50);
    assert_eq!(reloaded.search_debounce_ms, 150);
    assert!(reloaded.logging.file_enabled);
    assert_eq!(reloaded.logging.file_rotation, LogRotation::Hourly);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_defaults_without_file_or_env() {
    let config = Config::from_sources(FileConfig::default(), no_env);
    assert_eq!(config.base_url, "http://127.0.0.1:8000/");
    assert_eq!(config.page_size, 20);
    assert_eq!(config.toast_secs, 5);
    assert_eq!(config.search_debounce_ms, 300);
    assert_eq!(config.request_timeout_secs, 0);
    assert!(config.session_cookie.is_none());
    assert!(config.enable_tui);
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
base_url = "https://file.example/"
journal_id = 3
"#,
    )
    .unwrap();
    let env = env_from(&[
        ("JOURNAL_ADMIN_URL", "https://env.example"),
        ("JOURNAL_ADMIN_JOURNAL", "9"),
    ]);

    let config = Config::from_sources(file, env);
    // Trailing slash is added so relative paths join below the root
    assert_eq!(config.base_url, "https://env.example/");
    assert_eq!(config.journal_id, Some(9));
}

#[test]
fn test_unparsable_env_journal_falls_back_to_file() {
    let file: FileConfig = toml::from_str("journal_id = 4").unwrap();
    let config = Config::from_sources(file, env_from(&[("JOURNAL_ADMIN_JOURNAL", "abc")]));
    assert_eq!(config.journal_id, Some(4));
}

#[test]
fn test_blank_session_cookie_is_none() {
    let file: FileConfig = toml::from_str("session_cookie = \"  \"").unwrap();
    let config = Config::from_sources(file, no_env);
    assert!(config.session_cookie.is_none());
}

#[test]
fn test_zero_page_size_uses_default() {
    let file: FileConfig = toml::from_str("page_size = 0").unwrap();
    assert_eq!(Config::from_sources(file, no_env).page_size, 20);
}

#[test]
fn test_no_tui_flag() {
    let config = Config::from_sources(
        FileConfig::default(),
        env_from(&[("JOURNAL_ADMIN_NO_TUI", "true")]),
    );
    assert!(!config.enable_tui);
}

#[test]
fn test_log_rotation_parse() {
    assert_eq!(LogRotation::from_name("HOURLY"), LogRotation::Hourly);
    assert_eq!(LogRotation::from_name(" never "), LogRotation::Never);
    assert_eq!(LogRotation::from_name("weekly"), LogRotation::Daily);
}

#[test]
fn test_logging_table_overrides_and_level_typos() {
    let logging = LoggingConfig::from_file(Some(FileLogging {
        level: Some("DEBUG".into()),
        file_rotation: Some("never".into()),
        file_prefix: Some("  ".into()),
        ..Default::default()
    }));
    assert_eq!(logging.level, "debug");
    assert_eq!(logging.file_rotation, LogRotation::Never);
    assert_eq!(logging.file_prefix, "journal-admin");

    let logging = LoggingConfig::from_file(Some(FileLogging {
        level: Some("verbose".into()),
        ..Default::default()
    }));
    assert_eq!(logging.level, "info");
}
