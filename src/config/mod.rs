//! Configuration for the admin client
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/journal-admin/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;

#[cfg(test)]
mod tests;

// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use observability::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_TOAST_SECS: u64 = 5;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the admin site, e.g. "https://journals.example.uz/"
    pub base_url: String,

    /// Cookie header copied from a logged-in browser session
    /// ("sessionid=...; csrftoken=..."). Also the CSRF token source.
    pub session_cookie: Option<String>,

    /// Journal that scopes issues, articles, editors and policies
    pub journal_id: Option<u64>,

    /// Rows per page used for the "start-end / total" line
    pub page_size: u32,

    /// How long alerts stay on screen
    pub toast_secs: u64,

    /// Quiet period before a typed search fires
    pub search_debounce_ms: u64,

    /// Per-request timeout in seconds (0 = no timeout)
    pub request_timeout_secs: u64,

    /// Directory CSV exports are written to
    pub export_dir: PathBuf,

    /// Whether to run the TUI (headless subcommands ignore this)
    pub enable_tui: bool,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            session_cookie: None,
            journal_id: None,
            page_size: DEFAULT_PAGE_SIZE,
            toast_secs: DEFAULT_TOAST_SECS,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            request_timeout_secs: 0,
            export_dir: PathBuf::from("."),
            enable_tui: true,
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub base_url: Option<String>,
    pub session_cookie: Option<String>,
    pub journal_id: Option<u64>,
    pub page_size: Option<u32>,
    pub toast_secs: Option<u64>,
    pub search_debounce_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub export_dir: Option<String>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/journal-admin/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("journal-admin").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but does not parse is fatal: the user gets
    /// the parse error instead of silently running against defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                    eprintln!("║  CONFIG ERROR - Failed to parse configuration file          ║");
                    eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - journal_id written as a string instead of a number");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  Run `journal-admin config --reset` to start over.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\n╔══════════════════════════════════════════════════════════════╗");
                eprintln!("║  CONFIG ERROR - Cannot read configuration file              ║");
                eprintln!("╚══════════════════════════════════════════════════════════════╝\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: file -> env vars -> defaults
    pub fn from_env() -> Self {
        Self::from_sources(Self::load_file_config(), |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup.
    ///
    /// Split out of `from_env` so precedence can be tested without touching
    /// the process environment.
    pub(crate) fn from_sources(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Base URL: env > file > default, always with a trailing slash so
        // relative endpoint paths join underneath it
        let mut base_url = env("JOURNAL_ADMIN_URL")
            .or(file.base_url)
            .unwrap_or(defaults.base_url);
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let session_cookie = env("JOURNAL_ADMIN_SESSION")
            .or(file.session_cookie)
            .filter(|s| !s.trim().is_empty());

        let journal_id = env("JOURNAL_ADMIN_JOURNAL")
            .and_then(|v| v.parse().ok())
            .or(file.journal_id);

        let page_size = file
            .page_size
            .filter(|n| *n > 0)
            .unwrap_or(defaults.page_size);
        let toast_secs = file.toast_secs.unwrap_or(defaults.toast_secs);
        let search_debounce_ms = file
            .search_debounce_ms
            .unwrap_or(defaults.search_debounce_ms);
        let request_timeout_secs = file
            .request_timeout_secs
            .unwrap_or(defaults.request_timeout_secs);

        let export_dir = env("JOURNAL_ADMIN_EXPORT_DIR")
            .or(file.export_dir)
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        // TUI toggle: env only (runtime flag)
        let enable_tui = env("JOURNAL_ADMIN_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(true);

        let logging = LoggingConfig::from_file(file.logging);

        Self {
            base_url,
            session_cookie,
            journal_id,
            page_size,
            toast_secs,
            search_debounce_ms,
            request_timeout_secs,
            export_dir,
            enable_tui,
            logging,
        }
    }
}
