//! `[logging]` table: filter level and the optional JSON log file

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::RollingFileAppender;

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    /// Case-insensitive; anything unrecognized rotates daily
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    /// File appender for `dir/prefix` rolling on this schedule
    pub fn appender(self, dir: &Path, prefix: &str) -> RollingFileAppender {
        match self {
            Self::Hourly => tracing_appender::rolling::hourly(dir, prefix),
            Self::Daily => tracing_appender::rolling::daily(dir, prefix),
            Self::Never => tracing_appender::rolling::never(dir, prefix),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// One of trace/debug/info/warn/error
    pub level: String,
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: default_log_dir(),
            file_rotation: LogRotation::Daily,
            file_prefix: "journal-admin".to_string(),
        }
    }
}

/// `~/.local/share/journal-admin/logs` or `./logs` when there is no data dir
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("journal-admin").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Raw `[logging]` table; every key optional
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let mut config = Self::default();
        let Some(file) = file else {
            return config;
        };

        if let Some(level) = file.level.as_deref().and_then(normalize_level) {
            config.level = level;
        }
        if let Some(enabled) = file.file_enabled {
            config.file_enabled = enabled;
        }
        if let Some(dir) = file.file_dir {
            config.file_dir = PathBuf::from(dir);
        }
        if let Some(rotation) = file.file_rotation {
            config.file_rotation = LogRotation::from_name(&rotation);
        }
        if let Some(prefix) = file.file_prefix.filter(|p| !p.trim().is_empty()) {
            config.file_prefix = prefix;
        }
        config
    }
}

/// Lowercased level name, or None for a typo (keeps the default)
fn normalize_level(level: &str) -> Option<String> {
    let level = level.trim().to_ascii_lowercase();
    LEVELS.contains(&level.as_str()).then_some(level)
}
