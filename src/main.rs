// Journal Admin - terminal admin client for a journal-publishing CMS
//
// Manages journals, issues, articles, authors, editors, policies, navigation
// and SEO settings through the site's admin JSON API.
//
// Architecture:
// - API client (reqwest): session cookie + CSRF, JSON envelopes, multipart saves
// - CRUD controller: per-section list/pagination/search/delete state, forms
// - TUI (ratatui): tabs, tables, modal forms, toasts
// - Worker: executes controller commands, replies over an mpsc channel
// - CLI (clap): config management and headless list/show/delete/export/seo

mod api;
mod cli;
mod config;
mod crud;
mod domain;
mod logging;
mod richtext;
mod tui;
mod util;

use anyhow::Result;
use clap::Parser;
use config::Config;
use logging::{LogBuffer, TuiLogLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with conditional output
///
/// In TUI mode: capture logs to buffer (prevents garbling the display)
/// In headless mode: output logs to stderr
/// File logging: optionally write to rotating log files (in addition to above)
///
/// The returned guard must be kept alive for the duration of the program to
/// ensure logs flush.
fn init_tracing(
    config: &Config,
    log_buffer: &LogBuffer,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    // Precedence: RUST_LOG env var > config file > default "info"
    let default_filter = format!("journal_admin={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let tui_layer = config
        .enable_tui
        .then(|| TuiLogLayer::new(log_buffer.clone()));
    let stderr_layer =
        (!config.enable_tui).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    if !config.logging.file_enabled {
        tracing_subscriber::registry()
            .with(filter)
            .with(tui_layer)
            .with(stderr_layer)
            .init();
        return None;
    }

    // Create log directory if it doesn't exist
    if let Err(e) = std::fs::create_dir_all(&config.logging.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            config.logging.file_dir, e
        );
        // Fall back to non-file logging
        tracing_subscriber::registry()
            .with(filter)
            .with(tui_layer)
            .with(stderr_layer)
            .init();
        return None;
    }

    let file_appender = config
        .logging
        .file_rotation
        .appender(&config.logging.file_dir, &config.logging.file_prefix);

    // Wrap in non-blocking writer (writes happen in background thread)
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // File layer uses JSON format for structured log parsing
    tracing_subscriber::registry()
        .with(filter)
        .with(tui_layer)
        .with(stderr_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle local commands first (config --show, --reset, --edit, --path)
    let cli = cli::Cli::parse();
    if cli::handle_local(&cli) {
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    if cli.command.as_ref().is_some_and(cli::Commands::is_remote) {
        config.enable_tui = false;
    }

    // Create log buffer for TUI mode
    let log_buffer = LogBuffer::new();
    let _file_guard = init_tracing(&config, &log_buffer);

    if let Some(command) = cli.command {
        return cli::run_remote(command, &config).await;
    }

    if !config.enable_tui {
        eprintln!("TUI disabled (JOURNAL_ADMIN_NO_TUI). Run `journal-admin --help` for commands.");
        return Ok(());
    }

    tracing::info!(
        base_url = %config.base_url,
        journal = ?config.journal_id,
        version = config::VERSION,
        "starting journal-admin"
    );

    tui::run_tui(config, log_buffer).await
}
