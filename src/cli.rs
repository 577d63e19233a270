// CLI module - command-line argument parsing and handlers
//
// Without a subcommand the TUI starts. Subcommands:
// - config --show/--path/--reset/--edit: configuration management
// - list/show/delete: headless access to any entity section
// - export: stream a CSV export to disk
// - seo status/sitemap/robots: site SEO reports and regeneration

use crate::api::AdminClient;
use crate::config::{Config, VERSION};
use crate::crud::confirm::DeleteTarget;
use crate::crud::list::ListQuery;
use crate::crud::pagination::{PageLink, Pagination};
use crate::domain::{EntityKind, ExportKind, Route};
use crate::util::fit_width;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// Journal Admin - terminal admin client for the journal CMS
#[derive(Parser)]
#[command(name = "journal-admin")]
#[command(version = VERSION)]
#[command(about = "Terminal admin client for the journal CMS", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Print one page of an entity list
    List {
        /// journals, authors, issues, articles, editors, policies,
        /// navigation, fan-tarmoq, ilmiy-nashr
        #[arg(value_parser = parse_entity)]
        entity: EntityKind,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long)]
        search: Option<String>,

        /// Journal for journal-scoped entities (overrides config)
        #[arg(long)]
        journal: Option<u64>,
    },

    /// Print one record
    Show {
        #[arg(value_parser = parse_entity)]
        entity: EntityKind,

        id: u64,

        #[arg(long)]
        journal: Option<u64>,
    },

    /// Delete one record
    Delete {
        #[arg(value_parser = parse_entity)]
        entity: EntityKind,

        id: u64,

        #[arg(long)]
        journal: Option<u64>,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Download a CSV export
    Export {
        /// authors, articles, journals, editors, policies
        #[arg(value_parser = parse_export)]
        kind: ExportKind,

        #[arg(long)]
        journal: Option<u64>,

        /// Directory to write into (defaults to export_dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Site SEO
    Seo {
        #[command(subcommand)]
        action: SeoAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
pub enum SeoAction {
    /// Show SEO status and counts
    Status,
    /// Regenerate the sitemap
    Sitemap,
    /// Regenerate robots.txt
    Robots,
}

fn parse_entity(s: &str) -> Result<EntityKind, String> {
    EntityKind::from_cli_name(s).ok_or_else(|| {
        let names: Vec<&str> = EntityKind::ALL.iter().map(|k| k.cli_name()).collect();
        format!("unknown entity '{s}' (expected one of: {})", names.join(", "))
    })
}

fn parse_export(s: &str) -> Result<ExportKind, String> {
    ExportKind::from_name(s).ok_or_else(|| {
        format!("unknown export '{s}' (expected authors, articles, journals, editors or policies)")
    })
}

impl Commands {
    /// Whether this command talks to the server
    pub fn is_remote(&self) -> bool {
        !matches!(self, Commands::Config { .. })
    }
}

/// Handle local commands. Returns true if a command was handled (exit after).
pub fn handle_local(cli: &Cli) -> bool {
    match &cli.command {
        Some(Commands::Config {
            show,
            reset,
            edit,
            path,
        }) => {
            if *path {
                handle_config_path();
            } else if *show {
                handle_config_show();
            } else if *reset {
                handle_config_reset();
            } else if *edit {
                handle_config_edit();
            } else {
                // No flag provided, show help
                println!("Usage: journal-admin config [--show|--reset|--edit|--path]");
                println!();
                println!("Options:");
                println!("  --show    Display effective configuration");
                println!("  --reset   Reset config file to defaults");
                println!("  --edit    Open config file in $EDITOR");
                println!("  --path    Show config file path");
            }
            true
        }
        _ => false,
    }
}

// ─── Config commands ─────────────────────────────────────────────────────────

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    println!("base_url = {:?}", config.base_url);
    println!(
        "session_cookie = {}",
        if config.session_cookie.is_some() {
            "\"(set)\""
        } else {
            "(none)"
        }
    );
    match config.journal_id {
        Some(id) => println!("journal_id = {id}"),
        None => println!("# journal_id = (none)"),
    }
    println!("page_size = {}", config.page_size);
    println!("toast_secs = {}", config.toast_secs);
    println!("search_debounce_ms = {}", config.search_debounce_ms);
    println!("request_timeout_secs = {}", config.request_timeout_secs);
    println!("export_dir = {:?}", config.export_dir.display().to_string());
    println!();
    println!("[logging]");
    println!("level = {:?}", config.logging.level);
    println!("file_enabled = {}", config.logging.file_enabled);
    println!(
        "file_dir = {:?}",
        config.logging.file_dir.display().to_string()
    );
    println!("file_rotation = {:?}", config.logging.file_rotation.as_str());

    // Show source info
    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

/// Read a y/N answer from stdin
fn confirm(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();

    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    input.trim().eq_ignore_ascii_case("y")
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    // Confirm if file exists
    if path.exists()
        && !confirm(&format!(
            "Config file exists at {}. Overwrite?",
            path.display()
        ))
    {
        println!("Aborted.");
        return;
    }

    // Create parent directory
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    // Write the default config (using Config's single source of truth)
    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    // Ensure config exists
    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    // Get editor from environment
    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            // Platform-specific fallback
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor).arg(&path).status();

    match status {
        Ok(s) if s.success() => {}
        Ok(s) => {
            eprintln!("Editor exited with status: {}", s);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            eprintln!("Set $EDITOR environment variable to your preferred editor");
            std::process::exit(1);
        }
    }
}

// ─── Remote commands ─────────────────────────────────────────────────────────

/// Run a command against the server
pub async fn run_remote(command: Commands, config: &Config) -> Result<()> {
    let client = AdminClient::new(config).context("Failed to create API client")?;

    match command {
        Commands::Config { .. } => Ok(()),
        Commands::List {
            entity,
            page,
            search,
            journal,
        } => {
            let journal = journal.or(config.journal_id);
            require_journal(entity, journal)?;
            let query = ListQuery {
                page: page.max(1),
                search: search.unwrap_or_default(),
                ..ListQuery::default()
            };
            list(&client, config, entity, &query, journal).await
        }
        Commands::Show {
            entity,
            id,
            journal,
        } => {
            let journal = journal.or(config.journal_id);
            require_journal(entity, journal)?;
            show(&client, entity, id, journal).await
        }
        Commands::Delete {
            entity,
            id,
            journal,
            yes,
        } => {
            let journal = journal.or(config.journal_id);
            require_journal(entity, journal)?;
            delete(&client, entity, id, journal, yes).await
        }
        Commands::Export {
            kind,
            journal,
            output,
        } => {
            let dir = output.unwrap_or_else(|| config.export_dir.clone());
            let path = client
                .export(kind, journal.or(config.journal_id), &dir)
                .await
                .with_context(|| format!("Failed to export {}", kind.name()))?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::Seo { action } => seo(&client, action).await,
    }
}

async fn list(
    client: &AdminClient,
    config: &Config,
    kind: EntityKind,
    query: &ListQuery,
    journal: Option<u64>,
) -> Result<()> {
    let page = client
        .list(kind, query, journal)
        .await
        .with_context(|| format!("Failed to load {}", kind.plural_label().to_lowercase()))?;

    let columns = kind.columns();
    let header: Vec<String> = columns
        .iter()
        .map(|(name, width)| fit_width(name, *width as usize))
        .collect();
    println!("{}", header.join(" "));

    if page.records.is_empty() {
        println!("(no records)");
    }
    for entity in &page.records {
        let cells: Vec<String> = entity
            .record()
            .cells()
            .iter()
            .zip(columns)
            .map(|(cell, (_, width))| fit_width(cell, *width as usize))
            .collect();
        println!("{}", cells.join(" ").trim_end());
    }

    let pagination = page
        .pagination
        .unwrap_or_else(|| Pagination::single(page.records.len()));
    println!();
    if pagination.is_visible() {
        println!("{}", format_page_links(&pagination));
    }
    if let Some(info) = pagination.results_info(config.page_size, page.records.len()) {
        println!("{info}");
    }
    if let Some(filters) = query.describe() {
        println!("filtered by {filters}");
    }
    Ok(())
}

/// "‹ 1 … 4 [5] 6 … 10 ›"
pub fn format_page_links(pagination: &Pagination) -> String {
    pagination
        .links()
        .into_iter()
        .map(|link| match link {
            PageLink::Prev(_) => "‹".to_string(),
            PageLink::Next(_) => "›".to_string(),
            PageLink::Page(n) => n.to_string(),
            PageLink::Current(n) => format!("[{n}]"),
            PageLink::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn show(client: &AdminClient, kind: EntityKind, id: u64, journal: Option<u64>) -> Result<()> {
    let entity = client
        .fetch(kind, Route::View(id), journal)
        .await
        .with_context(|| format!("Failed to load {} #{id}", kind.label().to_lowercase()))?;

    let record = entity.record();
    let details = record.details();
    let width = details.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    println!("{} #{}", kind.label(), record.id());
    for (label, value) in details {
        let mut lines = value.lines();
        println!("  {label:<width$}  {}", lines.next().unwrap_or(""));
        for rest in lines {
            println!("  {:<width$}  {rest}", "");
        }
    }
    Ok(())
}

async fn delete(
    client: &AdminClient,
    kind: EntityKind,
    id: u64,
    journal: Option<u64>,
    yes: bool,
) -> Result<()> {
    if !yes {
        let label = client
            .fetch(kind, Route::View(id), journal)
            .await
            .map(|entity| entity.record().label())
            .unwrap_or_default();
        let target = DeleteTarget { kind, id, label };
        if !confirm(&target.prompt()) {
            println!("Aborted.");
            return Ok(());
        }
    }

    client
        .delete(kind, id, journal)
        .await
        .with_context(|| format!("Failed to delete {} #{id}", kind.label().to_lowercase()))?;
    println!("{} deleted", kind.label());
    Ok(())
}

async fn seo(client: &AdminClient, action: SeoAction) -> Result<()> {
    match action {
        SeoAction::Status => {
            let status = client.seo_status().await.context("Failed to load SEO status")?;
            let yes_no = |on: bool| if on { "yes" } else { "no" };
            println!("SEO enabled        {}", yes_no(status.seo_enabled));
            println!("Automatic sitemap  {}", yes_no(status.auto_sitemap));
            println!("Articles           {}", status.stats.articles);
            println!("Journals           {}", status.stats.journals);
            println!("Authors            {}", status.stats.authors);
            println!("Issues             {}", status.stats.issues);
            println!("Sitemap            {}", status.urls.sitemap);
            println!("robots.txt         {}", status.urls.robots);
        }
        SeoAction::Sitemap => {
            let (message, stats) = client
                .update_sitemap()
                .await
                .context("Failed to update sitemap")?;
            println!("{message}");
            println!(
                "{} articles, {} journals, {} authors, {} issues",
                stats.articles, stats.journals, stats.authors, stats.issues
            );
        }
        SeoAction::Robots => {
            let (message, preview) = client
                .update_robots()
                .await
                .context("Failed to update robots.txt")?;
            println!("{message}");
            if !preview.is_empty() {
                println!();
                println!("{preview}");
            }
        }
    }
    Ok(())
}

/// Fail early for journal-scoped commands run without a journal
fn require_journal(kind: EntityKind, journal: Option<u64>) -> Result<()> {
    if kind.journal_scoped() && journal.is_none() {
        bail!(
            "{} belong to a journal: pass --journal or set journal_id",
            kind.plural_label()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn entity_names_parse_singular_and_plural() {
        assert_eq!(parse_entity("articles"), Ok(EntityKind::Article));
        assert_eq!(parse_entity("Article"), Ok(EntityKind::Article));
        assert_eq!(parse_entity("fan-tarmoq"), Ok(EntityKind::FieldOfScience));
        assert!(parse_entity("widgets").unwrap_err().contains("journals"));
    }

    #[test]
    fn list_args_parse() {
        let cli = Cli::try_parse_from([
            "journal-admin",
            "list",
            "authors",
            "--page",
            "3",
            "--search",
            "smith",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::List {
                entity,
                page,
                search,
                journal,
            }) => {
                assert_eq!(entity, EntityKind::Author);
                assert_eq!(page, 3);
                assert_eq!(search.as_deref(), Some("smith"));
                assert_eq!(journal, None);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn config_is_local_everything_else_remote() {
        let cli = Cli::try_parse_from(["journal-admin", "config", "--path"]).unwrap();
        assert!(!cli.command.unwrap().is_remote());
        let cli = Cli::try_parse_from(["journal-admin", "seo", "status"]).unwrap();
        assert!(cli.command.unwrap().is_remote());
    }

    #[test]
    fn page_links_render_as_text() {
        let pagination = Pagination {
            current: 5,
            total_pages: 10,
            has_previous: true,
            has_next: true,
            total_count: None,
        };
        assert_eq!(format_page_links(&pagination), "‹ 1 … 3 4 [5] 6 7 … 10 ›");
    }

    #[test]
    fn scoped_entities_need_a_journal() {
        assert!(require_journal(EntityKind::Issue, None).is_err());
        assert!(require_journal(EntityKind::Issue, Some(1)).is_ok());
        assert!(require_journal(EntityKind::Author, None).is_ok());
    }
}
