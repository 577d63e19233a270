// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, API replies)
// - Rendering the UI
// - Handing the commands the App queued to the worker

pub mod app;
pub mod clipboard;
pub mod components;
pub mod layout;
pub mod modal;
pub mod theme;
pub mod views;
pub mod worker;

use crate::api::AdminClient;
use crate::config::Config;
use crate::crud::command::Reply;
use crate::logging::LogBuffer;
use anyhow::{Context, Result};
use app::{App, Tab};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use worker::Worker;

/// Tick period; also bounds how late a debounced search fires
const TICK: Duration = Duration::from_millis(50);

/// Run the TUI
///
/// This function sets up the terminal, runs the event loop, and cleans up
/// when done. The event loop handles keyboard input, ticks and API replies.
pub async fn run_tui(config: Config, log_buffer: LogBuffer) -> Result<()> {
    let client = AdminClient::new(&config).context("Failed to create API client")?;
    let (reply_tx, mut reply_rx) = mpsc::channel::<Reply>(64);
    let worker = Worker::new(client, reply_tx);

    let mut app = App::new(config, log_buffer);
    app.startup();

    // Set up terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Run the event loop
    let result = run_event_loop(&mut terminal, &mut app, &worker, &mut reply_rx).await;

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// This loop handles three types of events:
/// 1. Keyboard input (for navigation and commands)
/// 2. Timer ticks (toasts, debounced search, spinner)
/// 3. Replies from the worker (for updating the display)
///
/// After every wake-up, commands the App queued are handed to the worker.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &Worker,
    reply_rx: &mut mpsc::Receiver<Reply>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(TICK);

    loop {
        for command in app.take_commands() {
            worker.dispatch(command);
        }

        // Draw the UI
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            // Keyboard input
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event);
                    }
                }
            } => {}

            // Periodic tick
            _ = tick_interval.tick() => {
                app.tick(Instant::now());
            }

            // API replies
            Some(reply) = reply_rx.recv() => {
                app.handle_reply(reply);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Modal → Search → Global → Tab-specific
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind == KeyEventKind::Release {
        return;
    }

    // Layer 1: Modal captures all input when active
    if handle_modal_input(app, key_event) {
        return;
    }

    // Layer 2: the search box captures typing
    if handle_search_input(app, key_event) {
        return;
    }

    // Layer 3: Global keys (work regardless of tab)
    if handle_global_keys(app, &key_event) {
        return;
    }

    // Layer 4: Tab-specific keys
    match app.tab {
        Tab::Seo => handle_seo_keys(app, key_event.code),
        Tab::Section(_) => handle_section_keys(app, key_event.code),
    }
}

fn copy_to_clipboard(app: &mut App, text: &str) {
    match clipboard::copy_to_clipboard(text) {
        Ok(()) => app.success("✓ Copied to clipboard"),
        Err(e) => {
            tracing::debug!(error = %e, "clipboard copy failed");
            app.error("✗ Failed to copy");
        }
    }
}

/// Handle modal input - returns true if modal absorbed the input
fn handle_modal_input(app: &mut App, key_event: KeyEvent) -> bool {
    let Some(modal) = app.modal.as_mut() else {
        return false;
    };

    match modal.handle_input(key_event) {
        ModalAction::None => {}
        ModalAction::Close => app.close_modal(),
        ModalAction::CopyReadable => {
            if let Some(text) = app.copy_current_readable() {
                copy_to_clipboard(app, &text);
            }
        }
        ModalAction::Confirm => app.confirm_delete(),
        ModalAction::Submit => app.submit_form(),
        ModalAction::Prefilled(Some(name)) => app.info(format!("Filled in {name}")),
        ModalAction::Prefilled(None) => app.warning("No existing authors to fill in"),
    }

    true // Modal absorbed the input
}

/// Typing into the search box - returns true if handled
fn handle_search_input(app: &mut App, key_event: KeyEvent) -> bool {
    let Some(section) = app.active_section_mut() else {
        return false;
    };
    if !section.is_searching() {
        return false;
    }

    let now = Instant::now();
    match key_event.code {
        KeyCode::Char(c) if !key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            section.search_input(c, now);
        }
        KeyCode::Backspace => section.search_backspace(now),
        KeyCode::Enter => app.with_section(|s, journal| s.submit_search(journal)),
        KeyCode::Esc => section.end_search(),
        _ => return false,
    }
    true
}

/// Handle global keys - returns true if handled
/// Global keys work the same regardless of the active tab
fn handle_global_keys(app: &mut App, key_event: &KeyEvent) -> bool {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);

    match key_event.code {
        // Quit
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        // Help modal
        KeyCode::Char('?') => app.modal = Some(Modal::help()),
        KeyCode::Char('L') => app.show_logs = !app.show_logs,
        // Tab switching
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.prev_tab(),
        KeyCode::Char(c @ '0'..='9') => app.select_tab_digit(c),
        KeyCode::Char('J') => app.cycle_journal(),
        KeyCode::Char('r') | KeyCode::F(5) => app.refresh(),
        // Copy to clipboard
        KeyCode::Char('y') => {
            if let Some(text) = app.copy_current_readable() {
                copy_to_clipboard(app, &text);
            }
        }
        _ => return false,
    }
    true
}

fn handle_seo_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('e') | KeyCode::Enter => app.edit_seo(),
        KeyCode::Char('u') => app.update_sitemap(),
        KeyCode::Char('o') => app.update_robots(),
        _ => {}
    }
}

fn handle_section_keys(app: &mut App, key: KeyCode) {
    match key {
        // Row selection
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(s) = app.active_section_mut() {
                s.list.select_next();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(s) = app.active_section_mut() {
                s.list.select_prev();
            }
        }
        KeyCode::Home | KeyCode::Char('g') => {
            if let Some(s) = app.active_section_mut() {
                s.list.select_first();
            }
        }
        KeyCode::End | KeyCode::Char('G') => {
            if let Some(s) = app.active_section_mut() {
                s.list.select_last();
            }
        }

        // Record actions
        KeyCode::Enter | KeyCode::Char('v') => app.view_selected(),
        KeyCode::Char('e') => app.edit_selected(),
        KeyCode::Char('a') | KeyCode::Char('n') => app.open_create_form(),
        KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char('f') => app.toggle_featured(),
        KeyCode::Char('m') => {
            if app.active_kind() == Some(crate::domain::EntityKind::Journal) {
                app.use_selected_journal();
            }
        }
        KeyCode::Char('x') => app.export_current(),

        // Pages
        KeyCode::Char(']') | KeyCode::PageDown | KeyCode::Right => {
            app.with_section(|s, journal| s.next_page(journal))
        }
        KeyCode::Char('[') | KeyCode::PageUp | KeyCode::Left => {
            app.with_section(|s, journal| s.prev_page(journal))
        }
        KeyCode::Char('<') => app.with_section(|s, journal| s.first_page(journal)),
        KeyCode::Char('>') => app.with_section(|s, journal| s.last_page(journal)),

        // Search and filters
        KeyCode::Char('/') => {
            if let Some(s) = app.active_section_mut() {
                s.begin_search();
            }
        }
        KeyCode::Esc => app.with_section(|s, journal| s.clear_search(journal)),
        KeyCode::Char('s') => {
            if app.active_kind() == Some(crate::domain::EntityKind::Article) {
                app.with_section(|s, journal| s.cycle_status(journal));
            }
        }
        KeyCode::Char('i') => app.cycle_issue_filter(),
        _ => {}
    }
}
