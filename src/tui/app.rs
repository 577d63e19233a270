// App state - the admin panel's view-model
//
// One SectionState per entity tab, the active journal, the open modal and
// the toasts. Key handlers and replies mutate this state and queue
// Commands; the event loop hands the queue to the worker after every
// iteration. Nothing in here awaits.

use super::components::toast::{Toast, ToastKind, MAX_TOASTS};
use super::modal::Modal;
use super::theme::Theme;
use crate::api::ApiError;
use crate::config::Config;
use crate::crud::form::{FormMode, FormPhase, FormState, FormTarget};
use crate::crud::list::{Applied, ListStatus, LOAD_FAILED};
use crate::crud::validation;
use crate::crud::{Command, LookupData, Purpose, Reply, SectionState};
use crate::domain::forms::Lookup;
use crate::domain::models::{SeoSettings, SeoStatus};
use crate::domain::{Choice, Entity, EntityKind, ExportKind};
use crate::logging::LogBuffer;
use std::time::{Duration, Instant};

/// Top-level tabs: one per entity plus site SEO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Section(EntityKind),
    Seo,
}

impl Tab {
    pub const ALL: [Tab; 10] = [
        Tab::Section(EntityKind::Journal),
        Tab::Section(EntityKind::Author),
        Tab::Section(EntityKind::Issue),
        Tab::Section(EntityKind::Article),
        Tab::Section(EntityKind::Editor),
        Tab::Section(EntityKind::Policy),
        Tab::Section(EntityKind::Navigation),
        Tab::Section(EntityKind::FieldOfScience),
        Tab::Section(EntityKind::PublicationType),
        Tab::Seo,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Section(kind) => kind.plural_label(),
            Tab::Seo => "SEO",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }
}

/// SEO tab data
#[derive(Debug, Default)]
pub struct SeoPanel {
    pub settings: Option<SeoSettings>,
    pub status: Option<SeoStatus>,
    pub robots_preview: Option<String>,
    pub requested: bool,
}

/// Spinner frames for the in-flight indicator
const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

pub struct App {
    pub config: Config,
    pub theme: Theme,
    pub tab: Tab,
    sections: Vec<SectionState>,

    /// Journal that scopes issues, articles, editors and policies
    pub journal: Option<u64>,
    /// Journals for the journal switcher
    pub journals: Vec<Choice>,

    pub seo: SeoPanel,
    pub modal: Option<Modal>,
    pub toasts: Vec<Toast>,

    pub log_buffer: LogBuffer,
    pub show_logs: bool,
    pub should_quit: bool,

    /// Requests sent to the worker and not yet answered
    pub in_flight: usize,
    animation_frame: usize,
    started_at: Instant,
    outbox: Vec<Command>,
    /// Last serial handed to a form submission
    submissions: u64,
}

impl App {
    pub fn new(config: Config, log_buffer: LogBuffer) -> Self {
        let debounce = Duration::from_millis(config.search_debounce_ms);
        Self {
            sections: EntityKind::ALL
                .iter()
                .map(|kind| SectionState::new(*kind, debounce))
                .collect(),
            journal: config.journal_id,
            config,
            theme: Theme::auto(),
            tab: Tab::Section(EntityKind::Journal),
            journals: Vec::new(),
            seo: SeoPanel::default(),
            modal: None,
            toasts: Vec::new(),
            log_buffer,
            show_logs: false,
            should_quit: false,
            in_flight: 0,
            animation_frame: 0,
            started_at: Instant::now(),
            outbox: Vec::new(),
            submissions: 0,
        }
    }

    /// Initial requests: the journal list and the first tab
    pub fn startup(&mut self) {
        self.push(Command::Lookup {
            lookup: Lookup::Journals,
            journal: None,
        });
        if self.journal.is_some() {
            self.push(Command::Lookup {
                lookup: Lookup::Issues,
                journal: self.journal,
            });
        }
        self.set_tab(self.tab);
    }

    // ─── Command queue ───────────────────────────────────────────────────

    fn push(&mut self, command: Command) {
        self.outbox.push(command);
    }

    fn queue(&mut self, command: Option<Command>) {
        if let Some(command) = command {
            self.push(command);
        }
    }

    /// Drain queued commands for the worker
    pub fn take_commands(&mut self) -> Vec<Command> {
        let commands = std::mem::take(&mut self.outbox);
        self.in_flight += commands.len();
        commands
    }

    // ─── Sections ────────────────────────────────────────────────────────

    fn section_index(kind: EntityKind) -> usize {
        EntityKind::ALL.iter().position(|k| *k == kind).unwrap_or(0)
    }

    pub fn section(&self, kind: EntityKind) -> &SectionState {
        &self.sections[Self::section_index(kind)]
    }

    pub fn section_mut(&mut self, kind: EntityKind) -> &mut SectionState {
        &mut self.sections[Self::section_index(kind)]
    }

    pub fn active_kind(&self) -> Option<EntityKind> {
        match self.tab {
            Tab::Section(kind) => Some(kind),
            Tab::Seo => None,
        }
    }

    pub fn active_section(&self) -> Option<&SectionState> {
        self.active_kind().map(|kind| self.section(kind))
    }

    pub fn active_section_mut(&mut self) -> Option<&mut SectionState> {
        let kind = self.active_kind()?;
        Some(self.section_mut(kind))
    }

    /// Run a section operation on the active tab and queue its command
    pub fn with_section(
        &mut self,
        f: impl FnOnce(&mut SectionState, Option<u64>) -> Option<Command>,
    ) {
        let journal = self.journal;
        let command = self.active_section_mut().and_then(|s| f(s, journal));
        self.queue(command);
    }

    fn reload(&mut self, kind: EntityKind) {
        let journal = self.journal;
        let command = self.section_mut(kind).load(journal);
        self.queue(command);
    }

    // ─── Tabs ────────────────────────────────────────────────────────────

    /// Switch tabs; a section is loaded the first time it is shown
    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
        match tab {
            Tab::Section(kind) => {
                if matches!(
                    self.section(kind).list.status(),
                    ListStatus::Idle | ListStatus::NeedsJournal
                ) {
                    self.reload(kind);
                }
            }
            Tab::Seo => {
                if !self.seo.requested {
                    self.refresh_seo();
                }
            }
        }
    }

    pub fn next_tab(&mut self) {
        let next = (self.tab.index() + 1) % Tab::ALL.len();
        self.set_tab(Tab::ALL[next]);
    }

    pub fn prev_tab(&mut self) {
        let len = Tab::ALL.len();
        let prev = (self.tab.index() + len - 1) % len;
        self.set_tab(Tab::ALL[prev]);
    }

    /// `1`..`9` pick sections, `0` picks SEO
    pub fn select_tab_digit(&mut self, digit: char) {
        let index = match digit {
            '0' => Tab::ALL.len() - 1,
            '1'..='9' => digit as usize - '1' as usize,
            _ => return,
        };
        if let Some(tab) = Tab::ALL.get(index) {
            self.set_tab(*tab);
        }
    }

    /// `r`: reload whatever the active tab shows
    pub fn refresh(&mut self) {
        match self.tab {
            Tab::Section(kind) => self.reload(kind),
            Tab::Seo => self.refresh_seo(),
        }
    }

    // ─── Toasts ──────────────────────────────────────────────────────────

    pub fn toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        let duration = Duration::from_secs(self.config.toast_secs);
        self.toasts.push(Toast::new(kind, message, duration));
        if self.toasts.len() > MAX_TOASTS {
            self.toasts.remove(0);
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.toast(ToastKind::Success, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.toast(ToastKind::Error, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.toast(ToastKind::Warning, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.toast(ToastKind::Info, message);
    }

    // ─── Timers ──────────────────────────────────────────────────────────

    /// Called on every tick: expire toasts and fire due searches
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|t| !t.is_expired_at(now));
        let journal = self.journal;
        let due: Vec<Command> = self
            .sections
            .iter_mut()
            .filter_map(|s| s.tick(now, journal))
            .collect();
        self.outbox.extend(due);
        self.animation_frame = self.animation_frame.wrapping_add(1);
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.animation_frame % SPINNER.len()]
    }

    pub fn uptime(&self) -> String {
        let secs = self.started_at.elapsed().as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }

    // ─── Active journal ──────────────────────────────────────────────────

    pub fn journal_label(&self) -> Option<String> {
        let id = self.journal?;
        let label = self
            .journals
            .iter()
            .find(|c| c.value == id.to_string())
            .map(|c| c.label.clone())
            .unwrap_or_else(|| format!("#{id}"));
        Some(label)
    }

    /// Make `id` the active journal and reset every journal-scoped section
    pub fn set_journal(&mut self, id: u64) {
        if self.journal == Some(id) {
            return;
        }
        self.journal = Some(id);
        for kind in EntityKind::ALL.into_iter().filter(|k| k.journal_scoped()) {
            self.section_mut(kind).reset();
        }
        if matches!(self.modal, Some(Modal::ConfirmDelete(kind)) if kind.journal_scoped()) {
            self.modal = None;
        }
        self.push(Command::Lookup {
            lookup: Lookup::Issues,
            journal: Some(id),
        });
        if let Tab::Section(kind) = self.tab {
            if kind.journal_scoped() {
                self.reload(kind);
            }
        }
        let label = self.journal_label().unwrap_or_default();
        tracing::info!(journal = id, "active journal changed");
        self.info(format!("Active journal: {label}"));
    }

    /// `m` on the Journals tab
    pub fn use_selected_journal(&mut self) {
        let selected = self
            .section(EntityKind::Journal)
            .list
            .selected()
            .map(|e| e.record().id());
        match selected {
            Some(id) => self.set_journal(id),
            None => self.warning("Select a journal row first"),
        }
    }

    /// `J`: step through the loaded journals
    pub fn cycle_journal(&mut self) {
        if self.journals.is_empty() {
            self.push(Command::Lookup {
                lookup: Lookup::Journals,
                journal: None,
            });
            self.info("Loading journals…");
            return;
        }
        let ids: Vec<u64> = self
            .journals
            .iter()
            .filter_map(|c| c.value.parse().ok())
            .collect();
        let next = match self.journal.and_then(|cur| ids.iter().position(|id| *id == cur)) {
            Some(pos) => ids[(pos + 1) % ids.len()],
            None => match ids.first() {
                Some(first) => *first,
                None => return,
            },
        };
        self.set_journal(next);
    }

    // ─── Row actions ─────────────────────────────────────────────────────

    fn selected_id(&self) -> Option<(EntityKind, u64)> {
        let section = self.active_section()?;
        let entity = section.list.selected()?;
        Some((section.kind(), entity.record().id()))
    }

    pub fn view_selected(&mut self) {
        if let Some((kind, id)) = self.selected_id() {
            self.push(Command::Fetch {
                kind,
                id,
                purpose: Purpose::View,
                journal: self.journal,
            });
        }
    }

    pub fn edit_selected(&mut self) {
        if let Some((kind, id)) = self.selected_id() {
            self.push(Command::Fetch {
                kind,
                id,
                purpose: Purpose::Edit,
                journal: self.journal,
            });
        }
    }

    pub fn open_create_form(&mut self) {
        let Some(kind) = self.active_kind() else {
            return;
        };
        if kind.journal_scoped() && self.journal.is_none() {
            self.warning(ApiError::MissingJournal.user_message());
            return;
        }
        self.open_form(FormState::create(kind));
    }

    fn open_form(&mut self, form: FormState) {
        for lookup in form.lookups() {
            self.push(Command::Lookup {
                lookup,
                journal: self.journal,
            });
        }
        self.modal = Some(Modal::form(form));
    }

    /// `d`: arm the delete slot and ask for confirmation
    pub fn request_delete(&mut self) {
        let Some(section) = self.active_section_mut() else {
            return;
        };
        let kind = section.kind();
        if section.request_delete().is_some() {
            self.modal = Some(Modal::ConfirmDelete(kind));
        }
    }

    pub fn confirm_delete(&mut self) {
        let Some(Modal::ConfirmDelete(kind)) = self.modal else {
            return;
        };
        self.modal = None;
        let journal = self.journal;
        let command = self.section_mut(kind).confirm_delete(journal);
        self.queue(command);
    }

    /// Close the open modal, releasing a pending delete
    pub fn close_modal(&mut self) {
        if let Some(Modal::ConfirmDelete(kind)) = self.modal.take() {
            self.section_mut(kind).confirm.cancel();
        }
    }

    pub fn toggle_featured(&mut self) {
        match self.selected_id() {
            Some((EntityKind::Article, id)) => self.push(Command::ToggleFeatured { id }),
            Some(_) => {}
            None => self.warning("Select an article first"),
        }
    }

    pub fn export_current(&mut self) {
        let Some(kind) = self.active_kind() else {
            return;
        };
        let Some(export) = ExportKind::for_entity(kind) else {
            self.warning(format!("{} cannot be exported", kind.plural_label()));
            return;
        };
        self.push(Command::Export {
            kind: export,
            journal: self.journal,
            dir: self.config.export_dir.clone(),
        });
        self.info(format!("Exporting {}…", export.name()));
    }

    pub fn cycle_issue_filter(&mut self) {
        if self.active_kind() != Some(EntityKind::Article) {
            return;
        }
        if !self.section(EntityKind::Article).has_issue_choices() {
            if self.journal.is_some() {
                self.push(Command::Lookup {
                    lookup: Lookup::Issues,
                    journal: self.journal,
                });
                self.info("Loading issues…");
            }
            return;
        }
        self.with_section(|s, journal| s.cycle_issue(journal));
    }

    /// Text for `y`: the open detail, otherwise the selected row
    pub fn copy_current_readable(&self) -> Option<String> {
        if let Some(Modal::Detail(detail)) = &self.modal {
            return Some(detail.copy_text());
        }
        let entity = self.active_section()?.list.selected()?;
        let record = entity.record();
        let mut out = format!("{} #{}\n", entity.kind().label(), record.id());
        for (label, value) in record.details() {
            out.push_str(&format!("{label}: {value}\n"));
        }
        Some(out)
    }

    // ─── SEO ─────────────────────────────────────────────────────────────

    pub fn refresh_seo(&mut self) {
        self.seo.requested = true;
        self.push(Command::LoadSeo);
        self.push(Command::SeoStatus);
    }

    pub fn edit_seo(&mut self) {
        match &self.seo.settings {
            Some(settings) => {
                let form = FormState::seo(settings);
                self.open_form(form);
            }
            None => self.warning("SEO settings are not loaded yet"),
        }
    }

    pub fn update_sitemap(&mut self) {
        self.push(Command::UpdateSitemap);
    }

    pub fn update_robots(&mut self) {
        self.push(Command::UpdateRobots);
    }

    // ─── Form submission ─────────────────────────────────────────────────

    /// Validate the open form and send it. Invalid forms never reach the
    /// network; submits while a request is in flight are ignored.
    pub fn submit_form(&mut self) {
        let journal = self.journal;
        let serial = self.submissions + 1;
        let Some(form) = self.modal.as_mut().and_then(Modal::as_form_mut) else {
            return;
        };
        if form.phase() == FormPhase::Submitting {
            tracing::debug!("submit ignored while a save is in flight");
            return;
        }

        form.sync_richtext();
        form.prune_empty_rows();
        let checked = validation::validate(form).and_then(|()| form.to_payload());
        let outcome = match checked {
            Err(errors) => {
                let message = errors
                    .first_message()
                    .unwrap_or("Please fix the highlighted fields")
                    .to_string();
                tracing::debug!(errors = errors.len(), "form validation failed");
                form.set_errors(errors);
                Err(message)
            }
            Ok(payload) => {
                form.clear_errors();
                form.begin_submission(serial);
                Ok(match form.target() {
                    FormTarget::Entity(kind) => Command::Save {
                        kind,
                        mode: form.mode(),
                        submission: serial,
                        payload,
                        journal,
                    },
                    FormTarget::Seo => Command::SaveSeo {
                        submission: serial,
                        payload,
                    },
                })
            }
        };

        match outcome {
            Ok(command) => {
                self.submissions = serial;
                self.push(command);
            }
            Err(message) => self.warning(message),
        }
    }

    /// The open form if it sent the save tagged `serial`. A form closed
    /// mid-save and replaced by a new one does not match.
    fn form_for(&mut self, serial: u64) -> Option<&mut FormState> {
        self.modal
            .as_mut()
            .and_then(Modal::as_form_mut)
            .filter(|f| f.owns_submission(serial))
    }

    // ─── Replies ─────────────────────────────────────────────────────────

    /// Apply a worker reply
    pub fn handle_reply(&mut self, reply: Reply) {
        self.in_flight = self.in_flight.saturating_sub(1);

        match reply {
            Reply::List {
                kind,
                ticket,
                result,
            } => match self.section_mut(kind).apply_list(ticket, result) {
                Applied::Failed(message) => {
                    self.error(format!("{LOAD_FAILED}: {message}"))
                }
                Applied::Loaded | Applied::Stale => {}
            },

            Reply::Fetched {
                kind,
                id,
                purpose,
                result,
            } => match result {
                Ok(entity) => self.show_fetched(entity, purpose),
                Err(e) => {
                    let message = failure_text(&e, "Could not load record");
                    self.error(format!("{} #{}: {}", kind.label(), id, message));
                }
            },

            Reply::Saved {
                kind,
                mode,
                submission,
                result,
            } => match result {
                Ok(_) => {
                    if self.form_for(submission).is_some() {
                        self.modal = None;
                    }
                    let verb = match mode {
                        FormMode::Create => "created",
                        FormMode::Edit(_) => "updated",
                    };
                    self.success(format!("{} {}", kind.label(), verb));
                    self.reload(kind);
                }
                Err(e) => {
                    if let Some(form) = self.form_for(submission) {
                        form.set_phase(FormPhase::Editing);
                    }
                    self.error(failure_text(&e, "Could not save"));
                }
            },

            Reply::Deleted { target, result } => match result {
                Ok(()) => {
                    self.success(format!("{} deleted", target.kind.label()));
                    self.reload(target.kind);
                }
                Err(e) => self.error(failure_text(&e, "Could not delete")),
            },

            Reply::FeaturedToggled { id, result } => match result {
                Ok(featured) => {
                    self.section_mut(EntityKind::Article)
                        .list
                        .update_row(id, |entity| {
                            if let Entity::Article(article) = entity {
                                article.featured = featured;
                            }
                        });
                    self.success(if featured {
                        "Article marked as featured"
                    } else {
                        "Article no longer featured"
                    });
                    self.reload(EntityKind::Article);
                }
                Err(e) => self.error(failure_text(&e, "Could not update article")),
            },

            Reply::Lookup {
                lookup,
                journal,
                result,
            } => match result {
                Ok(_) if lookup == Lookup::Issues && journal != self.journal => {
                    tracing::debug!(?journal, active = ?self.journal, "stale issue lookup dropped");
                }
                Ok(data) => self.apply_lookup(lookup, data),
                Err(e) => {
                    tracing::warn!(?lookup, error = %e, "lookup failed");
                    self.warning(format!("Could not load {}", lookup_label(lookup)));
                }
            },

            Reply::Seo(result) => match result {
                Ok(settings) => self.seo.settings = Some(settings),
                Err(e) => self.error(failure_text(&e, "Could not load SEO settings")),
            },

            Reply::SeoSaved { submission, result } => match result {
                Ok(message) => {
                    if self.form_for(submission).is_some() {
                        self.modal = None;
                    }
                    self.success(non_empty(message, "SEO settings saved"));
                    self.refresh_seo();
                }
                Err(e) => {
                    if let Some(form) = self.form_for(submission) {
                        form.set_phase(FormPhase::Editing);
                    }
                    self.error(failure_text(&e, "Could not save"));
                }
            },

            Reply::SeoStatus(result) => match result {
                Ok(status) => self.seo.status = Some(status),
                Err(e) => self.error(failure_text(&e, "Could not load SEO status")),
            },

            Reply::Sitemap(result) => match result {
                Ok((message, stats)) => {
                    if let Some(status) = &mut self.seo.status {
                        status.stats = stats;
                    }
                    self.success(non_empty(message, "Sitemap updated"));
                }
                Err(e) => self.error(failure_text(&e, "Could not update sitemap")),
            },

            Reply::Robots(result) => match result {
                Ok((message, preview)) => {
                    self.seo.robots_preview = Some(preview);
                    self.success(non_empty(message, "robots.txt updated"));
                }
                Err(e) => self.error(failure_text(&e, "Could not update robots.txt")),
            },

            Reply::Exported { kind, result } => match result {
                Ok(path) => self.success(format!("Exported {} to {}", kind.name(), path.display())),
                Err(e) => self.error(failure_text(&e, "Export failed")),
            },
        }
    }

    fn show_fetched(&mut self, entity: Entity, purpose: Purpose) {
        if self.modal.is_some() {
            tracing::debug!("record arrived while another modal is open, ignoring");
            return;
        }
        match purpose {
            Purpose::View => {
                let record = entity.record();
                let title = format!("{} #{}", entity.kind().label(), record.id());
                let lines = record
                    .details()
                    .into_iter()
                    .map(|(label, value)| (label.to_string(), value))
                    .collect();
                self.modal = Some(Modal::detail(title, lines));
            }
            Purpose::Edit => self.open_form(FormState::edit(&entity)),
        }
    }

    fn apply_lookup(&mut self, lookup: Lookup, data: LookupData) {
        match data {
            LookupData::Choices(choices) => {
                match lookup {
                    Lookup::Journals => self.journals = choices.clone(),
                    Lookup::Issues => self
                        .section_mut(EntityKind::Article)
                        .set_issue_choices(choices.clone()),
                    _ => {}
                }
                if let Some(form) = self.modal.as_mut().and_then(Modal::as_form_mut) {
                    form.set_options(lookup, &choices);
                }
            }
            LookupData::Authors(authors) => {
                if let Some(form) = self.modal.as_mut().and_then(Modal::as_form_mut) {
                    form.set_authors(authors);
                }
            }
        }
    }
}

/// Toast text for a failed request: the server's own message when it sent
/// one, the fallback otherwise
fn failure_text(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Application(message) => message.clone(),
        ApiError::MissingJournal => err.user_message(),
        other => {
            tracing::warn!(error = %other, "{}", fallback);
            format!("{fallback} ({})", other.user_message())
        }
    }
}

fn non_empty(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

fn lookup_label(lookup: Lookup) -> &'static str {
    match lookup {
        Lookup::EditorTypes => "editor roles",
        Lookup::PolicyTypes => "policy types",
        Lookup::Issues => "issues",
        Lookup::Authors => "authors",
        Lookup::Journals => "journals",
    }
}

#[cfg(test)]
mod tests;
