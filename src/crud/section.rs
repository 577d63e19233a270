//! Per-section controller state
//!
//! One `SectionState` per entity tab: its list, the query that produced
//! it, the search debounce and the pending-delete slot. Methods return the
//! `Command` to run instead of performing I/O.

use super::command::Command;
use super::confirm::{DeleteConfirmation, DeleteTarget};
use super::debounce::Debouncer;
use super::list::{Applied, ListPage, ListQuery, ListView, StatusFilter};
use crate::api::ApiError;
use crate::domain::{Choice, EntityKind};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct SectionState {
    kind: EntityKind,
    pub list: ListView,
    pub query: ListQuery,
    pub confirm: DeleteConfirmation,
    searching: bool,
    debounce: Debouncer,
    /// Issues of the active journal, for the article issue filter
    issue_choices: Vec<Choice>,
}

impl SectionState {
    pub fn new(kind: EntityKind, debounce: Duration) -> Self {
        Self {
            kind,
            list: ListView::new(),
            query: ListQuery::default(),
            confirm: DeleteConfirmation::default(),
            searching: false,
            debounce: Debouncer::new(debounce),
            issue_choices: Vec::new(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    // ─── Loading ─────────────────────────────────────────────────────────

    /// Reload the current page. Journal-scoped sections without a journal
    /// show a placeholder and issue nothing.
    pub fn load(&mut self, journal: Option<u64>) -> Option<Command> {
        if self.kind.journal_scoped() && journal.is_none() {
            self.list.needs_journal();
            return None;
        }
        let ticket = self.list.begin();
        Some(Command::LoadList {
            kind: self.kind,
            ticket,
            query: self.query.clone(),
            journal,
        })
    }

    pub fn goto_page(&mut self, page: u32, journal: Option<u64>) -> Option<Command> {
        let last = self.list.pagination().total_pages.max(1);
        self.query.page = page.clamp(1, last);
        self.load(journal)
    }

    pub fn next_page(&mut self, journal: Option<u64>) -> Option<Command> {
        if !self.list.pagination().has_next {
            return None;
        }
        self.goto_page(self.query.page + 1, journal)
    }

    pub fn prev_page(&mut self, journal: Option<u64>) -> Option<Command> {
        if !self.list.pagination().has_previous {
            return None;
        }
        self.goto_page(self.query.page.saturating_sub(1), journal)
    }

    pub fn first_page(&mut self, journal: Option<u64>) -> Option<Command> {
        if self.query.page == 1 {
            return None;
        }
        self.goto_page(1, journal)
    }

    pub fn last_page(&mut self, journal: Option<u64>) -> Option<Command> {
        let last = self.list.pagination().total_pages;
        if self.query.page >= last {
            return None;
        }
        self.goto_page(last, journal)
    }

    /// Apply a list reply addressed to this section
    pub fn apply_list(&mut self, ticket: u64, result: Result<ListPage, ApiError>) -> Applied {
        let applied = self.list.apply(ticket, result);
        if applied == Applied::Loaded {
            // Server may have clamped an out-of-range page
            self.query.page = self.list.pagination().current.max(1);
        }
        applied
    }

    /// Forget rows and filters, e.g. after the active journal changed
    pub fn reset(&mut self) {
        self.list.reset();
        self.query = ListQuery::default();
        self.confirm.cancel();
        self.debounce.cancel();
        self.searching = false;
        self.issue_choices.clear();
    }

    // ─── Search ──────────────────────────────────────────────────────────

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// Focus the search box; false for sections without search
    pub fn begin_search(&mut self) -> bool {
        self.searching = self.kind.searchable();
        self.searching
    }

    pub fn search_input(&mut self, c: char, now: Instant) {
        self.query.search.push(c);
        self.debounce.arm(now);
    }

    pub fn search_backspace(&mut self, now: Instant) {
        if self.query.search.pop().is_some() {
            self.debounce.arm(now);
        }
    }

    /// Enter: search immediately
    pub fn submit_search(&mut self, journal: Option<u64>) -> Option<Command> {
        self.searching = false;
        self.debounce.cancel();
        self.query.page = 1;
        self.load(journal)
    }

    /// Esc: leave the search box; a pending debounced search still fires
    pub fn end_search(&mut self) {
        self.searching = false;
    }

    /// Clear the search text and reload if it was set
    pub fn clear_search(&mut self, journal: Option<u64>) -> Option<Command> {
        self.searching = false;
        self.debounce.cancel();
        if self.query.search.is_empty() {
            return None;
        }
        self.query.search.clear();
        self.query.page = 1;
        self.load(journal)
    }

    /// Called every UI tick
    pub fn tick(&mut self, now: Instant, journal: Option<u64>) -> Option<Command> {
        if !self.debounce.poll(now) {
            return None;
        }
        self.query.page = 1;
        self.load(journal)
    }

    // ─── Article filters ─────────────────────────────────────────────────

    pub fn cycle_status(&mut self, journal: Option<u64>) -> Option<Command> {
        if self.kind != EntityKind::Article {
            return None;
        }
        self.query.status = StatusFilter::cycle(self.query.status);
        self.query.page = 1;
        self.load(journal)
    }

    pub fn set_issue_choices(&mut self, choices: Vec<Choice>) {
        self.issue_choices = choices;
    }

    pub fn has_issue_choices(&self) -> bool {
        !self.issue_choices.is_empty()
    }

    /// All issues → first → … → last → all issues
    pub fn cycle_issue(&mut self, journal: Option<u64>) -> Option<Command> {
        if self.kind != EntityKind::Article || self.issue_choices.is_empty() {
            return None;
        }
        let ids: Vec<u64> = self
            .issue_choices
            .iter()
            .filter_map(|c| c.value.parse().ok())
            .collect();
        let next = match self.query.issue.and_then(|cur| ids.iter().position(|id| *id == cur)) {
            None => ids.first().copied(),
            Some(pos) => ids.get(pos + 1).copied(),
        };
        self.query.issue = next;
        self.query.page = 1;
        self.load(journal)
    }

    /// Label of the active issue filter
    pub fn issue_label(&self) -> Option<&str> {
        let id = self.query.issue?.to_string();
        self.issue_choices
            .iter()
            .find(|c| c.value == id)
            .map(|c| c.label.as_str())
    }

    // ─── Delete ──────────────────────────────────────────────────────────

    /// Arm the delete slot with the selected row
    pub fn request_delete(&mut self) -> Option<&DeleteTarget> {
        let entity = self.list.selected()?;
        let record = entity.record();
        let target = DeleteTarget {
            kind: self.kind,
            id: record.id(),
            label: record.label(),
        };
        self.confirm.request(target);
        self.confirm.pending()
    }

    pub fn confirm_delete(&mut self, journal: Option<u64>) -> Option<Command> {
        let target = self.confirm.confirm()?;
        Some(Command::Delete { target, journal })
    }
}
