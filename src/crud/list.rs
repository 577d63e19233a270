//! List state of one section
//!
//! Holds the rows of the last applied response together with its
//! pagination. Every load is tagged with a ticket; a response whose ticket
//! is older than the latest issued one is dropped, so a slow page-2 reply
//! can never overwrite the page-3 rows the user asked for afterwards.

use super::pagination::Pagination;
use crate::api::ApiError;
use crate::domain::{Entity, EntityKind};

// ─────────────────────────────────────────────────────────────────────────────
// Query
// ─────────────────────────────────────────────────────────────────────────────

/// Article status filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Published,
    Draft,
    Featured,
}

impl StatusFilter {
    pub fn as_param(self) -> &'static str {
        match self {
            StatusFilter::Published => "published",
            StatusFilter::Draft => "draft",
            StatusFilter::Featured => "featured",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::Published => "Published",
            StatusFilter::Draft => "Draft",
            StatusFilter::Featured => "Featured",
        }
    }

    /// All → Published → Draft → Featured → All
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(StatusFilter::Published),
            Some(StatusFilter::Published) => Some(StatusFilter::Draft),
            Some(StatusFilter::Draft) => Some(StatusFilter::Featured),
            Some(StatusFilter::Featured) => None,
        }
    }
}

/// Parameters of a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    /// 1-based page
    pub page: u32,
    pub search: String,
    /// Article filter: only this issue
    pub issue: Option<u64>,
    /// Article filter
    pub status: Option<StatusFilter>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            issue: None,
            status: None,
        }
    }
}

impl ListQuery {
    /// Query-string pairs for `kind`. Unpaginated lists take none; filters
    /// are only sent where the backend reads them.
    pub fn params(&self, kind: EntityKind) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !kind.paginated() {
            return params;
        }
        params.push(("page", self.page.max(1).to_string()));

        let search = self.search.trim();
        if kind.searchable() && !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        if kind == EntityKind::Article {
            if let Some(issue) = self.issue {
                params.push(("issue", issue.to_string()));
            }
            if let Some(status) = self.status {
                params.push(("status", status.as_param().to_string()));
            }
        }
        params
    }

    /// Short description of the active filters for the section header
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.search.trim().is_empty() {
            parts.push(format!("search \"{}\"", self.search.trim()));
        }
        if let Some(issue) = self.issue {
            parts.push(format!("issue #{issue}"));
        }
        if let Some(status) = self.status {
            parts.push(status.label().to_lowercase());
        }
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

/// One decoded page of a list response
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub records: Vec<Entity>,
    /// Absent for lists the backend does not paginate
    pub pagination: Option<Pagination>,
}

// ─────────────────────────────────────────────────────────────────────────────
// View state
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing requested yet
    Idle,
    Loading,
    Loaded,
    Failed(String),
    /// Journal-scoped section with no active journal
    NeedsJournal,
}

/// What the table body shows
#[derive(Debug, PartialEq)]
pub enum TableBody<'a> {
    Rows(&'a [Entity]),
    /// A single full-width message row
    Placeholder(&'static str),
}

/// Result of applying a list response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Loaded,
    Failed(String),
    /// Superseded by a newer request
    Stale,
}

pub const NO_RECORDS: &str = "No records found";
pub const LOADING: &str = "Loading…";
pub const LOAD_FAILED: &str = "Could not load records";
pub const NEEDS_JOURNAL: &str = "Select a journal first (Journals tab, m)";

#[derive(Debug)]
pub struct ListView {
    rows: Vec<Entity>,
    pagination: Pagination,
    selected: usize,
    status: ListStatus,
    latest_ticket: u64,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new()
    }
}

impl ListView {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            pagination: Pagination::single(0),
            selected: 0,
            status: ListStatus::Idle,
            latest_ticket: 0,
        }
    }

    /// Start a load; the returned ticket must accompany its response
    pub fn begin(&mut self) -> u64 {
        self.latest_ticket += 1;
        self.status = ListStatus::Loading;
        self.latest_ticket
    }

    /// Apply a response if it belongs to the latest request
    pub fn apply(&mut self, ticket: u64, result: Result<ListPage, ApiError>) -> Applied {
        if ticket != self.latest_ticket {
            tracing::debug!(ticket, latest = self.latest_ticket, "dropping stale list response");
            return Applied::Stale;
        }

        match result {
            Ok(page) => {
                self.pagination = page
                    .pagination
                    .unwrap_or_else(|| Pagination::single(page.records.len()));
                self.rows = page.records;
                self.selected = self.selected.min(self.rows.len().saturating_sub(1));
                self.status = ListStatus::Loaded;
                Applied::Loaded
            }
            Err(err) => {
                let message = err.user_message();
                self.rows.clear();
                self.pagination = Pagination::single(0);
                self.selected = 0;
                self.status = ListStatus::Failed(message.clone());
                Applied::Failed(message)
            }
        }
    }

    /// Clear rows because the section cannot load without a journal
    pub fn needs_journal(&mut self) {
        self.latest_ticket += 1;
        self.rows.clear();
        self.pagination = Pagination::single(0);
        self.selected = 0;
        self.status = ListStatus::NeedsJournal;
    }

    /// Forget everything, e.g. after the active journal changed
    pub fn reset(&mut self) {
        let ticket = self.latest_ticket;
        *self = Self::new();
        // Responses still in flight must stay stale
        self.latest_ticket = ticket + 1;
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == ListStatus::Loading
    }

    pub fn rows(&self) -> &[Entity] {
        &self.rows
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn body(&self) -> TableBody<'_> {
        if !self.rows.is_empty() {
            return TableBody::Rows(&self.rows);
        }
        TableBody::Placeholder(match self.status {
            ListStatus::Idle | ListStatus::Loading => LOADING,
            ListStatus::Loaded => NO_RECORDS,
            ListStatus::Failed(_) => LOAD_FAILED,
            ListStatus::NeedsJournal => NEEDS_JOURNAL,
        })
    }

    /// The page-link control is hidden for single pages and empty lists
    pub fn pagination_visible(&self) -> bool {
        !self.rows.is_empty() && self.pagination.is_visible()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn selected_index(&self) -> Option<usize> {
        (!self.rows.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&Entity> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    /// Replace a row in place after a partial update
    pub fn update_row(&mut self, id: u64, f: impl FnOnce(&mut Entity)) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.record().id() == id) {
            f(row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Author;
    use pretty_assertions::assert_eq;

    fn author(id: u64) -> Entity {
        Entity::Author(Author {
            id,
            ..Default::default()
        })
    }

    fn page(ids: &[u64], pagination: Option<Pagination>) -> ListPage {
        ListPage {
            records: ids.iter().copied().map(author).collect(),
            pagination,
        }
    }

    #[test]
    fn test_empty_response_shows_one_placeholder_and_hides_pagination() {
        let mut view = ListView::new();
        let ticket = view.begin();
        let empty = Pagination {
            current: 1,
            total_pages: 1,
            has_previous: false,
            has_next: false,
            total_count: Some(0),
        };

        assert_eq!(view.apply(ticket, Ok(page(&[], Some(empty)))), Applied::Loaded);
        assert_eq!(view.body(), TableBody::Placeholder(NO_RECORDS));
        assert!(!view.pagination_visible());
        assert!(view.selected().is_none());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut view = ListView::new();
        let older = view.begin();
        let newer = view.begin();

        assert_eq!(view.apply(newer, Ok(page(&[3], None))), Applied::Loaded);
        assert_eq!(view.apply(older, Ok(page(&[2], None))), Applied::Stale);
        assert_eq!(view.rows()[0].record().id(), 3);
    }

    #[test]
    fn test_failure_clears_rows() {
        let mut view = ListView::new();
        let t = view.begin();
        view.apply(t, Ok(page(&[1, 2], None)));

        let t = view.begin();
        let applied = view.apply(t, Err(ApiError::Status(500)));
        assert_eq!(applied, Applied::Failed("Server error (HTTP 500)".into()));
        assert_eq!(view.body(), TableBody::Placeholder(LOAD_FAILED));
    }

    #[test]
    fn test_unpaginated_list_never_shows_pagination() {
        let mut view = ListView::new();
        let t = view.begin();
        view.apply(t, Ok(page(&[1, 2, 3], None)));
        assert!(!view.pagination_visible());
        assert_eq!(view.pagination().total_count, Some(3));
    }

    #[test]
    fn test_selection_clamped_after_shorter_page() {
        let mut view = ListView::new();
        let t = view.begin();
        view.apply(t, Ok(page(&[1, 2, 3], None)));
        view.select_last();
        assert_eq!(view.selected_index(), Some(2));

        let t = view.begin();
        view.apply(t, Ok(page(&[7], None)));
        assert_eq!(view.selected_index(), Some(0));
    }

    #[test]
    fn test_reset_keeps_in_flight_responses_stale() {
        let mut view = ListView::new();
        let t = view.begin();
        view.reset();
        assert_eq!(view.apply(t, Ok(page(&[1], None))), Applied::Stale);
        assert_eq!(view.status(), &ListStatus::Idle);
    }

    #[test]
    fn test_params_for_unpaginated_kind_are_empty() {
        let query = ListQuery {
            page: 3,
            search: "x".into(),
            ..Default::default()
        };
        assert!(query.params(EntityKind::Journal).is_empty());
    }

    #[test]
    fn test_params_only_send_filters_the_backend_reads() {
        let query = ListQuery {
            page: 2,
            search: "  rivers ".into(),
            issue: Some(5),
            status: Some(StatusFilter::Draft),
        };
        assert_eq!(
            query.params(EntityKind::Article),
            vec![
                ("page", "2".to_string()),
                ("search", "rivers".to_string()),
                ("issue", "5".to_string()),
                ("status", "draft".to_string()),
            ]
        );
        // Issues are paginated but not searchable
        assert_eq!(query.params(EntityKind::Issue), vec![("page", "2".to_string())]);
    }

    #[test]
    fn test_status_filter_cycles_back_to_all() {
        let mut f = None;
        for _ in 0..4 {
            f = StatusFilter::cycle(f);
        }
        assert_eq!(f, None);
    }
}
