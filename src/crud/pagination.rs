//! Pagination descriptor and the page-link window
//!
//! The window always shows the first and last page and up to two pages on
//! each side of the current one. Each collapsed range is replaced by a
//! single ellipsis placed next to the window edge.

use serde::Deserialize;

/// Pagination block of a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    pub current: u32,
    pub total_pages: u32,
    #[serde(default)]
    pub has_previous: bool,
    #[serde(default)]
    pub has_next: bool,
    /// Only some endpoints report the total number of records
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl Pagination {
    /// Descriptor for an unpaginated list that fits on one page
    pub fn single(count: usize) -> Self {
        Self {
            current: 1,
            total_pages: 1,
            has_previous: false,
            has_next: false,
            total_count: Some(count as u64),
        }
    }

    /// Whether the page-link control should be drawn at all
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    /// Page-link window for this descriptor
    pub fn links(&self) -> Vec<PageLink> {
        page_window(self)
    }

    /// "21-40 / 57"; `None` when the total is unknown
    pub fn results_info(&self, page_size: u32, rows_on_page: usize) -> Option<String> {
        let total = self.total_count?;
        if total == 0 {
            return Some("0 / 0".to_string());
        }
        let start = u64::from(self.current.saturating_sub(1)) * u64::from(page_size) + 1;
        let end = (start + rows_on_page as u64).saturating_sub(1).min(total);
        Some(format!("{}-{} / {}", start, end.max(start), total))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Prev(u32),
    Page(u32),
    Current(u32),
    Ellipsis,
    Next(u32),
}

impl PageLink {
    /// Page to load when the link is activated
    pub fn target(&self) -> Option<u32> {
        match *self {
            PageLink::Prev(p) | PageLink::Page(p) | PageLink::Next(p) => Some(p),
            PageLink::Current(_) | PageLink::Ellipsis => None,
        }
    }
}

/// Build the page-link window: `Prev`, first, `…`, current ± 2, `…`, last, `Next`.
pub fn page_window(p: &Pagination) -> Vec<PageLink> {
    let mut links = Vec::new();
    let current = i64::from(p.current);

    if p.has_previous {
        links.push(PageLink::Prev(p.current.saturating_sub(1).max(1)));
    }

    for i in 1..=p.total_pages {
        let distance = (i64::from(i) - current).abs();
        if i == p.current {
            links.push(PageLink::Current(i));
        } else if i == 1 || i == p.total_pages || distance <= 2 {
            links.push(PageLink::Page(i));
        } else if distance == 3 {
            links.push(PageLink::Ellipsis);
        }
    }

    if p.has_next {
        links.push(PageLink::Next(p.current + 1));
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use PageLink::*;

    fn pagination(current: u32, total_pages: u32) -> Pagination {
        Pagination {
            current,
            total_pages,
            has_previous: current > 1,
            has_next: current < total_pages,
            total_count: None,
        }
    }

    #[test]
    fn test_window_middle_page() {
        assert_eq!(
            page_window(&pagination(5, 10)),
            vec![
                Prev(4),
                Page(1),
                Ellipsis,
                Page(3),
                Page(4),
                Current(5),
                Page(6),
                Page(7),
                Ellipsis,
                Page(10),
                Next(6),
            ]
        );
    }

    #[test]
    fn test_window_page_numbers_are_first_last_and_neighbours() {
        let pages: Vec<u32> = page_window(&pagination(5, 10))
            .iter()
            .filter_map(|l| match *l {
                Page(n) | Current(n) => Some(n),
                _ => None,
            })
            .collect();
        assert_eq!(pages, vec![1, 3, 4, 5, 6, 7, 10]);
    }

    #[test]
    fn test_window_first_page() {
        assert_eq!(
            page_window(&pagination(1, 8)),
            vec![Current(1), Page(2), Page(3), Ellipsis, Page(8), Next(2)]
        );
    }

    #[test]
    fn test_window_last_page() {
        assert_eq!(
            page_window(&pagination(8, 8)),
            vec![Prev(7), Page(1), Ellipsis, Page(6), Page(7), Current(8)]
        );
    }

    #[test]
    fn test_window_no_ellipsis_when_gap_is_one_page() {
        // Every page is an endpoint or within two of the current page
        assert_eq!(
            page_window(&pagination(4, 7)),
            vec![
                Prev(3),
                Page(1),
                Page(2),
                Page(3),
                Current(4),
                Page(5),
                Page(6),
                Page(7),
                Next(5)
            ]
        );
    }

    #[test]
    fn test_single_page_hidden() {
        assert!(!Pagination::single(0).is_visible());
        assert!(pagination(1, 2).is_visible());
    }

    #[test]
    fn test_results_info() {
        let mut p = pagination(2, 3);
        p.total_count = Some(45);
        assert_eq!(p.results_info(20, 20), Some("21-40 / 45".to_string()));

        p.current = 3;
        assert_eq!(p.results_info(20, 5), Some("41-45 / 45".to_string()));

        p.total_count = None;
        assert_eq!(p.results_info(20, 5), None);
    }

    #[test]
    fn test_link_targets() {
        assert_eq!(Next(3).target(), Some(3));
        assert_eq!(Current(2).target(), None);
        assert_eq!(Ellipsis.target(), None);
    }
}
