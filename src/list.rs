//! List view state machine
//!
//! Pure view-state over a fetched mapping collection: search filter, sort
//! column and order, pagination window, and the browsing / editing /
//! QR-viewing modes. Rendering is the caller's job; everything here is
//! deterministic and side-effect free so the list behavior is testable
//! without a terminal.
//!
//! The pipeline is fixed: filter -> sort -> page slice. Filter and sort
//! state compose with pagination but never depend on it.

use crate::model::UrlMapping;

/// Selectable page sizes, smallest is the default
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 15, 25];

/// Column the list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Path,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Interaction mode of the list
///
/// At most one row is in edit at a time; entering edit for another row
/// replaces the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMode {
    Browsing,
    Editing { path: String },
    ShowingQr { path: String },
}

/// View state for the mapping list
#[derive(Debug, Clone)]
pub struct ListView {
    mode: ListMode,
    search: String,
    sort_column: SortColumn,
    sort_order: SortOrder,
    page: usize,
    rows_per_page: usize,
}

impl Default for ListView {
    fn default() -> Self {
        ListView {
            mode: ListMode::Browsing,
            search: String::new(),
            sort_column: SortColumn::Path,
            sort_order: SortOrder::Ascending,
            page: 0,
            rows_per_page: ROWS_PER_PAGE_OPTIONS[0],
        }
    }
}

impl ListView {
    pub fn new() -> Self {
        ListView::default()
    }

    pub fn mode(&self) -> &ListMode {
        &self.mode
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn sort_state(&self) -> (SortColumn, SortOrder) {
        (self.sort_column, self.sort_order)
    }

    /// Sets the case-insensitive substring filter on `path`
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Applies sort-button semantics: re-sorting the active column toggles
    /// the order, switching columns resets to ascending
    pub fn sort_by(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_order = match self.sort_order {
                SortOrder::Ascending => SortOrder::Descending,
                SortOrder::Descending => SortOrder::Ascending,
            };
        } else {
            self.sort_column = column;
            self.sort_order = SortOrder::Ascending;
        }
    }

    /// Sets an explicit sort state, bypassing the toggle semantics
    pub fn set_sort(&mut self, column: SortColumn, order: SortOrder) {
        self.sort_column = column;
        self.sort_order = order;
    }

    /// Changes the page size; unknown sizes are ignored
    pub fn set_rows_per_page(&mut self, rows: usize) {
        if ROWS_PER_PAGE_OPTIONS.contains(&rows) {
            self.rows_per_page = rows;
        }
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Advances one page when more filtered rows exist past the window
    pub fn next_page(&mut self, filtered_total: usize) {
        if (self.page + 1) * self.rows_per_page < filtered_total {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Number of rows surviving the current filter
    pub fn filtered_count(&self, rows: &[UrlMapping]) -> usize {
        rows.iter().filter(|row| self.matches(row)).count()
    }

    pub fn total_pages(&self, filtered_total: usize) -> usize {
        filtered_total.div_ceil(self.rows_per_page).max(1)
    }

    /// Rows of the current page: filter -> sort -> slice
    ///
    /// When the current page would render empty (filter narrowed the list,
    /// or its last row was deleted), the window snaps back to the first
    /// page before slicing.
    pub fn visible<'a>(&mut self, rows: &'a [UrlMapping]) -> Vec<&'a UrlMapping> {
        let mut filtered: Vec<&UrlMapping> =
            rows.iter().filter(|row| self.matches(row)).collect();

        filtered.sort_by(|a, b| {
            let ordering = match self.sort_column {
                SortColumn::Path => a.path.cmp(&b.path),
                SortColumn::Url => a.url.cmp(&b.url),
            };
            match self.sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });

        if self.page > 0 && self.page * self.rows_per_page >= filtered.len() {
            self.page = 0;
        }

        filtered
            .into_iter()
            .skip(self.page * self.rows_per_page)
            .take(self.rows_per_page)
            .collect()
    }

    /// Enters edit mode for a row; refused when the viewer may not modify
    /// it or the row is gone. Replaces any row already in edit.
    pub fn begin_edit(&mut self, rows: &[UrlMapping], path: &str) -> bool {
        if matches!(self.mode, ListMode::ShowingQr { .. }) {
            return false;
        }
        match rows.iter().find(|row| row.path == path) {
            Some(row) if row.modify => {
                self.mode = ListMode::Editing {
                    path: path.to_string(),
                };
                true
            }
            _ => false,
        }
    }

    /// Leaves edit mode without saving
    pub fn cancel_edit(&mut self) {
        if matches!(self.mode, ListMode::Editing { .. }) {
            self.mode = ListMode::Browsing;
        }
    }

    /// Leaves edit mode after a save
    pub fn finish_edit(&mut self) {
        self.cancel_edit();
    }

    /// Opens the QR view for a row; only reachable from browsing
    pub fn show_qr(&mut self, rows: &[UrlMapping], path: &str) -> bool {
        if self.mode != ListMode::Browsing {
            return false;
        }
        if rows.iter().any(|row| row.path == path) {
            self.mode = ListMode::ShowingQr {
                path: path.to_string(),
            };
            true
        } else {
            false
        }
    }

    pub fn close_qr(&mut self) {
        if matches!(self.mode, ListMode::ShowingQr { .. }) {
            self.mode = ListMode::Browsing;
        }
    }

    fn matches(&self, row: &UrlMapping) -> bool {
        row.path
            .to_lowercase()
            .contains(&self.search.to_lowercase())
    }
}
