use log::warn;

use crate::app::DEFAULT_ROWS_PER_PAGE;

pub const ROWS_PER_PAGE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// 1-based page cursor over the contact list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    rows_per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_PAGE)
    }
}

impl Pagination {
    pub fn new(rows_per_page: usize) -> Self {
        let rows_per_page = if ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
            rows_per_page
        } else {
            warn!("Unsupported page size {rows_per_page}, using {DEFAULT_ROWS_PER_PAGE}");
            DEFAULT_ROWS_PER_PAGE
        };
        Self {
            page: 1,
            rows_per_page,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.rows_per_page)
    }

    pub fn set_page(&mut self, page: usize, len: usize) {
        self.page = page.clamp(1, self.total_pages(len).max(1));
    }

    /// Changes the page size and goes back to the first page. Sizes outside
    /// [`ROWS_PER_PAGE_OPTIONS`] are ignored.
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> bool {
        if !ROWS_PER_PAGE_OPTIONS.contains(&rows_per_page) {
            return false;
        }
        self.rows_per_page = rows_per_page;
        self.page = 1;
        true
    }

    /// Keeps the cursor on an existing page after the list changed size.
    pub fn clamp(&mut self, len: usize) {
        self.set_page(self.page, len);
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = ((self.page - 1) * self.rows_per_page).min(items.len());
        let end = (start + self.rows_per_page).min(items.len());
        &items[start..end]
    }
}
