//! Selection and paging state driven by user interaction
//!
//! The controller is the only thing that mutates a [`FilterSelection`]. Any
//! change to the selection sends the table back to its first page.

use crate::error::Result;
use crate::filter::{Dimension, FilterSelection};
use crate::models::ChangeTag;
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct SelectionController {
    selection: FilterSelection,
    page: usize,
    page_size: usize,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl SelectionController {
    pub fn new(page_size: usize) -> Self {
        Self {
            selection: FilterSelection::default(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_selection(selection: FilterSelection, page_size: usize) -> Self {
        Self {
            selection,
            ..Self::new(page_size)
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Current page, 1-based
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Add or remove `value` from one dimension and return to page 1
    pub fn toggle(&mut self, dimension: Dimension, value: &str) -> Result<bool> {
        let selected = self.selection.toggle(dimension, value)?;
        debug!(%dimension, value, selected, "Toggled filter");
        self.page = 1;
        Ok(selected)
    }

    pub fn toggle_change_type(&mut self, tag: ChangeTag) -> bool {
        let selected = self.selection.toggle_change_type(tag);
        debug!(dimension = "change-type", value = %tag, selected, "Toggled filter");
        self.page = 1;
        selected
    }

    /// Reset all five dimensions and return to page 1
    pub fn clear(&mut self) {
        self.selection.clear();
        self.page = 1;
        debug!("Cleared all filters");
    }

    pub fn total_pages(&self, row_count: usize) -> usize {
        row_count.div_ceil(self.page_size).max(1)
    }

    pub fn set_page(&mut self, page: usize, row_count: usize) {
        self.page = page.clamp(1, self.total_pages(row_count));
    }

    pub fn next_page(&mut self, row_count: usize) {
        self.set_page(self.page + 1, row_count);
    }

    pub fn previous_page(&mut self, row_count: usize) {
        self.set_page(self.page.saturating_sub(1), row_count);
    }

    /// Rows shown on the current page
    pub fn page_slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        let start = (self.page - 1) * self.page_size;
        if start >= rows.len() {
            return &[];
        }
        let end = (start + self.page_size).min(rows.len());
        &rows[start..end]
    }
}
