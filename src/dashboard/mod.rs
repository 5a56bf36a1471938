//! The comments screen: fetched records plus the persisted view state.
//! Every state change is written back to the store before the next event.

use std::ops::Range;

use tracing::{debug, warn};

use crate::model::Comment;
use crate::pipeline::{self, ListView, SortKey};
use crate::state::{RowsPerPage, StorageBackend, ViewState, ViewStateStore};

pub struct Dashboard<B> {
    records: Vec<Comment>,
    state: ViewState,
    store: ViewStateStore<B>,
}

impl<B: StorageBackend> Dashboard<B> {
    /// Mounts the view: restores the stored state (or defaults) over `records`.
    pub fn mount(records: Vec<Comment>, store: ViewStateStore<B>) -> Self {
        let state = store.load();
        debug!(?state, records = records.len(), "dashboard mounted");
        Self {
            records,
            state,
            store,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn records(&self) -> &[Comment] {
        &self.records
    }

    pub fn store(&self) -> &ViewStateStore<B> {
        &self.store
    }

    pub fn view(&self) -> ListView {
        pipeline::run(
            &self.records,
            &self.state.search,
            self.state.sort,
            self.state.page,
            self.state.rows_per_page.get(),
        )
    }

    pub fn total_pages(&self) -> usize {
        let count = pipeline::filter(&self.records, &self.state.search).len();
        pipeline::total_pages(count, self.state.rows_per_page.get())
    }

    pub fn set_search(&mut self, search: &str) {
        let next = self.state.clone().with_search(search);
        self.commit(next);
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        let next = self.state.clone().with_sort_toggled(key);
        self.commit(next);
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: RowsPerPage) {
        let next = self.state.clone().with_rows_per_page(rows_per_page);
        self.commit(next);
    }

    /// Moves to `page` when it exists; out-of-range requests are ignored.
    pub fn change_page(&mut self, page: usize) -> bool {
        let total_pages = self.total_pages();
        match self.state.clone().with_page(page, total_pages) {
            Some(next) => {
                self.commit(next);
                true
            }
            None => {
                debug!(page, total_pages, "page request out of range, ignored");
                false
            }
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.change_page(self.state.page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> bool {
        match self.state.page.checked_sub(1) {
            Some(page) => self.change_page(page),
            None => false,
        }
    }

    /// Brings a restored page back into range after the result set shrank.
    pub fn clamp_page(&mut self) -> bool {
        let total_pages = self.total_pages();
        let next = self.state.clone().clamped(total_pages);
        if next == self.state {
            return false;
        }
        debug!(from = self.state.page, to = next.page, "clamping page");
        self.commit(next);
        true
    }

    /// Page buttons shown around the current page: previous, current, next.
    pub fn page_window(&self) -> Range<usize> {
        page_window(self.state.page, self.total_pages())
    }

    pub fn reset(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!("failed to clear stored view state: {e}");
        }
        self.state = ViewState::default();
    }

    fn commit(&mut self, next: ViewState) {
        if next == self.state {
            return;
        }
        self.state = next;
        if let Err(e) = self.store.save(&self.state) {
            warn!("failed to persist view state: {e}");
        }
    }
}

pub fn page_window(page: usize, total_pages: usize) -> Range<usize> {
    let start = page.saturating_sub(1);
    let end = total_pages.min(page.saturating_add(2));
    start..end.max(start)
}
