pub mod store;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::{SortKey, SortSpec};

pub use store::{FileStorage, MemoryStorage, StorageBackend, StorageError, ViewStateStore};

pub const PAGE_SIZE_OPTIONS: [usize; 3] = [10, 50, 100];

/// Page size restricted to the sizes offered by the page-size picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct RowsPerPage(usize);

impl RowsPerPage {
    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for RowsPerPage {
    fn default() -> Self {
        Self(PAGE_SIZE_OPTIONS[0])
    }
}

impl TryFrom<usize> for RowsPerPage {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if PAGE_SIZE_OPTIONS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "invalid page size {value}, expected one of {PAGE_SIZE_OPTIONS:?}"
            ))
        }
    }
}

impl From<RowsPerPage> for usize {
    fn from(value: RowsPerPage) -> Self {
        value.0
    }
}

impl fmt::Display for RowsPerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the comments table remembers between sessions. Serialized as
/// `{"page":0,"rowsPerPage":10,"search":"","sort":{"key":null,"direction":null}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub page: usize,
    pub rows_per_page: RowsPerPage,
    pub search: String,
    pub sort: SortSpec,
}

impl ViewState {
    /// New page size; always goes back to the first page.
    pub fn with_rows_per_page(self, rows_per_page: RowsPerPage) -> Self {
        Self {
            page: 0,
            rows_per_page,
            ..self
        }
    }

    /// New search text; the result set changes so paging restarts.
    pub fn with_search(self, search: impl Into<String>) -> Self {
        Self {
            page: 0,
            search: search.into(),
            ..self
        }
    }

    pub fn with_sort_toggled(self, key: SortKey) -> Self {
        Self {
            sort: self.sort.toggle(key),
            ..self
        }
    }

    /// Moves to `page` if it exists among `total_pages`, `None` otherwise.
    pub fn with_page(self, page: usize, total_pages: usize) -> Option<Self> {
        if page < total_pages {
            Some(Self { page, ..self })
        } else {
            None
        }
    }

    /// Pulls a page that no longer exists back onto the last one.
    pub fn clamped(self, total_pages: usize) -> Self {
        let last = total_pages.saturating_sub(1);
        if self.page > last {
            Self { page: last, ..self }
        } else {
            self
        }
    }
}

#[derive(Debug, Error)]
pub enum StateParseError {
    #[error("stored view state is empty")]
    Empty,

    #[error("stored view state is malformed: {source}")]
    Malformed {
        #[source]
        source: serde_json::Error,
    },
}

pub fn parse_view_state(raw: &str) -> Result<ViewState, StateParseError> {
    if raw.trim().is_empty() {
        return Err(StateParseError::Empty);
    }
    serde_json::from_str(raw).map_err(|source| StateParseError::Malformed { source })
}

pub fn serialize_view_state(state: &ViewState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}
