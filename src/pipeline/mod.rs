//! Filter, sort and paginate the fetched comments into the slice the table
//! shows. Every step is a pure function of its inputs; clamping an
//! out-of-range page is left to the caller, which gets `total_pages` back.

pub mod sort;

use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::debug;

use crate::model::Comment;

pub use sort::{SortDirection, SortKey, SortSpec};

/// 1-based, inclusive bounds of the visible rows within the filtered set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListView {
    pub visible: Vec<Comment>,
    pub total_pages: usize,
    pub total: usize,
    /// `None` when nothing is visible; callers show "No results" instead.
    pub range: Option<PageRange>,
}

impl ListView {
    pub fn range_start(&self) -> Option<usize> {
        self.range.map(|r| r.start)
    }

    pub fn range_end(&self) -> Option<usize> {
        self.range.map(|r| r.end)
    }
}

/// JSON carries the range as flat `rangeStart`/`rangeEnd`, both null when
/// nothing is visible.
impl Serialize for ListView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ListView", 5)?;
        s.serialize_field("visible", &self.visible)?;
        s.serialize_field("totalPages", &self.total_pages)?;
        s.serialize_field("rangeStart", &self.range_start())?;
        s.serialize_field("rangeEnd", &self.range_end())?;
        s.serialize_field("total", &self.total)?;
        s.end()
    }
}

/// Case-insensitive substring match on name, email or body.
pub fn matches_search(comment: &Comment, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    comment.name.to_lowercase().contains(needle_lower)
        || comment.email.to_lowercase().contains(needle_lower)
        || comment.body.to_lowercase().contains(needle_lower)
}

pub fn filter<'a>(records: &'a [Comment], search: &str) -> Vec<&'a Comment> {
    let needle = search.to_lowercase();
    records
        .iter()
        .filter(|c| matches_search(c, &needle))
        .collect()
}

pub fn sort<'a>(mut rows: Vec<&'a Comment>, spec: SortSpec) -> Vec<&'a Comment> {
    sort::sort_rows(&mut rows, spec);
    rows
}

pub fn total_pages(count: usize, rows_per_page: usize) -> usize {
    if rows_per_page == 0 {
        return 0;
    }
    count.div_ceil(rows_per_page)
}

/// Rows `[page*rows_per_page, page*rows_per_page + rows_per_page)`, clipped.
pub fn paginate<T: Clone>(rows: &[T], page: usize, rows_per_page: usize) -> Vec<T> {
    let start = page.saturating_mul(rows_per_page);
    if start >= rows.len() {
        return Vec::new();
    }
    let end = start.saturating_add(rows_per_page).min(rows.len());
    rows[start..end].to_vec()
}

pub fn page_range(page: usize, rows_per_page: usize, total: usize) -> Option<PageRange> {
    let start = page.saturating_mul(rows_per_page);
    if rows_per_page == 0 || start >= total {
        return None;
    }
    Some(PageRange {
        start: start + 1,
        end: (page + 1).saturating_mul(rows_per_page).min(total),
    })
}

pub fn run(
    records: &[Comment],
    search: &str,
    spec: SortSpec,
    page: usize,
    rows_per_page: usize,
) -> ListView {
    let sorted = sort(filter(records, search), spec);
    let total = sorted.len();
    let total_pages = total_pages(total, rows_per_page);
    let visible = paginate(&sorted, page, rows_per_page)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    let range = page_range(page, rows_per_page, total);

    debug!(
        records = records.len(),
        total,
        total_pages,
        page,
        visible = visible.len(),
        "pipeline run"
    );

    ListView {
        visible,
        total_pages,
        total,
        range,
    }
}
