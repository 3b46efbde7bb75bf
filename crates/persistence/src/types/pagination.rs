//! Offset pagination for store queries.

use serde::{Deserialize, Serialize};

/// Which slice of the ordered result to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of matching records to skip.
    pub offset: usize,

    /// Maximum number of records to return. `None` returns the rest.
    pub limit: Option<usize>,
}

impl Pagination {
    /// Creates a bounded page request.
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    /// Returns every record from the start.
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: None,
        }
    }

    /// Returns the request for the page after this one.
    pub fn next(&self) -> Option<Self> {
        self.limit.map(|limit| Self {
            offset: self.offset.saturating_add(limit),
            limit: Some(limit),
        })
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

/// Position of a page within the full result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Offset of the first returned record.
    pub offset: usize,

    /// Offset of the next page, if more records match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_offset: Option<usize>,

    /// Total number of matching records, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl PageInfo {
    /// Returns true if more records follow this page.
    pub fn has_next(&self) -> bool {
        self.next_offset.is_some()
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The records on this page.
    pub items: Vec<T>,

    /// Position information.
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    /// Creates a page.
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// Creates an empty page.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            page_info: PageInfo::default(),
        }
    }

    /// Returns the number of items on this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if this page holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maps the items, keeping the page position.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}

/// Slices an already ordered match list into a page.
///
/// `fetched` holds the records at `pagination.offset` onwards, with at most
/// one record beyond the limit so that a following page can be detected.
pub fn paginate<T>(
    mut fetched: Vec<T>,
    pagination: Pagination,
    total: Option<usize>,
) -> Page<T> {
    let has_more = match pagination.limit {
        Some(limit) if fetched.len() > limit => {
            fetched.truncate(limit);
            true
        }
        _ => false,
    };

    let next_offset = if has_more {
        Some(pagination.offset.saturating_add(fetched.len()))
    } else {
        None
    };

    Page::new(
        fetched,
        PageInfo {
            offset: pagination.offset,
            next_offset,
            total,
        },
    )
}
