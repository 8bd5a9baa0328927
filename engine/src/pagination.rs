use error_stack::Report;
use serde::{Deserialize, Serialize};
use std::error::Error;
use utoipa::ToSchema;

const fn default_page() -> u64 {
    1
}

/// Raw page request as sent by a caller. Converted into a [`PageWindow`] before any
/// store is touched.
#[derive(Debug, Deserialize, ToSchema, PartialEq, Eq, Clone, Copy)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u64,
    pub page_size: Option<u64>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: None,
        }
    }
}

impl Pagination {
    pub fn with_default_page_size(page: u64) -> Self {
        Self {
            page,
            page_size: None,
        }
    }

    pub fn with_page_size(page: u64, page_size: u64) -> Self {
        Self {
            page,
            page_size: Some(page_size),
        }
    }

    /// Applies `limits` to this request. A missing page size falls back to the default and a
    /// page size over the max is clamped to the max.
    pub fn window(&self, limits: PageLimits) -> Result<PageWindow, PageError> {
        let page_size = self
            .page_size
            .unwrap_or(limits.default_page_size)
            .min(limits.max_page_size);
        PageWindow::new(self.page, page_size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl PageLimits {
    pub const fn new(default_page_size: u64, max_page_size: u64) -> Self {
        Self {
            default_page_size,
            max_page_size,
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("page must be 1 or greater")]
    PageNumber,
    #[error("page_size must be 1 or greater")]
    PageSize,
}

/// A validated, 1-based page of a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u64,
    page_size: u64,
}

impl PageWindow {
    pub fn new(page: u64, page_size: u64) -> Result<Self, PageError> {
        if page < 1 {
            return Err(PageError::PageNumber);
        }
        if page_size < 1 {
            return Err(PageError::PageSize);
        }
        Ok(Self { page, page_size })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Number of items that come before this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> PagedList<T> {
    pub fn new(items: Vec<T>, total_count: u64, window: PageWindow) -> Self {
        Self {
            items,
            total_count,
            page: window.page(),
            page_size: window.page_size(),
            total_pages: total_count.div_ceil(window.page_size()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An ordered collection that can report its size and hand back a bounded range of itself.
/// Implementations backed by a database should push the offset/limit down to the query.
pub trait PageSource: Sync {
    type Item: Send;
    type Error: Error + Send + Sync + 'static;

    fn count(&self) -> impl Future<Output = Result<u64, Report<Self::Error>>> + Send;

    fn fetch(
        &self,
        window: PageWindow,
    ) -> impl Future<Output = Result<Vec<Self::Item>, Report<Self::Error>>> + Send;
}

/// Counts `source` once and fetches the single range covered by `window`.
/// A window past the last page yields no items and skips the range fetch.
pub async fn paginate<S>(
    source: &S,
    window: PageWindow,
) -> Result<PagedList<S::Item>, Report<S::Error>>
where
    S: PageSource,
{
    let total_count = source.count().await?;

    let items = if window.offset() < total_count {
        source.fetch(window).await?
    } else {
        Vec::new()
    };

    Ok(PagedList::new(items, total_count, window))
}
