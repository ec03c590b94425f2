//! Cursor pagination shared by every list endpoint.
//!
//! A request's `limit`/`cursor` query parameters become a [`PageWindow`]:
//! a page size plus an optional "strictly after this id" bound. Stores merge
//! the bound with their own filters, order by id (or by a ranking with id as
//! tie-breaker) and truncate to the limit. Entity ids are UUIDv7 strings, so
//! byte-wise string order is creation order.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::request::Parts,
};
use serde::{Deserialize, Serialize};

/// Page size used when `limit` is absent or not a positive integer
pub const DEFAULT_LIMIT: usize = 10;

/// Anything that can be paged over by its identity
pub trait Identified {
    fn id(&self) -> &str;
}

/// Raw pagination query parameters, kept as strings so bad input never
/// rejects the request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub cursor: Option<String>,
}

/// A bounded result window: at most `limit` entities with id > `after`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageWindow {
    limit: usize,
    after: Option<String>,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::first(DEFAULT_LIMIT)
    }
}

impl PageWindow {
    /// Builds a window from raw request input.
    ///
    /// Never fails: a missing, zero, negative or non-numeric limit becomes
    /// [`DEFAULT_LIMIT`], and an empty cursor means "first page". The cursor
    /// is not validated; an unknown value simply selects whatever sorts after it.
    pub fn new(limit: Option<&str>, cursor: Option<&str>) -> Self {
        let limit = limit
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| *n > 0)
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
            .unwrap_or(DEFAULT_LIMIT);

        let after = cursor
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string());

        Self { limit, after }
    }

    /// First page of the given size
    pub fn first(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            after: None,
        }
    }

    /// Window continuing after `cursor`
    pub fn after(limit: usize, cursor: impl Into<String>) -> Self {
        Self {
            limit: limit.max(1),
            after: Some(cursor.into()),
        }
    }

    pub fn from_params(params: &PageParams) -> Self {
        Self::new(params.limit.as_deref(), params.cursor.as_deref())
    }

    /// Clamps the page size to `max`
    pub fn capped(mut self, max: usize) -> Self {
        self.limit = self.limit.min(max.max(1));
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Cursor the window starts after, if any
    pub fn cursor(&self) -> Option<&str> {
        self.after.as_deref()
    }

    /// Whether an entity with this id falls inside the window's lower bound
    pub fn admits(&self, id: &str) -> bool {
        match &self.after {
            Some(cursor) => id > cursor.as_str(),
            None => true,
        }
    }

    /// Applies the window to items already in their final order.
    pub fn select<T, I>(&self, items: I) -> Vec<T>
    where
        T: Identified,
        I: IntoIterator<Item = T>,
    {
        items
            .into_iter()
            .filter(|item| self.admits(item.id()))
            .take(self.limit)
            .collect()
    }

    /// Cursor for the following page.
    ///
    /// Only a full page yields a cursor; a short page means the traversal is
    /// exhausted.
    pub fn next_cursor<T: Identified>(&self, page: &[T]) -> Option<String> {
        if page.len() == self.limit {
            page.last().map(|item| item.id().to_string())
        } else {
            None
        }
    }
}

/// Largest page size handed out by the [`Page`] extractor
#[derive(Debug, Clone, Copy)]
pub struct MaxPageLimit(pub usize);

/// Extractor yielding the request's [`PageWindow`], capped by [`MaxPageLimit`]
#[derive(Debug, Clone)]
pub struct Page(pub PageWindow);

#[async_trait]
impl<S> FromRequestParts<S> for Page
where
    S: Send + Sync,
    MaxPageLimit: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = Query::<PageParams>::try_from_uri(&parts.uri)
            .map(|Query(params)| params)
            .unwrap_or_default();
        let MaxPageLimit(max) = MaxPageLimit::from_ref(state);

        Ok(Page(PageWindow::from_params(&params).capped(max)))
    }
}

/// Generic list response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub data: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T: Identified> PageResponse<T> {
    pub fn new(window: &PageWindow, data: Vec<T>) -> Self {
        let next_cursor = window.next_cursor(&data);
        Self { data, next_cursor }
    }
}
