//! Offset pagination for SQL queries.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::Deserialize;
use sqlx::{Database, Encode, QueryBuilder, Type};

use crate::http::AppError;

/// Upper bound on rows per page.
pub const MAX_PAGE_SIZE: u64 = 200;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    page_size: u64,
}

impl Pagination {
    /// `page` is 1-based; 0 is read as the first page. `page_size` is capped at [`MAX_PAGE_SIZE`].
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.min(MAX_PAGE_SIZE),
        }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Append `LIMIT <bind> OFFSET <bind>` to a query under construction.
    pub fn apply<'args, DB>(&self, builder: &mut QueryBuilder<'args, DB>)
    where
        DB: Database,
        i64: Encode<'args, DB> + Type<DB>,
    {
        builder
            .push(" LIMIT ")
            .push_bind(to_sql_int(self.limit()))
            .push(" OFFSET ")
            .push_bind(to_sql_int(self.offset()));
    }
}

fn to_sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Shorthand for [`Pagination::new`].
pub fn paginate(page: u64, page_size: u64) -> Pagination {
    Pagination::new(page, page_size)
}

/// `?page=..&pageSize=..` query parameters.
///
/// Usable directly as a handler argument; a malformed query string is answered
/// with the `BAD_REQUEST` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageQuery {
    pub page: u64,
    pub page_size: u64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl<S> FromRequestParts<S> for PageQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::try_from_uri(&parts.uri)?;
        Ok(query)
    }
}

impl From<PageQuery> for Pagination {
    fn from(query: PageQuery) -> Self {
        Pagination::new(query.page, query.page_size)
    }
}
