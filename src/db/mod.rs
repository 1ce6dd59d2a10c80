//! Database query helpers.
//!
//! Only query shaping lives here; connection management and schema are left
//! to the application.

pub mod paginate;

pub use paginate::{paginate, PageQuery, Pagination, MAX_PAGE_SIZE};
