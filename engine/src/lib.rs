pub mod app;
pub mod error;
pub mod metrics;
pub mod pagination;
pub mod response;

pub use pagination::{PageLimits, PageWindow, PagedList, Pagination, paginate};
