use engine::PageWindow;

pub mod initializer;
pub mod inspections;
pub mod mappings;
mod statements;

pub enum ConnectionDetails {
    Url(String),
}

#[derive(Debug, thiserror::Error)]
#[error("failed to initialize postgres {0} repo")]
pub struct RepoInitErr(&'static str);

impl RepoInitErr {
    fn mappings() -> Self {
        Self("analysis mappings")
    }

    fn inspections() -> Self {
        Self("inspection data")
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to run postgres migrations")]
pub struct RepoMigrationErr;

/// `offset` and `limit` of `window` as postgres `bigint`s. Anything past `i64::MAX` is clamped,
/// no table gets that large.
fn window_bounds(window: PageWindow) -> (i64, i64) {
    let offset = i64::try_from(window.offset()).unwrap_or(i64::MAX);
    let limit = i64::try_from(window.limit()).unwrap_or(i64::MAX);
    (offset, limit)
}
