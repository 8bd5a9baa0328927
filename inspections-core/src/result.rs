use error_stack::Report;

pub type RepoResult<T> = Result<T, Report<InspectionRepoError>>;
pub type OptRepoResult<T> = Result<Option<T>, Report<InspectionRepoError>>;

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum InspectionRepoError {
    #[error("failed to get inspection data")]
    Get,
    #[error("failed to get inspection data by inspection id")]
    GetByInspectionId,
    #[error("failed to count inspection data")]
    Count,
    #[error("failed to list inspection data")]
    List,
    #[error("failed to insert inspection data")]
    Insert,
}
