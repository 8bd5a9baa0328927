use error_stack::Report;

pub type RepoResult<T> = Result<T, Report<MappingRepoError>>;
pub type OptRepoResult<T> = Result<Option<T>, Report<MappingRepoError>>;

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum MappingRepoError {
    #[error("failed to get analysis mapping")]
    Get,
    #[error("failed to count analysis mappings")]
    Count,
    #[error("failed to list analysis mappings")]
    List,
    #[error("failed to create analysis mapping")]
    Create,
    #[error("failed to add analysis type to analysis mapping")]
    AddAnalysisType,
}
