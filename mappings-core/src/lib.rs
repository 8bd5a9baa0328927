use engine::PageWindow;
use engine::pagination::PageSource;
use model::{AnalysisMapping, AnalysisType, MappingId, NewMapping};
use result::{MappingRepoError, OptRepoResult, RepoResult};

pub mod model;
pub mod result;

pub trait MappingEngine: Clone + Send + Sync + 'static {
    type Repo: MappingRepository;

    fn repo(&self) -> Self::Repo;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddAnalysisTypeResult {
    Added(AnalysisMapping),
    /// The type was already in the mapping's set, nothing was written.
    AlreadyPresent(AnalysisMapping),
    MappingNotFound,
}

pub trait MappingRepository: Send + Sync + Clone + 'static {
    fn get(&self, id: MappingId) -> impl Future<Output = OptRepoResult<AnalysisMapping>> + Send;

    fn count(&self) -> impl Future<Output = RepoResult<u64>> + Send;

    /// Mappings covered by `window`, in insertion order.
    fn list(
        &self,
        window: PageWindow,
    ) -> impl Future<Output = RepoResult<Vec<AnalysisMapping>>> + Send;

    fn create(
        &self,
        new_mapping: NewMapping,
    ) -> impl Future<Output = RepoResult<AnalysisMapping>> + Send;

    /// Reads the mapping, adds `analysis_type` to it and writes it back as one atomic unit.
    /// Concurrent adds to the same mapping must not lose each other's writes.
    fn add_analysis_type(
        &self,
        id: MappingId,
        analysis_type: AnalysisType,
    ) -> impl Future<Output = RepoResult<AddAnalysisTypeResult>> + Send;
}

/// All mappings in a repository, viewed as a pageable collection.
pub struct MappingPages<'a, R>(pub &'a R);

impl<R: MappingRepository> PageSource for MappingPages<'_, R> {
    type Item = AnalysisMapping;
    type Error = MappingRepoError;

    fn count(&self) -> impl Future<Output = RepoResult<u64>> + Send {
        self.0.count()
    }

    fn fetch(
        &self,
        window: PageWindow,
    ) -> impl Future<Output = RepoResult<Vec<AnalysisMapping>>> + Send {
        self.0.list(window)
    }
}
