use engine::PageWindow;
use engine::pagination::PageSource;
use model::{InspectionData, InspectionDataId, InspectionId, NewInspectionData};
use result::{InspectionRepoError, OptRepoResult, RepoResult};

pub mod analysis;
pub mod model;
pub mod result;
pub mod workflow;

pub trait InspectionEngine: Clone + Send + Sync + 'static {
    type Repo: InspectionRepository;

    fn repo(&self) -> Self::Repo;
}

pub trait InspectionRepository: Send + Sync + Clone + 'static {
    fn get(
        &self,
        id: InspectionDataId,
    ) -> impl Future<Output = OptRepoResult<InspectionData>> + Send;

    fn get_by_inspection_id(
        &self,
        inspection_id: InspectionId,
    ) -> impl Future<Output = OptRepoResult<InspectionData>> + Send;

    fn count(&self) -> impl Future<Output = RepoResult<u64>> + Send;

    /// Records covered by `window`, in insertion order.
    fn list(
        &self,
        window: PageWindow,
    ) -> impl Future<Output = RepoResult<Vec<InspectionData>>> + Send;

    fn insert(
        &self,
        new_data: NewInspectionData,
    ) -> impl Future<Output = RepoResult<InspectionData>> + Send;
}

/// All inspection data in a repository, viewed as a pageable collection.
pub struct InspectionPages<'a, R>(pub &'a R);

impl<R: InspectionRepository> PageSource for InspectionPages<'_, R> {
    type Item = InspectionData;
    type Error = InspectionRepoError;

    fn count(&self) -> impl Future<Output = RepoResult<u64>> + Send {
        self.0.count()
    }

    fn fetch(
        &self,
        window: PageWindow,
    ) -> impl Future<Output = RepoResult<Vec<InspectionData>>> + Send {
        self.0.list(window)
    }
}
