use crate::error::MappingServiceError;
use crate::metrics;
use crate::{OptServiceResult, ServiceResult};
use engine::{PageWindow, PagedList, paginate};
use error_stack::ResultExt;
use mappings_core::model::{AnalysisMapping, AnalysisType, MappingId, NewMapping, ValidationError};
use mappings_core::{AddAnalysisTypeResult, MappingEngine, MappingPages, MappingRepository};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(AnalysisMapping),
    Invalid(ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddAnalysisTypeOutcome {
    Added(AnalysisMapping),
    /// The type string didn't parse, or the mapping already runs that type.
    Invalid(ValidationError),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct MappingService<T> {
    engine: T,
}

impl<T> MappingService<T>
where
    T: MappingEngine,
{
    pub fn new(engine: T) -> Self {
        MappingService { engine }
    }

    #[instrument(skip_all, name = "service#list")]
    pub async fn list(&self, window: PageWindow) -> ServiceResult<PagedList<AnalysisMapping>> {
        let repo = self.engine.repo();
        let page = paginate(&MappingPages(&repo), window)
            .await
            .change_context(MappingServiceError)?;

        metrics::increment_mappings_retrieved_by(page.len());
        debug!(
            "listed {} of {} analysis mappings",
            page.len(),
            page.total_count
        );
        Ok(page)
    }

    #[instrument(skip_all, name = "service#get")]
    pub async fn get(&self, id: MappingId) -> OptServiceResult<AnalysisMapping> {
        let mapping = self
            .engine
            .repo()
            .get(id)
            .await
            .change_context(MappingServiceError)?;

        if mapping.is_some() {
            metrics::increment_mappings_retrieved();
        }
        Ok(mapping)
    }

    /// Creates a mapping. An `analysis_type` that isn't a known type is ignored and the mapping
    /// starts with no analyses, unlike [`MappingService::add_analysis_type`] which rejects it.
    #[instrument(skip_all, name = "service#create")]
    pub async fn create(
        &self,
        tag_id: String,
        inspection_description: String,
        analysis_type: Option<&str>,
    ) -> ServiceResult<CreateOutcome> {
        let analysis_type = analysis_type.and_then(|value| {
            let parsed = AnalysisType::parse(value);
            if parsed.is_none() {
                debug!("ignoring unrecognized analysis type '{value}'");
            }
            parsed
        });

        let new_mapping = match NewMapping::new(tag_id, inspection_description, analysis_type) {
            Ok(new_mapping) => new_mapping,
            Err(e) => return Ok(CreateOutcome::Invalid(e)),
        };

        let mapping = self
            .engine
            .repo()
            .create(new_mapping)
            .await
            .change_context(MappingServiceError)?;

        metrics::increment_mappings_created();
        debug!("created analysis mapping {}", mapping.id);
        Ok(CreateOutcome::Created(mapping))
    }

    #[instrument(skip_all, name = "service#add_analysis_type")]
    pub async fn add_analysis_type(
        &self,
        id: MappingId,
        analysis_type: &str,
    ) -> ServiceResult<AddAnalysisTypeOutcome> {
        let repo = self.engine.repo();
        let cannot_add = || {
            AddAnalysisTypeOutcome::Invalid(ValidationError::CannotAddType(
                analysis_type.to_owned(),
            ))
        };

        let Some(parsed) = AnalysisType::parse(analysis_type) else {
            // a missing mapping is reported before a bad type
            let exists = repo
                .get(id)
                .await
                .change_context(MappingServiceError)?
                .is_some();
            return Ok(if exists {
                cannot_add()
            } else {
                AddAnalysisTypeOutcome::NotFound
            });
        };

        let outcome = match repo
            .add_analysis_type(id, parsed)
            .await
            .change_context(MappingServiceError)?
        {
            AddAnalysisTypeResult::Added(mapping) => {
                metrics::increment_analysis_types_added();
                debug!("added {parsed} to analysis mapping {}", mapping.id);
                AddAnalysisTypeOutcome::Added(mapping)
            }
            AddAnalysisTypeResult::AlreadyPresent(_) => cannot_add(),
            AddAnalysisTypeResult::MappingNotFound => AddAnalysisTypeOutcome::NotFound,
        };
        Ok(outcome)
    }

    /// Maps an inspection description onto the analysis type it calls for.
    pub fn type_from_description(
        &self,
        description: &str,
    ) -> Result<AnalysisType, ValidationError> {
        AnalysisType::from_description(description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::pagination::PageLimits;
    use repositories::memory::MemoryMappingRepo;
    use rstest::{fixture, rstest};

    #[derive(Clone, Default)]
    struct TestEngine {
        repo: MemoryMappingRepo,
    }

    impl MappingEngine for TestEngine {
        type Repo = MemoryMappingRepo;

        fn repo(&self) -> Self::Repo {
            self.repo.clone()
        }
    }

    #[fixture]
    fn service() -> MappingService<TestEngine> {
        MappingService::new(TestEngine::default())
    }

    async fn created(
        service: &MappingService<TestEngine>,
        analysis_type: Option<&str>,
    ) -> AnalysisMapping {
        match service
            .create("tag-1".into(), "inspect the pump".into(), analysis_type)
            .await
            .unwrap()
        {
            CreateOutcome::Created(mapping) => mapping,
            CreateOutcome::Invalid(e) => panic!("mapping should be valid: {e}"),
        }
    }

    #[rstest]
    #[case::absent(None, false)]
    #[case::recognized(Some("anonymize"), true)]
    #[case::unrecognized(Some("thermal"), false)]
    #[case::wrong_case(Some("Anonymize"), false)]
    #[tokio::test]
    async fn create_only_keeps_recognized_types(
        service: MappingService<TestEngine>,
        #[case] analysis_type: Option<&str>,
        #[case] runs_anonymize: bool,
    ) {
        let mapping = created(&service, analysis_type).await;

        assert_eq!(runs_anonymize, mapping.runs(AnalysisType::Anonymize));
        assert_eq!(usize::from(runs_anonymize), mapping.analyses_to_be_run.len());
    }

    #[rstest]
    #[case::missing_tag_id("", "x", ValidationError::MissingTagId)]
    #[case::missing_description("x", "", ValidationError::MissingInspectionDescription)]
    #[tokio::test]
    async fn create_with_missing_fields_is_invalid(
        service: MappingService<TestEngine>,
        #[case] tag_id: &str,
        #[case] description: &str,
        #[case] expected: ValidationError,
    ) {
        let outcome = service
            .create(tag_id.into(), description.into(), None)
            .await
            .unwrap();

        assert_eq!(CreateOutcome::Invalid(expected), outcome);
        assert_eq!(
            0,
            service
                .list(PageWindow::new(1, 10).unwrap())
                .await
                .unwrap()
                .total_count
        );
    }

    #[rstest]
    #[tokio::test]
    async fn add_type_to_mapping_without_it(service: MappingService<TestEngine>) {
        let mapping = created(&service, None).await;

        let outcome = service
            .add_analysis_type(mapping.id.clone(), "anonymize")
            .await
            .unwrap();

        let AddAnalysisTypeOutcome::Added(updated) = outcome else {
            panic!("expected the type to be added, got {outcome:?}");
        };
        assert!(updated.runs(AnalysisType::Anonymize));
        assert_eq!(Some(updated), service.get(mapping.id).await.unwrap());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_add_is_invalid_and_changes_nothing(service: MappingService<TestEngine>) {
        let mapping = created(&service, Some("anonymize")).await;

        let outcome = service
            .add_analysis_type(mapping.id.clone(), "anonymize")
            .await
            .unwrap();

        assert_eq!(
            AddAnalysisTypeOutcome::Invalid(ValidationError::CannotAddType("anonymize".into())),
            outcome
        );
        assert_eq!(Some(mapping.clone()), service.get(mapping.id).await.unwrap());
    }

    #[rstest]
    #[tokio::test]
    async fn add_unknown_type_is_invalid(service: MappingService<TestEngine>) {
        let mapping = created(&service, None).await;

        let outcome = service
            .add_analysis_type(mapping.id, "thermal")
            .await
            .unwrap();

        assert_eq!(
            AddAnalysisTypeOutcome::Invalid(ValidationError::CannotAddType("thermal".into())),
            outcome
        );
    }

    #[rstest]
    #[case::known_type("anonymize")]
    #[case::unknown_type("thermal")]
    #[tokio::test]
    async fn add_to_unknown_mapping_is_not_found(
        service: MappingService<TestEngine>,
        #[case] analysis_type: &str,
    ) {
        let outcome = service
            .add_analysis_type(MappingId::new("missing"), analysis_type)
            .await
            .unwrap();

        assert_eq!(AddAnalysisTypeOutcome::NotFound, outcome);
    }

    #[rstest]
    #[tokio::test]
    async fn get_twice_returns_the_same_mapping(service: MappingService<TestEngine>) {
        let mapping = created(&service, Some("anonymize")).await;

        let first = service.get(mapping.id.clone()).await.unwrap();
        let second = service.get(mapping.id).await.unwrap();

        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[rstest]
    #[case::first_page(1, 10)]
    #[case::last_page(3, 5)]
    #[case::past_the_end(4, 0)]
    #[tokio::test]
    async fn list_pages_through_all_mappings(
        service: MappingService<TestEngine>,
        #[case] page: u64,
        #[case] expected_len: usize,
    ) {
        for _ in 0..25 {
            created(&service, None).await;
        }
        let window = engine::Pagination::with_page_size(page, 10)
            .window(PageLimits::new(20, 100))
            .unwrap();

        let listed = service.list(window).await.unwrap();

        assert_eq!(expected_len, listed.len());
        assert_eq!(25, listed.total_count);
        assert_eq!(3, listed.total_pages);
    }

    #[rstest]
    #[tokio::test]
    async fn type_from_description(service: MappingService<TestEngine>) {
        assert_eq!(
            Ok(AnalysisType::Anonymize),
            service.type_from_description("anonymize")
        );
        assert_eq!(
            Err(ValidationError::UnsupportedDescription("blur".into())),
            service.type_from_description("blur")
        );
    }
}
