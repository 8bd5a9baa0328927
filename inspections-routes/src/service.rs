use crate::error::InspectionServiceError;
use crate::metrics;
use crate::{OptServiceResult, ServiceResult};
use engine::{PageWindow, PagedList, paginate};
use error_stack::ResultExt;
use inspections_core::model::{InspectionData, InspectionDataId, InspectionId};
use inspections_core::workflow::{self, WorkflowOutcome};
use inspections_core::{InspectionEngine, InspectionPages, InspectionRepository};
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone)]
pub struct InspectionService<T> {
    engine: T,
}

impl<T> InspectionService<T>
where
    T: InspectionEngine,
{
    pub fn new(engine: T) -> Self {
        InspectionService { engine }
    }

    #[instrument(skip_all, name = "service#list")]
    pub async fn list(&self, window: PageWindow) -> ServiceResult<PagedList<InspectionData>> {
        let repo = self.engine.repo();
        let page = paginate(&InspectionPages(&repo), window)
            .await
            .change_context(InspectionServiceError)?;

        metrics::increment_inspection_data_retrieved_by(page.len());
        Ok(page)
    }

    #[instrument(skip_all, name = "service#get")]
    pub async fn get(&self, id: InspectionDataId) -> OptServiceResult<InspectionData> {
        let data = self
            .engine
            .repo()
            .get(id)
            .await
            .change_context(InspectionServiceError)?;

        if data.is_some() {
            metrics::increment_inspection_data_retrieved();
        }
        Ok(data)
    }

    #[instrument(skip_all, name = "service#get_by_inspection_id")]
    pub async fn get_by_inspection_id(
        &self,
        inspection_id: InspectionId,
    ) -> OptServiceResult<InspectionData> {
        let data = self
            .engine
            .repo()
            .get_by_inspection_id(inspection_id)
            .await
            .change_context(InspectionServiceError)?;

        if data.is_some() {
            metrics::increment_inspection_data_retrieved();
        }
        Ok(data)
    }

    /// Resolves where the anonymized data of `inspection_id` can be found. `None` when there is
    /// no inspection data for it at all.
    #[instrument(skip_all, name = "service#storage_location")]
    pub async fn storage_location(
        &self,
        inspection_id: InspectionId,
    ) -> OptServiceResult<WorkflowOutcome> {
        let Some(record) = self
            .engine
            .repo()
            .get_by_inspection_id(inspection_id.clone())
            .await
            .change_context(InspectionServiceError)?
        else {
            warn!("no inspection data found for inspection {inspection_id}");
            return Ok(None);
        };

        let outcome = workflow::resolve(&record);
        metrics::increment_workflow_status_resolved(&record.anonymizer_workflow_status);
        debug!(
            "anonymizer workflow of inspection {inspection_id} is {}",
            record.anonymizer_workflow_status
        );
        Ok(Some(outcome))
    }
}
