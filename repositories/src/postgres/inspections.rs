use crate::postgres::{RepoInitErr, statements, window_bounds};
use deadpool_postgres::{Object, Pool};
use engine::PageWindow;
use error_stack::{Report, ResultExt};
use inspections_core::InspectionRepository;
use inspections_core::analysis::Analysis;
use inspections_core::model::{
    BlobStorageLocation, InspectionData, InspectionDataId, InspectionId, NewInspectionData,
};
use inspections_core::result::{InspectionRepoError, OptRepoResult, RepoResult};
use tokio_postgres::Row;
use tokio_postgres::types::Json;
use tokio_stream::StreamExt;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct InspectionRepo {
    pool: Pool,
}

impl InspectionRepo {
    pub async fn new(pool: Pool) -> Result<Self, Report<RepoInitErr>> {
        pool.get()
            .await
            .change_context(RepoInitErr::inspections())?;
        Ok(Self { pool })
    }

    async fn client(&self, err: InspectionRepoError) -> RepoResult<Object> {
        self.pool.get().await.change_context(err)
    }

    async fn query_by(
        &self,
        sql: &str,
        id: &str,
        err: InspectionRepoError,
    ) -> OptRepoResult<InspectionData> {
        let client = self.client(err).await?;
        let statement = client
            .prepare_cached(sql)
            .await
            .change_context(err)?;

        client
            .query_opt(&statement, &[&id])
            .await
            .change_context(err)?
            .map(|row| row_to_inspection_data(&row))
            .transpose()
            .change_context(err)
            .attach_with(|| format!("id: {id}"))
    }
}

fn location(row: &Row, prefix: &str) -> BlobStorageLocation {
    BlobStorageLocation {
        storage_account: row.get(format!("{prefix}_storage_account").as_str()),
        blob_container: row.get(format!("{prefix}_blob_container").as_str()),
        blob_name: row.get(format!("{prefix}_blob_name").as_str()),
    }
}

fn row_to_inspection_data(row: &Row) -> Result<InspectionData, Report<tokio_postgres::Error>> {
    let Json(analyses) = row.try_get::<_, Json<Vec<Analysis>>>("analyses")?;

    Ok(InspectionData {
        id: InspectionDataId::new(row.get::<_, String>("id")),
        inspection_id: InspectionId::new(row.get::<_, String>("inspection_id")),
        installation_code: row.get("installation_code"),
        raw_data_blob_storage_location: location(row, "raw"),
        anonymized_blob_storage_location: location(row, "anonymized"),
        date_created: row.get("date_created"),
        anonymizer_workflow_status: row.get::<_, String>("anonymizer_workflow_status").into(),
        analyses,
    })
}

impl InspectionRepository for InspectionRepo {
    async fn get(&self, id: InspectionDataId) -> OptRepoResult<InspectionData> {
        self.query_by(
            statements::inspections::GET,
            id.as_str(),
            InspectionRepoError::Get,
        )
        .await
    }

    async fn get_by_inspection_id(
        &self,
        inspection_id: InspectionId,
    ) -> OptRepoResult<InspectionData> {
        self.query_by(
            statements::inspections::GET_BY_INSPECTION_ID,
            inspection_id.as_str(),
            InspectionRepoError::GetByInspectionId,
        )
        .await
    }

    async fn count(&self) -> RepoResult<u64> {
        let client = self.client(InspectionRepoError::Count).await?;
        let statement = client
            .prepare_cached(statements::inspections::COUNT)
            .await
            .change_context(InspectionRepoError::Count)?;

        let count: i64 = client
            .query_one(&statement, &[])
            .await
            .change_context(InspectionRepoError::Count)?
            .get(0);

        Ok(count.unsigned_abs())
    }

    async fn list(&self, window: PageWindow) -> RepoResult<Vec<InspectionData>> {
        let (offset, limit) = window_bounds(window);
        let client = self.client(InspectionRepoError::List).await?;
        let statement = client
            .prepare_cached(statements::inspections::LIST)
            .await
            .change_context(InspectionRepoError::List)?;

        client
            .query_raw(&statement, &[&offset, &limit])
            .await
            .change_context(InspectionRepoError::List)?
            .map(|r| {
                r.change_context(InspectionRepoError::List).and_then(|row| {
                    row_to_inspection_data(&row).change_context(InspectionRepoError::List)
                })
            })
            .collect::<RepoResult<Vec<_>>>()
            .await
    }

    async fn insert(&self, new_data: NewInspectionData) -> RepoResult<InspectionData> {
        let client = self.client(InspectionRepoError::Insert).await?;
        let statement = client
            .prepare_cached(statements::inspections::INSERT)
            .await
            .change_context(InspectionRepoError::Insert)?;

        let raw = &new_data.raw_data_blob_storage_location;
        let anonymized = &new_data.anonymized_blob_storage_location;
        let row = client
            .query_one(
                &statement,
                &[
                    &Uuid::now_v7().to_string(),
                    &new_data.inspection_id.as_str(),
                    &new_data.installation_code,
                    &raw.storage_account,
                    &raw.blob_container,
                    &raw.blob_name,
                    &anonymized.storage_account,
                    &anonymized.blob_container,
                    &anonymized.blob_name,
                    &new_data.anonymizer_workflow_status.as_str(),
                    &Json(&new_data.analyses),
                ],
            )
            .await
            .change_context(InspectionRepoError::Insert)
            .attach_with(|| format!("inspection id: {}", new_data.inspection_id))?;

        row_to_inspection_data(&row).change_context(InspectionRepoError::Insert)
    }
}
