use crate::postgres::{RepoInitErr, statements, window_bounds};
use deadpool_postgres::{Object, Pool};
use engine::PageWindow;
use error_stack::{Report, ResultExt};
use mappings_core::model::{AnalysisMapping, AnalysisType, MappingId, NewMapping};
use mappings_core::result::{MappingRepoError, OptRepoResult, RepoResult};
use mappings_core::{AddAnalysisTypeResult, MappingRepository};
use std::collections::BTreeSet;
use tokio_postgres::Row;
use tokio_stream::StreamExt;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
#[error("stored analysis type '{0}' is not recognized")]
struct UnknownStoredAnalysisType(String);

#[derive(Debug, Clone)]
pub struct MappingRepo {
    pool: Pool,
}

impl MappingRepo {
    pub async fn new(pool: Pool) -> Result<Self, Report<RepoInitErr>> {
        // fail fast if the pool can't hand out a connection
        pool.get()
            .await
            .change_context(RepoInitErr::mappings())?;
        Ok(Self { pool })
    }

    async fn client(&self, err: MappingRepoError) -> RepoResult<Object> {
        self.pool.get().await.change_context(err)
    }
}

fn row_to_mapping(row: &Row) -> Result<AnalysisMapping, Report<UnknownStoredAnalysisType>> {
    let keys: Vec<String> = row.get("analyses_to_be_run");
    let analyses_to_be_run = keys
        .into_iter()
        .map(|key| AnalysisType::parse(&key).ok_or_else(|| UnknownStoredAnalysisType(key)))
        .collect::<Result<BTreeSet<_>, _>>()?;

    Ok(AnalysisMapping {
        id: MappingId::new(row.get::<_, String>("id")),
        tag_id: row.get("tag_id"),
        inspection_description: row.get("inspection_description"),
        analyses_to_be_run,
    })
}

fn analysis_keys(analyses: &BTreeSet<AnalysisType>) -> Vec<&'static str> {
    analyses.iter().map(AnalysisType::key).collect()
}

impl MappingRepository for MappingRepo {
    async fn get(&self, id: MappingId) -> OptRepoResult<AnalysisMapping> {
        let client = self.client(MappingRepoError::Get).await?;
        let statement = client
            .prepare_cached(statements::mappings::GET)
            .await
            .change_context(MappingRepoError::Get)?;

        client
            .query_opt(&statement, &[&id.as_str()])
            .await
            .change_context(MappingRepoError::Get)?
            .map(|row| row_to_mapping(&row))
            .transpose()
            .change_context(MappingRepoError::Get)
            .attach_with(|| format!("mapping id: {id}"))
    }

    async fn count(&self) -> RepoResult<u64> {
        let client = self.client(MappingRepoError::Count).await?;
        let statement = client
            .prepare_cached(statements::mappings::COUNT)
            .await
            .change_context(MappingRepoError::Count)?;

        let count: i64 = client
            .query_one(&statement, &[])
            .await
            .change_context(MappingRepoError::Count)?
            .get(0);

        Ok(count.unsigned_abs())
    }

    async fn list(&self, window: PageWindow) -> RepoResult<Vec<AnalysisMapping>> {
        let (offset, limit) = window_bounds(window);
        let client = self.client(MappingRepoError::List).await?;
        let statement = client
            .prepare_cached(statements::mappings::LIST)
            .await
            .change_context(MappingRepoError::List)?;

        client
            .query_raw(&statement, &[&offset, &limit])
            .await
            .change_context(MappingRepoError::List)?
            .map(|r| {
                r.change_context(MappingRepoError::List).and_then(|row| {
                    row_to_mapping(&row).change_context(MappingRepoError::List)
                })
            })
            .collect::<RepoResult<Vec<_>>>()
            .await
    }

    async fn create(&self, new_mapping: NewMapping) -> RepoResult<AnalysisMapping> {
        let analyses = new_mapping
            .analysis_type()
            .map(|ty| vec![ty.key()])
            .unwrap_or_default();

        let client = self.client(MappingRepoError::Create).await?;
        let statement = client
            .prepare_cached(statements::mappings::CREATE)
            .await
            .change_context(MappingRepoError::Create)?;

        let row = client
            .query_one(
                &statement,
                &[
                    &Uuid::now_v7().to_string(),
                    &new_mapping.tag_id(),
                    &new_mapping.inspection_description(),
                    &analyses,
                ],
            )
            .await
            .change_context(MappingRepoError::Create)?;

        row_to_mapping(&row).change_context(MappingRepoError::Create)
    }

    async fn add_analysis_type(
        &self,
        id: MappingId,
        analysis_type: AnalysisType,
    ) -> RepoResult<AddAnalysisTypeResult> {
        let mut client = self.client(MappingRepoError::AddAnalysisType).await?;
        let transaction = client
            .transaction()
            .await
            .change_context(MappingRepoError::AddAnalysisType)?;

        let select = transaction
            .prepare_cached(statements::mappings::GET_FOR_UPDATE)
            .await
            .change_context(MappingRepoError::AddAnalysisType)?;

        // the row stays locked until the transaction ends, concurrent adds queue up behind it
        let Some(row) = transaction
            .query_opt(&select, &[&id.as_str()])
            .await
            .change_context(MappingRepoError::AddAnalysisType)?
        else {
            return Ok(AddAnalysisTypeResult::MappingNotFound);
        };

        let mut mapping =
            row_to_mapping(&row).change_context(MappingRepoError::AddAnalysisType)?;
        if !mapping.add_analysis(analysis_type) {
            return Ok(AddAnalysisTypeResult::AlreadyPresent(mapping));
        }

        let update = transaction
            .prepare_cached(statements::mappings::SET_ANALYSES)
            .await
            .change_context(MappingRepoError::AddAnalysisType)?;
        transaction
            .execute(
                &update,
                &[&id.as_str(), &analysis_keys(&mapping.analyses_to_be_run)],
            )
            .await
            .change_context(MappingRepoError::AddAnalysisType)?;

        transaction
            .commit()
            .await
            .change_context(MappingRepoError::AddAnalysisType)
            .attach_with(|| format!("mapping id: {id}"))?;

        Ok(AddAnalysisTypeResult::Added(mapping))
    }
}
