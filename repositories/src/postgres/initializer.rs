use crate::postgres::inspections::InspectionRepo;
use crate::postgres::mappings::MappingRepo;
use crate::postgres::{ConnectionDetails, RepoInitErr, RepoMigrationErr};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use error_stack::{IntoReport, Report, ResultExt};
use std::str::FromStr;
use tokio_postgres::{Config, NoTls};
use tracing::debug;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("./src/postgres/migrations");
}

pub trait Init {
    type Repo;
    fn init(self, pool: Pool) -> impl Future<Output = Result<Self::Repo, Report<RepoInitErr>>>;
}

impl Init for () {
    type Repo = ();

    async fn init(self, _: Pool) -> Result<Self::Repo, Report<RepoInitErr>> {
        Err(RepoInitErr("unknown").into_report())
            .attach("init was called without specifying a repo to initialize")
    }
}

impl<T1, T2> Init for (T1, T2)
where
    T1: Init,
    T2: Init,
{
    type Repo = (T1::Repo, T2::Repo);

    async fn init(self, pool: Pool) -> Result<Self::Repo, Report<RepoInitErr>> {
        let r1 = self.0.init(pool.clone()).await?;
        let r2 = self.1.init(pool).await?;
        Ok((r1, r2))
    }
}

pub struct MappingInit;
impl Init for MappingInit {
    type Repo = MappingRepo;

    async fn init(self, pool: Pool) -> Result<Self::Repo, Report<RepoInitErr>> {
        MappingRepo::new(pool).await
    }
}

pub struct InspectionInit;
impl Init for InspectionInit {
    type Repo = InspectionRepo;

    async fn init(self, pool: Pool) -> Result<Self::Repo, Report<RepoInitErr>> {
        InspectionRepo::new(pool).await
    }
}

pub struct RepoCreator<T: Init = ()> {
    initializer: T,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to create repos")]
pub struct RepoCreationErr;

impl<T> RepoCreator<T>
where
    T: Init,
{
    pub async fn create(
        self,
        connection_details: ConnectionDetails,
        pool_size: Option<usize>,
    ) -> Result<T::Repo, Report<RepoCreationErr>> {
        let config = match connection_details {
            ConnectionDetails::Url(url) => {
                Config::from_str(&url).change_context(RepoCreationErr)?
            }
        };

        let mgr_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let mgr = Manager::from_config(config, NoTls, mgr_config);
        let mut pool_builder = Pool::builder(mgr);
        if let Some(pool_size) = pool_size {
            pool_builder = pool_builder.max_size(pool_size);
        }
        debug!("building connection pool..");
        let pool = pool_builder.build().change_context(RepoCreationErr)?;
        debug!("connection pool built, running migrations");

        run_migrations(&pool)
            .await
            .change_context(RepoCreationErr)?;

        self.initializer
            .init(pool)
            .await
            .change_context(RepoCreationErr)
    }
}

// separate so the connection is dropped before initialization when `pool_size` is 1
async fn run_migrations(pool: &Pool) -> Result<(), Report<RepoMigrationErr>> {
    let mut handle = pool.get().await.change_context(RepoMigrationErr)?;

    let client = &mut **handle;

    let report = embedded::migrations::runner()
        .run_async(client)
        .await
        .change_context(RepoMigrationErr)?;
    debug!("applied {} migrations", report.applied_migrations().len());
    Ok(())
}

impl Default for RepoCreator<()> {
    fn default() -> Self {
        Self { initializer: () }
    }
}

impl RepoCreator<()> {
    pub fn with_mappings(self) -> RepoCreator<MappingInit> {
        RepoCreator {
            initializer: MappingInit,
        }
    }

    pub fn with_inspections(self) -> RepoCreator<InspectionInit> {
        RepoCreator {
            initializer: InspectionInit,
        }
    }
}

impl RepoCreator<MappingInit> {
    pub fn with_inspections(self) -> RepoCreator<(MappingInit, InspectionInit)> {
        RepoCreator {
            initializer: (MappingInit, InspectionInit),
        }
    }
}
