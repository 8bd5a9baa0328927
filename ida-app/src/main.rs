use crate::config::AppConfig;
use axum::Router;
use dotenv::dotenv;
use engine::app::{self, AppError, AppProperties, AppResult};
use engine::metrics;
use error_stack::ResultExt;
use error_stack::fmt::ColorMode;
use inspections_core::InspectionRepository;
use inspections_routes::state::InspectionAppState;
use mappings_core::MappingRepository;
use mappings_routes::state::MappingAppState;
use repositories::memory::{MemoryInspectionRepo, MemoryMappingRepo};
use repositories::postgres::ConnectionDetails;
use repositories::postgres::initializer::RepoCreator;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod config;

#[tokio::main]
async fn main() {
    match try_main().await {
        Ok(_) => info!("ida service shutting down"),
        Err(e) => {
            error!("ida service exited with error: {e:?}");
        }
    }
}

fn init_logging() {
    error_stack::Report::set_color_mode(ColorMode::None);

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("IDA_LOG"))
        .init();
}

async fn try_main() -> AppResult<()> {
    init_logging();

    if let Err(e) = dotenv() {
        warn!("failed to load .env file: {e}");
    }

    let config = AppConfig::from_env().change_context(AppError)?;
    debug!(
        port = config.port,
        postgres = config.database_url.is_some(),
        metrics_enabled = config.metrics_enabled,
        "loaded config"
    );

    let routes = build_routes(&config).await?;

    app::run(
        routes,
        AppProperties {
            port: config.port,
            request_timeout: config.request_timeout,
        },
    )
    .await
}

async fn build_routes(config: &AppConfig) -> AppResult<Router> {
    let handle = if config.metrics_enabled {
        Some(metrics::setup_recorder().change_context(AppError)?)
    } else {
        None
    };

    let routes = match &config.database_url {
        Some(url) => {
            let (mappings, inspections) = build_postgres_repos(url, config.db_pool_size).await?;
            service_routes(mappings, inspections)
        }
        None => {
            warn!("DATABASE_URL is not set, data is kept in memory and lost on shutdown");
            service_routes(MemoryMappingRepo::new(), MemoryInspectionRepo::new())
        }
    };

    Ok(metrics::attach(routes, handle)).inspect(|_| debug!("routes built"))
}

#[instrument(skip_all)]
async fn build_postgres_repos(
    url: &str,
    pool_size: Option<usize>,
) -> AppResult<(
    repositories::postgres::mappings::MappingRepo,
    repositories::postgres::inspections::InspectionRepo,
)> {
    debug!("initializing postgres repositories");
    RepoCreator::default()
        .with_mappings()
        .with_inspections()
        .create(ConnectionDetails::Url(url.to_owned()), pool_size)
        .await
        .change_context(AppError)
}

fn service_routes<M, I>(mappings: M, inspections: I) -> Router
where
    M: MappingRepository,
    I: InspectionRepository,
{
    debug!("building routes..");
    mappings_routes::routes::build(MappingAppState::new(MappingEngine::new(mappings))).merge(
        inspections_routes::routes::build(InspectionAppState::new(InspectionEngine::new(
            inspections,
        ))),
    )
}

#[derive(Debug, Clone)]
struct MappingEngine<T> {
    repo: T,
}

impl<T> MappingEngine<T> {
    fn new(repo: T) -> Self {
        Self { repo }
    }
}

impl<T: MappingRepository> mappings_core::MappingEngine for MappingEngine<T> {
    type Repo = T;

    fn repo(&self) -> Self::Repo {
        self.repo.clone()
    }
}

#[derive(Debug, Clone)]
struct InspectionEngine<T> {
    repo: T,
}

impl<T> InspectionEngine<T> {
    fn new(repo: T) -> Self {
        Self { repo }
    }
}

impl<T: InspectionRepository> inspections_core::InspectionEngine for InspectionEngine<T> {
    type Repo = T;

    fn repo(&self) -> Self::Repo {
        self.repo.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rstest::{fixture, rstest};
    use std::time::Duration;

    #[fixture]
    fn config() -> AppConfig {
        AppConfig {
            port: 0,
            database_url: None,
            db_pool_size: None,
            metrics_enabled: false,
            request_timeout: Duration::from_secs(30),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn both_services_are_served_from_memory(config: AppConfig) {
        let server = TestServer::new(build_routes(&config).await.unwrap()).unwrap();

        assert_eq!(
            StatusCode::OK,
            server.get("/analysis-mappings").await.status_code()
        );
        assert_eq!(
            StatusCode::OK,
            server.get("/inspection-data").await.status_code()
        );
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_metrics_endpoint_is_unavailable(config: AppConfig) {
        let server = TestServer::new(build_routes(&config).await.unwrap()).unwrap();

        let response = server.get("/metrics").await;

        assert_eq!(StatusCode::SERVICE_UNAVAILABLE, response.status_code());
    }

    #[rstest]
    #[tokio::test]
    async fn swagger_ui_is_served_per_service(config: AppConfig) {
        let server = TestServer::new(build_routes(&config).await.unwrap()).unwrap();

        for path in [
            "/analysis-mappings/api-docs/openapi.json",
            "/inspection-data/api-docs/openapi.json",
        ] {
            assert_eq!(StatusCode::OK, server.get(path).await.status_code(), "{path}");
        }
    }
}
