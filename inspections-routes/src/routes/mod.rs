use crate::error::InspectionServiceError;
use crate::service::InspectionService;
use crate::state::InspectionAppState;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response, Result},
    routing::get,
};
use engine::error::EndpointError;
use engine::pagination::PageLimits;
use engine::response::MessageResponse;
use engine::{PagedList, Pagination};
use inspections_core::InspectionEngine;
use inspections_core::model::{BlobStorageLocation, InspectionData, InspectionDataId, InspectionId};
use responses::storage_location_response;
use tracing::{info, instrument};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

mod responses;

const INSPECTION_ROOT_PATH: &str = "/inspection-data";

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = INSPECTION_ROOT_PATH, api = InspectionDocs),
    )
)]
struct ApiDoc;

#[derive(OpenApi)]
#[openapi(paths(
    list_inspection_data,
    get_inspection_data,
    get_by_inspection_id,
    get_storage_location,
))]
struct InspectionDocs;

pub const INSPECTION_PAGE_LIMITS: PageLimits = PageLimits::new(20, 100);

const INSPECTION_LIST_PATH: &str = "/";
const INSPECTION_GET_PATH: &str = "/id/{id}";
const INSPECTION_GET_BY_INSPECTION_ID_PATH: &str = "/{inspection_id}";
const INSPECTION_STORAGE_LOCATION_PATH: &str =
    "/{inspection_id}/inspection-data-storage-location";

pub fn build<T: InspectionEngine>(app_state: InspectionAppState<T>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes(app_state))
        .split_for_parts();

    router.merge(
        SwaggerUi::new("/inspection-data/swagger-ui")
            .url("/inspection-data/api-docs/openapi.json", api),
    )
}

fn routes<S, T: InspectionEngine>(app_state: InspectionAppState<T>) -> OpenApiRouter<S> {
    info!("setting up inspection data routes");
    let router = OpenApiRouter::new()
        .route(INSPECTION_LIST_PATH, get(list_inspection_data))
        .route(INSPECTION_GET_PATH, get(get_inspection_data))
        .route(INSPECTION_GET_BY_INSPECTION_ID_PATH, get(get_by_inspection_id))
        .route(INSPECTION_STORAGE_LOCATION_PATH, get(get_storage_location));

    OpenApiRouter::new()
        .nest(INSPECTION_ROOT_PATH, router)
        .with_state(app_state)
}

fn not_found(inspection_id: &InspectionId) -> Response {
    MessageResponse::not_found(format!(
        "could not find inspection data with inspection id {inspection_id}"
    ))
    .into_response()
}

/// List inspection data one page at a time, oldest first.
#[utoipa::path(
    get,
    path = INSPECTION_LIST_PATH,
    responses(
        (status = OK, description = "The requested page of inspection data. Empty if the page is past the last one", body = PagedList<InspectionData>),
        (status = BAD_REQUEST, description = "page or page_size was less than 1", body = MessageResponse),
    ),
    params(
        ("page" = Option<u64>, Query, description = "1-based page number, defaults to 1"),
        ("page_size" = Option<u64>, Query, description = "Records per page, defaults to 20 and is capped at 100"),
    )
)]
#[instrument(skip(service), err(Debug), fields(req.page = pagination.page, req.page_size = pagination.page_size))]
pub async fn list_inspection_data<T>(
    State(service): State<InspectionService<T>>,
    Query(pagination): Query<Pagination>,
) -> Result<Response, EndpointError<InspectionServiceError>>
where
    T: InspectionEngine,
{
    let window = match pagination.window(INSPECTION_PAGE_LIMITS) {
        Ok(window) => window,
        Err(e) => return Ok(MessageResponse::bad_request(e.to_string()).into_response()),
    };

    let data = service.list(window).await?;
    Ok(Json(data).into_response())
}

/// Get inspection data by its own id.
#[utoipa::path(
    get,
    path = INSPECTION_GET_PATH,
    responses(
        (status = OK, description = "The inspection data with the given id", body = InspectionData),
        (status = NOT_FOUND, description = "No inspection data has the given id", body = MessageResponse),
    ),
    params(
        ("id" = String, Path, description = "Id of the inspection data"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn get_inspection_data<T>(
    State(service): State<InspectionService<T>>,
    Path(id): Path<InspectionDataId>,
) -> Result<Response, EndpointError<InspectionServiceError>>
where
    T: InspectionEngine,
{
    let data = service.get(id.clone()).await?;

    Ok(data.map(|d| Json(d).into_response()).unwrap_or_else(|| {
        MessageResponse::not_found(format!("could not find inspection data with id {id}"))
            .into_response()
    }))
}

/// Get the inspection data captured during an inspection.
#[utoipa::path(
    get,
    path = INSPECTION_GET_BY_INSPECTION_ID_PATH,
    responses(
        (status = OK, description = "The inspection data of the inspection", body = InspectionData),
        (status = NOT_FOUND, description = "No inspection data exists for the inspection", body = MessageResponse),
    ),
    params(
        ("inspection_id" = String, Path, description = "Id of the inspection"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn get_by_inspection_id<T>(
    State(service): State<InspectionService<T>>,
    Path(inspection_id): Path<InspectionId>,
) -> Result<Response, EndpointError<InspectionServiceError>>
where
    T: InspectionEngine,
{
    let data = service.get_by_inspection_id(inspection_id.clone()).await?;

    Ok(data
        .map(|d| Json(d).into_response())
        .unwrap_or_else(|| not_found(&inspection_id)))
}

/// Find where the anonymized data of an inspection is stored.
///
/// Only answers with a location once anonymization has finished successfully.
#[utoipa::path(
    get,
    path = INSPECTION_STORAGE_LOCATION_PATH,
    responses(
        (status = OK, description = "Anonymization finished, the anonymized data is at this location", body = BlobStorageLocation),
        (status = ACCEPTED, description = "Anonymization has not started or is still running", body = MessageResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Anonymization failed", body = MessageResponse),
        (status = NOT_FOUND, description = "No inspection data exists for the inspection", body = MessageResponse),
        (status = INTERNAL_SERVER_ERROR, description = "The workflow status isn't one this service knows", body = MessageResponse),
    ),
    params(
        ("inspection_id" = String, Path, description = "Id of the inspection"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn get_storage_location<T>(
    State(service): State<InspectionService<T>>,
    Path(inspection_id): Path<InspectionId>,
) -> Result<Response, EndpointError<InspectionServiceError>>
where
    T: InspectionEngine,
{
    let outcome = service.storage_location(inspection_id.clone()).await?;

    Ok(outcome
        .map(storage_location_response)
        .unwrap_or_else(|| not_found(&inspection_id)))
}
