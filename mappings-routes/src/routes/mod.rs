use crate::error::MappingServiceError;
use crate::service::{AddAnalysisTypeOutcome, CreateOutcome, MappingService};
use crate::state::MappingAppState;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Response, Result},
    routing::{get, post},
};
use engine::error::EndpointError;
use engine::pagination::PageLimits;
use engine::response::MessageResponse;
use engine::{PagedList, Pagination};
use mappings_core::MappingEngine;
use mappings_core::model::{AnalysisMapping, AnalysisType, MappingId};
use requests::{AddAnalysisTypeRequest, CreateMappingRequest};
use responses::MappingResponse;
use tracing::{info, instrument};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

mod requests;
mod responses;

const MAPPING_ROOT_PATH: &str = "/analysis-mappings";

#[derive(OpenApi)]
#[openapi(
    nest(
        (path = MAPPING_ROOT_PATH, api = MappingDocs),
    )
)]
struct ApiDoc;

#[derive(OpenApi)]
#[openapi(paths(
    list_mappings,
    get_mapping,
    create_mapping,
    add_analysis_type,
    analysis_type_from_description,
))]
struct MappingDocs;

pub const MAPPING_PAGE_LIMITS: PageLimits = PageLimits::new(20, 100);

const MAPPING_LIST_PATH: &str = "/";
const MAPPING_GET_PATH: &str = "/id/{id}";
const MAPPING_CREATE_PATH: &str = "/";
const MAPPING_ADD_TYPE_PATH: &str = "/id/{id}/analysis-types";
const MAPPING_TYPE_FROM_DESCRIPTION_PATH: &str = "/analysis-type/{description}";

pub fn build<T: MappingEngine>(app_state: MappingAppState<T>) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes(app_state))
        .split_for_parts();

    router.merge(
        SwaggerUi::new("/analysis-mappings/swagger-ui")
            .url("/analysis-mappings/api-docs/openapi.json", api),
    )
}

fn routes<S, T: MappingEngine>(app_state: MappingAppState<T>) -> OpenApiRouter<S> {
    info!("setting up analysis mapping routes");
    let router = OpenApiRouter::new()
        .route(MAPPING_LIST_PATH, get(list_mappings))
        .route(MAPPING_GET_PATH, get(get_mapping))
        .route(MAPPING_CREATE_PATH, post(create_mapping))
        .route(MAPPING_ADD_TYPE_PATH, post(add_analysis_type))
        .route(
            MAPPING_TYPE_FROM_DESCRIPTION_PATH,
            get(analysis_type_from_description),
        );

    OpenApiRouter::new()
        .nest(MAPPING_ROOT_PATH, router)
        .with_state(app_state)
}

/// List analysis mappings one page at a time, oldest first.
#[utoipa::path(
    get,
    path = MAPPING_LIST_PATH,
    responses(
        (status = OK, description = "The requested page of mappings. Empty if the page is past the last one", body = PagedList<AnalysisMapping>),
        (status = BAD_REQUEST, description = "page or page_size was less than 1", body = MessageResponse),
    ),
    params(
        ("page" = Option<u64>, Query, description = "1-based page number, defaults to 1"),
        ("page_size" = Option<u64>, Query, description = "Mappings per page, defaults to 20 and is capped at 100"),
    )
)]
#[instrument(skip(service), err(Debug), fields(req.page = pagination.page, req.page_size = pagination.page_size))]
pub async fn list_mappings<T>(
    State(service): State<MappingService<T>>,
    Query(pagination): Query<Pagination>,
) -> Result<Response, EndpointError<MappingServiceError>>
where
    T: MappingEngine,
{
    let window = match pagination.window(MAPPING_PAGE_LIMITS) {
        Ok(window) => window,
        Err(e) => return Ok(MessageResponse::bad_request(e.to_string()).into_response()),
    };

    let mappings = service.list(window).await?;
    Ok(Json(mappings).into_response())
}

/// Get the analysis mapping with the given id.
#[utoipa::path(
    get,
    path = MAPPING_GET_PATH,
    responses(
        (status = OK, description = "The mapping with the given id", body = AnalysisMapping),
        (status = NOT_FOUND, description = "No mapping has the given id", body = MessageResponse),
    ),
    params(
        ("id" = String, Path, description = "Id of the mapping"),
    )
)]
#[instrument(skip(service), err(Debug))]
pub async fn get_mapping<T>(
    State(service): State<MappingService<T>>,
    Path(id): Path<MappingId>,
) -> Result<Response, EndpointError<MappingServiceError>>
where
    T: MappingEngine,
{
    let mapping = service.get(id.clone()).await?;

    Ok(mapping
        .map(|m| MappingResponse::ok(m).into_response())
        .unwrap_or_else(|| {
            MessageResponse::not_found(format!("could not find analysis mapping with id {id}"))
                .into_response()
        }))
}

/// Create an analysis mapping for an inspection point.
#[utoipa::path(
    post,
    path = MAPPING_CREATE_PATH,
    responses(
        (status = CREATED, description = "The mapping was created", body = AnalysisMapping),
        (status = UNPROCESSABLE_ENTITY, description = "tag_id or inspection_description was empty or missing", body = MessageResponse),
    ),
    request_body = CreateMappingRequest
)]
#[instrument(skip_all, err(Debug), fields(req.tag_id = mapping.tag_id, req.analysis_type = mapping.analysis_type))]
async fn create_mapping<T>(
    State(service): State<MappingService<T>>,
    Json(mapping): Json<CreateMappingRequest>,
) -> Result<Response, EndpointError<MappingServiceError>>
where
    T: MappingEngine,
{
    let outcome = service
        .create(
            mapping.tag_id,
            mapping.inspection_description,
            mapping.analysis_type.as_deref(),
        )
        .await?;

    let res = match outcome {
        CreateOutcome::Created(m) => MappingResponse::created(m).into_response(),
        CreateOutcome::Invalid(e) => {
            MessageResponse::unprocessable_entity(e.to_string()).into_response()
        }
    };
    Ok(res)
}

/// Add an analysis type to an existing mapping.
#[utoipa::path(
    post,
    path = MAPPING_ADD_TYPE_PATH,
    responses(
        (status = OK, description = "The type was added, the updated mapping is returned", body = AnalysisMapping),
        (status = NOT_FOUND, description = "No mapping has the given id", body = MessageResponse),
        (status = UNPROCESSABLE_ENTITY, description = "The type isn't a known analysis type or the mapping already runs it", body = MessageResponse),
    ),
    params(
        ("id" = String, Path, description = "Id of the mapping"),
    ),
    request_body = AddAnalysisTypeRequest
)]
#[instrument(skip(service, request), err(Debug), fields(req.analysis_type = request.analysis_type))]
async fn add_analysis_type<T>(
    State(service): State<MappingService<T>>,
    Path(id): Path<MappingId>,
    Json(request): Json<AddAnalysisTypeRequest>,
) -> Result<Response, EndpointError<MappingServiceError>>
where
    T: MappingEngine,
{
    let outcome = service
        .add_analysis_type(id.clone(), &request.analysis_type)
        .await?;

    let res = match outcome {
        AddAnalysisTypeOutcome::Added(m) => MappingResponse::ok(m).into_response(),
        AddAnalysisTypeOutcome::Invalid(e) => {
            MessageResponse::unprocessable_entity(e.to_string()).into_response()
        }
        AddAnalysisTypeOutcome::NotFound => {
            MessageResponse::not_found(format!("could not find analysis mapping with id {id}"))
                .into_response()
        }
    };
    Ok(res)
}

/// Work out which analysis type an inspection description calls for.
#[utoipa::path(
    get,
    path = MAPPING_TYPE_FROM_DESCRIPTION_PATH,
    responses(
        (status = OK, description = "The analysis type for the description", body = AnalysisType),
        (status = UNPROCESSABLE_ENTITY, description = "The description isn't supported", body = MessageResponse),
    ),
    params(
        ("description" = String, Path, description = "Inspection description, e.g. anonymize"),
    )
)]
#[instrument(skip(service))]
async fn analysis_type_from_description<T>(
    State(service): State<MappingService<T>>,
    Path(description): Path<String>,
) -> Response
where
    T: MappingEngine,
{
    match service.type_from_description(&description) {
        Ok(analysis_type) => Json(analysis_type).into_response(),
        Err(e) => MessageResponse::unprocessable_entity(e.to_string()).into_response(),
    }
}
