use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mappings_core::model::AnalysisMapping;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MappingResponse {
    #[serde(skip)]
    status_code: StatusCode,
    #[serde(flatten)]
    mapping: AnalysisMapping,
}

impl MappingResponse {
    pub fn ok(mapping: AnalysisMapping) -> Self {
        Self {
            status_code: StatusCode::OK,
            mapping,
        }
    }

    pub fn created(mapping: AnalysisMapping) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            mapping,
        }
    }
}

impl IntoResponse for MappingResponse {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
