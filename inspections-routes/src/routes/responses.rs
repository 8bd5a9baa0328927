use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use engine::response::MessageResponse;
use inspections_core::workflow::WorkflowOutcome;

/// Turns a resolved workflow into the answer for a storage location request.
pub fn storage_location_response(outcome: WorkflowOutcome) -> Response {
    match outcome {
        WorkflowOutcome::Completed(location) => (StatusCode::OK, Json(location)).into_response(),
        WorkflowOutcome::Accepted(message) => MessageResponse::accepted(message).into_response(),
        WorkflowOutcome::Unprocessable(message) => {
            MessageResponse::unprocessable_entity(message).into_response()
        }
        WorkflowOutcome::UnknownStatus(message) => {
            MessageResponse::internal_server_error(message).into_response()
        }
    }
}
