use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::borrow::Cow;
use utoipa::ToSchema;

pub type MessageType = Cow<'static, str>;

/// A JSON body carrying only a human readable message, e.g. `{"message": "..."}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[serde(skip)]
    status_code: StatusCode,
    #[schema(value_type = String)]
    message: MessageType,
}

impl MessageResponse {
    pub fn new(status_code: StatusCode, message: impl Into<MessageType>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    pub fn accepted(message: impl Into<MessageType>) -> Self {
        Self::new(StatusCode::ACCEPTED, message)
    }

    pub fn not_found(message: impl Into<MessageType>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<MessageType>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unprocessable_entity(message: impl Into<MessageType>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal_server_error(message: impl Into<MessageType>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for MessageResponse {
    fn into_response(self) -> Response {
        (self.status_code, Json(self)).into_response()
    }
}
