use crate::response::MessageResponse;
use axum::response::IntoResponse;
use error_stack::Report;
use std::error::Error;
use tracing::error;

/// Returned from endpoints when a service call fails for a reason the caller can't fix,
/// e.g. the store is unreachable. Logged with its full report and turned into a 500.
#[derive(thiserror::Error)]
#[error("there was an error running the endpoint")]
pub struct EndpointError<T: Error + Send + Sync + 'static>(Report<T>);

impl<T: Error + Send + Sync + 'static> std::fmt::Debug for EndpointError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> From<Report<T>> for EndpointError<T>
where
    T: Error + Send + Sync + 'static,
{
    fn from(value: Report<T>) -> Self {
        Self(value)
    }
}

impl<T: Error + Send + Sync + 'static> IntoResponse for EndpointError<T> {
    fn into_response(self) -> axum::response::Response {
        error!("endpoint failed: {:?}", self.0);
        MessageResponse::internal_server_error("internal server error").into_response()
    }
}
