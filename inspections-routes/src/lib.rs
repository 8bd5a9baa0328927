use crate::error::InspectionServiceError;
use error_stack::Report;

pub type ServiceResult<T> = Result<T, Report<InspectionServiceError>>;
pub type OptServiceResult<T> = Result<Option<T>, Report<InspectionServiceError>>;

pub mod error;
mod metrics;
pub mod routes;
pub mod service;
pub mod state;
