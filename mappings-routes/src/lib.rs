use crate::error::MappingServiceError;
use error_stack::Report;

pub type ServiceResult<T> = Result<T, Report<MappingServiceError>>;
pub type OptServiceResult<T> = Result<Option<T>, Report<MappingServiceError>>;

pub mod error;
mod metrics;
pub mod routes;
pub mod service;
pub mod state;
