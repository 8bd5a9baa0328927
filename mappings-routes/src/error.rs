#[derive(Debug, thiserror::Error)]
#[error("analysis mapping service failed")]
pub struct MappingServiceError;
