#[derive(Debug, thiserror::Error)]
#[error("inspection data service failed")]
pub struct InspectionServiceError;
