use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMappingRequest {
    /// Tag of the inspection point. Required, an empty or missing value is rejected.
    #[serde(default)]
    pub tag_id: String,
    /// Required, an empty or missing value is rejected.
    #[serde(default)]
    pub inspection_description: String,
    /// Analysis to run for the new mapping, e.g. `anonymize`. A value that isn't a known
    /// analysis type is ignored.
    pub analysis_type: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddAnalysisTypeRequest {
    /// The analysis type to add, e.g. `anonymize`. A missing value is rejected.
    #[serde(default)]
    pub analysis_type: String,
}
