use crate::analysis::Analysis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct InspectionDataId(String);

impl InspectionDataId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InspectionDataId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the inspection the data was captured during. Assigned upstream, so unlike
/// [`InspectionDataId`] it is never generated here.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct InspectionId(String);

impl InspectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for InspectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a blob lives. Handed through to callers as-is.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct BlobStorageLocation {
    pub storage_account: String,
    pub blob_container: String,
    pub blob_name: String,
}

/// Progress of the anonymization workflow, as reported by the anonymization pipeline.
///
/// The pipeline is versioned separately from this service, so a status this service doesn't
/// know about is kept as [`WorkflowStatus::Unrecognized`] rather than failing to load.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum WorkflowStatus {
    NotStarted,
    Started,
    ExitSuccess,
    ExitFailure,
    Unrecognized(String),
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &str {
        match self {
            WorkflowStatus::NotStarted => "NotStarted",
            WorkflowStatus::Started => "Started",
            WorkflowStatus::ExitSuccess => "ExitSuccess",
            WorkflowStatus::ExitFailure => "ExitFailure",
            WorkflowStatus::Unrecognized(status) => status,
        }
    }
}

impl From<String> for WorkflowStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "NotStarted" => WorkflowStatus::NotStarted,
            "Started" => WorkflowStatus::Started,
            "ExitSuccess" => WorkflowStatus::ExitSuccess,
            "ExitFailure" => WorkflowStatus::ExitFailure,
            _ => WorkflowStatus::Unrecognized(value),
        }
    }
}

impl From<WorkflowStatus> for String {
    fn from(value: WorkflowStatus) -> Self {
        match value {
            WorkflowStatus::Unrecognized(status) => status,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for WorkflowStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct InspectionData {
    pub id: InspectionDataId,
    pub inspection_id: InspectionId,
    pub installation_code: String,
    pub raw_data_blob_storage_location: BlobStorageLocation,
    pub anonymized_blob_storage_location: BlobStorageLocation,
    pub date_created: DateTime<Utc>,
    #[schema(value_type = String)]
    pub anonymizer_workflow_status: WorkflowStatus,
    #[serde(default)]
    pub analyses: Vec<Analysis>,
}

impl InspectionData {
    pub fn create(id: InspectionDataId, new_data: NewInspectionData) -> Self {
        Self {
            id,
            inspection_id: new_data.inspection_id,
            installation_code: new_data.installation_code,
            raw_data_blob_storage_location: new_data.raw_data_blob_storage_location,
            anonymized_blob_storage_location: new_data.anonymized_blob_storage_location,
            date_created: Utc::now(),
            anonymizer_workflow_status: new_data.anonymizer_workflow_status,
            analyses: new_data.analyses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInspectionData {
    pub inspection_id: InspectionId,
    pub installation_code: String,
    pub raw_data_blob_storage_location: BlobStorageLocation,
    pub anonymized_blob_storage_location: BlobStorageLocation,
    pub anonymizer_workflow_status: WorkflowStatus,
    pub analyses: Vec<Analysis>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::not_started("NotStarted", WorkflowStatus::NotStarted)]
    #[case::started("Started", WorkflowStatus::Started)]
    #[case::exit_success("ExitSuccess", WorkflowStatus::ExitSuccess)]
    #[case::exit_failure("ExitFailure", WorkflowStatus::ExitFailure)]
    #[case::newer_pipeline("Paused", WorkflowStatus::Unrecognized("Paused".into()))]
    #[case::wrong_case("exitsuccess", WorkflowStatus::Unrecognized("exitsuccess".into()))]
    fn workflow_status_from_string(#[case] value: &str, #[case] expected: WorkflowStatus) {
        assert_eq!(expected, WorkflowStatus::from(value.to_owned()));
    }

    #[rstest]
    #[case::known(WorkflowStatus::Started)]
    #[case::unrecognized(WorkflowStatus::Unrecognized("Paused".into()))]
    fn workflow_status_keeps_its_string_form(#[case] status: WorkflowStatus) {
        let as_string = String::from(status.clone());

        assert_eq!(status, WorkflowStatus::from(as_string));
    }

    #[test]
    fn unknown_workflow_status_still_deserializes() {
        let status: WorkflowStatus = serde_json::from_str("\"Retrying\"").unwrap();

        assert_eq!(WorkflowStatus::Unrecognized("Retrying".into()), status);
    }
}
