use crate::model::BlobStorageLocation;
use chrono::{DateTime, Utc};
use mappings_core::model::AnalysisType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One run of an analysis against captured data.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub id: String,
    pub uri: String,
    pub source_path: BlobStorageLocation,
    pub destination_path: BlobStorageLocation,
    pub date_created: DateTime<Utc>,
    #[serde(rename = "type")]
    pub analysis_type: AnalysisType,
    #[serde(default)]
    pub status: AnalysisStatus,
    pub result: Option<AnalysisResult>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    NotStarted,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub id: String,
    #[serde(rename = "type")]
    pub result_type: String,
    pub value: String,
    pub confidence: Option<Confidence>,
}

/// Percentage confidence of an analysis result, always within `0..=100`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(try_from = "u8", into = "u8")]
#[schema(value_type = u8)]
pub struct Confidence(u8);

pub const MAX_CONFIDENCE: u8 = 100;

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
#[error("confidence must be between 0 and 100, got {0}")]
pub struct ConfidenceOutOfRange(pub u8);

impl Confidence {
    pub fn new(value: u8) -> Result<Self, ConfidenceOutOfRange> {
        if value > MAX_CONFIDENCE {
            Err(ConfidenceOutOfRange(value))
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Confidence {
    type Error = ConfidenceOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for u8 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::lower_bound(0)]
    #[case::middle(57)]
    #[case::upper_bound(100)]
    fn confidence_in_range_is_accepted(#[case] value: u8) {
        assert_eq!(value, Confidence::new(value).unwrap().value());
    }

    #[rstest]
    #[case::just_over(101)]
    #[case::max(u8::MAX)]
    fn confidence_out_of_range_is_rejected(#[case] value: u8) {
        assert_eq!(Err(ConfidenceOutOfRange(value)), Confidence::new(value));
    }

    #[test]
    fn out_of_range_confidence_fails_to_deserialize() {
        let result = serde_json::from_str::<AnalysisResult>(
            r#"{"id": "r1", "type": "blur", "value": "faces", "confidence": 150}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn missing_status_defaults_to_not_started() {
        let analysis: Analysis = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "uri": "https://example.com/a1",
            "source_path": {"storage_account": "sa", "blob_container": "raw", "blob_name": "b"},
            "destination_path": {"storage_account": "sa", "blob_container": "anon", "blob_name": "b"},
            "date_created": "2024-05-01T10:00:00Z",
            "type": "Anonymize",
            "result": null,
        }))
        .unwrap();

        assert_eq!(AnalysisStatus::NotStarted, analysis.status);
    }
}
