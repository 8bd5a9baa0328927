use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use utoipa::ToSchema;

/// Opaque identifier of an analysis mapping. Generated by the store on creation.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct MappingId(String);

impl MappingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for MappingId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for MappingId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(
    Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum AnalysisType {
    Anonymize,
}

// request strings accepted for each analysis type, matched case-sensitively
const ANALYSIS_TYPE_KEYS: &[(&str, AnalysisType)] = &[("anonymize", AnalysisType::Anonymize)];

impl AnalysisType {
    /// Looks `value` up in the set of known analysis type keys.
    pub fn parse(value: &str) -> Option<Self> {
        ANALYSIS_TYPE_KEYS
            .iter()
            .find(|(key, _)| *key == value)
            .map(|(_, ty)| *ty)
    }

    /// Maps an inspection description onto the analysis it calls for.
    pub fn from_description(description: &str) -> Result<Self, ValidationError> {
        Self::parse(description)
            .ok_or_else(|| ValidationError::UnsupportedDescription(description.to_owned()))
    }

    /// The key this type is parsed from, also used when persisting it.
    pub fn key(&self) -> &'static str {
        match self {
            AnalysisType::Anonymize => "anonymize",
        }
    }
}

impl Display for AnalysisType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("tag_id cannot be empty")]
    MissingTagId,
    #[error("inspection_description cannot be empty")]
    MissingInspectionDescription,
    #[error("cannot add analysis type '{0}' to the analysis mapping")]
    CannotAddType(String),
    #[error("failed to parse inspection description '{0}' - not supported")]
    UnsupportedDescription(String),
}

/// Validated input for a mapping that doesn't exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    tag_id: String,
    inspection_description: String,
    analysis_type: Option<AnalysisType>,
}

impl NewMapping {
    pub fn new(
        tag_id: String,
        inspection_description: String,
        analysis_type: Option<AnalysisType>,
    ) -> Result<Self, ValidationError> {
        if tag_id.is_empty() {
            return Err(ValidationError::MissingTagId);
        }
        if inspection_description.is_empty() {
            return Err(ValidationError::MissingInspectionDescription);
        }
        Ok(Self {
            tag_id,
            inspection_description,
            analysis_type,
        })
    }

    pub fn tag_id(&self) -> &str {
        &self.tag_id
    }

    pub fn inspection_description(&self) -> &str {
        &self.inspection_description
    }

    pub fn analysis_type(&self) -> Option<AnalysisType> {
        self.analysis_type
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct AnalysisMapping {
    pub id: MappingId,
    pub tag_id: String,
    pub inspection_description: String,
    pub analyses_to_be_run: BTreeSet<AnalysisType>,
}

impl AnalysisMapping {
    pub fn create(id: MappingId, new_mapping: NewMapping) -> Self {
        Self {
            id,
            tag_id: new_mapping.tag_id,
            inspection_description: new_mapping.inspection_description,
            analyses_to_be_run: new_mapping.analysis_type.into_iter().collect(),
        }
    }

    /// Adds `analysis_type` to the analyses to run. Returns `false`, leaving the mapping
    /// untouched, if it was already there.
    pub fn add_analysis(&mut self, analysis_type: AnalysisType) -> bool {
        self.analyses_to_be_run.insert(analysis_type)
    }

    pub fn runs(&self, analysis_type: AnalysisType) -> bool {
        self.analyses_to_be_run.contains(&analysis_type)
    }
}
