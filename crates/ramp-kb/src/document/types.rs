use serde::{Deserialize, Serialize};

/// Coarse category of a knowledge chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Compliance,
    Policy,
    TrainingGuide,
    Checklist,
    EmployeeRecord,
}

impl DocType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compliance => "compliance",
            Self::Policy => "policy",
            Self::TrainingGuide => "training_guide",
            Self::Checklist => "checklist",
            Self::EmployeeRecord => "employee_record",
        }
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-chunk metadata stored alongside the content in the vector collection.
///
/// `chunk_id` is unique within a run; `chunk_index` is unique within
/// `source_file`. The optional fields are populated only for checklist and
/// roster chunks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub doc_type: DocType,
    pub department: String,
    pub priority_level: Priority,
    pub topic: String,
    pub subtopics: String,
    pub audience: String,
    pub source_file: String,
    pub chunk_index: usize,
    pub chunk_id: String,
    pub ingestion_date: String,
    pub last_updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&DocType::TrainingGuide).unwrap(),
            "\"training_guide\""
        );
        assert_eq!(
            serde_json::to_string(&DocType::EmployeeRecord).unwrap(),
            "\"employee_record\""
        );
    }

    #[test]
    fn priority_round_trips() {
        let p: Priority = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(p, Priority::High);
        assert_eq!(p.to_string(), "high");
    }

    #[test]
    fn metadata_optional_fields_omitted_when_none() {
        let meta = ChunkMetadata {
            doc_type: DocType::Policy,
            department: "HR".into(),
            priority_level: Priority::Medium,
            topic: "ethics".into(),
            subtopics: "values".into(),
            audience: "all_employees".into(),
            source_file: "organization-coe.pdf".into(),
            chunk_index: 0,
            chunk_id: "organization-coe_0".into(),
            ingestion_date: "2026-01-01T00:00:00Z".into(),
            last_updated: "2001-01-01".into(),
            role: None,
            employee_id: None,
            task_id: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("role").is_none());
        assert!(json.get("employee_id").is_none());
        assert_eq!(json["doc_type"], "policy");
    }
}
