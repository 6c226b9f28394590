//! Static per-document metadata and keyword-driven chunk priority.

use super::types::{DocType, Priority};

/// Base metadata for one known source document, copied into every chunk
/// derived from it.
#[derive(Clone, Debug)]
pub struct DocumentProfile {
    pub doc_type: DocType,
    pub department: String,
    pub priority_level: Priority,
    pub topic: String,
    pub subtopics: String,
    pub audience: String,
    pub last_updated: String,
}

/// Filename-stem table of known documents. Lookup is a case-insensitive
/// substring match; unknown filenames get a generic profile stamped with the
/// processing time.
#[derive(Clone, Debug)]
pub struct ProfileTable {
    entries: Vec<(String, DocumentProfile)>,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            entries: vec![
                (
                    "2018-shrm-public-policy-issues-guide".into(),
                    DocumentProfile {
                        doc_type: DocType::Compliance,
                        department: "Legal".into(),
                        priority_level: Priority::High,
                        topic: "labor_law_and_workplace_compliance".into(),
                        subtopics:
                            "background_checks,civil_rights,pay_equity,harassment,immigration"
                                .into(),
                        audience: "all_employees".into(),
                        last_updated: "2018-03-05".into(),
                    },
                ),
                (
                    "organization-coe".into(),
                    DocumentProfile {
                        doc_type: DocType::Policy,
                        department: "HR".into(),
                        priority_level: Priority::High,
                        topic: "code_of_ethics_and_conduct".into(),
                        subtopics: "ethical_behavior,decision_making,misconduct_reporting,values"
                            .into(),
                        audience: "all_employees".into(),
                        last_updated: "2001-01-01".into(),
                    },
                ),
                (
                    "shrm-hr-curriculum-guidelines".into(),
                    DocumentProfile {
                        doc_type: DocType::TrainingGuide,
                        department: "Learning_and_Development".into(),
                        priority_level: Priority::Medium,
                        topic: "hr_competencies_and_training_requirements".into(),
                        subtopics: "hr_education,competencies,internships,curriculum,certification"
                            .into(),
                        audience: "hr_professionals".into(),
                        last_updated: "2022-01-01".into(),
                    },
                ),
            ],
        }
    }
}

impl ProfileTable {
    #[must_use]
    pub fn from_entries(entries: Vec<(String, DocumentProfile)>) -> Self {
        Self { entries }
    }

    /// Look up the profile for a source filename. Falls back to a generic
    /// profile whose `last_updated` is stamped at lookup time.
    #[must_use]
    pub fn lookup(&self, filename: &str) -> DocumentProfile {
        let filename_lower = filename.to_lowercase();
        for (stem, profile) in &self.entries {
            if filename_lower.contains(stem.as_str()) {
                return profile.clone();
            }
        }

        DocumentProfile {
            doc_type: DocType::Policy,
            department: "General".into(),
            priority_level: Priority::Medium,
            topic: "general_hr".into(),
            subtopics: "unknown".into(),
            audience: "all_employees".into(),
            last_updated: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Keyword terms that promote a chunk to high priority: mandatory, legal and
/// compliance obligations.
const HIGH_PRIORITY_KEYWORDS: [&str; 17] = [
    "required",
    "must",
    "mandatory",
    "compliance",
    "illegal",
    "violation",
    "law",
    "prohibited",
    "civil rights",
    "harassment",
    "discrimination",
    "background check",
    "security",
    "immediate",
    "title vii",
    "eeoc",
    "penalty",
];

/// Keyword terms that demote a chunk to low priority: optional or reference
/// material.
const LOW_PRIORITY_KEYWORDS: [&str; 8] = [
    "optional",
    "recommended",
    "suggested",
    "may choose",
    "appendix",
    "acknowledgment",
    "reference",
    "bibliography",
];

/// Chunk-level priority override driven by keyword presence. The keyword
/// tables are plain data so tests can substitute fixtures.
#[derive(Clone, Debug)]
pub struct PriorityTagger {
    high: Vec<String>,
    low: Vec<String>,
}

impl Default for PriorityTagger {
    fn default() -> Self {
        Self {
            high: HIGH_PRIORITY_KEYWORDS.iter().map(ToString::to_string).collect(),
            low: LOW_PRIORITY_KEYWORDS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl PriorityTagger {
    #[must_use]
    pub fn new(high: Vec<String>, low: Vec<String>) -> Self {
        Self { high, low }
    }

    /// Case-insensitive substring scan. A high-priority term wins over a
    /// low-priority term; with neither present, the document's base priority
    /// stands.
    #[must_use]
    pub fn apply(&self, content: &str, base: Priority) -> Priority {
        let content_lower = content.to_lowercase();
        if self.high.iter().any(|kw| content_lower.contains(kw.as_str())) {
            return Priority::High;
        }
        if self.low.iter().any(|kw| content_lower.contains(kw.as_str())) {
            return Priority::Low;
        }
        base
    }
}
