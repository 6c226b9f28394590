use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::types::Priority;
use crate::error::KbError;

/// One onboarding task belonging to a role.
///
/// `due_before_start_days` may be negative for tasks due after the start
/// date.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChecklistTask {
    pub id: String,
    pub task: String,
    pub department: String,
    pub priority: Priority,
    pub due_before_start_days: i64,
    pub estimated_time_minutes: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoleChecklist {
    pub tasks: Vec<ChecklistTask>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChecklistFile {
    pub roles: BTreeMap<String, RoleChecklist>,
}

impl ChecklistFile {
    /// Read and parse the checklist JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, KbError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Fuzzy role match: the first known role whose name is contained,
    /// case-insensitively, in the requested string. Falls back to the first
    /// known role when nothing matches.
    #[must_use]
    pub fn match_role(&self, requested: &str) -> Option<(&str, &RoleChecklist)> {
        let requested_lower = requested.to_lowercase();
        self.roles
            .iter()
            .find(|(name, _)| requested_lower.contains(&name.to_lowercase()))
            .or_else(|| self.roles.iter().next())
            .map(|(name, checklist)| (name.as_str(), checklist))
    }
}

/// Render one task as the natural-language sentence stored in the knowledge
/// base.
#[must_use]
pub fn task_sentence(role: &str, task: &ChecklistTask) -> String {
    format!(
        "Onboarding Task for {role}: {task}. Handled by {department} department. \
         Priority: {priority}. Must be completed {due} days before employee start date. \
         Estimated time: {minutes} minutes.",
        task = task.task,
        department = task.department,
        priority = task.priority,
        due = task.due_before_start_days,
        minutes = task.estimated_time_minutes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_file() -> ChecklistFile {
        serde_json::from_value(serde_json::json!({
            "roles": {
                "Software Engineer": {
                    "tasks": [{
                        "id": "se-01",
                        "task": "Provision laptop",
                        "department": "IT",
                        "priority": "high",
                        "due_before_start_days": 3,
                        "estimated_time_minutes": 45
                    }]
                },
                "Account Manager": {
                    "tasks": [{
                        "id": "am-01",
                        "task": "CRM access",
                        "department": "Sales Ops",
                        "priority": "medium",
                        "due_before_start_days": 1,
                        "estimated_time_minutes": 20
                    }]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn parses_nested_roles_mapping() {
        let file = sample_file();
        assert_eq!(file.roles.len(), 2);
        let se = &file.roles["Software Engineer"];
        assert_eq!(se.tasks[0].id, "se-01");
        assert_eq!(se.tasks[0].priority, Priority::High);
        assert_eq!(se.tasks[0].due_before_start_days, 3);
    }

    #[test]
    fn match_role_exact() {
        let file = sample_file();
        let (name, _) = file.match_role("Software Engineer").unwrap();
        assert_eq!(name, "Software Engineer");
    }

    #[test]
    fn match_role_substring_case_insensitive() {
        let file = sample_file();
        let (name, _) = file.match_role("senior software engineer II").unwrap();
        assert_eq!(name, "Software Engineer");
    }

    #[test]
    fn match_role_falls_back_to_first_known_role() {
        let file = sample_file();
        let (name, _) = file.match_role("Astronaut").unwrap();
        // BTreeMap keeps roles sorted; the fallback is the first entry.
        assert_eq!(name, "Account Manager");
    }

    #[test]
    fn match_role_empty_file() {
        let file = ChecklistFile {
            roles: BTreeMap::new(),
        };
        assert!(file.match_role("anything").is_none());
    }

    #[test]
    fn task_sentence_mentions_all_fields() {
        let file = sample_file();
        let task = &file.roles["Software Engineer"].tasks[0];
        let sentence = task_sentence("Software Engineer", task);
        assert!(sentence.contains("Provision laptop"));
        assert!(sentence.contains("IT department"));
        assert!(sentence.contains("Priority: high"));
        assert!(sentence.contains("3 days before"));
        assert!(sentence.contains("45 minutes"));
    }

    #[test]
    fn negative_due_days_parse() {
        let task: ChecklistTask = serde_json::from_value(serde_json::json!({
            "id": "x-01",
            "task": "Post-start survey",
            "department": "HR",
            "priority": "low",
            "due_before_start_days": -7,
            "estimated_time_minutes": 10
        }))
        .unwrap();
        assert_eq!(task.due_before_start_days, -7);
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(ChecklistFile::load(Path::new("/nonexistent/checklist.json")).is_err());
    }
}
