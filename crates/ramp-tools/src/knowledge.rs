//! The five knowledge tools: semantic search, checklist generation, employee
//! lookup, readiness scoring, risk scoring.

use std::path::PathBuf;

use chrono::NaiveDate;
use ramp_kb::sources::{checklist::ChecklistFile, roster};
use ramp_kb::vector_store::{FieldCondition, FieldValue, VectorFilter, VectorStore};
use ramp_kb::DocType;
use ramp_llm::LlmProvider;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::executor::{ToolCall, ToolError, ToolExecutor, ToolOutput, deserialize_params};
use crate::registry::ToolDef;
use crate::reply::ToolReply;
use crate::scoring;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Question about HR policies, compliance rules, or onboarding
    pub query: String,
    /// Restrict results to one document type
    #[serde(default)]
    pub doc_type: Option<DocType>,
    /// Number of results to return (1-10)
    #[serde(default)]
    pub top_k: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ChecklistParams {
    /// Role of the new hire, e.g. "Software Engineer"
    pub role: String,
    /// Department of the new hire
    pub department: String,
    /// Start date in YYYY-MM-DD form
    pub start_date: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EmployeeParams {
    /// Employee identifier from the roster
    pub employee_id: String,
}

/// Executor for the knowledge tool set.
///
/// Holds the explicitly-constructed runtime context: provider and store
/// handles plus source paths, created once at startup and passed in. Every
/// invocation reads its source afresh; nothing is cached between calls.
pub struct KnowledgeTools<P, S> {
    provider: P,
    store: S,
    collection: String,
    checklist_path: PathBuf,
    roster_path: PathBuf,
}

impl<P: LlmProvider, S: VectorStore> KnowledgeTools<P, S> {
    #[must_use]
    pub fn new(
        provider: P,
        store: S,
        collection: impl Into<String>,
        checklist_path: PathBuf,
        roster_path: PathBuf,
    ) -> Self {
        Self {
            provider,
            store,
            collection: collection.into(),
            checklist_path,
            roster_path,
        }
    }

    #[must_use]
    pub fn definitions() -> Vec<ToolDef> {
        vec![
            ToolDef {
                id: "search_onboarding_knowledge",
                description: "Search the HR knowledge base for policies, tasks, or employee info",
                schema: schemars::schema_for!(SearchParams),
            },
            ToolDef {
                id: "generate_onboarding_checklist",
                description: "Generate an onboarding checklist with deadlines and urgency",
                schema: schemars::schema_for!(ChecklistParams),
            },
            ToolDef {
                id: "get_employee_onboarding_status",
                description: "Retrieve an employee's onboarding profile and start date",
                schema: schemars::schema_for!(EmployeeParams),
            },
            ToolDef {
                id: "evaluate_day1_readiness",
                description: "Assess whether an employee is ready for their first day",
                schema: schemars::schema_for!(EmployeeParams),
            },
            ToolDef {
                id: "calculate_onboarding_risk",
                description: "Calculate the risk of onboarding delay for an employee (0-100)",
                schema: schemars::schema_for!(EmployeeParams),
            },
        ]
    }

    /// Semantic search over the knowledge collection.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding or the store query fails.
    pub async fn search(&self, params: SearchParams) -> Result<ToolReply, ToolError> {
        let top_k = params.top_k.unwrap_or(3).clamp(1, 10);
        let vector = self.provider.embed(&params.query).await?;

        let filter = params.doc_type.map(|dt| VectorFilter {
            must: vec![FieldCondition {
                field: "doc_type".into(),
                value: FieldValue::Text(dt.as_str().into()),
            }],
        });

        let results = self
            .store
            .search(&self.collection, vector, top_k, filter)
            .await?;

        if results.is_empty() {
            return Ok(ToolReply::NoMatches);
        }

        let blocks: Vec<String> = results
            .iter()
            .map(|point| {
                let doc_type = payload_str(point, "doc_type");
                let source = payload_str(point, "source_file");
                let content = payload_str(point, "content");
                format!("[{doc_type} | {source}]\n{content}")
            })
            .collect();

        Ok(ToolReply::Answer(blocks.join("\n\n---\n\n")))
    }

    /// Checklist for a role with per-task urgency, read fresh from disk.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParams` for an unparseable date and `Source` when the
    /// checklist file is unreadable.
    pub fn checklist(&self, params: &ChecklistParams) -> Result<ToolReply, ToolError> {
        let start = parse_iso_date(&params.start_date)?;
        let today = chrono::Local::now().date_naive();
        let file = ChecklistFile::load(&self.checklist_path)?;
        Ok(render_checklist(
            &file,
            &params.role,
            &params.department,
            start,
            today,
        ))
    }

    /// Employee profile line with computed days-until-start.
    ///
    /// # Errors
    ///
    /// Returns `Source` when the roster is unreadable.
    pub fn employee_status(&self, employee_id: &str) -> Result<ToolReply, ToolError> {
        self.with_employee(employee_id, render_status)
    }

    /// Day-1 readiness score.
    ///
    /// # Errors
    ///
    /// Returns `Source` when the roster is unreadable.
    pub fn readiness(&self, employee_id: &str) -> Result<ToolReply, ToolError> {
        self.with_employee(employee_id, render_readiness)
    }

    /// Onboarding-delay risk score.
    ///
    /// # Errors
    ///
    /// Returns `Source` when the roster is unreadable.
    pub fn risk(&self, employee_id: &str) -> Result<ToolReply, ToolError> {
        self.with_employee(employee_id, render_risk)
    }

    fn with_employee(
        &self,
        employee_id: &str,
        render: fn(&roster::EmployeeRecord, NaiveDate) -> String,
    ) -> Result<ToolReply, ToolError> {
        let today = chrono::Local::now().date_naive();
        match roster::find_employee(&self.roster_path, employee_id)? {
            Some(record) => Ok(ToolReply::Answer(render(&record, today))),
            None => Ok(ToolReply::NotFound),
        }
    }
}

fn payload_str<'a>(point: &'a ramp_kb::ScoredVectorPoint, key: &str) -> &'a str {
    point
        .payload
        .get(key)
        .and_then(serde_json::Value::as_str)
        .unwrap_or("")
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, ToolError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| ToolError::InvalidParams {
        message: format!("invalid start_date {raw:?}: {e}"),
    })
}

fn render_checklist(
    file: &ChecklistFile,
    requested_role: &str,
    department: &str,
    start: NaiveDate,
    today: NaiveDate,
) -> ToolReply {
    let days_until_start = roster::days_until(start, today);

    let Some((role, role_checklist)) = file.match_role(requested_role) else {
        return ToolReply::Answer("No onboarding tasks are defined for any role.".into());
    };

    let mut lines = vec![format!(
        "Onboarding checklist for {role} ({department}), starting {start}:"
    )];
    for task in &role_checklist.tasks {
        let due_in = days_until_start - task.due_before_start_days;
        let status = scoring::task_status(due_in);
        lines.push(format!(
            "{status} | {task} (Dept: {department})",
            task = task.task,
            department = task.department,
        ));
    }

    ToolReply::Answer(lines.join("\n"))
}

fn render_status(record: &roster::EmployeeRecord, today: NaiveDate) -> String {
    let days_until_start = roster::days_until(record.start_date, today);
    format!(
        "{name} - {role} ({department})\nStart Date: {start} ({days_until_start} days)",
        name = record.full_name(),
        role = record.role,
        department = record.department,
        start = record.start_date,
    )
}

fn render_readiness(record: &roster::EmployeeRecord, today: NaiveDate) -> String {
    let days_until_start = roster::days_until(record.start_date, today);
    let result = scoring::readiness(days_until_start);
    let blockers = if result.blockers.is_empty() {
        "None".to_owned()
    } else {
        result.blockers.join(", ")
    };
    format!(
        "Day-1 Readiness: {label}\nScore: {score}/100\nBlockers: {blockers}",
        label = result.label,
        score = result.score,
    )
}

fn render_risk(record: &roster::EmployeeRecord, today: NaiveDate) -> String {
    let days_until_start = roster::days_until(record.start_date, today);
    let result = scoring::risk(days_until_start, &record.employment_type);
    format!(
        "Risk Score: {score}/100 - {level} risk of onboarding delay",
        score = result.score,
        level = result.level,
    )
}

impl<P: LlmProvider, S: VectorStore> ToolExecutor for KnowledgeTools<P, S> {
    async fn execute_tool_call(&self, call: &ToolCall) -> Result<Option<ToolOutput>, ToolError> {
        tracing::debug!(tool = %call.tool_id, "executing knowledge tool");
        let reply = match call.tool_id.as_str() {
            "search_onboarding_knowledge" => {
                let params: SearchParams = deserialize_params(&call.params)?;
                self.search(params).await?
            }
            "generate_onboarding_checklist" => {
                let params: ChecklistParams = deserialize_params(&call.params)?;
                self.checklist(&params)?
            }
            "get_employee_onboarding_status" => {
                let params: EmployeeParams = deserialize_params(&call.params)?;
                self.employee_status(&params.employee_id)?
            }
            "evaluate_day1_readiness" => {
                let params: EmployeeParams = deserialize_params(&call.params)?;
                self.readiness(&params.employee_id)?
            }
            "calculate_onboarding_risk" => {
                let params: EmployeeParams = deserialize_params(&call.params)?;
                self.risk(&params.employee_id)?
            }
            _ => return Ok(None),
        };

        Ok(Some(ToolOutput {
            tool_name: call.tool_id.clone(),
            summary: reply.render(),
        }))
    }

    fn tool_definitions(&self) -> Vec<ToolDef> {
        Self::definitions()
    }
}
