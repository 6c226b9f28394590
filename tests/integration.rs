//! End-to-end flow: ingest sources into an in-memory store, then answer
//! questions through the agent with a scripted provider driving real tool
//! execution.

use std::path::Path;
use std::pin::Pin;

use chrono::Duration;
use ramp_core::Agent;
use ramp_kb::document::pipeline::POLICY_SOURCES;
use ramp_kb::document::{DocumentError, DocumentLoader};
use ramp_kb::{InMemoryVectorStore, IngestionPipeline, PipelineConfig};
use ramp_llm::mock::MockProvider;
use ramp_llm::provider::{ChatResponse, MessagePart, ToolUseRequest};
use ramp_tools::{KnowledgeTools, ToolRegistry};

struct StubLoader;

impl DocumentLoader for StubLoader {
    fn load(
        &self,
        _path: &Path,
    ) -> Pin<Box<dyn Future<Output = Result<String, DocumentError>> + Send + '_>> {
        Box::pin(async {
            Ok("All new hires must complete a background check before their start date. \
                The compliance team reviews every submission and reports violations to \
                the legal department for follow-up."
                .to_owned())
        })
    }
}

fn write_sources(dir: &Path) {
    std::fs::create_dir_all(dir.join("policies")).unwrap();
    std::fs::create_dir_all(dir.join("checklists")).unwrap();
    std::fs::create_dir_all(dir.join("raw")).unwrap();

    for name in POLICY_SOURCES {
        std::fs::write(dir.join("policies").join(name), "placeholder").unwrap();
    }

    std::fs::write(
        dir.join("checklists/onboarding_master.json"),
        serde_json::json!({
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
                }
            }
        })
        .to_string(),
    )
    .unwrap();

    let start = chrono::Local::now().date_naive() + Duration::days(5);
    std::fs::write(
        dir.join("raw/employees.csv"),
        format!(
            "employee_id,first_name,last_name,role,department,start_date,location,employment_type,manager_email\n\
             1001,Jane,Doe,Software Engineer,Engineering,{start},Remote,contract,mgr@example.com\n"
        ),
    )
    .unwrap();
}

fn pipeline_config(dir: &Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: dir.to_path_buf(),
        collection: "test_kb".into(),
        vector_size: 4,
        ..PipelineConfig::default()
    }
}

fn tool_call(name: &str, input: serde_json::Value) -> ChatResponse {
    ChatResponse::ToolUse {
        text: None,
        tool_calls: vec![ToolUseRequest {
            id: format!("call_{name}"),
            name: name.into(),
            input,
        }],
    }
}

#[tokio::test]
async fn ingest_then_answer_risk_question() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let provider = MockProvider::with_responses(vec![
        tool_call(
            "calculate_onboarding_risk",
            serde_json::json!({"employee_id": "1001"}),
        ),
        ChatResponse::Text("Employee 1001 is a high onboarding risk.".into()),
    ])
    .with_embedding(vec![0.4, 0.3, 0.2, 0.1]);

    let store = InMemoryVectorStore::new();
    let pipeline = IngestionPipeline::new(
        pipeline_config(dir.path()),
        Box::new(StubLoader),
        &provider,
        &store,
    );
    let report = pipeline.run().await.unwrap();
    // 3 policy chunks + 1 task + 1 employee.
    assert_eq!(report.total, 5);
    assert_eq!(store.len("test_kb"), 5);
    drop(pipeline);

    let tools = KnowledgeTools::new(
        provider.clone(),
        store,
        "test_kb",
        dir.path().join("checklists/onboarding_master.json"),
        dir.path().join("raw/employees.csv"),
    );
    let registry = ToolRegistry::from_definitions(
        KnowledgeTools::<MockProvider, InMemoryVectorStore>::definitions(),
    );
    let mut agent = Agent::new(provider, tools, registry, "you are an onboarding assistant");

    let answer = agent
        .run_turn("How risky is onboarding for employee 1001?")
        .await
        .unwrap();
    assert_eq!(answer, "Employee 1001 is a high onboarding risk.");

    // The real tool ran: a contract hire starting in 5 days scores 50/100.
    let tool_result = &agent.messages()[2];
    match &tool_result.parts[0] {
        MessagePart::ToolResult {
            content, is_error, ..
        } => {
            assert!(!*is_error);
            assert!(content.contains("Risk Score: 50/100 - HIGH"), "{content}");
        }
        other => panic!("expected tool result, got {other:?}"),
    }
}

#[tokio::test]
async fn ingest_then_search_returns_stored_chunks() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let provider = MockProvider::with_responses(vec![
        tool_call(
            "search_onboarding_knowledge",
            serde_json::json!({"query": "background checks", "top_k": 5}),
        ),
        ChatResponse::Text("Background checks are mandatory.".into()),
    ])
    .with_embedding(vec![0.4, 0.3, 0.2, 0.1]);

    let store = InMemoryVectorStore::new();
    let pipeline = IngestionPipeline::new(
        pipeline_config(dir.path()),
        Box::new(StubLoader),
        &provider,
        &store,
    );
    pipeline.run().await.unwrap();
    drop(pipeline);

    let tools = KnowledgeTools::new(
        provider.clone(),
        store,
        "test_kb",
        dir.path().join("checklists/onboarding_master.json"),
        dir.path().join("raw/employees.csv"),
    );
    let registry = ToolRegistry::from_definitions(
        KnowledgeTools::<MockProvider, InMemoryVectorStore>::definitions(),
    );
    let mut agent = Agent::new(provider, tools, registry, "you are an onboarding assistant");

    agent
        .run_turn("What do our policies say about background checks?")
        .await
        .unwrap();

    let tool_result = &agent.messages()[2];
    match &tool_result.parts[0] {
        MessagePart::ToolResult { content, .. } => {
            assert!(content.contains("background check"), "{content}");
            assert!(content.contains('['), "expected doc_type header: {content}");
        }
        other => panic!("expected tool result, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_employee_surfaces_sentinel_to_model() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path());

    let provider = MockProvider::with_responses(vec![
        tool_call(
            "get_employee_onboarding_status",
            serde_json::json!({"employee_id": "9999"}),
        ),
        ChatResponse::Text("I could not find that employee.".into()),
    ])
    .with_embedding(vec![0.4, 0.3, 0.2, 0.1]);

    let store = InMemoryVectorStore::new();
    let tools = KnowledgeTools::new(
        provider.clone(),
        store,
        "test_kb",
        dir.path().join("checklists/onboarding_master.json"),
        dir.path().join("raw/employees.csv"),
    );
    let registry = ToolRegistry::from_definitions(
        KnowledgeTools::<MockProvider, InMemoryVectorStore>::definitions(),
    );
    let mut agent = Agent::new(provider, tools, registry, "you are an onboarding assistant");

    agent.run_turn("Where is employee 9999?").await.unwrap();

    let tool_result = &agent.messages()[2];
    match &tool_result.parts[0] {
        MessagePart::ToolResult {
            content, is_error, ..
        } => {
            // A miss is ordinary tool output, not an error.
            assert!(!*is_error);
            assert_eq!(content, "Employee not found.");
        }
        other => panic!("expected tool result, got {other:?}"),
    }
}
