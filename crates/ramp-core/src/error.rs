#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    Llm(#[from] ramp_llm::LlmError),

    #[error("tool error: {0}")]
    Tool(#[from] ramp_tools::ToolError),
}
