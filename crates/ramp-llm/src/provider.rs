use serde::{Deserialize, Serialize};

use crate::LlmError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One block of a structured message. Plain conversations use `Text` only;
/// tool-use turns carry `ToolUse` parts on assistant messages and
/// `ToolResult` parts on the following user message.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

impl Message {
    #[must_use]
    pub fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            parts: vec![],
        }
    }

    /// Build a message from structured parts, rendering a plain-text summary
    /// into `content` for backends that only accept flat strings.
    #[must_use]
    pub fn from_parts(role: Role, parts: Vec<MessagePart>) -> Self {
        let content = parts
            .iter()
            .map(|p| match p {
                MessagePart::Text { text } => text.clone(),
                MessagePart::ToolUse { name, input, .. } => {
                    format!("[tool_use: {name}] {input}")
                }
                MessagePart::ToolResult { content, .. } => {
                    format!("[tool_result]\n{content}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            role,
            content,
            parts,
        }
    }

    #[must_use]
    pub fn to_llm_content(&self) -> &str {
        &self.content
    }
}

/// A tool the provider may invoke, described by a JSON Schema.
#[derive(Clone, Debug)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// A single tool invocation requested by the model.
#[derive(Clone, Debug)]
pub struct ToolUseRequest {
    pub id: String,
    pub name: String,
    pub input: serde_json::Value,
}

/// Outcome of a tool-enabled chat call: either a final text answer or a set
/// of tool invocation requests (optionally preceded by text).
#[derive(Clone, Debug)]
pub enum ChatResponse {
    Text(String),
    ToolUse {
        text: Option<String>,
        tool_calls: Vec<ToolUseRequest>,
    },
}

pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Send messages to the LLM and return the assistant response text.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails to communicate or the response
    /// is invalid.
    fn chat(&self, messages: &[Message]) -> impl Future<Output = Result<String, LlmError>> + Send;

    /// Send messages with bound tool definitions; the response may request
    /// tool invocations.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider fails or the response cannot be
    /// parsed.
    fn chat_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> impl Future<Output = Result<ChatResponse, LlmError>> + Send;

    fn supports_tool_use(&self) -> bool {
        false
    }

    /// Embed a single query string.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::EmbedUnsupported`] when the backend has no
    /// embedding model configured.
    fn embed(&self, text: &str) -> impl Future<Output = Result<Vec<f32>, LlmError>> + Send;

    /// Embed a batch of documents, one vector per input, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedding call fails.
    fn embed_batch(
        &self,
        texts: &[String],
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, LlmError>> + Send;

    fn supports_embeddings(&self) -> bool {
        false
    }
}
