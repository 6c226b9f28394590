//! Tool-calling conversation loop.
//!
//! Two logical states alternate within a turn: an LLM decision step and a
//! tool execution step. The turn ends when the model answers without
//! requesting tools, or when the hop cap forces a best-effort answer.

use ramp_llm::LlmProvider;
use ramp_llm::provider::{ChatResponse, Message, MessagePart, Role};
use ramp_tools::{ToolCall, ToolExecutor, ToolRegistry};

use crate::error::AgentError;

pub struct Agent<P: LlmProvider, T: ToolExecutor> {
    provider: P,
    executor: T,
    registry: ToolRegistry,
    system_prompt: String,
    max_tool_hops: usize,
    messages: Vec<Message>,
}

impl<P: LlmProvider, T: ToolExecutor> Agent<P, T> {
    #[must_use]
    pub fn new(
        provider: P,
        executor: T,
        registry: ToolRegistry,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            executor,
            registry,
            system_prompt: system_prompt.into(),
            max_tool_hops: 8,
            messages: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_max_tool_hops(mut self, max_tool_hops: usize) -> Self {
        self.max_tool_hops = max_tool_hops;
        self
    }

    /// Accumulated conversation history (excluding the system prompt, which
    /// is prepended per request).
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Drop the conversation history.
    pub fn reset(&mut self) {
        self.messages.clear();
    }

    /// Run one conversation turn: append the user message, loop through tool
    /// execution until the model produces a final answer, and return it.
    ///
    /// The loop is capped at `max_tool_hops` LLM calls; past the cap a final
    /// tool-free call produces a best-effort answer instead of looping
    /// forever.
    ///
    /// # Errors
    ///
    /// Returns an error if an LLM call fails. Tool failures do not abort the
    /// turn; they are surfaced to the model as error-flagged results.
    pub async fn run_turn(&mut self, input: &str) -> Result<String, AgentError> {
        self.messages.push(Message::text(Role::User, input));
        let tool_defs = self.registry.definitions();

        for hop in 0..self.max_tool_hops {
            let response = self
                .provider
                .chat_with_tools(&self.request_messages(), &tool_defs)
                .await?;

            match response {
                ChatResponse::Text(text) => {
                    self.messages.push(Message::text(Role::Assistant, &text));
                    return Ok(text);
                }
                ChatResponse::ToolUse { text, tool_calls } => {
                    tracing::debug!(hop, calls = tool_calls.len(), "executing tool calls");
                    self.push_assistant_tool_use(text, &tool_calls);

                    let mut result_parts = Vec::with_capacity(tool_calls.len());
                    for tc in &tool_calls {
                        result_parts.push(self.execute_one(tc).await);
                    }
                    self.messages
                        .push(Message::from_parts(Role::User, result_parts));
                }
            }
        }

        // Hop cap reached. Ask for a final answer without tools rather than
        // looping on a model that keeps requesting them.
        tracing::warn!(
            max_tool_hops = self.max_tool_hops,
            "tool hop cap reached, requesting final answer"
        );
        let mut request = self.request_messages();
        request.push(Message::text(
            Role::User,
            "Answer now using only the information gathered so far. \
             Do not request any more tools.",
        ));
        let text = self.provider.chat(&request).await?;
        self.messages.push(Message::text(Role::Assistant, &text));
        Ok(text)
    }

    fn request_messages(&self) -> Vec<Message> {
        let mut request = Vec::with_capacity(self.messages.len() + 1);
        request.push(Message::text(Role::System, &self.system_prompt));
        request.extend(self.messages.iter().cloned());
        request
    }

    fn push_assistant_tool_use(
        &mut self,
        text: Option<String>,
        tool_calls: &[ramp_llm::provider::ToolUseRequest],
    ) {
        let mut parts = Vec::new();
        if let Some(t) = text
            && !t.is_empty()
        {
            parts.push(MessagePart::Text { text: t });
        }
        for tc in tool_calls {
            parts.push(MessagePart::ToolUse {
                id: tc.id.clone(),
                name: tc.name.clone(),
                input: tc.input.clone(),
            });
        }
        self.messages.push(Message::from_parts(Role::Assistant, parts));
    }

    /// Execute a single requested tool call sequentially; failures become
    /// error-flagged results the model can reason over.
    async fn execute_one(&self, tc: &ramp_llm::provider::ToolUseRequest) -> MessagePart {
        let params = if let serde_json::Value::Object(map) = &tc.input {
            map.clone()
        } else {
            serde_json::Map::new()
        };
        let call = ToolCall {
            tool_id: tc.name.clone(),
            params,
        };

        let (content, is_error) = match self.executor.execute_tool_call(&call).await {
            Ok(Some(output)) => (output.summary, false),
            Ok(None) => (format!("Unknown tool: {}", tc.name), true),
            Err(e) => {
                tracing::warn!(tool = %tc.name, error = %e, "tool execution failed");
                (format!("[error] {e}"), true)
            }
        };

        MessagePart::ToolResult {
            tool_use_id: tc.id.clone(),
            content,
            is_error,
        }
    }

    #[must_use]
    pub fn into_parts(self) -> (P, T) {
        (self.provider, self.executor)
    }
}
