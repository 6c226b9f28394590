use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::provider::{
    ChatResponse, LlmProvider, Message, MessagePart, Role, ToolDefinition, ToolUseRequest,
};

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    embedding_model: Option<String>,
}

impl fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("embedding_model", &self.embedding_model)
            .finish()
    }
}

impl Clone for OpenAiProvider {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            embedding_model: self.embedding_model.clone(),
        }
    }
}

impl OpenAiProvider {
    #[must_use]
    pub fn new(
        api_key: String,
        mut base_url: String,
        model: String,
        max_tokens: u32,
        embedding_model: Option<String>,
    ) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            model,
            max_tokens,
            embedding_model,
        }
    }

    async fn post_json<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<String, LlmError> {
        let response = self
            .client
            .post(format!("{}{endpoint}", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimited);
        }

        let text = response.text().await.map_err(LlmError::Http)?;

        if !status.is_success() {
            tracing::error!("OpenAI API error {status}: {text}");
            return Err(LlmError::Other(format!(
                "OpenAI API request failed (status {status})"
            )));
        }

        Ok(text)
    }

    async fn send_request(&self, messages: &[Message]) -> Result<String, LlmError> {
        let api_messages = convert_messages(messages);
        let body = ChatRequest {
            model: &self.model,
            messages: &api_messages,
            max_tokens: self.max_tokens,
        };

        let text = self.post_json("/chat/completions", &body).await?;
        let resp: OpenAiChatResponse = serde_json::from_str(&text)?;

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse { provider: "openai" })
    }

    async fn send_tool_request(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatResponse, LlmError> {
        let api_messages = convert_messages_structured(messages);
        let api_tools: Vec<OpenAiTool> = tools
            .iter()
            .map(|t| OpenAiTool {
                r#type: "function",
                function: OpenAiFunction {
                    name: &t.name,
                    description: &t.description,
                    parameters: &t.parameters,
                },
            })
            .collect();

        let body = ToolChatRequest {
            model: &self.model,
            messages: &api_messages,
            max_tokens: self.max_tokens,
            tools: &api_tools,
        };

        let text = self.post_json("/chat/completions", &body).await?;
        let resp: ToolChatResponse = serde_json::from_str(&text)?;

        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse { provider: "openai" })?;

        Ok(parse_tool_choice(choice))
    }
}

impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        match self.send_request(messages).await {
            Err(LlmError::RateLimited) => {
                tracing::warn!("OpenAI rate limited, retrying in 1s");
                tokio::time::sleep(Duration::from_secs(1)).await;
                self.send_request(messages).await
            }
            other => other,
        }
    }

    async fn chat_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatResponse, LlmError> {
        match self.send_tool_request(messages, tools).await {
            Err(LlmError::RateLimited) => {
                tracing::warn!("OpenAI rate limited, retrying in 1s");
                tokio::time::sleep(Duration::from_secs(1)).await;
                self.send_tool_request(messages, tools).await
            }
            other => other,
        }
    }

    fn supports_tool_use(&self) -> bool {
        true
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        let mut vectors = self.embed_batch(&[text.to_owned()]).await?;
        vectors
            .pop()
            .ok_or(LlmError::EmptyResponse { provider: "openai" })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        let model = self
            .embedding_model
            .as_deref()
            .ok_or(LlmError::EmbedUnsupported { provider: "openai" })?;

        let body = EmbeddingRequest {
            input: texts,
            model,
        };

        let text = self.post_json("/embeddings", &body).await?;
        let resp: EmbeddingResponse = serde_json::from_str(&text)?;

        if resp.data.len() != texts.len() {
            return Err(LlmError::Other(format!(
                "embedding count mismatch: sent {}, got {}",
                texts.len(),
                resp.data.len()
            )));
        }

        Ok(resp.data.into_iter().map(|d| d.embedding).collect())
    }

    fn supports_embeddings(&self) -> bool {
        self.embedding_model.is_some()
    }
}

fn parse_tool_choice(choice: ToolChatChoice) -> ChatResponse {
    if let Some(tool_calls) = choice.message.tool_calls
        && !tool_calls.is_empty()
    {
        let text = if choice.message.content.is_empty() {
            None
        } else {
            Some(choice.message.content)
        };
        let calls = tool_calls
            .into_iter()
            .map(|tc| {
                let input = serde_json::from_str(&tc.function.arguments)
                    .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));
                ToolUseRequest {
                    id: tc.id,
                    name: tc.function.name,
                    input,
                }
            })
            .collect();
        return ChatResponse::ToolUse {
            text,
            tool_calls: calls,
        };
    }

    ChatResponse::Text(choice.message.content)
}

fn convert_messages(messages: &[Message]) -> Vec<ApiMessage<'_>> {
    messages
        .iter()
        .map(|msg| ApiMessage {
            role: role_str(msg.role),
            content: msg.to_llm_content(),
        })
        .collect()
}

fn role_str(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

fn convert_messages_structured(messages: &[Message]) -> Vec<StructuredApiMessage> {
    let mut result = Vec::new();

    for msg in messages {
        let has_tool_parts = msg.parts.iter().any(|p| {
            matches!(
                p,
                MessagePart::ToolUse { .. } | MessagePart::ToolResult { .. }
            )
        });

        if !has_tool_parts {
            result.push(StructuredApiMessage {
                role: role_str(msg.role).to_owned(),
                content: msg.to_llm_content().to_owned(),
                tool_calls: None,
                tool_call_id: None,
            });
            continue;
        }

        if msg.role == Role::Assistant {
            // Assistant ToolUse parts map onto the tool_calls field.
            let text_content: String = msg
                .parts
                .iter()
                .filter_map(|p| match p {
                    MessagePart::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join("");

            let tool_calls: Vec<OpenAiToolCallOut> = msg
                .parts
                .iter()
                .filter_map(|p| match p {
                    MessagePart::ToolUse { id, name, input } => Some(OpenAiToolCallOut {
                        id: id.clone(),
                        r#type: "function".to_owned(),
                        function: OpenAiFunctionCall {
                            name: name.clone(),
                            arguments: serde_json::to_string(input).unwrap_or_default(),
                        },
                    }),
                    _ => None,
                })
                .collect();

            result.push(StructuredApiMessage {
                role: "assistant".to_owned(),
                content: text_content,
                tool_calls: if tool_calls.is_empty() {
                    None
                } else {
                    Some(tool_calls)
                },
                tool_call_id: None,
            });
        } else {
            // ToolResult parts become one role:"tool" message each.
            for part in &msg.parts {
                match part {
                    MessagePart::ToolResult {
                        tool_use_id,
                        content,
                        ..
                    } => {
                        result.push(StructuredApiMessage {
                            role: "tool".to_owned(),
                            content: content.clone(),
                            tool_calls: None,
                            tool_call_id: Some(tool_use_id.clone()),
                        });
                    }
                    MessagePart::Text { text } if !text.is_empty() => {
                        result.push(StructuredApiMessage {
                            role: "user".to_owned(),
                            content: text.clone(),
                            tool_calls: None,
                            tool_call_id: None,
                        });
                    }
                    _ => {}
                }
            }
        }
    }

    result
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ApiMessage<'a>],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Serialize)]
struct OpenAiTool<'a> {
    r#type: &'a str,
    function: OpenAiFunction<'a>,
}

#[derive(Serialize)]
struct OpenAiFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Serialize)]
struct ToolChatRequest<'a> {
    model: &'a str,
    messages: &'a [StructuredApiMessage],
    max_tokens: u32,
    tools: &'a [OpenAiTool<'a>],
}

#[derive(Serialize)]
struct StructuredApiMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAiToolCallOut>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Serialize)]
struct OpenAiToolCallOut {
    id: String,
    r#type: String,
    function: OpenAiFunctionCall,
}

#[derive(Serialize)]
struct OpenAiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ToolChatResponse {
    choices: Vec<ToolChatChoice>,
}

#[derive(Deserialize)]
struct ToolChatChoice {
    message: ToolChatMessage,
}

#[derive(Deserialize)]
struct ToolChatMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Option<Vec<OpenAiToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiToolCall {
    id: String,
    function: OpenAiToolCallFunction,
}

#[derive(Deserialize)]
struct OpenAiToolCallFunction {
    name: String,
    arguments: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
    model: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_provider() -> OpenAiProvider {
        OpenAiProvider::new(
            "sk-test-key".into(),
            "https://api.openai.com/v1/".into(),
            "gpt-4o-mini".into(),
            1024,
            Some("text-embedding-3-small".into()),
        )
    }

    #[test]
    fn new_strips_trailing_slash() {
        let p = test_provider();
        assert_eq!(p.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn supports_tool_use_and_embeddings() {
        let p = test_provider();
        assert!(p.supports_tool_use());
        assert!(p.supports_embeddings());
    }

    #[test]
    fn no_embedding_model_disables_embeddings() {
        let p = OpenAiProvider::new(
            "k".into(),
            "https://api.openai.com/v1".into(),
            "gpt-4o-mini".into(),
            1024,
            None,
        );
        assert!(!p.supports_embeddings());
    }

    #[test]
    fn debug_redacts_api_key() {
        let p = test_provider();
        let dbg = format!("{p:?}");
        assert!(dbg.contains("<redacted>"));
        assert!(!dbg.contains("sk-test-key"));
    }

    #[test]
    fn convert_messages_maps_roles() {
        let messages = vec![
            Message::text(Role::System, "sys"),
            Message::text(Role::User, "hi"),
            Message::text(Role::Assistant, "hello"),
        ];
        let api = convert_messages(&messages);
        assert_eq!(api[0].role, "system");
        assert_eq!(api[1].role, "user");
        assert_eq!(api[2].role, "assistant");
    }

    #[test]
    fn structured_assistant_tool_use_becomes_tool_calls() {
        let messages = vec![Message::from_parts(
            Role::Assistant,
            vec![MessagePart::ToolUse {
                id: "call_1".into(),
                name: "lookup".into(),
                input: serde_json::json!({"employee_id": "1001"}),
            }],
        )];
        let api = convert_messages_structured(&messages);
        assert_eq!(api.len(), 1);
        assert_eq!(api[0].role, "assistant");
        let calls = api[0].tool_calls.as_ref().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "lookup");
        assert!(calls[0].function.arguments.contains("1001"));
    }

    #[test]
    fn structured_tool_results_become_tool_role_messages() {
        let messages = vec![Message::from_parts(
            Role::User,
            vec![
                MessagePart::ToolResult {
                    tool_use_id: "call_1".into(),
                    content: "found".into(),
                    is_error: false,
                },
                MessagePart::ToolResult {
                    tool_use_id: "call_2".into(),
                    content: "missed".into(),
                    is_error: true,
                },
            ],
        )];
        let api = convert_messages_structured(&messages);
        assert_eq!(api.len(), 2);
        assert!(api.iter().all(|m| m.role == "tool"));
        assert_eq!(api[0].tool_call_id.as_deref(), Some("call_1"));
        assert_eq!(api[1].tool_call_id.as_deref(), Some("call_2"));
    }

    #[test]
    fn structured_plain_message_passes_through() {
        let messages = vec![Message::text(Role::User, "plain question")];
        let api = convert_messages_structured(&messages);
        assert_eq!(api.len(), 1);
        assert_eq!(api[0].role, "user");
        assert_eq!(api[0].content, "plain question");
        assert!(api[0].tool_calls.is_none());
    }

    #[test]
    fn parse_tool_choice_with_calls() {
        let raw = serde_json::json!({
            "message": {
                "content": "",
                "tool_calls": [{
                    "id": "call_9",
                    "function": {
                        "name": "search_onboarding_knowledge",
                        "arguments": "{\"query\": \"harassment policy\"}"
                    }
                }]
            }
        });
        let choice: ToolChatChoice = serde_json::from_value(raw).unwrap();
        match parse_tool_choice(choice) {
            ChatResponse::ToolUse { text, tool_calls } => {
                assert!(text.is_none());
                assert_eq!(tool_calls.len(), 1);
                assert_eq!(tool_calls[0].name, "search_onboarding_knowledge");
                assert_eq!(
                    tool_calls[0].input["query"],
                    serde_json::json!("harassment policy")
                );
            }
            ChatResponse::Text(_) => panic!("expected tool use"),
        }
    }

    #[test]
    fn parse_tool_choice_plain_text() {
        let raw = serde_json::json!({
            "message": { "content": "all done" }
        });
        let choice: ToolChatChoice = serde_json::from_value(raw).unwrap();
        match parse_tool_choice(choice) {
            ChatResponse::Text(text) => assert_eq!(text, "all done"),
            ChatResponse::ToolUse { .. } => panic!("expected text"),
        }
    }

    #[test]
    fn parse_tool_choice_malformed_arguments_default_to_empty_object() {
        let raw = serde_json::json!({
            "message": {
                "content": "",
                "tool_calls": [{
                    "id": "call_1",
                    "function": { "name": "lookup", "arguments": "not json" }
                }]
            }
        });
        let choice: ToolChatChoice = serde_json::from_value(raw).unwrap();
        match parse_tool_choice(choice) {
            ChatResponse::ToolUse { tool_calls, .. } => {
                assert!(tool_calls[0].input.as_object().unwrap().is_empty());
            }
            ChatResponse::Text(_) => panic!("expected tool use"),
        }
    }
}
