//! Test-only mock LLM provider.

use std::sync::{Arc, Mutex};

use crate::provider::{ChatResponse, LlmProvider, Message, ToolDefinition};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<ChatResponse>>>,
    pub default_response: String,
    pub embedding: Vec<f32>,
    pub supports_embeddings: bool,
    pub fail_chat: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            embedding: vec![0.0; 8],
            supports_embeddings: false,
            fail_chat: false,
        }
    }
}

impl MockProvider {
    /// Scripted responses are consumed front-to-back; once drained, every
    /// call returns the default text response.
    #[must_use]
    pub fn with_responses(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self.supports_embeddings = true;
        self
    }

    fn next_response(&self) -> ChatResponse {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            ChatResponse::Text(self.default_response.clone())
        } else {
            responses.remove(0)
        }
    }
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn chat(&self, _messages: &[Message]) -> Result<String, crate::LlmError> {
        if self.fail_chat {
            return Err(crate::LlmError::Other("mock LLM error".into()));
        }
        match self.next_response() {
            ChatResponse::Text(text) => Ok(text),
            ChatResponse::ToolUse { text, .. } => Ok(text.unwrap_or_default()),
        }
    }

    async fn chat_with_tools(
        &self,
        _messages: &[Message],
        _tools: &[ToolDefinition],
    ) -> Result<ChatResponse, crate::LlmError> {
        if self.fail_chat {
            return Err(crate::LlmError::Other("mock LLM error".into()));
        }
        Ok(self.next_response())
    }

    fn supports_tool_use(&self) -> bool {
        true
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, crate::LlmError> {
        if self.supports_embeddings {
            Ok(self.embedding.clone())
        } else {
            Err(crate::LlmError::EmbedUnsupported { provider: "mock" })
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, crate::LlmError> {
        if self.supports_embeddings {
            Ok(vec![self.embedding.clone(); texts.len()])
        } else {
            Err(crate::LlmError::EmbedUnsupported { provider: "mock" })
        }
    }

    fn supports_embeddings(&self) -> bool {
        self.supports_embeddings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ToolUseRequest;

    #[tokio::test]
    async fn scripted_responses_consumed_in_order() {
        let provider = MockProvider::with_responses(vec![
            ChatResponse::ToolUse {
                text: None,
                tool_calls: vec![ToolUseRequest {
                    id: "1".into(),
                    name: "lookup".into(),
                    input: serde_json::json!({}),
                }],
            },
            ChatResponse::Text("done".into()),
        ]);

        let first = provider.chat_with_tools(&[], &[]).await.unwrap();
        assert!(matches!(first, ChatResponse::ToolUse { .. }));
        let second = provider.chat_with_tools(&[], &[]).await.unwrap();
        match second {
            ChatResponse::Text(text) => assert_eq!(text, "done"),
            ChatResponse::ToolUse { .. } => panic!("expected text"),
        }
    }

    #[tokio::test]
    async fn drained_script_falls_back_to_default() {
        let provider = MockProvider::with_responses(vec![]);
        let response = provider.chat(&[]).await.unwrap();
        assert_eq!(response, "mock response");
    }

    #[tokio::test]
    async fn failing_provider_errors() {
        let provider = MockProvider::failing();
        assert!(provider.chat(&[]).await.is_err());
        assert!(provider.chat_with_tools(&[], &[]).await.is_err());
    }

    #[tokio::test]
    async fn embed_requires_embedding_support() {
        let provider = MockProvider::default();
        assert!(provider.embed("x").await.is_err());

        let provider = MockProvider::default().with_embedding(vec![1.0, 0.0]);
        assert_eq!(provider.embed("x").await.unwrap(), vec![1.0, 0.0]);
        let batch = provider
            .embed_batch(&["a".into(), "b".into()])
            .await
            .unwrap();
        assert_eq!(batch.len(), 2);
    }
}
