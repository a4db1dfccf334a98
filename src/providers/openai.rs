use async_trait::async_trait;

use async_openai::{
    config::OpenAIConfig,
    types::{
        chat::{
            ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestAssistantMessageContent,
            ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
            ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
            CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
        },
        embeddings::{CreateEmbeddingRequestArgs, EmbeddingInput},
    },
    Client,
};

use crate::config::{DEFAULT_COMPLETION_MODEL, DEFAULT_OPENAI_BASE_URL};
use crate::domains::message::{ChatMessage, Role};
use crate::error::{MermatesRagError, Result};
use crate::interfaces::providers::{EmbeddingProvider, InputType, LlmProvider};

/// Client for any OpenAI-compatible endpoint (OpenAI, DashScope, Ollama...).
#[derive(Clone)]
pub struct OpenAiProvider {
    model: String,
    client: Client<OpenAIConfig>,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: Option<String>, base_url: Option<String>) -> Self {
        let model = model.unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string());
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url.trim_end_matches('/'));
        Self {
            model,
            client: Client::with_config(config),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
        let built = match message.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(message.content.as_str())
                .build()
                .map(ChatCompletionRequestMessage::System),
            Role::User => ChatCompletionRequestUserMessageArgs::default()
                .content(ChatCompletionRequestUserMessageContent::Text(
                    message.content.clone(),
                ))
                .build()
                .map(ChatCompletionRequestMessage::User),
            Role::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(ChatCompletionRequestAssistantMessageContent::Text(
                    message.content.clone(),
                ))
                .build()
                .map(ChatCompletionRequestMessage::Assistant),
        };
        built.map_err(|e| MermatesRagError::Runtime(e.to_string()))
    }

    fn extract_text_from_response(response: &CreateChatCompletionResponse) -> Result<String> {
        response
            .choices
            .first()
            .ok_or_else(|| MermatesRagError::Runtime("No choices returned".to_string()))?
            .message
            .content
            .clone()
            .ok_or_else(|| MermatesRagError::Runtime("Empty chat response".to_string()))
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String> {
        let messages = messages
            .iter()
            .map(Self::build_request_message)
            .collect::<Result<Vec<_>>>()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(messages)
            .build()
            .map_err(|e| MermatesRagError::Runtime(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| MermatesRagError::Http(e.to_string()))?;
        Self::extract_text_from_response(&response)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    // OpenAI embeddings are symmetric, so the input type is not sent.
    async fn embed(&self, texts: Vec<String>, _input_type: InputType) -> Result<Vec<Vec<f32>>> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(self.model.clone())
            .input(EmbeddingInput::StringArray(texts))
            .build()
            .map_err(|e| MermatesRagError::Runtime(e.to_string()))?;
        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| MermatesRagError::Http(e.to_string()))?;
        let mut data = response.data;
        data.sort_by_key(|item| item.index);
        Ok(data.into_iter().map(|item| item.embedding).collect())
    }
}
