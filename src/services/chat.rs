use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::DEFAULT_UPSTREAM_TIMEOUT_SECS;
use crate::domains::message::ChatRequest;
use crate::error::{MermatesRagError, Result};
use crate::interfaces::providers::{EmbeddingProvider, InputType, LlmProvider, VectorStore};
use crate::services::context::assemble_context;
use crate::services::prompt::{build_messages, PromptTemplate};
use crate::services::sanitizer::sanitize;

pub const DEFAULT_TOP_K: usize = 3;

/// Stateless retrieval-augmented reply pipeline.
///
/// Provider handles are injected once at startup and shared by every request.
pub struct ChatService {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmProvider>,
    prompt: PromptTemplate,
    top_k: usize,
    call_timeout: Duration,
}

impl ChatService {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmProvider>,
        prompt: PromptTemplate,
    ) -> Self {
        Self {
            embedder,
            store,
            llm,
            prompt,
            top_k: DEFAULT_TOP_K,
            call_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub async fn respond(&self, request: &ChatRequest) -> Result<String> {
        let mut embeddings = self
            .bounded(
                "embedding",
                self.embedder
                    .embed(vec![request.message.clone()], InputType::SearchQuery),
            )
            .await?;
        if embeddings.is_empty() {
            return Err(MermatesRagError::Runtime(
                "embedding provider returned no vectors".to_string(),
            ));
        }
        let embedding = embeddings.swap_remove(0);
        debug!(dimension = embedding.len(), "embedded query");

        let matches = self
            .bounded("vector query", self.store.query(embedding, self.top_k, true))
            .await?;
        let context = assemble_context(&matches);
        debug!(
            matches = matches.len(),
            context_chars = context.chars().count(),
            "retrieved context"
        );

        let messages = build_messages(
            self.prompt.render(&context),
            &request.history,
            &request.message,
        );
        debug!(messages = messages.len(), "requesting completion");

        let raw = self
            .bounded("chat completion", self.llm.chat_completion(&messages))
            .await?;
        Ok(sanitize(&raw))
    }

    async fn bounded<T, F>(&self, stage: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(MermatesRagError::Timeout(format!(
                "{stage} did not finish within {}s",
                self.call_timeout.as_secs_f32()
            ))),
        }
    }
}
