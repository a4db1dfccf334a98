use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domains::message::ChatMessage;
use crate::domains::retrieval::VectorMatch;
use crate::error::Result;

/// How an embedding will be used. Providers may optimise the vector
/// differently for queries and for stored documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    SearchQuery,
    SearchDocument,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchQuery => "search_query",
            Self::SearchDocument => "search_document",
        }
    }
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns one vector per input text, in input order.
    async fn embed(&self, texts: Vec<String>, input_type: InputType) -> Result<Vec<Vec<f32>>>;
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Nearest stored passages, in the store's own ranking order.
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<VectorMatch>>;
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generates exactly one reply for the given conversation.
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String>;
}
