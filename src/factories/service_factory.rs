use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{Config, EmbeddingBackend};
use crate::error::{MermatesRagError, Result};
use crate::interfaces::providers::{EmbeddingProvider, LlmProvider, VectorStore};
use crate::providers::cohere::CohereEmbedder;
use crate::providers::openai::OpenAiProvider;
use crate::providers::pinecone::PineconeIndex;
use crate::services::chat::ChatService;
use crate::services::prompt::PromptTemplate;

fn api_key_or_warn(key: Option<&String>, provider: &str) -> String {
    match key {
        Some(key) => key.clone(),
        None => {
            warn!("{provider} API key is not configured; requests will be sent unauthenticated");
            String::new()
        }
    }
}

pub fn build_embedder(config: &Config) -> Arc<dyn EmbeddingProvider> {
    let embedding = &config.embedding;
    let label = match embedding.provider {
        EmbeddingBackend::Cohere => "Cohere",
        EmbeddingBackend::OpenAi => "OpenAI",
    };
    let api_key = api_key_or_warn(embedding.api_key.as_ref(), label);
    info!(
        provider = ?embedding.provider,
        model = embedding.model(),
        "configured embedding provider"
    );
    match embedding.provider {
        EmbeddingBackend::Cohere => Arc::new(CohereEmbedder::new(
            api_key,
            embedding.model().to_string(),
            embedding.base_url().to_string(),
        )),
        EmbeddingBackend::OpenAi => Arc::new(OpenAiProvider::new(
            api_key,
            Some(embedding.model().to_string()),
            Some(embedding.base_url().to_string()),
        )),
    }
}

pub async fn build_vector_store(config: &Config) -> Result<Arc<dyn VectorStore>> {
    let index_name = config
        .index_name()
        .ok_or_else(|| {
            MermatesRagError::Config("PINECONE_INDEX environment variable is not set".to_string())
        })?
        .to_string();
    let api_key = api_key_or_warn(config.pinecone.api_key.as_ref(), "Pinecone");

    let index = match config.pinecone.host.as_deref() {
        Some(host) => PineconeIndex::with_host(api_key, index_name, host),
        None => {
            PineconeIndex::connect(api_key, index_name, config.pinecone.control_plane_url()).await?
        }
    };
    info!(index = index.index_name(), host = index.host(), "configured vector index");
    Ok(Arc::new(index))
}

pub fn build_llm(config: &Config) -> Arc<dyn LlmProvider> {
    let completion = &config.completion;
    let api_key = api_key_or_warn(completion.api_key.as_ref(), "Completion");
    info!(
        model = completion.model(),
        base_url = completion.base_url(),
        "configured completion provider"
    );
    Arc::new(OpenAiProvider::new(
        api_key,
        Some(completion.model().to_string()),
        Some(completion.base_url().to_string()),
    ))
}

pub fn load_prompt(config: &Config) -> Result<PromptTemplate> {
    PromptTemplate::new(config.prompt_source.load()?)
}

/// Builds every provider handle once; the result is shared by all requests.
pub async fn build_chat_service(config: &Config) -> Result<ChatService> {
    config.validate()?;
    let prompt = load_prompt(config)?;
    let embedder = build_embedder(config);
    let store = build_vector_store(config).await?;
    let llm = build_llm(config);

    Ok(ChatService::new(embedder, store, llm, prompt)
        .with_call_timeout(config.upstream_timeout()))
}
