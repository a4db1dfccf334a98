use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::error::{MermatesRagError, Result};
use crate::interfaces::providers::{EmbeddingProvider, InputType};
use crate::providers::decode_json;

/// Cohere returns bare float arrays unless `embedding_types` is requested,
/// in which case vectors are grouped by type.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CohereEmbeddings {
    Floats(Vec<Vec<f32>>),
    ByType { float: Vec<Vec<f32>> },
}

#[derive(Debug, Deserialize)]
struct CohereEmbedResponse {
    embeddings: CohereEmbeddings,
}

#[derive(Clone)]
pub struct CohereEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl CohereEmbedder {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    fn embed_url(&self) -> String {
        format!("{}/v1/embed", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl EmbeddingProvider for CohereEmbedder {
    async fn embed(&self, texts: Vec<String>, input_type: InputType) -> Result<Vec<Vec<f32>>> {
        let expected = texts.len();
        let payload = json!({
            "texts": texts,
            "model": self.model,
            "input_type": input_type.as_str(),
        });

        let response = self
            .client
            .post(self.embed_url())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MermatesRagError::Http(format!("Cohere embed transport failed: {e}")))?;

        let decoded: CohereEmbedResponse = decode_json(response, "Cohere embed").await?;
        let vectors = match decoded.embeddings {
            CohereEmbeddings::Floats(vectors) => vectors,
            CohereEmbeddings::ByType { float } => float,
        };
        if vectors.len() != expected {
            return Err(MermatesRagError::Runtime(format!(
                "Cohere returned {} embeddings for {expected} texts",
                vectors.len()
            )));
        }
        Ok(vectors)
    }
}
