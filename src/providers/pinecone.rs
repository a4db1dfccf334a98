use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domains::retrieval::VectorMatch;
use crate::error::{MermatesRagError, Result};
use crate::interfaces::providers::VectorStore;
use crate::providers::decode_json;

const API_VERSION_HEADER: &str = "X-Pinecone-API-Version";
const API_VERSION: &str = "2024-07";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    vector: Vec<f32>,
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

/// Handle to one serverless or pod-based Pinecone index.
#[derive(Clone)]
pub struct PineconeIndex {
    client: Client,
    api_key: String,
    index_name: String,
    host: String,
}

impl PineconeIndex {
    /// Uses a known data-plane host, skipping the control-plane lookup.
    pub fn with_host(api_key: String, index_name: String, host: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            index_name,
            host: normalize_host(host),
        }
    }

    /// Resolves the index host through the control plane.
    pub async fn connect(
        api_key: String,
        index_name: String,
        control_plane_url: &str,
    ) -> Result<Self> {
        let client = Client::new();
        let url = format!(
            "{}/indexes/{}",
            control_plane_url.trim_end_matches('/'),
            index_name
        );
        let response = client
            .get(url)
            .header("Api-Key", &api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .send()
            .await
            .map_err(|e| {
                MermatesRagError::Http(format!("Pinecone describe_index transport failed: {e}"))
            })?;
        let described: DescribeIndexResponse =
            decode_json(response, "Pinecone describe_index").await?;
        let host = normalize_host(&described.host);
        info!(index = %index_name, host = %host, "resolved Pinecone index host");

        Ok(Self {
            client,
            api_key,
            index_name,
            host,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

#[async_trait]
impl VectorStore for PineconeIndex {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<VectorMatch>> {
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata,
        };
        let response = self
            .client
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .header(API_VERSION_HEADER, API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| MermatesRagError::Http(format!("Pinecone query transport failed: {e}")))?;

        let decoded: QueryResponse = decode_json(response, "Pinecone query").await?;
        Ok(decoded.matches)
    }
}
