pub mod cohere;
pub mod openai;
pub mod pinecone;

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::error::{MermatesRagError, Result};

/// Reads a provider response, turning non-2xx statuses into `Http` errors
/// and undecodable bodies into `Serialization` errors.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: Response,
    label: &str,
) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| MermatesRagError::Http(format!("{label} read failed: {e}")))?;

    if !status.is_success() {
        return Err(MermatesRagError::Http(format!(
            "{label} failed ({status}): {body}"
        )));
    }

    serde_json::from_str(&body)
        .map_err(|e| MermatesRagError::Serialization(format!("{label} decode failed: {e}")))
}
