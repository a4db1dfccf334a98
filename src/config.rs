use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{MermatesRagError, Result};

pub const DEFAULT_COHERE_BASE_URL: &str = "https://api.cohere.com";
pub const DEFAULT_COHERE_EMBED_MODEL: &str = "embed-multilingual-v3.0";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_EMBED_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_PINECONE_CONTROL_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_COMPLETION_BASE_URL: &str =
    "https://dashscope-intl.aliyuncs.com/compatible-mode/v1";
pub const DEFAULT_COMPLETION_MODEL: &str = "qwen3-max";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Built-in staged sales prompt. `{context}` marks where retrieved passages go.
pub const DEFAULT_PROMPT_TEMPLATE: &str = include_str!("../prompts/sales_agent.txt");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    Cohere,
    OpenAi,
}

impl EmbeddingBackend {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cohere" => Ok(Self::Cohere),
            "openai" => Ok(Self::OpenAi),
            other => Err(MermatesRagError::Config(format!(
                "unsupported embedding provider: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub provider: EmbeddingBackend,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl EmbeddingConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(match self.provider {
            EmbeddingBackend::Cohere => DEFAULT_COHERE_EMBED_MODEL,
            EmbeddingBackend::OpenAi => DEFAULT_OPENAI_EMBED_MODEL,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(match self.provider {
            EmbeddingBackend::Cohere => DEFAULT_COHERE_BASE_URL,
            EmbeddingBackend::OpenAi => DEFAULT_OPENAI_BASE_URL,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PineconeConfig {
    pub api_key: Option<String>,
    pub index: Option<String>,
    /// Data-plane host. Resolved from the control plane when absent.
    pub host: Option<String>,
    pub control_plane_url: Option<String>,
}

impl PineconeConfig {
    pub fn control_plane_url(&self) -> &str {
        self.control_plane_url
            .as_deref()
            .unwrap_or(DEFAULT_PINECONE_CONTROL_URL)
    }
}

/// Any OpenAI-compatible chat completion endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl OpenAiConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_COMPLETION_MODEL)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_COMPLETION_BASE_URL)
    }
}

/// Where the system prompt template comes from.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PromptSource {
    File { path: String },
    Inline { template: String },
}

impl Default for PromptSource {
    fn default() -> Self {
        Self::Inline {
            template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl PromptSource {
    pub fn load(&self) -> Result<String> {
        match self {
            Self::Inline { template } => Ok(template.clone()),
            Self::File { path } => fs::read_to_string(path).map_err(|e| {
                MermatesRagError::Config(format!("cannot read prompt file {path}: {e}"))
            }),
        }
    }

    fn from_json_value(value: Value) -> std::result::Result<Self, String> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::String(path) => Ok(Self::File {
                path: path.trim().to_string(),
            }),
            Value::Object(map) => match map.get("type").and_then(|v| v.as_str()) {
                Some("file") => map
                    .get("path")
                    .and_then(|v| v.as_str())
                    .map(|path| Self::File {
                        path: path.to_string(),
                    })
                    .ok_or_else(|| "file prompt source requires `path`".to_string()),
                Some("inline") => map
                    .get("template")
                    .and_then(|v| v.as_str())
                    .map(|template| Self::Inline {
                        template: template.to_string(),
                    })
                    .ok_or_else(|| "inline prompt source requires `template`".to_string()),
                Some(other) => Err(format!("unsupported prompt source type: {other}")),
                None => Err("prompt source object must include `type`".to_string()),
            },
            other => Err(format!("invalid prompt source: {other}")),
        }
    }
}

impl<'de> Deserialize<'de> for PromptSource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json_value(value).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub pinecone: PineconeConfig,
    #[serde(default)]
    pub completion: OpenAiConfig,
    #[serde(default)]
    pub prompt_source: PromptSource,
    pub upstream_timeout_seconds: Option<u64>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, which plays the role of the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));

        let provider = match get("EMBEDDING_PROVIDER") {
            Some(raw) => EmbeddingBackend::parse(&raw)?,
            None => EmbeddingBackend::default(),
        };
        let embedding = match provider {
            EmbeddingBackend::Cohere => EmbeddingConfig {
                provider,
                api_key: get("COHERE_API_KEY"),
                model: get("COHERE_EMBED_MODEL"),
                base_url: get("COHERE_BASE_URL"),
            },
            EmbeddingBackend::OpenAi => EmbeddingConfig {
                provider,
                api_key: get("OPENAI_API_KEY"),
                model: get("OPENAI_EMBED_MODEL"),
                base_url: get("OPENAI_BASE_URL"),
            },
        };

        let upstream_timeout_seconds = match get("RAG_UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| {
                MermatesRagError::Config(format!("invalid RAG_UPSTREAM_TIMEOUT_SECS: {e}"))
            })?),
            None => None,
        };

        let config = Self {
            embedding,
            pinecone: PineconeConfig {
                api_key: get("PINECONE_API_KEY"),
                index: get("PINECONE_INDEX"),
                host: get("PINECONE_HOST"),
                control_plane_url: get("PINECONE_CONTROL_URL"),
            },
            completion: OpenAiConfig {
                api_key: get("QWEN_API_KEY"),
                model: get("QWEN_MODEL"),
                base_url: get("QWEN_BASE_URL"),
            },
            prompt_source: get("RAG_PROMPT_FILE")
                .map(|path| PromptSource::File { path })
                .unwrap_or_default(),
            upstream_timeout_seconds,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            MermatesRagError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Config =
            serde_json::from_str(&raw).map_err(|e| MermatesRagError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.index_name().is_none() {
            return Err(MermatesRagError::Config(
                "PINECONE_INDEX environment variable is not set".to_string(),
            ));
        }
        if self.upstream_timeout_seconds == Some(0) {
            return Err(MermatesRagError::Config(
                "upstream timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn index_name(&self) -> Option<&str> {
        self.pinecone
            .index
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(
            self.upstream_timeout_seconds
                .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        )
    }
}
