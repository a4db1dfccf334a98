#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use mermates_rag::domains::message::ChatMessage;
use mermates_rag::domains::retrieval::VectorMatch;
use mermates_rag::error::{MermatesRagError, Result};
use mermates_rag::interfaces::providers::{
    EmbeddingProvider, InputType, LlmProvider, VectorStore,
};
use mermates_rag::services::chat::ChatService;
use mermates_rag::services::prompt::PromptTemplate;

pub const TEST_TEMPLATE: &str = "You are Dana.\n\nContext:\n{context}\n";

pub fn vector_match(id: &str, metadata: Value) -> VectorMatch {
    serde_json::from_value(json!({"id": id, "score": 0.9, "metadata": metadata})).unwrap()
}

pub fn dive_matches() -> Vec<VectorMatch> {
    vec![
        vector_match("spot-1", json!({"text": "Sharm Obhur reef, 12m, beginner friendly"})),
        vector_match("spot-2", json!({"text": "Abu Tair wreck, 18m, certified divers"})),
    ]
}

pub struct StaticEmbedder {
    vector: Vec<f32>,
    pub calls: Mutex<Vec<(Vec<String>, InputType)>>,
}

impl StaticEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for StaticEmbedder {
    async fn embed(&self, texts: Vec<String>, input_type: InputType) -> Result<Vec<Vec<f32>>> {
        let count = texts.len();
        self.calls.lock().unwrap().push((texts, input_type));
        Ok(vec![self.vector.clone(); count])
    }
}

pub struct EmptyEmbedder;

#[async_trait]
impl EmbeddingProvider for EmptyEmbedder {
    async fn embed(&self, _texts: Vec<String>, _input_type: InputType) -> Result<Vec<Vec<f32>>> {
        Ok(Vec::new())
    }
}

pub struct StaticStore {
    matches: Vec<VectorMatch>,
    pub calls: Mutex<Vec<(Vec<f32>, usize, bool)>>,
}

impl StaticStore {
    pub fn new(matches: Vec<VectorMatch>) -> Self {
        Self {
            matches,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VectorStore for StaticStore {
    async fn query(
        &self,
        vector: Vec<f32>,
        top_k: usize,
        include_metadata: bool,
    ) -> Result<Vec<VectorMatch>> {
        self.calls
            .lock()
            .unwrap()
            .push((vector, top_k, include_metadata));
        Ok(self.matches.iter().take(top_k).cloned().collect())
    }
}

pub struct FailingStore {
    pub message: String,
}

#[async_trait]
impl VectorStore for FailingStore {
    async fn query(
        &self,
        _vector: Vec<f32>,
        _top_k: usize,
        _include_metadata: bool,
    ) -> Result<Vec<VectorMatch>> {
        Err(MermatesRagError::Http(self.message.clone()))
    }
}

pub struct SlowStore {
    pub delay: Duration,
}

#[async_trait]
impl VectorStore for SlowStore {
    async fn query(
        &self,
        _vector: Vec<f32>,
        _top_k: usize,
        _include_metadata: bool,
    ) -> Result<Vec<VectorMatch>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

pub struct RecordingLlm {
    reply: std::result::Result<String, String>,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl RecordingLlm {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_messages(&self) -> Vec<ChatMessage> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("completion was requested")
    }
}

#[async_trait]
impl LlmProvider for RecordingLlm {
    async fn chat_completion(&self, messages: &[ChatMessage]) -> Result<String> {
        self.calls.lock().unwrap().push(messages.to_vec());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(MermatesRagError::Http(message.clone())),
        }
    }
}

pub struct Harness {
    pub embedder: Arc<StaticEmbedder>,
    pub store: Arc<StaticStore>,
    pub llm: Arc<RecordingLlm>,
}

impl Harness {
    pub fn new(matches: Vec<VectorMatch>, reply: &str) -> Self {
        Self {
            embedder: Arc::new(StaticEmbedder::new(vec![0.1, 0.2, 0.3])),
            store: Arc::new(StaticStore::new(matches)),
            llm: Arc::new(RecordingLlm::replying(reply)),
        }
    }

    pub fn service(&self) -> ChatService {
        ChatService::new(
            self.embedder.clone(),
            self.store.clone(),
            self.llm.clone(),
            PromptTemplate::new(TEST_TEMPLATE).unwrap(),
        )
    }
}
