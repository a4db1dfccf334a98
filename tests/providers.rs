use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::json;

use mermates_rag::domains::message::ChatMessage;
use mermates_rag::error::MermatesRagError;
use mermates_rag::interfaces::providers::{
    EmbeddingProvider, InputType, LlmProvider, VectorStore,
};
use mermates_rag::providers::cohere::CohereEmbedder;
use mermates_rag::providers::openai::OpenAiProvider;
use mermates_rag::providers::pinecone::PineconeIndex;

fn cohere(server: &MockServer) -> CohereEmbedder {
    CohereEmbedder::new(
        "cohere-key".to_string(),
        "embed-multilingual-v3.0".to_string(),
        server.base_url(),
    )
}

#[tokio::test]
async fn cohere_embeds_search_queries() {
    let server = MockServer::start_async().await;
    let embed_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/embed")
                .header("authorization", "Bearer cohere-key")
                .body_includes("\"input_type\":\"search_query\"")
                .body_includes("\"model\":\"embed-multilingual-v3.0\"");
            then.status(200).json_body(json!({
                "id": "emb-1",
                "embeddings": [[0.25, -0.5, 1.0]],
                "texts": ["What diving spots do you have?"],
                "response_type": "embeddings_floats"
            }));
        })
        .await;

    let vectors = cohere(&server)
        .embed(
            vec!["What diving spots do you have?".to_string()],
            InputType::SearchQuery,
        )
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![0.25, -0.5, 1.0]]);
    embed_mock.assert_calls(1);
}

#[tokio::test]
async fn cohere_accepts_typed_embeddings() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/embed");
            then.status(200).json_body(json!({
                "id": "emb-2",
                "embeddings": {"float": [[0.1], [0.2]]},
                "response_type": "embeddings_by_type"
            }));
        })
        .await;

    let vectors = cohere(&server)
        .embed(
            vec!["reef".to_string(), "wreck".to_string()],
            InputType::SearchDocument,
        )
        .await
        .unwrap();
    assert_eq!(vectors, vec![vec![0.1], vec![0.2]]);
}

#[tokio::test]
async fn cohere_error_status_is_an_http_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/embed");
            then.status(401)
                .json_body(json!({"message": "invalid api token"}));
        })
        .await;

    let err = cohere(&server)
        .embed(vec!["hi".to_string()], InputType::SearchQuery)
        .await
        .unwrap_err();
    match err {
        MermatesRagError::Http(message) => {
            assert!(message.contains("401"), "{message}");
            assert!(message.contains("invalid api token"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn cohere_count_mismatch_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/embed");
            then.status(200).json_body(json!({"embeddings": []}));
        })
        .await;

    let err = cohere(&server)
        .embed(vec!["hi".to_string()], InputType::SearchQuery)
        .await
        .unwrap_err();
    assert!(matches!(err, MermatesRagError::Runtime(_)));
}

#[tokio::test]
async fn pinecone_connect_resolves_host_and_queries() {
    let control = MockServer::start_async().await;
    let data = MockServer::start_async().await;

    let describe_mock = control
        .mock_async(|when, then| {
            when.method(GET)
                .path("/indexes/mermates")
                .header("api-key", "pc-key");
            then.status(200).json_body(json!({
                "name": "mermates",
                "dimension": 1024,
                "metric": "cosine",
                "host": data.base_url(),
                "status": {"ready": true, "state": "Ready"}
            }));
        })
        .await;
    let query_mock = data
        .mock_async(|when, then| {
            when.method(POST)
                .path("/query")
                .header("api-key", "pc-key")
                .body_includes("\"topK\":3")
                .body_includes("\"includeMetadata\":true");
            then.status(200).json_body(json!({
                "matches": [
                    {"id": "spot-1", "score": 0.91, "metadata": {"text": "Sharm Obhur reef"}},
                    {"id": "spot-2", "score": 0.87, "metadata": {"title": "no text here"}},
                    {"id": "spot-3", "score": 0.80}
                ],
                "namespace": ""
            }));
        })
        .await;

    let index = PineconeIndex::connect(
        "pc-key".to_string(),
        "mermates".to_string(),
        &control.base_url(),
    )
    .await
    .unwrap();
    assert_eq!(index.index_name(), "mermates");
    assert_eq!(index.host(), data.base_url());

    let matches = index.query(vec![0.1, 0.2], 3, true).await.unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].id, "spot-1");
    assert_eq!(matches[0].text(), Some("Sharm Obhur reef"));
    assert_eq!(matches[1].text(), None);
    assert_eq!(matches[2].text(), None);

    describe_mock.assert_calls(1);
    query_mock.assert_calls(1);
}

#[tokio::test]
async fn pinecone_missing_index_fails_to_connect() {
    let control = MockServer::start_async().await;
    control
        .mock_async(|when, then| {
            when.method(GET).path("/indexes/missing");
            then.status(404)
                .json_body(json!({"error": {"code": "NOT_FOUND", "message": "Resource missing not found"}}));
        })
        .await;

    let result = PineconeIndex::connect(
        "pc-key".to_string(),
        "missing".to_string(),
        &control.base_url(),
    )
    .await;
    match result {
        Err(MermatesRagError::Http(message)) => assert!(message.contains("404"), "{message}"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("connect should fail for a missing index"),
    }
}

#[tokio::test]
async fn pinecone_query_without_matches_is_empty() {
    let data = MockServer::start_async().await;
    data.mock_async(|when, then| {
        when.method(POST).path("/query");
        then.status(200).json_body(json!({"namespace": ""}));
    })
    .await;

    let index = PineconeIndex::with_host(
        "pc-key".to_string(),
        "mermates".to_string(),
        &data.base_url(),
    );
    let matches = index.query(vec![0.0], 3, true).await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn pinecone_undecodable_body_is_a_serialization_error() {
    let data = MockServer::start_async().await;
    data.mock_async(|when, then| {
        when.method(POST).path("/query");
        then.status(200).body("<html>gateway</html>");
    })
    .await;

    let index = PineconeIndex::with_host(
        "pc-key".to_string(),
        "mermates".to_string(),
        &data.base_url(),
    );
    let err = index.query(vec![0.0], 3, true).await.unwrap_err();
    assert!(matches!(err, MermatesRagError::Serialization(_)));
}

#[tokio::test]
async fn openai_chat_completion_returns_first_choice() {
    let server = MockServer::start_async().await;
    let chat_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer qwen-key")
                .body_includes("\"model\":\"qwen3-max\"")
                .body_includes("\"role\":\"assistant\"");
            then.status(200).json_body(json!({
                "id": "chatcmpl-test",
                "object": "chat.completion",
                "created": 1,
                "model": "qwen3-max",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "Shall I book you a seat now?"},
                    "finish_reason": "stop"
                }]
            }));
        })
        .await;

    let provider = OpenAiProvider::new("qwen-key".to_string(), None, Some(server.base_url()));
    let reply = provider
        .chat_completion(&[
            ChatMessage::system("You are Dana."),
            ChatMessage::user("hi"),
            ChatMessage::assistant("Welcome!"),
            ChatMessage::user("price?"),
        ])
        .await
        .unwrap();

    assert_eq!(reply, "Shall I book you a seat now?");
    chat_mock.assert_calls(1);
}

#[tokio::test]
async fn openai_without_choices_is_a_runtime_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(json!({
                "id": "chatcmpl-empty",
                "object": "chat.completion",
                "created": 1,
                "model": "qwen3-max",
                "choices": []
            }));
        })
        .await;

    let provider = OpenAiProvider::new("qwen-key".to_string(), None, Some(server.base_url()));
    let err = provider
        .chat_completion(&[ChatMessage::user("hi")])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "runtime error: No choices returned");
}

#[tokio::test]
async fn openai_rejected_key_is_an_http_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(401).json_body(json!({
                "error": {
                    "message": "Incorrect API key provided.",
                    "type": "invalid_request_error",
                    "param": null,
                    "code": "invalid_api_key"
                }
            }));
        })
        .await;

    let provider = OpenAiProvider::new("bad-key".to_string(), None, Some(server.base_url()));
    let err = provider
        .chat_completion(&[ChatMessage::user("hi")])
        .await
        .unwrap_err();
    assert!(matches!(err, MermatesRagError::Http(_)), "{err}");
}

#[tokio::test]
async fn openai_embeddings_follow_input_order() {
    let server = MockServer::start_async().await;
    let embed_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/embeddings")
                .body_includes("\"model\":\"text-embedding-3-small\"");
            then.status(200).json_body(json!({
                "object": "list",
                "data": [
                    {"object": "embedding", "embedding": [0.2, 0.2], "index": 1},
                    {"object": "embedding", "embedding": [0.1, 0.1], "index": 0}
                ],
                "model": "text-embedding-3-small",
                "usage": {"prompt_tokens": 4, "total_tokens": 4}
            }));
        })
        .await;

    let provider = OpenAiProvider::new(
        "openai-key".to_string(),
        Some("text-embedding-3-small".to_string()),
        Some(server.base_url()),
    );
    let vectors = provider
        .embed(
            vec!["first".to_string(), "second".to_string()],
            InputType::SearchQuery,
        )
        .await
        .unwrap();

    assert_eq!(vectors, vec![vec![0.1, 0.1], vec![0.2, 0.2]]);
    embed_mock.assert_calls(1);
}
