//! HTTP contract tests for the Azure OpenAI clients.

use qaeval_core::{Content, CoreError, Embedder, Llm, LlmRequest};
use qaeval_model::azure::{AzureOpenAIClient, AzureOpenAIConfig, AzureOpenAIEmbeddings};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> AzureOpenAIConfig {
    AzureOpenAIConfig::new(format!("{}/", server.uri()), "test-azure-key")
        .with_chat_deployment("gpt-4")
        .with_embedding_deployment("text-embedding-ada-002")
}

#[tokio::test]
async fn chat_completion_hits_deployment_url_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-4/chat/completions"))
        .and(query_param("api-version", "2024-02-01"))
        .and(header("api-key", "test-azure-key"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "Hello, how are you?"}],
            "temperature": 0.0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "I'm doing well, thank you!"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 13, "completion_tokens": 7, "total_tokens": 20}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AzureOpenAIClient::new(config(&server)).unwrap();
    assert_eq!(client.name(), "gpt-4");

    let request = LlmRequest::new(client.name(), vec![Content::user("Hello, how are you?")])
        .with_temperature(0.0);
    let response = client.generate(request).await.unwrap();

    assert_eq!(response.text(), "I'm doing well, thank you!");
    assert_eq!(response.usage_metadata.unwrap().total_token_count, 20);
}

#[tokio::test]
async fn chat_completion_surfaces_service_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-4/chat/completions"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "DeploymentNotFound", "message": "The API deployment for this resource does not exist."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AzureOpenAIClient::new(config(&server)).unwrap();
    let err = client
        .generate(LlmRequest::new("gpt-4", vec![Content::user("hi")]))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Model(_)));
    let message = err.to_string();
    assert!(message.contains("404"));
    assert!(message.contains("deployment for this resource does not exist"));
}

#[tokio::test]
async fn embeddings_return_vectors_in_input_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/text-embedding-ada-002/embeddings"))
        .and(header("api-key", "test-azure-key"))
        .and(body_partial_json(json!({"input": ["Hello world", "Paris"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [
                {"object": "embedding", "embedding": [0.0, 1.0, 0.0], "index": 1},
                {"object": "embedding", "embedding": [0.5, 0.5, 0.5], "index": 0}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let embeddings = AzureOpenAIEmbeddings::new(config(&server)).unwrap();
    let texts = ["Hello world", "Paris"];
    let vectors = embeddings.embed_batch(&texts).await.unwrap();

    assert_eq!(vectors, vec![vec![0.5, 0.5, 0.5], vec![0.0, 1.0, 0.0]]);
}

#[tokio::test]
async fn embed_query_reports_dimension() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/text-embedding-ada-002/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"embedding": vec![0.1f32; 1536], "index": 0}]
        })))
        .mount(&server)
        .await;

    let embeddings = AzureOpenAIEmbeddings::new(config(&server)).unwrap();
    let vector = embeddings.embed_query("Hello world").await.unwrap();
    assert_eq!(vector.len(), 1536);
}

#[tokio::test]
async fn empty_batch_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let embeddings = AzureOpenAIEmbeddings::new(config(&server)).unwrap();
    assert!(embeddings.embed_batch(&[]).await.unwrap().is_empty());
}
