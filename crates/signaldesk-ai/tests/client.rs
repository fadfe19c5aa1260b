//! Integration tests for `ChatClient` using wiremock HTTP mocks.

use signaldesk_ai::{AiError, ChatClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ChatClient {
    ChatClient::with_base_url("test-key", "test-model", 30, base_url)
        .expect("client construction should not fail")
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

#[tokio::test]
async fn complete_json_returns_decoded_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "model": "test-model",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body(r#"{"company_name": "Acme", "signals": []}"#)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let payload = client
        .complete_json("analyze Acme", 0.7)
        .await
        .expect("should return decoded JSON");

    assert_eq!(payload["company_name"], "Acme");
    assert!(payload["signals"].as_array().expect("array").is_empty());
}

#[tokio::test]
async fn complete_json_sends_the_prompt_as_a_user_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(serde_json::json!({
            "messages": [ { "role": "user", "content": "analyze Acme" } ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("{}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client
        .complete_json("analyze Acme", 0.7)
        .await
        .expect("should succeed");
}

#[tokio::test]
async fn missing_content_is_an_empty_response_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": null } } ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.complete_json("prompt", 0.7).await.unwrap_err();
    assert!(matches!(err, AiError::EmptyResponse), "got: {err}");
}

#[tokio::test]
async fn whitespace_only_content_is_an_empty_response_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   ")))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.complete_json("prompt", 0.7).await.unwrap_err();
    assert!(matches!(err, AiError::EmptyResponse), "got: {err}");
}

#[tokio::test]
async fn non_2xx_status_surfaces_as_api_error_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.complete_json("prompt", 0.7).await.unwrap_err();
    match err {
        AiError::Api { status, body } => {
            assert_eq!(status.as_u16(), 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("expected AiError::Api, got: {other}"),
    }
}

#[tokio::test]
async fn non_json_content_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("here is your analysis!")),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.complete_json("prompt", 0.7).await.unwrap_err();
    assert!(
        matches!(err, AiError::Deserialize { ref context, .. } if context == "completion content"),
        "got: {err}"
    );
}
