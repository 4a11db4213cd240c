//! Inference client integration tests
//!
//! Most tests point the client at a wiremock server standing in for the
//! relay. The end-to-end tests run the real relay on a local port in front of
//! a mock upstream.

use std::time::Duration;

use hf_relay::client::{
    ClientError, Generated, InferenceClient, RequestPhase, TrackedClient, NO_TEXT_FALLBACK,
};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};

use crate::common::{
    constants::{IMAGE_MODEL, PNG_BYTES, TEST_API_KEY, TEXT_MODEL, UNREACHABLE_URL},
    relay_models_url, spawn_relay, test_config, test_config_without_credential,
};
use crate::mocks::{header_str, MockInferenceApi};

async fn client_for(relay: &MockInferenceApi) -> InferenceClient {
    InferenceClient::new(&relay.models_url()).expect("valid base url")
}

// =============================================================================
// generate_text
// =============================================================================

#[tokio::test]
async fn test_generate_text_sequence_shape() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay
        .mock_text_generation(TEXT_MODEL, json!([{ "generated_text": "hello" }]))
        .await;
    let client = client_for(&relay).await;

    let text = client.generate_text("Say hello", None).await.unwrap();

    assert_eq!(text, "hello");

    let request = relay.single_request().await;
    assert_eq!(request.url.path(), "/api/hf/models/gpt2");
    assert_eq!(header_str(&request, "content-type"), Some("application/json"));
    assert!(request.headers.get("authorization").is_none());
    assert_eq!(
        serde_json::from_slice::<Value>(&request.body).unwrap(),
        json!({
            "inputs": "Say hello",
            "parameters": { "max_length": 100, "num_return_sequences": 1 }
        })
    );
}

#[tokio::test]
async fn test_generate_text_single_object_shape() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay
        .mock_text_generation("distilgpt2", json!({ "generated_text": "hi" }))
        .await;
    let client = client_for(&relay).await;

    let text = client.generate_text("Say hi", Some("distilgpt2")).await.unwrap();

    assert_eq!(text, "hi");
}

#[tokio::test]
async fn test_generate_text_unknown_shapes_fall_back() {
    for response in [json!({}), json!([])] {
        let relay = MockInferenceApi::start_as_relay().await;
        relay.mock_text_generation(TEXT_MODEL, response).await;
        let client = client_for(&relay).await;

        let text = client.generate_text("Say something", None).await.unwrap();

        assert_eq!(text, NO_TEXT_FALLBACK);
    }
}

#[tokio::test]
async fn test_generate_text_rejects_blank_prompt_without_request() {
    let relay = MockInferenceApi::start_as_relay().await;
    let client = client_for(&relay).await;

    let result = client.generate_text("   ", None).await;

    assert!(matches!(result, Err(ClientError::EmptyPrompt)));
    assert!(relay.received_requests().await.is_empty());
}

// =============================================================================
// query
// =============================================================================

#[tokio::test]
async fn test_query_returns_body_unmodified() {
    let relay = MockInferenceApi::start_as_relay().await;
    let body = json!([[{ "label": "POSITIVE", "score": 0.99 }, { "label": "NEGATIVE", "score": 0.01 }]]);
    relay
        .mock_text_generation("distilbert-sentiment", body.clone())
        .await;
    let client = client_for(&relay).await;

    let mut parameters = Map::new();
    parameters.insert("top_k".to_string(), json!(2));
    let response = client
        .query("distilbert-sentiment", "great movie", &parameters)
        .await
        .unwrap();

    assert_eq!(response, body);
    let request = relay.single_request().await;
    assert_eq!(
        serde_json::from_slice::<Value>(&request.body).unwrap(),
        json!({ "inputs": "great movie", "parameters": { "top_k": 2 } })
    );
}

#[tokio::test]
async fn test_query_accepts_structured_inputs() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay
        .mock_text_generation("qa-model", json!({ "answer": "Paris" }))
        .await;
    let client = client_for(&relay).await;

    let inputs = json!({ "question": "Capital of France?", "context": "Paris is the capital." });
    let response = client.query("qa-model", &inputs, &Map::new()).await.unwrap();

    assert_eq!(response, json!({ "answer": "Paris" }));
    let request = relay.single_request().await;
    assert_eq!(
        serde_json::from_slice::<Value>(&request.body).unwrap(),
        json!({ "inputs": inputs, "parameters": {} })
    );
}

#[tokio::test]
async fn test_error_field_becomes_error_message() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay
        .mock_error(TEXT_MODEL, 400, json!({ "error": "bad request" }))
        .await;
    let client = client_for(&relay).await;

    let err = client
        .query(TEXT_MODEL, "hello", &Map::new())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "bad request");
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
}

#[tokio::test]
async fn test_unparseable_error_body_uses_status_message() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay
        .mock_plain_error(TEXT_MODEL, 500, "upstream exploded")
        .await;
    let client = client_for(&relay).await;

    let err = client
        .generate_text("hello", None)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "API Error: 500 Internal Server Error");
}

#[tokio::test]
async fn test_unauthorized_gets_local_hint() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay
        .mock_error(TEXT_MODEL, 401, json!({ "error": "Invalid credentials" }))
        .await;
    let client = client_for(&relay).await;

    let err = client
        .query(TEXT_MODEL, "hello", &Map::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized { .. }));
    let message = err.to_string();
    assert!(message.starts_with("API Error: 401 Unauthorized"));
    assert!(message.contains("HUGGINGFACE_API_KEY"));
}

#[tokio::test]
async fn test_invalid_success_body_is_an_error() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay.mock_invalid_json(TEXT_MODEL).await;
    let client = client_for(&relay).await;

    let err = client
        .query(TEXT_MODEL, "hello", &Map::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_transport_failure_is_reported() {
    let client = InferenceClient::new(&format!("{}/api/hf/models", UNREACHABLE_URL)).unwrap();

    let err = client.generate_text("hello", None).await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
}

// =============================================================================
// generate_image
// =============================================================================

#[tokio::test]
async fn test_generate_image_returns_bytes_and_url() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay.mock_image_generation(IMAGE_MODEL, PNG_BYTES).await;
    let client = client_for(&relay).await;

    let image = client
        .generate_image("a lighthouse at dusk", None)
        .await
        .unwrap();

    assert_eq!(image.bytes.as_ref(), PNG_BYTES);
    assert_eq!(image.content_type, "image/png");
    assert!(image.url.starts_with("data:image/png;base64,iVBORw0KGgo"));

    let request = relay.single_request().await;
    assert_eq!(
        request.url.path(),
        "/api/hf/models/stabilityai/stable-diffusion-xl-base-1.0"
    );
    assert_eq!(
        serde_json::from_slice::<Value>(&request.body).unwrap(),
        json!({
            "inputs": "a lighthouse at dusk",
            "options": { "wait_for_model": true, "use_cache": false }
        })
    );
}

#[tokio::test]
async fn test_generate_image_error_message() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay
        .mock_error(IMAGE_MODEL, 503, json!({ "error": "Model is currently loading" }))
        .await;
    let client = client_for(&relay).await;

    let err = client.generate_image("a cat", None).await.unwrap_err();

    assert_eq!(err.to_string(), "Model is currently loading");
}

// =============================================================================
// TrackedClient
// =============================================================================

#[tokio::test]
async fn test_tracked_client_reports_phases() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay
        .mock_slow_text_generation(
            TEXT_MODEL,
            json!([{ "generated_text": "hello" }]),
            Duration::from_millis(100),
        )
        .await;
    let client = TrackedClient::new(client_for(&relay).await);
    let mut phases = client.subscribe();

    assert_eq!(client.phase(), RequestPhase::Idle);

    let (result, saw_in_flight) = tokio::join!(client.generate_text("hello", None), async {
        phases.changed().await.unwrap();
        let in_flight = phases.borrow_and_update().is_loading();
        in_flight
    });

    assert!(saw_in_flight);
    assert_eq!(result.unwrap(), "hello");
    assert_eq!(
        client.phase(),
        RequestPhase::Succeeded(Generated::Text("hello".to_string()))
    );

    client.reset();
    assert_eq!(client.phase(), RequestPhase::Idle);
}

#[tokio::test]
async fn test_tracked_client_reports_failure() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay
        .mock_error(TEXT_MODEL, 400, json!({ "error": "bad request" }))
        .await;
    let client = TrackedClient::new(client_for(&relay).await);

    let result = client.generate_text("hello", None).await;

    assert!(result.is_err());
    assert_eq!(client.phase(), RequestPhase::Failed("bad request".to_string()));
}

#[tokio::test]
async fn test_tracked_client_image_success() {
    let relay = MockInferenceApi::start_as_relay().await;
    relay.mock_image_generation(IMAGE_MODEL, PNG_BYTES).await;
    let client = TrackedClient::new(client_for(&relay).await);

    let image = client.generate_image("a cat", None).await.unwrap();

    assert_eq!(client.phase(), RequestPhase::Succeeded(Generated::Image(image)));
}

// =============================================================================
// End-to-end through the relay
// =============================================================================

#[tokio::test]
async fn test_end_to_end_text_generation_through_relay() {
    let upstream = MockInferenceApi::start().await;
    upstream
        .mock_text_generation(TEXT_MODEL, json!([{ "generated_text": "hello from upstream" }]))
        .await;
    let addr = spawn_relay(test_config(&upstream.uri())).await;
    let client = InferenceClient::new(&relay_models_url(addr)).unwrap();

    let text = client.generate_text("hello", None).await.unwrap();

    assert_eq!(text, "hello from upstream");
    let request = upstream.single_request().await;
    assert_eq!(request.url.path(), "/hf-inference/models/gpt2");
    assert_eq!(
        header_str(&request, "authorization"),
        Some(format!("Bearer {}", TEST_API_KEY).as_str())
    );
}

#[tokio::test]
async fn test_end_to_end_image_generation_through_relay() {
    let upstream = MockInferenceApi::start().await;
    upstream.mock_image_generation(IMAGE_MODEL, PNG_BYTES).await;
    let addr = spawn_relay(test_config(&upstream.uri())).await;
    let client = InferenceClient::new(&relay_models_url(addr)).unwrap();

    let image = client.generate_image("a cat", None).await.unwrap();

    assert_eq!(image.bytes.as_ref(), PNG_BYTES);
    assert_eq!(image.content_type, "image/png");
}

#[tokio::test]
async fn test_end_to_end_missing_credential_surfaces_local_hint() {
    let upstream = MockInferenceApi::start().await;
    upstream
        .mock_error(TEXT_MODEL, 401, json!({ "error": "Invalid credentials in Authorization header" }))
        .await;
    let addr = spawn_relay(test_config_without_credential(&upstream.uri())).await;
    let client = InferenceClient::new(&relay_models_url(addr)).unwrap();

    let err = client.generate_text("hello", None).await.unwrap_err();

    assert!(err.to_string().contains("dev proxy"));
    assert!(upstream.single_request().await.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_end_to_end_transport_failure_message_reaches_client() {
    let addr = spawn_relay(test_config(UNREACHABLE_URL)).await;
    let client = InferenceClient::new(&relay_models_url(addr)).unwrap();

    let err = client.generate_text("hello", None).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(!err.to_string().is_empty());
}
