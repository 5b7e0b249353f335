//! Mock HTTP tests for EmotionClient.
//!
//! These tests cover:
//! - Request formatting (path, key header, content type, raw body)
//! - Response parsing, including the empty face list
//! - Error status and malformed body handling

use std::net::TcpListener;
use std::time::Duration;

use bytes::Bytes;
use smileback::config::SmileBackConfig;
use smileback::error::RecognitionError;
use smileback::mood::{score_faces, MoodLevel};
use smileback::recognizer::{EmotionClient, EmotionRecognizer, SUBSCRIPTION_KEY_HEADER};
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "test-subscription-key";

fn client_for(server: &MockServer) -> EmotionClient {
    EmotionClient::with_timeout(
        TEST_KEY.to_string(),
        format!("{}/emotion/v1.0", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn still() -> Bytes {
    Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0xFF, 0xD9])
}

fn face_json(happiness: f64, anger: f64) -> serde_json::Value {
    serde_json::json!({
        "faceRectangle": {"left": 68, "top": 97, "width": 64, "height": 64},
        "scores": {
            "anger": anger,
            "contempt": 0.0001,
            "disgust": 0.0002,
            "fear": 0.0,
            "happiness": happiness,
            "neutral": 0.01,
            "sadness": 0.0,
            "surprise": 0.003
        }
    })
}

// === Client Creation Tests ===

#[test]
fn test_new_from_config() {
    let mut config = SmileBackConfig::default().recognizer;
    config.api_key = "abc".to_string();
    let client = EmotionClient::new(&config).unwrap();
    assert_eq!(
        client.endpoint(),
        "https://westus.api.cognitive.microsoft.com/emotion/v1.0"
    );
}

#[test]
fn test_new_without_key_returns_error() {
    let result = EmotionClient::new(&SmileBackConfig::default().recognizer);
    assert!(matches!(result, Err(RecognitionError::MissingApiKey)));
}

// === Request Formatting Tests ===

#[tokio::test]
async fn test_recognize_sends_key_and_raw_image() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emotion/v1.0/recognize"))
        .and(header(SUBSCRIPTION_KEY_HEADER, TEST_KEY))
        .and(header("Content-Type", "application/octet-stream"))
        .and(body_bytes(still().to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let faces = client.recognize(still()).await.unwrap();
    assert!(faces.is_empty());
}

// === Response Parsing Tests ===

#[tokio::test]
async fn test_recognize_parses_faces() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emotion/v1.0/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            face_json(0.9, 0.05),
            face_json(0.3, 0.1)
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let faces = client.recognize(still()).await.unwrap();

    assert_eq!(faces.len(), 2);
    assert_eq!(faces[0].happiness(), 0.9);
    assert_eq!(faces[1].anger(), 0.1);
    let rectangle = faces[0].face_rectangle.unwrap();
    assert_eq!((rectangle.width, rectangle.height), (64, 64));

    let reading = score_faces(&faces).unwrap();
    assert_eq!(reading.level, MoodLevel::FullHappy);
    assert_eq!(reading.face_count, 2);
}

#[tokio::test]
async fn test_recognize_accepts_missing_ignored_channels() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"scores": {"happiness": 0.05, "anger": 0.3}}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let faces = client.recognize(still()).await.unwrap();

    assert_eq!(faces.len(), 1);
    assert!(faces[0].face_rectangle.is_none());
    assert_eq!(faces[0].scores.neutral, 0.0);
    assert_eq!(score_faces(&faces).unwrap().level, MoodLevel::FullAnger);
}

// === Error Handling Tests ===

#[tokio::test]
async fn test_recognize_unauthorized_returns_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"code": "Unauthorized", "message": "Access denied due to invalid subscription key."}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.recognize(still()).await;

    match result {
        Err(RecognitionError::Status { status, message }) => {
            assert_eq!(status, 401);
            assert!(message.contains("invalid subscription key"));
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recognize_rate_limited_keeps_plain_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.recognize(still()).await;

    assert!(matches!(
        result,
        Err(RecognitionError::Status { status: 429, ref message }) if message == "Rate limit exceeded"
    ));
}

#[tokio::test]
async fn test_recognize_malformed_body_returns_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"faces\": "))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.recognize(still()).await;

    assert!(matches!(
        result,
        Err(RecognitionError::MalformedResponse { .. })
    ));
}

#[tokio::test]
async fn test_recognize_missing_scoring_channels_returns_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"scores": {}}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.recognize(still()).await;

    assert!(matches!(
        result,
        Err(RecognitionError::MalformedResponse { .. })
    ));
}

#[tokio::test]
async fn test_recognize_out_of_range_scores_returns_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            face_json(0.4, 0.1),
            {"scores": {"happiness": 7.5, "anger": -3.0}}
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.recognize(still()).await;

    match result {
        Err(RecognitionError::MalformedResponse { details }) => {
            assert!(details.contains("face 1"));
            assert!(details.contains("happiness"));
        }
        other => panic!("Expected malformed response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_recognize_unreachable_service_returns_network_error() {
    // Reserve a free port, then release it so nothing is listening there
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let client = EmotionClient::with_timeout(
        TEST_KEY.to_string(),
        format!("http://{}/emotion/v1.0", address),
        Duration::from_secs(5),
    )
    .unwrap();

    let result = client.recognize(still()).await;
    assert!(matches!(result, Err(RecognitionError::Network(_))));
}
