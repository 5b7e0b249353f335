use super::types::FaceScore;
use super::EmotionRecognizer;
use crate::camera::ImageBytes;
use crate::config::RecognizerConfig;
use crate::error::RecognitionError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, trace};

/// Header carrying the opaque service key
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Default connection timeout (5 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client for the cloud emotion recognition API
pub struct EmotionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl EmotionClient {
    pub fn new(config: &RecognizerConfig) -> Result<Self, RecognitionError> {
        Self::with_timeout(
            config.api_key.clone(),
            config.endpoint.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn with_timeout(
        api_key: String,
        endpoint: String,
        timeout: Duration,
    ) -> Result<Self, RecognitionError> {
        if api_key.trim().is_empty() {
            return Err(RecognitionError::MissingApiKey);
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn recognize_url(&self) -> String {
        format!("{}/recognize", self.endpoint)
    }
}

/// Pull the human-readable message out of an error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .or_else(|| value.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Reject faces whose scoring channels fall outside [0, 1]
fn check_scores(faces: &[FaceScore]) -> Result<(), RecognitionError> {
    for (index, face) in faces.iter().enumerate() {
        if let Some((channel, value)) = face.out_of_range() {
            return Err(RecognitionError::MalformedResponse {
                details: format!("face {} has {} score {}", index, channel, value),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl EmotionRecognizer for EmotionClient {
    async fn recognize(&self, image: ImageBytes) -> Result<Vec<FaceScore>, RecognitionError> {
        let url = self.recognize_url();
        debug!("Submitting {} byte image to {}", image.len(), url);

        let response = self
            .http_client
            .post(&url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .header("Content-Type", "application/octet-stream")
            .body(image)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecognitionError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let body = response.bytes().await?;
        trace!("Recognition response: {}", String::from_utf8_lossy(&body));

        let faces: Vec<FaceScore> =
            serde_json::from_slice(&body).map_err(|e| RecognitionError::MalformedResponse {
                details: e.to_string(),
            })?;

        check_scores(&faces)?;

        debug!("Recognition returned {} face(s)", faces.len());
        Ok(faces)
    }
}
