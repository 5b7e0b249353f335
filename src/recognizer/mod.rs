//! Remote facial emotion recognition.
//!
//! The recognizer turns one captured still into per-face emotion scores. It
//! never retries; a failed call simply abandons the current detection cycle.

mod client;
mod mock;
mod types;

pub use client::{EmotionClient, SUBSCRIPTION_KEY_HEADER};
pub use mock::MockRecognizer;
pub use types::{EmotionScores, FaceRectangle, FaceScore};

use crate::camera::ImageBytes;
use crate::error::RecognitionError;
use async_trait::async_trait;

#[async_trait]
pub trait EmotionRecognizer: Send + Sync {
    /// Score every face found in `image`. An empty result means no face was found.
    async fn recognize(&self, image: ImageBytes) -> Result<Vec<FaceScore>, RecognitionError>;
}
