use super::types::FaceScore;
use super::EmotionRecognizer;
use crate::camera::ImageBytes;
use crate::error::RecognitionError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Scripted recognizer for tests and offline runs.
///
/// Queued results are returned in order; once the queue is empty every call
/// returns the default face list.
pub struct MockRecognizer {
    script: Mutex<VecDeque<Result<Vec<FaceScore>, RecognitionError>>>,
    default_faces: Vec<FaceScore>,
    calls: AtomicUsize,
}

impl MockRecognizer {
    /// Recognizer that finds no faces unless scripted otherwise
    pub fn new() -> Self {
        Self::with_default(Vec::new())
    }

    pub fn with_default(default_faces: Vec<FaceScore>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_faces,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_faces(&self, faces: Vec<FaceScore>) {
        self.script.lock().push_back(Ok(faces));
    }

    pub fn push_error(&self, error: RecognitionError) {
        self.script.lock().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmotionRecognizer for MockRecognizer {
    async fn recognize(&self, image: ImageBytes) -> Result<Vec<FaceScore>, RecognitionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        debug!("Mock recognition call {} ({} bytes)", call, image.len());

        match self.script.lock().pop_front() {
            Some(result) => result,
            None => Ok(self.default_faces.clone()),
        }
    }
}
