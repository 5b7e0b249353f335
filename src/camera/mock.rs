use super::source::{ImageBytes, ImageSource};
use crate::error::CameraError;
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::{debug, info, warn};

/// Synthetic image source for hardware-less runs and tests
pub struct MockImageSource {
    fail_init: bool,
    initialized: AtomicBool,
    captures: AtomicUsize,
    failures: Mutex<VecDeque<String>>,
}

impl MockImageSource {
    pub fn new() -> Self {
        Self {
            fail_init: false,
            initialized: AtomicBool::new(false),
            captures: AtomicUsize::new(0),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Source whose initialization always fails, as if no camera were attached
    pub fn without_camera() -> Self {
        Self {
            fail_init: true,
            ..Self::new()
        }
    }

    /// Make the next capture fail with the given details
    pub fn fail_next_capture<S: Into<String>>(&self, details: S) {
        self.failures.lock().push_back(details.into());
    }

    /// Number of capture attempts, failed ones included
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    fn synthetic_jpeg(frame_id: usize) -> Bytes {
        let mut data = vec![
            0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x01,
            0x00, 0x48, 0x00, 0x48, 0x00, 0x00,
        ];
        data.extend(vec![(frame_id % 256) as u8; 256]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        Bytes::from(data)
    }
}

impl Default for MockImageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSource for MockImageSource {
    async fn initialize(&self) -> Result<(), CameraError> {
        if self.fail_init {
            return Err(CameraError::DeviceInit {
                details: "mock camera not present".to_string(),
            });
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!("Mock image source initialized");
        Ok(())
    }

    async fn capture(&self) -> Result<ImageBytes, CameraError> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(CameraError::NotInitialized);
        }

        let frame_id = self.captures.fetch_add(1, Ordering::SeqCst);

        if let Some(details) = self.failures.lock().pop_front() {
            warn!("Mock capture {} failing: {}", frame_id, details);
            return Err(CameraError::Capture { details });
        }

        debug!("Mock capture {}", frame_id);
        Ok(Self::synthetic_jpeg(frame_id))
    }
}
