use crate::error::CameraError;
use async_trait::async_trait;
use bytes::Bytes;

/// One encoded (JPEG) still frame, held only for the duration of a detection cycle
pub type ImageBytes = Bytes;

/// Still image capture device
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Acquire the device. Must succeed before any call to `capture`.
    async fn initialize(&self) -> Result<(), CameraError>;

    /// Capture a single still frame without blocking other tasks
    async fn capture(&self) -> Result<ImageBytes, CameraError>;
}
