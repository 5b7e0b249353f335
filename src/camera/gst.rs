use super::source::{ImageBytes, ImageSource};
use crate::config::CameraConfig;
use crate::error::CameraError;
use async_trait::async_trait;
use bytes::Bytes;
use gstreamer::prelude::*;
use gstreamer::Pipeline;
use gstreamer_app::AppSink;
use parking_lot::Mutex;
use tracing::{debug, info, trace, warn};

/// GStreamer still capture from a V4L2 camera, encoded to JPEG
pub struct GstImageSource {
    config: CameraConfig,
    pipeline: Mutex<Option<(Pipeline, AppSink)>>,
}

impl GstImageSource {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            pipeline: Mutex::new(None),
        }
    }

    fn build_pipeline_string(&self) -> String {
        let (width, height) = self.config.resolution;

        format!(
            "v4l2src device=/dev/video{} ! videoconvert ! videoscale ! \
             video/x-raw,width={},height={} ! jpegenc ! \
             appsink name=sink sync=false max-buffers=1 drop=true emit-signals=false",
            self.config.index, width, height
        )
    }

    fn sink(&self) -> Result<AppSink, CameraError> {
        self.pipeline
            .lock()
            .as_ref()
            .map(|(_, sink)| sink.clone())
            .ok_or(CameraError::NotInitialized)
    }
}

#[async_trait]
impl ImageSource for GstImageSource {
    async fn initialize(&self) -> Result<(), CameraError> {
        gstreamer::init().map_err(|e| CameraError::DeviceInit {
            details: format!("Failed to initialize GStreamer: {}", e),
        })?;

        let pipeline_desc = self.build_pipeline_string();
        info!("Creating GStreamer pipeline: {}", pipeline_desc);

        let pipeline = gstreamer::parse::launch(&pipeline_desc)
            .map_err(|e| CameraError::DeviceInit {
                details: format!("Failed to create pipeline: {}", e),
            })?
            .downcast::<Pipeline>()
            .map_err(|_| CameraError::DeviceInit {
                details: "Failed to downcast to Pipeline".to_string(),
            })?;

        let sink = pipeline
            .by_name("sink")
            .ok_or_else(|| CameraError::DeviceInit {
                details: "Pipeline has no appsink".to_string(),
            })?
            .downcast::<AppSink>()
            .map_err(|_| CameraError::DeviceInit {
                details: "Failed to downcast to AppSink".to_string(),
            })?;

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| CameraError::DeviceInit {
                details: format!("Failed to start camera /dev/video{}: {}", self.config.index, e),
            })?;

        // Wait for preroll so a missing device surfaces here rather than on first capture
        let (result, _, _) = pipeline.state(gstreamer::ClockTime::from_seconds(5));
        if let Err(e) = result {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(CameraError::DeviceInit {
                details: format!("Camera /dev/video{} did not start: {}", self.config.index, e),
            });
        }

        *self.pipeline.lock() = Some((pipeline, sink));
        info!("Camera /dev/video{} ready", self.config.index);
        Ok(())
    }

    async fn capture(&self) -> Result<ImageBytes, CameraError> {
        let sink = self.sink()?;
        let timeout_ms = self.config.capture_timeout_ms;

        let sample = tokio::task::spawn_blocking(move || {
            sink.try_pull_sample(gstreamer::ClockTime::from_mseconds(timeout_ms))
        })
        .await
        .map_err(|e| CameraError::Capture {
            details: format!("capture task failed: {}", e),
        })?
        .ok_or(CameraError::Timeout { timeout_ms })?;

        let buffer = sample.buffer().ok_or_else(|| CameraError::Capture {
            details: "No buffer in sample".to_string(),
        })?;

        let map = buffer.map_readable().map_err(|e| CameraError::Capture {
            details: format!("Failed to map buffer: {}", e),
        })?;

        trace!("Captured still ({} bytes)", map.len());
        Ok(Bytes::copy_from_slice(map.as_slice()))
    }
}

impl Drop for GstImageSource {
    fn drop(&mut self) {
        if let Some((pipeline, _)) = self.pipeline.lock().take() {
            if let Err(e) = pipeline.set_state(gstreamer::State::Null) {
                warn!("Failed to stop camera pipeline: {}", e);
            } else {
                debug!("Camera pipeline stopped");
            }
        }
    }
}

