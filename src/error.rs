use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmileBackError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GPIO error: {0}")]
    Gpio(#[from] GpioError),

    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    #[error("System error: {message}")]
    System { message: String },
}

/// Errors raised by digital line drivers
#[derive(Error, Debug)]
pub enum GpioError {
    #[error("GPIO line {line} is not available")]
    LineUnavailable { line: u32 },

    #[error("GPIO line {line} I/O failure: {details}")]
    Io { line: u32, details: String },

    #[error("GPIO line {line} reported unexpected value '{value}'")]
    InvalidValue { line: u32, value: String },
}

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera initialization failed: {details}")]
    DeviceInit { details: String },

    #[error("Camera not initialized")]
    NotInitialized,

    #[error("Frame capture failed: {details}")]
    Capture { details: String },

    #[error("Frame capture timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("Recognition service API key is missing")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Recognition service returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed recognition response: {details}")]
    MalformedResponse { details: String },
}

impl SmileBackError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    /// Whether a detection cycle may simply be retried on the next tick
    pub fn is_recoverable(&self) -> bool {
        match self {
            SmileBackError::Camera(CameraError::Capture { .. })
            | SmileBackError::Camera(CameraError::Timeout { .. }) => true,
            SmileBackError::Recognition(RecognitionError::MissingApiKey) => false,
            SmileBackError::Recognition(_) => true,
            SmileBackError::Gpio(GpioError::LineUnavailable { .. }) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SmileBackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_cycle_errors_are_recoverable() {
        let capture: SmileBackError = CameraError::Capture {
            details: "timeout".to_string(),
        }
        .into();
        assert!(capture.is_recoverable());

        let status: SmileBackError = RecognitionError::Status {
            status: 429,
            message: "quota".to_string(),
        }
        .into();
        assert!(status.is_recoverable());
    }

    #[test]
    fn test_camera_init_is_fatal() {
        let init: SmileBackError = CameraError::DeviceInit {
            details: "no camera".to_string(),
        }
        .into();
        assert!(!init.is_recoverable());
        assert!(init.to_string().contains("no camera"));

        let uninitialized: SmileBackError = CameraError::NotInitialized.into();
        assert!(!uninitialized.is_recoverable());
    }
}
