use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SmileBackConfig {
    pub gpio: GpioConfig,
    pub camera: CameraConfig,
    pub recognizer: RecognizerConfig,
    pub controller: ControllerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GpioConfig {
    /// Output line driving the status LED
    #[serde(default = "default_led_line")]
    pub led_line: u32,

    /// Input line wired to the PIR motion sensor
    #[serde(default = "default_motion_line")]
    pub motion_line: u32,

    /// Root of the sysfs GPIO interface
    #[serde(default = "default_sysfs_path")]
    pub sysfs_path: String,

    /// Sampling interval for input edge detection in milliseconds
    #[serde(default = "default_edge_poll_ms")]
    pub edge_poll_ms: u64,

    /// Use in-memory lines instead of hardware
    #[serde(default)]
    pub mock: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Camera device index (e.g., 0 for /dev/video0)
    #[serde(default = "default_camera_index")]
    pub index: u32,

    /// Still image resolution (width, height)
    #[serde(default = "default_camera_resolution")]
    pub resolution: (u32, u32),

    /// Maximum time to wait for a single still in milliseconds
    #[serde(default = "default_capture_timeout_ms")]
    pub capture_timeout_ms: u64,

    /// Use a synthetic image source instead of hardware
    #[serde(default)]
    pub mock: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RecognizerConfig {
    /// Base URL of the emotion recognition service
    #[serde(default = "default_recognizer_endpoint")]
    pub endpoint: String,

    /// Opaque subscription key passed through to the service
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_recognizer_timeout_ms")]
    pub timeout_ms: u64,

    /// Use an offline recognizer that never finds faces
    #[serde(default)]
    pub mock: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ControllerConfig {
    /// Delay between detection ticks in milliseconds
    #[serde(default = "default_cadence_ms")]
    pub cadence_ms: u64,

    /// Event bus capacity
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,
}

impl ControllerConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }
}

impl SmileBackConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file("smileback.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("gpio.led_line", default_led_line())?
            .set_default("gpio.motion_line", default_motion_line())?
            .set_default("gpio.sysfs_path", default_sysfs_path())?
            .set_default("gpio.edge_poll_ms", default_edge_poll_ms())?
            .set_default("gpio.mock", false)?
            .set_default("camera.index", default_camera_index())?
            .set_default(
                "camera.resolution",
                vec![default_camera_resolution().0, default_camera_resolution().1],
            )?
            .set_default("camera.capture_timeout_ms", default_capture_timeout_ms())?
            .set_default("camera.mock", false)?
            .set_default("recognizer.endpoint", default_recognizer_endpoint())?
            .set_default("recognizer.api_key", "")?
            .set_default("recognizer.timeout_ms", default_recognizer_timeout_ms())?
            .set_default("recognizer.mock", false)?
            .set_default("controller.cadence_ms", default_cadence_ms())?
            .set_default(
                "controller.event_bus_capacity",
                default_event_bus_capacity() as i64,
            )?
            .add_source(File::with_name(&path_str).required(false))
            // SMILEBACK_RECOGNIZER__API_KEY style overrides
            .add_source(
                Environment::with_prefix("SMILEBACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: SmileBackConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config.redacted());

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gpio.led_line == self.gpio.motion_line {
            return Err(ConfigError::Message(format!(
                "LED and motion sensor cannot share GPIO line {}",
                self.gpio.led_line
            )));
        }

        if self.gpio.edge_poll_ms == 0 {
            return Err(ConfigError::Message(
                "GPIO edge_poll_ms must be greater than 0".to_string(),
            ));
        }

        if self.camera.resolution.0 == 0 || self.camera.resolution.1 == 0 {
            return Err(ConfigError::Message(
                "Camera resolution must be greater than 0".to_string(),
            ));
        }

        if self.camera.capture_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "Camera capture_timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.recognizer.endpoint.trim().is_empty() {
            return Err(ConfigError::Message(
                "Recognizer endpoint must not be empty".to_string(),
            ));
        }

        if self.recognizer.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "Recognizer timeout_ms must be greater than 0".to_string(),
            ));
        }

        if self.controller.cadence_ms == 0 {
            return Err(ConfigError::Message(
                "Controller cadence_ms must be greater than 0".to_string(),
            ));
        }

        if self.controller.event_bus_capacity == 0 {
            return Err(ConfigError::Message(
                "Event bus capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Copy safe to print, with the service key masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.recognizer.api_key.is_empty() {
            copy.recognizer.api_key = "***".to_string();
        }
        copy
    }
}

impl Default for SmileBackConfig {
    fn default() -> Self {
        Self {
            gpio: GpioConfig {
                led_line: default_led_line(),
                motion_line: default_motion_line(),
                sysfs_path: default_sysfs_path(),
                edge_poll_ms: default_edge_poll_ms(),
                mock: false,
            },
            camera: CameraConfig {
                index: default_camera_index(),
                resolution: default_camera_resolution(),
                capture_timeout_ms: default_capture_timeout_ms(),
                mock: false,
            },
            recognizer: RecognizerConfig {
                endpoint: default_recognizer_endpoint(),
                api_key: String::new(),
                timeout_ms: default_recognizer_timeout_ms(),
                mock: false,
            },
            controller: ControllerConfig {
                cadence_ms: default_cadence_ms(),
                event_bus_capacity: default_event_bus_capacity(),
            },
        }
    }
}

// Default value functions
fn default_led_line() -> u32 {
    6
}
fn default_motion_line() -> u32 {
    5
}
fn default_sysfs_path() -> String {
    "/sys/class/gpio".to_string()
}
fn default_edge_poll_ms() -> u64 {
    10
}

fn default_camera_index() -> u32 {
    0
}
fn default_camera_resolution() -> (u32, u32) {
    (640, 480)
}
fn default_capture_timeout_ms() -> u64 {
    5000
}

fn default_recognizer_endpoint() -> String {
    "https://westus.api.cognitive.microsoft.com/emotion/v1.0".to_string()
}
fn default_recognizer_timeout_ms() -> u64 {
    10_000
}

fn default_cadence_ms() -> u64 {
    250
}
fn default_event_bus_capacity() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SmileBackConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.gpio.led_line, 6);
        assert_eq!(config.gpio.motion_line, 5);
        assert_eq!(config.controller.cadence(), Duration::from_millis(250));
    }

    #[test]
    fn test_config_validation() {
        let mut config = SmileBackConfig::default();

        config.gpio.led_line = config.gpio.motion_line;
        assert!(config.validate().is_err());
        config.gpio.led_line = 6;

        config.controller.cadence_ms = 0;
        assert!(config.validate().is_err());
        config.controller.cadence_ms = 250;

        config.camera.resolution = (0, 480);
        assert!(config.validate().is_err());
        config.camera.resolution = (640, 480);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[gpio]\nled_line = 17\nmock = true\n\n[controller]\ncadence_ms = 500\n\n[recognizer]\napi_key = \"abc\""
        )
        .unwrap();

        let config = SmileBackConfig::load_from_file(file.path()).unwrap();

        assert_eq!(config.gpio.led_line, 17);
        assert!(config.gpio.mock);
        assert_eq!(config.gpio.motion_line, 5);
        assert_eq!(config.controller.cadence_ms, 500);
        assert_eq!(config.recognizer.api_key, "abc");
        assert_eq!(config.redacted().recognizer.api_key, "***");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = SmileBackConfig::load_from_file("/nonexistent/smileback.toml").unwrap();
        assert_eq!(config.camera.resolution, (640, 480));
        assert_eq!(config.controller.cadence_ms, 250);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[recognizer]\nendpoint = \"https://file.test\"").unwrap();

        std::env::set_var("SMILEBACK_RECOGNIZER__ENDPOINT", "https://env.test");
        let result = SmileBackConfig::load_from_file(file.path());
        std::env::remove_var("SMILEBACK_RECOGNIZER__ENDPOINT");

        assert_eq!(result.unwrap().recognizer.endpoint, "https://env.test");
    }

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let rendered = toml::to_string_pretty(&SmileBackConfig::default()).unwrap();
        assert!(rendered.contains("[controller]"));
        assert!(rendered.contains("cadence_ms = 250"));
    }
}
