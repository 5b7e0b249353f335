use super::types::{Component, ComponentState, ShutdownReason};
use crate::camera::{ImageSource, MockImageSource};
use crate::config::SmileBackConfig;
use crate::controller::{DetectionController, MotionState};
use crate::display::{ScoreBoard, ScoreBoardHandle};
use crate::error::Result;
use crate::events::EventBus;
use crate::gpio::{GpioController, InputLine, MockGpio, OutputLine, SysfsGpio};
use crate::recognizer::{EmotionClient, EmotionRecognizer, MockRecognizer};
use parking_lot::Mutex as SyncMutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Main application coordinator that wires hardware, recognizer and display together
pub struct SmileBackApp {
    pub(super) config: SmileBackConfig,
    pub(super) event_bus: EventBus,

    // Collaborators
    pub(super) gpio: Arc<dyn GpioController>,
    pub(super) camera: Arc<dyn ImageSource>,
    pub(super) recognizer: Arc<dyn EmotionRecognizer>,

    // Shared state
    pub(super) motion: MotionState,
    pub(super) board: ScoreBoardHandle,

    // Opened during initialization; input lines stop watching when dropped
    pub(super) motion_line: Option<Arc<dyn InputLine>>,
    pub(super) led_line: Option<Arc<dyn OutputLine>>,
    pub(super) controller: Option<DetectionController>,
    pub(super) tasks: Vec<JoinHandle<()>>,

    // Lifecycle management
    pub(super) component_states: Arc<Mutex<BTreeMap<Component, ComponentState>>>,
    pub(super) shutdown_sender: Arc<Mutex<Option<oneshot::Sender<ShutdownReason>>>>,
    pub(super) shutdown_receiver: Option<oneshot::Receiver<ShutdownReason>>,
    pub(super) cancellation_token: CancellationToken,
}

impl SmileBackApp {
    /// Create the application with hardware (or mock) collaborators chosen by configuration
    pub fn new(config: SmileBackConfig) -> Result<Self> {
        let gpio: Arc<dyn GpioController> = if config.gpio.mock {
            info!("Using mock GPIO lines");
            Arc::new(MockGpio::new())
        } else {
            Arc::new(SysfsGpio::new(
                config.gpio.sysfs_path.clone(),
                Duration::from_millis(config.gpio.edge_poll_ms),
            ))
        };

        let camera = Self::build_camera(&config);

        let recognizer: Arc<dyn EmotionRecognizer> = if config.recognizer.mock {
            info!("Using offline recognizer");
            Arc::new(MockRecognizer::new())
        } else {
            Arc::new(EmotionClient::new(&config.recognizer)?)
        };

        Ok(Self::with_components(config, gpio, camera, recognizer))
    }

    #[cfg(all(feature = "camera", target_os = "linux"))]
    fn build_camera(config: &SmileBackConfig) -> Arc<dyn ImageSource> {
        if config.camera.mock {
            info!("Using synthetic image source");
            Arc::new(MockImageSource::new())
        } else {
            Arc::new(crate::camera::GstImageSource::new(config.camera.clone()))
        }
    }

    #[cfg(not(all(feature = "camera", target_os = "linux")))]
    fn build_camera(config: &SmileBackConfig) -> Arc<dyn ImageSource> {
        if !config.camera.mock {
            tracing::warn!("Built without camera support, using synthetic image source");
        }
        Arc::new(MockImageSource::new())
    }

    /// Create the application around explicit collaborators
    pub fn with_components(
        config: SmileBackConfig,
        gpio: Arc<dyn GpioController>,
        camera: Arc<dyn ImageSource>,
        recognizer: Arc<dyn EmotionRecognizer>,
    ) -> Self {
        let event_bus = EventBus::new(config.controller.event_bus_capacity);
        let (shutdown_sender, shutdown_receiver) = oneshot::channel();

        Self {
            config,
            event_bus,
            gpio,
            camera,
            recognizer,
            motion: MotionState::new(),
            board: Arc::new(SyncMutex::new(ScoreBoard::new())),
            motion_line: None,
            led_line: None,
            controller: None,
            tasks: Vec::new(),
            component_states: Arc::new(Mutex::new(BTreeMap::new())),
            shutdown_sender: Arc::new(Mutex::new(Some(shutdown_sender))),
            shutdown_receiver: Some(shutdown_receiver),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &SmileBackConfig {
        &self.config
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn score_board(&self) -> ScoreBoardHandle {
        Arc::clone(&self.board)
    }
}
