pub mod app;
pub mod camera;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod events;
pub mod gpio;
pub mod mood;
pub mod network;
pub mod recognizer;

pub use app::{Component, ComponentState, ShutdownReason, ShutdownTrigger, SmileBackApp};
pub use camera::{ImageBytes, ImageSource, MockImageSource};
pub use config::SmileBackConfig;
pub use controller::{
    Clock, ControllerStats, CycleOutcome, DetectionController, MotionHandler, MotionState,
    TokioClock,
};
pub use display::{ChannelDisplaySink, DisplaySink, RecordingDisplaySink, ScoreBoard};
pub use error::{CameraError, GpioError, RecognitionError, Result, SmileBackError};
pub use events::{EventBus, SmileEvent};
pub use gpio::{Edge, GpioController, InputLine, Level, MockGpio, OutputLine, SysfsGpio};
pub use mood::{score_faces, MoodLevel, MoodReading};
pub use recognizer::{EmotionClient, EmotionRecognizer, FaceScore, MockRecognizer};
