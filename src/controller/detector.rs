use super::clock::{Clock, TokioClock};
use super::motion::MotionState;
use crate::camera::ImageSource;
use crate::display::DisplaySink;
use crate::error::{CameraError, Result, SmileBackError};
use crate::events::{EventBus, SmileEvent};
use crate::mood::{score_faces, MoodLevel};
use crate::recognizer::EmotionRecognizer;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, trace, warn, Instrument};
use uuid::Uuid;

/// What a single cadence tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No motion at sampling time; nothing attempted
    Idle,
    /// Recognition found no faces; display left unchanged
    NoFaces,
    /// A mood was handed to the display
    Dispatched(MoodLevel),
    CaptureFailed,
    RecognitionFailed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub ticks: u64,
    pub cycles: u64,
    pub dispatched: u64,
    pub empty: u64,
    pub failed: u64,
}

/// Drives detection cycles on a fixed cadence while motion is present
pub struct DetectionController {
    camera: Arc<dyn ImageSource>,
    recognizer: Arc<dyn EmotionRecognizer>,
    display: Arc<dyn DisplaySink>,
    motion: MotionState,
    clock: Arc<dyn Clock>,
    cadence: Duration,
    events: Option<EventBus>,
    stats: ControllerStats,
}

impl DetectionController {
    /// Initialize the camera and build a controller around it.
    ///
    /// Fails with the camera's initialization error; without a capture source
    /// there is no loop to run.
    pub async fn new(
        camera: Arc<dyn ImageSource>,
        recognizer: Arc<dyn EmotionRecognizer>,
        display: Arc<dyn DisplaySink>,
        motion: MotionState,
        cadence: Duration,
    ) -> Result<Self> {
        camera.initialize().await.map_err(|e| match e {
            CameraError::DeviceInit { .. } => e,
            other => CameraError::DeviceInit {
                details: other.to_string(),
            },
        })?;

        info!("Detection controller ready (cadence {:?})", cadence);

        Ok(Self {
            camera,
            recognizer,
            display,
            motion,
            clock: Arc::new(TokioClock),
            cadence,
            events: None,
            stats: ControllerStats::default(),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    /// Tick forever. Each cycle completes before the next delay starts, so
    /// pipeline runs never overlap. Ends only when the task is dropped.
    pub async fn run(&mut self) {
        info!("Detection loop running every {:?}", self.cadence);

        loop {
            self.run_cycle().await;
            self.clock.sleep(self.cadence).await;
        }
    }

    /// Sample motion once and, if present, run one detection cycle.
    /// Failures are logged and reported in the outcome, never propagated.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.stats.ticks += 1;

        if !self.motion.is_active() {
            trace!("No motion, skipping tick {}", self.stats.ticks);
            return CycleOutcome::Idle;
        }

        self.stats.cycles += 1;
        let cycle_id = Uuid::new_v4();
        let span = tracing::debug_span!("detection_cycle", %cycle_id);

        let outcome = self.detect(cycle_id).instrument(span).await;
        match outcome {
            CycleOutcome::Dispatched(_) => self.stats.dispatched += 1,
            CycleOutcome::NoFaces => self.stats.empty += 1,
            CycleOutcome::CaptureFailed | CycleOutcome::RecognitionFailed => {
                self.stats.failed += 1
            }
            CycleOutcome::Idle => {}
        }
        outcome
    }

    async fn detect(&self, cycle_id: Uuid) -> CycleOutcome {
        let image = match self.camera.capture().await {
            Ok(image) => image,
            Err(e) => {
                self.report_failure(cycle_id, "capture", e.into());
                return CycleOutcome::CaptureFailed;
            }
        };
        debug!("Captured {} byte still", image.len());

        let faces = match self.recognizer.recognize(image).await {
            Ok(faces) => faces,
            Err(e) => {
                self.report_failure(cycle_id, "recognition", e.into());
                return CycleOutcome::RecognitionFailed;
            }
        };

        if faces.is_empty() {
            return self.no_faces(cycle_id);
        }
        let Some(reading) = score_faces(&faces) else {
            return self.no_faces(cycle_id);
        };

        self.display.show(reading.level);
        self.publish(SmileEvent::MoodUpdated {
            cycle_id,
            reading,
            timestamp: Utc::now(),
        });

        CycleOutcome::Dispatched(reading.level)
    }

    fn no_faces(&self, cycle_id: Uuid) -> CycleOutcome {
        debug!("No faces recognized, keeping current mood");
        self.publish(SmileEvent::NoFaces {
            cycle_id,
            timestamp: Utc::now(),
        });
        CycleOutcome::NoFaces
    }

    fn report_failure(&self, cycle_id: Uuid, stage: &str, failure: SmileBackError) {
        let recoverable = failure.is_recoverable();
        if recoverable {
            warn!("Detection cycle abandoned during {}: {}", stage, failure);
        } else {
            error!(
                "Detection cycle abandoned during {}, retrying will not help: {}",
                stage, failure
            );
        }

        self.publish(SmileEvent::CycleFailed {
            cycle_id,
            stage: stage.to_string(),
            error: failure.to_string(),
            recoverable,
            timestamp: Utc::now(),
        });
    }

    fn publish(&self, event: SmileEvent) {
        if let Some(events) = &self.events {
            events.publish(event);
        }
    }
}
