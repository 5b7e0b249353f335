use crate::mood::MoodReading;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Events that can occur in the SmileBack system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SmileEvent {
    /// The motion sensor changed level
    MotionChanged {
        active: bool,
        timestamp: DateTime<Utc>,
    },
    /// A detection cycle produced a new mood
    MoodUpdated {
        cycle_id: Uuid,
        reading: MoodReading,
        timestamp: DateTime<Utc>,
    },
    /// A detection cycle found no faces
    NoFaces {
        cycle_id: Uuid,
        timestamp: DateTime<Utc>,
    },
    /// A detection cycle was abandoned
    CycleFailed {
        cycle_id: Uuid,
        stage: String,
        error: String,
        /// Whether the next tick may reasonably succeed
        recoverable: bool,
        timestamp: DateTime<Utc>,
    },
}

impl SmileEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            SmileEvent::MotionChanged { timestamp, .. }
            | SmileEvent::MoodUpdated { timestamp, .. }
            | SmileEvent::NoFaces { timestamp, .. }
            | SmileEvent::CycleFailed { timestamp, .. } => *timestamp,
        }
    }

    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            SmileEvent::MotionChanged { active, .. } => {
                format!("Motion {}", if *active { "detected" } else { "ended" })
            }
            SmileEvent::MoodUpdated { reading, .. } => format!(
                "Mood {} (happiness {:.2}, anger {:.2}, {} face(s))",
                reading.level, reading.happiness, reading.anger, reading.face_count
            ),
            SmileEvent::NoFaces { .. } => "No faces recognized".to_string(),
            SmileEvent::CycleFailed { stage, error, .. } => {
                format!("Detection failed during {}: {}", stage, error)
            }
        }
    }

    /// Get the event type as a string for filtering
    pub fn event_type(&self) -> &'static str {
        match self {
            SmileEvent::MotionChanged { .. } => "motion_changed",
            SmileEvent::MoodUpdated { .. } => "mood_updated",
            SmileEvent::NoFaces { .. } => "no_faces",
            SmileEvent::CycleFailed { .. } => "cycle_failed",
        }
    }
}

/// Broadcast bus for diagnostics listeners.
///
/// Events are fire-and-forget: publishing with nobody subscribed is normal
/// and only the log line remains.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<SmileEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SmileEvent> {
        self.sender.subscribe()
    }

    /// Publish an event, returning how many subscribers received it.
    /// Safe to call from edge callbacks.
    pub fn publish(&self, event: SmileEvent) -> usize {
        match &event {
            SmileEvent::MoodUpdated { .. } => info!("{}", event.description()),
            SmileEvent::CycleFailed { .. } => warn!("{}", event.description()),
            _ => debug!("Publishing event: {}", event.description()),
        }

        // Only fails when no receiver exists
        self.sender.send(event).unwrap_or(0)
    }
}
