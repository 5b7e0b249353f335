use crate::error::GpioError;
use crate::events::{EventBus, SmileEvent};
use crate::gpio::{Edge, InputLine, Level, OutputLine};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether motion is currently present. Written by the edge handler, sampled by the loop.
#[derive(Debug, Clone, Default)]
pub struct MotionState {
    active: Arc<AtomicBool>,
}

impl MotionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Store a new level, returning the previous one
    pub fn set(&self, active: bool) -> bool {
        self.active.swap(active, Ordering::SeqCst)
    }
}

/// Reacts to motion sensor edges: records the level and drives the LED inversely
pub struct MotionHandler {
    motion: MotionState,
    led: Option<Arc<dyn OutputLine>>,
    events: Option<EventBus>,
}

impl MotionHandler {
    pub fn new(motion: MotionState, led: Option<Arc<dyn OutputLine>>) -> Self {
        Self {
            motion,
            led,
            events: None,
        }
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Apply one edge. The LED is held low while motion is present.
    pub fn handle_edge(&self, edge: Edge) {
        let active = edge == Edge::Rising;
        let previous = self.motion.set(active);

        if let Some(led) = &self.led {
            let level = if active { Level::Low } else { Level::High };
            if let Err(e) = led.write(level) {
                warn!("Failed to drive LED line {}: {}", led.line(), e);
            }
        }

        if previous != active {
            debug!("Motion {}", if active { "detected" } else { "ended" });
            if let Some(events) = &self.events {
                events.publish(SmileEvent::MotionChanged {
                    active,
                    timestamp: Utc::now(),
                });
            }
        }
    }

    /// Register this handler for every edge on `input`
    pub fn attach(self, input: &dyn InputLine) -> Result<(), GpioError> {
        let line = input.line();
        input.on_edge(Box::new(move |edge| self.handle_edge(edge)))?;
        info!("Motion sensor attached on GPIO line {}", line);
        Ok(())
    }
}
