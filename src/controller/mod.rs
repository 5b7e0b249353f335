//! Motion-triggered detection loop.
//!
//! Edges on the motion line flip a shared [`MotionState`] and drive the LED.
//! Independently, [`DetectionController::run`] ticks on a fixed cadence and,
//! while motion is present, runs capture → recognize → score → display.

mod clock;
mod detector;
mod motion;


pub use clock::{Clock, TokioClock};
pub use detector::{ControllerStats, CycleOutcome, DetectionController};
pub use motion::{MotionHandler, MotionState};
