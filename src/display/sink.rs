use crate::mood::MoodLevel;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Receiver of one mood per successful detection cycle.
///
/// Implementations must not block; rendering happens on whatever context owns
/// the display.
pub trait DisplaySink: Send + Sync {
    fn show(&self, mood: MoodLevel);
}

/// Hands moods to the rendering task through a watch channel.
///
/// Only the latest mood matters to the display, so a slow renderer never
/// backs up the detection loop.
pub struct ChannelDisplaySink {
    sender: watch::Sender<Option<MoodLevel>>,
}

impl ChannelDisplaySink {
    pub fn new() -> (Self, watch::Receiver<Option<MoodLevel>>) {
        let (sender, receiver) = watch::channel(None);
        (Self { sender }, receiver)
    }

    /// Mood most recently handed off, if any
    pub fn current(&self) -> Option<MoodLevel> {
        *self.sender.borrow()
    }
}

impl DisplaySink for ChannelDisplaySink {
    fn show(&self, mood: MoodLevel) {
        if self.sender.send(Some(mood)).is_err() {
            warn!("Display renderer is gone, mood {} not shown", mood);
        } else {
            debug!("Mood {} handed to display", mood);
        }
    }
}

/// Sink that remembers every mood it was given
#[derive(Default)]
pub struct RecordingDisplaySink {
    shown: Mutex<Vec<MoodLevel>>,
}

impl RecordingDisplaySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<MoodLevel> {
        self.shown.lock().clone()
    }

    pub fn last(&self) -> Option<MoodLevel> {
        self.shown.lock().last().copied()
    }
}

impl DisplaySink for RecordingDisplaySink {
    fn show(&self, mood: MoodLevel) {
        self.shown.lock().push(mood);
    }
}
