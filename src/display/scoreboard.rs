use crate::mood::MoodLevel;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const HIDDEN: f32 = 0.0;
const SHOWN: f32 = 1.0;

/// Five score indicators, angriest first, plus a diagnostic status line
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBoard {
    opacities: [f32; 5],
    status: String,
}

pub type ScoreBoardHandle = Arc<Mutex<ScoreBoard>>;

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            opacities: [HIDDEN; 5],
            status: String::new(),
        }
    }

    /// Hide every indicator, then show the one for `mood`
    pub fn apply(&mut self, mood: MoodLevel) {
        self.opacities = [HIDDEN; 5];
        self.opacities[mood.indicator() - 1] = SHOWN;
    }

    pub fn opacities(&self) -> [f32; 5] {
        self.opacities
    }

    /// Mood currently displayed, if any
    pub fn visible(&self) -> Option<MoodLevel> {
        MoodLevel::ALL
            .iter()
            .copied()
            .find(|mood| self.opacities[mood.indicator() - 1] == SHOWN)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status<S: Into<String>>(&mut self, status: S) {
        self.status = status.into();
    }

    /// One-line text rendering, e.g. `[ ][ ][*][ ][ ]`
    pub fn render(&self) -> String {
        self.opacities
            .iter()
            .map(|&o| if o == SHOWN { "[*]" } else { "[ ]" })
            .collect()
    }

    /// Render moods from `receiver` until the sending side is dropped
    pub fn spawn(
        board: ScoreBoardHandle,
        mut receiver: watch::Receiver<Option<MoodLevel>>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Score board renderer started");

            while receiver.changed().await.is_ok() {
                let mood = *receiver.borrow_and_update();
                if let Some(mood) = mood {
                    let mut board = board.lock();
                    board.apply(mood);
                    info!("Score board {} ({})", board.render(), mood);
                }
            }

            debug!("Score board renderer stopped");
        })
    }
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}
