use crate::recognizer::FaceScore;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Below this both channels count as no expression at all
pub const NEUTRAL_THRESHOLD: f64 = 0.2;

/// Above this the dominant channel counts as fully expressed
pub const FULL_THRESHOLD: f64 = 0.5;

/// Anger is weighted double relative to happiness so it registers at lower intensity
pub const ANGER_WEIGHT: f64 = 2.0;

/// Discrete mood shown on the score display, ordered from angriest to happiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoodLevel {
    FullAnger,
    MildAnger,
    Neutral,
    MildHappy,
    FullHappy,
}

impl MoodLevel {
    pub const ALL: [MoodLevel; 5] = [
        MoodLevel::FullAnger,
        MoodLevel::MildAnger,
        MoodLevel::Neutral,
        MoodLevel::MildHappy,
        MoodLevel::FullHappy,
    ];

    /// Score indicator (1..=5) that represents this mood
    pub fn indicator(self) -> usize {
        match self {
            MoodLevel::FullAnger => 1,
            MoodLevel::MildAnger => 2,
            MoodLevel::Neutral => 3,
            MoodLevel::MildHappy => 4,
            MoodLevel::FullHappy => 5,
        }
    }
}

impl fmt::Display for MoodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MoodLevel::FullAnger => "full anger",
            MoodLevel::MildAnger => "mild anger",
            MoodLevel::Neutral => "neutral",
            MoodLevel::MildHappy => "mild happy",
            MoodLevel::FullHappy => "full happy",
        };
        f.write_str(name)
    }
}

/// Result of scoring one detection cycle's faces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodReading {
    pub level: MoodLevel,
    /// Mean happiness across faces
    pub happiness: f64,
    /// Mean anger across faces, after weighting
    pub anger: f64,
    pub face_count: usize,
}

/// Aggregate per-face scores into a single mood.
///
/// Returns `None` for an empty face list; there is nothing to display and
/// the previous mood must stay.
pub fn score_faces(faces: &[FaceScore]) -> Option<MoodReading> {
    if faces.is_empty() {
        return None;
    }

    let count = faces.len() as f64;
    let happiness = faces.iter().map(FaceScore::happiness).sum::<f64>() / count;
    let anger = faces.iter().map(FaceScore::anger).sum::<f64>() / count * ANGER_WEIGHT;

    Some(MoodReading {
        level: classify(happiness, anger),
        happiness,
        anger,
        face_count: faces.len(),
    })
}

/// Classify aggregated happiness and (already weighted) anger. First matching rule wins.
pub fn classify(happiness: f64, anger: f64) -> MoodLevel {
    if happiness < NEUTRAL_THRESHOLD && anger < NEUTRAL_THRESHOLD {
        MoodLevel::Neutral
    } else if happiness > anger {
        if happiness > FULL_THRESHOLD {
            MoodLevel::FullHappy
        } else {
            MoodLevel::MildHappy
        }
    } else if happiness < anger {
        if anger > FULL_THRESHOLD {
            MoodLevel::FullAnger
        } else {
            MoodLevel::MildAnger
        }
    } else {
        debug!(
            "Happiness and weighted anger tied at {:.3}, treating as neutral",
            happiness
        );
        MoodLevel::Neutral
    }
}
