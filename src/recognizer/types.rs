use serde::{Deserialize, Serialize};

/// Per-emotion confidence values in [0, 1].
///
/// `happiness` and `anger` feed the mood score and must be present; the other
/// channels are carried for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionScores {
    pub anger: f64,
    #[serde(default)]
    pub contempt: f64,
    #[serde(default)]
    pub disgust: f64,
    #[serde(default)]
    pub fear: f64,
    pub happiness: f64,
    #[serde(default)]
    pub neutral: f64,
    #[serde(default)]
    pub sadness: f64,
    #[serde(default)]
    pub surprise: f64,
}

/// Location of a face within the captured frame, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRectangle {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Emotion scores for one recognized face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceScore {
    #[serde(default)]
    pub face_rectangle: Option<FaceRectangle>,
    pub scores: EmotionScores,
}

impl FaceScore {
    /// Face with only the channels used for mood scoring set
    pub fn new(happiness: f64, anger: f64) -> Self {
        Self {
            face_rectangle: None,
            scores: EmotionScores {
                happiness,
                anger,
                ..EmotionScores::default()
            },
        }
    }

    pub fn happiness(&self) -> f64 {
        self.scores.happiness
    }

    pub fn anger(&self) -> f64 {
        self.scores.anger
    }

    /// First scoring channel that is not a finite value in [0, 1], if any
    pub fn out_of_range(&self) -> Option<(&'static str, f64)> {
        [("happiness", self.happiness()), ("anger", self.anger())]
            .into_iter()
            .find(|&(_, value)| !(0.0..=1.0).contains(&value))
    }
}
