//! Emotion taxonomy shared by the reply normalizer and the rig scaler.

use std::fmt;

use mcommon::clamp_unit;

/// Intensity reported when a reply omits or mangles the field.
pub const DEFAULT_INTENSITY: f32 = 0.5;

/// The closed set of emotions the rig knows how to pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Thinking,
    Confused,
    Excited,
    Sleepy,
}

impl Emotion {
    pub const ALL: [Emotion; 9] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Thinking,
        Emotion::Confused,
        Emotion::Excited,
        Emotion::Sleepy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Thinking => "thinking",
            Emotion::Confused => "confused",
            Emotion::Excited => "excited",
            Emotion::Sleepy => "sleepy",
        }
    }

    /// Parses a label case-insensitively. Unknown labels return `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|emotion| emotion.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized emotion reading with intensity held in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionResult {
    pub emotion: Emotion,
    pub intensity: f32,
}

impl EmotionResult {
    /// Builds a reading, clamping intensity into the unit interval.
    pub fn new(emotion: Emotion, intensity: f32) -> Self {
        Self {
            emotion,
            intensity: clamp_unit(intensity),
        }
    }

    pub fn neutral() -> Self {
        Self::new(Emotion::Neutral, DEFAULT_INTENSITY)
    }
}

impl Default for EmotionResult {
    fn default() -> Self {
        Self::neutral()
    }
}
