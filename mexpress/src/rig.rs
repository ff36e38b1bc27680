//! Live2D parameter ranges, emotion poses, and intensity scaling.

use std::collections::BTreeMap;

use mcommon::{clamp_range, clamp_unit};

use crate::emotion::Emotion;

/// Declared bounds and rest value for one Live2D parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub default: f32,
    pub max: f32,
}

impl ParamRange {
    pub fn new(min: f32, default: f32, max: f32) -> Self {
        Self { min, default, max }
    }
}

/// A Live2D model's controllable parameters and its emotion presets.
///
/// Poses are scaled between the neutral value and the preset value by
/// an intensity in `[0.0, 1.0]`, then clamped into each parameter's
/// declared range before injection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AvatarRig {
    name: String,
    ranges: BTreeMap<String, ParamRange>,
    poses: BTreeMap<Emotion, BTreeMap<String, f32>>,
}

impl AvatarRig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ranges: BTreeMap::new(),
            poses: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_range(
        mut self,
        id: impl Into<String>,
        min: f32,
        default: f32,
        max: f32,
    ) -> Self {
        self.ranges
            .insert(id.into(), ParamRange::new(min, default, max));
        self
    }

    pub fn with_pose<I, S>(mut self, emotion: Emotion, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let pose = entries
            .into_iter()
            .map(|(id, value)| (id.into(), value))
            .collect();
        self.poses.insert(emotion, pose);
        self
    }

    pub fn has_pose(&self, emotion: Emotion) -> bool {
        self.poses.contains_key(&emotion)
    }

    pub fn range(&self, id: &str) -> Option<ParamRange> {
        self.ranges.get(id).copied()
    }

    /// Clamps a value into the parameter's declared range. Unknown
    /// parameters pass through untouched.
    pub fn clamp_parameter(&self, id: &str, value: f32) -> f32 {
        match self.ranges.get(id) {
            Some(range) => clamp_range(value, range.min, range.max),
            None => value,
        }
    }

    /// The value a parameter holds at rest: the neutral pose entry when
    /// one exists, otherwise the declared default, otherwise zero.
    pub fn neutral_value(&self, id: &str) -> f32 {
        if let Some(pose) = self.poses.get(&Emotion::Neutral)
            && let Some(value) = pose.get(id)
        {
            return *value;
        }
        self.ranges.get(id).map(|range| range.default).unwrap_or(0.0)
    }

    /// Every declared parameter at its default value.
    pub fn rest_pose(&self) -> Vec<(String, f32)> {
        self.ranges
            .iter()
            .map(|(id, range)| (id.clone(), range.default))
            .collect()
    }

    /// Scales an emotion preset toward or away from neutral.
    ///
    /// Zero intensity holds every parameter at its neutral value and one
    /// lands on the preset. Emotions without a preset fall back to the
    /// neutral pose.
    pub fn pose(&self, emotion: Emotion, intensity: f32) -> Vec<(String, f32)> {
        let intensity = clamp_unit(intensity);
        let preset = self
            .poses
            .get(&emotion)
            .or_else(|| self.poses.get(&Emotion::Neutral));
        let Some(preset) = preset else {
            return Vec::new();
        };
        preset
            .iter()
            .map(|(id, &target)| {
                let neutral = self.neutral_value(id);
                let scaled = neutral + (target - neutral) * intensity;
                (id.clone(), self.clamp_parameter(id, scaled))
            })
            .collect()
    }
}

/// The chino11 reference model: parameter ranges and emotion presets as
/// measured from the shipped Live2D rig. The bare `Param` id is the
/// skirt physics group.
pub fn chino11() -> AvatarRig {
    AvatarRig::new("chino11")
        .with_range("PARAM_ANGLE_X", -30.0, 0.0, 30.0)
        .with_range("PARAM_ANGLE_Y", -30.0, 0.0, 30.0)
        .with_range("PARAM_ANGLE_Z", -30.0, 0.0, 30.0)
        .with_range("PARAM_EYE_L_OPEN", 0.0, 1.0, 1.0)
        .with_range("PARAM_EYE_R_OPEN", 0.0, 1.0, 1.0)
        .with_range("PARAM_EYE_R_SMILE", 0.0, 0.0, 1.0)
        .with_range("PARAM_EYE_BALL_X", -1.0, 0.0, 1.0)
        .with_range("PARAM_EYE_BALL_Y", -1.0, 0.0, 1.0)
        .with_range("PARAM_BROW_L_Y", -1.0, 0.0, 1.0)
        .with_range("PARAM_BROW_R_Y", -1.0, 0.0, 1.0)
        .with_range("PARAM_MOUTH_FORM", -1.0, 0.0, 1.0)
        .with_range("PARAM_MOUTH_OPEN_Y", 0.0, 0.0, 1.0)
        .with_range("PARAM_BODY_ANGLE_Z", -10.0, 0.0, 10.0)
        .with_range("PARAM_BREATH", 0.0, 0.0, 1.0)
        .with_range("PARAM_HAIR_FRONT", -10.0, 0.0, 10.0)
        .with_range("PARAM_HAIR_SIDE", -10.0, 0.0, 10.0)
        .with_range("PARAM_HAIR_BACK", -10.0, 0.0, 10.0)
        .with_range("Param", -10.0, 0.0, 10.0)
        .with_pose(
            Emotion::Neutral,
            [
                ("PARAM_ANGLE_X", 0.0),
                ("PARAM_ANGLE_Y", 0.0),
                ("PARAM_EYE_L_OPEN", 1.0),
                ("PARAM_EYE_R_OPEN", 1.0),
                ("PARAM_MOUTH_FORM", 0.0),
                ("PARAM_MOUTH_OPEN_Y", 0.0),
                ("PARAM_BROW_L_Y", 0.0),
                ("PARAM_BROW_R_Y", 0.0),
            ],
        )
        .with_pose(
            Emotion::Happy,
            [
                ("PARAM_ANGLE_X", 0.0),
                ("PARAM_ANGLE_Y", 3.0),
                ("PARAM_EYE_L_OPEN", 0.8),
                ("PARAM_EYE_R_OPEN", 0.8),
                ("PARAM_EYE_R_SMILE", 1.0),
                ("PARAM_MOUTH_FORM", 0.8),
                ("PARAM_MOUTH_OPEN_Y", 0.3),
                ("PARAM_BROW_L_Y", 0.3),
                ("PARAM_BROW_R_Y", 0.3),
            ],
        )
        .with_pose(
            Emotion::Sad,
            [
                ("PARAM_ANGLE_X", 0.0),
                ("PARAM_ANGLE_Y", -5.0),
                ("PARAM_EYE_L_OPEN", 0.6),
                ("PARAM_EYE_R_OPEN", 0.6),
                ("PARAM_MOUTH_FORM", -0.4),
                ("PARAM_MOUTH_OPEN_Y", 0.0),
                ("PARAM_BROW_L_Y", -0.5),
                ("PARAM_BROW_R_Y", -0.5),
            ],
        )
        .with_pose(
            Emotion::Angry,
            [
                ("PARAM_ANGLE_X", 0.0),
                ("PARAM_ANGLE_Y", 0.0),
                ("PARAM_EYE_L_OPEN", 0.7),
                ("PARAM_EYE_R_OPEN", 0.7),
                ("PARAM_MOUTH_FORM", -0.6),
                ("PARAM_MOUTH_OPEN_Y", 0.2),
                ("PARAM_BROW_L_Y", -0.8),
                ("PARAM_BROW_R_Y", -0.8),
            ],
        )
        .with_pose(
            Emotion::Surprised,
            [
                ("PARAM_ANGLE_X", 0.0),
                ("PARAM_ANGLE_Y", 5.0),
                ("PARAM_EYE_L_OPEN", 1.0),
                ("PARAM_EYE_R_OPEN", 1.0),
                ("PARAM_MOUTH_FORM", 0.0),
                ("PARAM_MOUTH_OPEN_Y", 0.9),
                ("PARAM_BROW_L_Y", 0.8),
                ("PARAM_BROW_R_Y", 0.8),
            ],
        )
        .with_pose(
            Emotion::Thinking,
            [
                ("PARAM_ANGLE_X", 8.0),
                ("PARAM_ANGLE_Y", 2.0),
                ("PARAM_EYE_L_OPEN", 0.8),
                ("PARAM_EYE_R_OPEN", 0.8),
                ("PARAM_EYE_BALL_X", 0.5),
                ("PARAM_EYE_BALL_Y", 0.3),
                ("PARAM_MOUTH_FORM", 0.2),
                ("PARAM_MOUTH_OPEN_Y", 0.0),
                ("PARAM_BROW_L_Y", 0.2),
                ("PARAM_BROW_R_Y", -0.1),
            ],
        )
        .with_pose(
            Emotion::Confused,
            [
                ("PARAM_ANGLE_X", -5.0),
                ("PARAM_ANGLE_Y", 0.0),
                ("PARAM_EYE_L_OPEN", 0.9),
                ("PARAM_EYE_R_OPEN", 0.7),
                ("PARAM_MOUTH_FORM", -0.2),
                ("PARAM_MOUTH_OPEN_Y", 0.15),
                ("PARAM_BROW_L_Y", 0.4),
                ("PARAM_BROW_R_Y", -0.2),
            ],
        )
        .with_pose(
            Emotion::Excited,
            [
                ("PARAM_ANGLE_X", 0.0),
                ("PARAM_ANGLE_Y", 5.0),
                ("PARAM_EYE_L_OPEN", 1.0),
                ("PARAM_EYE_R_OPEN", 1.0),
                ("PARAM_EYE_R_SMILE", 0.5),
                ("PARAM_MOUTH_FORM", 1.0),
                ("PARAM_MOUTH_OPEN_Y", 0.7),
                ("PARAM_BROW_L_Y", 0.6),
                ("PARAM_BROW_R_Y", 0.6),
            ],
        )
        .with_pose(
            Emotion::Sleepy,
            [
                ("PARAM_ANGLE_X", 3.0),
                ("PARAM_ANGLE_Y", -3.0),
                ("PARAM_EYE_L_OPEN", 0.3),
                ("PARAM_EYE_R_OPEN", 0.3),
                ("PARAM_MOUTH_FORM", 0.0),
                ("PARAM_MOUTH_OPEN_Y", 0.4),
                ("PARAM_BROW_L_Y", -0.3),
                ("PARAM_BROW_R_Y", -0.3),
            ],
        )
}
