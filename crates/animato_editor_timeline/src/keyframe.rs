// SPDX-License-Identifier: MIT OR Apache-2.0
//! Keyframes, property values, and easing functions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timeline time in milliseconds
pub type TimeMs = i64;

/// Unique identifier for a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Value stored in a keyframe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Integer value (opacity, vector attributes)
    Int(i64),
    /// Float value (geometry)
    Float(f64),
}

impl PropertyValue {
    /// Value as f64
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(v) => *v as f64,
            Self::Float(v) => *v,
        }
    }

    /// Interpolate towards `other` with an already-eased fraction.
    ///
    /// Integers interpolate in float space and round; mismatched variants
    /// hold the left value.
    pub fn interpolate(&self, other: &PropertyValue, t: f64) -> PropertyValue {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => Self::Float(a + (b - a) * t),
            (Self::Int(a), Self::Int(b)) => {
                Self::Int((*a as f64 + (*b as f64 - *a as f64) * t).round() as i64)
            }
            _ => *self,
        }
    }
}

/// A named interpolation function applied across a transition span.
///
/// The file format stores the function as an integer id (`-1` meaning no
/// easing); see [`Easing::id`] and [`Easing::from_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum Easing {
    /// Constant-speed interpolation
    #[default]
    Linear,
    /// Quadratic, accelerating
    InQuad,
    /// Quadratic, decelerating
    OutQuad,
    /// Quadratic, accelerating then decelerating
    InOutQuad,
    /// Cubic, accelerating
    InCubic,
    /// Cubic, decelerating
    OutCubic,
    /// Cubic, accelerating then decelerating
    InOutCubic,
    /// Sinusoidal, accelerating
    InSine,
    /// Sinusoidal, decelerating
    OutSine,
    /// Sinusoidal, accelerating then decelerating
    InOutSine,
}

/// All easing functions in menu order
pub const ALL_EASINGS: [Easing; 10] = [
    Easing::Linear,
    Easing::InQuad,
    Easing::OutQuad,
    Easing::InOutQuad,
    Easing::InCubic,
    Easing::OutCubic,
    Easing::InOutCubic,
    Easing::InSine,
    Easing::OutSine,
    Easing::InOutSine,
];

impl Easing {
    /// Stable integer id used by the file format
    pub fn id(self) -> i32 {
        match self {
            Self::Linear => 0,
            Self::InQuad => 1,
            Self::OutQuad => 2,
            Self::InOutQuad => 3,
            Self::InCubic => 4,
            Self::OutCubic => 5,
            Self::InOutCubic => 6,
            Self::InSine => 7,
            Self::OutSine => 8,
            Self::InOutSine => 9,
        }
    }

    /// Look up an easing function by its file-format id
    pub fn from_id(id: i32) -> Option<Self> {
        ALL_EASINGS.iter().copied().find(|e| e.id() == id)
    }

    /// Display name for menus
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::InQuad => "Ease In (Quad)",
            Self::OutQuad => "Ease Out (Quad)",
            Self::InOutQuad => "Ease In/Out (Quad)",
            Self::InCubic => "Ease In (Cubic)",
            Self::OutCubic => "Ease Out (Cubic)",
            Self::InOutCubic => "Ease In/Out (Cubic)",
            Self::InSine => "Ease In (Sine)",
            Self::OutSine => "Ease Out (Sine)",
            Self::InOutSine => "Ease In/Out (Sine)",
        }
    }

    /// Map a linear progress fraction in [0, 1] through the curve
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => t * (2.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Self::InSine => 1.0 - (t * std::f64::consts::FRAC_PI_2).cos(),
            Self::OutSine => (t * std::f64::consts::FRAC_PI_2).sin(),
            Self::InOutSine => 0.5 * (1.0 - (t * std::f64::consts::PI).cos()),
        }
    }
}

/// Serialize `Option<Easing>` as the file format's integer: `-1` for none,
/// otherwise the function id.
pub mod easing_id {
    use super::Easing;
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Serialize as an integer id
    pub fn serialize<S: Serializer>(value: &Option<Easing>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(value.map_or(-1, Easing::id))
    }

    /// Deserialize from an integer id
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Easing>, D::Error> {
        let id = i32::deserialize(deserializer)?;
        if id < 0 {
            return Ok(None);
        }
        Easing::from_id(id)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("unknown easing id {id}")))
    }
}

/// A single time-stamped value of an animated property.
///
/// A keyframe with `easing` set anchors a transition covering the span
/// from its own time to the next keyframe's time. Neighbors are derived
/// from the track's sort order, not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyframe {
    /// Unique keyframe ID
    pub id: KeyframeId,
    /// Time in milliseconds
    pub time: TimeMs,
    /// Value at this keyframe
    pub value: PropertyValue,
    /// Easing of the segment starting here, if any
    #[serde(with = "easing_id")]
    pub easing: Option<Easing>,
}

impl Keyframe {
    /// Create a keyframe with no easing
    pub fn new(time: TimeMs, value: PropertyValue) -> Self {
        Self {
            id: KeyframeId::new(),
            time,
            value,
            easing: None,
        }
    }

    /// Set the easing of the segment starting at this keyframe
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_id_round_trip() {
        for easing in ALL_EASINGS {
            assert_eq!(Easing::from_id(easing.id()), Some(easing));
        }
        assert_eq!(Easing::from_id(-1), None);
        assert_eq!(Easing::from_id(99), None);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in ALL_EASINGS {
            assert!(easing.apply(0.0).abs() < 1e-9, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_int_interpolation_rounds() {
        let a = PropertyValue::Int(0);
        let b = PropertyValue::Int(10);
        assert_eq!(a.interpolate(&b, 0.5), PropertyValue::Int(5));
        assert_eq!(a.interpolate(&b, 0.04), PropertyValue::Int(0));
        assert_eq!(a.interpolate(&b, 0.96), PropertyValue::Int(10));
    }

    #[test]
    fn test_mismatched_values_hold() {
        let a = PropertyValue::Float(1.0);
        let b = PropertyValue::Int(5);
        assert_eq!(a.interpolate(&b, 0.5), PropertyValue::Float(1.0));
    }
}
