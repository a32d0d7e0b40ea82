use crate::clock::Millis;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[strum(to_string = "linear", serialize = "none")]
    Linear,
    #[strum(to_string = "ease-in", serialize = "in")]
    EaseIn,
    #[default]
    #[strum(to_string = "ease-out", serialize = "out")]
    EaseOut,
    #[strum(to_string = "ease-in-out", serialize = "in-out")]
    EaseInOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` onto the eased curve (cubic).
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Presentation state of one element. Rotation is in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: f64,
    pub opacity: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        rotation: 0.0,
        opacity: 1.0,
        scale: 1.0,
    };

    pub fn lerp(&self, to: &Transform, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            rotation: mix(self.rotation, to.rotation),
            opacity: mix(self.opacity, to.opacity),
            scale: mix(self.scale, to.scale),
        }
    }

    pub fn approx_eq(&self, other: &Transform) -> bool {
        const EPS: f64 = 1e-6;
        (self.rotation - other.rotation).abs() < EPS
            && (self.opacity - other.opacity).abs() < EPS
            && (self.scale - other.scale).abs() < EPS
    }
}

/// A running transition. Elements hold `Option<Tween>`: no tween means the
/// element rests at its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Transform,
    pub to: Transform,
    pub start: Millis,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn progress(&self, now: Millis) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (now.saturating_since(self.start) as f64 / self.duration_ms as f64).min(1.0)
    }

    pub fn sample(&self, now: Millis) -> Transform {
        self.from
            .lerp(&self.to, self.easing.apply(self.progress(now)))
    }

    pub fn is_finished(&self, now: Millis) -> bool {
        self.progress(now) >= 1.0
    }
}
