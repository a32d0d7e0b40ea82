use crate::config::StepperConfig;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Size of the visible area plus the scrollable length of the pinned region.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scroll_length: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, scroll_length: f64) -> Self {
        Self {
            width,
            height,
            scroll_length,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    #[strum(to_string = "circle-full", serialize = "full", serialize = "circle")]
    CircleFull,
    #[strum(to_string = "semicircle", serialize = "half", serialize = "arc")]
    Semicircle,
}

/// Shortest unsigned distance between two angles, in `[0, 180]`.
#[cfg(test)]
pub(crate) fn angle_difference(a: f64, b: f64) -> f64 {
    ((a - b + 180.0).rem_euclid(360.0) - 180.0).abs()
}

/// Ring layout derived from the viewport and the step count. Recomputed on
/// every resize, never stored anywhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutGeometry {
    pub mode: LayoutMode,
    pub step_count: usize,
    pub base_angle: f64,
    pub arc_degrees: f64,
    /// Angle the active step is rotated onto.
    pub anchor: f64,
    pub radius: f64,
    pub mobile: bool,
}

impl LayoutGeometry {
    pub fn compute(config: &StepperConfig, viewport: Viewport) -> Self {
        let mobile = viewport.width < config.mobile_breakpoint;
        let radius = if viewport.width > 0.0 {
            (viewport.width * config.radius_factor).clamp(config.min_radius, config.max_radius)
        } else {
            0.0
        };

        Self {
            mode: config.layout_mode,
            step_count: config.step_count(),
            base_angle: config.base_angle,
            arc_degrees: config.arc_degrees,
            anchor: if mobile {
                config.mobile_anchor_angle
            } else {
                config.anchor_angle
            },
            radius,
            mobile,
        }
    }

    /// Layout used before the first resize: zero radius, not ready.
    pub fn unlaid(config: &StepperConfig) -> Self {
        Self::compute(config, Viewport::default())
    }

    pub fn is_ready(&self) -> bool {
        self.radius > 0.0 && self.step_count > 0
    }

    /// Angular distance between neighbouring steps.
    pub fn angle_step(&self) -> f64 {
        match self.mode {
            LayoutMode::CircleFull if self.step_count > 0 => 360.0 / self.step_count as f64,
            LayoutMode::Semicircle if self.step_count > 1 => {
                self.arc_degrees / (self.step_count - 1) as f64
            }
            _ => 0.0,
        }
    }

    pub fn angle(&self, index: usize) -> f64 {
        self.base_angle + index as f64 * self.angle_step()
    }

    /// Rotation applied to the whole ring so that `active` (advanced by
    /// `fraction` of a step) sits on the anchor.
    pub fn ring_rotation(&self, active: usize, fraction: f64) -> f64 {
        let last = self.step_count.saturating_sub(1);
        let fraction = if active >= last { 0.0 } else { fraction };
        self.anchor - (self.angle(active) + fraction * self.angle_step())
    }

    /// Rotation applied to icon `index` inside a ring rotated by `ring`, so the
    /// icon's net orientation equals the anchor frame.
    pub fn counter_rotation(&self, index: usize, ring: f64) -> f64 {
        self.anchor - ring - self.angle(index)
    }

    /// Position of step `index` relative to the ring centre.
    pub fn offset(&self, index: usize, ring: f64) -> Point {
        let theta = (ring + self.angle(index)).to_radians();
        Point::new(self.radius * theta.cos(), self.radius * theta.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(mode: LayoutMode, steps: usize) -> StepperConfig {
        let mut config = StepperConfig {
            layout_mode: mode,
            ..StepperConfig::default()
        };
        config.steps.truncate(steps);
        config
    }

    fn desktop() -> Viewport {
        Viewport::new(1280.0, 800.0, 8000.0)
    }

    #[test]
    fn test_full_circle_angles() {
        let geometry = LayoutGeometry::compute(&config(LayoutMode::CircleFull, 8), desktop());
        assert_eq!(geometry.angle_step(), 45.0);
        assert_eq!(geometry.angle(3), 135.0);
        assert_eq!(geometry.ring_rotation(3, 0.0), -135.0);
    }

    #[test]
    fn test_semicircle_angles() {
        let geometry = LayoutGeometry::compute(&config(LayoutMode::Semicircle, 5), desktop());
        assert_eq!(geometry.angle_step(), 45.0);
        assert_eq!(geometry.angle(4), 180.0);

        let single = LayoutGeometry::compute(&config(LayoutMode::Semicircle, 1), desktop());
        assert_eq!(single.angle_step(), 0.0);
        assert_eq!(single.angle(0), 0.0);
    }

    #[test]
    fn test_active_item_is_anchored_upright() {
        for mode in [LayoutMode::CircleFull, LayoutMode::Semicircle] {
            for viewport in [desktop(), Viewport::new(390.0, 844.0, 6000.0)] {
                let geometry = LayoutGeometry::compute(&config(mode, 8), viewport);
                for active in 0..8 {
                    let ring = geometry.ring_rotation(active, 0.0);
                    let total = ring + geometry.angle(active) + geometry.counter_rotation(active, ring);
                    assert!(angle_difference(total, geometry.anchor) < 1e-9);

                    let on_anchor = geometry.offset(active, ring);
                    let anchor = geometry.anchor.to_radians();
                    assert!((on_anchor.x - geometry.radius * anchor.cos()).abs() < 1e-6);
                    assert!((on_anchor.y - geometry.radius * anchor.sin()).abs() < 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_mobile_breakpoint_switches_anchor() {
        let cfg = config(LayoutMode::CircleFull, 8);
        assert_eq!(LayoutGeometry::compute(&cfg, desktop()).anchor, 0.0);

        let phone = LayoutGeometry::compute(&cfg, Viewport::new(390.0, 844.0, 6000.0));
        assert!(phone.mobile);
        assert_eq!(phone.anchor, 90.0);
        assert_eq!(phone.radius, cfg.min_radius);
    }

    #[test]
    fn test_unlaid_geometry_is_not_ready() {
        let geometry = LayoutGeometry::unlaid(&StepperConfig::default());
        assert!(!geometry.is_ready());
        assert_eq!(geometry.offset(2, 0.0), Point::default());
    }

    #[test]
    fn test_fraction_advances_ring_except_on_last_step() {
        let geometry = LayoutGeometry::compute(&config(LayoutMode::CircleFull, 4), desktop());
        assert_eq!(geometry.ring_rotation(1, 0.5), -135.0);
        assert_eq!(geometry.ring_rotation(3, 0.5), -270.0);
    }

    #[test]
    fn test_angle_difference_wraps() {
        assert_eq!(angle_difference(350.0, 10.0), 20.0);
        assert_eq!(angle_difference(-90.0, 270.0), 0.0);
        assert_eq!(angle_difference(-45.0, 315.0), 0.0);
    }
}
