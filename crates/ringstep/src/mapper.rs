//! Progress mapping: continuous position inside a pinned region to a
//! discrete step index plus sub-step fraction.

/// Largest fraction reported; fractions live in `[0, 1)`.
pub const MAX_FRACTION: f64 = 1.0 - f64::EPSILON;

/// Scaled positions this close below a step boundary snap onto it, so an
/// offset computed as `k / n * length` never lands on `k - 1`.
const BOUNDARY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mapping {
    pub index: usize,
    pub fraction: f64,
    /// False while the region has no size yet; callers skip animation.
    pub ready: bool,
}

impl Mapping {
    pub const NOT_READY: Self = Self {
        index: 0,
        fraction: 0.0,
        ready: false,
    };
}

pub fn map_offset(offset: f64, total_length: f64, step_count: usize) -> Mapping {
    if !(total_length > 0.0) || offset.is_nan() {
        return Mapping::NOT_READY;
    }
    map_progress(offset / total_length, step_count)
}

pub fn map_progress(progress: f64, step_count: usize) -> Mapping {
    if step_count == 0 || progress.is_nan() {
        return Mapping::NOT_READY;
    }

    let scaled = progress.clamp(0.0, 1.0) * step_count as f64;
    let nearest = scaled.round();
    let floor = if nearest > scaled && nearest - scaled < BOUNDARY_EPSILON {
        nearest
    } else {
        scaled.floor()
    };

    let index = (floor as usize).min(step_count - 1);
    let fraction = (scaled - index as f64).clamp(0.0, MAX_FRACTION);

    Mapping {
        index,
        fraction,
        ready: true,
    }
}

/// Offset (relative to the region start) at which step `index` begins.
pub fn offset_for_step(index: usize, total_length: f64, step_count: usize) -> f64 {
    if step_count == 0 || !(total_length > 0.0) {
        return 0.0;
    }
    let index = index.min(step_count - 1);
    index as f64 / step_count as f64 * total_length
}
