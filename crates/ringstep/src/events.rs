use crate::config::StepperConfig;
use crate::geometry::Viewport;

#[derive(Debug, Clone)]
pub enum StepperInput {
    /// Pin controller progress through the region, in `[0, 1]`.
    Progress(f64),
    /// Scroll offset relative to the region start.
    Scroll(f64),
    ScrollEnd,
    JumpTo(usize),
    Next,
    Prev,
    Resize(Viewport),
    Remount(Box<StepperConfig>),
    Unmount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperEvent {
    /// Geometry was computed for the first time.
    Ready,
    ActiveIndexChanged(usize),
    /// The steps were replaced; hosts reload anything derived from them.
    Remounted { step_count: usize },
}
