//! A scroll-synchronized stepper.
//!
//! N discrete steps are laid out on a ring and advanced by scrolling through
//! a pinned region, by explicit jumps, or re-laid out on resize. The
//! [`mapper`] turns scroll position into a step, the [`arbiter`] decides
//! which input is authoritative, and the [`presenter`] animates the ring.
//! [`Stepper`] ties the three together; [`driver`] runs one on tokio.

pub mod arbiter;
pub mod clock;
pub mod config;
pub mod driver;
pub mod events;
pub mod geometry;
mod macros;
pub mod mapper;
pub mod presenter;
pub mod scroll;
pub mod step;
pub mod stepper;
pub mod timer;
pub mod tween;

pub use arbiter::{InputSource, NavState, ProgressState, SuppressionWindow};
pub use clock::Millis;
pub use config::{ConfigError, StepperConfig};
pub use events::{StepperEvent, StepperInput};
pub use geometry::{LayoutGeometry, LayoutMode, Point, Viewport};
pub use presenter::{ElementKey, Frame, ItemFrame};
pub use scroll::ScrollController;
pub use step::{IconRef, Step, StepTitle, Steps};
pub use stepper::Stepper;
pub use tween::{Easing, Transform};
