use ringstep::driver::DriverClock;
use ringstep::{Easing, Millis, ScrollController};

/// Amount one wheel notch moves the pinned region, in pixels.
pub const WHEEL_STEP: f64 = 120.0;

#[derive(Debug, Clone, Copy)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    start: Millis,
    duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollStep {
    pub offset: f64,
    pub finished: bool,
}

/// Virtual scroll position of the pinned region, with eased programmatic
/// scrolling. The stepper drives it through [`ScrollController`]; the GTK
/// frame clock advances it.
pub struct SmoothScroll {
    clock: DriverClock,
    offset: f64,
    max: f64,
    animation: Option<ScrollAnimation>,
}

impl SmoothScroll {
    pub fn new(clock: DriverClock) -> Self {
        Self {
            clock,
            offset: 0.0,
            max: 0.0,
            animation: None,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn set_max(&mut self, max: f64) {
        self.max = max.max(0.0);
        self.offset = self.offset.min(self.max);
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// User scrolling takes over from any programmatic scroll.
    pub fn scroll_by(&mut self, delta: f64) -> f64 {
        self.animation = None;
        self.offset = (self.offset + delta).clamp(0.0, self.max);
        self.offset
    }

    pub fn advance(&mut self, now: Millis) -> Option<ScrollStep> {
        let anim = self.animation?;
        let t = if anim.duration_ms == 0 {
            1.0
        } else {
            (now.saturating_since(anim.start) as f64 / anim.duration_ms as f64).min(1.0)
        };

        self.offset = anim.from + (anim.to - anim.from) * Easing::EaseInOut.apply(t);
        let finished = t >= 1.0;
        if finished {
            self.animation = None;
        }
        Some(ScrollStep {
            offset: self.offset,
            finished,
        })
    }
}

impl ScrollController for SmoothScroll {
    fn scroll_to(&mut self, offset: f64, duration_ms: u64) {
        self.animation = Some(ScrollAnimation {
            from: self.offset,
            to: offset.clamp(0.0, self.max),
            start: self.clock.now(),
            duration_ms,
        });
    }

    fn cancel(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scroll() -> SmoothScroll {
        let mut scroll = SmoothScroll::new(DriverClock::start());
        scroll.set_max(8000.0);
        scroll
    }

    #[test]
    fn test_scroll_by_clamps() {
        let mut s = scroll();
        assert_eq!(s.scroll_by(-50.0), 0.0);
        assert_eq!(s.scroll_by(9000.0), 8000.0);
        s.set_max(4000.0);
        assert_eq!(s.offset(), 4000.0);
    }

    #[test]
    fn test_instant_scroll_finishes_on_first_advance() {
        let mut s = scroll();
        s.scroll_to(3000.0, 0);
        assert_eq!(
            s.advance(Millis(0)),
            Some(ScrollStep {
                offset: 3000.0,
                finished: true
            })
        );
        assert!(!s.is_animating());
        assert_eq!(s.advance(Millis(1)), None);
    }

    #[test]
    fn test_user_scroll_takes_over() {
        let mut s = scroll();
        s.scroll_to(6000.0, 1000);
        assert!(s.is_animating());
        s.scroll_by(120.0);
        assert!(!s.is_animating());
        assert_eq!(s.offset(), 120.0);
    }
}
