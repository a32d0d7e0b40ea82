use parking_lot::Mutex;
use std::sync::Arc;

/// The host's smooth-scroll engine, handed to each stepper explicitly.
///
/// Offsets are relative to the start of the pinned region. A host reports
/// completion of a `scroll_to` back through `Stepper::on_scroll_end`.
pub trait ScrollController {
    fn scroll_to(&mut self, offset: f64, duration_ms: u64);
    fn cancel(&mut self);
}

impl<T: ScrollController + ?Sized> ScrollController for Box<T> {
    fn scroll_to(&mut self, offset: f64, duration_ms: u64) {
        (**self).scroll_to(offset, duration_ms)
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }
}

/// Shares one controller between the stepper and the host's frame loop.
pub struct SharedScroll<S>(Arc<Mutex<S>>);

impl<S> SharedScroll<S> {
    pub fn new(inner: S) -> Self {
        Self(Arc::new(Mutex::new(inner)))
    }

    pub fn handle(&self) -> Arc<Mutex<S>> {
        self.0.clone()
    }
}

impl<S> Clone for SharedScroll<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S: ScrollController> ScrollController for SharedScroll<S> {
    fn scroll_to(&mut self, offset: f64, duration_ms: u64) {
        self.0.lock().scroll_to(offset, duration_ms)
    }

    fn cancel(&mut self) {
        self.0.lock().cancel()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub offset: f64,
    pub duration_ms: u64,
}

/// Records requests instead of scrolling. Used by headless hosts and tests.
#[derive(Debug, Default)]
pub struct RecordingScroll {
    pub requests: Vec<ScrollRequest>,
    pub cancellations: usize,
    pub active: Option<ScrollRequest>,
}

impl ScrollController for RecordingScroll {
    fn scroll_to(&mut self, offset: f64, duration_ms: u64) {
        let request = ScrollRequest {
            offset,
            duration_ms,
        };
        self.requests.push(request);
        self.active = Some(request);
    }

    fn cancel(&mut self) {
        self.cancellations += 1;
        self.active = None;
    }
}
