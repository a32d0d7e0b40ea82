use crate::arbiter::{Effect, NavState, NavigationArbiter, ProgressState, SuppressionWindow};
use crate::clock::Millis;
use crate::config::StepperConfig;
use crate::events::{StepperEvent, StepperInput};
use crate::geometry::{LayoutGeometry, Viewport};
use crate::mapper;
use crate::presenter::{Frame, StepPresenter};
use crate::scroll::ScrollController;
use crate::step::Steps;
use crate::timer::TimerQueue;
use std::collections::VecDeque;

/// One scroll-synchronized stepper instance.
///
/// Owns its arbiter, presenter, timers and scroll controller outright;
/// nothing is shared between instances. Output events queue up until the
/// host drains them.
pub struct Stepper<S: ScrollController> {
    config: StepperConfig,
    steps: Steps,
    arbiter: NavigationArbiter,
    presenter: StepPresenter,
    timers: TimerQueue,
    scroll: S,
    outbox: VecDeque<StepperEvent>,
    viewport: Option<Viewport>,
    ready: bool,
    mounted: bool,
}

impl<S: ScrollController> Stepper<S> {
    pub fn mount(config: StepperConfig, scroll: S) -> Self {
        let mut presenter = StepPresenter::new(&config, LayoutGeometry::unlaid(&config));
        presenter.attach_all();

        Self {
            steps: Steps::from_config(&config.steps),
            arbiter: NavigationArbiter::new(&config),
            presenter,
            timers: TimerQueue::new(),
            scroll,
            outbox: VecDeque::new(),
            viewport: None,
            ready: false,
            mounted: true,
            config,
        }
    }

    pub fn handle(&mut self, input: StepperInput, now: Millis) {
        match input {
            StepperInput::Progress(p) => self.on_progress(p, now),
            StepperInput::Scroll(offset) => self.on_scroll(offset, now),
            StepperInput::ScrollEnd => self.on_scroll_end(now),
            StepperInput::JumpTo(index) => self.jump_to(index, now),
            StepperInput::Next => self.next(now),
            StepperInput::Prev => self.prev(now),
            StepperInput::Resize(viewport) => self.on_resize(viewport, now),
            StepperInput::Remount(config) => self.remount(*config, now),
            StepperInput::Unmount => self.unmount(),
        }
    }

    pub fn on_progress(&mut self, progress: f64, now: Millis) {
        if !self.mounted {
            return;
        }
        let effects = self
            .arbiter
            .observe(mapper::map_progress(progress, self.steps.len()), now);
        self.apply(effects, now);
    }

    pub fn on_scroll(&mut self, offset: f64, now: Millis) {
        if !self.mounted {
            return;
        }
        let mapping = mapper::map_offset(offset, self.arbiter.scroll_length(), self.steps.len());
        let effects = self.arbiter.observe(mapping, now);
        self.apply(effects, now);
    }

    pub fn on_scroll_end(&mut self, now: Millis) {
        if !self.mounted {
            return;
        }
        let effects = self.arbiter.scroll_finished(now);
        self.apply(effects, now);
    }

    pub fn jump_to(&mut self, index: usize, now: Millis) {
        if !self.mounted {
            return;
        }
        let effects = self.arbiter.jump(index, now);
        self.apply(effects, now);
    }

    pub fn next(&mut self, now: Millis) {
        if self.mounted {
            let effects = self.arbiter.step_by(1, now);
            self.apply(effects, now);
        }
    }

    pub fn prev(&mut self, now: Millis) {
        if self.mounted {
            let effects = self.arbiter.step_by(-1, now);
            self.apply(effects, now);
        }
    }

    pub fn on_resize(&mut self, viewport: Viewport, now: Millis) {
        if !self.mounted {
            return;
        }
        self.viewport = Some(viewport);
        self.presenter
            .set_geometry(LayoutGeometry::compute(&self.config, viewport));

        let effects = self.arbiter.resize(viewport.scroll_length);
        self.apply(effects, now);

        if !self.ready && self.presenter.geometry().is_ready() {
            self.ready = true;
            self.outbox.push_back(StepperEvent::Ready);
        }
    }

    /// Fires every timer due at `now`.
    pub fn tick(&mut self, now: Millis) {
        if !self.mounted {
            return;
        }
        for kind in self.timers.take_due(now) {
            let effects = self.arbiter.timer_fired(kind, now);
            self.apply(effects, now);
        }
        self.presenter.prune(now);
    }

    /// Replaces the steps and settings, keeping the scroll controller and
    /// the last known viewport.
    pub fn remount(&mut self, config: StepperConfig, now: Millis) {
        self.unmount();

        let mut presenter = StepPresenter::new(&config, LayoutGeometry::unlaid(&config));
        presenter.attach_all();
        self.steps = Steps::from_config(&config.steps);
        self.arbiter = NavigationArbiter::new(&config);
        self.presenter = presenter;
        self.config = config;
        self.ready = false;
        self.mounted = true;
        self.outbox.push_back(StepperEvent::Remounted {
            step_count: self.steps.len(),
        });

        if let Some(viewport) = self.viewport {
            self.on_resize(viewport, now);
        }
    }

    /// Cancels timers, the in-flight scroll and every transition. The
    /// stepper ignores input afterwards.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        let effects = self.arbiter.teardown();
        self.apply(effects, Millis::ZERO);
        self.timers.cancel_all();
        self.presenter.cancel_all();
        self.presenter.detach_all();
        self.mounted = false;
    }

    fn apply(&mut self, effects: Vec<Effect>, now: Millis) {
        for effect in effects {
            match effect {
                Effect::ActiveIndexChanged(index) => {
                    self.outbox.push_back(StepperEvent::ActiveIndexChanged(index))
                }
                Effect::Present { animate } => {
                    let progress = self.arbiter.progress();
                    let fraction = if self.config.scrub {
                        progress.scroll_fraction()
                    } else {
                        0.0
                    };
                    self.presenter
                        .present(progress.active_index, fraction, now, animate);
                }
                Effect::ScrollTo { offset } => {
                    self.scroll.scroll_to(offset, self.config.scroll_duration_ms)
                }
                Effect::CancelScroll => self.scroll.cancel(),
                Effect::Schedule(kind, at) => self.timers.schedule(kind, at),
                Effect::Cancel(kind) => {
                    self.timers.cancel(kind);
                }
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<StepperEvent> {
        self.outbox.drain(..).collect()
    }

    pub fn active_index(&self) -> usize {
        self.arbiter.active_index()
    }

    pub fn progress(&self) -> ProgressState {
        self.arbiter.progress()
    }

    pub fn nav_state(&self) -> NavState {
        self.arbiter.state()
    }

    pub fn suppression(&self) -> Option<SuppressionWindow> {
        self.arbiter.suppression()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_animating(&self, now: Millis) -> bool {
        self.presenter.is_animating(now)
    }

    pub fn transitions_started(&self) -> u64 {
        self.presenter.transitions_started()
    }

    pub fn frame(&self, now: Millis) -> Frame {
        self.presenter.frame(now)
    }

    pub fn geometry(&self) -> &LayoutGeometry {
        self.presenter.geometry()
    }

    pub fn steps(&self) -> &Steps {
        &self.steps
    }

    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    pub fn scroll(&self) -> &S {
        &self.scroll
    }
}

impl<S: ScrollController> Drop for Stepper<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scroll::RecordingScroll;

    fn mounted() -> Stepper<RecordingScroll> {
        let mut stepper = Stepper::mount(StepperConfig::default(), RecordingScroll::default());
        stepper.on_resize(Viewport::new(1280.0, 800.0, 8000.0), Millis(0));
        stepper
    }

    #[test]
    fn test_ready_fires_once() {
        let mut stepper = mounted();
        assert_eq!(stepper.drain_events(), vec![StepperEvent::Ready]);
        stepper.on_resize(Viewport::new(1000.0, 700.0, 7000.0), Millis(5));
        assert!(stepper.drain_events().is_empty());
    }

    #[test]
    fn test_not_ready_until_sized() {
        let mut stepper = Stepper::mount(StepperConfig::default(), RecordingScroll::default());
        stepper.on_scroll(4000.0, Millis(0));
        assert_eq!(stepper.active_index(), 0);
        assert!(stepper.drain_events().is_empty());
        assert!(!stepper.is_ready());
    }

    #[test]
    fn test_jump_requests_scroll_and_timers() {
        let mut stepper = mounted();
        stepper.jump_to(3, Millis(0));
        assert_eq!(stepper.scroll().requests.len(), 1);
        assert_eq!(stepper.scroll().requests[0].offset, 3000.0);
        assert_eq!(stepper.scroll().requests[0].duration_ms, 1000);
        assert_eq!(stepper.pending_timers(), 2);
        assert_eq!(stepper.next_deadline(), Some(Millis(500)));
    }

    #[test]
    fn test_scroll_end_cancels_settle_timer() {
        let mut stepper = mounted();
        stepper.jump_to(3, Millis(0));
        stepper.on_scroll_end(Millis(200));
        assert_eq!(stepper.pending_timers(), 1);
        assert_eq!(stepper.nav_state(), NavState::ManualJumpSettling { target: 3 });
    }

    #[test]
    fn test_remount_replaces_steps() {
        let mut stepper = mounted();
        stepper.drain_events();
        stepper.jump_to(6, Millis(0));

        let mut config = StepperConfig::default();
        config.steps.truncate(3);
        stepper.remount(config, Millis(10));

        assert_eq!(stepper.steps().len(), 3);
        assert_eq!(stepper.active_index(), 0);
        assert_eq!(stepper.pending_timers(), 0);
        assert_eq!(stepper.scroll().cancellations, 1);
        assert_eq!(
            stepper.drain_events(),
            vec![
                StepperEvent::ActiveIndexChanged(6),
                StepperEvent::Remounted { step_count: 3 },
                StepperEvent::Ready
            ]
        );
    }

    #[test]
    fn test_scrub_follows_fraction() {
        let mut plain = mounted();
        plain.on_scroll(1500.0, Millis(0));
        let mut scrub = Stepper::mount(
            StepperConfig {
                scrub: true,
                ..StepperConfig::default()
            },
            RecordingScroll::default(),
        );
        scrub.on_resize(Viewport::new(1280.0, 800.0, 8000.0), Millis(0));
        scrub.on_scroll(1500.0, Millis(0));

        let settled = Millis(10_000);
        let step = plain.geometry().angle_step();
        let plain_ring = plain.frame(settled).ring_rotation;
        let scrub_ring = scrub.frame(Millis(0)).ring_rotation;
        assert!((plain_ring - scrub_ring - 0.5 * step).abs() < 1e-9);
    }

    #[test]
    fn test_unmounted_stepper_ignores_input() {
        let mut stepper = mounted();
        stepper.unmount();
        stepper.jump_to(4, Millis(0));
        stepper.on_scroll(7000.0, Millis(1));
        stepper.tick(Millis(10_000));
        assert_eq!(stepper.active_index(), 0);
        assert_eq!(stepper.pending_timers(), 0);
        assert!(stepper.frame(Millis(0)).items.is_empty());
    }
}
