//! Navigation arbiter: the single owner of the active step.
//!
//! Three input sources compete for the active index: natural scrolling,
//! explicit jumps (clicks, keys) and resizes. A jump answers immediately and
//! then starts a programmatic scroll; while that scroll is travelling, and
//! for a grace period after, scroll-derived indices are checked against the
//! jump target instead of being applied blindly.
//!
//! The arbiter is a pure state machine. It never touches timers, the scroll
//! controller or the presenter directly; every decision comes back as a list
//! of [`Effect`]s that the owning stepper carries out.

use crate::clock::Millis;
use crate::config::StepperConfig;
use crate::mapper::{self, Mapping};
use crate::timer::TimerKind;
use std::cmp::Ordering;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
pub enum InputSource {
    Scroll,
    Click,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressState {
    pub active_index: usize,
    pub fraction: f64,
    pub source: InputSource,
}

impl ProgressState {
    /// Sub-step progress; zero unless the last accepted input was a scroll.
    pub fn scroll_fraction(&self) -> f64 {
        match self.source {
            InputSource::Scroll => self.fraction,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuppressionWindow {
    pub locked_index: usize,
    pub expires_at: Millis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum NavState {
    Idle,
    ScrollDriven,
    /// A programmatic scroll from `origin` toward `target` is still
    /// travelling. The grace window cannot expire in this state.
    #[strum(to_string = "ManualJumpPending({origin} -> {target})")]
    ManualJumpPending { target: usize, origin: usize },
    /// The programmatic scroll has ended; waiting for scroll input to agree.
    #[strum(to_string = "ManualJumpSettling({target})")]
    ManualJumpSettling { target: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ActiveIndexChanged(usize),
    Present { animate: bool },
    ScrollTo { offset: f64 },
    CancelScroll,
    Schedule(TimerKind, Millis),
    Cancel(TimerKind),
}

#[derive(Debug)]
pub struct NavigationArbiter {
    step_count: usize,
    grace_ms: u64,
    settle_timeout_ms: u64,
    scrub: bool,
    wrap: bool,
    scroll_length: f64,
    state: NavState,
    progress: ProgressState,
    suppression: Option<SuppressionWindow>,
    /// Last observation discarded while settling; adopted if the window
    /// expires without agreement.
    last_discarded: Option<Mapping>,
    in_flight: bool,
    /// When an in-flight scroll is assumed finished if it never reports.
    settle_at: Option<Millis>,
    /// Step under the scroll position as last reported, accepted or not.
    scroll_index: usize,
}

impl NavigationArbiter {
    pub fn new(config: &StepperConfig) -> Self {
        Self {
            step_count: config.step_count(),
            grace_ms: config.grace_ms,
            settle_timeout_ms: config.settle_timeout_ms,
            scrub: config.scrub,
            wrap: config.wrap,
            scroll_length: 0.0,
            state: NavState::Idle,
            progress: ProgressState {
                active_index: 0,
                fraction: 0.0,
                source: InputSource::Resize,
            },
            suppression: None,
            last_discarded: None,
            in_flight: false,
            settle_at: None,
            scroll_index: 0,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn progress(&self) -> ProgressState {
        self.progress
    }

    pub fn active_index(&self) -> usize {
        self.progress.active_index
    }

    pub fn suppression(&self) -> Option<SuppressionWindow> {
        self.suppression
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn scroll_length(&self) -> f64 {
        self.scroll_length
    }

    fn set_state(&mut self, next: NavState) {
        if self.state != next {
            log::debug!("arbiter: {} -> {}", self.state, next);
            self.state = next;
        }
    }

    /// Scroll-driven update, already mapped to a step.
    pub fn observe(&mut self, mapping: Mapping, now: Millis) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !mapping.ready || self.step_count == 0 {
            return effects;
        }
        let mapping = Mapping {
            index: mapping.index.min(self.step_count - 1),
            ..mapping
        };
        self.scroll_index = mapping.index;

        self.settle_if_due(now, &mut effects);
        self.expire_if_due(now, &mut effects);

        match self.state {
            NavState::Idle | NavState::ScrollDriven => {
                self.set_state(NavState::ScrollDriven);
                self.accept(mapping, &mut effects);
            }
            NavState::ManualJumpPending { target, origin } => {
                if mapping.index == target {
                    self.release_lock(&mut effects);
                    self.set_state(NavState::Idle);
                    self.accept(mapping, &mut effects);
                } else if mapping.index.abs_diff(target) == 1 && beyond(origin, target, mapping.index) {
                    // the user kept scrolling past the target; the
                    // programmatic scroll still finishes on its own
                    self.release_lock(&mut effects);
                    self.set_state(NavState::ScrollDriven);
                    self.accept(mapping, &mut effects);
                } else {
                    log::debug!(
                        "arbiter: discarding index {} while scrolling {} -> {}",
                        mapping.index,
                        origin,
                        target
                    );
                }
            }
            NavState::ManualJumpSettling { target } => match mapping.index.abs_diff(target) {
                0 => {
                    self.release_lock(&mut effects);
                    self.set_state(NavState::Idle);
                    self.accept(mapping, &mut effects);
                }
                1 => {
                    self.release_lock(&mut effects);
                    self.set_state(NavState::ScrollDriven);
                    self.accept(mapping, &mut effects);
                }
                _ => {
                    log::debug!(
                        "arbiter: discarding index {} while settled on {}",
                        mapping.index,
                        target
                    );
                    self.last_discarded = Some(mapping);
                }
            },
        }
        effects
    }

    fn accept(&mut self, mapping: Mapping, effects: &mut Vec<Effect>) {
        let changed = mapping.index != self.progress.active_index;
        self.progress = ProgressState {
            active_index: mapping.index,
            fraction: mapping.fraction,
            source: InputSource::Scroll,
        };

        if changed {
            effects.push(Effect::ActiveIndexChanged(mapping.index));
        }
        if self.scrub {
            effects.push(Effect::Present { animate: false });
        } else if changed {
            effects.push(Effect::Present { animate: true });
        }
    }

    /// Explicit request to show step `index`. The newest request always wins.
    pub fn jump(&mut self, index: usize, now: Millis) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.step_count == 0 {
            return effects;
        }
        let target = index.min(self.step_count - 1);
        let origin = self.scroll_index;

        if self.in_flight {
            effects.push(Effect::CancelScroll);
        }
        effects.push(Effect::Cancel(TimerKind::GraceExpiry));
        effects.push(Effect::Cancel(TimerKind::SettleTimeout));

        let changed = target != self.progress.active_index;
        self.progress = ProgressState {
            active_index: target,
            fraction: 0.0,
            source: InputSource::Click,
        };
        if changed {
            effects.push(Effect::ActiveIndexChanged(target));
        }
        effects.push(Effect::Present { animate: true });

        let expires_at = now.after(self.grace_ms);
        self.suppression = Some(SuppressionWindow {
            locked_index: target,
            expires_at,
        });
        self.last_discarded = None;
        effects.push(Effect::Schedule(TimerKind::GraceExpiry, expires_at));

        if self.scroll_length > 0.0 {
            let settle_at = now.after(self.settle_timeout_ms);
            self.in_flight = true;
            self.settle_at = Some(settle_at);
            self.set_state(NavState::ManualJumpPending { target, origin });
            effects.push(Effect::ScrollTo {
                offset: mapper::offset_for_step(target, self.scroll_length, self.step_count),
            });
            effects.push(Effect::Schedule(TimerKind::SettleTimeout, settle_at));
        } else {
            // nothing to scroll yet
            self.in_flight = false;
            self.settle_at = None;
            self.set_state(NavState::ManualJumpSettling { target });
        }
        effects
    }

    /// Jump relative to the active step (`next` / `prev`).
    pub fn step_by(&mut self, delta: isize, now: Millis) -> Vec<Effect> {
        if self.step_count == 0 {
            return Vec::new();
        }
        let current = self.progress.active_index as isize;
        let last = self.step_count as isize - 1;
        let target = if self.wrap {
            (current + delta).rem_euclid(self.step_count as isize)
        } else {
            (current + delta).clamp(0, last)
        };
        self.jump(target as usize, now)
    }

    /// The programmatic scroll reported completion.
    pub fn scroll_finished(&mut self, now: Millis) -> Vec<Effect> {
        let mut effects = Vec::new();
        if !self.in_flight {
            return effects;
        }
        effects.push(Effect::Cancel(TimerKind::SettleTimeout));
        self.finish_scroll(now, &mut effects);
        effects
    }

    /// Pending becomes Settling. The grace window then runs for at least
    /// `grace_ms` past `landed_at`, so it never lapses mid-scroll.
    fn finish_scroll(&mut self, landed_at: Millis, effects: &mut Vec<Effect>) {
        self.in_flight = false;
        self.settle_at = None;

        let NavState::ManualJumpPending { target, .. } = self.state else {
            return;
        };
        self.set_state(NavState::ManualJumpSettling { target });
        if let Some(window) = self.suppression.as_mut() {
            window.expires_at = window.expires_at.max(landed_at.after(self.grace_ms));
            effects.push(Effect::Schedule(TimerKind::GraceExpiry, window.expires_at));
        }
    }

    fn settle_if_due(&mut self, now: Millis, effects: &mut Vec<Effect>) {
        let Some(settle_at) = self.settle_at else {
            return;
        };
        if self.in_flight && now >= settle_at {
            log::debug!("arbiter: programmatic scroll did not report completion");
            effects.push(Effect::Cancel(TimerKind::SettleTimeout));
            self.finish_scroll(settle_at, effects);
        }
    }

    pub fn timer_fired(&mut self, kind: TimerKind, now: Millis) -> Vec<Effect> {
        match kind {
            TimerKind::GraceExpiry => {
                let mut effects = Vec::new();
                self.expire_if_due(now, &mut effects);
                effects
            }
            TimerKind::SettleTimeout => {
                log::debug!("arbiter: programmatic scroll did not report completion");
                self.scroll_finished(now)
            }
        }
    }

    /// Re-layout: the active index never changes here.
    pub fn resize(&mut self, scroll_length: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.scroll_length = scroll_length.max(0.0);
        self.progress.source = InputSource::Resize;

        if self.in_flight && self.scroll_length > 0.0 {
            effects.push(Effect::ScrollTo {
                offset: mapper::offset_for_step(
                    self.progress.active_index,
                    self.scroll_length,
                    self.step_count,
                ),
            });
        }
        effects.push(Effect::Present { animate: false });
        effects
    }

    /// Releases everything the arbiter holds. The caller is being unmounted.
    pub fn teardown(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.in_flight {
            effects.push(Effect::CancelScroll);
        }
        effects.push(Effect::Cancel(TimerKind::GraceExpiry));
        effects.push(Effect::Cancel(TimerKind::SettleTimeout));
        self.in_flight = false;
        self.settle_at = None;
        self.suppression = None;
        self.last_discarded = None;
        self.set_state(NavState::Idle);
        effects
    }

    fn release_lock(&mut self, effects: &mut Vec<Effect>) {
        if self.suppression.take().is_some() {
            effects.push(Effect::Cancel(TimerKind::GraceExpiry));
        }
        self.last_discarded = None;
    }

    fn expire_if_due(&mut self, now: Millis, effects: &mut Vec<Effect>) {
        let Some(window) = self.suppression else {
            return;
        };
        if now < window.expires_at || matches!(self.state, NavState::ManualJumpPending { .. }) {
            return;
        }

        log::debug!(
            "arbiter: suppression for {} expired at {}",
            window.locked_index,
            now
        );
        self.suppression = None;
        effects.push(Effect::Cancel(TimerKind::GraceExpiry));
        self.set_state(NavState::Idle);

        if let Some(observed) = self.last_discarded.take() {
            self.set_state(NavState::ScrollDriven);
            self.accept(observed, effects);
        }
    }
}

/// Whether `index` lies on the far side of `target` as seen from `origin`.
/// A scroll travelling from `origin` passes the near-side neighbour on its
/// way in.
fn beyond(origin: usize, target: usize, index: usize) -> bool {
    match origin.cmp(&target) {
        Ordering::Less => index > target,
        Ordering::Greater => index < target,
        Ordering::Equal => true,
    }
}
