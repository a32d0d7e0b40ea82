use crate::clock::Millis;
use std::collections::BTreeMap;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, StrumDisplay)]
pub enum TimerKind {
    /// End of the suppression window opened by a manual jump.
    GraceExpiry,
    /// Longest wait for a programmatic scroll to report completion.
    SettleTimeout,
}

/// Per-stepper deadlines. At most one pending timer per kind; scheduling a
/// kind again replaces its deadline.
#[derive(Debug, Default)]
pub struct TimerQueue {
    deadlines: BTreeMap<TimerKind, Millis>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, kind: TimerKind, at: Millis) {
        self.deadlines.insert(kind, at);
    }

    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.deadlines.remove(&kind).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.deadlines.values().min().copied()
    }

    /// Removes and returns every timer due at `now`, earliest first.
    pub fn take_due(&mut self, now: Millis) -> Vec<TimerKind> {
        let mut due: Vec<(Millis, TimerKind)> = self
            .deadlines
            .iter()
            .filter(|&(_, at)| *at <= now)
            .map(|(kind, at)| (*at, *kind))
            .collect();
        due.sort();

        for (_, kind) in &due {
            self.deadlines.remove(kind);
        }
        due.into_iter().map(|(_, kind)| kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_replaces_same_kind() {
        let mut timers = TimerQueue::new();
        timers.schedule(TimerKind::GraceExpiry, Millis(500));
        timers.schedule(TimerKind::GraceExpiry, Millis(900));
        assert_eq!(timers.pending(), 1);
        assert_eq!(timers.next_deadline(), Some(Millis(900)));
    }

    #[test]
    fn test_take_due_orders_by_deadline() {
        let mut timers = TimerQueue::new();
        timers.schedule(TimerKind::GraceExpiry, Millis(500));
        timers.schedule(TimerKind::SettleTimeout, Millis(200));
        assert_eq!(timers.next_deadline(), Some(Millis(200)));

        assert!(timers.take_due(Millis(100)).is_empty());
        assert_eq!(
            timers.take_due(Millis(600)),
            vec![TimerKind::SettleTimeout, TimerKind::GraceExpiry]
        );
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        timers.schedule(TimerKind::SettleTimeout, Millis(1));
        assert!(timers.cancel(TimerKind::SettleTimeout));
        assert!(!timers.cancel(TimerKind::SettleTimeout));
        timers.schedule(TimerKind::GraceExpiry, Millis(1));
        timers.cancel_all();
        assert_eq!(timers.next_deadline(), None);
    }
}
