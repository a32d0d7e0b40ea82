use ringstep::scroll::RecordingScroll;
use ringstep::{Easing, Millis, NavState, Stepper, StepperConfig, StepperEvent, Viewport};

const REGION: f64 = 8000.0;

fn stepper() -> Stepper<RecordingScroll> {
    let mut stepper = Stepper::mount(StepperConfig::default(), RecordingScroll::default());
    stepper.on_resize(Viewport::new(1280.0, 800.0, REGION), Millis(0));
    assert_eq!(stepper.drain_events(), vec![StepperEvent::Ready]);
    stepper
}

fn changes(stepper: &mut Stepper<RecordingScroll>) -> Vec<usize> {
    stepper
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            StepperEvent::ActiveIndexChanged(i) => Some(i),
            _ => None,
        })
        .collect()
}

#[test]
fn test_worked_example() {
    let mut s = stepper();

    s.on_scroll(3999.0, Millis(0));
    assert_eq!(s.active_index(), 3);
    assert!((s.progress().fraction - 0.999).abs() < 1e-6);

    s.on_scroll(4000.0, Millis(10));
    assert_eq!(s.active_index(), 4);
    assert_eq!(s.progress().fraction, 0.0);
    assert_eq!(changes(&mut s), vec![3, 4]);

    s.jump_to(1, Millis(1000));
    assert_eq!(s.active_index(), 1);
    let window = s.suppression().unwrap();
    assert_eq!(window.locked_index, 1);
    assert_eq!(window.expires_at, Millis(1500));
    assert_eq!(s.scroll().active.unwrap().offset, 1000.0);

    // stale event from before the jump
    s.on_scroll(4000.0, Millis(1050));
    assert_eq!(s.active_index(), 1);
    assert!(s.suppression().is_some());

    s.on_scroll(1000.0, Millis(1300));
    assert!(s.suppression().is_none());
    assert_eq!(s.active_index(), 1);
    assert_eq!(changes(&mut s), vec![1]);
}

#[test]
fn test_jump_is_idempotent() {
    let mut s = stepper();
    s.jump_to(5, Millis(0));
    s.jump_to(5, Millis(20));

    assert_eq!(s.active_index(), 5);
    assert_eq!(s.transitions_started(), 1);
    assert_eq!(changes(&mut s), vec![5]);
}

#[test]
fn test_disagreeing_scroll_inside_grace_is_discarded() {
    let mut s = stepper();
    s.jump_to(2, Millis(0));
    s.on_scroll_end(Millis(100));

    for (offset, t) in [(7000.0, 120), (5500.0, 200), (100.0, 499)] {
        s.on_scroll(offset, Millis(t));
        assert_eq!(s.active_index(), 2, "offset {offset} at {t}ms");
    }
    assert_eq!(changes(&mut s), vec![2]);
}

#[test]
fn test_grace_expiry_unlocks_scroll() {
    let mut s = stepper();
    s.jump_to(2, Millis(0));
    s.on_scroll_end(Millis(100));

    // grace runs a full period past the landing
    s.tick(Millis(599));
    assert!(s.suppression().is_some());
    s.tick(Millis(600));
    assert!(s.suppression().is_none());

    s.on_scroll(7000.0, Millis(510));
    assert_eq!(s.active_index(), 7);
    assert_eq!(s.nav_state(), NavState::ScrollDriven);
}

#[test]
fn test_drift_never_outlives_grace() {
    let mut s = stepper();
    s.jump_to(6, Millis(0));
    s.on_scroll_end(Millis(50));

    // the page was restored to a position far from the jump target
    s.on_scroll(1200.0, Millis(80));
    assert_eq!(s.active_index(), 6);

    s.tick(Millis(550));
    assert_eq!(s.active_index(), 1);
}

#[test]
fn test_lazy_expiry_without_tick() {
    let mut s = stepper();
    s.jump_to(6, Millis(0));
    // no scroll end and no tick: settle (1500) and grace (2000) lapse together
    s.on_scroll(1200.0, Millis(2100));
    assert_eq!(s.active_index(), 1);
    assert_eq!(s.nav_state(), NavState::ScrollDriven);
}

#[test]
fn test_resize_keeps_active_step() {
    let mut s = stepper();
    s.on_scroll(5200.0, Millis(0));
    let before = s.frame(Millis(1000));

    s.on_resize(Viewport::new(390.0, 844.0, 6000.0), Millis(1000));
    let after = s.frame(Millis(1000));

    assert_eq!(s.active_index(), 5);
    assert_eq!(after.active_index, 5);
    assert_ne!(before.items[0].position, after.items[0].position);
    assert!(!s.is_animating(Millis(1000)));
    assert_eq!(changes(&mut s), vec![5]);
}

#[test]
fn test_unmount_mid_jump_leaves_nothing_pending() {
    let mut s = stepper();
    s.jump_to(4, Millis(0));
    assert_eq!(s.pending_timers(), 2);
    assert!(s.is_animating(Millis(10)));

    s.unmount();
    assert_eq!(s.pending_timers(), 0);
    assert_eq!(s.next_deadline(), None);
    assert_eq!(s.scroll().cancellations, 1);
    assert!(!s.is_animating(Millis(10)));

    s.unmount();
    s.tick(Millis(5000));
    assert_eq!(s.scroll().cancellations, 1);
}

#[test]
fn test_newest_jump_wins() {
    let mut s = stepper();
    s.jump_to(2, Millis(0));
    s.jump_to(6, Millis(100));

    assert_eq!(s.active_index(), 6);
    assert_eq!(s.scroll().cancellations, 1);
    assert_eq!(s.scroll().requests.len(), 2);
    assert_eq!(s.scroll().active.unwrap().offset, 6000.0);
    assert_eq!(s.suppression().unwrap().expires_at, Millis(600));

    s.on_scroll_end(Millis(900));
    s.on_scroll(6000.0, Millis(901));
    assert!(s.suppression().is_none());
    assert_eq!(changes(&mut s), vec![2, 6]);
}

#[test]
fn test_independent_instances() {
    let mut a = stepper();
    let mut b = stepper();

    a.jump_to(7, Millis(0));
    b.on_scroll(3000.0, Millis(10));

    assert_eq!(b.active_index(), 3);
    assert!(b.suppression().is_none());
    assert_eq!(a.active_index(), 7);
    assert_eq!(b.pending_timers(), 0);
}

#[test]
fn test_keyboard_navigation() {
    let mut s = stepper();
    s.next(Millis(0));
    s.next(Millis(10));
    s.prev(Millis(20));
    assert_eq!(s.active_index(), 1);
    assert_eq!(changes(&mut s), vec![1, 2, 1]);
}

/// Plays the programmatic scroll the way a host animates it: ease-in-out
/// from `from` to `to`, one frame every 16 ms, timers ticking in between.
fn follow_scroll(
    s: &mut Stepper<RecordingScroll>,
    from: f64,
    to: f64,
    start: u64,
    duration_ms: u64,
) -> Millis {
    let mut t = 0;
    loop {
        let progress = (t as f64 / duration_ms as f64).min(1.0);
        let now = Millis(start + t);
        s.tick(now);
        s.on_scroll(from + (to - from) * Easing::EaseInOut.apply(progress), now);
        if progress >= 1.0 {
            s.on_scroll_end(now);
            return now;
        }
        t += 16;
    }
}

#[test]
fn test_long_jump_holds_through_the_whole_scroll() {
    let mut s = stepper();
    let before = s.transitions_started();

    s.jump_to(7, Millis(0));
    let landed = follow_scroll(&mut s, 0.0, 7000.0, 0, 1000);

    assert_eq!(changes(&mut s), vec![7]);
    assert_eq!(s.transitions_started() - before, 1);
    assert_eq!(s.active_index(), 7);
    assert!(s.suppression().is_none());

    s.tick(landed.after(2000));
    assert_eq!(s.pending_timers(), 0);
    assert_eq!(s.active_index(), 7);
}

#[test]
fn test_short_jump_ignores_the_step_it_passes() {
    let mut s = stepper();
    s.on_scroll(4000.0, Millis(0));
    s.drain_events();
    let before = s.transitions_started();

    s.jump_to(1, Millis(100));
    follow_scroll(&mut s, 4000.0, 1000.0, 100, 300);

    assert_eq!(changes(&mut s), vec![1]);
    assert_eq!(s.transitions_started() - before, 1);
}

#[test]
fn test_scrolling_on_past_the_target_is_followed() {
    let mut s = stepper();
    s.jump_to(3, Millis(0));
    follow_scroll(&mut s, 0.0, 3000.0, 0, 400);

    s.on_scroll(4100.0, Millis(450));
    assert_eq!(s.active_index(), 4);
    assert_eq!(changes(&mut s), vec![3, 4]);
}
