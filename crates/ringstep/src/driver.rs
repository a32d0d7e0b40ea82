//! Runs a [`Stepper`] on a tokio task: inputs arrive over a channel, timers
//! fire from `tokio::time`, output events leave over another channel.

use crate::clock::Millis;
use crate::config::StepperConfig;
use crate::events::{StepperEvent, StepperInput};
use crate::scroll::ScrollController;
use crate::stepper::Stepper;
use async_channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub type SharedStepper<S> = Arc<Mutex<Stepper<S>>>;

/// Converts tokio time into stepper time. Copy it to any thread that needs
/// to sample frames.
#[derive(Debug, Clone, Copy)]
pub struct DriverClock {
    origin: Instant,
}

impl DriverClock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now(&self) -> Millis {
        Millis(self.origin.elapsed().as_millis() as u64)
    }

    pub fn instant(&self, at: Millis) -> Instant {
        self.origin + Duration::from_millis(at.as_u64())
    }
}

pub async fn run<S: ScrollController>(
    stepper: SharedStepper<S>,
    inputs: Receiver<StepperInput>,
    events: Sender<StepperEvent>,
    clock: DriverClock,
) {
    loop {
        let deadline = stepper.lock().next_deadline();
        let timer = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(clock.instant(at)).await,
                None => std::future::pending::<()>().await,
            }
        };

        let mounted = tokio::select! {
            input = inputs.recv() => {
                let mut stepper = stepper.lock();
                match input {
                    Ok(input) => stepper.handle(input, clock.now()),
                    Err(_) => stepper.unmount(),
                }
                stepper.is_mounted()
            }
            _ = timer => {
                let mut stepper = stepper.lock();
                stepper.tick(clock.now());
                stepper.is_mounted()
            }
        };

        let pending = stepper.lock().drain_events();
        for event in pending {
            if events.send(event).await.is_err() {
                log::debug!("stepper event receiver dropped");
            }
        }

        if !mounted {
            break;
        }
    }
}

pub struct StepperHandle<S: ScrollController> {
    pub stepper: SharedStepper<S>,
    pub inputs: Sender<StepperInput>,
    pub events: Receiver<StepperEvent>,
    pub clock: DriverClock,
    task: JoinHandle<()>,
}

/// Mounts a stepper and drives it on the current tokio runtime.
pub fn spawn<S>(config: StepperConfig, scroll: S) -> StepperHandle<S>
where
    S: ScrollController + Send + 'static,
{
    let stepper = Arc::new(Mutex::new(Stepper::mount(config, scroll)));
    let (input_tx, input_rx) = async_channel::bounded(64);
    let (event_tx, event_rx) = async_channel::unbounded();
    let clock = DriverClock::start();

    let task = tokio::spawn(run(stepper.clone(), input_rx, event_tx, clock));

    StepperHandle {
        stepper,
        inputs: input_tx,
        events: event_rx,
        clock,
        task,
    }
}

impl<S: ScrollController> StepperHandle<S> {
    pub async fn send(&self, input: StepperInput) {
        if self.inputs.send(input).await.is_err() {
            log::debug!("stepper driver already stopped");
        }
    }

    /// Unmounts the stepper and waits for the driver task to finish.
    pub async fn unmount(self) {
        self.send(StepperInput::Unmount).await;
        if let Err(e) = self.task.await {
            log::error!("stepper driver task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter::NavState;
    use crate::geometry::Viewport;
    use crate::scroll::RecordingScroll;

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_grace_timer_fires_on_tokio_time() {
        let handle = spawn(StepperConfig::default(), RecordingScroll::default());
        handle
            .send(StepperInput::Resize(Viewport::new(1280.0, 800.0, 8000.0)))
            .await;
        handle.send(StepperInput::JumpTo(5)).await;
        settle().await;

        assert_eq!(handle.events.recv().await.unwrap(), StepperEvent::Ready);
        assert_eq!(
            handle.events.recv().await.unwrap(),
            StepperEvent::ActiveIndexChanged(5)
        );
        assert!(handle.stepper.lock().suppression().is_some());

        // the scroll never reports back; the lock holds until it settles
        tokio::time::advance(Duration::from_millis(501)).await;
        settle().await;
        assert!(handle.stepper.lock().suppression().is_some());

        tokio::time::advance(Duration::from_millis(1000)).await;
        settle().await;
        assert_eq!(
            handle.stepper.lock().nav_state(),
            NavState::ManualJumpSettling { target: 5 }
        );
        assert!(handle.stepper.lock().suppression().is_some());

        tokio::time::advance(Duration::from_millis(600)).await;
        settle().await;
        assert!(handle.stepper.lock().suppression().is_none());
        assert_eq!(handle.stepper.lock().pending_timers(), 0);

        handle.unmount().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_mid_jump_leaves_no_timers() {
        let handle = spawn(StepperConfig::default(), RecordingScroll::default());
        handle
            .send(StepperInput::Resize(Viewport::new(1280.0, 800.0, 8000.0)))
            .await;
        handle.send(StepperInput::JumpTo(2)).await;
        settle().await;

        let stepper = handle.stepper.clone();
        assert_eq!(stepper.lock().pending_timers(), 2);

        handle.unmount().await;
        let stepper = stepper.lock();
        assert!(!stepper.is_mounted());
        assert_eq!(stepper.pending_timers(), 0);
        assert_eq!(stepper.scroll().cancellations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_input_sender_stops_driver() {
        let stepper = Arc::new(Mutex::new(Stepper::mount(
            StepperConfig::default(),
            RecordingScroll::default(),
        )));
        let (input_tx, input_rx) = async_channel::bounded(4);
        let (event_tx, _event_rx) = async_channel::unbounded();
        let task = tokio::spawn(run(stepper.clone(), input_rx, event_tx, DriverClock::start()));

        drop(input_tx);
        task.await.unwrap();
        assert!(!stepper.lock().is_mounted());
    }
}
