use async_channel::{Receiver, Sender};
use ringstep::config;
use ringstep::driver::{self, DriverClock, SharedStepper};
use ringstep::{ScrollController, StepperEvent, StepperInput};
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

pub struct Services<S: ScrollController> {
    pub stepper: SharedStepper<S>,
    pub inputs: Receiver<StepperInput>,
    pub events: Sender<StepperEvent>,
    pub clock: DriverClock,
    /// Config file to watch, and where to send remount requests.
    pub watch: Option<(PathBuf, Sender<StepperInput>)>,
}

pub fn start_background_services<S>(services: Services<S>)
where
    S: ScrollController + Send + 'static,
{
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            let watcher = services
                .watch
                .map(|(path, tx)| tokio::spawn(config::run_async_watcher(path, tx)));

            driver::run(
                services.stepper,
                services.inputs,
                services.events,
                services.clock,
            )
            .await;

            if let Some(watcher) = watcher {
                watcher.abort();
            }
        });
    });
}
