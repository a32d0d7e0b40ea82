use clap::Parser;
use parking_lot::Mutex;
use relm4::prelude::*;
use ringstep::config;
use ringstep::driver::DriverClock;
use ringstep::scroll::SharedScroll;
use ringstep::Stepper;
use ringstep_gtk::app::{AppInit, AppModel};
use ringstep_gtk::runtime::{self, Services};
use ringstep_gtk::scroll::SmoothScroll;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "ringstep", version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Write the default configuration file and exit
    #[arg(long)]
    init: bool,

    /// Do not reload the configuration when the file changes
    #[arg(long)]
    no_watch: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if cli.init {
        config::write_default_config(&config_path)?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let config = config::load_or_default(Some(&config_path));
    log::info!("Loaded {} steps", config.step_count());

    let clock = DriverClock::start();
    let scroll = SharedScroll::new(SmoothScroll::new(clock));
    let scroll_handle = scroll.handle();
    let stepper = Arc::new(Mutex::new(Stepper::mount(config, scroll)));

    let (input_tx, input_rx) = async_channel::unbounded();
    let (event_tx, event_rx) = async_channel::unbounded();

    runtime::start_background_services(Services {
        stepper: stepper.clone(),
        inputs: input_rx,
        events: event_tx,
        clock,
        watch: (!cli.no_watch).then(|| (config_path.clone(), input_tx.clone())),
    });

    let app = RelmApp::new("org.ringstep.viewer").with_args(Vec::new());
    app.run::<AppModel>(AppInit {
        stepper,
        scroll: scroll_handle,
        inputs: input_tx,
        events: event_rx,
        clock,
    });

    Ok(())
}
