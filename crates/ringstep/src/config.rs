use crate::events::StepperInput;
use crate::geometry::LayoutMode;
use crate::step::{IconRef, StepConfig, StepTitle};
use crate::tween::Easing;
use async_channel::{Receiver, Sender};
use directories::ProjectDirs;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_STEP_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StepperConfig {
    /// How long a manual jump suppresses disagreeing scroll updates.
    pub grace_ms: u64,
    /// Upper bound on waiting for a programmatic scroll to report completion.
    pub settle_timeout_ms: u64,
    pub transition_duration_ms: u64,
    pub scroll_duration_ms: u64,
    pub easing: Easing,

    pub layout_mode: LayoutMode,
    pub base_angle: f64,
    /// Angular span of a semicircle layout, in degrees.
    pub arc_degrees: f64,
    pub anchor_angle: f64,
    pub mobile_anchor_angle: f64,
    /// Viewport widths below this use `mobile_anchor_angle`.
    pub mobile_breakpoint: f64,
    pub radius_factor: f64,
    pub min_radius: f64,
    pub max_radius: f64,

    pub inactive_opacity: f64,
    pub inactive_scale: f64,
    /// Rotate the ring continuously with scroll instead of snapping per step.
    pub scrub: bool,
    /// `next`/`prev` wrap around the ends.
    pub wrap: bool,

    pub steps: Vec<StepConfig>,
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            grace_ms: 500,
            settle_timeout_ms: 1500,
            transition_duration_ms: 600,
            scroll_duration_ms: 1000,
            easing: Easing::EaseOut,
            layout_mode: LayoutMode::CircleFull,
            base_angle: 0.0,
            arc_degrees: 180.0,
            anchor_angle: 0.0,
            mobile_anchor_angle: 90.0,
            mobile_breakpoint: 768.0,
            radius_factor: 0.3,
            min_radius: 120.0,
            max_radius: 360.0,
            inactive_opacity: 0.6,
            inactive_scale: 0.8,
            scrub: false,
            wrap: false,
            steps: placeholder_steps(DEFAULT_STEP_COUNT),
        }
    }
}

fn placeholder_steps(count: usize) -> Vec<StepConfig> {
    (1..=count)
        .map(|n| StepConfig {
            title: StepTitle::new(format!("Step {n}")),
            description: String::new(),
            icon: Some(IconRef::new("emblem-default")),
        })
        .collect()
}

impl StepperConfig {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps.is_empty() {
            return Err(ConfigError::NoSteps);
        }
        if let Some(index) = self.steps.iter().position(|s| s.title.is_blank()) {
            return Err(ConfigError::BlankTitle(index));
        }
        if self.grace_ms == 0 {
            return Err(ConfigError::InvalidDuration("grace_ms"));
        }
        if self.transition_duration_ms == 0 {
            return Err(ConfigError::InvalidDuration("transition_duration_ms"));
        }
        if self.settle_timeout_ms == 0 {
            return Err(ConfigError::InvalidDuration("settle_timeout_ms"));
        }
        for (name, value) in [
            ("inactive_opacity", self.inactive_opacity),
            ("inactive_scale", self.inactive_scale),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange { name, value });
            }
        }
        if self.min_radius > self.max_radius {
            return Err(ConfigError::OutOfRange {
                name: "min_radius",
                value: self.min_radius,
            });
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("At least one step must be configured")]
    NoSteps,
    #[error("Step {0} has no title")]
    BlankTitle(usize),
    #[error("{0} must be greater than zero")]
    InvalidDuration(&'static str),
    #[error("{name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "ringstep", "ringstep").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<StepperConfig, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("RINGSTEP").try_parsing(true))
        .build()?;

    let config: StepperConfig = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

/// Loads the config at `path` (or the default location), falling back to
/// built-in defaults when it is missing or invalid.
pub fn load_or_default(path: Option<&Path>) -> StepperConfig {
    let path = match path.map(Path::to_path_buf).map_or_else(get_config_path, Ok) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("{}; using default configuration", e);
            return StepperConfig::default();
        }
    };

    match load_config(&path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load {}: {}", path.display(), e);
            StepperConfig::default()
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Editors often save in several writes; events closer together than this
/// produce a single reload.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(150);

type WatchEvents = Receiver<notify::Result<Event>>;

fn watch_dir(dir: &Path) -> Result<(RecommendedWatcher, WatchEvents), ConfigError> {
    fs_err::create_dir_all(dir).map_err(notify::Error::io)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, bridge_rx))
}

fn touches_config(event: &Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Waits for the next change to `config_path`, swallowing the burst of
/// events that follows it. `None` once the watcher is gone.
async fn next_change(events: &WatchEvents, config_path: &Path) -> Option<()> {
    loop {
        match events.recv().await.ok()? {
            Ok(event) if touches_config(&event, config_path) => break,
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    while let Ok(Ok(_)) = tokio::time::timeout(RELOAD_DEBOUNCE, events.recv()).await {}
    Some(())
}

/// Watches `config_path` and sends a remount request every time it changes
/// and still parses. Returns when `tx` is closed.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<StepperInput>) {
    let Some(config_dir) = config_path.parent() else {
        return;
    };

    // the watcher stops when dropped
    let (_watcher, events) = match watch_dir(config_dir) {
        Ok(watch) => watch,
        Err(e) => {
            log::error!("Not watching {}: {}", config_path.display(), e);
            return;
        }
    };

    while next_change(&events, &config_path).await.is_some() {
        let config = match load_config(&config_path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Keeping current steps, reload failed: {}", e);
                continue;
            }
        };
        log::info!("Configuration reloaded ({} steps)", config.step_count());
        if tx.send(StepperInput::Remount(Box::new(config))).await.is_err() {
            break;
        }
    }
}
