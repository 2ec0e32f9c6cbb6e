use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use vloader::config::LoaderConfig;
use vloader::error::ConfigViolation;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: i32,
    pub height: i32,
    /// Pin the column to the right screen edge as a layer-shell overlay.
    pub overlay: bool,
    pub margin: i32,
    /// Start animating as soon as the window is up.
    pub autostart: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 240,
            overlay: false,
            margin: 24,
            autostart: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid loader settings: {0}")]
    Invalid(#[from] ConfigViolation),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "vloader", "vloader").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Config, ConfigError> {
    let config: Config = builder.build()?.try_deserialize()?;
    config.loader.validate()?;
    Ok(config)
}

/// `VLOADER_` overrides with `__` between nested keys, e.g.
/// `VLOADER_LOADER__CIRCLES_COUNT=5`.
fn environment() -> config::Environment {
    config::Environment::with_prefix("VLOADER")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Reads the config file (if any) with environment overrides on top.
pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    finish(
        config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(environment()),
    )
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    finish(
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml)),
    )
}

/// Loads the config, writing the commented default file first when there is
/// none yet.
pub fn load_or_default() -> Config {
    match write_default_config() {
        Ok((path, true)) => log::info!("Wrote default config to {}", path.display()),
        Ok(_) => {}
        Err(e) => log::warn!("Could not write default config: {}", e),
    }

    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

/// Returns the config path and whether the file was created just now.
pub fn write_default_config() -> Result<(PathBuf, bool), ConfigError> {
    let path = get_config_path()?;
    let written = write_default_config_to(&path)?;
    Ok((path, written))
}

fn write_default_config_to(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    fs_err::write(path, DEFAULT_CONFIG)?;
    Ok(true)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

fn is_reload_trigger(event: &notify::Event, config_path: &Path) -> bool {
    matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && event.paths.iter().any(|p| p == config_path)
}

/// Sends [`AppEvent::ConfigReload`] whenever the config file changes. Runs
/// until the receiving side is gone.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    if let Err(e) = watch_config(tx).await {
        log::error!("Config watcher stopped: {}", e);
    }
}

async fn watch_config(tx: Sender<AppEvent>) -> Result<(), ConfigError> {
    let config_path = get_config_path()?;
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .ok_or(ConfigError::ConfigDirNotFound)?;
    fs_err::create_dir_all(&config_dir)?;

    let (bridge_tx, bridge_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    // the file itself may not exist yet, so watch its directory
    watcher.watch(&config_dir, RecursiveMode::NonRecursive)?;
    log::debug!("Watching {}", config_dir.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) if is_reload_trigger(&event, &config_path) => {
                if tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
    Ok(())
}
