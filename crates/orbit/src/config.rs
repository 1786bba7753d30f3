use crate::events::AppEvent;
use crate::nav::item::{ItemId, NavigationItem};
use crate::nav::{
    DEFAULT_ANIMATION_MS, DEFAULT_CENTER_SIZE, DEFAULT_CLOSE_DELAY_MS, DEFAULT_ITEM_SIZE,
    DEFAULT_RADIUS, DEFAULT_START_ANGLE,
};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Durations are written in milliseconds.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub items: Vec<NavigationItem>,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub animation_duration: Duration,
    pub radius: f64,
    pub center_size: f64,
    pub item_size: f64,
    /// Degrees, clockwise from east.
    pub start_angle: f64,
    pub auto_close: bool,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub close_delay: Duration,
    pub enable_keyboard: bool,
    pub enable_touch: bool,
    pub center_icon: String,
    pub center_label: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            animation_duration: Duration::from_millis(DEFAULT_ANIMATION_MS),
            radius: DEFAULT_RADIUS,
            center_size: DEFAULT_CENTER_SIZE,
            item_size: DEFAULT_ITEM_SIZE,
            start_angle: DEFAULT_START_ANGLE,
            auto_close: true,
            close_delay: Duration::from_millis(DEFAULT_CLOSE_DELAY_MS),
            enable_keyboard: true,
            enable_touch: true,
            center_icon: "menu".to_string(),
            center_label: "Menu".to_string(),
        }
    }
}

/// Set fields replace current values. `items` replaces the whole list.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfigPatch {
    pub items: Option<Vec<NavigationItem>>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub animation_duration: Option<Duration>,
    pub radius: Option<f64>,
    pub center_size: Option<f64>,
    pub item_size: Option<f64>,
    pub start_angle: Option<f64>,
    pub auto_close: Option<bool>,
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub close_delay: Option<Duration>,
    pub enable_keyboard: Option<bool>,
    pub enable_touch: Option<bool>,
    pub center_icon: Option<String>,
    pub center_label: Option<String>,
}

impl NavigationConfigPatch {
    pub fn items(items: Vec<NavigationItem>) -> Self {
        Self {
            items: Some(items),
            ..Default::default()
        }
    }
}

impl From<NavigationConfig> for NavigationConfigPatch {
    fn from(config: NavigationConfig) -> Self {
        Self {
            items: Some(config.items),
            animation_duration: Some(config.animation_duration),
            radius: Some(config.radius),
            center_size: Some(config.center_size),
            item_size: Some(config.item_size),
            start_angle: Some(config.start_angle),
            auto_close: Some(config.auto_close),
            close_delay: Some(config.close_delay),
            enable_keyboard: Some(config.enable_keyboard),
            enable_touch: Some(config.enable_touch),
            center_icon: Some(config.center_icon),
            center_label: Some(config.center_label),
        }
    }
}

impl NavigationConfig {
    pub fn merged(&self, patch: NavigationConfigPatch) -> Self {
        let base = self.clone();
        Self {
            items: patch.items.unwrap_or(base.items),
            animation_duration: patch.animation_duration.unwrap_or(base.animation_duration),
            radius: patch.radius.unwrap_or(base.radius),
            center_size: patch.center_size.unwrap_or(base.center_size),
            item_size: patch.item_size.unwrap_or(base.item_size),
            start_angle: patch.start_angle.unwrap_or(base.start_angle),
            auto_close: patch.auto_close.unwrap_or(base.auto_close),
            close_delay: patch.close_delay.unwrap_or(base.close_delay),
            enable_keyboard: patch.enable_keyboard.unwrap_or(base.enable_keyboard),
            enable_touch: patch.enable_touch.unwrap_or(base.enable_touch),
            center_icon: patch.center_icon.unwrap_or(base.center_icon),
            center_label: patch.center_label.unwrap_or(base.center_label),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        for item in &self.items {
            if item.id.trim().is_empty() {
                issues.push(ValidationIssue::EmptyId {
                    position: item.position,
                });
            } else if !seen.insert(&item.id) {
                issues.push(ValidationIssue::DuplicateId(item.id.clone()));
            }
        }

        let mut positions: Vec<usize> = self.items.iter().map(|i| i.position).collect();
        positions.sort_unstable();
        if positions.iter().enumerate().any(|(i, &p)| i != p) {
            issues.push(ValidationIssue::NonContiguousPositions(positions));
        }

        for (field, value) in [
            ("radius", self.radius),
            ("center_size", self.center_size),
            ("item_size", self.item_size),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(ValidationIssue::BadDimension { field, value });
            }
        }
        if !self.items.is_empty() && self.radius.is_finite() && self.radius <= 0.0 {
            issues.push(ValidationIssue::CollapsedRing(self.radius));
        }
        if !self.start_angle.is_finite() {
            issues.push(ValidationIssue::BadDimension {
                field: "start_angle",
                value: self.start_angle,
            });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }

    pub fn item(&self, id: &ItemId) -> Option<&NavigationItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn item_at(&self, position: usize) -> Option<&NavigationItem> {
        self.items.iter().find(|item| item.position == position)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    #[error("duplicate item id '{0}'")]
    DuplicateId(ItemId),
    #[error("item at position {position} has an empty id")]
    EmptyId { position: usize },
    #[error("item positions {0:?} are not 0..N-1")]
    NonContiguousPositions(Vec<usize>),
    #[error("{field} must be a finite, non-negative number (got {value})")]
    BadDimension { field: &'static str, value: f64 },
    #[error("radius must be positive when items are configured (got {0})")]
    CollapsedRing(f64),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid navigation config: {}", join_issues(.0))]
    Invalid(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("dev", "orbit", "orbit").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_patch(path: &Path) -> Result<NavigationConfigPatch, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(config::Environment::with_prefix("ORBIT").try_parsing(true))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn default_patch() -> Result<NavigationConfigPatch, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(
            DEFAULT_CONFIG,
            config::FileFormat::Toml,
        ))
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Loads the user config, falling back to the bundled site menu when the
/// file is missing or broken.
pub fn load_or_default(path: &Path) -> NavigationConfigPatch {
    if !path.exists() {
        log::info!("No config at {}, using bundled menu", path.display());
        return default_patch().unwrap_or_default();
    }

    match load_patch(path) {
        Ok(patch) => patch,
        Err(e) => {
            log::error!("Failed to load config, using bundled menu: {}", e);
            default_patch().unwrap_or_default()
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

pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
