// SPDX-License-Identifier: MPL-2.0
//! Overlay configuration: loading and saving gallery preferences to a
//! `settings.toml` file.
//!
//! # Configuration Sections
//!
//! The configuration is organized into logical sections:
//! - `[general]` - Theme mode, chrome, download and focus behavior
//! - `[navigation]` - Looping
//! - `[zoom]` - Transform engine bounds and step
//! - `[slideshow]` - Auto-advance interval and trigger
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable
//! deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with an explicit path
//! 2. Set the `LIGHTSTAGE_CONFIG_DIR` environment variable
//! 3. Falls back to the platform-specific config directory
//!
//! Runtime extension points that cannot be serialized (render override,
//! toolbar modifier, hook callbacks) live in
//! [`SessionOptions`](crate::session::SessionOptions), not here.

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::theme::ThemeMode;
use crate::transform::ZoomBounds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const CONFIG_DIR_ENV: &str = "LIGHTSTAGE_CONFIG_DIR";

// =============================================================================
// Enums (shared between sections)
// =============================================================================

/// What advances the slideshow to the next item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AdvanceTrigger {
    /// Advance after the configured interval elapses.
    #[default]
    Interval,
    /// Advance when the current media signals completion; the interval
    /// timer stays armed as a fallback.
    OnMediaEnd,
}

// =============================================================================
// Section Structs
// =============================================================================

/// General overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Overlay theme mode (light, dark, or system).
    #[serde(default)]
    pub theme_mode: ThemeMode,

    /// Hide header/footer chrome, showing only content and navigation.
    #[serde(default)]
    pub stage_only: bool,

    /// Allow closing the overlay with a vertical swipe / backdrop click.
    #[serde(default = "default_true")]
    pub backdrop_close: bool,

    /// Enable the focus trap and focus save/restore on close.
    #[serde(default)]
    pub focus_management: bool,

    /// Offer a download control for items with a usable download target.
    #[serde(default = "default_true")]
    pub download_enabled: bool,

    /// Offer the thumbnail carousel control.
    #[serde(default = "default_true")]
    pub carousel: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::default(),
            stage_only: false,
            backdrop_close: true,
            focus_management: false,
            download_enabled: true,
            carousel: true,
        }
    }
}

/// Navigation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationConfig {
    /// Wrap around at the ends of the item list.
    #[serde(default = "default_true")]
    pub looping: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { looping: true }
    }
}

/// Transform engine settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoomConfig {
    /// Enable zoom/pan for zoomable content.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minimum zoom scale.
    #[serde(default = "default_zoom_min")]
    pub min: f64,

    /// Maximum zoom scale.
    #[serde(default = "default_zoom_max")]
    pub max: f64,

    /// Zoom step for wheel/keyboard zoom.
    #[serde(default = "default_zoom_step")]
    pub step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min: DEFAULT_ZOOM_MIN,
            max: DEFAULT_ZOOM_MAX,
            step: DEFAULT_ZOOM_STEP,
        }
    }
}

impl ZoomConfig {
    /// Returns the configured bounds, clamped to the supported range.
    #[must_use]
    pub fn bounds(&self) -> ZoomBounds {
        ZoomBounds::new(self.min, self.max)
    }

    /// Returns the configured step, clamped to the supported range.
    #[must_use]
    pub fn clamped_step(&self) -> f64 {
        self.step.clamp(MIN_ZOOM_STEP, MAX_ZOOM_STEP)
    }
}

/// Slideshow settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlideshowConfig {
    /// Whether a slideshow is configured for this gallery.
    #[serde(default)]
    pub enabled: bool,

    /// Auto-advance interval in seconds.
    #[serde(default = "default_slideshow_interval")]
    pub interval_secs: u64,

    /// Start advancing as soon as the overlay opens.
    #[serde(default)]
    pub auto_start: bool,

    /// What advances the slideshow.
    #[serde(default)]
    pub trigger: AdvanceTrigger,

    /// Show a progress indicator while the timer runs.
    #[serde(default)]
    pub progress_indicator: bool,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: DEFAULT_SLIDESHOW_INTERVAL_SECS,
            auto_start: false,
            trigger: AdvanceTrigger::default(),
            progress_indicator: false,
        }
    }
}

impl SlideshowConfig {
    /// Returns the configured interval, clamped to the supported range.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(
            self.interval_secs
                .clamp(MIN_SLIDESHOW_INTERVAL_SECS, MAX_SLIDESHOW_INTERVAL_SECS),
        )
    }
}

// =============================================================================
// Top-level Config
// =============================================================================

/// Complete serializable overlay configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub zoom: ZoomConfig,

    #[serde(default)]
    pub slideshow: SlideshowConfig,
}

// =============================================================================
// serde default helpers
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_zoom_min() -> f64 {
    DEFAULT_ZOOM_MIN
}

fn default_zoom_max() -> f64 {
    DEFAULT_ZOOM_MAX
}

fn default_zoom_step() -> f64 {
    DEFAULT_ZOOM_STEP
}

fn default_slideshow_interval() -> u64 {
    DEFAULT_SLIDESHOW_INTERVAL_SECS
}

// =============================================================================
// Load / Save
// =============================================================================

/// Resolves the config file path from the environment or the platform
/// config directory.
#[must_use]
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir).join(CONFIG_FILE));
    }

    dirs::config_dir().map(|dir| dir.join("lightstage").join(CONFIG_FILE))
}

/// Loads the configuration from the resolved path.
///
/// Missing files yield the default configuration. A malformed file also
/// yields the default configuration, together with a warning message the
/// caller may surface.
#[must_use]
pub fn load() -> (Config, Option<String>) {
    let Some(path) = resolve_config_path() else {
        return (Config::default(), None);
    };

    if !path.exists() {
        return (Config::default(), None);
    }

    match load_from_path(&path) {
        Ok(config) => (config, None),
        Err(err) => (
            Config::default(),
            Some(format!("ignoring invalid config {}: {}", path.display(), err)),
        ),
    }
}

/// Loads the configuration from an explicit path.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)?;
    let config = toml::from_str(&contents)?;
    Ok(config)
}

/// Saves the configuration to the resolved path, creating parent
/// directories as needed.
pub fn save(config: &Config) -> Result<()> {
    let path = resolve_config_path()
        .ok_or_else(|| Error::Config("no config directory available".to_string()))?;
    save_to_path(config, &path)
}

/// Saves the configuration to an explicit path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_consistent() {
        let config = Config::default();
        assert!(config.navigation.looping);
        assert!(config.zoom.enabled);
        assert!(config.general.download_enabled);
        assert!(!config.slideshow.enabled);
        assert_eq!(config.slideshow.interval(), Duration::from_secs(4));
    }

    #[test]
    fn round_trip_preserves_values() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.navigation.looping = false;
        config.zoom.max = 8.0;
        config.slideshow.enabled = true;
        config.slideshow.trigger = AdvanceTrigger::OnMediaEnd;

        save_to_path(&config, &path).expect("save");
        let loaded = load_from_path(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[navigation]\nlooping = false\n").expect("write");

        let loaded = load_from_path(&path).expect("load");
        assert!(!loaded.navigation.looping);
        assert!(loaded.zoom.enabled);
        assert_eq!(loaded.slideshow.interval_secs, DEFAULT_SLIDESHOW_INTERVAL_SECS);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "not toml at all [[[").expect("write");

        let result = load_from_path(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn slideshow_interval_is_clamped() {
        let config = SlideshowConfig {
            interval_secs: 0,
            ..SlideshowConfig::default()
        };
        assert_eq!(config.interval(), Duration::from_secs(MIN_SLIDESHOW_INTERVAL_SECS));

        let config = SlideshowConfig {
            interval_secs: 10_000,
            ..SlideshowConfig::default()
        };
        assert_eq!(config.interval(), Duration::from_secs(MAX_SLIDESHOW_INTERVAL_SECS));
    }

    #[test]
    fn zoom_step_is_clamped() {
        let config = ZoomConfig {
            step: 100.0,
            ..ZoomConfig::default()
        };
        assert!((config.clamped_step() - MAX_ZOOM_STEP).abs() < f64::EPSILON);
    }
}
