//! Configuration for warpfield.
//!
//! Settings live in `config.toml` under the platform config directory
//! (for example `~/.config/warpfield/config.toml` on Linux). Every key is
//! optional; a missing file yields the defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use warpfield_core::{FieldParams, IntroTimeline, StarColor};

const CONFIG_FILE: &str = "config.toml";

/// Largest accepted particle population.
const MAX_PARTICLES: usize = 20_000;

/// Largest accepted refresh rate.
const MAX_FPS: u32 = 240;

/// Largest accepted dot radius or streak width, in pixels.
const MAX_STAR_SIZE: f64 = 64.0;

/// Largest accepted streak length multiplier.
const MAX_STREAK_FACTOR: f64 = 64.0;

/// Largest accepted warp threshold; anything above never warps in practice.
const MAX_WARP_THRESHOLD: f64 = 10_000.0;

/// Errors from loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available on this platform")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Display refreshes per second.
    pub fps: u32,
    /// Color of every star.
    pub star_color: StarColor,
    /// Terminal background the stars fade into.
    pub background: StarColor,
    /// Virtual pixels per terminal cell, horizontally.
    pub cell_width_px: f64,
    /// Virtual pixels per terminal cell, vertically.
    pub cell_height_px: f64,
    /// Fixed random seed for a reproducible field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Log file for the interactive terminal mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
    pub field: FieldConfig,
    pub intro: IntroConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,
            star_color: StarColor::TEAL,
            background: StarColor::BLACK,
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            seed: None,
            log_file: None,
            field: FieldConfig::default(),
            intro: IntroConfig::default(),
        }
    }
}

/// `[field]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub count: usize,
    pub projection: f64,
    pub min_size: f64,
    pub size_gain: f64,
    pub warp_threshold: f64,
    pub streak_factor: f64,
    /// Fade distant dots in drift mode.
    pub depth_fade: bool,
    /// Duration of the show/hide opacity transition.
    pub fade_ms: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        let params = FieldParams::default();
        Self {
            count: params.count,
            projection: params.projection,
            min_size: params.min_size,
            size_gain: params.size_gain,
            warp_threshold: params.warp_threshold,
            streak_factor: params.streak_factor,
            depth_fade: params.depth_fade,
            fade_ms: 1000,
        }
    }
}

impl FieldConfig {
    pub fn params(&self) -> FieldParams {
        FieldParams {
            count: self.count,
            projection: self.projection,
            min_size: self.min_size,
            size_gain: self.size_gain,
            warp_threshold: self.warp_threshold,
            streak_factor: self.streak_factor,
            depth_fade: self.depth_fade,
        }
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

/// `[intro]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    /// Milliseconds before warp starts.
    pub warp_at_ms: u64,
    /// Milliseconds before cruise starts.
    pub cruise_at_ms: u64,
    pub warp_speed: f64,
    pub cruise_speed: f64,
}

impl Default for IntroConfig {
    fn default() -> Self {
        let timeline = IntroTimeline::default();
        Self {
            warp_at_ms: timeline.warp_at.as_millis() as u64,
            cruise_at_ms: timeline.cruise_at.as_millis() as u64,
            warp_speed: timeline.warp_speed,
            cruise_speed: timeline.cruise_speed,
        }
    }
}

impl IntroConfig {
    pub fn timeline(&self) -> IntroTimeline {
        IntroTimeline {
            warp_at: Duration::from_millis(self.warp_at_ms),
            cruise_at: Duration::from_millis(self.cruise_at_ms),
            warp_speed: self.warp_speed,
            cruise_speed: self.cruise_speed,
        }
    }
}

impl Config {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "warpfield").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location. Platforms without a config
    /// directory get the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("loaded config from {}", path.display());
        Ok(config.sanitized())
    }

    /// Write to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(io_err)
    }

    /// Write to the default location.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Pull out-of-range values back into a usable range.
    pub fn sanitized(mut self) -> Self {
        let defaults = Config::default();
        self.fps = self.fps.clamp(1, MAX_FPS);
        self.field.count = self.field.count.min(MAX_PARTICLES);
        self.cell_width_px = positive_or(self.cell_width_px, defaults.cell_width_px);
        self.cell_height_px = positive_or(self.cell_height_px, defaults.cell_height_px);
        self.field.projection = positive_or(self.field.projection, defaults.field.projection);
        self.field.min_size = bounded(self.field.min_size, defaults.field.min_size, MAX_STAR_SIZE);
        self.field.size_gain =
            bounded(self.field.size_gain, defaults.field.size_gain, MAX_STAR_SIZE);
        self.field.streak_factor = bounded(
            self.field.streak_factor,
            defaults.field.streak_factor,
            MAX_STREAK_FACTOR,
        );
        self.field.warp_threshold = bounded(
            self.field.warp_threshold,
            defaults.field.warp_threshold,
            MAX_WARP_THRESHOLD,
        );
        if self.intro.cruise_at_ms < self.intro.warp_at_ms {
            self.intro.cruise_at_ms = self.intro.warp_at_ms;
        }
        self.intro.warp_speed = non_negative(self.intro.warp_speed);
        self.intro.cruise_speed = non_negative(self.intro.cruise_speed);
        self
    }
}

/// `value` if it is a positive finite number, else `default`.
fn positive_or(value: f64, default: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        default
    }
}

/// `value` clamped into `[0, max]`; NaN falls back to `default`.
fn bounded(value: f64, default: f64, max: f64) -> f64 {
    if value.is_nan() {
        default
    } else {
        value.clamp(0.0, max)
    }
}

fn non_negative(speed: f64) -> f64 {
    if speed.is_finite() { speed.max(0.0) } else { 0.0 }
}
