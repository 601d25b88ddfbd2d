//! Configuration and settings management for PlotKit
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats stored in platform-specific directories.
//!
//! Configuration is organized into logical sections:
//! - Raster settings (base positions, increments, heights, feed rates)
//! - Dispatch settings (backoff after a full device buffer)
//! - Device settings (simulated device buffer for dry runs)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use plotkit_camtools::RasterParameters;
use plotkit_communication::{BufferedDeviceSink, DispatcherConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dispatch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Delay before retrying a command the device had no room for, in milliseconds
    pub backoff_ms: u64,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self { backoff_ms: 1000 }
    }
}

impl DispatchSettings {
    /// Build the dispatcher configuration
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

/// Simulated device settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Number of commands the device can hold
    pub buffer_capacity: usize,
    /// Time the device spends executing one command, in milliseconds
    pub execution_interval_ms: u64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            buffer_capacity: 32,
            execution_interval_ms: 5,
        }
    }
}

impl DeviceSettings {
    /// Build a simulated device from these settings
    pub fn simulated_sink(&self) -> BufferedDeviceSink {
        BufferedDeviceSink::new(
            self.buffer_capacity,
            Duration::from_millis(self.execution_interval_ms),
        )
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Raster compilation settings
    pub raster: RasterParameters,
    /// Dispatch settings
    pub dispatch: DispatchSettings,
    /// Simulated device settings
    pub device: DeviceSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location: `<config dir>/plotkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::UnsupportedPlatform("no user configuration directory".to_string())
        })?;
        Ok(dir.join("plotkit").join("config.toml"))
    }

    /// Load config from file, or fall back to defaults if it does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match Format::from_path(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Render the config as TOML
    pub fn to_toml(&self) -> SettingsResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let raster = &self.raster;
        let values = [
            ("raster.base_x", raster.base_x),
            ("raster.base_y", raster.base_y),
            ("raster.base_z", raster.base_z),
            ("raster.increment_x", raster.increment_x),
            ("raster.increment_y", raster.increment_y),
            ("raster.height_step", raster.height_step),
            ("raster.increment_a", raster.increment_a),
            ("raster.rotation_secondary", raster.rotation_secondary),
            ("raster.safe_z", raster.safe_z),
            ("raster.clear_z", raster.clear_z),
        ];
        for (key, value) in values {
            if !value.is_finite() {
                return Err(out_of_range(key, value));
            }
        }

        if !(raster.fast_feed_rate.is_finite() && raster.fast_feed_rate > 0.0) {
            return Err(out_of_range("raster.fast_feed_rate", raster.fast_feed_rate));
        }
        if !(raster.slow_feed_rate.is_finite() && raster.slow_feed_rate > 0.0) {
            return Err(out_of_range("raster.slow_feed_rate", raster.slow_feed_rate));
        }

        if self.dispatch.backoff_ms == 0 {
            return Err(out_of_range("dispatch.backoff_ms", 0));
        }

        if self.device.buffer_capacity == 0 {
            return Err(out_of_range("device.buffer_capacity", 0));
        }
        if self.device.execution_interval_ms == 0 {
            return Err(out_of_range("device.execution_interval_ms", 0));
        }

        Ok(())
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.raster.fast_feed_rate, 400.0);
        assert_eq!(config.dispatch.dispatcher_config().backoff, Duration::from_secs(1));
    }

    #[test]
    fn test_rejects_zero_backoff() {
        let mut config = Config::default();
        config.dispatch.backoff_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { key, .. }) if key == "dispatch.backoff_ms"
        ));
    }

    #[test]
    fn test_rejects_non_positive_feed() {
        let mut config = Config::default();
        config.raster.slow_feed_rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.raster.base_x = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str("[raster]\nheight_step = 15.0\n").unwrap();
        assert_eq!(config.raster.height_step, 15.0);
        assert_eq!(config.raster.base_x, 1000.0);
        assert_eq!(config.device, DeviceSettings::default());
    }
}
