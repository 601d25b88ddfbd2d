//! PlotKit Settings Crate
//!
//! Handles application configuration and settings persistence.

pub mod config;
pub mod error;

pub use config::{Config, DeviceSettings, DispatchSettings};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
