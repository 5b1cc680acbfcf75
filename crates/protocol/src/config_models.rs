//! Global configuration models for `.mic-session/config.toml`.
//!
//! This module defines the structure of the global configuration file that
//! controls the session driver and the simulated pipeline.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

use crate::device_models::Device;

/// Represents global settings from `.mic-session/config.toml`.
///
/// Every field has a default, so an empty file is valid.
///
/// # Example
///
/// ```toml
/// # .mic-session/config.toml
/// log_level = "debug"
/// confirm_timeout_ms = 1500
/// auto_reassert = true
///
/// [simulation]
/// default_device = "default"
/// revert_on_stage_toggle = true
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct GlobalConfig {
    /// Fallback tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How long the driver waits for a pipeline report before abandoning an
    /// outstanding request through `reset_to_ready`.
    #[serde(default = "default_confirm_timeout_ms")]
    #[ts(type = "number")]
    pub confirm_timeout_ms: u64,

    /// Execute corrective switch effects automatically after a spurious
    /// revert instead of only surfacing them.
    #[serde(default = "default_true")]
    pub auto_reassert: bool,

    /// Enable the processing stage right after initialization.
    #[serde(default = "default_true")]
    pub enable_stage_on_start: bool,

    /// Settings of the in-memory pipeline used by `simulate`.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            confirm_timeout_ms: default_confirm_timeout_ms(),
            auto_reassert: true,
            enable_stage_on_start: true,
            simulation: SimulationConfig::default(),
        }
    }
}

/// Simulated pipeline settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct SimulationConfig {
    /// Devices the simulated enumerator lists.
    #[serde(default = "default_devices")]
    pub devices: Vec<Device>,

    /// Device the simulated pipeline falls back to.
    #[serde(default = "default_device")]
    pub default_device: String,

    /// Reproduce the defect: every stage toggle is followed by a report of
    /// `default_device`.
    #[serde(default = "default_true")]
    pub revert_on_stage_toggle: bool,

    /// Delay before the simulated pipeline emits a report.
    #[serde(default = "default_report_delay_ms")]
    #[ts(type = "number")]
    pub report_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            devices: default_devices(),
            default_device: default_device(),
            revert_on_stage_toggle: true,
            report_delay_ms: default_report_delay_ms(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_confirm_timeout_ms() -> u64 {
    2000
}

fn default_report_delay_ms() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_device() -> String {
    "default".to_string()
}

fn default_devices() -> Vec<Device> {
    vec![
        Device::input("default", "Default - Built-in Microphone"),
        Device::input("usb-mic", "USB Microphone"),
        Device::input("headset", "Headset Microphone"),
    ]
}
