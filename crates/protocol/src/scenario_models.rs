//! Scripted session models for `.mic-session/scenarios/*.yaml`.
//!
//! A scenario replays intents and pipeline reports against the tracker and
//! checks the resulting state along the way.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::device_models::Device;
use crate::session_models::SessionStatus;

/// One step of a scenario.
///
/// Steps are maps tagged by `action`:
/// ```yaml
/// - action: select
///   device: usb-mic
/// - action: disable-stage
/// - action: report
///   device: default
/// - action: expect
///   selected: usb-mic
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ScenarioStep {
    /// Issue a device selection intent.
    Select { device: String },

    /// Request the processing stage to be enabled.
    EnableStage,

    /// Request the processing stage to be disabled.
    DisableStage,

    /// Feed a pipeline device report.
    Report { device: String },

    /// Abandon outstanding requests.
    Reset,

    /// Replace the known device set.
    Refresh { devices: Vec<Device> },

    /// Assert on the current session. Omitted fields are not checked.
    #[serde(rename_all = "kebab-case")]
    Expect {
        #[serde(default)]
        selected: Option<String>,
        #[serde(default)]
        reported: Option<String>,
        #[serde(default)]
        status: Option<SessionStatus>,
        #[serde(default)]
        stage_enabled: Option<bool>,
    },
}

/// A complete scripted session.
///
/// # Example
///
/// ```yaml
/// name: stage-toggle-revert
/// description: Disabling the suppressor reverts to the default microphone
/// devices:
///   - { id: default, label: "Default - Built-in Microphone" }
///   - { id: usb-mic, label: "USB Microphone" }
/// initial-device: default
/// steps:
///   - action: select
///     device: usb-mic
///   - action: report
///     device: usb-mic
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct Scenario {
    /// Unique name identifying this scenario.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Devices handed to `initialize`.
    pub devices: Vec<Device>,

    /// The pipeline's initial active-device report.
    pub initial_device: String,

    pub steps: Vec<ScenarioStep>,
}
