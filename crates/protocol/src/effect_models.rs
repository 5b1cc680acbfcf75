//! Side-effect requests emitted by the session tracker.
//!
//! The tracker never talks to the audio pipeline. It returns effects and the
//! caller executes them, then feeds the pipeline's device reports back in.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A request the caller must execute against the external pipeline.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// { "type": "switchDevice", "payload": { "device_id": "usb-mic" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Effect {
    /// Ask the pipeline to capture from the given device.
    SwitchDevice { device_id: String },

    /// Ask the pipeline to enable or disable the processing stage.
    SetStage { enabled: bool },
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::SwitchDevice { device_id } => write!(f, "switch device to {device_id}"),
            Effect::SetStage { enabled: true } => write!(f, "enable processing stage"),
            Effect::SetStage { enabled: false } => write!(f, "disable processing stage"),
        }
    }
}
