//! Audio device models.
//!
//! Devices are produced by an external enumerator and are never probed by
//! mic-session itself.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Direction of an audio device.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Capture device (microphone).
    #[default]
    Input,

    /// Playback device. Listed by some enumerators, ignored by the tracker.
    Output,
}

/// A single audio device as reported by the platform.
///
/// `id` is opaque and stable per physical device. `label` is for display
/// only and may repeat across distinct ids (two identical USB headsets).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Device {
    /// Stable, opaque device identifier.
    pub id: String,

    /// Human-readable label shown to the user.
    pub label: String,

    /// Device direction. Defaults to `input` when omitted in config files.
    #[serde(default)]
    pub kind: DeviceKind,
}

impl Device {
    /// Create an input device.
    pub fn input(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: DeviceKind::Input,
        }
    }

    /// Create an output device.
    pub fn output(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: DeviceKind::Output,
        }
    }

    pub fn is_input(&self) -> bool {
        self.kind == DeviceKind::Input
    }
}
