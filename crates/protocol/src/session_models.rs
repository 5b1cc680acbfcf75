//! Device session state models.
//!
//! A [`Session`] is a plain value exclusively owned by its caller. The
//! tracker in `ms-core` takes a session and returns the next one; nothing in
//! here holds shared or hidden state.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::device_models::Device;

/// Lifecycle status of a device session.
///
/// Normal flow: Uninitialized -> Ready -> Transitioning -> Ready.
///
/// `Error` is entered on a failed precondition while nothing is outstanding
/// and is left through a fresh initialization.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// No device has been confirmed by the pipeline yet.
    Uninitialized,

    /// Nothing outstanding, selection and report agree or were reconciled.
    Ready,

    /// At least one tracker-issued request awaits a pipeline report.
    Transitioning,

    /// A precondition failed. See `Session::last_error`.
    Error,
}

/// Structured failure and diagnostic kinds.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The enumerator returned no input devices.
    NoDevicesFound,

    /// A selection named a device outside the known set.
    UnknownDevice,

    /// A request of the same category is still outstanding.
    OperationInProgress,

    /// The pipeline reported a device other than the selected one after a
    /// processing stage toggle. Logged and corrected, not fatal.
    SpuriousRevert,

    /// The active device changed without any outstanding request.
    /// Informational.
    ExternalDeviceChange,

    /// An intent arrived while the session is uninitialized or failed.
    SessionNotReady,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::NoDevicesFound => "no input devices found",
            ErrorKind::UnknownDevice => "unknown device",
            ErrorKind::OperationInProgress => "operation already in progress",
            ErrorKind::SpuriousRevert => "spurious device revert",
            ErrorKind::ExternalDeviceChange => "external device change",
            ErrorKind::SessionNotReady => "session not ready",
        };
        f.write_str(text)
    }
}

/// What a single history record describes.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    /// Session created from an enumerated device list.
    Initialized,
    /// User selection accepted, switch requested.
    DeviceSelected,
    /// Processing stage toggle requested.
    StageRequested,
    /// Pipeline confirmed the requested device.
    DeviceConfirmed,
    /// Pipeline kept the selected device across a stage toggle.
    StageConfirmed,
    /// A different device was reported while a user switch was outstanding.
    InterimReport,
    /// Stage toggle knocked the pipeline off the selected device.
    SpuriousRevert,
    /// Device changed outside of any tracker request.
    ExternalDeviceChange,
    /// Known device set replaced.
    DevicesRefreshed,
    /// Outstanding requests abandoned by the caller.
    ResetToReady,
    /// An intent was refused. The record carries the error kind.
    Rejected,
}

/// One entry of the append-only diagnostic history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct TransitionRecord {
    /// Position in the history, starting at 0.
    #[ts(type = "number")]
    pub seq: u64,

    pub kind: RecordKind,

    /// Device the record is about, if any.
    pub device_id: Option<String>,

    /// Error kind for rejections and classified reports.
    pub error: Option<ErrorKind>,

    /// Human-readable description for log views.
    pub message: String,
}

/// Requests issued by the tracker that have not been reconciled yet.
///
/// At most one request per category may be outstanding.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
pub struct PendingRequests {
    /// Target of an outstanding device switch.
    pub device_switch: Option<String>,

    /// Whether the outstanding switch re-asserts the selection after a
    /// spurious revert rather than following a user selection.
    #[serde(default)]
    pub corrective: bool,

    /// Intended stage state of an outstanding toggle.
    pub stage_toggle: Option<bool>,
}

impl PendingRequests {
    pub fn is_empty(&self) -> bool {
        self.device_switch.is_none() && self.stage_toggle.is_none()
    }
}

/// Full state of one device session.
///
/// `selected_device_id` is what the user believes is active.
/// `reported_device_id` is what the pipeline last claimed to be using.
/// The two only diverge while a request is outstanding or after a spurious
/// revert that has not been corrected yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Session {
    /// Known input devices, in enumeration order.
    pub devices: Vec<Device>,

    /// Device the user last explicitly chose. `None` means unset.
    pub selected_device_id: Option<String>,

    /// Device the pipeline last reported as active.
    pub reported_device_id: Option<String>,

    /// Intended state of the processing stage.
    pub stage_enabled: bool,

    pub status: SessionStatus,

    /// Failure that put the session into `Error`.
    pub last_error: Option<ErrorKind>,

    pub pending: PendingRequests,

    /// Append-only transition log.
    pub history: Vec<TransitionRecord>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            selected_device_id: None,
            reported_device_id: None,
            stage_enabled: false,
            status: SessionStatus::Uninitialized,
            last_error: None,
            pending: PendingRequests::default(),
            history: Vec::new(),
        }
    }
}

impl Session {
    /// Look up a known device by id.
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.device(id).is_some()
    }

    /// The device the user considers active.
    pub fn selected_device(&self) -> Option<&Device> {
        self.selected_device_id
            .as_deref()
            .and_then(|id| self.device(id))
    }

    /// The device the pipeline claims to be using.
    pub fn reported_device(&self) -> Option<&Device> {
        self.reported_device_id
            .as_deref()
            .and_then(|id| self.device(id))
    }

    /// Label for display, falling back to the raw id for devices the
    /// enumerator never listed.
    pub fn label_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.device(id).map(|d| d.label.as_str()).unwrap_or(id)
    }

    /// True when the selection is confirmed and nothing is outstanding.
    pub fn is_settled(&self) -> bool {
        self.status == SessionStatus::Ready
            && self.pending.is_empty()
            && self.selected_device_id == self.reported_device_id
    }

    /// Sequence number the next history record will get.
    pub fn next_seq(&self) -> u64 {
        self.history.len() as u64
    }

    /// Records of one kind, oldest first.
    pub fn records_of(&self, kind: RecordKind) -> impl Iterator<Item = &TransitionRecord> {
        self.history.iter().filter(move |r| r.kind == kind)
    }
}
