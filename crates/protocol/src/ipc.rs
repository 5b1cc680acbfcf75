//! Presentation-driver communication protocol.
//!
//! This module defines the message types exchanged between a presentation
//! layer (browser page, terminal, test harness) and the session driver.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Intents sent from the presentation layer to the driver
//! - `Event`: State updates sent from the driver to the presentation layer
//!
//! Pipeline device reports never travel through `Op`. They come from the
//! pipeline controller's own report channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::effect_models::Effect;
use crate::session_models::{ErrorKind, Session, SessionStatus, TransitionRecord};

/// Operations sent from the presentation layer to the driver.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "selectDevice",
///   "payload": { "device_id": "usb-mic" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Make the given device the selected input.
    SelectDevice { device_id: String },

    /// Enable or disable the processing stage.
    SetStageEnabled { enabled: bool },

    /// Re-enumerate input devices and replace the known set.
    RefreshDevices,

    /// Abandon outstanding requests and return to Ready.
    ResetToReady,

    /// Request a full snapshot of the session.
    GetSession,

    /// Tear down the session and stop the driver.
    Shutdown,
}

/// Events sent from the driver to the presentation layer.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "sessionUpdated",
///   "payload": {
///     "session_id": "uuid-here",
///     "status": "READY",
///     "selected_device_id": "usb-mic",
///     "reported_device_id": "usb-mic",
///     "stage_enabled": false
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// The driver initialized a session from the enumerated devices.
    SessionInitialized {
        #[ts(type = "string")]
        session_id: Uuid,
        session: Session,
    },

    /// Status, selection, report or stage state changed.
    SessionUpdated {
        #[ts(type = "string")]
        session_id: Uuid,
        status: SessionStatus,
        selected_device_id: Option<String>,
        reported_device_id: Option<String>,
        stage_enabled: bool,
    },

    /// A record was appended to the session history.
    HistoryAppended {
        #[ts(type = "string")]
        session_id: Uuid,
        record: TransitionRecord,
    },

    /// The driver handed an effect to the pipeline controller.
    EffectIssued {
        #[ts(type = "string")]
        session_id: Uuid,
        effect: Effect,
    },

    /// An intent was refused.
    OperationRejected {
        #[ts(type = "string")]
        session_id: Uuid,
        error: ErrorKind,
        message: String,
    },

    /// Timestamped console line, as shown in the on-screen log.
    LogLine {
        #[ts(type = "string")]
        session_id: Uuid,
        #[ts(type = "string")]
        at: DateTime<Utc>,
        content: String,
    },

    /// Full session state, sent in reply to `Op::GetSession`.
    SessionSnapshot {
        #[ts(type = "string")]
        session_id: Uuid,
        session: Session,
    },

    /// The session was torn down.
    SessionClosed {
        #[ts(type = "string")]
        session_id: Uuid,
    },
}
