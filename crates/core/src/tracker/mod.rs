//! Device session tracker.
//!
//! The tracker is a set of pure functions over [`Session`] values. Each
//! operation takes the current session and returns the next one together
//! with the effects the caller must run against the audio pipeline:
//!
//! - [`initialize`]: build a session from the enumerated devices
//! - [`select_device`]: explicit user selection
//! - [`set_stage_enabled`]: toggle the processing stage
//! - [`reconcile_device_report`]: fold in an asynchronous pipeline report
//! - [`refresh_devices`]: replace the known device set
//! - [`reset_to_ready`]: abandon outstanding requests
//! - [`abandon_request`]: abandon one request the pipeline refused
//!
//! Nothing here suspends, retries, or talks to the pipeline.

pub mod error;
pub mod reconcile;
pub mod session;

pub use error::{Rejection, TrackerResult};
pub use reconcile::reconcile_device_report;
pub use session::{
    abandon_request, initialize, refresh_devices, reset_to_ready, select_device,
    set_stage_enabled,
};

use ms_protocol::effect_models::Effect;
use ms_protocol::session_models::{ErrorKind, RecordKind, Session, TransitionRecord};

/// The result of an accepted operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// The next session value.
    pub session: Session,

    /// Requests for the caller to execute, in order.
    pub effects: Vec<Effect>,
}

impl Transition {
    /// A transition that asks nothing of the caller.
    pub fn quiet(session: Session) -> Self {
        Self {
            session,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(session: Session, effect: Effect) -> Self {
        Self {
            session,
            effects: vec![effect],
        }
    }
}

/// Append a record to the session history.
pub(crate) fn push_record(
    session: &mut Session,
    kind: RecordKind,
    device_id: Option<&str>,
    error: Option<ErrorKind>,
    message: String,
) {
    let seq = session.next_seq();
    session.history.push(TransitionRecord {
        seq,
        kind,
        device_id: device_id.map(str::to_string),
        error,
        message,
    });
}
