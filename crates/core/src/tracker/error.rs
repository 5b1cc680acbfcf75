//! Rejections returned by tracker operations.
//!
//! A rejection never leaves the caller without a session: it carries the
//! session as it stands after the refusal (status and history updated), so
//! the failure is attached to state instead of being thrown away.

use ms_protocol::session_models::{ErrorKind, RecordKind, Session, SessionStatus};
use thiserror::Error;
use tracing::warn;

use super::{push_record, Transition};

/// Result type for tracker operations.
pub type TrackerResult = Result<Transition, Rejection>;

/// An intent the tracker refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct Rejection {
    /// Structured failure kind.
    pub kind: ErrorKind,

    /// Human-readable explanation, also written to the history record.
    pub message: String,

    /// Session after the refusal.
    pub session: Box<Session>,
}

impl Rejection {
    /// Build a rejection from the session the intent was applied to.
    ///
    /// The status only moves to `Error` when nothing is outstanding, so
    /// `Transitioning` keeps meaning "a request awaits a report". Refusals
    /// caused by the session's own state leave the status alone.
    pub(crate) fn new(
        session: &Session,
        kind: ErrorKind,
        device_id: Option<&str>,
        message: String,
    ) -> Self {
        let mut next = session.clone();

        if next.pending.is_empty()
            && next.status != SessionStatus::Error
            && kind != ErrorKind::SessionNotReady
        {
            next.status = SessionStatus::Error;
            next.last_error = Some(kind);
        }

        push_record(
            &mut next,
            RecordKind::Rejected,
            device_id,
            Some(kind),
            message.clone(),
        );
        warn!(error = %kind, status = ?next.status, "{message}");

        Self {
            kind,
            message,
            session: Box::new(next),
        }
    }

    /// Take the session out of the rejection.
    pub fn into_session(self) -> Session {
        *self.session
    }
}
