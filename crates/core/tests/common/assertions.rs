//! Custom assertion helpers over driver events.

use ms_protocol::effect_models::Effect;
use ms_protocol::ipc::Event;
use ms_protocol::session_models::{ErrorKind, RecordKind, Session, SessionStatus};
use tokio::sync::mpsc;

/// Take every event currently queued.
pub fn collect_events(events_rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = events_rx.try_recv() {
        events.push(event);
    }
    events
}

/// Whether an `OperationRejected` with `kind` was emitted.
pub fn has_rejection(events: &[Event], kind: ErrorKind) -> bool {
    events
        .iter()
        .any(|e| matches!(e, Event::OperationRejected { error, .. } if *error == kind))
}

/// All effects the driver issued, in order.
pub fn issued_effects(events: &[Event]) -> Vec<Effect> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::EffectIssued { effect, .. } => Some(effect.clone()),
            _ => None,
        })
        .collect()
}

/// Kinds of the history records announced through `HistoryAppended`.
pub fn appended_kinds(events: &[Event]) -> Vec<RecordKind> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::HistoryAppended { record, .. } => Some(record.kind),
            _ => None,
        })
        .collect()
}

/// Whether any log line contains `needle`.
pub fn has_log_containing(events: &[Event], needle: &str) -> bool {
    events
        .iter()
        .any(|e| matches!(e, Event::LogLine { content, .. } if content.contains(needle)))
}

/// Assert the session is `Ready` with selection and report both on `device_id`.
pub fn assert_settled_on(session: &Session, device_id: &str) {
    assert_eq!(session.status, SessionStatus::Ready, "session: {session:?}");
    assert_eq!(session.selected_device_id.as_deref(), Some(device_id));
    assert_eq!(session.reported_device_id.as_deref(), Some(device_id));
    assert!(session.pending.is_empty());
}
