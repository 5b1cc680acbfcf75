//! Reconciliation of asynchronous pipeline device reports.
//!
//! Classification, in order:
//!
//! 1. A report naming the selected device while requests are outstanding
//!    confirms all of them.
//! 2. The first report after a stage toggle naming any other device is a
//!    spurious revert, even when it repeats the last reported device: the
//!    selection is kept and re-asserted through a corrective switch effect.
//! 3. Otherwise a report equal to the last reported device changes nothing.
//! 4. A different device while a corrective switch is outstanding is another
//!    spurious revert.
//! 5. A different device while only a user switch is outstanding is an
//!    interim report; the switch is still awaited.
//! 6. A different device with nothing outstanding is an external change and
//!    becomes the new selection.

use ms_protocol::effect_models::Effect;
use ms_protocol::session_models::{ErrorKind, RecordKind, Session, SessionStatus};
use tracing::{debug, info, warn};

use super::{push_record, Transition};

/// Fold one pipeline device report into the session.
///
/// Reports must be passed in the order the pipeline emitted them. Applying
/// the same report twice yields the same session as applying it once.
pub fn reconcile_device_report(session: &Session, reported_device_id: &str) -> Transition {
    match session.status {
        SessionStatus::Uninitialized => {
            debug!(device = reported_device_id, "report before initialization ignored");
            Transition::quiet(session.clone())
        }
        SessionStatus::Transitioning => reconcile_outstanding(session, reported_device_id),
        SessionStatus::Ready | SessionStatus::Error => reconcile_idle(session, reported_device_id),
    }
}

fn reconcile_outstanding(session: &Session, reported: &str) -> Transition {
    let selected = session.selected_device_id.clone();

    if selected.as_deref() == Some(reported) {
        return confirm(session, reported);
    }

    // The revert clears the toggle, so a repeat of this report lands on the
    // duplicate check below.
    if session.pending.stage_toggle.is_some() {
        return spurious_revert(session, reported, selected);
    }

    if session.reported_device_id.as_deref() == Some(reported) {
        debug!(device = reported, "duplicate report ignored");
        return Transition::quiet(session.clone());
    }

    if session.pending.corrective {
        return spurious_revert(session, reported, selected);
    }

    let mut next = session.clone();
    next.reported_device_id = Some(reported.to_string());
    let message = format!(
        "pipeline reported {} while switching to {}",
        next.label_for(reported),
        selected.as_deref().unwrap_or("nothing"),
    );
    push_record(
        &mut next,
        RecordKind::InterimReport,
        Some(reported),
        None,
        message,
    );
    debug!(device = reported, "interim report during device switch");

    Transition::quiet(next)
}

fn confirm(session: &Session, reported: &str) -> Transition {
    let mut next = session.clone();
    let settled = std::mem::take(&mut next.pending);
    next.reported_device_id = Some(reported.to_string());
    next.status = SessionStatus::Ready;
    next.last_error = None;

    if settled.device_switch.is_some() {
        let message = if settled.corrective {
            format!("selection re-asserted on {}", next.label_for(reported))
        } else {
            format!("pipeline switched to {}", next.label_for(reported))
        };
        push_record(
            &mut next,
            RecordKind::DeviceConfirmed,
            Some(reported),
            None,
            message,
        );
    }

    if let Some(enabled) = settled.stage_toggle {
        let state = if enabled { "enabled" } else { "disabled" };
        let message = format!("processing stage {state}, kept {}", next.label_for(reported));
        push_record(
            &mut next,
            RecordKind::StageConfirmed,
            Some(reported),
            None,
            message,
        );
    }

    info!(device = reported, corrective = settled.corrective, "device confirmed");
    Transition::quiet(next)
}

fn spurious_revert(session: &Session, reported: &str, selected: Option<String>) -> Transition {
    let mut next = session.clone();
    next.reported_device_id = Some(reported.to_string());
    // The toggle has produced its outcome: the revert itself.
    next.pending.stage_toggle = None;
    next.pending.device_switch = selected.clone();
    next.pending.corrective = selected.is_some();

    let message = format!(
        "pipeline reverted to {}, re-asserting {}",
        next.label_for(reported),
        selected.as_deref().unwrap_or("nothing"),
    );
    push_record(
        &mut next,
        RecordKind::SpuriousRevert,
        Some(reported),
        Some(ErrorKind::SpuriousRevert),
        message,
    );
    warn!(
        reported,
        selected = selected.as_deref().unwrap_or_default(),
        "spurious device revert"
    );

    match selected {
        Some(device_id) => Transition::with_effect(next, Effect::SwitchDevice { device_id }),
        None => {
            next.status = SessionStatus::Ready;
            Transition::quiet(next)
        }
    }
}

fn reconcile_idle(session: &Session, reported: &str) -> Transition {
    if session.reported_device_id.as_deref() == Some(reported) {
        debug!(device = reported, "duplicate report ignored");
        return Transition::quiet(session.clone());
    }

    let mut next = session.clone();
    next.reported_device_id = Some(reported.to_string());
    next.selected_device_id = Some(reported.to_string());

    let message = format!(
        "active device changed externally to {}",
        next.label_for(reported)
    );
    push_record(
        &mut next,
        RecordKind::ExternalDeviceChange,
        Some(reported),
        Some(ErrorKind::ExternalDeviceChange),
        message,
    );
    info!(device = reported, "external device change");

    Transition::quiet(next)
}
