//! Intent operations: initialization, selection, stage toggles and the
//! caller's escape hatches.

use ms_protocol::device_models::Device;
use ms_protocol::effect_models::Effect;
use ms_protocol::session_models::{ErrorKind, RecordKind, Session, SessionStatus};
use tracing::info;

use super::{push_record, Rejection, Transition, TrackerResult};

/// Create a session from the enumerated devices and the pipeline's initial
/// active-device report.
///
/// Output devices are dropped. With no input device left the session is
/// rejected with `NoDevicesFound` and its status is `Error`.
///
/// # Example
///
/// ```
/// use ms_core::tracker::initialize;
/// use ms_protocol::{Device, SessionStatus};
///
/// let devices = vec![Device::input("mic-A", "Built-in"), Device::input("mic-B", "USB")];
/// let transition = initialize(devices, "mic-A").expect("devices are present");
/// assert_eq!(transition.session.status, SessionStatus::Ready);
/// assert_eq!(transition.session.selected_device_id.as_deref(), Some("mic-A"));
/// ```
pub fn initialize(available_devices: Vec<Device>, active_device_report: &str) -> TrackerResult {
    let devices: Vec<Device> = available_devices
        .into_iter()
        .filter(Device::is_input)
        .collect();
    let mut session = Session::default();

    if devices.is_empty() {
        return Err(Rejection::new(
            &session,
            ErrorKind::NoDevicesFound,
            None,
            "enumerator returned no input devices".to_string(),
        ));
    }

    session.devices = devices;
    session.selected_device_id = Some(active_device_report.to_string());
    session.reported_device_id = Some(active_device_report.to_string());
    session.status = SessionStatus::Ready;

    let message = format!(
        "found {} input devices, pipeline active on {}",
        session.devices.len(),
        session.label_for(active_device_report)
    );
    push_record(
        &mut session,
        RecordKind::Initialized,
        Some(active_device_report),
        None,
        message,
    );
    info!(device = active_device_report, "session initialized");

    Ok(Transition::quiet(session))
}

/// Make `device_id` the selected device and ask the pipeline to switch.
///
/// # Errors
///
/// - `SessionNotReady` when the session is uninitialized or failed
/// - `OperationInProgress` when a device switch is still outstanding
/// - `UnknownDevice` when `device_id` is not in the known set
pub fn select_device(session: &Session, device_id: &str) -> TrackerResult {
    ensure_initialized(session, "select device", Some(device_id))?;

    if let Some(target) = &session.pending.device_switch {
        return Err(Rejection::new(
            session,
            ErrorKind::OperationInProgress,
            Some(device_id),
            format!("switch to {target} is still outstanding"),
        ));
    }

    if !session.is_known(device_id) {
        return Err(Rejection::new(
            session,
            ErrorKind::UnknownDevice,
            Some(device_id),
            format!("unknown device: {device_id}"),
        ));
    }

    let mut next = session.clone();
    next.selected_device_id = Some(device_id.to_string());
    next.pending.device_switch = Some(device_id.to_string());
    next.pending.corrective = false;
    next.status = SessionStatus::Transitioning;

    let message = format!("user selected {}", next.label_for(device_id));
    push_record(
        &mut next,
        RecordKind::DeviceSelected,
        Some(device_id),
        None,
        message,
    );
    info!(device = device_id, "device selected");

    Ok(Transition::with_effect(
        next,
        Effect::SwitchDevice {
            device_id: device_id.to_string(),
        },
    ))
}

/// Record the intended processing stage state and ask the pipeline to apply
/// it.
///
/// The selected device is never touched here, whatever the pipeline reports
/// afterwards.
///
/// # Errors
///
/// - `SessionNotReady` when the session is uninitialized or failed
/// - `OperationInProgress` when a stage toggle is still outstanding
pub fn set_stage_enabled(session: &Session, enabled: bool) -> TrackerResult {
    ensure_initialized(session, "toggle processing stage", None)?;

    if session.pending.stage_toggle.is_some() {
        return Err(Rejection::new(
            session,
            ErrorKind::OperationInProgress,
            None,
            "processing stage toggle is still outstanding".to_string(),
        ));
    }

    let mut next = session.clone();
    next.stage_enabled = enabled;
    next.pending.stage_toggle = Some(enabled);
    next.status = SessionStatus::Transitioning;

    let message = if enabled {
        "enable processing stage requested".to_string()
    } else {
        "disable processing stage requested".to_string()
    };
    let selected = next.selected_device_id.clone();
    push_record(
        &mut next,
        RecordKind::StageRequested,
        selected.as_deref(),
        None,
        message,
    );
    info!(enabled, "processing stage toggle requested");

    Ok(Transition::with_effect(next, Effect::SetStage { enabled }))
}

/// Replace the known device set with a fresh enumeration.
///
/// Output devices are dropped. Selection, report and status are left alone;
/// a selected device that disappeared is reconciled through the pipeline's
/// next report.
///
/// # Errors
///
/// - `SessionNotReady` when the session was never initialized
/// - `NoDevicesFound` when no input device is left
pub fn refresh_devices(session: &Session, devices: Vec<Device>) -> TrackerResult {
    if session.status == SessionStatus::Uninitialized {
        return Err(Rejection::new(
            session,
            ErrorKind::SessionNotReady,
            None,
            "cannot refresh devices before initialization".to_string(),
        ));
    }

    let devices: Vec<Device> = devices.into_iter().filter(Device::is_input).collect();
    if devices.is_empty() {
        return Err(Rejection::new(
            session,
            ErrorKind::NoDevicesFound,
            None,
            "enumerator returned no input devices".to_string(),
        ));
    }

    let mut next = session.clone();
    next.devices = devices;
    let message = format!("device list refreshed, {} input devices", next.devices.len());
    push_record(&mut next, RecordKind::DevicesRefreshed, None, None, message);

    Ok(Transition::quiet(next))
}

/// Abandon every outstanding request and return to `Ready`.
///
/// This is the caller's way out of a `Transitioning` state whose report
/// never arrives. A `Ready` session is returned unchanged.
///
/// # Errors
///
/// `SessionNotReady` for uninitialized or failed sessions; those recover
/// through [`initialize`].
pub fn reset_to_ready(session: &Session) -> TrackerResult {
    ensure_initialized(session, "reset to ready", None)?;

    if session.status == SessionStatus::Ready {
        return Ok(Transition::quiet(session.clone()));
    }

    let mut next = session.clone();
    let abandoned = std::mem::take(&mut next.pending);
    next.status = SessionStatus::Ready;

    let mut parts = Vec::new();
    if let Some(target) = &abandoned.device_switch {
        parts.push(format!("switch to {target}"));
    }
    if let Some(enabled) = abandoned.stage_toggle {
        parts.push(format!("stage toggle to {enabled}"));
    }
    let message = format!("abandoned {}", parts.join(" and "));
    push_record(
        &mut next,
        RecordKind::ResetToReady,
        abandoned.device_switch.as_deref(),
        None,
        message,
    );
    info!("outstanding requests abandoned");

    Ok(Transition::quiet(next))
}

/// Drop the outstanding request that `effect` stood for, keeping any other.
///
/// Used when the pipeline refuses a request: no report will follow it, but a
/// request of the other kind may still be confirmed.
pub fn abandon_request(session: &Session, effect: &Effect) -> TrackerResult {
    ensure_initialized(session, "abandon request", None)?;

    let mut next = session.clone();
    let (message, device_id) = match effect {
        Effect::SwitchDevice { device_id } => {
            if next.pending.device_switch.as_deref() != Some(device_id.as_str()) {
                return Ok(Transition::quiet(session.clone()));
            }
            next.pending.device_switch = None;
            next.pending.corrective = false;
            (format!("abandoned switch to {device_id}"), Some(device_id.as_str()))
        }
        Effect::SetStage { enabled } => {
            if next.pending.stage_toggle != Some(*enabled) {
                return Ok(Transition::quiet(session.clone()));
            }
            next.pending.stage_toggle = None;
            (format!("abandoned stage toggle to {enabled}"), None)
        }
    };

    if next.pending.is_empty() {
        next.status = SessionStatus::Ready;
    }
    push_record(&mut next, RecordKind::ResetToReady, device_id, None, message);
    info!(%effect, still_pending = !next.pending.is_empty(), "request abandoned");

    Ok(Transition::quiet(next))
}

fn ensure_initialized(
    session: &Session,
    intent: &str,
    device_id: Option<&str>,
) -> Result<(), Rejection> {
    match session.status {
        SessionStatus::Uninitialized | SessionStatus::Error => Err(Rejection::new(
            session,
            ErrorKind::SessionNotReady,
            device_id,
            format!("cannot {intent} while session is {:?}", session.status),
        )),
        SessionStatus::Ready | SessionStatus::Transitioning => Ok(()),
    }
}
