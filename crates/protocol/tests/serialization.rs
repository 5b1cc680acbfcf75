use ms_protocol::*;
use uuid::Uuid;

#[test]
fn test_scenario_deserialization_from_yaml() {
    let yaml_str = r#"
name: stage-toggle-revert
description: Disabling the suppressor reverts to the default microphone
devices:
  - { id: default, label: "Default - Built-in Microphone" }
  - { id: usb-mic, label: "USB Microphone" }
  - { id: hdmi-out, label: "HDMI Output", kind: output }
initial-device: default
steps:
  - action: select
    device: usb-mic
  - action: report
    device: usb-mic
  - action: disable-stage
  - action: report
    device: default
  - action: expect
    selected: usb-mic
    reported: default
    status: TRANSITIONING
    stage-enabled: false
  - action: reset
"#;

    let scenario: Scenario = serde_yaml::from_str(yaml_str).expect("Failed to deserialize Scenario");

    assert_eq!(scenario.name, "stage-toggle-revert");
    assert_eq!(scenario.initial_device, "default");
    assert_eq!(scenario.devices.len(), 3);
    assert_eq!(scenario.devices[0].kind, DeviceKind::Input);
    assert_eq!(scenario.devices[2].kind, DeviceKind::Output);
    assert_eq!(scenario.steps.len(), 6);

    assert_eq!(
        scenario.steps[0],
        ScenarioStep::Select {
            device: "usb-mic".to_string()
        }
    );
    assert_eq!(scenario.steps[2], ScenarioStep::DisableStage);
    assert_eq!(
        scenario.steps[4],
        ScenarioStep::Expect {
            selected: Some("usb-mic".to_string()),
            reported: Some("default".to_string()),
            status: Some(SessionStatus::Transitioning),
            stage_enabled: Some(false),
        }
    );
    assert_eq!(scenario.steps[5], ScenarioStep::Reset);
}

#[test]
fn test_expect_step_fields_are_optional() {
    let yaml_str = r#"
action: expect
selected: usb-mic
"#;
    let step: ScenarioStep = serde_yaml::from_str(yaml_str).expect("Failed to deserialize step");
    assert_eq!(
        step,
        ScenarioStep::Expect {
            selected: Some("usb-mic".to_string()),
            reported: None,
            status: None,
            stage_enabled: None,
        }
    );
}

#[test]
fn test_session_status_serialization() {
    let status = SessionStatus::Transitioning;
    let json = serde_json::to_value(status).expect("Failed to serialize SessionStatus");

    assert_eq!(json, "TRANSITIONING");

    let deserialized: SessionStatus =
        serde_json::from_value(json).expect("Failed to deserialize SessionStatus");
    assert_eq!(deserialized, SessionStatus::Transitioning);
}

#[test]
fn test_error_kind_serialization() {
    let json = serde_json::to_value(ErrorKind::SpuriousRevert).expect("Failed to serialize ErrorKind");
    assert_eq!(json, "SPURIOUS_REVERT");
    assert_eq!(ErrorKind::NoDevicesFound.to_string(), "no input devices found");
}

#[test]
fn test_session_serialization() {
    let session = Session {
        devices: vec![
            Device::input("mic-A", "Built-in"),
            Device::input("mic-B", "USB"),
        ],
        selected_device_id: Some("mic-B".to_string()),
        reported_device_id: Some("mic-A".to_string()),
        stage_enabled: false,
        status: SessionStatus::Transitioning,
        last_error: None,
        pending: PendingRequests {
            device_switch: Some("mic-B".to_string()),
            corrective: true,
            stage_toggle: None,
        },
        history: vec![TransitionRecord {
            seq: 0,
            kind: RecordKind::SpuriousRevert,
            device_id: Some("mic-A".to_string()),
            error: Some(ErrorKind::SpuriousRevert),
            message: "pipeline reverted to mic-A".to_string(),
        }],
    };

    let json = serde_json::to_string(&session).expect("Failed to serialize Session");
    let deserialized: Session = serde_json::from_str(&json).expect("Failed to deserialize Session");

    assert_eq!(deserialized, session);
    assert_eq!(deserialized.selected_device().map(|d| d.label.as_str()), Some("USB"));
    assert!(!deserialized.is_settled());
}

#[test]
fn test_default_session_is_uninitialized() {
    let session = Session::default();
    assert_eq!(session.status, SessionStatus::Uninitialized);
    assert!(session.pending.is_empty());
    assert!(session.selected_device().is_none());
    assert_eq!(session.label_for("ghost"), "ghost");
}

#[test]
fn test_global_config_defaults_from_empty_toml_like_json() {
    let config: GlobalConfig = serde_json::from_str("{}").expect("Failed to deserialize GlobalConfig");

    assert_eq!(config, GlobalConfig::default());
    assert_eq!(config.log_level, "info");
    assert!(config.auto_reassert);
    assert_eq!(config.simulation.default_device, "default");
    assert_eq!(config.simulation.devices.len(), 3);
}

#[test]
fn test_effect_serialization() {
    let effect = Effect::SwitchDevice {
        device_id: "mic-B".to_string(),
    };

    let json = serde_json::to_value(&effect).expect("Failed to serialize Effect");
    assert_eq!(json["type"], "switchDevice");
    assert_eq!(json["payload"]["device_id"], "mic-B");

    let stage = Effect::SetStage { enabled: false };
    let json = serde_json::to_value(&stage).expect("Failed to serialize Effect");
    assert_eq!(json["type"], "setStage");
    assert_eq!(stage.to_string(), "disable processing stage");
}

#[test]
fn test_op_enum_serialization() {
    let op = Op::SelectDevice {
        device_id: "mic-B".to_string(),
    };

    let json = serde_json::to_value(&op).expect("Failed to serialize Op");
    assert_eq!(json["type"], "selectDevice");
    assert!(json["payload"].is_object());

    let deserialized: Op = serde_json::from_value(json).expect("Failed to deserialize Op");
    assert_eq!(deserialized, op);

    let reset = serde_json::to_value(Op::ResetToReady).expect("Failed to serialize Op::ResetToReady");
    assert_eq!(reset["type"], "resetToReady");
}

#[test]
fn test_event_enum_serialization() {
    let event = Event::SessionUpdated {
        session_id: Uuid::new_v4(),
        status: SessionStatus::Ready,
        selected_device_id: Some("mic-B".to_string()),
        reported_device_id: Some("mic-B".to_string()),
        stage_enabled: true,
    };

    let json = serde_json::to_value(&event).expect("Failed to serialize Event");
    assert_eq!(json["type"], "sessionUpdated");
    assert_eq!(json["payload"]["status"], "READY");

    let rejected = Event::OperationRejected {
        session_id: Uuid::new_v4(),
        error: ErrorKind::UnknownDevice,
        message: "unknown device: mic-Z".to_string(),
    };
    let json = serde_json::to_value(&rejected).expect("Failed to serialize Event");
    assert_eq!(json["type"], "operationRejected");
    assert_eq!(json["payload"]["error"], "UNKNOWN_DEVICE");
}
