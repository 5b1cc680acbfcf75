//! Scripted session replay.
//!
//! A scenario feeds intents and pipeline reports straight into the tracker.
//! Effects are collected but never executed: the script itself plays the
//! pipeline, so any report order can be reproduced deterministically.

use crate::tracker::{self, TrackerResult};
use ms_protocol::effect_models::Effect;
use ms_protocol::scenario_models::{Scenario, ScenarioStep};
use ms_protocol::session_models::{ErrorKind, Session, SessionStatus};
use serde::Serialize;
use tracing::debug;

/// What happened at one step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepOutcome {
    pub index: usize,
    pub step: ScenarioStep,
    /// Effects the tracker asked for.
    pub effects: Vec<Effect>,
    /// Set when the tracker refused the step.
    pub rejection: Option<ErrorKind>,
    /// Failed expectations, empty for every step but `expect`.
    pub failures: Vec<String>,
}

/// Result of replaying a whole scenario.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioOutcome {
    pub name: String,
    /// Set when `initialize` itself was refused.
    pub init_error: Option<ErrorKind>,
    pub steps: Vec<StepOutcome>,
    /// Session after the last step.
    pub session: Session,
}

impl ScenarioOutcome {
    /// True when every expectation held.
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.failures.is_empty())
    }

    /// Every failed expectation with the index of its step.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.steps
            .iter()
            .flat_map(|s| s.failures.iter().map(move |f| (s.index, f.as_str())))
    }
}

/// Replay `scenario` against a fresh session.
///
/// Rejections do not stop the replay; they are recorded on the step and the
/// session they carry becomes the current one.
pub fn run_scenario(scenario: &Scenario) -> ScenarioOutcome {
    let (mut session, init_error) =
        match tracker::initialize(scenario.devices.clone(), &scenario.initial_device) {
            Ok(transition) => (transition.session, None),
            Err(rejection) => (rejection.session.as_ref().clone(), Some(rejection.kind)),
        };

    let mut steps = Vec::with_capacity(scenario.steps.len());

    for (index, step) in scenario.steps.iter().enumerate() {
        let mut outcome = StepOutcome {
            index,
            step: step.clone(),
            effects: Vec::new(),
            rejection: None,
            failures: Vec::new(),
        };

        let result: Option<TrackerResult> = match step {
            ScenarioStep::Select { device } => Some(tracker::select_device(&session, device)),
            ScenarioStep::EnableStage => Some(tracker::set_stage_enabled(&session, true)),
            ScenarioStep::DisableStage => Some(tracker::set_stage_enabled(&session, false)),
            ScenarioStep::Report { device } => {
                Some(Ok(tracker::reconcile_device_report(&session, device)))
            }
            ScenarioStep::Reset => Some(tracker::reset_to_ready(&session)),
            ScenarioStep::Refresh { devices } => {
                Some(tracker::refresh_devices(&session, devices.clone()))
            }
            ScenarioStep::Expect {
                selected,
                reported,
                status,
                stage_enabled,
            } => {
                outcome.failures = check(
                    &session,
                    selected.as_deref(),
                    reported.as_deref(),
                    *status,
                    *stage_enabled,
                );
                None
            }
        };

        match result {
            Some(Ok(transition)) => {
                session = transition.session;
                outcome.effects = transition.effects;
            }
            Some(Err(rejection)) => {
                outcome.rejection = Some(rejection.kind);
                session = rejection.into_session();
            }
            None => {}
        }

        debug!(scenario = %scenario.name, index, status = ?session.status, "step replayed");
        steps.push(outcome);
    }

    ScenarioOutcome {
        name: scenario.name.clone(),
        init_error,
        steps,
        session,
    }
}

fn check(
    session: &Session,
    selected: Option<&str>,
    reported: Option<&str>,
    status: Option<SessionStatus>,
    stage_enabled: Option<bool>,
) -> Vec<String> {
    let mut failures = Vec::new();

    if let Some(expected) = selected {
        if session.selected_device_id.as_deref() != Some(expected) {
            failures.push(format!(
                "expected selected device {expected}, found {:?}",
                session.selected_device_id
            ));
        }
    }
    if let Some(expected) = reported {
        if session.reported_device_id.as_deref() != Some(expected) {
            failures.push(format!(
                "expected reported device {expected}, found {:?}",
                session.reported_device_id
            ));
        }
    }
    if let Some(expected) = status {
        if session.status != expected {
            failures.push(format!(
                "expected status {expected:?}, found {:?}",
                session.status
            ));
        }
    }
    if let Some(expected) = stage_enabled {
        if session.stage_enabled != expected {
            failures.push(format!(
                "expected stage enabled {expected}, found {}",
                session.stage_enabled
            ));
        }
    }

    failures
}
