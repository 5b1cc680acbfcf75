//! Session driver.
//!
//! The SessionDriver is the caller the tracker expects: it owns one
//! [`Session`], turns presentation-layer operations into tracker intents,
//! executes the resulting effects on the pipeline controller, and feeds the
//! pipeline's device reports back in, in the order they arrive.

use crate::pipeline::{DeviceEnumerator, PipelineController};
use crate::tracker::{self, Transition, TrackerResult};
use anyhow::{Context, Result};
use chrono::Utc;
use ms_protocol::config_models::GlobalConfig;
use ms_protocol::effect_models::Effect;
use ms_protocol::ipc::{Event, Op};
use ms_protocol::session_models::{Session, SessionStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{sleep_until, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// Drives one device session against an external pipeline.
pub struct SessionDriver {
    session_id: Uuid,
    session: Session,
    config: GlobalConfig,
    enumerator: Arc<dyn DeviceEnumerator>,
    controller: Arc<dyn PipelineController>,
    events_tx: Sender<Event>,
    /// When the current set of outstanding requests was issued.
    pending_since: Option<Instant>,
}

impl SessionDriver {
    /// Enumerate devices, initialize the session, and optionally enable the
    /// processing stage.
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration or the initial active-device query
    /// fails, or if the tracker refuses to initialize (no input devices).
    pub async fn start(
        config: GlobalConfig,
        enumerator: Arc<dyn DeviceEnumerator>,
        controller: Arc<dyn PipelineController>,
        events_tx: Sender<Event>,
    ) -> Result<Self> {
        let mut driver = Self {
            session_id: Uuid::new_v4(),
            session: Session::default(),
            config,
            enumerator,
            controller,
            events_tx,
            pending_since: None,
        };

        driver.log("Initializing session...").await;

        let devices = driver
            .enumerator
            .list_input_devices()
            .await
            .context("failed to enumerate input devices")?;
        let active = driver
            .controller
            .active_device()
            .await
            .context("failed to query the active device")?;

        match tracker::initialize(devices, &active) {
            Ok(transition) => {
                driver.publish(transition.session).await;
                let _ = driver
                    .events_tx
                    .send(Event::SessionInitialized {
                        session_id: driver.session_id,
                        session: driver.session.clone(),
                    })
                    .await;
                let count = driver.session.devices.len();
                let label = driver.label(&active);
                driver.log(format!("Found {count} microphone devices")).await;
                driver.log(format!("Pipeline active on: {label}")).await;
            }
            Err(rejection) => {
                driver.reject(rejection.clone()).await;
                return Err(rejection.into());
            }
        }

        if driver.config.enable_stage_on_start {
            driver
                .handle_op(Op::SetStageEnabled { enabled: true })
                .await?;
        }

        driver.log("Initialization complete").await;
        Ok(driver)
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current session value.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Apply one presentation-layer operation.
    ///
    /// Returns `false` once the driver should stop (`Op::Shutdown`).
    pub async fn handle_op(&mut self, op: Op) -> Result<bool> {
        match op {
            Op::SelectDevice { device_id } => {
                let label = self.label(&device_id);
                self.log(format!("Changing device to: {label}")).await;
                let result = tracker::select_device(&self.session, &device_id);
                self.apply_result(result).await;
            }
            Op::SetStageEnabled { enabled } => {
                let action = if enabled { "Enabling" } else { "Disabling" };
                self.log(format!("{action} processing stage...")).await;
                let result = tracker::set_stage_enabled(&self.session, enabled);
                self.apply_result(result).await;
            }
            Op::RefreshDevices => {
                let devices = self
                    .enumerator
                    .list_input_devices()
                    .await
                    .context("failed to enumerate input devices")?;
                let result = tracker::refresh_devices(&self.session, devices);
                self.apply_result(result).await;
            }
            Op::ResetToReady => {
                let result = tracker::reset_to_ready(&self.session);
                self.apply_result(result).await;
            }
            Op::GetSession => {
                let _ = self
                    .events_tx
                    .send(Event::SessionSnapshot {
                        session_id: self.session_id,
                        session: self.session.clone(),
                    })
                    .await;
            }
            Op::Shutdown => return Ok(false),
        }

        Ok(true)
    }

    /// Reconcile one device report from the pipeline.
    pub async fn handle_report(&mut self, device_id: String) {
        let label = self.label(&device_id);
        self.log(format!("Pipeline reported device: {label}")).await;
        let transition = tracker::reconcile_device_report(&self.session, &device_id);
        self.commit(transition, true).await;
    }

    /// Reconcile every report already waiting on the channel, including the
    /// ones produced by corrective effects executed along the way.
    ///
    /// Returns the number of reports handled.
    pub async fn drain_reports(&mut self, reports_rx: &mut Receiver<String>) -> usize {
        let mut handled = 0;
        while let Ok(device_id) = reports_rx.try_recv() {
            self.handle_report(device_id).await;
            handled += 1;
        }
        handled
    }

    /// Run until `Op::Shutdown` or until the operation channel closes.
    ///
    /// Reports take priority over operations so that every effect's outcome
    /// is reconciled before the next intent is validated. Requests that stay
    /// unconfirmed past `confirm_timeout_ms` are abandoned.
    ///
    /// # Returns
    ///
    /// The final session value.
    pub async fn run(
        mut self,
        mut ops_rx: Receiver<Op>,
        mut reports_rx: Receiver<String>,
    ) -> Result<Session> {
        let timeout = Duration::from_millis(self.config.confirm_timeout_ms);

        loop {
            let deadline = self.pending_since.map(|since| since + timeout);

            tokio::select! {
                biased;

                Some(device_id) = reports_rx.recv() => {
                    self.handle_report(device_id).await;
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.expire_pending().await;
                }
                op = ops_rx.recv() => match op {
                    Some(op) => {
                        if !self.handle_op(op).await? {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        Ok(self.teardown().await)
    }

    /// Close the session and hand the final value back.
    pub async fn teardown(self) -> Session {
        info!(session_id = %self.session_id, "session closed");
        let _ = self
            .events_tx
            .send(Event::SessionClosed {
                session_id: self.session_id,
            })
            .await;
        self.session
    }

    async fn apply_result(&mut self, result: TrackerResult) {
        match result {
            Ok(transition) => self.commit(transition, false).await,
            Err(rejection) => self.reject(rejection).await,
        }
    }

    async fn reject(&mut self, rejection: tracker::Rejection) {
        let _ = self
            .events_tx
            .send(Event::OperationRejected {
                session_id: self.session_id,
                error: rejection.kind,
                message: rejection.message.clone(),
            })
            .await;
        self.log(format!("❌ {rejection}")).await;
        self.publish(rejection.into_session()).await;
    }

    /// Store the next session, then execute its effects.
    ///
    /// Effects coming out of report reconciliation are corrective; those are
    /// only executed when `auto_reassert` is set.
    async fn commit(&mut self, transition: Transition, corrective: bool) {
        let Transition { session, effects } = transition;
        self.publish(session).await;

        if corrective && !self.config.auto_reassert {
            for effect in effects {
                self.log(format!("Corrective request left to the caller: {effect}"))
                    .await;
            }
            return;
        }

        for effect in effects {
            self.execute(effect).await;
        }
    }

    async fn execute(&mut self, effect: Effect) {
        let before = self.active_label().await;
        let _ = self
            .events_tx
            .send(Event::EffectIssued {
                session_id: self.session_id,
                effect: effect.clone(),
            })
            .await;
        self.log(format!("Current device before {effect}: {before}"))
            .await;

        match self.controller.apply(&effect).await {
            Ok(()) => {
                let after = self.active_label().await;
                self.log(format!("Current device after {effect}: {after}"))
                    .await;
            }
            Err(err) => {
                warn!(session_id = %self.session_id, %effect, error = %err, "pipeline request failed");
                self.log(format!("❌ Failed to {effect}: {err}")).await;
                // No report will follow a request the pipeline refused.
                self.abandon_refused(&effect).await;
            }
        }
    }

    async fn expire_pending(&mut self) {
        let timeout = self.config.confirm_timeout_ms;
        self.log(format!(
            "No pipeline report within {timeout}ms, abandoning outstanding requests"
        ))
        .await;
        self.abandon_pending().await;
    }

    async fn abandon_refused(&mut self, effect: &Effect) {
        match tracker::abandon_request(&self.session, effect) {
            Ok(transition) => self.publish(transition.session).await,
            Err(rejection) => self.publish(rejection.into_session()).await,
        }
    }

    async fn abandon_pending(&mut self) {
        match tracker::reset_to_ready(&self.session) {
            Ok(transition) => self.publish(transition.session).await,
            Err(rejection) => self.publish(rejection.into_session()).await,
        }
    }

    /// Replace the session and tell the presentation layer what changed.
    async fn publish(&mut self, next: Session) {
        let previous = std::mem::replace(&mut self.session, next);

        let appended = self
            .session
            .history
            .get(previous.history.len()..)
            .unwrap_or_default()
            .to_vec();
        for record in appended {
            let _ = self
                .events_tx
                .send(Event::HistoryAppended {
                    session_id: self.session_id,
                    record,
                })
                .await;
        }

        let changed = previous.status != self.session.status
            || previous.selected_device_id != self.session.selected_device_id
            || previous.reported_device_id != self.session.reported_device_id
            || previous.stage_enabled != self.session.stage_enabled;
        if changed {
            let _ = self
                .events_tx
                .send(Event::SessionUpdated {
                    session_id: self.session_id,
                    status: self.session.status,
                    selected_device_id: self.session.selected_device_id.clone(),
                    reported_device_id: self.session.reported_device_id.clone(),
                    stage_enabled: self.session.stage_enabled,
                })
                .await;
        }

        self.pending_since = match self.session.status {
            SessionStatus::Transitioning => {
                if previous.status != SessionStatus::Transitioning
                    || previous.pending != self.session.pending
                {
                    Some(Instant::now())
                } else {
                    self.pending_since
                }
            }
            _ => None,
        };
    }

    async fn active_label(&self) -> String {
        match self.controller.active_device().await {
            Ok(id) => self.label(&id),
            Err(err) => format!("unknown ({err})"),
        }
    }

    fn label(&self, device_id: &str) -> String {
        self.session.label_for(device_id).to_string()
    }

    async fn log(&self, content: impl Into<String>) {
        let content = content.into();
        info!(session_id = %self.session_id, "{content}");
        let _ = self
            .events_tx
            .send(Event::LogLine {
                session_id: self.session_id,
                at: Utc::now(),
                content,
            })
            .await;
    }
}
