//! In-memory pipeline that reproduces the stage-toggle revert defect.
//!
//! The simulated pipeline enumerates the configured devices, captures from
//! `default_device` at start, and answers every request with a device report.
//! With `revert_on_stage_toggle` set, enabling or disabling the processing
//! stage rebuilds the capture on the default device, which is exactly the
//! behaviour the tracker has to mask.

use async_trait::async_trait;
use ms_protocol::config_models::SimulationConfig;
use ms_protocol::device_models::Device;
use ms_protocol::effect_models::Effect;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::debug;

use super::base::{DeviceEnumerator, PipelineController};
use super::error::PipelineError;

struct SimulatedState {
    active: String,
    stage_enabled: bool,
    applied: Vec<Effect>,
}

/// A scriptable stand-in for the real audio pipeline.
pub struct SimulatedPipeline {
    config: SimulationConfig,
    state: Mutex<SimulatedState>,
    reports_tx: mpsc::Sender<String>,
}

impl SimulatedPipeline {
    /// Create the pipeline and the receiving end of its report channel.
    pub fn new(config: SimulationConfig) -> (Self, mpsc::Receiver<String>) {
        let (reports_tx, reports_rx) = mpsc::channel(100);
        let state = SimulatedState {
            active: config.default_device.clone(),
            stage_enabled: false,
            applied: Vec::new(),
        };

        let pipeline = Self {
            config,
            state: Mutex::new(state),
            reports_tx,
        };
        (pipeline, reports_rx)
    }

    /// Whether the processing stage is currently active.
    pub async fn stage_enabled(&self) -> bool {
        self.state.lock().await.stage_enabled
    }

    /// Every effect applied so far, in order.
    pub async fn applied(&self) -> Vec<Effect> {
        self.state.lock().await.applied.clone()
    }

    /// Switch the capture device behind the tracker's back, the way an OS
    /// level change (unplugging a headset) would.
    pub async fn force_active(&self, device_id: &str) -> Result<(), PipelineError> {
        self.ensure_listed(device_id)?;
        self.state.lock().await.active = device_id.to_string();
        self.report(device_id.to_string()).await
    }

    fn ensure_listed(&self, device_id: &str) -> Result<(), PipelineError> {
        if self.config.devices.iter().any(|d| d.id == device_id) {
            Ok(())
        } else {
            Err(PipelineError::DeviceNotFound(device_id.to_string()))
        }
    }

    async fn report(&self, device_id: String) -> Result<(), PipelineError> {
        if self.config.report_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.report_delay_ms)).await;
        }
        debug!(device = %device_id, "simulated pipeline report");
        self.reports_tx
            .send(device_id)
            .await
            .map_err(|_| PipelineError::ReportChannelClosed)
    }
}

#[async_trait]
impl DeviceEnumerator for SimulatedPipeline {
    async fn list_input_devices(&self) -> Result<Vec<Device>, PipelineError> {
        Ok(self.config.devices.clone())
    }
}

#[async_trait]
impl PipelineController for SimulatedPipeline {
    async fn active_device(&self) -> Result<String, PipelineError> {
        Ok(self.state.lock().await.active.clone())
    }

    async fn apply(&self, effect: &Effect) -> Result<(), PipelineError> {
        let reported = {
            let mut state = self.state.lock().await;
            match effect {
                Effect::SwitchDevice { device_id } => {
                    self.ensure_listed(device_id)?;
                    state.active = device_id.clone();
                }
                Effect::SetStage { enabled } => {
                    state.stage_enabled = *enabled;
                    if self.config.revert_on_stage_toggle {
                        state.active = self.config.default_device.clone();
                    }
                }
            }
            state.applied.push(effect.clone());
            state.active.clone()
        };

        self.report(reported).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(revert: bool) -> SimulationConfig {
        SimulationConfig {
            revert_on_stage_toggle: revert,
            report_delay_ms: 0,
            ..SimulationConfig::default()
        }
    }

    #[tokio::test]
    async fn test_switch_reports_new_device() {
        let (pipeline, mut reports) = SimulatedPipeline::new(config(true));
        assert_eq!(pipeline.active_device().await.unwrap(), "default");

        pipeline
            .apply(&Effect::SwitchDevice {
                device_id: "usb-mic".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(reports.recv().await.as_deref(), Some("usb-mic"));
        assert_eq!(pipeline.active_device().await.unwrap(), "usb-mic");
    }

    #[tokio::test]
    async fn test_stage_toggle_reverts_to_default() {
        let (pipeline, mut reports) = SimulatedPipeline::new(config(true));
        pipeline
            .apply(&Effect::SwitchDevice {
                device_id: "usb-mic".to_string(),
            })
            .await
            .unwrap();
        let _ = reports.recv().await;

        pipeline.apply(&Effect::SetStage { enabled: false }).await.unwrap();

        assert_eq!(reports.recv().await.as_deref(), Some("default"));
        assert_eq!(pipeline.active_device().await.unwrap(), "default");
        assert!(!pipeline.stage_enabled().await);
    }

    #[tokio::test]
    async fn test_stage_toggle_without_defect_keeps_device() {
        let (pipeline, mut reports) = SimulatedPipeline::new(config(false));
        pipeline
            .apply(&Effect::SwitchDevice {
                device_id: "headset".to_string(),
            })
            .await
            .unwrap();
        let _ = reports.recv().await;

        pipeline.apply(&Effect::SetStage { enabled: true }).await.unwrap();

        assert_eq!(reports.recv().await.as_deref(), Some("headset"));
        assert!(pipeline.stage_enabled().await);
        assert_eq!(pipeline.applied().await.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_device_rejected() {
        let (pipeline, _reports) = SimulatedPipeline::new(config(true));
        let result = pipeline
            .apply(&Effect::SwitchDevice {
                device_id: "ghost".to_string(),
            })
            .await;

        assert_eq!(result, Err(PipelineError::DeviceNotFound("ghost".to_string())));
        assert!(pipeline.applied().await.is_empty());
    }

    #[tokio::test]
    async fn test_closed_report_channel() {
        let (pipeline, reports) = SimulatedPipeline::new(config(true));
        drop(reports);

        let result = pipeline.force_active("usb-mic").await;
        assert_eq!(result, Err(PipelineError::ReportChannelClosed));
    }
}
