//! Mock pipelines for deterministic testing.

use async_trait::async_trait;
use ms_core::pipeline::{DeviceEnumerator, PipelineController, PipelineError};
use ms_protocol::device_models::Device;
use ms_protocol::effect_models::Effect;
use tokio::sync::Mutex;

/// Accepts every request and never reports back.
pub struct SilentPipeline {
    pub devices: Vec<Device>,
    pub active: String,
    pub applied: Mutex<Vec<Effect>>,
}

impl SilentPipeline {
    pub fn new(devices: Vec<Device>, active: &str) -> Self {
        Self {
            devices,
            active: active.to_string(),
            applied: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DeviceEnumerator for SilentPipeline {
    async fn list_input_devices(&self) -> Result<Vec<Device>, PipelineError> {
        Ok(self.devices.clone())
    }
}

#[async_trait]
impl PipelineController for SilentPipeline {
    async fn active_device(&self) -> Result<String, PipelineError> {
        Ok(self.active.clone())
    }

    async fn apply(&self, effect: &Effect) -> Result<(), PipelineError> {
        self.applied.lock().await.push(effect.clone());
        Ok(())
    }
}

/// Refuses every request.
pub struct FailingPipeline {
    pub devices: Vec<Device>,
    pub active: String,
}

impl FailingPipeline {
    pub fn new(devices: Vec<Device>, active: &str) -> Self {
        Self {
            devices,
            active: active.to_string(),
        }
    }
}

#[async_trait]
impl DeviceEnumerator for FailingPipeline {
    async fn list_input_devices(&self) -> Result<Vec<Device>, PipelineError> {
        Ok(self.devices.clone())
    }
}

#[async_trait]
impl PipelineController for FailingPipeline {
    async fn active_device(&self) -> Result<String, PipelineError> {
        Ok(self.active.clone())
    }

    async fn apply(&self, effect: &Effect) -> Result<(), PipelineError> {
        Err(PipelineError::RequestFailed(format!("cannot {effect}")))
    }
}

/// Accepts device switches without reporting back, refuses stage toggles.
pub struct StageRefusingPipeline {
    pub devices: Vec<Device>,
    pub active: String,
}

impl StageRefusingPipeline {
    pub fn new(devices: Vec<Device>, active: &str) -> Self {
        Self {
            devices,
            active: active.to_string(),
        }
    }
}

#[async_trait]
impl DeviceEnumerator for StageRefusingPipeline {
    async fn list_input_devices(&self) -> Result<Vec<Device>, PipelineError> {
        Ok(self.devices.clone())
    }
}

#[async_trait]
impl PipelineController for StageRefusingPipeline {
    async fn active_device(&self) -> Result<String, PipelineError> {
        Ok(self.active.clone())
    }

    async fn apply(&self, effect: &Effect) -> Result<(), PipelineError> {
        match effect {
            Effect::SwitchDevice { .. } => Ok(()),
            Effect::SetStage { .. } => {
                Err(PipelineError::RequestFailed("stage is locked".to_string()))
            }
        }
    }
}

pub fn two_mics() -> Vec<Device> {
    vec![Device::input("mic-A", "Built-in"), Device::input("mic-B", "USB")]
}
