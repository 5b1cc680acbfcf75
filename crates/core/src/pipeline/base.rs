//! Collaborator traits consumed by the session driver.

use async_trait::async_trait;
use ms_protocol::device_models::Device;
use ms_protocol::effect_models::Effect;

use super::error::PipelineError;

/// Lists the audio devices available on the platform.
#[async_trait]
pub trait DeviceEnumerator: Send + Sync {
    /// List devices. Output devices may be included; the tracker drops them.
    async fn list_input_devices(&self) -> Result<Vec<Device>, PipelineError>;
}

/// Executes tracker effects against the audio pipeline.
///
/// Requests are fire-and-forget: `apply` returning `Ok` only means the
/// request was accepted. The outcome arrives later as a device report on the
/// channel the controller was created with.
#[async_trait]
pub trait PipelineController: Send + Sync {
    /// Device the pipeline currently captures from, as a device id.
    async fn active_device(&self) -> Result<String, PipelineError>;

    /// Execute one effect.
    async fn apply(&self, effect: &Effect) -> Result<(), PipelineError>;
}
