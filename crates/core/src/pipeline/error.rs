//! Error types for pipeline collaborators.

use thiserror::Error;

/// Errors reported by a device enumerator or pipeline controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// The pipeline does not know the requested device.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// The report channel was closed by the receiving side.
    #[error("Report channel closed")]
    ReportChannelClosed,

    /// The pipeline refused or failed to apply a request.
    #[error("Request failed: {0}")]
    RequestFailed(String),
}
