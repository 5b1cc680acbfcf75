//! External collaborators of the session tracker.
//!
//! The tracker never touches these directly. The session driver owns them
//! and feeds their output back into the tracker:
//! - [`DeviceEnumerator`]: lists input devices
//! - [`PipelineController`]: executes effects and reports the active device

pub mod base;
pub mod error;
pub mod simulated;

pub use base::{DeviceEnumerator, PipelineController};
pub use error::PipelineError;
pub use simulated::SimulatedPipeline;
