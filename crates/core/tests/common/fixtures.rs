//! Test fixtures for configurations, projects and drivers.

use ms_core::engine::SessionDriver;
use ms_core::pipeline::{DeviceEnumerator, PipelineController, SimulatedPipeline};
use ms_protocol::config_models::{GlobalConfig, SimulationConfig};
use ms_protocol::ipc::Event;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Capacity of the event channel in tests. Large enough that nothing has to
/// consume events while the driver runs.
pub const EVENT_CAPACITY: usize = 1024;

/// Global config driving the simulated pipeline with no report delay.
pub fn sim_config(revert_on_stage_toggle: bool, auto_reassert: bool) -> GlobalConfig {
    GlobalConfig {
        auto_reassert,
        simulation: SimulationConfig {
            revert_on_stage_toggle,
            report_delay_ms: 0,
            ..SimulationConfig::default()
        },
        ..GlobalConfig::default()
    }
}

/// A started driver with its simulated pipeline and channels.
pub struct SimulatedHarness {
    pub driver: SessionDriver,
    pub pipeline: Arc<SimulatedPipeline>,
    pub reports_rx: mpsc::Receiver<String>,
    pub events_rx: mpsc::Receiver<Event>,
}

/// Start a driver against a fresh simulated pipeline.
pub async fn start_simulated(config: GlobalConfig) -> SimulatedHarness {
    let (pipeline, reports_rx) = SimulatedPipeline::new(config.simulation.clone());
    let pipeline = Arc::new(pipeline);
    let (events_tx, events_rx) = mpsc::channel(EVENT_CAPACITY);

    let enumerator: Arc<dyn DeviceEnumerator> = pipeline.clone();
    let controller: Arc<dyn PipelineController> = pipeline.clone();
    let driver = SessionDriver::start(config, enumerator, controller, events_tx)
        .await
        .expect("simulated driver starts");

    SimulatedHarness {
        driver,
        pipeline,
        reports_rx,
        events_rx,
    }
}

/// Create a temporary project directory with `.mic-session/` configuration.
///
/// Returns a TempDir that must be kept alive for the test duration.
pub fn create_test_project(config_toml: &str, scenarios: &[(&str, &str)]) -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let ms_dir = temp_dir.path().join(".mic-session");

    std::fs::create_dir_all(ms_dir.join("scenarios"))?;
    std::fs::write(ms_dir.join("config.toml"), config_toml)?;
    for (file_name, content) in scenarios {
        std::fs::write(ms_dir.join("scenarios").join(file_name), content)?;
    }

    Ok(temp_dir)
}
