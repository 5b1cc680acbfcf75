//! Configuration models that aggregate all settings.

use ms_protocol::config_models::GlobalConfig;
use ms_protocol::scenario_models::Scenario;

/// Unified application configuration loaded from `.mic-session/`.
///
/// # Example
///
/// ```rust,no_run
/// use ms_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} scenarios", config.scenarios.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Global settings from `config.toml`.
    pub global: GlobalConfig,

    /// Scenarios loaded from `scenarios/*.yaml`, sorted by name.
    pub scenarios: Vec<Scenario>,
}

impl AppConfig {
    /// Look a scenario up by name.
    pub fn scenario(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}
