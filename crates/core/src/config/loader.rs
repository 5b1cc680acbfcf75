//! Configuration file loader for the `.mic-session/` directory structure.
//!
//! - `config.toml`: global settings
//! - `scenarios/*.yaml` (or `*.yml`): scripted sessions

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use ms_protocol::config_models::GlobalConfig;
use ms_protocol::scenario_models::Scenario;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Name of the configuration directory under the project root.
pub const CONFIG_DIR: &str = ".mic-session";

/// Loads all configuration from the `.mic-session/` directory.
///
/// # Arguments
///
/// * `root` - Root directory containing the `.mic-session/` folder
///
/// # Returns
///
/// An `AppConfig` containing all loaded configuration. Missing directories or
/// files yield defaults rather than an error.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - Files exist but cannot be read
/// - Files have invalid TOML or YAML syntax
/// - Values parse but cannot drive a session (zero timeout, a default device
///   missing from the simulated device list, duplicate scenario names)
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    let ms_dir = root.join(CONFIG_DIR);

    if !ms_dir.exists() {
        return Ok(AppConfig::default());
    }

    let global = load_global_config(&ms_dir)?;
    let scenarios = load_scenarios(&ms_dir)?;

    Ok(AppConfig { global, scenarios })
}

/// Loads global configuration from `config.toml`.
fn load_global_config(ms_dir: &Path) -> ConfigResult<GlobalConfig> {
    let config_path = ms_dir.join("config.toml");

    if !config_path.exists() {
        return Ok(GlobalConfig::default());
    }

    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ConfigError::FileRead {
            path: config_path.clone(),
            source,
        })?;

    let config: GlobalConfig =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: config_path.clone(),
            source,
        })?;

    validate_global(&config).map_err(|reason| ConfigError::InvalidConfig {
        path: config_path,
        reason,
    })?;

    Ok(config)
}

fn validate_global(config: &GlobalConfig) -> Result<(), String> {
    if config.confirm_timeout_ms == 0 {
        return Err("confirm_timeout_ms must be greater than zero".to_string());
    }

    let simulation = &config.simulation;
    if !simulation.devices.is_empty()
        && !simulation
            .devices
            .iter()
            .any(|d| d.id == simulation.default_device)
    {
        return Err(format!(
            "simulation.default_device '{}' is not in simulation.devices",
            simulation.default_device
        ));
    }

    Ok(())
}

/// Loads all scenario definitions from `scenarios/*.yaml`.
fn load_scenarios(ms_dir: &Path) -> ConfigResult<Vec<Scenario>> {
    let scenarios_dir = ms_dir.join("scenarios");

    if !scenarios_dir.exists() {
        return Ok(Vec::new());
    }

    let mut scenarios: Vec<Scenario> = Vec::new();
    let mut names = HashSet::new();

    for entry in WalkDir::new(&scenarios_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ConfigError::DirectoryWalk {
            path: scenarios_dir.clone(),
            source,
        })?;

        let path = entry.path();

        let ext = path.extension().and_then(|s| s.to_str());
        if ext != Some("yaml") && ext != Some("yml") {
            continue;
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let scenario: Scenario =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })?;

        if scenario.name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason: "scenario name must not be empty".to_string(),
            });
        }
        if !names.insert(scenario.name.clone()) {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                reason: format!("duplicate scenario name '{}'", scenario.name),
            });
        }

        scenarios.push(scenario);
    }

    scenarios.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(scenarios)
}
