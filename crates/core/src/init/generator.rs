//! Directory structure and file generation for `.mic-session/`.

use super::error::{InitError, InitResult};
use super::templates::{get_template, list_templates};
use crate::config::loader::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Scenario kept by `--minimal`.
const MINIMAL_SCENARIO: &str = "scenarios/stage-toggle-revert.yaml";

/// Options for initializing a `.mic-session/` directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Directory that receives `.mic-session/`.
    pub target_dir: PathBuf,

    /// Overwrite an existing `.mic-session/` directory.
    pub force: bool,

    /// Only generate the stage toggle scenario.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate a `.mic-session/` directory with templates.
///
/// ```text
/// .mic-session/
/// ├── config.toml
/// └── scenarios/
///     ├── stage-toggle-revert.yaml
///     └── device-switch.yaml (unless minimal)
/// ```
///
/// # Returns
///
/// The paths of the written files, relative to `.mic-session/`.
///
/// # Errors
///
/// - `DirectoryExists` when `.mic-session/` exists and `force` is unset
/// - `TemplateNotFound` when an embedded template is missing
/// - `DirectoryCreate` / `FileWrite` on file system failures
pub async fn generate_session_structure(options: InitOptions) -> InitResult<Vec<String>> {
    let ms_dir = options.target_dir.join(CONFIG_DIR);

    if ms_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(ms_dir));
    }

    let scenarios_dir = ms_dir.join("scenarios");
    fs::create_dir_all(&scenarios_dir).map_err(|source| InitError::DirectoryCreate {
        path: scenarios_dir.clone(),
        source,
    })?;

    let mut written = vec!["config.toml".to_string()];
    if options.minimal {
        written.push(MINIMAL_SCENARIO.to_string());
    } else {
        written.extend(list_templates("scenarios/"));
    }

    for template_path in &written {
        write_template_file(&ms_dir, template_path)?;
    }

    Ok(written)
}

fn write_template_file(ms_dir: &Path, template_path: &str) -> InitResult<()> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = ms_dir.join(template_path);

    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;
    debug!(path = %target_path.display(), "template written");

    Ok(())
}
