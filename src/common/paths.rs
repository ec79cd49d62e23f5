//! Configuration file locations

use directories::ProjectDirs;
use std::path::PathBuf;

/// Environment variable overriding the config file location
const CONFIG_ENV: &str = "NCUT_HARNESS_CONFIG";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "ncut-harness")
}

/// Get the path to the harness config file
///
/// `NCUT_HARNESS_CONFIG` takes precedence, otherwise the platform config
/// directory is used (e.g. `~/.config/ncut-harness/config.toml` on Linux).
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}
