//! Platform-specific file locations.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "tabula";
const APPLICATION: &str = "tabula";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Default table options, read when `--options` is not given.
///
/// - Linux: `$XDG_CONFIG_HOME/tabula/options.json`
/// - macOS: `~/Library/Application Support/dev.tabula.tabula/options.json`
pub fn options_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("options.json"))
}

/// Log file used when `--log-file` is not given.
pub fn log_file() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().join("latest.log"))
}
