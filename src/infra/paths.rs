// src/infra/paths.rs — Config path resolution
//
// All paths respect the MANUALMATE_HOME environment variable for isolation.
// When unset, config lives under ~/.manualmate/.

use std::path::PathBuf;

fn manualmate_home() -> Option<PathBuf> {
    std::env::var_os("MANUALMATE_HOME").map(PathBuf::from)
}

fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}

/// Configuration directory: $MANUALMATE_HOME/ or ~/.manualmate/
pub fn config_dir() -> PathBuf {
    if let Some(home) = manualmate_home() {
        return home;
    }
    dirs_home().join(".manualmate")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
