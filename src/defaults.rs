//! Default values for mg configuration.
//!
//! This module provides centralized names and fallbacks used across the
//! library and the commands, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// File name of the registry document inside the configuration directory.
pub const CONFIG_FILENAME: &str = "mgconfig";

/// File name of the legacy myrepos configuration in the home directory.
pub const LEGACY_FILENAME: &str = ".mrconfig";

/// Environment variable naming the registry file directly.
pub const CONFIG_FILE_ENV: &str = "MGCONFIG";

/// Environment variable naming the configuration directory.
pub const CONFIG_DIR_ENV: &str = "XDG_CONFIG_HOME";

/// Placeholder stored in persisted paths in place of the home directory.
pub const HOME_TOKEN: &str = "$HOME";

/// Braced spelling of [`HOME_TOKEN`], accepted on load.
pub const HOME_TOKEN_BRACED: &str = "${HOME}";

/// Number of parallel jobs used by `clone` and `pull` when none is given.
pub const DEFAULT_JOBS: i64 = 1;

/// Returns the home directory of the invoking user.
///
/// Uses `$HOME` when set (so tests and sandboxes can redirect it), falling
/// back to the platform lookup in the `dirs` crate.
pub fn home_dir() -> Option<PathBuf> {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Some(PathBuf::from(home)),
        _ => dirs::home_dir(),
    }
}
