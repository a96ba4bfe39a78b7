//! # Output Configuration
//!
//! This module controls how `mg` presents results on the terminal: whether
//! status markers are emoji or plain text, and how a [`SyncReport`] is turned
//! into the summary printed after `clone` and `pull`.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mg::output::{OutputConfig, emoji};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! println!("{} Registered {}", emoji(&config, "✅", "[OK]"), path);
//! ```

use std::env;

use crate::sync::{SyncOperation, SyncReport};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `color_flag` is the value of `--color`: "always", "never", or "auto".
    /// In auto mode, colors are disabled if `NO_COLOR` is set, `CLICOLOR=0`,
    /// `TERM=dumb`, or stdout is not a TTY (unless `CLICOLOR_FORCE=1`).
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors, even if empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when colors are enabled and `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// One line per failed repository, in completion order.
pub fn failure_lines(config: &OutputConfig, report: &SyncReport) -> Vec<String> {
    report
        .failures
        .iter()
        .map(|failure| {
            format!(
                "{} {}: {}",
                emoji(config, "❌", "[ERR]"),
                failure.path,
                failure.detail
            )
        })
        .collect()
}

/// The three summary lines printed after a sync run.
///
/// "successfully" counts every repository that did not fail, including the
/// ones that needed no work.
pub fn summary_lines(operation: SyncOperation, report: &SyncReport) -> [String; 3] {
    let (done, already) = match operation {
        SyncOperation::Clone => ("cloned", "already cloned"),
        SyncOperation::Pull => ("pulled", "already up to date"),
    };
    [
        format!("successfully {} {}/{} repos", done, report.ok(), report.total),
        format!("{} repos {}", report.already_satisfied, already),
        format!(
            "failed to {} {}/{} repos",
            operation.verb(),
            report.failed,
            report.total
        ),
    ]
}
