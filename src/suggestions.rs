//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mg::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Repository not registered: {}", path);
//!
//! // Use:
//! return Err(suggestions::not_registered(path));
//! ```

use std::path::Path;

/// Generate an error for when the registry file cannot be located.
///
/// Includes hints about the locations `mg` searches.
pub fn config_not_found(reason: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Could not locate the mgconfig file: {reason}\n\n\
         hint: Set MGCONFIG to the path of your mgconfig file\n\
         hint: Set XDG_CONFIG_HOME to a directory that should hold mgconfig\n\
         hint: Create ~/.config so mg can use ~/.config/mgconfig"
    )
}

/// Generate an error for a job count below 1.
pub fn invalid_jobs(jobs: i64) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid job count: {jobs}\n\n\
         hint: Use -j/--jobs with a value of 1 or more\n\
         hint: Unset MG_JOBS to use the default of 1"
    )
}

/// Generate an error for unregistering a path the registry does not track.
pub fn not_registered(path: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Repository not registered: {path}\n\n\
         hint: Run 'mg list' to see the registered paths\n\
         hint: Paths are compared exactly, after resolving to the repository root"
    )
}

/// Generate an error for registering a path outside any git working tree.
pub fn not_a_repository(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Not a git repository: {path}\n\n\
         hint: Run 'mg register' from inside a cloned repository\n\
         hint: Use 'git init' and 'git remote add' to turn a directory into one",
        path = path.display()
    )
}

/// Generate an error for a malformed `.mrconfig` file.
pub fn legacy_syntax(line: usize, content: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Could not migrate ~/.mrconfig: unexpected argument on line {line}: {content}\n\n\
         hint: Line numbers start at 0\n\
         hint: Repository sections may only contain 'checkout = ...'\n\
         hint: Create an mgconfig file to skip the migration"
    )
}
