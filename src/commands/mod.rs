//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `mg`
//! command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and performs the
//!   command's logic.
//!
//! Commands that read or write the registry go through [`load_registry`] and
//! [`save_registry`], which turn location and migration failures into errors
//! with hints.

pub mod completions;
pub mod import;
pub mod list;
pub mod register;
pub mod sync;
pub mod unregister;

use std::path::{Path, PathBuf};

use anyhow::Result;

use mg::config::{self, ConfigEnv};
use mg::error::Error;
use mg::registry::Registry;
use mg::suggestions;

/// Loads the registry, migrating `~/.mrconfig` on first use.
pub fn load_registry(env: &ConfigEnv) -> Result<Registry> {
    config::load_or_migrate(env).map_err(explain)
}

/// Saves the registry and returns the path written.
pub fn save_registry(registry: &Registry, env: &ConfigEnv) -> Result<PathBuf> {
    config::save(registry, env).map_err(explain)
}

fn explain(error: Error) -> anyhow::Error {
    match error {
        Error::Config { message } => suggestions::config_not_found(&message),
        Error::LegacySyntax { line, content } => suggestions::legacy_syntax(line, &content),
        other => other.into(),
    }
}

/// Makes `path` (or the current directory) absolute without touching the
/// filesystem, dropping any trailing separator.
pub fn absolute_target(path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(path) => std::path::absolute(path)?,
        None => std::env::current_dir()?,
    };
    Ok(path.components().collect())
}
