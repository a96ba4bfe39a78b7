//! # Registry Persistence
//!
//! This module locates, loads and saves the `mgconfig` registry document.
//!
//! ## Location
//!
//! The file is found by checking, in order:
//!
//! 1.  `MGCONFIG`, naming the file directly.
//! 2.  `XDG_CONFIG_HOME/mgconfig`.
//! 3.  `~/.config/mgconfig`. For this fallback `~/.config` must already exist
//!     as a directory.
//!
//! The environment is captured once into a [`ConfigEnv`] so that resolution can
//! be exercised in tests without touching the process environment.
//!
//! ## Path portability
//!
//! [`load`] expands `$HOME` in every repository path and [`save`] collapses the
//! home directory back to `$HOME` on a copy of the registry, so the in-memory
//! registry always holds absolute paths and the file stays portable.
//!
//! ## Migration
//!
//! [`load_or_migrate`] falls back to `~/.mrconfig` when no `mgconfig` exists,
//! converts it and saves the result, so users of myrepos get a registry on the
//! first run.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::defaults::{self, CONFIG_DIR_ENV, CONFIG_FILENAME, CONFIG_FILE_ENV};
use crate::error::{Error, Result};
use crate::legacy;
use crate::registry::Registry;

/// Environment inputs used to locate the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigEnv {
    /// Direct path to the registry file (`MGCONFIG`).
    pub config_file: Option<PathBuf>,
    /// Configuration directory (`XDG_CONFIG_HOME`).
    pub config_dir: Option<PathBuf>,
    /// The invoking user's home directory.
    pub home: Option<PathBuf>,
}

impl ConfigEnv {
    /// Captures the current process environment. Empty variables count as
    /// unset.
    pub fn from_process() -> Self {
        Self {
            config_file: non_empty_var(CONFIG_FILE_ENV),
            config_dir: non_empty_var(CONFIG_DIR_ENV),
            home: defaults::home_dir(),
        }
    }

    /// Resolves the path of the registry file.
    pub fn config_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.config_file {
            return Ok(file.clone());
        }
        if let Some(dir) = &self.config_dir {
            return Ok(dir.join(CONFIG_FILENAME));
        }
        let home = self.require_home()?;
        let dir = home.join(".config");
        if !dir.is_dir() {
            return Err(Error::Config {
                message: format!("configuration directory not found: {}", dir.display()),
            });
        }
        Ok(dir.join(CONFIG_FILENAME))
    }

    fn require_home(&self) -> Result<&Path> {
        self.home.as_deref().ok_or_else(|| Error::Config {
            message: "could not determine the home directory".to_string(),
        })
    }
}

fn non_empty_var(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Reads a registry document from `path` without any path expansion.
pub fn from_file(path: &Path) -> Result<Registry> {
    let content = fs::read(path)?;
    Registry::from_json(&content).map_err(|e| Error::ConfigParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loads the registry and expands `$HOME` in its paths.
pub fn load(env: &ConfigEnv) -> Result<Registry> {
    let path = env.config_path()?;
    let mut registry = from_file(&path)?;
    if let Some(home) = &env.home {
        registry.expand_paths_with(home);
    }
    Ok(registry)
}

/// Writes the registry with home-rooted paths collapsed to `$HOME`.
///
/// `registry` itself is left untouched. Returns the path written.
pub fn save(registry: &Registry, env: &ConfigEnv) -> Result<PathBuf> {
    let path = env.config_path()?;
    let mut portable = registry.clone();
    if let Some(home) = &env.home {
        portable.collapse_paths_with(home);
    }
    fs::write(&path, portable.to_json_pretty()?)?;
    Ok(path)
}

/// Loads the registry, migrating `~/.mrconfig` if no registry file exists yet.
///
/// When neither file exists an empty registry is returned and nothing is
/// written. Any other failure, including a malformed legacy file, is
/// returned.
pub fn load_or_migrate(env: &ConfigEnv) -> Result<Registry> {
    match load(env) {
        Ok(registry) => Ok(registry),
        Err(e) if e.is_missing_file() => migrate_legacy(env),
        Err(e) => Err(e),
    }
}

fn migrate_legacy(env: &ConfigEnv) -> Result<Registry> {
    let home = env.require_home()?;
    let document = match legacy::load_from(home) {
        Ok(document) => document,
        Err(e) if e.is_missing_file() => {
            info!("no mgconfig or mrconfig found, starting with an empty registry");
            return Ok(Registry::new());
        }
        Err(e) => return Err(e),
    };
    let registry = document.into_registry()?;
    let path = save(&registry, env)?;
    info!("migrated mrconfig to mgconfig at {}", path.display());
    Ok(registry)
}
