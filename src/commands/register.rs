//! # Register Command Implementation
//!
//! Adds the repository containing a path (the current directory by default)
//! to the registry. The path is resolved to the root of its working tree and
//! the URL of the repository's first remote is recorded as the clone source.
//!
//! Registering a repository that is already tracked is not an error; the
//! command says so and leaves the registry file untouched.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use mg::config::ConfigEnv;
use mg::error::Error;
use mg::output::{emoji, OutputConfig};
use mg::repository::{self, SystemGit};
use mg::suggestions;

/// Add a repository to the registry
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// A path inside the repository. Defaults to the current directory.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the `register` command.
pub fn execute(args: RegisterArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let env = ConfigEnv::from_process();
    let mut registry = super::load_registry(&env)?;

    let target = super::absolute_target(args.path.as_deref())?;
    let found = match repository::discover(&SystemGit, &target) {
        Ok(found) => found,
        Err(Error::NotARepository { .. }) => return Err(suggestions::not_a_repository(&target)),
        Err(e) => return Err(e.into()),
    };
    let path = found.root.to_string_lossy().into_owned();

    match registry.add_repo(&path, &found.remote) {
        Ok(()) => {
            super::save_registry(&registry, &env)?;
            println!(
                "{} Registered {} ({})",
                emoji(&out, "✅", "[OK]"),
                path,
                found.remote
            );
        }
        Err(Error::Duplicate { .. }) => {
            let remote = registry.get(&path).map_or("", |repo| repo.remote.as_str());
            println!(
                "{} {} is already registered ({})",
                emoji(&out, "ℹ️", "[INFO]"),
                path,
                remote
            );
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
