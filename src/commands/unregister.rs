//! # Unregister Command Implementation
//!
//! Removes a repository from the registry. The path is resolved to the root
//! of its working tree when it still is one; otherwise (for example after the
//! directory was deleted) the absolute form of the path is used as-is.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use log::debug;

use mg::config::ConfigEnv;
use mg::error::Error;
use mg::output::{emoji, OutputConfig};
use mg::repository::{GitProvider, SystemGit};
use mg::suggestions;

/// Remove a repository from the registry
#[derive(Args, Debug)]
pub struct UnregisterArgs {
    /// The repository path. Defaults to the current directory.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the `unregister` command.
pub fn execute(args: UnregisterArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let env = ConfigEnv::from_process();
    let mut registry = super::load_registry(&env)?;

    let target = super::absolute_target(args.path.as_deref())?;
    let path = resolve(&SystemGit, &target).to_string_lossy().into_owned();

    match registry.del_repo(&path) {
        Ok(()) => {
            super::save_registry(&registry, &env)?;
            println!("{} Unregistered {}", emoji(&out, "🗑️", "[OK]"), path);
            Ok(())
        }
        Err(Error::NotFound { path }) => Err(suggestions::not_registered(&path)),
        Err(e) => Err(e.into()),
    }
}

/// The working tree root containing `target`, or `target` itself.
fn resolve(git: &dyn GitProvider, target: &Path) -> PathBuf {
    match git.open(target).and_then(|()| git.work_tree(target)) {
        Ok(root) => root,
        Err(e) => {
            debug!("using {} as given: {}", target.display(), e);
            target.to_path_buf()
        }
    }
}
