//! # List Command Implementation
//!
//! Prints every registered repository path, one per line, in registry order.
//! The output is meant for scripts (`for repo in $(mg list)`), so it carries
//! no decoration.

use anyhow::Result;
use clap::Args;

use mg::config::ConfigEnv;

/// Print the registered repository paths
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Also print each repository's remote, separated by a tab.
    #[arg(short, long)]
    pub remotes: bool,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs) -> Result<()> {
    let env = ConfigEnv::from_process();
    let registry = super::load_registry(&env)?;

    for repo in registry.repos() {
        if args.remotes {
            println!("{}\t{}", repo.path, repo.remote);
        } else {
            println!("{}", repo.path);
        }
    }
    Ok(())
}
