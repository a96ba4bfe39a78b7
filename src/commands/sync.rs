//! # Clone and Pull Command Implementation
//!
//! `mg clone` and `mg pull` share this module. Both load the registry, run the
//! sync engine over every repository with the requested number of workers,
//! and print one line per failure followed by a three-line summary.
//!
//! Failures of individual repositories do not change the exit status; only
//! problems that stop the run as a whole (an unusable registry, an invalid job
//! count) do.

use anyhow::Result;
use clap::Args;

use mg::config::ConfigEnv;
use mg::defaults::DEFAULT_JOBS;
use mg::error::Error;
use mg::output::{failure_lines, summary_lines, OutputConfig};
use mg::repository::SystemGit;
use mg::suggestions;
use mg::sync::{self, SyncOperation};

/// Options shared by `clone` and `pull`
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Number of repositories to process in parallel.
    #[arg(
        short,
        long,
        value_name = "N",
        env = "MG_JOBS",
        default_value_t = DEFAULT_JOBS,
        allow_negative_numbers = true
    )]
    pub jobs: i64,
}

/// Execute `clone` or `pull`.
pub fn execute(args: SyncArgs, operation: SyncOperation, color_flag: &str) -> Result<()> {
    // Checked before loading, which may migrate and write the registry
    if args.jobs < 1 {
        return Err(suggestions::invalid_jobs(args.jobs));
    }
    let out = OutputConfig::from_env_and_flag(color_flag);
    let env = ConfigEnv::from_process();
    let registry = super::load_registry(&env)?;

    let report = match sync::run(registry.repos(), operation, args.jobs, &SystemGit) {
        Ok(report) => report,
        Err(Error::InvalidJobCount { jobs }) => return Err(suggestions::invalid_jobs(jobs)),
        Err(e) => return Err(e.into()),
    };

    if report.has_failures() {
        for line in failure_lines(&out, &report) {
            println!("{}", line);
        }
    }
    println!();
    for line in summary_lines(operation, &report) {
        println!("{}", line);
    }
    Ok(())
}
