//! # Parallel Sync Engine
//!
//! This module applies one git operation to every repository in the registry
//! using a fixed number of workers, and folds the per-repository outcomes into
//! a [`SyncReport`].
//!
//! ## Operations
//!
//! - **Clone** (`clone_or_skip`): a repository that already opens is left
//!   alone. One that is missing has its parent directory created and is cloned
//!   from its remote. Any other failure to open is reported without cloning.
//! - **Pull** (`pull`): open, find the working tree, fast-forward. A pull that
//!   moves nothing counts as already satisfied.
//!
//! ## Dispatch
//!
//! `run` fills a channel with every repository in registry order and closes it
//! before any worker starts, so workers stop exactly when the queue is drained.
//! `jobs` workers run on a dedicated rayon pool and share the receiving end;
//! each records its outcome into one mutex-guarded report. The rayon scope is
//! the join point: `run` returns only after every worker has finished.
//!
//! There is no cancellation or timeout. A hung repository stalls its worker
//! and the overall run, but not the other workers.
//!
//! Every dispatched repository produces exactly one result. A panic inside the
//! git provider is caught and recorded as a failure for that repository.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Mutex, PoisonError};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::registry::Repository;
use crate::repository::{GitProvider, PullStatus};

/// The operation to apply to each repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOperation {
    /// Clone repositories that are missing locally.
    Clone,
    /// Fast-forward repositories that are present.
    Pull,
}

impl SyncOperation {
    /// Lower-case verb used in log lines and summaries.
    pub fn verb(self) -> &'static str {
        match self {
            SyncOperation::Clone => "clone",
            SyncOperation::Pull => "pull",
        }
    }
}

/// Outcome for a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    /// Nothing to do: already cloned, or already up to date.
    AlreadySatisfied,
    /// The clone or pull changed something.
    Succeeded,
    /// The operation failed; the string is the error text.
    Failed(String),
}

/// A failed repository and the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub path: String,
    pub detail: String,
}

/// Aggregate outcome of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of repositories dispatched.
    pub total: usize,
    pub succeeded: usize,
    pub already_satisfied: usize,
    pub failed: usize,
    /// Failures in completion order.
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    fn record(&mut self, path: &str, result: SyncResult) {
        match result {
            SyncResult::AlreadySatisfied => self.already_satisfied += 1,
            SyncResult::Succeeded => self.succeeded += 1,
            SyncResult::Failed(detail) => {
                self.failed += 1;
                self.failures.push(SyncFailure {
                    path: path.to_string(),
                    detail,
                });
            }
        }
    }

    /// Number of repositories that did not fail.
    pub fn ok(&self) -> usize {
        self.succeeded + self.already_satisfied
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Clones `repo` unless it already exists.
pub fn clone_or_skip(git: &dyn GitProvider, repo: &Repository) -> SyncResult {
    let path = Path::new(&repo.path);
    match git.open(path) {
        Ok(()) => {
            info!("already cloned: {}", repo.path);
            SyncResult::AlreadySatisfied
        }
        Err(Error::NotARepository { .. }) => {
            info!("attempting clone: {}", repo.path);
            match create_parent(path).and_then(|()| git.clone_repo(&repo.remote, path)) {
                Ok(()) => {
                    info!("successfully cloned {}", repo.path);
                    SyncResult::Succeeded
                }
                Err(e) => failed(SyncOperation::Clone, repo, e),
            }
        }
        Err(e) => failed(SyncOperation::Clone, repo, e),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Fast-forwards `repo`.
pub fn pull(git: &dyn GitProvider, repo: &Repository) -> SyncResult {
    info!("attempting pull: {}", repo.path);
    let path = Path::new(&repo.path);
    let outcome = git
        .open(path)
        .and_then(|()| git.work_tree(path))
        .and_then(|root| git.pull(&root));
    match outcome {
        Ok(PullStatus::AlreadyUpToDate) => {
            info!("repo {}: already up to date", repo.path);
            SyncResult::AlreadySatisfied
        }
        Ok(PullStatus::Updated) => {
            info!("successfully pulled {}", repo.path);
            SyncResult::Succeeded
        }
        Err(e) => failed(SyncOperation::Pull, repo, e),
    }
}

fn failed(operation: SyncOperation, repo: &Repository, error: Error) -> SyncResult {
    warn!("{} failed for {}: {}", operation.verb(), repo.path, error);
    SyncResult::Failed(error.to_string())
}

/// Applies `operation` to one repository, turning a panic into a failure.
fn run_one(git: &dyn GitProvider, operation: SyncOperation, repo: &Repository) -> SyncResult {
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| match operation {
        SyncOperation::Clone => clone_or_skip(git, repo),
        SyncOperation::Pull => pull(git, repo),
    }));
    attempt.unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        warn!("{} panicked for {}: {}", operation.verb(), repo.path, reason);
        SyncResult::Failed(format!("{} panicked: {}", operation.verb(), reason))
    })
}

/// Applies `operation` to every repository in `repos` using `jobs` workers.
///
/// Fails with [`Error::InvalidJobCount`] before dispatching anything if `jobs`
/// is less than 1. Per-repository failures do not fail the run; they are
/// counted in the returned report.
pub fn run(
    repos: &[Repository],
    operation: SyncOperation,
    jobs: i64,
    git: &dyn GitProvider,
) -> Result<SyncReport> {
    let workers = usize::try_from(jobs)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or(Error::InvalidJobCount { jobs })?;

    // Workers beyond the queue length would find it already drained
    let workers = workers.min(repos.len()).max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("mg-{}", i))
        .build()
        .map_err(|e| Error::Config {
            message: format!("failed to start {} workers: {}", workers, e),
        })?;

    let (sender, receiver) = mpsc::channel();
    for repo in repos {
        // The receiver is alive until the end of this function
        let _ = sender.send(repo);
    }
    drop(sender);

    let queue = Mutex::new(receiver);
    let report = Mutex::new(SyncReport {
        total: repos.len(),
        ..SyncReport::default()
    });

    pool.scope(|scope| {
        for _ in 0..workers {
            let queue = &queue;
            let report = &report;
            scope.spawn(move |_| drain(queue, report, operation, git));
        }
    });

    report.into_inner().map_err(|_| Error::LockPoisoned {
        context: "sync report".to_string(),
    })
}

fn drain(
    queue: &Mutex<Receiver<&Repository>>,
    report: &Mutex<SyncReport>,
    operation: SyncOperation,
    git: &dyn GitProvider,
) {
    loop {
        // The queue is closed before workers start, so recv never blocks
        let next = queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        let Ok(repo) = next else {
            break;
        };
        let result = run_one(git, operation, repo);
        report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(&repo.path, result);
    }
}
