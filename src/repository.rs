//! # Git Provider
//!
//! The sync engine and the `register` command never run git directly. They go
//! through the [`GitProvider`] trait, which captures the handful of
//! capabilities `mg` needs:
//!
//! - open a repository at a path, telling "there is no repository here" apart
//!   from every other failure;
//! - find the working tree of an opened repository;
//! - clone a remote into a path;
//! - fast-forward pull a working tree, reporting when it was already current;
//! - read the URL of a repository's first remote.
//!
//! [`SystemGit`] is the implementation used by the CLI; it wraps the functions
//! in [`crate::git`], which shell out to the system `git` binary. Tests replace
//! it with mock providers to drive every branch of the engine without touching
//! the network or the filesystem.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
pub use crate::git::PullStatus;

/// Trait for git operations - allows mocking in tests
pub trait GitProvider: Send + Sync {
    /// Opens the repository at `path`.
    ///
    /// Must return [`Error::NotARepository`] when there is no repository at
    /// `path`, and some other error for every other failure.
    fn open(&self, path: &Path) -> Result<()>;

    /// Returns the root of the working tree of the repository at `path`.
    fn work_tree(&self, path: &Path) -> Result<PathBuf>;

    /// Clones `url` into `path`. The parent of `path` already exists.
    fn clone_repo(&self, url: &str, path: &Path) -> Result<()>;

    /// Fast-forwards the working tree at `path`.
    fn pull(&self, path: &Path) -> Result<PullStatus>;

    /// Returns the URL of the first remote of the repository at `path`.
    fn first_remote_url(&self, path: &Path) -> Result<Option<String>>;
}

/// The default implementation of `GitProvider`, which uses the system's `git`
/// command to perform real Git operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

impl GitProvider for SystemGit {
    fn open(&self, path: &Path) -> Result<()> {
        crate::git::open(path).map(|_| ())
    }

    fn work_tree(&self, path: &Path) -> Result<PathBuf> {
        crate::git::work_tree(path)
    }

    fn clone_repo(&self, url: &str, path: &Path) -> Result<()> {
        crate::git::clone(url, path)
    }

    fn pull(&self, path: &Path) -> Result<PullStatus> {
        crate::git::pull_fast_forward(path)
    }

    fn first_remote_url(&self, path: &Path) -> Result<Option<String>> {
        crate::git::first_remote_url(path)
    }
}

/// A repository found on disk, ready to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    /// Root of the working tree.
    pub root: PathBuf,
    /// URL of the first remote.
    pub remote: String,
}

/// Resolves `path` to the root of its repository and reads the first remote.
///
/// Fails if `path` is not inside a working tree or the repository has no
/// remotes, since a registered repository must be clonable.
pub fn discover(git: &dyn GitProvider, path: &Path) -> Result<Discovered> {
    git.open(path)?;
    let root = git.work_tree(path)?;
    let remote = git
        .first_remote_url(&root)?
        .ok_or_else(|| Error::InvalidRepository {
            message: format!("{} has no remotes", root.display()),
        })?;
    Ok(Discovered { root, remote })
}
