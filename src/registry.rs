//! # Repository Registry
//!
//! The registry is the in-memory list of tracked repositories plus a table of
//! global command aliases. It is what `mgconfig` deserializes into and what
//! every command reads or mutates.
//!
//! ## Invariants
//!
//! - Repositories keep insertion order. That order drives `list` output and the
//!   order in which the sync engine enqueues work.
//! - No two repositories share a `path`. `add_repo` and `merge` enforce this;
//!   the path is the only identity a repository has.
//!
//! ## Portable paths
//!
//! On disk, paths under the user's home directory are stored with the home
//! prefix replaced by `$HOME` so the same file works on machines with different
//! home directories. `expand_paths` and `collapse_paths` convert between the two
//! forms; the persistence layer calls them at the load and save boundaries so
//! everything else works with absolute paths.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::defaults::{self, HOME_TOKEN, HOME_TOKEN_BRACED};
use crate::error::{Error, Result};

/// A tracked repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Location of the working tree.
    #[serde(rename = "Path")]
    pub path: String,

    /// Where to clone from. Usually a URL, but repositories imported from a
    /// legacy file may carry an arbitrary checkout command here instead.
    #[serde(rename = "Remote", default)]
    pub remote: String,

    /// Aliases that only apply inside this repository.
    #[serde(
        rename = "Aliases",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub aliases: Option<BTreeMap<String, String>>,
}

impl Repository {
    pub fn new(path: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            remote: remote.into(),
            aliases: None,
        }
    }
}

/// The set of tracked repositories and global aliases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    #[serde(rename = "Repos", default, deserialize_with = "null_as_default")]
    repos: Vec<Repository>,

    #[serde(rename = "Aliases", default, deserialize_with = "null_as_default")]
    aliases: BTreeMap<String, String>,
}

/// Older writers emit `null` for empty collections.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Summary of a [`Registry::merge`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Paths that were added, in the order they were encountered.
    pub new_paths: Vec<String>,
    /// Number of repositories skipped because their path was already tracked.
    pub duplicates: usize,
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for path in &self.new_paths {
            writeln!(f, "Added repo {}", path)?;
        }
        writeln!(f)?;
        writeln!(f, "Added {} new repos", self.new_paths.len())?;
        write!(f, "Skipped {} duplicate repos", self.duplicates)
    }
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a registry document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serializes the registry as an indented document.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn repos(&self) -> &[Repository] {
        &self.repos
    }

    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }

    /// Sets a global alias, replacing any previous command with that name.
    pub fn set_alias(&mut self, name: impl Into<String>, command: impl Into<String>) {
        self.aliases.insert(name.into(), command.into());
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.repos.iter().any(|r| r.path == path)
    }

    /// Looks up a repository by path.
    pub fn get(&self, path: &str) -> Option<&Repository> {
        self.repos.iter().find(|r| r.path == path)
    }

    /// Returns the tracked paths in registry order.
    pub fn repo_paths(&self) -> Vec<&str> {
        self.repos.iter().map(|r| r.path.as_str()).collect()
    }

    /// Starts tracking `path`.
    ///
    /// Fails with [`Error::Duplicate`] if the path is already tracked, leaving
    /// the registry unchanged.
    pub fn add_repo(&mut self, path: &str, remote: &str) -> Result<()> {
        self.insert(Repository::new(path, remote))
    }

    fn insert(&mut self, repo: Repository) -> Result<()> {
        if repo.path.trim().is_empty() {
            return Err(Error::InvalidRepository {
                message: format!("empty path for remote '{}'", repo.remote),
            });
        }
        if self.contains(&repo.path) {
            return Err(Error::Duplicate { path: repo.path });
        }
        self.repos.push(repo);
        Ok(())
    }

    /// Stops tracking `path`, keeping the order of the remaining repositories.
    pub fn del_repo(&mut self, path: &str) -> Result<()> {
        match self.repos.iter().position(|r| r.path == path) {
            Some(index) => {
                self.repos.remove(index);
                Ok(())
            }
            None => Err(Error::NotFound {
                path: path.to_string(),
            }),
        }
    }

    /// Adds every repository of `other` that is not already tracked.
    ///
    /// Duplicates are counted and skipped. Any other error stops the merge and
    /// is returned as-is; repositories merged before the failure stay in the
    /// registry, so a failed merge can leave it partially updated.
    ///
    /// Global aliases from `other` are copied for names not already defined
    /// here.
    pub fn merge(&mut self, other: Registry) -> Result<MergeOutcome> {
        let mut outcome = MergeOutcome::default();
        for repo in other.repos {
            let path = repo.path.clone();
            match self.insert(repo) {
                Ok(()) => outcome.new_paths.push(path),
                Err(Error::Duplicate { .. }) => outcome.duplicates += 1,
                Err(e) => return Err(e),
            }
        }
        for (name, command) in other.aliases {
            self.aliases.entry(name).or_insert(command);
        }
        Ok(outcome)
    }

    /// Replaces a leading `$HOME` in every path with the user's home directory.
    pub fn expand_paths(&mut self) {
        if let Some(home) = defaults::home_dir() {
            self.expand_paths_with(&home);
        }
    }

    /// Like [`Registry::expand_paths`] with an explicit home directory.
    pub fn expand_paths_with(&mut self, home: &Path) {
        let home = home.to_string_lossy();
        for repo in &mut self.repos {
            if let Some(expanded) = expand_home(&repo.path, &home) {
                repo.path = expanded;
            }
        }
    }

    /// Replaces the user's home directory at the start of every path with
    /// `$HOME`. Does nothing if the home directory cannot be resolved.
    pub fn collapse_paths(&mut self) {
        if let Some(home) = defaults::home_dir() {
            self.collapse_paths_with(&home);
        }
    }

    /// Like [`Registry::collapse_paths`] with an explicit home directory.
    pub fn collapse_paths_with(&mut self, home: &Path) {
        let home = home.to_string_lossy();
        let home = home.trim_end_matches(is_separator);
        if home.is_empty() {
            return;
        }
        for repo in &mut self.repos {
            if let Some(collapsed) = collapse_home(&repo.path, home) {
                repo.path = collapsed;
            }
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}

fn expand_home(path: &str, home: &str) -> Option<String> {
    let rest = path
        .strip_prefix(HOME_TOKEN_BRACED)
        .or_else(|| path.strip_prefix(HOME_TOKEN))?;
    // `$HOMEDIR/x` names a different variable
    if !rest.is_empty() && !rest.starts_with(is_separator) {
        return None;
    }
    Some(format!("{}{}", home, rest))
}

fn collapse_home(path: &str, home: &str) -> Option<String> {
    let rest = path.strip_prefix(home)?;
    if !rest.is_empty() && !rest.starts_with(is_separator) {
        return None;
    }
    Some(format!("{}{}", HOME_TOKEN, rest))
}
