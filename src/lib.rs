//! # mg
//!
//! This library keeps a registry of local git repositories and their remotes,
//! and keeps those repositories in sync with a pool of workers. It backs the
//! `mg` command-line tool, but the registry and the sync engine can be used on
//! their own.
//!
//! ## Quick Example
//!
//! ```
//! use mg::registry::Registry;
//!
//! let mut registry = Registry::new();
//! registry
//!     .add_repo("/home/user/code/mg", "git@github.com:user/mg.git")
//!     .unwrap();
//!
//! // Adding the same path again is reported, not applied
//! assert!(registry.add_repo("/home/user/code/mg", "other").is_err());
//!
//! let mut imported = Registry::new();
//! imported.add_repo("/home/user/code/mg", "x").unwrap();
//! imported.add_repo("/home/user/code/new", "y").unwrap();
//!
//! let outcome = registry.merge(imported).unwrap();
//! assert_eq!(outcome.new_paths, vec!["/home/user/code/new".to_string()]);
//! assert_eq!(outcome.duplicates, 1);
//! ```
//!
//! ## Core Concepts
//!
//! - **Registry (`registry`)**: The ordered list of tracked repositories, keyed
//!   by path, plus named command aliases. Paths may start with `$HOME` on disk
//!   and are expanded in memory.
//! - **Legacy import (`legacy`)**: Reads the subset of the myrepos
//!   `.mrconfig` format that describes repositories and converts it into a
//!   registry.
//! - **Persistence (`config`)**: Locates the `mgconfig` file, loads and saves
//!   it, and migrates `.mrconfig` on first use.
//! - **Git access (`repository`, `git`)**: The [`repository::GitProvider`]
//!   trait and its system-`git` implementation.
//! - **Sync engine (`sync`)**: Clones missing repositories or fast-forwards
//!   present ones in parallel and summarises the outcome in a
//!   [`sync::SyncReport`].

pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod legacy;
pub mod output;
pub mod registry;
pub mod repository;
pub mod suggestions;
pub mod sync;

#[cfg(test)]
mod registry_proptest;
