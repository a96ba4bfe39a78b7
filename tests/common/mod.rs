//! Shared test utilities for CLI end-to-end tests.
//!
//! Every fixture owns a temporary directory that stands in for the user's home
//! directory. Commands created from a fixture see that directory as `HOME`,
//! keep their registry in `<home>/mgconfig` via `MGCONFIG`, and never read the
//! invoking user's configuration.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_registry(registries::TWO_REPOS);
//!     fixture.command().arg("list").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::registries;
    #[allow(unused_imports)]
    pub use super::{git, init_repo};
    pub use super::TestFixture;
}

/// Registry documents used across tests.
#[allow(dead_code)]
pub mod registries {
    /// Two repositories, one under `$HOME`.
    pub const TWO_REPOS: &str = r#"{
  "Repos": [
    {"Path": "$HOME/code/alpha", "Remote": "git@github.com:user/alpha.git"},
    {"Path": "/srv/beta", "Remote": "git@github.com:user/beta.git"}
  ],
  "Aliases": {"gc": "git gc"}
}"#;

    /// A document with no repositories.
    pub const EMPTY: &str = r#"{"Repos": [], "Aliases": {}}"#;

    /// Not JSON at all.
    pub const INVALID: &str = "{not json";
}

/// A test fixture with a temporary home directory and registry location.
pub struct TestFixture {
    home: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a fixture whose home directory contains an empty `.config`.
    pub fn new() -> Self {
        let home = assert_fs::TempDir::new().expect("Failed to create temp directory");
        home.child(".config")
            .create_dir_all()
            .expect("Failed to create .config");
        Self { home }
    }

    /// Write the registry file with the given content.
    pub fn with_registry(self, content: &str) -> Self {
        self.home
            .child("mgconfig")
            .write_str(content)
            .expect("Failed to write registry");
        self
    }

    /// Write `~/.mrconfig` with the given content.
    #[allow(dead_code)]
    pub fn with_mrconfig(self, content: &str) -> Self {
        self.home
            .child(".mrconfig")
            .write_str(content)
            .expect("Failed to write .mrconfig");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.home
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// The temporary home directory.
    pub fn path(&self) -> &Path {
        self.home.path()
    }

    /// Where commands read and write the registry.
    pub fn registry_path(&self) -> PathBuf {
        self.home.path().join("mgconfig")
    }

    /// The saved registry as JSON.
    #[allow(dead_code)]
    pub fn saved_registry(&self) -> serde_json::Value {
        let content = std::fs::read_to_string(self.registry_path()).expect("registry was not saved");
        serde_json::from_str(&content).expect("registry is not valid JSON")
    }

    /// Create a child path in the home directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.home.child(path)
    }

    /// Create an `mg` command isolated to this fixture.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mg");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("MGCONFIG", self.registry_path())
            .env("NO_COLOR", "1")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("MG_JOBS")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Like [`TestFixture::command`] but resolving the registry through
    /// `~/.config/mgconfig` instead of `MGCONFIG`.
    #[allow(dead_code)]
    pub fn command_without_override(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.env_remove("MGCONFIG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Run git in `dir` with a fixed identity, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["-c", "user.name=mg", "-c", "user.email=mg@example.com"])
        .args(args)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Create a repository at `dir` with one commit and return it.
#[allow(dead_code)]
pub fn init_repo(dir: &Path) -> PathBuf {
    std::fs::create_dir_all(dir).expect("failed to create repository directory");
    git(dir, &["init", "--quiet"]);
    std::fs::write(dir.join("README.md"), "hello").expect("failed to write README");
    git(dir, &["add", "README.md"]);
    git(dir, &["commit", "--quiet", "-m", "initial"]);
    dir.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_home_with_config_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().join(".config").is_dir());
        assert!(!fixture.registry_path().exists());
    }

    #[test]
    fn test_fixture_with_registry() {
        let fixture = TestFixture::new().with_registry(registries::EMPTY);
        assert!(fixture.registry_path().exists());
    }

    #[test]
    fn test_registries_are_valid_json() {
        for document in [registries::TWO_REPOS, registries::EMPTY] {
            serde_json::from_str::<serde_json::Value>(document).expect("should be valid JSON");
        }
        assert!(serde_json::from_str::<serde_json::Value>(registries::INVALID).is_err());
    }
}
