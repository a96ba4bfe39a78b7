use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::Error;

/// Result of a fast-forward pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullStatus {
    /// Nothing was fetched that moved `HEAD`.
    AlreadyUpToDate,
    /// `HEAD` moved forward.
    Updated,
}

/// A `git` command whose messages are untranslated, so stderr can be matched.
fn git_command() -> Command {
    let mut cmd = Command::new("git");
    cmd.env("LC_ALL", "C").env("LANGUAGE", "");
    cmd
}

/// Run `git` with `args` inside `dir` and return its trimmed stdout.
///
/// `path` is only used for error context.
fn run_git(dir: &Path, args: &[&str], path: &Path) -> Result<String, Error> {
    let output = git_command()
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            path: path.to_path_buf(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: args.join(" "),
            path: path.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Open the repository containing `path`.
///
/// Like `git` itself this walks up from `path`, so a directory nested inside a
/// repository counts as opened. Returns the git directory.
///
/// A missing path, or one git reports as "not a git repository", yields
/// [`Error::NotARepository`]. Anything else is an [`Error::GitCommand`].
pub fn open(path: &Path) -> Result<PathBuf, Error> {
    if !path.exists() {
        return Err(Error::NotARepository {
            path: path.to_path_buf(),
        });
    }

    match run_git(path, &["rev-parse", "--absolute-git-dir"], path) {
        Ok(git_dir) => Ok(PathBuf::from(git_dir)),
        Err(Error::GitCommand { stderr, .. }) if stderr.contains("not a git repository") => {
            Err(Error::NotARepository {
                path: path.to_path_buf(),
            })
        }
        Err(e) => Err(e),
    }
}

/// Return the root of the working tree containing `path`.
///
/// Fails for bare repositories, which have no working tree.
pub fn work_tree(path: &Path) -> Result<PathBuf, Error> {
    run_git(path, &["rev-parse", "--show-toplevel"], path).map(PathBuf::from)
}

/// Clone `url` into `target_dir`.
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
pub fn clone(url: &str, target_dir: &Path) -> Result<(), Error> {
    let output = git_command()
        .args(["clone", "--quiet", "--", url])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitCommand {
            command: format!("clone {}", url),
            path: target_dir.to_path_buf(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Provide helpful error message for common auth failures
        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure you have access to the repository.\n\
                For private repos, ensure you have:\n\
                - SSH key added to ssh-agent\n\
                - Git credentials configured\n\
                - Personal access token set up\n\
                Error: {}",
                stderr.trim()
            )
        } else {
            stderr.trim().to_string()
        };

        return Err(Error::GitCommand {
            command: format!("clone {}", url),
            path: target_dir.to_path_buf(),
            stderr: message,
        });
    }

    Ok(())
}

/// Fast-forward the working tree at `path` from its upstream.
///
/// Compares `HEAD` before and after so the outcome does not depend on the
/// wording or locale of git's output.
pub fn pull_fast_forward(path: &Path) -> Result<PullStatus, Error> {
    let before = head(path);
    run_git(path, &["pull", "--ff-only", "--quiet"], path)?;
    let after = head(path);

    if before.is_some() && before == after {
        Ok(PullStatus::AlreadyUpToDate)
    } else {
        Ok(PullStatus::Updated)
    }
}

/// Commit id of `HEAD`, or `None` for an unborn branch.
fn head(path: &Path) -> Option<String> {
    run_git(path, &["rev-parse", "--verify", "--quiet", "HEAD"], path).ok()
}

/// List the names of the configured remotes, in git's order.
pub fn remotes(path: &Path) -> Result<Vec<String>, Error> {
    let stdout = run_git(path, &["remote"], path)?;
    Ok(stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect())
}

/// URL of the first remote of the repository at `path`, if it has one.
pub fn first_remote_url(path: &Path) -> Result<Option<String>, Error> {
    let Some(name) = remotes(path)?.into_iter().next() else {
        return Ok(None);
    };
    let url = run_git(path, &["remote", "get-url", &name], path)?;
    Ok(Some(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["-c", "user.name=mg", "-c", "user.email=mg@example.com"])
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }

    /// An upstream repository with one commit and a clone of it.
    fn upstream_and_clone(temp: &TempDir) -> (PathBuf, PathBuf) {
        let upstream = temp.path().join("upstream");
        fs::create_dir(&upstream).unwrap();
        git(&upstream, &["init", "--quiet"]);
        fs::write(upstream.join("README.md"), "one").unwrap();
        git(&upstream, &["add", "README.md"]);
        git(&upstream, &["commit", "--quiet", "-m", "one"]);

        let checkout = temp.path().join("checkout");
        clone(upstream.to_str().unwrap(), &checkout).unwrap();
        (upstream, checkout)
    }

    #[test]
    fn test_open_missing_path_is_not_a_repository() {
        let temp = TempDir::new().unwrap();
        let err = open(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::NotARepository { .. }));
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_open_plain_directory_is_not_a_repository() {
        let temp = TempDir::new().unwrap();
        let err = open(temp.path()).unwrap_err();
        assert!(matches!(err, Error::NotARepository { .. }));
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    #[serial_test::serial]
    fn test_open_plain_directory_under_translated_locale() {
        let temp = TempDir::new().unwrap();
        let saved: Vec<_> = ["LANGUAGE", "LC_ALL", "LANG"]
            .iter()
            .map(|name| (*name, std::env::var_os(name)))
            .collect();
        std::env::set_var("LANGUAGE", "de");
        std::env::set_var("LC_ALL", "de_DE.UTF-8");
        std::env::set_var("LANG", "de_DE.UTF-8");

        let result = open(temp.path());

        for (name, value) in saved {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
        assert!(matches!(result, Err(Error::NotARepository { .. })));
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_open_file_is_other_error() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let err = open(&file).unwrap_err();
        assert!(matches!(err, Error::GitCommand { .. }));
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_clone_open_and_remote_url() {
        let temp = TempDir::new().unwrap();
        let (upstream, checkout) = upstream_and_clone(&temp);

        assert!(open(&checkout).is_ok());
        assert_eq!(
            fs::canonicalize(work_tree(&checkout).unwrap()).unwrap(),
            fs::canonicalize(&checkout).unwrap()
        );
        assert_eq!(remotes(&checkout).unwrap(), vec!["origin".to_string()]);
        assert_eq!(
            first_remote_url(&checkout).unwrap(),
            Some(upstream.to_string_lossy().into_owned())
        );
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_first_remote_url_without_remotes() {
        let temp = TempDir::new().unwrap();
        git(temp.path(), &["init", "--quiet"]);
        assert_eq!(first_remote_url(temp.path()).unwrap(), None);
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_pull_reports_up_to_date_then_updated() {
        let temp = TempDir::new().unwrap();
        let (upstream, checkout) = upstream_and_clone(&temp);

        assert_eq!(
            pull_fast_forward(&checkout).unwrap(),
            PullStatus::AlreadyUpToDate
        );

        fs::write(upstream.join("README.md"), "two").unwrap();
        git(&upstream, &["commit", "--quiet", "-am", "two"]);

        assert_eq!(pull_fast_forward(&checkout).unwrap(), PullStatus::Updated);
        assert_eq!(
            fs::read_to_string(checkout.join("README.md")).unwrap(),
            "two"
        );
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_work_tree_fails_for_bare_repository() {
        let temp = TempDir::new().unwrap();
        git(temp.path(), &["init", "--quiet", "--bare"]);
        assert!(open(temp.path()).is_ok());
        assert!(work_tree(temp.path()).is_err());
    }

    #[test]
    #[cfg_attr(not(feature = "integration-tests"), ignore)]
    fn test_clone_failure_reports_url() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("no-such-upstream");
        let err = clone(missing.to_str().unwrap(), &temp.path().join("dst")).unwrap_err();
        match err {
            Error::GitCommand { command, .. } => assert!(command.starts_with("clone ")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
