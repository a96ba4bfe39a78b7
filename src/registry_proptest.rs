//! Property-based tests for the registry and the sync engine.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use std::path::{Path, PathBuf};

    use crate::error::{Error, Result};
    use crate::registry::Registry;
    use crate::repository::{GitProvider, PullStatus};
    use crate::sync::{self, SyncOperation};
    use proptest::prelude::*;

    const HOME: &str = "/home/testuser";

    fn registry_of(paths: &[String]) -> Registry {
        let mut registry = Registry::new();
        for path in paths {
            // Generated paths may repeat
            let _ = registry.add_repo(path, "git@github.com:user/project.git");
        }
        registry
    }

    fn path_segment() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_.-]{1,12}"
    }

    fn relative_path() -> impl Strategy<Value = String> {
        prop::collection::vec(path_segment(), 1..4).prop_map(|parts| parts.join("/"))
    }

    /// Paths rooted at the home directory, the `$HOME` token, or elsewhere.
    fn any_repo_path() -> impl Strategy<Value = String> {
        prop_oneof![
            relative_path().prop_map(|rest| format!("{}/{}", HOME, rest)),
            relative_path().prop_map(|rest| format!("$HOME/{}", rest)),
            relative_path().prop_map(|rest| format!("/opt/{}", rest)),
            relative_path().prop_map(|rest| format!("{}extra/{}", HOME, rest)),
        ]
    }

    // ============================================================================
    // expand_paths / collapse_paths property tests
    // ============================================================================

    proptest! {
        /// Property: collapsing then expanding restores home-rooted paths
        #[test]
        fn collapse_then_expand_is_identity(paths in prop::collection::vec(any_repo_path(), 0..8)) {
            let mut registry = registry_of(&paths);
            registry.expand_paths_with(Path::new(HOME));
            let expanded: Vec<String> = registry.repo_paths().iter().map(|p| p.to_string()).collect();

            registry.collapse_paths_with(Path::new(HOME));
            registry.expand_paths_with(Path::new(HOME));

            let restored: Vec<String> = registry.repo_paths().iter().map(|p| p.to_string()).collect();
            prop_assert_eq!(restored, expanded);
        }

        /// Property: expansion never leaves a leading `$HOME` token behind
        #[test]
        fn expand_removes_home_token(paths in prop::collection::vec(any_repo_path(), 0..8)) {
            let mut registry = registry_of(&paths);
            registry.expand_paths_with(Path::new(HOME));
            for path in registry.repo_paths() {
                prop_assert!(!path.starts_with("$HOME"), "unexpanded path {}", path);
            }
        }

        /// Property: paths outside the home directory are never rewritten
        #[test]
        fn collapse_leaves_foreign_paths_alone(rest in relative_path()) {
            for path in [format!("/opt/{}", rest), format!("{}extra/{}", HOME, rest)] {
                let mut registry = registry_of(std::slice::from_ref(&path));
                registry.collapse_paths_with(Path::new(HOME));
                prop_assert_eq!(registry.repo_paths(), vec![path.as_str()]);
            }
        }
    }

    // ============================================================================
    // merge property tests
    // ============================================================================

    proptest! {
        /// Property: merging the same source twice adds nothing the second time
        #[test]
        fn merge_twice_is_idempotent(paths in prop::collection::vec(any_repo_path(), 0..10)) {
            let source = registry_of(&paths);
            let mut target = Registry::new();

            let first = target.merge(source.clone()).unwrap();
            prop_assert_eq!(first.new_paths.len(), source.len());
            prop_assert_eq!(first.duplicates, 0);

            let second = target.merge(source.clone()).unwrap();
            prop_assert!(second.new_paths.is_empty());
            prop_assert_eq!(second.duplicates, source.len());
            prop_assert_eq!(target.len(), source.len());
        }
    }

    // ============================================================================
    // sync::run property tests
    // ============================================================================

    /// Provider whose repositories are present unless their name contains "x".
    struct FlakyGit;

    impl GitProvider for FlakyGit {
        fn open(&self, path: &Path) -> Result<()> {
            if path.to_string_lossy().contains('x') {
                Err(Error::GitCommand {
                    command: "rev-parse".to_string(),
                    path: path.to_path_buf(),
                    stderr: "broken".to_string(),
                })
            } else {
                Ok(())
            }
        }

        fn work_tree(&self, path: &Path) -> Result<PathBuf> {
            Ok(path.to_path_buf())
        }

        fn clone_repo(&self, _url: &str, _path: &Path) -> Result<()> {
            Ok(())
        }

        fn pull(&self, _path: &Path) -> Result<PullStatus> {
            Ok(PullStatus::Updated)
        }

        fn first_remote_url(&self, _path: &Path) -> Result<Option<String>> {
            Ok(None)
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: every dispatched repository yields exactly one result
        #[test]
        fn run_reports_every_repository(
            names in prop::collection::hash_set("[a-z]{1,8}", 0..30),
            jobs in 1i64..12,
            pull in any::<bool>(),
        ) {
            let mut registry = Registry::new();
            for name in &names {
                registry.add_repo(&format!("/srv/{}", name), "remote").unwrap();
            }
            let operation = if pull { SyncOperation::Pull } else { SyncOperation::Clone };
            let broken = names.iter().filter(|n| n.contains('x')).count();

            let report = sync::run(registry.repos(), operation, jobs, &FlakyGit).unwrap();

            prop_assert_eq!(report.total, names.len());
            prop_assert_eq!(report.ok() + report.failed, names.len());
            prop_assert_eq!(report.failed, broken);
            prop_assert_eq!(report.failures.len(), broken);
        }

        /// Property: a non-positive job count is always rejected
        #[test]
        fn run_rejects_non_positive_jobs(jobs in i64::MIN..1) {
            let err = sync::run(&[], SyncOperation::Clone, jobs, &FlakyGit).unwrap_err();
            let is_invalid_job_count = matches!(err, Error::InvalidJobCount { .. });
            prop_assert!(is_invalid_job_count);
        }
    }
}
