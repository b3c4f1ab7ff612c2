//! Resilience: unreadable directories, failing listings, handle release

#[cfg(test)]
mod tests {
    use crate::fixtures::{FakeTree, create_files, expected, sorted};
    use nfind::{SearchOptions, Supervisor, TerminationPolicy};
    use std::fs;
    use tempfile::TempDir;

    fn supervisor(workers: usize) -> Supervisor {
        Supervisor::new(SearchOptions {
            max_workers: workers,
            ..SearchOptions::default()
        })
    }

    #[test]
    fn test_missing_root_is_skipped_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let present = temp_dir.path().join("present");
        create_files(&present, &["hit.txt"]).unwrap();
        let missing = temp_dir.path().join("gone");

        let summary =
            nfind::search(&["hit.txt"], &[&missing, &present], &SearchOptions::default()).unwrap();

        assert_eq!(summary.matches, vec![expected(&present, "hit.txt")]);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].code, "ENOENT");
        assert!(!summary.is_exhaustive());
        assert_eq!(summary.stats.directories_failed, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_does_not_abort_search() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_files(root, &["open/hit.txt", "locked/hit.txt"]).unwrap();
        let locked = root.join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users read through mode bits; only assert what holds for both.
        let enforced = fs::read_dir(&locked).is_err();

        let summary = nfind::search(&["hit.txt"], &[root], &SearchOptions::default()).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(summary.matches.contains(&expected(root, "open/hit.txt")));
        if enforced {
            assert_eq!(summary.matches.len(), 1);
            assert_eq!(summary.errors.len(), 1);
            assert_eq!(summary.errors[0].code, "EACCES");
        } else {
            assert_eq!(summary.matches.len(), 2);
        }
    }

    #[test]
    fn test_open_failure_skips_only_that_subtree() {
        let temp_dir = TempDir::new().unwrap();
        let tree = FakeTree::new(temp_dir.path())
            .file("keep/target.txt")
            .file("denied/target.txt")
            .file("denied/deeper/target.txt")
            .fail_open("denied");

        let summary = supervisor(4)
            .run_with(&tree, &["target.txt"], &[temp_dir.path()])
            .unwrap();

        assert_eq!(
            summary.matches,
            vec![tree.path("keep/target.txt").to_string_lossy().into_owned()]
        );
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].code, "EACCES");
        assert_eq!(tree.opened(), tree.closed());
    }

    #[test]
    fn test_mid_listing_failure_keeps_entries_seen_so_far() {
        let temp_dir = TempDir::new().unwrap();
        let tree = FakeTree::new(temp_dir.path())
            .file("flaky/target.txt")
            .file("flaky/sub/target.txt")
            .file("flaky/later/target.txt")
            .file("steady/target.txt")
            .fail_after("flaky", 2);

        for workers in [1, 3, 8] {
            let summary = supervisor(workers)
                .run_with(&tree, &["target.txt"], &[temp_dir.path()])
                .unwrap();

            let want: Vec<String> = ["flaky/target.txt", "flaky/sub/target.txt", "steady/target.txt"]
                .iter()
                .map(|p| tree.path(p).to_string_lossy().into_owned())
                .collect();
            assert_eq!(sorted(summary.matches), sorted(want), "workers = {workers}");
            assert_eq!(summary.errors.len(), 1);
            assert_eq!(summary.errors[0].code, "IO");
        }
        assert_eq!(tree.opened(), tree.closed());
    }

    #[test]
    fn test_synthetic_entries_are_never_traversed() {
        let temp_dir = TempDir::new().unwrap();
        let tree = FakeTree::new(temp_dir.path())
            .dir("a/b/c")
            .file("a/b/c/x.txt")
            .dir("d");

        let summary = supervisor(3)
            .run_with(&tree, &["x.txt"], &[temp_dir.path()])
            .unwrap();

        assert!(summary.errors.is_empty(), "{:?}", summary.errors);
        assert_eq!(summary.matches.len(), 1);
        // root, a, a/b, a/b/c, d: each listed exactly once
        assert_eq!(tree.opened(), tree.directory_count());
        assert_eq!(summary.stats.directories_scanned, 5);
    }

    #[test]
    fn test_junctions_skipped_unless_following_links() {
        let temp_dir = TempDir::new().unwrap();
        let tree = FakeTree::new(temp_dir.path())
            .junction("mount")
            .file("mount/inside.txt")
            .file("inside.txt");

        let plain = supervisor(2)
            .run_with(&tree, &["inside.txt"], &[temp_dir.path()])
            .unwrap();
        assert_eq!(plain.matches.len(), 1);

        let following = Supervisor::new(SearchOptions {
            max_workers: 2,
            follow_links: true,
            ..SearchOptions::default()
        })
        .run_with(&tree, &["inside.txt"], &[temp_dir.path()])
        .unwrap();
        assert_eq!(following.matches.len(), 2);
    }

    #[test]
    fn test_eager_exit_survives_failures() {
        let temp_dir = TempDir::new().unwrap();
        let tree = FakeTree::new(temp_dir.path())
            .file("a/t")
            .file("b/t")
            .file("b/c/t")
            .fail_open("a");

        let summary = Supervisor::new(SearchOptions {
            max_workers: 4,
            termination: TerminationPolicy::eager(),
            ..SearchOptions::default()
        })
        .run_with(&tree, &["t"], &[temp_dir.path()])
        .unwrap();

        assert_eq!(summary.matches.len(), 2);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(tree.opened(), tree.closed());
    }

    #[test]
    fn test_many_workers_few_directories() {
        let temp_dir = TempDir::new().unwrap();
        create_files(temp_dir.path(), &["only.txt"]).unwrap();

        let summary = nfind::search(
            &["only.txt"],
            &[temp_dir.path()],
            &SearchOptions {
                max_workers: 16,
                ..SearchOptions::default()
            },
        )
        .unwrap();

        assert_eq!(summary.matches.len(), 1);
        assert_eq!(summary.stats.workers, 16);
        assert_eq!(summary.stats.idle_workers, 15);
    }
}
