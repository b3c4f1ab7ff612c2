//! Tests for root normalization and child path joining

use nfind::services::paths::{join_child, normalize_root, strip_trailing_separators};
use std::ffi::OsStr;
use std::path::{MAIN_SEPARATOR_STR, Path};

#[test]
#[cfg(not(windows))]
fn test_strip_trailing_separators_unix() {
    assert_eq!(strip_trailing_separators("/home/user/"), "/home/user");
    assert_eq!(strip_trailing_separators("a/b//"), "a/b");
    assert_eq!(strip_trailing_separators("a/b"), "a/b");
    assert_eq!(strip_trailing_separators("/"), "/");
    assert_eq!(strip_trailing_separators("///"), "/");
    assert_eq!(strip_trailing_separators(""), "");
}

#[test]
#[cfg(windows)]
fn test_strip_trailing_separators_windows() {
    assert_eq!(strip_trailing_separators(r"C:\Users\"), r"C:\Users");
    assert_eq!(strip_trailing_separators(r"C:\Users/\"), r"C:\Users");
    assert_eq!(strip_trailing_separators(r"C:\"), r"C:\");
    assert_eq!(strip_trailing_separators("C:"), "C:");
}

#[test]
fn test_join_child_inserts_one_separator() {
    let joined = join_child(Path::new("base"), OsStr::new("child"));
    assert_eq!(joined.to_string_lossy(), format!("base{MAIN_SEPARATOR_STR}child"));
}

#[test]
fn test_join_child_on_root_does_not_double_separator() {
    let root = Path::new(MAIN_SEPARATOR_STR);
    let joined = join_child(root, OsStr::new("etc"));
    assert_eq!(joined.to_string_lossy(), format!("{MAIN_SEPARATOR_STR}etc"));
}

#[test]
fn test_normalize_root_makes_relative_paths_absolute() {
    let normalized = normalize_root(Path::new("some/dir")).unwrap();
    assert!(normalized.is_absolute());
    assert!(normalized.ends_with("some/dir"));
    assert!(!normalized.to_string_lossy().ends_with(MAIN_SEPARATOR_STR));
}
