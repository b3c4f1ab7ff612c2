//! Path normalization and joining for directory tasks.
//!
//! Joining is done on the raw `OsString` rather than through `Path::join`:
//! a stripped drive root such as `C:` must become `C:\name`, never the
//! drive-relative `C:name`.

use std::ffi::{OsStr, OsString};
use std::path::{MAIN_SEPARATOR_STR, Path, PathBuf};

#[cfg(windows)]
fn is_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

#[cfg(not(windows))]
fn is_separator(c: char) -> bool {
    c == '/'
}

/// Whether `path` ends with a platform separator.
#[must_use]
pub fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .last()
        .is_some_and(|&b| is_separator(char::from(b)))
}

/// Strip trailing separators from a root path.
///
/// A filesystem root (`/`, `C:\`) keeps exactly one separator so that it
/// still names the root directory.
#[must_use]
pub fn strip_trailing_separators(path: &str) -> String {
    let trimmed = path.trim_end_matches(is_separator);

    if trimmed.is_empty() {
        return if path.is_empty() {
            String::new()
        } else {
            MAIN_SEPARATOR_STR.to_string()
        };
    }

    if trimmed.len() < path.len() && is_drive_prefix(trimmed) {
        return format!("{trimmed}{MAIN_SEPARATOR_STR}");
    }

    trimmed.to_string()
}

#[cfg(windows)]
fn is_drive_prefix(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(not(windows))]
fn is_drive_prefix(_s: &str) -> bool {
    false
}

/// Join an entry name onto its parent directory with the platform separator.
#[must_use]
pub fn join_child(dir: &Path, name: &OsStr) -> PathBuf {
    let mut joined = OsString::with_capacity(dir.as_os_str().len() + name.len() + 1);
    joined.push(dir.as_os_str());
    if !dir.as_os_str().is_empty() && !ends_with_separator(dir) {
        joined.push(MAIN_SEPARATOR_STR);
    }
    joined.push(name);
    PathBuf::from(joined)
}

/// Resolve a user-supplied root to the absolute, separator-stripped form
/// used for the initial directory task.
pub fn normalize_root(root: &Path) -> std::io::Result<PathBuf> {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::path::absolute(root)?
    };

    Ok(match absolute.to_str() {
        Some(s) => PathBuf::from(strip_trailing_separators(s)),
        None => absolute,
    })
}

/// Render a path for output.
#[must_use]
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
