//! Native directory enumeration backends.
//!
//! Every backend exposes the same open / next / close triad: `open` acquires a
//! listing handle for one directory, `next_entry` pulls one raw entry at a
//! time, and dropping the listing releases the handle. Entries are classified
//! through a Win32-style attribute word so that all backends agree on what a
//! directory is:
//!
//! - bit `0x10` marks a directory,
//! - bit `0x400` marks a reparse point (junction or symbolic link).
//!
//! The synthetic `.` and `..` entries are filtered by name in [`Entries`], so
//! a backend may return them unchanged.

pub mod portable;
#[cfg(unix)]
pub mod posix;
#[cfg(windows)]
pub mod windows;

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;

/// Attribute bit marking a directory entry.
pub const ATTRIBUTE_DIRECTORY: u32 = 0x10;
/// Attribute bit marking a reparse point or symbolic link.
pub const ATTRIBUTE_REPARSE_POINT: u32 = 0x400;

/// One raw entry produced by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: OsString,
    pub attributes: u32,
}

impl Entry {
    #[must_use]
    pub fn new(name: impl Into<OsString>, attributes: u32) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.attributes & ATTRIBUTE_DIRECTORY != 0
    }

    #[must_use]
    pub fn is_reparse_point(&self) -> bool {
        self.attributes & ATTRIBUTE_REPARSE_POINT != 0
    }

    /// Whether this is the self (`.`) or parent (`..`) reference.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        is_synthetic_name(&self.name)
    }
}

#[must_use]
pub fn is_synthetic_name(name: &OsStr) -> bool {
    name == "." || name == ".."
}

/// An open, in-progress listing of one directory.
///
/// Implementations release their native handle on drop.
pub trait DirectoryListing {
    /// Fetch the next entry, `Ok(None)` once the listing is exhausted.
    fn next_entry(&mut self) -> io::Result<Option<Entry>>;
}

/// Capability to open directory listings.
pub trait DirectoryEnumerator: Send + Sync {
    type Listing: DirectoryListing;

    /// Identify the backend for logging and diagnostics.
    fn kind(&self) -> EnumeratorKind;

    /// Open a listing for `dir`.
    fn open(&self, dir: &Path) -> io::Result<Self::Listing>;
}

/// Iterator over the real entries of a listing.
///
/// Skips `.` and `..`, and stops for good after the first error so the
/// listing is never polled past a failure.
pub struct Entries<L> {
    listing: L,
    finished: bool,
}

impl<L: DirectoryListing> Entries<L> {
    pub fn new(listing: L) -> Self {
        Self {
            listing,
            finished: false,
        }
    }
}

impl<L: DirectoryListing> Iterator for Entries<L> {
    type Item = io::Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.listing.next_entry() {
                Ok(Some(entry)) if entry.is_synthetic() => {}
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => self.finished = true,
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
        None
    }
}

/// Open `dir` with `enumerator` and iterate its real entries.
pub fn entries<E: DirectoryEnumerator>(
    enumerator: &E,
    dir: &Path,
) -> io::Result<Entries<E::Listing>> {
    enumerator.open(dir).map(Entries::new)
}

/// Available enumeration backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumeratorKind {
    /// `std::fs::read_dir`, available everywhere.
    Portable,
    /// `FindFirstFileExW` / `FindNextFileW` / `FindClose`.
    Windows,
    /// `openat` + `getdents` through `rustix`.
    Posix,
}

impl EnumeratorKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumeratorKind::Portable => "portable",
            EnumeratorKind::Windows => "windows",
            EnumeratorKind::Posix => "posix",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "portable" | "std" | "legacy" => Some(EnumeratorKind::Portable),
            "windows" | "win32" | "ntfs" => Some(EnumeratorKind::Windows),
            "posix" | "unix" => Some(EnumeratorKind::Posix),
            _ => None,
        }
    }

    /// Native backend for the current platform.
    #[must_use]
    pub fn native() -> Self {
        if cfg!(windows) {
            EnumeratorKind::Windows
        } else if cfg!(unix) {
            EnumeratorKind::Posix
        } else {
            EnumeratorKind::Portable
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        match self {
            EnumeratorKind::Portable => true,
            EnumeratorKind::Windows => cfg!(windows),
            EnumeratorKind::Posix => cfg!(unix),
        }
    }

    /// Return `self` when this build supports it, otherwise the portable backend.
    #[must_use]
    pub fn resolve(self) -> Self {
        if self.is_supported() {
            self
        } else {
            log::warn!(
                "Requested enumerator '{self}' unsupported on this platform; falling back to '{}'",
                EnumeratorKind::Portable
            );
            EnumeratorKind::Portable
        }
    }
}

impl Default for EnumeratorKind {
    fn default() -> Self {
        Self::native()
    }
}

impl std::fmt::Display for EnumeratorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EnumeratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnumeratorKind::from_label(s).ok_or_else(|| format!("unknown enumerator '{s}'"))
    }
}
