//! Portable enumeration backend using `std::fs::read_dir`.
//!
//! Used on platforms without a native backend and when explicitly requested.
//! Also handy as a reference: results must match the native backends.

use super::{
    ATTRIBUTE_DIRECTORY, ATTRIBUTE_REPARSE_POINT, DirectoryEnumerator, DirectoryListing, Entry,
    EnumeratorKind,
};
use std::fs::{self, ReadDir};
use std::io;
use std::path::Path;

#[derive(Debug, Default, Clone, Copy)]
pub struct PortableEnumerator;

impl DirectoryEnumerator for PortableEnumerator {
    type Listing = PortableListing;

    fn kind(&self) -> EnumeratorKind {
        EnumeratorKind::Portable
    }

    fn open(&self, dir: &Path) -> io::Result<PortableListing> {
        Ok(PortableListing {
            inner: fs::read_dir(dir)?,
        })
    }
}

pub struct PortableListing {
    inner: ReadDir,
}

impl DirectoryListing for PortableListing {
    fn next_entry(&mut self) -> io::Result<Option<Entry>> {
        let Some(next) = self.inner.next() else {
            return Ok(None);
        };
        let entry = next?;
        let file_type = entry.file_type()?;

        let attributes = if file_type.is_dir() {
            ATTRIBUTE_DIRECTORY
        } else if file_type.is_symlink() {
            // Dangling links resolve to nothing and stay plain entries.
            let target_is_dir = fs::metadata(entry.path()).is_ok_and(|meta| meta.is_dir());
            if target_is_dir {
                ATTRIBUTE_REPARSE_POINT | ATTRIBUTE_DIRECTORY
            } else {
                ATTRIBUTE_REPARSE_POINT
            }
        } else {
            0
        };

        Ok(Some(Entry::new(entry.file_name(), attributes)))
    }
}
