//! POSIX enumeration backend built on `rustix` (`openat` + `getdents`).

use super::{
    ATTRIBUTE_DIRECTORY, ATTRIBUTE_REPARSE_POINT, DirectoryEnumerator, DirectoryListing, Entry,
    EnumeratorKind,
};
use rustix::fd::OwnedFd;
use rustix::fs::{self as rfs, AtFlags, Dir, FileType, Mode, OFlags};
use std::ffi::{CStr, OsString};
use std::io;
use std::os::unix::ffi::OsStringExt;
use std::path::Path;

/// Directory enumerator reading raw `dirent` records.
///
/// Symbolic links carry the reparse bit, plus the directory bit when their
/// target is a directory, matching what Win32 reports for directory links.
#[derive(Debug, Default, Clone, Copy)]
pub struct PosixEnumerator;

impl DirectoryEnumerator for PosixEnumerator {
    type Listing = PosixListing;

    fn kind(&self) -> EnumeratorKind {
        EnumeratorKind::Posix
    }

    fn open(&self, dir: &Path) -> io::Result<PosixListing> {
        let fd = rfs::openat(
            rfs::CWD,
            dir,
            OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
            Mode::empty(),
        )
        .map_err(io::Error::from)?;

        let entries = Dir::read_from(&fd).map_err(io::Error::from)?;

        Ok(PosixListing { fd, entries })
    }
}

/// Open listing; the directory stream and its descriptor close on drop.
pub struct PosixListing {
    fd: OwnedFd,
    entries: Dir,
}

impl PosixListing {
    fn attributes_for(&self, name: &CStr, file_type: FileType) -> u32 {
        match file_type {
            FileType::Directory => ATTRIBUTE_DIRECTORY,
            FileType::Symlink => ATTRIBUTE_REPARSE_POINT | self.target_attributes(name),
            // Some filesystems (older XFS, many network mounts) leave d_type empty.
            FileType::Unknown => match rfs::statat(&self.fd, name, AtFlags::SYMLINK_NOFOLLOW) {
                Ok(stat) => {
                    let resolved = FileType::from_raw_mode(stat.st_mode as _);
                    if resolved == FileType::Unknown {
                        0
                    } else {
                        self.attributes_for(name, resolved)
                    }
                }
                Err(err) => {
                    log::debug!("fstatat failed for {}: {err}", name.to_string_lossy());
                    0
                }
            },
            _ => 0,
        }
    }

    fn target_attributes(&self, name: &CStr) -> u32 {
        match rfs::statat(&self.fd, name, AtFlags::empty()) {
            Ok(stat) if FileType::from_raw_mode(stat.st_mode as _) == FileType::Directory => {
                ATTRIBUTE_DIRECTORY
            }
            Ok(_) => 0,
            Err(err) => {
                log::debug!(
                    "Dangling symlink {}: {err}",
                    name.to_string_lossy()
                );
                0
            }
        }
    }
}

impl DirectoryListing for PosixListing {
    fn next_entry(&mut self) -> io::Result<Option<Entry>> {
        let Some(next) = self.entries.next() else {
            return Ok(None);
        };
        let entry = next.map_err(io::Error::from)?;

        let name = entry.file_name();
        let attributes = self.attributes_for(name, entry.file_type());
        let name = OsString::from_vec(name.to_bytes().to_vec());

        Ok(Some(Entry::new(name, attributes)))
    }
}
