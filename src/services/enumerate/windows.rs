//! Win32 enumeration backend (`FindFirstFileExW` / `FindNextFileW` / `FindClose`).
//!
//! Lists `<dir>\*` with `FindExInfoBasic` and `FIND_FIRST_EX_LARGE_FETCH`,
//! which skips short-name generation and batches entries per round trip; both
//! matter on SMB shares.

use super::{DirectoryEnumerator, DirectoryListing, Entry, EnumeratorKind};
use std::ffi::OsString;
use std::io;
use std::mem::MaybeUninit;
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::Path;
use windows::Win32::Foundation::{
    ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_FILES, HANDLE, INVALID_HANDLE_VALUE,
};
use windows::Win32::Storage::FileSystem::{
    FIND_FIRST_EX_LARGE_FETCH, FindClose, FindExInfoBasic, FindExSearchNameMatch, FindFirstFileExW,
    FindNextFileW, WIN32_FIND_DATAW,
};
use windows::core::PCWSTR;

/// Directory enumerator backed by the Win32 find API.
///
/// Attribute words are passed through untouched: junctions and directory
/// symlinks keep both their directory and reparse bits.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsEnumerator;

impl DirectoryEnumerator for WindowsEnumerator {
    type Listing = WindowsListing;

    fn kind(&self) -> EnumeratorKind {
        EnumeratorKind::Windows
    }

    fn open(&self, dir: &Path) -> io::Result<WindowsListing> {
        let search_spec = search_pattern(dir);
        let mut find_data = MaybeUninit::<WIN32_FIND_DATAW>::uninit();

        let handle = match unsafe {
            FindFirstFileExW(
                PCWSTR(search_spec.as_ptr()),
                FindExInfoBasic,
                find_data.as_mut_ptr().cast(),
                FindExSearchNameMatch,
                None,
                FIND_FIRST_EX_LARGE_FETCH,
            )
        } {
            Ok(handle) => SearchHandle::new(handle),
            // No match at all, which for `*` only happens on an empty volume root.
            Err(err) if err.code() == ERROR_FILE_NOT_FOUND.to_hresult() => {
                return Ok(WindowsListing::empty());
            }
            Err(err) => return Err(err.into()),
        };

        let first = unsafe { find_data.assume_init() };

        Ok(WindowsListing {
            handle: Some(handle),
            pending: Some(first),
        })
    }
}

/// Open listing; the search handle is closed on drop or on exhaustion.
pub struct WindowsListing {
    handle: Option<SearchHandle>,
    pending: Option<WIN32_FIND_DATAW>,
}

impl WindowsListing {
    fn empty() -> Self {
        Self {
            handle: None,
            pending: None,
        }
    }
}

fn to_entry(data: &WIN32_FIND_DATAW) -> Entry {
    Entry::new(filename_from_data(data), data.dwFileAttributes)
}

impl DirectoryListing for WindowsListing {
    fn next_entry(&mut self) -> io::Result<Option<Entry>> {
        if let Some(data) = self.pending.take() {
            return Ok(Some(to_entry(&data)));
        }

        let Some(handle) = self.handle.as_ref() else {
            return Ok(None);
        };

        let mut next = MaybeUninit::<WIN32_FIND_DATAW>::uninit();
        match unsafe { FindNextFileW(handle.raw(), next.as_mut_ptr()) } {
            Ok(()) => {
                let data = unsafe { next.assume_init() };
                Ok(Some(to_entry(&data)))
            }
            Err(err) => {
                // Release eagerly; the listing may outlive its usefulness.
                self.handle = None;
                if err.code() == ERROR_NO_MORE_FILES.to_hresult() {
                    Ok(None)
                } else {
                    Err(err.into())
                }
            }
        }
    }
}

fn search_pattern(dir: &Path) -> Vec<u16> {
    let mut wide: Vec<u16> = dir.as_os_str().encode_wide().collect();
    if !matches!(wide.last(), Some(&c) if c == u16::from(b'\\') || c == u16::from(b'/')) {
        wide.push(u16::from(b'\\'));
    }
    wide.push(u16::from(b'*'));
    wide.push(0);
    wide
}

fn filename_from_data(data: &WIN32_FIND_DATAW) -> OsString {
    let buffer = &data.cFileName;
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    OsString::from_wide(&buffer[..len])
}

struct SearchHandle(HANDLE);

impl SearchHandle {
    fn new(raw: HANDLE) -> Self {
        Self(raw)
    }

    fn raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        if self.0 != INVALID_HANDLE_VALUE {
            if let Err(err) = unsafe { FindClose(self.0) } {
                let io_err: io::Error = err.into();
                log::warn!("FindClose failed for search handle: {io_err}");
            }
            self.0 = INVALID_HANDLE_VALUE;
        }
    }
}
