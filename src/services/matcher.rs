//! Exact file-name matching.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};

/// How names are compared against the requested set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseSensitivity {
    Sensitive,
    Insensitive,
}

impl CaseSensitivity {
    /// Comparison used by the host's default filesystem (NTFS and APFS fold case).
    #[must_use]
    pub fn native() -> Self {
        if cfg!(any(windows, target_os = "macos")) {
            CaseSensitivity::Insensitive
        } else {
            CaseSensitivity::Sensitive
        }
    }
}

impl Default for CaseSensitivity {
    fn default() -> Self {
        Self::native()
    }
}

/// Set of requested file names.
#[derive(Debug, Clone)]
pub struct NameSet {
    exact: HashSet<OsString>,
    folded: HashSet<String>,
    case: CaseSensitivity,
}

impl NameSet {
    pub fn new<I, S>(names: I, case: CaseSensitivity) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut exact = HashSet::new();
        let mut folded = HashSet::new();

        for name in names {
            let name = name.as_ref();
            match case {
                CaseSensitivity::Sensitive => {
                    exact.insert(name.to_os_string());
                }
                CaseSensitivity::Insensitive => match name.to_str() {
                    Some(name) => {
                        folded.insert(fold(name));
                    }
                    // Not valid Unicode: nothing to fold, compare bytes.
                    None => {
                        exact.insert(name.to_os_string());
                    }
                },
            }
        }

        Self {
            exact,
            folded,
            case,
        }
    }

    #[must_use]
    pub fn case(&self) -> CaseSensitivity {
        self.case
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len() + self.folded.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn matches(&self, name: &OsStr) -> bool {
        match self.case {
            CaseSensitivity::Sensitive => self.exact.contains(name),
            CaseSensitivity::Insensitive => match name.to_str() {
                Some(name) => self.folded.contains(&fold(name)),
                None => self.exact.contains(name),
            },
        }
    }
}

/// Simple one-to-one upper-case mapping, the way NTFS and APFS compare names.
///
/// Characters whose upper case expands (`ß` -> `SS`) are left unchanged.
fn fold(name: &str) -> String {
    name.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(single), None) => single,
                _ => c,
            }
        })
        .collect()
}
