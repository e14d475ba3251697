//! Directory listing.
//!
//! Wraps the entries of one directory level in [`FileEntry`], which carries
//! the pieces classification needs: name, extension, and the directory and
//! hidden flags.

use std::fs::{self, DirEntry, ReadDir};
use std::io;
use std::path::{Path, PathBuf};

/// Names starting with this marker are treated as hidden.
pub const HIDDEN_MARKER: char = '.';

/// Why an entry is left in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry is a directory (or a symlink to one).
    Directory,
    /// The entry name starts with [`HIDDEN_MARKER`].
    Hidden,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Directory => write!(f, "directory"),
            SkipReason::Hidden => write!(f, "hidden file"),
        }
    }
}

/// A snapshot of one directory item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// The entry's file name.
    pub name: String,
    /// The full path to the entry.
    pub path: PathBuf,
    /// Extension including its leading `.`, or `None` when there is none.
    pub extension: Option<String>,
    /// Whether the entry is a directory.
    pub is_dir: bool,
    /// Whether the name starts with the hidden-file marker.
    pub is_hidden: bool,
}

impl FileEntry {
    /// Builds an entry from a path, querying the filesystem for the directory flag.
    ///
    /// Symlinks are followed, so a link to a directory counts as a directory.
    pub fn from_path(path: PathBuf) -> Self {
        let is_dir = path.is_dir();
        Self::with_kind(path, is_dir)
    }

    /// Builds an entry from a `read_dir` result.
    pub fn from_dir_entry(entry: &DirEntry) -> Self {
        Self::from_path(entry.path())
    }

    fn with_kind(path: PathBuf, is_dir: bool) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let is_hidden = name.starts_with(HIDDEN_MARKER);
        let extension = extension_of(&path);

        Self {
            name,
            path,
            extension,
            is_dir,
            is_hidden,
        }
    }

    /// Returns the reason this entry must not be moved, if any.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        if self.is_dir {
            Some(SkipReason::Directory)
        } else if self.is_hidden {
            Some(SkipReason::Hidden)
        } else {
            None
        }
    }

    /// Extension as a lookup key; empty when the entry has none.
    pub fn extension_key(&self) -> &str {
        self.extension.as_deref().unwrap_or("")
    }
}

/// Returns the last-dot extension of a path with its leading `.`.
///
/// `archive.tar.gz` yields `.gz`; `README`, `file.` and `.bashrc` yield `None`.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
}

/// Lazy iterator over the immediate entries of a directory.
///
/// Order follows the underlying directory listing and is not stable.
pub struct EntryIter {
    inner: ReadDir,
}

impl Iterator for EntryIter {
    type Item = io::Result<FileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|entry| entry.map(|e| FileEntry::from_dir_entry(&e)))
    }
}

/// Starts a non-recursive listing of `dir`.
pub fn scan_entries(dir: &Path) -> io::Result<EntryIter> {
    Ok(EntryIter {
        inner: fs::read_dir(dir)?,
    })
}
