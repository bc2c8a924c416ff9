//! Component F: the immutable value objects emitted in object mode.

use std::path::PathBuf;

/// An opaque directory-entry descriptor, exposing only the three type
/// queries the spec names (`is_file`, `is_directory`, `is_symlink`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct DirEntryKind {
    is_file: bool,
    is_directory: bool,
    is_symlink: bool,
}

impl DirEntryKind {
    pub fn new(is_file: bool, is_directory: bool, is_symlink: bool) -> Self {
        DirEntryKind {
            is_file,
            is_directory,
            is_symlink,
        }
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }
}

/// A single stat call, frozen at construction (`spec.md` §3's "Stats
/// record").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobEntryStats {
    pub size: u64,
    /// Unix seconds.
    pub atime: i64,
    /// Unix seconds.
    pub mtime: i64,
    /// Unix seconds.
    pub ctime: i64,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub inode: u64,
    pub nlink: u64,
    pub is_file: bool,
    pub is_directory: bool,
    pub is_symlink: bool,
}

/// The materialized output record in object mode (`spec.md` §6.4).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobEntry {
    pub path: PathBuf,
    pub name: String,
    #[cfg_attr(feature = "serde1", serde(skip_serializing_if = "Option::is_none"))]
    pub dirent: Option<DirEntryKind>,
    #[cfg_attr(feature = "serde1", serde(skip_serializing_if = "Option::is_none"))]
    pub stats: Option<GlobEntryStats>,
}

impl GlobEntry {
    pub fn new(path: PathBuf, dirent: Option<DirEntryKind>, stats: Option<GlobEntryStats>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        GlobEntry {
            path,
            name,
            dirent,
            stats,
        }
    }
}
