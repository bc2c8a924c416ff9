//! The filesystem abstraction (component A): a uniform, read-only view of
//! paths that the pattern matcher and the ignore-file evaluator are built
//! on top of. The default implementation ([`OsFileSystem`]) calls the host
//! OS; [`memory::InMemoryFileSystem`] is a deterministic test double that
//! satisfies the same contract, for callers (and this crate's own test
//! suite) that want to exercise traversal logic without touching disk.

mod memory;
mod os;

pub use memory::InMemoryFileSystem;
pub use os::OsFileSystem;

use std::path::{Path, PathBuf};

/// Options steering [`FileSystem::glob`].
///
/// Mirrors the subset of request-level options (§6.2) the low-level
/// shell-style glob call needs to know about; the orchestrator is
/// responsible for translating its own `Options` into this narrower
/// struct.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobFlags {
    /// Fold ASCII case when matching.
    pub case_insensitive: bool,
    /// Also attempt a match with a leading `.` on the basename, to catch
    /// dotfiles that a plain glob would otherwise skip.
    pub dot: bool,
    /// Append a trailing separator to directory matches.
    pub mark_directories: bool,
}

/// Read-only capability set that the core matching/filtering subsystems
/// are built against.
///
/// Most queries here are infallible from the caller's point of view:
/// failures collapse to a "not found"/empty answer rather than a
/// `Result`, matching §6.3 ("`read_file` returns empty on error — no
/// exception"). The two operations the primary traversal actually walks
/// with — [`FileSystem::read_dir_checked`] and [`FileSystem::glob`] — are
/// the exception: they report I/O failures so the orchestrator can honor
/// `suppressErrors` instead of always swallowing them.
pub trait FileSystem: Send + Sync {
    /// Whether anything exists at `path` (file, directory, or symlink).
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a directory (symlinks are followed).
    fn is_directory(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a regular file (symlinks are
    /// followed).
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` itself is a symlink (not followed).
    fn is_symlink(&self, path: &Path) -> bool;

    /// Resolves the target of a symlink, or `None` if `path` is not a
    /// symlink or the target does not exist.
    fn read_link(&self, path: &Path) -> Option<PathBuf>;

    /// Reads the full contents of `path` as a UTF-8 string. Returns an
    /// empty string on any error (missing file, permission denied,
    /// invalid UTF-8).
    fn read_file(&self, path: &Path) -> String;

    /// Lists the immediate children of a directory, swallowing any
    /// failure (missing path, not a directory, permission denied) into an
    /// empty vector. Used by callers for whom `spec.md` §4.3's recovery
    /// policy always swallows errors (ignore-file discovery), never by the
    /// primary traversal, which needs [`FileSystem::read_dir_checked`]'s
    /// distinction instead.
    fn read_dir(&self, path: &Path) -> Vec<PathBuf> {
        self.read_dir_checked(path).unwrap_or_default()
    }

    /// Lists the immediate children of a directory, distinguishing a
    /// missing or non-directory path (`Ok(vec![])` — per `spec.md` §4.2 "a
    /// non-existent base directory yields the empty sequence, never an
    /// error") from a real I/O failure on a directory that does exist
    /// (permission denied, vanished mid-scan). The primary traversal
    /// consults this directly so it can propagate the latter under
    /// `suppressErrors: false`.
    fn read_dir_checked(&self, path: &Path) -> std::io::Result<Vec<PathBuf>>;

    /// Shell-style glob: matches `pattern` (brace expansion included)
    /// against entries reachable from `root`, returning absolute paths.
    /// Fails with the first I/O error hit while descending (permission
    /// denied, vanished directory), so the primary traversal can decide
    /// whether to propagate it per `suppressErrors`.
    ///
    /// Per this crate's resolved Open Question (`SPEC_FULL.md` §4.2),
    /// this never shells out to the host OS glob; both provided
    /// implementations route through this crate's own compiler.
    fn glob(&self, root: &Path, pattern: &str, flags: GlobFlags) -> std::io::Result<Vec<PathBuf>>;

    /// Resolves `path` to its canonical, symlink-free form, or `None` if
    /// it cannot be resolved (does not exist, cycle, etc).
    fn realpath(&self, path: &Path) -> Option<PathBuf>;

    /// The process (or simulated) working directory.
    fn cwd(&self) -> Option<PathBuf>;

    /// Full stat data for `path`, consulted only when object-mode `stats`
    /// is requested (`spec.md` §3/§6.4). Returns `None` on any failure;
    /// the orchestrator turns that into `Error::CannotStatFile` itself,
    /// since only it knows whether stats were actually asked for.
    fn metadata(&self, path: &Path) -> Option<RawStat>;
}

/// The raw numbers behind a [`crate::entry::GlobEntryStats`], before the
/// orchestrator adds the type flags it already knows from its own
/// traversal bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct RawStat {
    pub size: u64,
    pub atime: i64,
    pub mtime: i64,
    pub ctime: i64,
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub inode: u64,
    pub nlink: u64,
}
