use std::path::PathBuf;

/// The error type shared by every fallible operation in this crate.
///
/// All variants carry enough context to identify the offending input; the
/// `Invalid*` variants arise from mistakes made by the caller (and can be
/// checked for before a request is ever dispatched), the rest arise from
/// the state of the filesystem at call time.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured `cwd` does not resolve to an existing directory.
    #[error("directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// `throwErrorOnBrokenSymbolicLink` is set and a result entry is a
    /// symlink whose target does not exist.
    #[error("broken symbolic link: {0}")]
    BrokenSymbolicLink(PathBuf),

    /// Stats were requested for an entry but the underlying `stat` call
    /// failed.
    #[error("cannot stat file '{path}': {source}")]
    CannotStatFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A helper that demands an existing file was called on a path with
    /// none.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// A file exists but could not be read.
    #[error("file unreadable '{path}': {source}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A helper that demands a directory was called on a path that is not
    /// one.
    #[error("not a directory: {0}")]
    PathNotDirectory(PathBuf),

    /// An empty pattern was supplied where a non-empty one is required.
    #[error("invalid pattern: pattern must not be empty")]
    InvalidPattern,

    /// A pattern argument was neither a string nor a list of strings.
    #[error("invalid pattern type: expected a string or a list of strings, got {0}")]
    InvalidPatternType(&'static str),

    /// Traversal hit a filesystem error (permission denied, vanished
    /// directory) and `suppressErrors` was not set.
    #[error("traversal error at '{path}': {source}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
