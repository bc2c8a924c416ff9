//! A predictable, portable glob enumerator for developer tooling: build
//! systems, linters, formatters, and deployment scripts that need to
//! resolve a set of glob patterns against a filesystem the same way on
//! every platform.
//!
//! The crate is organized as a small pipeline of narrow components, each
//! usable on its own:
//!
//! - [`fs`] — the filesystem abstraction every other component is built
//!   against, so traversal logic can be exercised against an in-memory
//!   fixture as easily as the real disk.
//! - [`pattern`] — compiles glob syntax (wildcards, character classes
//!   including POSIX named classes, brace alternation, escapes) into a
//!   matcher, and walks a root directory against it.
//! - [`ignore`] — parses `.gitignore`-style ignore files and decides
//!   whether a path is excluded under the rules collected for a
//!   directory neighborhood.
//! - [`glob`] — the orchestrator: normalizes patterns, expands directory
//!   shorthands, applies negation/gitignore/ignore-glob exclusion,
//!   filters by type, finalizes paths, dedups, sorts, and optionally
//!   shapes output into entry records.
//!
//! # Example
//!
//! ```
//! use globsift::Options;
//!
//! let options = Options::builder().cwd(std::env::temp_dir()).build();
//! let _ = globsift::glob("*.txt", &options);
//! ```

pub mod entry;
pub mod error;
pub mod fs;
pub mod glob;
pub mod ignore;
pub mod options;
pub mod pattern;
pub mod stream;
pub mod tasks;

pub use entry::{DirEntryKind, GlobEntry, GlobEntryStats};
pub use error::{Error, Result};
pub use glob::{escape, glob, is_dynamic, is_ignored, is_ignored_by_files, GlobOutput, Patterns};
pub use options::{DirectoryExpansion, ExpandDirectories, IgnoreFiles, Options, OptionsBuilder, Value};
pub use pattern::{matches_path, Builder, Matcher};
pub use stream::{stream, Stream};
pub use tasks::{generate_tasks, Task};
