//! The lazy counterpart to [`crate::glob::glob`].
//!
//! `spec.md` §4.4 asks for a single-pass, non-restartable sequence whose
//! errors are all raised at or before the first yield — never partway
//! through. Since every step of the pipeline before the final sort
//! (§4.4 steps 1–15) needs the full candidate set before it can decide
//! anything (dedup, sort, exclusion by negation), there is no genuine
//! streaming opportunity earlier than the final shaping step; this
//! module runs the whole pipeline eagerly at construction time and hands
//! back an iterator over the already-computed result, satisfying the
//! "no partial results" contract exactly while keeping one code path for
//! both entry points.

use crate::error::Result;
use crate::glob::{GlobOutput, Patterns};
use crate::options::Options;

/// A single-pass, non-restartable sequence of [`GlobOutput`]s.
pub struct Stream {
    items: std::vec::IntoIter<GlobOutput>,
}

impl Stream {
    /// `stream(patterns, options) -> lazy sequence of entries`. All
    /// validation (cwd resolution, pattern typing, traversal) happens
    /// here, before the first call to `next()`.
    pub fn new(patterns: impl Into<Patterns>, options: &Options) -> Result<Self> {
        let items = crate::glob::glob(patterns, options)?;
        Ok(Stream {
            items: items.into_iter(),
        })
    }
}

impl Iterator for Stream {
    type Item = GlobOutput;

    fn next(&mut self) -> Option<Self::Item> {
        self.items.next()
    }
}

/// `stream(patterns, options) -> lazy sequence of entries`, per `spec.md`
/// §4.4.
pub fn stream(patterns: impl Into<Patterns>, options: &Options) -> Result<Stream> {
    Stream::new(patterns, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn stream_yields_the_same_entries_as_glob() {
        let fs = InMemoryFileSystem::new("/fx");
        fs.write_file("/fx/a.txt", "");
        fs.write_file("/fx/b.txt", "");
        let options = Options::builder()
            .cwd(PathBuf::from("/fx"))
            .fs(Arc::new(fs))
            .build();

        let collected: Vec<_> = stream("*.txt", &options)
            .unwrap()
            .map(|o| o.path().to_path_buf())
            .collect();
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn stream_raises_validation_errors_eagerly() {
        let fs = InMemoryFileSystem::new("/fx");
        let mut options = Options::builder().fs(Arc::new(fs)).build();
        options.cwd = Some(PathBuf::from("/nope"));
        assert!(stream("*", &options).is_err());
    }

    #[test]
    fn stream_is_cooperatively_cancellable() {
        let fs = InMemoryFileSystem::new("/fx");
        fs.write_file("/fx/a.txt", "");
        fs.write_file("/fx/b.txt", "");
        fs.write_file("/fx/c.txt", "");
        let options = Options::builder()
            .cwd(PathBuf::from("/fx"))
            .fs(Arc::new(fs))
            .build();

        let mut seq = stream("*.txt", &options).unwrap();
        let first = seq.next();
        assert!(first.is_some());
        drop(seq);
    }
}
