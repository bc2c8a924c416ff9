//! `generate_tasks`: runs only steps 1–4 of the orchestrator pipeline
//! (coerce, resolve `cwd`, partition, expand directory shorthands) and
//! returns the resulting task record without touching the filesystem
//! any further.

use crate::error::Result;
use crate::glob::{self, Patterns};
use crate::options::Options;

/// `{ patterns, options }` plus the stripped negative patterns, per
/// `spec.md` §4.4's `generate_tasks` contract.
#[derive(Debug, Clone)]
pub struct Task {
    /// Positive patterns, after directory-shorthand expansion.
    pub patterns: Vec<String>,
    pub options: Options,
    /// Negative patterns (the `!` already stripped).
    pub negative: Vec<String>,
}

/// `generate_tasks(patterns, options) -> Task`, per `spec.md` §4.4.
pub fn generate_tasks(patterns: impl Into<Patterns>, options: &Options) -> Result<Task> {
    let fs = glob::resolve_fs(options);
    let cwd = glob::resolve_cwd(fs.as_ref(), options)?;

    let raw = glob::coerce_patterns(patterns.into());
    let (positives, negative) = glob::partition(raw);
    let expanded = glob::expand_directories(fs.as_ref(), &cwd, &positives, &options.expand_directories);

    Ok(Task {
        patterns: expanded,
        options: options.clone(),
        negative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;
    use std::path::PathBuf;
    use std::sync::Arc;

    #[test]
    fn expands_directory_shorthand_without_touching_more_of_the_filesystem() {
        let fs = InMemoryFileSystem::new("/fx");
        fs.write_file("/fx/nested/a.txt", "");
        let options = Options::builder()
            .cwd(PathBuf::from("/fx"))
            .fs(Arc::new(fs))
            .build();

        let task = generate_tasks("nested", &options).unwrap();
        assert_eq!(task.patterns, vec!["nested/**/*"]);
        assert!(task.negative.is_empty());
    }

    #[test]
    fn splits_positive_and_negative_patterns() {
        let fs = InMemoryFileSystem::new("/fx");
        let options = Options::builder()
            .cwd(PathBuf::from("/fx"))
            .fs(Arc::new(fs))
            .build();

        let task = generate_tasks(vec!["*.txt", "!cake.txt"], &options).unwrap();
        assert_eq!(task.patterns, vec!["*.txt"]);
        assert_eq!(task.negative, vec!["cake.txt"]);
    }

    #[test]
    fn only_negatives_prepend_the_universal_pattern() {
        let fs = InMemoryFileSystem::new("/fx");
        let options = Options::builder()
            .cwd(PathBuf::from("/fx"))
            .fs(Arc::new(fs))
            .build();

        let task = generate_tasks(vec!["!cake.txt"], &options).unwrap();
        assert_eq!(task.patterns, vec!["**/*"]);
    }
}
