//! Component E: the glob orchestrator, implementing the full 16-step
//! pipeline from `spec.md` §4.4.
//!
//! Generalizes the teacher's `wrappers::match_paths` (fan out compiled
//! matchers, apply pre/post filters, sort, dedup) into the complete
//! pipeline: pattern partitioning, directory-shorthand expansion,
//! negation, gitignore/ignore-files/ignore-glob exclusion, type
//! filtering, broken-symlink detection, path finalization, and output
//! shaping.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::entry::{DirEntryKind, GlobEntry, GlobEntryStats};
use crate::error::{Error, Result};
use crate::fs::{FileSystem, OsFileSystem};
use crate::ignore::IgnoreEvaluator;
use crate::options::{ExpandDirectories, Options};
use crate::pattern::{self, Builder, WalkOptions};

/// The universal positive pattern prepended when a request supplies only
/// negative patterns (`spec.md` §4.4 step 3).
const UNIVERSAL_PATTERN: &str = "**/*";

/// A single glob result, shaped according to `Options::object_mode`.
#[derive(Debug, Clone)]
pub enum GlobOutput {
    Path(PathBuf),
    Entry(GlobEntry),
}

impl GlobOutput {
    pub fn path(&self) -> &Path {
        match self {
            GlobOutput::Path(p) => p,
            GlobOutput::Entry(e) => &e.path,
        }
    }
}

/// Accepts a single pattern, or a list — step 1 of the pipeline coerces
/// this and rejects anything else with `Error::InvalidPatternType`.
pub enum Patterns {
    One(String),
    Many(Vec<String>),
}

impl From<&str> for Patterns {
    fn from(s: &str) -> Self {
        Patterns::One(s.to_string())
    }
}

impl From<String> for Patterns {
    fn from(s: String) -> Self {
        Patterns::One(s)
    }
}

impl From<Vec<String>> for Patterns {
    fn from(v: Vec<String>) -> Self {
        Patterns::Many(v)
    }
}

impl From<Vec<&str>> for Patterns {
    fn from(v: Vec<&str>) -> Self {
        Patterns::Many(v.into_iter().map(String::from).collect())
    }
}

pub(crate) fn coerce_patterns(patterns: Patterns) -> Vec<String> {
    match patterns {
        Patterns::One(p) => vec![p],
        Patterns::Many(p) => p,
    }
}

/// Step 1's typed-rejection path for callers building a pattern list out
/// of loosely-typed values (e.g. the same map-based construction
/// `Options::from_map` supports). A string or list of strings coerces
/// cleanly; anything else is the "reject non-string values with a typed
/// error" case `spec.md` §4.4 step 1 describes.
impl TryFrom<crate::options::Value> for Patterns {
    type Error = Error;

    fn try_from(value: crate::options::Value) -> Result<Self> {
        match value {
            crate::options::Value::Str(s) => Ok(Patterns::One(s)),
            crate::options::Value::StrList(list) => Ok(Patterns::Many(list)),
            crate::options::Value::Bool(_) => Err(Error::InvalidPatternType("bool")),
            crate::options::Value::Int(_) => Err(Error::InvalidPatternType("int")),
        }
    }
}

pub(crate) fn resolve_fs(options: &Options) -> Arc<dyn FileSystem> {
    options
        .fs
        .clone()
        .unwrap_or_else(|| Arc::new(OsFileSystem::new()))
}

pub(crate) fn resolve_cwd(fs: &dyn FileSystem, options: &Options) -> Result<PathBuf> {
    let cwd = options
        .cwd
        .clone()
        .or_else(|| fs.cwd())
        .ok_or_else(|| Error::DirectoryNotFound(PathBuf::from(".")))?;
    if !fs.is_directory(&cwd) {
        return Err(Error::DirectoryNotFound(cwd));
    }
    Ok(cwd)
}

/// Step 3: split into positive/negative patterns, stripping the leading
/// `!`. If only negatives remain, the universal positive is prepended.
pub(crate) fn partition(patterns: Vec<String>) -> (Vec<String>, Vec<String>) {
    let mut positives = Vec::new();
    let mut negatives = Vec::new();
    for pattern in patterns {
        match pattern.strip_prefix('!') {
            Some(rest) => negatives.push(rest.to_string()),
            None => positives.push(pattern),
        }
    }
    if positives.is_empty() && !negatives.is_empty() {
        positives.push(UNIVERSAL_PATTERN.to_string());
    }
    (positives, negatives)
}

/// Step 4: rewrite any positive pattern that resolves to an existing
/// directory under `cwd`, per `expandDirectories`.
pub(crate) fn expand_directories(
    fs: &dyn FileSystem,
    cwd: &Path,
    positives: &[String],
    expand: &ExpandDirectories,
) -> Vec<String> {
    let mut out = Vec::new();
    for pattern in positives {
        let candidate = cwd.join(pattern);
        if !fs.is_directory(&candidate) {
            out.push(pattern.clone());
            continue;
        }
        match expand {
            ExpandDirectories::Enabled(false) => out.push(pattern.clone()),
            ExpandDirectories::Enabled(true) => out.push(format!("{pattern}/**/*")),
            ExpandDirectories::Selective(selective) => {
                for file in &selective.files {
                    out.push(format!("{pattern}/**/{file}"));
                }
                for ext in &selective.extensions {
                    out.push(format!("{pattern}/**/*.{ext}"));
                }
                if selective.files.is_empty() && selective.extensions.is_empty() {
                    out.push(pattern.clone());
                }
            }
        }
    }
    out
}

fn walk_options(options: &Options) -> WalkOptions {
    WalkOptions {
        dot: options.dot,
        deep: options.deep,
        follow_symbolic_links: options.follow_symbolic_links,
        case_sensitive_match: options.case_sensitive_match,
        base_name_match: options.base_name_match,
        suppress_errors: options.suppress_errors,
    }
}

/// Step 5: run the matcher for each expanded positive pattern,
/// concatenating results. Propagates `Error::Traversal` from any pattern
/// unless `suppressErrors` is set (`spec.md` §4.3's recovery policy).
fn run_matchers(fs: &dyn FileSystem, cwd: &Path, patterns: &[String], options: &Options) -> Result<Vec<PathBuf>> {
    let opts = walk_options(options);
    let mut out = Vec::new();
    for pattern in patterns {
        let effective = if options.base_name_match && !Path::new(pattern).is_absolute() {
            format!("**/{pattern}")
        } else {
            pattern.clone()
        };
        out.extend(pattern::enumerate(fs, &effective, cwd, opts)?);
    }
    Ok(out)
}

/// Step 6: drop entries that match every negative pattern.
fn exclude_negatives(candidates: Vec<PathBuf>, negatives: &[String], cwd: &Path) -> Vec<PathBuf> {
    if negatives.is_empty() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|path| !negatives.iter().all(|n| pattern::matches_path(path, n, cwd)))
        .collect()
}

/// Steps 7–9: gitignore, explicit ignore-files, and plain ignore globs.
fn exclude_ignored(fs: &dyn FileSystem, candidates: Vec<PathBuf>, cwd: &Path, options: &Options) -> Vec<PathBuf> {
    let mut candidates = candidates;

    if options.gitignore {
        let evaluator = IgnoreEvaluator::new(fs);
        let rules = evaluator.collect_for(cwd, options.deep);
        candidates.retain(|path| !evaluator.is_ignored(path, &rules, cwd));
    }

    if !options.ignore_files.0.is_empty() {
        let evaluator = IgnoreEvaluator::new(fs);
        let rules = evaluator.collect_from(&options.ignore_files.0, cwd);
        candidates.retain(|path| !evaluator.is_ignored(path, &rules, cwd));
    }

    if !options.ignore.is_empty() {
        let matchers: Vec<_> = options
            .ignore
            .iter()
            .map(|glob| Builder::new(glob).case_sensitive(options.case_sensitive_match).compile())
            .collect();
        candidates.retain(|path| {
            let relative = path.strip_prefix(cwd).unwrap_or(path);
            let candidate = relative.to_string_lossy().replace('\\', "/");
            !matchers.iter().any(|m| m.matches(&candidate))
        });
    }

    candidates
}

/// Step 10: filter by entry type.
fn filter_by_type(fs: &dyn FileSystem, candidates: Vec<PathBuf>, options: &Options) -> Vec<PathBuf> {
    if !options.only_files && !options.only_directories {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|path| {
            if options.only_files {
                fs.is_file(path)
            } else {
                fs.is_directory(path)
            }
        })
        .collect()
}

/// Step 11: abort on the first broken symlink, if requested.
fn check_broken_symlinks(fs: &dyn FileSystem, candidates: &[PathBuf]) -> Result<()> {
    for path in candidates {
        if fs.is_symlink(path) && fs.read_link(path).is_none() {
            return Err(Error::BrokenSymbolicLink(path.clone()));
        }
    }
    Ok(())
}

/// Steps 12–13: directory marks, then path finalization (absolute vs.
/// relative).
fn finalize_paths(fs: &dyn FileSystem, candidates: Vec<PathBuf>, cwd: &Path, options: &Options) -> Vec<PathBuf> {
    candidates
        .into_iter()
        .map(|path| {
            let mut path = path;
            if options.mark_directories && fs.is_directory(&path) {
                let mut s = path.into_os_string();
                s.push(std::path::MAIN_SEPARATOR.to_string());
                path = PathBuf::from(s);
            }
            if options.absolute {
                path
            } else {
                path.strip_prefix(cwd).map(Path::to_path_buf).unwrap_or(path)
            }
        })
        .collect()
}

/// Step 14: dedup preserving first occurrence.
fn dedup_preserving_order(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths.into_iter().filter(|p| seen.insert(p.clone())).collect()
}

fn build_stats(raw: crate::fs::RawStat, is_file: bool, is_directory: bool, is_symlink: bool) -> GlobEntryStats {
    GlobEntryStats {
        size: raw.size,
        atime: raw.atime,
        mtime: raw.mtime,
        ctime: raw.ctime,
        mode: raw.mode,
        uid: raw.uid,
        gid: raw.gid,
        inode: raw.inode,
        nlink: raw.nlink,
        is_file,
        is_directory,
        is_symlink,
    }
}

/// Step 16: shape each finalized path into plain strings or entry
/// records.
fn shape_output(fs: &dyn FileSystem, paths: Vec<PathBuf>, options: &Options) -> Result<Vec<GlobOutput>> {
    if !options.object_mode {
        return Ok(paths.into_iter().map(GlobOutput::Path).collect());
    }

    paths
        .into_iter()
        .map(|path| {
            let is_file = fs.is_file(&path);
            let is_directory = fs.is_directory(&path);
            let is_symlink = fs.is_symlink(&path);
            let dirent = Some(DirEntryKind::new(is_file, is_directory, is_symlink));

            let stats = if options.stats {
                let raw = fs.metadata(&path).ok_or_else(|| Error::CannotStatFile {
                    path: path.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "stat failed"),
                })?;
                Some(build_stats(raw, is_file, is_directory, is_symlink))
            } else {
                None
            };

            Ok(GlobOutput::Entry(GlobEntry::new(path, dirent, stats)))
        })
        .collect()
}

/// `glob(patterns, options) -> list of entries`, per `spec.md` §4.4.
pub fn glob(patterns: impl Into<Patterns>, options: &Options) -> Result<Vec<GlobOutput>> {
    let fs = resolve_fs(options);
    let raw_patterns = coerce_patterns(patterns.into());
    let cwd = resolve_cwd(fs.as_ref(), options)?;

    let (positives, negatives) = partition(raw_patterns);
    let expanded = expand_directories(fs.as_ref(), &cwd, &positives, &options.expand_directories);

    let candidates = run_matchers(fs.as_ref(), &cwd, &expanded, options)?;
    let candidates = exclude_negatives(candidates, &negatives, &cwd);
    let candidates = exclude_ignored(fs.as_ref(), candidates, &cwd, options);
    let candidates = filter_by_type(fs.as_ref(), candidates, options);

    if options.throw_error_on_broken_symbolic_link {
        check_broken_symlinks(fs.as_ref(), &candidates)?;
    }

    let mut finalized = finalize_paths(fs.as_ref(), candidates, &cwd, options);
    if options.unique {
        finalized = dedup_preserving_order(finalized);
    }
    finalized.sort_by(|a, b| a.as_os_str().as_encoded_bytes().cmp(b.as_os_str().as_encoded_bytes()));

    shape_output(fs.as_ref(), finalized, options)
}

/// `is_dynamic(pattern)`, re-exported at the crate root per `spec.md`
/// §4.4's introspection helpers.
pub fn is_dynamic(pattern: &str) -> bool {
    pattern::is_dynamic(pattern)
}

/// `escape(path)`, re-exported at the crate root.
pub fn escape(path: &str) -> String {
    pattern::escape(path)
}

/// `is_ignored(path, options)`: true iff `path` would be excluded by the
/// gitignore-neighborhood rules collected for `options.cwd`.
pub fn is_ignored(path: &Path, options: &Options) -> Result<bool> {
    let fs = resolve_fs(options);
    let cwd = resolve_cwd(fs.as_ref(), options)?;
    let evaluator = IgnoreEvaluator::new(fs.as_ref());
    let rules = evaluator.collect_for(&cwd, options.deep);
    Ok(evaluator.is_ignored(path, &rules, &cwd))
}

/// `is_ignored_by_files(path, files, options)`: true iff `path` would be
/// excluded by rules collected from the named ignore files.
pub fn is_ignored_by_files(path: &Path, files: &[String], options: &Options) -> Result<bool> {
    let fs = resolve_fs(options);
    let cwd = resolve_cwd(fs.as_ref(), options)?;
    let evaluator = IgnoreEvaluator::new(fs.as_ref());
    let rules = evaluator.collect_from(files, &cwd);
    Ok(evaluator.is_ignored(path, &rules, &cwd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::InMemoryFileSystem;
    use std::sync::Arc;

    fn fixture() -> Arc<InMemoryFileSystem> {
        let fs = InMemoryFileSystem::new("/fx");
        fs.write_file("/fx/unicorn.txt", "");
        fs.write_file("/fx/cake.txt", "");
        fs.write_file("/fx/rainbow.txt", "");
        fs.write_file("/fx/.hidden", "");
        fs.write_file("/fx/.gitignore", "cake.txt\n");
        fs.write_file("/fx/nested/file1.php", "");
        fs.write_file("/fx/nested/deep/secret.txt", "");
        fs.write_file("/fx/nested/deep/readme.md", "");
        fs.write_file("/fx/docs/guide.md", "");
        Arc::new(fs)
    }

    fn opts(fs: Arc<InMemoryFileSystem>) -> Options {
        Options::builder().cwd(PathBuf::from("/fx")).fs(fs).build()
    }

    fn paths_of(results: Vec<GlobOutput>) -> Vec<String> {
        results
            .iter()
            .map(|o| o.path().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn scenario_simple_glob_sorted() {
        let fs = fixture();
        let results = glob("*.txt", &opts(fs)).unwrap();
        assert_eq!(paths_of(results), vec!["cake.txt", "rainbow.txt", "unicorn.txt"]);
    }

    #[test]
    fn scenario_negation_pattern() {
        let fs = fixture();
        let results = glob(vec!["*.txt", "!cake.txt"], &opts(fs)).unwrap();
        assert_eq!(paths_of(results), vec!["rainbow.txt", "unicorn.txt"]);
    }

    #[test]
    fn scenario_gitignore() {
        let fs = fixture();
        let mut options = opts(fs);
        options.gitignore = true;
        let results = glob("*.txt", &options).unwrap();
        assert_eq!(paths_of(results), vec!["rainbow.txt", "unicorn.txt"]);
    }

    #[test]
    fn scenario_globstar_markdown() {
        let fs = fixture();
        let results = glob("**/*.md", &opts(fs)).unwrap();
        assert_eq!(paths_of(results), vec!["docs/guide.md", "nested/deep/readme.md"]);
    }

    #[test]
    fn scenario_dot_policy() {
        let fs = fixture();
        let mut options = opts(fs.clone());
        options.dot = true;
        let results = glob("*", &options).unwrap();
        assert!(paths_of(results).contains(&".hidden".to_string()));

        let options_no_dot = opts(fs);
        let results = glob("*", &options_no_dot).unwrap();
        assert!(!paths_of(results).contains(&".hidden".to_string()));
    }

    #[test]
    fn scenario_directory_shorthand_matches_explicit_globstar() {
        let fs = fixture();
        let shorthand = glob("nested", &opts(fs.clone())).unwrap();
        let explicit = glob("nested/**/*", &opts(fs)).unwrap();
        assert_eq!(paths_of(shorthand), paths_of(explicit));
    }

    #[test]
    fn directory_not_found_is_reported() {
        let fs = fixture();
        let mut options = opts(fs);
        options.cwd = Some(PathBuf::from("/does/not/exist"));
        assert!(matches!(glob("*", &options), Err(Error::DirectoryNotFound(_))));
    }

    #[test]
    fn unique_dedups_overlapping_patterns() {
        let fs = fixture();
        let results = glob(vec!["*.txt", "*.txt"], &opts(fs)).unwrap();
        let paths = paths_of(results);
        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(paths, unique);
    }

    #[test]
    fn object_mode_attaches_dirent() {
        let fs = fixture();
        let mut options = opts(fs);
        options.object_mode = true;
        let results = glob("cake.txt", &options).unwrap();
        match &results[0] {
            GlobOutput::Entry(entry) => {
                assert_eq!(entry.name, "cake.txt");
                assert!(entry.dirent.unwrap().is_file());
            }
            GlobOutput::Path(_) => panic!("expected an entry"),
        }
    }

    #[test]
    fn byte_wise_sort_orders_dot_before_slash() {
        let fs = InMemoryFileSystem::new("/fx");
        fs.write_file("/fx/a.b", "");
        fs.write_file("/fx/a/b", "");
        let options = opts(Arc::new(fs));
        let results = glob(vec!["a.b", "a/b"], &options).unwrap();
        // Byte-wise, `.` (0x2E) sorts before `/` (0x2F), so `a.b` precedes
        // `a/b` even though `Path`'s component-wise `Ord` would not agree.
        assert_eq!(paths_of(results), vec!["a.b", "a/b"]);
    }

    #[test]
    fn unreadable_subtree_aborts_by_default_and_is_swallowed_when_requested() {
        let make_fs = || {
            let fs = InMemoryFileSystem::new("/fx");
            fs.write_file("/fx/unicorn.txt", "");
            fs.make_unreadable_dir("/fx/locked");
            Arc::new(fs)
        };

        let strict = opts(make_fs());
        assert!(matches!(glob("**/*", &strict), Err(Error::Traversal { .. })));

        let lenient = Options::builder()
            .cwd(PathBuf::from("/fx"))
            .fs(make_fs())
            .suppress_errors(true)
            .build();
        let results = glob("**/*", &lenient).unwrap();
        assert!(paths_of(results).contains(&"unicorn.txt".to_string()));
    }

    #[test]
    fn patterns_try_from_rejects_non_string_values() {
        use crate::options::Value;
        assert!(Patterns::try_from(Value::Bool(true)).is_err());
        assert!(Patterns::try_from(Value::Int(1)).is_err());
        assert!(matches!(
            Patterns::try_from(Value::Str("*.txt".to_string())),
            Ok(Patterns::One(_))
        ));
    }
}
