//! Component E's configuration surface: the immutable `Options` record,
//! its builder, and the map-based constructor `spec.md` §9 calls for.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::fs::FileSystem;

/// `expandDirectories`'s non-boolean form: recurse into a matched
/// directory but only for the named files and/or extensions.
#[derive(Debug, Clone, Default)]
pub struct DirectoryExpansion {
    pub files: Vec<String>,
    pub extensions: Vec<String>,
}

/// The three shapes `expandDirectories` can take.
#[derive(Debug, Clone)]
pub enum ExpandDirectories {
    Enabled(bool),
    Selective(DirectoryExpansion),
}

impl Default for ExpandDirectories {
    fn default() -> Self {
        ExpandDirectories::Enabled(true)
    }
}

/// `ignoreFiles`'s string-or-list shape.
#[derive(Debug, Clone, Default)]
pub struct IgnoreFiles(pub Vec<String>);

/// The immutable bundle of recognized options (`spec.md` §6.2 / §3).
///
/// Constructed through [`OptionsBuilder`] or [`Options::from_map`]; there
/// is no public way to construct one with `onlyFiles` and
/// `onlyDirectories` both true, since the builder reconciles them at
/// construction time per the spec's invariant.
#[derive(Clone)]
pub struct Options {
    pub cwd: Option<PathBuf>,
    pub expand_directories: ExpandDirectories,
    pub gitignore: bool,
    pub ignore_files: IgnoreFiles,
    pub ignore: Vec<String>,
    pub only_files: bool,
    pub only_directories: bool,
    pub dot: bool,
    pub deep: Option<usize>,
    pub follow_symbolic_links: bool,
    pub suppress_errors: bool,
    pub absolute: bool,
    pub unique: bool,
    pub mark_directories: bool,
    pub case_sensitive_match: bool,
    pub base_name_match: bool,
    pub throw_error_on_broken_symbolic_link: bool,
    pub object_mode: bool,
    pub stats: bool,
    pub fs: Option<Arc<dyn FileSystem>>,
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("cwd", &self.cwd)
            .field("gitignore", &self.gitignore)
            .field("only_files", &self.only_files)
            .field("only_directories", &self.only_directories)
            .field("dot", &self.dot)
            .field("deep", &self.deep)
            .field("stats", &self.stats)
            .field("object_mode", &self.object_mode)
            .finish_non_exhaustive()
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            cwd: None,
            expand_directories: ExpandDirectories::default(),
            gitignore: false,
            ignore_files: IgnoreFiles::default(),
            ignore: Vec::new(),
            only_files: true,
            only_directories: false,
            dot: false,
            deep: None,
            follow_symbolic_links: true,
            suppress_errors: false,
            absolute: false,
            unique: true,
            mark_directories: false,
            case_sensitive_match: true,
            base_name_match: false,
            throw_error_on_broken_symbolic_link: false,
            object_mode: false,
            stats: false,
            fs: None,
        }
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Builds an `Options` from a loosely-typed map, matching the
    /// teacher's "from map" convenience constructor. Keys of the wrong
    /// shape are silently discarded and the default for that field is
    /// kept — this mirrors the observed behavior the spec documents for
    /// callers passing invalid types.
    pub fn from_map(map: &HashMap<String, Value>) -> Options {
        let mut builder = OptionsBuilder::default();

        if let Some(Value::Str(s)) = map.get("cwd") {
            builder = builder.cwd(PathBuf::from(s));
        }
        if let Some(Value::Bool(b)) = map.get("gitignore") {
            builder = builder.gitignore(*b);
        }
        if let Some(value) = map.get("ignoreFiles") {
            match value {
                Value::Str(s) => builder = builder.ignore_files(vec![s.clone()]),
                Value::StrList(list) => builder = builder.ignore_files(list.clone()),
                _ => {}
            }
        }
        if let Some(Value::StrList(list)) = map.get("ignore") {
            builder = builder.ignore(list.clone());
        }
        if let Some(Value::Bool(b)) = map.get("onlyFiles") {
            builder = builder.only_files(*b);
        }
        if let Some(Value::Bool(b)) = map.get("onlyDirectories") {
            builder = builder.only_directories(*b);
        }
        if let Some(Value::Bool(b)) = map.get("dot") {
            builder = builder.dot(*b);
        }
        if let Some(value) = map.get("deep") {
            match value {
                Value::Int(n) if *n >= 0 => builder = builder.deep(Some(*n as usize)),
                _ => {}
            }
        }
        if let Some(Value::Bool(b)) = map.get("followSymbolicLinks") {
            builder = builder.follow_symbolic_links(*b);
        }
        if let Some(Value::Bool(b)) = map.get("suppressErrors") {
            builder = builder.suppress_errors(*b);
        }
        if let Some(Value::Bool(b)) = map.get("absolute") {
            builder = builder.absolute(*b);
        }
        if let Some(Value::Bool(b)) = map.get("unique") {
            builder = builder.unique(*b);
        }
        if let Some(Value::Bool(b)) = map.get("markDirectories") {
            builder = builder.mark_directories(*b);
        }
        if let Some(Value::Bool(b)) = map.get("caseSensitiveMatch") {
            builder = builder.case_sensitive_match(*b);
        }
        if let Some(Value::Bool(b)) = map.get("baseNameMatch") {
            builder = builder.base_name_match(*b);
        }
        if let Some(Value::Bool(b)) = map.get("throwErrorOnBrokenSymbolicLink") {
            builder = builder.throw_error_on_broken_symbolic_link(*b);
        }
        if let Some(Value::Bool(b)) = map.get("objectMode") {
            builder = builder.object_mode(*b);
        }
        if let Some(Value::Bool(b)) = map.get("stats") {
            builder = builder.stats(*b);
        }

        builder.build()
    }
}

/// The minimal dynamically-typed value `Options::from_map` accepts.
/// Deliberately hand-rolled rather than pulling in a JSON crate: this
/// crate's map constructor only ever needs to distinguish these four
/// shapes, never arbitrary nested JSON.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
    StrList(Vec<String>),
}

/// Builds an [`Options`], enforcing the `onlyFiles`/`onlyDirectories`
/// mutual exclusion and the `stats` ⇒ `objectMode` implication at
/// construction time rather than leaving them as runtime checks callers
/// might skip.
#[derive(Default)]
pub struct OptionsBuilder {
    inner: Options,
}

impl OptionsBuilder {
    pub fn cwd(mut self, cwd: PathBuf) -> Self {
        self.inner.cwd = Some(cwd);
        self
    }

    pub fn expand_directories(mut self, value: ExpandDirectories) -> Self {
        self.inner.expand_directories = value;
        self
    }

    pub fn gitignore(mut self, yes: bool) -> Self {
        self.inner.gitignore = yes;
        self
    }

    pub fn ignore_files(mut self, files: Vec<String>) -> Self {
        self.inner.ignore_files = IgnoreFiles(files);
        self
    }

    pub fn ignore(mut self, globs: Vec<String>) -> Self {
        self.inner.ignore = globs;
        self
    }

    pub fn only_files(mut self, yes: bool) -> Self {
        self.inner.only_files = yes;
        if yes {
            self.inner.only_directories = false;
        }
        self
    }

    pub fn only_directories(mut self, yes: bool) -> Self {
        self.inner.only_directories = yes;
        if yes {
            self.inner.only_files = false;
        }
        self
    }

    pub fn dot(mut self, yes: bool) -> Self {
        self.inner.dot = yes;
        self
    }

    pub fn deep(mut self, deep: Option<usize>) -> Self {
        self.inner.deep = deep;
        self
    }

    pub fn follow_symbolic_links(mut self, yes: bool) -> Self {
        self.inner.follow_symbolic_links = yes;
        self
    }

    pub fn suppress_errors(mut self, yes: bool) -> Self {
        self.inner.suppress_errors = yes;
        self
    }

    pub fn absolute(mut self, yes: bool) -> Self {
        self.inner.absolute = yes;
        self
    }

    pub fn unique(mut self, yes: bool) -> Self {
        self.inner.unique = yes;
        self
    }

    pub fn mark_directories(mut self, yes: bool) -> Self {
        self.inner.mark_directories = yes;
        self
    }

    pub fn case_sensitive_match(mut self, yes: bool) -> Self {
        self.inner.case_sensitive_match = yes;
        self
    }

    pub fn base_name_match(mut self, yes: bool) -> Self {
        self.inner.base_name_match = yes;
        self
    }

    pub fn throw_error_on_broken_symbolic_link(mut self, yes: bool) -> Self {
        self.inner.throw_error_on_broken_symbolic_link = yes;
        self
    }

    pub fn object_mode(mut self, yes: bool) -> Self {
        self.inner.object_mode = yes;
        self
    }

    pub fn stats(mut self, yes: bool) -> Self {
        self.inner.stats = yes;
        if yes {
            self.inner.object_mode = true;
        }
        self
    }

    pub fn fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.inner.fs = Some(fs);
        self
    }

    pub fn build(self) -> Options {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_files_and_only_directories_are_mutually_exclusive() {
        let opts = Options::builder().only_files(true).only_directories(true).build();
        assert!(opts.only_directories);
        assert!(!opts.only_files);

        let opts = Options::builder().only_directories(true).only_files(true).build();
        assert!(opts.only_files);
        assert!(!opts.only_directories);
    }

    #[test]
    fn stats_implies_object_mode() {
        let opts = Options::builder().stats(true).build();
        assert!(opts.object_mode);
    }

    #[test]
    fn defaults_match_the_documented_table() {
        let opts = Options::default();
        assert!(opts.only_files);
        assert!(!opts.only_directories);
        assert!(!opts.gitignore);
        assert!(opts.follow_symbolic_links);
        assert!(opts.unique);
        assert!(opts.case_sensitive_match);
        assert_eq!(opts.deep, None);
    }

    #[test]
    fn from_map_ignores_wrong_shaped_values() {
        let mut map = HashMap::new();
        map.insert("dot".to_string(), Value::Str("not-a-bool".to_string()));
        map.insert("deep".to_string(), Value::Int(-1));
        let opts = Options::from_map(&map);
        assert!(!opts.dot);
        assert_eq!(opts.deep, None);
    }

    #[test]
    fn from_map_reads_well_shaped_values() {
        let mut map = HashMap::new();
        map.insert("dot".to_string(), Value::Bool(true));
        map.insert("deep".to_string(), Value::Int(3));
        map.insert("cwd".to_string(), Value::Str("/tmp/x".to_string()));
        let opts = Options::from_map(&map);
        assert!(opts.dot);
        assert_eq!(opts.deep, Some(3));
        assert_eq!(opts.cwd, Some(PathBuf::from("/tmp/x")));
    }
}
