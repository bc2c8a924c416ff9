//! The glob compiler (component B): translates a human-written glob
//! pattern into a compiled, anchored matcher. Built on `globset`, which
//! already implements `*`, `**`, `?`, ranged/negated character classes,
//! brace alternation, and backslash escapes (§4.1); [`super::posix`]
//! supplies the one thing `globset` lacks, POSIX named classes.

use super::posix::expand_posix_classes;
use crate::error::{Error, Result};

/// Asterisks do not cross path-separator boundaries; only `**` does. This
/// is `spec.md` §4.1's requirement and is never configurable.
const LITERAL_SEPARATOR: bool = true;

/// A compiled pattern, ready to test candidate paths against.
///
/// Cloning is cheap (the underlying automaton is reference-counted by
/// `globset`), and a `Matcher` may be shared across threads for read-only
/// matching, per `spec.md` §3.
#[derive(Clone, Debug)]
pub struct Matcher {
    inner: Option<globset::GlobMatcher>,
}

impl Matcher {
    /// A matcher that rejects every input. Used when compilation fails,
    /// since `compile` must never throw (`spec.md` §4.1's failure mode).
    fn never() -> Self {
        Matcher { inner: None }
    }

    /// Tests `path` (already `/`-normalized) against this matcher.
    pub fn matches(&self, path: &str) -> bool {
        match &self.inner {
            Some(m) => m.is_match(path),
            None => false,
        }
    }
}

/// Builder for a single glob pattern.
///
/// Mirrors the teacher crate's `Builder`, generalized with POSIX-class
/// support and basename-only anchoring.
pub struct Builder<'a> {
    glob: &'a str,
    case_sensitive: bool,
    base_name_only: bool,
}

impl<'a> Builder<'a> {
    /// Creates a new builder for `glob`. Compilation is deferred until one
    /// of the `build*` methods is called.
    pub fn new(glob: &'a str) -> Self {
        Builder {
            glob,
            case_sensitive: true,
            base_name_only: false,
        }
    }

    /// Sets case sensitivity (`caseSensitiveMatch`, default `true`).
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// When set, the compiled matcher is anchored against a path's
    /// basename only, ignoring any directory components
    /// (`baseNameMatch`).
    pub fn base_name_only(mut self, yes: bool) -> Self {
        self.base_name_only = yes;
        self
    }

    fn preprocessed(&self) -> String {
        expand_posix_classes(self.glob)
    }

    fn glob_for(&self, glob: &str) -> std::result::Result<globset::Glob, globset::Error> {
        globset::GlobBuilder::new(glob)
            .literal_separator(LITERAL_SEPARATOR)
            .case_insensitive(!self.case_sensitive)
            .build()
    }

    /// Compiles this pattern into a [`Matcher`]. Infallible: a malformed
    /// class or unterminated brace yields a matcher that rejects all
    /// input rather than an error, per `spec.md` §4.1.
    pub fn compile(&self) -> Matcher {
        let rewritten = self.preprocessed();
        let source = if self.base_name_only {
            strip_to_basename_pattern(&rewritten)
        } else {
            rewritten
        };

        match self.glob_for(&source) {
            Ok(glob) => Matcher {
                inner: Some(glob.compile_matcher()),
            },
            Err(err) => {
                log::debug!("pattern '{}' failed to compile: {}", self.glob, err);
                Matcher::never()
            }
        }
    }

    /// Compiles this pattern into a fallible, low-level [`globset::GlobMatcher`]
    /// wrapper. Kept from the teacher crate for direct glob-to-matcher use;
    /// unlike [`Builder::compile`], errors are surfaced rather than
    /// swallowed, since this is a deliberate, explicit call a caller can
    /// choose to handle.
    pub fn build_glob(&self) -> Result<globset::GlobMatcher> {
        if self.glob.is_empty() {
            return Err(Error::InvalidPattern);
        }
        let source = self.preprocessed();
        self.glob_for(&source)
            .map(globset::Glob::compile_matcher)
            .map_err(|_| Error::InvalidPattern)
    }
}

/// An empty pattern, the spec says, matches only the empty string; a
/// genuinely empty `base_name_only` rewrite would instead match
/// everything under `globset`'s `**`, so this is handled explicitly.
fn strip_to_basename_pattern(glob: &str) -> String {
    if glob.is_empty() {
        return glob.to_string();
    }
    format!("**/{glob}")
}

/// True iff `pattern` contains any glob metacharacter (`* ? [ ] { }`).
pub fn is_dynamic(pattern: &str) -> bool {
    pattern
        .chars()
        .any(|c| matches!(c, '*' | '?' | '[' | ']' | '{' | '}'))
}

/// Returns a pattern that matches `path` literally: separators are
/// normalized to `/`, then each of `[ ] ( ) { } ? *` is escaped with a
/// leading backslash.
pub fn escape(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let mut out = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        if matches!(c, '[' | ']' | '(' | ')' | '{' | '}' | '?' | '*') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_matches_only_empty_string() {
        let m = Builder::new("").compile();
        assert!(m.matches(""));
        assert!(!m.matches("a"));
    }

    #[test]
    fn malformed_class_never_matches_and_does_not_panic() {
        let m = Builder::new("a[").compile();
        assert!(!m.matches("a["));
        assert!(!m.matches("anything"));
    }

    #[test]
    fn posix_class_is_honored() {
        let m = Builder::new("data[[:digit:]].log").compile();
        assert!(m.matches("data0.log"));
        assert!(m.matches("data9.log"));
        assert!(!m.matches("dataX.log"));
    }

    #[test]
    fn globstar_crosses_separators() {
        let m = Builder::new("a/**/b").compile();
        assert!(m.matches("a/b"));
        assert!(m.matches("a/x/y/b"));
    }

    #[test]
    fn star_does_not_cross_separators() {
        let m = Builder::new("*.txt").compile();
        assert!(m.matches("unicorn.txt"));
        assert!(!m.matches("nested/unicorn.txt"));
    }

    #[test]
    fn case_sensitivity_flag() {
        let sensitive = Builder::new("*.TXT").case_sensitive(true).compile();
        let insensitive = Builder::new("*.TXT").case_sensitive(false).compile();
        assert!(!sensitive.matches("a.txt"));
        assert!(insensitive.matches("a.txt"));
    }

    #[test]
    fn basename_only_anchoring() {
        let m = Builder::new("*.rs").base_name_only(true).compile();
        assert!(m.matches("a.rs"));
        assert!(m.matches("nested/deep/a.rs"));
        assert!(!m.matches("nested/deep/a.txt"));
    }

    #[test]
    fn is_dynamic_detects_metacharacters() {
        assert!(is_dynamic("*.txt"));
        assert!(is_dynamic("a?b"));
        assert!(is_dynamic("[abc]"));
        assert!(is_dynamic("{a,b}"));
        assert!(!is_dynamic("plain/path.txt"));
    }

    #[test]
    fn escape_round_trips() {
        let escaped = escape("weird[name]{v1}.txt");
        let m = Builder::new(&escaped).compile();
        assert!(m.matches("weird[name]{v1}.txt"));
        assert!(!m.matches("weirdXnameY.txt"));
    }
}
