//! A single parsed line from an ignore file.

use std::path::PathBuf;

use crate::pattern::Matcher;

/// One rule, already anchored to the directory its ignore file lives in.
#[derive(Clone, Debug)]
pub struct IgnoreRule {
    /// The directory the rule's pattern is relative to.
    pub base_dir: PathBuf,
    /// Whether the rule negates a previous match (`!pattern`).
    pub negated: bool,
    /// Whether the rule only applies to directories (trailing `/`).
    pub directory_only: bool,
    /// Whether the original pattern (before the `**/` rewrite) contained a
    /// `/`, used to decide whether a basename-only fallback match applies.
    pub has_slash: bool,
    /// The compiled matcher for the (possibly rewritten) pattern.
    pub matcher: Matcher,
    /// A second matcher over the bare basename, used only when
    /// `!has_slash` (`spec.md` §4.3: "also attempt a basename match").
    pub basename_matcher: Option<Matcher>,
}
