//! Line-level parsing of an ignore file's contents into [`IgnoreRule`]s.

use std::path::Path;

use super::rule::IgnoreRule;
use crate::pattern::Builder;

/// Parses `contents` (the full text of one ignore file) into rules anchored
/// at `base_dir`, per `spec.md` §4.3's "File parsing" procedure.
pub fn parse_rules(contents: &str, base_dir: &Path) -> Vec<IgnoreRule> {
    contents
        .split('\n')
        .filter_map(|line| parse_line(line, base_dir))
        .collect()
}

fn parse_line(line: &str, base_dir: &Path) -> Option<IgnoreRule> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (negated, rest) = match trimmed.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (directory_only, rest) = match rest.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };

    if rest.is_empty() {
        return None;
    }

    let has_slash = rest.contains('/');
    let effective = if has_slash {
        rest.to_string()
    } else {
        format!("**/{rest}")
    };

    let matcher = Builder::new(&effective).compile();
    let basename_matcher = (!has_slash).then(|| Builder::new(rest).compile());

    Some(IgnoreRule {
        base_dir: base_dir.to_path_buf(),
        negated,
        directory_only,
        has_slash,
        matcher,
        basename_matcher,
    })
}
