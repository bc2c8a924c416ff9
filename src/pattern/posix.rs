//! Expansion of POSIX named character classes (`[:alpha:]` and friends)
//! inside bracket expressions.
//!
//! `globset` compiles everything else in §4.1's syntax table directly, but
//! has no notion of POSIX classes. This module performs the single
//! left-to-right preprocessing scan described in `spec.md` §4.1's
//! "Compilation procedure": it tracks whether the cursor is inside a `[...]`
//! bracket expression and rewrites any recognized `[:name:]` token in place
//! to its canonical character range, without ever emitting a nested
//! bracket into the rewritten pattern.

/// Canonical expansions, as listed in the GLOSSARY.
const CLASSES: &[(&str, &str)] = &[
    ("alnum", "a-zA-Z0-9"),
    ("alpha", "a-zA-Z"),
    ("ascii", "\u{0}-\u{7F}"),
    ("blank", " \t"),
    ("cntrl", "\u{0}-\u{1F}\u{7F}"),
    ("digit", "0-9"),
    ("graph", "\u{21}-\u{7E}"),
    ("lower", "a-z"),
    ("print", "\u{20}-\u{7E}"),
    ("punct", "\u{21}-\u{2F}\u{3A}-\u{40}\u{5B}-\u{60}\u{7B}-\u{7E}"),
    ("space", " \t\n\r\u{0B}\u{0C}"),
    ("upper", "A-Z"),
    ("word", "a-zA-Z0-9_"),
    ("xdigit", "0-9A-Fa-f"),
];

/// If `chars` starts with a well-formed `[:name:]` token naming a known
/// POSIX class, returns `(chars consumed, expansion)`.
fn match_posix_token(chars: &[char]) -> Option<(usize, &'static str)> {
    debug_assert_eq!(chars.first(), Some(&'['));
    debug_assert_eq!(chars.get(1), Some(&':'));

    let close = chars
        .windows(2)
        .enumerate()
        .skip(2)
        .find(|(_, w)| w[0] == ':' && w[1] == ']')
        .map(|(i, _)| i)?;

    let name: String = chars[2..close].iter().collect();
    let (_, expansion) = CLASSES.iter().find(|(n, _)| *n == name)?;
    Some((close + 2, expansion))
}

/// Rewrites every `[:name:]` POSIX class token found inside a bracket
/// expression of `pattern` to its literal character-range expansion.
/// Patterns with no bracket expressions, or no POSIX tokens, are returned
/// unchanged (aside from allocation).
pub fn expand_posix_classes(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(pattern.len());
    let mut i = 0;

    while i < n {
        let c = chars[i];
        if c == '\\' && i + 1 < n {
            out.push(c);
            out.push(chars[i + 1]);
            i += 2;
            continue;
        }
        if c != '[' {
            out.push(c);
            i += 1;
            continue;
        }

        // entering a bracket expression
        out.push('[');
        i += 1;
        if i < n && (chars[i] == '!' || chars[i] == '^') {
            out.push(chars[i]);
            i += 1;
        }

        let mut first = true;
        loop {
            if i >= n {
                // unterminated class: let globset reject this later.
                break;
            }
            let c = chars[i];
            if c == ']' && !first {
                out.push(']');
                i += 1;
                break;
            }
            if c == '[' && i + 1 < n && chars[i + 1] == ':' {
                if let Some((consumed, expansion)) = match_posix_token(&chars[i..]) {
                    out.push_str(expansion);
                    i += consumed;
                    first = false;
                    continue;
                }
            }
            out.push(c);
            i += 1;
            first = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_digit_class() {
        assert_eq!(expand_posix_classes("data[[:digit:]].log"), "data[0-9].log");
    }

    #[test]
    fn expands_within_negated_class() {
        assert_eq!(expand_posix_classes("[^[:space:]]"), "[^ \t\n\r\u{0B}\u{0C}]");
    }

    #[test]
    fn leaves_plain_classes_untouched() {
        assert_eq!(expand_posix_classes("file[0-9A-Za-z].txt"), "file[0-9A-Za-z].txt");
    }

    #[test]
    fn literal_closing_bracket_as_first_char() {
        // `]` right after `[` is literal, not a close.
        assert_eq!(expand_posix_classes("[]a]"), "[]a]");
    }

    #[test]
    fn literal_closing_bracket_after_negation() {
        assert_eq!(expand_posix_classes("[!]a]"), "[!]a]");
    }

    #[test]
    fn multiple_classes_in_one_bracket() {
        assert_eq!(
            expand_posix_classes("[[:digit:][:upper:]]"),
            "[0-9A-Z]"
        );
    }

    #[test]
    fn unknown_token_left_alone() {
        assert_eq!(expand_posix_classes("[[:bogus:]]"), "[[:bogus:]]");
    }

    #[test]
    fn escapes_are_not_disturbed() {
        assert_eq!(expand_posix_classes(r"\[:digit:\]"), r"\[:digit:\]");
    }
}
