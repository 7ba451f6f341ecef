//! Shared utilities for splitting and encoding link components.
//!
//! Used by both notation parsers so fragments, escapes and percent-encoding
//! are handled the same way in every direction.

/// Find the first occurrence of `needle` not preceded by a backslash.
///
/// ```
/// use linktoggle_parser::parsers::link_utils::find_unescaped;
///
/// assert_eq!(find_unescaped("Note|Alias", '|'), Some(4));
/// assert_eq!(find_unescaped(r"a\|b|c", '|'), Some(4));
/// assert_eq!(find_unescaped(r"a\|b", '|'), None);
/// ```
pub fn find_unescaped(haystack: &str, needle: char) -> Option<usize> {
    let mut escaped = false;
    for (idx, ch) in haystack.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
        } else if ch == needle {
            return Some(idx);
        }
    }
    None
}

/// Split `target#fragment` on the first `#`.
///
/// Both halves are trimmed; an empty fragment becomes `None`.
///
/// ```
/// use linktoggle_parser::parsers::link_utils::split_fragment;
///
/// assert_eq!(split_fragment("Note#Heading"), ("Note", Some("Heading")));
/// assert_eq!(split_fragment("Note#^block"), ("Note", Some("^block")));
/// assert_eq!(split_fragment("Note#"), ("Note", None));
/// assert_eq!(split_fragment("Note"), ("Note", None));
/// ```
pub fn split_fragment(target: &str) -> (&str, Option<&str>) {
    match target.split_once('#') {
        Some((base, fragment)) => {
            let fragment = fragment.trim();
            (base.trim(), (!fragment.is_empty()).then_some(fragment))
        }
        None => (target.trim(), None),
    }
}

/// Remove backslash escapes in front of whitespace and parentheses
pub fn unescape_destination(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\'
            && let Some(&next) = chars.peek()
            && (next.is_whitespace() || next == '(' || next == ')')
        {
            out.push(next);
            chars.next();
            continue;
        }
        out.push(ch);
    }
    out
}

/// Percent-decode a link path. `None` when the result is not valid UTF-8.
pub fn decode_link_path(path: &str) -> Option<String> {
    urlencoding::decode(path).ok().map(|decoded| decoded.into_owned())
}

/// Percent-encode a link path segment by segment, keeping `/` separators.
///
/// ```
/// use linktoggle_parser::parsers::link_utils::encode_link_path;
///
/// assert_eq!(encode_link_path("/Folder/My Note.md"), "/Folder/My%20Note.md");
/// assert_eq!(encode_link_path("../Note (1).md"), "../Note%20%281%29.md");
/// ```
pub fn encode_link_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Encode a fragment only when it would otherwise break the link token.
///
/// Heading and block ids such as `^abc123` are carried through verbatim.
pub fn encode_fragment(fragment: &str) -> String {
    let needs_encoding = fragment
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>' | '%'));
    if needs_encoding {
        urlencoding::encode(fragment).into_owned()
    } else {
        fragment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_unescaped_trailing_backslash() {
        assert_eq!(find_unescaped("abc\\", '|'), None);
        assert_eq!(find_unescaped("", '|'), None);
    }

    #[test]
    fn test_split_fragment_only_first_hash() {
        assert_eq!(split_fragment("Note#A#B"), ("Note", Some("A#B")));
        assert_eq!(split_fragment(" Note # Heading "), ("Note", Some("Heading")));
        assert_eq!(split_fragment("#Heading"), ("", Some("Heading")));
    }

    #[test]
    fn test_unescape_destination() {
        assert_eq!(unescape_destination(r"My\ Note.md"), "My Note.md");
        assert_eq!(unescape_destination(r"a\(1\).md"), "a(1).md");
        assert_eq!(unescape_destination(r"a\b.md"), r"a\b.md");
    }

    #[test]
    fn test_decode_link_path() {
        assert_eq!(
            decode_link_path("Folder/My%20Note.md").as_deref(),
            Some("Folder/My Note.md")
        );
        assert_eq!(decode_link_path("100%.md").as_deref(), Some("100%.md"));
        assert_eq!(decode_link_path("%FF%FE.md"), None);
    }

    #[test]
    fn test_encode_keeps_plain_paths() {
        assert_eq!(encode_link_path("/Folder/Note.md"), "/Folder/Note.md");
        assert_eq!(encode_link_path("Note.md"), "Note.md");
    }

    #[test]
    fn test_encode_fragment() {
        assert_eq!(encode_fragment("^block1"), "^block1");
        assert_eq!(encode_fragment("Heading"), "Heading");
        assert_eq!(encode_fragment("My Heading"), "My%20Heading");
    }

    #[test]
    fn test_encode_then_decode_restores() {
        let original = "/Projects/Q1 (draft)/Plan & Notes.md";
        let encoded = encode_link_path(original);
        assert!(!encoded.contains(' '));
        assert_eq!(decode_link_path(&encoded).as_deref(), Some(original));
    }
}
