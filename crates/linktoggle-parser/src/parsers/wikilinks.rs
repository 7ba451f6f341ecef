//! Wikilink parser: `[[Note]]`, `[[folder/Note]]`, `[[Note#Heading]]`,
//! `[[Note#^block|Alias]]`, and embeds `![[image.png]]`.

use linktoggle_core::{LinkToken, TokenKind};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::link_utils::{find_unescaped, split_fragment};

/// Matches `[[...]]` (optionally `!`-prefixed) with no brackets inside
pub(crate) static WIKILINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(!?)\[\[([^\[\]]*)\]\]").unwrap());

/// Fast pre-filter: skip regex if no wikilink opener exists.
#[inline]
pub(crate) fn has_wikilink(content: &str) -> bool {
    content.contains("[[")
}

/// Build a token from a [`WIKILINK`] match.
///
/// Returns `None` for malformed tokens (no base), which stay plain text.
pub(crate) fn token_from_captures<'a>(
    content: &'a str,
    caps: &Captures<'a>,
) -> Option<LinkToken<'a>> {
    let full = caps.get(0)?;
    let is_embed = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
    let inner = caps.get(2)?.as_str();

    let (target_and_fragment, alias) = match find_unescaped(inner, '|') {
        Some(pipe) => (inner[..pipe].trim(), Some(inner[pipe + 1..].trim())),
        None => (inner.trim(), None),
    };

    if target_and_fragment.is_empty() {
        return None;
    }

    let (base, fragment) = split_fragment(target_and_fragment);
    if base.is_empty() {
        return None;
    }

    let alias = match alias {
        Some(alias) if !alias.is_empty() => alias,
        _ => base,
    };

    Some(LinkToken {
        kind: if is_embed {
            TokenKind::Image
        } else {
            TokenKind::Wiki
        },
        span: full.range(),
        raw: &content[full.range()],
        target: base.to_string(),
        fragment: fragment.map(str::to_string),
        alias: alias.to_string(),
    })
}

/// Parse all wikilinks and wiki embeds from content, ignoring code regions.
///
/// # Example
/// ```
/// use linktoggle_parser::parse_wikilinks;
///
/// let links = parse_wikilinks("See [[Note]] and [[Other|alias]]");
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].target, "Note");
/// assert_eq!(links[1].alias, "alias");
/// ```
pub fn parse_wikilinks(content: &str) -> Vec<LinkToken<'_>> {
    crate::tokenize(
        content,
        linktoggle_core::Direction::WikiToMarkdown,
        &crate::ScanOptions::default(),
    )
    .filter_map(crate::Segment::into_token)
    .collect()
}
