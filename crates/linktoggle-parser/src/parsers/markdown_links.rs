//! Markdown link parser: `[text](path)`, `[text](path "title")`,
//! `[text](<path with spaces>)`, and images `![alt](img.png)`.

use linktoggle_core::utils::is_uri_absolute;
use linktoggle_core::{LinkToken, TokenKind};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::link_utils::{decode_link_path, split_fragment, unescape_destination};

/// Matches markdown links and images.
///
/// The destination runs up to the first unescaped whitespace or `)`, or is
/// wrapped in angle brackets. An optional quoted title follows.
pub(crate) static MARKDOWN_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<bang>!?)\[(?P<text>[^\[\]]+)\]\((?:<(?P<angle>[^<>\n]+)>|(?P<path>(?:\\.|[^()\s\\])+))(?:\s+(?:"[^"]*"|'[^']*'))?\s*\)"#,
    )
    .unwrap()
});

/// Fast pre-filter: skip regex if no markdown link pattern exists.
#[inline]
pub(crate) fn has_markdown_link(content: &str) -> bool {
    content.contains("](")
}

/// Build a token from a [`MARKDOWN_LINK`] match.
///
/// Returns `None` when the match must stay plain text: a same-document
/// anchor (empty path), an absolute URI, or an undecodable path.
pub(crate) fn token_from_captures<'a>(
    content: &'a str,
    caps: &Captures<'a>,
) -> Option<LinkToken<'a>> {
    let full = caps.get(0)?;
    let is_image = caps.name("bang").is_some_and(|m| !m.as_str().is_empty());
    let text = caps.name("text")?.as_str();

    let destination = match caps.name("angle") {
        Some(angle) => angle.as_str().to_string(),
        None => unescape_destination(caps.name("path")?.as_str()),
    };

    let (link_path, fragment) = split_fragment(&destination);
    if !is_image && (link_path.is_empty() || is_uri_absolute(link_path)) {
        return None;
    }

    let target = decode_link_path(link_path)?;
    let fragment =
        fragment.map(|f| decode_link_path(f).unwrap_or_else(|| f.to_string()));

    Some(LinkToken {
        kind: if is_image {
            TokenKind::Image
        } else {
            TokenKind::Markdown
        },
        span: full.range(),
        raw: &content[full.range()],
        target,
        fragment,
        alias: text.to_string(),
    })
}

/// Parse all markdown links and images from content, ignoring code regions.
///
/// # Example
/// ```
/// use linktoggle_parser::parse_markdown_links;
///
/// let links = parse_markdown_links("[text](Folder/Note.md) and [other](../a.md#Intro)");
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[1].target, "../a.md");
/// assert_eq!(links[1].fragment.as_deref(), Some("Intro"));
/// ```
pub fn parse_markdown_links(content: &str) -> Vec<LinkToken<'_>> {
    crate::tokenize(
        content,
        linktoggle_core::Direction::MarkdownToWiki,
        &crate::ScanOptions::default(),
    )
    .filter_map(crate::Segment::into_token)
    .collect()
}
