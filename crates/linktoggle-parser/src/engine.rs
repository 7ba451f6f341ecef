//! Tokenizing engine - single source of truth for link scanning.
//!
//! This module provides the scanner that:
//! - Uses pulldown-cmark to find code blocks and inline code to exclude
//! - Uses regex for the link notations themselves
//! - Yields literal text and link tokens lazily, so a document is reassembled
//!   by concatenating every segment

use linktoggle_core::{ConversionSettings, Direction, LinkToken};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use std::ops::Range;
use std::sync::Arc;

use crate::parsers::{markdown_links, wikilinks};

// ============================================================================
// Scan options
// ============================================================================

/// Options controlling a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Leave code blocks and inline code untouched
    pub skip_code: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { skip_code: true }
    }
}

impl From<&ConversionSettings> for ScanOptions {
    fn from(settings: &ConversionSettings) -> Self {
        Self {
            skip_code: settings.skip_code,
        }
    }
}

// ============================================================================
// Excluded ranges (code blocks, inline code)
// ============================================================================

/// Byte ranges where link syntax must not be interpreted.
#[derive(Debug, Default, Clone)]
pub(crate) struct ExcludedRanges {
    ranges: Vec<Range<usize>>,
}

impl ExcludedRanges {
    /// Collect code regions of `content` with pulldown-cmark.
    pub(crate) fn from_code(content: &str) -> Self {
        let mut excluded = Self::default();
        let mut code_block_start: usize = 0;

        let parser = Parser::new_ext(content, Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);
        for (event, range) in parser.into_offset_iter() {
            match event {
                Event::Start(Tag::CodeBlock(_)) => code_block_start = range.start,
                Event::End(TagEnd::CodeBlock) => excluded.add(code_block_start..range.end),
                Event::Code(_) => excluded.add(range),
                _ => {}
            }
        }

        excluded.optimize();
        excluded
    }

    /// Check if a byte offset falls within any excluded range.
    #[inline]
    pub(crate) fn contains(&self, offset: usize) -> bool {
        if self.ranges.is_empty() {
            return false;
        }

        // First range starting after offset; the candidate is the one before it.
        let idx = self.ranges.partition_point(|r| r.start <= offset);
        if idx == 0 {
            return false;
        }
        offset < self.ranges[idx - 1].end
    }

    fn add(&mut self, range: Range<usize>) {
        self.ranges.push(range);
    }

    /// Sort and merge overlapping ranges for binary search.
    fn optimize(&mut self) {
        if self.ranges.is_empty() {
            return;
        }
        self.ranges.sort_by_key(|r| r.start);

        let mut merged = Vec::with_capacity(self.ranges.len());
        let mut current = self.ranges[0].clone();

        for range in self.ranges.iter().skip(1) {
            if range.start <= current.end {
                current.end = current.end.max(range.end);
            } else {
                merged.push(current);
                current = range.clone();
            }
        }
        merged.push(current);
        self.ranges = merged;
    }
}

// ============================================================================
// Segments
// ============================================================================

/// One piece of a scanned document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text between tokens (never empty)
    Text(&'a str),
    /// A link token of the scanned notation, or an image token
    Link(LinkToken<'a>),
}

impl<'a> Segment<'a> {
    /// The segment's original text
    pub fn as_str(&self) -> &'a str {
        match self {
            Self::Text(text) => text,
            Self::Link(token) => token.raw,
        }
    }

    /// The token, if this is a link segment
    pub fn into_token(self) -> Option<LinkToken<'a>> {
        match self {
            Self::Text(_) => None,
            Self::Link(token) => Some(token),
        }
    }
}

// ============================================================================
// Token stream
// ============================================================================

type TokenBuilder = for<'h> fn(&'h str, &Captures<'h>) -> Option<LinkToken<'h>>;

/// Lazy stream of [`Segment`]s over a document.
///
/// Cloning the stream restarts it from the current position; calling
/// [`crate::tokenize`] again restarts from the beginning.
#[derive(Clone)]
pub struct Tokens<'a> {
    content: &'a str,
    pattern: Option<&'static Regex>,
    build: TokenBuilder,
    excluded: Arc<ExcludedRanges>,
    /// End of the last emitted segment
    cursor: usize,
    /// Where the next regex search starts
    search_from: usize,
    pending: Option<LinkToken<'a>>,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(content: &'a str, direction: Direction, options: &ScanOptions) -> Self {
        let (has_candidates, pattern, build): (bool, &'static Regex, TokenBuilder) =
            match direction {
                Direction::WikiToMarkdown => (
                    wikilinks::has_wikilink(content),
                    &*wikilinks::WIKILINK,
                    wikilinks::token_from_captures as TokenBuilder,
                ),
                Direction::MarkdownToWiki => (
                    markdown_links::has_markdown_link(content),
                    &*markdown_links::MARKDOWN_LINK,
                    markdown_links::token_from_captures as TokenBuilder,
                ),
            };

        let excluded = if has_candidates && options.skip_code {
            ExcludedRanges::from_code(content)
        } else {
            ExcludedRanges::default()
        };

        Self {
            content,
            pattern: has_candidates.then_some(pattern),
            build,
            excluded: Arc::new(excluded),
            cursor: 0,
            search_from: 0,
            pending: None,
        }
    }

    /// Next well-formed token at or after `search_from`
    fn next_token(&mut self) -> Option<LinkToken<'a>> {
        let pattern = self.pattern?;

        while self.search_from < self.content.len() {
            let caps = pattern.captures_at(self.content, self.search_from)?;
            let full = caps.get(0)?;
            self.search_from = full.end();

            if self.excluded.contains(full.start()) {
                continue;
            }
            if let Some(token) = (self.build)(self.content, &caps) {
                return Some(token);
            }
            log::trace!("Leaving malformed link as text: {:?}", full.as_str());
        }

        None
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(Segment::Link(token));
        }

        if let Some(token) = self.next_token() {
            let before = &self.content[self.cursor..token.span.start];
            self.cursor = token.span.end;
            if before.is_empty() {
                return Some(Segment::Link(token));
            }
            self.pending = Some(token);
            return Some(Segment::Text(before));
        }

        if self.cursor < self.content.len() {
            let rest = &self.content[self.cursor..];
            self.cursor = self.content.len();
            return Some(Segment::Text(rest));
        }

        None
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use linktoggle_core::TokenKind;

    fn segments(content: &str, direction: Direction) -> Vec<Segment<'_>> {
        Tokens::new(content, direction, &ScanOptions::default()).collect()
    }

    fn reassemble(segments: &[Segment<'_>]) -> String {
        segments.iter().map(Segment::as_str).collect()
    }

    #[test]
    fn test_segments_are_lossless() {
        let content = "Intro [[A]] mid [[B|b]]\n![[img.png]] end [[]] tail";
        let segs = segments(content, Direction::WikiToMarkdown);
        assert_eq!(reassemble(&segs), content);

        let kinds: Vec<_> = segs
            .iter()
            .filter_map(|s| match s {
                Segment::Link(t) => Some(t.kind),
                Segment::Text(_) => None,
            })
            .collect();
        assert_eq!(kinds, vec![TokenKind::Wiki, TokenKind::Wiki, TokenKind::Image]);
    }

    #[test]
    fn test_adjacent_tokens_have_no_empty_text() {
        let segs = segments("[[A]][[B]]", Direction::WikiToMarkdown);
        assert_eq!(segs.len(), 2);
        assert!(segs.iter().all(|s| matches!(s, Segment::Link(_))));
    }

    #[test]
    fn test_text_only() {
        let segs = segments("plain text", Direction::WikiToMarkdown);
        assert_eq!(segs, vec![Segment::Text("plain text")]);
        assert!(segments("", Direction::MarkdownToWiki).is_empty());
    }

    #[test]
    fn test_direction_selects_notation() {
        let content = "[[Wiki]] and [md](note.md)";
        let wiki: Vec<_> = segments(content, Direction::WikiToMarkdown)
            .into_iter()
            .filter_map(Segment::into_token)
            .collect();
        assert_eq!(wiki.len(), 1);
        assert_eq!(wiki[0].target, "Wiki");

        let md: Vec<_> = segments(content, Direction::MarkdownToWiki)
            .into_iter()
            .filter_map(Segment::into_token)
            .collect();
        assert_eq!(md.len(), 1);
        assert_eq!(md[0].target, "note.md");
    }

    #[test]
    fn test_code_block_excludes_links() {
        let content = "[[Real]]\n\n```\n[[InCode]]\n```\n\nInline `[[Code]]` and [[After]]";
        let targets: Vec<_> = segments(content, Direction::WikiToMarkdown)
            .into_iter()
            .filter_map(Segment::into_token)
            .map(|t| t.target)
            .collect();
        assert_eq!(targets, vec!["Real", "After"]);
    }

    #[test]
    fn test_indented_code_block_excludes_markdown_links() {
        let content = "Para [a](a.md)\n\n    [b](b.md)\n\nAfter [c](c.md)";
        let targets: Vec<_> = segments(content, Direction::MarkdownToWiki)
            .into_iter()
            .filter_map(Segment::into_token)
            .map(|t| t.target)
            .collect();
        assert_eq!(targets, vec!["a.md", "c.md"]);
    }

    #[test]
    fn test_code_included_when_not_skipping() {
        let content = "`[[InCode]]`";
        let options = ScanOptions { skip_code: false };
        let tokens: Vec<_> = Tokens::new(content, Direction::WikiToMarkdown, &options)
            .filter_map(Segment::into_token)
            .collect();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_clone_restarts_from_position() {
        let options = ScanOptions::default();
        let mut tokens = Tokens::new("a [[B]] c", Direction::WikiToMarkdown, &options);
        assert_eq!(tokens.next(), Some(Segment::Text("a ")));
        let rest: Vec<_> = tokens.clone().collect();
        let rest_again: Vec<_> = tokens.collect();
        assert_eq!(rest, rest_again);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_excluded_ranges_merge() {
        let mut excluded = ExcludedRanges::default();
        excluded.add(10..20);
        excluded.add(0..5);
        excluded.add(15..25);
        excluded.optimize();
        assert_eq!(excluded.ranges, vec![0..5, 10..25]);
        assert!(excluded.contains(0));
        assert!(!excluded.contains(5));
        assert!(excluded.contains(24));
        assert!(!excluded.contains(25));
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        let content = "Café → [[Notes/Résumé]] ✓";
        let segs = segments(content, Direction::WikiToMarkdown);
        assert_eq!(reassemble(&segs), content);
    }
}
