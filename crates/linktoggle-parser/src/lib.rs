//! # Links Toggler Parser
//!
//! Lossless tokenizer for the two link notations:
//! wikilinks (`[[Target#frag|Alias]]`, embeds `![[img.png]]`) and
//! markdown links (`[Alias](path#frag "title")`, images `![alt](img.png)`).
//!
//! ## Architecture
//!
//! Scanning is a two-phase pass:
//!
//! ### Phase 1: pulldown-cmark pass
//! - Collects code blocks and inline code as excluded byte ranges
//!
//! ### Phase 2: Regex pass
//! - Matches the notation selected by the [`Direction`]
//! - Skips matches starting inside an excluded range
//! - Leaves malformed matches (`[[]]`, `[[#Heading]]`) as literal text
//!
//! The result is a lazy stream of [`Segment`]s. Concatenating the segments'
//! text always reproduces the input byte for byte.
//!
//! ## Quick Start
//!
//! ```
//! use linktoggle_parser::{tokenize, ScanOptions, Segment};
//! use linktoggle_core::Direction;
//!
//! let text = "See [[Folder/Note#Intro|the intro]] and `[[not a link]]`.";
//! let segments: Vec<Segment> =
//!     tokenize(text, Direction::WikiToMarkdown, &ScanOptions::default()).collect();
//!
//! let rebuilt: String = segments.iter().map(Segment::as_str).collect();
//! assert_eq!(rebuilt, text);
//!
//! let links: Vec<_> = segments.into_iter().filter_map(Segment::into_token).collect();
//! assert_eq!(links.len(), 1);
//! assert_eq!(links[0].target, "Folder/Note");
//! assert_eq!(links[0].fragment.as_deref(), Some("Intro"));
//! assert_eq!(links[0].alias, "the intro");
//! ```

mod engine;
pub mod parsers;

pub use engine::{ScanOptions, Segment, Tokens};
pub use parsers::markdown_links::parse_markdown_links;
pub use parsers::wikilinks::parse_wikilinks;

// Re-export core types for consumers
pub use linktoggle_core::{Direction, LinkToken, TokenKind};

/// Split `text` into literal text and link tokens of the notation `direction`
/// converts from.
///
/// Wiki-to-markdown scans wikilinks; markdown-to-wiki scans markdown links.
/// Image tokens of the scanned notation are yielded too so callers can see
/// them, but they are never rewritable.
pub fn tokenize<'a>(text: &'a str, direction: Direction, options: &ScanOptions) -> Tokens<'a> {
    Tokens::new(text, direction, options)
}

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        ScanOptions, Segment, Tokens, parse_markdown_links, parse_wikilinks, tokenize,
    };
    pub use linktoggle_core::{Direction, LinkToken, TokenKind};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, direction: Direction) -> Vec<String> {
        tokenize(text, direction, &ScanOptions::default())
            .map(|segment| match segment {
                Segment::Text(t) => format!("text {t:?}"),
                Segment::Link(token) => format!(
                    "{:?} {:?} target={:?} fragment={:?} alias={:?}",
                    token.kind, token.raw, token.target, token.fragment, token.alias
                ),
            })
            .collect()
    }

    #[test]
    fn test_mixed_document_wiki_scan() {
        let text = "# Title\n\n[[A]] then ![[pic.png]] then [md](b.md)\n\n```\n[[Code]]\n```\n";
        insta::assert_debug_snapshot!(render(text, Direction::WikiToMarkdown), @r###"
        [
            "text \"# Title\\n\\n\"",
            "Wiki \"[[A]]\" target=\"A\" fragment=None alias=\"A\"",
            "text \" then \"",
            "Image \"![[pic.png]]\" target=\"pic.png\" fragment=None alias=\"pic.png\"",
            "text \" then [md](b.md)\\n\\n```\\n[[Code]]\\n```\\n\"",
        ]
        "###);
    }

    #[test]
    fn test_tokenize_is_restartable() {
        let text = "[x](x.md) [y](y.md)";
        let options = ScanOptions::default();
        let first: Vec<_> = tokenize(text, Direction::MarkdownToWiki, &options).collect();
        let second: Vec<_> = tokenize(text, Direction::MarkdownToWiki, &options).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
