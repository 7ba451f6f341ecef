//! Single-text link conversion: tokenize, resolve, format, reassemble.

use linktoggle_core::prelude::*;
use linktoggle_core::utils::strip_default_extension;
use linktoggle_parser::parsers::link_utils::{encode_fragment, encode_link_path};
use linktoggle_parser::{ScanOptions, Segment, tokenize};
use linktoggle_resolver::{PathFormatter, TargetResolver};

/// Result of converting one text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextConversion {
    /// Converted text; identical to the input when nothing was rewritten
    pub content: String,
    /// Number of tokens rewritten
    pub rewritten: usize,
}

/// Converts the links of one text between notations.
///
/// Conversion is synchronous and infallible: tokens that cannot be resolved,
/// excluded targets, images and malformed tokens keep their original text.
///
/// ```
/// use linktoggle_batch::LinkConverter;
/// use linktoggle_core::{ConversionSettings, Direction, DocumentId};
/// use linktoggle_resolver::{CorpusIndex, TargetResolver};
///
/// let index: CorpusIndex = ["Folder/Note.md", "Current.md"]
///     .into_iter()
///     .map(|p| DocumentId::new(p).unwrap())
///     .collect();
/// let settings = ConversionSettings::default();
/// let converter = LinkConverter::new(TargetResolver::new(&index), &settings);
/// let source = DocumentId::new("Current.md").unwrap();
///
/// let result = converter.convert("See [[Note|the note]].", &source, Direction::WikiToMarkdown);
/// assert_eq!(result.content, "See [the note](/Folder/Note.md).");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LinkConverter<'a> {
    resolver: TargetResolver<'a>,
    formatter: PathFormatter,
    settings: &'a ConversionSettings,
    scan: ScanOptions,
}

impl<'a> LinkConverter<'a> {
    pub fn new(resolver: TargetResolver<'a>, settings: &'a ConversionSettings) -> Self {
        Self {
            resolver,
            formatter: PathFormatter::from_settings(settings),
            settings,
            scan: ScanOptions::from(settings),
        }
    }

    /// Convert every rewritable token of the notation `direction` converts from
    pub fn convert(&self, text: &str, source: &DocumentId, direction: Direction) -> TextConversion {
        let mut content = String::with_capacity(text.len() + text.len() / 8);
        let mut rewritten = 0;

        for segment in tokenize(text, direction, &self.scan) {
            let replacement = match &segment {
                Segment::Text(_) => None,
                Segment::Link(token) => self.rewrite(token, source, direction),
            };
            match replacement {
                Some(new_token) => {
                    rewritten += 1;
                    content.push_str(&new_token);
                }
                None => content.push_str(segment.as_str()),
            }
        }

        if rewritten == 0 {
            return TextConversion {
                content: text.to_string(),
                rewritten,
            };
        }
        TextConversion { content, rewritten }
    }

    /// Rewritten token text, or `None` to keep the original
    fn rewrite(
        &self,
        token: &LinkToken<'_>,
        source: &DocumentId,
        direction: Direction,
    ) -> Option<String> {
        if !token.is_rewritable() {
            return None;
        }

        let resolved = self.resolver.resolve(&token.target, source, direction);
        let document = resolved.document()?;
        if self.settings.is_excluded(document) {
            log::trace!("Keeping {} (excluded extension)", token.raw);
            return None;
        }

        match direction {
            Direction::WikiToMarkdown => Some(self.to_markdown(token, document, source)),
            Direction::MarkdownToWiki => to_wiki(token, document),
        }
    }

    fn to_markdown(
        &self,
        token: &LinkToken<'_>,
        document: &DocumentId,
        source: &DocumentId,
    ) -> String {
        let mut href = encode_link_path(&self.formatter.format(document.as_str(), source));
        if let Some(fragment) = &token.fragment {
            href.push('#');
            href.push_str(&encode_fragment(fragment));
        }
        format!("[{}]({})", token.alias, href)
    }
}

/// Characters that would end or split a `[[...]]` token
const WIKI_RESERVED: &[char] = &['|', '[', ']', '#'];

/// `[[display#fragment]]`, with `|text` only when the text adds something.
///
/// `None` when the display name or the decoded fragment contains a
/// character the wikilink syntax cannot carry.
fn to_wiki(token: &LinkToken<'_>, document: &DocumentId) -> Option<String> {
    let display = document.wiki_name();
    let fragment_reserved = token
        .fragment
        .as_deref()
        .is_some_and(|fragment| fragment.contains(WIKI_RESERVED));
    if display.contains(WIKI_RESERVED) || fragment_reserved {
        log::trace!("Keeping {} (not expressible as a wikilink)", token.raw);
        return None;
    }

    let core = match &token.fragment {
        Some(fragment) => format!("{display}#{fragment}"),
        None => display.to_string(),
    };

    let text = token.alias.as_str();
    if text == strip_default_extension(display) || text == display || text == core {
        Some(format!("[[{core}]]"))
    } else {
        Some(format!("[[{core}|{text}]]"))
    }
}
