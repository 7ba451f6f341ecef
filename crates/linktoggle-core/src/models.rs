//! Core data models for link conversion.
//!
//! These types are designed to be:
//! - **Serializable**: reports derive Serialize/Deserialize for host display
//! - **Type-Safe**: enums replace the "wiki-to-md" style magic strings
//! - **Borrowing**: tokens borrow their raw text from the scanned document

use crate::error::{Error, Result};
use crate::utils::{DEFAULT_EXTENSION, split_segments};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Corpus-relative document path, forward-slash separated.
///
/// Construction normalizes separators and drops empty and `.` segments, so two
/// ids compare equal exactly when they address the same document.
///
/// ```
/// use linktoggle_core::DocumentId;
///
/// let id = DocumentId::new("Folder/Sub/Note.md").unwrap();
/// assert_eq!(id.file_name(), "Note.md");
/// assert_eq!(id.stem(), "Note");
/// assert_eq!(id.extension(), Some("md"));
/// assert_eq!(id.folder(), "Folder/Sub");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Create a document id from a corpus-relative path
    pub fn new(path: impl AsRef<str>) -> Result<Self> {
        let raw = path.as_ref().replace('\\', "/");
        let segments = split_segments(&raw);

        if segments.is_empty() {
            return Err(Error::invalid_path(format!(
                "document path is empty: {:?}",
                path.as_ref()
            )));
        }
        if segments.contains(&"..") {
            return Err(Error::path_traversal(raw));
        }

        Ok(Self(segments.join("/")))
    }

    /// The full corpus-relative path
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment, e.g. `Note.md`
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Extension without the dot, if the file name has one
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 && idx + 1 < name.len() => Some(&name[idx + 1..]),
            _ => None,
        }
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match self.extension() {
            Some(ext) => &name[..name.len() - ext.len() - 1],
            None => name,
        }
    }

    /// Containing folder, empty for documents at the corpus root
    pub fn folder(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// Segments of the containing folder
    pub fn folder_segments(&self) -> Vec<&str> {
        split_segments(self.folder())
    }

    /// Case-insensitive extension check (`ext` without the dot)
    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension()
            .is_some_and(|own| own.eq_ignore_ascii_case(ext))
    }

    /// Whether this is a document of the managed (markdown) type
    pub fn is_markdown(&self) -> bool {
        self.has_extension(DEFAULT_EXTENSION)
    }

    /// Name used inside a wikilink: the stem for markdown documents,
    /// the full file name for everything else.
    pub fn wiki_name(&self) -> &str {
        if self.is_markdown() {
            self.stem()
        } else {
            self.file_name()
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DocumentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

/// A document and its full text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub content: String,
}

impl Document {
    /// Create a document
    pub fn new(id: DocumentId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// Which documents a store listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// Only documents of the managed type (`.md`)
    Markdown,
    /// Every file in the corpus, attachments included
    All,
}

impl DocumentKind {
    /// Whether a document id belongs to this kind
    pub fn matches(self, id: &DocumentId) -> bool {
        match self {
            Self::Markdown => id.is_markdown(),
            Self::All => true,
        }
    }
}

/// Conversion direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `[[Note]]` → `[Note](/Note.md)`
    #[serde(rename = "wiki-to-md")]
    WikiToMarkdown,
    /// `[Note](/Note.md)` → `[[Note]]`
    #[serde(rename = "md-to-wiki")]
    MarkdownToWiki,
}

impl Direction {
    /// Stable command-style name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::WikiToMarkdown => "wiki-to-md",
            Self::MarkdownToWiki => "md-to-wiki",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wiki-to-md" | "wiki-to-markdown" => Ok(Self::WikiToMarkdown),
            "md-to-wiki" | "markdown-to-wiki" => Ok(Self::MarkdownToWiki),
            other => Err(Error::config_error(format!(
                "unknown direction '{other}' (expected wiki-to-md or md-to-wiki)"
            ))),
        }
    }
}

/// Notation of a scanned link token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// `[[Target#frag|Alias]]`
    Wiki,
    /// `[Alias](path#frag "title")`
    Markdown,
    /// Embedded media, `![alt](img.png)` or `![[img.png]]`. Never rewritten.
    Image,
}

/// A link-shaped span of a document's text.
///
/// Tokens are produced per conversion pass and borrow the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkToken<'a> {
    pub kind: TokenKind,
    /// Byte range of the token in the scanned text
    pub span: Range<usize>,
    /// The token exactly as it appears in the text
    pub raw: &'a str,
    /// Wiki base or decoded markdown link path, without fragment
    pub target: String,
    /// Heading or block reference, without the leading `#`
    pub fragment: Option<String>,
    /// Display text; for wikilinks without an alias this is the target
    pub alias: String,
}

impl LinkToken<'_> {
    /// Whether the token can ever be rewritten
    pub fn is_rewritable(&self) -> bool {
        self.kind != TokenKind::Image
    }
}

/// Outcome of resolving a raw link target against the corpus.
///
/// Resolution is binary: either a document was found or the raw string is
/// echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvedTarget {
    /// Canonical corpus document
    Document(DocumentId),
    /// Resolution failed; the original raw target
    Unresolved(String),
}

impl ResolvedTarget {
    /// Whether resolution succeeded
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Document(_))
    }

    /// The resolved document, if any
    pub fn document(&self) -> Option<&DocumentId> {
        match self {
            Self::Document(id) => Some(id),
            Self::Unresolved(_) => None,
        }
    }

    /// Path string: the canonical path or the echoed raw target
    pub fn as_path(&self) -> &str {
        match self {
            Self::Document(id) => id.as_str(),
            Self::Unresolved(raw) => raw,
        }
    }
}

/// Classification of one document in a bulk run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// No rewrite happened
    Unchanged,
    /// Content would change; not written (safe mode)
    WouldChange,
    /// Content changed and the write completed
    Applied,
    /// Reading or writing the document failed
    Failed { error: String },
}

/// Per-document record of a bulk run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentOutcome {
    pub path: DocumentId,
    #[serde(flatten)]
    pub status: DocumentStatus,
    /// Number of tokens rewritten
    pub rewritten: usize,
    /// New content when the document changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_content: Option<String>,
}

impl DocumentOutcome {
    /// Whether the conversion changed (or would change) the document
    pub fn is_changed(&self) -> bool {
        self.new_content.is_some()
    }
}

/// Aggregate result of a bulk conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Unique run id
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub direction: Direction,
    /// Whether this was a safe-mode (report-only) run
    pub dry_run: bool,
    /// Documents read and converted
    pub scanned: usize,
    /// Documents skipped because they live under an ignored folder
    pub skipped_ignored: usize,
    /// Documents whose content changed or would change
    pub affected: usize,
    /// Writes that completed
    pub applied: usize,
    /// Documents whose read or write failed
    pub failed: usize,
    /// Whether the run stopped early on host request
    pub cancelled: bool,
    pub duration_ms: u64,
    pub outcomes: Vec<DocumentOutcome>,
}

impl ConversionReport {
    /// Empty report for a run starting now
    pub fn new(direction: Direction, dry_run: bool) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            direction,
            dry_run,
            scanned: 0,
            skipped_ignored: 0,
            affected: 0,
            applied: 0,
            failed: 0,
            cancelled: false,
            duration_ms: 0,
            outcomes: Vec::new(),
        }
    }

    /// Record one document's outcome and update the counters
    pub fn record(&mut self, outcome: DocumentOutcome) {
        self.scanned += 1;
        if outcome.is_changed() {
            self.affected += 1;
        }
        match outcome.status {
            DocumentStatus::Applied => self.applied += 1,
            DocumentStatus::Failed { .. } => self.failed += 1,
            DocumentStatus::Unchanged | DocumentStatus::WouldChange => {}
        }
        self.outcomes.push(outcome);
    }

    /// Human-readable notification line for the host
    pub fn summary(&self) -> String {
        let mut line = if self.dry_run {
            format!(
                "Safe mode: {} file(s) would be modified. Disable safe mode to apply changes.",
                self.affected
            )
        } else {
            format!("Converted links in {} file(s)", self.applied)
        };

        if self.failed > 0 {
            line.push_str(&format!(" ({} failed)", self.failed));
        }
        if self.cancelled {
            line.push_str(" [cancelled]");
        }
        line
    }

    /// Outcomes that failed, with their error text
    pub fn failures(&self) -> impl Iterator<Item = (&DocumentId, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            DocumentStatus::Failed { error } => Some((&o.path, error.as_str())),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_normalizes() {
        let id = DocumentId::new("/Folder//./Note.md").unwrap();
        assert_eq!(id.as_str(), "Folder/Note.md");

        let id = DocumentId::new("Folder\\Sub\\Note.md").unwrap();
        assert_eq!(id.as_str(), "Folder/Sub/Note.md");
    }

    #[test]
    fn test_document_id_rejects_empty_and_parent() {
        assert!(DocumentId::new("").is_err());
        assert!(DocumentId::new("/").is_err());
        assert!(DocumentId::new("../outside.md").is_err());
    }

    #[test]
    fn test_document_id_parts() {
        let id = DocumentId::new("Assets/diagram.png").unwrap();
        assert_eq!(id.file_name(), "diagram.png");
        assert_eq!(id.stem(), "diagram");
        assert_eq!(id.extension(), Some("png"));
        assert_eq!(id.folder_segments(), vec!["Assets"]);
        assert!(!id.is_markdown());
        assert_eq!(id.wiki_name(), "diagram.png");
    }

    #[test]
    fn test_document_id_root_and_dotted() {
        let id = DocumentId::new("v1.2 notes.md").unwrap();
        assert_eq!(id.folder(), "");
        assert!(id.folder_segments().is_empty());
        assert_eq!(id.stem(), "v1.2 notes");
        assert_eq!(id.wiki_name(), "v1.2 notes");

        let id = DocumentId::new("README").unwrap();
        assert_eq!(id.extension(), None);
        assert_eq!(id.stem(), "README");

        let id = DocumentId::new(".hidden").unwrap();
        assert_eq!(id.extension(), None);
    }

    #[test]
    fn test_markdown_extension_case_insensitive() {
        let id = DocumentId::new("Note.MD").unwrap();
        assert!(id.is_markdown());
        assert_eq!(id.wiki_name(), "Note");
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(
            "wiki-to-md".parse::<Direction>().unwrap(),
            Direction::WikiToMarkdown
        );
        assert_eq!(
            "MD-to-Wiki".parse::<Direction>().unwrap(),
            Direction::MarkdownToWiki
        );
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_resolved_target_accessors() {
        let id = DocumentId::new("Folder/Note.md").unwrap();
        let resolved = ResolvedTarget::Document(id.clone());
        assert!(resolved.is_resolved());
        assert_eq!(resolved.document(), Some(&id));
        assert_eq!(resolved.as_path(), "Folder/Note.md");

        let echoed = ResolvedTarget::Unresolved("Missing".to_string());
        assert!(!echoed.is_resolved());
        assert_eq!(echoed.as_path(), "Missing");
    }

    #[test]
    fn test_report_summary() {
        let mut report = ConversionReport {
            run_id: "run".to_string(),
            started_at: Utc::now(),
            direction: Direction::WikiToMarkdown,
            dry_run: true,
            scanned: 4,
            skipped_ignored: 0,
            affected: 2,
            applied: 0,
            failed: 0,
            cancelled: false,
            duration_ms: 1,
            outcomes: vec![],
        };
        assert!(report.summary().starts_with("Safe mode: 2 file(s) would be modified"));

        report.dry_run = false;
        report.applied = 1;
        report.failed = 1;
        assert_eq!(report.summary(), "Converted links in 1 file(s) (1 failed)");
    }

    #[test]
    fn test_report_record_updates_counters() {
        let mut report = ConversionReport::new(Direction::MarkdownToWiki, false);
        assert!(!report.run_id.is_empty());

        let outcome = |path: &str, status, changed: bool| DocumentOutcome {
            path: DocumentId::new(path).unwrap(),
            status,
            rewritten: usize::from(changed),
            new_content: changed.then(|| "new".to_string()),
        };
        report.record(outcome("a.md", DocumentStatus::Applied, true));
        report.record(outcome("b.md", DocumentStatus::Unchanged, false));
        report.record(outcome(
            "c.md",
            DocumentStatus::Failed {
                error: "denied".to_string(),
            },
            true,
        ));

        assert_eq!(report.scanned, 3);
        assert_eq!(report.affected, 2);
        assert_eq!(report.applied, 1);
        assert_eq!(report.failed, 1);
        let failures: Vec<_> = report.failures().map(|(p, e)| (p.as_str(), e)).collect();
        assert_eq!(failures, vec![("c.md", "denied")]);
    }

    #[test]
    fn test_outcome_serializes_flat_status() {
        let outcome = DocumentOutcome {
            path: DocumentId::new("a.md").unwrap(),
            status: DocumentStatus::Failed {
                error: "disk full".to_string(),
            },
            rewritten: 1,
            new_content: Some("x".to_string()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "disk full");
        assert_eq!(json["path"], "a.md");
    }
}
