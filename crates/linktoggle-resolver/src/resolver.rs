//! Target resolution for both conversion directions.

use linktoggle_core::prelude::*;
use linktoggle_core::utils::{is_uri_absolute, resolve_relative_path};

use crate::index::{CorpusIndex, LinkLookup};

/// Resolves raw link targets to corpus documents.
///
/// Resolution never fails: an unknown target comes back as
/// [`ResolvedTarget::Unresolved`] carrying the raw text unchanged.
///
/// ```
/// use linktoggle_core::{Direction, DocumentId, ResolvedTarget};
/// use linktoggle_resolver::{CorpusIndex, TargetResolver};
///
/// let index: CorpusIndex = ["Folder/Note.md", "Current.md"]
///     .into_iter()
///     .map(|p| DocumentId::new(p).unwrap())
///     .collect();
/// let resolver = TargetResolver::new(&index);
/// let source = DocumentId::new("Current.md").unwrap();
///
/// let resolved = resolver.resolve("Note", &source, Direction::WikiToMarkdown);
/// assert_eq!(resolved.as_path(), "Folder/Note.md");
///
/// let missing = resolver.resolve("Missing", &source, Direction::WikiToMarkdown);
/// assert_eq!(missing, ResolvedTarget::Unresolved("Missing".to_string()));
/// ```
#[derive(Clone, Copy)]
pub struct TargetResolver<'a> {
    index: &'a CorpusIndex,
    host: Option<&'a dyn LinkLookup>,
}

impl<'a> TargetResolver<'a> {
    /// Resolver over a corpus snapshot
    pub fn new(index: &'a CorpusIndex) -> Self {
        Self { index, host: None }
    }

    /// Consult a host lookup before the corpus rules for wikilink references
    pub fn with_host(mut self, host: &'a dyn LinkLookup) -> Self {
        self.host = Some(host);
        self
    }

    /// Resolve `raw_base` (no fragment) as written in `source`, in the
    /// notation `direction` converts from.
    pub fn resolve(
        &self,
        raw_base: &str,
        source: &DocumentId,
        direction: Direction,
    ) -> ResolvedTarget {
        match direction {
            Direction::WikiToMarkdown => self.resolve_wiki(raw_base, source),
            Direction::MarkdownToWiki => self.resolve_markdown(raw_base, source),
        }
    }

    /// Resolve an extension-optional wikilink base.
    ///
    /// `Base.md` is tried first, then `Base` verbatim; the first hit wins.
    pub fn resolve_wiki(&self, raw_base: &str, source: &DocumentId) -> ResolvedTarget {
        let base = raw_base.trim();
        if base.is_empty() {
            return ResolvedTarget::Unresolved(raw_base.to_string());
        }

        let with_extension = format!("{base}.{DEFAULT_EXTENSION}");
        for candidate in [with_extension.as_str(), base] {
            if let Some(id) = self.lookup(candidate, source) {
                log::trace!("Resolved [[{base}]] in {source} to {id}");
                return ResolvedTarget::Document(id);
            }
        }

        log::debug!("Unresolved wikilink [[{base}]] in {source}");
        ResolvedTarget::Unresolved(raw_base.to_string())
    }

    /// Resolve a decoded markdown link path.
    ///
    /// A leading `/` is corpus-root relative; anything else is relative to
    /// the source's folder. The normalized path must exist verbatim.
    pub fn resolve_markdown(&self, raw_path: &str, source: &DocumentId) -> ResolvedTarget {
        if is_uri_absolute(raw_path) {
            return ResolvedTarget::Unresolved(raw_path.to_string());
        }

        let path = raw_path.trim();
        let normalized = match path.strip_prefix('/') {
            Some(rooted) => resolve_relative_path("", rooted),
            None => resolve_relative_path(source.folder(), path),
        };

        match self.index.get(&normalized) {
            Some(id) => ResolvedTarget::Document(id.clone()),
            None => {
                log::debug!("Unresolved markdown link ({raw_path}) in {source}");
                ResolvedTarget::Unresolved(raw_path.to_string())
            }
        }
    }

    fn lookup(&self, reference: &str, source: &DocumentId) -> Option<DocumentId> {
        if let Some(host) = self.host
            && let Some(id) = host.lookup_reference(reference, source)
        {
            return Some(id);
        }
        self.index.find_reference(reference, source).cloned()
    }
}

impl std::fmt::Debug for TargetResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetResolver")
            .field("documents", &self.index.len())
            .field("host", &self.host.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(path: &str) -> DocumentId {
        DocumentId::new(path).unwrap()
    }

    fn corpus(paths: &[&str]) -> CorpusIndex {
        paths.iter().map(|p| id(p)).collect()
    }

    #[test]
    fn test_wiki_extension_optional() {
        let index = corpus(&["Folder/Note.md", "Assets/diagram.png", "Plain"]);
        let resolver = TargetResolver::new(&index);
        let source = id("Current.md");

        assert_eq!(resolver.resolve_wiki("Note", &source).as_path(), "Folder/Note.md");
        assert_eq!(resolver.resolve_wiki("Note.md", &source).as_path(), "Folder/Note.md");
        assert_eq!(
            resolver.resolve_wiki("diagram.png", &source).as_path(),
            "Assets/diagram.png"
        );
        // Literal retry after the extension attempt fails
        assert_eq!(resolver.resolve_wiki("Plain", &source).as_path(), "Plain");
        assert!(resolver.resolve_wiki("Plain", &source).is_resolved());
    }

    #[test]
    fn test_wiki_prefers_default_extension() {
        let index = corpus(&["Note", "Note.md"]);
        let resolver = TargetResolver::new(&index);
        assert_eq!(
            resolver.resolve_wiki("Note", &id("x.md")).as_path(),
            "Note.md"
        );
    }

    #[test]
    fn test_wiki_unresolved_echoes_raw() {
        let index = corpus(&["Folder/Note.md"]);
        let resolver = TargetResolver::new(&index);
        assert_eq!(
            resolver.resolve_wiki("Nowhere", &id("x.md")),
            ResolvedTarget::Unresolved("Nowhere".to_string())
        );
    }

    #[test]
    fn test_markdown_rooted_and_relative() {
        let index = corpus(&["Folder/Note.md", "Folder/Sub/Current.md", "Top.md"]);
        let resolver = TargetResolver::new(&index);
        let source = id("Folder/Sub/Current.md");

        assert_eq!(
            resolver.resolve_markdown("/Folder/Note.md", &source).as_path(),
            "Folder/Note.md"
        );
        assert_eq!(
            resolver.resolve_markdown("../Note.md", &source).as_path(),
            "Folder/Note.md"
        );
        assert_eq!(
            resolver.resolve_markdown("../../../../Top.md", &source).as_path(),
            "Top.md"
        );
        assert_eq!(
            resolver.resolve_markdown("./Current.md", &source).as_path(),
            "Folder/Sub/Current.md"
        );
    }

    #[test]
    fn test_markdown_lookup_is_verbatim() {
        let index = corpus(&["Folder/Note.md"]);
        let resolver = TargetResolver::new(&index);
        let source = id("Current.md");

        // No extension guessing or case folding in this direction
        assert!(!resolver.resolve_markdown("Folder/Note", &source).is_resolved());
        assert!(!resolver.resolve_markdown("folder/note.md", &source).is_resolved());
        assert_eq!(
            resolver.resolve_markdown("https://example.com/a.md", &source),
            ResolvedTarget::Unresolved("https://example.com/a.md".to_string())
        );
    }

    struct FixedHost;

    impl LinkLookup for FixedHost {
        fn lookup_reference(&self, reference: &str, _source: &DocumentId) -> Option<DocumentId> {
            (reference == "alias.md").then(|| id("Real/Target.md"))
        }
    }

    #[test]
    fn test_host_lookup_runs_first() {
        let index = corpus(&["Real/Target.md", "alias.md"]);
        let host = FixedHost;
        let resolver = TargetResolver::new(&index).with_host(&host);
        let source = id("x.md");

        assert_eq!(resolver.resolve_wiki("alias", &source).as_path(), "Real/Target.md");
        // Host has no answer: corpus rules apply
        assert_eq!(resolver.resolve_wiki("Target", &source).as_path(), "Real/Target.md");
    }

    #[test]
    fn test_resolve_dispatches_on_direction() {
        let index = corpus(&["Note.md"]);
        let resolver = TargetResolver::new(&index);
        let source = id("x.md");
        assert!(resolver.resolve("Note", &source, Direction::WikiToMarkdown).is_resolved());
        assert!(!resolver.resolve("Note", &source, Direction::MarkdownToWiki).is_resolved());
        assert!(resolver.resolve("Note.md", &source, Direction::MarkdownToWiki).is_resolved());
    }
}
