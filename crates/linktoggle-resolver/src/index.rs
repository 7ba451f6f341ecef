//! Corpus index for document lookups.

use linktoggle_core::prelude::*;
use linktoggle_core::utils::resolve_relative_path;
use std::collections::{BTreeSet, HashMap};

/// Host-assisted reference lookup.
///
/// A host that keeps its own link index (aliases, unique-name caches) can
/// answer wikilink references before the corpus rules run. Returning `None`
/// falls back to [`CorpusIndex`].
pub trait LinkLookup: Send + Sync {
    /// Resolve a wikilink reference written in `source`
    fn lookup_reference(&self, reference: &str, source: &DocumentId) -> Option<DocumentId>;
}

/// Snapshot of every addressable document in the corpus.
///
/// Lookups by exact path, by case-insensitive path, and by case-insensitive
/// file name. Ambiguous name matches are settled deterministically: a
/// document in the source's own folder first, then the shallowest path, then
/// lexicographic order.
#[derive(Debug, Clone, Default)]
pub struct CorpusIndex {
    documents: BTreeSet<DocumentId>,
    /// Lower-cased full path to documents
    by_lower_path: HashMap<String, Vec<DocumentId>>,
    /// Lower-cased file name to documents
    by_name: HashMap<String, Vec<DocumentId>>,
}

impl CorpusIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document. Returns false if it was already present.
    pub fn insert(&mut self, id: DocumentId) -> bool {
        if self.documents.contains(&id) {
            return false;
        }

        self.by_lower_path
            .entry(id.as_str().to_lowercase())
            .or_default()
            .push(id.clone());
        self.by_name
            .entry(id.file_name().to_lowercase())
            .or_default()
            .push(id.clone());
        self.documents.insert(id);
        true
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All documents in path order
    pub fn documents(&self) -> impl Iterator<Item = &DocumentId> {
        self.documents.iter()
    }

    /// Verbatim (case-sensitive) path lookup
    pub fn get(&self, path: &str) -> Option<&DocumentId> {
        let id = DocumentId::new(path).ok()?;
        self.documents.get(&id)
    }

    /// Case-insensitive path lookup, preferring an exact-case match
    pub fn get_ignore_case(&self, path: &str) -> Option<&DocumentId> {
        if let Some(id) = self.get(path) {
            return Some(id);
        }
        let normalized = DocumentId::new(path).ok()?;
        self.by_lower_path
            .get(&normalized.as_str().to_lowercase())
            .and_then(|entries| entries.iter().min())
    }

    /// Find the document a wikilink-style reference points at.
    ///
    /// `reference` must already carry the extension to match (callers try
    /// `Note.md` before `Note`). References containing `/` are tried relative
    /// to the source's folder, then from the corpus root, then as a path
    /// suffix. Bare names match by file name anywhere in the corpus.
    pub fn find_reference(&self, reference: &str, source: &DocumentId) -> Option<&DocumentId> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        if let Some(rooted) = reference.strip_prefix('/') {
            return self.get_ignore_case(rooted);
        }

        if !reference.contains('/') {
            let candidates = self.by_name.get(&reference.to_lowercase())?;
            return Self::pick(candidates.iter(), source);
        }

        let relative = resolve_relative_path(source.folder(), reference);
        if let Some(id) = self.get_ignore_case(&relative) {
            return Some(id);
        }
        if let Some(id) = self.get_ignore_case(reference) {
            return Some(id);
        }

        let suffix = format!("/{}", reference.trim_start_matches("./").to_lowercase());
        let name = reference.rsplit('/').next().unwrap_or(reference).to_lowercase();
        let candidates = self.by_name.get(&name)?;
        Self::pick(
            candidates
                .iter()
                .filter(|id| id.as_str().to_lowercase().ends_with(&suffix)),
            source,
        )
    }

    /// Deterministic choice among several candidates
    fn pick<'a>(
        candidates: impl Iterator<Item = &'a DocumentId>,
        source: &DocumentId,
    ) -> Option<&'a DocumentId> {
        candidates.min_by(|a, b| {
            let elsewhere = |id: &DocumentId| id.folder() != source.folder();
            let depth = |id: &DocumentId| id.as_str().matches('/').count();
            elsewhere(a)
                .cmp(&elsewhere(b))
                .then_with(|| depth(a).cmp(&depth(b)))
                .then_with(|| a.cmp(b))
        })
    }
}

impl FromIterator<DocumentId> for CorpusIndex {
    fn from_iter<I: IntoIterator<Item = DocumentId>>(iter: I) -> Self {
        let mut index = Self::new();
        for id in iter {
            index.insert(id);
        }
        index
    }
}

impl LinkLookup for CorpusIndex {
    fn lookup_reference(&self, reference: &str, source: &DocumentId) -> Option<DocumentId> {
        self.find_reference(reference, source).cloned()
    }
}
