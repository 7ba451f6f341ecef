//! In-memory document store

use async_trait::async_trait;
use linktoggle_core::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::store::DocumentStore;

/// Document store backed by an ordered map.
///
/// Writes to ids registered with [`MemoryStore::reject_writes_to`] fail,
/// which lets callers exercise partial-failure handling.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<BTreeMap<DocumentId, String>>,
    rejected: HashSet<DocumentId>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(path, content)` pairs
    pub fn from_documents<I, P, C>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, C)>,
        P: AsRef<str>,
        C: Into<String>,
    {
        let mut store = Self::new();
        for (path, content) in documents {
            store = store.with_document(DocumentId::new(path)?, content);
        }
        Ok(store)
    }

    /// Add or replace a document
    pub fn with_document(mut self, id: DocumentId, content: impl Into<String>) -> Self {
        self.documents.get_mut().insert(id, content.into());
        self
    }

    /// Make every write to `id` fail
    pub fn reject_writes_to(mut self, id: DocumentId) -> Self {
        self.rejected.insert(id);
        self
    }

    /// Current content of a document
    pub async fn get(&self, id: &DocumentId) -> Option<String> {
        self.documents.read().await.get(id).cloned()
    }

    /// Copy of every document
    pub async fn snapshot(&self) -> BTreeMap<DocumentId, String> {
        self.documents.read().await.clone()
    }

    /// Number of writes that succeeded
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_documents(&self, kind: DocumentKind) -> Result<Vec<DocumentId>> {
        Ok(self
            .documents
            .read()
            .await
            .keys()
            .filter(|id| kind.matches(id))
            .cloned()
            .collect())
    }

    async fn read(&self, id: &DocumentId) -> Result<String> {
        self.get(id)
            .await
            .ok_or_else(|| Error::file_not_found(id.as_str()))
    }

    async fn write(&self, id: &DocumentId, content: &str) -> Result<()> {
        if self.rejected.contains(id) {
            return Err(Error::write_failed(id.as_str(), "write rejected by store"));
        }

        let mut documents = self.documents.write().await;
        match documents.get_mut(id) {
            Some(existing) => {
                *existing = content.to_string();
                self.writes.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => Err(Error::file_not_found(id.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(path: &str) -> DocumentId {
        DocumentId::new(path).unwrap()
    }

    #[tokio::test]
    async fn test_list_filters_by_kind() {
        let store =
            MemoryStore::from_documents([("b.md", ""), ("a.md", ""), ("img.png", "")]).unwrap();
        assert_eq!(
            store.list_documents(DocumentKind::Markdown).await.unwrap(),
            vec![id("a.md"), id("b.md")]
        );
        assert_eq!(store.list_documents(DocumentKind::All).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_write_replaces_existing_only() {
        let store = MemoryStore::from_documents([("a.md", "old")]).unwrap();
        store.write(&id("a.md"), "new").await.unwrap();
        assert_eq!(store.read(&id("a.md")).await.unwrap(), "new");
        assert_eq!(store.write_count(), 1);

        // The core never creates documents
        assert!(matches!(
            store.write(&id("b.md"), "x").await,
            Err(Error::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_rejected_writes_fail() {
        let store = MemoryStore::from_documents([("a.md", "old")])
            .unwrap()
            .reject_writes_to(id("a.md"));

        let result = store.write(&id("a.md"), "new").await;
        assert!(matches!(result, Err(Error::WriteFailed { .. })));
        assert_eq!(store.get(&id("a.md")).await.as_deref(), Some("old"));
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_from_documents_rejects_bad_paths() {
        assert!(MemoryStore::from_documents([("../escape.md", "")]).is_err());
    }
}
