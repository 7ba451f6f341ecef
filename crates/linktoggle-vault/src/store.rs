//! The document store interface.

use async_trait::async_trait;
use linktoggle_core::prelude::*;

/// Access to a corpus of documents addressed by [`DocumentId`].
///
/// Conversion only ever lists, reads and replaces whole documents; it never
/// creates or deletes them.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ids of every document of `kind`, in path order
    async fn list_documents(&self, kind: DocumentKind) -> Result<Vec<DocumentId>>;

    /// Full text of a document
    async fn read(&self, id: &DocumentId) -> Result<String>;

    /// Replace a document's full text
    async fn write(&self, id: &DocumentId, content: &str) -> Result<()>;

    /// Host-assisted wikilink lookup. `None` defers to the corpus rules.
    fn resolve_reference(&self, _reference: &str, _source: &DocumentId) -> Option<DocumentId> {
        None
    }

    /// Read a document together with its id
    async fn read_document(&self, id: &DocumentId) -> Result<Document> {
        let content = self.read(id).await?;
        Ok(Document::new(id.clone(), content))
    }
}
