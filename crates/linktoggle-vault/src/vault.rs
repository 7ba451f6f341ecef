//! Filesystem-backed store rooted at a vault directory

use async_trait::async_trait;
use linktoggle_core::prelude::*;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::instrument;
use walkdir::{DirEntry, WalkDir};

use crate::store::DocumentStore;

/// Folders that never hold corpus documents
pub const SKIPPED_FOLDERS: &[&str] = &[".obsidian", ".git", ".trash", "node_modules"];

/// Document store over a directory tree.
///
/// Hidden entries and tool folders are not part of the corpus. Writes go to
/// a temporary sibling file that is renamed over the target.
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
}

impl VaultStore {
    /// Open a vault rooted at `root`, which must be an existing directory
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let metadata = std::fs::metadata(root).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::file_not_found(root),
            _ => Error::io(e),
        })?;
        if !metadata.is_dir() {
            return Err(Error::invalid_path(format!(
                "vault root is not a directory: {}",
                root.display()
            )));
        }

        let root = root.canonicalize().map_err(Error::io)?;
        log::debug!("Opened vault at {}", root.display());
        Ok(Self { root })
    }

    /// Canonical vault root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an absolute or vault-relative filesystem path to a document id
    pub fn document_id(&self, path: &Path) -> Result<DocumentId> {
        let relative = if path.is_absolute() {
            let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
            canonical
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .map_err(|_| Error::path_traversal(path))?
        } else {
            path.to_path_buf()
        };

        let relative = relative
            .to_str()
            .ok_or_else(|| Error::invalid_path(format!("non UTF-8 path: {}", path.display())))?;
        DocumentId::new(relative)
    }

    /// Filesystem path of a document, rejecting anything outside the root
    fn resolve_path(&self, id: &DocumentId) -> Result<PathBuf> {
        let full_path = self.root.join(id.as_str());

        // Symlinks may still point outside the vault
        if full_path.exists() {
            let canonical = full_path.canonicalize().map_err(Error::io)?;
            if !canonical.starts_with(&self.root) {
                return Err(Error::path_traversal(canonical));
            }
        }

        Ok(full_path)
    }

    fn scan(root: &Path, kind: DocumentKind) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable vault entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(root).ok()?.to_str()?.to_string();
                DocumentId::new(relative).ok()
            })
            .filter(|id| kind.matches(id))
            .collect();

        ids.sort();
        ids
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_none_or(|name| name.starts_with('.') || SKIPPED_FOLDERS.contains(&name))
}

#[async_trait]
impl DocumentStore for VaultStore {
    #[instrument(skip(self), name = "vault_list_documents")]
    async fn list_documents(&self, kind: DocumentKind) -> Result<Vec<DocumentId>> {
        let root = self.root.clone();
        let ids = tokio::task::spawn_blocking(move || Self::scan(&root, kind))
            .await
            .map_err(|e| Error::other(format!("vault scan aborted: {e}")))?;

        log::debug!("Found {} documents ({:?})", ids.len(), kind);
        Ok(ids)
    }

    #[instrument(skip(self), fields(file = %id), name = "vault_read")]
    async fn read(&self, id: &DocumentId) -> Result<String> {
        let path = self.resolve_path(id)?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => Error::file_not_found(path),
                _ => Error::io(e),
            })
    }

    #[instrument(
        skip(self, content),
        fields(file = %id, size = content.len()),
        name = "vault_write"
    )]
    async fn write(&self, id: &DocumentId, content: &str) -> Result<()> {
        let path = self.resolve_path(id)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(Error::io)?;
        }

        // Write to a hidden temp sibling first
        let temp_path = path.with_file_name(format!(
            ".{}.{}.tmp",
            id.file_name(),
            uuid::Uuid::new_v4().simple()
        ));
        tokio::fs::write(&temp_path, content)
            .await
            .map_err(|e| Error::write_failed(id.as_str(), e.to_string()))?;

        // Atomic rename
        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                log::warn!("Failed to remove {}: {}", temp_path.display(), cleanup);
            }
            return Err(Error::write_failed(id.as_str(), e.to_string()));
        }

        log::debug!("Wrote {} ({} bytes)", id, content.len());
        Ok(())
    }
}
