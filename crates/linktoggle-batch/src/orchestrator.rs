//! Store-backed conversion: one document or the whole corpus.

use futures::stream::{self, StreamExt};
use linktoggle_core::prelude::*;
use linktoggle_resolver::{CorpusIndex, LinkLookup, TargetResolver};
use linktoggle_vault::DocumentStore;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::convert::LinkConverter;

/// Result of converting one stored document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentConversion {
    pub id: DocumentId,
    pub original: String,
    pub converted: String,
    pub rewritten: usize,
}

impl DocumentConversion {
    pub fn is_changed(&self) -> bool {
        self.converted != self.original
    }
}

/// Upper bound on writes in flight during a bulk apply
const MAX_CONCURRENT_WRITES: usize = 16;

/// Adapts a store's host lookup to the resolver seam
struct StoreLookup<'a, S: ?Sized>(&'a S);

impl<S: DocumentStore + ?Sized> LinkLookup for StoreLookup<'_, S> {
    fn lookup_reference(&self, reference: &str, source: &DocumentId) -> Option<DocumentId> {
        self.0.resolve_reference(reference, source)
    }
}

/// Drives conversions against a [`DocumentStore`].
///
/// Settings are passed into every call. Each call snapshots the corpus once
/// and resolves every link against that snapshot.
pub struct Orchestrator<'s, S: DocumentStore + ?Sized> {
    store: &'s S,
}

impl<'s, S: DocumentStore + ?Sized> Orchestrator<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Snapshot every document (attachments included) for resolution
    async fn corpus_index(&self) -> Result<CorpusIndex> {
        let ids = self.store.list_documents(DocumentKind::All).await?;
        Ok(ids.into_iter().collect())
    }

    /// Convert one document without writing it.
    ///
    /// Single-document mode ignores `safe_mode` and `ignored_folders`.
    #[instrument(skip(self, settings), fields(file = %id, direction = %direction))]
    pub async fn convert_document(
        &self,
        id: &DocumentId,
        direction: Direction,
        settings: &ConversionSettings,
    ) -> Result<DocumentConversion> {
        let index = self.corpus_index().await?;
        let document = self.store.read_document(id).await?;

        let lookup = StoreLookup(self.store);
        let resolver = TargetResolver::new(&index).with_host(&lookup);
        let result = LinkConverter::new(resolver, settings).convert(
            &document.content,
            &document.id,
            direction,
        );

        log::debug!("{}: {} link(s) rewritten", id, result.rewritten);
        Ok(DocumentConversion {
            id: document.id,
            original: document.content,
            converted: result.content,
            rewritten: result.rewritten,
        })
    }

    /// Convert one document and write it back when it changed
    pub async fn apply_document(
        &self,
        id: &DocumentId,
        direction: Direction,
        settings: &ConversionSettings,
    ) -> Result<DocumentConversion> {
        let conversion = self.convert_document(id, direction, settings).await?;
        if conversion.is_changed() {
            self.store.write(id, &conversion.converted).await?;
            log::info!("Converted {} link(s) in {}", conversion.rewritten, id);
        }
        Ok(conversion)
    }

    /// Convert every markdown document outside the ignored folders.
    ///
    /// With `safe_mode` set nothing is written and changed documents are
    /// reported as would-change. Otherwise changed documents are written
    /// once the scan finishes, at most [`MAX_CONCURRENT_WRITES`] at a time.
    /// Read and write failures are recorded per document; only listing the
    /// corpus fails the call.
    ///
    /// Cancellation is checked between documents. Writes already queued
    /// when it fires are still performed.
    #[instrument(
        skip(self, settings, cancel),
        fields(direction = %direction, dry_run = settings.safe_mode)
    )]
    pub async fn convert_all(
        &self,
        direction: Direction,
        settings: &ConversionSettings,
        cancel: &CancellationToken,
    ) -> Result<ConversionReport> {
        let started = Instant::now();
        let dry_run = settings.safe_mode;
        let mut report = ConversionReport::new(direction, dry_run);

        let index = self.corpus_index().await?;
        let lookup = StoreLookup(self.store);
        let converter =
            LinkConverter::new(TargetResolver::new(&index).with_host(&lookup), settings);

        let documents: Vec<DocumentId> = index
            .documents()
            .filter(|id| DocumentKind::Markdown.matches(id))
            .cloned()
            .collect();
        log::info!(
            "Converting {} document(s) {} (safe mode: {})",
            documents.len(),
            direction,
            dry_run
        );

        let mut pending = Vec::new();
        for id in documents {
            if cancel.is_cancelled() {
                log::warn!("Conversion cancelled after {} document(s)", report.scanned);
                report.cancelled = true;
                break;
            }
            if settings.is_ignored(&id) {
                report.skipped_ignored += 1;
                continue;
            }

            let document = match self.store.read_document(&id).await {
                Ok(document) => document,
                Err(e) => {
                    log::warn!("Failed to read {}: {}", id, e);
                    report.record(DocumentOutcome {
                        path: id,
                        status: DocumentStatus::Failed {
                            error: e.to_string(),
                        },
                        rewritten: 0,
                        new_content: None,
                    });
                    continue;
                }
            };

            let result = converter.convert(&document.content, &document.id, direction);
            if result.content == document.content {
                report.record(DocumentOutcome {
                    path: id,
                    status: DocumentStatus::Unchanged,
                    rewritten: 0,
                    new_content: None,
                });
            } else if dry_run {
                report.record(DocumentOutcome {
                    path: id,
                    status: DocumentStatus::WouldChange,
                    rewritten: result.rewritten,
                    new_content: Some(result.content),
                });
            } else {
                pending.push((id, result));
            }
        }

        // Writes are independent; one failure never blocks the others
        let writes: Vec<_> = stream::iter(pending)
            .map(|(id, result)| async move {
                let outcome = self.store.write(&id, &result.content).await;
                (id, result, outcome)
            })
            .buffer_unordered(MAX_CONCURRENT_WRITES)
            .collect()
            .await;

        for (id, result, written) in writes {
            let status = match written {
                Ok(()) => DocumentStatus::Applied,
                Err(e) => {
                    log::warn!("Failed to write {}: {}", id, e);
                    DocumentStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            report.record(DocumentOutcome {
                path: id,
                status,
                rewritten: result.rewritten,
                new_content: Some(result.content),
            });
        }

        report.outcomes.sort_by(|a, b| a.path.cmp(&b.path));
        report.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!("{}", report.summary());
        Ok(report)
    }
}
