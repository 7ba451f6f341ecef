//! # Link Conversion
//!
//! Converts links between wikilink notation (`[[Target#frag|Alias]]`) and
//! markdown notation (`[Alias](path#frag)`).
//!
//! - [`LinkConverter`] rewrites one text against a corpus snapshot. It is
//!   synchronous and never fails: anything it cannot rewrite keeps its
//!   original text.
//! - [`Orchestrator`] runs conversions against a
//!   [`DocumentStore`](linktoggle_vault::DocumentStore): a single document,
//!   or the whole corpus with safe mode, ignored folders, cancellation and a
//!   per-document [`ConversionReport`](linktoggle_core::ConversionReport).
//!
//! ## Quick Start
//!
//! ```
//! use linktoggle_batch::{CancellationToken, Orchestrator};
//! use linktoggle_core::{ConversionSettings, Direction};
//! use linktoggle_vault::MemoryStore;
//!
//! # #[tokio::main]
//! # async fn main() -> linktoggle_core::Result<()> {
//! let store = MemoryStore::from_documents([
//!     ("Folder/Note.md", "# Note"),
//!     ("Index.md", "See [[Note]]."),
//! ])?;
//!
//! // Safe mode (the default) only reports
//! let settings = ConversionSettings::default();
//! let report = Orchestrator::new(&store)
//!     .convert_all(Direction::WikiToMarkdown, &settings, &CancellationToken::new())
//!     .await?;
//! assert_eq!(report.affected, 1);
//! assert_eq!(report.applied, 0);
//!
//! let settings = settings.with_safe_mode(false);
//! let report = Orchestrator::new(&store)
//!     .convert_all(Direction::WikiToMarkdown, &settings, &CancellationToken::new())
//!     .await?;
//! assert_eq!(report.summary(), "Converted links in 1 file(s)");
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod orchestrator;

pub use convert::{LinkConverter, TextConversion};
pub use orchestrator::{DocumentConversion, Orchestrator};

// Cancellation handle for bulk runs
pub use tokio_util::sync::CancellationToken;
