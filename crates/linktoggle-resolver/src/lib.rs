//! # Link Resolution
//!
//! Resolves raw link targets against a corpus snapshot and renders resolved
//! documents as markdown link paths.
//!
//! Provides:
//! - [`CorpusIndex`]: exact, case-insensitive and file-name lookups
//! - [`LinkLookup`]: seam for host-assisted reference lookup
//! - [`TargetResolver`]: wikilink and markdown target resolution
//! - [`PathFormatter`]: absolute (`/Folder/Note.md`) and relative
//!   (`../Note.md`) rendering
//!
//! ## Quick Start
//!
//! ```
//! use linktoggle_core::{DocumentId, LinkStyle};
//! use linktoggle_resolver::{CorpusIndex, PathFormatter, TargetResolver};
//!
//! let index: CorpusIndex = ["Folder/Note.md", "Folder/Sub/Current.md"]
//!     .into_iter()
//!     .map(|p| DocumentId::new(p).unwrap())
//!     .collect();
//!
//! let source = DocumentId::new("Folder/Sub/Current.md").unwrap();
//! let resolved = TargetResolver::new(&index).resolve_wiki("Note", &source);
//!
//! let formatter = PathFormatter::new(LinkStyle::Relative);
//! assert_eq!(formatter.format(resolved.as_path(), &source), "../Note.md");
//! ```
//!
//! ## Resolution rules
//!
//! ### Wikilinks
//! - `Base.md` is tried before `Base`
//! - A host [`LinkLookup`] is asked first, then the corpus
//! - Bare names match file names case-insensitively anywhere in the corpus
//! - Ties go to the source's folder, then the shallowest path, then path order
//!
//! ### Markdown links
//! - URIs are never resolved
//! - `/path` is corpus-root relative, anything else source-folder relative
//! - `.` and `..` are applied; `..` at the root is a no-op
//! - The normalized path must exist verbatim

pub mod formatter;
pub mod index;
pub mod resolver;

pub use formatter::{PathFormatter, absolute_path, relative_path};
pub use index::{CorpusIndex, LinkLookup};
pub use resolver::TargetResolver;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{CorpusIndex, LinkLookup, PathFormatter, TargetResolver};
}
