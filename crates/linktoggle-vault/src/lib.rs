//! # Document Stores
//!
//! The [`DocumentStore`] interface the converter reads and writes through,
//! and two implementations:
//!
//! - [`VaultStore`]: a vault directory on disk. Lists with `walkdir`,
//!   skipping hidden and tool folders; writes atomically.
//! - [`MemoryStore`]: an in-memory corpus for embedding and tests.
//!
//! ## Quick Start
//!
//! ```no_run
//! use linktoggle_vault::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let store = VaultStore::new("/path/to/vault")?;
//!
//!     for id in store.list_documents(DocumentKind::Markdown).await? {
//!         let content = store.read(&id).await?;
//!         println!("{id}: {} bytes", content.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Any type implementing [`DocumentStore`] can back a conversion, so a host
//! with its own link index can also override
//! [`DocumentStore::resolve_reference`].

pub mod memory;
pub mod store;
pub mod vault;

pub use memory::MemoryStore;
pub use store::DocumentStore;
pub use vault::{SKIPPED_FOLDERS, VaultStore};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{DocumentStore, MemoryStore, VaultStore};
    pub use linktoggle_core::prelude::*;
}
