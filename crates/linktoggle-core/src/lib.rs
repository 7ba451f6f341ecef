//! # Links Toggler Core
//!
//! Core data models, settings, and error types for converting links between
//! wikilink notation (`[[Target#frag|Alias]]`) and markdown notation
//! (`[Alias](path#frag)`). This crate defines the canonical types that all
//! other crates depend on.
//!
//! ## Core Modules
//!
//! - [`models`] - Document identities, link tokens, resolution results, reports
//! - [`error`] - Error type and Result alias
//! - [`config`] - [`ConversionSettings`] and their lenient persistence
//! - [`utils`] - Forward-slash path helpers
//!
//! ## Usage
//!
//! ```
//! use linktoggle_core::prelude::*;
//!
//! let settings = ConversionSettings::default()
//!     .with_link_style(LinkStyle::Relative)
//!     .with_ignored_folders(["/Templates/"]);
//!
//! let doc = DocumentId::new("Templates/Daily.md").unwrap();
//! assert!(settings.is_ignored(&doc));
//! assert_eq!(doc.wiki_name(), "Daily");
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use config::*;
pub use error::{Error, Result};
pub use models::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ConversionSettings, LinkStyle};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        ConversionReport, Direction, Document, DocumentId, DocumentKind, DocumentOutcome,
        DocumentStatus, LinkToken, ResolvedTarget, TokenKind,
    };
    pub use crate::utils::DEFAULT_EXTENSION;
}
