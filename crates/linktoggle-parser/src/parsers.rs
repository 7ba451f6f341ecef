//! Notation parsers.
//!
//! Each parser owns the regex for one link notation and turns its matches
//! into [`LinkToken`](linktoggle_core::LinkToken)s. Scanning order, code
//! exclusion and text segments are handled by the engine.

pub mod link_utils;
pub mod markdown_links;
pub mod wikilinks;
