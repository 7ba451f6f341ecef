//! # linktoggle
//!
//! Command-line front end for converting vault links between
//! `[[wikilinks]]` and `[markdown](links)`.
//!
//! ```bash
//! linktoggle --vault ~/notes wiki-to-md --style relative --dry-run
//! linktoggle --vault ~/notes md-to-wiki --file Projects/Plan.md
//! linktoggle --vault ~/notes ignore add Templates
//! linktoggle --vault ~/notes safe-mode
//! ```
//!
//! Settings persist in `<vault>/.linktoggle.json` unless `--config` points
//! elsewhere. Bulk runs honor safe mode; `--apply` and `--dry-run` override
//! it for one run.

pub mod cli;
pub mod commands;
pub mod logging;

pub use cli::{Cli, Commands, LogFormat};
pub use commands::run;
