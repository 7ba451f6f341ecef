//! Rendering resolved targets as markdown link paths.

use linktoggle_core::prelude::*;
use linktoggle_core::utils::is_uri_absolute;

/// Renders corpus paths in the configured [`LinkStyle`].
///
/// Output is not percent-encoded; encoding happens when the link token is
/// written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathFormatter {
    style: LinkStyle,
}

impl PathFormatter {
    pub fn new(style: LinkStyle) -> Self {
        Self { style }
    }

    pub fn from_settings(settings: &ConversionSettings) -> Self {
        Self::new(settings.link_style)
    }

    pub fn style(&self) -> LinkStyle {
        self.style
    }

    /// Render `resolved_path` as seen from `source`.
    ///
    /// ```
    /// use linktoggle_core::{DocumentId, LinkStyle};
    /// use linktoggle_resolver::PathFormatter;
    ///
    /// let source = DocumentId::new("Folder/Sub/Current.md").unwrap();
    /// let relative = PathFormatter::new(LinkStyle::Relative);
    /// assert_eq!(relative.format("Folder/Note.md", &source), "../Note.md");
    ///
    /// let absolute = PathFormatter::new(LinkStyle::Absolute);
    /// assert_eq!(absolute.format("Folder/Note.md", &source), "/Folder/Note.md");
    /// ```
    pub fn format(&self, resolved_path: &str, source: &DocumentId) -> String {
        if is_uri_absolute(resolved_path) {
            return resolved_path.to_string();
        }
        match self.style {
            LinkStyle::Absolute => absolute_path(resolved_path),
            LinkStyle::Relative => relative_path(source, resolved_path),
        }
    }
}

/// Prefix a corpus path with a single `/`
pub fn absolute_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Path from the folder containing `source` to `target`.
///
/// Shared leading segments are dropped, each remaining source folder becomes
/// `..`, and the rest of the target follows. When nothing remains the
/// target's basename is returned.
pub fn relative_path(source: &DocumentId, target: &str) -> String {
    let from = source.folder_segments();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let segments: Vec<&str> = std::iter::repeat_n("..", from.len() - common)
        .chain(to[common..].iter().copied())
        .collect();

    if segments.is_empty() {
        return to.last().copied().unwrap_or(target).to_string();
    }
    segments.join("/")
}
