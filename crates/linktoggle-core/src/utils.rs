//! Shared path utilities for corpus-relative, forward-slash paths.
//!
//! Provides helpers for:
//! - Segment splitting and folder normalization
//! - `.`/`..` resolution against a base folder
//! - URI scheme detection

use regex::Regex;
use std::sync::LazyLock;

/// Extension of the managed document type (no dot)
pub const DEFAULT_EXTENSION: &str = "md";

/// `scheme://...` at the start of a link path
static URI_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").unwrap());

/// Whether a link target is an absolute URI (`https://...`, `obsidian://...`)
///
/// ```
/// use linktoggle_core::utils::is_uri_absolute;
///
/// assert!(is_uri_absolute("https://example.com/a.md"));
/// assert!(!is_uri_absolute("/Folder/Note.md"));
/// assert!(!is_uri_absolute("mailto:someone@example.com"));
/// ```
pub fn is_uri_absolute(target: &str) -> bool {
    URI_SCHEME.is_match(target)
}

/// Split a path into its non-empty, non-`.` segments
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect()
}

/// Normalize a folder setting: trimmed, no leading or trailing slash.
///
/// ```
/// use linktoggle_core::utils::normalize_folder_path;
///
/// assert_eq!(normalize_folder_path(" /Archive/Old/ "), "Archive/Old");
/// assert_eq!(normalize_folder_path("/"), "");
/// ```
pub fn normalize_folder_path(path: &str) -> String {
    let trimmed = path.trim();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Whether `path` is `folder` itself or lives underneath it
pub fn is_under_folder(path: &str, folder: &str) -> bool {
    if folder.is_empty() {
        return false;
    }
    path == folder
        || path
            .strip_prefix(folder)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Resolve `link` against the segments of `base_folder`.
///
/// `.` is a no-op and `..` pops one segment (a no-op at the corpus root).
///
/// ```
/// use linktoggle_core::utils::resolve_relative_path;
///
/// assert_eq!(resolve_relative_path("Folder/Sub", "../Note.md"), "Folder/Note.md");
/// assert_eq!(resolve_relative_path("", "../../Note.md"), "Note.md");
/// assert_eq!(resolve_relative_path("A", "./B/./c.md"), "A/B/c.md");
/// ```
pub fn resolve_relative_path(base_folder: &str, link: &str) -> String {
    let mut stack = split_segments(base_folder);

    for segment in link.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            other => stack.push(other),
        }
    }

    stack.join("/")
}

/// Strip a trailing `.md` (case-insensitive) from a name
pub fn strip_default_extension(name: &str) -> &str {
    let suffix_len = DEFAULT_EXTENSION.len() + 1;
    if name.len() > suffix_len {
        let split = name.len() - suffix_len;
        if name.is_char_boundary(split) {
            let (head, tail) = name.split_at(split);
            if tail.starts_with('.') && tail[1..].eq_ignore_ascii_case(DEFAULT_EXTENSION) {
                return head;
            }
        }
    }
    name
}
