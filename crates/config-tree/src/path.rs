//! Dotted path utilities
//!
//! Sections and nodes are addressed by dot-separated paths such as
//! `database.pool.size`. Every segment must be non-empty; a path never
//! starts or ends with a separator.
//!
//! # Examples
//!
//! ```
//! use config_tree::path::{join_path, parent_path, split_path, strip_path_prefix};
//!
//! assert_eq!(split_path("a.b.c").unwrap(), vec!["a", "b", "c"]);
//! assert_eq!(join_path("a.b", "c"), "a.b.c");
//! assert_eq!(join_path("", "c"), "c");
//! assert_eq!(parent_path("a.b.c"), Some("a.b"));
//! assert_eq!(strip_path_prefix("a.b.c", "a"), Some("b.c"));
//! assert_eq!(strip_path_prefix("ab.c", "a"), None);
//! ```

use crate::error::{Error, Result};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Split a path into its segments, rejecting empty paths and empty segments.
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }
    let segments: Vec<&str> = path.split(SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::invalid_path(path, "path contains an empty segment"));
    }
    Ok(segments)
}

/// Check that a single segment can be used as a child key.
pub fn validate_segment(segment: &str) -> Result<()> {
    if segment.is_empty() {
        return Err(Error::invalid_path(segment, "segment is empty"));
    }
    if segment.contains(SEPARATOR) {
        return Err(Error::invalid_path(segment, "segment contains a separator"));
    }
    Ok(())
}

/// Append a segment (or a relative dotted path) to a parent path.
///
/// An empty parent denotes the document root.
pub fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}{SEPARATOR}{child}")
    }
}

/// Everything before the last separator, or `None` for a top-level path.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rsplit_once(SEPARATOR).map(|(parent, _)| parent)
}

/// The final segment of a path.
pub fn last_segment(path: &str) -> &str {
    path.rsplit_once(SEPARATOR)
        .map_or(path, |(_, segment)| segment)
}

/// Remove `prefix` from `path` when it matches whole leading segments.
///
/// An empty prefix matches every path. Returns `None` when the prefix is not
/// a segment-wise prefix or when nothing would remain.
pub fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return Some(path);
    }
    path.strip_prefix(prefix)?
        .strip_prefix(SEPARATOR)
        .filter(|rest| !rest.is_empty())
}
