//! Error types for config-tree

/// Result type for config-tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while editing a section tree
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Path not found: {path}")]
    PathNotFound { path: String },

    #[error("Invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Index {index} out of range for {parent:?} with {len} children")]
    IndexOutOfRange {
        parent: String,
        index: usize,
        len: usize,
    },

    #[error("Node {path} does not belong under section {section:?}")]
    OutsideSection { path: String, section: String },
}

impl Error {
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::PathNotFound { path: path.into() }
    }

    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
