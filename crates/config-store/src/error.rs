//! Error types for config-store

use std::path::PathBuf;

/// Result type for config-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or saving a configuration document
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Failed to compose {path}: {message}")]
    Compose { path: PathBuf, message: String },

    #[error("No configuration at {path} and no defaults configured")]
    NoSource { path: PathBuf },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error(transparent)]
    Tree(#[from] config_tree::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            origin: origin.into(),
            message: message.into(),
        }
    }
}
