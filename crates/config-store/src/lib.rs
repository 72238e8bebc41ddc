//! Configuration documents over a section tree
//!
//! Loads a configuration file through a [`DocumentEngine`], merges it against
//! an optional defaults file and writes the result back atomically.

pub mod document;
pub mod engine;
pub mod error;
pub mod io;
pub mod yaml;

pub use document::{ConfigDocument, LoadReport, LoadSource};
pub use engine::DocumentEngine;
pub use error::{Error, Result};
pub use yaml::YamlEngine;
