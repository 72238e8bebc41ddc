//! Document engine boundary

use std::fmt;
use std::path::Path;

use config_tree::Node;

use crate::Result;

/// Reads a document into a flat node sequence and writes one back.
///
/// Parsed nodes come in document order, ancestors before descendants, each
/// carrying its full dotted path. Formatting fidelity is the engine's
/// business; callers only rely on node order and content.
pub trait DocumentEngine: fmt::Debug + Send + Sync {
    /// Engine identifier, used in logs
    fn name(&self) -> &'static str;

    /// Parse the document stored at `path`.
    fn parse(&self, path: &Path) -> Result<Vec<Node>>;

    /// Write `nodes` to `path`, replacing its content.
    fn compose(&self, path: &Path, nodes: &[Node]) -> Result<()>;
}
