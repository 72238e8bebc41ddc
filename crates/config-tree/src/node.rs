//! Document nodes as produced and consumed by a document engine

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::path::{last_segment, parent_path};

/// Type tag attached to a scalar value by the engine that read it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueKind {
    #[default]
    String,
    Integer,
    Float,
    Boolean,
    Null,
}

/// A scalar value: its textual representation plus a type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    text: String,
    kind: ValueKind,
}

impl Value {
    pub fn new(text: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// A plain string value.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, ValueKind::String)
    }

    /// Build a value list of plain strings.
    ///
    /// ```
    /// use config_tree::Value;
    ///
    /// let values = Value::list(["red", "green"]);
    /// assert_eq!(values[1].as_str(), "green");
    /// ```
    pub fn list<I, S>(items: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        items.into_iter().map(Self::text).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// An addressable document element.
///
/// Nodes compare and hash by their dotted path only: two nodes with the same
/// path are the same document element, whatever values or layout they carry.
/// A node without values is a pure section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    path: String,
    key: String,
    parent: Option<String>,
    indentation: usize,
    line_number: usize,
    raw: String,
    values: Vec<Value>,
}

impl Node {
    /// Create a node for `path` with default layout (two spaces per level).
    pub fn new(path: impl Into<String>, values: Vec<Value>) -> Self {
        let path = path.into();
        let key = last_segment(&path).to_string();
        let parent = parent_path(&path).map(str::to_string);
        let indentation = parent.as_deref().map_or(0, |p| (p.matches('.').count() + 1) * 2);
        let raw = format!("{key}:");
        Self {
            path,
            key,
            parent,
            indentation,
            line_number: 0,
            raw,
            values,
        }
    }

    /// Fabricate an empty section node, as done when intermediate sections
    /// are created on demand.
    pub fn section(path: impl Into<String>, indentation: usize, line_number: usize) -> Self {
        Self::new(path, Vec::new()).with_layout(indentation, line_number)
    }

    pub fn with_layout(mut self, indentation: usize, line_number: usize) -> Self {
        self.indentation = indentation;
        self.line_number = line_number;
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    /// Full dotted path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last path segment.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Dotted path of the enclosing node, `None` at top level.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn indentation(&self) -> usize {
        self.indentation
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Source line text as the engine read it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Vec<Value> {
        &mut self.values
    }

    pub fn set_values(&mut self, values: Vec<Value>) {
        self.values = values;
    }

    /// True when the node carries no values and only groups children.
    pub fn is_section(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
