//! Arena-backed section tree
//!
//! Sections live in a dense vector and refer to each other by [`SectionId`].
//! Every live section is also registered under its dotted position path so
//! absolute lookups do not have to walk the tree. Replacing a child detaches
//! the old subtree: its records stay in the arena but are no longer reachable
//! or indexed, until [`SectionTree::compact`] releases them.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::node::{Node, Value};
use crate::path::{
    join_path, last_segment, parent_path, split_path, strip_path_prefix, validate_segment,
};
use crate::section::SectionRef;

/// Handle to a section inside a [`SectionTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionId(usize);

#[derive(Debug, Clone)]
struct Record {
    node: Option<Node>,
    parent: Option<SectionId>,
    position: String,
    children: Vec<(String, SectionId)>,
}

impl Record {
    fn new(node: Option<Node>, parent: Option<SectionId>, position: String) -> Self {
        Self {
            node,
            parent,
            position,
            children: Vec::new(),
        }
    }
}

/// Outcome of decoding a flat node sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    /// Number of nodes attached to the tree
    pub attached: usize,
    /// Paths of nodes whose parent section did not exist yet
    pub dropped: Vec<String>,
}

/// Ordered tree of sections, one per document node.
///
/// The root section has no base node and stands for the document itself.
#[derive(Debug, Clone)]
pub struct SectionTree {
    records: Vec<Record>,
    index: HashMap<String, SectionId>,
}

impl Default for SectionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionTree {
    /// Handle of the document root.
    pub const ROOT: SectionId = SectionId(0);

    pub fn new() -> Self {
        Self {
            records: vec![Record::new(None, None, String::new())],
            index: HashMap::new(),
        }
    }

    /// Build a tree by decoding a flat node sequence.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Self {
        let mut tree = Self::new();
        tree.decode(nodes);
        tree
    }

    pub fn root(&self) -> SectionRef<'_> {
        self.section(Self::ROOT)
    }

    pub fn section(&self, id: SectionId) -> SectionRef<'_> {
        SectionRef::new(self, id)
    }

    pub fn is_empty(&self) -> bool {
        self.records[Self::ROOT.0].children.is_empty()
    }

    /// Base node of a section; `None` for the root.
    pub fn node(&self, id: SectionId) -> Option<&Node> {
        self.records[id.0].node.as_ref()
    }

    pub fn node_mut(&mut self, id: SectionId) -> Option<&mut Node> {
        self.records[id.0].node.as_mut()
    }

    pub(crate) fn position(&self, id: SectionId) -> &str {
        &self.records[id.0].position
    }

    pub(crate) fn parent(&self, id: SectionId) -> Option<SectionId> {
        self.records[id.0].parent
    }

    pub(crate) fn children(&self, id: SectionId) -> &[(String, SectionId)] {
        &self.records[id.0].children
    }

    fn child(&self, parent: SectionId, key: &str) -> Option<SectionId> {
        self.records[parent.0]
            .children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, id)| *id)
    }

    /// Look up a section by its absolute dotted path.
    pub fn find(&self, path: &str) -> Option<SectionId> {
        self.index.get(path).copied()
    }

    /// Resolve `path` relative to `at`, one segment per level.
    pub fn resolve(&self, at: SectionId, path: &str) -> Option<SectionId> {
        let segments = split_path(path).ok()?;
        let mut current = at;
        for segment in segments {
            current = self.child(current, segment)?;
        }
        Some(current)
    }

    /// Resolve `path` relative to `at`, appending a fresh empty section for
    /// every missing segment.
    ///
    /// ```
    /// use config_tree::SectionTree;
    ///
    /// let mut tree = SectionTree::new();
    /// let first = tree.get_or_create(SectionTree::ROOT, "p.q.r").unwrap();
    /// let again = tree.get_or_create(SectionTree::ROOT, "p.q.r").unwrap();
    /// assert_eq!(first, again);
    /// assert_eq!(tree.nodes().len(), 3);
    /// ```
    pub fn get_or_create(&mut self, at: SectionId, path: &str) -> Result<SectionId> {
        self.create_path(at, path, None)
    }

    /// Like [`get_or_create`](Self::get_or_create), but the first missing
    /// section is inserted at `index` among its existing siblings.
    ///
    /// The index is checked before anything is created.
    pub fn get_or_create_at(&mut self, at: SectionId, path: &str, index: usize) -> Result<SectionId> {
        self.create_path(at, path, Some(index))
    }

    fn create_path(&mut self, at: SectionId, path: &str, index: Option<usize>) -> Result<SectionId> {
        let segments = split_path(path)?;
        let mut current = at;
        let mut missing = segments.as_slice();
        while let Some((segment, rest)) = missing.split_first() {
            let Some(existing) = self.child(current, segment) else {
                break;
            };
            current = existing;
            missing = rest;
        }
        if missing.is_empty() {
            return Ok(current);
        }
        if let Some(index) = index {
            self.check_index(current, index)?;
        }

        let mut position = index;
        for segment in missing {
            let node = self.synthesize(current, segment, position.is_some());
            current = self.insert_child(current, segment, node, position.take())?;
        }
        Ok(current)
    }

    fn check_index(&self, parent: SectionId, index: usize) -> Result<()> {
        let len = self.records[parent.0].children.len();
        if index > len {
            return Err(Error::IndexOutOfRange {
                parent: self.records[parent.0].position.clone(),
                index,
                len,
            });
        }
        Ok(())
    }

    fn synthesize(&self, parent: SectionId, segment: &str, positional: bool) -> Node {
        let record = &self.records[parent.0];
        let (mut indentation, line_number) = match &record.node {
            Some(base) => (base.indentation() + 2, base.line_number() + 1),
            None => (0, 1),
        };
        if positional {
            if let Some(sibling) = record
                .children
                .first()
                .and_then(|(_, id)| self.records[id.0].node.as_ref())
            {
                indentation = sibling.indentation();
            }
        }
        let path = join_path(&record.position, segment);
        tracing::debug!(%path, indentation, "Creating missing section");
        Node::section(path, indentation, line_number)
    }

    /// Attach a section for `node` at the position implied by its path.
    ///
    /// The node path is absolute. When it lies under `at`, the segments that
    /// `at` already covers are skipped; every remaining intermediate section
    /// must exist. An existing child with the same key is replaced in place.
    pub fn create_section(&mut self, at: SectionId, node: Node) -> Result<SectionId> {
        self.place(at, node, None)
    }

    /// Attach a section for `node` before the child currently at `index`.
    pub fn create_section_at(&mut self, at: SectionId, node: Node, index: usize) -> Result<SectionId> {
        self.place(at, node, Some(index))
    }

    fn place(&mut self, at: SectionId, node: Node, index: Option<usize>) -> Result<SectionId> {
        let anchor = self.position(at);
        let relative = strip_path_prefix(node.path(), anchor).ok_or_else(|| Error::OutsideSection {
            path: node.path().to_string(),
            section: anchor.to_string(),
        })?;
        let segments: Vec<String> = split_path(relative)?
            .into_iter()
            .map(str::to_string)
            .collect();
        let Some((key, intermediate)) = segments.split_last() else {
            return Err(Error::invalid_path(node.path(), "path is empty"));
        };

        let mut parent = at;
        for segment in intermediate {
            parent = self.child(parent, segment).ok_or_else(|| {
                Error::not_found(join_path(self.position(parent), segment))
            })?;
        }
        self.insert_child(parent, key, node, index)
    }

    /// Insert a child before the entry currently at `index`.
    ///
    /// `index` equal to the child count appends. An existing child with the
    /// same key is moved to the new position and replaced. The node path
    /// must be the parent's path joined with `key`.
    pub fn add_child_at(&mut self, parent: SectionId, index: usize, key: &str, node: Node) -> Result<SectionId> {
        validate_segment(key)?;
        let expected = join_path(self.position(parent), key);
        if node.path() != expected {
            return Err(Error::invalid_path(
                node.path(),
                format!("node does not belong at {expected}"),
            ));
        }
        self.insert_child(parent, key, node, Some(index))
    }

    fn insert_child(
        &mut self,
        parent: SectionId,
        key: &str,
        node: Node,
        index: Option<usize>,
    ) -> Result<SectionId> {
        let existing = self.records[parent.0]
            .children
            .iter()
            .position(|(k, _)| k == key);
        if let Some(index) = index {
            self.check_index(parent, index)?;
        }

        let position = join_path(&self.records[parent.0].position, key);
        let id = SectionId(self.records.len());
        self.records
            .push(Record::new(Some(node), Some(parent), position.clone()));

        match (existing, index) {
            (Some(slot), None) => {
                let old = std::mem::replace(&mut self.records[parent.0].children[slot].1, id);
                self.detach(old);
            }
            (Some(slot), Some(index)) => {
                let (_, old) = self.records[parent.0].children.remove(slot);
                self.detach(old);
                // `index` counts the removed entry.
                let index = if slot < index { index - 1 } else { index };
                self.records[parent.0]
                    .children
                    .insert(index, (key.to_string(), id));
            }
            (None, None) => self.records[parent.0].children.push((key.to_string(), id)),
            (None, Some(index)) => self.records[parent.0]
                .children
                .insert(index, (key.to_string(), id)),
        }
        self.index.insert(position, id);
        Ok(id)
    }

    fn detach(&mut self, id: SectionId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let record = &mut self.records[current.0];
            record.parent = None;
            if self.index.get(&record.position) == Some(&current) {
                self.index.remove(&record.position);
            }
            stack.extend(record.children.iter().map(|(_, child)| *child));
        }
    }

    /// Attach a flat, document-ordered node sequence.
    ///
    /// Each node is attached under the section named by its parent path.
    /// Missing intermediate sections are never synthesized: a node whose
    /// parent has not been attached yet is dropped and reported.
    pub fn decode(&mut self, nodes: impl IntoIterator<Item = Node>) -> DecodeReport {
        let mut report = DecodeReport::default();
        for node in nodes {
            let path = node.path().to_string();
            let key = last_segment(&path);
            let parent = match parent_path(&path) {
                None => Some(Self::ROOT),
                Some(parent) => self.find(parent),
            };

            let attached = match parent {
                Some(parent) if validate_segment(key).is_ok() => {
                    self.insert_child(parent, key, node, None).is_ok()
                }
                _ => false,
            };
            if attached {
                report.attached += 1;
            } else {
                tracing::warn!(%path, "Dropping node without a parent section");
                report.dropped.push(path);
            }
        }
        report
    }

    pub(crate) fn descendants(&self, at: SectionId) -> Vec<&Node> {
        let mut out = Vec::new();
        self.collect(at, &mut out);
        out
    }

    fn collect<'a>(&'a self, at: SectionId, out: &mut Vec<&'a Node>) {
        for (_, child) in &self.records[at.0].children {
            if let Some(node) = &self.records[child.0].node {
                out.push(node);
            }
            self.collect(*child, out);
        }
    }

    /// Pre-order node sequence below `at`, excluding `at`'s own node.
    pub fn flatten(&self, at: SectionId) -> Vec<Node> {
        self.descendants(at).into_iter().cloned().collect()
    }

    /// Every node of the document in tree order.
    pub fn nodes(&self) -> Vec<Node> {
        self.flatten(Self::ROOT)
    }

    /// Rebuild the arena from the live sections, dropping detached ones.
    ///
    /// Returns the number of records released. Every [`SectionId`] obtained
    /// before compacting is invalidated.
    pub fn compact(&mut self) -> usize {
        let before = self.records.len();
        let mut compacted = Self::new();
        compacted.decode(self.nodes());
        *self = compacted;
        let released = before.saturating_sub(self.records.len());
        tracing::debug!(released, "Compacted section tree");
        released
    }

    /// Replace the values of an existing node.
    pub fn set(&mut self, at: SectionId, path: &str, values: Vec<Value>) -> Result<()> {
        let id = self
            .resolve(at, path)
            .ok_or_else(|| Error::not_found(path))?;
        self.replace_values(id, path, values)
    }

    /// Replace the values of a node, creating it and its ancestors if needed.
    pub fn set_or_create(&mut self, at: SectionId, path: &str, values: Vec<Value>) -> Result<SectionId> {
        let id = self.get_or_create(at, path)?;
        self.replace_values(id, path, values)?;
        Ok(id)
    }

    /// Like [`set_or_create`](Self::set_or_create) with positional creation.
    pub fn set_or_create_at(
        &mut self,
        at: SectionId,
        path: &str,
        index: usize,
        values: Vec<Value>,
    ) -> Result<SectionId> {
        let id = self.get_or_create_at(at, path, index)?;
        self.replace_values(id, path, values)?;
        Ok(id)
    }

    pub fn set_text(&mut self, at: SectionId, path: &str, values: &[&str]) -> Result<()> {
        self.set(at, path, Value::list(values.iter().copied()))
    }

    pub fn set_text_or_create(&mut self, at: SectionId, path: &str, values: &[&str]) -> Result<SectionId> {
        self.set_or_create(at, path, Value::list(values.iter().copied()))
    }

    /// Replace the value at `position` in a node's value list.
    ///
    /// Positions past the end overwrite the last value; an empty list gets
    /// the value appended.
    pub fn set_value(&mut self, at: SectionId, path: &str, value: Value, position: usize) -> Result<()> {
        let id = self
            .resolve(at, path)
            .ok_or_else(|| Error::not_found(path))?;
        let node = self.node_mut(id).ok_or_else(|| Error::not_found(path))?;
        let values = node.values_mut();
        match values.len() {
            0 => values.push(value),
            len => values[position.min(len - 1)] = value,
        }
        Ok(())
    }

    fn replace_values(&mut self, id: SectionId, path: &str, values: Vec<Value>) -> Result<()> {
        self.node_mut(id)
            .ok_or_else(|| Error::not_found(path))?
            .set_values(values);
        Ok(())
    }
}
