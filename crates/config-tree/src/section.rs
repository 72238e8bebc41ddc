//! Read-only view of one section of a [`SectionTree`]

use std::collections::HashSet;

use crate::node::Node;
use crate::path::{SEPARATOR, strip_path_prefix};
use crate::tree::{SectionId, SectionTree};

/// Borrowed handle to a section, used for lookups and typed reads
#[derive(Debug, Clone, Copy)]
pub struct SectionRef<'a> {
    tree: &'a SectionTree,
    id: SectionId,
}

impl<'a> SectionRef<'a> {
    pub(crate) fn new(tree: &'a SectionTree, id: SectionId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    /// The node this section wraps; `None` for the document root.
    pub fn base_node(&self) -> Option<&'a Node> {
        self.tree.node(self.id)
    }

    /// Dotted path of this section, empty for the root.
    pub fn path(&self) -> &'a str {
        self.tree.position(self.id)
    }

    pub fn parent(&self) -> Option<SectionRef<'a>> {
        self.tree
            .parent(self.id)
            .map(|id| SectionRef::new(self.tree, id))
    }

    /// Immediate children in insertion order.
    pub fn children(self) -> impl Iterator<Item = (&'a str, SectionRef<'a>)> {
        let tree = self.tree;
        tree.children(self.id)
            .iter()
            .map(move |(key, id)| (key.as_str(), SectionRef::new(tree, *id)))
    }

    pub fn has_children(&self) -> bool {
        !self.tree.children(self.id).is_empty()
    }

    /// Section at `path` relative to this one.
    pub fn get_section(&self, path: &str) -> Option<SectionRef<'a>> {
        self.tree
            .resolve(self.id, path)
            .map(|id| SectionRef::new(self.tree, id))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get_section(path).is_some()
    }

    /// Node at `path` relative to this section.
    pub fn get_node(&self, path: &str) -> Option<&'a Node> {
        self.get_section(path).and_then(|section| section.base_node())
    }

    /// True when `path` exists and its node carries no values.
    pub fn is_configuration_section(&self, path: &str) -> bool {
        self.get_node(path).is_some_and(Node::is_section)
    }

    /// Every descendant node in pre-order; this section's own node is not
    /// included.
    pub fn flatten(&self) -> Vec<Node> {
        self.tree.flatten(self.id)
    }

    /// Child names in document order.
    ///
    /// With `deep`, every descendant is listed by its path relative to this
    /// section instead of only the first segment.
    pub fn keys_linked(&self, deep: bool) -> Vec<String> {
        let prefix = self.path();
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for node in self.tree.descendants(self.id) {
            let relative = strip_path_prefix(node.path(), prefix).unwrap_or(node.path());
            let key = if deep {
                relative
            } else {
                relative.split(SEPARATOR).next().unwrap_or(relative)
            };
            if seen.insert(key) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// Child names without ordering guarantees.
    pub fn keys(&self, deep: bool) -> HashSet<String> {
        self.keys_linked(deep).into_iter().collect()
    }
}
