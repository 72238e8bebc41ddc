//! Default-merge of a user document against a defaults template
//!
//! The defaults document dictates shape and order. The user document only
//! supplies values for paths the defaults already know; anything else in the
//! user document is discarded.

use std::collections::{HashMap, HashSet};

use crate::node::Node;

/// Result of [`merge_defaults`]
#[derive(Debug, Clone, Default)]
pub struct Merged {
    /// One node per default path, in default order
    pub nodes: Vec<Node>,
    /// Default paths the user document did not have
    pub backfilled: Vec<String>,
    /// User paths unknown to the defaults, left out of `nodes`
    pub discarded: Vec<String>,
}

/// Merge `user` into the shape of `defaults`.
///
/// ```
/// use config_tree::{Node, Value, merge_defaults};
///
/// let defaults = [Node::new("x", Vec::new()), Node::new("x.y", Value::list(["default"]))];
/// let user = [
///     Node::new("x", Vec::new()),
///     Node::new("x.y", Value::list(["custom"])),
///     Node::new("x.z", Value::list(["extra"])),
/// ];
/// let merged = merge_defaults(&defaults, &user);
/// assert_eq!(merged.nodes[1].values()[0].as_str(), "custom");
/// assert_eq!(merged.discarded, vec!["x.z".to_string()]);
/// ```
pub fn merge_defaults(defaults: &[Node], user: &[Node]) -> Merged {
    let mut by_path: HashMap<&str, &Node> = HashMap::with_capacity(user.len());
    for node in user {
        by_path.entry(node.path()).or_insert(node);
    }

    let mut merged = Merged::default();
    let mut emitted = HashSet::with_capacity(defaults.len());
    for default in defaults {
        if !emitted.insert(default.path()) {
            continue;
        }
        match by_path.remove(default.path()) {
            Some(custom) => merged.nodes.push(custom.clone()),
            None => {
                merged.backfilled.push(default.path().to_string());
                merged.nodes.push(default.clone());
            }
        }
    }

    for node in user {
        if by_path.remove(node.path()).is_some() {
            merged.discarded.push(node.path().to_string());
        }
    }

    tracing::debug!(
        kept = merged.nodes.len(),
        backfilled = merged.backfilled.len(),
        discarded = merged.discarded.len(),
        "Merged document with defaults"
    );
    merged
}
