//! Tests for merging a user document into a defaults template

use config_tree::{Node, SectionTree, Value, merge_defaults};
use pretty_assertions::assert_eq;

fn node(path: &str, values: &[&str]) -> Node {
    Node::new(path, Value::list(values.iter().copied()))
}

fn paths(nodes: &[Node]) -> Vec<&str> {
    nodes.iter().map(Node::path).collect()
}

#[test]
fn test_user_value_wins_and_unknown_paths_drop() {
    let defaults = vec![node("x", &[]), node("x.y", &["default"])];
    let user = vec![node("x", &[]), node("x.y", &["custom"]), node("x.z", &["extra"])];

    let merged = merge_defaults(&defaults, &user);
    let tree = SectionTree::from_nodes(merged.nodes);

    assert_eq!(tree.root().get_string("x.y"), "custom");
    assert!(!tree.root().contains("x.z"));
    assert_eq!(merged.discarded, vec!["x.z"]);
    assert!(merged.backfilled.is_empty());
}

#[test]
fn test_missing_user_paths_are_backfilled_in_default_order() {
    let defaults = vec![
        node("server", &[]),
        node("server.host", &["0.0.0.0"]),
        node("server.port", &["80"]),
        node("debug", &["false"]),
    ];
    let user = vec![node("debug", &["true"]), node("server", &[]), node("server.port", &["8080"])];

    let merged = merge_defaults(&defaults, &user);

    assert_eq!(
        paths(&merged.nodes),
        vec!["server", "server.host", "server.port", "debug"]
    );
    assert_eq!(merged.backfilled, vec!["server.host"]);
    let tree = SectionTree::from_nodes(merged.nodes);
    assert_eq!(tree.root().get_int("server.port"), 8080);
    assert_eq!(tree.root().get_string("server.host"), "0.0.0.0");
    assert!(tree.root().get_bool("debug"));
}

#[test]
fn test_user_layout_is_kept_for_overrides() {
    let defaults = vec![node("a", &["1"]).with_layout(0, 1)];
    let user = vec![node("a", &["2"]).with_layout(0, 17).with_raw("a: 2 # mine")];

    let merged = merge_defaults(&defaults, &user);

    assert_eq!(merged.nodes[0].line_number(), 17);
    assert_eq!(merged.nodes[0].raw(), "a: 2 # mine");
}

#[test]
fn test_empty_user_document_yields_defaults() {
    let defaults = vec![node("a", &[]), node("a.b", &["1"])];
    let merged = merge_defaults(&defaults, &[]);
    assert_eq!(paths(&merged.nodes), vec!["a", "a.b"]);
    assert_eq!(merged.backfilled, vec!["a", "a.b"]);
}

#[test]
fn test_empty_defaults_discard_everything() {
    let user = vec![node("a", &["1"]), node("b", &["2"])];
    let merged = merge_defaults(&[], &user);
    assert!(merged.nodes.is_empty());
    assert_eq!(merged.discarded, vec!["a", "b"]);
}

#[test]
fn test_first_user_occurrence_wins() {
    let defaults = vec![node("a", &["0"])];
    let user = vec![node("a", &["first"]), node("a", &["second"])];
    let merged = merge_defaults(&defaults, &user);
    assert_eq!(merged.nodes.len(), 1);
    assert_eq!(merged.nodes[0].values()[0].as_str(), "first");
    assert!(merged.discarded.is_empty());
}
