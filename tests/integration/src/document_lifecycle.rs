//! End-to-end document lifecycle
//!
//! Exercises the full flow: seed from defaults -> edit -> save -> reload with
//! default-merge.

use config_store::{ConfigDocument, LoadSource};
use config_tree::{SectionTree, Value};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const DEFAULTS: &str = "\
server:
  host: localhost
  port: 8080
x:
  y: default
";

fn setup() -> (TempDir, ConfigDocument) {
    let temp = TempDir::new().unwrap();
    let defaults = temp.path().join("defaults.yml");
    fs::write(&defaults, DEFAULTS).unwrap();
    fs::write(
        temp.path().join("config.yml"),
        "x:\n  y: custom\n  z: extra\nserver:\n  port: 9000\n",
    )
    .unwrap();

    let doc = ConfigDocument::new(temp.path().join("config.yml")).with_defaults(defaults);
    (temp, doc)
}

#[test]
fn test_load_edit_save_reload() {
    let (_temp, mut doc) = setup();

    let report = doc.load().unwrap();
    assert_eq!(report.source, LoadSource::Primary);
    assert_eq!(report.discarded, vec!["x.z"]);
    assert!(report.saved);

    let tree = doc.tree_mut();
    tree.set_or_create_at(SectionTree::ROOT, "banner", 0, Value::list(["hello"]))
        .unwrap();
    tree.set_text_or_create(SectionTree::ROOT, "x.w", &["added"])
        .unwrap();
    assert!(doc.save());

    let written = fs::read_to_string(doc.file()).unwrap();
    insta::assert_snapshot!(written, @r"
banner: hello
server:
  host: localhost
  port: 9000
x:
  y: custom
  w: added
");

    // Paths outside the defaults do not survive a merging load.
    let report = doc.load().unwrap();
    assert_eq!(report.discarded, vec!["banner", "x.w"]);
    assert!(report.backfilled.is_empty());
    assert_eq!(
        doc.root().keys_linked(true),
        vec!["server", "server.host", "server.port", "x", "x.y"]
    );
}

#[test]
fn test_non_merging_load_keeps_edits() {
    let (_temp, mut doc) = setup();
    doc.load().unwrap();
    doc.set_or_create("x.w", Value::list(["added"])).unwrap();
    assert!(doc.save());

    let report = doc.load_with(false).unwrap();

    assert!(!report.merged);
    assert_eq!(doc.root().get_string("x.w"), "added");
}

#[test]
fn test_first_run_seeds_file_from_defaults() {
    let temp = TempDir::new().unwrap();
    let defaults = temp.path().join("defaults.yml");
    fs::write(&defaults, DEFAULTS).unwrap();
    let file = temp.path().join("config.yml");

    let mut doc = ConfigDocument::new(&file).with_defaults(&defaults);
    let report = doc.load().unwrap();

    assert_eq!(report.source, LoadSource::Defaults);
    assert!(report.saved);
    assert_eq!(fs::read_to_string(&file).unwrap(), DEFAULTS);
    assert_eq!(doc.root().get_int_or("server.port", 0), 8080);
}

#[test]
fn test_typed_reads_through_document_root() {
    let (_temp, mut doc) = setup();
    doc.load().unwrap();
    let root = doc.root();

    let port = root.fetch("server.port", 1_i32);
    assert_eq!(*port.value(), 9000);
    assert!(!port.is_defaulted());

    let host = root.fetch("server.host", 0_i32);
    assert!(host.is_defaulted());

    let section = root.get_section("server").unwrap();
    assert_eq!(section.get_string("host"), "localhost");
    assert_eq!(section.keys_linked(false), vec!["host", "port"]);
    assert!(root.is_configuration_section("x"));
}
