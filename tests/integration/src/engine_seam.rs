//! Documents driven through a caller-supplied engine

use config_store::{ConfigDocument, DocumentEngine, Error, Result};
use config_tree::{Node, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Serves a fixed node sequence and accepts every write unless told to fail.
#[derive(Debug, Default)]
struct MemoryEngine {
    nodes: Vec<Node>,
    fail_compose: bool,
}

impl DocumentEngine for MemoryEngine {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn parse(&self, _path: &Path) -> Result<Vec<Node>> {
        Ok(self.nodes.clone())
    }

    fn compose(&self, path: &Path, _nodes: &[Node]) -> Result<()> {
        if self.fail_compose {
            return Err(Error::Compose {
                path: path.to_path_buf(),
                message: "read-only".into(),
            });
        }
        Ok(())
    }
}

fn existing_file(temp: &TempDir) -> std::path::PathBuf {
    let file = temp.path().join("config.mem");
    fs::write(&file, "").unwrap();
    file
}

#[test]
fn test_save_failure_inside_load_is_observable() {
    let temp = TempDir::new().unwrap();
    let engine = MemoryEngine {
        nodes: vec![Node::new("a", Vec::new()), Node::new("a.b", Value::list(["5"]))],
        fail_compose: true,
        ..Default::default()
    };
    let mut doc = ConfigDocument::new(existing_file(&temp)).with_engine(engine);

    let report = doc.load().unwrap();

    assert!(!report.saved);
    assert_eq!(doc.root().get_int("a.b"), 5);
    assert!(doc.root().is_configuration_section("a"));
}

#[test]
fn test_orphan_nodes_are_reported() {
    let temp = TempDir::new().unwrap();
    let engine = MemoryEngine {
        nodes: vec![
            Node::new("a", Value::list(["1"])),
            Node::new("lost.child", Value::list(["2"])),
        ],
        ..Default::default()
    };
    let mut doc = ConfigDocument::new(existing_file(&temp)).with_engine(engine);

    let report = doc.load().unwrap();

    assert_eq!(report.dropped, vec!["lost.child"]);
    assert!(report.saved);
    assert!(!doc.root().contains("lost"));
}
