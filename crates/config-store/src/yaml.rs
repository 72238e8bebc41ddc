//! YAML document engine using serde_yaml
//!
//! Every mapping key becomes one node. Scalars become a single value,
//! sequences of scalars become one value per item, and mappings or nulls
//! become value-less sections. Comments are not preserved.

use std::path::Path;

use config_tree::path::{join_path, validate_segment};
use config_tree::{Node, SectionRef, SectionTree, Value, ValueKind};
use serde_yaml::{Mapping, Number, Value as YamlValue};

use crate::engine::DocumentEngine;
use crate::{Error, Result, io};

const INDENT: usize = 2;

/// Document engine for YAML files
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlEngine;

impl YamlEngine {
    pub fn new() -> Self {
        Self
    }

    /// Parse YAML text into a document-ordered node sequence.
    pub fn parse_str(&self, source: &str) -> Result<Vec<Node>> {
        parse_source("<string>", source)
    }

    /// Render a node sequence as YAML text.
    ///
    /// A node that has children is written as a mapping; values it carries
    /// itself are dropped since YAML cannot hold both.
    pub fn render(&self, nodes: &[Node]) -> Result<String> {
        let tree = SectionTree::from_nodes(nodes.iter().cloned());
        let mapping = mapping_of(tree.root());
        if mapping.is_empty() {
            return Ok(String::new());
        }
        Ok(serde_yaml::to_string(&YamlValue::Mapping(mapping))?)
    }
}

impl DocumentEngine for YamlEngine {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn parse(&self, path: &Path) -> Result<Vec<Node>> {
        let source = io::read_text(path)?;
        let nodes = parse_source(&path.display().to_string(), &source)?;
        tracing::debug!(path = %path.display(), nodes = nodes.len(), "Parsed YAML document");
        Ok(nodes)
    }

    fn compose(&self, path: &Path, nodes: &[Node]) -> Result<()> {
        let content = self.render(nodes).map_err(|e| Error::Compose {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        io::write_atomic(path, content.as_bytes())?;
        tracing::debug!(path = %path.display(), nodes = nodes.len(), "Composed YAML document");
        Ok(())
    }
}

fn parse_source(origin: &str, source: &str) -> Result<Vec<Node>> {
    let document: YamlValue =
        serde_yaml::from_str(source).map_err(|e| Error::parse(origin, e.to_string()))?;
    let mut nodes = Vec::new();
    match untagged(&document) {
        YamlValue::Null => {}
        YamlValue::Mapping(mapping) => walk(origin, mapping, "", 0, &mut nodes)?,
        _ => return Err(Error::parse(origin, "top level must be a mapping")),
    }
    Ok(nodes)
}

fn untagged(value: &YamlValue) -> &YamlValue {
    match value {
        YamlValue::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

fn walk(
    origin: &str,
    mapping: &Mapping,
    parent: &str,
    depth: usize,
    out: &mut Vec<Node>,
) -> Result<()> {
    let indentation = depth * INDENT;
    for (key, value) in mapping {
        let key = key_text(origin, key)?;
        let path = join_path(parent, &key);
        let value = untagged(value);

        let (values, raw) = match value {
            YamlValue::Mapping(_) | YamlValue::Null => (Vec::new(), format!("{key}:")),
            YamlValue::Sequence(items) => {
                let values = items
                    .iter()
                    .map(|item| scalar(origin, &path, item))
                    .collect::<Result<Vec<_>>>()?;
                (values, format!("{key}:"))
            }
            other => {
                let value = scalar(origin, &path, other)?;
                let raw = format!("{key}: {value}");
                (vec![value], raw)
            }
        };

        let line_number = out.len() + 1;
        out.push(
            Node::new(path.clone(), values)
                .with_layout(indentation, line_number)
                .with_raw(format!("{:indentation$}{raw}", "")),
        );
        if let YamlValue::Mapping(children) = value {
            walk(origin, children, &path, depth + 1, out)?;
        }
    }
    Ok(())
}

fn key_text(origin: &str, key: &YamlValue) -> Result<String> {
    let text = match untagged(key) {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        _ => return Err(Error::parse(origin, "mapping keys must be scalars")),
    };
    validate_segment(&text).map_err(|e| Error::parse(origin, e.to_string()))?;
    Ok(text)
}

fn scalar(origin: &str, path: &str, value: &YamlValue) -> Result<Value> {
    match untagged(value) {
        YamlValue::String(s) => Ok(Value::text(s.as_str())),
        YamlValue::Bool(b) => Ok(Value::new(b.to_string(), ValueKind::Boolean)),
        YamlValue::Number(n) if n.is_f64() => Ok(Value::new(n.to_string(), ValueKind::Float)),
        YamlValue::Number(n) => Ok(Value::new(n.to_string(), ValueKind::Integer)),
        YamlValue::Null => Ok(Value::new("", ValueKind::Null)),
        _ => Err(Error::parse(
            origin,
            format!("{path}: lists may only contain scalars"),
        )),
    }
}

fn mapping_of(section: SectionRef<'_>) -> Mapping {
    let mut mapping = Mapping::new();
    for (key, child) in section.children() {
        let value = if child.has_children() {
            if child.base_node().is_some_and(|node| !node.is_section()) {
                tracing::warn!(path = child.path(), "Dropping values of a section with children");
            }
            YamlValue::Mapping(mapping_of(child))
        } else {
            child
                .base_node()
                .map_or(YamlValue::Null, |node| yaml_values(node.values()))
        };
        mapping.insert(YamlValue::String(key.to_string()), value);
    }
    mapping
}

fn yaml_values(values: &[Value]) -> YamlValue {
    match values {
        [] => YamlValue::Null,
        [single] => yaml_scalar(single),
        many => YamlValue::Sequence(many.iter().map(yaml_scalar).collect()),
    }
}

fn yaml_scalar(value: &Value) -> YamlValue {
    let text = value.as_str();
    let fallback = || YamlValue::String(text.to_string());
    match value.kind() {
        ValueKind::String => fallback(),
        ValueKind::Integer => text
            .parse::<i64>()
            .map(Number::from)
            .or_else(|_| text.parse::<u64>().map(Number::from))
            .map_or_else(|_| fallback(), YamlValue::Number),
        ValueKind::Float => text
            .parse::<f64>()
            .map_or_else(|_| fallback(), |n| YamlValue::Number(Number::from(n))),
        ValueKind::Boolean => YamlValue::Bool(text.eq_ignore_ascii_case("true")),
        ValueKind::Null => YamlValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paths(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(Node::path).collect()
    }

    #[test]
    fn test_parse_preserves_document_order() {
        let nodes = YamlEngine::new()
            .parse_str("zeta: 1\nalpha:\n  inner: x\nmid: true\n")
            .unwrap();
        assert_eq!(paths(&nodes), vec!["zeta", "alpha", "alpha.inner", "mid"]);
    }

    #[test]
    fn test_parse_layout_and_kinds() {
        let nodes = YamlEngine::new()
            .parse_str("server:\n  port: 8080\n  ratio: 0.5\n  name: api\n  on: false\n")
            .unwrap();

        assert_eq!(nodes[0].indentation(), 0);
        assert_eq!(nodes[1].indentation(), 2);
        assert_eq!(nodes[1].line_number(), 2);
        assert_eq!(nodes[1].raw(), "  port: 8080");
        assert_eq!(nodes[1].values()[0].kind(), ValueKind::Integer);
        assert_eq!(nodes[2].values()[0].kind(), ValueKind::Float);
        assert_eq!(nodes[3].values()[0].kind(), ValueKind::String);
        assert_eq!(nodes[4].values()[0].kind(), ValueKind::Boolean);
    }

    #[test]
    fn test_parse_sequence_values() {
        let nodes = YamlEngine::new().parse_str("tags:\n  - a\n  - b\n").unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].values().len(), 2);
        assert_eq!(nodes[0].values()[1].as_str(), "b");
    }

    #[test]
    fn test_parse_rejects_nested_sequence_items() {
        let err = YamlEngine::new()
            .parse_str("items:\n  - name: a\n")
            .unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_rejects_dotted_keys() {
        assert!(YamlEngine::new().parse_str("a.b: 1\n").is_err());
    }

    #[test]
    fn test_parse_empty_document() {
        assert!(YamlEngine::new().parse_str("").unwrap().is_empty());
    }

    #[test]
    fn test_render_nested_mapping() {
        let engine = YamlEngine::new();
        let nodes = engine
            .parse_str("server:\n  host: localhost\n  port: 8080\n")
            .unwrap();
        assert_eq!(
            engine.render(&nodes).unwrap(),
            "server:\n  host: localhost\n  port: 8080\n"
        );
    }

    #[test]
    fn test_render_synthesized_section_as_null() {
        let engine = YamlEngine::new();
        let mut tree = SectionTree::new();
        tree.get_or_create(SectionTree::ROOT, "empty").unwrap();
        assert_eq!(engine.render(&tree.nodes()).unwrap(), "empty: null\n");
    }

    #[test]
    fn test_render_empty_document() {
        assert_eq!(YamlEngine::new().render(&[]).unwrap(), "");
    }

    #[test]
    fn test_render_keeps_text_values_as_strings() {
        let engine = YamlEngine::new();
        let nodes = vec![Node::new("port", Value::list(["8080"]))];
        let reparsed = engine.parse_str(&engine.render(&nodes).unwrap()).unwrap();
        assert_eq!(reparsed[0].values()[0].kind(), ValueKind::String);
        assert_eq!(reparsed[0].values()[0].as_str(), "8080");
    }
}
