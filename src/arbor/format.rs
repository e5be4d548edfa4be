//! # Persisted Format
//!
//! Documents are stored as UTF-8 JSON: the root object and its `children`,
//! recursively. `.tree` and `.json` files carry the same payload.
//!
//! ```json
//! {
//!   "id": "root",
//!   "text": "",
//!   "children": [
//!     { "id": "node-1", "text": "Groceries", "children": [], "bold": false,
//!       "color": "red", "collapsed": false, "memo": "" }
//!   ]
//! }
//! ```
//!
//! ## Reading
//!
//! Files come from other tools and older versions, so the reader is lenient
//! about what it can repair and strict about what would break the tree:
//!
//! - missing `text`, `memo`, `bold`, `collapsed`, `color` take their defaults;
//!   an unknown color name reads as no color; an `expanded` flag is honoured
//!   when `collapsed` is absent
//! - a non-root node without `children` has none; the root must have them
//! - a node with a missing or empty id gets a fresh `node-<N>` id
//! - duplicate ids, a non-root node named `root`, wrong field types and
//!   excessive nesting reject the whole file
//!
//! The id counter resumes at one past the largest `node-<N>` suffix found.
//! Files whose ids would push it past [`MAX_NEXT_ID`] are rejected.
//!
//! ## Writing
//!
//! Pretty-printed JSON with every decoration spelled out. The root is written
//! with just `id`, `text` and `children`.

use crate::error::{LoadError, Result};
use crate::model::{Color, Node, NodeId, ROOT_ID};
use crate::tree::{Tree, MAX_NEXT_ID};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Deepest node level accepted on load. Comfortably inside what the JSON
/// parser itself will nest.
pub const MAX_DEPTH: usize = 60;

/// What a successful load found and fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Real nodes loaded (the root is not counted).
    pub nodes: usize,
    /// Nodes that had no usable id and were given one.
    pub repaired_ids: usize,
    /// Counter value the document resumes with.
    pub next_id: u64,
}

pub fn parse(text: &str) -> std::result::Result<(Tree, LoadReport), LoadError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        if e.to_string().contains("recursion limit") {
            LoadError::TooDeep { limit: MAX_DEPTH }
        } else {
            LoadError::Malformed(e.to_string())
        }
    })?;
    let Value::Object(root) = &value else {
        return Err(LoadError::NotATree);
    };

    let children = match root.get("children") {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => {
            return Err(LoadError::MissingChildren {
                node: ROOT_ID.to_string(),
            })
        }
        Some(_) => return Err(malformed(ROOT_ID, "children", "an array")),
    };

    let mut reader = Reader::default();
    let mut top = Vec::with_capacity(children.len());
    for child in children {
        top.push(reader.node(child, 1)?);
    }

    let mut root_node = Node::root();
    root_node.children = top;

    let exhausted = LoadError::IdsExhausted { limit: MAX_NEXT_ID };
    let mut next_id = match reader.max_suffix {
        None => 1,
        Some(n) => n
            .checked_add(1)
            .filter(|&next| next <= MAX_NEXT_ID)
            .ok_or_else(|| exhausted.clone())?,
    };
    let repaired = assign_missing_ids(&mut root_node, &mut next_id);
    if next_id > MAX_NEXT_ID {
        return Err(exhausted);
    }
    if repaired > 0 {
        tracing::warn!(repaired, "assigned ids to nodes that had none");
    }

    let tree = Tree::from_parts(root_node, next_id);
    let report = LoadReport {
        nodes: tree.len(),
        repaired_ids: repaired,
        next_id,
    };
    Ok((tree, report))
}

#[derive(Default)]
struct Reader {
    seen: HashSet<String>,
    max_suffix: Option<u64>,
}

impl Reader {
    fn node(&mut self, value: &Value, depth: usize) -> std::result::Result<Node, LoadError> {
        if depth > MAX_DEPTH {
            return Err(LoadError::TooDeep { limit: MAX_DEPTH });
        }
        let Value::Object(obj) = value else {
            return Err(LoadError::Malformed(format!(
                "expected a node object at level {}",
                depth
            )));
        };

        let id = self.id(obj)?;
        let label = if id.is_empty() { "(no id)" } else { id.as_str() };

        let text = string_field(obj, "text", label)?;
        let memo = string_field(obj, "memo", label)?;
        let bold = bool_field(obj, "bold", label)?.unwrap_or(false);
        let collapsed = match bool_field(obj, "collapsed", label)? {
            Some(c) => c,
            None => bool_field(obj, "expanded", label)? == Some(false),
        };
        let color = match obj.get("color") {
            Some(Value::String(name)) => name.parse::<Color>().ok(),
            Some(Value::Null) | None => None,
            Some(_) => return Err(malformed(label, "color", "a string or null")),
        };

        let children = match obj.get("children") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|c| self.node(c, depth + 1))
                .collect::<std::result::Result<Vec<_>, _>>()?,
            Some(Value::Null) | None => Vec::new(),
            Some(_) => return Err(malformed(label, "children", "an array")),
        };

        Ok(Node {
            id: NodeId::new(id),
            text,
            children,
            bold,
            color,
            collapsed,
            memo,
        })
    }

    /// The node's id, or an empty string when it needs one assigned.
    fn id(&mut self, obj: &Map<String, Value>) -> std::result::Result<String, LoadError> {
        let id = match obj.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Null) | None => String::new(),
            Some(_) => return Err(malformed("(unknown)", "id", "a string")),
        };
        if id.is_empty() {
            return Ok(id);
        }
        if id == ROOT_ID {
            return Err(LoadError::ReservedId(id));
        }
        if !self.seen.insert(id.clone()) {
            return Err(LoadError::DuplicateId(id));
        }
        if let Some(n) = NodeId::new(id.as_str()).counter_suffix() {
            self.max_suffix = Some(self.max_suffix.map_or(n, |m| m.max(n)));
        }
        Ok(id)
    }
}

fn string_field(
    obj: &Map<String, Value>,
    field: &str,
    node: &str,
) -> std::result::Result<String, LoadError> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Ok(String::new()),
        Some(_) => Err(malformed(node, field, "a string")),
    }
}

fn bool_field(
    obj: &Map<String, Value>,
    field: &str,
    node: &str,
) -> std::result::Result<Option<bool>, LoadError> {
    match obj.get(field) {
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err(malformed(node, field, "a boolean")),
    }
}

fn malformed(node: &str, field: &str, expected: &str) -> LoadError {
    LoadError::Malformed(format!("node {}: `{}` must be {}", node, field, expected))
}

/// Pre-order, so repaired ids follow document order.
fn assign_missing_ids(node: &mut Node, next_id: &mut u64) -> usize {
    let mut repaired = 0;
    for child in &mut node.children {
        if child.id.as_str().is_empty() {
            child.id = NodeId::from_counter(*next_id);
            *next_id = next_id.saturating_add(1);
            repaired += 1;
        }
        repaired += assign_missing_ids(child, next_id);
    }
    repaired
}

#[derive(Serialize)]
struct RootRecord<'a> {
    id: &'a str,
    text: &'a str,
    children: &'a [Node],
}

pub fn serialize(tree: &Tree) -> Result<String> {
    let record = RootRecord {
        id: ROOT_ID,
        text: "",
        children: tree.top_level(),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixture;

    #[test]
    fn serialize_then_parse_keeps_everything() {
        let (mut tree, ids) = fixture(&[(0, "a"), (1, "b"), (0, "c")]);
        {
            let a = tree.find_mut(&ids[0]).unwrap();
            a.bold = true;
            a.collapsed = true;
            a.color = Some(Color::Green);
            a.memo = "note".into();
        }
        let json = serialize(&tree).unwrap();
        let (loaded, report) = parse(&json).unwrap();

        assert_eq!(loaded.root(), tree.root());
        assert_eq!(report.nodes, 3);
        assert_eq!(report.repaired_ids, 0);
        assert_eq!(report.next_id, 4);
    }

    #[test]
    fn writes_color_as_lowercase_or_null() {
        let (mut tree, ids) = fixture(&[(0, "a"), (0, "b")]);
        tree.find_mut(&ids[0]).unwrap().color = Some(Color::Orange);
        let json = serialize(&tree).unwrap();
        assert!(json.contains("\"color\": \"orange\""));
        assert!(json.contains("\"color\": null"));
        assert!(json.starts_with("{\n  \"id\": \"root\""));
    }

    #[test]
    fn missing_decorations_take_defaults() {
        let json = r#"{"children":[{"id":"node-3","text":"a"}]}"#;
        let (tree, report) = parse(json).unwrap();
        let a = &tree.top_level()[0];
        assert!(!a.bold && !a.collapsed && a.color.is_none() && a.memo.is_empty());
        assert!(a.children.is_empty());
        assert_eq!(report.next_id, 4);
    }

    #[test]
    fn root_id_and_text_are_tolerated() {
        let json = r#"{"id":"whatever","text":"ignored","children":[]}"#;
        let (tree, report) = parse(json).unwrap();
        assert!(tree.is_empty());
        assert_eq!(report.next_id, 1);
    }

    #[test]
    fn nodes_without_ids_get_fresh_ones() {
        let json = r#"{"children":[
            {"id":"node-5","text":"a","children":[{"text":"b"}]},
            {"id":"","text":"c"}
        ]}"#;
        let (tree, report) = parse(json).unwrap();
        assert_eq!(report.repaired_ids, 2);
        assert_eq!(tree.top_level()[0].children[0].id, "node-6");
        assert_eq!(tree.top_level()[1].id, "node-7");
        assert_eq!(report.next_id, 8);
        assert_eq!(tree.next_id(), 8);
    }

    #[test]
    fn foreign_ids_are_kept_and_do_not_move_the_counter() {
        let json = r#"{"children":[{"id":"abc","text":"a"},{"id":"node-2","text":"b"}]}"#;
        let (tree, report) = parse(json).unwrap();
        assert_eq!(tree.top_level()[0].id, "abc");
        assert_eq!(report.next_id, 3);
    }

    #[test]
    fn expanded_flag_maps_to_collapsed() {
        let json = r#"{"children":[{"id":"node-1","text":"a","expanded":false}]}"#;
        let (tree, _) = parse(json).unwrap();
        assert!(tree.top_level()[0].collapsed);
    }

    #[test]
    fn unknown_color_reads_as_none() {
        let json = r#"{"children":[{"id":"node-1","color":"black"}]}"#;
        let (tree, _) = parse(json).unwrap();
        assert_eq!(tree.top_level()[0].color, None);
    }

    #[test]
    fn rejects_what_it_cannot_repair() {
        assert!(matches!(parse("not json"), Err(LoadError::Malformed(_))));
        assert_eq!(parse("[]").unwrap_err(), LoadError::NotATree);
        assert_eq!(
            parse(r#"{"id":"root"}"#).unwrap_err(),
            LoadError::MissingChildren { node: "root".into() }
        );
        assert_eq!(
            parse(r#"{"children":[{"id":"node-1"},{"id":"node-1"}]}"#).unwrap_err(),
            LoadError::DuplicateId("node-1".into())
        );
        assert_eq!(
            parse(r#"{"children":[{"id":"root"}]}"#).unwrap_err(),
            LoadError::ReservedId("root".into())
        );
        assert!(matches!(
            parse(r#"{"children":[{"id":"node-1","bold":"yes"}]}"#),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn rejects_ids_that_exhaust_the_counter() {
        let exhausted = LoadError::IdsExhausted { limit: MAX_NEXT_ID };
        let json = format!(r#"{{"children":[{{"id":"node-{}"}}]}}"#, u64::MAX);
        assert_eq!(parse(&json).unwrap_err(), exhausted);

        let json = format!(r#"{{"children":[{{"id":"node-{}"}}]}}"#, MAX_NEXT_ID);
        assert_eq!(parse(&json).unwrap_err(), exhausted);

        let json = format!(
            r#"{{"children":[{{"id":"node-{}"}},{{"text":"no id"}}]}}"#,
            MAX_NEXT_ID - 1
        );
        assert_eq!(parse(&json).unwrap_err(), exhausted);

        let json = format!(r#"{{"children":[{{"id":"node-{}"}}]}}"#, MAX_NEXT_ID - 1);
        let (mut tree, report) = parse(&json).unwrap();
        assert_eq!(report.next_id, MAX_NEXT_ID);
        assert_eq!(tree.create_node("x").id, NodeId::from_counter(MAX_NEXT_ID));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let mut json = String::from(r#"{"text":"leaf"}"#);
        for _ in 0..MAX_DEPTH {
            json = format!(r#"{{"children":[{}]}}"#, json);
        }
        json = format!(r#"{{"children":[{}]}}"#, json);
        assert_eq!(
            parse(&json).unwrap_err(),
            LoadError::TooDeep { limit: MAX_DEPTH }
        );
    }
}
