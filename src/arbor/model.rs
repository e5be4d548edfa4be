//! # Domain Model: Nodes, Ids and Decorations
//!
//! An arbor document is a single tree. Its top is a synthetic root node with id
//! `root` that is never shown, focused or edited; the root's children are the
//! top-level entries of the outline.
//!
//! ## Ids
//!
//! Every node carries a [`NodeId`] of the form `node-<N>`, issued by the tree's
//! monotonically increasing counter (see [`crate::tree::Tree`]). Ids are the only
//! handle the rest of the system uses to talk about nodes: focus, selection,
//! search results and history all store ids, never references.
//!
//! Files written by other tools may contain ids that do not follow the
//! `node-<N>` pattern. Those are kept verbatim; they simply never collide with
//! counter-issued ids.
//!
//! ## Decorations
//!
//! | Field       | Meaning                                                  |
//! |-------------|----------------------------------------------------------|
//! | `bold`      | Render the text in bold                                  |
//! | `color`     | `None` or one of [`Color`]                               |
//! | `collapsed` | Hide the subtree from navigation and display             |
//! | `memo`      | Free-form note; blank memos count as "no memo" for display |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ROOT_ID: &str = "root";
const ID_PREFIX: &str = "node-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    /// Id issued by the counter for slot `n`.
    pub fn from_counter(n: u64) -> Self {
        Self(format!("{}{}", ID_PREFIX, n))
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric suffix of a `node-<N>` id, if this id has that shape.
    pub fn counter_suffix(&self) -> Option<u64> {
        self.0.strip_prefix(ID_PREFIX)?.parse().ok()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Orange,
    Purple,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::Red,
        Color::Blue,
        Color::Green,
        Color::Orange,
        Color::Purple,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Orange => "orange",
            Color::Purple => "purple",
        }
    }

    /// Palette slot used by the numeric color shortcuts: 0 clears, 1..=5 pick a color.
    pub fn from_slot(slot: u8) -> Option<Option<Color>> {
        match slot {
            0 => Some(None),
            1..=5 => Some(Some(Self::ALL[usize::from(slot) - 1])),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown color: {}", s))
    }
}

/// A single outline entry. Owns its children; there are no back references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub text: String,
    pub children: Vec<Node>,
    pub bold: bool,
    pub color: Option<Color>,
    pub collapsed: bool,
    pub memo: String,
}

impl Node {
    /// A fresh node with default decorations. Callers outside the tree store
    /// should go through [`crate::tree::Tree::create_node`] so the id is unique.
    pub fn new(id: NodeId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            children: Vec::new(),
            bold: false,
            color: None,
            collapsed: false,
            memo: String::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(NodeId::root(), "")
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whitespace-only memos are kept in the model but count as absent.
    pub fn has_memo(&self) -> bool {
        !self.memo.trim().is_empty()
    }

    pub fn child_index(&self, id: &NodeId) -> Option<usize> {
        self.children.iter().position(|c| &c.id == id)
    }

    /// Number of nodes in this subtree, this node included.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }

    /// Every id in this subtree, pre-order.
    pub fn subtree_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.subtree_len());
        collect_ids(self, &mut ids);
        ids
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        &self.id == id || self.children.iter().any(|c| c.contains(id))
    }
}

fn collect_ids(node: &Node, out: &mut Vec<NodeId>) {
    out.push(node.id.clone());
    for child in &node.children {
        collect_ids(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_suffix_only_for_counter_ids() {
        assert_eq!(NodeId::from_counter(42).counter_suffix(), Some(42));
        assert_eq!(NodeId::new("node-x").counter_suffix(), None);
        assert_eq!(NodeId::new("custom").counter_suffix(), None);
        assert_eq!(NodeId::root().counter_suffix(), None);
    }

    #[test]
    fn color_parses_case_insensitively() {
        assert_eq!("Red".parse::<Color>().unwrap(), Color::Red);
        assert_eq!(" purple ".parse::<Color>().unwrap(), Color::Purple);
        assert!("teal".parse::<Color>().is_err());
    }

    #[test]
    fn color_slots_follow_palette_order() {
        assert_eq!(Color::from_slot(0), Some(None));
        assert_eq!(Color::from_slot(1), Some(Some(Color::Red)));
        assert_eq!(Color::from_slot(5), Some(Some(Color::Purple)));
        assert_eq!(Color::from_slot(6), None);
    }

    #[test]
    fn blank_memo_counts_as_absent() {
        let mut node = Node::new(NodeId::from_counter(1), "a");
        node.memo = "  \n ".into();
        assert!(!node.has_memo());
        node.memo = "note".into();
        assert!(node.has_memo());
    }

    #[test]
    fn color_serializes_lowercase() {
        let json = serde_json::to_string(&Some(Color::Orange)).unwrap();
        assert_eq!(json, "\"orange\"");
    }
}
