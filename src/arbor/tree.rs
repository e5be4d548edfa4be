//! # Tree Store
//!
//! [`Tree`] owns the node graph: the synthetic root, everything below it, and
//! the id counter that issues `node-<N>` ids.
//!
//! Lookups are depth-first searches from the root. There is no parent index;
//! `find_parent` rescans on every call, which is fine at outline scale and
//! means there is no back-reference to keep consistent across mutations.
//!
//! Absence is never an error here: `find`, `find_parent` and friends return
//! `None` and callers treat that as "nothing to do".
//!
//! Structural edits go through the crate-private `detach` / `attach` pair so
//! the mutation layer never has to juggle two mutable borrows into the tree.

use crate::model::{Node, NodeId};

/// Highest counter value a tree accepts. Loading rejects documents whose ids
/// would start the counter above it, which leaves more headroom than any
/// editing session can consume.
pub const MAX_NEXT_ID: u64 = u64::MAX / 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: Node,
    next_id: u64,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            next_id: 1,
        }
    }

    /// Assemble a tree from a validated root and counter (see [`crate::format`]).
    /// The counter is clamped to [`MAX_NEXT_ID`].
    pub fn from_parts(root: Node, next_id: u64) -> Self {
        Self {
            root,
            next_id: next_id.min(MAX_NEXT_ID),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// The value the counter will issue next.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn top_level(&self) -> &[Node] {
        &self.root.children
    }

    /// True when the tree holds no nodes besides the root.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Number of real nodes (the root is not counted).
    pub fn len(&self) -> usize {
        self.root.subtree_len() - 1
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.find(id).is_some()
    }

    pub fn find(&self, id: &NodeId) -> Option<&Node> {
        find_in(&self.root, id)
    }

    pub fn find_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        find_in_mut(&mut self.root, id)
    }

    /// The immediate parent of `id`. `None` for the root itself or unknown ids.
    pub fn find_parent(&self, id: &NodeId) -> Option<&Node> {
        parent_in(&self.root, id)
    }

    pub fn find_parent_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        parent_in_mut(&mut self.root, id)
    }

    /// Parent id and index within the parent's children.
    pub fn position(&self, id: &NodeId) -> Option<(NodeId, usize)> {
        let parent = self.find_parent(id)?;
        let index = parent.child_index(id)?;
        Some((parent.id.clone(), index))
    }

    /// Allocate a fresh node from the counter.
    pub fn create_node(&mut self, text: &str) -> Node {
        let id = self.issue_id();
        Node::new(id, text)
    }

    /// Duplicate a subtree, issuing a new id for every node in the copy.
    pub fn deep_copy(&mut self, node: &Node) -> Node {
        let id = self.issue_id();
        Node {
            id,
            text: node.text.clone(),
            children: node.children.iter().map(|c| self.deep_copy(c)).collect(),
            bold: node.bold,
            color: node.color,
            collapsed: node.collapsed,
            memo: node.memo.clone(),
        }
    }

    fn issue_id(&mut self) -> NodeId {
        let id = NodeId::from_counter(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        debug_assert!(
            self.find(&id).is_none(),
            "id counter issued an id already in the tree: {}",
            id
        );
        id
    }

    /// Depth below the root: top-level nodes are level 1.
    pub fn level_of(&self, id: &NodeId) -> Option<usize> {
        if id.is_root() || !self.contains(id) {
            return None;
        }
        Some(self.ancestors(id).len() + 1)
    }

    /// Ancestors of `id`, nearest first, stopping below the root.
    pub fn ancestors(&self, id: &NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = id.clone();
        while let Some(parent) = self.find_parent(&current) {
            if parent.id.is_root() {
                break;
            }
            out.push(parent.id.clone());
            current = parent.id.clone();
        }
        out
    }

    /// True when `id` sits strictly below `ancestor`.
    pub fn is_descendant(&self, id: &NodeId, ancestor: &NodeId) -> bool {
        if id == ancestor {
            return false;
        }
        self.find(ancestor)
            .map(|a| a.children.iter().any(|c| c.contains(id)))
            .unwrap_or(false)
    }

    /// Pre-order walk over every real node with its level, ignoring collapse.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.root, false)
    }

    /// Pre-order walk that does not descend into collapsed nodes.
    pub fn walk_visible(&self) -> Walk<'_> {
        Walk::new(&self.root, true)
    }

    /// Every real node id in document order.
    pub fn document_order(&self) -> Vec<NodeId> {
        self.walk().map(|(n, _)| n.id.clone()).collect()
    }

    /// Remove a node (with its subtree) from its parent.
    pub(crate) fn detach(&mut self, id: &NodeId) -> Option<Detached> {
        let parent = self.find_parent_mut(id)?;
        let index = parent.child_index(id)?;
        let node = parent.children.remove(index);
        Some(Detached {
            parent: parent.id.clone(),
            index,
            node,
        })
    }

    /// Insert `nodes` into `parent`'s children at `index` (clamped to the end).
    pub(crate) fn attach(&mut self, parent: &NodeId, index: usize, nodes: Vec<Node>) -> bool {
        match self.find_mut(parent) {
            Some(p) => {
                let at = index.min(p.children.len());
                p.children.splice(at..at, nodes);
                true
            }
            None => false,
        }
    }

    pub(crate) fn restore_parts(&mut self, root: Node, next_id: u64) {
        self.root = root;
        self.next_id = next_id;
    }
}

#[derive(Debug)]
pub(crate) struct Detached {
    pub parent: NodeId,
    pub index: usize,
    pub node: Node,
}

fn find_in<'a>(node: &'a Node, id: &NodeId) -> Option<&'a Node> {
    if &node.id == id {
        return Some(node);
    }
    node.children.iter().find_map(|c| find_in(c, id))
}

fn find_in_mut<'a>(node: &'a mut Node, id: &NodeId) -> Option<&'a mut Node> {
    if &node.id == id {
        return Some(node);
    }
    node.children.iter_mut().find_map(|c| find_in_mut(c, id))
}

fn parent_in<'a>(node: &'a Node, id: &NodeId) -> Option<&'a Node> {
    if node.children.iter().any(|c| &c.id == id) {
        return Some(node);
    }
    node.children.iter().find_map(|c| parent_in(c, id))
}

fn parent_in_mut<'a>(node: &'a mut Node, id: &NodeId) -> Option<&'a mut Node> {
    if node.children.iter().any(|c| &c.id == id) {
        return Some(node);
    }
    node.children.iter_mut().find_map(|c| parent_in_mut(c, id))
}

/// Iterator returned by [`Tree::walk`] and [`Tree::walk_visible`].
pub struct Walk<'a> {
    stack: Vec<(&'a Node, usize)>,
    skip_collapsed: bool,
}

impl<'a> Walk<'a> {
    fn new(root: &'a Node, skip_collapsed: bool) -> Self {
        let stack = root.children.iter().rev().map(|c| (c, 1)).collect();
        Self {
            stack,
            skip_collapsed,
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (&'a Node, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, level) = self.stack.pop()?;
        if !(self.skip_collapsed && node.collapsed) {
            self.stack
                .extend(node.children.iter().rev().map(|c| (c, level + 1)));
        }
        Some((node, level))
    }
}
