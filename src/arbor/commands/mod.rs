//! # Command Layer
//!
//! The mutation operations of the outliner. Each family lives in its own
//! submodule as plain functions over `&mut Document`:
//!
//! - [`insert`]: sibling above/below, child, seeding an empty tree
//! - [`delete`]: single delete, multi-select delete
//! - [`indent`]: indent under the previous sibling, outdent after the parent
//! - [`relocate`]: moving the focused node or the whole selection (same-level up/down, right, left)
//! - [`reorder`]: strict sibling swaps
//! - [`drag`]: drag-and-drop onto a node or next to it
//! - [`decorate`]: bold, color, collapse, expand-all
//! - [`copy_paste`]: copy, cut, paste
//! - [`cursor`]: focus movement, range selection and search focusing (no history)
//!
//! ## Contract
//!
//! Every structural command goes through `Document::apply`, so each one:
//!
//! 1. validates its preconditions,
//! 2. returns [`Outcome::Ignored`] without touching the document when they fail,
//! 3. otherwise mutates the tree and cursors and returns [`Outcome::Applied`]
//!    carrying the post-operation focus, after which a history snapshot is recorded.
//!
//! Invalid preconditions are not errors. The UI is expected to prevent most of
//! them; the commands just refuse quietly.
//!
//! ## Testing Strategy
//!
//! **This is where most of the tests live.** Command tests build small trees
//! with `test_utils::doc_fixture` and assert on resulting shape, focus and
//! history length.

use crate::document::Document;
use crate::model::{Node, NodeId};
use crate::tree::Tree;

pub mod copy_paste;
pub mod cursor;
pub mod decorate;
pub mod delete;
pub mod drag;
pub mod indent;
pub mod insert;
pub mod relocate;
pub mod reorder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied { focus: Option<NodeId> },
    Ignored,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied { .. })
    }

    /// Focus after the operation, when it was applied.
    pub fn focus(&self) -> Option<&NodeId> {
        match self {
            Outcome::Applied { focus } => focus.as_ref(),
            Outcome::Ignored => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Focused node id, if it still names a node in the tree.
pub(crate) fn focused_id(doc: &Document) -> Option<NodeId> {
    doc.focused_node().map(|n| n.id.clone())
}

/// The nodes a relocation acts on: the selection if there is one, otherwise
/// the focused node.
///
/// Unknown ids are dropped, as is any node whose ancestor is also moving
/// (it travels with that ancestor). The result is in document order.
pub(crate) fn moving_set(doc: &Document) -> Vec<NodeId> {
    let tree = doc.tree();
    let candidates: Vec<NodeId> = if doc.selection().is_empty() {
        focused_id(doc).into_iter().collect()
    } else {
        doc.selection()
            .iter()
            .filter(|id| !id.is_root() && tree.contains(id))
            .cloned()
            .collect()
    };

    tree.document_order()
        .into_iter()
        .filter(|id| candidates.contains(id))
        .filter(|id| {
            !tree
                .ancestors(id)
                .iter()
                .any(|anc| candidates.contains(anc))
        })
        .collect()
}

/// True when `target` is one of `moving` or sits inside one of their subtrees.
pub(crate) fn within_moving(tree: &Tree, moving: &[NodeId], target: &NodeId) -> bool {
    moving
        .iter()
        .any(|m| m == target || tree.is_descendant(target, m))
}

/// Detach `ids` (document order, no id nested under another) from their parents.
///
/// Removal runs in reverse document order. Within one parent that is
/// descending index order, so earlier removals never shift the indexes of
/// later ones; across parents the removals are independent. The detached
/// nodes come back in document order.
pub(crate) fn detach_all(tree: &mut Tree, ids: &[NodeId]) -> Vec<Node> {
    let mut nodes: Vec<Node> = ids
        .iter()
        .rev()
        .filter_map(|id| tree.detach(id))
        .map(|d| d.node)
        .collect();
    nodes.reverse();
    nodes
}

/// Where a relocated group lands, relative to a node that stays put.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Anchor {
    Before(NodeId),
    After(NodeId),
    LastChildOf(NodeId),
}

impl Anchor {
    fn target(&self) -> &NodeId {
        match self {
            Anchor::Before(id) | Anchor::After(id) | Anchor::LastChildOf(id) => id,
        }
    }

    /// Resolve to a parent and insertion index against the current tree.
    fn resolve(&self, tree: &Tree) -> Option<(NodeId, usize)> {
        match self {
            Anchor::Before(id) => tree.position(id),
            Anchor::After(id) => tree.position(id).map(|(p, i)| (p, i + 1)),
            Anchor::LastChildOf(id) => tree.contains(id).then(|| (id.clone(), usize::MAX)),
        }
    }
}

/// Move `moving` (as returned by [`moving_set`]) to `anchor`, keeping their
/// relative order.
///
/// Refuses when the anchor is one of the moving nodes or lies inside one of
/// their subtrees. The destination index is resolved after the nodes are
/// detached, so removals from the destination parent cannot skew it.
pub(crate) fn relocate(tree: &mut Tree, moving: &[NodeId], anchor: &Anchor) -> bool {
    if moving.is_empty() || within_moving(tree, moving, anchor.target()) {
        return false;
    }
    if !tree.contains(anchor.target()) {
        return false;
    }
    let nodes = detach_all(tree, moving);
    match anchor.resolve(tree) {
        Some((parent, index)) => tree.attach(&parent, index, nodes),
        None => false,
    }
}
