//! Drag-and-drop. Only the dragged node moves; the selection is left alone.

use crate::commands::{relocate, Anchor, Outcome};
use crate::document::Document;
use crate::model::NodeId;
use crate::tree::Tree;

/// Reparent `dragged` as the last child of `target`.
pub fn drop_onto(doc: &mut Document, dragged: &NodeId, target: &NodeId) -> Outcome {
    drop_at(doc, "drop_onto", dragged, Anchor::LastChildOf(target.clone()))
}

/// Place `dragged` right before `target`, under `target`'s parent.
pub fn drop_before(doc: &mut Document, dragged: &NodeId, target: &NodeId) -> Outcome {
    drop_at(doc, "drop_before", dragged, Anchor::Before(target.clone()))
}

/// Place `dragged` right after `target`, under `target`'s parent.
pub fn drop_after(doc: &mut Document, dragged: &NodeId, target: &NodeId) -> Outcome {
    drop_at(doc, "drop_after", dragged, Anchor::After(target.clone()))
}

fn drop_at(doc: &mut Document, op: &'static str, dragged: &NodeId, anchor: Anchor) -> Outcome {
    doc.apply(op, |doc| {
        let target = match &anchor {
            Anchor::Before(t) | Anchor::After(t) | Anchor::LastChildOf(t) => t,
        };
        if !accepts_drop(doc.tree(), dragged, target) {
            return Outcome::Ignored;
        }
        if !matches!(anchor, Anchor::LastChildOf(_)) && target.is_root() {
            return Outcome::Ignored;
        }
        if !relocate(doc.tree_mut(), std::slice::from_ref(dragged), &anchor) {
            return Outcome::Ignored;
        }
        doc.set_focus(Some(dragged.clone()));
        Outcome::Applied {
            focus: Some(dragged.clone()),
        }
    })
}

/// A drop is valid when both nodes exist, the dragged node is not the root,
/// and no node on the path from `target` up to the root is `dragged`.
fn accepts_drop(tree: &Tree, dragged: &NodeId, target: &NodeId) -> bool {
    if dragged.is_root() || !tree.contains(dragged) || !tree.contains(target) {
        return false;
    }
    let mut current = Some(target.clone());
    while let Some(id) = current {
        if &id == dragged {
            return false;
        }
        current = tree.find_parent(&id).map(|p| p.id.clone());
    }
    true
}
