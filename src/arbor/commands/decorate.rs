//! Decorations and collapse state. None of these change the tree's shape.

use crate::commands::{focused_id, Outcome};
use crate::document::Document;
use crate::model::{Color, Node, NodeId};

pub fn toggle_bold(doc: &mut Document) -> Outcome {
    doc.apply("toggle_bold", |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };
        let Some(node) = doc.tree_mut().find_mut(&id) else {
            return Outcome::Ignored;
        };
        node.bold = !node.bold;
        Outcome::Applied { focus: Some(id) }
    })
}

/// Set (or with `None`, clear) the focused node's color. Setting the color it
/// already has is ignored.
pub fn set_color(doc: &mut Document, color: Option<Color>) -> Outcome {
    doc.apply("set_color", |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };
        let Some(node) = doc.tree_mut().find_mut(&id) else {
            return Outcome::Ignored;
        };
        if node.color == color {
            return Outcome::Ignored;
        }
        node.color = color;
        Outcome::Applied { focus: Some(id) }
    })
}

/// Flip `collapsed` on a node that has children. Focus stays where it is,
/// even if the collapse hides it.
pub fn toggle_collapse(doc: &mut Document, id: &NodeId) -> Outcome {
    doc.apply("toggle_collapse", |doc| {
        if id.is_root() {
            return Outcome::Ignored;
        }
        let Some(node) = doc.tree_mut().find_mut(id) else {
            return Outcome::Ignored;
        };
        if !node.has_children() {
            return Outcome::Ignored;
        }
        node.collapsed = !node.collapsed;
        Outcome::Applied {
            focus: doc.focus().cloned(),
        }
    })
}

/// Clear `collapsed` on every node. Ignored when nothing was collapsed.
pub fn expand_all(doc: &mut Document) -> Outcome {
    doc.apply("expand_all", |doc| {
        let changed = expand(doc.tree_mut().root_mut());
        if changed == 0 {
            return Outcome::Ignored;
        }
        tracing::debug!(changed, "expanded collapsed nodes");
        Outcome::Applied {
            focus: doc.focus().cloned(),
        }
    })
}

fn expand(node: &mut Node) -> usize {
    let mut changed = usize::from(node.collapsed);
    node.collapsed = false;
    for child in &mut node.children {
        changed += expand(child);
    }
    changed
}
