use crate::commands::{focused_id, Outcome};
use crate::document::Document;

pub fn insert_sibling_below(doc: &mut Document) -> Outcome {
    insert_sibling(doc, "insert_sibling_below", 1)
}

pub fn insert_sibling_above(doc: &mut Document) -> Outcome {
    insert_sibling(doc, "insert_sibling_above", 0)
}

fn insert_sibling(doc: &mut Document, op: &'static str, offset: usize) -> Outcome {
    doc.apply(op, |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };
        let Some((parent, index)) = doc.tree().position(&id) else {
            return Outcome::Ignored;
        };

        let node = doc.tree_mut().create_node("");
        let new_id = node.id.clone();
        doc.tree_mut().attach(&parent, index + offset, vec![node]);
        doc.set_focus(Some(new_id.clone()));
        Outcome::Applied {
            focus: Some(new_id),
        }
    })
}

/// Append an empty child to the focused node.
///
/// A collapsed parent stays collapsed; the host decides whether to reveal
/// the new node.
pub fn insert_child(doc: &mut Document) -> Outcome {
    doc.apply("insert_child", |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };

        let node = doc.tree_mut().create_node("");
        let new_id = node.id.clone();
        doc.tree_mut().attach(&id, usize::MAX, vec![node]);
        doc.set_focus(Some(new_id.clone()));
        Outcome::Applied {
            focus: Some(new_id),
        }
    })
}

/// Give an empty tree one empty top-level node to type into.
pub fn ensure_seed(doc: &mut Document) -> Outcome {
    doc.apply("ensure_seed", |doc| {
        if !doc.tree().is_empty() {
            return Outcome::Ignored;
        }
        let node = doc.tree_mut().create_node("");
        let new_id = node.id.clone();
        doc.tree_mut().root_mut().children.push(node);
        doc.set_focus(Some(new_id.clone()));
        Outcome::Applied {
            focus: Some(new_id),
        }
    })
}
