//! Tab / Shift+Tab on the focused node alone.
//!
//! For the arrow-key variants that carry the whole selection see
//! [`crate::commands::relocate`].

use crate::commands::{focused_id, Outcome};
use crate::document::Document;

/// Make the focused node the last child of its previous sibling.
pub fn indent(doc: &mut Document) -> Outcome {
    doc.apply("indent", |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };
        let Some((parent, index)) = doc.tree().position(&id) else {
            return Outcome::Ignored;
        };
        if index == 0 {
            return Outcome::Ignored;
        }
        let Some(new_parent) = doc
            .tree()
            .find(&parent)
            .map(|p| p.children[index - 1].id.clone())
        else {
            return Outcome::Ignored;
        };

        let Some(detached) = doc.tree_mut().detach(&id) else {
            return Outcome::Ignored;
        };
        doc.tree_mut()
            .attach(&new_parent, usize::MAX, vec![detached.node]);
        Outcome::Applied { focus: Some(id) }
    })
}

/// Move the focused node out of its parent to sit right after it.
pub fn outdent(doc: &mut Document) -> Outcome {
    doc.apply("outdent", |doc| {
        let Some(id) = focused_id(doc) else {
            return Outcome::Ignored;
        };
        let Some((parent, _)) = doc.tree().position(&id) else {
            return Outcome::Ignored;
        };
        if parent.is_root() {
            return Outcome::Ignored;
        }
        let Some((grandparent, parent_index)) = doc.tree().position(&parent) else {
            return Outcome::Ignored;
        };

        let Some(detached) = doc.tree_mut().detach(&id) else {
            return Outcome::Ignored;
        };
        doc.tree_mut()
            .attach(&grandparent, parent_index + 1, vec![detached.node]);
        Outcome::Applied { focus: Some(id) }
    })
}
