//! The in-document clipboard.
//!
//! The clipboard always holds a deep copy with ids of its own, and paste
//! copies it again, so the same entry can be pasted any number of times
//! without two nodes ever sharing an id. The clipboard sits outside undo:
//! undoing a cut brings the node back and leaves the clipboard filled.

use crate::commands::delete::remove_focused;
use crate::commands::{focused_id, Outcome};
use crate::document::{ClipboardEntry, Document};

/// Copy the focused subtree. Records no history.
pub fn copy(doc: &mut Document) -> bool {
    let Some(node) = doc.focused_node().cloned() else {
        return false;
    };
    let copy = doc.tree_mut().deep_copy(&node);
    tracing::debug!(node = %node.id, size = copy.subtree_len(), "copied");
    doc.set_clipboard(ClipboardEntry {
        node: copy,
        cut: false,
    });
    true
}

/// Copy the focused subtree, then delete it exactly like a single delete.
pub fn cut(doc: &mut Document) -> Outcome {
    doc.apply("cut", |doc| {
        let Some(node) = doc.focused_node().cloned() else {
            return Outcome::Ignored;
        };
        if doc.tree().find_parent(&node.id).is_none() {
            return Outcome::Ignored;
        }
        let copy = doc.tree_mut().deep_copy(&node);
        doc.set_clipboard(ClipboardEntry {
            node: copy,
            cut: true,
        });
        remove_focused(doc)
    })
}

/// Append a fresh copy of the clipboard as the focused node's last child and
/// focus it.
pub fn paste(doc: &mut Document) -> Outcome {
    doc.apply("paste", |doc| {
        let Some(entry) = doc.clipboard().cloned() else {
            return Outcome::Ignored;
        };
        let Some(target) = focused_id(doc) else {
            return Outcome::Ignored;
        };

        let pasted = doc.tree_mut().deep_copy(&entry.node);
        let pasted_id = pasted.id.clone();
        doc.tree_mut().attach(&target, usize::MAX, vec![pasted]);
        doc.set_focus(Some(pasted_id.clone()));
        Outcome::Applied {
            focus: Some(pasted_id),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use crate::test_utils::doc_fixture;

    /// Shape and content without ids.
    fn shape(node: &Node) -> String {
        let kids: Vec<String> = node.children.iter().map(shape).collect();
        format!("{}[{}]", node.text, kids.join(","))
    }

    #[test]
    fn copy_fills_clipboard_without_history() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "x")]);
        assert!(copy(&mut doc));
        let entry = doc.clipboard().unwrap();
        assert!(!entry.cut);
        assert_eq!(shape(&entry.node), "a[x[]]");
        assert_ne!(entry.node.id, ids[0]);
        assert_eq!(doc.history().len(), 1);
    }

    #[test]
    fn copy_without_focus_does_nothing() {
        let (mut doc, _) = doc_fixture(&[]);
        assert!(!copy(&mut doc));
        assert!(doc.clipboard().is_none());
    }

    #[test]
    fn paste_needs_a_clipboard() {
        let (mut doc, _) = doc_fixture(&[(0, "a")]);
        assert_eq!(paste(&mut doc), Outcome::Ignored);
    }

    #[test]
    fn paste_appends_fresh_copy_under_focus() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (1, "x"), (0, "b")]);
        copy(&mut doc);
        doc.set_focus(Some(ids[2].clone()));

        let first = paste(&mut doc).focus().cloned().unwrap();
        doc.set_focus(Some(ids[2].clone()));
        let second = paste(&mut doc).focus().cloned().unwrap();

        let b = doc.tree().find(&ids[2]).unwrap();
        assert_eq!(b.children.len(), 2);
        assert_ne!(first, second);
        assert_eq!(shape(&b.children[0]), "a[x[]]");
        assert_eq!(doc.focus(), Some(&second));
    }

    #[test]
    fn cut_then_paste_moves_content_under_new_ids() {
        let (mut doc, ids) = doc_fixture(&[(0, "x"), (1, "x1"), (0, "y")]);
        let outcome = cut(&mut doc);
        assert_eq!(outcome.focus(), Some(&ids[2]));
        assert!(doc.clipboard().unwrap().cut);
        assert!(!doc.tree().contains(&ids[0]));

        paste(&mut doc);
        let y = doc.tree().find(&ids[2]).unwrap();
        assert_eq!(shape(&y.children[0]), "x[x1[]]");
        let pasted_ids = y.children[0].subtree_ids();
        assert!(!pasted_ids.contains(&ids[0]));
        assert!(!pasted_ids.contains(&ids[1]));
    }

    #[test]
    fn undoing_cut_keeps_clipboard() {
        let (mut doc, ids) = doc_fixture(&[(0, "a"), (0, "b")]);
        cut(&mut doc);
        doc.undo();
        assert!(doc.tree().contains(&ids[0]));
        assert!(doc.clipboard().is_some());
    }
}
